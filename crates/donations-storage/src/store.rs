//! PostgreSQL Donation Store

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use donations_core::{DonationRecord, DonationStatus, DonationStore, NewDonation, Result};

use crate::error::Error;
use crate::row::DonationRow;

const INSERT_IF_ABSENT: &str = r"
INSERT INTO donations (
    id, external_charge_id, amount, currency, donor_name, donor_email, message,
    payment_method, is_recurring, project_id, status, is_anonymous, created_at, updated_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
ON CONFLICT (external_charge_id) DO NOTHING
RETURNING *
";

const UPDATE_STATUS_BY_CHARGE: &str = r"
UPDATE donations
SET status = $1, updated_at = now()
WHERE external_charge_id = $2
";

const SELECT_BY_CHARGE: &str = r"
SELECT * FROM donations
WHERE external_charge_id = $1
ORDER BY created_at, id
";

/// Donation store backed by a postgres pool
#[derive(Clone, Debug)]
pub struct PgDonationStore {
    pool: Pool<Postgres>,
}

impl PgDonationStore {
    pub const fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DonationStore for PgDonationStore {
    async fn insert_if_absent(&self, donation: NewDonation) -> Result<Option<DonationRecord>> {
        // Identity and timestamps are assigned here so both stores agree on them.
        let record = DonationRecord::create(donation);

        let row = sqlx::query_as::<_, DonationRow>(INSERT_IF_ABSENT)
            .bind(record.id)
            .bind(&record.external_charge_id)
            .bind(record.amount)
            .bind(&record.currency)
            .bind(&record.donor_name)
            .bind(&record.donor_email)
            .bind(&record.message)
            .bind(&record.payment_method)
            .bind(record.is_recurring)
            .bind(&record.project_id)
            .bind(record.status.as_str())
            .bind(record.is_anonymous)
            .bind(record.created_at)
            .bind(record.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::from)?;

        Ok(row.map(DonationRecord::try_from).transpose()?)
    }

    async fn update_status_by_charge(&self, charge_id: &str, status: DonationStatus) -> Result<u64> {
        let result = sqlx::query(UPDATE_STATUS_BY_CHARGE)
            .bind(status.as_str())
            .bind(charge_id)
            .execute(&self.pool)
            .await
            .map_err(Error::from)?;

        Ok(result.rows_affected())
    }

    async fn find_by_charge(&self, charge_id: &str) -> Result<Vec<DonationRecord>> {
        let rows = sqlx::query_as::<_, DonationRow>(SELECT_BY_CHARGE)
            .bind(charge_id)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::from)?;

        Ok(rows
            .into_iter()
            .map(DonationRecord::try_from)
            .collect::<std::result::Result<_, _>>()?)
    }

    fn name(&self) -> &str {
        "postgres"
    }
}
