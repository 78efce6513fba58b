//! Storage Errors

use donations_core::DonationError;
use sqlx::migrate::MigrateError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    // Error occurred when executing some SQL operation.
    #[error("sql failed: {0}")]
    Sql(#[from] sqlx::Error),

    // Error occurred when running migrations.
    #[error("migration failed: {0}")]
    Migrate(#[from] MigrateError),

    // A stored row holds a value the domain does not accept.
    #[error("corrupt row: {0}")]
    Decode(String),
}

impl From<Error> for DonationError {
    fn from(error: Error) -> Self {
        Self::Storage(error.to_string())
    }
}
