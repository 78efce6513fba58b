//! Money Conversion
//!
//! The processor speaks integer minor units (ngwee); the ledger stores
//! decimal major units (kwacha).

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Currency of every donation line item
pub const CURRENCY: &str = "ZMW";

/// Smallest accepted donation, in major units
pub const MINIMUM_AMOUNT: Decimal = Decimal::ONE;

const MINOR_UNIT_SCALE: u32 = 2;

/// Convert a major-unit amount to processor minor units.
///
/// Fractions of a minor unit are rounded half away from zero. Returns `None`
/// when the result does not fit in an `i64`.
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// Convert processor minor units to a major-unit amount
pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, MINOR_UNIT_SCALE)
}
