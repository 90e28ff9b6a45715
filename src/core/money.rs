use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::core::{AppError, Result};

/// Decimal places for program currency amounts (dollars and cents)
pub const MONEY_SCALE: u32 = 2;

/// Decimal places kept for persisted margin percentages
pub const PERCENTAGE_SCALE: u32 = 2;

/// One hundred, used for percentages and cent conversion
pub const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Rounds an amount to whole cents, half away from zero
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a percentage for storage
pub fn round_percentage(percentage: Decimal) -> Decimal {
    percentage.round_dp_with_strategy(PERCENTAGE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts an amount to integer cents after rounding.
///
/// Returns `None` only when the amount does not fit an `i64` number of cents.
pub fn to_cents(amount: Decimal) -> Option<i64> {
    (round_cents(amount) * HUNDRED).to_i64()
}

/// Cent-precision equality: sub-cent noise on either side is ignored
pub fn same_cents(a: Decimal, b: Decimal) -> bool {
    match (to_cents(a), to_cents(b)) {
        (Some(a), Some(b)) => a == b,
        _ => round_cents(a) == round_cents(b),
    }
}

/// Converts a float received at the boundary into an exact amount.
///
/// NaN and infinities are rejected; callers must hand the engine finite values.
pub fn amount_from_f64(value: f64, field: &str) -> Result<Decimal> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{} must be a finite number, got {}",
            field, value
        )));
    }

    Decimal::from_f64(value).ok_or_else(|| {
        AppError::validation(format!("{} is out of range for a currency amount", field))
    })
}
