use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

/// Sales tax applied to the net taxable charge of a program, as a fraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRate(Decimal);

impl TaxRate {
    /// 8.25%
    pub const DEFAULT: TaxRate = TaxRate(Decimal::from_parts(825, 0, 0, false, 4));

    /// Validate tax rate is within 0..=1 with at most 4 decimal places
    pub fn new(rate: Decimal) -> Result<Self> {
        if rate < Decimal::ZERO {
            return Err(AppError::validation("Tax rate cannot be negative"));
        }

        if rate > Decimal::ONE {
            return Err(AppError::validation("Tax rate cannot exceed 1.0 (100%)"));
        }

        if rate.normalize().scale() > 4 {
            return Err(AppError::validation(
                "Tax rate cannot have more than 4 decimal places",
            ));
        }

        Ok(Self(rate))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::str::FromStr for TaxRate {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let rate = s
            .trim()
            .parse::<Decimal>()
            .map_err(|_| AppError::validation(format!("Invalid tax rate: {}", s)))?;
        Self::new(rate)
    }
}
