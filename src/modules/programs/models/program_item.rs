use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::{AppError, Result};

/// A line item of a member program (a therapy, supplement or service)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ProgramItem {
    pub quantity: i32,
    /// Charge per unit
    pub item_charge: Decimal,
    /// Cost per unit
    pub item_cost: Decimal,
    pub is_taxable: bool,
}

impl ProgramItem {
    pub fn validate(&self) -> Result<()> {
        if self.quantity < 0 {
            return Err(AppError::validation(format!(
                "Item quantity cannot be negative, got {}",
                self.quantity
            )));
        }

        if self.item_charge < Decimal::ZERO || self.item_cost < Decimal::ZERO {
            return Err(AppError::validation("Item charge and cost cannot be negative"));
        }

        Ok(())
    }

    pub fn line_charge(&self) -> Decimal {
        Decimal::from(self.quantity) * self.item_charge
    }

    pub fn line_cost(&self) -> Decimal {
        Decimal::from(self.quantity) * self.item_cost
    }
}

/// Program-level sums of its line items
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramTotals {
    pub total_charge: Decimal,
    pub total_taxable_charge: Decimal,
    pub total_cost: Decimal,
}

impl ProgramTotals {
    /// Aggregates validated items. The taxable charge can never exceed the
    /// total charge because it is a sum over a subset of the same lines.
    pub fn from_items(items: &[ProgramItem]) -> Result<Self> {
        let mut totals = Self::default();

        for item in items {
            item.validate()?;

            let charge = item.line_charge();
            totals.total_charge += charge;
            totals.total_cost += item.line_cost();
            if item.is_taxable {
                totals.total_taxable_charge += charge;
            }
        }

        Ok(totals)
    }

    /// False for rows that break `total_taxable_charge <= total_charge`
    pub fn is_consistent(&self) -> bool {
        self.total_taxable_charge <= self.total_charge
    }
}
