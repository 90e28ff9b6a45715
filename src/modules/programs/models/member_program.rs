// MemberProgram snapshot as read by the financial engine
//
// Holds the financial terms of one member program plus the resolved status
// reference. Taxes, projected price and margin are derived values: they are
// carried so they can be compared and rewritten, never used as inputs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::program_item::ProgramTotals;
use super::program_status::StatusResolution;
use crate::core::money::amount_from_f64;
use crate::core::{AppError, Result};
use crate::modules::pricing::models::{FinancialAdjustments, ProgramFinancials};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct MemberProgram {
    pub member_program_id: i64,

    /// Sum of line-item charges before adjustments
    pub total_charge: Decimal,

    /// Part of `total_charge` that is subject to tax
    pub total_taxable_charge: Decimal,

    pub total_cost: Decimal,

    /// Always zero or negative (a credit)
    pub discounts: Decimal,

    /// Signed; negative is a rebate paid to the member
    pub finance_charges: Decimal,

    /// Derived
    pub taxes: Decimal,

    /// Derived
    #[sqlx(rename = "final_total_price")]
    pub projected_price: Decimal,

    /// Derived, percentage
    pub margin: Decimal,

    pub financing_type_id: Option<i64>,

    pub program_status_id: Option<i64>,

    /// Joined from the status table; absent when the join found nothing
    pub status_name: Option<String>,
}

impl MemberProgram {
    pub fn status(&self) -> StatusResolution {
        StatusResolution::resolve(self.status_name.as_deref(), self.program_status_id)
    }

    pub fn totals(&self) -> ProgramTotals {
        ProgramTotals {
            total_charge: self.total_charge,
            total_taxable_charge: self.total_taxable_charge,
            total_cost: self.total_cost,
        }
    }

    pub fn adjustments(&self) -> FinancialAdjustments {
        FinancialAdjustments {
            discounts: self.discounts,
            finance_charges: self.finance_charges,
        }
    }

    /// Derived values as currently stored
    pub fn stored_financials(&self) -> ProgramFinancials {
        ProgramFinancials {
            taxes: self.taxes,
            projected_price: self.projected_price,
            margin: self.margin,
        }
    }

    /// The row as currently stored, in the shape the write path persists
    pub fn stored_record(&self) -> ProgramFinancialRecord {
        ProgramFinancialRecord {
            totals: self.totals(),
            adjustments: self.adjustments(),
            financing_type_id: self.financing_type_id,
            financials: self.stored_financials(),
        }
    }
}

/// An edit to the financial terms of a program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialUpdate {
    pub financing_type_id: Option<i64>,
    pub finance_charges: Decimal,
    pub discounts: Decimal,
}

impl FinancialUpdate {
    /// Builds an update from float amounts received at a request boundary
    pub fn from_f64(
        financing_type_id: Option<i64>,
        finance_charges: f64,
        discounts: f64,
    ) -> Result<Self> {
        let update = Self {
            financing_type_id,
            finance_charges: amount_from_f64(finance_charges, "finance_charges")?,
            discounts: amount_from_f64(discounts, "discounts")?,
        };
        update.validate()?;

        Ok(update)
    }

    pub fn validate(&self) -> Result<()> {
        if self.discounts > Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Discounts must be zero or negative, got {}",
                self.discounts
            )));
        }

        Ok(())
    }

    pub fn adjustments(&self) -> FinancialAdjustments {
        FinancialAdjustments {
            discounts: self.discounts,
            finance_charges: self.finance_charges,
        }
    }
}

/// Everything the write path persists for a program in one statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramFinancialRecord {
    pub totals: ProgramTotals,
    pub adjustments: FinancialAdjustments,
    pub financing_type_id: Option<i64>,
    pub financials: ProgramFinancials,
}
