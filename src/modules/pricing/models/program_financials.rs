use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::money::{round_cents, round_percentage};
use crate::modules::pricing::services::{calculate_projected_margin, calculate_projected_price};
use crate::modules::programs::models::ProgramTotals;
use crate::modules::taxes::{TaxCalculator, TaxRate};

/// Signed adjustments applied on top of the line-item totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialAdjustments {
    /// Zero or negative
    pub discounts: Decimal,
    /// Negative is a rebate
    pub finance_charges: Decimal,
}

/// Derived financial values of a program, rounded for storage
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramFinancials {
    /// Cents
    pub taxes: Decimal,
    /// Cents
    pub projected_price: Decimal,
    /// Percentage, two decimals
    pub margin: Decimal,
}

impl ProgramFinancials {
    /// Chains tax, price and margin over the same inputs.
    ///
    /// Taxes are rounded to cents before they feed the price, so the stored
    /// price is exactly the stored parts added up. The margin is computed
    /// from those stored values and then rounded.
    pub fn derive(
        totals: &ProgramTotals,
        adjustments: &FinancialAdjustments,
        tax_rate: TaxRate,
    ) -> Self {
        let taxes = round_cents(TaxCalculator::new(tax_rate).calculate_tax(
            totals.total_charge,
            totals.total_taxable_charge,
            adjustments.discounts,
        ));

        let projected_price = round_cents(calculate_projected_price(
            totals.total_charge,
            taxes,
            adjustments.finance_charges,
            adjustments.discounts,
        ));

        let margin = round_percentage(calculate_projected_margin(
            projected_price,
            totals.total_cost,
            adjustments.finance_charges,
            taxes,
        ));

        Self {
            taxes,
            projected_price,
            margin,
        }
    }

    /// Margin comparison at the stored precision
    pub fn margin_matches(&self, other: &ProgramFinancials) -> bool {
        round_percentage(self.margin) == round_percentage(other.margin)
    }
}
