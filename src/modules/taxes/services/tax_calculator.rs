use rust_decimal::Decimal;
use tracing::warn;

use crate::modules::taxes::models::TaxRate;

/// Tax owed on the taxable share of a program after discounts.
///
/// A program can mix taxable and non-taxable lines, so a flat discount is
/// apportioned pro rata and tax is charged on the net taxable remainder:
///
/// ```text
/// taxable_percentage        = total_taxable_charge / total_charge
/// taxable_discount          = |discounts| * taxable_percentage
/// discounted_taxable_charge = total_taxable_charge - taxable_discount
/// tax                       = discounted_taxable_charge * tax_rate
/// ```
///
/// Returns zero when either charge is zero or negative. The result is not
/// rounded.
pub fn calculate_tax_on_taxable_items(
    total_charge: Decimal,
    total_taxable_charge: Decimal,
    discounts: Decimal,
    tax_rate: TaxRate,
) -> Decimal {
    if total_charge <= Decimal::ZERO || total_taxable_charge <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    if total_taxable_charge > total_charge {
        warn!(
            total_charge = %total_charge,
            total_taxable_charge = %total_taxable_charge,
            "Taxable charge exceeds total charge; tax computed unclamped"
        );
    }

    let taxable_percentage = total_taxable_charge / total_charge;
    let taxable_discount = discounts.abs() * taxable_percentage;
    let discounted_taxable_charge = total_taxable_charge - taxable_discount;

    discounted_taxable_charge * tax_rate.value()
}

/// TaxCalculator binds a configured rate to the tax formula
#[derive(Debug, Clone, Copy, Default)]
pub struct TaxCalculator {
    tax_rate: TaxRate,
}

impl TaxCalculator {
    pub fn new(tax_rate: TaxRate) -> Self {
        Self { tax_rate }
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    pub fn calculate_tax(
        &self,
        total_charge: Decimal,
        total_taxable_charge: Decimal,
        discounts: Decimal,
    ) -> Decimal {
        calculate_tax_on_taxable_items(total_charge, total_taxable_charge, discounts, self.tax_rate)
    }
}
