mod tax_calculator;

pub use tax_calculator::{calculate_tax_on_taxable_items, TaxCalculator};
