pub mod models;
pub mod services;

pub use models::TaxRate;
pub use services::{calculate_tax_on_taxable_items, TaxCalculator};
