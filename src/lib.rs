//! Program financial calculation and lifecycle lock engine
//!
//! Pure building blocks for member program financials:
//! - tax on the taxable share of a program after pro-rata discounts
//! - projected price and projected margin
//! - whether an edit makes the generated payment schedule stale
//! - whether a program's financial data may still change
//!
//! plus the write path that gates persistence and schedule regeneration on them.

pub mod config;
pub mod core;
pub mod modules;

// Re-export commonly used types
pub use modules::payments;
pub use modules::pricing;
pub use modules::programs;
pub use modules::taxes;

pub use modules::payments::{should_regenerate_payments, PaymentTermsChange};
pub use modules::pricing::{calculate_projected_margin, calculate_projected_price};
pub use modules::programs::{is_program_locked, ProgramLock};
pub use modules::taxes::calculate_tax_on_taxable_items;
