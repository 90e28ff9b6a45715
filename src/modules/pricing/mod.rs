pub mod models;
pub mod services;

pub use models::{FinancialAdjustments, ProgramFinancials};
pub use services::{calculate_projected_margin, calculate_projected_price};
