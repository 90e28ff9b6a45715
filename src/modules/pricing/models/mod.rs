mod program_financials;

pub use program_financials::{FinancialAdjustments, ProgramFinancials};
