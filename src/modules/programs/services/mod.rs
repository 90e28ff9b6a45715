pub mod financial_service;
pub mod lock_evaluator;
pub mod margin_backfill;

pub use financial_service::{ProgramFinancialService, RecalculationOutcome};
pub use lock_evaluator::{has_paid_payment, is_program_locked, LockEvaluator, ProgramLock};
pub use margin_backfill::{BackfillReport, MarginBackfill};
