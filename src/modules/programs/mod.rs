// Programs module

pub mod models;
pub mod repositories;
pub mod services;

pub use models::{
    FinancialUpdate, MemberProgram, ProgramFinancialRecord, ProgramItem, ProgramStatus,
    ProgramTotals, StatusResolution,
};
pub use repositories::{MySqlProgramRepository, MySqlScheduleProcedures};
pub use services::{
    is_program_locked, BackfillReport, LockEvaluator, MarginBackfill, ProgramFinancialService,
    ProgramLock, RecalculationOutcome,
};
