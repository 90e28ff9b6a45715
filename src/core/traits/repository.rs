use async_trait::async_trait;

use crate::core::Result;
use crate::modules::payments::models::MemberProgramPayment;
use crate::modules::programs::models::{MemberProgram, ProgramFinancialRecord, ProgramItem};

/// Read/write access to program financial rows.
///
/// The schema belongs to the surrounding application; implementations map
/// these calls onto it.
#[async_trait]
pub trait ProgramRepository: Send + Sync {
    /// Program snapshot with its status name joined in
    async fn find_program(&self, program_id: i64) -> Result<Option<MemberProgram>>;

    /// All payment rows of a program
    async fn find_payments(&self, program_id: i64) -> Result<Vec<MemberProgramPayment>>;

    /// Active line items of a program
    async fn find_items(&self, program_id: i64) -> Result<Vec<ProgramItem>>;

    /// Persist terms and derived values together
    async fn update_financials(&self, program_id: i64, record: &ProgramFinancialRecord) -> Result<()>;

    async fn list_program_ids(&self) -> Result<Vec<i64>>;
}
