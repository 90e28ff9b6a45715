use async_trait::async_trait;

use crate::core::Result;

/// Database-side procedures that own schedule generation.
///
/// Their cadence and row layout are opaque here: each call either succeeds
/// or fails with `AppError::Procedure`.
#[async_trait]
pub trait ScheduleProcedures: Send + Sync {
    /// Rebuild the payment rows of a program
    async fn regenerate_payments(&self, program_id: i64) -> Result<()>;

    /// (Re)generate the per-item task and therapy schedule rows of a program
    async fn regenerate_item_schedule(&self, program_id: i64) -> Result<()>;
}
