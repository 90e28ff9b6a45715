// Program lock evaluator
//
// Two independent triggers, OR'd:
// - status: anything other than an editable status (Quote by default) locks
// - payment history: any payment with a payment date locks, and stays locked
//   whatever the status later becomes
//
// This only classifies. Every writer of program financial data has to ask it
// first and refuse the write when it reports locked.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{EngineConfig, MissingStatusPolicy};
use crate::core::{AppError, Result};
use crate::modules::payments::models::MemberProgramPayment;
use crate::modules::programs::models::{MemberProgram, ProgramStatus, StatusResolution};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramLock {
    pub locked: bool,
    pub is_locked_by_status: bool,
    pub has_paid_payment: bool,
}

impl ProgramLock {
    fn new(is_locked_by_status: bool, has_paid_payment: bool) -> Self {
        Self {
            locked: is_locked_by_status || has_paid_payment,
            is_locked_by_status,
            has_paid_payment,
        }
    }

    /// Converts a lock into the write-path rejection
    pub fn ensure_unlocked(&self, program_id: i64) -> Result<()> {
        if self.locked {
            return Err(AppError::ProgramLocked {
                program_id,
                by_status: self.is_locked_by_status,
                has_paid_payment: self.has_paid_payment,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct LockEvaluator {
    editable_statuses: Vec<ProgramStatus>,
    missing_status_policy: MissingStatusPolicy,
}

impl Default for LockEvaluator {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl LockEvaluator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            editable_statuses: config.editable_statuses.clone(),
            missing_status_policy: config.missing_status_policy,
        }
    }

    /// Total classifier. A missing status name falls back to "locked when a
    /// status id is present at all", whatever the configured policy.
    pub fn evaluate(
        &self,
        program: &MemberProgram,
        payments: &[MemberProgramPayment],
    ) -> ProgramLock {
        let by_status = match program.status() {
            StatusResolution::Known(status) => !self.editable_statuses.contains(&status),
            StatusResolution::Unrecognized(_) => true,
            StatusResolution::Missing { has_status_id } => has_status_id,
        };

        let lock = ProgramLock::new(by_status, has_paid_payment(payments));

        debug!(
            program_id = program.member_program_id,
            locked = lock.locked,
            by_status = lock.is_locked_by_status,
            has_paid_payment = lock.has_paid_payment,
            "Evaluated program lock"
        );

        lock
    }

    /// Like `evaluate`, but honors `MissingStatusPolicy::Reject` by failing
    /// when no status name could be resolved.
    pub fn try_evaluate(
        &self,
        program: &MemberProgram,
        payments: &[MemberProgramPayment],
    ) -> Result<ProgramLock> {
        if self.missing_status_policy == MissingStatusPolicy::Reject
            && matches!(program.status(), StatusResolution::Missing { .. })
        {
            return Err(AppError::data_integrity(format!(
                "Program {} has no resolvable status name (status id: {:?})",
                program.member_program_id, program.program_status_id
            )));
        }

        Ok(self.evaluate(program, payments))
    }
}

/// Any payment with a recorded payment date, regardless of its status
pub fn has_paid_payment(payments: &[MemberProgramPayment]) -> bool {
    payments.iter().any(MemberProgramPayment::is_paid)
}

/// Lock classification with the default configuration (Quote editable,
/// conservative fallback)
pub fn is_program_locked(program: &MemberProgram, payments: &[MemberProgramPayment]) -> ProgramLock {
    LockEvaluator::default().evaluate(program, payments)
}
