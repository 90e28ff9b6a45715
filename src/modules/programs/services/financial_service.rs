// ProgramFinancialService
//
// The write path around the pure engine:
// - refuse any change to a locked program
// - derive taxes, projected price and margin from the new terms
// - persist terms and derived values together
// - ask the regeneration policy whether the payment schedule is stale and,
//   if so, hand the rebuild to the database procedure
//
// Decision and regeneration for one program run under a per-program mutex so
// two concurrent edits never both decide from the same "before" snapshot.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::config::EngineConfig;
use crate::core::{AppError, ProgramRepository, Result, ScheduleProcedures};
use crate::modules::payments::models::MemberProgramPayment;
use crate::modules::payments::services::{
    evaluate_regeneration, PaymentTermsChange, RegenerationDecision,
};
use crate::modules::pricing::models::ProgramFinancials;
use crate::modules::programs::models::{
    FinancialUpdate, MemberProgram, ProgramFinancialRecord, ProgramItem, ProgramTotals,
};
use crate::modules::programs::services::lock_evaluator::{LockEvaluator, ProgramLock};
use crate::modules::taxes::TaxRate;

/// Result of an accepted financial write
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecalculationOutcome {
    pub program_id: i64,
    pub totals: ProgramTotals,
    pub financials: ProgramFinancials,
    pub regeneration: RegenerationDecision,
    pub payments_regenerated: bool,
}

pub struct ProgramFinancialService {
    programs: Arc<dyn ProgramRepository>,
    procedures: Arc<dyn ScheduleProcedures>,
    lock_evaluator: LockEvaluator,
    tax_rate: TaxRate,
    program_guards: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl ProgramFinancialService {
    pub fn new(
        programs: Arc<dyn ProgramRepository>,
        procedures: Arc<dyn ScheduleProcedures>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            programs,
            procedures,
            lock_evaluator: LockEvaluator::new(config),
            tax_rate: config.default_tax_rate,
            program_guards: Mutex::new(HashMap::new()),
        }
    }

    /// Current lock state of a stored program
    pub async fn lock_status(&self, program_id: i64) -> Result<ProgramLock> {
        let (program, payments) = self.load(program_id).await?;
        self.lock_evaluator.try_evaluate(&program, &payments)
    }

    /// Apply an edit to financing type, finance charges and discounts
    pub async fn apply_financial_update(
        &self,
        program_id: i64,
        update: FinancialUpdate,
    ) -> Result<RecalculationOutcome> {
        update.validate()?;

        let guard = self.program_guard(program_id).await;
        let result = {
            let _serialized = guard.lock().await;
            self.financial_update_serialized(program_id, &update).await
        };
        self.release_guard(program_id, guard).await;

        result
    }

    /// Replace the line-item totals of a program with sums over `items`
    pub async fn apply_item_totals(
        &self,
        program_id: i64,
        items: &[ProgramItem],
    ) -> Result<RecalculationOutcome> {
        let totals = ProgramTotals::from_items(items)?;

        let guard = self.program_guard(program_id).await;
        let result = {
            let _serialized = guard.lock().await;
            self.item_totals_serialized(program_id, totals).await
        };
        self.release_guard(program_id, guard).await;

        result
    }

    /// Re-read the stored items of a program and apply their totals
    pub async fn refresh_item_totals(&self, program_id: i64) -> Result<RecalculationOutcome> {
        let guard = self.program_guard(program_id).await;
        let result = {
            let _serialized = guard.lock().await;
            self.refresh_serialized(program_id).await
        };
        self.release_guard(program_id, guard).await;

        result
    }

    async fn financial_update_serialized(
        &self,
        program_id: i64,
        update: &FinancialUpdate,
    ) -> Result<RecalculationOutcome> {
        let (program, payments) = self.load_unlocked(program_id).await?;

        let totals = program.totals();
        if !totals.is_consistent() {
            warn!(
                program_id,
                total_charge = %totals.total_charge,
                total_taxable_charge = %totals.total_taxable_charge,
                "Stored taxable charge exceeds total charge"
            );
        }
        let adjustments = update.adjustments();
        let financials = ProgramFinancials::derive(&totals, &adjustments, self.tax_rate);

        self.programs
            .update_financials(
                program_id,
                &ProgramFinancialRecord {
                    totals,
                    adjustments,
                    financing_type_id: update.financing_type_id,
                    financials,
                },
            )
            .await?;

        info!(
            program_id,
            taxes = %financials.taxes,
            projected_price = %financials.projected_price,
            margin = %financials.margin,
            "Program financial terms updated"
        );

        let change = PaymentTermsChange::between(&program, update, !payments.is_empty());
        let regeneration = evaluate_regeneration(&change);
        let payments_regenerated = match self.regenerate_if_stale(program_id, &regeneration).await {
            Ok(regenerated) => regenerated,
            Err(err) => return Err(self.restore(&program, err).await),
        };

        Ok(RecalculationOutcome {
            program_id,
            totals,
            financials,
            regeneration,
            payments_regenerated,
        })
    }

    async fn refresh_serialized(&self, program_id: i64) -> Result<RecalculationOutcome> {
        let items = self.programs.find_items(program_id).await?;
        let totals = ProgramTotals::from_items(&items)?;
        self.item_totals_serialized(program_id, totals).await
    }

    async fn item_totals_serialized(
        &self,
        program_id: i64,
        totals: ProgramTotals,
    ) -> Result<RecalculationOutcome> {
        let (program, payments) = self.load_unlocked(program_id).await?;

        let adjustments = program.adjustments();
        let financials = ProgramFinancials::derive(&totals, &adjustments, self.tax_rate);

        self.programs
            .update_financials(
                program_id,
                &ProgramFinancialRecord {
                    totals,
                    adjustments,
                    financing_type_id: program.financing_type_id,
                    financials,
                },
            )
            .await?;

        info!(
            program_id,
            total_charge = %totals.total_charge,
            total_taxable_charge = %totals.total_taxable_charge,
            margin = %financials.margin,
            "Program item totals updated"
        );

        // Terms are untouched here, so only a missing schedule can fire
        let regeneration =
            evaluate_regeneration(&PaymentTermsChange::unchanged(&program, !payments.is_empty()));
        let payments_regenerated = match self.regenerate_schedules(program_id, &regeneration).await {
            Ok(regenerated) => regenerated,
            Err(err) => return Err(self.restore(&program, err).await),
        };

        Ok(RecalculationOutcome {
            program_id,
            totals,
            financials,
            regeneration,
            payments_regenerated,
        })
    }

    async fn regenerate_schedules(
        &self,
        program_id: i64,
        regeneration: &RegenerationDecision,
    ) -> Result<bool> {
        self.procedures.regenerate_item_schedule(program_id).await?;
        self.regenerate_if_stale(program_id, regeneration).await
    }

    /// Puts the pre-edit record back after a failed procedure call so the
    /// next attempt still sees the terms as changed. Returns `cause`.
    async fn restore(&self, program: &MemberProgram, cause: AppError) -> AppError {
        let program_id = program.member_program_id;

        match self
            .programs
            .update_financials(program_id, &program.stored_record())
            .await
        {
            Ok(()) => warn!(
                program_id,
                error = %cause,
                "Schedule procedure failed, financial terms restored"
            ),
            Err(restore_err) => error!(
                program_id,
                error = %cause,
                restore_error = %restore_err,
                "Schedule procedure failed and financial terms could not be restored"
            ),
        }

        cause
    }

    async fn regenerate_if_stale(
        &self,
        program_id: i64,
        regeneration: &RegenerationDecision,
    ) -> Result<bool> {
        if !regeneration.should_regenerate() {
            return Ok(false);
        }

        info!(
            program_id,
            triggers = ?regeneration.triggers,
            "Payment schedule is stale, regenerating"
        );
        self.procedures.regenerate_payments(program_id).await?;

        Ok(true)
    }

    async fn load(&self, program_id: i64) -> Result<(MemberProgram, Vec<MemberProgramPayment>)> {
        let program = self
            .programs
            .find_program(program_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Program {} not found", program_id)))?;
        let payments = self.programs.find_payments(program_id).await?;

        Ok((program, payments))
    }

    async fn load_unlocked(
        &self,
        program_id: i64,
    ) -> Result<(MemberProgram, Vec<MemberProgramPayment>)> {
        let (program, payments) = self.load(program_id).await?;

        let lock = self.lock_evaluator.try_evaluate(&program, &payments)?;
        if lock.locked {
            warn!(
                program_id,
                by_status = lock.is_locked_by_status,
                has_paid_payment = lock.has_paid_payment,
                "Rejected financial change to locked program"
            );
        }
        lock.ensure_unlocked(program_id)?;

        Ok((program, payments))
    }

    async fn program_guard(&self, program_id: i64) -> Arc<Mutex<()>> {
        let mut guards = self.program_guards.lock().await;
        guards
            .entry(program_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn release_guard(&self, program_id: i64, guard: Arc<Mutex<()>>) {
        let mut guards = self.program_guards.lock().await;
        // the map and this handle are the only owners left
        if Arc::strong_count(&guard) == 2 {
            guards.remove(&program_id);
        }
    }
}
