use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::core::money::same_cents;
use crate::core::{ProgramRepository, Result};
use crate::modules::pricing::models::ProgramFinancials;
use crate::modules::programs::models::{MemberProgram, ProgramFinancialRecord};
use crate::modules::programs::services::lock_evaluator::LockEvaluator;
use crate::modules::taxes::TaxRate;

/// Counters of one backfill pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BackfillReport {
    pub scanned: usize,
    pub unchanged: usize,
    /// Stale and rewritten
    pub corrected: usize,
    /// Stale but left alone because the pass was a dry run
    pub pending: usize,
    /// Stale or not, never touched
    pub locked_skipped: usize,
    /// Listed but gone by the time it was read
    pub missing: usize,
    /// Stored taxable charge above the total charge; still processed
    pub inconsistent: usize,
}

/// Recomputes stored taxes, projected price and margin of every program.
///
/// Locked programs are reported and left alone. Unlocked programs whose
/// stored derived values disagree with a fresh derivation are rewritten
/// when `apply` is set.
pub struct MarginBackfill {
    programs: Arc<dyn ProgramRepository>,
    lock_evaluator: LockEvaluator,
    tax_rate: TaxRate,
}

impl MarginBackfill {
    pub fn new(programs: Arc<dyn ProgramRepository>, config: &EngineConfig) -> Self {
        Self {
            programs,
            lock_evaluator: LockEvaluator::new(config),
            tax_rate: config.default_tax_rate,
        }
    }

    pub async fn run(&self, apply: bool) -> Result<BackfillReport> {
        let mut report = BackfillReport::default();

        for program_id in self.programs.list_program_ids().await? {
            report.scanned += 1;

            let Some(program) = self.programs.find_program(program_id).await? else {
                report.missing += 1;
                continue;
            };
            let payments = self.programs.find_payments(program_id).await?;

            let totals = program.totals();
            if !totals.is_consistent() {
                warn!(
                    program_id,
                    total_charge = %totals.total_charge,
                    total_taxable_charge = %totals.total_taxable_charge,
                    "Stored taxable charge exceeds total charge"
                );
                report.inconsistent += 1;
            }

            let recomputed =
                ProgramFinancials::derive(&totals, &program.adjustments(), self.tax_rate);
            let stale = !matches_stored(&program, &recomputed);

            if self.lock_evaluator.evaluate(&program, &payments).locked {
                if stale {
                    warn!(
                        program_id,
                        stored_margin = %program.margin,
                        recomputed_margin = %recomputed.margin,
                        "Locked program has stale derived values; skipped"
                    );
                }
                report.locked_skipped += 1;
                continue;
            }

            if !stale {
                debug!(program_id, "Derived values up to date");
                report.unchanged += 1;
                continue;
            }

            if !apply {
                info!(
                    program_id,
                    stored_margin = %program.margin,
                    recomputed_margin = %recomputed.margin,
                    "Stale derived values (dry run)"
                );
                report.pending += 1;
                continue;
            }

            self.programs
                .update_financials(
                    program_id,
                    &ProgramFinancialRecord {
                        totals,
                        adjustments: program.adjustments(),
                        financing_type_id: program.financing_type_id,
                        financials: recomputed,
                    },
                )
                .await?;

            info!(
                program_id,
                stored_margin = %program.margin,
                recomputed_margin = %recomputed.margin,
                "Derived values corrected"
            );
            report.corrected += 1;
        }

        info!(
            scanned = report.scanned,
            corrected = report.corrected,
            pending = report.pending,
            locked_skipped = report.locked_skipped,
            inconsistent = report.inconsistent,
            "Margin backfill finished"
        );

        Ok(report)
    }
}

fn matches_stored(program: &MemberProgram, recomputed: &ProgramFinancials) -> bool {
    let stored = program.stored_financials();
    same_cents(stored.taxes, recomputed.taxes)
        && same_cents(stored.projected_price, recomputed.projected_price)
        && stored.margin_matches(recomputed)
}
