// Item totals write path and margin backfill
//
// - new line items replace the program totals and the derived values follow
// - the item schedule procedure runs on every accepted item change
// - payments are only rebuilt when a program has none
// - the backfill rewrites stale unlocked programs and never touches locked ones

#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::Arc;

use helpers::{InMemoryProgramRepository, ProcedureCall, RecordingProcedures, TestDataFactory};
use program_finance::config::EngineConfig;
use program_finance::core::AppError;
use program_finance::programs::{
    BackfillReport, MarginBackfill, ProgramFinancialService, ProgramItem,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn item(quantity: i32, charge: Decimal, cost: Decimal, taxable: bool) -> ProgramItem {
    ProgramItem {
        quantity,
        item_charge: charge,
        item_cost: cost,
        is_taxable: taxable,
    }
}

// 1100 charge, 600 taxable, 600 cost
fn expanded_items() -> Vec<ProgramItem> {
    vec![
        item(3, dec!(200), dec!(100), true),
        item(1, dec!(500), dec!(300), false),
    ]
}

fn service(
    repository: &Arc<InMemoryProgramRepository>,
    procedures: &Arc<RecordingProcedures>,
) -> ProgramFinancialService {
    ProgramFinancialService::new(
        repository.clone(),
        procedures.clone(),
        &EngineConfig::default(),
    )
}

#[tokio::test]
async fn test_item_totals_recompute_financials() {
    let repository = Arc::new(InMemoryProgramRepository::new());
    let procedures = Arc::new(RecordingProcedures::new());
    repository.insert_program(TestDataFactory::quote_program(1));
    repository.insert_payments(1, TestDataFactory::unpaid_schedule(1));

    let outcome = service(&repository, &procedures)
        .apply_item_totals(1, &expanded_items())
        .await
        .unwrap();

    assert_eq!(outcome.totals.total_charge, dec!(1100));
    assert_eq!(outcome.totals.total_taxable_charge, dec!(600));
    assert_eq!(outcome.totals.total_cost, dec!(600));
    assert_eq!(outcome.financials.taxes, dec!(49.50));
    assert_eq!(outcome.financials.projected_price, dec!(1149.50));
    assert_eq!(outcome.financials.margin, dec!(45.45));

    // existing schedule with untouched terms stays
    assert!(!outcome.payments_regenerated);
    assert_eq!(procedures.calls(), vec![ProcedureCall::RegenerateItemSchedule(1)]);

    let stored = repository.program(1).unwrap();
    assert_eq!(stored.total_charge, dec!(1100));
    assert_eq!(stored.margin, dec!(45.45));
}

#[tokio::test]
async fn test_item_totals_keep_adjustments() {
    let repository = Arc::new(InMemoryProgramRepository::new());
    let procedures = Arc::new(RecordingProcedures::new());
    let mut program = TestDataFactory::quote_program(1);
    program.discounts = dec!(-100);
    program.finance_charges = dec!(20);
    repository.insert_program(program);
    repository.insert_payments(1, TestDataFactory::unpaid_schedule(1));

    let outcome = service(&repository, &procedures)
        .apply_item_totals(1, &expanded_items())
        .await
        .unwrap();

    // 100 * 600/1100 of the discount lands on the taxable share
    let expected_taxes = ((dec!(600) - dec!(100) * (dec!(600) / dec!(1100))) * dec!(0.0825)).round_dp(2);
    assert_eq!(outcome.financials.taxes, expected_taxes);
    assert_eq!(
        outcome.financials.projected_price,
        dec!(1100) + expected_taxes + dec!(20) - dec!(100)
    );

    let stored = repository.program(1).unwrap();
    assert_eq!(stored.discounts, dec!(-100));
    assert_eq!(stored.finance_charges, dec!(20));
}

#[tokio::test]
async fn test_item_totals_without_schedule_generate_payments() {
    let repository = Arc::new(InMemoryProgramRepository::new());
    let procedures = Arc::new(RecordingProcedures::new());
    repository.insert_program(TestDataFactory::quote_program(1));

    let outcome = service(&repository, &procedures)
        .apply_item_totals(1, &expanded_items())
        .await
        .unwrap();

    assert!(outcome.payments_regenerated);
    assert_eq!(
        procedures.calls(),
        vec![
            ProcedureCall::RegenerateItemSchedule(1),
            ProcedureCall::RegeneratePayments(1),
        ]
    );
}

#[tokio::test]
async fn test_failed_payment_generation_restores_totals() {
    let repository = Arc::new(InMemoryProgramRepository::new());
    let procedures = Arc::new(RecordingProcedures::failing_payments());
    repository.insert_program(TestDataFactory::quote_program(1));

    let err = service(&repository, &procedures)
        .apply_item_totals(1, &expanded_items())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Procedure { .. }));
    assert_eq!(repository.program(1).unwrap(), TestDataFactory::quote_program(1));

    procedures.set_failing_payments(false);
    let outcome = service(&repository, &procedures)
        .apply_item_totals(1, &expanded_items())
        .await
        .unwrap();

    assert!(outcome.payments_regenerated);
    assert_eq!(repository.program(1).unwrap().total_charge, dec!(1100));
}

#[tokio::test]
async fn test_refresh_reads_stored_items() {
    let repository = Arc::new(InMemoryProgramRepository::new());
    let procedures = Arc::new(RecordingProcedures::new());
    repository.insert_program(TestDataFactory::quote_program(1));
    repository.insert_payments(1, TestDataFactory::unpaid_schedule(1));
    repository.insert_items(1, expanded_items());

    let outcome = service(&repository, &procedures)
        .refresh_item_totals(1)
        .await
        .unwrap();

    assert_eq!(outcome.totals.total_charge, dec!(1100));
    assert_eq!(repository.updates().len(), 1);
}

#[tokio::test]
async fn test_invalid_item_is_rejected_before_loading() {
    let repository = Arc::new(InMemoryProgramRepository::new());
    let procedures = Arc::new(RecordingProcedures::new());
    repository.insert_program(TestDataFactory::quote_program(1));

    let err = service(&repository, &procedures)
        .apply_item_totals(1, &[item(-2, dec!(50), dec!(10), true)])
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert!(repository.updates().is_empty());
    assert!(procedures.calls().is_empty());
}

#[tokio::test]
async fn test_locked_program_items_are_refused() {
    let repository = Arc::new(InMemoryProgramRepository::new());
    let procedures = Arc::new(RecordingProcedures::new());
    repository.insert_program(TestDataFactory::program_with_status(1, 4, "Completed"));

    let err = service(&repository, &procedures)
        .apply_item_totals(1, &expanded_items())
        .await
        .unwrap_err();

    assert!(err.is_locked());
    assert!(repository.updates().is_empty());
    assert!(procedures.calls().is_empty());
    assert_eq!(repository.program(1).unwrap().total_charge, dec!(1000));
}

fn backfill_fixture() -> Arc<InMemoryProgramRepository> {
    let repository = Arc::new(InMemoryProgramRepository::new());

    // up to date
    repository.insert_program(TestDataFactory::quote_program(1));

    // stale, editable
    let mut stale = TestDataFactory::quote_program(2);
    stale.margin = dec!(12.5);
    repository.insert_program(stale);

    // stale, locked by status
    let mut active = TestDataFactory::program_with_status(3, 2, "Active");
    active.margin = dec!(12.5);
    repository.insert_program(active);

    // stale, locked by a paid payment
    let mut paid = TestDataFactory::quote_program(4);
    paid.taxes = dec!(0);
    repository.insert_program(paid);
    repository.insert_payments(4, vec![TestDataFactory::payment(4, 1, true)]);

    repository
}

#[tokio::test]
async fn test_backfill_dry_run_writes_nothing() {
    let repository = backfill_fixture();
    let backfill = MarginBackfill::new(repository.clone(), &EngineConfig::default());

    let report = backfill.run(false).await.unwrap();

    assert_eq!(
        report,
        BackfillReport {
            scanned: 4,
            unchanged: 1,
            corrected: 0,
            pending: 1,
            locked_skipped: 2,
            missing: 0,
            inconsistent: 0,
        }
    );
    assert!(repository.updates().is_empty());
}

#[tokio::test]
async fn test_backfill_apply_corrects_unlocked_only() {
    let repository = backfill_fixture();
    let backfill = MarginBackfill::new(repository.clone(), &EngineConfig::default());

    let report = backfill.run(true).await.unwrap();

    assert_eq!(report.corrected, 1);
    assert_eq!(report.locked_skipped, 2);

    let updates = repository.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].0, 2);
    assert_eq!(repository.program(2).unwrap().margin, dec!(40));
    assert_eq!(repository.program(3).unwrap().margin, dec!(12.5));
    assert_eq!(repository.program(4).unwrap().taxes, dec!(0));

    // a second pass finds nothing left to do
    let again = backfill.run(true).await.unwrap();
    assert_eq!(again.corrected, 0);
    assert_eq!(again.unchanged, 2);
}

#[tokio::test]
async fn test_backfill_counts_inconsistent_totals() {
    let repository = Arc::new(InMemoryProgramRepository::new());
    let mut program = TestDataFactory::quote_program(1);
    program.total_taxable_charge = dec!(1200);
    repository.insert_program(program);

    let report = MarginBackfill::new(repository.clone(), &EngineConfig::default())
        .run(false)
        .await
        .unwrap();

    assert_eq!(report.inconsistent, 1);
    // stored taxes were derived from a 600 taxable charge
    assert_eq!(report.pending, 1);
}
