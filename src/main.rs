use std::sync::Arc;

use anyhow::Context;
use program_finance::config::Config;
use program_finance::core::telemetry::init_tracing;
use program_finance::programs::{MarginBackfill, MySqlProgramRepository};

/// Recomputes stored taxes, projected price and margin for every program.
/// Dry run unless BACKFILL_APPLY=true.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    init_tracing(&config.app);

    tracing::info!(
        env = config.app.env.as_str(),
        apply = config.app.backfill_apply,
        tax_rate = %config.engine.default_tax_rate.value(),
        "Starting program margin backfill"
    );

    let db_pool = config
        .database
        .create_pool()
        .await
        .context("Failed to create database pool")?;

    let repository = Arc::new(MySqlProgramRepository::new(db_pool.clone()));
    let backfill = MarginBackfill::new(repository, &config.engine);

    let report = backfill
        .run(config.app.backfill_apply)
        .await
        .context("Margin backfill failed")?;

    tracing::info!(
        scanned = report.scanned,
        unchanged = report.unchanged,
        corrected = report.corrected,
        pending = report.pending,
        locked_skipped = report.locked_skipped,
        missing = report.missing,
        inconsistent = report.inconsistent,
        "Backfill report"
    );

    db_pool.close().await;

    Ok(())
}
