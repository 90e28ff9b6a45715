use async_trait::async_trait;
use sqlx::MySqlPool;
use tracing::{error, info};

use crate::config::ProcedureConfig;
use crate::core::{AppError, Result, ScheduleProcedures};

/// Calls the configured stored procedures with the program id
pub struct MySqlScheduleProcedures {
    pool: MySqlPool,
    procedures: ProcedureConfig,
}

impl MySqlScheduleProcedures {
    /// Names must already have passed `ProcedureConfig::validate`
    pub fn new(pool: MySqlPool, procedures: ProcedureConfig) -> Self {
        Self { pool, procedures }
    }

    async fn call(&self, name: &str, program_id: i64) -> Result<()> {
        let statement = format!("CALL {}(?)", name);

        sqlx::query(&statement)
            .bind(program_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(procedure = name, program_id, error = %e, "Schedule procedure failed");
                AppError::procedure(name, e.to_string())
            })?;

        info!(procedure = name, program_id, "Schedule procedure completed");

        Ok(())
    }
}

#[async_trait]
impl ScheduleProcedures for MySqlScheduleProcedures {
    async fn regenerate_payments(&self, program_id: i64) -> Result<()> {
        self.call(&self.procedures.payment_regeneration, program_id).await
    }

    async fn regenerate_item_schedule(&self, program_id: i64) -> Result<()> {
        self.call(&self.procedures.item_schedule, program_id).await
    }
}
