// MySQL ProgramRepository
//
// Reads program snapshots (status name joined in), their payments and items,
// and writes terms plus derived values back in a single UPDATE.

use async_trait::async_trait;
use sqlx::MySqlPool;
use tracing::debug;

use crate::core::{AppError, ProgramRepository, Result};
use crate::modules::payments::models::MemberProgramPayment;
use crate::modules::programs::models::{MemberProgram, ProgramFinancialRecord, ProgramItem};

/// Repository for program financial database operations
pub struct MySqlProgramRepository {
    pool: MySqlPool,
}

impl MySqlProgramRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProgramRepository for MySqlProgramRepository {
    async fn find_program(&self, program_id: i64) -> Result<Option<MemberProgram>> {
        let program = sqlx::query_as::<_, MemberProgram>(
            r#"
            SELECT
                mp.member_program_id,
                COALESCE(mp.total_charge, 0) AS total_charge,
                COALESCE(mp.total_taxable_charge, 0) AS total_taxable_charge,
                COALESCE(mp.total_cost, 0) AS total_cost,
                COALESCE(mp.discounts, 0) AS discounts,
                COALESCE(mp.finance_charges, 0) AS finance_charges,
                COALESCE(mp.taxes, 0) AS taxes,
                COALESCE(mp.final_total_price, 0) AS final_total_price,
                COALESCE(mp.margin, 0) AS margin,
                mp.financing_type_id,
                mp.program_status_id,
                ps.status_name
            FROM member_programs mp
            LEFT JOIN program_status ps ON ps.program_status_id = mp.program_status_id
            WHERE mp.member_program_id = ?
            "#,
        )
        .bind(program_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch program: {}", e)))?;

        Ok(program)
    }

    async fn find_payments(&self, program_id: i64) -> Result<Vec<MemberProgramPayment>> {
        let payments = sqlx::query_as::<_, MemberProgramPayment>(
            r#"
            SELECT
                member_program_payment_id, member_program_id, payment_amount,
                payment_due_date, payment_date, payment_status_id, payment_method_id
            FROM member_program_payments
            WHERE member_program_id = ?
            ORDER BY payment_due_date ASC
            "#,
        )
        .bind(program_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch payments: {}", e)))?;

        Ok(payments)
    }

    async fn find_items(&self, program_id: i64) -> Result<Vec<ProgramItem>> {
        let items = sqlx::query_as::<_, ProgramItem>(
            r#"
            SELECT quantity, item_charge, item_cost, is_taxable
            FROM member_program_items
            WHERE member_program_id = ? AND active_flag = TRUE
            "#,
        )
        .bind(program_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to fetch program items: {}", e)))?;

        Ok(items)
    }

    async fn update_financials(&self, program_id: i64, record: &ProgramFinancialRecord) -> Result<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE member_programs
            SET
                total_charge = ?,
                total_taxable_charge = ?,
                total_cost = ?,
                discounts = ?,
                finance_charges = ?,
                financing_type_id = ?,
                taxes = ?,
                final_total_price = ?,
                margin = ?
            WHERE member_program_id = ?
            "#,
        )
        .bind(record.totals.total_charge)
        .bind(record.totals.total_taxable_charge)
        .bind(record.totals.total_cost)
        .bind(record.adjustments.discounts)
        .bind(record.adjustments.finance_charges)
        .bind(record.financing_type_id)
        .bind(record.financials.taxes)
        .bind(record.financials.projected_price)
        .bind(record.financials.margin)
        .bind(program_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to update program financials: {}", e)))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::not_found(format!("Program {} not found", program_id)));
        }

        debug!(program_id, "Program financials persisted");

        Ok(())
    }

    async fn list_program_ids(&self) -> Result<Vec<i64>> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT member_program_id FROM member_programs ORDER BY member_program_id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to list programs: {}", e)))?;

        Ok(ids)
    }
}
