use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One scheduled payment of a member program
///
/// Rows are created by the external schedule procedure and updated when a
/// payment is recorded. A row whose `payment_date` is set is history and is
/// never regenerated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct MemberProgramPayment {
    pub member_program_payment_id: i64,
    pub member_program_id: i64,
    pub payment_amount: Decimal,
    pub payment_due_date: Option<NaiveDate>,
    /// Null until the payment is received
    pub payment_date: Option<NaiveDate>,
    pub payment_status_id: Option<i64>,
    pub payment_method_id: Option<i64>,
}

impl MemberProgramPayment {
    /// Paid means a payment date is recorded, whatever the status column says
    pub fn is_paid(&self) -> bool {
        self.payment_date.is_some()
    }
}
