// Payment regeneration policy
//
// Rebuilding a payment schedule is destructive, so it runs only when the
// terms that shape the schedule changed: financing type, finance charges or
// discounts. Money is compared in integer cents so sub-cent float noise from
// the request layer never triggers a rebuild. A program without payments
// always needs them generated.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::money::same_cents;
use crate::modules::programs::models::{FinancialUpdate, MemberProgram};

/// Before/after view of the terms that shape a payment schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentTermsChange {
    pub payments_exist: bool,
    pub original_financing_type_id: Option<i64>,
    pub next_financing_type_id: Option<i64>,
    pub original_finance_charges: Decimal,
    pub next_finance_charges: Decimal,
    pub original_discounts: Decimal,
    pub next_discounts: Decimal,
}

impl PaymentTermsChange {
    pub fn between(original: &MemberProgram, next: &FinancialUpdate, payments_exist: bool) -> Self {
        Self {
            payments_exist,
            original_financing_type_id: original.financing_type_id,
            next_financing_type_id: next.financing_type_id,
            original_finance_charges: original.finance_charges,
            next_finance_charges: next.finance_charges,
            original_discounts: original.discounts,
            next_discounts: next.discounts,
        }
    }

    /// Same terms on both sides; only the absence of payments can fire
    pub fn unchanged(program: &MemberProgram, payments_exist: bool) -> Self {
        Self {
            payments_exist,
            original_financing_type_id: program.financing_type_id,
            next_financing_type_id: program.financing_type_id,
            original_finance_charges: program.finance_charges,
            next_finance_charges: program.finance_charges,
            original_discounts: program.discounts,
            next_discounts: program.discounts,
        }
    }
}

/// Why a schedule is considered stale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegenerationTrigger {
    NoPayments,
    FinancingTypeChanged,
    FinanceChargesChanged,
    DiscountsChanged,
}

impl RegenerationTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoPayments => "no_payments",
            Self::FinancingTypeChanged => "financing_type_changed",
            Self::FinanceChargesChanged => "finance_charges_changed",
            Self::DiscountsChanged => "discounts_changed",
        }
    }
}

impl std::fmt::Display for RegenerationTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegenerationDecision {
    pub triggers: Vec<RegenerationTrigger>,
}

impl RegenerationDecision {
    pub fn should_regenerate(&self) -> bool {
        !self.triggers.is_empty()
    }

    pub fn is_triggered_by(&self, trigger: RegenerationTrigger) -> bool {
        self.triggers.contains(&trigger)
    }
}

/// Collects every trigger that applies
pub fn evaluate_regeneration(change: &PaymentTermsChange) -> RegenerationDecision {
    let mut triggers = Vec::new();

    if !change.payments_exist {
        triggers.push(RegenerationTrigger::NoPayments);
    }

    if change.original_financing_type_id != change.next_financing_type_id {
        triggers.push(RegenerationTrigger::FinancingTypeChanged);
    }

    if !same_cents(change.original_finance_charges, change.next_finance_charges) {
        triggers.push(RegenerationTrigger::FinanceChargesChanged);
    }

    if !same_cents(change.original_discounts, change.next_discounts) {
        triggers.push(RegenerationTrigger::DiscountsChanged);
    }

    RegenerationDecision { triggers }
}

/// True when previously generated payments are stale and must be rebuilt
pub fn should_regenerate_payments(change: &PaymentTermsChange) -> bool {
    evaluate_regeneration(change).should_regenerate()
}
