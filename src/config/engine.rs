use serde::Deserialize;
use std::env;

use crate::core::{AppError, Result};
use crate::modules::programs::models::ProgramStatus;
use crate::modules::taxes::TaxRate;

/// What the lock evaluator does when a program has no resolvable status name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingStatusPolicy {
    /// Locked when a status id is present at all
    #[default]
    Lock,
    /// Surface as a data integrity error
    Reject,
}

impl std::str::FromStr for MissingStatusPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lock" => Ok(Self::Lock),
            "reject" => Ok(Self::Reject),
            _ => Err(format!("Invalid missing status policy: {}", s)),
        }
    }
}

/// Deployment parameters of the financial engine
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EngineConfig {
    pub default_tax_rate: TaxRate,
    /// Statuses in which financial data may still change
    pub editable_statuses: Vec<ProgramStatus>,
    pub missing_status_policy: MissingStatusPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_tax_rate: TaxRate::DEFAULT,
            editable_statuses: vec![ProgramStatus::Quote],
            missing_status_policy: MissingStatusPolicy::Lock,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let default_tax_rate = match env::var("PROGRAM_TAX_RATE") {
            Ok(raw) => raw
                .parse::<TaxRate>()
                .map_err(|e| AppError::Configuration(format!("Invalid PROGRAM_TAX_RATE: {}", e)))?,
            Err(_) => defaults.default_tax_rate,
        };

        let editable_statuses = match env::var("PROGRAM_EDITABLE_STATUSES") {
            Ok(raw) => parse_statuses(&raw)?,
            Err(_) => defaults.editable_statuses,
        };

        let missing_status_policy = match env::var("PROGRAM_MISSING_STATUS_POLICY") {
            Ok(raw) => raw.parse().map_err(|e: String| {
                AppError::Configuration(format!("Invalid PROGRAM_MISSING_STATUS_POLICY: {}", e))
            })?,
            Err(_) => defaults.missing_status_policy,
        };

        Ok(Self {
            default_tax_rate,
            editable_statuses,
            missing_status_policy,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.editable_statuses.is_empty() {
            return Err(AppError::Configuration(
                "At least one editable program status is required".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_statuses(raw: &str) -> Result<Vec<ProgramStatus>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<ProgramStatus>().map_err(|e| {
                AppError::Configuration(format!("Invalid PROGRAM_EDITABLE_STATUSES: {}", e))
            })
        })
        .collect()
}

/// Names of the database-side schedule procedures
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProcedureConfig {
    pub payment_regeneration: String,
    pub item_schedule: String,
}

impl Default for ProcedureConfig {
    fn default() -> Self {
        Self {
            payment_regeneration: "regenerate_member_program_payments".to_string(),
            item_schedule: "generate_member_program_schedule".to_string(),
        }
    }
}

impl ProcedureConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            payment_regeneration: env::var("PAYMENT_REGENERATION_PROCEDURE")
                .unwrap_or(defaults.payment_regeneration),
            item_schedule: env::var("ITEM_SCHEDULE_PROCEDURE").unwrap_or(defaults.item_schedule),
        })
    }

    /// Procedure names are spliced into CALL statements, so only identifiers pass
    pub fn validate(&self) -> Result<()> {
        for name in [&self.payment_regeneration, &self.item_schedule] {
            let valid = !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
            if !valid {
                return Err(AppError::Configuration(format!(
                    "Invalid procedure name: {:?}",
                    name
                )));
            }
        }

        Ok(())
    }
}
