/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Main application error type
///
/// The calculators, the regeneration policy and the lock evaluator are total
/// functions and never produce one of these. Errors only come from the write
/// path around them: configuration, persistence, the external procedures.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Validation errors for business rules
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database operation errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Financial data of a locked program may not change
    #[error(
        "Program {program_id} is locked (by status: {by_status}, has paid payment: {has_paid_payment})"
    )]
    ProgramLocked {
        program_id: i64,
        by_status: bool,
        has_paid_payment: bool,
    },

    /// Stored data that cannot be classified safely
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    /// A database-side schedule procedure reported failure
    #[error("Procedure {name} failed: {message}")]
    Procedure { name: String, message: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

// Helper functions for common error scenarios
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound(resource.into())
    }

    pub fn data_integrity(msg: impl Into<String>) -> Self {
        AppError::DataIntegrity(msg.into())
    }

    pub fn procedure(name: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Procedure {
            name: name.into(),
            message: message.into(),
        }
    }

    /// True when the error is the lock rejection rather than an infrastructure failure
    pub fn is_locked(&self) -> bool {
        matches!(self, AppError::ProgramLocked { .. })
    }
}
