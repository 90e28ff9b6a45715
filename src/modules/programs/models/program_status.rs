use serde::{Deserialize, Serialize};

/// Lifecycle status of a member program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgramStatus {
    /// Proposal stage, terms still negotiable
    Quote,
    /// Signed and running
    Active,
    /// Temporarily on hold
    Paused,
    /// All deliverables fulfilled
    Completed,
    /// Terminated before completion
    Cancelled,
    /// Quote never accepted
    Lost,
}

impl ProgramStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quote => "quote",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Lost => "lost",
        }
    }
}

impl std::fmt::Display for ProgramStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProgramStatus {
    type Err = String;

    /// Case-insensitive exact match, no trimming
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quote" => Ok(Self::Quote),
            "active" => Ok(Self::Active),
            "paused" => Ok(Self::Paused),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "lost" => Ok(Self::Lost),
            _ => Err(format!("Invalid program status: {}", s)),
        }
    }
}

/// What the stored status reference of a program resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusResolution {
    /// Status name present and recognized
    Known(ProgramStatus),
    /// Status name present but not one of the known statuses
    Unrecognized(String),
    /// No status name could be joined; carries whether a status id is set
    Missing { has_status_id: bool },
}

impl StatusResolution {
    pub fn resolve(status_name: Option<&str>, program_status_id: Option<i64>) -> Self {
        match status_name.filter(|name| !name.is_empty()) {
            Some(name) => match name.parse::<ProgramStatus>() {
                Ok(status) => Self::Known(status),
                Err(_) => Self::Unrecognized(name.to_string()),
            },
            None => Self::Missing {
                has_status_id: program_status_id.is_some(),
            },
        }
    }
}
