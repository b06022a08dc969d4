//! Error types for TeamNest

use thiserror::Error;

/// Result type alias using TeamNest's Error
pub type Result<T> = std::result::Result<T, Error>;

/// TeamNest error types
///
/// Display strings for the entity errors are the exact static messages the
/// mock API reports, so consumers can surface them unchanged.
#[derive(Error, Debug)]
pub enum Error {
    // Entity errors (E001-E099)
    #[error("Project not found")]
    ProjectNotFound(u64),

    #[error("Task not found")]
    TaskNotFound(u64),

    #[error("User not found")]
    UserNotFound(u64),

    #[error("Role not found")]
    RoleNotFound(u64),

    #[error("Subtask not found")]
    SubtaskNotFound { task_id: u64, subtask_id: u64 },

    // Business rule errors (E100-E199)
    #[error("Cannot delete system role")]
    SystemRoleProtected(u64),

    #[error("Cannot delete role with assigned users")]
    RoleInUse { id: u64, users_count: u32 },

    // Network errors (E200-E299)
    #[error("{message}")]
    NetworkError {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    // Config errors (E600-E699)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // Input errors (E800-E899)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Generic errors
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::ProjectNotFound(_) => "E001",
            Self::TaskNotFound(_) => "E002",
            Self::UserNotFound(_) => "E003",
            Self::RoleNotFound(_) => "E004",
            Self::SubtaskNotFound { .. } => "E005",
            Self::SystemRoleProtected(_) => "E100",
            Self::RoleInUse { .. } => "E101",
            Self::NetworkError { .. } => "E200",
            Self::ApiError { .. } => "E201",
            Self::ConfigError(_) => "E600",
            Self::InvalidInput(_) => "E800",
            Self::Other(_) | Self::Json(_) => "E9999",
        }
    }

    /// Whether this error reports a missing entity
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ProjectNotFound(_)
                | Self::TaskNotFound(_)
                | Self::UserNotFound(_)
                | Self::RoleNotFound(_)
                | Self::SubtaskNotFound { .. }
        )
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::ProjectNotFound(_) => Some("teamnest projects list".to_string()),
            Self::TaskNotFound(_) => Some("teamnest tasks list".to_string()),
            Self::UserNotFound(_) => Some("teamnest members list".to_string()),
            Self::RoleNotFound(_) => Some("teamnest roles list".to_string()),
            Self::SubtaskNotFound { task_id, .. } => {
                Some(format!("teamnest tasks show {}", task_id))
            }
            Self::RoleInUse { id, .. } => Some(format!(
                "Reassign members first: teamnest members list --role {}",
                id
            )),
            Self::NetworkError { .. } => Some("teamnest config get auth.base_url".to_string()),
            _ => None,
        }
    }
}
