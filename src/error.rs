// Error types for fitlog.
// Covers form validation, API rejections, session persistence and transport errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FitlogError {
    /// Client-side form check failed; the request never left the process.
    #[error("{0}")]
    Validation(String),

    /// Login or registration rejected by the server.
    #[error("{0}")]
    Authentication(String),

    /// Non-success response from a workout endpoint.
    #[error("Failed to {action}: {detail}")]
    Fetch { action: String, detail: String },

    #[error("Stored session is corrupt: {0}")]
    MalformedSession(String),

    #[error("You must be logged in to do that.")]
    NotAuthenticated,

    #[error("Unexpected response from server: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl FitlogError {
    pub fn validation(message: impl Into<String>) -> Self {
        FitlogError::Validation(message.into())
    }

    pub fn fetch(action: impl Into<String>, detail: impl Into<String>) -> Self {
        FitlogError::Fetch {
            action: action.into(),
            detail: detail.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FitlogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_visible_messages() {
        assert_eq!(
            FitlogError::validation("Passwords do not match.").to_string(),
            "Passwords do not match."
        );
        assert_eq!(
            FitlogError::fetch("fetch workouts", "Unauthorized").to_string(),
            "Failed to fetch workouts: Unauthorized"
        );
        assert_eq!(
            FitlogError::NotAuthenticated.to_string(),
            "You must be logged in to do that."
        );
    }
}
