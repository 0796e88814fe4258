// src/errors.rs
use thiserror::Error;

/// Message shown when a failure carries no user-presentable text of its own.
pub const GENERIC_FAILURE: &str = "An error occurred. Please try again.";

/// Message shown when the service reports failure without an `error` field.
pub const GENERATION_FAILED: &str = "Generation failed";

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Please enter a topic")]
    TopicRequired,

    #[error("Please enter a valid grade (1-12)")]
    InvalidGrade,

    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("{0}")]
    ServiceRejected(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    /// The text surfaced to the user through `View::alert`.
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::TopicRequired
            | PipelineError::InvalidGrade
            | PipelineError::ServiceRejected(_)
            | PipelineError::Config(_) => self.to_string(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, PipelineError::TopicRequired | PipelineError::InvalidGrade)
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert_eq!(PipelineError::TopicRequired.user_message(), "Please enter a topic");
        assert_eq!(
            PipelineError::ServiceRejected("quota exceeded".to_string()).user_message(),
            "quota exceeded"
        );
        let api = PipelineError::ApiError { status: 502, body: "bad gateway".to_string() };
        assert_eq!(api.user_message(), GENERIC_FAILURE);
        assert!(PipelineError::InvalidGrade.is_validation());
        assert!(!api.is_validation());
    }
}
