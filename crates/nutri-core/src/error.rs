use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum NutriError {
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    #[error("{source_name} is unreachable: {reason}")]
    Network { source_name: String, reason: String },

    #[error("{source_name} answered with HTTP {status}")]
    Upstream { source_name: String, status: u16 },

    #[error("{source_name} returned an unreadable product record: {reason}")]
    Decode { source_name: String, reason: String },

    #[error("failed to load ruleset from {path}: {reason}")]
    RulesetLoad { path: PathBuf, reason: String },

    #[error("invalid ruleset: {0}")]
    RulesetInvalid(String),

    #[error("invalid configuration for {key}: {reason}")]
    Config { key: String, reason: String },

    #[error("user '{0}' already exists")]
    DuplicateUser(String),

    #[error("invalid credentials or user not registered")]
    InvalidCredentials,

    #[error("user '{0}' not found")]
    UserNotFound(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("password hashing failed: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NutriError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        NutriError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// True for failures where retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, NutriError::Network { .. } | NutriError::Upstream { .. })
    }
}
