use thiserror::Error;

use crate::labels::CONFIG_LABEL;

/// A3S Box compose error types
#[derive(Error, Debug)]
pub enum ComposeError {
    /// Container carries no embedded spec, so it was not created by us
    #[error(
        "Expecting container {container_id} to have label '{}' to parse it",
        CONFIG_LABEL
    )]
    NotManaged { container_id: String },

    /// Embedded spec is present but cannot be parsed
    #[error("Failed to parse config for container {container_name}: {message}")]
    MalformedConfig {
        container_name: String,
        message: String,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ComposeError {
    /// Whether the container should be treated as foreign rather than broken.
    pub fn is_not_managed(&self) -> bool {
        matches!(self, ComposeError::NotManaged { .. })
    }
}

impl From<serde_json::Error> for ComposeError {
    fn from(err: serde_json::Error) -> Self {
        ComposeError::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for ComposeError {
    fn from(err: serde_yaml::Error) -> Self {
        ComposeError::SerializationError(err.to_string())
    }
}

/// Result type alias for compose operations
pub type Result<T> = std::result::Result<T, ComposeError>;
