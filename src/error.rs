use thiserror::Error;

/// Main error type for the prediction service
#[derive(Error, Debug)]
pub enum RatecastError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {}", .0.join("; "))]
    InvalidConfig(Vec<String>),

    // Model errors
    #[error("Failed to load model from {path}: {reason}")]
    Load { path: String, reason: String },

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    // Input errors
    #[error("Invalid input: {0}")]
    InputValidation(String),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl RatecastError {
    pub fn load(path: impl AsRef<std::path::Path>, reason: impl std::fmt::Display) -> Self {
        Self::Load {
            path: path.as_ref().display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Errors caused by the caller's input rather than by the service
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::SchemaMismatch(_) | Self::InputValidation(_))
    }
}

/// Result type alias for RatecastError
pub type Result<T> = std::result::Result<T, RatecastError>;
