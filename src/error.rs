//! Error types for the budget assistant

use thiserror::Error;

/// Result type alias for assistant operations
pub type Result<T> = std::result::Result<T, AssistantError>;

#[derive(Error, Debug)]
pub enum AssistantError {

    // =============================
    // Startup
    // =============================

    #[error("Configuration error: {0}")]
    ConfigError(String),

    // =============================
    // External Collaborators
    // =============================

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Advice search error: {0}")]
    SearchError(String),

    // =============================
    // Session
    // =============================

    #[error("Session error: {0}")]
    SessionError(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
