//! Error types for Promptr
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in Promptr
#[derive(Debug, Error)]
pub enum PromptrError {
    /// Template missing from the templates directory
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// Chat endpoint failure (network, auth, rate limit)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Invalid argument or operation
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Promptr operations
pub type Result<T> = std::result::Result<T, PromptrError>;
