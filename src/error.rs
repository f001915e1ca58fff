//! Error types for Steg.

use thiserror::Error;

/// Library-level error type for Steg operations.
#[derive(Error, Debug)]
pub enum StegError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Unsafe expression: {0}")]
    UnsafeExpression(String),

    #[error("Evaluation failed: {0}")]
    Evaluation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unregistered tool: {0}")]
    UnregisteredTool(String),

    #[error("Planning failed: {0}")]
    Planning(String),

    #[error("Summary failed: {0}")]
    Summary(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Steg operations.
pub type Result<T> = std::result::Result<T, StegError>;
