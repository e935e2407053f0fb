//! Error types for the semantic layer
//!
//! None of these reach `evaluate`: per-call failures degrade to a neutral
//! classification and construction failures fall back to [`crate::NullClassifier`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SemanticError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Embedding provider error (status {status_code}): {message}")]
    Provider { status_code: u16, message: String },

    #[error("Invalid embedding response: {0}")]
    InvalidResponse(String),

    #[error("Invalid exemplar bank: {0}")]
    Exemplars(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SemanticError>;
