//! Error types for glossa

use std::io;
use thiserror::Error;

/// Main error type for glossa
#[derive(Error, Debug)]
pub enum GlossaError {
    #[error("Glossary error: {0}")]
    Glossary(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Speech synthesis error: {0}")]
    Speech(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("INI parse error: {0}")]
    IniParse(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for glossa operations
pub type Result<T> = std::result::Result<T, GlossaError>;

impl From<String> for GlossaError {
    fn from(s: String) -> Self {
        GlossaError::Other(s)
    }
}

impl From<&str> for GlossaError {
    fn from(s: &str) -> Self {
        GlossaError::Other(s.to_string())
    }
}
