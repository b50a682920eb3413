//! Error types for glmc
//!
//! Defines module-specific error types using thiserror for clear error propagation.

use thiserror::Error;

/// Main error type for glmc
#[derive(Error, Debug)]
pub enum Error {
    /// Settings file loading errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Settings file parse errors
    #[error("Settings parse error: {0}")]
    Parse(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Audio sink command errors
    #[error("Audio sink error: {0}")]
    Sink(String),

    /// Invalid state for operation
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Other errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience Result type using glmc Error
pub type Result<T> = std::result::Result<T, Error>;
