//! Error types and Result aliases for Quill
//!
//! Errors stay typed inside the crate. They are flattened to display strings
//! only when the shell writes them to its output sink.

use std::path::PathBuf;

use thiserror::Error as ThisError;

/// Result type alias for Quill operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Quill
#[derive(Debug, ThisError)]
pub enum Error {
    // === Filesystem errors ===
    /// Target of `cd` does not exist
    #[error("Directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    /// Target of `cd` exists but is a file
    #[error("Not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    /// Script passed to `python` does not exist
    #[error("File not found: {script}")]
    ScriptNotFound { script: String },

    /// Failed to read a directory listing
    #[error("Failed to list '{}': {reason}", path.display())]
    ListFailed { path: PathBuf, reason: String },

    // === Command errors ===
    /// Failed to spawn a child process
    #[error("Failed to spawn command '{command}': {reason}")]
    CommandSpawnFailed { command: String, reason: String },

    /// Failed to send signal to a process group
    #[error("Failed to send signal '{signal}': {reason}")]
    SignalSendFailed { signal: String, reason: String },

    /// Empty command
    #[error("Command cannot be empty")]
    EmptyCommand,

    /// No tokio runtime available to run background jobs
    #[error("No async runtime available: {reason}")]
    NoRuntime { reason: String },

    // === Configuration errors ===
    /// Configuration file not found
    #[error("Configuration file not found")]
    ConfigNotFound,

    /// Failed to parse configuration
    #[error("Failed to parse {format} config: {reason}")]
    ConfigParseFailed { format: String, reason: String },

    /// Failed to serialize configuration
    #[error("Failed to serialize config as {format}: {reason}")]
    ConfigSerializationFailed { format: String, reason: String },

    /// Configuration validation failed
    #[error("Configuration validation failed for '{field}': {reason}")]
    ConfigValidationFailed { field: String, reason: String },

    // === Wrapped errors ===
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Regex compilation errors
    #[error("Regex compilation error: {0}")]
    Regex(#[from] regex::Error),

    /// Generic errors (for cases not yet categorized)
    #[error("Error: {0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(err: String) -> Self {
        Error::Other(err)
    }
}

impl From<&str> for Error {
    fn from(err: &str) -> Self {
        Error::Other(err.to_string())
    }
}
