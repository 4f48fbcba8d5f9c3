//! Output Line Model
//!
//! One line in the shell's output sink, tagged with where it came from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source of an output line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputKind {
    /// The prompt and command as typed
    Echo,
    /// Captured standard output
    Stdout,
    /// Captured standard error
    Stderr,
    /// Informational message from the shell itself
    Info,
    /// An error rendered for display
    Error,
}

/// A single line of shell output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputLine {
    /// The text content, without a trailing newline
    pub text: String,

    /// Where the line came from
    pub kind: OutputKind,

    /// When this line was appended
    pub timestamp: DateTime<Utc>,
}

impl OutputLine {
    /// Create a new output line
    pub fn new(text: impl Into<String>, kind: OutputKind) -> Self {
        Self {
            text: text.into(),
            kind,
            timestamp: Utc::now(),
        }
    }

    /// Whether this line reports a failure
    pub fn is_error(&self) -> bool {
        matches!(self.kind, OutputKind::Error | OutputKind::Stderr)
    }
}
