//! Core data models for Quill
//!
//! Plain data passed between the shell, the process runner and the display.

pub mod command;
pub mod output_line;

// Re-exports for convenience
pub use command::{Command, Verb};
pub use output_line::{OutputKind, OutputLine};
