//! Configuration management for Quill
//!
//! A [`Config`] is an immutable value built once at startup and handed to the
//! rule table and the shell at construction. There is no process-wide
//! configuration registry.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for Quill
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Highlighter configuration
    pub highlight: HighlightConfig,

    /// Command shell configuration
    pub shell: ShellConfig,
}

/// Highlighter rule configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Words styled as keywords when they appear as whole words
    pub keywords: Vec<String>,

    /// Operator substrings styled as operators
    pub operators: Vec<String>,

    /// Marker that starts a line comment
    pub comment_marker: String,

    /// Marker that introduces a decorator identifier
    pub decorator_marker: String,

    /// Carry triple-quoted strings across line boundaries
    pub multiline_strings: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            operators: DEFAULT_OPERATORS.iter().map(|s| s.to_string()).collect(),
            comment_marker: "#".to_string(),
            decorator_marker: "@".to_string(),
            multiline_strings: true,
        }
    }
}

/// Python keywords highlighted by default
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "and", "or", "not", "if", "elif", "else", "for", "while", "break", "continue", "pass",
    "return", "def", "class", "import", "from", "as", "with", "try", "except", "finally",
    "raise", "assert", "lambda", "yield", "None", "True", "False", "async", "await", "nonlocal",
    "global", "del", "in", "is",
];

/// Operator substrings highlighted by default
pub const DEFAULT_OPERATORS: &[&str] = &[
    "+", "-", "*", "/", "%", "=", "==", "!=", "<", ">", "<=", ">=", "+=", "-=", "*=", "/=", "//",
    "**", "&", "|", "^", "~", "<<", ">>",
];

/// Command shell configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Shell executable used for non-builtin commands
    pub shell_path: PathBuf,

    /// Arguments passed before the command line (e.g. `-c`)
    pub shell_args: Vec<String>,

    /// Interpreter used by the `python` builtin
    pub python_executable: String,

    /// Maximum number of history entries kept in memory
    pub history_limit: usize,

    /// Optional file that history is loaded from and appended to
    pub history_file: Option<PathBuf>,

    /// Maximum number of lines kept in the output sink
    pub output_limit: usize,

    /// Optional per-command timeout in milliseconds; `None` runs to completion
    pub command_timeout_ms: Option<u64>,

    /// Starting directory; defaults to the process working directory
    pub working_directory: Option<PathBuf>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        #[cfg(windows)]
        let (shell_path, shell_args, python) = ("cmd", vec!["/C".to_string()], "python");
        #[cfg(not(windows))]
        let (shell_path, shell_args, python) = ("/bin/sh", vec!["-c".to_string()], "python3");

        Self {
            shell_path: PathBuf::from(shell_path),
            shell_args,
            python_executable: python.to_string(),
            history_limit: 1000,
            history_file: None,
            output_limit: 100_000,
            command_timeout_ms: None,
            working_directory: None,
        }
    }
}
