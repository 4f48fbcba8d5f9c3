//! Command Model
//!
//! A typed line parsed into a verb and its raw arguments. Commands are
//! transient: parsed, dispatched, dropped.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// What the shell should do with a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verb {
    /// `cd <path>`
    Cd,
    /// `pwd`
    Pwd,
    /// `ls` or `dir`
    List,
    /// `clear`
    Clear,
    /// `python <script>`
    Python,
    /// `help`
    Help,
    /// Anything else, run through the OS shell
    External,
}

impl Verb {
    /// Whether the verb is handled without spawning a process
    pub fn is_builtin(self) -> bool {
        !matches!(self, Verb::Python | Verb::External)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Verb::Cd => "cd",
            Verb::Pwd => "pwd",
            Verb::List => "ls",
            Verb::Clear => "clear",
            Verb::Python => "python",
            Verb::Help => "help",
            Verb::External => "external",
        };
        f.write_str(name)
    }
}

/// A parsed command line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub verb: Verb,
    /// Arguments after the verb; the whole line for [`Verb::External`]
    pub raw_args: String,
}

impl Command {
    /// Parse one input line. First match wins:
    /// `cd `, `pwd`, `ls`/`dir`, `clear`, `python `, `help`, then external.
    pub fn parse(input: &str) -> Result<Self> {
        let line = input.trim();
        if line.is_empty() {
            return Err(Error::EmptyCommand);
        }

        let command = if let Some(rest) = line.strip_prefix("cd ") {
            Self::with_args(Verb::Cd, rest)
        } else if line == "pwd" {
            Self::with_args(Verb::Pwd, "")
        } else if line == "ls" || line == "dir" {
            Self::with_args(Verb::List, "")
        } else if line == "clear" {
            Self::with_args(Verb::Clear, "")
        } else if let Some(rest) = line.strip_prefix("python ") {
            Self::with_args(Verb::Python, rest)
        } else if line == "help" {
            Self::with_args(Verb::Help, "")
        } else {
            Self {
                verb: Verb::External,
                raw_args: line.to_string(),
            }
        };

        Ok(command)
    }

    fn with_args(verb: Verb, args: &str) -> Self {
        Self {
            verb,
            raw_args: args.trim().to_string(),
        }
    }
}
