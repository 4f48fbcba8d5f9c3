//! Built-in command helpers that do not need the session

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Static command reference printed by `help`
pub const HELP_TEXT: &str = "\
Available commands:
  cd <path>        Change directory
  pwd              Print current directory
  ls, dir          List directory entries
  clear            Clear the output
  python <file>    Run a Python script
  help             Show this help
Anything else runs as a shell command in the current directory.

Keys:
  Ctrl+Up          Previous command
  Ctrl+Down        Next command";

/// Entries of `dir` sorted by name, directories suffixed with `/`
pub fn list_dir(dir: &Path) -> Result<Vec<String>> {
    let read = fs::read_dir(dir).map_err(|e| Error::ListFailed {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut entries: Vec<(String, bool)> = read
        .flatten()
        .map(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            // Follow symlinks so a link to a directory lists as one
            let is_dir = entry.path().is_dir();
            (name, is_dir)
        })
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(entries
        .into_iter()
        .map(|(name, is_dir)| if is_dir { format!("{}/", name) } else { name })
        .collect())
}
