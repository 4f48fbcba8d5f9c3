//! Command history with a navigable cursor
//!
//! Every submitted command is appended, duplicates included, and the cursor
//! is reset to one past the last entry (the fresh, empty input). Entries can
//! optionally be persisted to a plain-text file, one command per line.

use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Command history
#[derive(Debug, Clone)]
pub struct History {
    /// Entries, oldest first
    entries: VecDeque<String>,
    /// Index into `entries`; `entries.len()` means the fresh entry
    cursor: usize,
    /// Maximum history size
    max_size: usize,
    /// File each new entry is appended to
    history_file: Option<PathBuf>,
}

impl History {
    /// In-memory history keeping at most `max_size` entries
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: 0,
            max_size: max_size.max(1),
            history_file: None,
        }
    }

    /// History backed by `path`; existing entries are loaded.
    ///
    /// A file holding more than `max_size` entries is rewritten with only the
    /// newest ones, so it stays bounded across sessions.
    pub fn with_file(path: PathBuf, max_size: usize) -> Result<Self> {
        let mut history = Self::new(max_size);
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut stored = 0;
            for line in content.lines().filter(|l| !l.trim().is_empty()) {
                history.entries.push_back(line.to_string());
                stored += 1;
            }
            history.trim();
            debug!("Loaded {} history entries from {}", history.len(), path.display());

            if stored > history.len() {
                match write_lines(&path, history.entries()) {
                    Ok(()) => debug!("Compacted {} from {} entries", path.display(), stored),
                    Err(e) => warn!("Failed to compact history file {}: {}", path.display(), e),
                }
            }
        }
        history.cursor = history.entries.len();
        history.history_file = Some(path);
        Ok(history)
    }

    /// Append a command and reset the cursor to the fresh entry
    pub fn push(&mut self, command: String) {
        if let Some(path) = &self.history_file {
            if let Err(e) = append_line(path, &command) {
                warn!("Failed to persist history to {}: {}", path.display(), e);
            }
        }
        self.entries.push_back(command);
        self.trim();
        self.cursor = self.entries.len();
    }

    /// Step back one entry, clamped at the oldest.
    ///
    /// Returns the entry now selected, or `None` when history is empty.
    pub fn previous_entry(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        self.cursor = self.cursor.saturating_sub(1);
        self.entries.get(self.cursor).map(String::as_str)
    }

    /// Step forward one entry. Past the newest entry the cursor moves to the
    /// fresh entry and the empty string is returned.
    pub fn next_entry(&mut self) -> &str {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
            &self.entries[self.cursor]
        } else {
            self.cursor = self.entries.len();
            ""
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent entry
    pub fn last(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }

    /// All entries, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn history_file(&self) -> Option<&Path> {
        self.history_file.as_deref()
    }

    fn trim(&mut self) {
        while self.entries.len() > self.max_size {
            self.entries.pop_front();
        }
    }
}

fn append_line(path: &Path, line: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", line)?;
    Ok(())
}

fn write_lines<'a>(path: &Path, lines: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut content = String::new();
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    fs::write(path, content)?;
    Ok(())
}
