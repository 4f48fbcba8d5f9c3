//! Shell session state: working directory and history
//!
//! Mutated only from the interactive side. Jobs receive a copy of the
//! working directory when they are spawned.

use std::path::{Component, Path, PathBuf};

use super::history::History;
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct Session {
    cwd: PathBuf,
    history: History,
}

impl Session {
    pub fn new(cwd: PathBuf, history: History) -> Self {
        Self { cwd, history }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    /// Prompt shown before the input, e.g. `/home/me/project>`
    pub fn prompt(&self) -> String {
        format!("{}>", self.cwd.display())
    }

    /// Change the working directory.
    ///
    /// `~` expands to the home directory, relative targets resolve against
    /// the current directory. On error the directory is left unchanged.
    pub fn change_dir(&mut self, target: &str) -> Result<&Path> {
        let resolved = resolve_path(&self.cwd, target);

        if !resolved.exists() {
            return Err(Error::DirectoryNotFound { path: resolved });
        }
        if !resolved.is_dir() {
            return Err(Error::NotADirectory { path: resolved });
        }

        debug!("cwd {} -> {}", self.cwd.display(), resolved.display());
        self.cwd = resolved;
        Ok(&self.cwd)
    }
}

/// Resolve `target` against `cwd`, expanding a leading `~` and normalizing
/// `.` and `..` lexically
pub fn resolve_path(cwd: &Path, target: &str) -> PathBuf {
    let expanded = expand_home(target);
    let joined = if expanded.is_absolute() {
        expanded
    } else {
        cwd.join(expanded)
    };
    normalize(&joined)
}

fn expand_home(target: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (target, home) {
        ("~", Some(home)) => home,
        (t, Some(home)) if t.starts_with("~/") || t.starts_with("~\\") => home.join(&t[2..]),
        (t, _) => PathBuf::from(t),
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Popping past the root leaves the root in place
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
