//! Output sink
//!
//! A bounded buffer of [`OutputLine`]s. Only the interactive side writes to
//! it; job output reaches it through completion events.

use std::collections::VecDeque;

use crate::models::{OutputKind, OutputLine};

#[derive(Debug, Clone)]
pub struct OutputBuffer {
    lines: VecDeque<OutputLine>,
    limit: usize,
}

impl OutputBuffer {
    pub fn new(limit: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// Append `text`, one [`OutputLine`] per line. Empty text appends nothing.
    pub fn push(&mut self, text: &str, kind: OutputKind) {
        for line in text.lines() {
            self.lines.push_back(OutputLine::new(line, kind));
        }
        while self.lines.len() > self.limit {
            self.lines.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> impl Iterator<Item = &OutputLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn last(&self) -> Option<&OutputLine> {
        self.lines.back()
    }

    /// Lines of one kind, in order
    pub fn of_kind(&self, kind: OutputKind) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|l| l.kind == kind)
            .map(|l| l.text.as_str())
            .collect()
    }

    /// Remove and return every line, e.g. for a front end that prints and forgets
    pub fn drain(&mut self) -> Vec<OutputLine> {
        self.lines.drain(..).collect()
    }
}
