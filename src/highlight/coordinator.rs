//! Highlight Coordinator
//!
//! Tracks which lines of a buffer are dirty and re-tokenizes only those
//! before they are displayed. A line is also recomputed when the state it
//! starts in no longer matches the exit state of the line above it, which is
//! how an opened or closed triple-quoted string reaches the following lines.

use std::sync::Arc;

use super::rules::RuleTable;
use super::style::Span;
use super::tokenizer::{tokenize_line, LineState};

/// One line of the buffer with its memoized highlighting
#[derive(Debug, Clone, Default)]
pub struct Line {
    text: String,
    dirty: bool,
    cached_spans: Vec<Span>,
    entry_state: LineState,
    exit_state: LineState,
}

impl Line {
    fn new(text: String) -> Self {
        Self {
            text,
            dirty: true,
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// State the line ended in when it was last tokenized
    pub fn exit_state(&self) -> LineState {
        self.exit_state
    }
}

/// Per-buffer dirty tracking and span cache
#[derive(Debug, Clone)]
pub struct HighlightCoordinator {
    table: Arc<RuleTable>,
    lines: Vec<Line>,
    /// Every line above this index is clean and agrees with the line before it
    stale_from: usize,
}

impl HighlightCoordinator {
    pub fn new(table: Arc<RuleTable>) -> Self {
        Self {
            table,
            lines: Vec::new(),
            stale_from: 0,
        }
    }

    /// Replace the whole buffer; every line becomes dirty.
    ///
    /// An empty text is one empty line, and a trailing newline leaves an
    /// empty last line, as in an editor.
    pub fn set_text(&mut self, text: &str) {
        self.lines = text
            .split('\n')
            .map(|l| Line::new(l.strip_suffix('\r').unwrap_or(l).to_string()))
            .collect();
        self.stale_from = 0;
        debug!("Loaded {} lines into highlighter", self.lines.len());
    }

    /// Reassemble the buffer text
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(Line::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    /// Replace the text of one line. Only that line is invalidated.
    ///
    /// Returns `false` if `index` is out of range.
    pub fn edit_line(&mut self, index: usize, text: &str) -> bool {
        match self.lines.get_mut(index) {
            Some(line) => {
                line.text = text.to_string();
                line.dirty = true;
                self.invalidate_from(index);
                true
            }
            None => false,
        }
    }

    /// Insert a new line before `index` (or append when `index == line_count`)
    pub fn insert_line(&mut self, index: usize, text: &str) -> bool {
        if index > self.lines.len() {
            return false;
        }
        self.lines.insert(index, Line::new(text.to_string()));
        self.invalidate_from(index);
        true
    }

    /// Remove the line at `index`, returning its text
    pub fn remove_line(&mut self, index: usize) -> Option<String> {
        if index >= self.lines.len() {
            return None;
        }
        self.invalidate_from(index);
        Some(self.lines.remove(index).text)
    }

    pub fn mark_dirty(&mut self, index: usize) {
        if let Some(line) = self.lines.get_mut(index) {
            line.dirty = true;
            self.invalidate_from(index);
        }
    }

    pub fn is_dirty(&self, index: usize) -> bool {
        self.lines.get(index).is_some_and(Line::is_dirty)
    }

    /// Indices of lines whose spans are stale
    pub fn dirty_lines(&self) -> Vec<usize> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.dirty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Spans for line `index`, recomputing whatever is stale above it first
    pub fn spans(&mut self, index: usize) -> Option<&[Span]> {
        if index >= self.lines.len() {
            return None;
        }
        self.refresh_through(index);
        Some(&self.lines[index].cached_spans)
    }

    /// Bring every line up to date; returns how many lines were re-tokenized
    pub fn refresh_all(&mut self) -> usize {
        match self.lines.len() {
            0 => 0,
            n => self.refresh_through(n - 1),
        }
    }

    fn invalidate_from(&mut self, index: usize) {
        self.stale_from = self.stale_from.min(index);
    }

    fn refresh_through(&mut self, last: usize) -> usize {
        let start = self.stale_from;
        if last < start {
            return 0;
        }

        let mut entry = match start {
            0 => LineState::Normal,
            n => self.lines[n - 1].exit_state,
        };
        let mut recomputed = 0;

        for line in &mut self.lines[start..=last] {
            if line.dirty || line.entry_state != entry {
                let tokenized = tokenize_line(&line.text, entry, &self.table);
                line.cached_spans = tokenized.spans;
                line.entry_state = entry;
                line.exit_state = tokenized.exit_state;
                line.dirty = false;
                recomputed += 1;
            }
            entry = line.exit_state;
        }
        self.stale_from = last + 1;

        if recomputed > 0 {
            trace!("Re-tokenized {} lines through {}", recomputed, last);
        }
        recomputed
    }
}
