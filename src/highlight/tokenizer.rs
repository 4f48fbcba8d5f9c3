//! Line Tokenizer
//!
//! Applies a [`RuleTable`] to one line of text. Every rule searches the line
//! independently; overlap is resolved only when compositing, where the later
//! rule in the table overwrites the earlier one byte by byte.

use std::ops::Range;

use super::rules::{Matcher, RuleTable};
use super::style::{Span, StyleTag};

/// Delimiter kind of a triple-quoted string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TripleQuote {
    /// `"""`
    Double,
    /// `'''`
    Single,
}

impl TripleQuote {
    pub fn delimiter(self) -> &'static str {
        match self {
            TripleQuote::Double => "\"\"\"",
            TripleQuote::Single => "'''",
        }
    }
}

/// Tokenizer state at a line boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LineState {
    #[default]
    Normal,
    /// Inside a triple-quoted string opened on an earlier line
    InTripleString(TripleQuote),
}

/// Spans of one line plus the state the next line starts in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedLine {
    pub spans: Vec<Span>,
    pub exit_state: LineState,
}

/// Tokenize a line that starts in the normal state
pub fn tokenize(text: &str, table: &RuleTable) -> Vec<Span> {
    tokenize_line(text, LineState::Normal, table).spans
}

/// Tokenize a line given the state carried in from the previous line
pub fn tokenize_line(text: &str, entry: LineState, table: &RuleTable) -> TokenizedLine {
    let mut styles: Vec<Option<StyleTag>> = vec![None; text.len()];
    let mut exit_state = LineState::Normal;

    for rule in table.rules() {
        let ranges = match rule.matcher() {
            Matcher::TripleQuoted => {
                let (ranges, state) = scan_triple_quoted(text, entry, table);
                exit_state = state;
                ranges
            }
            Matcher::Pattern { .. } => rule.find_ranges(text),
        };

        for range in ranges {
            for slot in &mut styles[range] {
                *slot = Some(rule.style());
            }
        }
    }

    TokenizedLine {
        spans: collect_spans(&styles),
        exit_state,
    }
}

/// Find triple-quoted string ranges, non-greedy, left to right.
///
/// In line-local mode the entry state is ignored and an unclosed opener is
/// left unstyled, so the exit state is always `Normal`.
fn scan_triple_quoted(
    text: &str,
    entry: LineState,
    table: &RuleTable,
) -> (Vec<Range<usize>>, LineState) {
    let multiline = table.multiline_strings();
    let comment_marker = table.comment_marker();
    let mut ranges = Vec::new();
    let mut state = if multiline { entry } else { LineState::Normal };
    let mut open_at = 0;
    let mut pos = 0;

    loop {
        match state {
            LineState::InTripleString(quote) => match text[pos..].find(quote.delimiter()) {
                Some(i) => {
                    let end = pos + i + quote.delimiter().len();
                    ranges.push(open_at..end);
                    pos = end;
                    state = LineState::Normal;
                }
                None if multiline => {
                    if open_at < text.len() {
                        ranges.push(open_at..text.len());
                    }
                    return (ranges, state);
                }
                None => return (ranges, LineState::Normal),
            },
            LineState::Normal => match next_opener(text, pos, comment_marker) {
                Some((i, quote)) => {
                    open_at = i;
                    pos = i + quote.delimiter().len();
                    state = LineState::InTripleString(quote);
                }
                None => return (ranges, LineState::Normal),
            },
        }
    }
}

/// First triple quote at or after `from` that sits in code: quotes inside a
/// one-line string or after the comment marker do not open anything
fn next_opener(
    text: &str,
    from: usize,
    comment_marker: Option<&str>,
) -> Option<(usize, TripleQuote)> {
    let mut pos = from;
    while pos < text.len() {
        let rest = &text[pos..];
        if rest.starts_with(TripleQuote::Double.delimiter()) {
            return Some((pos, TripleQuote::Double));
        }
        if rest.starts_with(TripleQuote::Single.delimiter()) {
            return Some((pos, TripleQuote::Single));
        }
        if comment_marker.is_some_and(|m| rest.starts_with(m)) {
            return None;
        }
        pos = match rest.as_bytes()[0] {
            quote @ (b'"' | b'\'') => skip_string(text, pos, quote),
            _ => pos + rest.chars().next().map_or(1, char::len_utf8),
        };
    }
    None
}

/// Offset just past the one-line string opened at `start`. An unclosed quote
/// is not a string, so scanning resumes right after it.
fn skip_string(text: &str, start: usize, quote: u8) -> usize {
    let bytes = text.as_bytes();
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    start + 1
}

/// Merge per-byte styles into runs
fn collect_spans(styles: &[Option<StyleTag>]) -> Vec<Span> {
    let mut spans: Vec<Span> = Vec::new();
    for (offset, style) in styles.iter().enumerate() {
        let Some(style) = *style else { continue };
        match spans.last_mut() {
            Some(last) if last.style == style && last.end() == offset => last.length += 1,
            _ => spans.push(Span::new(offset, 1, style)),
        }
    }
    spans
}
