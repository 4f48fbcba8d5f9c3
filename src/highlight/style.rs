//! Style tags and spans
//!
//! The highlighter speaks to the renderer only in terms of these two types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of style labels assigned to text ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleTag {
    Keyword,
    String,
    Comment,
    Number,
    Function,
    Operator,
}

impl StyleTag {
    /// All tags, in declaration order
    pub const ALL: [StyleTag; 6] = [
        StyleTag::Keyword,
        StyleTag::String,
        StyleTag::Comment,
        StyleTag::Number,
        StyleTag::Function,
        StyleTag::Operator,
    ];

    /// Lowercase name used at the rendering boundary
    pub fn as_str(self) -> &'static str {
        match self {
            StyleTag::Keyword => "keyword",
            StyleTag::String => "string",
            StyleTag::Comment => "comment",
            StyleTag::Number => "number",
            StyleTag::Function => "function",
            StyleTag::Operator => "operator",
        }
    }
}

impl fmt::Display for StyleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A styled, half-open byte range within a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of the first styled byte
    pub start: usize,
    /// Number of styled bytes
    pub length: usize,
    /// Style applied to the range
    pub style: StyleTag,
}

impl Span {
    pub fn new(start: usize, length: usize, style: StyleTag) -> Self {
        Self {
            start,
            length,
            style,
        }
    }

    /// Exclusive end offset
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    /// Whether `offset` falls inside this span
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end()
    }

    /// The slice of `line` this span covers
    pub fn text<'a>(&self, line: &'a str) -> &'a str {
        &line[self.start..self.end()]
    }
}

/// Style of the byte at `offset`, if any span covers it
pub fn style_at(spans: &[Span], offset: usize) -> Option<StyleTag> {
    spans.iter().find(|s| s.contains(offset)).map(|s| s.style)
}
