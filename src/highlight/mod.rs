//! Rule-based syntax highlighting
//!
//! Pure lexical pattern matching: a [`RuleTable`] of ordered regex rules, a
//! per-line tokenizer with last-write-wins compositing, and a coordinator
//! that memoizes spans per line until the line is edited.
//!
//! ```text
//! edit ─▶ HighlightCoordinator::edit_line ─▶ line marked dirty
//! display ─▶ HighlightCoordinator::spans ─▶ tokenize_line (dirty lines only)
//! ```

pub mod coordinator;
pub mod rules;
pub mod style;
pub mod tokenizer;

pub use coordinator::{HighlightCoordinator, Line};
pub use rules::{Matcher, Rule, RuleTable};
pub use style::{style_at, Span, StyleTag};
pub use tokenizer::{tokenize, tokenize_line, LineState, TokenizedLine, TripleQuote};
