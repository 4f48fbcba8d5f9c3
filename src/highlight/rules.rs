//! Rule Table
//!
//! An ordered, immutable list of (matcher, style) rules. The position of a
//! rule in the table is its priority: when two rules style the same byte,
//! the later rule wins.

use std::ops::Range;

use regex::Regex;

use super::style::StyleTag;
use crate::config::HighlightConfig;
use crate::error::Result;

/// Identifier characters shared by the call and decorator rules
const IDENT: &str = "[A-Za-z_][A-Za-z0-9_]*";

/// How a rule finds its matches within a line
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Regular expression; `group` selects the capture styled (0 = whole match)
    Pattern { regex: Regex, group: usize },
    /// Triple-quoted string scanner, aware of the line's entry state
    TripleQuoted,
}

/// One highlighting rule
#[derive(Debug, Clone)]
pub struct Rule {
    matcher: Matcher,
    style: StyleTag,
    order: usize,
}

impl Rule {
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn style(&self) -> StyleTag {
        self.style
    }

    /// Position in the table; later rules overwrite earlier ones
    pub fn order(&self) -> usize {
        self.order
    }

    /// Non-overlapping left-to-right matches of a pattern rule.
    ///
    /// Returns an empty list for [`Matcher::TripleQuoted`]; the tokenizer
    /// scans those itself because they depend on line state.
    pub fn find_ranges(&self, text: &str) -> Vec<Range<usize>> {
        match &self.matcher {
            Matcher::Pattern { regex, group: 0 } => regex
                .find_iter(text)
                .map(|m| m.range())
                .filter(|r| !r.is_empty())
                .collect(),
            Matcher::Pattern { regex, group } => regex
                .captures_iter(text)
                .filter_map(|caps| caps.get(*group))
                .map(|m| m.range())
                .filter(|r| !r.is_empty())
                .collect(),
            Matcher::TripleQuoted => Vec::new(),
        }
    }
}

/// Ordered, immutable collection of rules
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<Rule>,
    multiline_strings: bool,
    /// Marker after which a triple quote cannot open a string
    comment_marker: Option<String>,
}

impl RuleTable {
    /// Build the table from configuration.
    ///
    /// Order: keywords, quoted strings, triple-quoted strings, comments,
    /// numbers, call identifiers, decorators, operators.
    pub fn new(config: &HighlightConfig) -> Result<Self> {
        let mut builder = TableBuilder::default();

        if !config.keywords.is_empty() {
            let words: Vec<String> = config.keywords.iter().map(|k| regex::escape(k)).collect();
            builder.pattern(&format!(r"\b(?:{})\b", words.join("|")), 0, StyleTag::Keyword)?;
        }

        builder.pattern(r#""[^"\\]*(\\.[^"\\]*)*""#, 0, StyleTag::String)?;
        builder.pattern(r"'[^'\\]*(\\.[^'\\]*)*'", 0, StyleTag::String)?;
        builder.push(Matcher::TripleQuoted, StyleTag::String);

        builder.pattern(
            &format!("{}.*", regex::escape(&config.comment_marker)),
            0,
            StyleTag::Comment,
        )?;

        builder.pattern(r"\b[0-9]+\b", 0, StyleTag::Number)?;
        builder.pattern(r"\b0[xX][0-9a-fA-F]+\b", 0, StyleTag::Number)?;
        builder.pattern(r"\b0[bB][01]+\b", 0, StyleTag::Number)?;
        builder.pattern(r"\b0[oO][0-7]+\b", 0, StyleTag::Number)?;

        // The regex crate has no lookahead; capture the name and leave `(` unstyled
        builder.pattern(&format!(r"\b({})\(", IDENT), 1, StyleTag::Function)?;

        builder.pattern(
            &format!("{}{}", regex::escape(&config.decorator_marker), IDENT),
            0,
            StyleTag::Function,
        )?;

        if !config.operators.is_empty() {
            // Longest first so `**` is taken as one match rather than two `*`
            let mut ops: Vec<&str> = config.operators.iter().map(String::as_str).collect();
            ops.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
            ops.dedup();
            let alternation: Vec<String> = ops.iter().map(|op| regex::escape(op)).collect();
            builder.pattern(&alternation.join("|"), 0, StyleTag::Operator)?;
        }

        debug!("Built rule table with {} rules", builder.rules.len());
        Ok(Self {
            rules: builder.rules,
            multiline_strings: config.multiline_strings,
            comment_marker: Some(config.comment_marker.clone()).filter(|m| !m.is_empty()),
        })
    }

    /// Build a table from explicit rules, in the given order
    pub fn from_rules(rules: Vec<(Matcher, StyleTag)>, multiline_strings: bool) -> Self {
        let mut builder = TableBuilder::default();
        for (matcher, style) in rules {
            builder.push(matcher, style);
        }
        Self {
            rules: builder.rules,
            multiline_strings,
            comment_marker: None,
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether triple-quoted strings carry state across lines
    pub fn multiline_strings(&self) -> bool {
        self.multiline_strings
    }

    /// Line comment marker, if the table has one
    pub fn comment_marker(&self) -> Option<&str> {
        self.comment_marker.as_deref()
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        // Built-in patterns are static; escaping keeps configured words literal
        Self::new(&HighlightConfig::default()).unwrap_or_else(|e| {
            error!("Default rule table failed to build: {}", e);
            Self::from_rules(Vec::new(), true)
        })
    }
}

#[derive(Default)]
struct TableBuilder {
    rules: Vec<Rule>,
}

impl TableBuilder {
    fn pattern(&mut self, pattern: &str, group: usize, style: StyleTag) -> Result<()> {
        let regex = Regex::new(pattern)?;
        self.push(Matcher::Pattern { regex, group }, style);
        Ok(())
    }

    fn push(&mut self, matcher: Matcher, style: StyleTag) {
        let order = self.rules.len();
        self.rules.push(Rule {
            matcher,
            style,
            order,
        });
    }
}
