//! Unit tests for the line tokenizer
//!
//! These tests check rule order and compositing through the public
//! highlighting API.

use quill::highlight::{style_at, Matcher, TokenizedLine, TripleQuote};
use quill::{tokenize, tokenize_line, HighlightConfig, LineState, RuleTable, Span, StyleTag};
use regex::Regex;

fn table() -> RuleTable {
    RuleTable::default()
}

/// Text of every span with the given style
fn styled<'a>(text: &'a str, spans: &[Span], style: StyleTag) -> Vec<&'a str> {
    spans
        .iter()
        .filter(|s| s.style == style)
        .map(|s| s.text(text))
        .collect()
}

#[cfg(test)]
mod tokenizer_tests {
    use super::*;

    #[test]
    fn test_keywords_are_whole_words() {
        let text = "if ifx and notable or not";
        let spans = tokenize(text, &table());
        assert_eq!(styled(text, &spans, StyleTag::Keyword), vec!["if", "and", "or", "not"]);
    }

    #[test]
    fn test_escaped_quotes_stay_inside_string() {
        let text = r#"s = "a \" b" + 'c\'d'"#;
        let spans = tokenize(text, &table());
        assert_eq!(
            styled(text, &spans, StyleTag::String),
            vec![r#""a \" b""#, r"'c\'d'"]
        );
    }

    #[test]
    fn test_number_bases() {
        let text = "a = 42 + 0xff + 0b101 + 0o17";
        let spans = tokenize(text, &table());
        assert_eq!(
            styled(text, &spans, StyleTag::Number),
            vec!["42", "0xff", "0b101", "0o17"]
        );
    }

    #[test]
    fn test_digits_inside_identifiers_are_not_numbers() {
        let text = "x1 = y2";
        let spans = tokenize(text, &table());
        assert!(styled(text, &spans, StyleTag::Number).is_empty());
    }

    #[test]
    fn test_longest_operator_wins() {
        let text = "a **= b // c != d";
        let spans = tokenize(text, &table());
        assert_eq!(
            styled(text, &spans, StyleTag::Operator),
            vec!["**=", "//", "!="]
        );
    }

    #[test]
    fn test_call_styles_only_the_name() {
        let text = "result = compute(1)";
        let spans = tokenize(text, &table());
        assert_eq!(styled(text, &spans, StyleTag::Function), vec!["compute"]);
        assert_eq!(style_at(&spans, 16), None);
    }

    #[test]
    fn test_decorator_with_custom_marker() {
        let config = HighlightConfig {
            decorator_marker: "%".to_string(),
            comment_marker: "//".to_string(),
            operators: vec![],
            ..HighlightConfig::default()
        };
        let table = RuleTable::new(&config).unwrap();
        let text = "%cached // note";
        let spans = tokenize(text, &table);
        assert_eq!(
            spans,
            vec![
                Span::new(0, 7, StyleTag::Function),
                Span::new(8, 7, StyleTag::Comment),
            ]
        );
    }

    #[test]
    fn test_string_inside_comment_is_overwritten() {
        // Strings come before comments in the table
        let text = "# say \"hi\"";
        let spans = tokenize(text, &table());
        assert_eq!(spans, vec![Span::new(0, text.len(), StyleTag::Comment)]);
    }

    #[test]
    fn test_comment_marker_inside_string_still_comments() {
        let text = "s = \"a # b\"";
        let spans = tokenize(text, &table());
        assert_eq!(style_at(&spans, 5), Some(StyleTag::String));
        assert_eq!(style_at(&spans, 7), Some(StyleTag::Comment));
    }

    #[test]
    fn test_from_rules_last_rule_wins() {
        let table = RuleTable::from_rules(
            vec![
                (
                    Matcher::Pattern {
                        regex: Regex::new("abcd").unwrap(),
                        group: 0,
                    },
                    StyleTag::String,
                ),
                (
                    Matcher::Pattern {
                        regex: Regex::new("bc").unwrap(),
                        group: 0,
                    },
                    StyleTag::Number,
                ),
            ],
            false,
        );
        assert_eq!(
            tokenize("abcd", &table),
            vec![
                Span::new(0, 1, StyleTag::String),
                Span::new(1, 2, StyleTag::Number),
                Span::new(3, 1, StyleTag::String),
            ]
        );
    }

    #[test]
    fn test_two_strings_on_one_triple_line() {
        let line = tokenize_line(r#"a = """x""" + '''y'''"#, LineState::Normal, &table());
        assert_eq!(line.exit_state, LineState::Normal);
        let text = r#"a = """x""" + '''y'''"#;
        assert_eq!(
            styled(text, &line.spans, StyleTag::String),
            vec![r#""""x""""#, "'''y'''"]
        );
    }

    #[test]
    fn test_close_then_reopen() {
        let entry = LineState::InTripleString(TripleQuote::Single);
        let TokenizedLine { spans, exit_state } = tokenize_line("end''' x = '''", entry, &table());
        assert_eq!(exit_state, LineState::InTripleString(TripleQuote::Single));
        assert_eq!(style_at(&spans, 0), Some(StyleTag::String));
        assert_eq!(style_at(&spans, 9), Some(StyleTag::Operator));
        assert_eq!(style_at(&spans, 13), Some(StyleTag::String));
    }
}
