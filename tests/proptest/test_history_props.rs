//! Property-based tests for command history
//!
//! Random sequences of pushes and cursor moves must keep the cursor inside
//! `[0, len]` and return entries consistent with it.

use quill::shell::History;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Action {
    Push(String),
    Previous,
    Next,
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        "[a-z]{1,6}".prop_map(Action::Push),
        Just(Action::Previous),
        Just(Action::Next),
    ]
}

proptest! {
    #[test]
    fn test_cursor_stays_in_bounds(
        actions in prop::collection::vec(action(), 0..60),
        limit in 1usize..8,
    ) {
        let mut history = History::new(limit);
        for action in actions {
            match action {
                Action::Push(command) => {
                    history.push(command.clone());
                    prop_assert_eq!(history.cursor(), history.len());
                    prop_assert_eq!(history.last(), Some(command.as_str()));
                }
                Action::Previous => {
                    let cursor = history.cursor();
                    let entry = history.previous_entry().map(str::to_string);
                    if history.is_empty() {
                        prop_assert!(entry.is_none());
                    } else {
                        prop_assert_eq!(history.cursor(), cursor.saturating_sub(1));
                        let expected = history.entries().nth(history.cursor()).map(str::to_string);
                        prop_assert_eq!(entry, expected);
                    }
                }
                Action::Next => {
                    let entry = history.next_entry().to_string();
                    if history.cursor() == history.len() {
                        prop_assert_eq!(entry, "");
                    } else {
                        let expected = history.entries().nth(history.cursor()).unwrap_or_default();
                        prop_assert_eq!(entry.as_str(), expected);
                    }
                }
            }
            prop_assert!(history.cursor() <= history.len());
            prop_assert!(history.len() <= limit);
        }
    }
}
