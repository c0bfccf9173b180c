//! Property tests for the local decomposition engine

use std::collections::HashSet;

use focusflow::decompose::{decompose_with, segment};
use focusflow::domain::{DURATION_OPTIONS, MAX_PRIORITY, MIN_PRIORITY, TaskStatus};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// A statement comfortably longer than the 10-character minimum
fn arb_statement() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z]{3,9}", 3..10).prop_map(|words| words.join(" "))
}

fn arb_journal() -> impl Strategy<Value = (Vec<String>, String)> {
    (prop::collection::vec(arb_statement(), 1..9), prop::sample::select(vec![". ", "! ", "? ", "\n", ".\n"])).prop_map(
        |(statements, separator)| {
            let journal = statements.join(separator);
            (statements, journal)
        },
    )
}

proptest! {
    #[test]
    fn prop_decompose_bounds((statements, journal) in arb_journal(), seed in any::<u64>()) {
        let tasks = decompose_with(&journal, &mut StdRng::seed_from_u64(seed));

        prop_assert!(!tasks.is_empty());
        prop_assert!(tasks.len() <= 5);
        prop_assert!(tasks.len() <= statements.len());
        if statements.len() >= 3 {
            prop_assert!(tasks.len() >= 3);
        }

        for task in &tasks {
            prop_assert!(DURATION_OPTIONS.contains(&task.estimated_duration));
            prop_assert!((2..=4).contains(&task.subtasks.len()));
            let distinct: HashSet<&String> = task.subtasks.iter().collect();
            prop_assert_eq!(distinct.len(), task.subtasks.len());
            prop_assert!((MIN_PRIORITY..=MAX_PRIORITY).contains(&task.priority_score));
            prop_assert_eq!((task.priority_score * 10.0).round() / 10.0, task.priority_score);
            prop_assert!(!task.title.is_empty());
            prop_assert_eq!(task.status, TaskStatus::Pending);
        }
    }

    #[test]
    fn prop_decompose_preserves_order((statements, journal) in arb_journal(), seed in any::<u64>()) {
        let tasks = decompose_with(&journal, &mut StdRng::seed_from_u64(seed));
        for (task, statement) in tasks.iter().zip(&statements) {
            prop_assert_eq!(&task.description, statement);
        }
    }

    #[test]
    fn prop_whitespace_is_empty(journal in "[ \t\n\r]{0,40}", seed in any::<u64>()) {
        prop_assert!(decompose_with(&journal, &mut StdRng::seed_from_u64(seed)).is_empty());
    }

    #[test]
    fn prop_segments_are_long_and_trimmed(journal in "[a-zA-Z .!?\n]{0,200}") {
        for piece in segment(&journal) {
            prop_assert!(piece.chars().count() > 10);
            prop_assert_eq!(piece.trim(), piece.as_str());
            prop_assert!(!piece.contains(['.', '!', '?', '\n']));
        }
    }

    #[test]
    fn prop_seeded_runs_repeat((_statements, journal) in arb_journal(), seed in any::<u64>()) {
        let a = decompose_with(&journal, &mut StdRng::seed_from_u64(seed));
        let b = decompose_with(&journal, &mut StdRng::seed_from_u64(seed));
        prop_assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            prop_assert_eq!(&x.title, &y.title);
            prop_assert_eq!(x.estimated_duration, y.estimated_duration);
            prop_assert_eq!(&x.subtasks, &y.subtasks);
            prop_assert_eq!(x.priority_score, y.priority_score);
        }
    }
}
