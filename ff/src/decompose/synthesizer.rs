//! Statement -> Task synthesis
//!
//! Every random choice is drawn from the injected generator, so a seeded
//! `StdRng` makes synthesis fully reproducible.

use std::sync::LazyLock;

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use regex::Regex;
use tracing::debug;

use crate::domain::{DURATION_OPTIONS, MAX_PRIORITY, MIN_PRIORITY, Task, duration_adjustment, round_tenth};

/// Fewest words a synthesized title draws from its statement
pub const TITLE_WORDS_MIN: usize = 5;

/// Most words a synthesized title draws from its statement
pub const TITLE_WORDS_MAX: usize = 7;

/// Marker appended to truncated titles
pub const ELLIPSIS: &str = "...";

/// Fewest subtasks per task
pub const SUBTASKS_MIN: usize = 2;

/// Most subtasks per task
pub const SUBTASKS_MAX: usize = 4;

/// Key words must be longer than this many characters
const KEY_WORD_MIN_CHARS: usize = 4;

/// Leading phrases stripped from titles
static FILLER_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(I need to|I have to|I must|I should|I will|I want to|I am going to|I plan to)\s+")
        .expect("static regex")
});

/// Words that never count as key words
const FILLER_WORDS: [&str; 8] = ["need", "have", "must", "should", "will", "want", "going", "plan"];

/// Subtasks used when a statement has too little context
pub const GENERIC_SUBTASKS: [&str; 10] = [
    "Research and gather necessary information",
    "Create initial draft or outline",
    "Review and refine the content",
    "Get stakeholder feedback",
    "Make final revisions and improvements",
    "Prepare supporting documentation",
    "Schedule follow-up meeting if needed",
    "Document findings and results",
    "Organize and structure materials",
    "Test and validate the approach",
];

/// Used only if a template pool somehow has fewer than two entries
const DEFAULT_SUBTASKS: [&str; 2] = ["Plan the approach", "Work through the task"];

/// Fallback when the duration pool is empty
const DEFAULT_DURATION: u32 = 60;

/// Synthesize a complete pending Task from one statement
pub fn synthesize<R: Rng + ?Sized>(statement: &str, rng: &mut R) -> Task {
    let statement = statement.trim();
    debug!(statement_len = statement.len(), "synthesize: called");

    let word_count = rng.random_range(TITLE_WORDS_MIN..=TITLE_WORDS_MAX);
    let title = build_title(statement, word_count);

    let estimated_duration = *DURATION_OPTIONS.choose(rng).unwrap_or(&DEFAULT_DURATION);

    let subtask_count = rng.random_range(SUBTASKS_MIN..=SUBTASKS_MAX);
    let subtasks = pick_subtasks(&subtask_pool(statement), subtask_count, rng);

    let base = rng.random_range(MIN_PRIORITY..=MAX_PRIORITY);
    let priority_score = priority_score(base, estimated_duration);

    debug!(%title, estimated_duration, priority_score, subtasks = subtasks.len(), "synthesize: built task");
    Task::new(title, statement, estimated_duration, subtasks, priority_score)
}

/// Build a title from the first `word_count` words of a statement
///
/// Strips one leading filler phrase, uppercases the first character and
/// appends an ellipsis when words were left out.
pub fn build_title(statement: &str, word_count: usize) -> String {
    let words: Vec<&str> = statement.split_whitespace().collect();
    let taken = word_count.min(words.len());
    let head = words[..taken].join(" ");

    let stripped = FILLER_PREFIX.replace(&head, "");
    let mut title = if stripped.trim().is_empty() {
        capitalize_first(&head)
    } else {
        capitalize_first(&stripped)
    };

    if words.len() > taken && !title.ends_with(ELLIPSIS) {
        title.push_str(ELLIPSIS);
    }
    title
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Words that carry the statement's subject
///
/// Surrounding punctuation is trimmed before the length check.
pub fn key_words(statement: &str) -> Vec<&str> {
    statement
        .split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|word| word.chars().count() > KEY_WORD_MIN_CHARS)
        .filter(|word| !FILLER_WORDS.contains(&word.to_lowercase().as_str()))
        .collect()
}

/// Candidate subtasks for a statement
///
/// Context-aware templates when at least two key words exist, the generic
/// pool otherwise.
pub fn subtask_pool(statement: &str) -> Vec<String> {
    let keys = key_words(statement);
    if keys.len() < 2 {
        debug!("subtask_pool: using generic templates");
        return GENERIC_SUBTASKS.iter().map(|s| s.to_string()).collect();
    }

    let context = keys[..2].join(" ");
    debug!(%context, "subtask_pool: using contextual templates");
    vec![
        format!("Research and gather information about {}", context),
        format!("Create initial outline or plan for {}", context),
        format!("Draft the main content for {}", context),
        format!("Review and refine {}", context),
        format!("Get feedback on {}", context),
        format!("Make final revisions to {}", context),
        format!("Prepare supporting materials for {}", context),
        format!("Test and validate {}", context),
    ]
}

/// Draw `count` distinct subtasks from `pool` without replacement
///
/// `count` is clamped to 2..=4. A pool too small to supply two distinct
/// entries yields the fixed default pair.
pub fn pick_subtasks<R: Rng + ?Sized>(pool: &[String], count: usize, rng: &mut R) -> Vec<String> {
    let mut distinct: Vec<String> = Vec::with_capacity(pool.len());
    for entry in pool {
        if !distinct.contains(entry) {
            distinct.push(entry.clone());
        }
    }

    if distinct.len() < SUBTASKS_MIN {
        debug!(pool = pool.len(), "pick_subtasks: pool exhausted, using defaults");
        return DEFAULT_SUBTASKS.iter().map(|s| s.to_string()).collect();
    }

    distinct.shuffle(rng);
    distinct.truncate(count.clamp(SUBTASKS_MIN, SUBTASKS_MAX));
    distinct
}

/// Final priority: base plus duration boost, capped at 80, one decimal
pub fn priority_score(base: f64, estimated_duration: u32) -> f64 {
    round_tenth((base + duration_adjustment(estimated_duration)).clamp(MIN_PRIORITY, MAX_PRIORITY))
}
