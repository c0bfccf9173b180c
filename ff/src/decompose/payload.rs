//! Validation of untrusted task payloads
//!
//! Remote backends return loosely-typed JSON objects. Every field is read
//! as a raw `serde_json::Value` and converted here, so a missing or oddly
//! typed field is defaulted at the boundary instead of failing later.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::synthesizer::{GENERIC_SUBTASKS, SUBTASKS_MAX, SUBTASKS_MIN, TITLE_WORDS_MAX, build_title};
use crate::domain::{MAX_PRIORITY, MIN_PRIORITY, Task, duration_adjustment, round_tenth, snap_duration};

/// Longest title accepted from a payload, in characters
pub const TITLE_MAX_CHARS: usize = 80;

/// Duration used when a payload has none
pub const DEFAULT_PAYLOAD_DURATION: u32 = 60;

/// Base priority for payloads without a usable score
const DEFAULT_PAYLOAD_PRIORITY: f64 = 60.0;

/// Payload validation failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("Payload has neither a title nor a description")]
    Empty,
}

/// A task as described by an external backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskPayload {
    pub title: Option<Value>,
    pub description: Option<Value>,
    pub estimated_duration: Option<Value>,
    pub subtasks: Option<Value>,
    pub priority_score: Option<Value>,
}

impl TaskPayload {
    /// Validate into a pending Task
    pub fn into_task(self) -> Result<Task, PayloadError> {
        let title = self.title.as_ref().and_then(text);
        let description = self.description.as_ref().and_then(text);
        debug!(?title, has_description = description.is_some(), "TaskPayload::into_task: called");

        let (title, description) = match (title, description) {
            (Some(title), Some(description)) => (cap_title(&title), description),
            (Some(title), None) => (cap_title(&title), title),
            (None, Some(description)) => (cap_title(&build_title(&description, TITLE_WORDS_MAX)), description),
            (None, None) => return Err(PayloadError::Empty),
        };

        let estimated_duration = self
            .estimated_duration
            .as_ref()
            .and_then(number)
            .map(snap_duration)
            .unwrap_or(DEFAULT_PAYLOAD_DURATION);

        let subtasks = clean_subtasks(self.subtasks.as_ref());

        let priority_score = match self.priority_score.as_ref().and_then(number) {
            Some(score) => round_tenth(score.clamp(MIN_PRIORITY, MAX_PRIORITY)),
            None => round_tenth((DEFAULT_PAYLOAD_PRIORITY + duration_adjustment(estimated_duration)).min(MAX_PRIORITY)),
        };

        Ok(Task::new(title, description, estimated_duration, subtasks, priority_score))
    }
}

/// Non-blank string content with whitespace collapsed
fn text(value: &Value) -> Option<String> {
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    (!collapsed.is_empty()).then_some(collapsed)
}

/// Finite number from a JSON number or numeric string
fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

fn cap_title(title: &str) -> String {
    if title.chars().count() <= TITLE_MAX_CHARS {
        return title.to_string();
    }
    let keep = TITLE_MAX_CHARS - super::synthesizer::ELLIPSIS.len();
    let mut capped: String = title.chars().take(keep).collect();
    capped.push_str(super::synthesizer::ELLIPSIS);
    capped
}

/// Trim, dedupe and bound subtasks, padding from the generic pool
fn clean_subtasks(value: Option<&Value>) -> Vec<String> {
    let mut subtasks: Vec<String> = Vec::new();
    if let Some(Value::Array(items)) = value {
        for item in items.iter().filter_map(text) {
            if subtasks.len() == SUBTASKS_MAX {
                break;
            }
            if !subtasks.contains(&item) {
                subtasks.push(item);
            }
        }
    }

    for generic in GENERIC_SUBTASKS {
        if subtasks.len() >= SUBTASKS_MIN {
            break;
        }
        if !subtasks.iter().any(|s| s == generic) {
            subtasks.push(generic.to_string());
        }
    }
    subtasks
}
