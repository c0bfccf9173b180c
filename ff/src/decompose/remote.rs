//! Remote decomposition through a completion backend

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::payload::TaskPayload;
use super::traits::{Decomposer, MAX_TASKS};
use crate::backend::{BackendError, CompletionClient};
use crate::domain::Task;

/// Instructions sent ahead of the journal text
const DECOMPOSE_PROMPT: &str = r#"You are a productivity assistant. Break the journal entry below into between 3 and 5 actionable tasks, in the order they are mentioned.

Reply with ONLY a JSON array. Each element must be an object with these fields:
- "title": a short action-oriented title
- "description": the task in one sentence
- "estimated_duration": minutes, one of 30, 45, 60, 75, 90, 120
- "subtasks": 2 to 4 short concrete steps
- "priority_score": a number between 40 and 80

Journal entry:
"#;

/// Decomposer that asks a completion backend and validates its reply
pub struct RemoteDecomposer {
    client: Arc<dyn CompletionClient>,
}

impl RemoteDecomposer {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        debug!(model = %client.model(), "RemoteDecomposer::new: called");
        Self { client }
    }

    /// Full prompt for one journal entry
    pub fn build_prompt(journal: &str) -> String {
        format!("{}{}\n", DECOMPOSE_PROMPT, journal.trim())
    }
}

#[async_trait]
impl Decomposer for RemoteDecomposer {
    fn name(&self) -> &str {
        self.client.model()
    }

    async fn decompose(&self, journal: &str) -> Result<Vec<Task>, BackendError> {
        debug!(journal_len = journal.len(), "RemoteDecomposer::decompose: called");
        if journal.trim().is_empty() {
            return Ok(Vec::new());
        }

        let reply = self.client.complete(&Self::build_prompt(journal)).await?;
        let tasks = parse_reply(&reply)?;
        info!(model = %self.client.model(), task_count = tasks.len(), "Remote decomposition produced {} tasks", tasks.len());
        Ok(tasks)
    }
}

/// Strip a surrounding markdown code fence, with or without a language tag
pub fn strip_code_fence(raw: &str) -> &str {
    let mut body = raw.trim();
    if let Some(rest) = body.strip_prefix("```") {
        body = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    }
    if let Some(rest) = body.strip_suffix("```") {
        body = rest;
    }
    body.trim()
}

/// Parse a backend reply into validated tasks
///
/// The reply must be a JSON array. Elements that fail validation are
/// skipped; a reply with no valid element is malformed.
pub fn parse_reply(raw: &str) -> Result<Vec<Task>, BackendError> {
    let body = strip_code_fence(raw);
    debug!(body_len = body.len(), "parse_reply: called");

    let items = match serde_json::from_str::<Value>(body)? {
        Value::Array(items) => items,
        other => {
            return Err(BackendError::Malformed(format!(
                "expected a JSON array, got {}",
                json_kind(&other)
            )));
        }
    };

    let mut tasks = Vec::new();
    for (index, item) in items.into_iter().enumerate() {
        if tasks.len() == MAX_TASKS {
            debug!(index, "parse_reply: task limit reached");
            break;
        }
        let payload = match serde_json::from_value::<TaskPayload>(item) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(index, error = %e, "Skipping reply element that is not a task object");
                continue;
            }
        };
        match payload.into_task() {
            Ok(task) => tasks.push(task),
            Err(e) => warn!(index, error = %e, "Skipping invalid task in reply"),
        }
    }

    if tasks.is_empty() {
        return Err(BackendError::Malformed("no valid tasks in reply".to_string()));
    }
    Ok(tasks)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
