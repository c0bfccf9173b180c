//! Remote-first decomposition with a local fallback
//!
//! The caller always gets tasks back. When the remote engine is missing,
//! slow, failing, or returns garbage, the local engine handles the entry and
//! the result carries a reduced-fidelity notice.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::engine::LocalDecomposer;
use super::traits::{Decomposer, MAX_TASKS};
use crate::backend::BackendError;
use crate::domain::Task;

/// Notice shown when no remote engine is configured
pub const LOCAL_MODE_NOTICE: &str = "Using local task parsing (no AI backend configured). Results may vary.";

/// Which engine produced a decomposition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "engine", content = "name")]
pub enum DecompositionSource {
    Remote(String),
    Local,
}

impl fmt::Display for DecompositionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecompositionSource::Remote(name) => write!(f, "remote ({})", name),
            DecompositionSource::Local => write!(f, "local"),
        }
    }
}

/// Tasks plus where they came from
#[derive(Debug, Clone, Serialize)]
pub struct Decomposition {
    pub tasks: Vec<Task>,
    pub source: DecompositionSource,
    pub notice: Option<String>,
}

impl Decomposition {
    fn empty() -> Self {
        Self {
            tasks: Vec::new(),
            source: DecompositionSource::Local,
            notice: None,
        }
    }

    /// True when the local engine stood in for a better one
    pub fn is_reduced_fidelity(&self) -> bool {
        self.source == DecompositionSource::Local && self.notice.is_some()
    }
}

/// Decomposer chain: optional remote engine, then the local engine
pub struct FallbackDecomposer {
    primary: Option<Arc<dyn Decomposer>>,
    local: LocalDecomposer,
    timeout: Duration,
}

impl FallbackDecomposer {
    pub fn new(primary: Option<Arc<dyn Decomposer>>, local: LocalDecomposer, timeout: Duration) -> Self {
        debug!(has_primary = primary.is_some(), ?timeout, "FallbackDecomposer::new: called");
        Self { primary, local, timeout }
    }

    /// Chain with only the local engine
    pub fn local_only(local: LocalDecomposer) -> Self {
        Self::new(None, local, Duration::ZERO)
    }

    pub fn has_remote(&self) -> bool {
        self.primary.is_some()
    }

    /// Decompose journal text; never fails
    pub async fn decompose(&self, journal: &str) -> Decomposition {
        debug!(journal_len = journal.len(), "FallbackDecomposer::decompose: called");
        if journal.trim().is_empty() {
            debug!("FallbackDecomposer::decompose: blank input");
            return Decomposition::empty();
        }

        let Some(primary) = &self.primary else {
            return self.local(journal, LOCAL_MODE_NOTICE.to_string());
        };

        let name = primary.name().to_string();
        let err = match tokio::time::timeout(self.timeout, primary.decompose(journal)).await {
            Ok(Ok(mut tasks)) if !tasks.is_empty() => {
                tasks.truncate(MAX_TASKS);
                info!(engine = %name, task_count = tasks.len(), "Remote decomposition succeeded");
                return Decomposition {
                    tasks,
                    source: DecompositionSource::Remote(name),
                    notice: None,
                };
            }
            Ok(Ok(_)) => BackendError::Malformed("no tasks returned".to_string()),
            Ok(Err(e)) => e,
            Err(_) => BackendError::Timeout(self.timeout),
        };

        warn!(engine = %name, error = %err, "Remote decomposition failed, falling back to local");
        let notice = format!(
            "AI backend {} failed ({}); using local task parsing. Results may vary.",
            name,
            err.kind()
        );
        self.local(journal, notice)
    }

    fn local(&self, journal: &str, notice: String) -> Decomposition {
        Decomposition {
            tasks: self.local.decompose_now(journal),
            source: DecompositionSource::Local,
            notice: Some(notice),
        }
    }
}
