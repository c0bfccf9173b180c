//! Decomposer trait definition

use async_trait::async_trait;

use crate::backend::BackendError;
use crate::domain::Task;

/// Most tasks a single decomposition may return
pub const MAX_TASKS: usize = 5;

/// Fewest tasks a decomposition aims for when enough statements exist
pub const MIN_TASKS: usize = 3;

/// Turns a journal entry into an ordered list of pending tasks
///
/// Implementations must return at most `MAX_TASKS` tasks, in the order their
/// source statements appear, and an empty list for whitespace-only input.
/// The local engine never fails; remote engines report failures so the
/// caller can fall back.
#[async_trait]
pub trait Decomposer: Send + Sync {
    /// Short name used in logs and notices
    fn name(&self) -> &str;

    /// Decompose journal text into tasks
    async fn decompose(&self, journal: &str) -> Result<Vec<Task>, BackendError>;
}
