//! Record store contract
//!
//! The host persists tasks and finished sessions through [`RecordStore`].
//! Only an in-memory implementation ships here; durable engines plug in
//! behind the same trait.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{DailyStatistics, Task, TaskId, TaskStatus, WorkSession};

mod memory;

pub use memory::MemoryStore;

/// Store failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Persistence for tasks and work sessions
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a new task
    async fn save_task(&self, task: &Task) -> Result<(), StoreError>;

    /// All tasks, newest first
    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError>;

    /// Move a stored task to `status`
    async fn update_status(&self, id: &TaskId, status: TaskStatus) -> Result<(), StoreError>;

    /// Insert a finished work session
    async fn save_session(&self, session: &WorkSession) -> Result<(), StoreError>;

    /// Aggregates over today's sessions
    async fn daily_statistics(&self) -> Result<DailyStatistics, StoreError>;
}
