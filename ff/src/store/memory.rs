//! In-memory record store

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tracing::{debug, info};

use super::{RecordStore, StoreError};
use crate::domain::{DailyStatistics, Task, TaskId, TaskStatus, WorkSession};
use crate::timer::{Clock, SystemClock};

/// Process-local store used by the CLI and tests
#[derive(Debug)]
pub struct MemoryStore {
    tasks: RwLock<Vec<Task>>,
    sessions: RwLock<Vec<WorkSession>>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Store whose notion of "today" comes from `clock`
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        debug!("MemoryStore::with_clock: called");
        Self {
            tasks: RwLock::new(Vec::new()),
            sessions: RwLock::new(Vec::new()),
            clock,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("store lock poisoned".to_string())
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn save_task(&self, task: &Task) -> Result<(), StoreError> {
        debug!(task_id = %task.id, "MemoryStore::save_task: called");
        let mut tasks = self.tasks.write().map_err(poisoned)?;
        if tasks.iter().any(|t| t.id == task.id) {
            return Err(StoreError::Conflict(format!("Task {} already exists", task.id)));
        }
        tasks.push(task.clone());
        info!(task_id = %task.id, "Saved task");
        Ok(())
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        debug!("MemoryStore::list_tasks: called");
        let tasks = self.tasks.read().map_err(poisoned)?;
        let mut listed: Vec<Task> = tasks.iter().rev().cloned().collect();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listed)
    }

    async fn update_status(&self, id: &TaskId, status: TaskStatus) -> Result<(), StoreError> {
        debug!(task_id = %id, %status, "MemoryStore::update_status: called");
        let mut tasks = self.tasks.write().map_err(poisoned)?;
        let task = tasks
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("Task {}", id)))?;

        if task.status == status {
            debug!("MemoryStore::update_status: already in requested status");
            return Ok(());
        }
        let from = task.status;
        if !task.advance(status) {
            return Err(StoreError::Conflict(format!("Task {} cannot move from {} to {}", id, from, status)));
        }
        info!(task_id = %id, %from, to = %status, "Updated task status");
        Ok(())
    }

    async fn save_session(&self, session: &WorkSession) -> Result<(), StoreError> {
        debug!(session_id = %session.id, task_id = %session.task_id, "MemoryStore::save_session: called");
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        if sessions.iter().any(|s| s.id == session.id) {
            return Err(StoreError::Conflict(format!("Session {} already exists", session.id)));
        }
        sessions.push(session.clone());
        info!(session_id = %session.id, minutes = session.duration_minutes, "Saved work session");
        Ok(())
    }

    async fn daily_statistics(&self) -> Result<DailyStatistics, StoreError> {
        let today = self.clock.now().date_naive();
        debug!(%today, "MemoryStore::daily_statistics: called");
        let sessions = self.sessions.read().map_err(poisoned)?;
        Ok(DailyStatistics::for_day(sessions.iter(), today))
    }
}
