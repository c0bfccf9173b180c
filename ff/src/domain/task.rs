//! Task record
//!
//! A Task is one actionable unit of work synthesized from a journal entry.
//! Status only ever moves forward: pending -> in_progress -> completed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::id::TaskId;

/// Allowed estimated durations in minutes
pub const DURATION_OPTIONS: [u32; 6] = [30, 45, 60, 75, 90, 120];

/// Shortest allowed duration
pub const MIN_DURATION: u32 = 30;

/// Longest allowed duration
pub const MAX_DURATION: u32 = 120;

/// Lower bound of the priority score
pub const MIN_PRIORITY: f64 = 40.0;

/// Upper bound of the priority score
pub const MAX_PRIORITY: f64 = 80.0;

/// Largest boost a long task adds to its priority
pub const DURATION_PRIORITY_BOOST: f64 = 10.0;

/// Workflow status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not yet started
    #[default]
    Pending,
    /// Bound to a focus timer
    InProgress,
    /// Done; never reopened
    Completed,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("Unknown task status: {}", s)),
        }
    }
}

/// A structured unit of work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,

    /// Short human-readable label
    pub title: String,

    /// Full originating statement
    pub description: String,

    /// Estimated duration in minutes (one of DURATION_OPTIONS)
    pub estimated_duration: u32,

    /// Advisory sub-steps, 2..=4, no duplicates
    pub subtasks: Vec<String>,

    /// Current status
    pub status: TaskStatus,

    /// Heuristic ranking in [40, 80]
    pub priority_score: f64,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a pending task with a fresh ID
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        estimated_duration: u32,
        subtasks: Vec<String>,
        priority_score: f64,
    ) -> Self {
        Self {
            id: TaskId::generate(),
            title: title.into(),
            description: description.into(),
            estimated_duration,
            subtasks,
            status: TaskStatus::Pending,
            priority_score,
            created_at: Utc::now(),
        }
    }

    /// Move the task forward to `status`
    ///
    /// Returns false (and leaves the task untouched) for a same-state or
    /// backwards transition.
    pub fn advance(&mut self, status: TaskStatus) -> bool {
        debug!(task_id = %self.id, from = %self.status, to = %status, "Task::advance: called");
        if status <= self.status {
            debug!("Task::advance: rejected non-forward transition");
            return false;
        }
        self.status = status;
        true
    }

    /// Check if the task is completed
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Estimated duration in seconds
    pub fn total_seconds(&self) -> u64 {
        u64::from(self.estimated_duration) * 60
    }
}

/// Priority boost for a duration: 0 at 30 minutes, +10 at 120 minutes
pub fn duration_adjustment(estimated_duration: u32) -> f64 {
    let span = f64::from(MAX_DURATION - MIN_DURATION);
    let offset = f64::from(estimated_duration.clamp(MIN_DURATION, MAX_DURATION) - MIN_DURATION);
    offset / span * DURATION_PRIORITY_BOOST
}

/// Round to one decimal place
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Snap an arbitrary minute count to the nearest allowed duration
///
/// Ties resolve to the shorter option.
pub fn snap_duration(minutes: f64) -> u32 {
    let mut best = DURATION_OPTIONS[0];
    let mut best_distance = f64::INFINITY;
    for option in DURATION_OPTIONS {
        let distance = (f64::from(option) - minutes).abs();
        if distance < best_distance {
            best = option;
            best_distance = distance;
        }
    }
    best
}
