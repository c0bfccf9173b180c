//! Countdown for one active task
//!
//! The timer never ticks. It stores the remaining time as of its last
//! transition plus the instant that transition happened (the anchor), and
//! every read recomputes the live value from the clock. Polling frequency
//! therefore has no effect on accuracy.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::clock::Clock;
use crate::domain::{Task, TaskId, TaskStatus, WorkSession};

/// Timer failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimerError {
    #[error("Task {0} is already completed")]
    TaskCompleted(TaskId),
}

/// Observable timer state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    /// No timer bound to a task
    Idle,
    Running,
    Paused,
    Completed,
    /// Running with nothing left on the clock
    Expired,
}

impl std::fmt::Display for TimerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Paused => write!(f, "paused"),
            Self::Completed => write!(f, "completed"),
            Self::Expired => write!(f, "expired"),
        }
    }
}

/// Point-in-time view for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub task_id: Option<TaskId>,
    pub remaining_seconds: u64,
    pub total_seconds: u64,
    /// Fraction elapsed, 0.0..=1.0
    pub progress: f64,
}

impl TimerSnapshot {
    pub fn idle() -> Self {
        Self {
            state: TimerState::Idle,
            task_id: None,
            remaining_seconds: 0,
            total_seconds: 0,
            progress: 0.0,
        }
    }

    /// Remaining time as `MM:SS`
    pub fn remaining_display(&self) -> String {
        format!("{:02}:{:02}", self.remaining_seconds / 60, self.remaining_seconds % 60)
    }
}

/// Outcome of completing a timer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedSession {
    pub task_id: TaskId,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    /// Whole minutes actually spent
    pub actual_minutes: u32,
}

impl CompletedSession {
    /// Record for the session store
    pub fn to_work_session(&self) -> WorkSession {
        WorkSession::new(self.task_id.clone(), self.started_at, self.actual_minutes, true)
    }
}

/// Countdown state machine bound to one task
#[derive(Debug)]
pub struct FocusTimer {
    task_id: TaskId,
    total_seconds: u64,
    remaining: Duration,
    running: bool,
    anchor: DateTime<Utc>,
    started_at: DateTime<Utc>,
    completed: bool,
    clock: Arc<dyn Clock>,
}

impl FocusTimer {
    /// Start a running timer for `total_seconds`
    pub fn new(task_id: TaskId, total_seconds: u64, clock: Arc<dyn Clock>) -> Self {
        let now = clock.now();
        debug!(%task_id, total_seconds, "FocusTimer::new: called");
        Self {
            task_id,
            total_seconds,
            remaining: Duration::from_secs(total_seconds),
            running: true,
            anchor: now,
            started_at: now,
            completed: false,
            clock,
        }
    }

    /// Start a timer on a task and mark it in progress
    pub fn start(task: &mut Task, clock: Arc<dyn Clock>) -> Result<Self, TimerError> {
        debug!(task_id = %task.id, status = %task.status, "FocusTimer::start: called");
        if task.is_completed() {
            warn!(task_id = %task.id, "Refusing to start a timer on a completed task");
            return Err(TimerError::TaskCompleted(task.id.clone()));
        }
        task.advance(TaskStatus::InProgress);
        let timer = Self::new(task.id.clone(), task.total_seconds(), clock);
        info!(task_id = %task.id, minutes = task.estimated_duration, "Focus session started");
        Ok(timer)
    }

    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    pub fn total_seconds(&self) -> u64 {
        self.total_seconds
    }

    /// Time since the anchor; a clock that went backwards counts as zero
    fn elapsed(&self) -> Duration {
        (self.clock.now() - self.anchor).to_std().unwrap_or(Duration::ZERO)
    }

    /// Live remaining time; a pure read
    pub fn current_remaining(&self) -> Duration {
        if self.running {
            self.remaining.saturating_sub(self.elapsed())
        } else {
            self.remaining
        }
    }

    /// Live remaining time in whole seconds, rounded up
    pub fn remaining_seconds(&self) -> u64 {
        let remaining = self.current_remaining();
        remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0)
    }

    /// Fraction of the countdown used, clamped to 0.0..=1.0
    pub fn progress(&self) -> f64 {
        if self.total_seconds == 0 {
            return 1.0;
        }
        let remaining = self.current_remaining().as_secs_f64();
        (1.0 - remaining / self.total_seconds as f64).clamp(0.0, 1.0)
    }

    pub fn state(&self) -> TimerState {
        if self.completed {
            TimerState::Completed
        } else if !self.running {
            TimerState::Paused
        } else if self.current_remaining().is_zero() {
            TimerState::Expired
        } else {
            TimerState::Running
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == TimerState::Running
    }

    /// Freeze the countdown; returns whether the timer was running
    pub fn pause(&mut self) -> bool {
        debug!(task_id = %self.task_id, state = %self.state(), "FocusTimer::pause: called");
        if self.state() != TimerState::Running {
            debug!("FocusTimer::pause: not running, ignoring");
            return false;
        }
        let now = self.clock.now();
        self.remaining = self.current_remaining();
        self.anchor = now;
        self.running = false;
        info!(task_id = %self.task_id, remaining_secs = self.remaining.as_secs(), "Focus session paused");
        true
    }

    /// Continue a paused countdown with time left; returns whether it resumed
    pub fn resume(&mut self) -> bool {
        debug!(task_id = %self.task_id, state = %self.state(), "FocusTimer::resume: called");
        if self.state() != TimerState::Paused || self.remaining.is_zero() {
            debug!("FocusTimer::resume: not resumable, ignoring");
            return false;
        }
        self.anchor = self.clock.now();
        self.running = true;
        info!(task_id = %self.task_id, remaining_secs = self.remaining.as_secs(), "Focus session resumed");
        true
    }

    /// Finish the session and mark the task completed
    ///
    /// Returns None for a second completion or a task this timer is not
    /// bound to.
    pub fn complete(&mut self, task: &mut Task) -> Option<CompletedSession> {
        debug!(task_id = %self.task_id, state = %self.state(), "FocusTimer::complete: called");
        if self.completed {
            debug!("FocusTimer::complete: already completed");
            return None;
        }
        if task.id != self.task_id {
            warn!(timer_task = %self.task_id, task = %task.id, "Completion requested for a task this timer does not own");
            return None;
        }

        let now = self.clock.now();
        self.remaining = self.current_remaining();
        self.anchor = now;
        self.running = false;
        self.completed = true;
        task.advance(TaskStatus::Completed);

        let worked = Duration::from_secs(self.total_seconds).saturating_sub(self.remaining);
        let actual_minutes = u32::try_from(worked.as_secs() / 60).unwrap_or(u32::MAX);
        info!(task_id = %self.task_id, actual_minutes, "Focus session completed");

        Some(CompletedSession {
            task_id: self.task_id.clone(),
            started_at: self.started_at,
            completed_at: now,
            actual_minutes,
        })
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            state: self.state(),
            task_id: Some(self.task_id.clone()),
            remaining_seconds: self.remaining_seconds(),
            total_seconds: self.total_seconds,
            progress: self.progress(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::ManualClock;
    use chrono::TimeZone;

    const MINUTE: Duration = Duration::from_secs(60);

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()))
    }

    fn task(minutes: u32) -> Task {
        Task::new("Write report", "Write the quarterly report", minutes, vec![], 60.0)
    }

    #[test]
    fn test_start_marks_task_in_progress() {
        let clock = clock();
        let mut task = task(60);
        let timer = FocusTimer::start(&mut task, clock).unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(timer.total_seconds(), 3600);
        assert_eq!(timer.remaining_seconds(), 3600);
        assert_eq!(timer.state(), TimerState::Running);
        assert_eq!(timer.progress(), 0.0);
    }

    #[test]
    fn test_start_rejects_completed_task() {
        let mut task = task(30);
        task.status = TaskStatus::Completed;
        let err = FocusTimer::start(&mut task, clock()).unwrap_err();
        assert_eq!(err, TimerError::TaskCompleted(task.id.clone()));
    }

    #[test]
    fn test_read_is_idempotent() {
        let clock = clock();
        let timer = FocusTimer::start(&mut task(45), clock.clone()).unwrap();
        clock.advance(Duration::from_millis(123_456));
        assert_eq!(timer.current_remaining(), timer.current_remaining());
        assert_eq!(timer.snapshot(), timer.snapshot());
    }

    #[test]
    fn test_running_reads_are_non_increasing() {
        let clock = clock();
        let timer = FocusTimer::start(&mut task(30), clock.clone()).unwrap();
        let mut last = timer.current_remaining();
        for step in [1, 59, 600, 0, 3000, 1] {
            clock.advance(Duration::from_secs(step));
            let now = timer.current_remaining();
            assert!(now <= last);
            last = now;
        }
        assert_eq!(last, Duration::ZERO);
    }

    #[test]
    fn test_pause_resume_round_trip() {
        let clock = clock();
        let mut timer = FocusTimer::start(&mut task(60), clock.clone()).unwrap();
        clock.advance(10 * MINUTE);
        assert!(timer.pause());
        assert_eq!(timer.state(), TimerState::Paused);

        clock.advance(180 * MINUTE);
        assert_eq!(timer.current_remaining(), 50 * MINUTE);
        assert!(timer.resume());
        assert_eq!(timer.current_remaining(), 50 * MINUTE);

        clock.advance(5 * MINUTE);
        assert_eq!(timer.current_remaining(), 45 * MINUTE);
    }

    #[test]
    fn test_pause_and_resume_noops() {
        let clock = clock();
        let mut timer = FocusTimer::start(&mut task(30), clock.clone()).unwrap();
        assert!(!timer.resume());
        assert!(timer.pause());
        assert!(!timer.pause());
        assert!(timer.resume());
        assert!(!timer.resume());
    }

    #[test]
    fn test_expiry_is_derived() {
        let clock = clock();
        let mut timer = FocusTimer::start(&mut task(30), clock.clone()).unwrap();
        clock.advance(31 * MINUTE);
        assert_eq!(timer.state(), TimerState::Expired);
        assert_eq!(timer.remaining_seconds(), 0);
        assert_eq!(timer.progress(), 1.0);
        assert!(!timer.pause());
        assert!(!timer.resume());
    }

    #[test]
    fn test_complete_immediately() {
        let clock = clock();
        let mut task = task(30);
        let mut timer = FocusTimer::start(&mut task, clock).unwrap();
        let session = timer.complete(&mut task).unwrap();
        assert_eq!(session.actual_minutes, 0);
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(timer.state(), TimerState::Completed);
    }

    #[test]
    fn test_complete_floors_minutes() {
        let clock = clock();
        let mut task = task(60);
        let mut timer = FocusTimer::start(&mut task, clock.clone()).unwrap();
        clock.advance(Duration::from_secs(25 * 60 + 59));
        let session = timer.complete(&mut task).unwrap();
        assert_eq!(session.actual_minutes, 25);
        assert_eq!(session.completed_at - session.started_at, chrono::Duration::seconds(25 * 60 + 59));

        let record = session.to_work_session();
        assert_eq!(record.duration_minutes, 25);
        assert!(record.completed);
    }

    #[test]
    fn test_complete_after_expiry_and_while_paused() {
        let clock = clock();
        let mut expired_task = task(30);
        let mut timer = FocusTimer::start(&mut expired_task, clock.clone()).unwrap();
        clock.advance(40 * MINUTE);
        assert_eq!(timer.complete(&mut expired_task).unwrap().actual_minutes, 30);

        let mut paused_task = task(45);
        let mut timer = FocusTimer::start(&mut paused_task, clock.clone()).unwrap();
        clock.advance(20 * MINUTE);
        timer.pause();
        clock.advance(60 * MINUTE);
        assert_eq!(timer.complete(&mut paused_task).unwrap().actual_minutes, 20);
    }

    #[test]
    fn test_second_complete_is_noop() {
        let clock = clock();
        let mut task = task(30);
        let mut timer = FocusTimer::start(&mut task, clock).unwrap();
        assert!(timer.complete(&mut task).is_some());
        assert!(timer.complete(&mut task).is_none());
        assert!(!timer.pause());
        assert!(!timer.resume());
    }

    #[test]
    fn test_complete_rejects_foreign_task() {
        let clock = clock();
        let mut owned = task(30);
        let mut other = task(30);
        let mut timer = FocusTimer::start(&mut owned, clock).unwrap();
        assert!(timer.complete(&mut other).is_none());
        assert_eq!(other.status, TaskStatus::Pending);
        assert_eq!(timer.state(), TimerState::Running);
    }

    #[test]
    fn test_zero_total_progress() {
        let timer = FocusTimer::new(TaskId::from("t"), 0, clock());
        assert_eq!(timer.progress(), 1.0);
        assert_eq!(timer.state(), TimerState::Expired);
    }

    #[test]
    fn test_backwards_clock_counts_as_zero() {
        let clock = clock();
        let start = clock.now();
        let timer = FocusTimer::start(&mut task(30), clock.clone()).unwrap();
        clock.set(start - chrono::Duration::minutes(10));
        assert_eq!(timer.current_remaining(), 30 * MINUTE);
    }

    #[test]
    fn test_snapshot_fields() {
        let clock = clock();
        let mut task = task(30);
        let timer = FocusTimer::start(&mut task, clock.clone()).unwrap();
        clock.advance(Duration::from_secs(15 * 60 + 30));
        let snapshot = timer.snapshot();
        assert_eq!(snapshot.state, TimerState::Running);
        assert_eq!(snapshot.task_id, Some(task.id.clone()));
        assert_eq!(snapshot.remaining_seconds, 14 * 60 + 30);
        assert_eq!(snapshot.remaining_display(), "14:30");
        assert!((snapshot.progress - (15.5 / 30.0)).abs() < 1e-9);
    }

    #[test]
    fn test_idle_snapshot() {
        let idle = TimerSnapshot::idle();
        assert_eq!(idle.state, TimerState::Idle);
        assert!(idle.task_id.is_none());
    }
}
