//! Explicit host state
//!
//! `AppState` owns the task list, the single active focus session, running
//! counters and the collaborators (decomposer, record store, coach). Every
//! interaction goes through a method on it; nothing lives in globals.

use std::str::FromStr;
use std::sync::Arc;

use eyre::{Result, eyre};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::backend::create_client;
use crate::coach::{CoachContext, CoachEvent, CoachMessenger};
use crate::config::Config;
use crate::decompose::{Decomposer, DecompositionSource, FallbackDecomposer, LocalDecomposer, RemoteDecomposer};
use crate::domain::{DailyStatistics, Task, TaskId, TaskStatus};
use crate::store::{MemoryStore, RecordStore, StoreError};
use crate::timer::{Clock, FocusTimer, SystemClock, TimerSnapshot, TimerState};

/// Task list ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Longest first
    Duration,
    /// Highest first
    #[default]
    Priority,
    /// Newest first
    Created,
    /// Alphabetical, case-insensitive
    Title,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "duration" => Ok(Self::Duration),
            "priority" => Ok(Self::Priority),
            "created" | "newest" => Ok(Self::Created),
            "title" => Ok(Self::Title),
            _ => Err(format!("Unknown sort key: {}", s)),
        }
    }
}

/// Task list filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl StatusFilter {
    fn matches(&self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Only(status) => task.status == *status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<TaskStatus>().map(Self::Only)
    }
}

/// Host settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub break_minutes: u32,
    pub coach_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            break_minutes: 15,
            coach_enabled: true,
        }
    }
}

impl From<&Config> for Settings {
    fn from(config: &Config) -> Self {
        Self {
            break_minutes: config.focus.break_minutes,
            coach_enabled: config.coach.enabled,
        }
    }
}

/// Running totals for this process
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionCounters {
    pub sessions_completed: u32,
    pub minutes_focused: u64,
}

/// Result of submitting a journal entry
#[derive(Debug)]
pub struct JournalOutcome {
    pub added: Vec<TaskId>,
    pub source: DecompositionSource,
    /// Reduced-fidelity notice, if the local engine was used
    pub notice: Option<String>,
    /// Store failures; the tasks are kept in memory regardless
    pub persist_errors: Vec<StoreError>,
}

/// Result of starting a focus session
#[derive(Debug)]
pub struct StartReport {
    pub task_id: TaskId,
    pub coach_message: Option<String>,
    pub persist_error: Option<StoreError>,
}

/// Result of completing a focus session
#[derive(Debug)]
pub struct CompletionReport {
    pub task_id: TaskId,
    pub actual_minutes: u32,
    pub coach_message: Option<String>,
    pub break_message: Option<String>,
    /// First store failure; the task stays completed in memory
    pub persist_error: Option<StoreError>,
}

struct ActiveSession {
    timer: FocusTimer,
    halfway_announced: bool,
}

/// Everything the host knows
pub struct AppState {
    tasks: Vec<Task>,
    active: Option<ActiveSession>,
    counters: SessionCounters,
    settings: Settings,
    decomposer: FallbackDecomposer,
    store: Arc<dyn RecordStore>,
    coach: CoachMessenger,
    rng: StdRng,
    clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(
        decomposer: FallbackDecomposer,
        store: Arc<dyn RecordStore>,
        clock: Arc<dyn Clock>,
        settings: Settings,
        seed: Option<u64>,
    ) -> Self {
        debug!(?settings, has_remote = decomposer.has_remote(), "AppState::new: called");
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            tasks: Vec::new(),
            active: None,
            counters: SessionCounters::default(),
            settings,
            decomposer,
            store,
            coach: CoachMessenger::new(),
            rng,
            clock,
        }
    }

    /// Build the host from configuration, with an in-memory store
    pub fn from_config(config: &Config) -> Result<Self> {
        debug!("AppState::from_config: called");
        config.validate()?;

        let local = LocalDecomposer::from_seed_option(config.decompose.seed);
        let primary = create_client(&config.remote)?
            .map(|client| Arc::new(RemoteDecomposer::new(client)) as Arc<dyn Decomposer>);
        let decomposer = FallbackDecomposer::new(primary, local, config.remote.timeout());

        Ok(Self::new(
            decomposer,
            Arc::new(MemoryStore::new()),
            Arc::new(SystemClock),
            Settings::from(config),
            config.decompose.seed,
        ))
    }

    pub fn counters(&self) -> SessionCounters {
        self.counters
    }

    /// All tasks in insertion order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// Decompose a journal entry and keep the resulting tasks
    pub async fn submit_journal(&mut self, journal: &str) -> JournalOutcome {
        debug!(journal_len = journal.len(), "AppState::submit_journal: called");
        let decomposition = self.decomposer.decompose(journal).await;
        if let Some(notice) = &decomposition.notice {
            warn!(%notice, "Reduced-fidelity decomposition");
        }

        let mut added = Vec::with_capacity(decomposition.tasks.len());
        let mut persist_errors = Vec::new();
        for task in decomposition.tasks {
            if let Err(e) = self.store.save_task(&task).await {
                warn!(task_id = %task.id, error = %e, "Failed to persist task");
                persist_errors.push(e);
            }
            added.push(task.id.clone());
            self.tasks.push(task);
        }
        info!(added = added.len(), source = %decomposition.source, "Journal entry decomposed");

        JournalOutcome {
            added,
            source: decomposition.source,
            notice: decomposition.notice,
            persist_errors,
        }
    }

    /// Bind the timer to a task and start counting down
    pub async fn start_task(&mut self, id: &TaskId) -> Result<StartReport> {
        debug!(task_id = %id, "AppState::start_task: called");
        if let Some(active) = &self.active {
            return Err(eyre!("Task {} already has an active focus session", active.timer.task_id()));
        }

        let task = self
            .tasks
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| eyre!("Unknown task: {}", id))?;
        let timer = FocusTimer::start(task, self.clock.clone())?;
        let context = CoachContext::new(task.title.clone(), task.estimated_duration);

        let persist_error = self.store.update_status(id, TaskStatus::InProgress).await.err();
        if let Some(e) = &persist_error {
            warn!(task_id = %id, error = %e, "Failed to persist task status");
        }

        self.active = Some(ActiveSession {
            timer,
            halfway_announced: false,
        });

        Ok(StartReport {
            task_id: id.clone(),
            coach_message: self.coach_message(CoachEvent::SessionStart, &context),
            persist_error,
        })
    }

    /// Pause the active session; false when there is nothing to pause
    pub fn pause(&mut self) -> bool {
        self.active.as_mut().is_some_and(|active| active.timer.pause())
    }

    /// Resume the active session; false when there is nothing to resume
    pub fn resume(&mut self) -> bool {
        self.active.as_mut().is_some_and(|active| active.timer.resume())
    }

    /// Re-evaluate the active session
    ///
    /// Returns the halfway coach message the first time progress reaches
    /// one half.
    pub fn tick(&mut self) -> Option<String> {
        let active = self.active.as_mut()?;
        if active.halfway_announced || active.timer.progress() < 0.5 {
            return None;
        }
        if active.timer.state() == TimerState::Completed {
            return None;
        }
        active.halfway_announced = true;
        let task_id = active.timer.task_id().clone();
        debug!(%task_id, "AppState::tick: halfway reached");

        let context = match self.task(&task_id) {
            Some(task) => CoachContext::new(task.title.clone(), task.estimated_duration),
            None => CoachContext::default(),
        };
        self.coach_message(CoachEvent::Halfway, &context)
    }

    /// Finish the active session and record it
    pub async fn complete(&mut self) -> Result<CompletionReport> {
        debug!("AppState::complete: called");
        let mut active = self.active.take().ok_or_else(|| eyre!("No active focus session"))?;
        let task_id = active.timer.task_id().clone();

        let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) else {
            return Err(eyre!("Active task {} is missing", task_id));
        };
        let Some(session) = active.timer.complete(task) else {
            return Err(eyre!("Focus session for {} was already completed", task_id));
        };
        let context = CoachContext::new(task.title.clone(), task.estimated_duration)
            .with_break_minutes(self.settings.break_minutes);

        self.counters.sessions_completed += 1;
        self.counters.minutes_focused += u64::from(session.actual_minutes);

        let mut persist_error = self.store.update_status(&task_id, TaskStatus::Completed).await.err();
        if let Err(e) = self.store.save_session(&session.to_work_session()).await {
            if persist_error.is_none() {
                persist_error = Some(e);
            }
        }
        if let Some(e) = &persist_error {
            warn!(%task_id, error = %e, "Failed to persist completed session");
        }

        Ok(CompletionReport {
            task_id,
            actual_minutes: session.actual_minutes,
            coach_message: self.coach_message(CoachEvent::Completion, &context),
            break_message: self.coach_message(CoachEvent::Break, &context),
            persist_error,
        })
    }

    /// Current timer view; idle when no session is active
    pub fn timer_snapshot(&self) -> TimerSnapshot {
        match &self.active {
            Some(active) => active.timer.snapshot(),
            None => TimerSnapshot::idle(),
        }
    }

    /// Tasks matching `filter`, ordered by `sort`
    pub fn sorted_tasks(&self, sort: SortKey, filter: StatusFilter) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self.tasks.iter().filter(|t| filter.matches(t)).collect();
        match sort {
            SortKey::Duration => tasks.sort_by(|a, b| b.estimated_duration.cmp(&a.estimated_duration)),
            SortKey::Priority => tasks.sort_by(|a, b| b.priority_score.total_cmp(&a.priority_score)),
            SortKey::Created => tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortKey::Title => tasks.sort_by_key(|t| t.title.to_lowercase()),
        }
        tasks
    }

    pub async fn daily_statistics(&self) -> Result<DailyStatistics, StoreError> {
        self.store.daily_statistics().await
    }

    /// Coach message for an event, unless coaching is turned off
    pub fn coach_message(&mut self, event: CoachEvent, context: &CoachContext) -> Option<String> {
        if !self.settings.coach_enabled {
            return None;
        }
        let context = context.clone().with_break_minutes(
            context.break_minutes.unwrap_or(self.settings.break_minutes),
        );
        Some(self.coach.message_for(event, &context, &mut self.rng))
    }
}
