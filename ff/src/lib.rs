//! FocusFlow - journal-to-task decomposition and focus sessions
//!
//! A user writes a free-form journal entry; FocusFlow breaks it into a few
//! actionable tasks and runs a countdown focus session on one of them.
//!
//! # Core Concepts
//!
//! - **Always an answer**: the local decomposition engine never fails, and a
//!   remote engine only ever sits in front of it
//! - **Injected randomness**: every random choice comes from a caller-owned
//!   generator, so seeded runs are reproducible
//! - **Derived time**: the focus timer stores an anchor instant and computes
//!   remaining time on every read instead of ticking
//! - **Explicit state**: the host keeps all session state in [`AppState`]
//!
//! # Modules
//!
//! - [`domain`] - Task, WorkSession and statistics types
//! - [`decompose`] - Local engine, remote engine and fallback chain
//! - [`backend`] - Completion clients for remote decomposition
//! - [`timer`] - Focus-session state machine and clocks
//! - [`coach`] - Motivational messages
//! - [`store`] - Record store contract and in-memory store
//! - [`app`] - Host state wiring the above together
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod app;
pub mod backend;
pub mod cli;
pub mod coach;
pub mod config;
pub mod decompose;
pub mod domain;
pub mod store;
pub mod timer;

pub use app::{AppState, CompletionReport, JournalOutcome, Settings, SortKey, StatusFilter};
pub use backend::{BackendError, CommandClient, CompletionClient, create_client};
pub use coach::{CoachContext, CoachEvent, CoachMessenger};
pub use config::{Config, RemoteConfig};
pub use decompose::{Decomposer, Decomposition, DecompositionSource, FallbackDecomposer, LocalDecomposer, RemoteDecomposer};
pub use domain::{DailyStatistics, Task, TaskId, TaskStatus, WorkSession};
pub use store::{MemoryStore, RecordStore, StoreError};
pub use timer::{Clock, FocusTimer, ManualClock, SystemClock, TimerError, TimerSnapshot, TimerState};
