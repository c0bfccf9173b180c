//! Domain types for FocusFlow
//!
//! Core records: Task and WorkSession. Both are plain serde structs so the
//! record store and any remote backend can exchange them.

mod id;
mod session;
mod task;

pub use id::{TaskId, TaskResolver};
pub use session::{DailyStatistics, WorkSession};
pub use task::{
    DURATION_OPTIONS, MAX_DURATION, MAX_PRIORITY, MIN_DURATION, MIN_PRIORITY, Task, TaskStatus, duration_adjustment,
    round_tenth, snap_duration,
};
