//! Focus-session countdown

mod clock;
mod focus;

pub use clock::{Clock, ManualClock, SystemClock};
pub use focus::{CompletedSession, FocusTimer, TimerError, TimerSnapshot, TimerState};
