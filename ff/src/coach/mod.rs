//! Motivational coach messages keyed by session event
//!
//! Messages are picked at random from a fixed pool per event and rendered
//! with Handlebars. Rendering never fails and never HTML-escapes.

mod messenger;
pub mod templates;

use std::fmt;
use std::str::FromStr;

pub use messenger::{CoachContext, CoachMessenger, DEFAULT_BREAK_MINUTES, DEFAULT_DURATION, DEFAULT_TASK};

/// Focus-session event a message is written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoachEvent {
    SessionStart,
    Halfway,
    Break,
    Completion,
}

impl CoachEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SessionStart => "session_start",
            Self::Halfway => "halfway",
            Self::Break => "break",
            Self::Completion => "completion",
        }
    }
}

impl fmt::Display for CoachEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoachEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "session_start" | "start" => Ok(Self::SessionStart),
            "halfway" => Ok(Self::Halfway),
            "break" => Ok(Self::Break),
            "completion" | "complete" => Ok(Self::Completion),
            _ => Err(format!("Unknown coach event: {}", s)),
        }
    }
}
