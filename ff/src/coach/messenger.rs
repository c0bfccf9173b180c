//! Template-based coach messages

use handlebars::Handlebars;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;
use tracing::{debug, warn};

use super::templates;
use super::CoachEvent;

/// Task name used when none is given
pub const DEFAULT_TASK: &str = "this task";

/// Session length used when none is given
pub const DEFAULT_DURATION: u32 = 90;

/// Break length used when none is given
pub const DEFAULT_BREAK_MINUTES: u32 = 15;

/// Values substituted into a message
#[derive(Debug, Clone, Default)]
pub struct CoachContext {
    pub task: Option<String>,
    pub duration: Option<u32>,
    pub break_minutes: Option<u32>,
}

impl CoachContext {
    pub fn new(task: impl Into<String>, duration: u32) -> Self {
        Self {
            task: Some(task.into()),
            duration: Some(duration),
            break_minutes: None,
        }
    }

    pub fn with_break_minutes(mut self, minutes: u32) -> Self {
        self.break_minutes = Some(minutes);
        self
    }
}

#[derive(Serialize)]
struct RenderContext<'a> {
    task: &'a str,
    duration: u32,
    break_minutes: u32,
}

/// Picks and renders coach messages
pub struct CoachMessenger {
    hbs: Handlebars<'static>,
}

impl CoachMessenger {
    pub fn new() -> Self {
        debug!("CoachMessenger::new: called");
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);
        Self { hbs }
    }

    /// Message for an event kind name; never fails
    ///
    /// Unknown kinds get a generic encouragement.
    pub fn message<R: Rng + ?Sized>(&self, kind: &str, context: &CoachContext, rng: &mut R) -> String {
        debug!(%kind, "CoachMessenger::message: called");
        match kind.parse::<CoachEvent>() {
            Ok(event) => self.message_for(event, context, rng),
            Err(_) => {
                debug!(%kind, "CoachMessenger::message: unknown kind, using generic message");
                templates::GENERIC.to_string()
            }
        }
    }

    /// Message for a known event
    pub fn message_for<R: Rng + ?Sized>(&self, event: CoachEvent, context: &CoachContext, rng: &mut R) -> String {
        let template = templates::pool(event).choose(rng).copied().unwrap_or(templates::fallback(event));
        self.render(template, event, context)
    }

    fn render(&self, template: &str, event: CoachEvent, context: &CoachContext) -> String {
        let values = RenderContext {
            task: context.task.as_deref().filter(|t| !t.trim().is_empty()).unwrap_or(DEFAULT_TASK),
            duration: context.duration.unwrap_or(DEFAULT_DURATION),
            break_minutes: context.break_minutes.unwrap_or(DEFAULT_BREAK_MINUTES),
        };
        match self.hbs.render_template(template, &values) {
            Ok(message) => message,
            Err(e) => {
                warn!(%event, error = %e, "Coach template failed to render, using fallback");
                templates::fallback(event).to_string()
            }
        }
    }
}

impl Default for CoachMessenger {
    fn default() -> Self {
        Self::new()
    }
}
