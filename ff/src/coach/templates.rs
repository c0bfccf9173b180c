//! Embedded coach message pools
//!
//! Handlebars placeholders: `{{task}}`, `{{duration}}` (minutes) and
//! `{{break_minutes}}`.

use tracing::debug;

use super::CoachEvent;

pub const SESSION_START: [&str; 10] = [
    "Let's make this {{duration}}-minute session on {{task}} count. You've got this!",
    "Ready to focus on {{task}}? {{duration}} minutes, starting now.",
    "Time to go deep on {{task}}. Stay with it for {{duration}} minutes.",
    "Starting a {{duration}}-minute focus session on {{task}}. Let's go!",
    "Focus mode on: {{duration}} minutes of steady work on {{task}}.",
    "Good pick. Let's move {{task}} forward in the next {{duration}} minutes.",
    "You've set aside {{duration}} minutes for {{task}}. Make them matter.",
    "{{duration}} minutes of focused work ahead. {{task}} doesn't stand a chance.",
    "Ready, set, focus! {{duration}} minutes on {{task}} begins now.",
    "Close the distractions. {{duration}} minutes of deep work on {{task}} starts here.",
];

pub const HALFWAY: [&str; 10] = [
    "You're halfway there! Keep the momentum going.",
    "Great progress on {{task}}. Keep going!",
    "50% done. Stay focused and finish strong.",
    "Solid work so far. Keep pushing on {{task}}!",
    "Halfway through your focus session. Nice!",
    "Strong first half. Stay in the zone for the rest.",
    "{{task}} is coming together nicely.",
    "You're doing great. Hold that focus to the end.",
    "Halfway done with {{task}}. Keep it up!",
    "Good pace. Stay steady for the second half.",
];

pub const BREAK: [&str; 10] = [
    "Time for a break! Stand up, stretch and recharge.",
    "Great work. Take {{break_minutes}} minutes to rest.",
    "Break time. Grab some water and rest your eyes.",
    "Well done. Step away from the screen for a few minutes.",
    "Excellent session. Take a short walk and let your mind wander.",
    "You've earned a break. Stretch, hydrate and get ready for the next round.",
    "Time to recharge with a short walk or some light stretching.",
    "Break time. Do something completely different for {{break_minutes}} minutes.",
    "Great focus. Now give your mind a proper rest.",
    "Session over. Breathe, reset and come back fresh.",
];

pub const COMPLETION: [&str; 10] = [
    "Excellent work! You've completed {{task}}!",
    "{{task}} is done. Another win in the books!",
    "Boom! {{task}} is finished. Great job staying focused!",
    "Mission accomplished: {{task}} is off your list!",
    "Fantastic! You crushed {{task}}. Keep the momentum going!",
    "Well done! {{task}} is complete and you're making real progress.",
    "Success! {{task}} conquered. You're unstoppable!",
    "{{task}} is finished. Take a moment to enjoy it!",
    "Outstanding work on {{task}}. You stayed focused and delivered!",
    "Complete! {{task}} is done and dusted.",
];

/// Returned for unknown event kinds
pub const GENERIC: &str = "Keep up the great work! You're doing awesome!";

/// Fixed message used when a template cannot be rendered
pub fn fallback(event: CoachEvent) -> &'static str {
    match event {
        CoachEvent::SessionStart => "Let's focus and make great progress on this task!",
        CoachEvent::Halfway => "You're doing great! Keep up the momentum!",
        CoachEvent::Break => "Take a short walk and stretch. You've earned it!",
        CoachEvent::Completion => "Excellent work! You've successfully completed this task!",
    }
}

/// Template pool for an event
pub fn pool(event: CoachEvent) -> &'static [&'static str] {
    debug!(%event, "pool: called");
    match event {
        CoachEvent::SessionStart => &SESSION_START,
        CoachEvent::Halfway => &HALFWAY,
        CoachEvent::Break => &BREAK,
        CoachEvent::Completion => &COMPLETION,
    }
}
