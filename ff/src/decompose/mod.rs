//! Journal decomposition
//!
//! Turns free-form journal text into 0..=5 pending tasks. The local engine
//! segments the text into statements and synthesizes one task per selected
//! statement. A remote engine can be put in front of it through
//! [`FallbackDecomposer`], which keeps the local engine as the safety net.

mod engine;
mod fallback;
mod payload;
mod remote;
mod segmenter;
mod synthesizer;
mod traits;

pub use engine::{LocalDecomposer, decompose_with};
pub use fallback::{Decomposition, DecompositionSource, FallbackDecomposer, LOCAL_MODE_NOTICE};
pub use payload::{PayloadError, TITLE_MAX_CHARS, TaskPayload};
pub use remote::{RemoteDecomposer, parse_reply, strip_code_fence};
pub use segmenter::segment;
pub use synthesizer::{GENERIC_SUBTASKS, SUBTASKS_MAX, SUBTASKS_MIN, build_title, key_words, synthesize};
pub use traits::{Decomposer, MAX_TASKS, MIN_TASKS};
