//! Deterministic local decomposition engine

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::segmenter::segment;
use super::synthesizer::synthesize;
use super::traits::{Decomposer, MAX_TASKS, MIN_TASKS};
use crate::backend::BackendError;
use crate::domain::Task;

/// Decompose journal text with the given random source
///
/// Takes the first `min(candidates, uniform[3,5])` statements, so at least
/// one task comes back whenever one statement survives segmentation.
pub fn decompose_with<R: Rng + ?Sized>(journal: &str, rng: &mut R) -> Vec<Task> {
    debug!(journal_len = journal.len(), "decompose_with: called");
    if journal.trim().is_empty() {
        debug!("decompose_with: empty input");
        return Vec::new();
    }

    let statements = segment(journal);
    if statements.is_empty() {
        debug!("decompose_with: no statements survived segmentation");
        return Vec::new();
    }

    let target = rng.random_range(MIN_TASKS..=MAX_TASKS);
    let selected = statements.len().min(target);
    debug!(candidates = statements.len(), target, selected, "decompose_with: selecting statements");

    statements
        .iter()
        .take(selected)
        .map(|statement| synthesize(statement, &mut *rng))
        .collect()
}

/// Rule-based decomposer used directly or as the fallback for a remote one
pub struct LocalDecomposer<R = StdRng> {
    rng: Mutex<R>,
}

impl LocalDecomposer<StdRng> {
    /// Create a decomposer seeded from the OS
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Create a reproducible decomposer
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Seeded when a seed is given, OS-seeded otherwise
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::new(),
        }
    }
}

impl Default for LocalDecomposer<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng + Send> LocalDecomposer<R> {
    /// Create a decomposer around any random source
    pub fn with_rng(rng: R) -> Self {
        Self { rng: Mutex::new(rng) }
    }

    /// Decompose synchronously; never fails
    pub fn decompose_now(&self, journal: &str) -> Vec<Task> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let tasks = decompose_with(journal, &mut *rng);
        info!(task_count = tasks.len(), "Local decomposition produced {} tasks", tasks.len());
        tasks
    }
}

#[async_trait]
impl<R: Rng + Send> Decomposer for LocalDecomposer<R> {
    fn name(&self) -> &str {
        "local"
    }

    async fn decompose(&self, journal: &str) -> Result<Vec<Task>, BackendError> {
        Ok(self.decompose_now(journal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DURATION_OPTIONS, TaskStatus};

    const JOURNAL: &str = "I need to prepare slides for my presentation. I also need to review code and fix bugs. \
                           Finally I should write documentation for the project.";

    #[test]
    fn test_empty_and_whitespace_input() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(decompose_with("", &mut rng).is_empty());
        assert!(decompose_with("  \n\t ", &mut rng).is_empty());
    }

    #[test]
    fn test_only_short_statements() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(decompose_with("Buy milk. Call mom! Gym?", &mut rng).is_empty());
    }

    #[test]
    fn test_single_statement_yields_one_task() {
        let mut rng = StdRng::seed_from_u64(1);
        let tasks = decompose_with("Renew the car insurance policy", &mut rng);
        assert_eq!(tasks.len(), 1);
    }

    #[test]
    fn test_three_statement_scenario() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let tasks = decompose_with(JOURNAL, &mut rng);
            assert_eq!(tasks.len(), 3);
            for task in &tasks {
                assert!(!task.title.to_lowercase().starts_with("i need to"));
                assert!(!task.title.to_lowercase().starts_with("i should"));
                assert_eq!(task.status, TaskStatus::Pending);
            }
            assert!(tasks[0].title.starts_with("Prepare slides"));
        }
    }

    #[test]
    fn test_order_matches_source() {
        let mut rng = StdRng::seed_from_u64(3);
        let tasks = decompose_with(JOURNAL, &mut rng);
        assert!(tasks[0].description.contains("prepare slides"));
        assert!(tasks[1].description.contains("review code"));
        assert!(tasks[2].description.contains("write documentation"));
    }

    #[test]
    fn test_bounded_to_five() {
        let journal = (1..=9)
            .map(|i| format!("Work on the item number {} carefully", i))
            .collect::<Vec<_>>()
            .join(". ");
        for seed in 0..20 {
            let tasks = decompose_with(&journal, &mut StdRng::seed_from_u64(seed));
            assert!((3..=5).contains(&tasks.len()));
            assert!(tasks[0].description.ends_with("number 1 carefully"));
        }
    }

    #[test]
    fn test_local_decomposer_seeded_is_reproducible() {
        let a = LocalDecomposer::seeded(11).decompose_now(JOURNAL);
        let b = LocalDecomposer::seeded(11).decompose_now(JOURNAL);
        let durations = |tasks: &[Task]| tasks.iter().map(|t| t.estimated_duration).collect::<Vec<_>>();
        assert_eq!(durations(&a), durations(&b));
        assert!(a.iter().all(|t| DURATION_OPTIONS.contains(&t.estimated_duration)));
    }

    #[tokio::test]
    async fn test_local_decomposer_trait() {
        let decomposer = LocalDecomposer::seeded(5);
        assert_eq!(decomposer.name(), "local");
        let tasks = decomposer.decompose(JOURNAL).await.unwrap();
        assert_eq!(tasks.len(), 3);
        assert!(decomposer.decompose("   ").await.unwrap().is_empty());
    }
}
