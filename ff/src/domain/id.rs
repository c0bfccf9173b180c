//! Task identifiers and reference resolution
//!
//! IDs are UUID v7 strings, so they sort by creation time.

use super::task::Task;

/// Opaque task identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    /// Get the full ID string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form for display (first 8 chars)
    pub fn short(&self) -> &str {
        self.0.get(..8).unwrap_or(&self.0)
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Resolves a user-typed task reference against a task list
///
/// A reference is either a 1-based position in the list or an ID prefix.
pub struct TaskResolver<'a> {
    tasks: &'a [Task],
}

impl<'a> TaskResolver<'a> {
    pub fn new(tasks: &'a [Task]) -> Self {
        Self { tasks }
    }

    /// Resolve a reference to a task
    ///
    /// Returns:
    /// - Ok(Some(task)) if exactly one match
    /// - Ok(None) if no matches
    /// - Err with candidate IDs if ambiguous
    pub fn resolve(&self, reference: &str) -> Result<Option<&'a Task>, Vec<TaskId>> {
        let reference = reference.trim();

        // Positions win over ID prefixes made of digits only
        if let Some(task) = reference
            .parse::<usize>()
            .ok()
            .and_then(|position| position.checked_sub(1))
            .and_then(|idx| self.tasks.get(idx))
        {
            return Ok(Some(task));
        }

        let matches: Vec<&'a Task> = self
            .tasks
            .iter()
            .filter(|task| !reference.is_empty() && task.id.as_str().starts_with(reference))
            .collect();

        match matches.as_slice() {
            [] => Ok(None),
            [task] => Ok(Some(task)),
            many => Err(many.iter().map(|task| task.id.clone()).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task_with_id(id: &str) -> Task {
        let mut task = Task::new("Write report", "Write the quarterly report", 60, vec![], 50.0);
        task.id = TaskId::from(id);
        task
    }

    #[test]
    fn test_generate_is_unique() {
        let a = TaskId::generate();
        let b = TaskId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn test_short() {
        let id = TaskId::from("0192abcd-0000-7000-8000-000000000000");
        assert_eq!(id.short(), "0192abcd");
        assert_eq!(TaskId::from("abc").short(), "abc");
    }

    #[test]
    fn test_serde_transparent() {
        let id = TaskId::from("abc-123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc-123\"");
    }

    #[test]
    fn test_resolver_position() {
        let tasks = vec![task_with_id("aaaa-1"), task_with_id("bbbb-2")];
        let resolver = TaskResolver::new(&tasks);
        assert_eq!(resolver.resolve("2").unwrap().unwrap().id.as_str(), "bbbb-2");
        assert!(resolver.resolve("0").unwrap().is_none());
        assert!(resolver.resolve("3").unwrap().is_none());
    }

    #[test]
    fn test_resolver_prefix() {
        let tasks = vec![task_with_id("aaaa-1"), task_with_id("bbbb-2")];
        let resolver = TaskResolver::new(&tasks);
        assert_eq!(resolver.resolve("bb").unwrap().unwrap().id.as_str(), "bbbb-2");
        assert!(resolver.resolve("zz").unwrap().is_none());
    }

    #[test]
    fn test_resolver_ambiguous() {
        let tasks = vec![task_with_id("aaaa-1"), task_with_id("aaab-2")];
        let resolver = TaskResolver::new(&tasks);
        let candidates = resolver.resolve("aaa").unwrap_err();
        assert_eq!(candidates.len(), 2);
    }
}
