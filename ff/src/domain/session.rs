//! Work session records and daily statistics

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::id::TaskId;
use super::task::round_tenth;

/// One finished focus interval, as handed to the record store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkSession {
    /// Unique session ID
    pub id: String,

    /// Task the session was bound to
    pub task_id: TaskId,

    /// When the timer was first started
    pub start_time: DateTime<Utc>,

    /// Minutes actually spent
    pub duration_minutes: u32,

    /// Whether the task was completed in this session
    pub completed: bool,
}

impl WorkSession {
    /// Create a session record with a fresh ID
    pub fn new(task_id: TaskId, start_time: DateTime<Utc>, duration_minutes: u32, completed: bool) -> Self {
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            task_id,
            start_time,
            duration_minutes,
            completed,
        }
    }

    /// Calendar day (UTC) the session started on
    pub fn day(&self) -> NaiveDate {
        self.start_time.date_naive()
    }
}

/// Aggregates over one day of work sessions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyStatistics {
    pub total_sessions: u64,
    pub total_minutes: u64,
    /// Share of completed sessions, 0..=100, one decimal
    pub completion_rate_pct: f64,
    pub unique_tasks: u64,
}

impl DailyStatistics {
    /// Aggregate the sessions that started on `day`
    pub fn for_day<'a>(sessions: impl IntoIterator<Item = &'a WorkSession>, day: NaiveDate) -> Self {
        let mut stats = Self::default();
        let mut completed = 0u64;
        let mut tasks = std::collections::HashSet::new();

        for session in sessions.into_iter().filter(|s| s.day() == day) {
            stats.total_sessions += 1;
            stats.total_minutes += u64::from(session.duration_minutes);
            if session.completed {
                completed += 1;
            }
            tasks.insert(&session.task_id);
        }

        stats.unique_tasks = tasks.len() as u64;
        if stats.total_sessions > 0 {
            stats.completion_rate_pct = round_tenth(completed as f64 / stats.total_sessions as f64 * 100.0);
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_day() {
        let session = WorkSession::new(TaskId::from("t1"), at(4, 23), 30, true);
        assert_eq!(session.day(), NaiveDate::from_ymd_opt(2026, 3, 4).unwrap());
    }

    #[test]
    fn test_for_day_empty() {
        let stats = DailyStatistics::for_day(&Vec::<WorkSession>::new(), NaiveDate::from_ymd_opt(2026, 3, 4).unwrap());
        assert_eq!(stats, DailyStatistics::default());
    }

    #[test]
    fn test_for_day_filters_and_rounds() {
        let sessions = vec![
            WorkSession::new(TaskId::from("t1"), at(4, 9), 25, true),
            WorkSession::new(TaskId::from("t1"), at(4, 11), 10, false),
            WorkSession::new(TaskId::from("t2"), at(4, 14), 45, false),
            WorkSession::new(TaskId::from("t3"), at(5, 9), 60, true),
        ];

        let stats = DailyStatistics::for_day(&sessions, NaiveDate::from_ymd_opt(2026, 3, 4).unwrap());
        assert_eq!(stats.total_sessions, 3);
        assert_eq!(stats.total_minutes, 80);
        assert_eq!(stats.unique_tasks, 2);
        assert_eq!(stats.completion_rate_pct, 33.3);
    }
}
