use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub user_id: i64,
    pub description: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(id: i64, user_id: i64, description: impl Into<String>) -> Self {
        Self {
            id,
            user_id,
            description: description.into(),
            start_time: None,
            end_time: None,
        }
    }

    pub fn started_at(mut self, at: DateTime<Utc>) -> Self {
        self.start_time = Some(at);
        self
    }

    pub fn stopped_at(mut self, at: DateTime<Utc>) -> Self {
        self.end_time = Some(at);
        self
    }

    /// Both instants, once the task has been started and stopped.
    pub fn span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((self.start_time?, self.end_time?))
    }
}

/// Elapsed time of one task: whole hours plus remaining whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaskTime {
    pub task_id: i64,
    pub hours: f64,
    pub minutes: f64,
}
