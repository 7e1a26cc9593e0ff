//! Per-task elapsed time over a reporting period.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::{Task, TaskTime};

const SECS_PER_HOUR: i64 = 3600;
const SECS_PER_MINUTE: i64 = 60;

/// Whole hours and remainder minutes of a duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElapsedTime {
    pub hours: i64,
    pub minutes: i64,
}

impl ElapsedTime {
    /// `hours = floor(s / 3600)`, `minutes = floor((s mod 3600) / 60)`.
    pub fn from_seconds(total: i64) -> Self {
        Self {
            hours: total.div_euclid(SECS_PER_HOUR),
            minutes: total.rem_euclid(SECS_PER_HOUR) / SECS_PER_MINUTE,
        }
    }

    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self::from_seconds((end - start).num_seconds())
    }

    pub fn into_task_time(self, task_id: i64) -> TaskTime {
        TaskTime {
            task_id,
            hours: self.hours as f64,
            minutes: self.minutes as f64,
        }
    }
}

/// Reporting window. Both bounds are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl AggregationPeriod {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// True when the task started strictly after `start` and ended strictly before `end`.
    pub fn contains(&self, task_start: DateTime<Utc>, task_end: DateTime<Utc>) -> bool {
        self.start < task_start && task_end < self.end
    }
}

/// Hours ascending, then minutes descending, then task id ascending.
fn report_order(a: &(i64, ElapsedTime), b: &(i64, ElapsedTime)) -> Ordering {
    a.1.hours
        .cmp(&b.1.hours)
        .then_with(|| b.1.minutes.cmp(&a.1.minutes))
        .then_with(|| a.0.cmp(&b.0))
}

/// Elapsed time of every finished task of `user_id` inside `period`.
///
/// Tasks missing either instant are skipped. An empty result is not an error.
pub fn aggregate(tasks: &[Task], user_id: i64, period: AggregationPeriod) -> Vec<TaskTime> {
    let mut elapsed: Vec<(i64, ElapsedTime)> = tasks
        .iter()
        .filter(|task| task.user_id == user_id)
        .filter_map(|task| {
            let (start, end) = task.span()?;
            period
                .contains(start, end)
                .then(|| (task.id, ElapsedTime::between(start, end)))
        })
        .collect();

    elapsed.sort_by(report_order);

    elapsed
        .into_iter()
        .map(|(task_id, time)| time.into_task_time(task_id))
        .collect()
}
