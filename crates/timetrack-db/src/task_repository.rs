use chrono::{DateTime, Utc};
use timetrack_core::{aggregate, AggregationPeriod, BuiltQuery, Task, TaskTime};

use crate::{models::TaskRecord, Database, Error, Result};

#[derive(Clone)]
pub struct TaskRepository {
    db: Database,
}

impl TaskRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn create(&self, user_id: i64, description: &str) -> Result<i64> {
        let query = BuiltQuery::new(
            "INSERT INTO tasks (user_id, description) VALUES ($1, $2) RETURNING id",
        )
        .bind(user_id)
        .bind(description);

        let id = self.db.insert_returning_id(query).await?;
        tracing::info!(task_id = id, user_id, "Created task");

        Ok(id)
    }

    pub async fn get(&self, id: i64) -> Result<Task> {
        let query = BuiltQuery::new("SELECT * FROM tasks WHERE id = $1").bind(id);

        self.db
            .query_many::<TaskRecord>(query)
            .await?
            .into_iter()
            .next()
            .map(Task::from)
            .ok_or_else(|| Error::not_found("task", id))
    }

    /// Set `start_time`. Rejected if the task already stopped before `at`.
    pub async fn begin(&self, id: i64, at: DateTime<Utc>) -> Result<()> {
        let query = BuiltQuery::new(
            r#"
            UPDATE tasks SET start_time = $1
            WHERE id = $2 AND (end_time IS NULL OR end_time >= $1)
            "#,
        )
        .bind(at)
        .bind(id);

        if self.db.execute(query).await? == 0 {
            return Err(self
                .classify_rejected(id, "task already stopped before the requested start")
                .await);
        }

        tracing::info!(task_id = id, start_time = %at, "Task started");
        Ok(())
    }

    /// Set `end_time`. Rejected if the task started after `at`.
    pub async fn stop(&self, id: i64, at: DateTime<Utc>) -> Result<()> {
        let query = BuiltQuery::new(
            r#"
            UPDATE tasks SET end_time = $1
            WHERE id = $2 AND (start_time IS NULL OR start_time <= $1)
            "#,
        )
        .bind(at)
        .bind(id);

        if self.db.execute(query).await? == 0 {
            return Err(self
                .classify_rejected(id, "stop time precedes the task start")
                .await);
        }

        tracing::info!(task_id = id, end_time = %at, "Task stopped");
        Ok(())
    }

    /// Elapsed time per finished task of `user_id` strictly inside `period`.
    pub async fn user_task_time(
        &self,
        user_id: i64,
        period: AggregationPeriod,
    ) -> Result<Vec<TaskTime>> {
        let query = BuiltQuery::new(
            r#"
            SELECT * FROM tasks
            WHERE user_id = $1 AND start_time > $2 AND end_time < $3
            "#,
        )
        .bind(user_id)
        .bind(period.start)
        .bind(period.end);

        let tasks: Vec<Task> = self
            .db
            .query_many::<TaskRecord>(query)
            .await?
            .into_iter()
            .map(Task::from)
            .collect();

        let times = aggregate(&tasks, user_id, period);
        tracing::debug!(user_id, tasks = times.len(), "Aggregated task time");

        Ok(times)
    }

    /// A guarded update touched no row: tell a missing task from a rejected instant.
    async fn classify_rejected(&self, id: i64, reason: &str) -> Error {
        let exists = BuiltQuery::new("SELECT EXISTS (SELECT 1 FROM tasks WHERE id = $1)").bind(id);

        match self.db.query_flag(exists).await {
            Ok(true) => Error::InvalidInput(format!("task {}: {}", id, reason)),
            Ok(false) => Error::not_found("task", id),
            Err(e) => e,
        }
    }
}
