use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use timetrack_core::{AggregationPeriod, Task, TaskTime};
use timetrack_db::Error;

use crate::{error::ApiError, handlers::user::CreatedResponse, state::ApiState};

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub user_id: i64,
    pub description: String,
}

/// Optional explicit instant for start/stop; defaults to now.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TimestampRequest {
    #[serde(default)]
    pub at: Option<DateTime<Utc>>,
}

impl TimestampRequest {
    /// Empty body means now; a present body must be valid JSON with an RFC 3339 `at`.
    fn instant(body: &[u8]) -> Result<DateTime<Utc>, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Utc::now());
        }

        let request: TimestampRequest = serde_json::from_slice(body)
            .map_err(|e| Error::InvalidInput(format!("invalid timestamp body: {}", e)))?;

        Ok(request.at.unwrap_or_else(Utc::now))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TaskTimeQuery {
    pub start_period: DateTime<Utc>,
    pub end_period: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TaskTimesResponse {
    pub task_times: Vec<TaskTime>,
}

pub async fn create_task(
    State(state): State<ApiState>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let id = state
        .tasks
        .create(payload.user_id, &payload.description)
        .await?;

    Ok(Json(CreatedResponse { id }))
}

pub async fn get_task(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(state.tasks.get(id).await?))
}

/// Start the task clock
pub async fn start_task(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let at = TimestampRequest::instant(&body)?;
    state.tasks.begin(id, at).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Stop the task clock
pub async fn stop_task(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let at = TimestampRequest::instant(&body)?;
    state.tasks.stop(id, at).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Per-task elapsed time of a user within a period
pub async fn user_task_time(
    State(state): State<ApiState>,
    Path(user_id): Path<i64>,
    Query(query): Query<TaskTimeQuery>,
) -> Result<Json<TaskTimesResponse>, ApiError> {
    let period = AggregationPeriod::new(query.start_period, query.end_period);
    let task_times = state.tasks.user_task_time(user_id, period).await?;

    Ok(Json(TaskTimesResponse { task_times }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instant_prefers_explicit_time() {
        let at = DateTime::parse_from_rfc3339("2024-05-01T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let instant = TimestampRequest::instant(br#"{"at": "2024-05-01T09:00:00Z"}"#).unwrap();
        assert_eq!(instant, at);
    }

    #[test]
    fn test_instant_defaults_to_now() {
        let before = Utc::now();

        assert!(TimestampRequest::instant(b"").unwrap() >= before);
        assert!(TimestampRequest::instant(b" \n").unwrap() >= before);
        assert!(TimestampRequest::instant(b"{}").unwrap() >= before);
    }

    #[test]
    fn test_instant_rejects_malformed_body() {
        let bodies: [&[u8]; 4] = [
            br#"{"at":"not-a-time"}"#,
            br#"{"at":"2020-01-01T09:00:00"}"#,
            br#"{"at":"#,
            br#"{"at":null,"#,
        ];

        for body in bodies {
            let err = TimestampRequest::instant(body).unwrap_err();
            assert_eq!(
                err.status(),
                StatusCode::BAD_REQUEST,
                "{}",
                String::from_utf8_lossy(body)
            );
        }
    }
}
