use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use timetrack_core::{NewUser, Passport, User, UserFilter};

use crate::{error::ApiError, state::ApiState};

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// `"<serie> <number>"`, e.g. `"1234 567890"`
    pub passport: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

/// Register a user from a passport, enriched by the info service
pub async fn create_user(
    State(state): State<ApiState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let passport = Passport::parse(&payload.passport)?;
    let id = state.users.register(passport).await?;

    Ok(Json(CreatedResponse { id }))
}

/// List users matching the query-string filter
pub async fn list_users(
    State(state): State<ApiState>,
    Query(filter): Query<UserFilter>,
) -> Result<Json<UsersResponse>, ApiError> {
    tracing::debug!(?filter, "Listing users");
    let users = state.users.find(&filter).await?;

    Ok(Json(UsersResponse { users }))
}

pub async fn get_user(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.users.get(id).await?))
}

/// Replace all fields of a user
pub async fn update_user(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
    Json(payload): Json<NewUser>,
) -> Result<StatusCode, ApiError> {
    state.users.update(id, &payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_user(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
