use axum::{
    http::StatusCode,
    BoxError,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use timetrack_db::Error;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Store and domain failures rendered as HTTP responses.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidInput(_) | Error::ConstraintViolation(_) => StatusCode::BAD_REQUEST,
            Error::InfoLookup(_) => StatusCode::BAD_GATEWAY,
            Error::Cancelled(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::StorageUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl From<timetrack_core::Error> for ApiError {
    fn from(err: timetrack_core::Error) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self.0, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self.0, "Request rejected");
        }

        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

/// Renders failures raised by the middleware stack rather than a handler.
pub async fn handle_middleware_error(err: BoxError) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        return ApiError(Error::Cancelled("request timed out".to_string())).into_response();
    }

    tracing::error!(error = %err, "Middleware failure");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (Error::NotFound("user 1".into()), StatusCode::NOT_FOUND),
            (Error::InvalidInput("limit".into()), StatusCode::BAD_REQUEST),
            (Error::ConstraintViolation("dup".into()), StatusCode::BAD_REQUEST),
            (Error::InfoLookup("500".into()), StatusCode::BAD_GATEWAY),
            (Error::Cancelled("timeout".into()), StatusCode::SERVICE_UNAVAILABLE),
            (
                Error::StorageUnavailable("down".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError(err).status(), expected);
        }
    }

    #[test]
    fn test_invalid_passport_is_bad_request() {
        let err = ApiError::from(timetrack_core::Error::InvalidPassport("x".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_timeout_is_service_unavailable() {
        let err: BoxError = Box::new(tower::timeout::error::Elapsed::new());
        let response = handle_middleware_error(err).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_other_middleware_failure_is_internal() {
        let err: BoxError = "layer exploded".into();
        let response = handle_middleware_error(err).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
