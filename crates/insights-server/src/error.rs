//! HTTP error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use order_insights::InsightsError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Insights(#[from] InsightsError),

    /// A blocking render or load task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Insights(InsightsError::UnknownPage(_) | InsightsError::NoDataLoaded) => StatusCode::NOT_FOUND,
            Self::Insights(e) if e.is_user_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Insights(e) => e.error_code(),
            Self::Task(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
            }
        });
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(InsightsError::UnknownPage("x".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError::from(InsightsError::NoDataLoaded).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(InsightsError::from(order_insights::ParseError::Empty)).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(InsightsError::Render("boom".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_response_carries_code() {
        let response = ApiError::from(InsightsError::NoDataLoaded).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_panicking_blocking_task_is_internal_error() {
        let join_error = tokio::task::spawn_blocking(|| -> usize { panic!("render blew up") })
            .await
            .unwrap_err();
        assert!(join_error.is_panic());

        let err = ApiError::from(join_error);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
