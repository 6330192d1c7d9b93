//! HTTP error mapping for the API.
//!
//! Domain errors from `pennycore` become JSON responses of the shape
//! `{"detail": "..."}` with a matching status code.
//!
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pennycore::PennyError;
use serde_json::json;

/// An error ready to be rendered as an HTTP response.
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn not_found(detail: impl Into<String>) -> ApiError {
        ApiError {
            status: StatusCode::NOT_FOUND,
            detail: detail.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> ApiError {
        ApiError {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }
}

impl From<PennyError> for ApiError {
    fn from(err: PennyError) -> ApiError {
        let status = match &err {
            PennyError::NotFound(_) => StatusCode::NOT_FOUND,
            PennyError::Invalid(_) | PennyError::Conflict(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(%err, "request failed");
        }
        ApiError {
            status,
            detail: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
