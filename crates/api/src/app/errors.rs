//! Consistent error responses.
//!
//! The taxonomy maps one-to-one onto status codes; internal detail is logged
//! and never returned to the client.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use thiserror::Error;

use fieldstock_core::DomainError;
use fieldstock_infra::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// No resolvable identity.
    #[error("authentication required")]
    Unauthenticated,

    /// Identity resolved but lacks the required permission pair.
    #[error("missing permission '{0}'")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    /// Request body or session failed shape validation.
    #[error("{0}")]
    Malformed(String),

    /// Unexpected store/codec failure; detail stays in the logs.
    #[error("internal error")]
    Internal(String),
}

impl ApiError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Malformed(err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound("record"),
            StoreError::Duplicate(key) => ApiError::Malformed(format!("duplicate: {key}")),
            StoreError::Unavailable(detail) => ApiError::Internal(detail),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::Unauthenticated => {
                json_error(StatusCode::UNAUTHORIZED, "unauthenticated", self.to_string())
            }
            ApiError::Forbidden(_) => {
                json_error(StatusCode::FORBIDDEN, "forbidden", self.to_string())
            }
            ApiError::NotFound(_) => {
                json_error(StatusCode::NOT_FOUND, "not_found", self.to_string())
            }
            ApiError::Malformed(_) => {
                json_error(StatusCode::BAD_REQUEST, "malformed", self.to_string())
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "internal error");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", "internal error")
            }
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
