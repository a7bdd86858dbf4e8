//! API error handling
//!
//! Every error is rendered as JSON. Weather-endpoint errors use the
//! `{success: false, error}` envelope; unknown API paths use `{error}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use weather_core::{CoordinateError, ResponseEnvelope};

/// Message returned when internal details are hidden.
pub const GENERIC_INTERNAL_ERROR: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Caller input rejected before any outbound call
    #[error("{0}")]
    BadRequest(String),

    /// The weather client reported a failure
    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    NotFound(String),

    /// Unexpected fault inside the server
    #[error("Internal error: {detail}")]
    Internal { detail: String, expose: bool },
}

impl ApiError {
    pub fn internal(detail: impl Into<String>, expose: bool) -> Self {
        Self::Internal {
            detail: detail.into(),
            expose,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Upstream(_) | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CoordinateError> for ApiError {
    fn from(err: CoordinateError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

/// Body for errors outside the weather envelope contract.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::BadRequest(msg) | Self::Upstream(msg) => {
                (status, Json(ResponseEnvelope::Failure(msg))).into_response()
            }
            Self::Internal { detail, expose } => {
                let msg = if expose {
                    detail
                } else {
                    GENERIC_INTERNAL_ERROR.to_string()
                };
                (status, Json(ResponseEnvelope::Failure(msg))).into_response()
            }
            Self::NotFound(msg) => (status, Json(ErrorResponse { error: msg })).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Upstream("x".into()).status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            ApiError::internal("x", false).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn coordinate_errors_are_bad_requests() {
        let err = ApiError::from(CoordinateError::LatitudeOutOfRange);
        assert!(matches!(err, ApiError::BadRequest(ref m) if m.contains("latitude")));
    }

    #[test]
    fn internal_error_respects_expose_flag() {
        let shown = ApiError::internal("db exploded", true);
        let hidden = ApiError::internal("db exploded", false);
        assert_eq!(shown.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(hidden.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
