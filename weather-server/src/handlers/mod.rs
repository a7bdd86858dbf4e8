//! HTTP request handlers

pub mod health;
pub mod weather;

use crate::error::ApiError;

/// Fallback for unknown paths under `/api`.
pub async fn api_not_found() -> ApiError {
    ApiError::NotFound("API endpoint not found".to_string())
}
