//! Health check handler

use axum::{Json, extract::State};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// RFC 3339 UTC timestamp
    pub timestamp: String,
    /// Seconds since the server started
    pub uptime: f64,
}

/// Liveness check - is the server running?
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}
