//! Current-weather handler

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::Deserialize;
use tracing::{debug, warn};
use weather_core::{CoordinateError, Coordinates, ResponseEnvelope};

use crate::{error::ApiError, state::AppState};

/// Raw `lat`/`lon` query parameters.
///
/// Kept as strings so that malformed numbers produce our own 400 body instead
/// of the extractor's rejection.
#[derive(Debug, Default, Deserialize)]
pub struct WeatherQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

impl WeatherQuery {
    /// Validated coordinates, or `None` when neither value was supplied.
    ///
    /// Empty values count as absent. Supplying only one of the pair is
    /// rejected as invalid coordinates.
    pub fn coordinates(&self) -> Result<Option<Coordinates>, CoordinateError> {
        fn present(value: &Option<String>) -> Option<&str> {
            value.as_deref().map(str::trim).filter(|v| !v.is_empty())
        }

        match (present(&self.lat), present(&self.lon)) {
            (None, None) => Ok(None),
            (Some(lat), Some(lon)) => Coordinates::parse(lat, lon).map(Some),
            _ => Err(CoordinateError::InvalidNumber),
        }
    }
}

/// `GET /api/weather?lat=&lon=`
pub async fn get_weather(
    State(state): State<AppState>,
    query: Result<Query<WeatherQuery>, QueryRejection>,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        debug!(%rejection, "Rejected weather query string");
        ApiError::from(CoordinateError::InvalidNumber)
    })?;

    let coords = query.coordinates().inspect_err(|e| {
        debug!(lat = ?query.lat, lon = ?query.lon, error = %e, "Rejected coordinates");
    })?;

    let envelope = state
        .weather
        .get_weather_for_location(coords.map(|c| c.lat), coords.map(|c| c.lon))
        .await;

    match envelope {
        ResponseEnvelope::Failure(message) => {
            warn!(error = %message, "Weather lookup failed");
            Err(ApiError::Upstream(message))
        }
        success => Ok(Json(success)),
    }
}
