//! The weather client used by request handlers.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::{
    config::{Config, DefaultLocation},
    model::{Coordinates, ResponseEnvelope},
    provider::{OpenWeatherProvider, WeatherProvider},
    WeatherError,
};

/// Resolves coordinates, queries the provider and wraps the outcome in a
/// [`ResponseEnvelope`].
#[derive(Debug, Clone)]
pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
    default_location: DefaultLocation,
}

impl WeatherService {
    pub fn new(provider: Arc<dyn WeatherProvider>, default_location: DefaultLocation) -> Self {
        Self {
            provider,
            default_location,
        }
    }

    /// Construct the OpenWeather-backed service.
    ///
    /// Fails with [`WeatherError::Configuration`] when no API key is set.
    pub fn from_config(config: &Config) -> Result<Self, WeatherError> {
        let provider = OpenWeatherProvider::new(&config.openweather)?;
        info!(
            base_url = %config.openweather.base_url,
            default_location = %config.default_location.name,
            "Weather client initialised"
        );
        Ok(Self::new(Arc::new(provider), config.default_location.clone()))
    }

    pub fn default_location(&self) -> &DefaultLocation {
        &self.default_location
    }

    /// Coordinates to query: the supplied pair when both are present,
    /// otherwise the configured default.
    pub fn resolve_coordinates(&self, lat: Option<f64>, lon: Option<f64>) -> Coordinates {
        match (lat, lon) {
            (Some(lat), Some(lon)) => Coordinates { lat, lon },
            _ => Coordinates {
                lat: self.default_location.lat,
                lon: self.default_location.lon,
            },
        }
    }

    /// Fetch current weather, never failing: errors become a failure envelope.
    pub async fn get_weather_for_location(
        &self,
        lat: Option<f64>,
        lon: Option<f64>,
    ) -> ResponseEnvelope {
        let coords = self.resolve_coordinates(lat, lon);

        match self.provider.current_weather(coords).await {
            Ok(weather) => ResponseEnvelope::Success(weather),
            Err(e) if e.is_upstream() => {
                error!(lat = coords.lat, lon = coords.lon, error = %e, "Error fetching weather data");
                ResponseEnvelope::Failure(e.to_string())
            }
            Err(e) => {
                warn!(lat = coords.lat, lon = coords.lon, error = %e, "Weather lookup rejected");
                ResponseEnvelope::Failure(e.to_string())
            }
        }
    }
}
