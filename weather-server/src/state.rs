//! Shared application state

use std::{sync::Arc, time::Instant};

use weather_core::WeatherService;

/// State handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Client used to resolve weather requests
    pub weather: Arc<WeatherService>,
    /// When the process started serving; health uptime is measured from here
    pub started_at: Instant,
    /// Include internal error details in 500 responses
    pub expose_errors: bool,
}

impl AppState {
    pub fn new(weather: WeatherService, expose_errors: bool) -> Self {
        Self {
            weather: Arc::new(weather),
            started_at: Instant::now(),
            expose_errors,
        }
    }
}
