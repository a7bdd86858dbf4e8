use crate::{Coordinates, NormalizedWeather, WeatherError};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Source of current conditions for a coordinate pair.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, coords: Coordinates) -> Result<NormalizedWeather, WeatherError>;
}
