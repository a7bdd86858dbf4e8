//! Core library for the weather proxy service.
//!
//! This crate defines:
//! - Configuration loading (file + environment)
//! - The coordinate, weather and envelope models served to clients
//! - Abstraction over the upstream weather provider
//! - [`WeatherService`], which resolves a location and produces an envelope
//!
//! It is used by `weather-server`, but has no dependency on any HTTP server.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod service;

pub use config::{Config, DefaultLocation, ProviderConfig, ServerConfig};
pub use error::WeatherError;
pub use model::{
    CoordinateError, Coordinates, CurrentConditions, Location, NormalizedWeather,
    ResponseEnvelope,
};
pub use provider::{OpenWeatherProvider, WeatherProvider};
pub use service::WeatherService;
