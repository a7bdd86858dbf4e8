use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{
    config::ProviderConfig,
    model::{Coordinates, CurrentConditions, Location, NormalizedWeather},
    WeatherError,
};

use super::WeatherProvider;

const FALLBACK_DESCRIPTION: &str = "Unknown";
const FALLBACK_ICON: &str = "01d";

/// Client for the OpenWeather current-conditions endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    timeout_ms: u64,
    http: Client,
}

impl OpenWeatherProvider {
    /// Build a provider from configuration.
    ///
    /// Fails when no API key is configured; this is a startup error, not a
    /// per-request one.
    pub fn new(config: &ProviderConfig) -> Result<Self, WeatherError> {
        let api_key = config.api_key.trim();
        if api_key.is_empty() {
            return Err(WeatherError::Configuration(
                "OpenWeather API key is required. Please set OPENWEATHER_API_KEY environment variable."
                    .to_string(),
            ));
        }

        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| WeatherError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key: api_key.to_owned(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            timeout_ms: config.timeout_ms,
            http,
        })
    }

    fn map_send_error(&self, err: reqwest::Error) -> WeatherError {
        if err.is_timeout() {
            WeatherError::Timeout(self.timeout_ms)
        } else {
            WeatherError::Request(err.without_url().to_string())
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self), fields(lat = %coords.lat, lon = %coords.lon))]
    async fn current_weather(&self, coords: Coordinates) -> Result<NormalizedWeather, WeatherError> {
        let url = format!("{}/weather", self.base_url);
        debug!(url = %url, "Fetching current weather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", coords.lat.to_string()),
                ("lon", coords.lon.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            return Err(WeatherError::Upstream {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: OwCurrentResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::Parse(e.to_string()))?;

        Ok(normalize(parsed))
    }
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    deg: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwCurrentResponse {
    name: String,
    coord: OwCoord,
    main: OwMain,
    wind: OwWind,
    visibility: Option<f64>,
    #[serde(default)]
    sys: OwSys,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

pub(crate) fn normalize(data: OwCurrentResponse) -> NormalizedWeather {
    let (description, icon) = data
        .weather
        .into_iter()
        .next()
        .map(|w| (w.description, w.icon))
        .unwrap_or_else(|| (FALLBACK_DESCRIPTION.to_string(), FALLBACK_ICON.to_string()));

    NormalizedWeather {
        location: Location {
            name: data.name,
            country: data.sys.country,
            lat: data.coord.lat,
            lon: data.coord.lon,
        },
        current: CurrentConditions {
            temperature: round_half_up(data.main.temp),
            feels_like: round_half_up(data.main.feels_like),
            humidity: data.main.humidity,
            pressure: data.main.pressure,
            wind_speed: data.wind.speed,
            wind_direction: data.wind.deg,
            visibility: data.visibility.map(|metres| metres / 1000.0),
            // not provided by the current-conditions endpoint
            uv_index: 0,
            description,
            icon,
        },
    }
}

/// Rounds to the nearest integer with halves going toward +inf (-2.5 -> -2).
fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixture() -> serde_json::Value {
        json!({
            "coord": { "lon": 144.9631, "lat": -37.8136 },
            "weather": [{ "id": 800, "main": "Clear", "description": "clear sky", "icon": "01d" }],
            "main": { "temp": 15.4, "feels_like": 14.9, "pressure": 1015, "humidity": 62 },
            "visibility": 8000,
            "wind": { "speed": 4.63, "deg": 200 },
            "sys": { "country": "AU" },
            "name": "Melbourne"
        })
    }

    #[test]
    fn normalizes_reference_fixture() {
        let parsed: OwCurrentResponse = serde_json::from_value(fixture()).unwrap();
        let weather = normalize(parsed);

        assert_eq!(weather.location.name, "Melbourne");
        assert_eq!(weather.location.country, "AU");
        assert_eq!(weather.location.lat, -37.8136);
        assert_eq!(weather.current.temperature, 15);
        assert_eq!(weather.current.feels_like, 15);
        assert_eq!(weather.current.visibility, Some(8.0));
        assert_eq!(weather.current.humidity, 62);
        assert_eq!(weather.current.pressure, 1015);
        assert_eq!(weather.current.wind_speed, 4.63);
        assert_eq!(weather.current.wind_direction, Some(200));
        assert_eq!(weather.current.uv_index, 0);
        assert_eq!(weather.current.description, "clear sky");
        assert_eq!(weather.current.icon, "01d");
    }

    #[test]
    fn missing_conditions_fall_back() {
        let mut raw = fixture();
        raw["weather"] = json!([]);
        let weather = normalize(serde_json::from_value(raw).unwrap());
        assert_eq!(weather.current.description, "Unknown");
        assert_eq!(weather.current.icon, "01d");

        let mut raw = fixture();
        raw.as_object_mut().unwrap().remove("weather");
        let weather = normalize(serde_json::from_value(raw).unwrap());
        assert_eq!(weather.current.description, "Unknown");
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let mut raw = fixture();
        let obj = raw.as_object_mut().unwrap();
        obj.remove("visibility");
        obj.remove("sys");
        obj["wind"] = json!({ "speed": 1.0 });

        let weather = normalize(serde_json::from_value(raw).unwrap());
        assert_eq!(weather.current.visibility, None);
        assert_eq!(weather.current.wind_direction, None);
        assert_eq!(weather.location.country, "");
    }

    #[test]
    fn rounding_matches_half_up() {
        assert_eq!(round_half_up(15.4), 15);
        assert_eq!(round_half_up(14.9), 15);
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.6), -3);
    }

    #[test]
    fn truncate_long_bodies() {
        let body = "x".repeat(500);
        let out = truncate_body(&body);
        assert_eq!(out.len(), 203);
        assert!(out.ends_with("..."));
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn new_requires_api_key() {
        let err = OpenWeatherProvider::new(&ProviderConfig::default()).unwrap_err();
        assert!(matches!(err, WeatherError::Configuration(_)));
        assert!(err.to_string().contains("OPENWEATHER_API_KEY"));
    }

    #[test]
    fn new_trims_trailing_slash() {
        let config = ProviderConfig {
            api_key: "KEY".into(),
            base_url: "http://localhost:1234/".into(),
            timeout_ms: 100,
        };
        let provider = OpenWeatherProvider::new(&config).unwrap();
        assert_eq!(provider.base_url, "http://localhost:1234");
    }
}
