use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A validated latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Reasons a coordinate pair can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CoordinateError {
    #[error("Invalid coordinates. Latitude and longitude must be valid numbers.")]
    InvalidNumber,

    #[error("Invalid latitude. Must be between -90 and 90.")]
    LatitudeOutOfRange,

    #[error("Invalid longitude. Must be between -180 and 180.")]
    LongitudeOutOfRange,
}

impl Coordinates {
    pub const LAT_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;
    pub const LON_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

    /// Checks both values are numbers inside their ranges.
    ///
    /// Latitude is checked before longitude, so a pair with both out of range
    /// reports the latitude. Infinities fail the range check.
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        if lat.is_nan() || lon.is_nan() {
            return Err(CoordinateError::InvalidNumber);
        }
        if !Self::LAT_RANGE.contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange);
        }
        if !Self::LON_RANGE.contains(&lon) {
            return Err(CoordinateError::LongitudeOutOfRange);
        }
        Ok(Self { lat, lon })
    }

    /// Parses raw query-string values, then validates them.
    pub fn parse(lat: &str, lon: &str) -> Result<Self, CoordinateError> {
        let lat = lat.trim().parse::<f64>().map_err(|_| CoordinateError::InvalidNumber)?;
        let lon = lon.trim().parse::<f64>().map_err(|_| CoordinateError::InvalidNumber)?;
        Self::new(lat, lon)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    /// Degrees Celsius, rounded.
    pub temperature: i32,
    pub feels_like: i32,
    /// Percent.
    pub humidity: u8,
    /// hPa.
    pub pressure: u32,
    /// Metres per second.
    pub wind_speed: f64,
    /// Degrees; absent when the provider omits it.
    pub wind_direction: Option<u16>,
    /// Kilometres; absent when the provider omits it.
    pub visibility: Option<f64>,
    pub uv_index: u8,
    pub description: String,
    pub icon: String,
}

/// Current conditions for a single location, in the shape served to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedWeather {
    pub location: Location,
    pub current: CurrentConditions,
}

/// Uniform result returned by the weather endpoint.
///
/// On the wire this is `{"success": true, "data": ...}` or
/// `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "RawEnvelope", try_from = "RawEnvelope")]
pub enum ResponseEnvelope {
    Success(NormalizedWeather),
    Failure(String),
}

impl ResponseEnvelope {
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn data(&self) -> Option<&NormalizedWeather> {
        match self {
            Self::Success(data) => Some(data),
            Self::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure(message) => Some(message),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawEnvelope {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<NormalizedWeather>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<ResponseEnvelope> for RawEnvelope {
    fn from(envelope: ResponseEnvelope) -> Self {
        match envelope {
            ResponseEnvelope::Success(data) => Self {
                success: true,
                data: Some(data),
                error: None,
            },
            ResponseEnvelope::Failure(error) => Self {
                success: false,
                data: None,
                error: Some(error),
            },
        }
    }
}

impl TryFrom<RawEnvelope> for ResponseEnvelope {
    type Error = String;

    fn try_from(raw: RawEnvelope) -> Result<Self, Self::Error> {
        match (raw.success, raw.data, raw.error) {
            (true, Some(data), None) => Ok(Self::Success(data)),
            (false, None, Some(error)) => Ok(Self::Failure(error)),
            (success, _, _) => Err(format!(
                "envelope with success={success} must carry exactly one of data/error"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_weather() -> NormalizedWeather {
        NormalizedWeather {
            location: Location {
                name: "Melbourne".into(),
                country: "AU".into(),
                lat: -37.8136,
                lon: 144.9631,
            },
            current: CurrentConditions {
                temperature: 15,
                feels_like: 15,
                humidity: 60,
                pressure: 1015,
                wind_speed: 4.1,
                wind_direction: Some(200),
                visibility: Some(8.0),
                uv_index: 0,
                description: "clear sky".into(),
                icon: "01d".into(),
            },
        }
    }

    #[test]
    fn coordinates_accept_bounds() {
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert!(Coordinates::new(-90.0, -180.0).is_ok());
        assert!(Coordinates::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn coordinates_reject_out_of_range() {
        assert_eq!(Coordinates::new(95.0, 0.0), Err(CoordinateError::LatitudeOutOfRange));
        assert_eq!(Coordinates::new(-91.0, 0.0), Err(CoordinateError::LatitudeOutOfRange));
        assert_eq!(Coordinates::new(0.0, 200.0), Err(CoordinateError::LongitudeOutOfRange));
        assert_eq!(Coordinates::new(0.0, -200.0), Err(CoordinateError::LongitudeOutOfRange));
        assert_eq!(Coordinates::new(95.0, 200.0), Err(CoordinateError::LatitudeOutOfRange));
    }

    #[test]
    fn coordinates_reject_nan() {
        assert_eq!(Coordinates::new(f64::NAN, 0.0), Err(CoordinateError::InvalidNumber));
        assert_eq!(Coordinates::parse("NaN", "10"), Err(CoordinateError::InvalidNumber));
    }

    #[test]
    fn infinite_coordinates_fail_range_check() {
        assert_eq!(Coordinates::new(0.0, f64::INFINITY), Err(CoordinateError::LongitudeOutOfRange));
        assert_eq!(Coordinates::parse("Infinity", "0"), Err(CoordinateError::LatitudeOutOfRange));
        assert_eq!(Coordinates::parse("0", "-Infinity"), Err(CoordinateError::LongitudeOutOfRange));
    }

    #[test]
    fn coordinates_parse_strings() {
        let coords = Coordinates::parse(" -37.8 ", "144.9").unwrap();
        assert_eq!(coords, Coordinates { lat: -37.8, lon: 144.9 });
        assert_eq!(Coordinates::parse("abc", "10"), Err(CoordinateError::InvalidNumber));
        assert_eq!(Coordinates::parse("10", ""), Err(CoordinateError::InvalidNumber));
    }

    #[test]
    fn current_conditions_use_camel_case() {
        let value = serde_json::to_value(sample_weather()).unwrap();
        assert_eq!(value["current"]["feelsLike"], 15);
        assert_eq!(value["current"]["windSpeed"], 4.1);
        assert_eq!(value["current"]["windDirection"], 200);
        assert_eq!(value["current"]["uvIndex"], 0);
        assert_eq!(value["location"]["name"], "Melbourne");
    }

    #[test]
    fn success_envelope_has_no_error_field() {
        let value = serde_json::to_value(ResponseEnvelope::Success(sample_weather())).unwrap();
        assert_eq!(value["success"], true);
        assert!(value.get("data").is_some());
        assert!(value.get("error").is_none());
    }

    #[test]
    fn failure_envelope_has_no_data_field() {
        let value = serde_json::to_value(ResponseEnvelope::failure("boom")).unwrap();
        assert_eq!(value, json!({ "success": false, "error": "boom" }));
    }

    #[test]
    fn envelope_rejects_inconsistent_payloads() {
        let both = json!({ "success": false, "error": "x", "data": sample_weather() });
        assert!(serde_json::from_value::<ResponseEnvelope>(both).is_err());

        let neither = json!({ "success": true });
        assert!(serde_json::from_value::<ResponseEnvelope>(neither).is_err());

        let ok = json!({ "success": false, "error": "x" });
        let env: ResponseEnvelope = serde_json::from_value(ok).unwrap();
        assert_eq!(env.error(), Some("x"));
        assert!(env.data().is_none());
    }
}
