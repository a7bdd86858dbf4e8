use thiserror::Error;

/// Errors produced while resolving weather for a location.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The provider answered with a non-success status.
    #[error("Weather provider request failed with status {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The provider did not answer within the configured timeout.
    #[error("Weather provider request timed out after {0} ms")]
    Timeout(u64),

    /// Network-level failure talking to the provider.
    #[error("Failed to reach weather provider: {0}")]
    Request(String),

    /// The provider's response body could not be understood.
    #[error("Failed to parse weather provider response: {0}")]
    Parse(String),

    /// Required configuration is missing or malformed.
    #[error("{0}")]
    Configuration(String),
}

impl WeatherError {
    /// Whether the failure originated on the provider side of the call.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Upstream { .. } | Self::Timeout(_) | Self::Request(_) | Self::Parse(_)
        )
    }
}
