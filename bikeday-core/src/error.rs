use thiserror::Error;

/// A forecast value that cannot be scored.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("wind speed must not be negative, got {0} m/s")]
    NegativeWindSpeed(f64),

    #[error("precipitation must not be negative, got {0} mm")]
    NegativePrecipitation(f64),

    #[error("latitude {latitude} / longitude {longitude} is outside the valid range")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
}

/// Failure to obtain a forecast from a remote provider.
///
/// Callers decide what to do with it; the usual choice is to fall back to
/// [`crate::fallback::sample_forecasts`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to reach {provider}: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} request failed with status {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("failed to parse {provider} response: {source}")]
    Decode {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{provider} response contained no forecast data")]
    Empty { provider: &'static str },

    #[error("{provider} returned an unusable record: {source}")]
    InvalidRecord {
        provider: &'static str,
        #[source]
        source: ForecastError,
    },
}
