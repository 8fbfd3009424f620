use chrono::NaiveDate;
use thiserror::Error;

/// Failure of a weather provider to resolve a location.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("location not found: {0}")]
    NotFound(String),
    #[error("weather provider error: {0}")]
    Provider(String),
    #[error("weather request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Run-level failure of an estimation for one location.
#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("weather data unavailable for {location}: {source}")]
    UpstreamData {
        location: String,
        #[source]
        source: WeatherError,
    },
    #[error("end date {end} precedes start date {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

impl EstimateError {
    pub fn upstream(location: &str, source: WeatherError) -> Self {
        Self::UpstreamData {
            location: location.to_string(),
            source,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
