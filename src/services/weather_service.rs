use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::config::{LocationConfig, WeatherConfig};
use crate::error::WeatherError;
use crate::models::estimate::{GeoLocation, WeatherObservation, WeatherReport};
use crate::models::openweather::{CurrentWeatherResponse, ErrorResponse};

/// Resolves a location name to coordinates, a weather snapshot and the
/// sunrise/sunset instants of the current day.
pub trait WeatherProvider {
    fn observe(
        &self,
        location: &str,
    ) -> impl Future<Output = Result<WeatherReport, WeatherError>> + Send;
}

fn unix_to_utc(secs: i64) -> Result<DateTime<Utc>, WeatherError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| WeatherError::Provider(format!("invalid timestamp {secs}")))
}

impl TryFrom<CurrentWeatherResponse> for WeatherReport {
    type Error = WeatherError;

    fn try_from(resp: CurrentWeatherResponse) -> Result<Self, Self::Error> {
        Ok(WeatherReport {
            location: GeoLocation::new(resp.coord.lat, resp.coord.lon),
            weather: WeatherObservation {
                cloud_cover_pct: resp.clouds.all,
                temperature_c: resp.main.temp,
            },
            sunrise_utc: unix_to_utc(resp.sys.sunrise)?,
            sunset_utc: unix_to_utc(resp.sys.sunset)?,
        })
    }
}

// ─── OpenWeatherMap ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(cfg: &WeatherConfig) -> Result<Self, WeatherError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_s.max(1)))
            .build()?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/data/2.5/weather", self.base_url)
    }

    /// Maps a non-success response to a provider error carrying the message
    /// OpenWeatherMap put in the body.
    fn error_from_body(status: StatusCode, body: &str) -> WeatherError {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .and_then(|e| e.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("HTTP {status}"));
        if status == StatusCode::NOT_FOUND {
            WeatherError::NotFound(message)
        } else {
            WeatherError::Provider(message)
        }
    }
}

impl WeatherProvider for OpenWeatherClient {
    fn observe(
        &self,
        location: &str,
    ) -> impl Future<Output = Result<WeatherReport, WeatherError>> + Send {
        let request = self.http.get(self.endpoint()).query(&[
            ("q", location),
            ("appid", self.api_key.as_str()),
            ("units", "metric"),
        ]);
        let location = location.to_string();

        async move {
            let response = request.send().await?;
            let status = response.status();
            let body = response.text().await?;
            if !status.is_success() {
                let err = Self::error_from_body(status, &body);
                warn!(%location, %status, "weather request rejected: {}", err);
                return Err(err);
            }

            let parsed: CurrentWeatherResponse = serde_json::from_str(&body)
                .map_err(|e| WeatherError::Provider(format!("unexpected response: {e}")))?;
            debug!(
                %location,
                resolved = parsed.name.as_deref().unwrap_or(""),
                lat = parsed.coord.lat,
                lon = parsed.coord.lon,
                clouds = parsed.clouds.all,
                temp = parsed.main.temp,
                "weather observation received"
            );
            WeatherReport::try_from(parsed)
        }
    }
}

// ─── Offline snapshots ───────────────────────────────────────────────────────

/// Serves the weather snapshots listed in the configuration file.
#[derive(Debug, Clone, Default)]
pub struct StaticWeatherProvider {
    locations: Vec<LocationConfig>,
}

impl StaticWeatherProvider {
    pub fn new(locations: Vec<LocationConfig>) -> Self {
        Self { locations }
    }

    pub fn lookup(&self, location: &str) -> Result<WeatherReport, WeatherError> {
        let wanted = location.trim();
        let entry = self
            .locations
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| WeatherError::NotFound(format!("city not found: {wanted}")))?;
        Ok(WeatherReport {
            location: GeoLocation::new(entry.latitude, entry.longitude),
            weather: WeatherObservation {
                cloud_cover_pct: entry.cloud_cover_pct,
                temperature_c: entry.temperature_c,
            },
            sunrise_utc: entry.sunrise,
            sunset_utc: entry.sunset,
        })
    }
}

impl WeatherProvider for StaticWeatherProvider {
    fn observe(
        &self,
        location: &str,
    ) -> impl Future<Output = Result<WeatherReport, WeatherError>> + Send {
        let result = self.lookup(location);
        async move { result }
    }
}

// ─── Selection ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum WeatherSource {
    Online(OpenWeatherClient),
    Offline(StaticWeatherProvider),
}

impl WeatherProvider for WeatherSource {
    async fn observe(&self, location: &str) -> Result<WeatherReport, WeatherError> {
        match self {
            WeatherSource::Online(client) => client.observe(location).await,
            WeatherSource::Offline(snapshots) => snapshots.observe(location).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn berlin() -> LocationConfig {
        LocationConfig {
            name: "Berlin".to_string(),
            latitude: 52.52,
            longitude: 13.405,
            cloud_cover_pct: 40.0,
            temperature_c: 18.5,
            sunrise: Utc.with_ymd_and_hms(2025, 6, 21, 2, 43, 0).unwrap(),
            sunset: Utc.with_ymd_and_hms(2025, 6, 21, 19, 33, 0).unwrap(),
            timezone: Some("Europe/Berlin".to_string()),
        }
    }

    #[tokio::test]
    async fn test_static_lookup_is_case_insensitive() {
        let provider = StaticWeatherProvider::new(vec![berlin()]);
        let report = provider.observe("  berlin ").await.unwrap();
        assert_eq!(report.location, GeoLocation::new(52.52, 13.405));
        assert_eq!(report.weather.cloud_cover_pct, 40.0);
        assert_eq!(report.sunrise_utc, berlin().sunrise);
    }

    #[tokio::test]
    async fn test_static_unknown_location() {
        let provider = WeatherSource::Offline(StaticWeatherProvider::new(vec![berlin()]));
        let err = provider.observe("Atlantis").await.unwrap_err();
        assert!(matches!(err, WeatherError::NotFound(_)));
    }

    #[test]
    fn test_report_from_wire_response() {
        let resp: CurrentWeatherResponse = serde_json::from_str(
            r#"{"coord":{"lon":13.41,"lat":52.52},"clouds":{"all":75},
                "main":{"temp":12.5},"sys":{"sunrise":1750473780,"sunset":1750534380}}"#,
        )
        .unwrap();
        let report = WeatherReport::try_from(resp).unwrap();
        assert_eq!(report.weather.cloud_cover_pct, 75.0);
        assert_eq!(report.weather.temperature_c, 12.5);
        assert_eq!(report.sunrise_utc.timestamp(), 1750473780);
        assert!(report.sunrise_utc < report.sunset_utc);
    }

    #[test]
    fn test_error_body_mapping() {
        let err = OpenWeatherClient::error_from_body(
            StatusCode::NOT_FOUND,
            r#"{"cod":"404","message":"city not found"}"#,
        );
        assert!(matches!(err, WeatherError::NotFound(ref m) if m == "city not found"));

        let err = OpenWeatherClient::error_from_body(
            StatusCode::UNAUTHORIZED,
            r#"{"cod":401,"message":"Invalid API key."}"#,
        );
        assert!(matches!(err, WeatherError::Provider(ref m) if m == "Invalid API key."));

        let err = OpenWeatherClient::error_from_body(StatusCode::BAD_GATEWAY, "<html>");
        assert!(matches!(err, WeatherError::Provider(ref m) if m.contains("502")));
    }

    #[test]
    fn test_client_trims_base_url() {
        let client = OpenWeatherClient::new(&WeatherConfig {
            api_key: "k".to_string(),
            base_url: "http://localhost:9/".to_string(),
            timeout_s: 1,
        })
        .unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9/data/2.5/weather");
    }
}
