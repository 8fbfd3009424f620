use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const CONFIG_PATH_ENV: &str = "SOLAR_ESTIMATOR_CONFIG";
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

fn default_offline_mode() -> bool { false }
fn default_port() -> u16 { 8080 }
fn default_base_url() -> String { "https://api.openweathermap.org".to_string() }
fn default_timeout_s() -> u64 { 10 }
fn default_area_m2() -> f64 { 10.0 }
fn default_efficiency() -> f64 { 0.18 }
fn default_temperature_coefficient() -> f64 { -0.005 }

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default = "default_offline_mode")]
    pub offline_mode: bool,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub panel: PanelConfig,
    #[serde(default)]
    pub locations: Vec<LocationConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: default_port() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_s")]
    pub timeout_s: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            timeout_s: default_timeout_s(),
        }
    }
}

/// PV array parameters used by the irradiance model.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, ToSchema)]
pub struct PanelConfig {
    /// Panel surface (m²)
    #[serde(default = "default_area_m2")]
    pub area_m2: f64,
    /// Conversion efficiency at 25 °C (0..1)
    #[serde(default = "default_efficiency")]
    pub efficiency: f64,
    /// Fractional efficiency change per °C above 25 °C
    #[serde(default = "default_temperature_coefficient")]
    pub temperature_coefficient: f64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            area_m2: default_area_m2(),
            efficiency: default_efficiency(),
            temperature_coefficient: default_temperature_coefficient(),
        }
    }
}

/// A known location: feeds the offline weather provider and pins the time
/// zone for its coordinates.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LocationConfig {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub cloud_cover_pct: f64,
    pub temperature_c: f64,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    #[serde(default)]
    pub timezone: Option<String>,
}

impl Config {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Path from `SOLAR_ESTIMATOR_CONFIG`, else `config.json`.
    pub fn path_from_env() -> String {
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
    }

    /// `OPENWEATHER_API_KEY` takes precedence over the file's key.
    pub fn apply_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.weather.api_key = key;
            }
        }
        self
    }

    /// Offline when explicitly requested or when no API key is available.
    pub fn use_offline_weather(&self) -> bool {
        self.offline_mode || self.weather.api_key.trim().is_empty()
    }
}
