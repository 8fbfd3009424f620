use serde::Deserialize;

// ─── OpenWeatherMap "current weather" wire types ─────────────────────────────
// Only the fields the estimator reads are declared; the rest is ignored.

#[derive(Debug, Deserialize)]
pub struct CurrentWeatherResponse {
    pub coord: Coord,
    pub clouds: Clouds,
    pub main: MainData,
    pub sys: SysData,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
pub struct Clouds {
    /// Cloudiness (%)
    pub all: f64,
}

#[derive(Debug, Deserialize)]
pub struct MainData {
    /// Temperature (°C with `units=metric`)
    pub temp: f64,
}

#[derive(Debug, Deserialize)]
pub struct SysData {
    /// Unix seconds, UTC
    pub sunrise: i64,
    /// Unix seconds, UTC
    pub sunset: i64,
}

/// Error body. `cod` is a number on success but usually a string ("404") on
/// errors, so both are accepted.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub cod: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}
