use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Geographic coordinates in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoLocation {
    /// Latitude (−90 … +90)
    pub latitude: f64,
    /// Longitude (−180 … +180)
    pub longitude: f64,
}

impl GeoLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// One weather snapshot. The same observation is applied to every sample of a
/// run, for every day of the requested range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeatherObservation {
    /// Cloud cover in percent (0 = clear, 100 = overcast)
    pub cloud_cover_pct: f64,
    /// Ambient temperature (°C)
    pub temperature_c: f64,
}

/// Sunrise and sunset time-of-day in the location's local zone, taken from the
/// reference day of a run and reused for every date of the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaylightWindow {
    pub sunrise: NaiveTime,
    pub sunset: NaiveTime,
    /// Local days from sunrise to sunset; 1 when the sun sets after midnight
    #[serde(default)]
    pub sunset_day_offset: i64,
}

impl DaylightWindow {
    /// Sunrise and sunset on the same local date.
    pub fn new(sunrise: NaiveTime, sunset: NaiveTime) -> Self {
        Self {
            sunrise,
            sunset,
            sunset_day_offset: 0,
        }
    }

    /// Window of two local instants, keeping the date gap between them.
    pub fn from_instants<T: TimeZone>(sunrise: &DateTime<T>, sunset: &DateTime<T>) -> Self {
        Self {
            sunrise: sunrise.time(),
            sunset: sunset.time(),
            sunset_day_offset: (sunset.date_naive() - sunrise.date_naive()).num_days(),
        }
    }
}

/// What a weather provider returns for a location name.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub location: GeoLocation,
    pub weather: WeatherObservation,
    pub sunrise_utc: DateTime<Utc>,
    pub sunset_utc: DateTime<Utc>,
}

// ─── Samples ─────────────────────────────────────────────────────────────────

/// A grid point of the hourly sampler: local wall-clock time and the UTC
/// instant it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSample {
    pub local: NaiveDateTime,
    pub utc: DateTime<Utc>,
}

/// Energy attributed to one hourly sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EnergySample {
    /// Local wall-clock time of the sample
    pub local_time: NaiveDateTime,
    pub utc_time: DateTime<Utc>,
    /// Sun altitude above the horizon (deg); negative below
    pub altitude_deg: f64,
    pub irradiance_w_m2: f64,
    /// Energy over the one-hour interval (Wh), never negative
    pub energy_wh: f64,
}

/// All samples of one calendar day, ascending by time of day. The length
/// depends on the daylight window and DST transitions, so it is not fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DayVector {
    pub date: NaiveDate,
    pub samples: Vec<EnergySample>,
}

impl DayVector {
    pub fn total_wh(&self) -> f64 {
        self.samples.iter().fold(0.0, |acc, s| acc + s.energy_wh)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn peak_wh(&self) -> f64 {
        self.samples.iter().map(|s| s.energy_wh).fold(0.0, f64::max)
    }
}

/// Day × hour grid for one location, ascending by date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RangeMatrix {
    pub days: Vec<DayVector>,
}

impl RangeMatrix {
    /// Sum of every sample, day by day in order.
    pub fn total_wh(&self) -> f64 {
        self.days
            .iter()
            .flat_map(|d| d.samples.iter())
            .fold(0.0, |acc, s| acc + s.energy_wh)
    }

    pub fn daily_totals(&self) -> Vec<(NaiveDate, f64)> {
        self.days.iter().map(|d| (d.date, d.total_wh())).collect()
    }

    /// Energy summed per sample index counted from sunrise. Days shorter than
    /// the longest one simply contribute nothing to the trailing slots.
    pub fn hourly_profile(&self) -> Vec<f64> {
        let width = self.days.iter().map(DayVector::len).max().unwrap_or(0);
        let mut profile = vec![0.0; width];
        for day in &self.days {
            for (slot, sample) in profile.iter_mut().zip(&day.samples) {
                *slot += sample.energy_wh;
            }
        }
        profile
    }

    pub fn peak_wh(&self) -> f64 {
        self.days.iter().map(DayVector::peak_wh).fold(0.0, f64::max)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

// ─── Output ──────────────────────────────────────────────────────────────────

/// Outcome of one successful estimation run for a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LocationResult {
    pub name: String,
    pub location: GeoLocation,
    pub weather: WeatherObservation,
    pub matrix: RangeMatrix,
    /// Sum of every sample in `matrix` (Wh)
    pub total_energy_wh: f64,
    /// Sunrise of the reference day, local time
    pub sunrise: DateTime<FixedOffset>,
    /// Sunset of the reference day, local time
    pub sunset: DateTime<FixedOffset>,
    /// IANA time-zone identifier
    pub timezone: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}
