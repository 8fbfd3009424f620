use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::estimate::LocationResult;

/// One line of the comparison table.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ComparisonRow {
    pub name: String,
    pub timezone: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: usize,
    pub total_energy_wh: f64,
    pub mean_daily_energy_wh: f64,
    /// Largest single hourly sample (Wh)
    pub peak_sample_wh: f64,
    /// Per-day totals in date order (Wh)
    pub daily_energy_wh: Vec<f64>,
    /// Per-hour sums aligned by index from sunrise (Wh)
    pub hourly_profile_wh: Vec<f64>,
}

impl From<&LocationResult> for ComparisonRow {
    fn from(r: &LocationResult) -> Self {
        let days = r.matrix.len();
        let mean_daily_energy_wh = if days > 0 {
            r.total_energy_wh / days as f64
        } else {
            0.0
        };
        Self {
            name: r.name.clone(),
            timezone: r.timezone.clone(),
            start_date: r.start_date,
            end_date: r.end_date,
            days,
            total_energy_wh: r.total_energy_wh,
            mean_daily_energy_wh,
            peak_sample_wh: r.matrix.peak_wh(),
            daily_energy_wh: r.matrix.daily_totals().into_iter().map(|(_, e)| e).collect(),
            hourly_profile_wh: r.matrix.hourly_profile(),
        }
    }
}

/// Append-only list of completed runs, owned by the caller. Entries keep
/// insertion order and are never modified once added.
#[derive(Debug, Clone, Default)]
pub struct Comparison {
    results: Vec<LocationResult>,
}

impl Comparison {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, result: LocationResult) -> Self {
        self.results.push(result);
        self
    }

    #[must_use]
    pub fn extend<I: IntoIterator<Item = LocationResult>>(mut self, results: I) -> Self {
        self.results.extend(results);
        self
    }

    pub fn results(&self) -> &[LocationResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn rows(&self) -> Vec<ComparisonRow> {
        self.results.iter().map(ComparisonRow::from).collect()
    }

    /// Row with the largest total; the first one wins a tie.
    pub fn best(&self) -> Option<ComparisonRow> {
        self.results
            .iter()
            .fold(None::<&LocationResult>, |best, r| match best {
                Some(b) if b.total_energy_wh >= r.total_energy_wh => Some(b),
                _ => Some(r),
            })
            .map(ComparisonRow::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::estimate::{
        DayVector, EnergySample, GeoLocation, RangeMatrix, WeatherObservation,
    };
    use chrono::{TimeZone, Utc};

    fn result(name: &str, energies: &[&[f64]]) -> LocationResult {
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let days: Vec<DayVector> = energies
            .iter()
            .enumerate()
            .map(|(i, day)| {
                let date = start + chrono::Duration::days(i as i64);
                DayVector {
                    date,
                    samples: day
                        .iter()
                        .enumerate()
                        .map(|(h, e)| {
                            let local = date.and_hms_opt(6 + h as u32, 0, 0).unwrap();
                            EnergySample {
                                local_time: local,
                                utc_time: Utc.from_utc_datetime(&local),
                                altitude_deg: 20.0,
                                irradiance_w_m2: 300.0,
                                energy_wh: *e,
                            }
                        })
                        .collect(),
                }
            })
            .collect();
        let matrix = RangeMatrix { days };
        let sunrise = Utc.with_ymd_and_hms(2025, 6, 1, 4, 0, 0).unwrap().fixed_offset();
        LocationResult {
            name: name.to_string(),
            location: GeoLocation::new(0.0, 0.0),
            weather: WeatherObservation {
                cloud_cover_pct: 0.0,
                temperature_c: 25.0,
            },
            total_energy_wh: matrix.total_wh(),
            end_date: start + chrono::Duration::days(energies.len() as i64 - 1),
            matrix,
            sunrise,
            sunset: sunrise,
            timezone: "UTC".to_string(),
            start_date: start,
        }
    }

    #[test]
    fn test_append_keeps_order() {
        let cmp = Comparison::new()
            .with(result("Rome", &[&[1.0, 2.0]]))
            .extend(vec![result("Oslo", &[&[0.5]]), result("Cairo", &[&[3.0]])]);
        let names: Vec<_> = cmp.rows().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Rome", "Oslo", "Cairo"]);
        assert_eq!(cmp.len(), 3);
    }

    #[test]
    fn test_row_statistics() {
        let row = ComparisonRow::from(&result("Rome", &[&[1.0, 2.0], &[0.0, 3.0, 1.0]]));
        assert_eq!(row.days, 2);
        assert_eq!(row.total_energy_wh, 7.0);
        assert_eq!(row.mean_daily_energy_wh, 3.5);
        assert_eq!(row.peak_sample_wh, 3.0);
        assert_eq!(row.daily_energy_wh, vec![3.0, 4.0]);
        assert_eq!(row.hourly_profile_wh, vec![1.0, 5.0, 1.0]);
    }

    #[test]
    fn test_best_location() {
        let cmp = Comparison::new()
            .with(result("Rome", &[&[2.0]]))
            .with(result("Cairo", &[&[5.0]]))
            .with(result("Athens", &[&[5.0]]));
        assert_eq!(cmp.best().unwrap().name, "Cairo");
        assert!(Comparison::new().best().is_none());
    }
}
