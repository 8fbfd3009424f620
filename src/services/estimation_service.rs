use chrono::NaiveDate;
use futures_util::future::join_all;
use tracing::{info, warn};

use crate::error::EstimateError;
use crate::models::estimate::{DaylightWindow, LocationResult};
use crate::services::aggregator::EnergyAggregator;
use crate::services::irradiance::IrradianceModel;
use crate::services::sampler::TimeSeriesSampler;
use crate::services::sun_position::{SpencerSunPosition, SunPositionProvider};
use crate::services::timezone::{ConfiguredZoneResolver, TimeZoneResolver};
use crate::services::weather_service::{WeatherProvider, WeatherSource};

/// The service as wired by the binary.
pub type Estimator = EstimationService<WeatherSource, ConfiguredZoneResolver, SpencerSunPosition>;

/// One run per location: weather snapshot → time zone → daylight window →
/// range aggregate → [`LocationResult`].
#[derive(Debug, Clone)]
pub struct EstimationService<W, Z, S> {
    weather: W,
    zones: Z,
    sun: S,
    model: IrradianceModel,
}

impl<W, Z, S> EstimationService<W, Z, S>
where
    W: WeatherProvider,
    Z: TimeZoneResolver,
    S: SunPositionProvider,
{
    pub fn new(weather: W, zones: Z, sun: S, model: IrradianceModel) -> Self {
        Self {
            weather,
            zones,
            sun,
            model,
        }
    }

    pub fn model(&self) -> &IrradianceModel {
        &self.model
    }

    /// Estimates the yield of `name` over `[start_date, end_date]`.
    ///
    /// The range is checked before the provider is contacted; a provider
    /// failure ends the run before any sampling.
    pub async fn estimate_location(
        &self,
        name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<LocationResult, EstimateError> {
        if start_date > end_date {
            return Err(EstimateError::InvalidRange {
                start: start_date,
                end: end_date,
            });
        }

        let report = self
            .weather
            .observe(name)
            .await
            .map_err(|e| EstimateError::upstream(name, e))?;

        let tz = self.zones.resolve(report.location);
        let sunrise = report.sunrise_utc.with_timezone(&tz);
        let sunset = report.sunset_utc.with_timezone(&tz);
        let window = DaylightWindow::from_instants(&sunrise, &sunset);

        let aggregator = EnergyAggregator::new(TimeSeriesSampler::new(&self.sun, self.model));
        let aggregate = aggregator.aggregate(
            report.location,
            start_date,
            end_date,
            &report.weather,
            window,
            &tz,
        )?;

        info!(
            location = name,
            timezone = tz.name(),
            lat = report.location.latitude,
            lon = report.location.longitude,
            clouds = report.weather.cloud_cover_pct,
            temp = report.weather.temperature_c,
            sunrise = %sunrise,
            sunset = %sunset,
            total_wh = aggregate.total_energy_wh,
            "estimate complete"
        );

        Ok(LocationResult {
            name: name.trim().to_string(),
            location: report.location,
            weather: report.weather,
            matrix: aggregate.matrix,
            total_energy_wh: aggregate.total_energy_wh,
            sunrise: sunrise.fixed_offset(),
            sunset: sunset.fixed_offset(),
            timezone: tz.name().to_string(),
            start_date,
            end_date,
        })
    }

    /// Runs every location concurrently. Results come back in input order,
    /// each one independent of the others.
    pub async fn compare_locations(
        &self,
        names: &[String],
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Vec<(String, Result<LocationResult, EstimateError>)> {
        let runs = names.iter().map(|name| async move {
            let result = self.estimate_location(name, start_date, end_date).await;
            if let Err(e) = &result {
                warn!(location = %name, "estimate failed: {}", e);
            }
            (name.clone(), result)
        });
        join_all(runs).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LocationConfig, PanelConfig};
    use crate::error::WeatherError;
    use crate::services::weather_service::StaticWeatherProvider;
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn locations() -> Vec<LocationConfig> {
        vec![
            LocationConfig {
                name: "Berlin".to_string(),
                latitude: 52.52,
                longitude: 13.405,
                cloud_cover_pct: 40.0,
                temperature_c: 18.5,
                sunrise: Utc.with_ymd_and_hms(2025, 6, 21, 2, 43, 0).unwrap(),
                sunset: Utc.with_ymd_and_hms(2025, 6, 21, 19, 33, 0).unwrap(),
                timezone: Some("Europe/Berlin".to_string()),
            },
            LocationConfig {
                name: "Reykjavik".to_string(),
                latitude: 64.1466,
                longitude: -21.9426,
                cloud_cover_pct: 20.0,
                temperature_c: 12.0,
                sunrise: Utc.with_ymd_and_hms(2025, 6, 21, 2, 55, 0).unwrap(),
                sunset: Utc.with_ymd_and_hms(2025, 6, 22, 0, 4, 0).unwrap(),
                timezone: Some("Atlantic/Reykjavik".to_string()),
            },
        ]
    }

    fn service() -> EstimationService<StaticWeatherProvider, ConfiguredZoneResolver, SpencerSunPosition>
    {
        EstimationService::new(
            StaticWeatherProvider::new(locations()),
            ConfiguredZoneResolver::from_locations(&locations()),
            SpencerSunPosition,
            IrradianceModel::new(PanelConfig::default()),
        )
    }

    #[tokio::test]
    async fn test_estimate_uses_local_daylight_window() {
        let result = service()
            .estimate_location("Berlin", date(2025, 6, 21), date(2025, 6, 22))
            .await
            .unwrap();
        assert_eq!(result.timezone, "Europe/Berlin");
        assert_eq!(result.sunrise.format("%H:%M").to_string(), "04:43");
        assert_eq!(result.sunset.format("%H:%M").to_string(), "21:33");
        assert_eq!(result.matrix.len(), 2);
        let first = &result.matrix.days[0].samples[0];
        assert_eq!(first.local_time.format("%H:%M").to_string(), "04:43");
        assert_eq!(first.utc_time, Utc.with_ymd_and_hms(2025, 6, 21, 2, 43, 0).unwrap());
        assert_eq!(result.total_energy_wh, result.matrix.total_wh());
        assert!(result.total_energy_wh > 0.0);
    }

    #[tokio::test]
    async fn test_sunset_after_local_midnight_still_samples() {
        let result = service()
            .estimate_location("Reykjavik", date(2025, 6, 21), date(2025, 6, 22))
            .await
            .unwrap();
        assert_eq!(result.sunset.format("%Y-%m-%d %H:%M").to_string(), "2025-06-22 00:04");
        assert_eq!(result.matrix.len(), 2);
        for day in &result.matrix.days {
            assert_eq!(day.len(), 22);
            assert!(day.total_wh() > 0.0);
        }
        assert!(result.total_energy_wh > 0.0);
    }

    #[tokio::test]
    async fn test_unknown_location_is_upstream_error() {
        let err = service()
            .estimate_location("Atlantis", date(2025, 6, 21), date(2025, 6, 21))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EstimateError::UpstreamData {
                source: WeatherError::NotFound(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_reversed_range_rejected_before_fetch() {
        let err = service()
            .estimate_location("Atlantis", date(2025, 6, 22), date(2025, 6, 21))
            .await
            .unwrap_err();
        assert!(matches!(err, EstimateError::InvalidRange { .. }));
    }

    #[tokio::test]
    async fn test_one_failure_does_not_abort_others() {
        let names = vec!["Atlantis".to_string(), "Berlin".to_string()];
        let results = service()
            .compare_locations(&names, date(2025, 6, 21), date(2025, 6, 21))
            .await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, "Atlantis");
        assert!(results[0].1.is_err());
        assert_eq!(results[1].0, "Berlin");
        assert!(results[1].1.is_ok());
    }
}
