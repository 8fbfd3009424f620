use chrono::NaiveDate;
use chrono_tz::Tz;
use tracing::debug;

use crate::error::EstimateError;
use crate::models::estimate::{DaylightWindow, GeoLocation, RangeMatrix, WeatherObservation};
use crate::services::sampler::TimeSeriesSampler;
use crate::services::sun_position::SunPositionProvider;

#[derive(Debug, Clone, PartialEq)]
pub struct RangeAggregate {
    pub matrix: RangeMatrix,
    pub total_energy_wh: f64,
}

/// Runs the sampler over every date of a range with one weather snapshot and
/// one daylight window.
pub struct EnergyAggregator<'a, P: SunPositionProvider + ?Sized> {
    sampler: TimeSeriesSampler<'a, P>,
}

impl<'a, P: SunPositionProvider + ?Sized> EnergyAggregator<'a, P> {
    pub fn new(sampler: TimeSeriesSampler<'a, P>) -> Self {
        Self { sampler }
    }

    pub fn sampler(&self) -> &TimeSeriesSampler<'a, P> {
        &self.sampler
    }

    /// Builds the day × hour matrix for `[start_date, end_date]` and its total.
    /// A reversed range is rejected before anything is sampled.
    pub fn aggregate(
        &self,
        location: GeoLocation,
        start_date: NaiveDate,
        end_date: NaiveDate,
        weather: &WeatherObservation,
        window: DaylightWindow,
        tz: &Tz,
    ) -> Result<RangeAggregate, EstimateError> {
        if start_date > end_date {
            return Err(EstimateError::InvalidRange {
                start: start_date,
                end: end_date,
            });
        }

        let days = start_date
            .iter_days()
            .take_while(|d| *d <= end_date)
            .map(|day| self.sampler.sample_day(location, day, window, tz, weather))
            .collect();
        let matrix = RangeMatrix { days };
        let total_energy_wh = matrix.total_wh();

        debug!(
            days = matrix.len(),
            total_energy_wh,
            %start_date,
            %end_date,
            "aggregated range"
        );

        Ok(RangeAggregate {
            matrix,
            total_energy_wh,
        })
    }
}
