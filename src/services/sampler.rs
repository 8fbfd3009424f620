use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::trace;

use crate::models::estimate::{
    DayVector, DaylightWindow, EnergySample, GeoLocation, TimeSample, WeatherObservation,
};
use crate::services::irradiance::IrradianceModel;
use crate::services::sun_position::SunPositionProvider;

/// Maps a local wall-clock time to UTC. Ambiguous times (clocks set back)
/// take the earlier instant; times skipped by a forward jump use the offset
/// in effect just before the gap.
pub fn local_to_utc(tz: &Tz, local: NaiveDateTime) -> DateTime<Utc> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(t) => t.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            let before = tz.offset_from_utc_datetime(&(local - Duration::hours(3)));
            let offset = chrono::Offset::fix(&before);
            Utc.from_utc_datetime(&(local - Duration::seconds(offset.local_minus_utc() as i64)))
        }
    }
}

/// Grid points one hour apart, from `day @ sunrise` up to and including the
/// sunset instant, which falls `sunset_day_offset` days later. Steps are in
/// elapsed time, so a DST jump shifts the wall clock but never repeats or
/// drops an instant.
pub fn hourly_grid(day: NaiveDate, window: DaylightWindow, tz: &Tz) -> Vec<TimeSample> {
    let sunset_day = day + Duration::days(window.sunset_day_offset);
    let end = local_to_utc(tz, sunset_day.and_time(window.sunset));
    let mut utc = local_to_utc(tz, day.and_time(window.sunrise));
    let mut grid = Vec::new();
    while utc <= end {
        grid.push(TimeSample {
            local: utc.with_timezone(tz).naive_local(),
            utc,
        });
        utc += Duration::hours(1);
    }
    grid
}

/// Walks the hourly grid of one day and turns each grid point into an energy
/// sample.
pub struct TimeSeriesSampler<'a, P: SunPositionProvider + ?Sized> {
    sun: &'a P,
    model: IrradianceModel,
}

impl<'a, P: SunPositionProvider + ?Sized> TimeSeriesSampler<'a, P> {
    pub fn new(sun: &'a P, model: IrradianceModel) -> Self {
        Self { sun, model }
    }

    pub fn sample_day(
        &self,
        location: GeoLocation,
        day: NaiveDate,
        window: DaylightWindow,
        tz: &Tz,
        weather: &WeatherObservation,
    ) -> DayVector {
        let samples = hourly_grid(day, window, tz)
            .into_iter()
            .map(|ts| {
                let altitude_deg = self.sun.altitude_deg(location, ts.utc);
                let est = self
                    .model
                    .estimate(altitude_deg, weather.cloud_cover_pct, weather.temperature_c);
                trace!(
                    local = %ts.local,
                    utc = %ts.utc,
                    altitude_deg,
                    irradiance_w_m2 = est.irradiance_w_m2,
                    energy_wh = est.energy_wh,
                    "sample"
                );
                EnergySample {
                    local_time: ts.local,
                    utc_time: ts.utc,
                    altitude_deg,
                    irradiance_w_m2: est.irradiance_w_m2,
                    energy_wh: est.energy_wh,
                }
            })
            .collect();

        DayVector { date: day, samples }
    }
}
