use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use axum::extract::FromRef;
use tracing::warn;

use crate::config::PanelConfig;
use crate::models::estimate::LocationResult;
use crate::services::comparison::Comparison;
use crate::services::estimation_service::Estimator;

#[derive(Clone, Debug)]
pub struct AppState {
    pub estimator: Arc<Estimator>,
    /// Comparison session of this process, reset on demand
    pub comparison: Arc<RwLock<Comparison>>,
}

impl AppState {
    pub fn new(estimator: Estimator) -> Self {
        Self {
            estimator: Arc::new(estimator),
            comparison: Arc::new(RwLock::new(Comparison::new())),
        }
    }

    pub fn panel(&self) -> PanelConfig {
        *self.estimator.model().panel()
    }

    // Every update is a single assignment, so a poisoned session is still
    // consistent.
    fn session_mut(&self) -> RwLockWriteGuard<'_, Comparison> {
        self.comparison.write().unwrap_or_else(|poisoned| {
            warn!("comparison session lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn session(&self) -> RwLockReadGuard<'_, Comparison> {
        self.comparison.read().unwrap_or_else(|poisoned| {
            warn!("comparison session lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Appends to the session and returns a copy of it.
    pub fn record(&self, results: Vec<LocationResult>) -> Comparison {
        let mut guard = self.session_mut();
        let current = std::mem::take(&mut *guard);
        *guard = current.extend(results);
        guard.clone()
    }

    pub fn snapshot(&self) -> Comparison {
        self.session().clone()
    }

    pub fn reset(&self) {
        *self.session_mut() = Comparison::new();
    }
}

/// Lets handlers extract the panel parameters directly.
impl FromRef<AppState> for PanelConfig {
    fn from_ref(state: &AppState) -> Self {
        state.panel()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::LocationConfig;
    use crate::services::estimation_service::EstimationService;
    use crate::services::irradiance::IrradianceModel;
    use crate::services::sun_position::SpencerSunPosition;
    use crate::services::timezone::ConfiguredZoneResolver;
    use crate::services::weather_service::{StaticWeatherProvider, WeatherSource};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn location(name: &str, lat: f64, lon: f64, clouds: f64, tz: &str) -> LocationConfig {
        LocationConfig {
            name: name.to_string(),
            latitude: lat,
            longitude: lon,
            cloud_cover_pct: clouds,
            temperature_c: 22.0,
            sunrise: Utc.with_ymd_and_hms(2025, 6, 21, 3, 0, 0).unwrap(),
            sunset: Utc.with_ymd_and_hms(2025, 6, 21, 17, 0, 0).unwrap(),
            timezone: Some(tz.to_string()),
        }
    }

    /// State backed by the offline provider with Berlin and Cairo snapshots.
    pub(crate) fn offline_state() -> AppState {
        let locations = vec![
            location("Berlin", 52.52, 13.405, 40.0, "Europe/Berlin"),
            location("Cairo", 30.0444, 31.2357, 0.0, "Africa/Cairo"),
        ];
        AppState::new(EstimationService::new(
            WeatherSource::Offline(StaticWeatherProvider::new(locations.clone())),
            ConfiguredZoneResolver::from_locations(&locations),
            SpencerSunPosition,
            IrradianceModel::new(PanelConfig::default()),
        ))
    }

    pub(crate) fn june(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    async fn estimate(state: &AppState, name: &str) -> LocationResult {
        state
            .estimator
            .estimate_location(name, june(21), june(22))
            .await
            .unwrap()
    }

    fn names(cmp: &Comparison) -> Vec<String> {
        cmp.rows().into_iter().map(|r| r.name).collect()
    }

    #[tokio::test]
    async fn test_session_accumulates_in_order() {
        let state = offline_state();
        let berlin = estimate(&state, "Berlin").await;
        let cairo = estimate(&state, "Cairo").await;

        let first = state.record(vec![berlin.clone()]);
        assert_eq!(names(&first), vec!["Berlin"]);

        let second = state.record(vec![cairo]);
        assert_eq!(names(&second), vec!["Berlin", "Cairo"]);
        assert_eq!(second.results()[0], berlin);
        assert_eq!(names(&state.snapshot()), vec!["Berlin", "Cairo"]);
        // earlier copies are not affected by later appends
        assert_eq!(first.len(), 1);
    }

    #[tokio::test]
    async fn test_reset_empties_session() {
        let state = offline_state();
        let berlin = estimate(&state, "Berlin").await;
        state.record(vec![berlin]);
        state.reset();
        assert!(state.snapshot().is_empty());

        let cairo = estimate(&state, "Cairo").await;
        assert_eq!(names(&state.record(vec![cairo])), vec!["Cairo"]);
    }

    #[tokio::test]
    async fn test_record_survives_poisoned_lock() {
        let state = offline_state();
        let berlin = estimate(&state, "Berlin").await;
        state.record(vec![berlin.clone()]);

        let lock = state.comparison.clone();
        let _ = std::thread::spawn(move || {
            let _guard = lock.write().unwrap();
            panic!("writer panicked");
        })
        .join();
        assert!(state.comparison.is_poisoned());

        let session = state.record(vec![berlin]);
        assert_eq!(session.len(), 2);
        assert_eq!(state.snapshot().len(), 2);
        state.reset();
        assert!(state.snapshot().is_empty());
    }

    #[test]
    fn test_panel_from_state() {
        let state = offline_state();
        assert_eq!(PanelConfig::from_ref(&state), PanelConfig::default());
    }
}
