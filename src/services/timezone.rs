use std::fmt;
use std::sync::Arc;

use chrono_tz::Tz;
use tracing::{debug, warn};
use tzf_rs::DefaultFinder;

use crate::config::LocationConfig;
use crate::models::estimate::GeoLocation;

/// Coordinates closer than this (degrees) to a configured location share its
/// time zone.
const MATCH_TOLERANCE_DEG: f64 = 0.01;

/// Maps coordinates to a time zone. Never fails: UTC is the last resort.
pub trait TimeZoneResolver {
    fn resolve(&self, location: GeoLocation) -> Tz;
}

/// Nautical zone of a longitude, e.g. 13.4° E → `Etc/GMT-1` (UTC+1).
/// Non-finite or out-of-range longitudes fall back to UTC.
pub fn nautical_zone(longitude: f64) -> Tz {
    if !longitude.is_finite() || longitude.abs() > 180.0 {
        return Tz::UTC;
    }
    let offset_h = (longitude / 15.0).round() as i32;
    let name = match offset_h {
        0 => "Etc/GMT".to_string(),
        // IANA Etc zones carry the inverted sign
        h if h > 0 => format!("Etc/GMT-{h}"),
        h => format!("Etc/GMT+{}", -h),
    };
    name.parse().unwrap_or(Tz::UTC)
}

/// Configured zones first, then the zone polygon containing the point (when
/// the boundary lookup is enabled), then the nautical zone of the longitude.
#[derive(Clone, Default)]
pub struct ConfiguredZoneResolver {
    zones: Vec<(GeoLocation, Tz)>,
    finder: Option<Arc<DefaultFinder>>,
}

impl fmt::Debug for ConfiguredZoneResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfiguredZoneResolver")
            .field("zones", &self.zones)
            .field("boundary_lookup", &self.finder.is_some())
            .finish()
    }
}

impl ConfiguredZoneResolver {
    pub fn new(zones: Vec<(GeoLocation, Tz)>) -> Self {
        Self {
            zones,
            finder: None,
        }
    }

    /// Enables the IANA boundary lookup for coordinates with no configured
    /// zone. Loading the boundary data takes a moment, so do it once.
    #[must_use]
    pub fn with_boundary_lookup(mut self) -> Self {
        self.finder = Some(Arc::new(DefaultFinder::new()));
        self
    }

    fn configured(&self, location: GeoLocation) -> Option<Tz> {
        self.zones
            .iter()
            .find(|(geo, _)| {
                (geo.latitude - location.latitude).abs() <= MATCH_TOLERANCE_DEG
                    && (geo.longitude - location.longitude).abs() <= MATCH_TOLERANCE_DEG
            })
            .map(|(_, tz)| *tz)
    }

    fn boundary(&self, location: GeoLocation) -> Option<Tz> {
        let finder = self.finder.as_ref()?;
        if !location.latitude.is_finite() || !location.longitude.is_finite() {
            return None;
        }
        let name = finder.get_tz_name(location.longitude, location.latitude);
        match name.parse::<Tz>() {
            Ok(tz) => Some(tz),
            Err(_) => {
                debug!(lat = location.latitude, lon = location.longitude, name, "no boundary zone");
                None
            }
        }
    }

    /// Collects the locations that name a valid IANA zone; unknown names are
    /// logged and skipped.
    pub fn from_locations(locations: &[LocationConfig]) -> Self {
        let zones = locations
            .iter()
            .filter_map(|l| {
                let name = l.timezone.as_deref()?;
                match name.parse::<Tz>() {
                    Ok(tz) => Some((GeoLocation::new(l.latitude, l.longitude), tz)),
                    Err(_) => {
                        warn!(location = %l.name, timezone = name, "unknown time zone, ignored");
                        None
                    }
                }
            })
            .collect();
        Self::new(zones)
    }
}

impl TimeZoneResolver for ConfiguredZoneResolver {
    fn resolve(&self, location: GeoLocation) -> Tz {
        self.configured(location)
            .or_else(|| self.boundary(location))
            .unwrap_or_else(|| nautical_zone(location.longitude))
    }
}
