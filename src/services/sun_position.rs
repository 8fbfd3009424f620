/// ============================================================
///  Sun position oracle
///
///   1. Fractional year   – day of year + UTC hour
///   2. Declination       – Spencer (1971) Fourier series
///   3. Equation of time  – Spencer (1971), minutes
///   4. True solar time   – UTC minutes + EoT + 4 min/° longitude
///   5. Altitude          – sin α = sin φ sin δ + cos φ cos δ cos ω
/// ============================================================

use chrono::{DateTime, Datelike, Timelike, Utc};
use std::f64::consts::PI;

use crate::models::estimate::GeoLocation;

const DEG: f64 = PI / 180.0;

/// Sun altitude above the horizon for a UTC instant. Implementations must be
/// deterministic; time-zone handling is the caller's job.
pub trait SunPositionProvider {
    fn altitude_deg(&self, location: GeoLocation, utc: DateTime<Utc>) -> f64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SpencerSunPosition;

impl SpencerSunPosition {
    /// Declination (rad) and equation of time (min) for a fractional year `b`.
    fn declination_and_eot(b: f64) -> (f64, f64) {
        let decl = 0.006918
            - 0.399912 * b.cos()
            + 0.070257 * b.sin()
            - 0.006758 * (2.0 * b).cos()
            + 0.000907 * (2.0 * b).sin()
            - 0.002697 * (3.0 * b).cos()
            + 0.00148 * (3.0 * b).sin();

        let eot_min = 229.18
            * (0.000075
                + 0.001868 * b.cos()
                - 0.032077 * b.sin()
                - 0.014615 * (2.0 * b).cos()
                - 0.04089 * (2.0 * b).sin());

        (decl, eot_min)
    }
}

impl SunPositionProvider for SpencerSunPosition {
    fn altitude_deg(&self, location: GeoLocation, utc: DateTime<Utc>) -> f64 {
        // ── 1. Time decomposition ──────────────────────────────
        let days_in_year = if utc.date_naive().leap_year() { 366.0 } else { 365.0 };
        let ut_h = utc.hour() as f64
            + utc.minute() as f64 / 60.0
            + utc.second() as f64 / 3600.0;
        let b = 2.0 * PI / days_in_year * (utc.ordinal() as f64 - 1.0 + (ut_h - 12.0) / 24.0);

        // ── 2. Declination & equation of time ─────────────────
        let (decl, eot_min) = Self::declination_and_eot(b);

        // ── 3. Hour angle (negative in the morning) ───────────
        let tst_min = (ut_h * 60.0 + eot_min + 4.0 * location.longitude).rem_euclid(1440.0);
        let omega = (tst_min / 4.0 - 180.0) * DEG;

        // ── 4. Altitude ────────────────────────────────────────
        let lat = location.latitude * DEG;
        let sin_alpha = lat.sin() * decl.sin() + lat.cos() * decl.cos() * omega.cos();
        sin_alpha.clamp(-1.0, 1.0).asin() / DEG
    }
}
