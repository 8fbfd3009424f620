/// ============================================================
///  Irradiance & energy model
///
///   1. Cloud de-rating      – linear in cloud cover percentage
///   2. Irradiance proxy     – solar constant scaled linearly by
///                             altitude / 90° (no air-mass law)
///   3. Temperature derating – linear coefficient around 25 °C (STC)
///   4. Energy               – flux × area × efficiency over one
///                             hour, watt-seconds → watt-hours
/// ============================================================

use crate::config::PanelConfig;

// ─── Physical constants ──────────────────────────────────────
/// Mean extraterrestrial solar flux at 1 AU (W/m²)
pub const SOLAR_CONSTANT: f64 = 1361.0;
/// Standard test condition cell temperature (°C)
pub const REFERENCE_TEMP_C: f64 = 25.0;
const SECONDS_PER_HOUR: f64 = 3600.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrradianceEstimate {
    pub irradiance_w_m2: f64,
    pub temperature_factor: f64,
    pub energy_wh: f64,
}

impl IrradianceEstimate {
    const DARK: Self = Self {
        irradiance_w_m2: 0.0,
        temperature_factor: 1.0,
        energy_wh: 0.0,
    };
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IrradianceModel {
    panel: PanelConfig,
}

impl IrradianceModel {
    pub fn new(panel: PanelConfig) -> Self {
        Self { panel }
    }

    pub fn panel(&self) -> &PanelConfig {
        &self.panel
    }

    /// `1 + k × (T − 25)`, floored at zero.
    pub fn temperature_factor(&self, temp_c: f64) -> f64 {
        (1.0 + self.panel.temperature_coefficient * (temp_c - REFERENCE_TEMP_C)).max(0.0)
    }

    /// Instantaneous flux and the energy it yields over a one-hour sample.
    ///
    /// * `altitude_deg` – sun altitude; at or below 0 nothing is produced
    /// * `cloud_pct`    – cloud cover (0 … 100), clamped into range
    /// * `temp_c`       – ambient temperature
    pub fn estimate(&self, altitude_deg: f64, cloud_pct: f64, temp_c: f64) -> IrradianceEstimate {
        if altitude_deg <= 0.0 {
            return IrradianceEstimate::DARK;
        }

        let cloud_factor = (100.0 - cloud_pct.clamp(0.0, 100.0)) / 100.0;
        let irradiance_w_m2 = SOLAR_CONSTANT * cloud_factor * (altitude_deg / 90.0);

        let temperature_factor = self.temperature_factor(temp_c);
        let energy_wh = irradiance_w_m2
            * self.panel.area_m2
            * self.panel.efficiency
            * temperature_factor
            / SECONDS_PER_HOUR;

        IrradianceEstimate {
            irradiance_w_m2,
            temperature_factor,
            energy_wh,
        }
    }
}
