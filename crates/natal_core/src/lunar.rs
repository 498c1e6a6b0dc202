//! Lunar phase, illumination and parallax.

use natal_time::normalize_deg;
use serde::{Deserialize, Serialize};

use crate::{AU_KM, CelestialPosition};

/// Mean synodic month, days.
pub const SYNODIC_MONTH_DAYS: f64 = 29.530_588_853;

/// Earth equatorial radius, km.
const EARTH_RADIUS_KM: f64 = 6_378.14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoonPhaseName {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhaseName {
    /// Name for a phase fraction (0 = new, 0.5 = full), eight equal bins
    /// centred on the principal phases.
    pub fn from_fraction(fraction: f64) -> Self {
        let p = fraction.rem_euclid(1.0);
        match ((p + 1.0 / 16.0) * 8.0).floor() as u8 % 8 {
            0 => Self::New,
            1 => Self::WaxingCrescent,
            2 => Self::FirstQuarter,
            3 => Self::WaxingGibbous,
            4 => Self::Full,
            5 => Self::WaningGibbous,
            6 => Self::LastQuarter,
            _ => Self::WaningCrescent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoonPhase {
    /// Moon minus Sun apparent longitude, [0, 360).
    pub elongation_deg: f64,
    /// 0 = new, 0.25 = first quarter, 0.5 = full.
    pub fraction: f64,
    /// Illuminated fraction of the disk, [0, 1].
    pub illumination: f64,
    /// Approximate days since new moon.
    pub age_days: f64,
    pub name: MoonPhaseName,
    /// Equatorial horizontal parallax.
    pub parallax_deg: f64,
}

/// Phase quantities from apparent Sun and Moon positions.
pub fn moon_phase(sun: &CelestialPosition, moon: &CelestialPosition) -> MoonPhase {
    let elongation = normalize_deg(moon.lon_deg - sun.lon_deg);
    let cos_psi = moon.lat_deg.to_radians().cos() * elongation.to_radians().cos();
    let psi = cos_psi.clamp(-1.0, 1.0).acos();

    // Meeus 48.3: phase angle from the Sun and Moon distances.
    let r = sun.distance_au * AU_KM;
    let phase_angle = (r * psi.sin()).atan2(moon.distance_km - r * psi.cos());
    let fraction = elongation / 360.0;

    MoonPhase {
        elongation_deg: elongation,
        fraction,
        illumination: (1.0 + phase_angle.cos()) / 2.0,
        age_days: fraction * SYNODIC_MONTH_DAYS,
        name: MoonPhaseName::from_fraction(fraction),
        parallax_deg: (EARTH_RADIUS_KM / moon.distance_km).asin().to_degrees(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_name_bins() {
        assert_eq!(MoonPhaseName::from_fraction(0.0), MoonPhaseName::New);
        assert_eq!(MoonPhaseName::from_fraction(0.97), MoonPhaseName::New);
        assert_eq!(MoonPhaseName::from_fraction(0.1), MoonPhaseName::WaxingCrescent);
        assert_eq!(MoonPhaseName::from_fraction(0.25), MoonPhaseName::FirstQuarter);
        assert_eq!(MoonPhaseName::from_fraction(0.5), MoonPhaseName::Full);
        assert_eq!(MoonPhaseName::from_fraction(0.75), MoonPhaseName::LastQuarter);
        assert_eq!(MoonPhaseName::from_fraction(0.9), MoonPhaseName::WaningCrescent);
    }
}
