//! Calendar and time-scale conversions for natal computations.
//!
//! This crate provides:
//! - proleptic Gregorian ↔ Julian Date conversion
//! - ΔT (TT − UT) from the Espenak & Meeus polynomials
//! - mean obliquity and mean sidereal time (IAU 2006)
//! - local civil time → UTC resolution with explicit DST folds
//! - equation of time and true solar time
//!
//! Every model coefficient lives in [`constants`], versioned by
//! [`constants::MODEL_VERSION`].

pub mod angle;
pub mod constants;
pub mod delta_t;
pub mod error;
pub mod julian;
pub mod local;
pub mod obliquity;
pub mod sidereal;
pub mod solar;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub use angle::{normalize_deg, normalize_signed_deg};
pub use constants::{J2000_JD, MODEL_VERSION, SECONDS_PER_DAY};
pub use delta_t::delta_t_seconds;
pub use error::{FoldCandidate, TimeError};
pub use julian::{
    calendar_to_jd, centuries_since_j2000, date_to_jd, jd_to_calendar, jd_to_date,
    julian_day_number, millennia_since_j2000,
};
pub use local::{ResolvedInstant, resolve_local_time};
pub use obliquity::{mean_obliquity_arcsec, mean_obliquity_deg};
pub use sidereal::{SiderealTime, earth_rotation_angle_deg, gmst_deg, sidereal_time};
pub use solar::{equation_of_time_minutes, true_solar_time_minutes};

/// One instant on both the UT and TT axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JulianMoment {
    pub jd_ut: f64,
    pub jd_tt: f64,
    pub delta_t_s: f64,
}

impl JulianMoment {
    /// Build from a UT Julian Date; ΔT is evaluated at the mid-month
    /// decimal year.
    pub fn from_jd_ut(jd_ut: f64) -> Self {
        let delta_t_s = delta_t_seconds(julian::decimal_year(jd_ut));
        Self {
            jd_ut,
            jd_tt: jd_ut + delta_t_s / SECONDS_PER_DAY,
            delta_t_s,
        }
    }

    pub fn from_utc(instant: &DateTime<Utc>) -> Self {
        Self::from_jd_ut(date_to_jd(instant))
    }

    /// Julian centuries of TT since J2000.0.
    pub fn centuries_tt(&self) -> f64 {
        centuries_since_j2000(self.jd_tt)
    }

    /// Julian millennia of TT since J2000.0.
    pub fn millennia_tt(&self) -> f64 {
        millennia_since_j2000(self.jd_tt)
    }

    pub fn is_finite(&self) -> bool {
        self.jd_ut.is_finite() && self.jd_tt.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tt_is_ahead_of_ut() {
        let m = JulianMoment::from_jd_ut(J2000_JD);
        assert!((m.delta_t_s - 63.8).abs() < 0.5);
        assert!((m.jd_tt - m.jd_ut - m.delta_t_s / SECONDS_PER_DAY).abs() < 1e-12);
    }

    #[test]
    fn nan_moment_is_not_finite() {
        assert!(!JulianMoment::from_jd_ut(f64::NAN).is_finite());
    }
}
