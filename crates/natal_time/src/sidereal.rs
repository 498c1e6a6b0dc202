//! Greenwich and local mean sidereal time.
//!
//! All functions take UT Julian Dates. UT1 − UTC (< 0.9 s) is neglected.
//!
//! Sources:
//! - ERA: IERS Conventions 2010, Eq. 5.15.
//! - GMST polynomial: Capitaine et al. 2003, Table 2.

use serde::Serialize;

use crate::angle::normalize_deg;
use crate::constants::{DAYS_PER_JULIAN_CENTURY, J2000_JD};

/// Earth Rotation Angle in degrees, [0, 360).
///
/// θ = 360° × (0.7790572732640 + 1.00273781191135448 × Du),
/// Du = JD_UT − 2451545.0.
pub fn earth_rotation_angle_deg(jd_ut: f64) -> f64 {
    let du = jd_ut - J2000_JD;
    // Split the integer day count off first to keep precision.
    let turns = 0.779_057_273_264_0 + 0.002_737_811_911_354_48 * du + du.fract();
    normalize_deg(turns.fract() * 360.0)
}

/// Greenwich Mean Sidereal Time in degrees, [0, 360).
///
/// GMST = ERA + (0.014506 + 4612.156534·T + 1.3915817·T² − 0.00000044·T³
/// − 0.000029956·T⁴ − 0.0000000368·T⁵)″.
pub fn gmst_deg(jd_ut: f64) -> f64 {
    let t = (jd_ut - J2000_JD) / DAYS_PER_JULIAN_CENTURY;
    let tail = -0.00000044 + t * (-0.000029956 - t * 0.0000000368);
    let poly_arcsec = 0.014506 + t * (4612.156534 + t * (1.3915817 + t * tail));
    normalize_deg(earth_rotation_angle_deg(jd_ut) + poly_arcsec / 3600.0)
}

/// Greenwich and local mean sidereal time, degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SiderealTime {
    pub gmst_deg: f64,
    pub lst_deg: f64,
}

/// Sidereal time at `jd_ut` for an observer at east longitude `longitude_deg`.
pub fn sidereal_time(jd_ut: f64, longitude_deg: f64) -> SiderealTime {
    let gmst = gmst_deg(jd_ut);
    SiderealTime {
        gmst_deg: gmst,
        lst_deg: normalize_deg(gmst + longitude_deg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn era_at_j2000_noon() {
        let theta = earth_rotation_angle_deg(J2000_JD);
        assert!((theta - 280.46).abs() < 0.01, "ERA = {theta}");
    }

    #[test]
    fn gmst_j2000_midnight() {
        // 2000-Jan-01 0h UT: GMST = 6h39m51.17s ≈ 99.9632°
        let g = gmst_deg(2_451_544.5);
        assert!((g - 99.9632).abs() < 0.001, "GMST = {g}");
    }

    #[test]
    fn meeus_example_12a() {
        // 1987 April 10, 0h UT: GMST = 13h10m46.3668s = 197.693195°
        let g = gmst_deg(2_446_895.5);
        assert!((g - 197.693195).abs() < 0.001, "GMST = {g}");
    }

    #[test]
    fn lst_adds_east_longitude() {
        let st = sidereal_time(2_451_545.0, 90.0);
        assert!((normalize_deg(st.lst_deg - st.gmst_deg) - 90.0).abs() < 1e-9);
        let st = sidereal_time(2_451_545.0, -120.0);
        assert!((0.0..360.0).contains(&st.lst_deg));
    }
}
