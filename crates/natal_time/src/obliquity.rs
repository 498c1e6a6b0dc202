//! Mean obliquity of the ecliptic, IAU 2006.

use crate::constants::OBLIQUITY_IAU2006_ARCSEC;

/// Mean obliquity in arcseconds.
///
/// `t` is Julian centuries of TT since J2000.0.
pub fn mean_obliquity_arcsec(t: f64) -> f64 {
    OBLIQUITY_IAU2006_ARCSEC
        .iter()
        .rev()
        .fold(0.0, |acc, c| acc * t + c)
}

/// Mean obliquity in degrees.
pub fn mean_obliquity_deg(t: f64) -> f64 {
    mean_obliquity_arcsec(t) / 3600.0
}
