//! Rotations between the ecliptic, equatorial and horizontal frames.
//!
//! All angles are degrees. Azimuth is measured from north through east.

use natal_time::normalize_deg;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ecliptic {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Equatorial {
    /// Right ascension, [0, 360).
    pub ra_deg: f64,
    /// Declination, [-90, 90].
    pub dec_deg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Horizontal {
    /// Altitude above the horizon (no refraction).
    pub alt_deg: f64,
    /// Azimuth, [0, 360), north = 0, east = 90.
    pub az_deg: f64,
}

/// Ecliptic (λ, β) → equatorial (α, δ) for obliquity ε.
pub fn ecliptic_to_equatorial(lon_deg: f64, lat_deg: f64, obliquity_deg: f64) -> Equatorial {
    let (sin_l, cos_l) = lon_deg.to_radians().sin_cos();
    let (sin_b, cos_b) = lat_deg.to_radians().sin_cos();
    let (sin_e, cos_e) = obliquity_deg.to_radians().sin_cos();

    let ra = (sin_l * cos_b * cos_e - sin_b * sin_e).atan2(cos_l * cos_b);
    let dec = (sin_b * cos_e + cos_b * sin_e * sin_l).clamp(-1.0, 1.0).asin();
    Equatorial {
        ra_deg: normalize_deg(ra.to_degrees()),
        dec_deg: dec.to_degrees(),
    }
}

/// Equatorial (α, δ) → ecliptic (λ, β) for obliquity ε.
pub fn equatorial_to_ecliptic(ra_deg: f64, dec_deg: f64, obliquity_deg: f64) -> Ecliptic {
    let (sin_a, cos_a) = ra_deg.to_radians().sin_cos();
    let (sin_d, cos_d) = dec_deg.to_radians().sin_cos();
    let (sin_e, cos_e) = obliquity_deg.to_radians().sin_cos();

    let lon = (sin_a * cos_d * cos_e + sin_d * sin_e).atan2(cos_a * cos_d);
    let lat = (sin_d * cos_e - cos_d * sin_e * sin_a).clamp(-1.0, 1.0).asin();
    Ecliptic {
        lon_deg: normalize_deg(lon.to_degrees()),
        lat_deg: lat.to_degrees(),
    }
}

/// Equatorial (α, δ) → horizontal for an observer at geographic latitude
/// φ and local sidereal time LST.
pub fn equatorial_to_horizontal(
    ra_deg: f64,
    dec_deg: f64,
    latitude_deg: f64,
    lst_deg: f64,
) -> Horizontal {
    let (sin_h, cos_h) = (lst_deg - ra_deg).to_radians().sin_cos();
    let (sin_d, cos_d) = dec_deg.to_radians().sin_cos();
    let (sin_p, cos_p) = latitude_deg.to_radians().sin_cos();

    let alt = (sin_p * sin_d + cos_p * cos_d * cos_h).clamp(-1.0, 1.0).asin();
    let az = (-cos_d * sin_h).atan2(sin_d * cos_p - cos_d * cos_h * sin_p);
    Horizontal {
        alt_deg: alt.to_degrees(),
        az_deg: normalize_deg(az.to_degrees()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meeus_13a_pollux() {
        let ecl = equatorial_to_ecliptic(116.328942, 28.026183, 23.4392911);
        assert!((ecl.lon_deg - 113.215630).abs() < 1e-5, "λ = {}", ecl.lon_deg);
        assert!((ecl.lat_deg - 6.684170).abs() < 1e-5, "β = {}", ecl.lat_deg);

        let eq = ecliptic_to_equatorial(ecl.lon_deg, ecl.lat_deg, 23.4392911);
        assert!((eq.ra_deg - 116.328942).abs() < 1e-9);
        assert!((eq.dec_deg - 28.026183).abs() < 1e-9);
    }

    #[test]
    fn meeus_13b_venus_at_washington() {
        // θ0 = 128.7378734°, L = 77.065556° W
        let lst = 128.7378734 - 77.065556;
        let h = equatorial_to_horizontal(347.3193375, -6.719892, 38.921389, lst);
        assert!((h.alt_deg - 15.1249).abs() < 1e-3, "alt = {}", h.alt_deg);
        // Meeus quotes 68.0337° from the south; from the north that is +180°.
        assert!((h.az_deg - 248.0337).abs() < 1e-3, "az = {}", h.az_deg);
    }

    #[test]
    fn equinox_point_maps_to_origin() {
        let eq = ecliptic_to_equatorial(0.0, 0.0, 23.44);
        assert!(eq.ra_deg.abs() < 1e-12 && eq.dec_deg.abs() < 1e-12);
        let eq = ecliptic_to_equatorial(90.0, 0.0, 23.44);
        assert!((eq.ra_deg - 90.0).abs() < 1e-9);
        assert!((eq.dec_deg - 23.44).abs() < 1e-9);
    }

    #[test]
    fn meridian_transit_faces_south() {
        // North of the equator, a star transiting south of zenith has az 180.
        let h = equatorial_to_horizontal(30.0, 10.0, 50.0, 30.0);
        assert!((h.az_deg - 180.0).abs() < 1e-9);
        assert!((h.alt_deg - 50.0).abs() < 1e-9);
    }

    #[test]
    fn rising_body_is_eastward() {
        let h = equatorial_to_horizontal(90.0, 0.0, 40.0, 0.0);
        assert!((h.az_deg - 90.0).abs() < 1e-9, "az = {}", h.az_deg);
        assert!(h.alt_deg.abs() < 1e-9);
    }
}
