//! Cartesian ↔ spherical conversion.

use natal_time::normalize_deg;
use serde::Serialize;

/// Longitude/latitude in degrees plus radius in the caller's length unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Spherical {
    /// [0, 360), measured from +x toward +y.
    pub lon_deg: f64,
    /// [-90, 90], elevation above the x-y plane.
    pub lat_deg: f64,
    pub radius: f64,
}

pub fn cartesian_to_spherical(xyz: &[f64; 3]) -> Spherical {
    let [x, y, z] = *xyz;
    let r = (x * x + y * y + z * z).sqrt();
    if r == 0.0 {
        return Spherical { lon_deg: 0.0, lat_deg: 0.0, radius: 0.0 };
    }
    Spherical {
        lon_deg: normalize_deg(y.atan2(x).to_degrees()),
        lat_deg: (z / r).clamp(-1.0, 1.0).asin().to_degrees(),
        radius: r,
    }
}

pub fn spherical_to_cartesian(s: &Spherical) -> [f64; 3] {
    let (sin_lon, cos_lon) = s.lon_deg.to_radians().sin_cos();
    let (sin_lat, cos_lat) = s.lat_deg.to_radians().sin_cos();
    [
        s.radius * cos_lat * cos_lon,
        s.radius * cos_lat * sin_lon,
        s.radius * sin_lat,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-10;

    #[test]
    fn axes() {
        let s = cartesian_to_spherical(&[0.0, 2.0, 0.0]);
        assert!((s.lon_deg - 90.0).abs() < EPS);
        let s = cartesian_to_spherical(&[-1.0, 0.0, 0.0]);
        assert!((s.lon_deg - 180.0).abs() < EPS);
        let s = cartesian_to_spherical(&[0.0, 0.0, 5.0]);
        assert!((s.lat_deg - 90.0).abs() < EPS);
        assert!((s.radius - 5.0).abs() < EPS);
    }

    #[test]
    fn third_quadrant_longitude_positive() {
        let s = cartesian_to_spherical(&[-1.0, -1.0, 0.0]);
        assert!((s.lon_deg - 225.0).abs() < EPS);
    }

    #[test]
    fn roundtrip() {
        let xyz = [1.234, -5.678, 0.3456];
        let back = spherical_to_cartesian(&cartesian_to_spherical(&xyz));
        for i in 0..3 {
            assert!((xyz[i] - back[i]).abs() < EPS, "axis {i}");
        }
    }

    #[test]
    fn zero_vector() {
        assert_eq!(cartesian_to_spherical(&[0.0; 3]).radius, 0.0);
    }
}
