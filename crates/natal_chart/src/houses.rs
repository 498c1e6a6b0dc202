//! Chart angles: Ascendant, Midheaven, Descendant and Imum Coeli.
//!
//! The Ascendant is the ecliptic point rising on the eastern horizon,
//! the Midheaven the ecliptic point on the upper meridian. Both depend only
//! on local sidereal time, obliquity and geographic latitude.
//!
//! Sidereal time is IAU 2006 mean GMST plus east longitude; obliquity is the
//! IAU 2006 mean obliquity of date. Nutation is not applied to either.

use natal_time::{JulianMoment, mean_obliquity_deg, normalize_deg, sidereal_time};
use serde::Serialize;

use crate::error::ChartError;
use crate::zodiac::{ZodiacSign, sign_of};

/// LST advance in one minute of civil time, degrees.
pub const LST_DEG_PER_MINUTE: f64 = 360.985_647_366_29 / 1440.0;

/// Ecliptic longitude of the Ascendant, degrees [0, 360).
///
/// Undefined at the poles; callers must reject |φ| ≥ 90° first.
pub fn ascendant_deg(lst_deg: f64, obliquity_deg: f64, latitude_deg: f64) -> f64 {
    let lst = lst_deg.to_radians();
    let eps = obliquity_deg.to_radians();
    let phi = latitude_deg.to_radians();
    let y = lst.cos();
    let x = -(lst.sin() * eps.cos() + phi.tan() * eps.sin());
    normalize_deg(y.atan2(x).to_degrees())
}

/// Ecliptic longitude of the Midheaven, degrees [0, 360).
pub fn midheaven_deg(lst_deg: f64, obliquity_deg: f64) -> f64 {
    let lst = lst_deg.to_radians();
    let eps = obliquity_deg.to_radians();
    normalize_deg(lst.sin().atan2(lst.cos() * eps.cos()).to_degrees())
}

/// One chart angle with its sign placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartAngle {
    pub lon_deg: f64,
    pub sign: ZodiacSign,
    pub degree_in_sign: f64,
    /// A ±1 minute change of birth time moves this angle into another sign.
    pub sign_sensitive: bool,
}

impl ChartAngle {
    fn from_samples(center: f64, earlier: f64, later: f64) -> Self {
        let pos = sign_of(center);
        let sign_sensitive = sign_of(earlier).sign != pos.sign || sign_of(later).sign != pos.sign;
        Self {
            lon_deg: normalize_deg(center),
            sign: pos.sign,
            degree_in_sign: pos.degree_in_sign,
            sign_sensitive,
        }
    }
}

/// The four angles of a chart plus the inputs that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HouseFrame {
    pub ascendant: ChartAngle,
    pub midheaven: ChartAngle,
    pub descendant: ChartAngle,
    pub imum_coeli: ChartAngle,
    pub lst_deg: f64,
    pub obliquity_deg: f64,
    pub latitude_deg: f64,
}

impl HouseFrame {
    /// Angles for a given local sidereal time, obliquity and latitude.
    pub fn compute(
        lst_deg: f64,
        obliquity_deg: f64,
        latitude_deg: f64,
    ) -> Result<Self, ChartError> {
        if !lst_deg.is_finite() {
            return Err(ChartError::NonFinite("local sidereal time"));
        }
        if !obliquity_deg.is_finite() {
            return Err(ChartError::NonFinite("obliquity"));
        }
        if !latitude_deg.is_finite() || latitude_deg.abs() >= 90.0 {
            return Err(ChartError::InvalidLatitude(latitude_deg));
        }

        let lst = normalize_deg(lst_deg);
        let before = lst - LST_DEG_PER_MINUTE;
        let after = lst + LST_DEG_PER_MINUTE;

        let asc = |l: f64| ascendant_deg(l, obliquity_deg, latitude_deg);
        let mc = |l: f64| midheaven_deg(l, obliquity_deg);
        let opposite = |v: f64| normalize_deg(v + 180.0);

        let (a0, a1, a2) = (asc(lst), asc(before), asc(after));
        let (m0, m1, m2) = (mc(lst), mc(before), mc(after));

        Ok(Self {
            ascendant: ChartAngle::from_samples(a0, a1, a2),
            midheaven: ChartAngle::from_samples(m0, m1, m2),
            descendant: ChartAngle::from_samples(opposite(a0), opposite(a1), opposite(a2)),
            imum_coeli: ChartAngle::from_samples(opposite(m0), opposite(m1), opposite(m2)),
            lst_deg: lst,
            obliquity_deg,
            latitude_deg,
        })
    }

    /// Angles for an instant and observer (east-positive longitude).
    pub fn for_moment(
        moment: &JulianMoment,
        latitude_deg: f64,
        longitude_deg: f64,
    ) -> Result<Self, ChartError> {
        if !moment.is_finite() {
            return Err(ChartError::NonFinite("julian moment"));
        }
        if !longitude_deg.is_finite() {
            return Err(ChartError::NonFinite("longitude"));
        }
        let st = sidereal_time(moment.jd_ut, longitude_deg);
        let eps = mean_obliquity_deg(moment.centuries_tt());
        Self::compute(st.lst_deg, eps, latitude_deg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 23.4392911;

    #[test]
    fn equator_at_lst_zero() {
        // LST 0: the vernal point culminates and Cancer 0° rises.
        assert!((midheaven_deg(0.0, EPS) - 0.0).abs() < 1e-9);
        assert!((ascendant_deg(0.0, EPS, 0.0) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn equator_at_lst_90() {
        assert!((midheaven_deg(90.0, EPS) - 90.0).abs() < 1e-9);
        assert!((ascendant_deg(90.0, EPS, 0.0) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn ascendant_is_east_of_midheaven() {
        for lst in (0..360).step_by(15) {
            let frame = HouseFrame::compute(lst as f64, EPS, 45.0).unwrap();
            let diff = normalize_deg(frame.ascendant.lon_deg - frame.midheaven.lon_deg);
            assert!(diff > 0.0 && diff < 180.0, "lst {lst}: diff {diff}");
        }
    }

    #[test]
    fn opposite_angles() {
        let f = HouseFrame::compute(123.4, EPS, 52.0).unwrap();
        let d = normalize_deg(f.descendant.lon_deg - f.ascendant.lon_deg);
        let i = normalize_deg(f.imum_coeli.lon_deg - f.midheaven.lon_deg);
        assert!((d - 180.0).abs() < 1e-9);
        assert!((i - 180.0).abs() < 1e-9);
    }

    #[test]
    fn polar_latitude_rejected() {
        assert!(matches!(
            HouseFrame::compute(10.0, EPS, 90.0),
            Err(ChartError::InvalidLatitude(_))
        ));
        assert!(HouseFrame::compute(10.0, EPS, -90.0).is_err());
        assert!(HouseFrame::compute(10.0, EPS, f64::NAN).is_err());
        assert!(HouseFrame::compute(f64::NAN, EPS, 10.0).is_err());
    }

    #[test]
    fn sign_boundary_is_flagged() {
        // MC at the equator follows LST closely; LST 0 puts MC exactly on 0°.
        let f = HouseFrame::compute(0.0, EPS, 0.0).unwrap();
        assert!(f.midheaven.sign_sensitive);
        let f = HouseFrame::compute(15.0, EPS, 0.0).unwrap();
        assert!(!f.midheaven.sign_sensitive);
    }
}
