//! IAU 2006 general precession in ecliptic longitude (p_A).
//!
//! Source: Capitaine, Wallace & Chapront 2003, A&A 412, Table 1.

/// p_A in arcseconds; `t` is Julian centuries of TT since J2000.0.
///
/// Positive values mean the equinox of date has moved west of the J2000
/// equinox, so longitudes of date exceed J2000 longitudes by this amount.
pub fn general_precession_arcsec(t: f64) -> f64 {
    t * (5028.796195 + t * (1.1054348 + t * (0.00007964 + t * (-0.000023857 - t * 0.0000000383))))
}

/// p_A in degrees.
pub fn general_precession_deg(t: f64) -> f64 {
    general_precession_arcsec(t) / 3600.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_at_j2000() {
        assert_eq!(general_precession_arcsec(0.0), 0.0);
    }

    #[test]
    fn about_fifty_arcsec_per_year() {
        let p = general_precession_arcsec(0.01);
        assert!((p - 50.29).abs() < 0.1, "p_A = {p}");
    }

    #[test]
    fn sign_follows_time() {
        assert!(general_precession_deg(-1.0) < 0.0);
        assert!((general_precession_deg(1.0) - 1.3972).abs() < 1e-3);
    }
}
