//! ΔT = TT − UT, in seconds.
//!
//! Espenak & Meeus (2006) piecewise polynomials, coefficients in
//! [`crate::constants::DELTA_T_SEGMENTS`].

use crate::constants::DELTA_T_SEGMENTS;

/// Long-term parabola (Morrison & Stephenson 2004) used outside the table.
fn long_term_parabola(year: f64) -> f64 {
    let u = (year - 1820.0) / 100.0;
    -20.0 + 32.0 * u * u
}

fn horner(coeffs: &[f64], u: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, c| acc * u + c)
}

/// ΔT in seconds for a decimal year (e.g. 1980.5 for mid-1980).
///
/// Non-finite input yields NaN.
pub fn delta_t_seconds(year: f64) -> f64 {
    if !year.is_finite() {
        return f64::NAN;
    }
    if let Some(seg) = DELTA_T_SEGMENTS
        .iter()
        .find(|s| year >= s.start && year < s.end)
    {
        let u = (year - seg.origin) / seg.scale;
        return horner(seg.coeffs, u);
    }
    if (2050.0..2150.0).contains(&year) {
        return long_term_parabola(year) - 0.5628 * (2150.0 - year);
    }
    long_term_parabola(year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_2000_about_64s() {
        let dt = delta_t_seconds(2000.0);
        assert!((dt - 63.86).abs() < 0.01, "ΔT(2000) = {dt}");
    }

    #[test]
    fn year_1980_about_51s() {
        let dt = delta_t_seconds(1980.5);
        assert!((dt - 51.0).abs() < 1.0, "ΔT(1980.5) = {dt}");
    }

    #[test]
    fn year_1900_about_minus_3s() {
        let dt = delta_t_seconds(1900.0);
        assert!((dt + 2.79).abs() < 0.01, "ΔT(1900) = {dt}");
    }

    #[test]
    fn continuous_at_2050_and_2150() {
        let below = delta_t_seconds(2049.999_999);
        let above = delta_t_seconds(2050.0);
        assert!((below - above).abs() < 2.0, "{below} vs {above}");

        let below = delta_t_seconds(2149.999_999);
        let above = delta_t_seconds(2150.0);
        assert!((below - above).abs() < 1e-3);
    }

    #[test]
    fn ancient_uses_parabola() {
        let dt = delta_t_seconds(-1000.0);
        let u: f64 = (-1000.0 - 1820.0) / 100.0;
        assert!((dt - (-20.0 + 32.0 * u * u)).abs() < 1e-9);
    }

    #[test]
    fn nan_in_nan_out() {
        assert!(delta_t_seconds(f64::NAN).is_nan());
    }
}
