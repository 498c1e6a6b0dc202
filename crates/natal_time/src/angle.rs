//! Angle normalization helpers.

/// Normalize degrees into [0, 360).
pub fn normalize_deg(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    // rem_euclid of a tiny negative rounds up to exactly 360.0
    if r >= 360.0 { 0.0 } else { r }
}

/// Normalize degrees into [-180, 180).
pub fn normalize_signed_deg(deg: f64) -> f64 {
    let r = normalize_deg(deg);
    if r >= 180.0 { r - 360.0 } else { r }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_points() {
        assert_eq!(normalize_deg(360.0), 0.0);
        assert_eq!(normalize_deg(-90.0), 270.0);
        assert_eq!(normalize_deg(450.0), 90.0);
        assert_eq!(normalize_deg(0.0), 0.0);
    }

    #[test]
    fn always_in_range() {
        for x in [-1e-20, -1e-300, -720.5, 1e9, -1e9, 359.999_999_999_999_9, 1e-320] {
            let r = normalize_deg(x);
            assert!((0.0..360.0).contains(&r), "normalize_deg({x}) = {r}");
        }
    }

    #[test]
    fn signed_range() {
        assert_eq!(normalize_signed_deg(190.0), -170.0);
        assert_eq!(normalize_signed_deg(-180.0), -180.0);
        assert_eq!(normalize_signed_deg(180.0), -180.0);
        assert_eq!(normalize_signed_deg(45.0), 45.0);
    }
}
