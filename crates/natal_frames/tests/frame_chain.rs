use natal_frames::{
    Spherical, cartesian_to_spherical, ecliptic_to_equatorial, equatorial_to_horizontal,
    general_precession_deg, nutation, spherical_to_cartesian,
};

#[test]
fn nutation_at_j2000() {
    let n = nutation(0.0);
    let dpsi = n.dpsi_deg * 3600.0;
    let deps = n.deps_deg * 3600.0;
    assert!((dpsi - -13.932).abs() < 0.05, "Δψ = {dpsi}\"");
    assert!((deps - -5.769).abs() < 0.05, "Δε = {deps}\"");
}

#[test]
fn precession_one_century() {
    let p = general_precession_deg(1.0) * 3600.0;
    assert!((p - 5029.9017).abs() < 1e-3, "p_A = {p}\"");
    assert_eq!(general_precession_deg(0.0), 0.0);
}

#[test]
fn spherical_cartesian_agree() {
    let s = Spherical {
        lon_deg: 250.0,
        lat_deg: -1.5,
        radius: 5.2,
    };
    let back = cartesian_to_spherical(&spherical_to_cartesian(&s));
    assert!((back.lon_deg - s.lon_deg).abs() < 1e-9);
    assert!((back.lat_deg - s.lat_deg).abs() < 1e-9);
    assert!((back.radius - s.radius).abs() < 1e-12);
}

#[test]
fn ecliptic_pole_is_circumpolar_at_high_latitude() {
    // The north ecliptic pole sits at δ = 90° − ε; from 70°N it never sets.
    let pole = ecliptic_to_equatorial(0.0, 90.0, 23.44);
    assert!((pole.dec_deg - 66.56).abs() < 1e-9);
    for lst in [0.0, 90.0, 180.0, 270.0] {
        let h = equatorial_to_horizontal(pole.ra_deg, pole.dec_deg, 70.0, lst);
        assert!(h.alt_deg > 0.0, "alt {} at LST {lst}", h.alt_deg);
    }
}
