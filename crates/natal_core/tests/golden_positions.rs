//! Apparent positions against worked examples from Meeus,
//! "Astronomical Algorithms" (2nd ed).

use natal_core::{Body, Confidence, Engine, EngineConfig};
use natal_time::JulianMoment;

fn at_tt(jd_tt: f64) -> JulianMoment {
    JulianMoment {
        jd_ut: jd_tt,
        jd_tt,
        delta_t_s: 0.0,
    }
}

#[test]
fn sun_example_25b() {
    let engine = Engine::default();
    let sun = engine.position(Body::Sun, &at_tt(2_448_908.5)).unwrap();
    assert!((sun.lon_deg - 199.906016).abs() < 5e-4, "λ = {}", sun.lon_deg);
    assert!(sun.lat_deg.abs() < 1e-3, "β = {}", sun.lat_deg);
    assert!((sun.distance_au - 0.99760775).abs() < 1e-6);
    assert_eq!(sun.confidence, Confidence::High);
}

#[test]
fn moon_example_47a() {
    let engine = Engine::default();
    let moon = engine.position(Body::Moon, &at_tt(2_448_724.5)).unwrap();
    assert!((moon.lon_deg - 133.167265).abs() < 5e-4, "λ = {}", moon.lon_deg);
    assert!((moon.lat_deg + 3.229126).abs() < 1e-4, "β = {}", moon.lat_deg);
    assert!((moon.distance_km - 368_409.7).abs() < 1.0, "Δ = {}", moon.distance_km);
}

#[test]
fn venus_example_33a() {
    let engine = Engine::default();
    let venus = engine.position(Body::Venus, &at_tt(2_448_976.5)).unwrap();
    assert!((venus.lon_deg - 313.08102).abs() < 2e-3, "λ = {}", venus.lon_deg);
    assert!((venus.lat_deg + 2.08474).abs() < 1e-3, "β = {}", venus.lat_deg);
    assert!((venus.distance_au - 0.910947).abs() < 1e-5, "Δ = {}", venus.distance_au);
    assert_eq!(venus.confidence, Confidence::High);
}

#[test]
fn pluto_example_37a() {
    // 1992 Oct 13.0 TD. Meeus gives α = 15h31m43.8s, δ = −4°27′29″ (J2000)
    // and Δ = 30.528750; carried to the apparent ecliptic of date.
    let engine = Engine::default();
    let pluto = engine.position(Body::Pluto, &at_tt(2_448_908.5)).unwrap();
    assert!((pluto.lon_deg - 231.5938).abs() < 0.01, "λ = {}", pluto.lon_deg);
    assert!((pluto.lat_deg - 14.1897).abs() < 0.01, "β = {}", pluto.lat_deg);
    assert!((pluto.distance_au - 30.52875).abs() < 1e-4, "Δ = {}", pluto.distance_au);
    assert_eq!(pluto.confidence, Confidence::High);
}

#[test]
fn aberration_can_be_disabled() {
    let apparent = Engine::default();
    let geometric = Engine::new(EngineConfig {
        apply_aberration: false,
        ..EngineConfig::default()
    })
    .unwrap();
    let moment = at_tt(2_448_976.5);
    for body in [Body::Mars, Body::Saturn, Body::Pluto] {
        let a = apparent.position(body, &moment).unwrap();
        let g = geometric.position(body, &moment).unwrap();
        let d = ((a.lon_deg - g.lon_deg + 540.0).rem_euclid(360.0) - 180.0).abs();
        assert!(d > 0.0 && d < 21.0 / 3600.0 * 1.1, "{body}: {d}");
        assert_eq!(a.distance_au, g.distance_au);
    }
}

#[test]
fn pre_1800_planets_keep_high_confidence() {
    let engine = Engine::default();
    let moment = JulianMoment::from_jd_ut(natal_time::calendar_to_jd(1799, 6, 24.5));
    for p in engine.positions(&moment).unwrap() {
        if p.body == Body::Pluto {
            assert_eq!(p.confidence, Confidence::Reduced);
        } else {
            assert_eq!(p.confidence, Confidence::High, "{}", p.body);
        }
    }
}

#[test]
fn inner_planets_stay_near_the_sun() {
    let engine = Engine::default();
    for k in 0..40 {
        let moment = at_tt(2_444_000.5 + k as f64 * 97.0);
        let sun = engine.position(Body::Sun, &moment).unwrap();
        for (body, max_elong) in [(Body::Mercury, 28.5), (Body::Venus, 47.9)] {
            let p = engine.position(body, &moment).unwrap();
            let d = (p.lon_deg - sun.lon_deg + 540.0).rem_euclid(360.0) - 180.0;
            assert!(d.abs() < max_elong, "{body} elongation {d} at k={k}");
        }
    }
}

#[test]
fn positions_match_single_queries() {
    let engine = Engine::default();
    let moment = JulianMoment::from_jd_ut(2_460_000.5);
    let all = engine.positions(&moment).unwrap();
    for p in all {
        let single = engine.position(p.body, &moment).unwrap();
        assert_eq!(p, single);
    }
}

#[test]
fn repeated_evaluation_is_bit_identical() {
    let engine = Engine::default();
    let moment = JulianMoment::from_jd_ut(2_444_415.055_555_6);
    let a = engine.positions(&moment).unwrap();
    let b = engine.positions(&moment).unwrap();
    assert_eq!(a, b);
}

#[test]
fn full_moon_is_fully_lit() {
    // Full moon of 2024-Jan-25 17:54 UT
    let engine = Engine::default();
    let moment = JulianMoment::from_jd_ut(natal_time::calendar_to_jd(2024, 1, 25.746));
    let phase = engine.moon_phase(&moment).unwrap();
    assert!(phase.illumination > 0.99, "k = {}", phase.illumination);
    assert!((phase.elongation_deg - 180.0).abs() < 2.0);
    assert_eq!(phase.name, natal_core::MoonPhaseName::Full);
}
