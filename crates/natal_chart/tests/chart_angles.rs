//! House angles and fusion for a full chart.

use chrono::{TimeZone, Utc};
use natal_chart::{
    BaziInput, HouseFrame, Stem, Tradition, ZodiacSign, element_harmony, four_pillars,
    fusion_signature, sign_of,
};
use natal_core::{Body, Engine};
use natal_time::JulianMoment;

const LAT: f64 = 52.3759;
const LON: f64 = 9.7320;

fn hanover() -> JulianMoment {
    JulianMoment::from_utc(&Utc.with_ymd_and_hms(1980, 6, 24, 13, 20, 0).unwrap())
}

#[test]
fn hanover_angles() {
    let f = HouseFrame::for_moment(&hanover(), LAT, LON).unwrap();
    assert!((f.lst_deg - 122.58).abs() < 0.05, "LST {}", f.lst_deg);
    assert_eq!(f.ascendant.sign, ZodiacSign::Libra);
    assert!((f.ascendant.lon_deg - 202.67).abs() < 0.05);
    assert_eq!(f.midheaven.sign, ZodiacSign::Leo);
    assert!((f.midheaven.lon_deg - 120.38).abs() < 0.05);
    assert!(!f.ascendant.sign_sensitive);
    assert_eq!(f.descendant.sign, ZodiacSign::Aries);
    assert_eq!(f.imum_coeli.sign, ZodiacSign::Aquarius);
}

#[test]
fn repeated_runs_are_identical() {
    let a = HouseFrame::for_moment(&hanover(), LAT, LON).unwrap();
    let b = HouseFrame::for_moment(&hanover(), LAT, LON).unwrap();
    assert_eq!(a.ascendant.lon_deg.to_bits(), b.ascendant.lon_deg.to_bits());
    assert_eq!(a.midheaven.lon_deg.to_bits(), b.midheaven.lon_deg.to_bits());
}

#[test]
fn polar_observer_rejected() {
    assert!(HouseFrame::for_moment(&hanover(), 90.0, LON).is_err());
}

#[test]
fn hanover_fusion_and_harmony() {
    let engine = Engine::default();
    let moment = hanover();
    let positions = engine.positions(&moment).unwrap();
    let sun = positions.iter().find(|p| p.body == Body::Sun).unwrap();
    assert_eq!(sign_of(sun.lon_deg).sign, ZodiacSign::Cancer);

    let utc = Utc.with_ymd_and_hms(1980, 6, 24, 13, 20, 0).unwrap();
    let pillars = four_pillars(&BaziInput {
        local_date: utc.date_naive(),
        utc,
        longitude_deg: LON,
        sun_longitude_deg: sun.lon_deg,
        hour_known: true,
    })
    .unwrap();

    // Wu (Earth) day master against a Cancer (Water) sun: both Yin.
    assert_eq!(pillars.day_master, Stem::Wu);
    let fusion = fusion_signature(pillars.day_master_element(), sign_of(sun.lon_deg).sign);
    assert!(fusion.contrast_applied);
    assert_eq!(fusion.foreground.source, Tradition::Bazi);
    assert_eq!(fusion.foreground.element, "Earth");
    assert_eq!(fusion.background.element, "Water");
    assert_ne!(fusion.foreground.color, fusion.background.color);

    let h = element_harmony(&pillars, &positions);
    assert!((0.0..=1.0).contains(&h.harmony_index));
    let total: f64 = h.combined.to_array().iter().sum();
    assert!((total - 1.0).abs() < 1e-9);
}
