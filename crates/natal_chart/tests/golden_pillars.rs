//! Four Pillars for reference dates, with the solar longitude taken from the
//! position engine.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use natal_chart::{
    BaziInput, Branch, PillarPrecision, Polarity, Stem, WuXing, element_balance, four_pillars,
};
use natal_core::{Body, Engine};
use natal_time::JulianMoment;

fn sun_longitude(utc: &DateTime<Utc>) -> f64 {
    Engine::default()
        .position(Body::Sun, &JulianMoment::from_utc(utc))
        .unwrap()
        .lon_deg
}

fn input(y: i32, m: u32, d: u32, h: u32, min: u32, lon: f64) -> BaziInput {
    let utc = Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap();
    BaziInput {
        local_date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
        utc,
        longitude_deg: lon,
        sun_longitude_deg: sun_longitude(&utc),
        hour_known: true,
    }
}

#[test]
fn hanover_1980() {
    let p = four_pillars(&input(1980, 6, 24, 13, 20, 9.7320)).unwrap();
    assert_eq!((p.year.stem, p.year.branch), (Stem::Geng, Branch::Shen));
    assert_eq!(p.year.stem_element, WuXing::Metal);
    assert_eq!(p.year.stem_polarity, Polarity::Yang);
    assert_eq!(p.year.animal, "Monkey");
    assert_eq!(p.month.branch, Branch::Wu);
    assert_eq!(p.precision, PillarPrecision::Full);
    // 13:20 UTC at 9.7°E is about 14:00 true solar time: Wei hour.
    assert_eq!(p.hour.unwrap().branch, Branch::Wei);
    assert_eq!(p.notation.split(' ').count(), 4);
}

#[test]
fn j2000_new_year() {
    let p = four_pillars(&input(2000, 1, 1, 12, 0, 0.0)).unwrap();
    assert_eq!((p.year.stem, p.year.branch), (Stem::Ji, Branch::Mao));
    assert_eq!(p.year.animal, "Rabbit");
    assert_eq!(p.month.branch, Branch::Zi);
}

#[test]
fn jia_zi_day() {
    let p = four_pillars(&input(2024, 1, 1, 12, 0, 0.0)).unwrap();
    assert_eq!((p.day.stem, p.day.branch), (Stem::Jia, Branch::Zi));
    assert_eq!(p.day_master, Stem::Jia);
    assert_eq!(p.day_master_element(), WuXing::Wood);
    assert_eq!(p.day.stem_polarity, Polarity::Yang);
}

#[test]
fn li_chun_2024() {
    let before = four_pillars(&input(2024, 2, 3, 12, 0, 0.0)).unwrap();
    assert_eq!((before.year.stem, before.year.branch), (Stem::Gui, Branch::Mao));
    let after = four_pillars(&input(2024, 2, 5, 12, 0, 0.0)).unwrap();
    assert_eq!((after.year.stem, after.year.branch), (Stem::Jia, Branch::Chen));
    assert_eq!(after.month.branch, Branch::Yin);
}

#[test]
fn tiger_month_1984() {
    let p = four_pillars(&input(1984, 2, 10, 12, 0, 0.0)).unwrap();
    assert_eq!((p.month.stem, p.month.branch), (Stem::Bing, Branch::Yin));
}

#[test]
fn balance_covers_all_slots() {
    let p = four_pillars(&input(1980, 6, 24, 13, 20, 9.7320)).unwrap();
    let b = element_balance(&p);
    let total = b.wood + b.fire + b.earth + b.metal + b.water;
    assert!((total - 100.0).abs() < 1e-9);
    assert!(b.get(b.dominant) >= b.get(b.weakest));
    // Eight slots: every share is a multiple of 12.5%.
    assert!(((b.metal / 12.5).round() * 12.5 - b.metal).abs() < 1e-9);
}
