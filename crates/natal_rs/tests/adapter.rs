//! Adapter behaviour across cache configurations and observers.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use natal_rs::{
    Body, CacheConfig, Ephemeris, EphemerisConfig, ManualClock, MoonPhaseName, Observer,
};

fn hanover_instant() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(1980, 6, 24, 13, 20, 0).unwrap()
}

#[tokio::test]
async fn solar_system_state_with_observer() {
    let eph = Ephemeris::new(EphemerisConfig::default()).unwrap();
    let obs = Observer::new(52.3759, 9.7320);
    let state = eph.solar_system_state(hanover_instant(), Some(obs)).await.unwrap();

    assert_eq!(state.sun.body, Body::Sun);
    assert_eq!(state.moon.position.body, Body::Moon);
    assert_eq!(state.planets.len(), 8);
    let sky = state.sky.unwrap();
    assert_eq!(sky.len(), 10);
    // Mid-afternoon in June: the Sun is well above the horizon, in the
    // south-west.
    let sun = sky.iter().find(|s| s.body == Body::Sun).unwrap();
    assert!(sun.horizontal.alt_deg > 30.0, "alt {}", sun.horizontal.alt_deg);
    assert!(sun.horizontal.az_deg > 180.0 && sun.horizontal.az_deg < 270.0);
}

#[tokio::test]
async fn state_without_observer_has_no_sky() {
    let eph = Ephemeris::new(EphemerisConfig::default()).unwrap();
    let state = eph.solar_system_state(hanover_instant(), None).await.unwrap();
    assert!(state.sky.is_none());
    assert!(state.observer.is_none());
}

#[tokio::test]
async fn invalid_observer_rejected() {
    let eph = Ephemeris::new(EphemerisConfig::default()).unwrap();
    let obs = Observer::new(123.0, 0.0);
    assert!(eph.solar_system_state(hanover_instant(), Some(obs)).await.is_err());
}

#[tokio::test]
async fn disabled_cache_never_hits() {
    let eph = Ephemeris::new(EphemerisConfig {
        cache: CacheConfig::disabled(),
        ..EphemerisConfig::default()
    })
    .unwrap();
    eph.sun_position(hanover_instant()).await.unwrap();
    eph.sun_position(hanover_instant()).await.unwrap();
    let s = eph.cache_stats();
    assert_eq!(s.hits, 0);
    assert_eq!(s.size, 0);
}

#[tokio::test]
async fn entries_expire_with_injected_clock() {
    let clock = Arc::new(ManualClock::new(0));
    let eph = Ephemeris::with_clock(
        EphemerisConfig {
            cache: CacheConfig {
                ttl: Duration::from_millis(500),
                ..CacheConfig::default()
            },
            ..EphemerisConfig::default()
        },
        clock.clone(),
    )
    .unwrap();
    eph.planet_position(Body::Venus, hanover_instant()).await.unwrap();
    clock.advance(Duration::from_millis(501));
    assert_eq!(eph.prune_cache(), 1);
    eph.planet_position(Body::Venus, hanover_instant()).await.unwrap();
    assert_eq!(eph.cache_stats().hits, 0);
}

#[tokio::test]
async fn full_moon_phase() {
    let eph = Ephemeris::new(EphemerisConfig::default()).unwrap();
    // 2024-01-25 17:54 UTC full moon.
    let moon = eph
        .moon_position(Utc.with_ymd_and_hms(2024, 1, 25, 17, 54, 0).unwrap())
        .await
        .unwrap();
    assert_eq!(moon.phase.name, MoonPhaseName::Full);
    assert!(moon.phase.illumination > 0.99);
}

#[test]
fn transforms_are_cached() {
    let eph = Ephemeris::new(EphemerisConfig::default()).unwrap();
    let obs = Observer::new(52.3759, 9.7320);
    let jd = 2_444_415.055_555;
    let eq1 = eph.ecliptic_to_equatorial(93.2, 0.0, jd);
    let eq2 = eph.ecliptic_to_equatorial(93.2, 0.0, jd + 1e-9);
    assert_eq!(eq1, eq2);
    let h1 = eph.equatorial_to_horizontal(eq1, jd, &obs);
    let h2 = eph.equatorial_to_horizontal(eq1, jd, &obs);
    assert_eq!(h1, h2);
    assert_eq!(eph.cache_stats().hits, 2);
}
