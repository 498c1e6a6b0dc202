//! Cached adapter over the position engine.
//!
//! Position lookups are `async` although they run synchronously today, so a
//! remote or out-of-process engine can later stand behind the same surface.
//! The cache lock is never held across an await point.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use natal_core::{Body, CelestialPosition, Engine, EngineConfig, MoonPhase, moon_phase};
use natal_frames::{Equatorial, Horizontal, ecliptic_to_equatorial, equatorial_to_horizontal};
use natal_time::{JulianMoment, mean_obliquity_deg, sidereal_time};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::{
    CacheConfig, CacheKey, CacheStats, Clock, ComputeCache, SystemClock, TransformKind,
};
use crate::error::EphemerisError;

/// Adapter settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EphemerisConfig {
    pub engine: EngineConfig,
    pub cache: CacheConfig,
}

impl EphemerisConfig {
    pub fn validate(&self) -> Result<(), EphemerisError> {
        self.cache.validate()
    }
}

/// Geographic observer. Longitude is east-positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observer {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_m: Option<f64>,
}

impl Observer {
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            elevation_m: None,
        }
    }

    pub fn validate(&self) -> Result<(), EphemerisError> {
        if !self.latitude_deg.is_finite() || self.latitude_deg.abs() > 90.0 {
            return Err(EphemerisError::InvalidObserver(format!(
                "latitude {} outside [-90, 90]",
                self.latitude_deg
            )));
        }
        if !self.longitude_deg.is_finite() || self.longitude_deg.abs() > 180.0 {
            return Err(EphemerisError::InvalidObserver(format!(
                "longitude {} outside [-180, 180]",
                self.longitude_deg
            )));
        }
        if let Some(h) = self.elevation_m {
            if !h.is_finite() {
                return Err(EphemerisError::InvalidObserver(format!("elevation {h}")));
            }
        }
        Ok(())
    }
}

/// Moon position with its phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoonState {
    pub position: CelestialPosition,
    pub phase: MoonPhase,
}

/// Equatorial and horizontal coordinates of one body for an observer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkyPosition {
    pub body: Body,
    pub equatorial: Equatorial,
    pub horizontal: Horizontal,
}

/// Everything the engine knows about one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolarSystemState {
    pub moment: JulianMoment,
    pub instant: DateTime<Utc>,
    pub sun: CelestialPosition,
    pub moon: MoonState,
    /// Mercury through Pluto.
    pub planets: Vec<CelestialPosition>,
    pub observer: Option<Observer>,
    /// Present when an observer was supplied, Sun first.
    pub sky: Option<Vec<SkyPosition>>,
}

#[derive(Debug, Clone)]
enum CachedValue {
    Position(CelestialPosition),
    Equatorial(Equatorial),
    Horizontal(Horizontal),
}

/// Bodies other than the Sun and Moon.
const PLANETS: [Body; 8] = [
    Body::Mercury,
    Body::Venus,
    Body::Mars,
    Body::Jupiter,
    Body::Saturn,
    Body::Uranus,
    Body::Neptune,
    Body::Pluto,
];

/// Position engine plus its private memo cache.
#[derive(Debug)]
pub struct Ephemeris {
    engine: Engine,
    cache: Mutex<ComputeCache<CachedValue>>,
}

impl Ephemeris {
    pub fn new(config: EphemerisConfig) -> Result<Self, EphemerisError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Build with an injected clock for the cache TTL.
    pub fn with_clock(
        config: EphemerisConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, EphemerisError> {
        config.validate()?;
        let engine = Engine::new(config.engine)?;
        let cache = ComputeCache::with_clock(config.cache, clock)?;
        Ok(Self {
            engine,
            cache: Mutex::new(cache),
        })
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    fn cached_position(
        &self,
        body: Body,
        moment: &JulianMoment,
    ) -> Result<CelestialPosition, EphemerisError> {
        let key = CacheKey::position(body, moment.jd_ut);
        if let Some(CachedValue::Position(p)) = self.cache.lock().get(&key) {
            return Ok(p);
        }
        let p = self.engine.position(body, moment)?;
        self.cache.lock().set(key, CachedValue::Position(p));
        Ok(p)
    }

    /// Positions of `bodies`, evaluating the engine once for all misses.
    fn cached_positions(
        &self,
        bodies: &[Body],
        moment: &JulianMoment,
    ) -> Result<Vec<CelestialPosition>, EphemerisError> {
        let hits: Vec<Option<CelestialPosition>> = {
            let mut cache = self.cache.lock();
            bodies
                .iter()
                .map(|&b| match cache.get(&CacheKey::position(b, moment.jd_ut)) {
                    Some(CachedValue::Position(p)) => Some(p),
                    _ => None,
                })
                .collect()
        };
        if hits.iter().all(Option::is_some) {
            return Ok(hits.into_iter().flatten().collect());
        }

        debug!(jd_ut = moment.jd_ut, "evaluating all bodies");
        let all = self.engine.positions(moment)?;
        let mut cache = self.cache.lock();
        let mut out = Vec::with_capacity(bodies.len());
        for &body in bodies {
            if let Some(p) = all.iter().find(|p| p.body == body) {
                cache.set(CacheKey::position(body, moment.jd_ut), CachedValue::Position(*p));
                out.push(*p);
            }
        }
        Ok(out)
    }

    pub async fn planet_position(
        &self,
        body: Body,
        instant: DateTime<Utc>,
    ) -> Result<CelestialPosition, EphemerisError> {
        self.cached_position(body, &JulianMoment::from_utc(&instant))
    }

    /// Mercury through Pluto.
    pub async fn all_planet_positions(
        &self,
        instant: DateTime<Utc>,
    ) -> Result<Vec<CelestialPosition>, EphemerisError> {
        self.cached_positions(&PLANETS, &JulianMoment::from_utc(&instant))
    }

    pub async fn sun_position(
        &self,
        instant: DateTime<Utc>,
    ) -> Result<CelestialPosition, EphemerisError> {
        self.cached_position(Body::Sun, &JulianMoment::from_utc(&instant))
    }

    pub async fn moon_position(&self, instant: DateTime<Utc>) -> Result<MoonState, EphemerisError> {
        let moment = JulianMoment::from_utc(&instant);
        let sun = self.cached_position(Body::Sun, &moment)?;
        let moon = self.cached_position(Body::Moon, &moment)?;
        Ok(MoonState {
            position: moon,
            phase: moon_phase(&sun, &moon),
        })
    }

    pub async fn solar_system_state(
        &self,
        instant: DateTime<Utc>,
        observer: Option<Observer>,
    ) -> Result<SolarSystemState, EphemerisError> {
        if let Some(obs) = &observer {
            obs.validate()?;
        }
        let moment = JulianMoment::from_utc(&instant);
        let all = self.cached_positions(&Body::ALL, &moment)?;
        let find = |body: Body| {
            all.iter()
                .copied()
                .find(|p| p.body == body)
                .ok_or_else(|| {
                    EphemerisError::Engine(natal_core::EngineError::UnknownBody(body.id().into()))
                })
        };
        let sun = find(Body::Sun)?;
        let moon = find(Body::Moon)?;
        let planets: Vec<CelestialPosition> =
            all.iter().copied().filter(|p| PLANETS.contains(&p.body)).collect();

        let sky = observer.map(|obs| {
            all.iter()
                .map(|p| {
                    let equatorial =
                        self.ecliptic_to_equatorial(p.lon_deg, p.lat_deg, moment.jd_ut);
                    let horizontal = self.equatorial_to_horizontal(equatorial, moment.jd_ut, &obs);
                    SkyPosition {
                        body: p.body,
                        equatorial,
                        horizontal,
                    }
                })
                .collect()
        });

        Ok(SolarSystemState {
            moment,
            instant,
            sun,
            moon: MoonState {
                position: moon,
                phase: moon_phase(&sun, &moon),
            },
            planets,
            observer,
            sky,
        })
    }

    pub fn date_to_jd(&self, instant: &DateTime<Utc>) -> f64 {
        natal_time::date_to_jd(instant)
    }

    pub fn jd_to_date(&self, jd: f64) -> Result<DateTime<Utc>, EphemerisError> {
        Ok(natal_time::jd_to_date(jd)?)
    }

    /// Ecliptic of date to equatorial, with the mean obliquity at `jd_ut`.
    pub fn ecliptic_to_equatorial(&self, lon_deg: f64, lat_deg: f64, jd_ut: f64) -> Equatorial {
        let key = CacheKey::transform(
            TransformKind::EclipticToEquatorial,
            lon_deg,
            lat_deg,
            jd_ut,
            None,
        );
        if let Some(CachedValue::Equatorial(eq)) = self.cache.lock().get(&key) {
            return eq;
        }
        let eps = mean_obliquity_deg(JulianMoment::from_jd_ut(jd_ut).centuries_tt());
        let eq = ecliptic_to_equatorial(lon_deg, lat_deg, eps);
        self.cache.lock().set(key, CachedValue::Equatorial(eq));
        eq
    }

    /// Equatorial to horizontal for `observer` at `jd_ut`, via local mean
    /// sidereal time.
    pub fn equatorial_to_horizontal(
        &self,
        eq: Equatorial,
        jd_ut: f64,
        observer: &Observer,
    ) -> Horizontal {
        let key = CacheKey::transform(
            TransformKind::EquatorialToHorizontal,
            eq.ra_deg,
            eq.dec_deg,
            jd_ut,
            Some((observer.latitude_deg, observer.longitude_deg)),
        );
        if let Some(CachedValue::Horizontal(h)) = self.cache.lock().get(&key) {
            return h;
        }
        let lst = sidereal_time(jd_ut, observer.longitude_deg).lst_deg;
        let h = equatorial_to_horizontal(eq.ra_deg, eq.dec_deg, observer.latitude_deg, lst);
        self.cache.lock().set(key, CachedValue::Horizontal(h));
        h
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.lock().stats()
    }

    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }

    /// Drop expired cache entries; returns how many were removed.
    pub fn prune_cache(&self) -> usize {
        self.cache.lock().prune()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn j2000() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn second_lookup_hits_cache() {
        let eph = Ephemeris::new(EphemerisConfig::default()).unwrap();
        let a = eph.planet_position(Body::Mars, j2000()).await.unwrap();
        let b = eph.planet_position(Body::Mars, j2000()).await.unwrap();
        assert_eq!(a, b);
        let s = eph.cache_stats();
        assert_eq!((s.hits, s.misses, s.size), (1, 1, 1));
    }

    #[tokio::test]
    async fn all_planets_excludes_luminaries() {
        let eph = Ephemeris::new(EphemerisConfig::default()).unwrap();
        let planets = eph.all_planet_positions(j2000()).await.unwrap();
        assert_eq!(planets.len(), 8);
        assert!(planets.iter().all(|p| p.body != Body::Sun && p.body != Body::Moon));
        // Second call is served entirely from the cache.
        let before = eph.cache_stats().hits;
        eph.all_planet_positions(j2000()).await.unwrap();
        assert_eq!(eph.cache_stats().hits - before, 8);
    }

    #[tokio::test]
    async fn clear_resets_stats() {
        let eph = Ephemeris::new(EphemerisConfig::default()).unwrap();
        eph.sun_position(j2000()).await.unwrap();
        eph.clear_cache();
        let s = eph.cache_stats();
        assert_eq!((s.hits, s.misses, s.size), (0, 0, 0));
    }

    #[test]
    fn observer_validation() {
        assert!(Observer::new(52.0, 13.0).validate().is_ok());
        assert!(Observer::new(91.0, 13.0).validate().is_err());
        assert!(Observer::new(0.0, f64::NAN).validate().is_err());
    }

    #[test]
    fn jd_conversions() {
        let eph = Ephemeris::new(EphemerisConfig::default()).unwrap();
        assert_eq!(eph.date_to_jd(&j2000()), 2_451_545.0);
        assert_eq!(eph.jd_to_date(2_451_545.0).unwrap(), j2000());
        assert!(eph.jd_to_date(f64::INFINITY).is_err());
    }
}
