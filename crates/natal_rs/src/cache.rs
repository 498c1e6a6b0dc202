//! LRU + TTL memo cache for position and transform results.
//!
//! Entries expire once their age exceeds the configured TTL and are then
//! treated as absent. When a `set` would exceed `max_entries`, the least
//! recently used entry is evicted; a `get` hit or a `set` of an existing key
//! refreshes recency.
//!
//! The cache is not internally synchronized. The adapter owns one instance
//! behind a mutex.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use natal_core::Body;
use serde::Serialize;
use tracing::debug;

use crate::error::EphemerisError;

/// Millisecond time source for TTL checks.
pub trait Clock: Send + Sync + Debug {
    fn now_ms(&self) -> u64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    }
}

/// Hand-driven clock for tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: AtomicU64::new(start_ms),
        }
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::Relaxed);
    }

    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_millis() as u64, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::Relaxed)
    }
}

/// Cache settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    pub enabled: bool,
    pub max_entries: usize,
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 1000,
            ttl: Duration::from_millis(60_000),
        }
    }
}

impl CacheConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), EphemerisError> {
        if self.enabled && self.max_entries == 0 {
            return Err(EphemerisError::InvalidConfig(
                "max_entries must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Rounding applied before values become part of a key.
const JD_SCALE: f64 = 1e6;
const ANGLE_SCALE: f64 = 1e8;
const OBSERVER_SCALE: f64 = 1e6;

fn quantize(value: f64, scale: f64) -> i64 {
    (value * scale).round() as i64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformKind {
    EclipticToEquatorial,
    EquatorialToHorizontal,
}

/// Quantized cache key.
///
/// Julian Dates that round to the same microday share a key, so float noise
/// in repeated conversions does not fragment the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Position {
        body: Body,
        jd: i64,
    },
    Transform {
        kind: TransformKind,
        lon: i64,
        lat: i64,
        jd: i64,
        observer: Option<(i64, i64)>,
    },
}

impl CacheKey {
    pub fn position(body: Body, jd: f64) -> Self {
        Self::Position {
            body,
            jd: quantize(jd, JD_SCALE),
        }
    }

    /// `observer` is (latitude, longitude) in degrees.
    pub fn transform(
        kind: TransformKind,
        lon_deg: f64,
        lat_deg: f64,
        jd: f64,
        observer: Option<(f64, f64)>,
    ) -> Self {
        Self::Transform {
            kind,
            lon: quantize(lon_deg, ANGLE_SCALE),
            lat: quantize(lat_deg, ANGLE_SCALE),
            jd: quantize(jd, JD_SCALE),
            observer: observer
                .map(|(la, lo)| (quantize(la, OBSERVER_SCALE), quantize(lo, OBSERVER_SCALE))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
    pub hit_rate: f64,
}

#[derive(Debug)]
struct Entry<V> {
    value: V,
    inserted_ms: u64,
    tick: u64,
}

/// LRU + TTL cache keyed by [`CacheKey`].
#[derive(Debug)]
pub struct ComputeCache<V> {
    config: CacheConfig,
    clock: Arc<dyn Clock>,
    entries: HashMap<CacheKey, Entry<V>>,
    /// Recency order: lowest tick is least recently used.
    recency: BTreeMap<u64, CacheKey>,
    next_tick: u64,
    hits: u64,
    misses: u64,
}

impl<V: Clone> ComputeCache<V> {
    pub fn new(config: CacheConfig) -> Result<Self, EphemerisError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: CacheConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, EphemerisError> {
        config.validate()?;
        Ok(Self {
            config,
            clock,
            entries: HashMap::new(),
            recency: BTreeMap::new(),
            next_tick: 0,
            hits: 0,
            misses: 0,
        })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn is_expired(&self, inserted_ms: u64, now: u64) -> bool {
        u128::from(now.saturating_sub(inserted_ms)) > self.config.ttl.as_millis()
    }

    fn bump(&mut self) -> u64 {
        let t = self.next_tick;
        self.next_tick += 1;
        t
    }

    /// Value for `key` if present and fresh. Counts a hit or a miss.
    pub fn get(&mut self, key: &CacheKey) -> Option<V> {
        if !self.config.enabled {
            self.misses += 1;
            return None;
        }
        let now = self.clock.now_ms();
        let Some((inserted_ms, old_tick)) = self.entries.get(key).map(|e| (e.inserted_ms, e.tick))
        else {
            self.misses += 1;
            debug!(?key, "cache miss");
            return None;
        };
        if self.is_expired(inserted_ms, now) {
            self.delete(key);
            self.misses += 1;
            debug!(?key, "cache miss (expired)");
            return None;
        }

        let tick = self.bump();
        self.recency.remove(&old_tick);
        self.recency.insert(tick, *key);
        let entry = self.entries.get_mut(key)?;
        entry.tick = tick;
        self.hits += 1;
        debug!(?key, "cache hit");
        Some(entry.value.clone())
    }

    /// Insert or replace. No-op when the cache is disabled.
    pub fn set(&mut self, key: CacheKey, value: V) {
        if !self.config.enabled {
            return;
        }
        let now = self.clock.now_ms();
        if let Some(old) = self.entries.remove(&key) {
            self.recency.remove(&old.tick);
        }
        while self.entries.len() >= self.config.max_entries {
            let Some((_, lru)) = self.recency.pop_first() else {
                break;
            };
            self.entries.remove(&lru);
            debug!(key = ?lru, "cache evict");
        }
        let tick = self.bump();
        self.recency.insert(tick, key);
        self.entries.insert(
            key,
            Entry {
                value,
                inserted_ms: now,
                tick,
            },
        );
    }

    /// Whether `key` is present and fresh. Neither counts toward the
    /// statistics nor refreshes recency; expired entries are dropped.
    pub fn has(&mut self, key: &CacheKey) -> bool {
        if !self.config.enabled {
            return false;
        }
        let now = self.clock.now_ms();
        let Some(inserted_ms) = self.entries.get(key).map(|e| e.inserted_ms) else {
            return false;
        };
        if self.is_expired(inserted_ms, now) {
            self.delete(key);
            return false;
        }
        true
    }

    pub fn delete(&mut self, key: &CacheKey) -> bool {
        match self.entries.remove(key) {
            Some(e) => {
                self.recency.remove(&e.tick);
                true
            }
            None => false,
        }
    }

    /// Drop all entries and reset the statistics.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Remove expired entries, returning how many were removed.
    pub fn prune(&mut self) -> usize {
        let now = self.clock.now_ms();
        let expired: Vec<CacheKey> = self
            .entries
            .iter()
            .filter(|(_, e)| self.is_expired(e.inserted_ms, now))
            .map(|(k, _)| *k)
            .collect();
        for key in &expired {
            self.delete(key);
        }
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        let total = self.hits + self.misses;
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.entries.len(),
            hit_rate: if total > 0 {
                self.hits as f64 / total as f64
            } else {
                0.0
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(max_entries: usize, ttl_ms: u64) -> (ComputeCache<u32>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_000));
        let config = CacheConfig {
            enabled: true,
            max_entries,
            ttl: Duration::from_millis(ttl_ms),
        };
        (ComputeCache::with_clock(config, clock.clone()).unwrap(), clock)
    }

    fn key(i: u32) -> CacheKey {
        CacheKey::position(Body::Mars, 2_451_545.0 + f64::from(i))
    }

    #[test]
    fn evicts_least_recently_used() {
        let (mut c, _) = cache(3, 60_000);
        for i in 0..3 {
            c.set(key(i), i);
        }
        c.set(key(3), 3);
        assert_eq!(c.len(), 3);
        assert!(!c.has(&key(0)));
        assert!(c.has(&key(1)) && c.has(&key(2)) && c.has(&key(3)));
    }

    #[test]
    fn get_refreshes_recency() {
        let (mut c, _) = cache(3, 60_000);
        for i in 0..3 {
            c.set(key(i), i);
        }
        assert_eq!(c.get(&key(0)), Some(0));
        c.set(key(3), 3);
        assert!(c.has(&key(0)));
        assert!(!c.has(&key(1)));
    }

    #[test]
    fn set_existing_refreshes_recency() {
        let (mut c, _) = cache(2, 60_000);
        c.set(key(0), 0);
        c.set(key(1), 1);
        c.set(key(0), 10);
        c.set(key(2), 2);
        assert_eq!(c.get(&key(0)), Some(10));
        assert!(!c.has(&key(1)));
    }

    #[test]
    fn ttl_boundary() {
        let (mut c, clock) = cache(10, 100);
        c.set(key(0), 0);
        clock.advance(Duration::from_millis(99));
        assert_eq!(c.get(&key(0)), Some(0));
        clock.advance(Duration::from_millis(1));
        assert!(c.has(&key(0)), "age == ttl is still fresh");
        clock.advance(Duration::from_millis(1));
        assert_eq!(c.get(&key(0)), None);
        assert_eq!(c.len(), 0);
    }

    #[test]
    fn prune_counts_expired() {
        let (mut c, clock) = cache(10, 100);
        c.set(key(0), 0);
        c.set(key(1), 1);
        clock.advance(Duration::from_millis(60));
        c.set(key(2), 2);
        clock.advance(Duration::from_millis(50));
        assert_eq!(c.prune(), 2);
        assert_eq!(c.len(), 1);
        assert!(c.has(&key(2)));
        assert_eq!(c.prune(), 0);
    }

    #[test]
    fn stats_accumulate_until_clear() {
        let (mut c, _) = cache(10, 60_000);
        c.set(key(0), 0);
        c.get(&key(0));
        c.get(&key(0));
        c.get(&key(1));
        let s = c.stats();
        assert_eq!((s.hits, s.misses, s.size), (2, 1, 1));
        assert!((s.hit_rate - 2.0 / 3.0).abs() < 1e-12);
        c.clear();
        let s = c.stats();
        assert_eq!((s.hits, s.misses, s.size), (0, 0, 0));
        assert_eq!(s.hit_rate, 0.0);
    }

    #[test]
    fn disabled_always_misses() {
        let mut c: ComputeCache<u32> = ComputeCache::new(CacheConfig::disabled()).unwrap();
        c.set(key(0), 0);
        assert_eq!(c.get(&key(0)), None);
        assert!(!c.has(&key(0)));
        assert_eq!(c.len(), 0);
        assert_eq!(c.stats().misses, 1);
    }

    #[test]
    fn zero_capacity_rejected() {
        let config = CacheConfig {
            max_entries: 0,
            ..CacheConfig::default()
        };
        assert!(ComputeCache::<u32>::new(config).is_err());
    }

    #[test]
    fn key_quantization() {
        let a = CacheKey::position(Body::Moon, 2_451_545.000_000_1);
        let b = CacheKey::position(Body::Moon, 2_451_545.000_000_4);
        assert_eq!(a, b);
        assert_ne!(a, CacheKey::position(Body::Sun, 2_451_545.000_000_1));
        assert_ne!(a, CacheKey::position(Body::Moon, 2_451_545.000_01));
    }

    #[test]
    fn transform_keys_distinguish_observer() {
        let jd = 2_451_545.0;
        let kind = TransformKind::EquatorialToHorizontal;
        let k = |obs| CacheKey::transform(kind, 10.0, 5.0, jd, obs);
        assert_ne!(k(None), k(Some((52.0, 13.0))));
        assert_eq!(k(Some((52.0, 13.0))), k(Some((52.000_000_1, 13.0))));
        let e = CacheKey::transform(TransformKind::EclipticToEquatorial, 10.0, 5.0, jd, None);
        assert_ne!(k(None), e);
    }

    #[test]
    fn delete_removes() {
        let (mut c, _) = cache(10, 60_000);
        c.set(key(0), 0);
        assert!(c.delete(&key(0)));
        assert!(!c.delete(&key(0)));
        assert!(c.is_empty());
    }
}
