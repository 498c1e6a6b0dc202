use criterion::{Criterion, black_box, criterion_group, criterion_main};
use natal_core::Body;
use natal_rs::{CacheConfig, CacheKey, ComputeCache, Ephemeris, EphemerisConfig, Observer};

fn cache_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache");

    group.bench_function("set_get_hit", |b| {
        let mut cache: ComputeCache<f64> = ComputeCache::new(CacheConfig::default()).unwrap();
        let key = CacheKey::position(Body::Mars, 2_451_545.0);
        cache.set(key, 1.0);
        b.iter(|| black_box(cache.get(black_box(&key))))
    });

    group.bench_function("set_with_eviction", |b| {
        let config = CacheConfig {
            max_entries: 64,
            ..CacheConfig::default()
        };
        let mut cache: ComputeCache<f64> = ComputeCache::new(config).unwrap();
        let mut jd = 2_451_545.0;
        b.iter(|| {
            jd += 0.001;
            cache.set(CacheKey::position(Body::Moon, jd), jd);
        })
    });

    group.finish();
}

fn transforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("transforms");
    let uncached = Ephemeris::new(EphemerisConfig {
        cache: CacheConfig::disabled(),
        ..EphemerisConfig::default()
    })
    .unwrap();
    let cached = Ephemeris::new(EphemerisConfig::default()).unwrap();
    let observer = Observer::new(52.3759, 9.7320);

    group.bench_function("ecl_to_hz_uncached", |b| {
        b.iter(|| {
            let eq = uncached.ecliptic_to_equatorial(black_box(93.2), 0.0, 2_444_415.055_555);
            black_box(uncached.equatorial_to_horizontal(eq, 2_444_415.055_555, &observer))
        })
    });

    group.bench_function("ecl_to_hz_cached", |b| {
        b.iter(|| {
            let eq = cached.ecliptic_to_equatorial(black_box(93.2), 0.0, 2_444_415.055_555);
            black_box(cached.equatorial_to_horizontal(eq, 2_444_415.055_555, &observer))
        })
    });

    group.finish();
}

criterion_group!(benches, cache_ops, transforms);
criterion_main!(benches);
