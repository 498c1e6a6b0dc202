use criterion::{Criterion, black_box, criterion_group, criterion_main};
use natal_core::vsop87::{earth_heliocentric, planet_series};
use natal_core::{Body, Engine, elp_moon::moon_geocentric, pluto::pluto_heliocentric};
use natal_time::JulianMoment;

fn series_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("series");
    group.bench_function("vsop87_earth", |b| {
        b.iter(|| earth_heliocentric(black_box(-0.0196)))
    });
    if let Some(saturn) = planet_series(Body::Saturn) {
        group.bench_function("vsop87_saturn", |b| {
            b.iter(|| saturn.heliocentric(black_box(-0.0196)))
        });
    }
    group.bench_function("pluto", |b| b.iter(|| pluto_heliocentric(black_box(-0.196))));
    group.bench_function("elp_moon", |b| b.iter(|| moon_geocentric(black_box(-0.196))));
    group.finish();
}

fn engine_bench(c: &mut Criterion) {
    let engine = Engine::default();
    let moment = JulianMoment::from_jd_ut(2_444_415.055_555_6);

    let mut group = c.benchmark_group("engine");
    group.bench_function("sun", |b| {
        b.iter(|| engine.position(Body::Sun, black_box(&moment)))
    });
    group.bench_function("mars", |b| {
        b.iter(|| engine.position(Body::Mars, black_box(&moment)))
    });
    group.bench_function("all_bodies", |b| b.iter(|| engine.positions(black_box(&moment))));
    group.finish();
}

criterion_group!(benches, series_bench, engine_bench);
criterion_main!(benches);
