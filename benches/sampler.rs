use criterion::black_box;
use criterion::Criterion;
use criterion::{criterion_group, criterion_main};
use probsim::geometry::presets;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

fn bench_target(c: &mut Criterion) {
    let regions =
        presets::target(presets::TARGET_SIDE, &presets::TARGET_RADII).unwrap();
    let mut group = c.benchmark_group("target");
    for n in [1_000, 10_000, 50_000] {
        group.bench_function(format!("run {}", n), |b| {
            let mut rng = Xoshiro256Plus::seed_from_u64(n as u64);
            b.iter(|| regions.run(black_box(n), &mut rng))
        });
    }
    group.finish();
}

fn bench_inscribed(c: &mut Criterion) {
    let regions = presets::inscribed(presets::INSCRIBED_SIDE).unwrap();
    let mut rng = Xoshiro256Plus::seed_from_u64(0x5EED);
    let points = regions.square().sample_points(10_000, &mut rng);

    let mut group = c.benchmark_group("inscribed");
    group.bench_function("classify 10k", |b| {
        b.iter(|| regions.classify_all(black_box(&points)))
    });
    group.bench_function("run 2k", |b| {
        b.iter(|| regions.run(black_box(presets::INSCRIBED_SAMPLES), &mut rng))
    });
    group.finish();
}

criterion_group!(sampler_benches, bench_target, bench_inscribed);
criterion_main!(sampler_benches);
