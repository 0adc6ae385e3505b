//! Benchmarks for the per-frame CPU work: advancing and projecting a field.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use starfield::projection::{self, StarInstance};
use starfield::{FieldConfig, ParticleField};

const STAR_COUNTS: [usize; 4] = [10, 600, 2000, 5000];

fn bench_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("advance");

    for count in STAR_COUNTS {
        let config = FieldConfig::new(1920, 1080).with_star_count(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &config, |b, config| {
            let mut field = ParticleField::with_rng(config, SmallRng::seed_from_u64(1));
            b.iter(|| black_box(field.advance(black_box(0.016), config)))
        });
    }

    group.finish();
}

fn bench_project(c: &mut Criterion) {
    let mut group = c.benchmark_group("project_field");

    for count in STAR_COUNTS {
        let config = FieldConfig::new(1920, 1080).with_star_count(count);
        let field = ParticleField::with_rng(&config, SmallRng::seed_from_u64(1));
        let mut sprites: Vec<StarInstance> = Vec::with_capacity(count);
        let mut t = 0.0_f64;

        group.bench_with_input(BenchmarkId::from_parameter(count), &config, |b, config| {
            b.iter(|| {
                t += 0.016;
                projection::project_field(&field, config, t, &mut sprites);
                black_box(sprites.len())
            })
        });
    }

    group.finish();
}

fn bench_frame(c: &mut Criterion) {
    let config = FieldConfig::new(1920, 1080);
    let mut field = ParticleField::with_rng(&config, SmallRng::seed_from_u64(1));
    let mut sprites = Vec::with_capacity(config.star_count);
    let mut t = 0.0_f64;

    c.bench_function("frame_600", |b| {
        b.iter(|| {
            t += 0.016;
            field.advance(0.016, &config);
            projection::project_field(&field, &config, t, &mut sprites);
            black_box(&sprites);
        })
    });
}

criterion_group!(benches, bench_advance, bench_project, bench_frame);
criterion_main!(benches);
