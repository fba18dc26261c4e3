//! Benchmark for particle stepping and scene building.
//!
//! TARGET: the void effect (5,420 particles) well under 1ms per frame
//!
//! Run with: cargo bench --package handsign_rendering --bench particle_benchmark

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use handsign_core::Technique;
use handsign_rendering::particles::{
    reset_pool, step_ballistic, step_spiral, technique_rng, BallisticParams, ParticleKind, ParticlePool,
    SpiralParams,
};
use handsign_rendering::{EffectSet, EffectSettings, SceneGraphs};

const DT: f32 = 1.0 / 60.0;

fn benchmark_spiral_step(c: &mut Criterion) {
    let params = SpiralParams::default();
    let mut rng = technique_rng(7, Technique::UnlimitedVoid);
    let mut pool = ParticlePool::new(5000, ParticleKind::Spiral { angular_velocity: 0.0 });
    reset_pool(&mut pool, &params, 0.0, &mut rng);

    let mut group = c.benchmark_group("spiral");
    group.throughput(Throughput::Elements(5000));
    group.bench_function("step_5000", |b| {
        b.iter(|| step_spiral(black_box(&mut pool), &params, black_box(DT), &mut rng));
    });
    group.finish();
}

fn benchmark_ballistic_step(c: &mut Criterion) {
    let params = BallisticParams::default();
    let mut rng = technique_rng(7, Technique::UnlimitedVoid);
    let mut pool = ParticlePool::new(420, ParticleKind::Ballistic);
    reset_pool(&mut pool, &params, 0.0, &mut rng);

    let mut group = c.benchmark_group("ballistic");
    group.throughput(Throughput::Elements(420));
    group.bench_function("step_420", |b| {
        b.iter(|| step_ballistic(black_box(&mut pool), &params, 0.5, black_box(DT), &mut rng));
    });
    group.finish();
}

fn benchmark_full_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");
    for technique in Technique::ALL {
        let mut effects = EffectSet::new(EffectSettings::default());
        let mut scenes = SceneGraphs::new();
        group.bench_function(format!("{technique:?}"), |b| {
            b.iter(|| {
                scenes.begin_frame();
                effects.run(technique, black_box(0.6), DT, &mut scenes);
                scenes.finish();
                black_box(scenes.main.points().len())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_spiral_step, benchmark_ballistic_step, benchmark_full_frame);
criterion_main!(benches);
