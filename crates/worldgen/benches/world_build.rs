//! Criterion benchmark for the full world-generation pipeline at a few grid
//! sizes, grounded in the teacher's own `simulation/benches/city_perf.rs`.
//!
//! Run with: cargo bench -p worldgen --bench world_build

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use worldgen::config::WorldConfig;
use worldgen::world::World;

fn config_for(seed: u64, size: usize, enable_erosion: bool) -> WorldConfig {
    let mut cfg = WorldConfig::new(seed, size, size);
    cfg.enable_erosion = enable_erosion;
    cfg
}

fn bench_world_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_build");
    group.sample_size(10);

    for &size in &[128usize, 256, 512] {
        group.bench_function(format!("no_erosion_{size}"), |b| {
            b.iter(|| black_box(World::build(config_for(1, size, false)).unwrap()));
        });
    }

    group.bench_function("erosion_256", |b| {
        b.iter(|| black_box(World::build(config_for(1, 256, true)).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_world_build);
criterion_main!(benches);
