use criterion::{criterion_group, criterion_main, Criterion, black_box};

use terramarch::generation::WorldConfig;
use terramarch::mesh::MeshSettings;
use terramarch::terrain::{NoiseParams, NoiseTerrain};
use terramarch::voxel::{Chunk, ChunkCoord, WorldGrid};

fn bench_chunk_rebuild_smooth(c: &mut Criterion) {
    let field = NoiseTerrain::new(12345, NoiseParams::default());
    let settings = MeshSettings::default();
    let mut chunk = Chunk::new(ChunkCoord::new(0, 0), settings.width, settings.height);

    c.bench_function("chunk_rebuild_smooth_16x20", |b| {
        b.iter(|| {
            chunk.rebuild(black_box(&field), black_box(&settings));
            black_box(chunk.mesh().triangle_count());
        });
    });
}

fn bench_chunk_rebuild_blocky(c: &mut Criterion) {
    let field = NoiseTerrain::new(12345, NoiseParams::default());
    let settings = MeshSettings { smooth: false, ..Default::default() };
    let mut chunk = Chunk::new(ChunkCoord::new(0, 0), settings.width, settings.height);

    c.bench_function("chunk_rebuild_blocky_16x20", |b| {
        b.iter(|| {
            chunk.rebuild(black_box(&field), black_box(&settings));
            black_box(chunk.mesh().triangle_count());
        });
    });
}

fn bench_world_populate_4x4(c: &mut Criterion) {
    let config = WorldConfig { seed: 12345, ..Default::default() };
    let mut world = match WorldGrid::with_noise_terrain(config) {
        Ok(world) => world,
        Err(e) => panic!("failed to create world: {}", e),
    };
    world.build_all();

    c.bench_function("world_populate_4x4", |b| {
        b.iter(|| {
            world.populate_all();
        });
    });
}

criterion_group!(
    benches,
    bench_chunk_rebuild_smooth,
    bench_chunk_rebuild_blocky,
    bench_world_populate_4x4,
);
criterion_main!(benches);
