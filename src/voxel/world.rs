//! World grid: owns every chunk, meshes them in parallel, routes edits

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use glam::{IVec3, Vec3};
use rayon::prelude::*;

use super::chunk::{Chunk, ChunkCoord};
use super::edit::EditKind;
use crate::core::{Error, Result};
use crate::generation::{resolve_seed, WorldConfig};
use crate::math::Aabb;
use crate::mesh::{MeshConsumer, MeshSettings};
use crate::terrain::{DensityField, TerrainField};

/// Container for the chunks of one world.
///
/// Chunks are keyed by their horizontal origin on the chunk-width lattice.
/// The map only grows: rebuilding the world adds missing chunks and leaves
/// existing ones in place.
pub struct WorldGrid {
    config: WorldConfig,
    field: TerrainField,
    chunks: HashMap<ChunkCoord, Chunk>,
    /// Dedicated pool when `config.jobs` is set
    pool: Option<rayon::ThreadPool>,
}

fn build_pool(jobs: Option<usize>) -> Result<Option<rayon::ThreadPool>> {
    jobs.map(|n| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .thread_name(|i| format!("terramarch-mesh-{}", i))
            .build()
            .map_err(|e| Error::ThreadPool(e.to_string()))
    })
    .transpose()
}

fn rebuild_chunks(chunks: &mut HashMap<ChunkCoord, Chunk>, field: &dyn DensityField, settings: &MeshSettings) {
    chunks
        .par_iter_mut()
        .for_each(|(_, chunk)| chunk.rebuild(field, settings));
}

impl WorldGrid {
    /// Create an empty world sampling `field`
    pub fn new(config: WorldConfig, field: TerrainField) -> Result<Self> {
        let pool = build_pool(config.jobs)?;
        Ok(Self {
            config,
            field,
            chunks: HashMap::new(),
            pool,
        })
    }

    /// Create an empty world over seeded noise terrain from `config.noise`.
    ///
    /// A zero seed is resolved here, so the terrain is only built once.
    pub fn with_noise_terrain(mut config: WorldConfig) -> Result<Self> {
        config.seed = resolve_seed(config.seed);
        let field = TerrainField::noise(config.seed, config.noise.clone());
        Self::new(config, field)
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Replace the configuration.
    ///
    /// Existing chunks stay under their old keys; the next rebuild meshes them
    /// with the new dimensions, threshold and mode.
    pub fn set_config(&mut self, config: WorldConfig) -> Result<()> {
        if config.jobs != self.config.jobs {
            self.pool = build_pool(config.jobs)?;
        }
        self.config = config;
        Ok(())
    }

    pub fn field(&self) -> &TerrainField {
        &self.field
    }

    pub fn mesh_settings(&self) -> MeshSettings {
        self.config.mesh_settings()
    }

    /// Resolve the seed if unset and bring noise terrain in line with it
    fn prepare_field(&mut self) -> Arc<dyn DensityField> {
        if self.config.seed == 0 {
            self.config.seed = resolve_seed(0);
        }
        if self.field.sync(self.config.seed, &self.config.noise) {
            log::debug!("Rebuilt noise terrain for seed {}", self.config.seed);
        }
        self.field.sampler()
    }

    /// Create every chunk of the configured square that doesn't exist yet.
    ///
    /// Returns the number of chunks created.
    pub fn build_all(&mut self) -> usize {
        let size = self.config.world_size_in_chunks as i32;
        let (width, height) = (self.config.chunk_width, self.config.chunk_height);
        let mut created = 0;

        for x in 0..size {
            for z in 0..size {
                let coord = ChunkCoord::from_cell(x, z, width);
                if self.chunks.contains_key(&coord) {
                    continue;
                }
                self.chunks.insert(coord, Chunk::new(coord, width, height));
                log::debug!("Created chunk {}", coord);
                created += 1;
            }
        }

        log::info!("World has {} chunks ({} new)", self.chunks.len(), created);
        created
    }

    /// Rebuild every chunk's mesh, one task per chunk.
    ///
    /// Returns once all tasks have finished, so the meshes are complete
    /// before any of them is finalized.
    pub fn populate_all(&mut self) {
        let field = self.prepare_field();
        let settings = self.config.mesh_settings();
        let start = Instant::now();

        match &self.pool {
            Some(pool) => pool.install(|| rebuild_chunks(&mut self.chunks, field.as_ref(), &settings)),
            None => rebuild_chunks(&mut self.chunks, field.as_ref(), &settings),
        }

        let elapsed = start.elapsed().as_secs_f64();
        log::info!("Meshed {} chunks in {:.3}s ({:.0} chunks/sec)",
            self.chunks.len(), elapsed,
            self.chunks.len() as f64 / elapsed.max(f64::EPSILON));
    }

    /// Hand every chunk's mesh to `consumer` in key order.
    ///
    /// Returns the number of chunks handed over.
    pub fn finalize_all(&self, consumer: &mut dyn MeshConsumer) -> usize {
        let coords = self.coords();
        for coord in &coords {
            if let Some(chunk) = self.chunks.get(coord) {
                Self::hand_over(chunk, consumer);
            }
        }
        coords.len()
    }

    /// Hand one chunk's mesh to `consumer`. False if there is no such chunk.
    pub fn finalize_chunk(&self, coord: ChunkCoord, consumer: &mut dyn MeshConsumer) -> bool {
        match self.chunks.get(&coord) {
            Some(chunk) => {
                Self::hand_over(chunk, consumer);
                true
            }
            None => false,
        }
    }

    fn hand_over(chunk: &Chunk, consumer: &mut dyn MeshConsumer) {
        let upload = chunk.upload();
        log::debug!("Finalizing {}: {} vertices, {} triangles",
            upload.name, upload.vertices.len(), upload.triangle_count());
        consumer.consume(upload);
    }

    /// Build missing chunks, mesh everything and hand it to `consumer`
    pub fn generate(&mut self, consumer: &mut dyn MeshConsumer) {
        self.build_all();
        self.populate_all();
        self.finalize_all(consumer);
        log::info!("{0} x {0} world generated.", self.config.world_extent());
    }

    /// Regenerate with the current config
    pub fn refresh(&mut self, consumer: &mut dyn MeshConsumer) {
        self.generate(consumer);
    }

    /// Regenerate with a fresh random seed, returning it
    pub fn randomise_seed(&mut self, consumer: &mut dyn MeshConsumer) -> u64 {
        self.config.seed = 0;
        self.generate(consumer);
        self.config.seed
    }

    /// Key of the chunk whose footprint holds `point`, whether or not it exists
    pub fn chunk_key_for(&self, point: Vec3) -> ChunkCoord {
        ChunkCoord::from_world_pos(point, self.config.chunk_width)
    }

    /// Volume of the chunk at `coord` under the current config
    pub fn chunk_bounds(&self, coord: ChunkCoord) -> Aabb {
        let (w, h) = (self.config.chunk_width as f32, self.config.chunk_height as f32);
        let origin = coord.world_origin();
        Aabb::new(origin, origin + Vec3::new(w, h, w))
    }

    /// Apply an edit to the chunk holding `point` and rebuild that chunk.
    ///
    /// Runs on the caller's thread. Neighbouring chunks are not rebuilt, even
    /// when the edit sits on a shared face. Returns the chunk key and the
    /// local lattice point written, or None if no chunk holds `point`.
    pub fn route_edit(&mut self, point: Vec3, kind: EditKind) -> Option<(ChunkCoord, IVec3)> {
        let coord = self.chunk_key_for(point);
        if !self.chunks.contains_key(&coord) || !self.chunk_bounds(coord).contains_column_point(point) {
            log::trace!("Edit at {:?} is outside the world", point);
            return None;
        }

        let field = self.prepare_field();
        let settings = self.config.mesh_settings();
        let chunk = self.chunks.get_mut(&coord)?;
        let local = chunk.apply_edit(kind, point, field.as_ref(), &settings);
        log::debug!("{:?} edit in chunk {} at local {}", kind, coord, local);
        Some((coord, local))
    }

    /// Fill terrain at `point`
    pub fn place_solid(&mut self, point: Vec3) -> Option<(ChunkCoord, IVec3)> {
        self.route_edit(point, EditKind::Place)
    }

    /// Carve terrain at `point`
    pub fn remove_solid(&mut self, point: Vec3) -> Option<(ChunkCoord, IVec3)> {
        self.route_edit(point, EditKind::Remove)
    }

    /// Get immutable reference to a chunk by coordinate
    pub fn get_chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Get the number of chunks
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// All chunk keys in ascending order
    pub fn coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<_> = self.chunks.keys().copied().collect();
        coords.sort();
        coords
    }

    /// Iterate over chunks in no particular order
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Volume covered by the configured world square
    pub fn world_bounds(&self) -> Aabb {
        let extent = self.config.world_extent() as f32;
        Aabb::new(
            Vec3::ZERO,
            Vec3::new(extent, self.config.chunk_height as f32, extent),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::MeshCollector;
    use crate::terrain::{FlatGround, NoiseParams, NoiseTerrain};

    fn flat_world(size: u32) -> WorldGrid {
        let config = WorldConfig { world_size_in_chunks: size, seed: 1, ..Default::default() };
        WorldGrid::new(config, TerrainField::custom(FlatGround { height: 4.5 })).unwrap()
    }

    fn noise_world(size: u32, jobs: Option<usize>) -> WorldGrid {
        let config = WorldConfig { world_size_in_chunks: size, seed: 321, jobs, ..Default::default() };
        WorldGrid::with_noise_terrain(config).unwrap()
    }

    #[test]
    fn test_new_world_is_empty() {
        let world = flat_world(2);
        assert_eq!(world.chunk_count(), 0);
    }

    #[test]
    fn test_build_all_lattice() {
        let mut world = flat_world(3);
        assert_eq!(world.build_all(), 9);
        let coords = world.coords();
        assert_eq!(coords.len(), 9);
        assert_eq!(coords[0], ChunkCoord::new(0, 0));
        assert!(coords.contains(&ChunkCoord::new(32, 16)));
        assert!(coords.iter().all(|c| c.x % 16 == 0 && c.z % 16 == 0));
    }

    #[test]
    fn test_build_all_is_idempotent() {
        let mut world = flat_world(2);
        world.build_all();
        world.populate_all();
        let before = world.get_chunk(ChunkCoord::new(16, 16)).unwrap().revision();
        assert_eq!(world.build_all(), 0);
        assert_eq!(world.chunk_count(), 4);
        // Existing chunk kept, not replaced
        assert_eq!(world.get_chunk(ChunkCoord::new(16, 16)).unwrap().revision(), before);
    }

    #[test]
    fn test_build_all_grows_with_config() {
        let mut world = flat_world(2);
        world.build_all();
        let config = WorldConfig { world_size_in_chunks: 3, ..world.config().clone() };
        world.set_config(config).unwrap();
        assert_eq!(world.build_all(), 5);
        assert_eq!(world.chunk_count(), 9);
    }

    #[test]
    fn test_world_points_owned_by_one_chunk() {
        let mut world = flat_world(3);
        world.build_all();
        let bounds = world.world_bounds();
        for i in 0..200 {
            let p = Vec3::new(
                (i as f32 * 7.31) % bounds.max.x,
                (i as f32 * 1.7) % bounds.max.y,
                (i as f32 * 3.97) % bounds.max.z,
            );
            let owners = world
                .chunks()
                .filter(|c| c.world_bounds().contains_column_point(p))
                .count();
            assert_eq!(owners, 1, "point {:?}", p);
            let key = world.chunk_key_for(p);
            assert!(world.chunk_bounds(key).contains_column_point(p));
        }
    }

    #[test]
    fn test_populate_and_finalize() {
        let mut world = flat_world(2);
        let mut collector = MeshCollector::new();
        world.generate(&mut collector);

        assert_eq!(collector.len(), 4);
        for (coord, mesh) in collector.iter() {
            assert_eq!(mesh.indices.len(), 16 * 16 * 2 * 3);
            assert_eq!(mesh.origin, coord.world_origin());
            assert_eq!(mesh.normals.len(), mesh.vertices.len());
            assert_eq!(mesh.uploads, 1);
        }
        assert_eq!(collector.total_triangles(), 4 * 512);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut world = noise_world(3, Some(4));
        world.build_all();
        world.populate_all();

        let field = NoiseTerrain::new(321, NoiseParams::default());
        let settings = world.mesh_settings();
        // Sequential rebuild in reverse key order
        for coord in world.coords().into_iter().rev() {
            let mut chunk = Chunk::new(coord, 16, 20);
            chunk.rebuild(&field, &settings);
            assert_eq!(world.get_chunk(coord).unwrap().mesh(), chunk.mesh(), "chunk {}", coord);
        }
    }

    #[test]
    fn test_global_pool_matches_dedicated_pool() {
        let mut a = noise_world(2, None);
        let mut b = noise_world(2, Some(1));
        a.build_all();
        b.build_all();
        a.populate_all();
        b.populate_all();
        for coord in a.coords() {
            assert_eq!(a.get_chunk(coord).unwrap().mesh(), b.get_chunk(coord).unwrap().mesh());
        }
    }

    #[test]
    fn test_noise_world_resolves_seed_up_front() {
        let config = WorldConfig { world_size_in_chunks: 1, seed: 0, ..Default::default() };
        let world = WorldGrid::with_noise_terrain(config).unwrap();
        let seed = world.config().seed;
        assert_ne!(seed, 0);
        match world.field() {
            TerrainField::Noise(terrain) => assert_eq!(terrain.seed(), seed),
            TerrainField::Custom(_) => panic!("expected noise terrain"),
        }
    }

    #[test]
    fn test_custom_world_resolves_seed_on_populate() {
        let config = WorldConfig { world_size_in_chunks: 1, seed: 0, ..Default::default() };
        let mut world = WorldGrid::new(config, TerrainField::custom(FlatGround { height: 4.5 })).unwrap();
        assert_eq!(world.config().seed, 0);
        world.build_all();
        world.populate_all();
        assert_ne!(world.config().seed, 0);
    }

    #[test]
    fn test_zero_seed_resolved_once() {
        let config = WorldConfig { world_size_in_chunks: 1, seed: 0, ..Default::default() };
        let mut world = WorldGrid::with_noise_terrain(config).unwrap();
        world.build_all();
        world.populate_all();
        let seed = world.config().seed;
        assert_ne!(seed, 0);
        world.populate_all();
        assert_eq!(world.config().seed, seed);
        match world.field() {
            TerrainField::Noise(terrain) => assert_eq!(terrain.seed(), seed),
            TerrainField::Custom(_) => panic!("expected noise terrain"),
        }
    }

    #[test]
    fn test_randomise_seed_changes_seed() {
        let mut world = noise_world(1, None);
        let mut collector = MeshCollector::new();
        world.generate(&mut collector);
        let seed = world.randomise_seed(&mut collector);
        assert_ne!(seed, 0);
        assert_ne!(seed, 321);
        assert_eq!(collector.get(ChunkCoord::new(0, 0)).unwrap().uploads, 2);
    }

    #[test]
    fn test_route_edit_into_owning_chunk() {
        let mut world = flat_world(2);
        world.build_all();
        world.populate_all();

        let (coord, local) = world.place_solid(Vec3::new(20.3, 7.2, 3.5)).unwrap();
        assert_eq!(coord, ChunkCoord::new(16, 0));
        assert_eq!(local, IVec3::new(5, 8, 4));

        let (coord, local) = world.remove_solid(Vec3::new(20.3, 4.2, 3.5)).unwrap();
        assert_eq!(coord, ChunkCoord::new(16, 0));
        assert_eq!(local, IVec3::new(4, 4, 3));
    }

    #[test]
    fn test_route_edit_outside_is_noop() {
        let mut world = flat_world(2);
        world.build_all();
        world.populate_all();
        assert!(world.place_solid(Vec3::new(-1.0, 5.0, 3.0)).is_none());
        assert!(world.remove_solid(Vec3::new(3.0, 5.0, 40.0)).is_none());
        assert!(world.chunks().all(|c| c.overlay().is_empty()));
    }

    #[test]
    fn test_route_edit_above_or_below_is_noop() {
        let mut world = flat_world(2);
        world.build_all();
        world.populate_all();
        let revision = world.get_chunk(ChunkCoord::new(0, 0)).unwrap().revision();

        assert!(world.place_solid(Vec3::new(3.0, 500.0, 3.0)).is_none());
        assert!(world.remove_solid(Vec3::new(3.0, -5.0, 3.0)).is_none());
        assert!(world.place_solid(Vec3::new(3.0, 20.5, 3.0)).is_none());

        let chunk = world.get_chunk(ChunkCoord::new(0, 0)).unwrap();
        assert!(chunk.overlay().is_empty());
        assert_eq!(chunk.revision(), revision);
    }

    #[test]
    fn test_route_edit_on_top_face() {
        let mut world = flat_world(1);
        world.build_all();
        // Far face is sampled, so it is still inside the chunk
        let (coord, local) = world.place_solid(Vec3::new(3.0, 20.0, 3.0)).unwrap();
        assert_eq!(coord, ChunkCoord::new(0, 0));
        assert_eq!(local, IVec3::new(3, 20, 3));
        let (_, local) = world.remove_solid(Vec3::new(3.0, 0.0, 3.0)).unwrap();
        assert_eq!(local, IVec3::new(3, 0, 3));
    }

    #[test]
    fn test_edit_rebuilds_only_owner() {
        let mut world = flat_world(2);
        world.build_all();
        world.populate_all();
        let revisions: Vec<_> = world.coords().iter()
            .map(|&c| (c, world.get_chunk(c).unwrap().revision()))
            .collect();

        // On the shared face x = 16: owned by the chunk at 16
        world.place_solid(Vec3::new(16.0, 7.0, 5.0)).unwrap();
        for (coord, revision) in revisions {
            let now = world.get_chunk(coord).unwrap().revision();
            if coord == ChunkCoord::new(16, 0) {
                assert_eq!(now, revision + 1);
            } else {
                assert_eq!(now, revision, "chunk {}", coord);
            }
        }
    }

    #[test]
    fn test_place_twice_same_mesh() {
        let mut world = noise_world(2, None);
        world.build_all();
        world.populate_all();
        let p = Vec3::new(9.4, 8.8, 22.1);
        let (coord, _) = world.place_solid(p).unwrap();
        let once = world.get_chunk(coord).unwrap().mesh().clone();
        world.place_solid(p).unwrap();
        assert_eq!(world.get_chunk(coord).unwrap().mesh(), &once);
    }

    #[test]
    fn test_finalize_chunk() {
        let mut world = flat_world(1);
        world.build_all();
        world.populate_all();
        let mut collector = MeshCollector::new();
        assert!(world.finalize_chunk(ChunkCoord::new(0, 0), &mut collector));
        assert!(!world.finalize_chunk(ChunkCoord::new(16, 0), &mut collector));
        assert_eq!(collector.len(), 1);
    }

    #[test]
    fn test_set_config_changes_next_rebuild() {
        let mut world = flat_world(1);
        world.build_all();
        world.populate_all();
        let smooth_vertices = world.get_chunk(ChunkCoord::new(0, 0)).unwrap().mesh().vertices().to_vec();
        assert!(smooth_vertices.iter().all(|v| v.y == 4.5));

        let config = WorldConfig { smooth_terrain: false, terrain_surface: 0.3, ..world.config().clone() };
        world.set_config(config).unwrap();
        world.populate_all();
        // Blocky mode ignores densities: midpoint of the crossing edge
        let chunk = world.get_chunk(ChunkCoord::new(0, 0)).unwrap();
        assert!(chunk.mesh().vertices().iter().all(|v| v.y == 4.5));
        assert!(!chunk.mesh().is_empty());
    }
}
