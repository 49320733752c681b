//! Chunks: fixed-size columns of the world, meshed independently

use std::fmt;

use glam::{IVec3, Vec3};

use crate::math::Aabb;
use crate::mesh::{march_cube, ChunkMesh, MeshSettings, MeshUpload};
use crate::terrain::DensityField;
use super::edit::{EditKind, EditOverlay};

/// Horizontal key of a chunk in world units.
///
/// Keys sit on the lattice of multiples of the chunk width; chunks span the
/// full world height, so there is no vertical component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    /// Create a new chunk coordinate
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Key of the chunk at lattice cell `(cell_x, cell_z)`
    pub fn from_cell(cell_x: i32, cell_z: i32, chunk_width: u32) -> Self {
        let w = chunk_width as i32;
        Self::new(cell_x * w, cell_z * w)
    }

    /// Key of the chunk whose footprint holds world position `pos`
    pub fn from_world_pos(pos: Vec3, chunk_width: u32) -> Self {
        let w = chunk_width as f32;
        Self::new(
            ((pos.x / w).floor() * w) as i32,
            ((pos.z / w).floor() * w) as i32,
        )
    }

    /// World-space origin (minimum corner) of this chunk
    pub fn origin(&self) -> IVec3 {
        IVec3::new(self.x, 0, self.z)
    }

    /// World-space origin as a float vector
    pub fn world_origin(&self) -> Vec3 {
        self.origin().as_vec3()
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.x, self.z)
    }
}

/// Density at chunk-local lattice point `local`: the overlay if it has an
/// entry, otherwise the field at the matching world point.
///
/// Points outside the chunk are valid; cubes on the far faces read one unit
/// past the nominal extent.
pub fn sample_point(overlay: &EditOverlay, field: &dyn DensityField, origin: IVec3, local: IVec3) -> f32 {
    match overlay.density(local) {
        Some(density) => density,
        None => field.sample(local + origin),
    }
}

/// A `width x height x width` block of cubes with its own edits and mesh
pub struct Chunk {
    /// Key of this chunk in the world grid
    pub coord: ChunkCoord,
    width: u32,
    height: u32,
    overlay: EditOverlay,
    mesh: ChunkMesh,
    /// Number of completed rebuilds
    revision: u64,
}

impl Chunk {
    /// Create a new chunk with no edits and no geometry
    pub fn new(coord: ChunkCoord, width: u32, height: u32) -> Self {
        Self {
            coord,
            width,
            height,
            overlay: EditOverlay::new(),
            mesh: ChunkMesh::new(),
            revision: 0,
        }
    }

    /// Display name, e.g. `Chunk 16, 0`
    pub fn name(&self) -> String {
        format!("Chunk {}", self.coord)
    }

    pub fn origin(&self) -> IVec3 {
        self.coord.origin()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn overlay(&self) -> &EditOverlay {
        &self.overlay
    }

    pub fn mesh(&self) -> &ChunkMesh {
        &self.mesh
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// World-space volume covered by this chunk's cubes
    pub fn world_bounds(&self) -> Aabb {
        let origin = self.coord.world_origin();
        let extent = Vec3::new(self.width as f32, self.height as f32, self.width as f32);
        Aabb::new(origin, origin + extent)
    }

    /// Density at local lattice point `local`
    pub fn sample(&self, local: IVec3, field: &dyn DensityField) -> f32 {
        sample_point(&self.overlay, field, self.origin(), local)
    }

    /// Throw away the mesh and march every cube again.
    ///
    /// Dimensions come from `settings`, so a changed world config takes
    /// effect on the next rebuild.
    pub fn rebuild(&mut self, field: &dyn DensityField, settings: &MeshSettings) {
        self.width = settings.width;
        self.height = settings.height;
        self.mesh.clear();

        let origin = self.origin();
        let overlay = &self.overlay;
        let sample = |local: IVec3| sample_point(overlay, field, origin, local);

        let (w, h) = (self.width as i32, self.height as i32);
        for x in 0..w {
            for y in 0..h {
                for z in 0..w {
                    march_cube(IVec3::new(x, y, z), &sample, settings, &mut self.mesh);
                }
            }
        }
        self.revision += 1;
    }

    /// Write an edit at `world_point` and rebuild this chunk.
    ///
    /// Returns the local lattice point that was overridden.
    pub fn apply_edit(
        &mut self,
        kind: EditKind,
        world_point: Vec3,
        field: &dyn DensityField,
        settings: &MeshSettings,
    ) -> IVec3 {
        let local = kind.snap(world_point) - self.origin();
        self.overlay.set(local, kind.value());
        self.rebuild(field, settings);
        local
    }

    /// Fill terrain at `world_point` (rounded up) and rebuild
    pub fn place_solid(&mut self, world_point: Vec3, field: &dyn DensityField, settings: &MeshSettings) -> IVec3 {
        self.apply_edit(EditKind::Place, world_point, field, settings)
    }

    /// Carve terrain at `world_point` (rounded down) and rebuild
    pub fn remove_solid(&mut self, world_point: Vec3, field: &dyn DensityField, settings: &MeshSettings) -> IVec3 {
        self.apply_edit(EditKind::Remove, world_point, field, settings)
    }

    /// Borrow the current mesh for handoff, with freshly computed normals
    pub fn upload(&self) -> MeshUpload<'_> {
        MeshUpload {
            coord: self.coord,
            name: self.name(),
            origin: self.coord.world_origin(),
            vertices: self.mesh.vertices(),
            indices: self.mesh.indices(),
            normals: self.mesh.compute_normals(),
        }
    }
}
