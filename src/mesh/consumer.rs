//! Mesh handoff to renderers and colliders

use std::collections::BTreeMap;

use glam::Vec3;

use crate::voxel::chunk::ChunkCoord;

/// One finalized chunk mesh, borrowed from its chunk for the duration of
/// [`MeshConsumer::consume`].
#[derive(Debug)]
pub struct MeshUpload<'a> {
    pub coord: ChunkCoord,
    /// Display name, e.g. `Chunk 16, 32`
    pub name: String,
    /// World position of the chunk's local origin
    pub origin: Vec3,
    /// Chunk-local vertex positions
    pub vertices: &'a [Vec3],
    /// Three indices per triangle
    pub indices: &'a [u32],
    /// Recomputed normals, one per vertex
    pub normals: Vec<Vec3>,
}

impl MeshUpload<'_> {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Receives finished chunk meshes on the thread that owns the world.
pub trait MeshConsumer {
    fn consume(&mut self, upload: MeshUpload<'_>);
}

/// Owned copy of an uploaded mesh
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollectedMesh {
    pub name: String,
    pub origin: Vec3,
    pub vertices: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub normals: Vec<Vec3>,
    /// How many times this chunk has been handed over
    pub uploads: u32,
}

/// Keeps the latest mesh of every chunk in memory
#[derive(Debug, Default)]
pub struct MeshCollector {
    meshes: BTreeMap<ChunkCoord, CollectedMesh>,
}

impl MeshCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, coord: ChunkCoord) -> Option<&CollectedMesh> {
        self.meshes.get(&coord)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ChunkCoord, &CollectedMesh)> {
        self.meshes.iter()
    }

    pub fn total_vertices(&self) -> usize {
        self.meshes.values().map(|m| m.vertices.len()).sum()
    }

    pub fn total_triangles(&self) -> usize {
        self.meshes.values().map(|m| m.indices.len() / 3).sum()
    }
}

impl MeshConsumer for MeshCollector {
    fn consume(&mut self, upload: MeshUpload<'_>) {
        let entry = self.meshes.entry(upload.coord).or_default();
        entry.name = upload.name;
        entry.origin = upload.origin;
        entry.vertices = upload.vertices.to_vec();
        entry.indices = upload.indices.to_vec();
        entry.normals = upload.normals;
        entry.uploads += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload<'a>(coord: ChunkCoord, vertices: &'a [Vec3], indices: &'a [u32]) -> MeshUpload<'a> {
        MeshUpload {
            coord,
            name: format!("Chunk {}", coord),
            origin: coord.world_origin(),
            vertices,
            indices,
            normals: vec![Vec3::Z; vertices.len()],
        }
    }

    #[test]
    fn test_collector_keeps_latest() {
        let mut collector = MeshCollector::new();
        let coord = ChunkCoord::new(16, 0);
        let tri = [Vec3::ZERO, Vec3::X, Vec3::Y];

        collector.consume(upload(coord, &tri, &[0, 1, 2]));
        collector.consume(upload(coord, &tri[..0], &[]));

        let mesh = collector.get(coord).unwrap();
        assert_eq!(mesh.uploads, 2);
        assert!(mesh.vertices.is_empty());
        assert_eq!(mesh.name, "Chunk 16, 0");
        assert_eq!(mesh.origin, Vec3::new(16.0, 0.0, 0.0));
        assert_eq!(collector.len(), 1);
    }

    #[test]
    fn test_collector_totals() {
        let mut collector = MeshCollector::new();
        let tri = [Vec3::ZERO, Vec3::X, Vec3::Y];
        collector.consume(upload(ChunkCoord::new(0, 0), &tri, &[0, 1, 2]));
        collector.consume(upload(ChunkCoord::new(0, 16), &tri, &[0, 1, 2, 2, 1, 0]));
        assert_eq!(collector.total_vertices(), 6);
        assert_eq!(collector.total_triangles(), 3);
    }
}
