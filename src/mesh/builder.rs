//! Deduplicated triangle mesh storage

use std::collections::HashMap;

use glam::Vec3;

/// Bit pattern of a position, with `-0.0` folded into `0.0` so the key
/// agrees with `==` on every non-NaN input.
type VertexKey = [u32; 3];

fn vertex_key(v: Vec3) -> VertexKey {
    let bits = |c: f32| if c == 0.0 { 0u32 } else { c.to_bits() };
    [bits(v.x), bits(v.y), bits(v.z)]
}

/// Vertex and triangle index lists for one chunk.
///
/// Every position appears at most once in `vertices`; `indices` holds three
/// entries per triangle, each `< vertices.len()`.
#[derive(Clone, Debug, Default)]
pub struct ChunkMesh {
    vertices: Vec<Vec3>,
    indices: Vec<u32>,
    lookup: HashMap<VertexKey, u32>,
}

impl ChunkMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all geometry, keeping allocations for the next rebuild
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.lookup.clear();
    }

    /// Index of `position`, appending it if no equal vertex exists yet.
    pub fn vertex_index(&mut self, position: Vec3) -> u32 {
        if position.is_nan() {
            // NaN never compares equal, so it can never be shared
            return self.append_vertex(position);
        }
        let key = vertex_key(position);
        if let Some(&index) = self.lookup.get(&key) {
            return index;
        }
        let index = self.append_vertex(position);
        self.lookup.insert(key, index);
        index
    }

    fn append_vertex(&mut self, position: Vec3) -> u32 {
        self.vertices.push(position);
        (self.vertices.len() - 1) as u32
    }

    /// Append one triangle corner, deduplicating its position
    pub fn push_corner(&mut self, position: Vec3) {
        let index = self.vertex_index(position);
        self.indices.push(index);
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Raw vertex data for upload (12 bytes per vertex)
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw index data for upload (4 bytes per index)
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Per-vertex normals from area-weighted face normals.
    ///
    /// Faces wind so that normals point from solid towards air. Vertices not
    /// referenced by any triangle get a zero normal.
    pub fn compute_normals(&self) -> Vec<Vec3> {
        let mut normals = vec![Vec3::ZERO; self.vertices.len()];
        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let face = (self.vertices[b] - self.vertices[a])
                .cross(self.vertices[c] - self.vertices[a]);
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }
        for n in &mut normals {
            *n = n.normalize_or_zero();
        }
        normals
    }
}

impl PartialEq for ChunkMesh {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices && self.indices == other.indices
    }
}
