//! Per-cube Marching Cubes triangulation

use glam::{IVec3, Vec3};

use super::builder::ChunkMesh;
use super::tables::{self, CORNER_TABLE};

/// Knobs for turning densities into triangles
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshSettings {
    /// Cubes along X and Z
    pub width: u32,
    /// Cubes along Y
    pub height: u32,
    /// Densities above this are air
    pub threshold: f32,
    /// Interpolate along edges; otherwise use edge midpoints
    pub smooth: bool,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            width: 16,
            height: 20,
            threshold: 0.5,
            smooth: true,
        }
    }
}

/// Pack "corner above threshold" bits into a table index
pub fn cube_configuration(cube: &[f32; 8], threshold: f32) -> u8 {
    let mut config = 0u8;
    for (i, &value) in cube.iter().enumerate() {
        if value > threshold {
            config |= 1 << i;
        }
    }
    config
}

/// Surface crossing between `v1` and `v2` given their densities.
///
/// A flat edge (`d1 == d2`) has no defined crossing and falls back to the
/// fixed fraction `threshold` along the edge.
pub fn interpolate_edge(v1: Vec3, v2: Vec3, d1: f32, d2: f32, threshold: f32) -> Vec3 {
    let difference = d2 - d1;
    let t = if difference == 0.0 {
        threshold
    } else {
        (threshold - d1) / difference
    };
    v1 + (v2 - v1) * t
}

/// Triangulate the unit cube anchored at local lattice point `anchor`.
///
/// `sample` returns the density at a local lattice point. Returns the
/// configuration index so callers can gather statistics.
pub fn march_cube<S>(anchor: IVec3, sample: &S, settings: &MeshSettings, mesh: &mut ChunkMesh) -> u8
where
    S: Fn(IVec3) -> f32 + ?Sized,
{
    let mut cube = [0.0f32; 8];
    for (i, offset) in CORNER_TABLE.iter().enumerate() {
        cube[i] = sample(anchor + *offset);
    }

    let config = cube_configuration(&cube, settings.threshold);
    if tables::is_trivial(config) {
        return config;
    }

    let base = anchor.as_vec3();
    for edge in tables::triangle_edges(config) {
        let (a, b) = tables::edge_corners(edge);
        let v1 = base + CORNER_TABLE[a].as_vec3();
        let v2 = base + CORNER_TABLE[b].as_vec3();

        let position = if settings.smooth {
            interpolate_edge(v1, v2, cube[a], cube[b], settings.threshold)
        } else {
            (v1 + v2) / 2.0
        };
        mesh.push_corner(position);
    }
    config
}
