//! Axis-aligned bounding box

use crate::core::types::Vec3;

/// Axis-aligned bounding box defined by min and max corners
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create AABB from min and max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Check if point is inside a chunk column.
    ///
    /// X and Z exclude the max face so adjacent columns tile the plane and
    /// every point lands in exactly one of them. Y includes both faces, since
    /// the top lattice layer is sampled.
    pub fn contains_column_point(&self, p: Vec3) -> bool {
        p.x >= self.min.x && p.x < self.max.x &&
        p.z >= self.min.z && p.z < self.max.z &&
        p.y >= self.min.y && p.y <= self.max.y
    }
}
