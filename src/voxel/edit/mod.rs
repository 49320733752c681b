//! Terrain edits: a per-chunk overlay of density overrides.
//!
//! Edits never touch the underlying field. Each chunk keeps a sparse map of
//! overridden lattice points that wins over the field when sampling.

pub mod overlay;

pub use overlay::{EditOverlay, EMPTY, SOLID};

use glam::{IVec3, Vec3};

/// The two edit tools
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EditKind {
    /// Fill the lattice point with solid terrain
    Place,
    /// Carve the lattice point out
    Remove,
}

impl EditKind {
    /// Override byte written into the overlay
    pub fn value(self) -> u8 {
        match self {
            EditKind::Place => SOLID,
            EditKind::Remove => EMPTY,
        }
    }

    /// Snap a world point onto the lattice.
    ///
    /// Placing rounds up and removing rounds down on every axis, so the two
    /// tools aimed at the same spot on a face land on opposite sides of it.
    pub fn snap(self, point: Vec3) -> IVec3 {
        match self {
            EditKind::Place => point.ceil().as_ivec3(),
            EditKind::Remove => point.floor().as_ivec3(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_asymmetry() {
        let p = Vec3::new(1.4, 2.1, 3.9);
        assert_eq!(EditKind::Place.snap(p), IVec3::new(2, 3, 4));
        assert_eq!(EditKind::Remove.snap(p), IVec3::new(1, 2, 3));
    }

    #[test]
    fn test_snap_negative_and_exact() {
        let p = Vec3::new(-0.5, 4.0, -3.2);
        assert_eq!(EditKind::Place.snap(p), IVec3::new(0, 4, -3));
        assert_eq!(EditKind::Remove.snap(p), IVec3::new(-1, 4, -4));
    }

    #[test]
    fn test_values() {
        assert_eq!(EditKind::Place.value(), 255);
        assert_eq!(EditKind::Remove.value(), 0);
    }
}
