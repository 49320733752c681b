//! Edit overlay - sparse density overrides for one chunk.

use std::collections::HashMap;

use glam::IVec3;

/// Override byte for fully solid terrain
pub const SOLID: u8 = u8::MAX;
/// Override byte for open air
pub const EMPTY: u8 = u8::MIN;

/// Map an override byte onto the density scale (higher = more air).
///
/// `SOLID` becomes 0.0 and `EMPTY` becomes 1.0, the two ends of the field's
/// range.
pub fn byte_to_density(value: u8) -> f32 {
    1.0 - value as f32 / u8::MAX as f32
}

/// Overrides keyed by chunk-local lattice position.
///
/// Entries are only ever added or overwritten, never removed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditOverlay {
    edits: HashMap<IVec3, u8>,
}

impl EditOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the override at `local`, returning the previous one
    pub fn set(&mut self, local: IVec3, value: u8) -> Option<u8> {
        self.edits.insert(local, value)
    }

    /// Raw override byte at `local`
    pub fn get(&self, local: IVec3) -> Option<u8> {
        self.edits.get(&local).copied()
    }

    /// Override at `local` already mapped to a density
    pub fn density(&self, local: IVec3) -> Option<f32> {
        self.get(local).map(byte_to_density)
    }

    /// Number of overridden points
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&IVec3, &u8)> {
        self.edits.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_to_density_extremes() {
        assert_eq!(byte_to_density(SOLID), 0.0);
        assert_eq!(byte_to_density(EMPTY), 1.0);
    }

    #[test]
    fn test_set_and_get() {
        let mut overlay = EditOverlay::new();
        let pos = IVec3::new(2, 3, 4);
        assert_eq!(overlay.get(pos), None);
        assert_eq!(overlay.set(pos, SOLID), None);
        assert_eq!(overlay.get(pos), Some(SOLID));
        assert_eq!(overlay.density(pos), Some(0.0));
    }

    #[test]
    fn test_latest_write_wins() {
        let mut overlay = EditOverlay::new();
        let pos = IVec3::new(-1, 0, 17);
        overlay.set(pos, SOLID);
        assert_eq!(overlay.set(pos, EMPTY), Some(SOLID));
        assert_eq!(overlay.density(pos), Some(1.0));
        assert_eq!(overlay.len(), 1);
    }

    #[test]
    fn test_never_pruned() {
        let mut overlay = EditOverlay::new();
        for i in 0..10 {
            overlay.set(IVec3::new(i, 0, 0), SOLID);
            overlay.set(IVec3::new(i, 0, 0), EMPTY);
        }
        assert_eq!(overlay.len(), 10);
        assert!(overlay.iter().all(|(_, &v)| v == EMPTY));
    }
}
