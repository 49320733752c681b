//! Density field sampling contract

use glam::IVec3;

/// A scalar field over integer world positions.
///
/// Values above the surface threshold are air, values at or below it are
/// solid. Implementations must be pure: the same position always yields the
/// same value, and any position is valid (the field has no bounds).
pub trait DensityField: Send + Sync {
    /// Density at world lattice position `pos`
    fn sample(&self, pos: IVec3) -> f32;
}

impl<F> DensityField for F
where
    F: Fn(IVec3) -> f32 + Send + Sync,
{
    fn sample(&self, pos: IVec3) -> f32 {
        self(pos)
    }
}

/// Flat ground: solid below `height`, air above, with a linear ramp of one
/// unit so smooth meshing has something to interpolate.
#[derive(Clone, Copy, Debug)]
pub struct FlatGround {
    pub height: f32,
}

impl DensityField for FlatGround {
    fn sample(&self, pos: IVec3) -> f32 {
        (0.5 + (pos.y as f32 - self.height) * 0.5).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_field() {
        let field = |p: IVec3| p.x as f32;
        assert_eq!(field.sample(IVec3::new(3, 0, 0)), 3.0);
    }

    #[test]
    fn test_flat_ground_crosses_half_at_height() {
        let ground = FlatGround { height: 4.0 };
        assert_eq!(ground.sample(IVec3::new(0, 4, 0)), 0.5);
        assert!(ground.sample(IVec3::new(0, 2, 0)) < 0.5);
        assert!(ground.sample(IVec3::new(0, 6, 0)) > 0.5);
        assert_eq!(ground.sample(IVec3::new(7, 5, -3)), ground.sample(IVec3::new(0, 5, 0)));
    }

    #[test]
    fn test_dyn_field() {
        let field: &dyn DensityField = &FlatGround { height: 0.0 };
        assert_eq!(field.sample(IVec3::new(0, -10, 0)), 0.0);
        assert_eq!(field.sample(IVec3::new(0, 10, 0)), 1.0);
    }
}
