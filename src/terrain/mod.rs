//! Density fields the mesher samples

pub mod density;
pub mod generator;

pub use density::{DensityField, FlatGround};
pub use generator::{NoiseParams, NoiseTerrain};

use std::sync::Arc;

/// The field a world samples: built-in noise terrain, or one supplied by the
/// caller.
#[derive(Clone)]
pub enum TerrainField {
    /// Seeded noise terrain, rebuilt when the seed or params change
    Noise(Arc<NoiseTerrain>),
    /// Caller-owned field, used as-is
    Custom(Arc<dyn DensityField>),
}

impl TerrainField {
    /// Noise terrain for a resolved (non-zero) seed
    pub fn noise(seed: u64, params: NoiseParams) -> Self {
        Self::Noise(Arc::new(NoiseTerrain::new(seed, params)))
    }

    pub fn custom(field: impl DensityField + 'static) -> Self {
        Self::Custom(Arc::new(field))
    }

    /// Shared handle to the sampler
    pub fn sampler(&self) -> Arc<dyn DensityField> {
        match self {
            Self::Noise(terrain) => terrain.clone() as Arc<dyn DensityField>,
            Self::Custom(field) => field.clone(),
        }
    }

    /// Rebuild noise terrain if `seed`/`params` no longer match.
    ///
    /// Returns true when the field changed. Custom fields never change.
    pub fn sync(&mut self, seed: u64, params: &NoiseParams) -> bool {
        match self {
            Self::Noise(terrain) if terrain.seed() != seed || terrain.params() != params => {
                *terrain = Arc::new(NoiseTerrain::new(seed, params.clone()));
                true
            }
            _ => false,
        }
    }
}

impl std::fmt::Debug for TerrainField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Noise(terrain) => f.debug_tuple("Noise").field(&terrain.seed()).finish(),
            Self::Custom(_) => f.write_str("Custom"),
        }
    }
}
