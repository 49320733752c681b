//! World configuration: load, save and range checks.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::mesh::MeshSettings;
use crate::terrain::NoiseParams;

/// Configuration for building and meshing a world.
///
/// `WorldGrid` takes any values as given; [`WorldConfig::validate`] is the
/// place that enforces the documented ranges.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Chunks along each horizontal axis
    pub world_size_in_chunks: u32,
    /// Cubes per chunk along X and Z
    pub chunk_width: u32,
    /// Cubes per chunk along Y
    pub chunk_height: u32,
    /// Density above which a point is air (0-1)
    pub terrain_surface: f32,
    /// Interpolated surface when true, edge midpoints when false
    pub smooth_terrain: bool,
    /// Generation seed; 0 picks a random one at build time
    pub seed: u64,
    /// Noise terrain parameters
    pub noise: NoiseParams,
    /// Worker threads for bulk meshing; None uses the shared rayon pool
    pub jobs: Option<usize>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            world_size_in_chunks: 4,
            chunk_width: 16,
            chunk_height: 20,
            terrain_surface: 0.5,
            smooth_terrain: true,
            seed: 0,
            noise: NoiseParams::default(),
            jobs: None,
        }
    }
}

fn check(ok: bool, message: impl FnOnce() -> String) -> Result<()> {
    if ok { Ok(()) } else { Err(Error::Config(message())) }
}

impl WorldConfig {
    /// Meshing parameters derived from this config
    pub fn mesh_settings(&self) -> MeshSettings {
        MeshSettings {
            width: self.chunk_width,
            height: self.chunk_height,
            threshold: self.terrain_surface,
            smooth: self.smooth_terrain,
        }
    }

    /// Side length of the world in world units
    pub fn world_extent(&self) -> u32 {
        self.world_size_in_chunks * self.chunk_width
    }

    /// Check every field against its documented range
    pub fn validate(&self) -> Result<()> {
        check(self.world_size_in_chunks >= 1, || {
            format!("world_size_in_chunks must be >= 1, got {}", self.world_size_in_chunks)
        })?;
        check(self.chunk_width >= 16, || {
            format!("chunk_width must be >= 16, got {}", self.chunk_width)
        })?;
        check(self.chunk_height >= 20, || {
            format!("chunk_height must be >= 20, got {}", self.chunk_height)
        })?;
        check((0.0..=1.0).contains(&self.terrain_surface), || {
            format!("terrain_surface must be in [0, 1], got {}", self.terrain_surface)
        })?;
        check(self.jobs != Some(0), || "jobs must be >= 1 when set".to_string())?;

        let n = &self.noise;
        check((0.1..=1.5).contains(&n.noise_scale), || {
            format!("noise.noise_scale must be in [0.1, 1.5], got {}", n.noise_scale)
        })?;
        check((2..=8).contains(&n.octaves), || {
            format!("noise.octaves must be in [2, 8], got {}", n.octaves)
        })?;
        check((1.0..=4.0).contains(&n.weight_multiplier), || {
            format!("noise.weight_multiplier must be in [1, 4], got {}", n.weight_multiplier)
        })?;
        check((1.0..=2.5).contains(&n.lacunarity), || {
            format!("noise.lacunarity must be in [1, 2.5], got {}", n.lacunarity)
        })?;
        check((0.5..=1.5).contains(&n.persistence), || {
            format!("noise.persistence must be in [0.5, 1.5], got {}", n.persistence)
        })?;
        check(n.noise_weight >= 0.5, || {
            format!("noise.noise_weight must be >= 0.5, got {}", n.noise_weight)
        })?;
        check(n.floor_offset.is_finite(), || "noise.floor_offset must be finite".to_string())?;
        Ok(())
    }

    /// Load and validate a JSON config
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: WorldConfig = serde_json::from_str(&json)?;
        if let Err(e) = config.validate() {
            log::warn!("Rejected config {}: {}", path.display(), e);
            return Err(e);
        }
        Ok(config)
    }

    /// Save as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }
}
