//! Noise-based procedural density field

use glam::IVec3;
use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use super::density::DensityField;

/// Vertical distance over which density ramps from solid to air.
const SURFACE_FALLOFF: f64 = 4.0;

/// Base sampling frequency at `noise_scale == 1.0`.
const BASE_FREQUENCY: f64 = 0.02;

/// Parameters controlling the terrain noise
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    pub noise_scale: f32,       // How often the height changes (0.1 - 1.5)
    pub octaves: u32,           // Detail layers (2 - 8)
    pub weight_multiplier: f32, // How big the details are (1 - 4)
    pub lacunarity: f32,        // How aggressive the details are (1 - 2.5)
    pub persistence: f32,       // How filled the terrain is (0.5 - 1.5)
    pub noise_weight: f32,      // Difference between highs and lows (>= 0.5)
    pub floor_offset: f32,      // Height of the floor (negated)
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            noise_scale: 1.0,
            octaves: 5,
            weight_multiplier: 3.0,
            lacunarity: 2.0,
            persistence: 0.8,
            noise_weight: 6.0,
            floor_offset: -2.0,
        }
    }
}

/// Ridged multi-octave Perlin terrain.
///
/// Samples are in (0, 1): 0.5 at the ground surface, rising towards 1 in
/// open air and falling towards 0 underground.
pub struct NoiseTerrain {
    seed: u64,
    params: NoiseParams,
    perlin: Perlin,
}

impl NoiseTerrain {
    /// Create a new terrain field for `seed`
    pub fn new(seed: u64, params: NoiseParams) -> Self {
        let folded = (seed ^ (seed >> 32)) as u32;
        Self {
            seed,
            params,
            perlin: Perlin::new(folded),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn params(&self) -> &NoiseParams {
        &self.params
    }

    /// Ridged relief at a world position, >= 0
    pub fn relief(&self, x: f64, y: f64, z: f64) -> f64 {
        let p = &self.params;
        let mut frequency = BASE_FREQUENCY * p.noise_scale as f64;
        let mut amplitude = 1.0;
        let mut weight = 1.0;
        let mut total = 0.0;

        for octave in 0..p.octaves {
            // Shift each octave so lattice zeros don't line up
            let shift = 0.5 + octave as f64 * 31.7;
            let n = self.perlin.get([
                x * frequency + shift,
                y * frequency + shift,
                z * frequency + shift,
            ]);
            let mut v = 1.0 - n.abs();
            v = v * v * weight;
            weight = (v * p.weight_multiplier as f64).clamp(0.0, 1.0);

            total += v * amplitude;
            amplitude *= p.persistence as f64;
            frequency *= p.lacunarity as f64;
        }

        total
    }

    /// Signed distance-like air value: positive above ground, negative below
    pub fn air_distance(&self, pos: IVec3) -> f64 {
        let (x, y, z) = (pos.x as f64, pos.y as f64, pos.z as f64);
        (y + self.params.floor_offset as f64)
            - self.relief(x, y, z) * self.params.noise_weight as f64
    }
}

impl DensityField for NoiseTerrain {
    fn sample(&self, pos: IVec3) -> f32 {
        let air = self.air_distance(pos);
        (0.5 + 0.5 * (air / SURFACE_FALLOFF).tanh()) as f32
    }
}
