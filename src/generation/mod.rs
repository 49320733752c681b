//! World generation settings and seeding

pub mod config;

pub use config::WorldConfig;

use rand::Rng;

/// Resolve a configured seed: non-zero seeds pass through, 0 draws a fresh
/// random non-zero seed.
pub fn resolve_seed(seed: u64) -> u64 {
    if seed != 0 {
        return seed;
    }
    let seed = rand::thread_rng().gen_range(1..=i32::MAX as u64);
    log::info!("Picked random seed {}", seed);
    seed
}
