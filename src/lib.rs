//! Terramarch - chunked Marching Cubes terrain
//!
//! A world is a square of chunks laid out on the horizontal plane. Each chunk
//! samples a scalar density field on its lattice, marches every cube through
//! the classic 256-case table, and hands the resulting triangle mesh to a
//! [`mesh::MeshConsumer`]. Edits override single lattice points and rebuild
//! the chunk that owns them.

pub mod core;
pub mod math;
pub mod terrain;
pub mod mesh;
pub mod voxel;
pub mod generation;

pub use crate::core::{Error, Result};
pub use generation::WorldConfig;
pub use mesh::{ChunkMesh, MeshConsumer, MeshSettings, MeshUpload};
pub use terrain::{DensityField, TerrainField};
pub use voxel::{ChunkCoord, EditKind, WorldGrid};
