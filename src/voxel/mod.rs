//! Chunked voxel world: chunks, edits, and the grid that owns them

pub mod chunk;
pub mod edit;
pub mod world;

pub use chunk::{Chunk, ChunkCoord};
pub use edit::{EditKind, EditOverlay};
pub use world::WorldGrid;
