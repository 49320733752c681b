//! Surface extraction: lookup tables, cube marching, mesh storage and handoff

pub mod tables;
pub mod marching;
pub mod builder;
pub mod consumer;
pub mod obj;

pub use builder::ChunkMesh;
pub use marching::{march_cube, MeshSettings};
pub use consumer::{CollectedMesh, MeshCollector, MeshConsumer, MeshUpload};
pub use obj::ObjExporter;
