//! Wavefront OBJ export of finalized chunk meshes

use std::fmt::Write as _;
use std::path::Path;

use crate::core::Result;
use super::consumer::{MeshConsumer, MeshUpload};

/// Accumulates chunk meshes into a single OBJ document.
///
/// Each chunk becomes one `o` object with world-space positions. Indices are
/// 1-based and offset by the vertices of the chunks written before it.
#[derive(Debug)]
pub struct ObjExporter {
    out: String,
    vertex_offset: usize,
    objects: usize,
}

impl ObjExporter {
    pub fn new() -> Self {
        Self {
            out: String::from("# terramarch terrain\n"),
            vertex_offset: 0,
            objects: 0,
        }
    }

    pub fn object_count(&self) -> usize {
        self.objects
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_offset
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    /// Write the document to `path`, creating parent directories
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &self.out)?;
        log::info!("Wrote {} chunk objects ({} vertices) to {}",
            self.objects, self.vertex_offset, path.display());
        Ok(())
    }
}

impl Default for ObjExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshConsumer for ObjExporter {
    fn consume(&mut self, upload: MeshUpload<'_>) {
        // fmt::Write into a String cannot fail
        let _ = writeln!(self.out, "o {}", upload.name.replace(' ', "_"));
        for v in upload.vertices {
            let w = *v + upload.origin;
            let _ = writeln!(self.out, "v {} {} {}", w.x, w.y, w.z);
        }
        for n in &upload.normals {
            let _ = writeln!(self.out, "vn {} {} {}", n.x, n.y, n.z);
        }
        for tri in upload.indices.chunks_exact(3) {
            let (a, b, c) = (
                tri[0] as usize + self.vertex_offset + 1,
                tri[1] as usize + self.vertex_offset + 1,
                tri[2] as usize + self.vertex_offset + 1,
            );
            let _ = writeln!(self.out, "f {a}//{a} {b}//{b} {c}//{c}");
        }
        self.vertex_offset += upload.vertices.len();
        self.objects += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxel::chunk::ChunkCoord;
    use glam::Vec3;
    use tempfile::TempDir;

    fn upload<'a>(coord: ChunkCoord, vertices: &'a [Vec3], indices: &'a [u32]) -> MeshUpload<'a> {
        MeshUpload {
            coord,
            name: format!("Chunk {}", coord),
            origin: coord.world_origin(),
            vertices,
            indices,
            normals: vec![Vec3::Y; vertices.len()],
        }
    }

    #[test]
    fn test_offsets_across_objects() {
        let tri = [Vec3::ZERO, Vec3::X, Vec3::Z];
        let mut obj = ObjExporter::new();
        obj.consume(upload(ChunkCoord::new(0, 0), &tri, &[0, 1, 2]));
        obj.consume(upload(ChunkCoord::new(16, 0), &tri, &[0, 1, 2]));

        let text = obj.as_str();
        assert!(text.contains("o Chunk_0,_0"));
        assert!(text.contains("f 1//1 2//2 3//3"));
        assert!(text.contains("f 4//4 5//5 6//6"));
        // Second chunk is translated by its origin
        assert!(text.contains("v 17 0 0"));
        assert_eq!(obj.object_count(), 2);
        assert_eq!(obj.vertex_count(), 6);
    }

    #[test]
    fn test_write_to_creates_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("terrain.obj");
        let mut obj = ObjExporter::new();
        obj.consume(upload(ChunkCoord::new(0, 0), &[Vec3::ZERO, Vec3::X, Vec3::Z], &[0, 1, 2]));
        obj.write_to(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, obj.as_str());
        assert_eq!(written.lines().filter(|l| l.starts_with("v ")).count(), 3);
    }
}
