//! CPU-side mesh representation used by loaders.

use bytemuck::{Pod, Zeroable};

/// Interleaved vertex with position/normal/uv. Values are in object space.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Non-indexed triangle soup: three parallel attribute arrays, one entry per
/// triangle corner. Corners shared between faces are duplicated.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub normals: Vec<[f32; 3]>,
}

impl MeshData {
    /// Number of corners (vertices to draw).
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.len() / 3
    }

    /// Returns `true` if the arrays line up and form whole triangles.
    pub fn is_valid(&self) -> bool {
        self.uvs.len() == self.len() && self.normals.len() == self.len() && self.len() % 3 == 0
    }

    pub fn vertex(&self, i: usize) -> Option<MeshVertex> {
        Some(MeshVertex {
            position: *self.positions.get(i)?,
            normal: *self.normals.get(i)?,
            uv: *self.uvs.get(i)?,
        })
    }

    /// Single-buffer layout for back ends that prefer one vertex stream.
    pub fn interleaved(&self) -> Vec<MeshVertex> {
        (0..self.len()).filter_map(|i| self.vertex(i)).collect()
    }

    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn uv_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }

    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_triangle() -> MeshData {
        MeshData {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            uvs: vec![[0.0, 0.0], [1.0, 0.0], [0.0, -1.0]],
            normals: vec![[0.0, 0.0, 1.0]; 3],
        }
    }

    #[test]
    fn mesh_data_validity() {
        let mut data = one_triangle();
        assert!(data.is_valid());
        assert_eq!(data.triangle_count(), 1);
        data.uvs.pop();
        assert!(!data.is_valid());
    }

    #[test]
    fn byte_views_are_tightly_packed() {
        let data = one_triangle();
        assert_eq!(data.position_bytes().len(), 3 * 3 * 4);
        assert_eq!(data.uv_bytes().len(), 3 * 2 * 4);
        assert_eq!(data.normal_bytes().len(), 3 * 3 * 4);
        assert_eq!(&data.position_bytes()[12..16], &1.0f32.to_ne_bytes());
    }

    #[test]
    fn interleaved_matches_parallel_arrays() {
        let data = one_triangle();
        let verts = data.interleaved();
        assert_eq!(verts.len(), 3);
        assert_eq!(verts[2].position, [0.0, 1.0, 0.0]);
        assert_eq!(verts[2].uv, [0.0, -1.0]);
        assert_eq!(std::mem::size_of::<MeshVertex>(), 32);
        assert_eq!(bytemuck::cast_slice::<MeshVertex, u8>(&verts).len(), 96);
    }
}
