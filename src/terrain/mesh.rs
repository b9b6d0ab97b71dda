//! Indexed triangle meshes handed to the renderer.

use glam::{Vec3, Vec4};

/// Vertex positions, per-vertex RGBA colors and a triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vec3>,
    pub colors: Vec<Vec4>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// True when every index addresses an existing vertex and colors match vertices.
    pub fn is_consistent(&self) -> bool {
        let n = self.vertices.len();
        self.colors.len() == n
            && self.indices.len() % 3 == 0
            && self.indices.iter().all(|&i| (i as usize) < n)
    }

    /// Smallest and largest distance of any vertex from the origin.
    pub fn radius_range(&self) -> (f32, f32) {
        self.vertices.iter().fold((f32::MAX, f32::MIN), |(lo, hi), v| {
            let r = v.length();
            (lo.min(r), hi.max(r))
        })
    }

    /// Area-weighted vertex normals.
    ///
    /// Faces are not welded, so normals along face seams only see one side.
    pub fn normals(&self) -> Vec<Vec3> {
        let mut normals = vec![Vec3::ZERO; self.vertices.len()];
        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let n = (self.vertices[b] - self.vertices[a]).cross(self.vertices[c] - self.vertices[a]);
            normals[a] += n;
            normals[b] += n;
            normals[c] += n;
        }
        for (n, v) in normals.iter_mut().zip(&self.vertices) {
            *n = n.try_normalize().unwrap_or_else(|| v.normalize_or_zero());
        }
        normals
    }

    /// Raw little-endian vertex positions, three `f32` per vertex.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw little-endian vertex colors, four `f32` per vertex.
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Raw `u32` triangle indices.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> MeshData {
        MeshData {
            vertices: vec![
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(1.0, 0.0, 1.0),
                Vec3::new(0.0, 1.0, 1.0),
                Vec3::new(1.0, 1.0, 1.0),
            ],
            colors: vec![Vec4::ONE; 4],
            indices: vec![0, 3, 2, 0, 1, 3],
        }
    }

    #[test]
    fn test_counts_and_consistency() {
        let mesh = quad();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.is_consistent());

        let mut broken = quad();
        broken.indices.push(9);
        assert!(!broken.is_consistent());
    }

    #[test]
    fn test_normals_follow_winding() {
        let normals = quad().normals();
        for n in normals {
            assert!((n - Vec3::Z).length() < 1e-6, "unexpected normal {:?}", n);
        }
    }

    #[test]
    fn test_byte_views() {
        let mesh = quad();
        assert_eq!(mesh.position_bytes().len(), 4 * 12);
        assert_eq!(mesh.color_bytes().len(), 4 * 16);
        assert_eq!(mesh.index_bytes().len(), 6 * 4);
    }

    #[test]
    fn test_radius_range() {
        let (lo, hi) = quad().radius_range();
        assert_eq!(lo, 1.0);
        assert!((hi - 3.0f32.sqrt()).abs() < 1e-6);
    }
}
