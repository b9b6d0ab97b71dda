//! Cube face identification and per-face tangent frames.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// One of the six faces of the cube that is inflated into a sphere.
///
/// Faces are named after the direction of their outward normal
/// (`Up` is +Y, `Forward` is +Z).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CubeFace {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
    Forward = 4,
    Back = 5,
}

impl CubeFace {
    /// All six faces in build order.
    pub const ALL: [CubeFace; 6] = [
        CubeFace::Up,
        CubeFace::Down,
        CubeFace::Left,
        CubeFace::Right,
        CubeFace::Forward,
        CubeFace::Back,
    ];

    /// Returns the face index (0-5).
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Creates a face from an index (0-5).
    pub const fn from_index(index: usize) -> Option<CubeFace> {
        match index {
            0 => Some(CubeFace::Up),
            1 => Some(CubeFace::Down),
            2 => Some(CubeFace::Left),
            3 => Some(CubeFace::Right),
            4 => Some(CubeFace::Forward),
            5 => Some(CubeFace::Back),
            _ => None,
        }
    }

    /// Outward unit normal of the face.
    pub const fn local_up(self) -> Vec3 {
        match self {
            CubeFace::Up => Vec3::Y,
            CubeFace::Down => Vec3::NEG_Y,
            CubeFace::Left => Vec3::NEG_X,
            CubeFace::Right => Vec3::X,
            CubeFace::Forward => Vec3::Z,
            CubeFace::Back => Vec3::NEG_Z,
        }
    }

    /// First in-plane axis: the components of `local_up` rotated by one slot.
    pub fn axis_a(self) -> Vec3 {
        let up = self.local_up();
        Vec3::new(up.y, up.z, up.x)
    }

    /// Second in-plane axis, `local_up × axis_a`.
    pub fn axis_b(self) -> Vec3 {
        self.local_up().cross(self.axis_a())
    }

    /// Returns a short name for the face, used in export file names.
    pub const fn short_name(self) -> &'static str {
        match self {
            CubeFace::Up => "up",
            CubeFace::Down => "down",
            CubeFace::Left => "left",
            CubeFace::Right => "right",
            CubeFace::Forward => "forward",
            CubeFace::Back => "back",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_faces_indexed_in_order() {
        for (i, face) in CubeFace::ALL.iter().enumerate() {
            assert_eq!(face.index(), i);
            assert_eq!(CubeFace::from_index(i), Some(*face));
        }
        assert!(CubeFace::from_index(6).is_none());
    }

    #[test]
    fn test_axes_form_orthonormal_frame() {
        for face in CubeFace::ALL {
            let up = face.local_up();
            let a = face.axis_a();
            let b = face.axis_b();

            assert!((a.length() - 1.0).abs() < 1e-6);
            assert!((b.length() - 1.0).abs() < 1e-6);
            assert!(up.dot(a).abs() < 1e-6, "{:?}: axis_a not orthogonal", face);
            assert!(up.dot(b).abs() < 1e-6, "{:?}: axis_b not orthogonal", face);
            assert!(a.dot(b).abs() < 1e-6, "{:?}: axes not orthogonal", face);
        }
    }

    #[test]
    fn test_normals_are_distinct() {
        for (i, a) in CubeFace::ALL.iter().enumerate() {
            for b in &CubeFace::ALL[i + 1..] {
                assert_ne!(a.local_up(), b.local_up());
            }
        }
    }

    #[test]
    fn test_short_names() {
        assert_eq!(CubeFace::Up.short_name(), "up");
        assert_eq!(CubeFace::Back.short_name(), "back");
    }
}
