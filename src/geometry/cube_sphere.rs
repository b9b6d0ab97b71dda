//! Grid layout of a cube face and its projection onto the unit sphere.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::face::CubeFace;

/// Smallest grid side length that still yields one quad.
pub const MIN_RESOLUTION: u32 = 2;
/// Largest grid side length accepted for a single face.
pub const MAX_RESOLUTION: u32 = 256;

/// How points on the cube surface are pushed onto the unit sphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CubeProjection {
    /// Plain vector normalization.
    #[default]
    Normalized,
    /// Analytic spherification. Spreads vertices more evenly towards the cube corners.
    Spherified,
}

impl CubeProjection {
    /// Projects a point on the surface of the `[-1, 1]` cube onto the unit sphere.
    pub fn project(self, cube_point: Vec3) -> Vec3 {
        match self {
            CubeProjection::Normalized => cube_point.normalize(),
            CubeProjection::Spherified => spherify(cube_point),
        }
    }
}

fn spherify(p: Vec3) -> Vec3 {
    let x2 = p.x * p.x;
    let y2 = p.y * p.y;
    let z2 = p.z * p.z;

    Vec3::new(
        p.x * (1.0 - y2 / 2.0 - z2 / 2.0 + y2 * z2 / 3.0).max(0.0).sqrt(),
        p.y * (1.0 - x2 / 2.0 - z2 / 2.0 + x2 * z2 / 3.0).max(0.0).sqrt(),
        p.z * (1.0 - x2 / 2.0 - y2 / 2.0 + x2 * y2 / 3.0).max(0.0).sqrt(),
    )
}

/// Clamps a requested grid side length into `[MIN_RESOLUTION, MAX_RESOLUTION]`.
pub fn clamp_resolution(resolution: u32) -> u32 {
    let clamped = resolution.clamp(MIN_RESOLUTION, MAX_RESOLUTION);
    if clamped != resolution {
        tracing::warn!(requested = resolution, used = clamped, "resolution out of range, clamped");
    }
    clamped
}

/// A `resolution × resolution` vertex grid spanning one cube face.
///
/// Vertices are indexed row-major: `i = x + y * resolution`. Grid corners sit
/// exactly on the cube edges, so neighbouring faces share edge positions but not
/// vertices.
#[derive(Debug, Clone, Copy)]
pub struct FaceGrid {
    pub face: CubeFace,
    pub resolution: u32,
    local_up: Vec3,
    axis_a: Vec3,
    axis_b: Vec3,
}

impl FaceGrid {
    /// Creates a grid for `face`. The resolution is clamped to the valid range.
    pub fn new(face: CubeFace, resolution: u32) -> Self {
        Self {
            face,
            resolution: clamp_resolution(resolution),
            local_up: face.local_up(),
            axis_a: face.axis_a(),
            axis_b: face.axis_b(),
        }
    }

    /// Number of vertices in the grid.
    pub fn vertex_count(&self) -> usize {
        (self.resolution as usize) * (self.resolution as usize)
    }

    /// Grid coordinates of vertex `i`.
    pub fn coords(&self, i: usize) -> (u32, u32) {
        let res = self.resolution as usize;
        ((i % res) as u32, (i / res) as u32)
    }

    /// Point on the unit cube surface for grid cell `(x, y)`.
    pub fn point_on_cube(&self, x: u32, y: u32) -> Vec3 {
        let step = (self.resolution - 1) as f32;
        let px = x as f32 / step;
        let py = y as f32 / step;
        self.local_up + (px - 0.5) * 2.0 * self.axis_a + (py - 0.5) * 2.0 * self.axis_b
    }

    /// Point on the unit sphere for grid cell `(x, y)`.
    pub fn point_on_sphere(&self, x: u32, y: u32, projection: CubeProjection) -> Vec3 {
        projection.project(self.point_on_cube(x, y))
    }

    /// Triangle list for the grid, two triangles per quad.
    pub fn triangle_indices(&self) -> Vec<u32> {
        triangle_indices(self.resolution)
    }
}

/// Triangulates a row-major `resolution × resolution` grid.
///
/// Each quad with top-left corner `i` produces `i, i+res+1, i+res` and
/// `i, i+1, i+res+1`, giving `6 * (resolution - 1)^2` indices.
pub fn triangle_indices(resolution: u32) -> Vec<u32> {
    let res = resolution.max(MIN_RESOLUTION);
    let quads = (res - 1) as usize;
    let mut indices = Vec::with_capacity(quads * quads * 6);

    for y in 0..res - 1 {
        for x in 0..res - 1 {
            let i = x + y * res;
            indices.extend_from_slice(&[i, i + res + 1, i + res, i, i + 1, i + res + 1]);
        }
    }

    indices
}
