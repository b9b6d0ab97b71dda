//! Cube-sphere geometry module.
//!
//! Lays out vertex grids on the six faces of a cube and projects them onto
//! the unit sphere.

mod cube_sphere;
mod face;

pub use cube_sphere::{
    clamp_resolution, triangle_indices, CubeProjection, FaceGrid, MAX_RESOLUTION, MIN_RESOLUTION,
};
pub use face::CubeFace;
