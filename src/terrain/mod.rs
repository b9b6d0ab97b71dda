//! Renderable surface geometry.
//!
//! Turns cube faces, a noise field and a color ramp into indexed triangle
//! meshes: six displaced terrain faces plus a translucent cloud shell.

mod clouds;
mod face;
mod mesh;

pub use clouds::{cloud_alpha, CloudShell, CloudShellBuilder, DEFAULT_CLOUD_RESOLUTION, DEFAULT_CLOUD_SIZE};
pub use face::{TerrainFace, TerrainFaceBuilder};
pub use mesh::MeshData;
