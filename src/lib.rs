//! Procedural planet synthesis.
//!
//! Builds spherical bodies from layered coherent noise: a cube-sphere mesh
//! displaced by a fractal height field, colored from a biome gradient, wrapped
//! in a translucent cloud shell. Every body is described by a serializable
//! [`PlanetParameterSet`] and rebuilt deterministically from it.

pub mod color;
pub mod export;
pub mod geometry;
pub mod noise;
pub mod planet;
mod sanitize;
pub mod system;
pub mod terrain;

pub use color::{BiomeColorMapper, ColorConfig, Gradient, Rgba};
pub use geometry::{CubeFace, CubeProjection};
pub use noise::{FractalNoiseField, NoiseBasis, NoiseConfig};
pub use planet::{BodyGeometry, BodyInstance, PlanetParameterSet, PlanetSynthesizer, SynthesisConfig, Transform};
pub use system::{GalaxyConfig, InstanceManager, RenderHost, RenderLayer};
pub use terrain::{CloudShell, MeshData, TerrainFace};
