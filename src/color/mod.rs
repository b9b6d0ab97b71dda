//! Biome coloring: gradients, the elevation-to-color mapper and random palettes.

mod biome;
mod gradient;
pub mod palette;

pub use biome::{BiomeColorMapper, ColorConfig};
pub use gradient::{AlphaKey, ColorKey, Gradient, Rgba};
pub use palette::random_biome_gradient;
