//! Random parameter sets and spawn positions.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::config::SpawnLayout;
use crate::color::{random_biome_gradient, ColorConfig};
use crate::noise::NoiseConfig;
use crate::planet::PlanetParameterSet;

/// Exclusive upper bound of randomized planet seeds.
pub const MAX_SEED: i32 = 10_000;

/// Draws plausible planets.
///
/// Ranges are tuned for Earth-like bodies: oceans below a sea level of
/// 0.7-1.0, three to five octaves of terrain and partial cloud cover.
#[derive(Debug, Clone)]
pub struct Randomizer {
    rng: ChaCha8Rng,
}

impl Randomizer {
    /// Seeded randomizers repeat exactly; `None` seeds from the thread RNG.
    pub fn new(master_seed: Option<u64>) -> Self {
        let rng = match master_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };
        Self { rng }
    }

    /// A fresh parameter set for slot `index`.
    pub fn next_params(&mut self, index: usize) -> PlanetParameterSet {
        let rng = &mut self.rng;
        let seed = rng.random_range(0..MAX_SEED);

        let terrain_noise = NoiseConfig {
            strength: rng.random_range(0.8..2.0),
            base_roughness: rng.random_range(0.8..2.5),
            center: Vec3::ZERO,
            num_layers: rng.random_range(3..=5),
            persistence: 0.5,
            lacunarity: 2.0,
            min_value: rng.random_range(0.7..1.0),
        };

        let color = ColorConfig {
            gradient: random_biome_gradient(rng),
            color_spread: rng.random_range(0.5..2.0),
        };

        let cloud_noise = NoiseConfig {
            strength: 1.0,
            base_roughness: rng.random_range(1.5..3.0),
            center: Vec3::ZERO,
            num_layers: 3,
            persistence: 0.5,
            ..NoiseConfig::default()
        };

        PlanetParameterSet {
            name: format!("Planet_{index}"),
            seed,
            radius: 1.0,
            terrain_noise,
            color,
            cloud_noise,
            cloud_threshold: rng.random_range(0.4..0.7),
            cloud_opacity: rng.random_range(0.6..1.0),
        }
    }

    /// Position for slot `index` under `layout`.
    pub fn spawn_position(&mut self, layout: &SpawnLayout, index: usize) -> Vec3 {
        match layout {
            SpawnLayout::Points(points) => points.get(index).or(points.last()).copied().unwrap_or(Vec3::ZERO),
            SpawnLayout::Area { size } => {
                let unit = Vec3::new(
                    self.rng.random::<f32>() * 2.0 - 1.0,
                    self.rng.random::<f32>() * 2.0 - 1.0,
                    self.rng.random::<f32>() * 2.0 - 1.0,
                );
                unit * *size * 0.5
            }
        }
    }
}
