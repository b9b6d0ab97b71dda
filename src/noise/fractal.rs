//! Multi-octave fractal Brownian motion (fBm) height field with a sea-level cutoff.

use glam::Vec3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::basis::{CoherentNoise, NoiseBasis, NoiseSource};
use crate::sanitize::{clamp_f32, clamp_u32, lenient_u32};

/// Configuration for one fractal noise layer stack.
///
/// Field names serialize in camelCase to match the planet file format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NoiseConfig {
    /// Final height multiplier (0-2).
    pub strength: f32,
    /// Frequency of the first octave (0.5-5). Lower values give larger continents.
    pub base_roughness: f32,
    /// Offset added to every sample position. Shifts the pattern without changing its character.
    #[serde(with = "xyz")]
    pub center: Vec3,
    /// Number of octaves (1-8).
    #[serde(deserialize_with = "lenient_u32")]
    pub num_layers: u32,
    /// Amplitude decay per octave (0-1).
    pub persistence: f32,
    /// Frequency growth per octave (1-4).
    pub lacunarity: f32,
    /// Sea level. Raw sums below it yield zero elevation (0.5-1.5).
    pub min_value: f32,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            strength: 1.0,
            base_roughness: 1.0,
            center: Vec3::ZERO,
            num_layers: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            min_value: 1.0,
        }
    }
}

impl NoiseConfig {
    pub const STRENGTH_RANGE: (f32, f32) = (0.0, 2.0);
    pub const ROUGHNESS_RANGE: (f32, f32) = (0.5, 5.0);
    pub const LAYERS_RANGE: (u32, u32) = (1, 8);
    pub const PERSISTENCE_RANGE: (f32, f32) = (0.0, 1.0);
    pub const LACUNARITY_RANGE: (f32, f32) = (1.0, 4.0);
    pub const MIN_VALUE_RANGE: (f32, f32) = (0.5, 1.5);

    /// Rolling hills with shallow seas.
    pub fn terrain() -> Self {
        Self {
            strength: 1.2,
            base_roughness: 1.5,
            min_value: 0.85,
            ..Default::default()
        }
    }

    /// Soft, low-detail noise suited to cloud cover.
    pub fn clouds() -> Self {
        Self {
            strength: 1.0,
            base_roughness: 2.0,
            num_layers: 3,
            min_value: 0.5,
            ..Default::default()
        }
    }

    /// Returns a copy with every field pulled into its valid range.
    pub fn sanitized(&self) -> Self {
        let d = Self::default();
        let finite = |field: &str, v: f32| {
            if v.is_finite() {
                v
            } else {
                tracing::warn!(field, "non-finite center component replaced");
                0.0
            }
        };
        Self {
            strength: clamp_f32("strength", self.strength, Self::STRENGTH_RANGE.0, Self::STRENGTH_RANGE.1, d.strength),
            base_roughness: clamp_f32(
                "baseRoughness",
                self.base_roughness,
                Self::ROUGHNESS_RANGE.0,
                Self::ROUGHNESS_RANGE.1,
                d.base_roughness,
            ),
            center: Vec3::new(
                finite("center.x", self.center.x),
                finite("center.y", self.center.y),
                finite("center.z", self.center.z),
            ),
            num_layers: clamp_u32("numLayers", self.num_layers, Self::LAYERS_RANGE.0, Self::LAYERS_RANGE.1),
            persistence: clamp_f32(
                "persistence",
                self.persistence,
                Self::PERSISTENCE_RANGE.0,
                Self::PERSISTENCE_RANGE.1,
                d.persistence,
            ),
            lacunarity: clamp_f32(
                "lacunarity",
                self.lacunarity,
                Self::LACUNARITY_RANGE.0,
                Self::LACUNARITY_RANGE.1,
                d.lacunarity,
            ),
            min_value: clamp_f32(
                "minValue",
                self.min_value,
                Self::MIN_VALUE_RANGE.0,
                Self::MIN_VALUE_RANGE.1,
                d.min_value,
            ),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.center.is_finite()
            && [self.strength, self.base_roughness, self.persistence, self.lacunarity, self.min_value]
                .iter()
                .all(|v| v.is_finite())
    }

    /// Sets a field by its serialized name. `center.x` style paths address the offset.
    ///
    /// Returns `false` when the name is unknown.
    pub fn set_field(&mut self, field: &str, value: f32) -> bool {
        match field {
            "strength" => self.strength = value,
            "baseRoughness" => self.base_roughness = value,
            "numLayers" => self.num_layers = value.round().max(0.0) as u32,
            "persistence" => self.persistence = value,
            "lacunarity" => self.lacunarity = value,
            "minValue" => self.min_value = value,
            "center.x" => self.center.x = value,
            "center.y" => self.center.y = value,
            "center.z" => self.center.z = value,
            _ => return false,
        }
        true
    }

    /// Upper bound of the raw octave sum, before the sea-level cutoff.
    pub fn max_raw_sum(&self) -> f32 {
        let mut amplitude = 1.0;
        let mut total = 0.0;
        for _ in 0..self.num_layers {
            total += amplitude;
            amplitude *= self.persistence;
        }
        total
    }
}

/// Evaluates fBm elevation over a noise source.
///
/// Each octave sample is remapped from `[-1, 1]` to `[0, 1]` before weighting,
/// so the raw sum is never negative. Subtracting `min_value` and clamping at
/// zero turns everything below sea level into flat ocean.
#[derive(Debug, Clone)]
pub struct FractalNoiseField {
    source: NoiseSource,
}

impl Default for FractalNoiseField {
    fn default() -> Self {
        Self::new(NoiseBasis::default())
    }
}

impl FractalNoiseField {
    pub fn new(basis: NoiseBasis) -> Self {
        Self {
            source: NoiseSource::new(basis),
        }
    }

    pub fn basis(&self) -> NoiseBasis {
        self.source.basis()
    }

    /// Single sample of the underlying noise source.
    pub fn sample(&self, point: Vec3) -> f32 {
        self.source.evaluate(point)
    }

    /// Raw octave sum before the sea-level cutoff and strength scaling.
    pub fn raw(&self, point: Vec3, config: &NoiseConfig) -> f32 {
        let mut total = 0.0f32;
        let mut frequency = config.base_roughness;
        let mut amplitude = 1.0f32;

        for _ in 0..config.num_layers {
            let v = self.source.evaluate(point * frequency + config.center);
            total += (v + 1.0) * 0.5 * amplitude;
            frequency *= config.lacunarity;
            amplitude *= config.persistence;
        }

        total
    }

    /// Samples the fractal height field at a point on the unit sphere.
    ///
    /// # Arguments
    /// * `point` - Sample position, normally a unit sphere point
    /// * `config` - Octave settings, sea level and strength
    ///
    /// # Returns
    /// Elevation above sea level, always `>= 0`
    pub fn evaluate(&self, point: Vec3, config: &NoiseConfig) -> f32 {
        // Everything under min_value becomes flat ocean
        let above_sea = (self.raw(point, config) - config.min_value).max(0.0);
        above_sea * config.strength
    }

    /// Evaluates a batch of points in parallel.
    pub fn evaluate_batch(&self, points: &[Vec3], config: &NoiseConfig) -> Vec<f32> {
        points.par_iter().map(|&p| self.evaluate(p, config)).collect()
    }
}

/// Serializes a `Vec3` as `{ "x": .., "y": .., "z": .. }`.
mod xyz {
    use glam::Vec3;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize, Default)]
    #[serde(default)]
    struct Xyz {
        x: f32,
        y: f32,
        z: f32,
    }

    pub fn serialize<S: Serializer>(v: &Vec3, serializer: S) -> Result<S::Ok, S::Error> {
        Xyz { x: v.x, y: v.y, z: v.z }.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec3, D::Error> {
        let p = Xyz::deserialize(deserializer)?;
        Ok(Vec3::new(p.x, p.y, p.z))
    }
}
