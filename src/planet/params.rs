//! The serializable description of one body.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::ColorConfig;
use crate::noise::NoiseConfig;
use crate::sanitize::{clamp_f32, lenient_i32};

pub const DEFAULT_CLOUD_THRESHOLD: f32 = 0.5;
pub const DEFAULT_CLOUD_OPACITY: f32 = 0.9;

/// Rejected [`PlanetParameterSet::set`] call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("unknown parameter '{0}'")]
    Unknown(String),
    /// NaN and infinities have no JSON form, so they never enter a parameter set.
    #[error("parameter '{path}' must be finite, got {value}")]
    NonFinite { path: String, value: f32 },
}

/// Everything needed to rebuild a body bit for bit.
///
/// This is the unit of persistence and randomization. Synthesis never mutates
/// it; each body keeps its own copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanetParameterSet {
    #[serde(rename = "planetName")]
    pub name: String,
    /// Drives the noise offsets of terrain and clouds.
    #[serde(deserialize_with = "lenient_i32")]
    pub seed: i32,
    /// Uniform scale of the body. Non-positive values are treated as 1.
    pub radius: f32,
    pub terrain_noise: NoiseConfig,
    #[serde(flatten)]
    pub color: ColorConfig,
    pub cloud_noise: NoiseConfig,
    pub cloud_threshold: f32,
    pub cloud_opacity: f32,
}

impl Default for PlanetParameterSet {
    fn default() -> Self {
        Self {
            name: "Planet".to_string(),
            seed: 0,
            radius: 1.0,
            terrain_noise: NoiseConfig::default(),
            color: ColorConfig::default(),
            cloud_noise: NoiseConfig::default(),
            cloud_threshold: DEFAULT_CLOUD_THRESHOLD,
            cloud_opacity: DEFAULT_CLOUD_OPACITY,
        }
    }
}

impl PlanetParameterSet {
    pub fn named(name: impl Into<String>, seed: i32) -> Self {
        Self {
            name: name.into(),
            seed,
            ..Default::default()
        }
    }

    /// Returns a copy with every numeric field pulled into its valid range.
    pub fn sanitized(&self) -> Self {
        let radius = if self.radius.is_finite() && self.radius > 0.0 {
            self.radius
        } else {
            tracing::warn!(planet = %self.name, value = self.radius, "invalid radius, using 1.0");
            1.0
        };
        Self {
            name: self.name.clone(),
            seed: self.seed,
            radius,
            terrain_noise: self.terrain_noise.sanitized(),
            color: self.color.sanitized(),
            cloud_noise: self.cloud_noise.sanitized(),
            cloud_threshold: clamp_f32("cloudThreshold", self.cloud_threshold, 0.0, 1.0, DEFAULT_CLOUD_THRESHOLD),
            cloud_opacity: clamp_f32("cloudOpacity", self.cloud_opacity, 0.0, 1.0, DEFAULT_CLOUD_OPACITY),
        }
    }

    /// Whether every numeric field can be written to JSON as a number.
    pub fn is_finite(&self) -> bool {
        [self.radius, self.color.color_spread, self.cloud_threshold, self.cloud_opacity]
            .iter()
            .all(|v| v.is_finite())
            && self.terrain_noise.is_finite()
            && self.cloud_noise.is_finite()
    }

    /// Sets a numeric field by its serialized path, e.g. `terrainNoise.minValue`,
    /// `cloudNoise.center.x` or `colorSpread`.
    ///
    /// Finite values are stored as given; clamping happens at synthesis time.
    /// Non-finite values are rejected before the path is looked up.
    pub fn set(&mut self, path: &str, value: f32) -> Result<(), ParameterError> {
        if !value.is_finite() {
            return Err(ParameterError::NonFinite {
                path: path.to_string(),
                value,
            });
        }
        let known = match path.split_once('.') {
            Some(("terrainNoise", field)) => self.terrain_noise.set_field(field, value),
            Some(("cloudNoise", field)) => self.cloud_noise.set_field(field, value),
            Some(_) => false,
            None => match path {
                "seed" => {
                    self.seed = value.round() as i32;
                    true
                }
                "radius" => {
                    self.radius = value;
                    true
                }
                "colorSpread" => {
                    self.color.color_spread = value;
                    true
                }
                "cloudThreshold" => {
                    self.cloud_threshold = value;
                    true
                }
                "cloudOpacity" => {
                    self.cloud_opacity = value;
                    true
                }
                _ => false,
            },
        };
        if known {
            Ok(())
        } else {
            Err(ParameterError::Unknown(path.to_string()))
        }
    }
}
