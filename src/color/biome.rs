//! Elevation-keyed vertex coloring.

use serde::{Deserialize, Serialize};

use super::gradient::{Gradient, Rgba};
use crate::sanitize::clamp_f32;

/// Biome gradient plus the spread that stretches it over the elevation range.
///
/// Serialized flat into the planet file as `biomeGradient` and `colorSpread`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorConfig {
    #[serde(rename = "biomeGradient")]
    pub gradient: Gradient,
    /// Smaller values push peak colors down to lower elevations.
    pub color_spread: f32,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            gradient: Gradient::earth_like(),
            color_spread: 1.0,
        }
    }
}

impl ColorConfig {
    pub const MAX_SPREAD: f32 = 5.0;

    /// Keeps `color_spread` in `(0, 5]`; non-positive values fall back to 1.
    pub fn sanitized(&self) -> Self {
        let spread = if self.color_spread > 0.0 {
            clamp_f32("colorSpread", self.color_spread, f32::MIN_POSITIVE, Self::MAX_SPREAD, 1.0)
        } else {
            tracing::warn!(value = self.color_spread, used = 1.0, "non-positive colorSpread replaced");
            1.0
        };
        Self {
            gradient: self.gradient.sorted(),
            color_spread: spread,
        }
    }
}

/// Maps raw elevation to a gradient color.
///
/// Elevation is divided by `terrain_strength * color_spread` before lookup, so
/// color bands follow the configured spread rather than the noise amplitude.
#[derive(Debug, Clone, Copy)]
pub struct BiomeColorMapper<'a> {
    config: &'a ColorConfig,
    divisor: f32,
}

impl<'a> BiomeColorMapper<'a> {
    pub fn new(config: &'a ColorConfig, terrain_strength: f32) -> Self {
        Self {
            config,
            divisor: height_divisor(terrain_strength, config.color_spread),
        }
    }

    pub fn divisor(&self) -> f32 {
        self.divisor
    }

    /// Gradient position for `elevation`, in `[0, 1]`.
    pub fn normalize(&self, elevation: f32) -> f32 {
        let t = elevation / self.divisor;
        if t.is_nan() {
            0.0
        } else {
            t.clamp(0.0, 1.0)
        }
    }

    pub fn evaluate(&self, elevation: f32) -> Rgba {
        self.config.gradient.evaluate(self.normalize(elevation))
    }
}

/// `strength * spread`, or 1.0 when that product cannot be divided by.
fn height_divisor(strength: f32, spread: f32) -> f32 {
    let product = strength * spread;
    if strength > 0.0 && spread > 0.0 && product > 0.0 && product.is_finite() {
        product
    } else {
        1.0
    }
}
