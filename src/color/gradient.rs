//! Piecewise-linear color ramps with independent color and alpha keys.

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Linear RGBA color with components nominally in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        Rgba::from(self.to_vec4().lerp(other.to_vec4(), t))
    }

    pub fn with_alpha(self, a: f32) -> Rgba {
        Rgba { a, ..self }
    }

    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(self.r, self.g, self.b, self.a)
    }

    pub fn rgb_vec(self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }

    /// Quantizes to 8-bit RGBA.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

impl From<Vec4> for Rgba {
    fn from(v: Vec4) -> Self {
        Rgba::new(v.x, v.y, v.z, v.w)
    }
}

/// A color stop at `time` in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorKey {
    pub time: f32,
    pub color: Rgba,
}

/// An opacity stop at `time` in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlphaKey {
    pub time: f32,
    pub alpha: f32,
}

/// Color ramp evaluated by linear interpolation between bracketing keys.
///
/// Keys may be stored in any order. Color and alpha are looked up
/// independently; the alpha channel of color keys is ignored. Outside the key
/// range the nearest end key wins. An empty color list evaluates to white and
/// an empty alpha list to fully opaque.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Gradient {
    pub color_keys: Vec<ColorKey>,
    pub alpha_keys: Vec<AlphaKey>,
}

impl Gradient {
    pub fn new(color_keys: Vec<ColorKey>, alpha_keys: Vec<AlphaKey>) -> Self {
        Self { color_keys, alpha_keys }
    }

    /// Opaque gradient through the given `(time, color)` stops.
    pub fn from_stops(stops: &[(f32, Rgba)]) -> Self {
        Self {
            color_keys: stops.iter().map(|&(time, color)| ColorKey { time, color }).collect(),
            alpha_keys: vec![AlphaKey { time: 0.0, alpha: 1.0 }, AlphaKey { time: 1.0, alpha: 1.0 }],
        }
    }

    /// Ocean, beach, grassland and snow, in the spirit of a temperate world.
    pub fn earth_like() -> Self {
        Self::from_stops(&[
            (0.0, Rgba::rgb(0.02, 0.08, 0.35)),
            (0.4, Rgba::rgb(0.15, 0.45, 0.7)),
            (0.5, Rgba::rgb(0.3, 0.55, 0.2)),
            (1.0, Rgba::WHITE),
        ])
    }

    /// Returns a copy with keys sorted by time.
    pub fn sorted(&self) -> Self {
        let mut g = self.clone();
        g.color_keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        g.alpha_keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        g
    }

    pub fn evaluate(&self, t: f32) -> Rgba {
        let t = if t.is_nan() { 0.0 } else { t };
        let color = sample(&self.color_keys, t, |k| k.time, |k| k.color.rgb_vec(), Vec3::lerp)
            .unwrap_or(Vec3::ONE);
        let alpha = sample(&self.alpha_keys, t, |k| k.time, |k| k.alpha, |a, b, s| a + (b - a) * s)
            .unwrap_or(1.0);
        Rgba::new(color.x, color.y, color.z, alpha)
    }
}

/// Interpolates between the keys bracketing `t` without requiring sorted input.
fn sample<K, V: Copy>(
    keys: &[K],
    t: f32,
    time: impl Fn(&K) -> f32,
    value: impl Fn(&K) -> V,
    lerp: impl Fn(V, V, f32) -> V,
) -> Option<V> {
    let mut lower: Option<&K> = None;
    let mut upper: Option<&K> = None;
    let mut first: Option<&K> = None;
    let mut last: Option<&K> = None;

    for key in keys {
        let kt = time(key);
        if first.map_or(true, |f| kt < time(f)) {
            first = Some(key);
        }
        if last.map_or(true, |l| kt > time(l)) {
            last = Some(key);
        }
        if kt <= t && lower.map_or(true, |l| kt > time(l)) {
            lower = Some(key);
        }
        if kt >= t && upper.map_or(true, |u| kt < time(u)) {
            upper = Some(key);
        }
    }

    match (lower, upper) {
        (Some(a), Some(b)) => {
            let span = time(b) - time(a);
            if span <= f32::EPSILON {
                Some(value(a))
            } else {
                Some(lerp(value(a), value(b), (t - time(a)) / span))
            }
        }
        (None, Some(_)) => first.map(&value),
        (Some(_), None) => last.map(&value),
        (None, None) => None,
    }
}
