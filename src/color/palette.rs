//! Randomized biome palettes.
//!
//! A palette is four color stops: deep water at 0, shallow water at 0.4, land
//! at 0.5 and peaks at 1. Each stop is drawn from a constrained HSV band so
//! that random planets still read as oceans, continents and snow caps.

use rand::Rng;

use super::gradient::{Gradient, Rgba};

/// Inclusive HSV sampling bounds, all components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HsvBand {
    pub hue: (f32, f32),
    pub saturation: (f32, f32),
    pub value: (f32, f32),
}

impl HsvBand {
    pub const DEEP_WATER: HsvBand = HsvBand {
        hue: (0.0, 1.0),
        saturation: (0.6, 1.0),
        value: (0.1, 0.4),
    };
    pub const VEGETATED_LAND: HsvBand = HsvBand {
        hue: (0.15, 0.4),
        saturation: (0.3, 0.8),
        value: (0.3, 0.6),
    };
    pub const EXOTIC_LAND: HsvBand = HsvBand {
        hue: (0.0, 1.0),
        saturation: (0.3, 0.7),
        value: (0.4, 0.8),
    };

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Rgba {
        let h = lerp(self.hue, rng.random::<f32>());
        let s = lerp(self.saturation, rng.random::<f32>());
        let v = lerp(self.value, rng.random::<f32>());
        hsv_to_rgb(h, s, v)
    }
}

fn lerp((lo, hi): (f32, f32), t: f32) -> f32 {
    lo + (hi - lo) * t
}

/// Probability that land is drawn from the vegetated band.
const VEGETATED_CHANCE: f32 = 0.6;
const SHALLOW_TINT: Rgba = Rgba::rgb(0.5, 1.0, 1.0);
const ICE_TINT: Rgba = Rgba::rgb(0.8, 0.9, 1.0);

/// Stop positions for deep water, shallow water, land and peaks.
pub const PALETTE_STOPS: [f32; 4] = [0.0, 0.4, 0.5, 1.0];

/// Draws a random four-stop biome gradient.
pub fn random_biome_gradient<R: Rng + ?Sized>(rng: &mut R) -> Gradient {
    let deep = HsvBand::DEEP_WATER.sample(rng);
    let shallow = deep.lerp(SHALLOW_TINT, 0.4);

    let land = if rng.random::<f32>() < VEGETATED_CHANCE {
        HsvBand::VEGETATED_LAND.sample(rng)
    } else {
        HsvBand::EXOTIC_LAND.sample(rng)
    };

    let peak = Rgba::WHITE.lerp(ICE_TINT, rng.random::<f32>() * 0.5);

    Gradient::from_stops(&[
        (PALETTE_STOPS[0], deep),
        (PALETTE_STOPS[1], shallow),
        (PALETTE_STOPS[2], land),
        (PALETTE_STOPS[3], peak),
    ])
}

/// Converts HSV (all in `[0, 1]`) to opaque RGB.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Rgba {
    let h = h.rem_euclid(1.0) * 6.0;
    let s = s.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 1.0);

    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match sector as u32 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Rgba::rgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Inverse of `hsv_to_rgb`. Hue is 0 for greys.
    fn rgb_to_hsv(color: Rgba) -> (f32, f32, f32) {
        let max = color.r.max(color.g).max(color.b);
        let min = color.r.min(color.g).min(color.b);
        let delta = max - min;

        let h = if delta <= 0.0 {
            0.0
        } else if max == color.r {
            ((color.g - color.b) / delta).rem_euclid(6.0) / 6.0
        } else if max == color.g {
            ((color.b - color.r) / delta + 2.0) / 6.0
        } else {
            ((color.r - color.g) / delta + 4.0) / 6.0
        };
        let s = if max <= 0.0 { 0.0 } else { delta / max };
        (h, s, max)
    }

    #[test]
    fn test_hsv_primaries() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), Rgba::rgb(1.0, 0.0, 0.0));
        assert_eq!(hsv_to_rgb(1.0 / 3.0, 1.0, 1.0).g, 1.0);
        assert_eq!(hsv_to_rgb(0.5, 0.0, 0.25), Rgba::rgb(0.25, 0.25, 0.25));
    }

    #[test]
    fn test_hsv_roundtrip() {
        for &(h, s, v) in &[(0.1, 0.5, 0.7), (0.6, 0.9, 0.3), (0.95, 0.2, 0.8)] {
            let (h2, s2, v2) = rgb_to_hsv(hsv_to_rgb(h, s, v));
            assert!((h - h2).abs() < 1e-4 && (s - s2).abs() < 1e-4 && (v - v2).abs() < 1e-4);
        }
    }

    #[test]
    fn test_palette_has_four_ordered_stops() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let g = random_biome_gradient(&mut rng);
        let times: Vec<f32> = g.color_keys.iter().map(|k| k.time).collect();
        assert_eq!(times, PALETTE_STOPS.to_vec());
        assert!(g.alpha_keys.iter().all(|k| k.alpha == 1.0));
    }

    #[test]
    fn test_deep_water_stays_in_band() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..200 {
            let g = random_biome_gradient(&mut rng);
            let (_, s, v) = rgb_to_hsv(g.color_keys[0].color);
            assert!((0.6 - 1e-4..=1.0 + 1e-4).contains(&s), "saturation {}", s);
            assert!((0.1 - 1e-4..=0.4 + 1e-4).contains(&v), "value {}", v);
        }
    }

    #[test]
    fn test_peak_is_bright() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..100 {
            let peak = random_biome_gradient(&mut rng).color_keys[3].color;
            assert!(peak.r >= 0.89 && peak.g >= 0.94 && peak.b >= 0.999);
        }
    }

    #[test]
    fn test_same_seed_same_palette() {
        let a = random_biome_gradient(&mut ChaCha8Rng::seed_from_u64(11));
        let b = random_biome_gradient(&mut ChaCha8Rng::seed_from_u64(11));
        assert_eq!(a, b);
    }
}
