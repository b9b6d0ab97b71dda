//! Single-octave coherent noise sources.

use glam::Vec3;
use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};
use simdnoise::NoiseBuilder;

/// Fixed permutation seed. Offsets between bodies come from the noise center,
/// never from reseeding the source.
const PERLIN_SEED: u32 = 0;
const SIMPLEX_SEED: i32 = 1337;

/// A pure scalar noise function over 3D space.
///
/// Implementations must be continuous, return values in `[-1, 1]` and depend on
/// nothing but `point`.
pub trait CoherentNoise: Send + Sync {
    fn evaluate(&self, point: Vec3) -> f32;
}

/// Selects the noise source used by a [`super::FractalNoiseField`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseBasis {
    /// Three 2D Perlin planes averaged together.
    #[default]
    Projected,
    /// 4D simplex sampled at w = 0.
    Simplex,
}

/// Approximates 3D noise by averaging 2D Perlin noise on the XY, YZ and ZX planes.
///
/// Each plane is remapped to `[0, 1]`, averaged, then stretched back to `[-1, 1]`.
/// Cheap, deterministic, and slightly axis-aligned in character.
#[derive(Debug, Clone)]
pub struct ProjectedPerlin {
    perlin: Perlin,
}

impl ProjectedPerlin {
    pub fn new() -> Self {
        Self {
            perlin: Perlin::new(PERLIN_SEED),
        }
    }

    fn plane(&self, a: f32, b: f32) -> f32 {
        let v = self.perlin.get([f64::from(a), f64::from(b)]) as f32;
        ((v + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

impl Default for ProjectedPerlin {
    fn default() -> Self {
        Self::new()
    }
}

impl CoherentNoise for ProjectedPerlin {
    fn evaluate(&self, point: Vec3) -> f32 {
        let xy = self.plane(point.x, point.y);
        let yz = self.plane(point.y, point.z);
        let zx = self.plane(point.z, point.x);

        let avg = (xy + yz + zx) / 3.0;
        avg * 2.0 - 1.0
    }
}

/// True volumetric simplex noise through simdnoise.
///
/// simdnoise picks an instruction set at runtime, so the last bits of a sample
/// may differ between machines. Use [`ProjectedPerlin`] when saved bodies must
/// reproduce bit-for-bit everywhere.
#[derive(Debug, Clone)]
pub struct SimplexNoise {
    seed: i32,
}

impl SimplexNoise {
    pub fn new() -> Self {
        Self { seed: SIMPLEX_SEED }
    }
}

impl Default for SimplexNoise {
    fn default() -> Self {
        Self::new()
    }
}

impl CoherentNoise for SimplexNoise {
    fn evaluate(&self, point: Vec3) -> f32 {
        let value = NoiseBuilder::fbm_4d_offset(point.x, 1, point.y, 1, point.z, 1, 0.0, 1)
            .with_seed(self.seed)
            .with_freq(1.0)
            .with_octaves(1)
            .generate()
            .0[0];
        value.clamp(-1.0, 1.0)
    }
}

/// Statically dispatched noise source chosen by [`NoiseBasis`].
#[derive(Debug, Clone)]
pub enum NoiseSource {
    Projected(ProjectedPerlin),
    Simplex(SimplexNoise),
}

impl NoiseSource {
    pub fn new(basis: NoiseBasis) -> Self {
        match basis {
            NoiseBasis::Projected => NoiseSource::Projected(ProjectedPerlin::new()),
            NoiseBasis::Simplex => NoiseSource::Simplex(SimplexNoise::new()),
        }
    }

    pub fn basis(&self) -> NoiseBasis {
        match self {
            NoiseSource::Projected(_) => NoiseBasis::Projected,
            NoiseSource::Simplex(_) => NoiseBasis::Simplex,
        }
    }
}

impl CoherentNoise for NoiseSource {
    fn evaluate(&self, point: Vec3) -> f32 {
        match self {
            NoiseSource::Projected(n) => n.evaluate(point),
            NoiseSource::Simplex(n) => n.evaluate(point),
        }
    }
}
