//! Turns a parameter set into a complete body.

use std::sync::Arc;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use super::body::{BodyGeometry, BodyInstance, Transform};
use super::config::SynthesisConfig;
use super::params::PlanetParameterSet;
use crate::geometry::CubeFace;
use crate::noise::{FractalNoiseField, NoiseConfig};
use crate::terrain::{CloudShellBuilder, TerrainFace, TerrainFaceBuilder};

/// Seed offsets are whole numbers in `[-OFFSET_RANGE, OFFSET_RANGE)`.
const OFFSET_RANGE: i32 = 100;

/// Noise-space offsets derived from a seed: terrain first, then clouds.
pub fn seed_offsets(seed: i32) -> (Vec3, Vec3) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed as i64 as u64);
    let mut draw = || {
        Vec3::new(
            rng.random_range(-OFFSET_RANGE..OFFSET_RANGE) as f32,
            rng.random_range(-OFFSET_RANGE..OFFSET_RANGE) as f32,
            rng.random_range(-OFFSET_RANGE..OFFSET_RANGE) as f32,
        )
    };
    let terrain = draw();
    let clouds = draw();
    (terrain, clouds)
}

/// Builds terrain and cloud geometry for bodies.
///
/// Holds the noise source and tessellation settings; everything else comes from
/// the parameter set, so one synthesizer serves a whole system.
#[derive(Debug, Clone)]
pub struct PlanetSynthesizer {
    config: SynthesisConfig,
    field: FractalNoiseField,
}

impl Default for PlanetSynthesizer {
    fn default() -> Self {
        Self::new(SynthesisConfig::default())
    }
}

impl PlanetSynthesizer {
    pub fn new(config: SynthesisConfig) -> Self {
        let config = config.sanitized();
        Self {
            field: FractalNoiseField::new(config.basis),
            config,
        }
    }

    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Changes the terrain resolution used by later builds.
    pub fn set_resolution(&mut self, resolution: u32) {
        self.config.resolution = resolution;
        self.config = self.config.sanitized();
    }

    /// Synthesizes a new body placed at `transform`.
    ///
    /// # Arguments
    /// * `params` - Planet description; copied into the body, never mutated
    /// * `transform` - Placement in the scene. Its scale is replaced by the radius
    ///
    /// # Returns
    /// A body with freshly built terrain and cloud geometry and no renderables
    pub fn synthesize(&self, params: &PlanetParameterSet, transform: Transform) -> BodyInstance {
        let params = params.clone();
        let geometry = Arc::new(self.build_geometry(&params));
        let radius = params.sanitized().radius;
        BodyInstance {
            params,
            geometry,
            transform: Transform {
                scale: radius,
                ..transform
            },
            cloud_transform: Transform::IDENTITY,
            cloud_rotation_speed: self.config.cloud_rotation_speed,
            handles: Vec::new(),
        }
    }

    /// Rebuilds `body` from its current parameters and swaps in the new geometry.
    pub fn rebuild(&self, body: &mut BodyInstance) {
        body.geometry = Arc::new(self.build_geometry(&body.params));
        body.transform.scale = body.params.sanitized().radius;
        body.cloud_rotation_speed = self.config.cloud_rotation_speed;
    }

    /// Builds all geometry for `params`. Identical inputs give identical output.
    pub fn build_geometry(&self, params: &PlanetParameterSet) -> BodyGeometry {
        let params = params.sanitized();
        // Seed offsets shift the stored centers, so equal seeds give equal bodies
        let (terrain_offset, cloud_offset) = seed_offsets(params.seed);

        let terrain_noise = NoiseConfig {
            center: params.terrain_noise.center + terrain_offset,
            ..params.terrain_noise.clone()
        };
        let cloud_noise = NoiseConfig {
            center: params.cloud_noise.center + cloud_offset,
            ..params.cloud_noise.clone()
        };

        // Terrain faces and the cloud shell are built concurrently
        let (terrain, clouds) = rayon::join(
            || {
                CubeFace::ALL
                    .par_iter()
                    .map(|&face| {
                        TerrainFaceBuilder::new(face, self.config.resolution, &self.field, &terrain_noise, &params.color)
                            .with_projection(self.config.projection)
                            .build()
                    })
                    .collect::<Vec<TerrainFace>>()
            },
            || {
                CloudShellBuilder::new(&self.field, &cloud_noise, params.cloud_threshold, params.cloud_opacity)
                    .with_resolution(self.config.cloud_resolution)
                    .with_size(self.config.cloud_size)
                    .with_projection(self.config.projection)
                    .build()
            },
        );

        let elevation_range = terrain.iter().map(TerrainFace::elevation_range).fold(
            (f32::MAX, f32::MIN),
            |(lo, hi), (a, b)| (lo.min(a), hi.max(b)),
        );

        tracing::debug!(
            planet = %params.name,
            seed = params.seed,
            resolution = self.config.resolution,
            min_elevation = elevation_range.0,
            max_elevation = elevation_range.1,
            "synthesized body"
        );

        BodyGeometry {
            terrain,
            clouds,
            elevation_range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planet::persistence::{decode, encode};

    fn synth() -> PlanetSynthesizer {
        PlanetSynthesizer::new(SynthesisConfig::preview())
    }

    #[test]
    fn test_seed_offsets_deterministic_and_bounded() {
        for seed in [0, 1, 42, 9999, -5] {
            let (a, b) = seed_offsets(seed);
            assert_eq!((a, b), seed_offsets(seed));
            for v in [a, b] {
                for c in v.to_array() {
                    assert!((-100.0..100.0).contains(&c));
                    assert_eq!(c, c.trunc());
                }
            }
        }
        assert_ne!(seed_offsets(1), seed_offsets(2));
    }

    #[test]
    fn test_synthesis_is_idempotent() {
        let params = PlanetParameterSet::named("Io", 77);
        let s = synth();
        let a = s.synthesize(&params, Transform::IDENTITY);
        let b = s.synthesize(&params, Transform::IDENTITY);
        assert_eq!(*a.geometry, *b.geometry);
    }

    #[test]
    fn test_roundtrip_rebuilds_same_geometry() {
        let mut params = PlanetParameterSet::named("Rhea", 314);
        params.terrain_noise = NoiseConfig::terrain();
        params.color.color_spread = 0.7;
        let restored = decode(&encode(&params).unwrap()).unwrap();

        let s = synth();
        let a = s.build_geometry(&params);
        let b = s.build_geometry(&restored);
        for (fa, fb) in a.terrain.iter().zip(&b.terrain) {
            for (va, vb) in fa.mesh.vertices.iter().zip(&fb.mesh.vertices) {
                assert!((*va - *vb).length() < 1e-5);
            }
            for (ca, cb) in fa.mesh.colors.iter().zip(&fb.mesh.colors) {
                assert!((*ca - *cb).length() < 1e-5);
            }
        }
    }

    #[test]
    fn test_geometry_counts() {
        let s = synth();
        let geometry = s.build_geometry(&PlanetParameterSet::default());
        assert_eq!(geometry.terrain.len(), 6);
        assert_eq!(geometry.clouds.faces.len(), 6);
        let budget = s.config().mesh_budget();
        assert_eq!(geometry.vertex_count(), budget.total_vertices());
        assert_eq!(geometry.triangle_count(), budget.total_triangles());
        for (face, id) in geometry.terrain.iter().zip(CubeFace::ALL) {
            assert_eq!(face.id, id);
        }
    }

    #[test]
    fn test_seed_changes_surface() {
        let s = synth();
        let a = s.build_geometry(&PlanetParameterSet::named("A", 1));
        let b = s.build_geometry(&PlanetParameterSet::named("A", 2));
        assert_ne!(a.terrain, b.terrain);
    }

    #[test]
    fn test_params_left_untouched() {
        let mut params = PlanetParameterSet::named("Wild", 5);
        params.terrain_noise.strength = 40.0;
        let body = synth().synthesize(&params, Transform::IDENTITY);
        assert_eq!(body.params, params);
        assert!(body.geometry.elevation_range.1 <= 2.0 * params.terrain_noise.max_raw_sum());
    }

    #[test]
    fn test_radius_scales_transform() {
        let params = PlanetParameterSet { radius: 3.0, ..Default::default() };
        let body = synth().synthesize(&params, Transform::at(Vec3::X));
        assert_eq!(body.transform.scale, 3.0);
        assert_eq!(body.transform.position, Vec3::X);

        let bad = PlanetParameterSet { radius: 0.0, ..Default::default() };
        assert_eq!(synth().synthesize(&bad, Transform::IDENTITY).transform.scale, 1.0);
    }

    #[test]
    fn test_rebuild_swaps_geometry() {
        let s = synth();
        let mut body = s.synthesize(&PlanetParameterSet::named("Swap", 3), Transform::IDENTITY);
        let before = Arc::clone(&body.geometry);
        body.params.seed = 4;
        s.rebuild(&mut body);
        assert!(!Arc::ptr_eq(&before, &body.geometry));
        assert_ne!(before.terrain, body.geometry.terrain);
    }

    #[test]
    fn test_set_resolution_clamps() {
        let mut s = synth();
        s.set_resolution(1);
        assert_eq!(s.config().resolution, 2);
        s.set_resolution(1000);
        assert_eq!(s.config().resolution, 256);
    }
}
