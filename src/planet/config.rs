//! Synthesis settings shared by every body in a system.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::geometry::{clamp_resolution, CubeProjection};
use crate::noise::NoiseBasis;
use crate::sanitize::{clamp_f32, lenient_u32};
use crate::terrain::{DEFAULT_CLOUD_RESOLUTION, DEFAULT_CLOUD_SIZE};

/// Tessellation and noise settings that are not part of a planet file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Grid side length of each terrain face.
    #[serde(deserialize_with = "lenient_u32")]
    pub resolution: u32,
    /// Grid side length of each cloud face.
    #[serde(deserialize_with = "lenient_u32")]
    pub cloud_resolution: u32,
    /// Cloud shell radius relative to the terrain sphere.
    pub cloud_size: f32,
    pub basis: NoiseBasis,
    pub projection: CubeProjection,
    /// Cloud spin in degrees per second around each axis.
    pub cloud_rotation_speed: Vec3,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            resolution: 40,
            cloud_resolution: DEFAULT_CLOUD_RESOLUTION,
            cloud_size: DEFAULT_CLOUD_SIZE,
            basis: NoiseBasis::default(),
            projection: CubeProjection::default(),
            cloud_rotation_speed: Vec3::new(0.0, 2.0, 0.0),
        }
    }
}

impl SynthesisConfig {
    /// Coarse preset for previews and tests.
    pub fn preview() -> Self {
        Self {
            resolution: 16,
            cloud_resolution: 12,
            ..Default::default()
        }
    }

    /// Dense preset for offline export.
    pub fn high_detail() -> Self {
        Self {
            resolution: 128,
            cloud_resolution: 96,
            projection: CubeProjection::Spherified,
            ..Default::default()
        }
    }

    pub fn sanitized(&self) -> Self {
        let speed = self.cloud_rotation_speed;
        Self {
            resolution: clamp_resolution(self.resolution),
            cloud_resolution: clamp_resolution(self.cloud_resolution),
            cloud_size: clamp_f32("cloudSize", self.cloud_size, 1.0, 4.0, DEFAULT_CLOUD_SIZE),
            basis: self.basis,
            projection: self.projection,
            cloud_rotation_speed: if speed.is_finite() { speed } else { Vec3::ZERO },
        }
    }

    /// Vertices and triangles for one body: six terrain faces plus six cloud faces.
    pub fn mesh_budget(&self) -> MeshBudget {
        let terrain = clamp_resolution(self.resolution) as usize;
        let clouds = clamp_resolution(self.cloud_resolution) as usize;
        MeshBudget {
            terrain_vertices: 6 * terrain * terrain,
            terrain_triangles: 12 * (terrain - 1) * (terrain - 1),
            cloud_vertices: 6 * clouds * clouds,
            cloud_triangles: 12 * (clouds - 1) * (clouds - 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshBudget {
    pub terrain_vertices: usize,
    pub terrain_triangles: usize,
    pub cloud_vertices: usize,
    pub cloud_triangles: usize,
}

impl MeshBudget {
    pub fn total_vertices(&self) -> usize {
        self.terrain_vertices + self.cloud_vertices
    }

    pub fn total_triangles(&self) -> usize {
        self.terrain_triangles + self.cloud_triangles
    }

    /// Approximate GPU buffer size: position + RGBA color per vertex, u32 indices.
    pub fn buffer_bytes(&self) -> usize {
        self.total_vertices() * (12 + 16) + self.total_triangles() * 3 * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SynthesisConfig::default();
        assert_eq!(config.resolution, 40);
        assert_eq!(config.cloud_resolution, 60);
        assert_eq!(config.cloud_size, 1.05);
        assert_eq!(config.basis, NoiseBasis::Projected);
    }

    #[test]
    fn test_sanitized_clamps() {
        let config = SynthesisConfig {
            resolution: 1,
            cloud_resolution: 4096,
            cloud_size: f32::NAN,
            cloud_rotation_speed: Vec3::new(f32::INFINITY, 0.0, 0.0),
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config.resolution, 2);
        assert_eq!(config.cloud_resolution, 256);
        assert_eq!(config.cloud_size, DEFAULT_CLOUD_SIZE);
        assert_eq!(config.cloud_rotation_speed, Vec3::ZERO);
    }

    #[test]
    fn test_mesh_budget() {
        let config = SynthesisConfig {
            resolution: 2,
            cloud_resolution: 3,
            ..Default::default()
        };
        let budget = config.mesh_budget();
        assert_eq!(budget.terrain_vertices, 24);
        assert_eq!(budget.terrain_triangles, 12);
        assert_eq!(budget.cloud_vertices, 54);
        assert_eq!(budget.cloud_triangles, 48);
        assert_eq!(budget.total_vertices(), 78);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SynthesisConfig = serde_json::from_str(r#"{ "resolution": 64, "basis": "simplex" }"#).unwrap();
        assert_eq!(config.resolution, 64);
        assert_eq!(config.basis, NoiseBasis::Simplex);
        assert_eq!(config.cloud_resolution, 60);
    }
}
