//! Translucent cloud shell around a body.

use glam::Vec4;
use rayon::prelude::*;

use super::mesh::MeshData;
use crate::geometry::{CubeFace, CubeProjection, FaceGrid};
use crate::noise::{FractalNoiseField, NoiseConfig};

/// Default shell radius relative to the unit sphere.
pub const DEFAULT_CLOUD_SIZE: f32 = 1.05;
/// Default grid side length for cloud faces.
pub const DEFAULT_CLOUD_RESOLUTION: u32 = 60;

/// Smallest usable gap between cloud strength and threshold before the
/// fade range is replaced by 1.
const MIN_FADE_RANGE: f32 = 0.001;

/// Opacity of a cloud vertex for a given noise sample.
///
/// Below the threshold the sky is clear. Above it the alpha ramps linearly
/// over `strength - threshold` and is scaled by `opacity`, giving soft edges
/// instead of a hard coverage mask.
pub fn cloud_alpha(noise: f32, threshold: f32, strength: f32, opacity: f32) -> f32 {
    if noise <= threshold {
        return 0.0;
    }
    let mut range = strength - threshold;
    if range <= MIN_FADE_RANGE || !range.is_finite() {
        range = 1.0;
    }
    ((noise - threshold) / range).clamp(0.0, 1.0) * opacity
}

/// Six white, alpha-modulated faces of the cloud shell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CloudShell {
    pub resolution: u32,
    pub size: f32,
    pub faces: Vec<MeshData>,
}

impl CloudShell {
    /// Share of vertices with any cloud at all.
    pub fn coverage(&self) -> f32 {
        let (covered, total) = self.faces.iter().fold((0usize, 0usize), |(c, t), mesh| {
            (c + mesh.colors.iter().filter(|col| col.w > 0.0).count(), t + mesh.colors.len())
        });
        if total == 0 {
            0.0
        } else {
            covered as f32 / total as f32
        }
    }

    pub fn face(&self, id: CubeFace) -> Option<&MeshData> {
        self.faces.get(id.index())
    }
}

/// Builds the cloud shell: same grid as the terrain, no displacement,
/// per-vertex alpha from the cloud noise.
#[derive(Debug, Clone, Copy)]
pub struct CloudShellBuilder<'a> {
    pub resolution: u32,
    pub size: f32,
    pub projection: CubeProjection,
    pub field: &'a FractalNoiseField,
    pub noise: &'a NoiseConfig,
    pub threshold: f32,
    pub opacity: f32,
}

impl<'a> CloudShellBuilder<'a> {
    pub fn new(field: &'a FractalNoiseField, noise: &'a NoiseConfig, threshold: f32, opacity: f32) -> Self {
        Self {
            resolution: DEFAULT_CLOUD_RESOLUTION,
            size: DEFAULT_CLOUD_SIZE,
            projection: CubeProjection::default(),
            field,
            noise,
            threshold,
            opacity,
        }
    }

    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_projection(mut self, projection: CubeProjection) -> Self {
        self.projection = projection;
        self
    }

    /// Builds a single face of the shell.
    pub fn build_face(&self, face: CubeFace) -> MeshData {
        let grid = FaceGrid::new(face, self.resolution);

        let (vertices, colors): (Vec<_>, Vec<_>) = (0..grid.vertex_count())
            .into_par_iter()
            .map(|i| {
                let (x, y) = grid.coords(i);
                let on_sphere = grid.point_on_sphere(x, y, self.projection);
                let value = self.field.evaluate(on_sphere, self.noise);
                let alpha = cloud_alpha(value, self.threshold, self.noise.strength, self.opacity);
                (on_sphere * self.size, Vec4::new(1.0, 1.0, 1.0, alpha))
            })
            .unzip();

        MeshData {
            vertices,
            colors,
            indices: grid.triangle_indices(),
        }
    }

    /// Builds all six faces.
    pub fn build(&self) -> CloudShell {
        let faces = CubeFace::ALL.par_iter().map(|&face| self.build_face(face)).collect();
        CloudShell {
            resolution: FaceGrid::new(CubeFace::Up, self.resolution).resolution,
            size: self.size,
            faces,
        }
    }
}
