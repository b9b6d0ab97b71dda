//! Displaced, colored terrain for one cube face.

use glam::{Vec3, Vec4};
use rayon::prelude::*;

use super::mesh::MeshData;
use crate::color::{BiomeColorMapper, ColorConfig};
use crate::geometry::{CubeFace, CubeProjection, FaceGrid};
use crate::noise::{FractalNoiseField, NoiseConfig};

/// A built terrain face: the render mesh plus the elevation sampled at each vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainFace {
    pub id: CubeFace,
    /// Grid side length actually used (after clamping).
    pub resolution: u32,
    pub mesh: MeshData,
    /// Elevation above the unit sphere, row-major like the vertices.
    pub elevations: Vec<f32>,
}

impl TerrainFace {
    /// Elevation at grid cell `(x, y)`.
    pub fn elevation(&self, x: u32, y: u32) -> f32 {
        debug_assert!(x < self.resolution && y < self.resolution);
        self.elevations[(y * self.resolution + x) as usize]
    }

    /// Returns `(min, max)` elevation on this face.
    pub fn elevation_range(&self) -> (f32, f32) {
        self.elevations
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &e| (lo.min(e), hi.max(e)))
    }

    /// Fraction of vertices at sea level (zero elevation).
    pub fn ocean_fraction(&self) -> f32 {
        if self.elevations.is_empty() {
            return 0.0;
        }
        let flooded = self.elevations.iter().filter(|&&e| e <= 0.0).count();
        flooded as f32 / self.elevations.len() as f32
    }
}

/// Builds one face of the terrain cube-sphere.
///
/// Every grid point is projected onto the unit sphere, lifted by the fractal
/// field to `1 + elevation`, and colored from the biome gradient.
#[derive(Debug, Clone, Copy)]
pub struct TerrainFaceBuilder<'a> {
    pub grid: FaceGrid,
    pub projection: CubeProjection,
    pub field: &'a FractalNoiseField,
    pub noise: &'a NoiseConfig,
    pub colors: &'a ColorConfig,
}

impl<'a> TerrainFaceBuilder<'a> {
    pub fn new(
        face: CubeFace,
        resolution: u32,
        field: &'a FractalNoiseField,
        noise: &'a NoiseConfig,
        colors: &'a ColorConfig,
    ) -> Self {
        Self {
            grid: FaceGrid::new(face, resolution),
            projection: CubeProjection::default(),
            field,
            noise,
            colors,
        }
    }

    pub fn with_projection(mut self, projection: CubeProjection) -> Self {
        self.projection = projection;
        self
    }

    pub fn build(&self) -> TerrainFace {
        let grid = self.grid;
        let mapper = BiomeColorMapper::new(self.colors, self.noise.strength);

        let on_sphere: Vec<Vec3> = (0..grid.vertex_count())
            .into_par_iter()
            .map(|i| {
                let (x, y) = grid.coords(i);
                grid.point_on_sphere(x, y, self.projection)
            })
            .collect();
        let elevations = self.field.evaluate_batch(&on_sphere, self.noise);

        let (vertices, colors): (Vec<Vec3>, Vec<Vec4>) = on_sphere
            .par_iter()
            .zip(&elevations)
            .map(|(&p, &elevation)| (p * (1.0 + elevation), mapper.evaluate(elevation).to_vec4()))
            .unzip();

        TerrainFace {
            id: grid.face,
            resolution: grid.resolution,
            mesh: MeshData {
                vertices,
                colors,
                indices: grid.triangle_indices(),
            },
            elevations,
        }
    }
}
