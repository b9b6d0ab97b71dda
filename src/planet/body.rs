//! A synthesized body: its parameters, geometry and placement.

use std::sync::Arc;

use glam::{EulerRot, Quat, Vec3};

use super::params::PlanetParameterSet;
use crate::geometry::CubeFace;
use crate::system::{RenderHandle, RenderLayer};
use crate::terrain::{CloudShell, MeshData, TerrainFace};

/// Placement of a body in the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: 1.0,
    };

    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// `child` expressed in the space this transform lives in.
    pub fn compose(&self, child: &Transform) -> Transform {
        Transform {
            position: self.position + self.rotation * (child.position * self.scale),
            rotation: self.rotation * child.rotation,
            scale: self.scale * child.scale,
        }
    }
}

/// Built meshes of one body. Shared immutably and replaced wholesale on rebuild.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyGeometry {
    /// Six terrain faces in [`CubeFace::ALL`] order.
    pub terrain: Vec<TerrainFace>,
    pub clouds: CloudShell,
    /// Lowest and highest terrain elevation over all faces.
    pub elevation_range: (f32, f32),
}

impl BodyGeometry {
    pub fn terrain_mesh(&self, face: CubeFace) -> Option<&MeshData> {
        self.terrain.get(face.index()).map(|f| &f.mesh)
    }

    pub fn vertex_count(&self) -> usize {
        let terrain: usize = self.terrain.iter().map(|f| f.mesh.vertex_count()).sum();
        let clouds: usize = self.clouds.faces.iter().map(MeshData::vertex_count).sum();
        terrain + clouds
    }

    pub fn triangle_count(&self) -> usize {
        let terrain: usize = self.terrain.iter().map(|f| f.mesh.triangle_count()).sum();
        let clouds: usize = self.clouds.faces.iter().map(MeshData::triangle_count).sum();
        terrain + clouds
    }

    /// Share of terrain vertices at sea level.
    pub fn ocean_fraction(&self) -> f32 {
        let (flooded, total) = self.terrain.iter().fold((0.0, 0usize), |(acc, n), f| {
            (acc + f.ocean_fraction() * f.elevations.len() as f32, n + f.elevations.len())
        });
        if total == 0 {
            0.0
        } else {
            flooded / total as f32
        }
    }
}

/// One live body owned by the instance manager.
#[derive(Debug, Clone)]
pub struct BodyInstance {
    /// Private copy of the parameters the geometry was built from.
    pub params: PlanetParameterSet,
    pub geometry: Arc<BodyGeometry>,
    pub transform: Transform,
    /// Cloud shell placement relative to the body.
    pub cloud_transform: Transform,
    /// Degrees per second around x, y and z.
    pub cloud_rotation_speed: Vec3,
    /// Renderables currently published for this body, with the part each shows.
    pub handles: Vec<(RenderLayer, RenderHandle)>,
}

impl BodyInstance {
    pub fn name(&self) -> &str {
        &self.params.name
    }

    /// Spins the cloud shell by `dt` seconds worth of rotation.
    pub fn advance(&mut self, dt: f32) {
        let step = self.cloud_rotation_speed * dt;
        let delta = Quat::from_euler(
            EulerRot::YXZ,
            step.y.to_radians(),
            step.x.to_radians(),
            step.z.to_radians(),
        );
        self.cloud_transform.rotation = (self.cloud_transform.rotation * delta).normalize();
    }

    /// Published cloud renderables.
    pub fn cloud_handles(&self) -> impl Iterator<Item = RenderHandle> + '_ {
        self.handles
            .iter()
            .filter(|(layer, _)| matches!(layer, RenderLayer::Clouds(_)))
            .map(|&(_, handle)| handle)
    }

    /// Cloud shell placement in world space.
    pub fn cloud_world_transform(&self) -> Transform {
        self.transform.compose(&self.cloud_transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_compose_offsets_child() {
        let parent = Transform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::IDENTITY,
            scale: 2.0,
        };
        let c = parent.compose(&Transform::at(Vec3::X));
        assert!((c.position - Vec3::new(3.0, 2.0, 3.0)).length() < 1e-6);
        assert_eq!(c.scale, 2.0);
    }

    #[test]
    fn test_compose_with_identity() {
        let t = Transform {
            position: Vec3::new(4.0, 0.0, -1.0),
            rotation: Quat::from_rotation_y(FRAC_PI_2),
            scale: 3.0,
        };
        let c = t.compose(&Transform::IDENTITY);
        assert!((c.position - t.position).length() < 1e-6);
        assert!(c.rotation.abs_diff_eq(t.rotation, 1e-6));
        assert_eq!(c.scale, 3.0);
    }

    #[test]
    fn test_advance_rotates_clouds_only() {
        let geometry = Arc::new(BodyGeometry {
            terrain: Vec::new(),
            clouds: CloudShell::default(),
            elevation_range: (0.0, 0.0),
        });
        let mut body = BodyInstance {
            params: PlanetParameterSet::default(),
            geometry,
            transform: Transform::at(Vec3::new(5.0, 0.0, 0.0)),
            cloud_transform: Transform::IDENTITY,
            cloud_rotation_speed: Vec3::new(0.0, 90.0, 0.0),
            handles: Vec::new(),
        };
        body.advance(1.0);
        let expected = Quat::from_rotation_y(FRAC_PI_2);
        assert!(body.cloud_transform.rotation.abs_diff_eq(expected, 1e-5));
        assert_eq!(body.transform.rotation, Quat::IDENTITY);

        let world = body.cloud_world_transform();
        assert!((world.position - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-6);
    }
}
