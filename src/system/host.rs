//! Boundary to whatever actually draws the meshes.

use std::collections::BTreeMap;

use crate::geometry::CubeFace;
use crate::planet::Transform;
use crate::terrain::MeshData;

/// Opaque id of a renderable created by a [`RenderHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderHandle(pub u64);

/// Which part of a body a renderable shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderLayer {
    Terrain(CubeFace),
    /// Translucent; expects alpha blending.
    Clouds(CubeFace),
}

/// Factory for renderables.
///
/// The manager creates one renderable per terrain face and per cloud face and
/// destroys them before republishing a rebuilt body. Placement changes that
/// leave the mesh alone, such as spinning clouds, go through
/// [`RenderHost::set_transform`].
pub trait RenderHost {
    fn create_renderable(&mut self, mesh: &MeshData, transform: &Transform, layer: RenderLayer) -> RenderHandle;
    fn set_transform(&mut self, handle: RenderHandle, transform: &Transform);
    fn destroy(&mut self, handle: RenderHandle);
}

/// Discards everything. Useful for headless generation.
#[derive(Debug, Default)]
pub struct NullHost {
    next: u64,
}

impl RenderHost for NullHost {
    fn create_renderable(&mut self, _mesh: &MeshData, _transform: &Transform, _layer: RenderLayer) -> RenderHandle {
        self.next += 1;
        RenderHandle(self.next)
    }

    fn set_transform(&mut self, _handle: RenderHandle, _transform: &Transform) {}

    fn destroy(&mut self, _handle: RenderHandle) {}
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRenderable {
    pub layer: RenderLayer,
    pub transform: Transform,
    pub vertex_count: usize,
    pub triangle_count: usize,
    /// Size of the vertex and index buffers a GPU upload would need.
    pub buffer_bytes: usize,
}

/// Keeps a record of live renderables.
#[derive(Debug, Default)]
pub struct RecordingHost {
    next: u64,
    pub live: BTreeMap<RenderHandle, RecordedRenderable>,
    pub created: usize,
    pub destroyed: usize,
}

impl RecordingHost {
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl RenderHost for RecordingHost {
    fn create_renderable(&mut self, mesh: &MeshData, transform: &Transform, layer: RenderLayer) -> RenderHandle {
        self.next += 1;
        let handle = RenderHandle(self.next);
        self.live.insert(
            handle,
            RecordedRenderable {
                layer,
                transform: *transform,
                vertex_count: mesh.vertex_count(),
                triangle_count: mesh.triangle_count(),
                buffer_bytes: mesh.position_bytes().len() + mesh.color_bytes().len() + mesh.index_bytes().len(),
            },
        );
        self.created += 1;
        handle
    }

    fn set_transform(&mut self, handle: RenderHandle, transform: &Transform) {
        match self.live.get_mut(&handle) {
            Some(renderable) => renderable.transform = *transform,
            None => tracing::warn!(?handle, "set_transform called for unknown renderable"),
        }
    }

    fn destroy(&mut self, handle: RenderHandle) {
        if self.live.remove(&handle).is_some() {
            self.destroyed += 1;
        } else {
            tracing::warn!(?handle, "destroy called for unknown renderable");
        }
    }
}
