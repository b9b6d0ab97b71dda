//! Export of synthesized bodies to files.
//!
//! Meshes go to Wavefront OBJ with vertex colors. Per-face height, color and
//! cloud maps go to PNG.

mod obj;
mod png;

pub use obj::{export_body_obj, write_obj, ObjExportError, ObjExportOptions};
pub use png::{
    export_body_png, export_face_height_png, export_mesh_alpha_png, export_mesh_color_png, PngExportError,
    PngExportOptions,
};
