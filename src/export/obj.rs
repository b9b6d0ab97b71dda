//! Wavefront OBJ export with per-vertex colors.
//!
//! Colors use the common `v x y z r g b` extension understood by Blender and
//! MeshLab. OBJ has no alpha channel, so cloud opacity is only exported in the
//! cloud PNGs.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::geometry::CubeFace;
use crate::planet::BodyGeometry;
use crate::terrain::MeshData;

#[derive(Error, Debug)]
pub enum ObjExportError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("mesh '{0}' has mismatched colors or out-of-range indices")]
    InconsistentMesh(String),
}

#[derive(Debug, Clone)]
pub struct ObjExportOptions {
    /// Write `vn` records and reference them from faces.
    pub normals: bool,
    /// Uniform scale applied to positions, e.g. the body radius.
    pub scale: f32,
}

impl Default for ObjExportOptions {
    fn default() -> Self {
        Self {
            normals: true,
            scale: 1.0,
        }
    }
}

/// Writes named meshes as separate objects of one OBJ stream.
pub fn write_obj<W: Write>(
    writer: &mut W,
    meshes: &[(String, &MeshData)],
    options: &ObjExportOptions,
) -> Result<(), ObjExportError> {
    writeln!(writer, "# planetgen")?;
    let mut base = 1usize;

    for (name, mesh) in meshes {
        if !mesh.is_consistent() {
            return Err(ObjExportError::InconsistentMesh(name.clone()));
        }
        writeln!(writer, "o {name}")?;
        for (v, c) in mesh.vertices.iter().zip(&mesh.colors) {
            let p = *v * options.scale;
            writeln!(writer, "v {} {} {} {} {} {}", p.x, p.y, p.z, c.x, c.y, c.z)?;
        }
        if options.normals {
            for n in mesh.normals() {
                writeln!(writer, "vn {} {} {}", n.x, n.y, n.z)?;
            }
        }
        for tri in mesh.indices.chunks_exact(3) {
            let (a, b, c) = (
                tri[0] as usize + base,
                tri[1] as usize + base,
                tri[2] as usize + base,
            );
            if options.normals {
                writeln!(writer, "f {a}//{a} {b}//{b} {c}//{c}")?;
            } else {
                writeln!(writer, "f {a} {b} {c}")?;
            }
        }
        base += mesh.vertex_count();
    }

    writer.flush()?;
    Ok(())
}

fn write_obj_file(path: &Path, meshes: &[(String, &MeshData)], options: &ObjExportOptions) -> Result<(), ObjExportError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_obj(&mut writer, meshes, options)
}

/// Writes `{base_name}.obj` (six terrain faces) and `{base_name}_clouds.obj`.
pub fn export_body_obj(
    geometry: &BodyGeometry,
    output_dir: &Path,
    base_name: &str,
    options: &ObjExportOptions,
) -> Result<Vec<PathBuf>, ObjExportError> {
    std::fs::create_dir_all(output_dir)?;

    let terrain: Vec<(String, &MeshData)> = geometry
        .terrain
        .iter()
        .map(|f| (format!("terrain_{}", f.id.short_name()), &f.mesh))
        .collect();
    let terrain_path = output_dir.join(format!("{base_name}.obj"));
    write_obj_file(&terrain_path, &terrain, options)?;

    let clouds: Vec<(String, &MeshData)> = CubeFace::ALL
        .iter()
        .zip(&geometry.clouds.faces)
        .map(|(face, mesh)| (format!("clouds_{}", face.short_name()), mesh))
        .collect();
    let clouds_path = output_dir.join(format!("{base_name}_clouds.obj"));
    write_obj_file(&clouds_path, &clouds, options)?;

    Ok(vec![terrain_path, clouds_path])
}
