//! PNG export of per-face height, color and cloud maps.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageBuffer, ImageEncoder, Luma};
use thiserror::Error;

use crate::planet::BodyGeometry;
use crate::terrain::{MeshData, TerrainFace};

#[derive(Error, Debug)]
pub enum PngExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid height range: min ({0}) >= max ({1})")]
    InvalidHeightRange(f32, f32),
    #[error("mesh has {vertices} vertices, expected {expected} for a {resolution}x{resolution} face")]
    NotAGrid {
        vertices: usize,
        expected: usize,
        resolution: u32,
    },
}

#[derive(Debug, Clone)]
pub struct PngExportOptions {
    /// Elevation mapped to black.
    pub min_height: f32,
    /// Elevation mapped to white.
    pub max_height: f32,
    pub compression: CompressionType,
    pub filter: FilterType,
}

impl Default for PngExportOptions {
    fn default() -> Self {
        Self {
            min_height: 0.0,
            max_height: 1.0,
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
        }
    }
}

impl PngExportOptions {
    /// Stretches the body's elevation range over the full 16 bits.
    ///
    /// A flat body (all ocean) gets a unit range so it exports as black.
    pub fn auto_range(geometry: &BodyGeometry) -> Self {
        let (min, max) = geometry.elevation_range;
        let max = if max > min { max } else { min + 1.0 };
        Self {
            min_height: min,
            max_height: max,
            ..Default::default()
        }
    }
}

fn check_grid(mesh: &MeshData, resolution: u32) -> Result<(), PngExportError> {
    let expected = (resolution as usize) * (resolution as usize);
    if mesh.vertex_count() != expected {
        return Err(PngExportError::NotAGrid {
            vertices: mesh.vertex_count(),
            expected,
            resolution,
        });
    }
    Ok(())
}

fn write_png(
    path: &Path,
    bytes: &[u8],
    resolution: u32,
    color: image::ExtendedColorType,
    options: &PngExportOptions,
) -> Result<(), PngExportError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);
    encoder.write_image(bytes, resolution, resolution, color)?;
    Ok(())
}

/// Writes a face's elevations as a 16-bit grayscale PNG.
///
/// # Arguments
/// * `face` - The terrain face to export
/// * `path` - Output file path
/// * `options` - Height range used for normalization, plus encoder settings
///
/// # Returns
/// `Ok(())` on success, or an error if the range is empty or writing fails
pub fn export_face_height_png(
    face: &TerrainFace,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), PngExportError> {
    let min = options.min_height;
    let max = options.max_height;
    if min >= max {
        return Err(PngExportError::InvalidHeightRange(min, max));
    }

    let resolution = face.resolution;
    let range = max - min;

    // Normalize to [0, 1] then scale to the full u16 range
    let mut img: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::new(resolution, resolution);
    for y in 0..resolution {
        for x in 0..resolution {
            let normalized = ((face.elevation(x, y) - min) / range).clamp(0.0, 1.0);
            img.put_pixel(x, y, Luma([(normalized * 65535.0) as u16]));
        }
    }

    let byte_slice: &[u8] = bytemuck::cast_slice(img.as_raw());
    write_png(path, byte_slice, resolution, image::ExtendedColorType::L16, options)
}

/// Writes a mesh's vertex colors as an 8-bit RGBA PNG, one pixel per vertex.
pub fn export_mesh_color_png(
    mesh: &MeshData,
    resolution: u32,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), PngExportError> {
    check_grid(mesh, resolution)?;
    let pixels: Vec<u8> = mesh
        .colors
        .iter()
        .flat_map(|&c| crate::color::Rgba::from(c).to_rgba8())
        .collect();
    write_png(path, &pixels, resolution, image::ExtendedColorType::Rgba8, options)
}

/// Writes cloud alpha as an 8-bit grayscale PNG.
pub fn export_mesh_alpha_png(
    mesh: &MeshData,
    resolution: u32,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), PngExportError> {
    check_grid(mesh, resolution)?;
    let pixels: Vec<u8> = mesh
        .colors
        .iter()
        .map(|c| (c.w.clamp(0.0, 1.0) * 255.0).round() as u8)
        .collect();
    write_png(path, &pixels, resolution, image::ExtendedColorType::L8, options)
}

/// Exports every face of a body.
///
/// Files are named `{base_name}_{face}_height.png`, `{base_name}_{face}_color.png`
/// and `{base_name}_{face}_clouds.png`, for example `planet_0_up_color.png`.
/// Returns the written paths.
pub fn export_body_png(
    geometry: &BodyGeometry,
    output_dir: &Path,
    base_name: &str,
    options: &PngExportOptions,
) -> Result<Vec<PathBuf>, PngExportError> {
    std::fs::create_dir_all(output_dir)?;
    let mut written = Vec::with_capacity(18);

    for face in &geometry.terrain {
        let name = face.id.short_name();

        let path = output_dir.join(format!("{base_name}_{name}_height.png"));
        export_face_height_png(face, &path, options)?;
        written.push(path);

        let path = output_dir.join(format!("{base_name}_{name}_color.png"));
        export_mesh_color_png(&face.mesh, face.resolution, &path, options)?;
        written.push(path);
    }

    for (face, mesh) in crate::geometry::CubeFace::ALL.iter().zip(&geometry.clouds.faces) {
        let path = output_dir.join(format!("{base_name}_{}_clouds.png", face.short_name()));
        export_mesh_alpha_png(mesh, geometry.clouds.resolution, &path, options)?;
        written.push(path);
    }

    Ok(written)
}
