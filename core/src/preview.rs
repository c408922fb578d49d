use image::{Rgb, RgbImage};

use crate::error::{Result, TerrainError};
use crate::heightfield::HeightField;
use crate::utils::{ColorMode, TerrainPalette, to_rgb8};

// Top-down picture of a finished field, one pixel per vertex.
// x runs along i, y along j with +j at the top of the image.
pub fn render_top_down(field: &HeightField, mode: ColorMode) -> Result<RgbImage> {
    let Some(normals) = field.normals() else {
        return Err(TerrainError::invalid(
            "height field has no normals, estimate them before rendering",
        ));
    };

    let size = field.size();
    let palette = TerrainPalette::new();
    let mut img = RgbImage::new(size as u32, size as u32);
    for i in 0..size {
        for j in 0..size {
            let rgb = palette.color(mode, field.get(i, j), normals[i][j]);
            img.put_pixel(i as u32, (size - 1 - j) as u32, Rgb(to_rgb8(rgb)));
        }
    }
    Ok(img)
}

// Elevations as 8-bit gray, black at -0.5 and white at 0.5
pub fn render_grayscale(field: &HeightField) -> image::GrayImage {
    let size = field.size();
    image::GrayImage::from_fn(size as u32, size as u32, |x, y| {
        let h = field.get(x as usize, size - 1 - y as usize);
        let gray = ((h + 0.5).clamp(0.0, 1.0) * 255.0).round() as u8;
        image::Luma([gray])
    })
}
