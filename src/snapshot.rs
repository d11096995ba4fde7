//! Orthographic debug splat of the particle buffers to PNG.
//!
//! Looks down the z axis and adds `color × alpha` of every particle into the
//! pixel under it. A debugging aid for headless runs, not a renderer.

use std::path::Path;

use image::{Rgb, RgbImage};

use crate::error::SnapshotError;
use crate::surface::ParticleGrid;

/// Border around the particle bounds, as a fraction of the larger extent
const FRAME_MARGIN: f32 = 0.05;

/// Accumulated brightness mapped to full white
const EXPOSURE: f32 = 1.0;

/// Largest accepted image side, in pixels
pub const MAX_SIDE: u32 = 16_384;

/// Splat every particle of `grids` into a `width × height` image.
pub fn render(grids: &[ParticleGrid], width: u32, height: u32) -> Result<RgbImage, SnapshotError> {
    if width == 0 || height == 0 {
        return Err(SnapshotError::EmptySize(width, height));
    }
    if width > MAX_SIDE || height > MAX_SIDE {
        return Err(SnapshotError::TooLarge(width, height));
    }

    let mut image = RgbImage::new(width, height);
    let Some((min, max)) = bounds(grids) else {
        return Ok(image);
    };

    let extent = (max[0] - min[0]).max(max[1] - min[1]).max(f32::EPSILON);
    let margin = extent * FRAME_MARGIN;
    let span_x = (max[0] - min[0]) + 2.0 * margin;
    let span_y = (max[1] - min[1]) + 2.0 * margin;
    let scale = (width as f32 / span_x.max(f32::EPSILON)).min(height as f32 / span_y.max(f32::EPSILON));

    // Center the scaled bounds in the image
    let offset_x = (width as f32 - span_x * scale) / 2.0;
    let offset_y = (height as f32 - span_y * scale) / 2.0;

    let mut accum = vec![[0.0f32; 3]; width as usize * height as usize];
    for grid in grids {
        for ((position, color), alpha) in grid
            .positions()
            .iter()
            .zip(grid.colors())
            .zip(grid.alphas())
        {
            let px = offset_x + (position[0] - min[0] + margin) * scale;
            // Image rows grow downward; world y grows upward
            let py = height as f32 - (offset_y + (position[1] - min[1] + margin) * scale);
            if !(px >= 0.0 && py >= 0.0 && px < width as f32 && py < height as f32) {
                continue;
            }
            let slot = &mut accum[py as usize * width as usize + px as usize];
            for channel in 0..3 {
                slot[channel] += color[channel] * alpha;
            }
        }
    }

    for (pixel, sum) in image.pixels_mut().zip(&accum) {
        *pixel = Rgb((*sum).map(|value| ((value / EXPOSURE).clamp(0.0, 1.0) * 255.0) as u8));
    }
    Ok(image)
}

/// Render and save as PNG, creating the parent directory if needed.
pub fn write_png(
    grids: &[ParticleGrid],
    width: u32,
    height: u32,
    path: &Path,
) -> Result<(), SnapshotError> {
    let image = render(grids, width, height)?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    image.save(path)?;
    Ok(())
}

/// Min and max x/y over every finite particle position
fn bounds(grids: &[ParticleGrid]) -> Option<([f32; 2], [f32; 2])> {
    let mut result: Option<([f32; 2], [f32; 2])> = None;
    for position in grids.iter().flat_map(|grid| grid.positions()) {
        if !(position[0].is_finite() && position[1].is_finite()) {
            continue;
        }
        let (min, max) = result.get_or_insert(([position[0], position[1]], [position[0], position[1]]));
        min[0] = min[0].min(position[0]);
        min[1] = min[1].min(position[1]);
        max[0] = max[0].max(position[0]);
        max[1] = max[1].max(position[1]);
    }
    result
}
