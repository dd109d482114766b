use std::path::Path;

use anyhow::Context;
use image::{Rgb, RgbImage};
use log::info;

use super::scene::{Color, Scene, Segment};

fn to_rgb(color: Color) -> Rgb<u8> {
    Rgb(color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8))
}

fn blend(dst: &mut Rgb<u8>, src: Rgb<u8>, coverage: f32) {
    for (d, s) in dst.0.iter_mut().zip(src.0) {
        *d = (*d as f32 * (1.0 - coverage) + s as f32 * coverage).round() as u8;
    }
}

/// Draws the scene on the CPU. Segments are drawn as round-capped strokes
/// with a one pixel soft edge.
pub fn rasterize(scene: &Scene, width: u32, height: u32) -> RgbImage {
    let mut image = RgbImage::from_pixel(width, height, to_rgb(scene.background()));
    let (w, h) = (width as f32, height as f32);

    for fill in &scene.fills {
        let [x0, y0, x1, y1] = fill.rect;
        let color = to_rgb(fill.color);
        let (px0, px1) = ((x0 * w).round() as u32, (x1 * w).round() as u32);
        let (py0, py1) = (((1.0 - y1) * h).round() as u32, ((1.0 - y0) * h).round() as u32);
        for y in py0..py1.min(height) {
            for x in px0..px1.min(width) {
                image.put_pixel(x, y, color);
            }
        }
    }

    for segment in &scene.segments {
        stroke(&mut image, segment);
    }

    image
}

fn stroke(image: &mut RgbImage, segment: &Segment) {
    let (w, h) = (image.width() as f32, image.height() as f32);
    let color = to_rgb(segment.color);

    let a = (segment.from[0] * w, (1.0 - segment.from[1]) * h);
    let b = (segment.to[0] * w, (1.0 - segment.to[1]) * h);
    let radius = (segment.width * h * 0.5).max(0.5);

    let min_x = (a.0.min(b.0) - radius - 1.0).floor().max(0.0) as u32;
    let max_x = (a.0.max(b.0) + radius + 1.0).ceil().min(w - 1.0).max(0.0) as u32;
    let min_y = (a.1.min(b.1) - radius - 1.0).floor().max(0.0) as u32;
    let max_y = (a.1.max(b.1) + radius + 1.0).ceil().min(h - 1.0).max(0.0) as u32;

    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let length2 = dx * dx + dy * dy;

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
            let t = if length2 > 0.0 {
                (((px - a.0) * dx + (py - a.1) * dy) / length2).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let (cx, cy) = (a.0 + t * dx - px, a.1 + t * dy - py);
            let distance = (cx * cx + cy * cy).sqrt();

            let coverage = (radius + 0.5 - distance).clamp(0.0, 1.0);
            if coverage > 0.0 {
                blend(image.get_pixel_mut(x, y), color, coverage);
            }
        }
    }
}

/// Rasterizes the scene and writes it as a PNG.
pub fn export_png(scene: &Scene, path: &Path, width: u32, height: u32) -> anyhow::Result<()> {
    let image = rasterize(scene, width, height);
    image
        .save(path)
        .with_context(|| format!("writing preview image to {}", path.display()))?;
    info!("Wrote {}x{} preview to {}", width, height, path.display());
    Ok(())
}
