// src/core/visualization/overlay.rs
//
// Direction field drawn as short line segments over the source image

use std::path::Path;

use image::{Rgb, RgbImage};

use crate::core::analysis::DirectionField;
use crate::core::grayscale::GrayImage;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct OverlayConfig {
    /// Colour of segments for samples that reported a direction
    pub line_color: Rgb<u8>,
    /// Colour of a centre dot for undirected samples; `None` hides them
    pub undirected_color: Option<Rgb<u8>>,
    /// Segment length as a fraction of the grid step
    pub length_ratio: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            line_color: Rgb([255, 64, 32]),
            undirected_color: Some(Rgb([64, 160, 255])),
            length_ratio: 0.8,
        }
    }
}

/// Draw every field sample on top of a grayscale copy of `image`
pub fn render_direction_field(
    image: &GrayImage,
    field: &DirectionField,
    config: &OverlayConfig,
) -> RgbImage {
    let luma = image.to_luma8();
    let mut canvas = RgbImage::from_fn(luma.width(), luma.height(), |x, y| {
        let l = luma.get_pixel(x, y).0[0];
        Rgb([l, l, l])
    });

    let half_length = field.step as f64 * config.length_ratio / 2.0;
    for sample in &field.samples {
        let (x, y) = (sample.x as f64, sample.y as f64);
        if sample.result.has_direction {
            let (ux, uy) = sample.result.unit_vector();
            draw_line(
                &mut canvas,
                (x - ux * half_length, y - uy * half_length),
                (x + ux * half_length, y + uy * half_length),
                config.line_color,
            );
        } else if let Some(color) = config.undirected_color {
            put_pixel_checked(&mut canvas, x.round() as i64, y.round() as i64, color);
        }
    }
    canvas
}

pub fn save_direction_field<P: AsRef<Path>>(
    image: &GrayImage,
    field: &DirectionField,
    config: &OverlayConfig,
    output_path: P,
) -> Result<()> {
    render_direction_field(image, field, config).save(output_path.as_ref())?;
    Ok(())
}

fn draw_line(canvas: &mut RgbImage, from: (f64, f64), to: (f64, f64), color: Rgb<u8>) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let x = (from.0 + dx * t).round() as i64;
        let y = (from.1 + dy * t).round() as i64;
        put_pixel_checked(canvas, x, y, color);
    }
}

fn put_pixel_checked(canvas: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < canvas.width() && (y as u32) < canvas.height() {
        canvas.put_pixel(x as u32, y as u32, color);
    }
}
