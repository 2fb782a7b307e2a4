// src/core/visualization/spectrum.rs
//
// Local power spectrum rendering for visual inspection of a patch

use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};

use crate::core::analysis::TextureAnalyzer;
use crate::core::dsp::log_power;
use crate::core::grayscale::GrayImage;
use crate::error::{Result, TexdirError};

/// Largest rendered image side in pixels
pub const MAX_SPECTRUM_SIDE: u32 = 16384;

/// Spectrum image configuration
#[derive(Debug, Clone)]
pub struct SpectrumImageConfig {
    /// Output pixels per frequency bin
    pub scale: u32,
    pub colormap: Colormap,
    /// Compress with `log10(1 + p)` before normalising
    pub log_scale: bool,
}

impl Default for SpectrumImageConfig {
    fn default() -> Self {
        Self {
            scale: 8,
            colormap: Colormap::default(),
            log_scale: true,
        }
    }
}

/// Color map for spectrum images
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Colormap {
    #[default]
    Viridis,
    Grayscale,
}

/// Render the DC-centred power spectrum of the patch around `(cx, cy)`.
///
/// Fails when `fft_size * scale` exceeds [`MAX_SPECTRUM_SIDE`].
pub fn render_spectrum(
    analyzer: &TextureAnalyzer,
    image: &GrayImage,
    cx: i64,
    cy: i64,
    config: &SpectrumImageConfig,
) -> Result<RgbImage> {
    let n = analyzer.fft_size();
    let scale = config.scale.max(1);
    let side = u32::try_from(n)
        .ok()
        .and_then(|n| n.checked_mul(scale))
        .filter(|&side| side <= MAX_SPECTRUM_SIDE)
        .ok_or_else(|| {
            TexdirError::InvalidConfig(format!(
                "spectrum scale {} for a {}-bin transform exceeds {} px",
                scale, n, MAX_SPECTRUM_SIDE
            ))
        })?;

    let power = analyzer.local_spectrum(image, cx, cy);
    let values = if config.log_scale {
        log_power(&power)
    } else {
        power
    };
    let max = values.iter().cloned().fold(0.0f64, f64::max);

    Ok(ImageBuffer::from_fn(side, side, |x, y| {
        let bin = (y / scale) as usize * n + (x / scale) as usize;
        let normalized = if max > 0.0 { values[bin] / max } else { 0.0 };
        value_to_color(normalized, config.colormap)
    }))
}

pub fn save_spectrum<P: AsRef<Path>>(
    analyzer: &TextureAnalyzer,
    image: &GrayImage,
    cx: i64,
    cy: i64,
    config: &SpectrumImageConfig,
    output_path: P,
) -> Result<()> {
    render_spectrum(analyzer, image, cx, cy, config)?.save(output_path.as_ref())?;
    Ok(())
}

fn value_to_color(value: f64, colormap: Colormap) -> Rgb<u8> {
    let v = value.clamp(0.0, 1.0);
    match colormap {
        Colormap::Viridis => {
            let r = (68.0 + v * (235.0 - 68.0)) as u8;
            let g = (1.0 + v * (237.0 - 1.0)) as u8;
            let b = (84.0 + v * (32.0 - 84.0 + (1.0 - v) * 150.0)) as u8;
            Rgb([r, g, b])
        }
        Colormap::Grayscale => {
            let l = (v * 255.0).round() as u8;
            Rgb([l, l, l])
        }
    }
}
