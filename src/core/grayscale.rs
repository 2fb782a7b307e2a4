// src/core/grayscale.rs
//
// Owned grayscale buffers and image file loading.

use std::path::Path;

use image::{DynamicImage, ImageBuffer, Luma};

use crate::error::{Result, TexdirError};

/// Row-major grayscale image; pixel `(x, y)` lives at `y * width + x`.
///
/// Intensities keep whatever scale they were built with. Files loaded from
/// disk are mapped to `0.0..=255.0` regardless of their bit depth.
#[derive(Debug, Clone, PartialEq)]
pub struct GrayImage {
    width: usize,
    height: usize,
    pixels: Vec<f64>,
}

impl GrayImage {
    /// Wrap an owned buffer; its length must be exactly `width * height`
    pub fn new(width: usize, height: usize, pixels: Vec<f64>) -> Result<Self> {
        check_dimensions(width, height)?;
        let expected = width * height;
        if pixels.len() != expected {
            return Err(TexdirError::ShapeMismatch {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Copy the first `width * height` samples of any numeric buffer
    pub fn from_slice<T: Copy + Into<f64>>(data: &[T], width: usize, height: usize) -> Result<Self> {
        check_dimensions(width, height)?;
        let expected = width * height;
        if data.len() < expected {
            return Err(TexdirError::BufferTooSmall {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels: data[..expected].iter().map(|&v| v.into()).collect(),
        })
    }

    /// Build an image by evaluating `f(x, y)` at every pixel
    pub fn from_fn<F>(width: usize, height: usize, f: F) -> Result<Self>
    where
        F: Fn(usize, usize) -> f64,
    {
        check_dimensions(width, height)?;
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Decode an image file and convert it to luma
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let img = image::open(path.as_ref())?;
        Self::from_dynamic(&img)
    }

    pub fn from_dynamic(img: &DynamicImage) -> Result<Self> {
        let luma = img.to_luma32f();
        let (width, height) = (luma.width() as usize, luma.height() as usize);
        let pixels = luma.pixels().map(|p| p.0[0] as f64 * 255.0).collect();
        Self::new(width, height, pixels)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[f64] {
        &self.pixels
    }

    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.pixels[y * self.width + x]
    }

    /// Sample with replicate-edge boundary handling
    pub fn sample_clamped(&self, x: i64, y: i64) -> f64 {
        let sx = x.clamp(0, self.width as i64 - 1) as usize;
        let sy = y.clamp(0, self.height as i64 - 1) as usize;
        self.pixels[sy * self.width + sx]
    }

    /// Stretch the intensity range onto 8-bit luma for display
    pub fn to_luma8(&self) -> ImageBuffer<Luma<u8>, Vec<u8>> {
        let (min, max) = self
            .pixels
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        let range = max - min;
        ImageBuffer::from_fn(self.width as u32, self.height as u32, |x, y| {
            let v = self.get(x as usize, y as usize);
            let normalized = if range > 0.0 { (v - min) / range } else { 0.5 };
            Luma([(normalized * 255.0).round().clamp(0.0, 255.0) as u8])
        })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_luma8().save(path.as_ref())?;
        Ok(())
    }
}

fn check_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 || width > u32::MAX as usize || height > u32::MAX as usize {
        return Err(TexdirError::InvalidDimensions { width, height });
    }
    Ok(())
}
