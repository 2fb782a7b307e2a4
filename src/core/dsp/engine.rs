//! Interchangeable 2D spectral engines
//!
//! The analyzer only needs "forward 2D transform of a square grid". The
//! in-house radix-2 engine is the reference; the `rustfft` engine plans
//! mixed-radix transforms and is used to cross-check it.

use std::sync::{Arc, Mutex};

use num_complex::Complex;
use rustfft::{Fft, FftDirection, FftPlanner};
use serde::{Deserialize, Serialize};

use super::fft::fft2d;
use crate::error::{Result, TexdirError};

/// Available transform back ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    #[default]
    Radix2,
    RustFft,
}

impl EngineKind {
    pub fn build(&self) -> Box<dyn SpectralEngine> {
        match self {
            EngineKind::Radix2 => Box::new(Radix2Engine),
            EngineKind::RustFft => Box::new(RustFftEngine::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EngineKind::Radix2 => "radix2",
            EngineKind::RustFft => "rustfft",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "radix2" | "radix-2" => Some(Self::Radix2),
            "rustfft" => Some(Self::RustFft),
            _ => None,
        }
    }
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// In-place 2D transform over a row-major split complex grid.
///
/// Inverse transforms are scaled by `1 / (width * height)`.
pub trait SpectralEngine: Send + Sync {
    fn kind(&self) -> EngineKind;

    fn transform_2d(
        &self,
        real: &mut [f64],
        imag: &mut [f64],
        width: usize,
        height: usize,
        inverse: bool,
    ) -> Result<()>;
}

/// Engine backed by [`fft2d`]; both dimensions must be powers of two
#[derive(Debug, Default, Clone, Copy)]
pub struct Radix2Engine;

impl SpectralEngine for Radix2Engine {
    fn kind(&self) -> EngineKind {
        EngineKind::Radix2
    }

    fn transform_2d(
        &self,
        real: &mut [f64],
        imag: &mut [f64],
        width: usize,
        height: usize,
        inverse: bool,
    ) -> Result<()> {
        fft2d(real, imag, width, height, inverse)
    }
}

/// Engine backed by `rustfft` plans; accepts any dimensions
pub struct RustFftEngine {
    planner: Mutex<FftPlanner<f64>>,
}

impl RustFftEngine {
    pub fn new() -> Self {
        Self {
            planner: Mutex::new(FftPlanner::new()),
        }
    }

    fn plan(&self, len: usize, direction: FftDirection) -> Arc<dyn Fft<f64>> {
        // The planner caches plans; the lock is only held while fetching one
        let mut planner = self.planner.lock().unwrap_or_else(|e| e.into_inner());
        planner.plan_fft(len, direction)
    }
}

impl Default for RustFftEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SpectralEngine for RustFftEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::RustFft
    }

    fn transform_2d(
        &self,
        real: &mut [f64],
        imag: &mut [f64],
        width: usize,
        height: usize,
        inverse: bool,
    ) -> Result<()> {
        if real.len() != imag.len() {
            return Err(TexdirError::LengthMismatch {
                real: real.len(),
                imag: imag.len(),
            });
        }
        let len = real.len();
        if width.checked_mul(height) != Some(len) {
            return Err(TexdirError::ShapeMismatch { width, height, len });
        }
        if len == 0 {
            return Ok(());
        }

        let direction = if inverse {
            FftDirection::Inverse
        } else {
            FftDirection::Forward
        };

        let mut buffer: Vec<Complex<f64>> = real
            .iter()
            .zip(imag.iter())
            .map(|(&re, &im)| Complex::new(re, im))
            .collect();

        let row_fft = self.plan(width, direction);
        let mut scratch = vec![Complex::default(); row_fft.get_inplace_scratch_len()];
        for row in buffer.chunks_exact_mut(width) {
            row_fft.process_with_scratch(row, &mut scratch);
        }

        let col_fft = self.plan(height, direction);
        scratch.resize(col_fft.get_inplace_scratch_len(), Complex::default());
        let mut column = vec![Complex::default(); height];
        for x in 0..width {
            for (y, c) in column.iter_mut().enumerate() {
                *c = buffer[y * width + x];
            }
            col_fft.process_with_scratch(&mut column, &mut scratch);
            for (y, c) in column.iter().enumerate() {
                buffer[y * width + x] = *c;
            }
        }

        let scale = if inverse { 1.0 / len as f64 } else { 1.0 };
        for ((re, im), c) in real.iter_mut().zip(imag.iter_mut()).zip(buffer.iter()) {
            *re = c.re * scale;
            *im = c.im * scale;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid(width: usize, height: usize) -> (Vec<f64>, Vec<f64>) {
        let real = (0..width * height)
            .map(|i| (i as f64 * 0.37).sin() + (i % width) as f64 * 0.1)
            .collect();
        let imag = (0..width * height).map(|i| (i as f64 * 0.11).cos()).collect();
        (real, imag)
    }

    #[test]
    fn test_engines_agree() {
        let (w, h) = (16, 8);
        let (mut re_a, mut im_a) = sample_grid(w, h);
        let (mut re_b, mut im_b) = (re_a.clone(), im_a.clone());

        Radix2Engine.transform_2d(&mut re_a, &mut im_a, w, h, false).unwrap();
        RustFftEngine::new()
            .transform_2d(&mut re_b, &mut im_b, w, h, false)
            .unwrap();

        for i in 0..w * h {
            assert!((re_a[i] - re_b[i]).abs() < 1e-9);
            assert!((im_a[i] - im_b[i]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rustfft_inverse_is_normalized() {
        let (w, h) = (6, 5);
        let (original_re, original_im) = sample_grid(w, h);
        let (mut re, mut im) = (original_re.clone(), original_im.clone());
        let engine = RustFftEngine::new();
        engine.transform_2d(&mut re, &mut im, w, h, false).unwrap();
        engine.transform_2d(&mut re, &mut im, w, h, true).unwrap();
        for i in 0..w * h {
            assert!((re[i] - original_re[i]).abs() < 1e-9);
            assert!((im[i] - original_im[i]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_kind_names() {
        for kind in [EngineKind::Radix2, EngineKind::RustFft] {
            assert_eq!(EngineKind::from_name(kind.name()), Some(kind));
            assert_eq!(kind.build().kind(), kind);
        }
    }
}
