//! Digital Signal Processing utilities

mod engine;
mod fft;
mod windows;

pub use engine::{EngineKind, Radix2Engine, RustFftEngine, SpectralEngine};
pub use fft::{
    fft1d, fft1d_in_place_unchecked, fft2d, fft2d_in_place_unchecked, is_power_of_two,
    next_power_of_2, power_spectrum,
};
pub use windows::WindowFunction;

/// Circularly shift a row-major grid by half its size in both axes so the
/// zero-frequency bin lands at `(width / 2, height / 2)`.
pub fn fft_shift(values: &[f64], width: usize, height: usize) -> Vec<f64> {
    debug_assert_eq!(values.len(), width * height);
    let (cx, cy) = (width / 2, height / 2);
    let mut shifted = vec![0.0; values.len()];
    for y in 0..height {
        let src_y = (y + cy) % height;
        for x in 0..width {
            let src_x = (x + cx) % width;
            shifted[y * width + x] = values[src_y * width + src_x];
        }
    }
    shifted
}

/// `log10(1 + p)` of every power value, the usual compression for display
pub fn log_power(power: &[f64]) -> Vec<f64> {
    power.iter().map(|&p| (1.0 + p.max(0.0)).log10()).collect()
}
