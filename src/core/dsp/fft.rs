//! Radix-2 FFT over split real/imaginary buffers
//!
//! All transforms work in place: the caller keeps ownership of both buffers
//! and lends them mutably for the duration of the call. The two buffers are
//! distinct slices, so they can never alias.
//!
//! Forward transforms are unscaled; inverse transforms are scaled by `1/n`,
//! so a forward/inverse pair reproduces the input.

use std::f64::consts::PI;

use crate::error::{Result, TexdirError};

/// True when `n` is a non-zero power of two
pub fn is_power_of_two(n: usize) -> bool {
    n != 0 && n & (n - 1) == 0
}

/// Smallest power of two that is `>= n` (`1` for `n <= 1`)
pub fn next_power_of_2(n: usize) -> usize {
    let mut p = 1;
    while p < n {
        p <<= 1;
    }
    p
}

fn check_pair(real: &[f64], imag: &[f64]) -> Result<usize> {
    if real.len() != imag.len() {
        return Err(TexdirError::LengthMismatch {
            real: real.len(),
            imag: imag.len(),
        });
    }
    Ok(real.len())
}

/// In-place 1D FFT of the complex sequence `(real, imag)`.
///
/// The length must be a power of two; lengths `0` and `1` are a no-op.
pub fn fft1d(real: &mut [f64], imag: &mut [f64], inverse: bool) -> Result<()> {
    let n = check_pair(real, imag)?;
    if n <= 1 {
        return Ok(());
    }
    if !is_power_of_two(n) {
        return Err(TexdirError::NotPowerOfTwo { len: n });
    }
    fft1d_in_place_unchecked(real, imag, inverse);
    Ok(())
}

/// Iterative Cooley-Tukey kernel behind [`fft1d`].
///
/// Callers must have checked that both buffers share a power-of-two length.
/// A non power-of-two length gives numerically wrong output (checked only in
/// debug builds).
pub fn fft1d_in_place_unchecked(real: &mut [f64], imag: &mut [f64], inverse: bool) {
    let n = real.len();
    debug_assert_eq!(n, imag.len());
    if n <= 1 {
        return;
    }
    debug_assert!(is_power_of_two(n), "fft length {} is not a power of two", n);

    // Bit-reversal permutation, carrying j along in reversed bit order
    let mut j = 0usize;
    for i in 0..n - 1 {
        if i < j {
            real.swap(i, j);
            imag.swap(i, j);
        }
        let mut k = n >> 1;
        while k <= j {
            j -= k;
            k >>= 1;
        }
        j += k;
    }

    let dir = if inverse { 1.0 } else { -1.0 };
    let mut len = 2;
    while len <= n {
        let half_len = len / 2;
        let (w_imag, w_real) = (dir * 2.0 * PI / len as f64).sin_cos();

        for start in (0..n).step_by(len) {
            // Twiddle is rotated incrementally instead of calling sin/cos per k
            let mut cur_real = 1.0;
            let mut cur_imag = 0.0;

            for k in 0..half_len {
                let even = start + k;
                let odd = even + half_len;

                let t_real = cur_real * real[odd] - cur_imag * imag[odd];
                let t_imag = cur_real * imag[odd] + cur_imag * real[odd];

                real[odd] = real[even] - t_real;
                imag[odd] = imag[even] - t_imag;
                real[even] += t_real;
                imag[even] += t_imag;

                let next_real = cur_real * w_real - cur_imag * w_imag;
                cur_imag = cur_real * w_imag + cur_imag * w_real;
                cur_real = next_real;
            }
        }
        len <<= 1;
    }

    if inverse {
        let scale = 1.0 / n as f64;
        for v in real.iter_mut().chain(imag.iter_mut()) {
            *v *= scale;
        }
    }
}

/// In-place separable 2D FFT of a row-major `width x height` complex grid.
///
/// Rows are transformed first, then columns (gathered into a scratch
/// buffer, transformed and scattered back). Both dimensions must be powers
/// of two.
pub fn fft2d(
    real: &mut [f64],
    imag: &mut [f64],
    width: usize,
    height: usize,
    inverse: bool,
) -> Result<()> {
    let len = check_pair(real, imag)?;
    if width.checked_mul(height) != Some(len) {
        return Err(TexdirError::ShapeMismatch { width, height, len });
    }
    if len == 0 {
        return Ok(());
    }
    for dim in [width, height] {
        if !is_power_of_two(dim) {
            return Err(TexdirError::NotPowerOfTwo { len: dim });
        }
    }
    fft2d_in_place_unchecked(real, imag, width, height, inverse);
    Ok(())
}

/// Kernel behind [`fft2d`]; shapes must already be validated.
pub fn fft2d_in_place_unchecked(
    real: &mut [f64],
    imag: &mut [f64],
    width: usize,
    height: usize,
    inverse: bool,
) {
    debug_assert_eq!(real.len(), width * height);
    debug_assert_eq!(imag.len(), width * height);

    // Rows are contiguous, so they transform without a copy
    for (row_real, row_imag) in real
        .chunks_exact_mut(width)
        .zip(imag.chunks_exact_mut(width))
    {
        fft1d_in_place_unchecked(row_real, row_imag, inverse);
    }

    let mut col_real = vec![0.0; height];
    let mut col_imag = vec![0.0; height];
    for x in 0..width {
        for y in 0..height {
            col_real[y] = real[y * width + x];
            col_imag[y] = imag[y * width + x];
        }
        fft1d_in_place_unchecked(&mut col_real, &mut col_imag, inverse);
        for y in 0..height {
            real[y * width + x] = col_real[y];
            imag[y * width + x] = col_imag[y];
        }
    }
}

/// Squared magnitude `re² + im²` of every sample.
///
/// Inputs are left untouched. Both buffers are expected to be the same
/// length; any excess in the longer one is ignored.
pub fn power_spectrum(real: &[f64], imag: &[f64]) -> Vec<f64> {
    debug_assert_eq!(real.len(), imag.len());
    real.iter()
        .zip(imag.iter())
        .map(|(&re, &im)| re * re + im * im)
        .collect()
}
