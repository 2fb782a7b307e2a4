//! Error types for the texdir library

use thiserror::Error;

/// Errors raised by the FFT engine, the analyzer and their I/O helpers
#[derive(Debug, Error)]
pub enum TexdirError {
    /// Radix-2 transforms only accept power-of-two lengths
    #[error("transform length {len} is not a power of two")]
    NotPowerOfTwo { len: usize },

    #[error("real and imaginary buffers differ in length ({real} vs {imag})")]
    LengthMismatch { real: usize, imag: usize },

    #[error("buffer holds {actual} samples but {expected} are required")]
    BufferTooSmall { expected: usize, actual: usize },

    #[error("buffer of {len} samples does not hold a {width}x{height} grid")]
    ShapeMismatch { width: usize, height: usize, len: usize },

    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("invalid analyzer configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TexdirError>;
