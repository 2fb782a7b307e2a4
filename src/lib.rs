//! texdir - Detect the dominant texture direction in grayscale images
//!
//! A small spectral analysis library: a radix-2 FFT engine plus a local
//! texture direction analyzer built on top of it. The analyzer windows a
//! square patch around a pixel, takes its 2D power spectrum and looks for an
//! angular sector that holds clearly more energy than the rest.
//!
//! ## Features
//!
//! - **FFT engine**: in-place radix-2 1D and separable 2D transforms on split
//!   real/imaginary buffers, with a rustfft-backed alternative
//! - **Local direction**: angle, strength and a directional flag per pixel
//! - **Direction fields**: grid-wide analysis in parallel with circular statistics
//! - **Visualisation**: direction overlays and local spectrum images
//! - **Presets and JSON configs**: Standard, Fine and Coarse analyzer settings
//!
//! ## Module Structure
//!
//! - `core` - FFT, windows, analysis and visualisation
//! - `cli` - Command-line interface
//! - `config` - Analyzer configuration and presets
//! - `report` - Serializable result types
//! - `testgen` - Synthetic pattern generation
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use texdir::{AnalyzerPreset, GrayImage, TextureAnalyzer};
//!
//! let image = GrayImage::open("wood.png")?;
//! let analyzer = TextureAnalyzer::builder()
//!     .config(texdir::AnalyzerConfig::from_preset(AnalyzerPreset::Fine))
//!     .build()?;
//!
//! let result = analyzer.analyze_at(&image, 120, 80);
//! if result.has_direction {
//!     println!("{:.1}° (strength {:.2})", result.orientation().to_degrees(), result.strength);
//! }
//! ```
//!
//! ## Angle Convention
//!
//! `angle` is the peak spectral sector's centre-edge angle plus π/2, which
//! turns the frequency-domain direction into the direction the texture runs
//! in image space (x right, y down). Values lie in `[π/2, 5π/2)`;
//! [`DirectionResult::orientation`] folds them into `[0, π)`.

// Core analysis functionality
pub mod core;

// Command-line interface
pub mod cli;

// Configuration and presets
pub mod config;

// Serializable reports
pub mod report;

// Synthetic test patterns
pub mod testgen;

pub mod error;

// Re-export commonly used types at crate root for convenience
pub use config::{AnalyzerConfig, AnalyzerPreset};
pub use core::dsp::{fft1d, fft2d, next_power_of_2, power_spectrum, EngineKind, WindowFunction};
pub use core::{
    AnalyzerBuilder, DirectionField, DirectionResult, FieldSummary, GrayImage, SectorHistogram,
    TextureAnalyzer,
};
pub use error::{Result, TexdirError};
