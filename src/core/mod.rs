//! Core analysis modules

pub mod analysis;
pub mod dsp;
pub mod grayscale;
pub mod visualization;

pub use analysis::{
    AnalyzerBuilder, DirectionField, DirectionResult, FieldSample, FieldSummary, SectorHistogram,
    TextureAnalyzer,
};
pub use grayscale::GrayImage;
