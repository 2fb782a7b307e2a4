//! Texture analysis algorithms
//!
//! - `direction` - dominant direction of a single patch
//! - `field` - directions over a regular grid with aggregate statistics

mod direction;
mod field;

pub use direction::{AnalyzerBuilder, DirectionResult, SectorHistogram, TextureAnalyzer};
pub use field::{DirectionField, FieldSample, FieldSummary};
