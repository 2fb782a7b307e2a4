//! Configuration module for texdir

mod analyzer_config;

pub use analyzer_config::{
    AnalyzerConfig, AnalyzerPreset, HIGH_FREQUENCY_CUTOFF_RATIO, MAX_WINDOW_SIZE,
    MIN_FREQUENCY_RADIUS, SPATIAL_ANGLE_OFFSET,
};
