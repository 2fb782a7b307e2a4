// src/config/analyzer_config.rs
//
// Analyzer settings, presets and JSON persistence

use std::f64::consts::FRAC_PI_2;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::dsp::{next_power_of_2, EngineKind, WindowFunction};
use crate::error::{Result, TexdirError};

/// Rotation from the dominant frequency-domain sector to the spatial
/// texture direction: stripes run perpendicular to their spectral ridge.
pub const SPATIAL_ANGLE_OFFSET: f64 = FRAC_PI_2;

/// Bins farther than this fraction of the FFT size from DC are ignored
pub const HIGH_FREQUENCY_CUTOFF_RATIO: f64 = 0.25;

/// Bins closer than this to DC are ignored
pub const MIN_FREQUENCY_RADIUS: f64 = 1.0;

/// Largest accepted patch side
pub const MAX_WINDOW_SIZE: usize = 1024;

/// Preset configurations for common use cases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerPreset {
    /// 18px patch, 10° sectors
    Standard,
    /// Small patch for fine detail and brush-sized sampling
    Fine,
    /// Large patch with 5° sectors and a stricter threshold
    Coarse,
}

impl AnalyzerPreset {
    pub fn all() -> Vec<Self> {
        vec![Self::Standard, Self::Fine, Self::Coarse]
    }

    pub fn name(&self) -> &'static str {
        match self {
            AnalyzerPreset::Standard => "standard",
            AnalyzerPreset::Fine => "fine",
            AnalyzerPreset::Coarse => "coarse",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AnalyzerPreset::Standard => "18px window, 36 sectors, threshold 1.5",
            AnalyzerPreset::Fine => "8px window, 16 sectors, threshold 1.5",
            AnalyzerPreset::Coarse => "32px window, 72 sectors, threshold 2.0",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "standard" | "default" => Some(Self::Standard),
            "fine" => Some(Self::Fine),
            "coarse" => Some(Self::Coarse),
            _ => None,
        }
    }
}

/// Immutable per-analyzer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Side of the square patch sampled around each point
    pub window_size: usize,
    /// Number of equal angular bins covering a full turn
    pub num_sectors: usize,
    /// Peak-to-mean sector energy ratio needed to report a direction
    pub threshold: f64,
    /// Window applied to the patch on both axes
    pub window: WindowFunction,
    /// Transform back end
    pub engine: EngineKind,
    /// Bins with a distance from DC below this are dropped
    pub min_radius: f64,
    /// Bins beyond `max_radius_ratio * fft_size` are dropped
    pub max_radius_ratio: f64,
    /// Added to the dominant sector angle to get the spatial direction
    pub angle_offset: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self::from_preset(AnalyzerPreset::Standard)
    }
}

impl AnalyzerConfig {
    pub fn from_preset(preset: AnalyzerPreset) -> Self {
        let (window_size, num_sectors, threshold) = match preset {
            AnalyzerPreset::Standard => (18, 36, 1.5),
            AnalyzerPreset::Fine => (8, 16, 1.5),
            AnalyzerPreset::Coarse => (32, 72, 2.0),
        };
        Self {
            window_size,
            num_sectors,
            threshold,
            window: WindowFunction::Hann,
            engine: EngineKind::Radix2,
            min_radius: MIN_FREQUENCY_RADIUS,
            max_radius_ratio: HIGH_FREQUENCY_CUTOFF_RATIO,
            angle_offset: SPATIAL_ANGLE_OFFSET,
        }
    }

    /// Side of the zero-padded transform grid
    pub fn fft_size(&self) -> usize {
        next_power_of_2(self.window_size)
    }

    /// Angular width of one sector in radians
    pub fn sector_width(&self) -> f64 {
        std::f64::consts::TAU / self.num_sectors as f64
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_size < 2 || self.window_size > MAX_WINDOW_SIZE {
            return Err(TexdirError::InvalidConfig(format!(
                "window_size must be within 2..={}, got {}",
                MAX_WINDOW_SIZE, self.window_size
            )));
        }
        if self.num_sectors == 0 {
            return Err(TexdirError::InvalidConfig(
                "num_sectors must be at least 1".to_string(),
            ));
        }
        if !(self.threshold.is_finite() && self.threshold > 0.0) {
            return Err(TexdirError::InvalidConfig(format!(
                "threshold must be a positive number, got {}",
                self.threshold
            )));
        }
        if !(self.min_radius.is_finite() && self.min_radius >= 0.0) {
            return Err(TexdirError::InvalidConfig(format!(
                "min_radius must be non-negative, got {}",
                self.min_radius
            )));
        }
        if !(self.max_radius_ratio.is_finite() && self.max_radius_ratio > 0.0) {
            return Err(TexdirError::InvalidConfig(format!(
                "max_radius_ratio must be positive, got {}",
                self.max_radius_ratio
            )));
        }
        if !self.angle_offset.is_finite() {
            return Err(TexdirError::InvalidConfig(
                "angle_offset must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
