//! Serializable analysis reports consumed by the CLI

use serde::Serialize;

use crate::config::AnalyzerConfig;
use crate::core::analysis::{DirectionField, DirectionResult, FieldSample, FieldSummary};

/// Coarse classification of a single result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Directionality {
    /// Strength reached the threshold
    Directional,
    /// Some band energy, but no dominant sector
    Weak,
    /// No energy in the analysed band
    Flat,
}

impl Directionality {
    pub fn of(result: &DirectionResult) -> Self {
        if result.has_direction {
            Directionality::Directional
        } else if result.strength > 0.0 {
            Directionality::Weak
        } else {
            Directionality::Flat
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Directionality::Directional => "✓",
            Directionality::Weak => "~",
            Directionality::Flat => "—",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Directionality::Directional => "Dominant direction found",
            Directionality::Weak => "No dominant direction",
            Directionality::Flat => "Flat patch",
        }
    }

    pub fn color_code(&self) -> &'static str {
        match self {
            Directionality::Directional => "\x1b[32m", // green
            Directionality::Weak => "\x1b[33m",        // yellow
            Directionality::Flat => "\x1b[90m",        // gray
        }
    }
}

/// Result of analysing one point of one image
#[derive(Debug, Clone, Serialize)]
pub struct PointReport {
    pub file: String,
    pub x: i64,
    pub y: i64,
    pub window_size: usize,
    pub num_sectors: usize,
    pub threshold: f64,
    pub angle: f64,
    pub orientation_degrees: f64,
    pub has_direction: bool,
    pub strength: f64,
    pub directionality: Directionality,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector_energies: Option<Vec<f64>>,
}

impl PointReport {
    pub fn new(
        file: impl Into<String>,
        x: i64,
        y: i64,
        config: &AnalyzerConfig,
        result: &DirectionResult,
    ) -> Self {
        Self {
            file: file.into(),
            x,
            y,
            window_size: config.window_size,
            num_sectors: config.num_sectors,
            threshold: config.threshold,
            angle: result.angle,
            orientation_degrees: result.orientation().to_degrees(),
            has_direction: result.has_direction,
            strength: result.strength,
            directionality: Directionality::of(result),
            sector_energies: None,
        }
    }

    pub fn with_sector_energies(mut self, energies: Vec<f64>) -> Self {
        self.sector_energies = Some(energies);
        self
    }
}

/// Direction field summary for one image
#[derive(Debug, Clone, Serialize)]
pub struct FieldReport {
    pub file: String,
    pub width: usize,
    pub height: usize,
    pub step: usize,
    pub columns: usize,
    pub rows: usize,
    pub summary: FieldSummary,
    pub dominant_orientation_degrees: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub samples: Option<Vec<FieldSample>>,
}

impl FieldReport {
    pub fn new(file: impl Into<String>, field: &DirectionField) -> Self {
        let summary = field.summary();
        Self {
            file: file.into(),
            width: field.width,
            height: field.height,
            step: field.step,
            columns: field.columns,
            rows: field.rows,
            dominant_orientation_degrees: summary.dominant_orientation.map(f64::to_degrees),
            summary,
            samples: None,
        }
    }

    pub fn with_samples(mut self, field: &DirectionField) -> Self {
        self.samples = Some(field.samples.clone());
        self
    }
}
