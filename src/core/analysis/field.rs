// src/core/analysis/field.rs
//
// Direction field: local analysis repeated over a regular grid of points.

use std::f64::consts::PI;

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::direction::{DirectionResult, TextureAnalyzer};
use crate::core::grayscale::GrayImage;
use crate::error::{Result, TexdirError};

/// One analysed grid point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldSample {
    pub x: usize,
    pub y: usize,
    pub result: DirectionResult,
}

/// Aggregate statistics over a direction field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSummary {
    pub samples: usize,
    pub directional: usize,
    /// Share of samples that reported a direction
    pub directional_fraction: f64,
    /// Mean strength over all samples
    pub mean_strength: f64,
    /// Axial mean of directional samples in `[0, π)`; `None` if there are none
    pub dominant_orientation: Option<f64>,
    /// `1 - R` of the doubled-angle mean resultant: 0 = all samples agree,
    /// 1 = no common orientation (also used when nothing is directional)
    pub circular_variance: f64,
}

/// Grid of local directions, row-major over sample rows and columns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionField {
    pub width: usize,
    pub height: usize,
    pub step: usize,
    pub columns: usize,
    pub rows: usize,
    pub samples: Vec<FieldSample>,
}

/// Sample positions `offset, offset + step, ...` below `extent`, starting
/// half a step in so the grid is centred
fn grid_positions(extent: usize, step: usize) -> Vec<usize> {
    let offset = (step / 2).min(extent.saturating_sub(1));
    (offset..extent).step_by(step).collect()
}

impl DirectionField {
    /// Analyze every grid point of `image`, spaced `step` pixels apart.
    ///
    /// Points are processed in parallel; the analyzer is shared read-only.
    pub fn compute(analyzer: &TextureAnalyzer, image: &GrayImage, step: usize) -> Result<Self> {
        if step == 0 {
            return Err(TexdirError::InvalidConfig(
                "field step must be at least 1".to_string(),
            ));
        }
        let xs = grid_positions(image.width(), step);
        let ys = grid_positions(image.height(), step);
        let (columns, rows) = (xs.len(), ys.len());

        let samples: Vec<FieldSample> = (0..columns * rows)
            .into_par_iter()
            .map(|i| {
                let (x, y) = (xs[i % columns], ys[i / columns]);
                FieldSample {
                    x,
                    y,
                    result: analyzer.analyze_at(image, x as i64, y as i64),
                }
            })
            .collect();

        debug!(
            "direction field {}x{} over {}x{} image (step {})",
            columns,
            rows,
            image.width(),
            image.height(),
            step
        );

        Ok(Self {
            width: image.width(),
            height: image.height(),
            step,
            columns,
            rows,
            samples,
        })
    }

    pub fn get(&self, column: usize, row: usize) -> Option<&FieldSample> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.samples.get(row * self.columns + column)
    }

    pub fn summary(&self) -> FieldSummary {
        let samples = self.samples.len();
        let mut directional = 0usize;
        let mut strength_sum = 0.0;
        let mut sum_cos = 0.0;
        let mut sum_sin = 0.0;

        for sample in &self.samples {
            strength_sum += sample.result.strength;
            if sample.result.has_direction {
                directional += 1;
                // Doubling maps θ and θ + π onto the same point
                let (s, c) = (2.0 * sample.result.angle).sin_cos();
                sum_cos += c;
                sum_sin += s;
            }
        }

        let (dominant_orientation, circular_variance) = if directional > 0 {
            let n = directional as f64;
            let resultant = (sum_cos / n).hypot(sum_sin / n);
            let orientation = (sum_sin.atan2(sum_cos) / 2.0).rem_euclid(PI);
            (Some(orientation), (1.0 - resultant).clamp(0.0, 1.0))
        } else {
            (None, 1.0)
        };

        FieldSummary {
            samples,
            directional,
            directional_fraction: if samples > 0 {
                directional as f64 / samples as f64
            } else {
                0.0
            },
            mean_strength: if samples > 0 {
                strength_sum / samples as f64
            } else {
                0.0
            },
            dominant_orientation,
            circular_variance,
        }
    }
}
