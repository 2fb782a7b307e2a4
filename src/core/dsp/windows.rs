//! Window function implementations

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Window functions applied to a patch before transforming it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowFunction {
    Rectangular,
    /// Raised cosine, zero at both ends
    #[default]
    Hann,
    Hamming,
    Blackman,
}

impl WindowFunction {
    /// Generate `size` symmetric coefficients (denominator `size - 1`)
    pub fn generate(&self, size: usize) -> Vec<f64> {
        if size <= 1 {
            return vec![1.0; size];
        }
        let span = (size - 1) as f64;
        (0..size)
            .map(|i| {
                let x = 2.0 * PI * i as f64 / span;
                match self {
                    WindowFunction::Rectangular => 1.0,
                    WindowFunction::Hann => 0.5 * (1.0 - x.cos()),
                    WindowFunction::Hamming => 0.54 - 0.46 * x.cos(),
                    WindowFunction::Blackman => 0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos(),
                }
            })
            .collect()
    }

    pub fn name(&self) -> &'static str {
        match self {
            WindowFunction::Rectangular => "rectangular",
            WindowFunction::Hann => "hann",
            WindowFunction::Hamming => "hamming",
            WindowFunction::Blackman => "blackman",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "rectangular" | "rect" | "none" => Some(Self::Rectangular),
            "hann" | "hanning" => Some(Self::Hann),
            "hamming" => Some(Self::Hamming),
            "blackman" => Some(Self::Blackman),
            _ => None,
        }
    }
}

impl std::fmt::Display for WindowFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
