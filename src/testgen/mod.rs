// src/testgen/mod.rs
//
// Synthetic pattern generation for texdir
// Produces images with known texture orientation plus a JSON manifest of
// the expected outcome, for tests and for eyeballing the analyzer.

use std::f64::consts::TAU;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::grayscale::GrayImage;

const MID_GRAY: f64 = 128.0;
const AMPLITUDE: f64 = 100.0;

/// Synthetic texture patterns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Pattern {
    /// Constant intensity
    Flat { level: f64 },
    /// Sinusoidal stripes running along `angle_degrees` (0 = horizontal,
    /// 90 = vertical, measured with y pointing down)
    Stripes { period: f64, angle_degrees: f64 },
    /// Square checkerboard with `cell` pixel squares
    Checkerboard { cell: usize },
    /// Concentric sinusoidal rings around the image centre
    Rings { period: f64 },
}

impl Pattern {
    pub fn short_name(&self) -> String {
        match self {
            Pattern::Flat { level } => format!("flat_{}", level.round() as i64),
            Pattern::Stripes {
                period,
                angle_degrees,
            } => format!("stripes_p{}_a{}", period.round() as i64, angle_degrees.round() as i64),
            Pattern::Checkerboard { cell } => format!("checker_{}", cell),
            Pattern::Rings { period } => format!("rings_p{}", period.round() as i64),
        }
    }

    /// Intensity at pixel `(x, y)` of a `size x size` image
    pub fn value_at(&self, x: usize, y: usize, size: usize) -> f64 {
        let (fx, fy) = (x as f64, y as f64);
        match self {
            Pattern::Flat { level } => *level,
            Pattern::Stripes {
                period,
                angle_degrees,
            } => {
                // Intensity varies along the stripe normal only
                let (s, c) = angle_degrees.to_radians().sin_cos();
                let along_normal = -fx * s + fy * c;
                MID_GRAY + AMPLITUDE * (TAU * along_normal / period).sin()
            }
            Pattern::Checkerboard { cell } => {
                let cell = (*cell).max(1);
                if (x / cell + y / cell) % 2 == 0 {
                    MID_GRAY + AMPLITUDE
                } else {
                    MID_GRAY - AMPLITUDE
                }
            }
            Pattern::Rings { period } => {
                let c = size as f64 / 2.0;
                let r = (fx - c).hypot(fy - c);
                MID_GRAY + AMPLITUDE * (TAU * r / period).sin()
            }
        }
    }

    pub fn render(&self, size: usize) -> Result<GrayImage> {
        GrayImage::from_fn(size, size, |x, y| self.value_at(x, y, size))
            .with_context(|| format!("Failed to render {}", self.short_name()))
    }

    /// Orientation in degrees within `[0, 180)` when the pattern has a
    /// single global direction
    pub fn expected_orientation_degrees(&self) -> Option<f64> {
        match self {
            Pattern::Stripes { angle_degrees, .. } => Some(angle_degrees.rem_euclid(180.0)),
            _ => None,
        }
    }

    /// Whether local analysis should report a direction; `None` when it
    /// depends on position or is ambiguous
    pub fn expect_direction(&self) -> Option<bool> {
        match self {
            Pattern::Flat { .. } => Some(false),
            Pattern::Stripes { .. } => Some(true),
            Pattern::Checkerboard { .. } | Pattern::Rings { .. } => None,
        }
    }

    /// The pattern set written by `generate`
    pub fn standard_set() -> Vec<Self> {
        let mut patterns = vec![Pattern::Flat { level: MID_GRAY }];
        for angle in [0.0, 30.0, 45.0, 60.0, 90.0, 120.0, 135.0, 150.0] {
            patterns.push(Pattern::Stripes {
                period: 6.0,
                angle_degrees: angle,
            });
        }
        patterns.push(Pattern::Stripes {
            period: 10.0,
            angle_degrees: 0.0,
        });
        patterns.push(Pattern::Checkerboard { cell: 4 });
        patterns.push(Pattern::Rings { period: 8.0 });
        patterns
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

/// One generated image and what the analyzer should say about it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternCase {
    pub filename: String,
    pub pattern: Pattern,
    pub expected_orientation_degrees: Option<f64>,
    pub expect_direction: Option<bool>,
}

/// Manifest of a generated pattern set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestManifest {
    pub size: usize,
    pub cases: Vec<PatternCase>,
}

impl TestManifest {
    pub fn generate(size: usize) -> Self {
        let cases = Pattern::standard_set()
            .into_iter()
            .map(|pattern| PatternCase {
                filename: format!("{}.png", pattern.short_name()),
                expected_orientation_degrees: pattern.expected_orientation_degrees(),
                expect_direction: pattern.expect_direction(),
                pattern,
            })
            .collect();
        Self { size, cases }
    }

    /// Render every case into `dir` and write `manifest.json` next to them
    pub fn write_images<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        if self.size == 0 {
            bail!("Pattern size must be positive");
        }
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        for case in &self.cases {
            let path = dir.join(&case.filename);
            case.pattern
                .render(self.size)?
                .save(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        self.save(dir.join("manifest.json"))
    }

    /// Save manifest to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load manifest from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let manifest: Self = serde_json::from_str(&json)?;
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_names() {
        assert_eq!(
            Pattern::Stripes {
                period: 6.0,
                angle_degrees: 45.0
            }
            .short_name(),
            "stripes_p6_a45"
        );
        assert_eq!(Pattern::Checkerboard { cell: 4 }.short_name(), "checker_4");
        assert_eq!(Pattern::Flat { level: 128.0 }.short_name(), "flat_128");
    }

    #[test]
    fn test_stripes_are_constant_along_their_direction() {
        let vertical = Pattern::Stripes {
            period: 6.0,
            angle_degrees: 90.0,
        };
        for y in 0..10 {
            assert!((vertical.value_at(3, y, 32) - vertical.value_at(3, 0, 32)).abs() < 1e-9);
        }
        let horizontal = Pattern::Stripes {
            period: 6.0,
            angle_degrees: 0.0,
        };
        for x in 0..10 {
            assert!((horizontal.value_at(x, 5, 32) - horizontal.value_at(0, 5, 32)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_manifest_generation() {
        let manifest = TestManifest::generate(64);
        assert_eq!(manifest.cases.len(), 12);
        let stripes = manifest
            .cases
            .iter()
            .filter(|c| matches!(c.pattern, Pattern::Stripes { .. }))
            .count();
        assert_eq!(stripes, 9);
        assert!(manifest
            .cases
            .iter()
            .all(|c| c.filename.ends_with(".png")));
    }

    #[test]
    fn test_manifest_json_round_trip() {
        let manifest = TestManifest::generate(32);
        let json = serde_json::to_string(&manifest).unwrap();
        assert!(json.contains("\"kind\":\"stripes\""));
        let parsed: TestManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.cases.len(), manifest.cases.len());
        assert_eq!(parsed.cases[1].pattern, manifest.cases[1].pattern);
    }
}
