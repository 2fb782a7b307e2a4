// src/core/analysis/direction.rs
//
// Dominant texture direction of a local patch, read off the angular
// distribution of its spatial-frequency energy.

use std::f64::consts::{PI, TAU};

use log::{debug, error, trace};
use serde::{Deserialize, Serialize};

use crate::config::{AnalyzerConfig, AnalyzerPreset};
use crate::core::dsp::{fft_shift, power_spectrum, EngineKind, SpectralEngine, WindowFunction};
use crate::core::grayscale::GrayImage;
use crate::error::{Result, TexdirError};

/// Outcome of one local analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionResult {
    /// Spatial texture direction in radians (dominant sector angle plus the
    /// configured offset, not folded)
    pub angle: f64,
    /// Whether `strength` reached the configured threshold
    pub has_direction: bool,
    /// Peak sector energy over mean sector energy; 0 when there is no energy
    pub strength: f64,
}

impl DirectionResult {
    fn undirected(angle_offset: f64) -> Self {
        Self {
            angle: angle_offset,
            has_direction: false,
            strength: 0.0,
        }
    }

    /// Direction folded into `[0, π)`; a texture direction is axial
    pub fn orientation(&self) -> f64 {
        self.angle.rem_euclid(PI)
    }

    pub fn unit_vector(&self) -> (f64, f64) {
        let (s, c) = self.angle.sin_cos();
        (c, s)
    }
}

/// Band-limited spectral energy per angular sector
#[derive(Debug, Clone, PartialEq)]
pub struct SectorHistogram {
    energies: Vec<f64>,
}

impl SectorHistogram {
    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    pub fn total(&self) -> f64 {
        self.energies.iter().sum()
    }

    pub fn mean(&self) -> f64 {
        if self.energies.is_empty() {
            0.0
        } else {
            self.total() / self.energies.len() as f64
        }
    }

    /// First sector holding the maximum energy
    pub fn peak(&self) -> (usize, f64) {
        let mut best = (0, self.energies.first().copied().unwrap_or(0.0));
        for (i, &e) in self.energies.iter().enumerate().skip(1) {
            if e > best.1 {
                best = (i, e);
            }
        }
        best
    }
}

/// Builder for TextureAnalyzer configuration
pub struct AnalyzerBuilder {
    config: AnalyzerConfig,
}

impl AnalyzerBuilder {
    pub fn new() -> Self {
        Self {
            config: AnalyzerConfig::default(),
        }
    }

    pub fn from_preset(preset: AnalyzerPreset) -> Self {
        Self {
            config: AnalyzerConfig::from_preset(preset),
        }
    }

    pub fn config(mut self, config: AnalyzerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn window_size(mut self, size: usize) -> Self {
        self.config.window_size = size;
        self
    }

    pub fn num_sectors(mut self, sectors: usize) -> Self {
        self.config.num_sectors = sectors;
        self
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.config.threshold = threshold;
        self
    }

    pub fn window(mut self, window: WindowFunction) -> Self {
        self.config.window = window;
        self
    }

    pub fn engine(mut self, engine: EngineKind) -> Self {
        self.config.engine = engine;
        self
    }

    pub fn min_radius(mut self, radius: f64) -> Self {
        self.config.min_radius = radius;
        self
    }

    pub fn max_radius_ratio(mut self, ratio: f64) -> Self {
        self.config.max_radius_ratio = ratio;
        self
    }

    pub fn angle_offset(mut self, offset: f64) -> Self {
        self.config.angle_offset = offset;
        self
    }

    pub fn build(self) -> Result<TextureAnalyzer> {
        TextureAnalyzer::new(self.config)
    }
}

impl Default for AnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Local texture direction analyzer.
///
/// Holds only its configuration and values derived from it, so one instance
/// can be shared across threads. Every call allocates its own buffers.
pub struct TextureAnalyzer {
    config: AnalyzerConfig,
    fft_size: usize,
    window: Vec<f64>,
    engine: Box<dyn SpectralEngine>,
}

impl std::fmt::Debug for TextureAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureAnalyzer")
            .field("config", &self.config)
            .field("fft_size", &self.fft_size)
            .field("engine", &self.engine.kind())
            .finish()
    }
}

impl TextureAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        let fft_size = config.fft_size();
        let window = config.window.generate(config.window_size);
        let engine = config.engine.build();
        debug!(
            "texture analyzer: window {} ({}), fft {}x{}, {} sectors, threshold {}, engine {}",
            config.window_size,
            config.window,
            fft_size,
            fft_size,
            config.num_sectors,
            config.threshold,
            config.engine
        );
        Ok(Self {
            config,
            fft_size,
            window,
            engine,
        })
    }

    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Analyze the neighbourhood of `(cx, cy)` in a row-major buffer.
    ///
    /// `grayscale` must hold at least `width * height` samples. The centre
    /// may lie outside the image; samples are clamped to the nearest edge.
    pub fn analyze_local_direction<T: Copy + Into<f64>>(
        &self,
        grayscale: &[T],
        width: usize,
        height: usize,
        cx: i64,
        cy: i64,
    ) -> Result<DirectionResult> {
        if width == 0 || height == 0 {
            return Err(TexdirError::InvalidDimensions { width, height });
        }
        let expected = width
            .checked_mul(height)
            .ok_or(TexdirError::InvalidDimensions { width, height })?;
        if grayscale.len() < expected {
            return Err(TexdirError::BufferTooSmall {
                expected,
                actual: grayscale.len(),
            });
        }

        let (max_x, max_y) = (width as i64 - 1, height as i64 - 1);
        let sample = |x: i64, y: i64| {
            let sx = x.clamp(0, max_x) as usize;
            let sy = y.clamp(0, max_y) as usize;
            grayscale[sy * width + sx].into()
        };
        Ok(self.direction_from(sample, cx, cy))
    }

    /// Analyze the neighbourhood of `(cx, cy)` in an image
    pub fn analyze_at(&self, image: &GrayImage, cx: i64, cy: i64) -> DirectionResult {
        self.direction_from(|x, y| image.sample_clamped(x, y), cx, cy)
    }

    /// Per-sector energies around `(cx, cy)`, all zero for a flat patch
    pub fn sector_histogram(&self, image: &GrayImage, cx: i64, cy: i64) -> SectorHistogram {
        match self.centered_spectrum(|x, y| image.sample_clamped(x, y), cx, cy) {
            Some(spectrum) => self.aggregate_sectors(&spectrum),
            None => SectorHistogram {
                energies: vec![0.0; self.config.num_sectors],
            },
        }
    }

    /// DC-centred `fft_size x fft_size` power spectrum of the windowed patch
    pub fn local_spectrum(&self, image: &GrayImage, cx: i64, cy: i64) -> Vec<f64> {
        self.centered_spectrum(|x, y| image.sample_clamped(x, y), cx, cy)
            .unwrap_or_else(|| vec![0.0; self.fft_size * self.fft_size])
    }

    fn direction_from<F>(&self, sample: F, cx: i64, cy: i64) -> DirectionResult
    where
        F: Fn(i64, i64) -> f64,
    {
        let result = match self.centered_spectrum(sample, cx, cy) {
            Some(spectrum) => self.decide(&self.aggregate_sectors(&spectrum)),
            None => DirectionResult::undirected(self.config.angle_offset),
        };
        trace!(
            "({}, {}): angle {:.4} strength {:.3} directional {}",
            cx,
            cy,
            result.angle,
            result.strength,
            result.has_direction
        );
        result
    }

    /// Extract, de-mean, window and transform the patch; `None` when flat
    fn centered_spectrum<F>(&self, sample: F, cx: i64, cy: i64) -> Option<Vec<f64>>
    where
        F: Fn(i64, i64) -> f64,
    {
        let size = self.config.window_size;
        let n = self.fft_size;
        let half = (size / 2) as i64;
        let origin_x = cx - half;
        let origin_y = cy - half;

        let mut sum = 0.0;
        let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
        for j in 0..size as i64 {
            for i in 0..size as i64 {
                let v = sample(origin_x + i, origin_y + j);
                sum += v;
                lo = lo.min(v);
                hi = hi.max(v);
            }
        }
        // Exact test; no tolerance, so any intensity scale behaves the same
        if !(hi > lo) {
            trace!("({}, {}): flat patch (level {:.4})", cx, cy, lo);
            return None;
        }
        let mean = sum / (size * size) as f64;

        let mut real = vec![0.0; n * n];
        let mut imag = vec![0.0; n * n];
        for j in 0..size {
            for i in 0..size {
                let deviation = sample(origin_x + i as i64, origin_y + j as i64) - mean;
                real[j * n + i] = deviation * self.window[i] * self.window[j];
            }
        }

        if let Err(e) = self.engine.transform_2d(&mut real, &mut imag, n, n, false) {
            error!("{} transform of {}x{} patch failed: {}", self.engine.kind(), n, n, e);
            return None;
        }

        Some(fft_shift(&power_spectrum(&real, &imag), n, n))
    }

    fn aggregate_sectors(&self, centered: &[f64]) -> SectorHistogram {
        let n = self.fft_size;
        let sectors = self.config.num_sectors;
        let center = (n / 2) as f64;
        let max_radius = n as f64 * self.config.max_radius_ratio;

        let mut energies = vec![0.0; sectors];
        for y in 0..n {
            let dy = y as f64 - center;
            for x in 0..n {
                let dx = x as f64 - center;
                let distance = dx.hypot(dy);
                if distance < self.config.min_radius || distance > max_radius {
                    continue;
                }
                let mut angle = dy.atan2(dx);
                if angle < 0.0 {
                    angle += TAU;
                }
                let sector = ((angle / TAU * sectors as f64) as usize).min(sectors - 1);
                energies[sector] += centered[y * n + x];
            }
        }
        SectorHistogram { energies }
    }

    fn decide(&self, histogram: &SectorHistogram) -> DirectionResult {
        let (peak_sector, peak_energy) = histogram.peak();
        let mean = histogram.mean();
        let strength = if mean > 0.0 { peak_energy / mean } else { 0.0 };
        DirectionResult {
            angle: peak_sector as f64 / self.config.num_sectors as f64 * TAU
                + self.config.angle_offset,
            has_direction: mean > 0.0 && strength >= self.config.threshold,
            strength,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn vertical_stripes(size: usize, period: f64) -> GrayImage {
        GrayImage::from_fn(size, size, |x, _| 128.0 + 100.0 * (TAU * x as f64 / period).sin())
            .unwrap()
    }

    #[test]
    fn test_fft_size_is_derived() {
        let analyzer = TextureAnalyzer::builder().window_size(18).build().unwrap();
        assert_eq!(analyzer.fft_size(), 32);
        let analyzer = TextureAnalyzer::builder().window_size(8).build().unwrap();
        assert_eq!(analyzer.fft_size(), 8);
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        assert!(TextureAnalyzer::builder().num_sectors(0).build().is_err());
        assert!(TextureAnalyzer::builder().threshold(-1.0).build().is_err());
    }

    #[test]
    fn test_vertical_stripes_point_up() {
        let analyzer = TextureAnalyzer::new(AnalyzerConfig::default()).unwrap();
        let result = analyzer.analyze_at(&vertical_stripes(64, 6.0), 32, 32);
        assert!(result.has_direction);
        assert!(result.strength > 4.0, "strength {}", result.strength);
        assert!((result.orientation() - FRAC_PI_2).abs() < analyzer.config().sector_width());
    }

    #[test]
    fn test_flat_patch_has_no_energy() {
        let analyzer = TextureAnalyzer::new(AnalyzerConfig::default()).unwrap();
        for level in [0.0, 0.3, 128.0, 1e6 + 0.1] {
            let flat = GrayImage::from_fn(40, 40, |_, _| level).unwrap();
            let result = analyzer.analyze_at(&flat, 20, 20);
            assert!(!result.has_direction);
            assert_eq!(result.strength, 0.0);
            assert_eq!(result.angle, analyzer.config().angle_offset);
        }
    }

    #[test]
    fn test_result_independent_of_intensity_scale() {
        let analyzer = TextureAnalyzer::new(AnalyzerConfig::default()).unwrap();
        let stripes = |amplitude: f64, offset: f64| {
            GrayImage::from_fn(64, 64, |x, _| offset + amplitude * (TAU * x as f64 / 6.0).sin())
                .unwrap()
        };
        let reference = analyzer.analyze_at(&stripes(1.0, 0.0), 32, 32);
        assert!(reference.has_direction);

        for (amplitude, offset) in [(1e-12, 0.0), (1e6, 0.0), (1e-4, 1e6), (1e-9, 5.0)] {
            let result = analyzer.analyze_at(&stripes(amplitude, offset), 32, 32);
            assert_eq!(result.has_direction, reference.has_direction, "{amplitude} on {offset}");
            assert!(
                (result.strength / reference.strength - 1.0).abs() < 1e-6,
                "{amplitude} on {offset}: strength {}",
                result.strength
            );
            // Opposite sectors tie for a real patch, so compare the folded angle
            assert!((result.orientation() - reference.orientation()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_slice_api_matches_image_api() {
        let analyzer = TextureAnalyzer::new(AnalyzerConfig::default()).unwrap();
        let image = vertical_stripes(48, 5.0);
        let from_slice = analyzer
            .analyze_local_direction(image.pixels(), 48, 48, 10, 30)
            .unwrap();
        assert_eq!(from_slice, analyzer.analyze_at(&image, 10, 30));

        let bytes: Vec<u8> = image.pixels().iter().map(|&v| v as u8).collect();
        let from_bytes = analyzer.analyze_local_direction(&bytes, 48, 48, 24, 24).unwrap();
        assert!(from_bytes.has_direction);
    }

    #[test]
    fn test_slice_api_validates_buffer() {
        let analyzer = TextureAnalyzer::new(AnalyzerConfig::default()).unwrap();
        assert!(matches!(
            analyzer.analyze_local_direction(&[0.0f64; 10], 4, 4, 0, 0),
            Err(TexdirError::BufferTooSmall { expected: 16, actual: 10 })
        ));
        assert!(matches!(
            analyzer.analyze_local_direction(&[0.0f64; 10], 0, 4, 0, 0),
            Err(TexdirError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_centre_outside_image_is_clamped() {
        let analyzer = TextureAnalyzer::new(AnalyzerConfig::default()).unwrap();
        let image = vertical_stripes(32, 6.0);
        // Far outside, the patch collapses onto one corner pixel
        let result = analyzer.analyze_at(&image, -100, 500);
        assert!(!result.has_direction);
        let edge = analyzer.analyze_at(&image, 16, -3);
        assert!(edge.strength.is_finite());
    }

    #[test]
    fn test_histogram_matches_decision() {
        let analyzer = TextureAnalyzer::new(AnalyzerConfig::default()).unwrap();
        let image = vertical_stripes(64, 6.0);
        let histogram = analyzer.sector_histogram(&image, 32, 32);
        assert_eq!(histogram.energies().len(), 36);
        assert!(histogram.energies().iter().all(|&e| e >= 0.0));

        let (peak, peak_energy) = histogram.peak();
        let result = analyzer.analyze_at(&image, 32, 32);
        assert!((result.strength - peak_energy / histogram.mean()).abs() < 1e-12);
        assert!((result.angle - (peak as f64 * TAU / 36.0 + FRAC_PI_2)).abs() < 1e-12);
    }

    #[test]
    fn test_engines_agree_on_result() {
        let image = vertical_stripes(64, 7.0);
        let radix2 = TextureAnalyzer::builder().engine(EngineKind::Radix2).build().unwrap();
        let rustfft = TextureAnalyzer::builder().engine(EngineKind::RustFft).build().unwrap();
        let a = radix2.analyze_at(&image, 30, 30);
        let b = rustfft.analyze_at(&image, 30, 30);
        assert_eq!(a.has_direction, b.has_direction);
        assert!((a.orientation() - b.orientation()).abs() < 1e-9);
        assert!((a.strength - b.strength).abs() < 1e-6);
    }

    #[test]
    fn test_local_spectrum_is_centred() {
        let analyzer = TextureAnalyzer::new(AnalyzerConfig::default()).unwrap();
        let spectrum = analyzer.local_spectrum(&vertical_stripes(64, 6.0), 32, 32);
        let n = analyzer.fft_size();
        assert_eq!(spectrum.len(), n * n);
        // Horizontal frequency ridge through the centre row
        let row: f64 = spectrum[(n / 2) * n..(n / 2 + 1) * n].iter().sum();
        let column: f64 = (0..n).map(|y| spectrum[y * n + n / 2]).sum();
        assert!(row > 100.0 * column);
    }
}
