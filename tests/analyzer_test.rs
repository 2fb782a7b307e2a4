// tests/analyzer_test.rs
//
// Local texture direction on synthetic patterns

mod test_utils;

use std::f64::consts::{FRAC_PI_2, PI};

use test_utils::*;
use texdir::{AnalyzerConfig, AnalyzerPreset, DirectionResult, GrayImage, TextureAnalyzer};

fn default_analyzer() -> TextureAnalyzer {
    TextureAnalyzer::new(AnalyzerConfig::default()).unwrap()
}

#[test]
fn test_vertical_stripes() {
    let analyzer = default_analyzer();
    let image = square_stripes(64, 64, 6, true);
    let result = analyzer.analyze_at(&image, 32, 32);

    assert!(result.has_direction);
    assert!(result.strength > 5.0, "strength {}", result.strength);
    assert!(axial_difference(result.orientation(), FRAC_PI_2) < analyzer.config().sector_width());
}

#[test]
fn test_flat_patch_has_no_direction() {
    let analyzer = default_analyzer();
    for level in [0.0, 17.0, 255.0] {
        let result = analyzer.analyze_at(&flat(40, 40, level), 20, 20);
        assert!(!result.has_direction);
        assert_eq!(result.strength, 0.0);
    }
}

#[test]
fn test_small_horizontal_stripes() {
    // 16x16 image, period-4 horizontal stripes, 8px window with 8 sectors
    let analyzer = TextureAnalyzer::builder()
        .window_size(8)
        .num_sectors(8)
        .build()
        .unwrap();
    assert_eq!(analyzer.fft_size(), 8);

    let image = square_stripes(16, 16, 4, false);
    let result = analyzer.analyze_at(&image, 8, 8);

    assert!(result.has_direction);
    assert!(result.strength > 2.0, "strength {}", result.strength);
    assert!(axial_difference(result.orientation(), 0.0) < analyzer.config().sector_width());
}

#[test]
fn test_oriented_stripes_within_two_sectors() {
    let analyzer = default_analyzer();
    let tolerance = 2.0 * analyzer.config().sector_width();

    for angle in [0.0, 30.0, 45.0, 60.0, 90.0, 120.0, 135.0, 150.0] {
        let image = stripes(64, 64, 6.0, angle);
        let result = analyzer.analyze_at(&image, 32, 32);
        assert!(result.has_direction, "no direction at {}°", angle);

        let error = axial_difference(result.orientation(), f64::to_radians(angle));
        assert!(
            error <= tolerance,
            "{}°: got {:.1}°",
            angle,
            result.orientation().to_degrees()
        );
    }
}

#[test]
fn test_angles_on_sector_boundaries_are_exact() {
    let analyzer = default_analyzer();
    for angle in [0.0, 30.0, 90.0, 120.0] {
        let result = analyzer.analyze_at(&stripes(64, 64, 6.0, angle), 32, 32);
        assert!(axial_difference(result.orientation(), f64::to_radians(angle)) < 1e-9);
    }
}

#[test]
fn test_angle_range() {
    let analyzer = default_analyzer();
    let image = GrayImage::from_fn(48, 48, |x, y| ((x * 13 + y * 7) % 17) as f64).unwrap();
    for cy in (0..48).step_by(6) {
        for cx in (0..48).step_by(6) {
            let result = analyzer.analyze_at(&image, cx, cy);
            assert!(result.angle >= FRAC_PI_2 && result.angle < FRAC_PI_2 + 2.0 * PI);
            assert!(result.strength >= 0.0);
            assert!(result.orientation() >= 0.0 && result.orientation() < PI);
        }
    }
}

#[test]
fn test_analysis_is_deterministic() {
    let analyzer = default_analyzer();
    let image = stripes(64, 64, 7.0, 50.0);
    let first = analyzer.analyze_at(&image, 30, 25);
    for _ in 0..3 {
        assert_eq!(analyzer.analyze_at(&image, 30, 25), first);
    }
}

#[test]
fn test_threshold_controls_decision() {
    let image = stripes(64, 64, 6.0, 30.0);
    let lenient = TextureAnalyzer::builder().threshold(1.5).build().unwrap();
    let strict = TextureAnalyzer::builder().threshold(1000.0).build().unwrap();

    let a = lenient.analyze_at(&image, 32, 32);
    let b = strict.analyze_at(&image, 32, 32);
    assert!(a.has_direction);
    assert!(!b.has_direction);
    assert_eq!(a.angle, b.angle);
    assert_eq!(a.strength, b.strength);
}

#[test]
fn test_presets_find_direction() {
    let image = stripes(96, 96, 10.0, 0.0);
    for preset in AnalyzerPreset::all() {
        let analyzer = TextureAnalyzer::new(AnalyzerConfig::from_preset(preset)).unwrap();
        let result = analyzer.analyze_at(&image, 48, 48);
        assert!(result.has_direction, "{} preset", preset.name());
        assert!(
            axial_difference(result.orientation(), 0.0) <= 2.0 * analyzer.config().sector_width(),
            "{} preset: {:.1}°",
            preset.name(),
            result.orientation().to_degrees()
        );
    }
}

#[test]
fn test_raw_buffer_api() {
    let analyzer = default_analyzer();
    let (w, h) = (32usize, 32usize);
    let bytes: Vec<u8> = (0..w * h)
        .map(|i| if (i % w) % 6 < 3 { 255 } else { 0 })
        .collect();

    let result = analyzer.analyze_local_direction(&bytes, w, h, 16, 16).unwrap();
    assert!(result.has_direction);
    assert!(axial_difference(result.orientation(), FRAC_PI_2) < analyzer.config().sector_width());

    assert!(analyzer.analyze_local_direction(&bytes[..10], w, h, 0, 0).is_err());
    assert!(analyzer.analyze_local_direction(&bytes, 0, h, 0, 0).is_err());
}

#[test]
fn test_result_serializes() {
    let result = DirectionResult {
        angle: PI,
        has_direction: true,
        strength: 3.5,
    };
    let json = serde_json::to_string(&result).unwrap();
    let back: DirectionResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back, result);
}
