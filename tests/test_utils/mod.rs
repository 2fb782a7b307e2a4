// tests/test_utils/mod.rs
//
// Shared helpers for integration tests
#![allow(dead_code)]

use std::f64::consts::{PI, TAU};
use std::path::PathBuf;

use texdir::GrayImage;

/// Sinusoidal stripes running along `angle_degrees`, amplitude 100 around 128
pub fn stripes(width: usize, height: usize, period: f64, angle_degrees: f64) -> GrayImage {
    let (s, c) = angle_degrees.to_radians().sin_cos();
    GrayImage::from_fn(width, height, |x, y| {
        let along_normal = -(x as f64) * s + y as f64 * c;
        128.0 + 100.0 * (TAU * along_normal / period).sin()
    })
    .expect("valid stripe image")
}

/// Square-wave stripes of the given period; `vertical` stripes vary along x
pub fn square_stripes(width: usize, height: usize, period: usize, vertical: bool) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        let t = if vertical { x } else { y };
        if t % period < period / 2 {
            255.0
        } else {
            0.0
        }
    })
    .expect("valid stripe image")
}

pub fn flat(width: usize, height: usize, level: f64) -> GrayImage {
    GrayImage::from_fn(width, height, |_, _| level).expect("valid flat image")
}

/// Concentric rings around the image centre
pub fn rings(size: usize, period: f64) -> GrayImage {
    let c = size as f64 / 2.0;
    GrayImage::from_fn(size, size, |x, y| {
        let r = (x as f64 - c).hypot(y as f64 - c);
        128.0 + 100.0 * (TAU * r / period).sin()
    })
    .expect("valid ring image")
}

/// Distance between two orientations, treating θ and θ + π as equal
pub fn axial_difference(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(PI);
    d.min(PI - d)
}

/// Fresh per-test scratch directory under the system temp dir
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("texdir_{}_{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}
