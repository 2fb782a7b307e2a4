//! Output formatting for CLI results

use serde::Serialize;

use crate::report::{Directionality, FieldReport, PointReport};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Format a single-point result for terminal output
pub fn format_point(report: &PointReport, verbose: bool) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{}{} {}{} ({}, {}){}\n",
        report.directionality.color_code(),
        report.directionality.symbol(),
        BOLD,
        report.file,
        report.x,
        report.y,
        RESET,
    ));

    match report.directionality {
        Directionality::Directional => output.push_str(&format!(
            "  {}: {:.1}° (strength {:.2})\n",
            report.directionality.description(),
            report.orientation_degrees,
            report.strength
        )),
        _ => output.push_str(&format!(
            "  {} (strength {:.2})\n",
            report.directionality.description(),
            report.strength
        )),
    }

    if verbose {
        output.push_str(&format!(
            "  {}window {} | sectors {} | threshold {:.2} | raw angle {:.4} rad{}\n",
            DIM, report.window_size, report.num_sectors, report.threshold, report.angle, RESET
        ));
    }

    if let Some(energies) = &report.sector_energies {
        output.push_str(&format_sectors(energies));
    }

    output
}

/// One bar per sector, scaled to the largest energy
fn format_sectors(energies: &[f64]) -> String {
    const BAR_WIDTH: f64 = 40.0;
    let max = energies.iter().cloned().fold(0.0f64, f64::max);
    let width = 360.0 / energies.len().max(1) as f64;

    let mut output = String::from("\n  Sector energies:\n");
    for (i, &e) in energies.iter().enumerate() {
        let bar = if max > 0.0 {
            "█".repeat((e / max * BAR_WIDTH).round() as usize)
        } else {
            String::new()
        };
        output.push_str(&format!(
            "    {:>6.1}° {}{:<40}{} {:.3e}\n",
            i as f64 * width,
            DIM,
            bar,
            RESET,
            e
        ));
    }
    output
}

/// Format a direction-field report for terminal output
pub fn format_field(report: &FieldReport, verbose: bool) -> String {
    let summary = &report.summary;
    let mut output = String::new();

    output.push_str(&format!(
        "{}{}{} {}[{}x{} px, {}x{} samples, step {}]{}\n",
        BOLD,
        report.file,
        RESET,
        DIM,
        report.width,
        report.height,
        report.columns,
        report.rows,
        report.step,
        RESET
    ));

    output.push_str(&format!(
        "  Directional: {}/{} ({:.0}%)\n",
        summary.directional,
        summary.samples,
        summary.directional_fraction * 100.0
    ));

    match report.dominant_orientation_degrees {
        Some(deg) => output.push_str(&format!(
            "  Dominant orientation: {:.1}° (circular variance {:.3})\n",
            deg, summary.circular_variance
        )),
        None => output.push_str("  Dominant orientation: none\n"),
    }

    if verbose {
        output.push_str(&format!(
            "  {}Mean strength: {:.2}{}\n",
            DIM, summary.mean_strength, RESET
        ));
    }

    output
}

/// Format any report as pretty JSON
pub fn format_json<T: Serialize + ?Sized>(report: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Format a summary for multiple images
pub fn format_summary(reports: &[FieldReport], failed: usize) -> String {
    let mut output = String::new();

    let oriented = reports
        .iter()
        .filter(|r| r.summary.dominant_orientation.is_some())
        .count();
    let coherent = reports
        .iter()
        .filter(|r| r.summary.dominant_orientation.is_some() && r.summary.circular_variance < 0.25)
        .count();

    output.push_str(&format!("\n{}Summary:{}\n", BOLD, RESET));
    output.push_str(&format!("  {} images analyzed\n", reports.len()));
    output.push_str(&format!("  \x1b[32m✓ {} with a dominant orientation{}\n", oriented, RESET));
    output.push_str(&format!("  \x1b[32m  {} coherent (variance < 0.25){}\n", coherent, RESET));
    if oriented < reports.len() {
        output.push_str(&format!(
            "  \x1b[90m— {} without direction{}\n",
            reports.len() - oriented,
            RESET
        ));
    }
    if failed > 0 {
        output.push_str(&format!("  \x1b[31m✗ {} failed to load{}\n", failed, RESET));
    }

    output
}
