// src/cli/mod.rs
//
// Command-line interface module

mod args;
mod output;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colorful::Colorful;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{info, warn};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::config::{AnalyzerConfig, AnalyzerPreset};
use crate::core::analysis::{DirectionField, TextureAnalyzer};
use crate::core::grayscale::GrayImage;
use crate::core::visualization::{
    save_direction_field, save_spectrum, Colormap, OverlayConfig, SpectrumImageConfig,
};
use crate::report::{FieldReport, PointReport};
use crate::testgen::TestManifest;

pub use args::{
    AnalyzeArgs, AnalyzerArgs, Cli, Command, FieldArgs, GenerateArgs, OutputFormat, SpectrumArgs,
};
pub use output::{format_field, format_json, format_point, format_summary};

const IMAGE_EXTENSIONS: [&str; 8] = ["png", "jpg", "jpeg", "bmp", "tif", "tiff", "gif", "webp"];

/// Run the CLI
pub fn run(cli: Cli) -> Result<()> {
    let verbose = cli.verbose > 0;
    match cli.command {
        Command::Analyze(args) => run_analyze(&args, verbose),
        Command::Field(args) => run_field(&args, verbose),
        Command::Spectrum(args) => run_spectrum(&args),
        Command::Generate(args) => run_generate(&args),
        Command::Presets => {
            print_presets();
            Ok(())
        }
    }
}

fn build_analyzer(args: &AnalyzerArgs) -> Result<TextureAnalyzer> {
    let config = args.to_config()?;
    info!(
        "analyzer: window {} ({} fft), {} sectors, threshold {:.2}, {} window, {} engine",
        config.window_size,
        config.fft_size(),
        config.num_sectors,
        config.threshold,
        config.window,
        config.engine
    );
    Ok(TextureAnalyzer::new(config)?)
}

fn open_image(path: &Path) -> Result<GrayImage> {
    GrayImage::open(path).with_context(|| format!("Failed to open {}", path.display()))
}

fn run_analyze(args: &AnalyzeArgs, verbose: bool) -> Result<()> {
    let analyzer = build_analyzer(&args.analyzer)?;
    let image = open_image(&args.image)?;

    let result = analyzer.analyze_at(&image, args.x, args.y);
    let mut report = PointReport::new(
        args.image.display().to_string(),
        args.x,
        args.y,
        analyzer.config(),
        &result,
    );
    if args.sectors_detail {
        let histogram = analyzer.sector_histogram(&image, args.x, args.y);
        report = report.with_sector_energies(histogram.energies().to_vec());
    }

    match args.format {
        OutputFormat::Json => println!("{}", format_json(&report)?),
        OutputFormat::Text => print!("{}", format_point(&report, verbose)),
    }
    Ok(())
}

fn run_field(args: &FieldArgs, verbose: bool) -> Result<()> {
    let analyzer = build_analyzer(&args.analyzer)?;
    let files = collect_image_files(&args.input)?;

    if files.is_empty() {
        println!("{}", "No image files found!".red());
        return Ok(());
    }
    if let Some(dir) = &args.overlay {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    if args.format == OutputFormat::Text {
        println!("Found {} image file(s)\n", files.len());
    }

    let progress = ProgressBar::new(files.len() as u64).with_style(ProgressStyle::default_bar());
    if args.format == OutputFormat::Json || files.len() == 1 {
        progress.set_draw_target(ProgressDrawTarget::hidden());
    }

    let outcomes: Vec<Option<FieldReport>> = files
        .par_iter()
        .progress_with(progress.clone())
        .map(|path| match analyze_field(&analyzer, path, args) {
            Ok(report) => Some(report),
            Err(e) => {
                warn!("{:#}", e);
                None
            }
        })
        .collect();
    progress.finish_and_clear();

    let failed = outcomes.iter().filter(|o| o.is_none()).count();
    let reports: Vec<FieldReport> = outcomes.into_iter().flatten().collect();

    match args.format {
        OutputFormat::Json => println!("{}", format_json(&reports)?),
        OutputFormat::Text => {
            for report in &reports {
                println!("{}", format_field(report, verbose));
            }
            if files.len() > 1 {
                print!("{}", format_summary(&reports, failed));
            } else if failed > 0 {
                println!("{}", "Image could not be analyzed".red());
            }
        }
    }
    Ok(())
}

fn analyze_field(analyzer: &TextureAnalyzer, path: &Path, args: &FieldArgs) -> Result<FieldReport> {
    let image = open_image(path)?;
    let field = DirectionField::compute(analyzer, &image, args.step)?;

    if let Some(dir) = &args.overlay {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let output_path = dir.join(format!("{}_field.png", stem));
        save_direction_field(&image, &field, &OverlayConfig::default(), &output_path)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        info!("overlay saved to {}", output_path.display());
    }

    let report = FieldReport::new(path.display().to_string(), &field);
    Ok(if args.samples {
        report.with_samples(&field)
    } else {
        report
    })
}

fn run_spectrum(args: &SpectrumArgs) -> Result<()> {
    let analyzer = build_analyzer(&args.analyzer)?;
    let image = open_image(&args.image)?;

    let config = SpectrumImageConfig {
        scale: args.scale.max(1),
        colormap: if args.gray {
            Colormap::Grayscale
        } else {
            Colormap::Viridis
        },
        log_scale: !args.linear,
    };
    save_spectrum(&analyzer, &image, args.x, args.y, &config, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!(
        "Spectrum saved to: {}",
        args.output.display().to_string().cyan()
    );
    Ok(())
}

fn run_generate(args: &GenerateArgs) -> Result<()> {
    let manifest = TestManifest::generate(args.size);
    manifest.write_images(&args.output)?;
    println!(
        "{} Wrote {} patterns to {}",
        "✓".green(),
        manifest.cases.len(),
        args.output.display().to_string().cyan()
    );
    Ok(())
}

fn print_presets() {
    for preset in AnalyzerPreset::all() {
        let config = AnalyzerConfig::from_preset(preset);
        println!(
            "{:<10} window {:>3}, {:>3} sectors, threshold {:.1}  {}",
            preset.name(),
            config.window_size,
            config.num_sectors,
            config.threshold,
            preset.description()
        );
    }
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Image files at `path`: the file itself, or every image below a directory
pub fn collect_image_files(path: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if path.is_file() {
        if is_image_file(path) {
            files.push(path.to_path_buf());
        }
    } else if path.is_dir() {
        for entry in WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if entry.file_type().is_file() && is_image_file(entry.path()) {
                files.push(entry.path().to_path_buf());
            }
        }
        files.sort();
    } else {
        anyhow::bail!("Input not found: {}", path.display());
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("a/b.PNG")));
        assert!(is_image_file(Path::new("scan.tiff")));
        assert!(!is_image_file(Path::new("notes.txt")));
        assert!(!is_image_file(Path::new("noext")));
    }

    #[test]
    fn test_collect_image_files_from_directory() {
        let dir = std::env::temp_dir().join(format!("texdir_collect_{}", std::process::id()));
        std::fs::create_dir_all(dir.join("nested")).unwrap();
        std::fs::write(dir.join("b.png"), b"").unwrap();
        std::fs::write(dir.join("nested/a.jpg"), b"").unwrap();
        std::fs::write(dir.join("readme.md"), b"").unwrap();

        let files = collect_image_files(&dir).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| is_image_file(f)));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_collect_missing_input() {
        assert!(collect_image_files(Path::new("/definitely/not/here")).is_err());
    }
}
