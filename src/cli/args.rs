//! CLI argument parsing with preset and config-file support

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::config::{AnalyzerConfig, AnalyzerPreset};
use crate::core::dsp::{EngineKind, WindowFunction};

#[derive(Parser, Debug)]
#[command(name = "texdir", version)]
#[command(about = "Detect the dominant texture direction in grayscale images")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze the neighbourhood of one pixel
    Analyze(AnalyzeArgs),
    /// Analyze a grid of points over an image or a directory of images
    Field(FieldArgs),
    /// Render the local power spectrum around one pixel
    Spectrum(SpectrumArgs),
    /// Write synthetic test patterns and their manifest
    Generate(GenerateArgs),
    /// List analyzer presets
    Presets,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Analyzer settings shared by the analysis subcommands.
///
/// Precedence: config file, then preset, then individual overrides.
#[derive(Args, Debug, Clone, Default)]
pub struct AnalyzerArgs {
    /// JSON analyzer configuration
    #[arg(long, env = "TEXDIR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Preset (standard, fine, coarse)
    #[arg(long, value_parser = parse_preset)]
    pub preset: Option<AnalyzerPreset>,

    /// Patch side in pixels
    #[arg(long)]
    pub window_size: Option<usize>,

    /// Number of angular sectors
    #[arg(long)]
    pub sectors: Option<usize>,

    /// Peak-to-mean sector ratio required for a direction
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Patch window (hann, hamming, blackman, rectangular)
    #[arg(long, value_parser = parse_window)]
    pub window: Option<WindowFunction>,

    /// Transform engine (radix2, rustfft)
    #[arg(long, value_parser = parse_engine)]
    pub engine: Option<EngineKind>,
}

impl AnalyzerArgs {
    pub fn to_config(&self) -> Result<AnalyzerConfig> {
        let mut config = match &self.config {
            Some(path) => AnalyzerConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => AnalyzerConfig::default(),
        };

        if let Some(preset) = self.preset {
            let base = AnalyzerConfig::from_preset(preset);
            config.window_size = base.window_size;
            config.num_sectors = base.num_sectors;
            config.threshold = base.threshold;
        }
        if let Some(size) = self.window_size {
            config.window_size = size;
        }
        if let Some(sectors) = self.sectors {
            config.num_sectors = sectors;
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(window) = self.window {
            config.window = window;
        }
        if let Some(engine) = self.engine {
            config.engine = engine;
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Input image
    pub image: PathBuf,

    /// Column of the patch centre (may lie outside the image)
    #[arg(short, long, allow_negative_numbers = true)]
    pub x: i64,

    /// Row of the patch centre (may lie outside the image)
    #[arg(short, long, allow_negative_numbers = true)]
    pub y: i64,

    /// Include per-sector energies in the output
    #[arg(long)]
    pub sectors_detail: bool,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub analyzer: AnalyzerArgs,
}

#[derive(Args, Debug)]
pub struct FieldArgs {
    /// Input image or directory
    pub input: PathBuf,

    /// Grid spacing in pixels
    #[arg(short, long, default_value = "16")]
    pub step: usize,

    /// Directory for direction-field overlay images
    #[arg(short, long)]
    pub overlay: Option<PathBuf>,

    /// Include every grid sample in JSON output
    #[arg(long)]
    pub samples: bool,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub analyzer: AnalyzerArgs,
}

#[derive(Args, Debug)]
pub struct SpectrumArgs {
    /// Input image
    pub image: PathBuf,

    #[arg(short, long, allow_negative_numbers = true)]
    pub x: i64,

    #[arg(short, long, allow_negative_numbers = true)]
    pub y: i64,

    /// Output PNG
    #[arg(short, long)]
    pub output: PathBuf,

    /// Output pixels per frequency bin
    #[arg(long, default_value = "8")]
    pub scale: u32,

    /// Grayscale instead of the viridis-like colormap
    #[arg(long)]
    pub gray: bool,

    /// Plot raw power instead of log power
    #[arg(long)]
    pub linear: bool,

    #[command(flatten)]
    pub analyzer: AnalyzerArgs,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Output directory
    pub output: PathBuf,

    /// Side of each generated image
    #[arg(long, default_value = "128")]
    pub size: usize,
}

fn parse_preset(s: &str) -> Result<AnalyzerPreset, String> {
    AnalyzerPreset::from_name(s).ok_or_else(|| format!("Unknown preset: {}", s))
}

fn parse_window(s: &str) -> Result<WindowFunction, String> {
    WindowFunction::from_name(s).ok_or_else(|| format!("Unknown window: {}", s))
}

fn parse_engine(s: &str) -> Result<EngineKind, String> {
    EngineKind::from_name(s).ok_or_else(|| format!("Unknown engine: {}", s))
}
