// src/main.rs
use anyhow::Result;
use clap::Parser;
use env_logger::Env;

use texdir::cli::{self, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    // RUST_LOG still wins when set
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    cli::run(cli)
}
