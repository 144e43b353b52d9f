//! fingerprint - content-addressed asset pipeline for web applications.

#![allow(dead_code)]

mod asset;
mod cli;
mod config;
mod logger;
mod pipeline;
mod utils;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::FingerprintConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    match &cli.command {
        Commands::Init { name, force } => {
            let cwd = std::env::current_dir().context("Failed to get current working directory")?;
            let dir = name.as_deref().map_or_else(|| cwd.clone(), |name| cwd.join(name));
            cli::init::init(&dir, *force)
        }
        Commands::Build { .. } => {
            let config = FingerprintConfig::load(&cli)?;
            cli::build::build(&config).map(|_| ())
        }
        Commands::Hash { files } => {
            let config = FingerprintConfig::load(&cli)?;
            cli::hash::print_hashes(&config, files)
        }
    }
}
