//! imagefs-info - Print filesystem usage of a container image store.
//!
//! Loads the engine configuration (or takes an explicit data root), runs
//! one usage report, and prints the response as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;

use imagefs::{EngineConfig, SystemClock, UsageReporter};

/// Print filesystem usage of a container image store.
#[derive(Debug, Parser)]
#[command(name = "imagefs-info", version, about)]
struct Cli {
    /// Load engine configuration from this file instead of the default
    /// search locations.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Measure this engine data root directly, bypassing configuration
    /// discovery.
    #[arg(long, conflicts_with = "config")]
    data_root: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match (cli.data_root, cli.config) {
        (Some(root), _) => EngineConfig::with_data_root(root),
        (None, Some(path)) => EngineConfig::from_file(&path)?,
        (None, None) => EngineConfig::load()?,
    };

    let reporter = UsageReporter::new(config, SystemClock);
    let response = reporter
        .image_fs_info(&CancellationToken::new())
        .context("Failed to measure image store")?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
