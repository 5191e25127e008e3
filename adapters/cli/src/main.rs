#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that turns a settings file into per-map spawn plans.

mod settings_file;
mod summary;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use raid_spawns_planner::plan_raid;

/// Output rendering of the generated plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Full plan as pretty-printed JSON.
    Json,
    /// One line per map with wave and population counts.
    Summary,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Procedural raid spawn schedule generator", long_about = None)]
struct Cli {
    /// TOML settings file describing the global tunables and every map.
    #[arg(long)]
    config: PathBuf,
    /// Replaces the seed named in the settings file.
    #[arg(long)]
    seed: Option<u64>,
    /// Plans only this map.
    #[arg(long)]
    map: Option<String>,
    /// How the plan is printed.
    #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
    format: OutputFormat,
}

/// Entry point for the raid spawn command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = settings_file::load_settings(&cli.config)?;
    if let Some(seed) = cli.seed {
        settings.global.seed = seed;
    }
    tracing::info!(
        target: "raid_spawns::cli",
        config = %cli.config.display(),
        seed = settings.global.seed,
        maps = settings.maps.len(),
        "settings loaded"
    );

    let plan = plan_raid(&settings, cli.map.as_deref())
        .with_context(|| format!("failed to plan raid from {}", cli.config.display()))?;

    match cli.format {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&plan).context("failed to serialise spawn plan")?;
            println!("{json}");
        }
        OutputFormat::Summary => print!("{}", summary::render_summary(&plan)),
    }

    Ok(())
}
