//! firstfit-sim
//!
//! Reads a command script, runs it through the First-Fit simulator and
//! prints a text or JSON report.

use anyhow::{Context, Result};
use clap::Parser;
use firstfit_sim::{run_script, ReportFormat, Script, SimConfig};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "firstfit-sim")]
#[command(version)]
#[command(about = "Contiguous memory allocation simulator (First-Fit)")]
struct Args {
    /// Script file: total memory on the first line, then REQUEST/RELEASE lines
    input: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report format (text, json) [default: text]
    #[arg(short, long)]
    format: Option<String>,

    /// Unit label printed after sizes [default: KB]
    #[arg(short, long)]
    unit: Option<String>,

    /// Check block list invariants after every command
    #[arg(long)]
    verify: bool,

    /// Only print the final state and statistics
    #[arg(short, long)]
    quiet: bool,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(args: &Args) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => SimConfig::from_path(path)
            .with_context(|| format!("Failed to load config {:?}", path))?,
        None => SimConfig::default(),
    };

    if let Some(format) = &args.format {
        config.format = format.parse::<ReportFormat>()?;
    }
    if let Some(unit) = &args.unit {
        config.unit = unit.clone();
    }
    if args.verify {
        config.verify_invariants = true;
    }
    if args.quiet {
        config.show_events = false;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&args)?;
    debug!("Configuration: {:?}", config);

    let script = Script::from_path(&args.input)
        .with_context(|| format!("Failed to read script {:?}", args.input))?;
    info!(
        "Loaded {} commands for {} {}",
        script.commands.len(),
        script.total_memory,
        config.unit
    );

    let format = config.format;
    let show_events = config.show_events;
    let report = run_script(&script, config)?.with_source(args.input.display().to_string());

    let mut rendered = match format {
        ReportFormat::Text => report.text(show_events).to_string(),
        ReportFormat::Json => report.to_json()?,
    };
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }

    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write report {:?}", path))?;
            info!("Report saved to {:?}", path);
        }
        None => print!("{}", rendered),
    }

    Ok(())
}
