//! DICE welfare optimisation from the command line.
//!
//! # Usage
//!
//! ```bash
//! cargo run --release -- --a3 3.0 --stride 5 --output trajectory.json
//! ```
//!
//! Builds the model, optimises the savings and emission-control trajectories,
//! prints a summary table and optionally writes the full trajectory as JSON.
//! Exits with a non-zero status when the solver did not converge.

use anyhow::Context;
use clap::Parser;
use rdice::rdice_optimise::optimize_controls;
use rdice::{RunConfig, Trajectory};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Optimal savings and emission control in the DICE model
#[derive(Parser, Debug)]
#[command(name = "rdice")]
#[command(about = "Optimise the DICE climate-economy model and report the trajectory")]
struct Args {
    /// TOML run configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Damage exponent
    #[arg(long)]
    a3: Option<f64>,

    /// Pure rate of social time preference (per year)
    #[arg(long)]
    prstp: Option<f64>,

    /// Elasticity of marginal utility of consumption
    #[arg(long)]
    elasmu: Option<f64>,

    /// Write the trajectory as JSON to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Period stride of the summary table
    #[arg(long)]
    stride: Option<usize>,

    /// Maximum number of solver iterations
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Log solver iterations
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = match &args.config {
        Some(path) => RunConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => RunConfig::default(),
    }
    .with_overrides(args.a3, args.prstp, args.elasmu);
    if let Some(max_iterations) = args.max_iterations {
        config.solver.max_iterations = max_iterations;
    }
    if let Some(stride) = args.stride {
        config.output.stride = stride;
    }
    if args.output.is_some() {
        config.output.json = args.output.clone();
    }

    let mut dice = config.build_model().context("Invalid model parameters")?;
    let (x_start, bounds) = dice.get_control_bounds_and_startvalue();
    info!(controls = x_start.len(), "Starting optimisation");

    let result = optimize_controls(&mut dice, &x_start, &bounds, &config.solver)
        .context("Optimisation failed")?;

    let trajectory = Trajectory::from_dice(&dice, config.output.stride);
    print!("{}", trajectory.summary_table());

    if let Some(path) = &config.output.json {
        let json = trajectory.to_json()?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "Wrote trajectory");
    }

    if result.converged {
        Ok(ExitCode::SUCCESS)
    } else {
        warn!(status = ?result.status, "Solver did not converge");
        Ok(ExitCode::FAILURE)
    }
}
