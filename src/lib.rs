//! rdice
//!
//! The DICE integrated assessment model: a coupled economy and climate simulation
//! whose savings and emission-control trajectories are chosen to maximise
//! discounted welfare.
//!
//! The model itself lives in [`rdice_core`] and the optimiser in
//! [`rdice_optimise`]. This crate adds run configuration files and reporting, and
//! provides the `rdice` command line tool.

pub mod config;
pub mod report;

pub use rdice_core;
pub use rdice_optimise;

pub use config::{OutputConfig, RunConfig};
pub use report::{SummaryRow, Trajectory};

use rdice_core::errors::DiceError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while configuring or reporting a run.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid run configuration: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Could not serialise the trajectory: {0}")]
    Serialise(#[from] serde_json::Error),
    #[error(transparent)]
    Model(#[from] DiceError),
    #[error(transparent)]
    Optimise(#[from] rdice_optimise::Error),
}

/// Convenience type for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
