//! Run configuration files.
//!
//! A run is described by a TOML document with four optional tables:
//!
//! ```toml
//! [parameters.damages]
//! a3 = 3.0
//!
//! [bounds]
//! miu_early_periods = 20
//!
//! [solver]
//! max_iterations = 500
//!
//! [output]
//! json = "trajectory.json"
//! stride = 5
//! ```
//!
//! Missing tables and keys take their default values.

use crate::{Error, Result};
use rdice_core::bounds::ControlBoundsConfig;
use rdice_core::parameters::DiceParameters;
use rdice_core::Dice;
use rdice_optimise::SolverOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where and how densely results are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the JSON trajectory export. Nothing is written when unset.
    pub json: Option<PathBuf>,

    /// Period stride of the summary table.
    /// Default: 10
    pub stride: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json: None,
            stride: 10,
        }
    }
}

/// Everything needed to build, optimise and report one DICE run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub parameters: DiceParameters,
    pub bounds: ControlBoundsConfig,
    pub solver: SolverOptions,
    pub output: OutputConfig,
}

impl RunConfig {
    pub fn from_toml_str(document: &str) -> Result<Self> {
        Ok(toml::from_str(document)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let document = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&document)
    }

    /// Override the damage exponent, pure rate of time preference and elasticity
    /// of marginal utility where given.
    pub fn with_overrides(
        mut self,
        a3: Option<f64>,
        prstp: Option<f64>,
        elasmu: Option<f64>,
    ) -> Self {
        if let Some(a3) = a3 {
            self.parameters.damages.a3 = a3;
        }
        if let Some(prstp) = prstp {
            self.parameters.welfare.prstp = prstp;
        }
        if let Some(elasmu) = elasmu {
            self.parameters.welfare.elasmu = elasmu;
        }
        self.parameters.refresh_derived();
        self
    }

    /// Construct the run object described by the configuration.
    pub fn build_model(&self) -> Result<Dice> {
        Ok(Dice::with_bounds_config(
            self.parameters.clone(),
            self.bounds.clone(),
        )?)
    }
}
