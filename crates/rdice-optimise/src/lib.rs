//! Optimisation of the DICE controls
//!
//! Finds the mitigation and savings trajectories that maximise discounted welfare,
//! subject to the box bounds built by `rdice_core::bounds`.
//!
//! The solver is a projected limited-memory BFGS method for box constraints,
//! driven by finite-difference gradients. Any objective implementing
//! [`ObjectiveFn`] can be minimised; [`DiceProblem`] adapts a DICE run.
//!
//! This is a local method. Non-convexity of the welfare landscape means different
//! start points can reach different optima.
//!
//! # Example
//!
//! ```no_run
//! use rdice_core::parameters::DiceParameters;
//! use rdice_core::Dice;
//! use rdice_optimise::{optimize_controls, SolverOptions};
//!
//! let mut dice = Dice::new(DiceParameters::default())?;
//! let (x_start, bounds) = dice.get_control_bounds_and_startvalue();
//! let result = optimize_controls(&mut dice, &x_start, &bounds, &SolverOptions::default())?;
//! if !result.converged {
//!     eprintln!("solver stopped early: {}", result.message);
//! }
//! # Ok::<(), rdice_optimise::Error>(())
//! ```

mod driver;
pub mod gradient;
mod lbfgs;
pub mod objective;
pub mod solver;

pub use driver::{optimize, optimize_controls, DiceProblem};
pub use objective::{ClosureObjective, ObjectiveFn};
pub use solver::{Minimizer, OptimizeResult, ProjectedLbfgsB, SolverOptions, TerminationStatus};

use rdice_core::errors::DiceError;
use thiserror::Error;

/// Errors raised while setting up or driving an optimisation.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid optimisation problem: {0}")]
    InvalidProblem(String),
    #[error(transparent)]
    Model(#[from] DiceError),
}

/// Convenience type for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
