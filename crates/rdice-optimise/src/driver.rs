//! Optimisation of a [`Dice`] run.

use crate::objective::ObjectiveFn;
use crate::solver::{Minimizer, OptimizeResult, ProjectedLbfgsB, SolverOptions};
use crate::Result;
use rdice_core::bounds::BoxBounds;
use rdice_core::exogenous::ExogenousSeries;
use rdice_core::objective::objective;
use rdice_core::parameters::DiceParameters;
use rdice_core::state::DiceState;
use rdice_core::Dice;
use std::cell::RefCell;
use tracing::{info, warn};

thread_local! {
    static ROLLOUT_BUFFER: RefCell<DiceState> = RefCell::new(DiceState::zeros(0));
}

/// Negated DICE welfare as a function of the flattened `[μ, S]` controls.
///
/// Borrows the parameters and exogenous series of a run. Evaluations roll out
/// into a per-thread state buffer and never touch the run's own state.
#[derive(Debug, Clone, Copy)]
pub struct DiceProblem<'a> {
    params: &'a DiceParameters,
    exogenous: &'a ExogenousSeries,
}

impl<'a> DiceProblem<'a> {
    pub fn new(params: &'a DiceParameters, exogenous: &'a ExogenousSeries) -> Self {
        Self { params, exogenous }
    }

    pub fn from_dice(dice: &'a Dice) -> Self {
        Self::new(dice.parameters(), dice.exogenous())
    }
}

impl ObjectiveFn for DiceProblem<'_> {
    fn dimension(&self) -> usize {
        self.params.horizon.n_controls()
    }

    /// NaN when the controls cannot be rolled out.
    fn evaluate(&self, x: &[f64]) -> f64 {
        ROLLOUT_BUFFER.with(|buffer| {
            let mut state = buffer.borrow_mut();
            objective(self.params, self.exogenous, x, &mut state).unwrap_or(f64::NAN)
        })
    }
}

/// Maximise welfare from `x_start` within `bounds`.
///
/// The optimal controls are stored on `dice` and its state is left at the
/// corresponding rollout. A solver that stops without converging is not an error:
/// the best point found is still stored, and the result says why it stopped.
pub fn optimize_controls(
    dice: &mut Dice,
    x_start: &[f64],
    bounds: &BoxBounds,
    options: &SolverOptions,
) -> Result<OptimizeResult> {
    let solver = ProjectedLbfgsB::new(options.clone());
    let result = {
        let problem = DiceProblem::from_dice(dice);
        solver.minimize(&problem, x_start, bounds)?
    };

    if result.converged {
        info!(
            welfare = -result.fun,
            iterations = result.iterations,
            evaluations = result.evaluations,
            "Optimisation converged: {}",
            result.message
        );
    } else {
        warn!(
            welfare = -result.fun,
            iterations = result.iterations,
            projected_gradient = result.projected_gradient_norm,
            status = ?result.status,
            "Optimisation did not converge: {}",
            result.message
        );
    }

    dice.set_optimal_controls(result.x.clone())?;
    dice.roll_out(&result.x)?;
    Ok(result)
}

/// [`optimize_controls`] from the run's own start point and bounds.
pub fn optimize(dice: &mut Dice, options: &SolverOptions) -> Result<OptimizeResult> {
    let (x_start, bounds) = dice.get_control_bounds_and_startvalue();
    optimize_controls(dice, &x_start, &bounds, options)
}
