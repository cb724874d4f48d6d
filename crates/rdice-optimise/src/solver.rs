//! Projected limited-memory BFGS for box-constrained minimisation.
//!
//! Each iteration works on the set of free variables, i.e. those not held at a
//! bound by a gradient pointing out of the box. A quasi-Newton direction is built
//! over the free set, trial points are projected back into the box and accepted
//! by an Armijo backtracking search. When the quasi-Newton direction cannot make
//! progress the curvature history is discarded and a scaled steepest-descent step
//! is tried before giving up.

use crate::gradient::finite_difference;
use crate::lbfgs::{dot, LbfgsHistory};
use crate::objective::ObjectiveFn;
use crate::{Error, Result};
use rdice_core::bounds::BoxBounds;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Pairs with `s'y` below this fraction of `|s| |y|` are not stored.
const MIN_CURVATURE: f64 = 1e-10;

/// Relative distance at which a variable counts as sitting on its bound.
const BOUND_TOLERANCE: f64 = 1e-12;

/// Settings of [`ProjectedLbfgsB`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Maximum number of accepted steps.
    /// Default: 1000
    pub max_iterations: usize,

    /// Stop when the projected gradient norm falls below
    /// `pg_tolerance * (1 + |f|)`.
    /// Default: 1e-6
    pub pg_tolerance: f64,

    /// Stop when an accepted step changes the objective by less than
    /// `f_tolerance * max(1, |f|)`.
    /// Default: 1e-10
    pub f_tolerance: f64,

    /// Number of curvature pairs kept.
    /// Default: 20
    pub history: usize,

    /// Sufficient decrease constant of the Armijo condition.
    /// Default: 1e-4
    pub c1: f64,

    /// Factor applied to the step length after a rejected trial.
    /// Default: 0.5
    pub backtracking: f64,

    /// Maximum trials per line search.
    /// Default: 40
    pub max_line_search: usize,

    /// Relative step of the finite-difference gradient.
    /// Default: 1e-6
    pub fd_step: f64,

    /// Largest component of a steepest-descent step.
    /// Default: 0.1
    pub initial_step: f64,

    /// Evaluate gradient components in parallel.
    /// Default: true
    pub parallel: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            pg_tolerance: 1e-6,
            f_tolerance: 1e-10,
            history: 20,
            c1: 1e-4,
            backtracking: 0.5,
            max_line_search: 40,
            fd_step: 1e-6,
            initial_step: 0.1,
            parallel: true,
        }
    }
}

/// Why the solver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationStatus {
    GradientTolerance,
    FunctionTolerance,
    MaxIterations,
    LineSearchStalled,
    NonFiniteObjective,
}

impl fmt::Display for TerminationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            TerminationStatus::GradientTolerance => "projected gradient below tolerance",
            TerminationStatus::FunctionTolerance => "relative objective change below tolerance",
            TerminationStatus::MaxIterations => "maximum number of iterations reached",
            TerminationStatus::LineSearchStalled => "line search could not find a decrease",
            TerminationStatus::NonFiniteObjective => "objective or gradient is not finite",
        };
        write!(f, "{}", message)
    }
}

/// Outcome of a minimisation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeResult {
    /// Best point found, inside the bounds.
    pub x: Vec<f64>,
    /// Objective at `x`.
    pub fun: f64,
    pub converged: bool,
    pub status: TerminationStatus,
    pub message: String,
    /// Accepted steps.
    pub iterations: usize,
    /// Objective evaluations, gradient evaluations included.
    pub evaluations: usize,
    pub projected_gradient_norm: f64,
    /// Objective at the start point and after every accepted step.
    pub objective_trace: Vec<f64>,
}

/// A box-constrained minimiser.
pub trait Minimizer {
    /// Minimise `objective` over `bounds`, starting from `x0`.
    ///
    /// `x0` is projected into the box first. Dimension mismatches and bounds with
    /// `lower > upper` are errors; every other way of stopping is reported in the
    /// result.
    fn minimize<F: ObjectiveFn + ?Sized>(
        &self,
        objective: &F,
        x0: &[f64],
        bounds: &BoxBounds,
    ) -> Result<OptimizeResult>;
}

/// Projected L-BFGS with finite-difference gradients.
#[derive(Debug, Clone, Default)]
pub struct ProjectedLbfgsB {
    pub options: SolverOptions,
}

impl ProjectedLbfgsB {
    pub fn new(options: SolverOptions) -> Self {
        Self { options }
    }

    fn gradient<F: ObjectiveFn + ?Sized>(
        &self,
        objective: &F,
        x: &[f64],
        f_x: f64,
        bounds: &BoxBounds,
        evaluations: &mut usize,
    ) -> Vec<f64> {
        let estimate = finite_difference(
            objective,
            x,
            f_x,
            bounds,
            self.options.fd_step,
            self.options.parallel,
        );
        *evaluations += estimate.evaluations;
        estimate.gradient
    }

    /// Armijo backtracking along the projected path `P(x + alpha d)`.
    #[allow(clippy::too_many_arguments)]
    fn line_search<F: ObjectiveFn + ?Sized>(
        &self,
        objective: &F,
        x: &[f64],
        f_x: f64,
        grad: &[f64],
        direction: &[f64],
        bounds: &BoxBounds,
        evaluations: &mut usize,
    ) -> Option<(Vec<f64>, f64)> {
        let mut alpha = 1.0;
        for _ in 0..self.options.max_line_search {
            let mut trial: Vec<f64> = x
                .iter()
                .zip(direction.iter())
                .map(|(xi, di)| xi + alpha * di)
                .collect();
            bounds.project(&mut trial);

            let step: Vec<f64> = trial.iter().zip(x.iter()).map(|(t, xi)| t - xi).collect();
            if step.iter().all(|&s| s == 0.0) {
                return None;
            }

            let f_trial = objective.evaluate(&trial);
            *evaluations += 1;
            if !f_trial.is_finite() {
                warn!(alpha, objective = f_trial, "Rejected non-finite trial objective");
            }
            let decrease = self.options.c1 * dot(grad, &step).min(0.0);
            if f_trial.is_finite() && f_trial <= f_x + decrease {
                return Some((trial, f_trial));
            }
            alpha *= self.options.backtracking;
        }
        None
    }

    #[allow(clippy::too_many_arguments)]
    fn finish(
        &self,
        x: Vec<f64>,
        fun: f64,
        status: TerminationStatus,
        iterations: usize,
        evaluations: usize,
        projected_gradient_norm: f64,
        objective_trace: Vec<f64>,
    ) -> OptimizeResult {
        let converged = match status {
            TerminationStatus::GradientTolerance | TerminationStatus::FunctionTolerance => true,
            TerminationStatus::LineSearchStalled => {
                projected_gradient_norm <= 10.0 * self.options.pg_tolerance * (1.0 + fun.abs())
            }
            TerminationStatus::MaxIterations | TerminationStatus::NonFiniteObjective => false,
        };
        OptimizeResult {
            x,
            fun,
            converged,
            status,
            message: status.to_string(),
            iterations,
            evaluations,
            projected_gradient_norm,
            objective_trace,
        }
    }
}

impl Minimizer for ProjectedLbfgsB {
    fn minimize<F: ObjectiveFn + ?Sized>(
        &self,
        objective: &F,
        x0: &[f64],
        bounds: &BoxBounds,
    ) -> Result<OptimizeResult> {
        let n = objective.dimension();
        if x0.len() != n {
            return Err(Error::InvalidProblem(format!(
                "Start point has length {} but the objective expects {}",
                x0.len(),
                n
            )));
        }
        if bounds.lower.len() != n || bounds.upper.len() != n {
            return Err(Error::InvalidProblem(format!(
                "Bounds have lengths {} (lower) and {} (upper) but the objective expects {}",
                bounds.lower.len(),
                bounds.upper.len(),
                n
            )));
        }
        if let Some(i) = bounds.first_infeasible() {
            return Err(Error::InvalidProblem(format!(
                "Lower bound {} exceeds upper bound {} at index {}",
                bounds.lower[i], bounds.upper[i], i
            )));
        }

        let mut x = x0.to_vec();
        bounds.project(&mut x);
        let mut f = objective.evaluate(&x);
        let mut evaluations = 1;
        let mut trace = vec![f];
        if !f.is_finite() {
            return Ok(self.finish(
                x,
                f,
                TerminationStatus::NonFiniteObjective,
                0,
                evaluations,
                f64::NAN,
                trace,
            ));
        }

        let mut grad = self.gradient(objective, &x, f, bounds, &mut evaluations);
        let mut history = LbfgsHistory::new(self.options.history, MIN_CURVATURE);
        let mut iterations = 0;

        let (status, pg) = loop {
            if grad.iter().any(|g| !g.is_finite()) {
                break (TerminationStatus::NonFiniteObjective, f64::NAN);
            }
            let pg = projected_gradient_norm(&x, &grad, bounds);
            if pg <= self.options.pg_tolerance * (1.0 + f.abs()) {
                break (TerminationStatus::GradientTolerance, pg);
            }
            if iterations >= self.options.max_iterations {
                break (TerminationStatus::MaxIterations, pg);
            }

            let free = build_free_mask(&x, &grad, bounds);
            let mut quasi_newton = !history.is_empty();
            let mut direction = if quasi_newton {
                history.direction(&grad, &free)
            } else {
                steepest_direction(&grad, &free, self.options.initial_step)
            };
            if quasi_newton && dot(&grad, &direction) >= 0.0 {
                history.clear();
                quasi_newton = false;
                direction = steepest_direction(&grad, &free, self.options.initial_step);
            }

            let mut accepted =
                self.line_search(objective, &x, f, &grad, &direction, bounds, &mut evaluations);
            if accepted.is_none() && quasi_newton {
                debug!(
                    iteration = iterations,
                    "Quasi-Newton step failed, retrying steepest descent"
                );
                history.clear();
                direction = steepest_direction(&grad, &free, self.options.initial_step);
                accepted =
                    self.line_search(objective, &x, f, &grad, &direction, bounds, &mut evaluations);
            }
            let Some((x_new, f_new)) = accepted else {
                break (TerminationStatus::LineSearchStalled, pg);
            };

            let grad_new = self.gradient(objective, &x_new, f_new, bounds, &mut evaluations);
            let s: Vec<f64> = x_new.iter().zip(x.iter()).map(|(a, b)| a - b).collect();
            let y: Vec<f64> = grad_new.iter().zip(grad.iter()).map(|(a, b)| a - b).collect();
            history.update(s, y);

            let change = (f - f_new).abs();
            let scale = f.abs().max(f_new.abs()).max(1.0);
            x = x_new;
            f = f_new;
            grad = grad_new;
            iterations += 1;
            trace.push(f);

            debug!(
                iteration = iterations,
                objective = f,
                projected_gradient = pg,
                history = history.len(),
                free = free.iter().filter(|&&v| v).count(),
                "Accepted step"
            );

            if change <= self.options.f_tolerance * scale {
                break (
                    TerminationStatus::FunctionTolerance,
                    projected_gradient_norm(&x, &grad, bounds),
                );
            }
        };

        if history.curvature_skips > 0 {
            debug!(skipped = history.curvature_skips, "Curvature pairs rejected");
        }

        Ok(self.finish(x, f, status, iterations, evaluations, pg, trace))
    }
}

fn at_lower(x: f64, lo: f64) -> bool {
    x - lo <= BOUND_TOLERANCE * (1.0 + lo.abs())
}

fn at_upper(x: f64, hi: f64) -> bool {
    hi - x <= BOUND_TOLERANCE * (1.0 + hi.abs())
}

/// Gradient component with moves out of the box removed.
pub(crate) fn projected_grad_component(x: f64, g: f64, lo: f64, hi: f64) -> f64 {
    if hi <= lo || (at_lower(x, lo) && g > 0.0) || (at_upper(x, hi) && g < 0.0) {
        0.0
    } else {
        g
    }
}

/// Euclidean norm of the projected gradient.
pub fn projected_gradient_norm(x: &[f64], grad: &[f64], bounds: &BoxBounds) -> f64 {
    x.iter()
        .zip(grad.iter())
        .zip(bounds.pairs())
        .map(|((&xi, &gi), (lo, hi))| projected_grad_component(xi, gi, lo, hi).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Variables that a descent step may move.
pub(crate) fn build_free_mask(x: &[f64], grad: &[f64], bounds: &BoxBounds) -> Vec<bool> {
    x.iter()
        .zip(grad.iter())
        .zip(bounds.pairs())
        .map(|((&xi, &gi), (lo, hi))| projected_grad_component(xi, gi, lo, hi) != 0.0)
        .collect()
}

/// Negative gradient over the free set, scaled so its largest component is
/// `max_step`.
fn steepest_direction(grad: &[f64], free: &[bool], max_step: f64) -> Vec<f64> {
    let largest = grad
        .iter()
        .zip(free.iter())
        .filter(|&(_, &is_free)| is_free)
        .fold(0.0_f64, |acc, (g, _)| acc.max(g.abs()));
    let scale = if largest > 0.0 { max_step / largest } else { 0.0 };
    grad.iter()
        .zip(free.iter())
        .map(|(&g, &is_free)| if is_free { -g * scale } else { 0.0 })
        .collect()
}
