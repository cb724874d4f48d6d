//! Finite-difference gradients that respect box bounds.
//!
//! Each component uses a central difference when both perturbed points lie inside
//! the box, a one-sided difference against the nearer bound otherwise, and the
//! secant across the whole interval when the interval is narrower than two steps.
//! Components are independent, so the parallel evaluation returns exactly the
//! same numbers as the sequential one.

use crate::objective::ObjectiveFn;
use rayon::prelude::*;
use rdice_core::bounds::BoxBounds;

/// Gradient estimate and the number of objective evaluations it took.
#[derive(Debug, Clone)]
pub struct GradientEstimate {
    pub gradient: Vec<f64>,
    pub evaluations: usize,
}

/// Bound-aware finite-difference gradient of `objective` at `x`.
///
/// `f_x` is the objective at `x`, reused by the one-sided differences. The step
/// for component `i` is `step * max(1, |x[i]|)`.
pub fn finite_difference<F: ObjectiveFn + ?Sized>(
    objective: &F,
    x: &[f64],
    f_x: f64,
    bounds: &BoxBounds,
    step: f64,
    parallel: bool,
) -> GradientEstimate {
    let component = |i: usize| -> (f64, usize) { partial(objective, x, f_x, bounds, step, i) };

    let parts: Vec<(f64, usize)> = if parallel {
        (0..x.len()).into_par_iter().map(component).collect()
    } else {
        (0..x.len()).map(component).collect()
    };

    let evaluations = parts.iter().map(|(_, n)| n).sum();
    GradientEstimate {
        gradient: parts.into_iter().map(|(g, _)| g).collect(),
        evaluations,
    }
}

fn partial<F: ObjectiveFn + ?Sized>(
    objective: &F,
    x: &[f64],
    f_x: f64,
    bounds: &BoxBounds,
    step: f64,
    i: usize,
) -> (f64, usize) {
    let lo = bounds.lower[i];
    let hi = bounds.upper[i];
    let h = step * x[i].abs().max(1.0);
    let mut point = x.to_vec();

    let mut at = |value: f64| {
        point[i] = value;
        objective.evaluate(&point)
    };

    if hi - lo < 2.0 * h {
        if hi > lo {
            let f_hi = at(hi);
            let f_lo = at(lo);
            return ((f_hi - f_lo) / (hi - lo), 2);
        }
        return (0.0, 0);
    }

    let up = x[i] + h;
    let down = x[i] - h;
    if up <= hi && down >= lo {
        let f_up = at(up);
        let f_down = at(down);
        ((f_up - f_down) / (2.0 * h), 2)
    } else if up <= hi {
        ((at(up) - f_x) / h, 1)
    } else {
        ((f_x - at(down)) / h, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::ClosureObjective;
    use approx::assert_relative_eq;

    fn quadratic() -> ClosureObjective<impl Fn(&[f64]) -> f64 + Sync> {
        ClosureObjective::new(3, |x: &[f64]| {
            x[0] * x[0] + 3.0 * x[1] * x[1] - 2.0 * x[0] * x[2] + x[2]
        })
    }

    #[test]
    fn test_central_difference_interior() {
        let f = quadratic();
        let x = [0.5, -0.2, 0.3];
        let bounds = BoxBounds::uniform(3, -10.0, 10.0);
        let estimate = finite_difference(&f, &x, f.evaluate(&x), &bounds, 1e-6, false);

        assert_relative_eq!(estimate.gradient[0], 2.0 * 0.5 - 2.0 * 0.3, epsilon = 1e-6);
        assert_relative_eq!(estimate.gradient[1], 6.0 * -0.2, epsilon = 1e-6);
        assert_relative_eq!(estimate.gradient[2], -2.0 * 0.5 + 1.0, epsilon = 1e-6);
        assert_eq!(estimate.evaluations, 6);
    }

    #[test]
    fn test_one_sided_at_bounds() {
        let f = quadratic();
        let x = [0.0, 1.0, 0.3];
        let bounds = BoxBounds::new(vec![0.0, -1.0, -1.0], vec![1.0, 1.0, 1.0]);
        let estimate = finite_difference(&f, &x, f.evaluate(&x), &bounds, 1e-6, false);

        assert_relative_eq!(estimate.gradient[0], -0.6, epsilon = 1e-5);
        assert_relative_eq!(estimate.gradient[1], 6.0, epsilon = 1e-4);
        // Two one-sided components and one central
        assert_eq!(estimate.evaluations, 4);
    }

    #[test]
    fn test_narrow_interval_uses_secant() {
        let f = ClosureObjective::new(1, |x: &[f64]| 4.0 * x[0]);
        let x = [0.03];
        let bounds = BoxBounds::new(vec![0.03 * 0.99999], vec![0.03]);
        let estimate = finite_difference(&f, &x, f.evaluate(&x), &bounds, 1e-4, false);
        assert_relative_eq!(estimate.gradient[0], 4.0, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_width_interval_has_zero_gradient() {
        let f = ClosureObjective::new(1, |x: &[f64]| 4.0 * x[0]);
        let bounds = BoxBounds::uniform(1, 0.5, 0.5);
        let estimate = finite_difference(&f, &[0.5], 2.0, &bounds, 1e-6, false);
        assert_eq!(estimate.gradient, vec![0.0]);
        assert_eq!(estimate.evaluations, 0);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let f = ClosureObjective::new(50, |x: &[f64]| {
            x.iter()
                .enumerate()
                .map(|(i, v)| (i as f64 + 1.0) * (v - 0.1).powi(2) + v.sin())
                .sum::<f64>()
        });
        let x: Vec<f64> = (0..50).map(|i| i as f64 / 50.0).collect();
        let bounds = BoxBounds::uniform(50, 0.0, 1.0);
        let fx = f.evaluate(&x);

        let sequential = finite_difference(&f, &x, fx, &bounds, 1e-6, false);
        let parallel = finite_difference(&f, &x, fx, &bounds, 1e-6, true);
        assert_eq!(sequential.gradient, parallel.gradient);
        assert_eq!(sequential.evaluations, parallel.evaluations);
    }
}
