//! Objective functions for the minimiser.

/// A scalar function of a flat real vector, to be minimised.
///
/// Implementations must be callable from several threads at once: the gradient
/// is evaluated in parallel. Non-finite return values are treated as infeasible
/// points by the line search.
pub trait ObjectiveFn: Sync {
    /// Length of the argument vector.
    fn dimension(&self) -> usize;

    /// Value at `x`.
    fn evaluate(&self, x: &[f64]) -> f64;
}

/// [`ObjectiveFn`] backed by a closure.
pub struct ClosureObjective<F> {
    dimension: usize,
    f: F,
}

impl<F> ClosureObjective<F>
where
    F: Fn(&[f64]) -> f64 + Sync,
{
    pub fn new(dimension: usize, f: F) -> Self {
        Self { dimension, f }
    }
}

impl<F> ObjectiveFn for ClosureObjective<F>
where
    F: Fn(&[f64]) -> f64 + Sync,
{
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn evaluate(&self, x: &[f64]) -> f64 {
        (self.f)(x)
    }
}
