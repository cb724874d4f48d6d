//! Limited-memory BFGS history and the two-loop recursion restricted to free
//! variables.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
struct HistoryPair {
    s: Vec<f64>,
    y: Vec<f64>,
    rho: f64,
}

#[derive(Debug, Clone)]
pub(crate) struct LbfgsHistory {
    pairs: VecDeque<HistoryPair>,
    capacity: usize,
    min_curvature: f64,
    pub(crate) curvature_skips: usize,
}

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn dot_masked(a: &[f64], b: &[f64], free: &[bool]) -> f64 {
    a.iter()
        .zip(b.iter())
        .zip(free.iter())
        .map(|((&ai, &bi), &is_free)| if is_free { ai * bi } else { 0.0 })
        .sum()
}

fn norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

impl LbfgsHistory {
    pub(crate) fn new(capacity: usize, min_curvature: f64) -> Self {
        Self {
            pairs: VecDeque::with_capacity(capacity),
            capacity,
            min_curvature,
            curvature_skips: 0,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.pairs.len()
    }

    pub(crate) fn clear(&mut self) {
        self.pairs.clear();
    }

    /// Store a step `s` and gradient change `y`, unless the pair fails the
    /// curvature condition `s'y > min_curvature * |s| |y|`.
    pub(crate) fn update(&mut self, s: Vec<f64>, y: Vec<f64>) {
        if self.capacity == 0 {
            return;
        }

        let s_dot_y = dot(&s, &y);
        let curvature_floor = self.min_curvature * norm(&s) * norm(&y);
        if !s_dot_y.is_finite()
            || !curvature_floor.is_finite()
            || s_dot_y <= curvature_floor
            || s_dot_y <= 0.0
        {
            self.curvature_skips += 1;
            return;
        }

        self.pairs.push_back(HistoryPair {
            rho: 1.0 / s_dot_y,
            s,
            y,
        });
        while self.pairs.len() > self.capacity {
            self.pairs.pop_front();
        }
    }

    /// Quasi-Newton descent direction `-H g` over the free variables.
    ///
    /// The initial inverse Hessian is `gamma * I` with `gamma = s'y / y'y` of the
    /// newest pair. Fixed variables get a zero direction.
    pub(crate) fn direction(&self, grad: &[f64], free: &[bool]) -> Vec<f64> {
        let mut q: Vec<f64> = grad
            .iter()
            .zip(free.iter())
            .map(|(&g, &is_free)| if is_free { g } else { 0.0 })
            .collect();

        let mut alphas = Vec::with_capacity(self.pairs.len());
        for pair in self.pairs.iter().rev() {
            let alpha = pair.rho * dot_masked(&pair.s, &q, free);
            alphas.push(alpha);
            for i in 0..q.len() {
                if free[i] {
                    q[i] -= alpha * pair.y[i];
                }
            }
        }

        let gamma = match self.pairs.back() {
            Some(newest) => {
                let yy = dot_masked(&newest.y, &newest.y, free);
                if yy > 0.0 {
                    dot_masked(&newest.s, &newest.y, free) / yy
                } else {
                    1.0
                }
            }
            None => 1.0,
        };

        let mut r: Vec<f64> = q.iter().map(|v| gamma * v).collect();
        for (pair, alpha) in self.pairs.iter().zip(alphas.into_iter().rev()) {
            let beta = pair.rho * dot_masked(&pair.y, &r, free);
            for i in 0..r.len() {
                if free[i] {
                    r[i] += pair.s[i] * (alpha - beta);
                }
            }
        }

        for v in &mut r {
            *v = -*v;
        }
        r
    }
}
