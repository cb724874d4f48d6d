//! Box bounds and start point for the control vector.
//!
//! Initial conditions and the transversality condition are expressed as pinned
//! (equal lower and upper) bounds at specific indices. Because box-constrained
//! solvers may reject zero-width intervals, every pinned pair has its lower bound
//! nudged down multiplicatively.

use crate::errors::{DiceError, DiceResult};
use crate::parameters::DiceParameters;
use crate::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

/// Configuration of the control bounds and start point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlBoundsConfig {
    /// Lower bound on the mitigation rate after the first period.
    /// Default: 0.01
    pub miu_lower: FloatValue,

    /// Upper bound on the mitigation rate during the early periods.
    /// `abatement.limmiu` applies afterwards.
    /// Default: 1.0
    pub miu_upper_early: FloatValue,

    /// Number of early periods capped at `miu_upper_early`.
    /// Default: 29
    pub miu_early_periods: usize,

    /// Lower bound on the savings rate.
    /// Default: 0.1
    pub savings_lower: FloatValue,

    /// Upper bound on the savings rate.
    /// Default: 0.9
    pub savings_upper: FloatValue,

    /// Number of final periods with the savings rate pinned to `optlrsav`.
    /// Default: 10
    pub savings_pinned_periods: usize,

    /// Factor applied to the lower bound of a zero-width interval.
    /// Default: 0.99999
    pub degenerate_nudge: FloatValue,

    /// Mitigation start value as a fraction of its upper bound.
    /// Default: 0.99
    pub miu_start_fraction: FloatValue,

    /// Savings start value.
    /// Default: 0.2
    pub savings_start: FloatValue,
}

impl Default for ControlBoundsConfig {
    fn default() -> Self {
        Self {
            miu_lower: 0.01,
            miu_upper_early: 1.0,
            miu_early_periods: 29,
            savings_lower: 0.1,
            savings_upper: 0.9,
            savings_pinned_periods: 10,
            degenerate_nudge: 0.99999,
            miu_start_fraction: 0.99,
            savings_start: 0.2,
        }
    }
}

impl ControlBoundsConfig {
    /// Check the configuration against a horizon of `nt` periods.
    ///
    /// The pinned final savings periods must leave at least one free period, and
    /// each lower bound must not exceed its upper bound.
    pub fn validate(&self, nt: usize) -> DiceResult<()> {
        if self.savings_pinned_periods >= nt {
            return Err(DiceError::InvalidParameter {
                name: "bounds.savings_pinned_periods".to_string(),
                reason: format!(
                    "{} pinned periods do not fit a horizon of {} periods",
                    self.savings_pinned_periods, nt
                ),
            });
        }
        if !(self.miu_lower <= self.miu_upper_early) {
            return Err(DiceError::InvalidParameter {
                name: "bounds.miu_lower".to_string(),
                reason: "must not exceed bounds.miu_upper_early".to_string(),
            });
        }
        if !(self.savings_lower <= self.savings_upper) {
            return Err(DiceError::InvalidParameter {
                name: "bounds.savings_lower".to_string(),
                reason: "must not exceed bounds.savings_upper".to_string(),
            });
        }
        Ok(())
    }
}

/// Per-element lower and upper bounds of a vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxBounds {
    pub lower: Vec<FloatValue>,
    pub upper: Vec<FloatValue>,
}

impl BoxBounds {
    /// Bounds from matching lower and upper vectors.
    ///
    /// # Panics
    /// Panics if the vectors have different lengths.
    pub fn new(lower: Vec<FloatValue>, upper: Vec<FloatValue>) -> Self {
        assert_eq!(
            lower.len(),
            upper.len(),
            "lower and upper bounds must have the same length"
        );
        Self { lower, upper }
    }

    /// The same interval for every element.
    pub fn uniform(n: usize, lower: FloatValue, upper: FloatValue) -> Self {
        Self::new(vec![lower; n], vec![upper; n])
    }

    pub fn len(&self) -> usize {
        self.lower.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    /// Iterate over `(lower, upper)` pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (FloatValue, FloatValue)> + '_ {
        self.lower.iter().copied().zip(self.upper.iter().copied())
    }

    /// Whether `x` lies inside the box (bounds included).
    pub fn contains(&self, x: &[FloatValue]) -> bool {
        x.len() == self.len() && x.iter().zip(self.pairs()).all(|(&v, (lo, hi))| lo <= v && v <= hi)
    }

    /// Index of the first pair with `lower > upper`, if any.
    pub fn first_infeasible(&self) -> Option<usize> {
        self.pairs().position(|(lo, hi)| !(lo <= hi))
    }

    /// Whether any pair has zero width.
    pub fn is_degenerate(&self) -> bool {
        self.pairs().any(|(lo, hi)| lo == hi)
    }

    /// Clip `x` into the box in place.
    pub fn project(&self, x: &mut [FloatValue]) {
        for (xi, (lo, hi)) in x.iter_mut().zip(self.pairs()) {
            *xi = xi.max(lo).min(hi);
        }
    }
}

/// Bounds and start point for the flattened `[μ, S]` control vector.
///
/// - μ: `[miu_lower, limmiu]`, upper capped at `miu_upper_early` for the first
///   `miu_early_periods`, both bounds `miu0` in the first period
/// - S: `[savings_lower, savings_upper]`, both bounds `optlrsav` over the final
///   `savings_pinned_periods`
/// - pinned pairs get `lower *= degenerate_nudge`
/// - start: μ at `miu_start_fraction` of its upper bound, S at `savings_start`,
///   both clipped into the box
pub fn get_control_bounds_and_startvalue(
    params: &DiceParameters,
    config: &ControlBoundsConfig,
) -> (Vec<FloatValue>, BoxBounds) {
    let nt = params.nt();
    let miu0 = params.emissions.miu0;
    let optlrsav = params.derived().optlrsav;

    let mut miu_lower = vec![config.miu_lower; nt];
    let mut miu_upper = vec![params.abatement.limmiu; nt];
    for upper in miu_upper.iter_mut().take(config.miu_early_periods) {
        *upper = config.miu_upper_early;
    }
    if nt > 0 {
        miu_lower[0] = miu0;
        miu_upper[0] = miu0;
    }

    let mut savings_lower = vec![config.savings_lower; nt];
    let mut savings_upper = vec![config.savings_upper; nt];
    let pinned_from = nt.saturating_sub(config.savings_pinned_periods);
    for t in pinned_from..nt {
        savings_lower[t] = optlrsav;
        savings_upper[t] = optlrsav;
    }

    nudge_degenerate(&mut miu_lower, &miu_upper, config.degenerate_nudge);
    nudge_degenerate(&mut savings_lower, &savings_upper, config.degenerate_nudge);

    let miu_start: Vec<FloatValue> = miu_upper
        .iter()
        .zip(miu_lower.iter())
        .map(|(&hi, &lo)| (config.miu_start_fraction * hi).max(lo).min(hi))
        .collect();
    let savings_start: Vec<FloatValue> = savings_lower
        .iter()
        .zip(savings_upper.iter())
        .map(|(&lo, &hi)| config.savings_start.max(lo).min(hi))
        .collect();

    let mut lower = miu_lower;
    lower.extend(savings_lower);
    let mut upper = miu_upper;
    upper.extend(savings_upper);

    let mut x_start = miu_start;
    x_start.extend(savings_start);

    (x_start, BoxBounds::new(lower, upper))
}

fn nudge_degenerate(lower: &mut [FloatValue], upper: &[FloatValue], factor: FloatValue) {
    for (lo, &hi) in lower.iter_mut().zip(upper.iter()) {
        if *lo == hi {
            *lo *= factor;
        }
    }
}
