//! Welfare parameters
//!
//! Preferences and the rescaling constants of the objective.

use crate::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

/// Parameters of the social welfare function.
///
/// `scale1` and `scale2` are chosen so that, in the base case, the marginal utility
/// of first period consumption is one and present-value utility equals
/// present-value consumption. They condition the problem for the optimiser and do
/// not move the optimum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WelfareParameters {
    /// Elasticity of marginal utility of consumption.
    /// Default: 1.45
    pub elasmu: FloatValue,

    /// Initial rate of social time preference (per year).
    /// Default: 0.015
    pub prstp: FloatValue,

    /// Multiplicative scaling coefficient.
    /// Default: 0.0302455265681763
    pub scale1: FloatValue,

    /// Additive scaling coefficient.
    /// Default: -10993.704
    pub scale2: FloatValue,
}

impl Default for WelfareParameters {
    fn default() -> Self {
        Self {
            elasmu: 1.45,
            prstp: 0.015,
            scale1: 0.0302455265681763,
            scale2: -10993.704,
        }
    }
}
