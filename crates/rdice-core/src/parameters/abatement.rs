//! Abatement cost parameters

use crate::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

/// Parameters of the abatement cost function and the backstop technology.
///
/// Abatement costs are
///
/// $$\Lambda(t) = Y_{gross}(t) \theta_1(t) \mu(t)^{\theta_2}$$
///
/// with $\theta_1$ (`cost1`) tied to the declining backstop price and
/// $\theta_2$ = `expcost2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbatementParameters {
    /// Exponent of the control cost function.
    /// Default: 2.6
    pub expcost2: FloatValue,

    /// Cost of the backstop technology (2010 USD per tCO2, first period).
    /// Default: 550
    pub pback: FloatValue,

    /// Initial cost decline of the backstop (per period).
    /// Default: 0.025
    pub gback: FloatValue,

    /// Upper limit on the control rate after 2150.
    /// Default: 1.2
    pub limmiu: FloatValue,

    /// Period before which there is no emissions control in the base case.
    /// Default: 45
    pub tnopol: FloatValue,

    /// Initial base carbon price (2010 USD per tCO2).
    /// Default: 2.0
    pub cprice0: FloatValue,

    /// Growth rate of the base carbon price (per year).
    /// Default: 0.02
    pub gcprice: FloatValue,
}

impl Default for AbatementParameters {
    fn default() -> Self {
        Self {
            expcost2: 2.6,
            pback: 550.0,
            gback: 0.025,
            limmiu: 1.2,
            tnopol: 45.0,
            cprice0: 2.0,
            gcprice: 0.02,
        }
    }
}
