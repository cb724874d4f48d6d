//! Climate model parameters
//!
//! Parameters for the two-layer (atmosphere and upper ocean, deep ocean) energy
//! balance model and the radiative forcing of CO2.

use crate::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

/// Parameters for the two-layer temperature response.
///
/// $$
/// \begin{aligned}
/// T_{AT}(t+1) &= T_{AT}(t) + c_1 \left(F(t+1) - \lambda T_{AT}(t) - c_3 (T_{AT}(t) - T_{LO}(t))\right) \\
/// T_{LO}(t+1) &= T_{LO}(t) + c_4 (T_{AT}(t) - T_{LO}(t))
/// \end{aligned}
/// $$
///
/// with $\lambda = F_{2x} / \text{ECS}$.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimateParameters {
    /// Equilibrium temperature impact of CO2 doubling (K).
    /// Default: 3.1
    pub t2xco2: FloatValue,

    /// Non-CO2 forcing in the first period ($\text{W/m}^2$).
    /// Default: 0.5
    pub fex0: FloatValue,

    /// Non-CO2 forcing once the ramp is complete ($\text{W/m}^2$).
    /// Default: 1.0
    pub fex1: FloatValue,

    /// Initial lower stratum temperature change (K from 1900).
    /// Default: 0.0068
    pub tocean0: FloatValue,

    /// Initial atmospheric temperature change (K from 1900).
    /// Default: 0.85
    pub tatm0: FloatValue,

    /// Climate equation coefficient for the upper level.
    /// Default: 0.1005
    pub c1: FloatValue,

    /// Transfer coefficient from the upper to the lower stratum.
    /// Default: 0.088
    pub c3: FloatValue,

    /// Transfer coefficient for the lower level.
    /// Default: 0.025
    pub c4: FloatValue,

    /// Forcing of an equilibrium CO2 doubling ($\text{W/m}^2$).
    /// Default: 3.6813
    pub fco22x: FloatValue,
}

impl Default for ClimateParameters {
    fn default() -> Self {
        Self {
            t2xco2: 3.1,
            fex0: 0.5,
            fex1: 1.0,
            tocean0: 0.0068,
            tatm0: 0.85,
            c1: 0.1005,
            c3: 0.088,
            c4: 0.025,
            fco22x: 3.6813,
        }
    }
}

impl ClimateParameters {
    /// Climate feedback parameter ($\text{W/m}^2\text{/K}$).
    ///
    /// $$\lambda = F_{2x} / \text{ECS}$$
    pub fn lam(&self) -> FloatValue {
        self.fco22x / self.t2xco2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lambda() {
        let params = ClimateParameters::default();
        // 3.6813 / 3.1 ~= 1.1875
        assert_relative_eq!(params.lam(), 3.6813 / 3.1);
        assert!((params.lam() - 1.1875).abs() < 1e-3);
    }
}
