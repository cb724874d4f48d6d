//! Carbon cycle parameters
//!
//! Parameters for the three-reservoir (atmosphere, upper ocean, lower ocean)
//! carbon cycle.

use crate::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

/// Parameters of the three-reservoir carbon cycle.
///
/// Reservoir masses evolve as
///
/// $$
/// \begin{aligned}
/// M_{AT}(t+1) &= b_{11} M_{AT}(t) + b_{21} M_{U}(t) + E(t) \Delta t / 3.666 \\
/// M_{U}(t+1) &= b_{12} M_{AT}(t) + b_{22} M_{U}(t) + b_{32} M_{L}(t) \\
/// M_{L}(t+1) &= b_{23} M_{U}(t) + b_{33} M_{L}(t)
/// \end{aligned}
/// $$
///
/// Only $b_{12}$ and $b_{23}$ are free; the rest follow from the equilibrium
/// reservoir masses, see [`CarbonCycleParameters::transition`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarbonCycleParameters {
    /// Initial concentration in the atmosphere (GtC).
    /// Default: 851
    pub mat0: FloatValue,

    /// Initial concentration in the upper strata (GtC).
    /// Default: 460
    pub mu0: FloatValue,

    /// Initial concentration in the lower strata (GtC).
    /// Default: 1740
    pub ml0: FloatValue,

    /// Equilibrium concentration in the atmosphere (GtC).
    /// Default: 588
    pub mateq: FloatValue,

    /// Equilibrium concentration in the upper strata (GtC).
    /// Default: 360
    pub mueq: FloatValue,

    /// Equilibrium concentration in the lower strata (GtC).
    /// Default: 1720
    pub mleq: FloatValue,

    /// Atmosphere to upper ocean flow coefficient (per period).
    /// Default: 0.12
    pub b12: FloatValue,

    /// Upper ocean to lower ocean flow coefficient (per period).
    /// Default: 0.007
    pub b23: FloatValue,
}

impl Default for CarbonCycleParameters {
    fn default() -> Self {
        Self {
            mat0: 851.0,
            mu0: 460.0,
            ml0: 1740.0,
            mateq: 588.0,
            mueq: 360.0,
            mleq: 1720.0,
            b12: 0.12,
            b23: 0.007,
        }
    }
}

/// Flow coefficients of the carbon-cycle transition matrix.
///
/// This is a compartment model, so rows need not sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarbonTransition {
    pub b11: FloatValue,
    pub b12: FloatValue,
    pub b21: FloatValue,
    pub b22: FloatValue,
    pub b23: FloatValue,
    pub b32: FloatValue,
    pub b33: FloatValue,
}

impl CarbonCycleParameters {
    /// Complete the transition matrix from `b12`, `b23` and the equilibrium masses.
    ///
    /// Order matters: `b22` needs `b21`, `b33` needs `b32`.
    pub fn transition(&self) -> CarbonTransition {
        let b11 = 1.0 - self.b12;
        let b21 = self.b12 * self.mateq / self.mueq;
        let b22 = 1.0 - b21 - self.b23;
        let b32 = self.b23 * self.mueq / self.mleq;
        let b33 = 1.0 - b32;
        CarbonTransition {
            b11,
            b12: self.b12,
            b21,
            b22,
            b23: self.b23,
            b32,
            b33,
        }
    }
}
