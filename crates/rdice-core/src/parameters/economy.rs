//! Population and technology parameters
//!
//! Drive the labour force, total factor productivity and the Cobb-Douglas
//! production function.

use crate::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

/// Parameters of the economic growth block.
///
/// Gross output is
///
/// $$Y_{gross}(t) = A(t) \left(\frac{L(t)}{1000}\right)^{1-\gamma} K(t)^\gamma$$
///
/// with labour $L$ approaching `popasym` and productivity $A$ growing at a
/// declining rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyParameters {
    /// Capital elasticity in the production function.
    /// Default: 0.300
    pub gama: FloatValue,

    /// Initial world population (millions).
    /// Default: 7403
    pub pop0: FloatValue,

    /// Growth rate to calibrate to the 2050 population projection.
    /// Default: 0.134
    pub popadj: FloatValue,

    /// Asymptotic population (millions).
    /// Default: 11500
    pub popasym: FloatValue,

    /// Depreciation rate on capital (per year).
    /// Default: 0.100
    pub dk: FloatValue,

    /// Initial world gross output (trill 2010 USD).
    /// Default: 105.5
    pub q0: FloatValue,

    /// Initial capital value (trill 2010 USD).
    /// Default: 223
    pub k0: FloatValue,

    /// Initial level of total factor productivity.
    /// Default: 5.115
    pub a0: FloatValue,

    /// Initial growth rate for TFP per period.
    /// Default: 0.076
    pub ga0: FloatValue,

    /// Decline rate of TFP per period.
    /// Default: 0.005
    pub dela: FloatValue,
}

impl Default for EconomyParameters {
    fn default() -> Self {
        Self {
            gama: 0.300,
            pop0: 7403.0,
            popadj: 0.134,
            popasym: 11500.0,
            dk: 0.100,
            q0: 105.5,
            k0: 223.0,
            a0: 5.115,
            ga0: 0.076,
            dela: 0.005,
        }
    }
}
