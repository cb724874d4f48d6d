//! Time horizon of a DICE run.

use crate::timeseries::{FloatValue, Time};
use serde::{Deserialize, Serialize};

/// Number and length of the model periods.
///
/// The calendar axis is only used for reporting. The dynamics depend on `nt` and
/// `tstep` alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HorizonParameters {
    /// Number of periods.
    /// Default: 100
    pub nt: usize,

    /// Years per period.
    /// Default: 5.0
    pub tstep: FloatValue,

    /// First year of the reporting axis.
    /// Default: 2000
    pub start_year: Time,

    /// Last year of the reporting axis.
    /// Default: 2500
    pub end_year: Time,
}

impl Default for HorizonParameters {
    fn default() -> Self {
        Self {
            nt: 100,
            tstep: 5.0,
            start_year: 2000.0,
            end_year: 2500.0,
        }
    }
}

impl HorizonParameters {
    /// Length of the flattened control vector (mitigation rates then savings rates).
    pub fn n_controls(&self) -> usize {
        2 * self.nt
    }
}
