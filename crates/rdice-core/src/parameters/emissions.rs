//! Emissions parameters

use crate::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

/// Parameters for industrial carbon intensity and land-use emissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmissionsParameters {
    /// Initial growth of sigma (per year).
    /// Default: -0.0152
    pub gsigma1: FloatValue,

    /// Decline rate of decarbonization (per period).
    /// Default: -0.001
    pub dsig: FloatValue,

    /// Carbon emissions from land in the first period (GtCO2 per year).
    /// Default: 2.6
    pub eland0: FloatValue,

    /// Decline rate of land emissions (per period).
    /// Default: 0.115
    pub deland: FloatValue,

    /// Industrial emissions in the first period (GtCO2 per year).
    /// Default: 35.85
    pub e0: FloatValue,

    /// Emissions control rate in the first period (historical).
    /// Default: 0.03
    pub miu0: FloatValue,
}

impl Default for EmissionsParameters {
    fn default() -> Self {
        Self {
            gsigma1: -0.0152,
            dsig: -0.001,
            eland0: 2.6,
            deland: 0.115,
            e0: 35.85,
            miu0: 0.03,
        }
    }
}
