//! Climate damage parameters

use crate::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

/// Parameters of the damage function.
///
/// $$\Omega(t) = a_1 T_{AT}(t) + a_2 T_{AT}(t)^{a_3}$$
///
/// is the fraction of gross output lost to warming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageParameters {
    /// Initial damage intercept.
    /// Default: 0.0
    pub a10: FloatValue,

    /// Damage intercept (linear term).
    /// Default: 0.0
    pub a1: FloatValue,

    /// Damage quadratic term.
    /// Default: 0.00236
    pub a2: FloatValue,

    /// Damage exponent.
    /// Default: 2.00
    pub a3: FloatValue,
}

impl Default for DamageParameters {
    fn default() -> Self {
        Self {
            a10: 0.0,
            a1: 0.0,
            a2: 0.00236,
            a3: 2.00,
        }
    }
}

impl DamageParameters {
    /// Damage fraction at an atmospheric temperature anomaly.
    pub fn damage_fraction(&self, tatm: FloatValue) -> FloatValue {
        self.a1 * tatm + self.a2 * tatm.powf(self.a3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_quadratic_damages() {
        let params = DamageParameters::default();
        assert_relative_eq!(params.damage_fraction(0.0), 0.0);
        assert_relative_eq!(params.damage_fraction(3.0), 0.00236 * 9.0, epsilon = 1e-15);
    }

    #[test]
    fn test_steeper_exponent_hurts_more_above_one_degree() {
        let quadratic = DamageParameters::default();
        let cubic = DamageParameters {
            a3: 3.0,
            ..DamageParameters::default()
        };
        assert!(cubic.damage_fraction(2.5) > quadratic.damage_fraction(2.5));
        assert!(cubic.damage_fraction(0.5) < quadratic.damage_fraction(0.5));
    }
}
