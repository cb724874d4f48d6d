//! DICE model parameters
//!
//! This module contains the parameter groups of the model and the
//! [`DiceParameters`] store that combines them. Each group provides defaults
//! matching the DICE-2016R configuration and can be partially overridden from
//! TOML or JSON.
//!
//! A handful of constants are derived from the others (the carbon-cycle transition
//! matrix, the initial carbon intensity, the long-run savings rate, ...). They are
//! computed once when a [`DiceParameters`] is built and are not part of the
//! serialised form.

mod abatement;
mod carbon_cycle;
mod climate;
mod damages;
mod economy;
mod emissions;
mod horizon;
mod welfare;

pub use abatement::AbatementParameters;
pub use carbon_cycle::{CarbonCycleParameters, CarbonTransition};
pub use climate::ClimateParameters;
pub use damages::DamageParameters;
pub use economy::EconomyParameters;
pub use emissions::EmissionsParameters;
pub use horizon::HorizonParameters;
pub use welfare::WelfareParameters;

use crate::errors::{DiceError, DiceResult};
use crate::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

/// Serialised form of the parameter store: the freely settable groups only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterGroups {
    pub horizon: HorizonParameters,
    pub economy: EconomyParameters,
    pub emissions: EmissionsParameters,
    pub carbon_cycle: CarbonCycleParameters,
    pub climate: ClimateParameters,
    pub damages: DamageParameters,
    pub abatement: AbatementParameters,
    pub welfare: WelfareParameters,
}

/// Constants computed from the parameter groups at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedParameters {
    /// Completed carbon-cycle transition matrix.
    pub carbon: CarbonTransition,
    /// Initial damage quadratic term.
    pub a20: FloatValue,
    /// Carbon intensity in the first period (kgCO2 per output 2005 USD).
    pub sig0: FloatValue,
    /// Climate feedback parameter.
    pub lam: FloatValue,
    /// Optimal long-run savings rate, used for the transversality condition.
    pub optlrsav: FloatValue,
    /// Abatement cost coefficient of the first period.
    pub cost1_0: FloatValue,
}

impl DerivedParameters {
    fn from_groups(groups: &ParameterGroups) -> Self {
        let economy = &groups.economy;
        let emissions = &groups.emissions;
        let welfare = &groups.welfare;

        let sig0 = emissions.e0 / (economy.q0 * (1.0 - emissions.miu0));
        let optlrsav = (economy.dk + 0.004)
            / (economy.dk + 0.004 * welfare.elasmu + welfare.prstp)
            * economy.gama;

        Self {
            carbon: groups.carbon_cycle.transition(),
            a20: groups.damages.a2,
            sig0,
            lam: groups.climate.lam(),
            optlrsav,
            cost1_0: groups.abatement.pback * sig0 / groups.abatement.expcost2 / 1000.0,
        }
    }
}

/// The complete, configuration-locked parameter store of a DICE run.
///
/// ```
/// use rdice_core::parameters::DiceParameters;
///
/// let params = DiceParameters::init_parameters(3.0, 0.015, 1.45);
/// assert_eq!(params.damages.a3, 3.0);
/// assert_eq!(params.horizon.nt, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ParameterGroups", into = "ParameterGroups")]
pub struct DiceParameters {
    pub horizon: HorizonParameters,
    pub economy: EconomyParameters,
    pub emissions: EmissionsParameters,
    pub carbon_cycle: CarbonCycleParameters,
    pub climate: ClimateParameters,
    pub damages: DamageParameters,
    pub abatement: AbatementParameters,
    pub welfare: WelfareParameters,
    derived: DerivedParameters,
}

impl Default for DiceParameters {
    fn default() -> Self {
        Self::from(ParameterGroups::default())
    }
}

impl From<ParameterGroups> for DiceParameters {
    fn from(groups: ParameterGroups) -> Self {
        let derived = DerivedParameters::from_groups(&groups);
        Self {
            horizon: groups.horizon,
            economy: groups.economy,
            emissions: groups.emissions,
            carbon_cycle: groups.carbon_cycle,
            climate: groups.climate,
            damages: groups.damages,
            abatement: groups.abatement,
            welfare: groups.welfare,
            derived,
        }
    }
}

impl From<DiceParameters> for ParameterGroups {
    fn from(params: DiceParameters) -> Self {
        Self {
            horizon: params.horizon,
            economy: params.economy,
            emissions: params.emissions,
            carbon_cycle: params.carbon_cycle,
            climate: params.climate,
            damages: params.damages,
            abatement: params.abatement,
            welfare: params.welfare,
        }
    }
}

impl DiceParameters {
    /// Build the store with DICE-2016R defaults and the three commonly varied
    /// overrides: the damage exponent, the pure rate of time preference and the
    /// elasticity of marginal utility.
    pub fn init_parameters(a3: FloatValue, prstp: FloatValue, elasmu: FloatValue) -> Self {
        let mut groups = ParameterGroups::default();
        groups.damages.a3 = a3;
        groups.welfare.prstp = prstp;
        groups.welfare.elasmu = elasmu;
        Self::from(groups)
    }

    /// Read a (possibly partial) TOML parameter document over the defaults.
    ///
    /// ```
    /// use rdice_core::parameters::DiceParameters;
    ///
    /// let params = DiceParameters::from_toml_str("[climate]\nt2xco2 = 4.5\n").unwrap();
    /// assert_eq!(params.climate.t2xco2, 4.5);
    /// assert_eq!(params.climate.fco22x, 3.6813);
    /// ```
    pub fn from_toml_str(document: &str) -> DiceResult<Self> {
        let groups: ParameterGroups =
            toml::from_str(document).map_err(|e| DiceError::Config(e.to_string()))?;
        Ok(Self::from(groups))
    }

    /// Recompute the derived constants after editing groups in place.
    pub fn refresh_derived(&mut self) {
        self.derived = DerivedParameters::from_groups(&ParameterGroups::from(self.clone()));
    }

    /// Constants derived at construction.
    pub fn derived(&self) -> &DerivedParameters {
        &self.derived
    }

    /// Number of periods.
    pub fn nt(&self) -> usize {
        self.horizon.nt
    }

    /// Years per period.
    pub fn tstep(&self) -> FloatValue {
        self.horizon.tstep
    }

    /// Reject configurations the model equations cannot evaluate.
    ///
    /// The defaults and every configuration the equations handle pass unchanged.
    pub fn validate(&self) -> DiceResult<()> {
        if self.horizon.nt < 2 {
            return Err(invalid("horizon.nt", "at least two periods are required"));
        }
        if !(self.horizon.tstep.is_finite() && self.horizon.tstep > 0.0) {
            return Err(invalid("horizon.tstep", "must be positive"));
        }
        if (self.welfare.elasmu - 1.0).abs() < FloatValue::EPSILON {
            return Err(invalid(
                "welfare.elasmu",
                "the utility kernel is undefined for an elasticity of exactly 1",
            ));
        }
        if self.economy.popadj <= 0.0 {
            return Err(invalid("economy.popadj", "must be positive"));
        }
        if self.economy.pop0 <= 0.0 || self.economy.popasym <= 0.0 {
            return Err(invalid("economy.pop0", "population must be positive"));
        }
        if self.carbon_cycle.mueq <= 0.0 || self.carbon_cycle.mleq <= 0.0 {
            return Err(invalid(
                "carbon_cycle.mueq",
                "equilibrium ocean masses must be positive",
            ));
        }
        if self.climate.t2xco2 <= 0.0 {
            return Err(invalid("climate.t2xco2", "must be positive"));
        }
        if !(self.emissions.miu0 > 0.0 && self.emissions.miu0 < 1.0) {
            return Err(invalid(
                "emissions.miu0",
                "initial control rate must lie strictly between 0 and 1",
            ));
        }

        for (name, value) in self.named_scalars() {
            if !value.is_finite() {
                return Err(invalid(name, "must be finite"));
            }
        }
        Ok(())
    }

    fn named_scalars(&self) -> Vec<(&'static str, FloatValue)> {
        let e = &self.economy;
        let m = &self.emissions;
        let c = &self.carbon_cycle;
        let k = &self.climate;
        let d = &self.damages;
        let a = &self.abatement;
        let w = &self.welfare;
        vec![
            ("economy.gama", e.gama),
            ("economy.pop0", e.pop0),
            ("economy.popadj", e.popadj),
            ("economy.popasym", e.popasym),
            ("economy.dk", e.dk),
            ("economy.q0", e.q0),
            ("economy.k0", e.k0),
            ("economy.a0", e.a0),
            ("economy.ga0", e.ga0),
            ("economy.dela", e.dela),
            ("emissions.gsigma1", m.gsigma1),
            ("emissions.dsig", m.dsig),
            ("emissions.eland0", m.eland0),
            ("emissions.deland", m.deland),
            ("emissions.e0", m.e0),
            ("emissions.miu0", m.miu0),
            ("carbon_cycle.mat0", c.mat0),
            ("carbon_cycle.mu0", c.mu0),
            ("carbon_cycle.ml0", c.ml0),
            ("carbon_cycle.mateq", c.mateq),
            ("carbon_cycle.mueq", c.mueq),
            ("carbon_cycle.mleq", c.mleq),
            ("carbon_cycle.b12", c.b12),
            ("carbon_cycle.b23", c.b23),
            ("climate.t2xco2", k.t2xco2),
            ("climate.fex0", k.fex0),
            ("climate.fex1", k.fex1),
            ("climate.tocean0", k.tocean0),
            ("climate.tatm0", k.tatm0),
            ("climate.c1", k.c1),
            ("climate.c3", k.c3),
            ("climate.c4", k.c4),
            ("climate.fco22x", k.fco22x),
            ("damages.a10", d.a10),
            ("damages.a1", d.a1),
            ("damages.a2", d.a2),
            ("damages.a3", d.a3),
            ("abatement.expcost2", a.expcost2),
            ("abatement.pback", a.pback),
            ("abatement.gback", a.gback),
            ("abatement.limmiu", a.limmiu),
            ("abatement.tnopol", a.tnopol),
            ("abatement.cprice0", a.cprice0),
            ("abatement.gcprice", a.gcprice),
            ("welfare.elasmu", w.elasmu),
            ("welfare.prstp", w.prstp),
            ("welfare.scale1", w.scale1),
            ("welfare.scale2", w.scale2),
        ]
    }
}

fn invalid(name: &str, reason: &str) -> DiceError {
    DiceError::InvalidParameter {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_matches_init_parameters() {
        assert_eq!(
            DiceParameters::default(),
            DiceParameters::init_parameters(2.0, 0.015, 1.45)
        );
    }

    #[test]
    fn test_overrides_applied() {
        let params = DiceParameters::init_parameters(3.0, 0.02, 1.2);
        assert_eq!(params.damages.a3, 3.0);
        assert_eq!(params.welfare.prstp, 0.02);
        assert_eq!(params.welfare.elasmu, 1.2);
        // Everything else stays at its default
        assert_eq!(params.economy.k0, 223.0);
        assert_eq!(params.abatement.limmiu, 1.2);
    }

    #[test]
    fn test_derived_transition_matrix() {
        let params = DiceParameters::default();
        let b = params.derived().carbon;

        let b12 = 0.12;
        let b23 = 0.007;
        let (mateq, mueq, mleq) = (588.0, 360.0, 1720.0);
        let b21 = b12 * mateq / mueq;
        let b32 = b23 * mueq / mleq;

        assert_relative_eq!(b.b11, 1.0 - b12, epsilon = 1e-15);
        assert_relative_eq!(b.b21, b21, epsilon = 1e-15);
        assert_relative_eq!(b.b22, 1.0 - b21 - b23, epsilon = 1e-15);
        assert_relative_eq!(b.b32, b32, epsilon = 1e-15);
        assert_relative_eq!(b.b33, 1.0 - b32, epsilon = 1e-15);
    }

    #[test]
    fn test_derived_scalars() {
        let params = DiceParameters::default();
        let derived = params.derived();

        assert_relative_eq!(derived.a20, 0.00236);
        assert_relative_eq!(derived.sig0, 35.85 / (105.5 * (1.0 - 0.03)), epsilon = 1e-15);
        assert_relative_eq!(derived.lam, 3.6813 / 3.1, epsilon = 1e-15);

        // (0.1 + 0.004) / (0.1 + 0.004 * 1.45 + 0.015) * 0.3 ~= 0.2583
        let optlrsav = (0.1 + 0.004) / (0.1 + 0.004 * 1.45 + 0.015) * 0.3;
        assert_relative_eq!(derived.optlrsav, optlrsav, epsilon = 1e-15);
        assert!((derived.optlrsav - 0.2583).abs() < 1e-3);
    }

    #[test]
    fn test_optlrsav_depends_on_preferences() {
        let patient = DiceParameters::init_parameters(2.0, 0.001, 1.45);
        let impatient = DiceParameters::init_parameters(2.0, 0.03, 1.45);
        assert!(patient.derived().optlrsav > impatient.derived().optlrsav);
    }

    #[test]
    fn test_partial_toml() {
        let document = r#"
            [damages]
            a3 = 3.0

            [horizon]
            nt = 60
        "#;
        let params = DiceParameters::from_toml_str(document).unwrap();
        assert_eq!(params.damages.a3, 3.0);
        assert_eq!(params.damages.a2, 0.00236);
        assert_eq!(params.nt(), 60);
        assert_eq!(params.welfare, WelfareParameters::default());
    }

    #[test]
    fn test_toml_recomputes_derived() {
        let params = DiceParameters::from_toml_str("[carbon_cycle]\nb12 = 0.2\n").unwrap();
        assert_relative_eq!(params.derived().carbon.b11, 0.8, epsilon = 1e-15);
        assert_relative_eq!(
            params.derived().carbon.b21,
            0.2 * 588.0 / 360.0,
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_malformed_toml() {
        let result = DiceParameters::from_toml_str("[damages\na3 = ");
        assert!(matches!(result, Err(DiceError::Config(_))));
    }

    #[test]
    fn test_json_round_trip_keeps_derived() {
        let params = DiceParameters::init_parameters(2.5, 0.01, 1.3);
        let json = serde_json::to_string(&params).expect("Serialization failed");
        assert!(!json.contains("derived"));
        let parsed: DiceParameters = serde_json::from_str(&json).expect("Deserialization failed");
        assert_eq!(params, parsed);
    }

    #[test]
    fn test_validate_defaults() {
        assert!(DiceParameters::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unit_elasticity() {
        let params = DiceParameters::init_parameters(2.0, 0.015, 1.0);
        match params.validate() {
            Err(DiceError::InvalidParameter { name, .. }) => assert_eq!(name, "welfare.elasmu"),
            other => panic!("Expected invalid elasmu, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        let params = DiceParameters::init_parameters(FloatValue::NAN, 0.015, 1.45);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_initial_control_rate() {
        let params = DiceParameters::from_toml_str("[emissions]\nmiu0 = 0.0\n").unwrap();
        match params.validate() {
            Err(DiceError::InvalidParameter { name, .. }) => assert_eq!(name, "emissions.miu0"),
            other => panic!("Expected invalid miu0, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_short_horizon() {
        let params = DiceParameters::from_toml_str("[horizon]\nnt = 1\n").unwrap();
        assert!(params.validate().is_err());
    }
}
