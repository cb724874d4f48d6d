//! Exogenous drivers
//!
//! Time series that do not depend on the policy: population, productivity, carbon
//! intensity, the backstop price, land-use emissions, non-CO2 forcing and the
//! discount factor. They are computed once per run.
//!
//! # Recurrences
//!
//! $$
//! \begin{aligned}
//! L(t) &= L(t-1) \left(\frac{L_{asym}}{L(t-1)}\right)^{\ell_{adj}} \\
//! A(t) &= \frac{A(t-1)}{1 - g_A(t-1)} \\
//! g_\sigma(t) &= g_\sigma(t-1) (1 + \delta_\sigma)^{\Delta t} \\
//! \sigma(t) &= \sigma(t-1) \exp(g_\sigma(t-1) \Delta t)
//! \end{aligned}
//! $$

use crate::parameters::DiceParameters;
use crate::timeseries::{linspace, FloatValue, Series, CO2_PER_C};
use crate::variable::Variable;
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

/// Number of periods over which non-CO2 forcing ramps from `fex0` to `fex1`.
const FORCOTH_RAMP_PERIODS: usize = 18;

/// Cumulative land-use emissions at the start of the run (GtC).
const CUMETREE0: FloatValue = 100.0;

/// Policy-independent series of a DICE run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExogenousSeries {
    /// Calendar year at the start of each period
    pub tt: Series,
    pub l: Series,
    pub ga: Series,
    pub a: Series,
    pub gsig: Series,
    pub sigma: Series,
    pub cost1: Series,
    pub pbacktime: Series,
    pub etree: Series,
    pub cumetree: Series,
    pub rr: Series,
    pub forcoth: Series,
    pub cpricebase: Series,
}

impl ExogenousSeries {
    /// Compute every exogenous series for the horizon of `params`.
    pub fn init_variables(params: &DiceParameters) -> Self {
        let nt = params.nt();
        let tstep = params.tstep();
        let economy = &params.economy;
        let emissions = &params.emissions;
        let abatement = &params.abatement;
        let climate = &params.climate;
        let derived = params.derived();

        // Closed forms over the horizon
        let tt = linspace(params.horizon.start_year, params.horizon.end_year, nt);
        let ga = Array1::from_shape_fn(nt, |t| {
            economy.ga0 * (-economy.dela * tstep * t as FloatValue).exp()
        });
        let pbacktime =
            Array1::from_shape_fn(nt, |t| abatement.pback * (1.0 - abatement.gback).powi(t as i32));
        let etree = Array1::from_shape_fn(nt, |t| {
            emissions.eland0 * (1.0 - emissions.deland).powi(t as i32)
        });
        let rr = Array1::from_shape_fn(nt, |t| {
            1.0 / (1.0 + params.welfare.prstp).powf(tstep * t as FloatValue)
        });
        let forcoth = Array1::from_shape_fn(nt, |t| {
            if t < FORCOTH_RAMP_PERIODS {
                climate.fex0
                    + (climate.fex1 - climate.fex0) * t as FloatValue
                        / (FORCOTH_RAMP_PERIODS - 1) as FloatValue
            } else {
                climate.fex1
            }
        });
        let cpricebase = Array1::from_shape_fn(nt, |t| {
            abatement.cprice0 * (1.0 + abatement.gcprice).powf(tstep * t as FloatValue)
        });

        // One-step recurrences
        let mut l = Array1::zeros(nt);
        let mut a = Array1::zeros(nt);
        let mut gsig = Array1::zeros(nt);
        let mut sigma = Array1::zeros(nt);
        let mut cost1 = Array1::zeros(nt);
        let mut cumetree = Array1::zeros(nt);

        if nt > 0 {
            l[0] = economy.pop0;
            a[0] = economy.a0;
            gsig[0] = emissions.gsigma1;
            sigma[0] = derived.sig0;
            cost1[0] = derived.cost1_0;
            cumetree[0] = CUMETREE0;
        }

        for t in 1..nt {
            l[t] = l[t - 1] * (economy.popasym / l[t - 1]).powf(economy.popadj);
            a[t] = a[t - 1] / (1.0 - ga[t - 1]);
            gsig[t] = gsig[t - 1] * (1.0 + emissions.dsig).powf(tstep);
            sigma[t] = sigma[t - 1] * (gsig[t - 1] * tstep).exp();
            cost1[t] = pbacktime[t] * sigma[t] / abatement.expcost2 / 1000.0;
            cumetree[t] = cumetree[t - 1] + etree[t - 1] * (tstep / CO2_PER_C);
        }

        Self {
            tt,
            l,
            ga,
            a,
            gsig,
            sigma,
            cost1,
            pbacktime,
            etree,
            cumetree,
            rr,
            forcoth,
            cpricebase,
        }
    }

    /// Number of periods.
    pub fn len(&self) -> usize {
        self.l.len()
    }

    pub fn is_empty(&self) -> bool {
        self.l.is_empty()
    }

    /// View of an exogenous series, `None` for control and endogenous variables.
    pub fn get(&self, variable: Variable) -> Option<ArrayView1<'_, FloatValue>> {
        let series = match variable {
            Variable::Population => &self.l,
            Variable::TfpGrowth => &self.ga,
            Variable::Tfp => &self.a,
            Variable::SigmaGrowth => &self.gsig,
            Variable::Sigma => &self.sigma,
            Variable::Cost1 => &self.cost1,
            Variable::BackstopPrice => &self.pbacktime,
            Variable::LandEmissions => &self.etree,
            Variable::CumulativeLandEmissions => &self.cumetree,
            Variable::DiscountFactor => &self.rr,
            Variable::OtherForcing => &self.forcoth,
            Variable::BaseCarbonPrice => &self.cpricebase,
            _ => return None,
        };
        Some(series.view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn default_series() -> ExogenousSeries {
        ExogenousSeries::init_variables(&DiceParameters::default())
    }

    #[test]
    fn test_population_saturates_monotonically() {
        let params = DiceParameters::default();
        let exo = default_series();

        assert_relative_eq!(exo.l[0], 7403.0);
        for t in 0..exo.len() - 1 {
            assert!(exo.l[t] <= exo.l[t + 1], "L decreased at t={}", t);
            assert!(
                exo.l[t + 1] <= params.economy.popasym,
                "L overshot the asymptote at t={}",
                t + 1
            );
        }
        // Close to the asymptote by the end of the horizon
        assert!(params.economy.popasym - exo.l[exo.len() - 1] < 1.0);
    }

    #[test]
    fn test_all_series_have_horizon_length() {
        let exo = default_series();
        for variable in Variable::ALL {
            if let Some(series) = exo.get(*variable) {
                assert_eq!(series.len(), 100, "{} has the wrong length", variable);
                assert!(series.iter().all(|v| v.is_finite()), "{} is not finite", variable);
            }
        }
        assert_eq!(exo.tt.len(), 100);
    }

    #[test]
    fn test_closed_forms() {
        let exo = default_series();

        assert_relative_eq!(exo.ga[0], 0.076);
        assert_relative_eq!(exo.ga[3], 0.076 * (-0.005 * 5.0 * 3.0_f64).exp(), epsilon = 1e-15);
        assert_relative_eq!(exo.pbacktime[2], 550.0 * 0.975 * 0.975, epsilon = 1e-12);
        assert_relative_eq!(exo.etree[1], 2.6 * 0.885, epsilon = 1e-15);
        assert_relative_eq!(exo.rr[0], 1.0);
        assert_relative_eq!(exo.rr[2], 1.0 / 1.015_f64.powf(10.0), epsilon = 1e-15);
        assert_relative_eq!(exo.cpricebase[1], 2.0 * 1.02_f64.powf(5.0), epsilon = 1e-12);
        assert_relative_eq!(exo.tt[0], 2000.0);
        assert_relative_eq!(exo.tt[99], 2500.0);
    }

    #[test]
    fn test_forcing_ramp() {
        let exo = default_series();

        assert_relative_eq!(exo.forcoth[0], 0.5);
        assert_relative_eq!(exo.forcoth[17], 1.0, epsilon = 1e-12);
        assert!(exo.forcoth.iter().skip(17).all(|&f| (f - 1.0).abs() < 1e-12));
        for t in 0..17 {
            assert!(exo.forcoth[t + 1] > exo.forcoth[t]);
        }
    }

    #[test]
    fn test_recurrences() {
        let params = DiceParameters::default();
        let exo = default_series();

        assert_relative_eq!(exo.a[0], 5.115);
        assert_relative_eq!(exo.a[1], 5.115 / (1.0 - 0.076), epsilon = 1e-12);

        assert_relative_eq!(exo.gsig[0], -0.0152);
        assert_relative_eq!(exo.gsig[1], -0.0152 * 0.999_f64.powf(5.0), epsilon = 1e-15);

        let sig0 = params.derived().sig0;
        assert_relative_eq!(exo.sigma[0], sig0);
        assert_relative_eq!(exo.sigma[1], sig0 * (-0.0152 * 5.0_f64).exp(), epsilon = 1e-15);

        assert_relative_eq!(exo.cumetree[0], 100.0);
        assert_relative_eq!(exo.cumetree[1], 100.0 + 2.6 * 5.0 / 3.666, epsilon = 1e-12);
    }

    #[test]
    fn test_cost1() {
        let params = DiceParameters::default();
        let exo = default_series();

        assert_relative_eq!(exo.cost1[0], params.derived().cost1_0);
        assert_relative_eq!(exo.cost1[0], 550.0 * exo.sigma[0] / 2.6 / 1000.0, epsilon = 1e-15);
        for t in 1..exo.len() {
            assert_relative_eq!(
                exo.cost1[t],
                exo.pbacktime[t] * exo.sigma[t] / 2.6 / 1000.0,
                epsilon = 1e-15
            );
        }
    }

    #[test]
    fn test_carbon_intensity_declines() {
        let exo = default_series();
        for t in 0..exo.len() - 1 {
            assert!(exo.sigma[t + 1] < exo.sigma[t]);
        }
    }

    #[test]
    fn test_get_rejects_endogenous() {
        let exo = default_series();
        assert!(exo.get(Variable::Capital).is_none());
        assert!(exo.get(Variable::MitigationRate).is_none());
    }
}
