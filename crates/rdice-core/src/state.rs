//! Endogenous model state.
//!
//! [`DiceState`] holds one array per endogenous variable, all aligned on the model
//! periods. A rollout overwrites every entry; nothing is carried from one rollout
//! to the next.

use crate::timeseries::{FloatValue, Series};
use crate::variable::Variable;
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

/// Endogenous series of a DICE run, plus the controls that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiceState {
    pub miu: Series,
    pub s: Series,
    pub k: Series,
    pub ygross: Series,
    pub eind: Series,
    pub e: Series,
    pub cca: Series,
    pub ccatot: Series,
    pub mat: Series,
    pub mu: Series,
    pub ml: Series,
    pub forc: Series,
    pub tatm: Series,
    pub tocean: Series,
    pub damfrac: Series,
    pub damages: Series,
    pub abatecost: Series,
    pub mcabate: Series,
    pub cprice: Series,
    pub ynet: Series,
    pub y: Series,
    pub i: Series,
    pub c: Series,
    pub cpc: Series,
    pub periodu: Series,
    pub cemutotper: Series,
}

impl DiceState {
    /// Zero-initialised state for `nt` periods.
    pub fn zeros(nt: usize) -> Self {
        let z = || Array1::zeros(nt);
        Self {
            miu: z(),
            s: z(),
            k: z(),
            ygross: z(),
            eind: z(),
            e: z(),
            cca: z(),
            ccatot: z(),
            mat: z(),
            mu: z(),
            ml: z(),
            forc: z(),
            tatm: z(),
            tocean: z(),
            damfrac: z(),
            damages: z(),
            abatecost: z(),
            mcabate: z(),
            cprice: z(),
            ynet: z(),
            y: z(),
            i: z(),
            c: z(),
            cpc: z(),
            periodu: z(),
            cemutotper: z(),
        }
    }

    /// Number of periods.
    pub fn len(&self) -> usize {
        self.k.len()
    }

    pub fn is_empty(&self) -> bool {
        self.k.is_empty()
    }

    /// Reset every series to zero without reallocating.
    pub fn reset(&mut self) {
        for series in self.series_mut() {
            series.fill(0.0);
        }
    }

    fn series_mut(&mut self) -> [&mut Series; 26] {
        [
            &mut self.miu,
            &mut self.s,
            &mut self.k,
            &mut self.ygross,
            &mut self.eind,
            &mut self.e,
            &mut self.cca,
            &mut self.ccatot,
            &mut self.mat,
            &mut self.mu,
            &mut self.ml,
            &mut self.forc,
            &mut self.tatm,
            &mut self.tocean,
            &mut self.damfrac,
            &mut self.damages,
            &mut self.abatecost,
            &mut self.mcabate,
            &mut self.cprice,
            &mut self.ynet,
            &mut self.y,
            &mut self.i,
            &mut self.c,
            &mut self.cpc,
            &mut self.periodu,
            &mut self.cemutotper,
        ]
    }

    /// View of a control or endogenous series, `None` for exogenous variables.
    pub fn get(&self, variable: Variable) -> Option<ArrayView1<'_, FloatValue>> {
        let series = match variable {
            Variable::MitigationRate => &self.miu,
            Variable::SavingsRate => &self.s,
            Variable::Capital => &self.k,
            Variable::GrossOutput => &self.ygross,
            Variable::IndustrialEmissions => &self.eind,
            Variable::TotalEmissions => &self.e,
            Variable::CumulativeIndustrialEmissions => &self.cca,
            Variable::CumulativeTotalEmissions => &self.ccatot,
            Variable::AtmosphericCarbon => &self.mat,
            Variable::UpperOceanCarbon => &self.mu,
            Variable::LowerOceanCarbon => &self.ml,
            Variable::Forcing => &self.forc,
            Variable::AtmosphericTemperature => &self.tatm,
            Variable::OceanTemperature => &self.tocean,
            Variable::DamageFraction => &self.damfrac,
            Variable::Damages => &self.damages,
            Variable::AbatementCost => &self.abatecost,
            Variable::MarginalAbatementCost => &self.mcabate,
            Variable::CarbonPrice => &self.cprice,
            Variable::NetOutput => &self.ynet,
            Variable::Output => &self.y,
            Variable::Investment => &self.i,
            Variable::Consumption => &self.c,
            Variable::ConsumptionPerCapita => &self.cpc,
            Variable::PeriodUtility => &self.periodu,
            Variable::WeightedUtility => &self.cemutotper,
            _ => return None,
        };
        Some(series.view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::VariableType;

    #[test]
    fn test_zeros() {
        let state = DiceState::zeros(7);
        assert_eq!(state.len(), 7);
        assert!(state.tatm.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_reset_clears_every_series() {
        let mut state = DiceState::zeros(3);
        state.k.fill(1.0);
        state.cemutotper.fill(2.0);
        state.miu.fill(0.5);
        state.reset();
        for variable in Variable::ALL {
            if let Some(series) = state.get(*variable) {
                assert!(series.iter().all(|&v| v == 0.0), "{} not reset", variable);
            }
        }
    }

    #[test]
    fn test_get_covers_non_exogenous_variables() {
        let state = DiceState::zeros(2);
        for variable in Variable::ALL {
            let expected = variable.variable_type() != VariableType::Exogenous;
            assert_eq!(state.get(*variable).is_some(), expected, "{}", variable);
        }
    }
}
