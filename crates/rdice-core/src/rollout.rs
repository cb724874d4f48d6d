//! Forward rollout of the coupled economy-climate system
//!
//! Given a full control trajectory, recompute every endogenous series period by
//! period in increasing time order.
//!
//! # Control layout
//!
//! The control vector is flat, of length `2 * nt`: the first `nt` entries are the
//! mitigation rates $\mu(t)$, the next `nt` the savings rates $S(t)$.
//!
//! # Per-period equations
//!
//! 1. Capital: $K(t) = (1-\delta_K)^{\Delta t} K(t-1) + \Delta t \, I(t-1)$, $K(0) = K_0$
//! 2. Gross output: $Y_{gross} = A (L/1000)^{1-\gamma} K^\gamma$
//! 3. Emissions: $E_{ind} = \sigma Y_{gross} (1-\mu)$, $E = E_{ind} + E_{land}$
//! 4. Cumulative emissions (GtC)
//! 5. Carbon reservoirs from the previous period's reservoirs
//! 6. Forcing: $F = F_{2x} \log_2(M_{AT}/588) + F_{other}$
//! 7. Temperatures from the previous period's temperatures and the current forcing
//! 8. Damages, abatement cost, carbon price
//! 9. Output, investment, consumption and utility
//!
//! The reservoir and temperature updates are double-buffered: the new period is
//! computed from an immutable copy of the previous one and committed as a whole.

use crate::errors::{DiceError, DiceResult};
use crate::exogenous::ExogenousSeries;
use crate::parameters::{CarbonTransition, ClimateParameters, DiceParameters};
use crate::state::DiceState;
use crate::timeseries::{FloatValue, CO2_PER_C};
use tracing::debug;

/// Atmospheric carbon mass used as the forcing reference (GtC).
const MAT_FORCING_REFERENCE: FloatValue = 588.0;

/// Split a flat control vector into the mitigation and savings halves.
pub fn split_controls(
    controls: &[FloatValue],
    nt: usize,
) -> DiceResult<(&[FloatValue], &[FloatValue])> {
    if controls.len() != 2 * nt {
        return Err(DiceError::ControlLength {
            expected: 2 * nt,
            actual: controls.len(),
        });
    }
    Ok(controls.split_at(nt))
}

/// Flatten mitigation and savings trajectories into a control vector.
pub fn join_controls(miu: &[FloatValue], savings: &[FloatValue]) -> Vec<FloatValue> {
    miu.iter().chain(savings.iter()).copied().collect()
}

/// Carbon mass in the three reservoirs at one period (GtC).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarbonReservoirs {
    pub mat: FloatValue,
    pub mu: FloatValue,
    pub ml: FloatValue,
}

impl CarbonReservoirs {
    /// Reservoirs one period later, given total emissions over this period (GtC).
    pub fn step(&self, b: &CarbonTransition, emitted_carbon: FloatValue) -> Self {
        Self {
            mat: self.mat * b.b11 + self.mu * b.b21 + emitted_carbon,
            mu: self.mat * b.b12 + self.mu * b.b22 + self.ml * b.b32,
            ml: self.ml * b.b33 + self.mu * b.b23,
        }
    }
}

/// Atmospheric and lower-ocean temperature anomalies at one period (K).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureLayers {
    pub tatm: FloatValue,
    pub tocean: FloatValue,
}

impl TemperatureLayers {
    /// Temperatures one period later, given the forcing of that later period.
    pub fn step(&self, climate: &ClimateParameters, forcing_next: FloatValue) -> Self {
        let gap = self.tatm - self.tocean;
        Self {
            tatm: self.tatm
                + climate.c1 * (forcing_next - climate.lam() * self.tatm - climate.c3 * gap),
            tocean: self.tocean + climate.c4 * gap,
        }
    }
}

/// Radiative forcing from atmospheric carbon and other agents.
pub fn radiative_forcing(
    climate: &ClimateParameters,
    mat: FloatValue,
    forcoth: FloatValue,
) -> FloatValue {
    climate.fco22x * (mat / MAT_FORCING_REFERENCE).log2() + forcoth
}

/// Recompute every endogenous series of `state` for `controls`.
///
/// `state` is cleared first (and resized if its horizon differs), so the result only
/// depends on the arguments. Controls are not checked against any bounds; values
/// outside the physical range produce whatever the equations give, including NaN.
pub fn roll_out(
    params: &DiceParameters,
    exogenous: &ExogenousSeries,
    controls: &[FloatValue],
    state: &mut DiceState,
) -> DiceResult<()> {
    let nt = params.nt();
    let (miu, savings) = split_controls(controls, nt)?;

    if state.len() == nt {
        state.reset();
    } else {
        *state = DiceState::zeros(nt);
    }

    let tstep = params.tstep();
    let economy = &params.economy;
    let carbon = &params.carbon_cycle;
    let climate = &params.climate;
    let damages = &params.damages;
    let abatement = &params.abatement;
    let elasmu = params.welfare.elasmu;
    let b = params.derived().carbon;
    let capital_retention = (1.0 - economy.dk).powf(tstep);

    let mut reservoirs = CarbonReservoirs {
        mat: carbon.mat0,
        mu: carbon.mu0,
        ml: carbon.ml0,
    };
    let mut temperatures = TemperatureLayers {
        tatm: climate.tatm0,
        tocean: climate.tocean0,
    };

    for t in 0..nt {
        let miu_t = miu[t];
        state.miu[t] = miu_t;
        state.s[t] = savings[t];

        state.k[t] = if t == 0 {
            economy.k0
        } else {
            capital_retention * state.k[t - 1] + tstep * state.i[t - 1]
        };

        state.ygross[t] = exogenous.a[t]
            * (exogenous.l[t] / 1000.0).powf(1.0 - economy.gama)
            * state.k[t].powf(economy.gama);
        state.eind[t] = exogenous.sigma[t] * state.ygross[t] * (1.0 - miu_t);
        state.e[t] = state.eind[t] + exogenous.etree[t];

        if t > 0 {
            state.cca[t] = state.cca[t - 1] + state.eind[t - 1] * tstep / CO2_PER_C;
        }
        state.ccatot[t] = state.cca[t] + exogenous.cumetree[t];

        if t > 0 {
            reservoirs = reservoirs.step(&b, state.e[t - 1] * tstep / CO2_PER_C);
        }
        state.mat[t] = reservoirs.mat;
        state.ml[t] = reservoirs.ml;
        state.mu[t] = reservoirs.mu;

        state.forc[t] = radiative_forcing(climate, state.mat[t], exogenous.forcoth[t]);

        if t > 0 {
            temperatures = temperatures.step(climate, state.forc[t]);
        }
        state.tatm[t] = temperatures.tatm;
        state.tocean[t] = temperatures.tocean;

        state.damfrac[t] = damages.damage_fraction(state.tatm[t]);
        state.damages[t] = state.ygross[t] * state.damfrac[t];
        state.abatecost[t] =
            state.ygross[t] * exogenous.cost1[t] * miu_t.powf(abatement.expcost2);
        // Both are the backstop-implied price of the current control rate
        state.mcabate[t] = exogenous.pbacktime[t] * miu_t.powf(abatement.expcost2 - 1.0);
        state.cprice[t] = exogenous.pbacktime[t] * miu_t.powf(abatement.expcost2 - 1.0);

        state.ynet[t] = state.ygross[t] * (1.0 - state.damfrac[t]);
        state.y[t] = state.ynet[t] - state.abatecost[t];
        state.i[t] = savings[t] * state.y[t];
        state.c[t] = state.y[t] - state.i[t];
        state.cpc[t] = 1000.0 * state.c[t] / exogenous.l[t];
        state.periodu[t] = ((state.c[t] * 1000.0 / exogenous.l[t]).powf(1.0 - elasmu) - 1.0)
            / (1.0 - elasmu)
            - 1.0;
        state.cemutotper[t] = state.periodu[t] * exogenous.l[t] * exogenous.rr[t];
    }

    if let Some(t) = state.cemutotper.iter().position(|u| !u.is_finite()) {
        debug!(period = t, "Rollout produced a non-finite utility");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn setup() -> (DiceParameters, ExogenousSeries) {
        let params = DiceParameters::default();
        let exo = ExogenousSeries::init_variables(&params);
        (params, exo)
    }

    fn flat_controls(nt: usize, miu: FloatValue, savings: FloatValue) -> Vec<FloatValue> {
        let mut controls = vec![miu; nt];
        controls.extend(std::iter::repeat(savings).take(nt));
        controls
    }

    #[test]
    fn test_wrong_length_is_rejected() {
        let (params, exo) = setup();
        let mut state = DiceState::zeros(params.nt());
        let result = roll_out(&params, &exo, &[0.1; 10], &mut state);
        match result {
            Err(DiceError::ControlLength { expected, actual }) => {
                assert_eq!(expected, 200);
                assert_eq!(actual, 10);
            }
            other => panic!("Expected a length error, got {:?}", other),
        }
    }

    #[test]
    fn test_initial_period_pins() {
        let (params, exo) = setup();
        let mut state = DiceState::zeros(params.nt());
        let mut controls = flat_controls(params.nt(), 0.5, 0.25);
        controls[0] = 0.03;
        roll_out(&params, &exo, &controls, &mut state).unwrap();

        assert_eq!(state.k[0], 223.0);
        assert_eq!(state.mat[0], 851.0);
        assert_eq!(state.mu[0], 460.0);
        assert_eq!(state.ml[0], 1740.0);
        assert_eq!(state.tatm[0], 0.85);
        assert_eq!(state.tocean[0], 0.0068);
        assert_eq!(state.cca[0], 0.0);
        assert_eq!(state.miu[0], 0.03);
    }

    #[test]
    fn test_rollout_is_deterministic() {
        let (params, exo) = setup();
        let controls = flat_controls(params.nt(), 0.4, 0.24);

        let mut first = DiceState::zeros(params.nt());
        roll_out(&params, &exo, &controls, &mut first).unwrap();
        let mut second = DiceState::zeros(params.nt());
        roll_out(&params, &exo, &controls, &mut second).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_no_stale_values_between_rollouts() {
        let (params, exo) = setup();
        let controls_a = flat_controls(params.nt(), 0.9, 0.3);
        let controls_b = flat_controls(params.nt(), 0.1, 0.2);

        let mut reused = DiceState::zeros(params.nt());
        roll_out(&params, &exo, &controls_a, &mut reused).unwrap();
        roll_out(&params, &exo, &controls_b, &mut reused).unwrap();

        let mut fresh = DiceState::zeros(params.nt());
        roll_out(&params, &exo, &controls_b, &mut fresh).unwrap();

        assert_eq!(reused, fresh);
    }

    #[test]
    fn test_state_is_resized() {
        let (params, exo) = setup();
        let controls = flat_controls(params.nt(), 0.2, 0.2);
        let mut state = DiceState::zeros(3);
        roll_out(&params, &exo, &controls, &mut state).unwrap();
        assert_eq!(state.len(), params.nt());
    }

    #[test]
    fn test_accounting_identities() {
        let (params, exo) = setup();
        let controls = flat_controls(params.nt(), 0.35, 0.22);
        let mut state = DiceState::zeros(params.nt());
        roll_out(&params, &exo, &controls, &mut state).unwrap();

        for t in 0..params.nt() {
            assert_relative_eq!(state.e[t], state.eind[t] + exo.etree[t], epsilon = 1e-12);
            assert_relative_eq!(state.ccatot[t], state.cca[t] + exo.cumetree[t], epsilon = 1e-9);
            assert_relative_eq!(state.y[t], state.i[t] + state.c[t], epsilon = 1e-9);
            assert_relative_eq!(state.i[t], 0.22 * state.y[t], epsilon = 1e-12);
            assert_relative_eq!(state.mcabate[t], state.cprice[t]);
            assert_relative_eq!(state.damages[t], state.ygross[t] * state.damfrac[t]);
            assert_relative_eq!(state.cpc[t], 1000.0 * state.c[t] / exo.l[t], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_first_steps_by_hand() {
        let (params, exo) = setup();
        let controls = flat_controls(params.nt(), 0.03, 0.25);
        let mut state = DiceState::zeros(params.nt());
        roll_out(&params, &exo, &controls, &mut state).unwrap();

        // Period 0 from initial conditions
        let ygross0 = 5.115 * (7403.0_f64 / 1000.0).powf(0.7) * 223.0_f64.powf(0.3);
        assert_relative_eq!(state.ygross[0], ygross0, epsilon = 1e-12);
        // First period industrial emissions are e0 by construction of sig0
        assert_relative_eq!(
            state.eind[0],
            params.derived().sig0 * ygross0 * 0.97,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            state.forc[0],
            3.6813 * (851.0_f64 / 588.0).log2() + 0.5,
            epsilon = 1e-12
        );

        // Period 1 capital from period 0 investment
        let k1 = 0.9_f64.powf(5.0) * 223.0 + 5.0 * state.i[0];
        assert_relative_eq!(state.k[1], k1, epsilon = 1e-9);

        // Period 1 reservoirs from period 0 values only
        let b = params.derived().carbon;
        let emitted = state.e[0] * 5.0 / 3.666;
        assert_relative_eq!(state.mat[1], 851.0 * b.b11 + 460.0 * b.b21 + emitted, epsilon = 1e-9);
        assert_relative_eq!(
            state.mu[1],
            851.0 * b.b12 + 460.0 * b.b22 + 1740.0 * b.b32,
            epsilon = 1e-9
        );
        assert_relative_eq!(state.ml[1], 1740.0 * b.b33 + 460.0 * b.b23, epsilon = 1e-9);

        // Period 1 temperatures
        let tatm1 = 0.85
            + 0.1005 * (state.forc[1] - (3.6813 / 3.1) * 0.85 - 0.088 * (0.85 - 0.0068));
        assert_relative_eq!(state.tatm[1], tatm1, epsilon = 1e-12);
        assert_relative_eq!(state.tocean[1], 0.0068 + 0.025 * (0.85 - 0.0068), epsilon = 1e-15);
    }

    #[test]
    fn test_more_mitigation_less_warming() {
        let (params, exo) = setup();
        let mut low = DiceState::zeros(params.nt());
        let mut high = DiceState::zeros(params.nt());
        roll_out(&params, &exo, &flat_controls(params.nt(), 0.05, 0.25), &mut low).unwrap();
        roll_out(&params, &exo, &flat_controls(params.nt(), 0.9, 0.25), &mut high).unwrap();

        let last = params.nt() - 1;
        assert!(high.tatm[last] < low.tatm[last]);
        assert!(high.mat[last] < low.mat[last]);
        assert!(high.abatecost[10] > low.abatecost[10]);
    }

    #[test]
    fn test_negative_mitigation_gives_nan_not_panic() {
        let (params, exo) = setup();
        let controls = flat_controls(params.nt(), -0.5, 0.25);
        let mut state = DiceState::zeros(params.nt());
        roll_out(&params, &exo, &controls, &mut state).unwrap();
        assert!(state.abatecost[0].is_nan());
        assert!(state.cprice[0].is_nan());
    }

    #[test]
    fn test_split_and_join() {
        let controls = join_controls(&[0.1, 0.2], &[0.3, 0.4]);
        let (miu, savings) = split_controls(&controls, 2).unwrap();
        assert_eq!(miu, &[0.1, 0.2]);
        assert_eq!(savings, &[0.3, 0.4]);
        assert!(split_controls(&controls, 3).is_err());
    }

    #[test]
    fn test_reservoir_step_uses_previous_values() {
        let b = DiceParameters::default().derived().carbon;
        let before = CarbonReservoirs {
            mat: 900.0,
            mu: 500.0,
            ml: 1800.0,
        };
        let after = before.step(&b, 10.0);
        // Upper ocean reads the old atmosphere, not the updated one
        assert_relative_eq!(after.mu, 900.0 * b.b12 + 500.0 * b.b22 + 1800.0 * b.b32);
        assert_relative_eq!(after.mat, 900.0 * b.b11 + 500.0 * b.b21 + 10.0);
    }
}
