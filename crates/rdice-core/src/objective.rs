//! Social welfare objective.
//!
//! $$W = \Delta t \cdot s_1 \sum_t U(t) L(t) R(t) + s_2$$
//!
//! where $U(t) L(t) R(t)$ is the `CEMUTOTPER` series of a rollout. The optimiser
//! minimises $-W$.

use crate::errors::DiceResult;
use crate::exogenous::ExogenousSeries;
use crate::parameters::DiceParameters;
use crate::rollout::roll_out;
use crate::state::DiceState;
use crate::timeseries::FloatValue;
use ndarray::ArrayView1;

/// Rescaled discounted welfare of a weighted-utility series.
pub fn f_utility(cemutotper: ArrayView1<'_, FloatValue>, params: &DiceParameters) -> FloatValue {
    params.tstep() * params.welfare.scale1 * cemutotper.sum() + params.welfare.scale2
}

/// Negated welfare of `controls`, rolling out into `state`.
///
/// Allocation-free when `state` already has the right horizon, so optimisers can
/// keep one buffer per worker.
pub fn objective(
    params: &DiceParameters,
    exogenous: &ExogenousSeries,
    controls: &[FloatValue],
    state: &mut DiceState,
) -> DiceResult<FloatValue> {
    roll_out(params, exogenous, controls, state)?;
    Ok(-f_utility(state.cemutotper.view(), params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_f_utility_rescaling() {
        let params = DiceParameters::default();
        let cemutotper = array![1.0, 2.0, 3.0];
        let expected = 5.0 * 0.0302455265681763 * 6.0 - 10993.704;
        assert_relative_eq!(f_utility(cemutotper.view(), &params), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_objective_is_negated_utility() {
        let params = DiceParameters::default();
        let exo = ExogenousSeries::init_variables(&params);
        let nt = params.nt();
        let mut controls = vec![0.3; nt];
        controls.extend(vec![0.25; nt]);

        let mut state = DiceState::zeros(nt);
        let value = objective(&params, &exo, &controls, &mut state).unwrap();

        let mut manual = DiceState::zeros(nt);
        roll_out(&params, &exo, &controls, &mut manual).unwrap();
        let utility = f_utility(manual.cemutotper.view(), &params);

        assert_eq!(value, -utility);
        assert!(value.is_finite());
    }

    #[test]
    fn test_higher_time_preference_lowers_welfare_weight() {
        let patient = DiceParameters::init_parameters(2.0, 0.001, 1.45);
        let impatient = DiceParameters::init_parameters(2.0, 0.03, 1.45);
        let patient_exo = ExogenousSeries::init_variables(&patient);
        let impatient_exo = ExogenousSeries::init_variables(&impatient);
        assert!(patient_exo.rr.sum() > impatient_exo.rr.sum());
    }
}
