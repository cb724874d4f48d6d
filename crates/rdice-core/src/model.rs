//! The DICE run object.
//!
//! A [`Dice`] owns the parameter store, the exogenous series and one mutable
//! endogenous state. Typical use follows the construction contract:
//!
//! ```
//! use rdice_core::parameters::DiceParameters;
//! use rdice_core::Dice;
//!
//! let mut dice = Dice::new(DiceParameters::init_parameters(2.0, 0.015, 1.45)).unwrap();
//! let (x_start, bounds) = dice.get_control_bounds_and_startvalue();
//! assert!(bounds.contains(&x_start));
//!
//! let welfare = -dice.f_obj(&x_start).unwrap();
//! assert!(welfare.is_finite());
//! ```
//!
//! Optimising the controls is done by `rdice_optimise::optimize_controls`, which
//! stores the optimum back on the run object.

use crate::bounds::{get_control_bounds_and_startvalue, BoxBounds, ControlBoundsConfig};
use crate::errors::{DiceError, DiceResult};
use crate::exogenous::ExogenousSeries;
use crate::objective::f_utility;
use crate::parameters::{DiceParameters, HorizonParameters};
use crate::rollout::roll_out;
use crate::state::DiceState;
use crate::timeseries::FloatValue;
use crate::variable::Variable;
use ndarray::ArrayView1;
use tracing::info;

/// A single DICE simulation: parameters, exogenous drivers and the latest rollout.
#[derive(Debug, Clone)]
pub struct Dice {
    params: DiceParameters,
    bounds_config: ControlBoundsConfig,
    exogenous: ExogenousSeries,
    state: DiceState,
    optimal_controls: Option<Vec<FloatValue>>,
}

impl Dice {
    /// Validate the parameters, compute the exogenous series and allocate a zeroed
    /// state.
    pub fn new(params: DiceParameters) -> DiceResult<Self> {
        Self::with_bounds_config(params, ControlBoundsConfig::default())
    }

    /// As [`Dice::new`] with a custom control bounds configuration.
    ///
    /// Derived constants are recomputed, so groups may have been edited in place.
    pub fn with_bounds_config(
        mut params: DiceParameters,
        bounds_config: ControlBoundsConfig,
    ) -> DiceResult<Self> {
        params.refresh_derived();
        params.validate()?;
        bounds_config.validate(params.nt())?;
        let exogenous = ExogenousSeries::init_variables(&params);
        let state = DiceState::zeros(params.nt());

        info!(
            nt = params.nt(),
            tstep = params.tstep(),
            a3 = params.damages.a3,
            prstp = params.welfare.prstp,
            elasmu = params.welfare.elasmu,
            "Initialised DICE model"
        );

        Ok(Self {
            params,
            bounds_config,
            exogenous,
            state,
            optimal_controls: None,
        })
    }

    pub fn parameters(&self) -> &DiceParameters {
        &self.params
    }

    pub fn bounds_config(&self) -> &ControlBoundsConfig {
        &self.bounds_config
    }

    pub fn exogenous(&self) -> &ExogenousSeries {
        &self.exogenous
    }

    /// State of the most recent rollout (zeros before the first one).
    pub fn state(&self) -> &DiceState {
        &self.state
    }

    pub fn horizon(&self) -> &HorizonParameters {
        &self.params.horizon
    }

    /// Number of periods.
    pub fn nt(&self) -> usize {
        self.params.nt()
    }

    /// Calendar year at the start of each period.
    pub fn time_axis(&self) -> ArrayView1<'_, FloatValue> {
        self.exogenous.tt.view()
    }

    /// Recompute the endogenous state for `controls`.
    pub fn roll_out(&mut self, controls: &[FloatValue]) -> DiceResult<&DiceState> {
        roll_out(&self.params, &self.exogenous, controls, &mut self.state)?;
        Ok(&self.state)
    }

    /// Rescaled welfare of the current state.
    pub fn f_utility(&self) -> FloatValue {
        f_utility(self.state.cemutotper.view(), &self.params)
    }

    /// Negated welfare of `controls`. Leaves the corresponding rollout in the state.
    pub fn f_obj(&mut self, controls: &[FloatValue]) -> DiceResult<FloatValue> {
        self.roll_out(controls)?;
        Ok(-self.f_utility())
    }

    /// Start point and bounds of the control vector.
    pub fn get_control_bounds_and_startvalue(&self) -> (Vec<FloatValue>, BoxBounds) {
        get_control_bounds_and_startvalue(&self.params, &self.bounds_config)
    }

    /// Controls stored by the last optimisation, if any.
    pub fn optimal_controls(&self) -> Option<&[FloatValue]> {
        self.optimal_controls.as_deref()
    }

    /// Store an optimised control vector.
    pub fn set_optimal_controls(&mut self, controls: Vec<FloatValue>) -> DiceResult<()> {
        if controls.len() != self.params.horizon.n_controls() {
            return Err(DiceError::ControlLength {
                expected: self.params.horizon.n_controls(),
                actual: controls.len(),
            });
        }
        self.optimal_controls = Some(controls);
        Ok(())
    }

    /// Any named series: exogenous ones from the drivers, the rest from the state.
    pub fn series(&self, variable: Variable) -> ArrayView1<'_, FloatValue> {
        match self.exogenous.get(variable) {
            Some(series) => series,
            None => self
                .state
                .get(variable)
                .unwrap_or_else(|| unreachable!("{} is neither exogenous nor state", variable)),
        }
    }
}
