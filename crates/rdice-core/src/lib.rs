//! Core of the DICE (Dynamic Integrated Climate-Economy) model.
//!
//! DICE couples a Ramsey-style growth model to a three-reservoir carbon cycle and a
//! two-layer energy balance model. This crate holds everything needed to simulate it
//! for a given policy:
//!
//! - `parameters`: the scalar constants, grouped by domain, with DICE-2016R defaults
//! - `exogenous`: time series that do not depend on policy (population, productivity,
//!   carbon intensity, backstop price, ...)
//! - `rollout`: the forward recurrence that turns a control vector into the full
//!   endogenous state
//! - `objective`: the discounted welfare functional and its negated form
//! - `bounds`: box bounds and the start point for the control vector
//! - `model`: the [`model::Dice`] run object tying these together
//!
//! Optimisation of the controls lives in the `rdice-optimise` crate.

pub mod bounds;
pub mod errors;
pub mod exogenous;
pub mod model;
pub mod objective;
pub mod parameters;
pub mod rollout;
pub mod state;
pub mod timeseries;
pub mod variable;

pub use model::Dice;
