//! Classic fixed-step 4th-order Runge-Kutta integration
//!
//! Works on the packed `(x, vx, y, vy)` vector so position' = velocity and
//! velocity' = acceleration are advanced together. Local error is O(dt^5),
//! global O(dt^4). There is no step-size control: the caller picks a `dt`
//! that is stable for the stiffness `spring_constant / mass` (around 1e-3
//! for k ~ 10, m ~ 1).

use crate::prelude::*;
use super::check_finite;

/// One RK4 step of size `dt`.
/// Any failing stage aborts the whole step, nothing is partially applied.
pub fn rk4_step<D: StaticDifferentiator>(differentiator: &D, state: &V4, dt: Float) -> Result<V4, SimulationError> {
	// Stage offsets 0, 1/2, 1/2, 1
	let k1 = differentiator.differentiate(state)? * dt;
	let k2 = differentiator.differentiate(&(state + k1 * 0.5))? * dt;
	let k3 = differentiator.differentiate(&(state + k2 * 0.5))? * dt;
	let k4 = differentiator.differentiate(&(state + k3))? * dt;
	// Weights 1/6, 1/3, 1/3, 1/6
	Ok(state + (k1 + k2 * 2.0 + k3 * 2.0 + k4) / 6.0)
}

/// Advances `state` under `params` by `dt`. Pure: the input is never modified.
pub fn step(state: &State, params: &SimulationParameters, dt: Float) -> Result<State, SimulationError> {
	check_dt(dt)?;
	let pendulum = SpringPendulum::new(*params);
	let next = rk4_step(&pendulum, &state.to_vector(), dt)?;
	Ok(State::from_vector(&next))
}

pub(crate) fn check_dt(dt: Float) -> Result<(), SimulationError> {
	check_finite("dt", dt)?;
	if dt <= 0.0 {
		return Err(SimulationError::invalid("dt", dt, "must be > 0"));
	}
	Ok(())
}
