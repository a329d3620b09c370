//! The simulation core as seen by a driving loop (timer, renderer, UI).
//!
//! A [`Simulation`] owns the parameters, the current [`State`], the elapsed time and the
//! energy history of one run. Everything is mutated only through `&mut self`, so a loop that
//! also takes parameter edits from another thread wraps it in a single `Mutex` and parameter
//! writes can never land in the middle of a step.

use log::{debug, warn};
use crate::prelude::*;
use crate::physics::integrator::check_dt;

/// Result of one `advance` call
#[derive(Debug, Clone, PartialEq)]
pub struct Advance {
	pub state: State,
	/// Samples appended by this call, one per sub-step
	pub samples: Vec<EnergySample>
}

#[derive(Debug, Clone)]
pub struct Simulation {
	params: SimulationParameters,
	initial: State,
	state: State,
	time: Float,
	history: EnergyHistory
}

impl Simulation {
	pub fn new(params: SimulationParameters, initial: State, history_capacity: usize) -> Result<Self, SimulationError> {
		params.validate()?;
		initial.validate()?;
		Ok(Self {
			params,
			initial,
			state: initial,
			time: 0.0,
			history: EnergyHistory::new(history_capacity)?
		})
	}
	pub fn from_config(config: &SimulationConfig) -> Result<Self, SimulationError> {
		Self::new(config.parameters, config.initial.into(), config.display.history_capacity)
	}
	/// Replaces the parameters if they are valid, otherwise keeps the current ones
	pub fn set_parameters(&mut self, params: SimulationParameters) -> Result<(), SimulationError> {
		params.validate()?;
		debug!("Parameters updated: {:?}", params);
		self.params = params;
		Ok(())
	}
	/// Starts a new run from `initial`: time goes back to 0 and the energy history is emptied
	pub fn reset(&mut self, initial: State) -> Result<(), SimulationError> {
		initial.validate()?;
		debug!("Reset to {:?}", initial);
		self.initial = initial;
		self.restart();
		Ok(())
	}
	/// Same as `reset` with the last initial state
	pub fn restart(&mut self) {
		self.state = self.initial;
		self.time = 0.0;
		self.history.clear();
	}
	/// Runs `sub_steps` RK4 steps of size `dt`, sampling the energy after each one.
	/// On error nothing changes: the state, time and history are those from before the call.
	pub fn advance(&mut self, dt: Float, sub_steps: usize) -> Result<Advance, SimulationError> {
		check_dt(dt)?;
		let mut state = self.state;
		let mut time = self.time;
		// Never reserve more than the history can keep
		let mut samples = Vec::<EnergySample>::with_capacity(sub_steps.min(self.history.capacity()));
		for _ in 0..sub_steps {
			let next = step(&state, &self.params, dt).map_err(|e| {
				warn!("Step at t = {} rejected: {}", time, e);
				e
			})?;
			if !next.is_finite() {
				warn!("Step at t = {} diverged from {:?}, dt = {} is probably too large", time, state, dt);
				return Err(SimulationError::NonFiniteState{time});
			}
			state = next;
			time += dt;
			samples.push(sample(time, &state, &self.params));
		}
		// Commit
		self.state = state;
		self.time = time;
		self.history.extend(samples.iter().copied());
		Ok(Advance {
			state,
			samples
		})
	}
	pub fn render_spring(&self, coil_count: usize) -> Result<SpringPolyline, SimulationError> {
		generate(&self.state.pos, coil_count)
	}
	pub fn state(&self) -> &State {
		&self.state
	}
	pub fn initial_state(&self) -> &State {
		&self.initial
	}
	pub fn parameters(&self) -> &SimulationParameters {
		&self.params
	}
	pub fn time(&self) -> Float {
		self.time
	}
	pub fn history(&self) -> &EnergyHistory {
		&self.history
	}
	pub fn energy(&self) -> EnergySample {
		sample(self.time, &self.state, &self.params)
	}
}

impl Default for Simulation {
	fn default() -> Self {
		Self {
			params: SimulationParameters::default(),
			initial: State::default(),
			state: State::default(),
			time: 0.0,
			history: EnergyHistory::default()
		}
	}
}
