// Energy accounting: kinetic, potential and total mechanical energy of the pendulum
use std::collections::VecDeque;
use log::trace;
use serde::{Serialize, Deserialize};

use crate::prelude::*;

pub const DEFAULT_HISTORY_CAPACITY: usize = 50_000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergySample {
	pub time: Float,
	pub kinetic: Float,
	pub potential: Float,
	pub total: Float
}

/// Energy of `state` at `time`.
/// Height is measured against gravity, so with y pointing down the gravitational term is `-m*g*y`.
/// The sign is deliberate: the plain `+m*g*y` form disagrees with the force model (`ay = g - ...`) and the
/// total would drift with gravity on.
pub fn sample(time: Float, state: &State, params: &SimulationParameters) -> EnergySample {
	let kinetic = 0.5 * params.mass * state.vel.magnitude_squared();// KE = mV^2/2
	let stretch = state.radius() - params.natural_length;
	let potential = 0.5 * params.spring_constant * stretch.powi(2)// Spring, kx^2/2
		- params.mass * params.gravity * state.pos.y;// PE = mgh, h = -y
	EnergySample {
		time,
		kinetic,
		potential,
		total: kinetic + potential
	}
}

/// Axis ranges for an energy-vs-time plot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotBounds {
	pub time: (Float, Float),
	pub energy: (Float, Float)
}

/// Minimum visible time window
const MIN_TIME_SPAN: Float = 10.0;
const HEADROOM: Float = 1.1;

/// Ring buffer of the most recent `capacity` samples of a run
#[derive(Debug, Clone)]
pub struct EnergyHistory {
	samples: VecDeque<EnergySample>,
	capacity: usize
}

impl EnergyHistory {
	pub fn new(capacity: usize) -> Result<Self, SimulationError> {
		if capacity == 0 {
			return Err(SimulationError::invalid("history_capacity", capacity as Float, "must be at least 1"));
		}
		Ok(Self {
			samples: VecDeque::with_capacity(capacity.min(4096)),
			capacity
		})
	}
	pub fn push(&mut self, sample: EnergySample) {
		if self.samples.len() == self.capacity {
			let dropped = self.samples.pop_front();
			trace!("Energy history full, dropped sample {:?}", dropped);
		}
		self.samples.push_back(sample);
	}
	pub fn extend(&mut self, samples: impl IntoIterator<Item = EnergySample>) {
		for s in samples {
			self.push(s);
		}
	}
	pub fn clear(&mut self) {
		self.samples.clear();
	}
	pub fn len(&self) -> usize {
		self.samples.len()
	}
	pub fn is_empty(&self) -> bool {
		self.samples.is_empty()
	}
	pub fn capacity(&self) -> usize {
		self.capacity
	}
	pub fn latest(&self) -> Option<&EnergySample> {
		self.samples.back()
	}
	/// Oldest first
	pub fn iter(&self) -> impl Iterator<Item = &EnergySample> + '_ {
		self.samples.iter()
	}
	/// Time axis `[0, max(10, t_last)]`, energy axis from `min(0, lowest)` to 10% above the highest
	/// value of any of the three series
	pub fn plot_bounds(&self) -> PlotBounds {
		let t_end = self.latest().map_or(0.0, |s| s.time).max(MIN_TIME_SPAN);
		let mut lo: Float = 0.0;
		let mut hi = Float::NEG_INFINITY;
		for s in self.iter() {
			for e in [s.kinetic, s.potential, s.total] {
				lo = lo.min(e);
				hi = hi.max(e);
			}
		}
		let hi = match hi.is_finite() {
			true if hi > 0.0 => hi * HEADROOM,
			true => hi + (hi - lo).abs() * (HEADROOM - 1.0),
			false => 1.0
		};
		// Never an empty range
		let hi = if hi - lo > EPSILON {hi} else {lo + 1.0};
		// Done
		PlotBounds {
			time: (0.0, t_end),
			energy: (lo, hi)
		}
	}
}

impl Default for EnergyHistory {
	fn default() -> Self {
		Self {
			samples: VecDeque::new(),
			capacity: DEFAULT_HISTORY_CAPACITY
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;
	fn sample_at(time: Float, total: Float) -> EnergySample {
		EnergySample{time, kinetic: 0.0, potential: total, total}
	}
	#[test]
	fn energy_terms() {
		let params = SimulationParameters::default();
		// 1
		// Stretched by 0.2 on the x axis, at rest
		let e = sample(0.0, &State::new(1.2, 0.0, 0.0, 0.0), &params);
		assert_relative_eq!(e.kinetic, 0.0);
		assert_relative_eq!(e.potential, 0.2, epsilon = EPSILON);
		assert_relative_eq!(e.total, 0.2, epsilon = EPSILON);
		// 2
		// Natural length straight down, moving at speed 5
		let e = sample(1.5, &State::new(0.0, 1.0, 3.0, 4.0), &params);
		assert_eq!(e.time, 1.5);
		assert_relative_eq!(e.kinetic, 12.5, epsilon = EPSILON);
		assert_relative_eq!(e.potential, -9.81, epsilon = EPSILON);
		assert_relative_eq!(e.total, 12.5 - 9.81, epsilon = EPSILON);
	}
	#[test]
	fn ring_buffer_drops_oldest() {
		let mut history = EnergyHistory::new(3).unwrap();
		history.extend((0..5).map(|i| sample_at(i as Float, 1.0)));
		assert_eq!(history.len(), 3);
		let times: Vec<Float> = history.iter().map(|s| s.time).collect();
		assert_eq!(times, vec![2.0, 3.0, 4.0]);
		assert_eq!(history.latest().unwrap().time, 4.0);
		history.clear();
		assert!(history.is_empty());
		assert_eq!(history.capacity(), 3);
	}
	#[test]
	fn zero_capacity_rejected() {
		assert!(matches!(EnergyHistory::new(0), Err(SimulationError::InvalidParameter{..})));
	}
	#[test]
	fn plot_bounds() {
		let mut history = EnergyHistory::new(100).unwrap();
		// Empty history still gives a usable window
		let bounds = history.plot_bounds();
		assert_eq!(bounds.time, (0.0, 10.0));
		assert!(bounds.energy.1 > bounds.energy.0);
		// 1
		history.push(EnergySample{time: 2.0, kinetic: 1.0, potential: 3.0, total: 4.0});
		let bounds = history.plot_bounds();
		assert_eq!(bounds.time, (0.0, 10.0));
		assert_relative_eq!(bounds.energy.0, 0.0);
		assert_relative_eq!(bounds.energy.1, 4.4, epsilon = EPSILON);
		// 2
		// Negative potential extends the bottom, long runs extend the time axis
		history.push(EnergySample{time: 12.0, kinetic: 2.0, potential: -5.0, total: -3.0});
		let bounds = history.plot_bounds();
		assert_eq!(bounds.time, (0.0, 12.0));
		assert_relative_eq!(bounds.energy.0, -5.0);
		assert_relative_eq!(bounds.energy.1, 4.4, epsilon = EPSILON);
	}
	#[test]
	fn plot_bounds_all_negative() {
		let mut history = EnergyHistory::new(10).unwrap();
		history.push(EnergySample{time: 0.0, kinetic: 0.0, potential: -2.0, total: -2.0});
		let bounds = history.plot_bounds();
		assert!(bounds.energy.1 > bounds.energy.0);
		assert!(bounds.energy.0 <= -2.0);
	}
}
