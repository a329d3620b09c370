// Spring pendulum: point mass on an ideal spring anchored at the origin, under gravity
use serde::{Serialize, Deserialize};
use crate::prelude::*;

pub mod integrator;
pub mod energy;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
	pub gravity: Float,// length/time^2, acts along +y
	pub spring_constant: Float,// force/length
	pub natural_length: Float,// length, >= 0
	pub mass: Float// > 0
}

impl SimulationParameters {
	/// Rejects values for which the force model is undefined
	pub fn validate(&self) -> Result<(), SimulationError> {
		check_finite("gravity", self.gravity)?;
		check_finite("spring_constant", self.spring_constant)?;
		check_finite("natural_length", self.natural_length)?;
		check_finite("mass", self.mass)?;
		if self.mass <= 0.0 {
			return Err(SimulationError::invalid("mass", self.mass, "must be > 0"));
		}
		if self.natural_length < 0.0 {
			return Err(SimulationError::invalid("natural_length", self.natural_length, "must be >= 0"));
		}
		Ok(())
	}
}

impl Default for SimulationParameters {
	fn default() -> Self {
		Self {
			gravity: 9.81,
			spring_constant: 10.0,
			natural_length: 1.0,
			mass: 1.0
		}
	}
}

pub(crate) fn check_finite(name: &'static str, value: Float) -> Result<(), SimulationError> {
	match value.is_finite() {
		true => Ok(()),
		false => Err(SimulationError::invalid(name, value, "must be finite"))
	}
}

/// Position of the mass relative to the anchor, and its velocity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct State {
	pub pos: V2,
	pub vel: V2
}

impl State {
	pub fn new(x: Float, y: Float, vx: Float, vy: Float) -> Self {
		Self {
			pos: V2::new(x, y),
			vel: V2::new(vx, vy)
		}
	}
	pub fn at_rest(pos: V2) -> Self {
		Self {
			pos,
			vel: V2::zeros()
		}
	}
	/// Packs into `(x, vx, y, vy)`
	pub fn to_vector(&self) -> V4 {
		V4::new(self.pos.x, self.vel.x, self.pos.y, self.vel.y)
	}
	pub fn from_vector(v: &V4) -> Self {
		Self::new(v[0], v[2], v[1], v[3])
	}
	pub fn radius(&self) -> Float {
		self.pos.magnitude()
	}
	pub fn is_finite(&self) -> bool {
		vec_is_finite(&self.to_vector())
	}
	pub fn validate(&self) -> Result<(), SimulationError> {
		check_finite("x", self.pos.x)?;
		check_finite("y", self.pos.y)?;
		check_finite("vx", self.vel.x)?;
		check_finite("vy", self.vel.y)
	}
}

impl Default for State {
	fn default() -> Self {
		Self::new(1.2, 0.0, 0.0, 0.0)
	}
}

/// Force model: gravity plus the radial spring force, divided by mass.
/// Fails with `SingularState` when the mass sits on the anchor.
pub fn acceleration(pos: &V2, params: &SimulationParameters) -> Result<V2, SimulationError> {
	let r = pos.magnitude();
	if r < SINGULAR_RADIUS {
		return Err(SimulationError::SingularState{x: pos.x, y: pos.y});
	}
	// Spring force magnitude, + is tension (pulls toward the anchor)
	let tension = params.spring_constant * (r - params.natural_length);
	let ax = -tension * pos.x / (params.mass * r);
	let ay = params.gravity - tension * pos.y / (params.mass * r);
	// Done
	Ok(V2::new(ax, ay))
}

#[derive(Debug, Clone)]
pub struct SpringPendulum {
	pub params: SimulationParameters
}

impl SpringPendulum {
	pub fn new(params: SimulationParameters) -> Self {
		Self {
			params
		}
	}
}

impl StaticDifferentiator for SpringPendulum {
	fn differentiate(&self, state: &V4) -> Result<V4, SimulationError> {
		// State is (x, vx, y, vy) so the derivative is (vx, ax, vy, ay)
		let acc = acceleration(&V2::new(state[0], state[2]), &self.params)?;
		Ok(V4::new(
			state[1],
			acc.x,
			state[3],
			acc.y
		))
	}
}

impl Default for SpringPendulum {
	fn default() -> Self {
		Self::new(SimulationParameters::default())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;
	#[test]
	fn differentiation() {
		let d = SpringPendulum::default();
		let state = State::new(1.2, 0.0, 0.5, -0.25).to_vector();
		let derivative = d.differentiate(&state).unwrap();
		// Stretched by 0.2 along x: ax = -10 * 0.2 / 1, ay = g
		assert_relative_eq!(derivative, V4::new(0.5, -2.0, -0.25, 9.81), epsilon = EPSILON);
	}
	#[test]
	fn spring_pulls_toward_natural_length() {
		let params = SimulationParameters{gravity: 0.0, ..Default::default()};
		// Compressed: pushes away from the anchor
		let acc = acceleration(&V2::new(0.0, 0.5), &params).unwrap();
		assert_relative_eq!(acc, V2::new(0.0, 5.0), epsilon = EPSILON);
		// Stretched diagonally: pulls back along the same line
		let acc = acceleration(&V2::new(3.0, 4.0), &params).unwrap();
		assert_relative_eq!(acc, V2::new(-24.0, -32.0), epsilon = EPSILON);
		// At natural length: nothing
		let acc = acceleration(&V2::new(0.6, 0.8), &params).unwrap();
		assert_relative_eq!(acc, V2::zeros(), epsilon = EPSILON);
	}
	#[test]
	fn singular_at_anchor() {
		let result = acceleration(&V2::zeros(), &SimulationParameters::default());
		assert!(matches!(result, Err(SimulationError::SingularState{..})));
	}
	#[test]
	fn parameter_validation() {
		assert!(SimulationParameters::default().validate().is_ok());
		for bad in [
			SimulationParameters{mass: 0.0, ..Default::default()},
			SimulationParameters{mass: -1.0, ..Default::default()},
			SimulationParameters{natural_length: -0.1, ..Default::default()},
			SimulationParameters{gravity: Float::NAN, ..Default::default()},
			SimulationParameters{spring_constant: Float::INFINITY, ..Default::default()}
		] {
			assert!(matches!(bad.validate(), Err(SimulationError::InvalidParameter{..})), "{:?} should be rejected", bad);
		}
		// Zero natural length is allowed
		assert!(SimulationParameters{natural_length: 0.0, ..Default::default()}.validate().is_ok());
	}
	#[test]
	fn vector_packing() {
		let state = State::new(1.0, 2.0, 3.0, 4.0);
		assert_eq!(state.to_vector(), V4::new(1.0, 3.0, 2.0, 4.0));
		assert_eq!(State::from_vector(&state.to_vector()), state);
	}
}
