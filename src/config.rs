//! Scenario configuration loaded from YAML.
//!
//! Every field has a default, so a file only needs to list what it changes:
//!
//! ```yaml
//! parameters:
//!   gravity: 9.81          # along +y (down)
//!   spring_constant: 10.0
//!   natural_length: 1.0
//!   mass: 1.0
//!
//! initial:
//!   x: 1.2
//!   y: 0.0
//!   vx: 0.0
//!   vy: 0.0
//!
//! stepping:
//!   dt: 0.001              # RK4 step size
//!   sub_steps: 10          # steps per frame
//!   frames: 500
//!
//! display:
//!   coil_count: 20
//!   history_capacity: 50000
//!   image_width: 800
//!   image_height: 400
//!   scale: 80.0            # pixels per length unit
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use serde::{Serialize, Deserialize};

use crate::prelude::*;
use crate::physics::energy::DEFAULT_HISTORY_CAPACITY;
use crate::physics::integrator::check_dt;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
	pub parameters: SimulationParameters,
	pub initial: InitialConfig,
	pub stepping: SteppingConfig,
	pub display: DisplayConfig
}

/// Initial position and velocity of the mass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialConfig {
	pub x: Float,
	pub y: Float,
	pub vx: Float,
	pub vy: Float
}

impl Default for InitialConfig {
	fn default() -> Self {
		let state = State::default();
		Self {
			x: state.pos.x,
			y: state.pos.y,
			vx: state.vel.x,
			vy: state.vel.y
		}
	}
}

impl From<InitialConfig> for State {
	fn from(c: InitialConfig) -> Self {
		State::new(c.x, c.y, c.vx, c.vy)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteppingConfig {
	pub dt: Float,
	pub sub_steps: usize,
	pub frames: usize
}

impl Default for SteppingConfig {
	fn default() -> Self {
		Self {
			dt: 0.001,
			sub_steps: 10,
			frames: 500
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
	pub coil_count: usize,
	pub history_capacity: usize,
	pub image_width: u32,
	pub image_height: u32,
	pub scale: Float
}

impl Default for DisplayConfig {
	fn default() -> Self {
		Self {
			coil_count: 20,
			history_capacity: DEFAULT_HISTORY_CAPACITY,
			image_width: 800,
			image_height: 400,
			scale: 80.0
		}
	}
}

impl SimulationConfig {
	pub fn from_yaml_reader<R: Read>(reader: R) -> Result<Self, SimulationError> {
		let config: Self = serde_yaml::from_reader(reader)?;
		config.validate()?;
		Ok(config)
	}
	pub fn from_yaml_str(s: &str) -> Result<Self, SimulationError> {
		Self::from_yaml_reader(s.as_bytes())
	}
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SimulationError> {
		let file = File::open(path.as_ref())?;
		Self::from_yaml_reader(BufReader::new(file))
	}
	pub fn to_yaml(&self) -> Result<String, SimulationError> {
		Ok(serde_yaml::to_string(self)?)
	}
	pub fn validate(&self) -> Result<(), SimulationError> {
		self.parameters.validate()?;
		State::from(self.initial).validate()?;
		check_dt(self.stepping.dt)?;
		if self.display.coil_count == 0 {
			return Err(SimulationError::DegenerateGeometry{coil_count: 0});
		}
		if self.display.history_capacity == 0 {
			return Err(SimulationError::invalid("history_capacity", 0.0, "must be at least 1"));
		}
		if !(self.display.scale.is_finite() && self.display.scale > 0.0) {
			return Err(SimulationError::invalid("scale", self.display.scale, "must be > 0"));
		}
		if self.display.image_width < 2 || self.display.image_height < 2 {
			return Err(SimulationError::invalid("image_width", self.display.image_width.min(self.display.image_height) as Float, "image must be at least 2x2"));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn partial_file_uses_defaults() {
		let config = SimulationConfig::from_yaml_str("
parameters:
  mass: 2.5
initial:
  vx: 0.4
stepping:
  sub_steps: 4
").unwrap();
		assert_eq!(config.parameters.mass, 2.5);
		assert_eq!(config.parameters.spring_constant, 10.0);
		assert_eq!(State::from(config.initial), State::new(1.2, 0.0, 0.4, 0.0));
		assert_eq!(config.stepping.sub_steps, 4);
		assert_eq!(config.stepping.dt, 0.001);
		assert_eq!(config.display, DisplayConfig::default());
	}
	#[test]
	fn empty_file_is_default() {
		assert_eq!(SimulationConfig::from_yaml_str("{}").unwrap(), SimulationConfig::default());
	}
	#[test]
	fn round_trip() {
		let config = SimulationConfig::default();
		assert_eq!(SimulationConfig::from_yaml_str(&config.to_yaml().unwrap()).unwrap(), config);
	}
	#[test]
	fn invalid_values_rejected() {
		assert!(matches!(SimulationConfig::from_yaml_str("parameters: {mass: 0.0}"), Err(SimulationError::InvalidParameter{name: "mass", ..})));
		assert!(matches!(SimulationConfig::from_yaml_str("stepping: {dt: 0.0}"), Err(SimulationError::InvalidParameter{name: "dt", ..})));
		assert!(matches!(SimulationConfig::from_yaml_str("display: {coil_count: 0}"), Err(SimulationError::DegenerateGeometry{..})));
		assert!(matches!(SimulationConfig::from_yaml_str("display: {history_capacity: 0}"), Err(SimulationError::InvalidParameter{..})));
		assert!(matches!(SimulationConfig::from_yaml_str("parameters: [1, 2]"), Err(SimulationError::Yaml(_))));
	}
	#[test]
	fn missing_file() {
		assert!(matches!(SimulationConfig::from_file("does/not/exist.yaml"), Err(SimulationError::Io(_))));
	}
	#[test]
	fn bundled_scenario_loads() {
		let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios").join("default.yaml");
		let config = SimulationConfig::from_file(path).unwrap();
		let sim = Simulation::from_config(&config).unwrap();
		assert_eq!(*sim.state(), State::from(config.initial));
	}
}
