//! Error taxonomy for the simulation core and its configuration

use thiserror::Error;

use crate::prelude::Float;

#[derive(Error, Debug)]
pub enum SimulationError {
	#[error("Invalid parameter `{name}` = {value}: {reason}")]
	InvalidParameter {
		name: &'static str,
		value: Float,
		reason: &'static str
	},

	#[error("Mass at the anchor ({x}, {y}), spring direction is undefined")]
	SingularState { x: Float, y: Float },

	#[error("Spring needs at least one coil, got {coil_count}")]
	DegenerateGeometry { coil_count: usize },

	#[error("Step starting at t = {time} produced a non-finite state")]
	NonFiniteState { time: Float },

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Config error: {0}")]
	Yaml(#[from] serde_yaml::Error),

	#[cfg(feature = "image-rendering")]
	#[error("Image error: {0}")]
	Image(#[from] image::ImageError)
}

impl SimulationError {
	pub(crate) fn invalid(name: &'static str, value: Float, reason: &'static str) -> Self {
		Self::InvalidParameter { name, value, reason }
	}
}
