/* Spring pendulum simulator: a point mass hanging from an ideal spring anchored at the origin.
Fixed-step RK4 integration, energy accounting and a zig-zag spring polyline for rendering.
The y axis points the way gravity acts (down), renderers flip it for display.
*/

use nalgebra::{Vector2, Vector4};

pub mod error;
pub mod physics;
pub mod spring;
pub mod simulation;
pub mod config;
#[cfg(feature = "image-rendering")]
pub mod render;

pub mod prelude {
	use super::*;
	pub const APP_NAME: &str = "Spring pendulum simulator";
	pub type Float = f64;
	pub type V2 = Vector2<Float>;
	/// Packed state `(x, vx, y, vy)`, also used for its derivative `(vx, ax, vy, ay)`
	pub type V4 = Vector4<Float>;
	pub type ImgV2 = Vector2<u32>;
	pub const EPSILON: Float = 1e-9;
	/// Below this distance from the anchor the spring direction is undefined
	pub const SINGULAR_RADIUS: Float = 1e-12;
	pub use crate::{
		StaticDifferentiator,
		vec_is_finite,
		error::SimulationError,
		physics::{
			SimulationParameters,
			State,
			SpringPendulum,
			acceleration,
			integrator::{rk4_step, step},
			energy::{EnergySample, EnergyHistory, PlotBounds, sample}
		},
		spring::{SpringPolyline, generate},
		simulation::{Simulation, Advance},
		config::SimulationConfig
	};
	#[cfg(feature = "image-rendering")]
	pub use crate::render::{FrameRenderer, ImagePosTranslater};
}

use prelude::*;

/// A system whose packed state can be differentiated with respect to time
pub trait StaticDifferentiator {
	fn differentiate(&self, state: &V4) -> Result<V4, SimulationError>;
}

pub fn vec_is_finite(v: &V4) -> bool {
	v.iter().all(|n| n.is_finite())
}
