// Zig-zag polyline approximating a coil spring between the anchor and the mass, for rendering
use geo::{Coord, LineString, EuclideanLength};
use crate::prelude::*;

/// Half-width of the zig-zag relative to the spring length
pub const ZIGZAG_AMPLITUDE: Float = 0.1;

/// Points from the anchor to the mass. Built fresh for every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SpringPolyline(pub LineString<Float>);

impl SpringPolyline {
	pub fn len(&self) -> usize {
		self.0.0.len()
	}
	pub fn is_empty(&self) -> bool {
		self.0.0.is_empty()
	}
	pub fn points(&self) -> impl Iterator<Item = V2> + '_ {
		self.0.coords().map(|c| V2::new(c.x, c.y))
	}
	pub fn start(&self) -> Option<V2> {
		self.points().next()
	}
	pub fn end(&self) -> Option<V2> {
		self.0.0.last().map(|c| V2::new(c.x, c.y))
	}
	/// Length of the drawn wire, not of the spring
	pub fn wire_length(&self) -> Float {
		self.0.euclidean_length()
	}
}

/// `coil_count + 1` points: the i-th sits `r * i / coil_count` along the spring, pushed sideways by
/// `0.1 * r * (-1)^i`. Unlike that plain formula, which also offsets i = 0 and i = coil_count, the end points
/// carry no sideways offset so the wire starts exactly on the anchor and ends exactly on the mass.
pub fn generate(position: &V2, coil_count: usize) -> Result<SpringPolyline, SimulationError> {
	if coil_count == 0 {
		return Err(SimulationError::DegenerateGeometry{coil_count});
	}
	let r = position.magnitude();
	let theta = position.y.atan2(position.x);
	let (sin, cos) = theta.sin_cos();
	let mut coords = Vec::<Coord<Float>>::with_capacity(coil_count + 1);
	for i in 0..=coil_count {
		let t = r * (i as Float) / (coil_count as Float);
		let offset = match i {
			0 => 0.0,
			_ if i == coil_count => 0.0,
			_ => ZIGZAG_AMPLITUDE * r * if i % 2 == 0 {1.0} else {-1.0}
		};
		// Rotate (t, offset) by theta
		coords.push(Coord {
			x: t * cos - offset * sin,
			y: t * sin + offset * cos
		});
	}
	// Done
	Ok(SpringPolyline(LineString::new(coords)))
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;
	#[test]
	fn endpoints() {
		for (pos, coils) in [(V2::new(1.2, 0.0), 20), (V2::new(-0.3, 2.5), 7), (V2::new(0.0, -1.0), 1), (V2::new(-4.0, -3.0), 2)] {
			let spring = generate(&pos, coils).unwrap();
			assert_eq!(spring.len(), coils + 1);
			assert_relative_eq!(spring.start().unwrap(), V2::zeros(), epsilon = EPSILON);
			assert_relative_eq!(spring.end().unwrap(), pos, epsilon = EPSILON);
		}
	}
	#[test]
	fn zig_zag() {
		let pos = V2::new(3.0, 4.0);
		let r = 5.0;
		let along = pos / r;
		let across = V2::new(-along.y, along.x);
		let spring = generate(&pos, 10).unwrap();
		for (i, p) in spring.points().enumerate().skip(1).take(9) {
			// Evenly spaced along the spring
			assert_relative_eq!(p.dot(&along), r * (i as Float) / 10.0, epsilon = EPSILON);
			// Alternating sideways offset
			let expected = if i % 2 == 0 {0.5} else {-0.5};
			assert_relative_eq!(p.dot(&across), expected, epsilon = EPSILON);
		}
		assert!(spring.wire_length() > r);
	}
	#[test]
	fn zero_coils_rejected() {
		assert!(matches!(generate(&V2::new(1.0, 0.0), 0), Err(SimulationError::DegenerateGeometry{coil_count: 0})));
	}
	#[test]
	fn collapsed_spring() {
		// No division by the radius: everything collapses onto the anchor
		let spring = generate(&V2::zeros(), 4).unwrap();
		assert_eq!(spring.len(), 5);
		for p in spring.points() {
			assert_relative_eq!(p, V2::zeros());
		}
	}
}
