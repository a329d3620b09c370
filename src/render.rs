// Headless frame rendering with `image`: pendulum on the left, energy-vs-time on the right
use image::{Rgb, RgbImage, ImageBuffer};
use crate::prelude::*;
use crate::config::DisplayConfig;

/// Maps world coordinates (y up) to pixel coordinates (y down)
#[derive(Debug, Clone, Copy)]
pub struct ImagePosTranslater {
	pub scale: Float,// Pixels / world-unit
	pub origin: V2,// Pixel position of the world origin
	pub image_size: ImgV2
}

impl ImagePosTranslater {
	pub fn world_to_px_float(&self, pos: V2) -> V2 {
		V2::new(
			self.origin.x + pos.x * self.scale,
			self.origin.y - pos.y * self.scale
		)
	}
	/// `None` when the point lands outside the image
	pub fn world_to_px(&self, pos: V2) -> Option<ImgV2> {
		to_pixel(self.world_to_px_float(pos), self.image_size)
	}
}

fn to_pixel(px: V2, size: ImgV2) -> Option<ImgV2> {
	let (x, y) = (px.x.round(), px.y.round());
	if x >= 0.0 && y >= 0.0 && x < size.x as Float && y < size.y as Float {
		Some(ImgV2::new(x as u32, y as u32))
	}
	else {
		None
	}
}

pub struct FrameRenderer {
	pub image_size: ImgV2,
	pub scale: Float,
	pub coil_count: usize,
	pub background_color: Rgb<u8>,
	pub spring_color: Rgb<u8>,
	pub mass_color: Rgb<u8>,
	pub axis_color: Rgb<u8>,
	pub kinetic_color: Rgb<u8>,
	pub potential_color: Rgb<u8>,
	pub total_color: Rgb<u8>,
	pub mass_radius: Float// Pixels
}

impl FrameRenderer {
	pub fn new(display: &DisplayConfig) -> Self {
		Self {
			image_size: ImgV2::new(display.image_width, display.image_height),
			scale: display.scale,
			coil_count: display.coil_count,
			background_color: Rgb([255; 3]),
			spring_color: Rgb([0, 0, 255]),
			mass_color: Rgb([255, 0, 0]),
			axis_color: Rgb([160; 3]),
			kinetic_color: Rgb([31, 119, 180]),
			potential_color: Rgb([255, 127, 14]),
			total_color: Rgb([44, 160, 44]),
			mass_radius: 5.0
		}
	}
	/// Left half of the image, anchor in its center
	pub fn pendulum_translater(&self) -> ImagePosTranslater {
		ImagePosTranslater {
			scale: self.scale,
			origin: V2::new(self.image_size.x as Float / 4.0, self.image_size.y as Float / 2.0),
			image_size: self.image_size
		}
	}
	pub fn render(&self, sim: &Simulation) -> Result<RgbImage, SimulationError> {
		let mut image: RgbImage = ImageBuffer::from_pixel(self.image_size.x, self.image_size.y, self.background_color);
		let spring = sim.render_spring(self.coil_count)?;
		self.draw_pendulum(&mut image, &spring, sim.state().pos);
		self.draw_energy(&mut image, sim.history());
		// Done
		Ok(image)
	}
	fn draw_pendulum(&self, image: &mut RgbImage, spring: &SpringPolyline, mass: V2) {
		let translater = self.pendulum_translater();
		// Physics y points down, screen-up world needs it flipped
		let flip = |p: V2| translater.world_to_px_float(V2::new(p.x, -p.y));
		let points: Vec<V2> = spring.points().map(flip).collect();
		for pair in points.windows(2) {
			draw_line(image, pair[0], pair[1], self.spring_color);
		}
		draw_disc(image, flip(mass), self.mass_radius, self.mass_color);
	}
	fn draw_energy(&self, image: &mut RgbImage, history: &EnergyHistory) {
		let bounds = history.plot_bounds();
		let (w, h) = (self.image_size.x as Float, self.image_size.y as Float);
		let margin = 10.0;
		let left = w / 2.0 + margin;
		let right = w - margin;
		let top = margin;
		let bottom = h - margin;
		let to_px = |time: Float, energy: Float| -> V2 {
			let u = (time - bounds.time.0) / (bounds.time.1 - bounds.time.0);
			let v = (energy - bounds.energy.0) / (bounds.energy.1 - bounds.energy.0);
			V2::new(left + u * (right - left), bottom - v * (bottom - top))
		};
		// Axes, time axis at zero energy
		draw_line(image, V2::new(left, top), V2::new(left, bottom), self.axis_color);
		let zero = to_px(bounds.time.0, 0.0).y;
		draw_line(image, V2::new(left, zero), V2::new(right, zero), self.axis_color);
		// Curves
		let series: [(fn(&EnergySample) -> Float, Rgb<u8>); 3] = [
			(|s| s.kinetic, self.kinetic_color),
			(|s| s.potential, self.potential_color),
			(|s| s.total, self.total_color)
		];
		for (value, color) in series {
			let mut prev: Option<V2> = None;
			for s in history.iter() {
				let p = to_px(s.time, value(s));
				// Skip sub-pixel segments, histories are dense
				match prev {
					Some(q) if (p - q).magnitude() < 1.0 => continue,
					Some(q) => draw_line(image, q, p, color),
					None => put_pixel(image, p, color)
				}
				prev = Some(p);
			}
		}
	}
}

fn put_pixel(image: &mut RgbImage, px: V2, color: Rgb<u8>) {
	if let Some(p) = to_pixel(px, ImgV2::new(image.width(), image.height())) {
		image.put_pixel(p.x, p.y, color);
	}
}

/// Liang-Barsky: the part of segment `a`-`b` inside the image, `None` if it misses it
pub fn clip_to_image(a: V2, b: V2, size: ImgV2) -> Option<(V2, V2)> {
	let max = V2::new(size.x as Float - 1.0, size.y as Float - 1.0);
	let d = b - a;
	let (mut t0, mut t1): (Float, Float) = (0.0, 1.0);
	for (p, q) in [(-d.x, a.x), (d.x, max.x - a.x), (-d.y, a.y), (d.y, max.y - a.y)] {
		if p == 0.0 {
			// Parallel to this edge
			if q < 0.0 {
				return None;
			}
			continue;
		}
		let t = q / p;
		if p < 0.0 {
			if t > t1 {
				return None;
			}
			t0 = t0.max(t);
		}
		else {
			if t < t0 {
				return None;
			}
			t1 = t1.min(t);
		}
	}
	Some((a + d * t0, a + d * t1))
}

/// DDA line between pixel positions, clipped to the image first so the cost is bounded by the image size
pub fn draw_line(image: &mut RgbImage, a: V2, b: V2, color: Rgb<u8>) {
	let (a, b) = match clip_to_image(a, b, ImgV2::new(image.width(), image.height())) {
		Some(clipped) => clipped,
		None => return
	};
	let delta = b - a;
	let n = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as usize;
	for i in 0..=n {
		put_pixel(image, a + delta * (i as Float / n as Float), color);
	}
}

pub fn draw_disc(image: &mut RgbImage, center: V2, radius: Float, color: Rgb<u8>) {
	let r = radius.ceil() as i64;
	for dx in -r..=r {
		for dy in -r..=r {
			let offset = V2::new(dx as Float, dy as Float);
			if offset.magnitude() <= radius {
				put_pixel(image, center + offset, color);
			}
		}
	}
}
