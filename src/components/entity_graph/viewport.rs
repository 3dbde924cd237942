//! Graph-space to screen-space mapping: `screen = graph * k + (x, y)`.

/// Factor applied by one toolbar zoom step.
pub const ZOOM_STEP: f64 = 1.2;
/// Lower bound of interactive zoom.
pub const MIN_ZOOM: f64 = 0.25;
/// Upper bound of interactive zoom.
pub const MAX_ZOOM: f64 = 4.0;

/// Pan offset and uniform scale of the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal offset in screen pixels.
	pub x: f64,
	/// Vertical offset in screen pixels.
	pub y: f64,
	/// Scale, always finite and positive.
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	/// Builds a transform as given, unchecked.
	pub fn new(k: f64, x: f64, y: f64) -> Self {
		Self { x, y, k }
	}

	/// Replace the whole transform. Non-finite values and `k <= 0` are
	/// refused and leave the current transform in place.
	pub fn set(&mut self, k: f64, x: f64, y: f64) -> bool {
		if !(k.is_finite() && x.is_finite() && y.is_finite()) || k <= 0.0 {
			return false;
		}
		*self = Self { x, y, k };
		true
	}

	/// `k * ZOOM_STEP`, capped at [`MAX_ZOOM`].
	pub fn zoom_in(&mut self) {
		self.k = (self.k * ZOOM_STEP).min(MAX_ZOOM);
	}

	/// `k / ZOOM_STEP`, floored at [`MIN_ZOOM`].
	pub fn zoom_out(&mut self) {
		self.k = (self.k / ZOOM_STEP).max(MIN_ZOOM);
	}

	/// Wheel zoom: scales by `factor` while keeping the graph point under
	/// `(px, py)` fixed on screen.
	pub fn zoom_at(&mut self, px: f64, py: f64, factor: f64) -> bool {
		if !(px.is_finite() && py.is_finite() && factor.is_finite()) || factor <= 0.0 {
			return false;
		}
		let new_k = (self.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.k;
		self.set(
			new_k,
			px - (px - self.x) * ratio,
			py - (py - self.y) * ratio,
		)
	}

	/// Inverse of [`Self::graph_to_screen`].
	pub fn screen_to_graph(&self, px: f64, py: f64) -> (f64, f64) {
		((px - self.x) / self.k, (py - self.y) / self.k)
	}

	/// Maps a graph-space point to canvas pixels.
	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		(gx * self.k + self.x, gy * self.k + self.y)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const EPS: f64 = 1e-9;

	#[test]
	fn round_trip_through_screen_space() {
		let transforms = [
			ViewTransform::default(),
			ViewTransform::new(0.5, 120.0, -40.0),
			ViewTransform::new(3.7, -300.25, 88.0),
		];
		for t in transforms {
			for (gx, gy) in [(0.0, 0.0), (400.0, 300.0), (-12.5, 1e4)] {
				let (sx, sy) = t.graph_to_screen(gx, gy);
				let (rx, ry) = t.screen_to_graph(sx, sy);
				assert!((rx - gx).abs() < 1e-6 && (ry - gy).abs() < 1e-6);
			}
		}
	}

	#[test]
	fn zoom_steps_clamp_to_interactive_range() {
		let mut t = ViewTransform::new(3.5, 10.0, 20.0);
		t.zoom_in();
		assert_eq!(t.k, MAX_ZOOM);
		assert_eq!((t.x, t.y), (10.0, 20.0));

		let mut t = ViewTransform::new(1.0, 0.0, 0.0);
		t.zoom_in();
		assert!((t.k - 1.2).abs() < EPS);
		t.zoom_out();
		assert!((t.k - 1.0).abs() < EPS);

		let mut t = ViewTransform::new(0.26, 0.0, 0.0);
		t.zoom_out();
		assert_eq!(t.k, MIN_ZOOM);
	}

	#[test]
	fn invalid_set_keeps_previous_transform() {
		let mut t = ViewTransform::new(2.0, 5.0, 6.0);
		assert!(!t.set(f64::NAN, 0.0, 0.0));
		assert!(!t.set(1.0, f64::INFINITY, 0.0));
		assert!(!t.set(0.0, 0.0, 0.0));
		assert_eq!(t, ViewTransform::new(2.0, 5.0, 6.0));
		assert!(t.set(10.0, -1.0, -2.0));
		assert_eq!(t, ViewTransform::new(10.0, -1.0, -2.0));
	}

	#[test]
	fn zoom_at_keeps_cursor_anchor() {
		let mut t = ViewTransform::new(1.0, 50.0, 25.0);
		let before = t.screen_to_graph(300.0, 200.0);
		assert!(t.zoom_at(300.0, 200.0, 1.1));
		let after = t.screen_to_graph(300.0, 200.0);
		assert!((before.0 - after.0).abs() < EPS && (before.1 - after.1).abs() < EPS);
	}
}
