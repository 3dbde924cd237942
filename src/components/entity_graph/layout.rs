//! Fit-to-viewport centering.

use super::types::Entity;
use super::viewport::ViewTransform;

pub const FIT_MIN_ZOOM: f64 = 0.5;
pub const FIT_MAX_ZOOM: f64 = 2.0;

/// Axis-aligned box around a node set, each node extended by its radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub min_x: f64,
	pub min_y: f64,
	pub max_x: f64,
	pub max_y: f64,
}

impl Bounds {
	pub fn of(entities: &[Entity]) -> Option<Self> {
		if entities.is_empty() {
			return None;
		}
		let mut b = Bounds {
			min_x: f64::INFINITY,
			min_y: f64::INFINITY,
			max_x: f64::NEG_INFINITY,
			max_y: f64::NEG_INFINITY,
		};
		for e in entities {
			let r = e.radius();
			b.min_x = b.min_x.min(e.x - r);
			b.min_y = b.min_y.min(e.y - r);
			b.max_x = b.max_x.max(e.x + r);
			b.max_y = b.max_y.max(e.y + r);
		}
		Some(b)
	}

	pub fn width(&self) -> f64 {
		self.max_x - self.min_x
	}

	pub fn height(&self) -> f64 {
		self.max_y - self.min_y
	}
}

/// Transform that fits `entities` into a `width` x `height` viewport with
/// `padding` on every side, using the smaller axis scale clamped to
/// `[FIT_MIN_ZOOM, FIT_MAX_ZOOM]`. `None` when there is nothing to fit.
pub fn fit_transform(
	entities: &[Entity],
	width: f64,
	height: f64,
	padding: f64,
) -> Option<ViewTransform> {
	let bounds = Bounds::of(entities)?;
	let (bw, bh) = (bounds.width(), bounds.height());
	if !(bw.is_finite() && bh.is_finite()) || bw <= 0.0 || bh <= 0.0 {
		return None;
	}
	if !(width > 0.0 && height > 0.0) {
		return None;
	}

	let scale_x = (width - padding * 2.0) / bw;
	let scale_y = (height - padding * 2.0) / bh;
	let k = scale_x.min(scale_y).clamp(FIT_MIN_ZOOM, FIT_MAX_ZOOM);

	Some(ViewTransform {
		k,
		x: (width - bw * k) / 2.0 - bounds.min_x * k,
		y: (height - bh * k) / 2.0 - bounds.min_y * k,
	})
}
