//! Bidirectional mapping between raw pointer coordinates (canvas logical
//! pixels, pre-zoom) and logical canvas coordinates under zoom and pan.

use super::types::{Point, Size, Vec2};

pub const MIN_ZOOM: f64 = 0.25;
pub const MAX_ZOOM: f64 = 5.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
	pub zoom: f64,
	/// Accumulated pan, unconstrained; only node positions are clamped.
	pub pan: Vec2,
	/// Device pixel ratio, read-only after construction.
	pub dpr: f64,
}

impl Viewport {
	pub fn new(dpr: f64) -> Self {
		Self {
			zoom: 1.0,
			pan: Vec2::default(),
			dpr,
		}
	}

	/// Raw canvas point → logical point. Zoom scales around the canvas
	/// center, so the center term drops out at zoom 1.
	pub fn to_logical(&self, raw: Point, canvas: Size) -> Point {
		Point::new(
			(raw.x - canvas.width * (1.0 - self.zoom) / 2.0 - self.pan.x) / self.zoom,
			(raw.y - canvas.height * (1.0 - self.zoom) / 2.0 - self.pan.y) / self.zoom,
		)
	}

	/// Exact inverse of `to_logical`; the renderer applies the same mapping
	/// through the context transform.
	pub fn to_screen(&self, logical: Point, canvas: Size) -> Point {
		Point::new(
			logical.x * self.zoom + canvas.width * (1.0 - self.zoom) / 2.0 + self.pan.x,
			logical.y * self.zoom + canvas.height * (1.0 - self.zoom) / 2.0 + self.pan.y,
		)
	}

	pub fn zoom_by(&mut self, delta: f64) {
		self.zoom = (self.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
	}

	pub fn pan_by(&mut self, delta: Vec2) {
		self.pan += delta;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const CANVAS: Size = Size {
		width: 800.0,
		height: 600.0,
	};

	#[test]
	fn identity_at_default_viewport() {
		let vp = Viewport::new(1.0);
		let p = Point::new(123.0, 456.0);
		assert_eq!(vp.to_logical(p, CANVAS), p);
	}

	#[test]
	fn round_trips_under_zoom_and_pan() {
		let mut vp = Viewport::new(2.0);
		vp.zoom = 1.7;
		vp.pan = Vec2::new(-340.5, 912.25);
		let p = Point::new(213.0, -87.5);
		let back = vp.to_logical(vp.to_screen(p, CANVAS), CANVAS);
		assert!((back.x - p.x).abs() < 1e-9);
		assert!((back.y - p.y).abs() < 1e-9);

		vp.zoom = 0.25;
		vp.pan = Vec2::new(1.0e5, -1.0e5);
		let back = vp.to_screen(vp.to_logical(p, CANVAS), CANVAS);
		assert!((back.x - p.x).abs() < 1e-6);
		assert!((back.y - p.y).abs() < 1e-6);
	}

	#[test]
	fn zoom_clamps_monotonically_at_max() {
		let mut vp = Viewport::new(1.0);
		for _ in 0..1000 {
			vp.zoom_by(0.1);
		}
		assert_eq!(vp.zoom, MAX_ZOOM);
		vp.zoom_by(0.1);
		assert_eq!(vp.zoom, MAX_ZOOM);
	}

	#[test]
	fn zoom_clamps_at_min() {
		let mut vp = Viewport::new(1.0);
		for _ in 0..1000 {
			vp.zoom_by(-0.05);
		}
		assert_eq!(vp.zoom, MIN_ZOOM);
	}

	#[test]
	fn pan_accumulates_unbounded() {
		let mut vp = Viewport::new(1.0);
		for _ in 0..100 {
			vp.pan_by(Vec2::new(1000.0, -1000.0));
		}
		assert_eq!(vp.pan, Vec2::new(100_000.0, -100_000.0));
	}
}
