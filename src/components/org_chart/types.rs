//! Plain data types shared across the org chart editor.

use std::ops::{Add, AddAssign, Sub};

/// One employee record as supplied by the host application.
///
/// `manager_id` is a weak back-reference: it may point at a missing id or at
/// the employee itself, in which case the node is treated as a root.
#[derive(Clone, Debug, PartialEq)]
pub struct Employee {
	pub id: String,
	pub name: String,
	pub role: String,
	pub division: String,
	pub manager_id: Option<String>,
}

/// A point in logical canvas coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

/// A displacement between two points.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
	pub x: f64,
	pub y: f64,
}

/// Logical canvas dimensions.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
	pub width: f64,
	pub height: f64,
}

impl Point {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance(self, other: Point) -> f64 {
		let (dx, dy) = (self.x - other.x, self.y - other.y);
		(dx * dx + dy * dy).sqrt()
	}
}

impl Vec2 {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

impl Size {
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}
}

impl Sub for Point {
	type Output = Vec2;
	fn sub(self, rhs: Point) -> Vec2 {
		Vec2::new(self.x - rhs.x, self.y - rhs.y)
	}
}

impl Add<Vec2> for Point {
	type Output = Point;
	fn add(self, rhs: Vec2) -> Point {
		Point::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl Add for Vec2 {
	type Output = Vec2;
	fn add(self, rhs: Vec2) -> Vec2 {
		Vec2::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl AddAssign for Vec2 {
	fn add_assign(&mut self, rhs: Vec2) {
		self.x += rhs.x;
		self.y += rhs.y;
	}
}

/// Axis-aligned rectangle in logical coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
	pub min: Point,
	pub max: Point,
}

impl Rect {
	pub fn from_min_size(min: Point, size: Size) -> Self {
		Self {
			min,
			max: Point::new(min.x + size.width, min.y + size.height),
		}
	}

	/// Normalizing constructor: the corners may be given in any order.
	pub fn from_two_points(a: Point, b: Point) -> Self {
		Self {
			min: Point::new(a.x.min(b.x), a.y.min(b.y)),
			max: Point::new(a.x.max(b.x), a.y.max(b.y)),
		}
	}

	pub fn width(&self) -> f64 {
		self.max.x - self.min.x
	}

	pub fn height(&self) -> f64 {
		self.max.y - self.min.y
	}

	pub fn center(&self) -> Point {
		Point::new(
			(self.min.x + self.max.x) / 2.0,
			(self.min.y + self.max.y) / 2.0,
		)
	}

	pub fn contains(&self, p: Point) -> bool {
		p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
	}

	/// Overlap test used by rubber-band selection: true if the rectangles
	/// share any area, partial overlap included.
	pub fn intersects(&self, other: &Rect) -> bool {
		self.min.x <= other.max.x
			&& other.min.x <= self.max.x
			&& self.min.y <= other.max.y
			&& other.min.y <= self.max.y
	}
}

/// A cubic Bezier segment, used for reporting edges and their hover test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
	pub from: Point,
	pub ctrl1: Point,
	pub ctrl2: Point,
	pub to: Point,
}

impl CubicBezier {
	pub fn point_at(&self, t: f64) -> Point {
		let u = 1.0 - t;
		let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
		Point::new(
			a * self.from.x + b * self.ctrl1.x + c * self.ctrl2.x + d * self.to.x,
			a * self.from.y + b * self.ctrl1.y + c * self.ctrl2.y + d * self.to.y,
		)
	}

	pub fn midpoint(&self) -> Point {
		self.point_at(0.5)
	}

	/// Approximate distance from `p` to the curve by sampling.
	pub fn distance_to(&self, p: Point, samples: u32) -> f64 {
		let mut best = f64::INFINITY;
		for i in 0..=samples {
			let t = i as f64 / samples as f64;
			best = best.min(self.point_at(t).distance(p));
		}
		best
	}
}

/// Mutation commands emitted toward the host application. The editor applies
/// the optimistic local effect itself; the host owns persistence.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
	/// Set or clear an employee's manager (drag-drawn or removed edge).
	SetManager {
		employee_id: String,
		manager_id: Option<String>,
	},
	/// A connection was dropped on empty canvas: ask the host to create a
	/// new report under `manager_id` at the drop position.
	CreateChild { manager_id: String, position: Point },
	/// Per-node settings button.
	RequestEdit { employee_id: String },
	/// Per-node delete button; the host confirms before mutating.
	RequestDelete { employee_id: String },
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rect_intersects_needs_overlap_not_containment() {
		let band = Rect::from_two_points(Point::new(100.0, 100.0), Point::new(400.0, 300.0));
		let partially_in = Rect::from_min_size(Point::new(380.0, 280.0), Size::new(120.0, 60.0));
		let fully_out = Rect::from_min_size(Point::new(500.0, 400.0), Size::new(120.0, 60.0));
		assert!(band.intersects(&partially_in));
		assert!(partially_in.intersects(&band));
		assert!(!band.intersects(&fully_out));
	}

	#[test]
	fn rect_from_two_points_normalizes() {
		let r = Rect::from_two_points(Point::new(10.0, 20.0), Point::new(-5.0, 2.0));
		assert_eq!(r.min, Point::new(-5.0, 2.0));
		assert_eq!(r.max, Point::new(10.0, 20.0));
	}

	#[test]
	fn bezier_endpoints_and_midpoint() {
		let b = CubicBezier {
			from: Point::new(0.0, 0.0),
			ctrl1: Point::new(0.0, 10.0),
			ctrl2: Point::new(10.0, 10.0),
			to: Point::new(10.0, 20.0),
		};
		assert_eq!(b.point_at(0.0), b.from);
		assert_eq!(b.point_at(1.0), b.to);
		assert!(b.distance_to(b.midpoint(), 16) < 1.0);
	}
}
