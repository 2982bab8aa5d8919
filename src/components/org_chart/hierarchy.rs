//! Tree layout: turns the host's flat employee list into a positioned,
//! levelled node map. Runs only when the employee list or canvas geometry
//! changes, never during a drag.

use std::collections::{HashMap, HashSet, VecDeque};

use super::types::{CubicBezier, Employee, Point, Rect, Size};

pub const NODE_WIDTH: f64 = 140.0;
pub const NODE_HEIGHT: f64 = 72.0;
/// Center-to-center horizontal spacing within one level.
pub const H_SPACING: f64 = 170.0;
pub const V_SPACING: f64 = 130.0;
pub const TOP_OFFSET: f64 = 60.0;
pub const TOP_OFFSET_FULLSCREEN: f64 = 110.0;

pub const HANDLE_RADIUS: f64 = 6.0;
pub const HANDLE_HIT_RADIUS: f64 = 10.0;
pub const BUTTON_SIZE: f64 = 16.0;
const BUTTON_INSET: f64 = 4.0;

/// Oversized logical drawing surface; node positions are clamped to it so a
/// node can never be dragged irretrievably far from the viewport.
pub fn virtual_bounds(fullscreen: bool) -> Rect {
	if fullscreen {
		Rect {
			min: Point::new(-3200.0, -800.0),
			max: Point::new(8000.0, 5600.0),
		}
	} else {
		Rect {
			min: Point::new(-1600.0, -400.0),
			max: Point::new(4000.0, 2800.0),
		}
	}
}

/// Clamp a node's top-left corner so its full card stays inside `bounds`.
pub fn clamp_position(p: Point, bounds: Rect) -> Point {
	Point::new(
		p.x.clamp(bounds.min.x, bounds.max.x - NODE_WIDTH),
		p.y.clamp(bounds.min.y, bounds.max.y - NODE_HEIGHT),
	)
}

/// One employee's visual node. Derived wholesale from the employee list;
/// only `position` and `manager_id` mutate between rebuilds.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: String,
	pub name: String,
	pub role: String,
	pub division: String,
	pub manager_id: Option<String>,
	/// Top-left corner, logical units.
	pub position: Point,
	pub child_ids: Vec<String>,
	/// Distance from the nearest root.
	pub level: u32,
}

impl GraphNode {
	pub fn rect(&self) -> Rect {
		Rect::from_min_size(self.position, Size::new(NODE_WIDTH, NODE_HEIGHT))
	}

	/// Where incoming edges (from the manager) attach.
	pub fn top_anchor(&self) -> Point {
		Point::new(self.position.x + NODE_WIDTH / 2.0, self.position.y)
	}

	/// Where outgoing edges leave, and where the connection handle sits.
	pub fn bottom_anchor(&self) -> Point {
		Point::new(
			self.position.x + NODE_WIDTH / 2.0,
			self.position.y + NODE_HEIGHT,
		)
	}

	/// Settings hot-zone near the top-right corner. Fixed logical size,
	/// deliberately not rescaled by zoom.
	pub fn settings_rect(&self) -> Rect {
		Rect::from_min_size(
			Point::new(
				self.position.x + NODE_WIDTH - BUTTON_SIZE - BUTTON_INSET,
				self.position.y + BUTTON_INSET,
			),
			Size::new(BUTTON_SIZE, BUTTON_SIZE),
		)
	}

	/// Delete hot-zone, immediately left of the settings button.
	pub fn delete_rect(&self) -> Rect {
		Rect::from_min_size(
			Point::new(
				self.position.x + NODE_WIDTH - 2.0 * BUTTON_SIZE - 2.0 * BUTTON_INSET,
				self.position.y + BUTTON_INSET,
			),
			Size::new(BUTTON_SIZE, BUTTON_SIZE),
		)
	}

	pub fn handle_hit(&self, p: Point) -> bool {
		self.bottom_anchor().distance(p) <= HANDLE_HIT_RADIUS
	}
}

/// The curve drawn for a child → manager reporting edge.
pub fn edge_curve(child: &GraphNode, manager: &GraphNode) -> CubicBezier {
	let from = child.top_anchor();
	let to = manager.bottom_anchor();
	let bend = ((from.y - to.y).abs() / 2.0).max(24.0);
	CubicBezier {
		from,
		ctrl1: Point::new(from.x, from.y - bend),
		ctrl2: Point::new(to.x, to.y + bend),
		to,
	}
}

/// Node storage preserving insertion order. Order doubles as z-order: later
/// entries draw on top, and hit tests walk it in reverse so the top-most
/// node wins.
#[derive(Clone, Debug, Default)]
pub struct NodeMap {
	order: Vec<String>,
	nodes: HashMap<String, GraphNode>,
}

impl NodeMap {
	pub fn insert(&mut self, node: GraphNode) {
		if !self.nodes.contains_key(&node.id) {
			self.order.push(node.id.clone());
		}
		self.nodes.insert(node.id.clone(), node);
	}

	pub fn get(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.get(id)
	}

	pub fn get_mut(&mut self, id: &str) -> Option<&mut GraphNode> {
		self.nodes.get_mut(id)
	}

	pub fn contains(&self, id: &str) -> bool {
		self.nodes.contains_key(id)
	}

	pub fn len(&self) -> usize {
		self.order.len()
	}

	/// Nodes in z-order, bottom-most first.
	pub fn iter(&self) -> impl DoubleEndedIterator<Item = &GraphNode> {
		self.order.iter().filter_map(|id| self.nodes.get(id))
	}

	pub fn ids(&self) -> impl DoubleEndedIterator<Item = &str> {
		self.order.iter().map(String::as_str)
	}
}

/// Build the positioned node map.
///
/// A dangling, missing, or self-referencing `manager_id` makes the employee
/// a root. Level assignment is an iterative root-first walk with an explicit
/// queue and visited set, so a manager cycle can never recurse unboundedly:
/// cycle members unreachable from any root are each re-seeded as roots.
pub fn build(employees: &[Employee], canvas: Size, fullscreen: bool) -> NodeMap {
	let mut map = NodeMap::default();
	let ids: HashSet<&str> = employees.iter().map(|e| e.id.as_str()).collect();

	for e in employees {
		let manager_id = e
			.manager_id
			.as_ref()
			.filter(|m| *m != &e.id && ids.contains(m.as_str()))
			.cloned();
		map.insert(GraphNode {
			id: e.id.clone(),
			name: e.name.clone(),
			role: e.role.clone(),
			division: e.division.clone(),
			manager_id,
			position: Point::default(),
			child_ids: Vec::new(),
			level: 0,
		});
	}

	let order: Vec<String> = map.ids().map(str::to_owned).collect();
	for id in &order {
		let manager = map.get(id).and_then(|n| n.manager_id.clone());
		if let Some(m) = manager {
			if let Some(parent) = map.get_mut(&m) {
				parent.child_ids.push(id.clone());
			}
		}
	}

	// Root-first level walk.
	let mut visited: HashSet<String> = HashSet::new();
	let mut queue: VecDeque<(String, u32)> = VecDeque::new();
	for id in &order {
		if map.get(id).is_some_and(|n| n.manager_id.is_none()) {
			visited.insert(id.clone());
			queue.push_back((id.clone(), 0));
		}
	}
	loop {
		while let Some((id, level)) = queue.pop_front() {
			let children = {
				let node = match map.get_mut(&id) {
					Some(n) => n,
					None => continue,
				};
				node.level = level;
				node.child_ids.clone()
			};
			for child in children {
				if visited.insert(child.clone()) {
					queue.push_back((child, level + 1));
				}
			}
		}
		// Anything still unvisited sits on a manager cycle with no root;
		// treat the first such node as a root and keep walking.
		match order.iter().find(|id| !visited.contains(*id)) {
			Some(id) => {
				visited.insert(id.clone());
				queue.push_back((id.clone(), 0));
			}
			None => break,
		}
	}

	position_levels(&mut map, &order, canvas, fullscreen);
	map
}

/// Group ids by level, then lay each level out left-to-right at fixed
/// spacing, centered on the canvas width.
fn position_levels(map: &mut NodeMap, order: &[String], canvas: Size, fullscreen: bool) {
	let mut by_level: Vec<Vec<&String>> = Vec::new();
	for id in order {
		if let Some(node) = map.get(id) {
			let level = node.level as usize;
			if by_level.len() <= level {
				by_level.resize_with(level + 1, Vec::new);
			}
			by_level[level].push(id);
		}
	}

	let top = if fullscreen {
		TOP_OFFSET_FULLSCREEN
	} else {
		TOP_OFFSET
	};
	let bounds = virtual_bounds(fullscreen);
	let mut positioned: Vec<(String, Point)> = Vec::new();
	for (level, ids) in by_level.iter().enumerate() {
		let span = (ids.len().saturating_sub(1)) as f64 * H_SPACING;
		let first_center = canvas.width / 2.0 - span / 2.0;
		for (i, id) in ids.iter().enumerate() {
			let p = Point::new(
				first_center + i as f64 * H_SPACING - NODE_WIDTH / 2.0,
				top + level as f64 * V_SPACING,
			);
			positioned.push(((*id).clone(), clamp_position(p, bounds)));
		}
	}
	for (id, p) in positioned {
		if let Some(node) = map.get_mut(&id) {
			node.position = p;
		}
	}
}
