//! The editor's owned state: node map, viewport, selection, hover, and the
//! active interaction mode. All pointer handling threads through this one
//! struct; nothing here touches the DOM.

use log::debug;

use super::hierarchy::{self, GraphNode, NodeMap};
use super::selection::Selection;
use super::types::{Employee, Point, Size, Vec2};
use super::viewport::Viewport;

/// Distance within which a pointer counts as hovering an edge curve.
pub const EDGE_HOVER_DISTANCE: f64 = 8.0;
/// Radius of the "×" removal glyph shown at a hovered edge's midpoint.
pub const EDGE_GLYPH_RADIUS: f64 = 8.0;
const EDGE_HOVER_SAMPLES: u32 = 24;

/// Active pointer mode. Exactly one mode at a time; every pointer-up or
/// pointer-leave returns to `Idle`, so the machine can never stick.
#[derive(Clone, Debug, PartialEq)]
pub enum Interaction {
	Idle,
	/// Raw-coordinate anchor of the last move; pan deltas are incremental.
	Panning { last: Point },
	DraggingNode { id: String, grab: Vec2 },
	/// Captured start position per selected node; all move by the same
	/// delta from `anchor`, each clamped independently.
	DraggingSelection {
		anchor: Point,
		starts: Vec<(String, Point)>,
	},
	RubberBand { start: Point, current: Point },
	DrawingConnection { source: String, current: Point },
}

/// Hover affordances, only maintained while `Idle`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hover {
	pub node: Option<String>,
	/// Hovered edge, identified by the child node's id.
	pub edge: Option<String>,
	pub handle: Option<String>,
	pub button: bool,
}

pub struct EditorState {
	pub nodes: NodeMap,
	pub viewport: Viewport,
	pub selection: Selection,
	pub interaction: Interaction,
	pub hover: Hover,
	/// Canvas logical size (CSS pixels, before DPR scaling).
	pub canvas: Size,
	pub fullscreen: bool,
}

impl EditorState {
	pub fn new(employees: &[Employee], canvas: Size, dpr: f64, fullscreen: bool) -> Self {
		let nodes = hierarchy::build(employees, canvas, fullscreen);
		debug!("built hierarchy: {} nodes", nodes.len());
		Self {
			nodes,
			viewport: Viewport::new(dpr),
			selection: Selection::default(),
			interaction: Interaction::Idle,
			hover: Hover::default(),
			canvas,
			fullscreen,
		}
	}

	/// Full layout rebuild; runs on any employee-list change (including
	/// external `manager_id` writes) and on fullscreen toggles. Selection
	/// drops ids that no longer exist; view-only drag offsets are discarded
	/// by design.
	pub fn rebuild(&mut self, employees: &[Employee]) {
		self.nodes = hierarchy::build(employees, self.canvas, self.fullscreen);
		if !self.selection.is_empty() {
			let kept: Vec<String> = self
				.selection
				.iter()
				.filter(|id| self.nodes.contains(id))
				.map(str::to_owned)
				.collect();
			self.selection.set(kept);
		}
		self.interaction = Interaction::Idle;
		self.hover = Hover::default();
		debug!(
			"rebuilt hierarchy: {} nodes, {} selected",
			self.nodes.len(),
			self.selection.len()
		);
	}

	pub fn resize(&mut self, canvas: Size) {
		self.canvas = canvas;
	}

	/// Top-most node whose bounds contain `p` (z-order: last inserted wins).
	pub fn node_at(&self, p: Point) -> Option<&GraphNode> {
		self.nodes.iter().rev().find(|n| n.rect().contains(p))
	}

	/// Top-most node containing `p`, excluding `exclude`; used to resolve a
	/// connection drop deterministically when nodes overlap.
	pub fn drop_target_at(&self, p: Point, exclude: &str) -> Option<&GraphNode> {
		self.nodes
			.iter()
			.rev()
			.find(|n| n.id != exclude && n.rect().contains(p))
	}

	/// Hovered edge at `p`, identified by child id. Nodes draw above edges,
	/// so any node hit wins over an edge hit.
	pub fn edge_at(&self, p: Point) -> Option<&str> {
		if self.node_at(p).is_some() {
			return None;
		}
		for child in self.nodes.iter().rev() {
			let Some(manager) = child
				.manager_id
				.as_deref()
				.and_then(|id| self.nodes.get(id))
			else {
				continue;
			};
			let curve = hierarchy::edge_curve(child, manager);
			if curve.distance_to(p, EDGE_HOVER_SAMPLES) <= EDGE_HOVER_DISTANCE {
				return Some(&child.id);
			}
		}
		None
	}

	/// Apply a drag-drawn edge locally: repoint the child and fix both
	/// managers' child lists. The matching command is emitted separately.
	pub fn set_manager_local(&mut self, child_id: &str, manager_id: Option<String>) {
		let old = match self.nodes.get_mut(child_id) {
			Some(node) => std::mem::replace(&mut node.manager_id, manager_id.clone()),
			None => return,
		};
		if let Some(prev) = old.and_then(|id| self.nodes.get_mut(&id)) {
			prev.child_ids.retain(|c| c != child_id);
		}
		if let Some(next) = manager_id.and_then(|id| self.nodes.get_mut(&id)) {
			if !next.child_ids.iter().any(|c| c == child_id) {
				next.child_ids.push(child_id.to_owned());
			}
		}
	}

	/// CSS cursor for the current interaction/hover.
	pub fn cursor(&self) -> &'static str {
		match &self.interaction {
			Interaction::Panning { .. } => "grabbing",
			Interaction::DraggingNode { .. } | Interaction::DraggingSelection { .. } => "move",
			Interaction::DrawingConnection { .. } => "crosshair",
			Interaction::RubberBand { .. } => "default",
			Interaction::Idle => {
				if self.hover.button || self.hover.edge.is_some() {
					"pointer"
				} else if self.hover.handle.is_some() {
					"crosshair"
				} else if self.hover.node.is_some() {
					"grab"
				} else {
					"default"
				}
			}
		}
	}
}
