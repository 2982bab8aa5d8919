//! The pointer state machine. Each handler takes the raw canvas point (CSS
//! pixels, pre-zoom), resolves it to logical space, mutates the editor
//! state, and returns whatever mutation commands the gesture produced. The
//! caller repaints after every handled event.

use log::debug;

use super::hierarchy::{self, edge_curve};
use super::state::{EDGE_GLYPH_RADIUS, EditorState, Interaction};
use super::types::{Command, Point, Rect, Vec2};

/// Resolve a pointer-down into one interactive mode, testing hot-zones in
/// priority order: edge glyph, settings, delete, connection handle,
/// shift-rubber-band, node body, empty canvas.
pub fn pointer_down(state: &mut EditorState, raw: Point, shift: bool) -> Vec<Command> {
	let p = state.viewport.to_logical(raw, state.canvas);

	// 1. Removal glyph on the hovered edge: one-shot, clears the manager.
	if let Some(child_id) = hovered_glyph_hit(state, p) {
		debug!("edge removed: {child_id}");
		state.set_manager_local(&child_id, None);
		return vec![Command::SetManager {
			employee_id: child_id,
			manager_id: None,
		}];
	}

	// 2–3. Per-node icon buttons: one-shot, no drag entered.
	if let Some(n) = state.nodes.iter().rev().find(|n| n.settings_rect().contains(p)) {
		return vec![Command::RequestEdit {
			employee_id: n.id.clone(),
		}];
	}
	if let Some(n) = state.nodes.iter().rev().find(|n| n.delete_rect().contains(p)) {
		return vec![Command::RequestDelete {
			employee_id: n.id.clone(),
		}];
	}

	// 4. Bottom-center connection handle.
	if let Some(n) = state.nodes.iter().rev().find(|n| n.handle_hit(p)) {
		state.interaction = Interaction::DrawingConnection {
			source: n.id.clone(),
			current: p,
		};
		return Vec::new();
	}

	// 5. Shift anywhere starts a rubber band.
	if shift {
		state.interaction = Interaction::RubberBand {
			start: p,
			current: p,
		};
		return Vec::new();
	}

	// 6. Node body: drag the whole selection if the node is part of it,
	// otherwise a lone unselected drag.
	if let Some(n) = state.node_at(p) {
		let id = n.id.clone();
		let position = n.position;
		if state.selection.contains(&id) {
			let starts = state
				.nodes
				.iter()
				.filter(|n| state.selection.contains(&n.id))
				.map(|n| (n.id.clone(), n.position))
				.collect();
			state.interaction = Interaction::DraggingSelection { anchor: p, starts };
		} else {
			state.selection.clear();
			state.interaction = Interaction::DraggingNode {
				id,
				grab: p - position,
			};
		}
		return Vec::new();
	}

	// 7. Empty canvas: plain click clears the selection and pans.
	state.selection.clear();
	state.interaction = Interaction::Panning { last: raw };
	Vec::new()
}

/// Drive the active mode. Only `Idle` maintains hover affordances; the
/// other modes apply their local, view-only effects.
pub fn pointer_move(state: &mut EditorState, raw: Point) {
	let p = state.viewport.to_logical(raw, state.canvas);
	let bounds = hierarchy::virtual_bounds(state.fullscreen);

	if state.interaction == Interaction::Idle {
		update_hover(state, p);
		return;
	}
	match &mut state.interaction {
		Interaction::Idle => {}
		Interaction::Panning { last } => {
			let delta = raw - *last;
			*last = raw;
			state.viewport.pan_by(delta);
		}
		Interaction::DraggingNode { id, grab } => {
			let (id, grab) = (id.clone(), *grab);
			if let Some(node) = state.nodes.get_mut(&id) {
				node.position = hierarchy::clamp_position(
					Point::new(p.x - grab.x, p.y - grab.y),
					bounds,
				);
			}
		}
		Interaction::DraggingSelection { anchor, starts } => {
			let delta: Vec2 = p - *anchor;
			let moves: Vec<(String, Point)> = starts
				.iter()
				.map(|(id, start)| (id.clone(), hierarchy::clamp_position(*start + delta, bounds)))
				.collect();
			for (id, pos) in moves {
				if let Some(node) = state.nodes.get_mut(&id) {
					node.position = pos;
				}
			}
		}
		Interaction::RubberBand { start, current } => {
			*current = p;
			let band = Rect::from_two_points(*start, p);
			let hits: Vec<String> = state
				.nodes
				.iter()
				.filter(|n| band.intersects(&n.rect()))
				.map(|n| n.id.clone())
				.collect();
			state.selection.set(hits);
		}
		Interaction::DrawingConnection { current, .. } => {
			// Preview only; nothing mutates until release.
			*current = p;
		}
	}
}

/// Resolve the active mode. A connection release either repoints the target
/// under the pointer (top-most non-source node wins) or, over empty canvas,
/// requests a new report at the drop position. Every other mode just keeps
/// its local effects and returns to `Idle`.
pub fn pointer_up(state: &mut EditorState, raw: Point) -> Vec<Command> {
	let p = state.viewport.to_logical(raw, state.canvas);
	let finished = std::mem::replace(&mut state.interaction, Interaction::Idle);

	if let Interaction::DrawingConnection { source, .. } = finished {
		if let Some(target) = state.drop_target_at(p, &source).map(|n| n.id.clone()) {
			debug!("edge drawn: {source} -> {target}");
			state.set_manager_local(&target, Some(source.clone()));
			return vec![Command::SetManager {
				employee_id: target,
				manager_id: Some(source),
			}];
		}
		debug!("connection dropped on empty canvas, requesting child of {source}");
		return vec![Command::CreateChild {
			manager_id: source,
			position: p,
		}];
	}
	Vec::new()
}

/// The pointer leaving the canvas (or capture being lost) is an implicit
/// cancel: resolve to `Idle` with no further side effects.
pub fn pointer_leave(state: &mut EditorState) {
	state.interaction = Interaction::Idle;
	state.hover = Default::default();
}

/// Wheel input zooms only with a ctrl/meta modifier held; a plain wheel is
/// ignored so page scrolling keeps working. Returns whether the viewport
/// changed.
pub fn wheel(state: &mut EditorState, delta_y: f64, modifier: bool) -> bool {
	if !modifier {
		return false;
	}
	state.viewport.zoom_by(-delta_y * 0.002);
	true
}

fn update_hover(state: &mut EditorState, p: Point) {
	let handle = state
		.nodes
		.iter()
		.rev()
		.find(|n| n.handle_hit(p))
		.map(|n| n.id.clone());
	let button = state
		.nodes
		.iter()
		.rev()
		.any(|n| n.settings_rect().contains(p) || n.delete_rect().contains(p));
	let node = state.node_at(p).map(|n| n.id.clone());
	let edge = if node.is_none() && handle.is_none() {
		state.edge_at(p).map(str::to_owned)
	} else {
		None
	};
	state.hover = super::state::Hover {
		node,
		edge,
		handle,
		button,
	};
}

/// The glyph is only live while its edge is hovered, so a stray click on an
/// unhovered midpoint falls through to the zones below.
fn hovered_glyph_hit(state: &EditorState, p: Point) -> Option<String> {
	let child_id = state.hover.edge.as_deref()?;
	let child = state.nodes.get(child_id)?;
	let manager = state.nodes.get(child.manager_id.as_deref()?)?;
	let glyph = edge_curve(child, manager).midpoint();
	(glyph.distance(p) <= EDGE_GLYPH_RADIUS).then(|| child_id.to_owned())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::org_chart::types::{Employee, Size};

	fn emp(id: &str, manager: Option<&str>) -> Employee {
		Employee {
			id: id.into(),
			name: format!("Employee {id}"),
			role: "Engineer".into(),
			division: "R&D".into(),
			manager_id: manager.map(str::to_owned),
		}
	}

	/// Default viewport (zoom 1, no pan) maps raw coordinates to logical
	/// coordinates unchanged, so tests can address nodes directly.
	fn state() -> EditorState {
		EditorState::new(
			&[emp("1", None), emp("2", Some("1")), emp("3", Some("1"))],
			Size::new(800.0, 600.0),
			1.0,
			false,
		)
	}

	fn center(state: &EditorState, id: &str) -> Point {
		state.nodes.get(id).unwrap().rect().center()
	}

	#[test]
	fn handle_drag_onto_node_repoints_manager_once() {
		// Drag from "2"'s handle into "3", release.
		let mut st = state();
		let handle = st.nodes.get("2").unwrap().bottom_anchor();
		let pan_before = st.viewport.pan;

		let down = pointer_down(&mut st, handle, false);
		assert!(down.is_empty());
		assert!(matches!(
			st.interaction,
			Interaction::DrawingConnection { ref source, .. } if source == "2"
		));

		let target = center(&st, "3");
		pointer_move(&mut st, target);
		let up = pointer_up(&mut st, target);
		assert_eq!(
			up,
			vec![Command::SetManager {
				employee_id: "3".into(),
				manager_id: Some("2".into()),
			}]
		);
		assert_eq!(st.interaction, Interaction::Idle);
		assert_eq!(st.viewport.pan, pan_before);
		assert!(st.selection.is_empty());
		// Optimistic local effect applied.
		assert_eq!(st.nodes.get("3").unwrap().manager_id.as_deref(), Some("2"));
	}

	#[test]
	fn connection_to_empty_canvas_requests_child() {
		let mut st = state();
		let handle = st.nodes.get("1").unwrap().bottom_anchor();
		pointer_down(&mut st, handle, false);
		let drop = Point::new(700.0, 500.0);
		pointer_move(&mut st, drop);
		let up = pointer_up(&mut st, drop);
		assert_eq!(
			up,
			vec![Command::CreateChild {
				manager_id: "1".into(),
				position: drop,
			}]
		);
		assert!(!up
			.iter()
			.any(|c| matches!(c, Command::SetManager { .. })));
	}

	#[test]
	fn connection_never_targets_its_source() {
		let mut st = state();
		let handle = st.nodes.get("1").unwrap().bottom_anchor();
		pointer_down(&mut st, handle, false);
		// Release just inside the source node's own bounds.
		let inside = center(&st, "1");
		let up = pointer_up(&mut st, inside);
		assert_eq!(
			up,
			vec![Command::CreateChild {
				manager_id: "1".into(),
				position: inside,
			}]
		);
	}

	#[test]
	fn rubber_band_selects_intersecting_not_contained() {
		// Nodes partially overlapping the band are included.
		let mut st = state();
		st.nodes.get_mut("1").unwrap().position = Point::new(150.0, 150.0); // inside
		st.nodes.get_mut("2").unwrap().position = Point::new(380.0, 280.0); // straddles edge
		st.nodes.get_mut("3").unwrap().position = Point::new(600.0, 500.0); // outside

		pointer_down(&mut st, Point::new(100.0, 100.0), true);
		pointer_move(&mut st, Point::new(400.0, 300.0));
		assert!(st.selection.contains("1"));
		assert!(st.selection.contains("2"));
		assert!(!st.selection.contains("3"));

		let up = pointer_up(&mut st, Point::new(400.0, 300.0));
		assert!(up.is_empty());
		// Selection survives the release.
		assert_eq!(st.selection.len(), 2);
	}

	#[test]
	fn dragging_clamps_to_virtual_canvas() {
		let mut st = state();
		let start = center(&st, "1");
		pointer_down(&mut st, start, false);
		pointer_move(&mut st, Point::new(1.0e7, 1.0e7));
		let bounds = hierarchy::virtual_bounds(false);
		let pos = st.nodes.get("1").unwrap().position;
		assert_eq!(pos.x, bounds.max.x - hierarchy::NODE_WIDTH);
		assert_eq!(pos.y, bounds.max.y - hierarchy::NODE_HEIGHT);
		pointer_up(&mut st, Point::new(1.0e7, 1.0e7));
		assert_eq!(st.interaction, Interaction::Idle);
	}

	#[test]
	fn drag_keeps_grab_offset() {
		let mut st = state();
		let origin = st.nodes.get("2").unwrap().position;
		let grab = Point::new(origin.x + 10.0, origin.y + 5.0);
		pointer_down(&mut st, grab, false);
		pointer_move(&mut st, Point::new(grab.x + 30.0, grab.y + 40.0));
		let pos = st.nodes.get("2").unwrap().position;
		assert_eq!(pos, Point::new(origin.x + 30.0, origin.y + 40.0));
	}

	#[test]
	fn dragging_selected_node_moves_whole_selection() {
		let mut st = state();
		st.selection.set(["2".to_string(), "3".to_string()]);
		let start2 = st.nodes.get("2").unwrap().position;
		let start3 = st.nodes.get("3").unwrap().position;

		let grab = center(&st, "2");
		pointer_down(&mut st, grab, false);
		assert!(matches!(st.interaction, Interaction::DraggingSelection { .. }));
		pointer_move(&mut st, Point::new(grab.x + 25.0, grab.y - 15.0));
		assert_eq!(
			st.nodes.get("2").unwrap().position,
			Point::new(start2.x + 25.0, start2.y - 15.0)
		);
		assert_eq!(
			st.nodes.get("3").unwrap().position,
			Point::new(start3.x + 25.0, start3.y - 15.0)
		);
	}

	#[test]
	fn clicking_unselected_node_clears_selection_first() {
		let mut st = state();
		st.selection.set(["3".to_string()]);
		let grab = center(&st, "2");
		pointer_down(&mut st, grab, false);
		assert!(st.selection.is_empty());
		assert!(matches!(
			st.interaction,
			Interaction::DraggingNode { ref id, .. } if id == "2"
		));
	}

	#[test]
	fn empty_canvas_clears_selection_and_pans() {
		let mut st = state();
		st.selection.set(["1".to_string()]);
		pointer_down(&mut st, Point::new(700.0, 550.0), false);
		assert!(st.selection.is_empty());
		pointer_move(&mut st, Point::new(710.0, 545.0));
		pointer_move(&mut st, Point::new(725.0, 540.0));
		assert_eq!(st.viewport.pan, Vec2::new(25.0, -10.0));
	}

	#[test]
	fn settings_and_delete_zones_are_one_shot() {
		let mut st = state();
		let n1 = st.nodes.get("1").unwrap();
		let settings = n1.settings_rect().center();
		let delete = n1.delete_rect().center();

		let edit = pointer_down(&mut st, settings, false);
		assert_eq!(
			edit,
			vec![Command::RequestEdit {
				employee_id: "1".into()
			}]
		);
		assert_eq!(st.interaction, Interaction::Idle);

		let del = pointer_down(&mut st, delete, false);
		assert_eq!(
			del,
			vec![Command::RequestDelete {
				employee_id: "1".into()
			}]
		);
		// Host owns confirmation; nothing changed locally.
		assert!(st.nodes.contains("1"));
		assert_eq!(st.interaction, Interaction::Idle);
	}

	#[test]
	fn glyph_click_on_hovered_edge_clears_manager() {
		let mut st = state();
		let child = st.nodes.get("2").unwrap();
		let manager = st.nodes.get("1").unwrap();
		let mid = edge_curve(child, manager).midpoint();

		// Hover it first, as a real pointer stream would.
		pointer_move(&mut st, mid);
		assert_eq!(st.hover.edge.as_deref(), Some("2"));
		let cmds = pointer_down(&mut st, mid, false);
		assert_eq!(
			cmds,
			vec![Command::SetManager {
				employee_id: "2".into(),
				manager_id: None,
			}]
		);
		assert_eq!(st.nodes.get("2").unwrap().manager_id, None);
		assert_eq!(st.interaction, Interaction::Idle);
	}

	#[test]
	fn glyph_click_without_hover_falls_through_to_pan() {
		let mut st = state();
		let child = st.nodes.get("2").unwrap();
		let manager = st.nodes.get("1").unwrap();
		let mid = edge_curve(child, manager).midpoint();
		// No prior hover: the midpoint is empty canvas as far as zones go.
		pointer_down(&mut st, mid, false);
		assert!(matches!(st.interaction, Interaction::Panning { .. }));
		assert_eq!(st.nodes.get("2").unwrap().manager_id.as_deref(), Some("1"));
	}

	#[test]
	fn leave_cancels_connection_without_commands() {
		let mut st = state();
		let handle = st.nodes.get("1").unwrap().bottom_anchor();
		pointer_down(&mut st, handle, false);
		pointer_move(&mut st, Point::new(400.0, 400.0));
		pointer_leave(&mut st);
		assert_eq!(st.interaction, Interaction::Idle);
		assert_eq!(st.nodes.get("2").unwrap().manager_id.as_deref(), Some("1"));
	}

	#[test]
	fn plain_wheel_is_ignored_modified_wheel_zooms() {
		let mut st = state();
		assert!(!wheel(&mut st, -120.0, false));
		assert_eq!(st.viewport.zoom, 1.0);
		assert!(wheel(&mut st, -120.0, true));
		assert!(st.viewport.zoom > 1.0);
	}

	#[test]
	fn hit_testing_respects_zoom_and_pan() {
		let mut st = state();
		st.viewport.zoom = 2.0;
		st.viewport.pan = Vec2::new(37.0, -12.0);
		let logical = center(&st, "2");
		let raw = st.viewport.to_screen(logical, st.canvas);
		pointer_down(&mut st, raw, false);
		assert!(matches!(
			st.interaction,
			Interaction::DraggingNode { ref id, .. } if id == "2"
		));
	}

	#[test]
	fn hover_affordances_update_while_idle() {
		let mut st = state();
		let body = center(&st, "1");
		pointer_move(&mut st, body);
		assert_eq!(st.hover.node.as_deref(), Some("1"));
		assert_eq!(st.cursor(), "grab");

		let handle = st.nodes.get("1").unwrap().bottom_anchor();
		pointer_move(&mut st, handle);
		assert_eq!(st.hover.handle.as_deref(), Some("1"));
		assert_eq!(st.cursor(), "crosshair");

		pointer_move(&mut st, Point::new(790.0, 590.0));
		assert!(st.hover.node.is_none());
		assert_eq!(st.cursor(), "default");
	}
}
