//! Pure draw pass: (node map, selection, interaction, hover, viewport) →
//! draw calls. Geometry lives here; the concrete backend sits behind
//! [`Surface`] so the canvas 2D context is swappable (and testable).

use web_sys::CanvasRenderingContext2d;

use super::hierarchy::{self, HANDLE_RADIUS};
use super::state::{EDGE_GLYPH_RADIUS, EditorState, Interaction};
use super::types::{CubicBezier, Point, Rect, Size};
use super::viewport::Viewport;

/// Glyph shown at a hovered edge's midpoint; clicking it removes the edge.
pub const EDGE_GLYPH_CROSS: &str = "×";

/// Color set; selected by the host's dark-mode flag, no behavioral effect.
pub struct Palette {
	pub background: &'static str,
	pub card: &'static str,
	pub card_border: &'static str,
	pub card_border_selected: &'static str,
	pub shadow: &'static str,
	pub shadow_selected: &'static str,
	pub name_text: &'static str,
	pub sub_text: &'static str,
	pub edge: &'static str,
	pub edge_hover: &'static str,
	pub handle: &'static str,
	pub handle_ring: &'static str,
	pub danger: &'static str,
	pub icon: &'static str,
	pub band_fill: &'static str,
	pub band_stroke: &'static str,
	pub preview: &'static str,
}

const LIGHT: Palette = Palette {
	background: "#f5f6f8",
	card: "#ffffff",
	card_border: "#d5d9e0",
	card_border_selected: "#3b82f6",
	shadow: "rgba(15, 23, 42, 0.12)",
	shadow_selected: "rgba(59, 130, 246, 0.45)",
	name_text: "#1e293b",
	sub_text: "#64748b",
	edge: "#94a3b8",
	edge_hover: "#3b82f6",
	handle: "#3b82f6",
	handle_ring: "#ffffff",
	danger: "#ef4444",
	icon: "#64748b",
	band_fill: "rgba(59, 130, 246, 0.12)",
	band_stroke: "rgba(59, 130, 246, 0.6)",
	preview: "#3b82f6",
};

const DARK: Palette = Palette {
	background: "#16181d",
	card: "#242830",
	card_border: "#3a4150",
	card_border_selected: "#60a5fa",
	shadow: "rgba(0, 0, 0, 0.5)",
	shadow_selected: "rgba(96, 165, 250, 0.5)",
	name_text: "#e2e8f0",
	sub_text: "#94a3b8",
	edge: "#475569",
	edge_hover: "#60a5fa",
	handle: "#60a5fa",
	handle_ring: "#16181d",
	danger: "#f87171",
	icon: "#94a3b8",
	band_fill: "rgba(96, 165, 250, 0.15)",
	band_stroke: "rgba(96, 165, 250, 0.6)",
	preview: "#60a5fa",
};

pub fn palette(dark: bool) -> &'static Palette {
	if dark { &DARK } else { &LIGHT }
}

/// Drawing backend. One transform is pushed per frame (DPR, then zoom+pan)
/// so every draw call below uses pure logical coordinates.
pub trait Surface {
	fn begin_frame(&mut self, canvas: Size, viewport: &Viewport, background: &str);
	fn end_frame(&mut self);
	fn line(&mut self, from: Point, to: Point, color: &str, width: f64, dash: Option<(f64, f64)>);
	fn cubic(&mut self, curve: &CubicBezier, color: &str, width: f64);
	fn circle(&mut self, center: Point, radius: f64, fill: &str, stroke: Option<(&str, f64)>);
	fn rect(&mut self, rect: Rect, fill: &str, stroke: Option<(&str, f64)>);
	fn rounded_rect(
		&mut self,
		rect: Rect,
		radius: f64,
		fill: &str,
		stroke: (&str, f64),
		shadow: (&str, f64),
	);
	/// Left-aligned label text.
	fn text(&mut self, text: &str, at: Point, color: &str, size: f64, bold: bool);
	/// A single centered glyph (icon buttons, removal cross).
	fn glyph(&mut self, glyph: &str, center: Point, color: &str, size: f64);
}

/// Draw the whole scene. Order matters: edges under everything, then the
/// transient overlays, then nodes on top (which is also the hit-test
/// z-order).
pub fn render(state: &EditorState, palette: &Palette, surface: &mut impl Surface) {
	surface.begin_frame(state.canvas, &state.viewport, palette.background);
	draw_edges(state, palette, surface);
	draw_overlays(state, palette, surface);
	draw_nodes(state, palette, surface);
	surface.end_frame();
}

fn draw_edges(state: &EditorState, palette: &Palette, surface: &mut impl Surface) {
	for child in state.nodes.iter() {
		let Some(manager) = child
			.manager_id
			.as_deref()
			.and_then(|id| state.nodes.get(id))
		else {
			continue;
		};
		let hovered = state.hover.edge.as_deref() == Some(child.id.as_str());
		let curve = hierarchy::edge_curve(child, manager);
		let (color, width) = if hovered {
			(palette.edge_hover, 2.5)
		} else {
			(palette.edge, 1.5)
		};
		surface.cubic(&curve, color, width);

		if hovered {
			let mid = curve.midpoint();
			surface.circle(mid, EDGE_GLYPH_RADIUS, palette.danger, None);
			surface.glyph(EDGE_GLYPH_CROSS, mid, palette.handle_ring, 11.0);
		}
	}
}

fn draw_overlays(state: &EditorState, palette: &Palette, surface: &mut impl Surface) {
	match &state.interaction {
		Interaction::DrawingConnection { source, current } => {
			if let Some(node) = state.nodes.get(source) {
				surface.line(
					node.bottom_anchor(),
					*current,
					palette.preview,
					1.5,
					Some((6.0, 4.0)),
				);
			}
		}
		Interaction::RubberBand { start, current } => {
			surface.rect(
				Rect::from_two_points(*start, *current),
				palette.band_fill,
				Some((palette.band_stroke, 1.0)),
			);
		}
		_ => {}
	}
}

fn draw_nodes(state: &EditorState, palette: &Palette, surface: &mut impl Surface) {
	for node in state.nodes.iter() {
		let selected = state.selection.contains(&node.id);
		let rect = node.rect();
		let (border, shadow) = if selected {
			(
				(palette.card_border_selected, 2.0),
				(palette.shadow_selected, 16.0),
			)
		} else {
			((palette.card_border, 1.0), (palette.shadow, 8.0))
		};
		surface.rounded_rect(rect, 8.0, palette.card, border, shadow);

		let left = rect.min.x + 10.0;
		surface.text(
			&truncate(&node.name, 18),
			Point::new(left, rect.min.y + 24.0),
			palette.name_text,
			12.0,
			true,
		);
		surface.text(
			&truncate(&node.role, 22),
			Point::new(left, rect.min.y + 42.0),
			palette.sub_text,
			10.0,
			false,
		);
		surface.text(
			&truncate(&node.division, 22),
			Point::new(left, rect.min.y + 56.0),
			palette.sub_text,
			10.0,
			false,
		);

		surface.glyph("⚙", node.settings_rect().center(), palette.icon, 11.0);
		surface.glyph("×", node.delete_rect().center(), palette.danger, 13.0);

		let hovered_handle = state.hover.handle.as_deref() == Some(node.id.as_str());
		let radius = if hovered_handle {
			HANDLE_RADIUS + 2.0
		} else {
			HANDLE_RADIUS
		};
		surface.circle(
			node.bottom_anchor(),
			radius,
			palette.handle,
			Some((palette.handle_ring, 1.5)),
		);
	}
}

fn truncate(text: &str, max_chars: usize) -> String {
	if text.chars().count() <= max_chars {
		return text.to_owned();
	}
	let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
	format!("{cut}…")
}

/// [`Surface`] over the browser's 2D canvas context. The backing buffer is
/// sized logical × DPR by the component; the frame transform scales once
/// for DPR and once more for zoom+pan.
pub struct Canvas2dSurface<'a> {
	ctx: &'a CanvasRenderingContext2d,
}

impl<'a> Canvas2dSurface<'a> {
	pub fn new(ctx: &'a CanvasRenderingContext2d) -> Self {
		Self { ctx }
	}

	fn set_dash(&self, dash: Option<(f64, f64)>) {
		let segments = match dash {
			Some((on, off)) => js_sys::Array::of2(&on.into(), &off.into()),
			None => js_sys::Array::new(),
		};
		let _ = self.ctx.set_line_dash(&segments);
	}
}

impl Surface for Canvas2dSurface<'_> {
	fn begin_frame(&mut self, canvas: Size, viewport: &Viewport, background: &str) {
		self.ctx.save();
		let _ = self.ctx.scale(viewport.dpr, viewport.dpr);
		self.ctx.set_fill_style_str(background);
		self.ctx.fill_rect(0.0, 0.0, canvas.width, canvas.height);
		// Same mapping as `Viewport::to_logical`, inverted: logical draw
		// calls land where hit testing expects them.
		let origin = viewport.to_screen(Point::default(), canvas);
		let _ = self.ctx.translate(origin.x, origin.y);
		let _ = self.ctx.scale(viewport.zoom, viewport.zoom);
	}

	fn end_frame(&mut self) {
		self.ctx.restore();
	}

	fn line(&mut self, from: Point, to: Point, color: &str, width: f64, dash: Option<(f64, f64)>) {
		self.set_dash(dash);
		self.ctx.set_stroke_style_str(color);
		self.ctx.set_line_width(width);
		self.ctx.begin_path();
		self.ctx.move_to(from.x, from.y);
		self.ctx.line_to(to.x, to.y);
		self.ctx.stroke();
		self.set_dash(None);
	}

	fn cubic(&mut self, curve: &CubicBezier, color: &str, width: f64) {
		self.ctx.set_stroke_style_str(color);
		self.ctx.set_line_width(width);
		self.ctx.begin_path();
		self.ctx.move_to(curve.from.x, curve.from.y);
		self.ctx.bezier_curve_to(
			curve.ctrl1.x,
			curve.ctrl1.y,
			curve.ctrl2.x,
			curve.ctrl2.y,
			curve.to.x,
			curve.to.y,
		);
		self.ctx.stroke();
	}

	fn circle(&mut self, center: Point, radius: f64, fill: &str, stroke: Option<(&str, f64)>) {
		self.ctx.begin_path();
		let _ = self
			.ctx
			.arc(center.x, center.y, radius, 0.0, std::f64::consts::TAU);
		self.ctx.set_fill_style_str(fill);
		self.ctx.fill();
		if let Some((color, width)) = stroke {
			self.ctx.set_stroke_style_str(color);
			self.ctx.set_line_width(width);
			self.ctx.stroke();
		}
	}

	fn rect(&mut self, rect: Rect, fill: &str, stroke: Option<(&str, f64)>) {
		self.ctx.set_fill_style_str(fill);
		self.ctx
			.fill_rect(rect.min.x, rect.min.y, rect.width(), rect.height());
		if let Some((color, width)) = stroke {
			self.ctx.set_stroke_style_str(color);
			self.ctx.set_line_width(width);
			self.ctx
				.stroke_rect(rect.min.x, rect.min.y, rect.width(), rect.height());
		}
	}

	fn rounded_rect(
		&mut self,
		rect: Rect,
		radius: f64,
		fill: &str,
		stroke: (&str, f64),
		shadow: (&str, f64),
	) {
		let (x, y, w, h) = (rect.min.x, rect.min.y, rect.width(), rect.height());
		self.ctx.begin_path();
		self.ctx.move_to(x + radius, y);
		self.ctx.arc_to(x + w, y, x + w, y + h, radius).ok();
		self.ctx.arc_to(x + w, y + h, x, y + h, radius).ok();
		self.ctx.arc_to(x, y + h, x, y, radius).ok();
		self.ctx.arc_to(x, y, x + w, y, radius).ok();
		self.ctx.close_path();

		self.ctx.set_shadow_color(shadow.0);
		self.ctx.set_shadow_blur(shadow.1);
		self.ctx.set_shadow_offset_y(2.0);
		self.ctx.set_fill_style_str(fill);
		self.ctx.fill();
		self.ctx.set_shadow_color("transparent");
		self.ctx.set_shadow_blur(0.0);
		self.ctx.set_shadow_offset_y(0.0);

		self.ctx.set_stroke_style_str(stroke.0);
		self.ctx.set_line_width(stroke.1);
		self.ctx.stroke();
	}

	fn text(&mut self, text: &str, at: Point, color: &str, size: f64, bold: bool) {
		let weight = if bold { "600 " } else { "" };
		self.ctx.set_font(&format!("{weight}{size}px sans-serif"));
		self.ctx.set_text_align("left");
		self.ctx.set_text_baseline("alphabetic");
		self.ctx.set_fill_style_str(color);
		let _ = self.ctx.fill_text(text, at.x, at.y);
	}

	fn glyph(&mut self, glyph: &str, center: Point, color: &str, size: f64) {
		self.ctx.set_font(&format!("{size}px sans-serif"));
		self.ctx.set_text_align("center");
		self.ctx.set_text_baseline("middle");
		self.ctx.set_fill_style_str(color);
		let _ = self.ctx.fill_text(glyph, center.x, center.y);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::org_chart::state::EditorState;
	use crate::components::org_chart::types::Employee;

	/// Records draw calls so geometry and ordering are checkable natively.
	#[derive(Default)]
	struct RecordingSurface {
		ops: Vec<Op>,
	}

	#[derive(Debug, PartialEq)]
	enum Op {
		Begin,
		End,
		Line { dashed: bool },
		Cubic { color: String },
		Circle { color: String },
		Rect { fill: String },
		RoundedRect { shadow: String },
		Text(String),
		Glyph(String),
	}

	impl Surface for RecordingSurface {
		fn begin_frame(&mut self, _: Size, _: &Viewport, _: &str) {
			self.ops.push(Op::Begin);
		}
		fn end_frame(&mut self) {
			self.ops.push(Op::End);
		}
		fn line(&mut self, _: Point, _: Point, _: &str, _: f64, dash: Option<(f64, f64)>) {
			self.ops.push(Op::Line {
				dashed: dash.is_some(),
			});
		}
		fn cubic(&mut self, _: &CubicBezier, color: &str, _: f64) {
			self.ops.push(Op::Cubic {
				color: color.into(),
			});
		}
		fn circle(&mut self, _: Point, _: f64, fill: &str, _: Option<(&str, f64)>) {
			self.ops.push(Op::Circle { color: fill.into() });
		}
		fn rect(&mut self, _: Rect, fill: &str, _: Option<(&str, f64)>) {
			self.ops.push(Op::Rect { fill: fill.into() });
		}
		fn rounded_rect(&mut self, _: Rect, _: f64, _: &str, _: (&str, f64), shadow: (&str, f64)) {
			self.ops.push(Op::RoundedRect {
				shadow: shadow.0.into(),
			});
		}
		fn text(&mut self, text: &str, _: Point, _: &str, _: f64, _: bool) {
			self.ops.push(Op::Text(text.into()));
		}
		fn glyph(&mut self, glyph: &str, _: Point, _: &str, _: f64) {
			self.ops.push(Op::Glyph(glyph.into()));
		}
	}

	fn emp(id: &str, manager: Option<&str>) -> Employee {
		Employee {
			id: id.into(),
			name: format!("Employee {id}"),
			role: "Engineer".into(),
			division: "R&D".into(),
			manager_id: manager.map(str::to_owned),
		}
	}

	fn state() -> EditorState {
		EditorState::new(
			&[emp("1", None), emp("2", Some("1"))],
			Size::new(800.0, 600.0),
			1.0,
			false,
		)
	}

	#[test]
	fn edges_draw_before_nodes() {
		let st = state();
		let mut surface = RecordingSurface::default();
		render(&st, palette(false), &mut surface);

		let edge_at = surface
			.ops
			.iter()
			.position(|op| matches!(op, Op::Cubic { .. }))
			.expect("one edge drawn");
		let card_at = surface
			.ops
			.iter()
			.position(|op| matches!(op, Op::RoundedRect { .. }))
			.expect("cards drawn");
		assert!(edge_at < card_at);
		assert_eq!(surface.ops.first(), Some(&Op::Begin));
		assert_eq!(surface.ops.last(), Some(&Op::End));

		let cards = surface
			.ops
			.iter()
			.filter(|op| matches!(op, Op::RoundedRect { .. }))
			.count();
		assert_eq!(cards, 2);
	}

	#[test]
	fn selected_node_gets_accent_shadow() {
		let mut st = state();
		st.selection.set(["2".to_string()]);
		let mut surface = RecordingSurface::default();
		let pal = palette(false);
		render(&st, pal, &mut surface);

		let shadows: Vec<&str> = surface
			.ops
			.iter()
			.filter_map(|op| match op {
				Op::RoundedRect { shadow } => Some(shadow.as_str()),
				_ => None,
			})
			.collect();
		assert_eq!(shadows, vec![pal.shadow, pal.shadow_selected]);
	}

	#[test]
	fn hovered_edge_gets_highlight_and_removal_glyph() {
		let mut st = state();
		st.hover.edge = Some("2".to_string());
		let mut surface = RecordingSurface::default();
		let pal = palette(false);
		render(&st, pal, &mut surface);

		assert!(surface.ops.contains(&Op::Cubic {
			color: pal.edge_hover.into()
		}));
		assert!(surface.ops.contains(&Op::Glyph(EDGE_GLYPH_CROSS.into())));
	}

	#[test]
	fn connection_preview_is_dashed() {
		let mut st = state();
		st.interaction = Interaction::DrawingConnection {
			source: "1".into(),
			current: Point::new(300.0, 300.0),
		};
		let mut surface = RecordingSurface::default();
		render(&st, palette(false), &mut surface);
		assert!(surface.ops.contains(&Op::Line { dashed: true }));
	}

	#[test]
	fn rubber_band_draws_translucent_rect() {
		let mut st = state();
		st.interaction = Interaction::RubberBand {
			start: Point::new(100.0, 100.0),
			current: Point::new(300.0, 250.0),
		};
		let mut surface = RecordingSurface::default();
		let pal = palette(false);
		render(&st, pal, &mut surface);
		assert!(surface.ops.contains(&Op::Rect {
			fill: pal.band_fill.into()
		}));
	}

	#[test]
	fn labels_are_truncated() {
		assert_eq!(truncate("short", 18), "short");
		let long = "A very long employee display name";
		let cut = truncate(long, 18);
		assert!(cut.chars().count() <= 18);
		assert!(cut.ends_with('…'));
	}

	#[test]
	fn dark_and_light_palettes_differ() {
		assert_ne!(palette(true).background, palette(false).background);
	}
}
