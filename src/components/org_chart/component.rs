use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, PointerEvent, WheelEvent, Window};

use super::input;
use super::render::{self, Canvas2dSurface};
use super::state::EditorState;
use super::types::{Command, Employee, Point, Size};

type Shared = Rc<RefCell<Option<EditorState>>>;

/// The interactive org chart editor. The host owns the employee list and
/// all persistence; the editor emits commands through the callbacks and
/// applies optimistic local effects, reconciled on the next list change.
#[component]
pub fn OrgChartCanvas(
	#[prop(into)] employees: Signal<Vec<Employee>>,
	/// Persist an edge mutation: (employee id, new manager id or None).
	#[prop(into)] on_manager_change: Callback<(String, Option<String>)>,
	/// A connection was dropped on empty canvas: (manager id, drop position).
	#[prop(into)] on_request_create_child: Callback<(String, Point)>,
	#[prop(into)] on_request_edit: Callback<String>,
	#[prop(into)] on_request_delete: Callback<String>,
	#[prop(into, default = Signal::derive(|| false))] dark_mode: Signal<bool>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Shared = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

	let dispatch = move |commands: &[Command]| {
		for cmd in commands {
			debug!("command: {cmd:?}");
			match cmd.clone() {
				Command::SetManager {
					employee_id,
					manager_id,
				} => on_manager_change.run((employee_id, manager_id)),
				Command::CreateChild {
					manager_id,
					position,
				} => on_request_create_child.run((manager_id, position)),
				Command::RequestEdit { employee_id } => on_request_edit.run(employee_id),
				Command::RequestDelete { employee_id } => on_request_delete.run(employee_id),
			}
		}
	};

	let (state_init, resize_cb_init) = (state.clone(), resize_cb.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();
		let dpr = window.device_pixel_ratio();

		let (w, h) = if fullscreen {
			(
				window.inner_width().unwrap().as_f64().unwrap(),
				window.inner_height().unwrap().as_f64().unwrap(),
			)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		size_backing_buffer(&canvas, w, h, dpr);

		// Tracked read: any employee-list change rebuilds the layout
		// wholesale before the next paint (external manager writes arrive
		// through the list).
		let list = employees.get();
		let dark = dark_mode.get_untracked();
		{
			let mut slot = state_init.borrow_mut();
			match slot.as_mut() {
				Some(s) => {
					s.resize(Size::new(w, h));
					s.rebuild(&list);
				}
				None => *slot = Some(EditorState::new(&list, Size::new(w, h), dpr, fullscreen)),
			}
			if let Some(ref s) = *slot {
				repaint(&canvas, s, dark);
			}
		}

		if fullscreen && resize_cb_init.borrow().is_none() {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let win: Window = web_sys::window().unwrap();
				let (nw, nh) = (
					win.inner_width().unwrap().as_f64().unwrap(),
					win.inner_height().unwrap().as_f64().unwrap(),
				);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					size_backing_buffer(&canvas_resize, nw, nh, s.viewport.dpr);
					s.resize(Size::new(nw, nh));
					s.rebuild(&employees.get_untracked());
					repaint(&canvas_resize, s, dark_mode.get_untracked());
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
	});

	// Palette switches repaint without rebuilding the layout.
	let state_dark = state.clone();
	Effect::new(move |_| {
		let dark = dark_mode.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		if let Some(ref s) = *state_dark.borrow() {
			repaint(&canvas, s, dark);
		}
	});

	let state_pd = state.clone();
	let on_pointerdown = move |ev: PointerEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		// Keep the stream even when the pointer leaves the canvas mid-drag.
		let _ = canvas.set_pointer_capture(ev.pointer_id());
		if let Some(ref mut s) = *state_pd.borrow_mut() {
			let commands = input::pointer_down(s, event_point(&canvas, &ev), ev.shift_key());
			dispatch(&commands);
			repaint(&canvas, s, dark_mode.get_untracked());
		}
	};

	let state_pm = state.clone();
	let on_pointermove = move |ev: PointerEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		if let Some(ref mut s) = *state_pm.borrow_mut() {
			input::pointer_move(s, event_point(&canvas, &ev));
			repaint(&canvas, s, dark_mode.get_untracked());
		}
	};

	let state_pu = state.clone();
	let on_pointerup = move |ev: PointerEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		if let Some(ref mut s) = *state_pu.borrow_mut() {
			let commands = input::pointer_up(s, event_point(&canvas, &ev));
			dispatch(&commands);
			repaint(&canvas, s, dark_mode.get_untracked());
		}
	};

	// Leaving the canvas or losing capture is an implicit cancel.
	let state_pl = state.clone();
	let on_pointerleave = move |_: PointerEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		if let Some(ref mut s) = *state_pl.borrow_mut() {
			input::pointer_leave(s);
			repaint(&canvas, s, dark_mode.get_untracked());
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			if input::wheel(s, ev.delta_y(), ev.ctrl_key() || ev.meta_key()) {
				ev.prevent_default();
				repaint(&canvas, s, dark_mode.get_untracked());
			}
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="org-chart-canvas"
			on:pointerdown=on_pointerdown
			on:pointermove=on_pointermove
			on:pointerup=on_pointerup
			on:pointerleave=on_pointerleave
			on:wheel=on_wheel
			style="display: block; touch-action: none;"
		/>
	}
}

/// Backing buffer at logical × DPR; CSS size stays logical so pointer
/// offsets arrive in logical canvas pixels.
fn size_backing_buffer(canvas: &HtmlCanvasElement, w: f64, h: f64, dpr: f64) {
	canvas.set_width((w * dpr) as u32);
	canvas.set_height((h * dpr) as u32);
	// Inherent HtmlElement::style, not the leptos extension of the same name.
	let html: &web_sys::HtmlElement = canvas.as_ref();
	let style = html.style();
	let _ = style.set_property("width", &format!("{w}px"));
	let _ = style.set_property("height", &format!("{h}px"));
}

fn event_point(canvas: &HtmlCanvasElement, ev: &PointerEvent) -> Point {
	let rect = canvas.get_bounding_client_rect();
	Point::new(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn repaint(canvas: &HtmlCanvasElement, state: &EditorState, dark: bool) {
	let Ok(Some(obj)) = canvas.get_context("2d") else {
		return;
	};
	let Ok(ctx) = obj.dyn_into::<CanvasRenderingContext2d>() else {
		return;
	};
	let mut surface = Canvas2dSurface::new(&ctx);
	render::render(state, render::palette(dark), &mut surface);
	let html: &web_sys::HtmlElement = canvas.as_ref();
	let _ = html.style().set_property("cursor", state.cursor());
}
