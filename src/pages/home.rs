use leptos::prelude::*;
use log::info;

use crate::components::org_chart::{Employee, OrgChartCanvas, Point};

/// Sample org: one director, two team leads, their reports, plus one record
/// with a dangling manager to exercise the root fallback.
fn sample_employees() -> Vec<Employee> {
	let emp = |id: &str, name: &str, role: &str, division: &str, manager: Option<&str>| Employee {
		id: id.into(),
		name: name.into(),
		role: role.into(),
		division: division.into(),
		manager_id: manager.map(str::to_owned),
	};
	vec![
		emp("1", "Mara Voss", "Director", "Operations", None),
		emp("2", "Jonas Reh", "Team Lead", "Warehouse", Some("1")),
		emp("3", "Priya Natarajan", "Team Lead", "Fulfilment", Some("1")),
		emp("4", "Sam Okafor", "Picker", "Warehouse", Some("2")),
		emp("5", "Lena Hartmann", "Packer", "Warehouse", Some("2")),
		emp("6", "Diego Fuentes", "Courier", "Fulfilment", Some("3")),
		emp("7", "Aya Kimura", "Courier", "Fulfilment", Some("3")),
		emp("8", "Contractor X", "Temp", "Warehouse", Some("missing")),
	]
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let (employees, _set_employees) = signal(sample_employees());
	let (dark_mode, _set_dark_mode) = signal(false);

	// The demo host only logs; a real host persists and feeds the change
	// back through the `employees` signal, triggering a rebuild.
	let on_manager_change = move |(id, manager): (String, Option<String>)| {
		info!("manager change: {id} -> {manager:?}");
	};
	let on_request_create_child = move |(manager, at): (String, Point)| {
		info!("create child under {manager} at ({:.0}, {:.0})", at.x, at.y);
	};
	let on_request_edit = move |id: String| info!("edit requested: {id}");
	let on_request_delete = move |id: String| info!("delete requested: {id}");

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<OrgChartCanvas
					employees=employees
					on_manager_change=on_manager_change
					on_request_create_child=on_request_create_child
					on_request_edit=on_request_edit
					on_request_delete=on_request_delete
					dark_mode=dark_mode
					fullscreen=true
				/>
				<div class="graph-overlay">
					<h1>"Org Chart"</h1>
					<p class="subtitle">
						"Drag cards to reposition. Drag a handle onto another card to change managers. Shift+drag to multi-select. Ctrl+scroll to zoom, drag the background to pan."
					</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}
