use std::cell::RefCell;
use std::rc::Rc;

use leptos::ev;
use leptos::prelude::*;
use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent};

use super::render;
use super::state::{DiagramState, SessionFlags};
use crate::components::copy_button::CopyButton;
use crate::components::timers::TimerSlot;
use crate::config::DiagramConfig;

const FRAME_DT: f64 = 0.016;

/// Current window size, if there is a window to ask.
fn viewport_size() -> Option<(f64, f64)> {
	let window = web_sys::window()?;
	let width = window.inner_width().ok()?.as_f64()?;
	let height = window.inner_height().ok()?.as_f64()?;
	Some((width, height))
}

/// Editing is only offered when the page is served from a trusted local host.
fn host_is_trusted(config: &DiagramConfig) -> bool {
	web_sys::window()
		.and_then(|w| w.location().hostname().ok())
		.is_some_and(|host| config.is_trusted_host(&host))
}

/// Keys typed into form fields belong to the field, not to the diagram.
fn is_text_entry(tag: &str, content_editable: bool) -> bool {
	content_editable || matches!(tag.to_ascii_uppercase().as_str(), "INPUT" | "TEXTAREA" | "SELECT")
}

fn targets_text_entry(ev: &KeyboardEvent) -> bool {
	ev.target()
		.and_then(|target| target.dyn_into::<HtmlElement>().ok())
		.is_some_and(|el| is_text_entry(&el.tag_name(), el.is_content_editable()))
}

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?;
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

#[component]
pub fn FlowDiagramCanvas(#[prop(optional)] config: DiagramConfig) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: StoredValue<Option<DiagramState>> = StoredValue::new(None);
	let resize_timer = StoredValue::new(TimerSlot::<TimeoutHandle>::default());
	let running = StoredValue::new(true);
	let flags = RwSignal::new(SessionFlags::default());
	let dsl_text = RwSignal::new(String::new());
	let import_status = RwSignal::new(None::<String>);
	let (settle, padding, copy_reset) = (config.resize_settle, config.fit_padding, config.copy_reset);
	let config = StoredValue::new(config);

	// Mirrors the edit session into the reactive UI, skipping no-op updates.
	let sync_flags = move || {
		let next = state.try_with_value(|s| s.as_ref().map(DiagramState::flags)).flatten();
		if let Some(next) = next {
			if flags.get_untracked() != next {
				flags.set(next);
			}
		}
	};

	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let Some((w, h)) = viewport_size() else {
			warn!("no viewport available, diagram not started");
			return;
		};
		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("canvas has no 2d context");
			return;
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let trusted = config.with_value(host_is_trusted);
		let diagram = DiagramState::new(w, h, trusted, padding);
		info!(
			"diagram mounted at {w}x{h}: {:?}, {:?}",
			diagram.mode(),
			diagram.session.mode()
		);
		state.set_value(Some(diagram));
		sync_flags();

		let animate_inner = animate.clone();
		*animate.borrow_mut() = Some(Closure::new(move || {
			if !running.try_get_value().unwrap_or(false) {
				return;
			}
			let drawn = state.try_update_value(|s| {
				let Some(s) = s.as_mut() else {
					return;
				};
				s.tick(FRAME_DT);
				let (cw, ch) = (s.width as u32, s.height as u32);
				if canvas.width() != cw || canvas.height() != ch {
					canvas.set_width(cw);
					canvas.set_height(ch);
				}
				render::render(s, &ctx);
			});
			if drawn.is_none() {
				return;
			}
			if let (Some(cb), Some(window)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let (Some(cb), Some(window)) = (animate.borrow().as_ref(), web_sys::window()) {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// Resize bursts are coalesced: each event pushes the settle deadline back.
	let resize_listener = window_event_listener(ev::resize, move |_| {
		let handle = set_timeout_with_handle(
			move || {
				resize_timer.try_update_value(TimerSlot::fired);
				let Some((w, h)) = viewport_size() else {
					return;
				};
				let trusted = config.try_with_value(host_is_trusted).unwrap_or(false);
				state.try_update_value(|s| {
					if let Some(s) = s.as_mut() {
						s.set_capability(trusted);
						s.resize(w, h);
						debug!("viewport settled at {w}x{h} ({:?})", s.mode());
					}
				});
				sync_flags();
			},
			settle,
		);
		match handle {
			Ok(handle) => {
				resize_timer.try_update_value(|slot| slot.replace(handle));
			}
			Err(err) => warn!("could not schedule relayout: {err:?}"),
		}
	});

	let key_listener = window_event_listener(ev::keydown, move |ev| {
		if targets_text_entry(&ev) {
			return;
		}
		let handled = state
			.try_update_value(|s| s.as_mut().is_some_and(|s| s.key_down(&ev.key())))
			.unwrap_or(false);
		if handled {
			ev.prevent_default();
			sync_flags();
		}
	});

	on_cleanup(move || {
		running.try_update_value(|r| *r = false);
		resize_timer.try_update_value(TimerSlot::cancel);
		resize_listener.remove();
		key_listener.remove();
	});

	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		state.update_value(|s| {
			if let Some(s) = s.as_mut() {
				let hit = s.pointer_down(x, y);
				debug!("pointer down on {hit:?}");
			}
		});
		sync_flags();
	};

	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		state.update_value(|s| {
			if let Some(s) = s.as_mut() {
				s.pointer_move(x, y);
			}
		});
	};

	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		state.update_value(|s| {
			match s.as_mut().and_then(|s| s.pointer_up(x, y)) {
				Some(Ok(edge)) => info!("connected {}", edge.id),
				Some(Err(err)) => debug!("connection rejected: {err}"),
				None => {}
			}
		});
	};

	let on_mouseleave = move |_: MouseEvent| {
		state.update_value(|s| {
			if let Some(s) = s.as_mut() {
				s.pointer_leave();
			}
		});
	};

	let on_toggle = move |_: MouseEvent| {
		state.update_value(|s| {
			if let Some(s) = s.as_mut() {
				s.toggle_editing();
			}
		});
		sync_flags();
	};

	let on_export = move |_: MouseEvent| {
		if let Some(text) = state.with_value(|s| s.as_ref().map(DiagramState::export_dsl)) {
			dsl_text.set(text);
		}
	};

	let on_import = move |_: MouseEvent| {
		let text = dsl_text.get_untracked();
		let outcome = state.try_update_value(|s| s.as_mut().map(|s| s.import_dsl(&text)));
		let status = match outcome.flatten() {
			Some(Ok(warnings)) if warnings.is_empty() => "imported".to_string(),
			Some(Ok(warnings)) => warnings
				.iter()
				.map(|w| format!("line {}: {}", w.line, w.error))
				.collect::<Vec<_>>()
				.join("\n"),
			Some(Err(err)) => {
				warn!("DSL import failed: {err}");
				err.to_string()
			}
			None => return,
		};
		import_status.set(Some(status));
		sync_flags();
	};

	view! {
		<div class="flow-diagram">
			<canvas
				node_ref=canvas_ref
				class="flow-diagram-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				style="display: block;"
			/>
			<Show when=move || flags.with(|f| f.editing_enabled)>
				<div class="flow-diagram-toolbar">
					<button on:click=on_toggle>
						{move || if flags.with(|f| f.editing_active) { "Stop editing" } else { "Edit layout" }}
					</button>
					<Show when=move || flags.with(|f| f.editing_active)>
						<p class="flow-diagram-hint">
							{move || match flags.with(|f| f.selected_edge.clone()) {
								Some(id) => format!("{id} selected, press Delete to remove"),
								None => "Drag nodes, or drag from a handle to connect".to_string(),
							}}
						</p>
						<button on:click=on_export>"Export DSL"</button>
						<button on:click=on_import>"Import DSL"</button>
						<CopyButton text=dsl_text reset=copy_reset />
						<textarea
							class="flow-diagram-dsl"
							prop:value=move || dsl_text.get()
							on:input=move |ev| dsl_text.set(event_target_value(&ev))
						/>
						<pre class="flow-diagram-status">{move || import_status.get()}</pre>
					</Show>
				</div>
			</Show>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn form_fields_keep_their_keystrokes() {
		assert!(is_text_entry("TEXTAREA", false));
		assert!(is_text_entry("input", false));
		assert!(is_text_entry("DIV", true));
		assert!(!is_text_entry("CANVAS", false));
		assert!(!is_text_entry("BODY", false));
	}
}
