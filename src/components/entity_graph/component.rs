use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{error, info};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::filter::EntityFilter;
use super::render;
use super::state::EntityGraphState;
use super::types::{Entity, EntityKind};
use crate::config::{GraphConfig, Theme};
use crate::services::{ThreatService, load_snapshot};

type Shared = Rc<RefCell<EntityGraphState>>;
type Callback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Cleared when the owning component is disposed. `on_cleanup` needs a
/// `Send + Sync` closure, so this is the only thing it touches; the frame
/// loop and async tasks poll it.
#[derive(Clone)]
struct Liveness(Arc<AtomicBool>);

impl Liveness {
	fn is_live(&self) -> bool {
		self.0.load(Ordering::Acquire)
	}

	fn release(&self) {
		self.0.store(false, Ordering::Release);
	}
}

/// Liveness tied to the current reactive owner.
fn watch_unmount() -> Liveness {
	let live = Liveness(Arc::new(AtomicBool::new(true)));
	let on_drop = live.clone();
	on_cleanup(move || on_drop.release());
	live
}

/// Detaches the resize listener and frees both callbacks. Runs inside the
/// frame callback, so that closure is dropped on a later tick.
fn teardown(window: &web_sys::Window, resize_cb: &Callback, animate: &Callback) {
	if let Some(cb) = resize_cb.borrow_mut().take() {
		let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
	}
	let frame = animate.borrow_mut().take();
	Timeout::new(0, move || drop(frame)).forget();
	info!("entity graph unmounted");
}

/// Reactive mirror of the parts of the state the DOM overlay shows.
#[derive(Clone, Copy)]
struct Overlay {
	loading: RwSignal<bool>,
	empty: RwSignal<bool>,
	selected: RwSignal<Option<Entity>>,
}

impl Overlay {
	fn sync(&self, state: &EntityGraphState) {
		let empty = state.data().is_empty();
		let selected = state.selected_entity().cloned();
		if self.loading.get_untracked() != state.is_loading() {
			self.loading.set(state.is_loading());
		}
		if self.empty.get_untracked() != empty {
			self.empty.set(empty);
		}
		if self.selected.get_untracked() != selected {
			self.selected.set(selected);
		}
	}
}

fn fit_canvas(canvas: &HtmlCanvasElement, state: &mut EntityGraphState) {
	let parent = canvas.parent_element();
	let measured = |f: fn(&web_sys::Element) -> i32, fallback: f64| {
		parent
			.as_ref()
			.map(|p| f(p) as f64)
			.filter(|v| *v > 0.0)
			.unwrap_or(fallback)
	};
	let (w, h) = (
		measured(web_sys::Element::client_width, 800.0),
		measured(web_sys::Element::client_height, 600.0),
	);
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);
	state.resize(w, h);
}

fn pointer(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?;
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Re-measures the canvas and fits the whole graph into it.
fn recenter(canvas_ref: NodeRef<leptos::html::Canvas>, state: &Shared) {
	let mut s = state.borrow_mut();
	if let Some(canvas) = canvas_ref.get_untracked() {
		fit_canvas(&canvas, &mut s);
	}
	s.recenter();
}

/// Interactive threat entity network: pan, zoom, drag nodes, inspect.
///
/// Loads its data from the [`ThreatService`] in context and filters it by
/// `search` and `kinds` (empty = all kinds).
#[component]
pub fn EntityGraph(
	#[prop(into)] search: Signal<String>,
	#[prop(into)] kinds: Signal<Vec<EntityKind>>,
	#[prop(default = Theme::Standard)] theme: Theme,
) -> impl IntoView {
	let config = use_context::<GraphConfig>().unwrap_or_default();
	let service = use_context::<ThreatService>().unwrap_or_default();

	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let viewport_ref = NodeRef::<leptos::html::Div>::new();
	let state: Shared = Rc::new(RefCell::new(EntityGraphState::new(config, 800.0, 600.0)));
	let animate: Callback = Rc::new(RefCell::new(None));
	let resize_cb: Callback = Rc::new(RefCell::new(None));
	let live = watch_unmount();
	let overlay = Overlay {
		loading: RwSignal::new(true),
		empty: RwSignal::new(true),
		selected: RwSignal::new(None),
	};

	let refresh: Rc<dyn Fn()> = {
		let (state, live) = (state.clone(), live.clone());
		Rc::new(move || {
			let ticket = state.borrow_mut().begin_refresh();
			overlay.sync(&state.borrow());
			let (state, service, live) = (state.clone(), service.clone(), live.clone());
			spawn_local(async move {
				let result = load_snapshot(&service).await;
				let applied = state.borrow_mut().complete_refresh(ticket, result);
				if !live.is_live() {
					return;
				}
				overlay.sync(&state.borrow());
				if applied {
					// Give layout a moment so the container reports its real size.
					let delay = state.borrow().config.center_delay_ms;
					Timeout::new(delay, move || {
						if live.is_live() {
							recenter(canvas_ref, &state);
						}
					})
					.forget();
				}
			});
		})
	};

	let state_filter = state.clone();
	Effect::new(move |_| {
		let filter = EntityFilter::new(search.get(), kinds.get());
		state_filter.borrow_mut().set_filter(filter);
	});

	let (state_init, animate_init, resize_cb_init, refresh_init, live_init) = (
		state.clone(),
		animate.clone(),
		resize_cb.clone(),
		refresh.clone(),
		live.clone(),
	);
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let Some(window) = web_sys::window() else {
			error!("entity graph: no window");
			return;
		};
		fit_canvas(&canvas, &mut state_init.borrow_mut());

		let ctx = match canvas.get_context("2d") {
			Ok(Some(ctx)) => ctx.dyn_into::<CanvasRenderingContext2d>(),
			_ => {
				error!("entity graph: 2d canvas context unavailable");
				return;
			}
		};
		let Ok(ctx) = ctx else {
			return;
		};

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			fit_canvas(&canvas_resize, &mut state_resize.borrow_mut());
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner, resize_inner, live_anim) = (
			state_init.clone(),
			animate_init.clone(),
			resize_cb_init.clone(),
			live_init.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			if !live_anim.is_live() {
				teardown(&win, &resize_inner, &animate_inner);
				return;
			}
			render::render(&state_anim.borrow(), &ctx, theme);
			if let Some(cb) = &*animate_inner.borrow() {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}

		info!("entity graph mounted");
		refresh_init();
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		let mut s = state_md.borrow_mut();
		match s.node_at_position(x, y) {
			Some(id) => {
				s.begin_drag(id, (x, y));
			}
			None => s.begin_pan(x, y),
		}
		overlay.sync(&s);
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		let mut s = state_mm.borrow_mut();
		if s.dragging().is_some() {
			s.update_drag((x, y));
		} else if s.is_panning() {
			s.update_pan(x, y);
		} else {
			let hovered = s.node_at_position(x, y);
			s.set_hover(hovered);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		let mut s = state_mu.borrow_mut();
		s.release_pointer();
		overlay.sync(&s);
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		let mut s = state_ml.borrow_mut();
		s.release_pointer();
		s.set_hover(None);
		overlay.sync(&s);
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		let factor = if ev.delta_y() > 0.0 { 1.0 / 1.1 } else { 1.1 };
		state_wh.borrow_mut().zoom_at(x, y, factor);
	};

	let state_center = state.clone();
	let on_center = move |_| recenter(canvas_ref, &state_center);
	let state_zi = state.clone();
	let on_zoom_in = move |_| state_zi.borrow_mut().zoom_in();
	let state_zo = state.clone();
	let on_zoom_out = move |_| state_zo.borrow_mut().zoom_out();
	let on_refresh = move |_| refresh();
	let on_fullscreen = move |_| {
		let Some(document) = web_sys::window().and_then(|w| w.document()) else {
			return;
		};
		if document.fullscreen_element().is_some() {
			document.exit_fullscreen();
		} else if let Some(el) = viewport_ref.get_untracked() {
			let _ = el.request_fullscreen();
		}
	};
	let state_close = state.clone();
	let on_close_details = move |_| {
		let mut s = state_close.borrow_mut();
		s.select(None);
		overlay.sync(&s);
	};

	let legend = EntityKind::ALL
		.into_iter()
		.map(|kind| {
			let color = render::node_color(kind, theme);
			view! {
				<div class="legend-item">
					<span class="legend-swatch" style=format!("background-color: {color};") />
					<span class="legend-label">{kind.label()}</span>
				</div>
			}
		})
		.collect_view();

	view! {
		<div class="entity-graph">
			<div class="entity-graph-header">
				<h2>"Threat Entity Network"</h2>
				<span class="entity-graph-mode">"Manual Mode"</span>
				<div class="entity-graph-toolbar">
					<button title="Center Graph" on:click=on_center>"Center"</button>
					<button title="Zoom In" on:click=on_zoom_in>"+"</button>
					<button title="Zoom Out" on:click=on_zoom_out>"-"</button>
					<button title="Refresh Data" on:click=on_refresh>"Refresh"</button>
					<button title="Fullscreen" on:click=on_fullscreen>"Fullscreen"</button>
				</div>
			</div>

			<div node_ref=viewport_ref class="entity-graph-viewport">
				<canvas
					node_ref=canvas_ref
					class="entity-graph-canvas"
					on:mousedown=on_mousedown
					on:mousemove=on_mousemove
					on:mouseup=on_mouseup
					on:mouseleave=on_mouseleave
					on:wheel=on_wheel
					style="display: block; cursor: grab;"
				/>

				<div
					class="entity-graph-spinner"
					style:display=move || {
						if overlay.loading.get() && overlay.empty.get() { "flex" } else { "none" }
					}
				>
					"Loading..."
				</div>

				<div class="entity-graph-legend">{legend}</div>

				<div
					class="entity-graph-details"
					style:display=move || if overlay.selected.get().is_some() { "block" } else { "none" }
				>
					<div class="entity-graph-details-header">
						<h3>"Entity Details"</h3>
						<button on:click=on_close_details>"×"</button>
					</div>
					<dl>
						<dt>"Name"</dt>
						<dd class="mono">
							{move || overlay.selected.get().map(|e| e.label).unwrap_or_default()}
						</dd>
						<dt>"Type"</dt>
						<dd>
							{move || overlay.selected.get().map(|e| e.kind.to_string()).unwrap_or_default()}
						</dd>
						<dt>"Status"</dt>
						<dd class="status">
							{move || {
								overlay
									.selected
									.get()
									.and_then(|e| e.status)
									.unwrap_or_else(|| "Active Monitoring".into())
							}}
						</dd>
					</dl>
				</div>
			</div>
		</div>
	}
}
