use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{error, info};
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::components::entity_graph::{EntityGraph, EntityKind};
use crate::config::Theme;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum TimeRange {
	#[default]
	#[serde(rename = "24h")]
	Day,
	#[serde(rename = "7d")]
	Week,
	#[serde(rename = "30d")]
	Month,
}

impl TimeRange {
	pub const ALL: [TimeRange; 3] = [TimeRange::Day, TimeRange::Week, TimeRange::Month];

	pub fn value(&self) -> &'static str {
		match self {
			TimeRange::Day => "24h",
			TimeRange::Week => "7d",
			TimeRange::Month => "30d",
		}
	}

	pub fn label(&self) -> &'static str {
		match self {
			TimeRange::Day => "Last 24 Hours",
			TimeRange::Week => "Last 7 Days",
			TimeRange::Month => "Last 30 Days",
		}
	}

	pub fn from_value(value: &str) -> Self {
		Self::ALL
			.into_iter()
			.find(|r| r.value() == value)
			.unwrap_or_default()
	}
}

/// What "Export Report" writes out.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestigationReport {
	pub timestamp: String,
	pub filters: Vec<EntityKind>,
	pub time_range: TimeRange,
	pub search: String,
	pub note: &'static str,
}

impl InvestigationReport {
	pub fn new(
		timestamp: String,
		filters: Vec<EntityKind>,
		time_range: TimeRange,
		search: String,
	) -> Self {
		Self {
			timestamp,
			filters,
			time_range,
			search,
			note: "Investigation Report",
		}
	}
}

/// Outcome of the last "Share" click, shown next to the button.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShareStatus {
	/// Nothing to show.
	#[default]
	Idle,
	/// The page URL is on the clipboard.
	Copied,
	/// The clipboard write was refused or unavailable.
	Failed,
}

impl ShareStatus {
	/// How long a result stays on screen.
	pub const DISPLAY_MS: u32 = 2_000;

	/// Text to show, if any.
	pub fn message(&self) -> Option<&'static str> {
		match self {
			ShareStatus::Idle => None,
			ShareStatus::Copied => Some("Link copied to clipboard!"),
			ShareStatus::Failed => Some("Could not copy link"),
		}
	}

	/// Maps a clipboard write result.
	pub fn from_result<T, E>(result: &Result<T, E>) -> Self {
		if result.is_ok() {
			ShareStatus::Copied
		} else {
			ShareStatus::Failed
		}
	}
}

async fn copy_page_link() -> Result<String, JsValue> {
	let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
	let href = window.location().href()?;
	JsFuture::from(window.navigator().clipboard().write_text(&href)).await?;
	Ok(href)
}

fn download_json(filename: &str, json: &str) -> Result<(), JsValue> {
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| JsValue::from_str("no document"))?;

	let opts = BlobPropertyBag::new();
	opts.set_type("application/json");
	let parts = js_sys::Array::of1(&JsValue::from_str(json));
	let blob = Blob::new_with_str_sequence_and_options(&parts, &opts)?;
	let url = Url::create_object_url_with_blob(&blob)?;

	let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
	anchor.set_href(&url);
	anchor.set_download(filename);
	anchor.click();
	Url::revoke_object_url(&url)
}

/// Investigation board: filter sidebar plus the entity network.
#[component]
pub fn Investigation() -> impl IntoView {
	let theme = use_context::<Theme>().unwrap_or_default();
	let search = RwSignal::new(String::new());
	let kinds = RwSignal::new(EntityKind::FILTER_ORDER.to_vec());
	let time_range = RwSignal::new(TimeRange::default());
	let share_status = RwSignal::new(ShareStatus::default());

	let on_share = move |_| {
		spawn_local(async move {
			let result = copy_page_link().await;
			match &result {
				Ok(href) => info!("copied {href} to clipboard"),
				Err(e) => error!("clipboard write failed: {e:?}"),
			}
			share_status.set(ShareStatus::from_result(&result));
			Timeout::new(ShareStatus::DISPLAY_MS, move || share_status.set(ShareStatus::Idle)).forget();
		});
	};

	let on_export = move |_| {
		let report = InvestigationReport::new(
			String::from(js_sys::Date::new_0().to_iso_string()),
			kinds.get_untracked(),
			time_range.get_untracked(),
			search.get_untracked(),
		);
		let json = match serde_json::to_string_pretty(&report) {
			Ok(json) => json,
			Err(e) => {
				error!("failed to encode report: {e}");
				return;
			}
		};
		let filename = format!("investigation-report-{}.json", js_sys::Date::now() as u64);
		match download_json(&filename, &json) {
			Ok(()) => info!("exported {filename}"),
			Err(e) => error!("report download failed: {e:?}"),
		}
	};

	let kind_toggles = EntityKind::FILTER_ORDER
		.into_iter()
		.map(|kind| {
			view! {
				<label class="filter-option">
					<input
						type="checkbox"
						prop:checked=move || kinds.get().contains(&kind)
						on:change=move |ev| {
							let checked = event_target_checked(&ev);
							kinds.update(|v| {
								v.retain(|k| *k != kind);
								if checked {
									v.push(kind);
								}
							});
						}
					/>
					{kind.filter_label()}
				</label>
			}
		})
		.collect_view();

	let range_options = TimeRange::ALL
		.into_iter()
		.map(|r| view! { <option value=r.value()>{r.label()}</option> })
		.collect_view();

	view! {
		<div class="investigation">
			<header class="investigation-header">
				<div>
					<h1>"Investigation Board"</h1>
					<p class="muted">"Analyze relationships between entities and threats."</p>
				</div>
				<div class="investigation-actions">
					<span class="share-status">{move || share_status.get().message()}</span>
					<button on:click=on_share>"Share"</button>
					<button class="primary" on:click=on_export>"Export Report"</button>
				</div>
			</header>

			<div class="investigation-grid">
				<aside class="investigation-filters">
					<h2>"Filters"</h2>
					<input
						type="text"
						placeholder="Search entities..."
						prop:value=move || search.get()
						on:input=move |ev| search.set(event_target_value(&ev))
					/>
					<div class="filter-group">
						<span class="filter-title">"Node Type"</span>
						{kind_toggles}
					</div>
					<div class="filter-group">
						<span class="filter-title">"Time Range"</span>
						<select
							prop:value=move || time_range.get().value()
							on:change=move |ev| time_range.set(TimeRange::from_value(&event_target_value(&ev)))
						>
							{range_options}
						</select>
					</div>
				</aside>

				<section class="investigation-graph">
					<EntityGraph search=search kinds=kinds theme=theme />
				</section>
			</div>
		</div>
	}
}
