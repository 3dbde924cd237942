//! Leptos client-side threat investigation board and routes.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
pub mod components;
pub mod config;
pub mod pages;
pub mod services;

// Top-Level pages
use crate::config::{ApiConfig, GraphConfig, Theme};
use crate::pages::investigation::Investigation;
use crate::pages::not_found::NotFound;
use crate::services::ThreatService;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router which renders the investigation board and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	let api = ApiConfig::from_env();
	info!("API base URL: {}", api.base_url);
	provide_context(ThreatService::new(api));
	provide_context(GraphConfig::default());
	provide_context(Theme::default());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		// sets the document title
		<Title text="Trinetra | Investigation Board" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Investigation />
				<Route path=path!("/investigation") view=Investigation />
			</Routes>
		</Router>
	}
}
