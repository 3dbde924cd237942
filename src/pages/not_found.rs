use leptos::prelude::*;
use leptos_router::components::A;

/// 404 page
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="not-found">
			<h1>"Page not found"</h1>
			<p class="muted">"The page you are looking for does not exist."</p>
			<A href="/">"Back to the investigation board"</A>
		</div>
	}
}
