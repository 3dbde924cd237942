//! Runtime configuration, handed to components through context.

const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Where and how to reach the threat-intel API.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiConfig {
	/// Base URL without trailing slash, e.g. `http://localhost:8000/api`.
	pub base_url: String,
	/// `localStorage` key holding the bearer token.
	pub token_key: String,
	/// Serve the bundled fixture when the API cannot be reached.
	pub use_mock_fallback: bool,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			base_url: DEFAULT_API_URL.into(),
			token_key: "trinetra_token".into(),
			use_mock_fallback: true,
		}
	}
}

impl ApiConfig {
	/// Reads `TRINETRA_API_URL` at compile time, the only knob a static
	/// WASM bundle can carry.
	pub fn from_env() -> Self {
		let mut config = Self::default();
		if let Some(url) = option_env!("TRINETRA_API_URL") {
			config.base_url = url.trim_end_matches('/').to_string();
		}
		config
	}
}

/// Tuning for the entity graph viewport.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphConfig {
	/// Screen-space margin kept around the graph when centering.
	pub padding: f64,
	/// Delay before centering after a refresh, so layout has settled.
	pub center_delay_ms: u32,
	/// Drop refresh responses older than the newest applied one. Off keeps
	/// last-write-wins.
	pub discard_stale_refreshes: bool,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			padding: 50.0,
			center_delay_ms: 500,
			discard_stale_refreshes: false,
		}
	}
}

/// Color scheme, passed explicitly to the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
	#[default]
	Standard,
	/// Everything in terminal green.
	Matrix,
}
