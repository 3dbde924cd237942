//! Thin `fetch` wrapper for the threat-intel API.

use serde::de::DeserializeOwned;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

use crate::config::ApiConfig;

#[derive(Debug, Error)]
pub enum ApiError {
	#[error("no browser window available")]
	NoWindow,
	#[error("network error: {0}")]
	Network(String),
	#[error("API error {status}: {detail}")]
	Status { status: u16, detail: String },
	#[error("invalid response body: {0}")]
	Decode(#[from] serde_json::Error),
}

impl From<JsValue> for ApiError {
	fn from(value: JsValue) -> Self {
		ApiError::Network(
			value
				.as_string()
				.unwrap_or_else(|| format!("{value:?}")),
		)
	}
}

/// Pulls FastAPI's `{"detail": ...}` out of an error body, falling back to
/// the status line.
pub fn error_detail(body: &str, status: u16, status_text: &str) -> String {
	serde_json::from_str::<serde_json::Value>(body)
		.ok()
		.and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_owned))
		.unwrap_or_else(|| format!("API Error: {status} {status_text}"))
}

#[derive(Clone, Debug)]
pub struct ApiClient {
	config: ApiConfig,
}

impl ApiClient {
	pub fn new(config: ApiConfig) -> Self {
		Self { config }
	}

	pub fn url(&self, endpoint: &str) -> String {
		format!("{}{}", self.config.base_url, endpoint)
	}

	fn auth_token(&self) -> Option<String> {
		web_sys::window()?
			.local_storage()
			.ok()??
			.get_item(&self.config.token_key)
			.ok()?
	}

	/// `GET` an endpoint and decode its JSON body.
	pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
		let window = web_sys::window().ok_or(ApiError::NoWindow)?;

		let headers = Headers::new()?;
		headers.set("Content-Type", "application/json")?;
		if let Some(token) = self.auth_token() {
			headers.set("Authorization", &format!("Bearer {token}"))?;
		}

		let opts = RequestInit::new();
		opts.set_method("GET");
		opts.set_mode(RequestMode::Cors);
		opts.set_headers(&headers);
		let request = Request::new_with_str_and_init(&self.url(endpoint), &opts)?;

		let response: Response = JsFuture::from(window.fetch_with_request(&request))
			.await?
			.dyn_into()?;
		let body = JsFuture::from(response.text()?)
			.await?
			.as_string()
			.unwrap_or_default();

		if !response.ok() {
			let status = response.status();
			return Err(ApiError::Status {
				status,
				detail: error_detail(&body, status, &response.status_text()),
			});
		}
		Ok(serde_json::from_str(&body)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn detail_field_wins_over_status_line() {
		assert_eq!(
			error_detail(r#"{"detail": "Not authenticated"}"#, 401, "Unauthorized"),
			"Not authenticated"
		);
		assert_eq!(
			error_detail("<html>", 502, "Bad Gateway"),
			"API Error: 502 Bad Gateway"
		);
	}

	#[test]
	fn url_joins_base_and_endpoint() {
		let client = ApiClient::new(ApiConfig::default());
		assert_eq!(client.url("/entities/links"), "http://localhost:8000/api/entities/links");
	}
}
