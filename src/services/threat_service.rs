//! Graph data source: the entities API with an optional fixture fallback.

use std::fmt::Display;
use std::future::Future;

use log::warn;

use super::api::{ApiClient, ApiError};
use super::mock_data;
use crate::components::entity_graph::{Entity, GraphData, Link};
use crate::config::ApiConfig;

/// Supplies full entity and link snapshots. No deltas, no paging.
#[allow(async_fn_in_trait)]
pub trait GraphSource {
	async fn fetch_entities(&self) -> Result<Vec<Entity>, ApiError>;
	async fn fetch_links(&self) -> Result<Vec<Link>, ApiError>;
}

/// Issues both fetches together and fails if either does.
pub async fn load_snapshot<S: GraphSource>(source: &S) -> Result<GraphData, ApiError> {
	let (entities, links) = futures::join!(source.fetch_entities(), source.fetch_links());
	Ok(GraphData {
		entities: entities?,
		links: links?,
	})
}

/// Runs `call`; on failure logs and yields `fallback` instead.
pub async fn with_fallback<T, E, F>(call: F, fallback: T) -> Result<T, E>
where
	F: Future<Output = Result<T, E>>,
	E: Display,
{
	match call.await {
		Ok(value) => Ok(value),
		Err(e) => {
			warn!("API call failed, using mock data: {e}");
			Ok(fallback)
		}
	}
}

#[derive(Clone, Debug)]
pub struct ThreatService {
	client: ApiClient,
	use_mock_fallback: bool,
}

impl ThreatService {
	pub fn new(config: ApiConfig) -> Self {
		Self {
			use_mock_fallback: config.use_mock_fallback,
			client: ApiClient::new(config),
		}
	}
}

impl Default for ThreatService {
	fn default() -> Self {
		Self::new(ApiConfig::from_env())
	}
}

impl GraphSource for ThreatService {
	async fn fetch_entities(&self) -> Result<Vec<Entity>, ApiError> {
		let call = self.client.get_json::<Vec<Entity>>("/entities");
		if self.use_mock_fallback {
			with_fallback(call, mock_data::entities()).await
		} else {
			call.await
		}
	}

	async fn fetch_links(&self) -> Result<Vec<Link>, ApiError> {
		let call = self.client.get_json::<Vec<Link>>("/entities/links");
		if self.use_mock_fallback {
			with_fallback(call, mock_data::links()).await
		} else {
			call.await
		}
	}
}

#[cfg(test)]
mod tests {
	use futures::executor::block_on;

	use super::*;

	struct StubSource {
		entities: Option<Vec<Entity>>,
		links: Option<Vec<Link>>,
	}

	impl GraphSource for StubSource {
		async fn fetch_entities(&self) -> Result<Vec<Entity>, ApiError> {
			self.entities.clone().ok_or(ApiError::Network("connection refused".into()))
		}

		async fn fetch_links(&self) -> Result<Vec<Link>, ApiError> {
			self.links.clone().ok_or(ApiError::Status {
				status: 503,
				detail: "Service Unavailable".into(),
			})
		}
	}

	#[test]
	fn snapshot_needs_both_halves() {
		let ok = StubSource {
			entities: Some(mock_data::entities()),
			links: Some(mock_data::links()),
		};
		assert_eq!(block_on(load_snapshot(&ok)).unwrap(), mock_data::graph());

		let half = StubSource {
			entities: Some(mock_data::entities()),
			links: None,
		};
		let err = block_on(load_snapshot(&half)).unwrap_err();
		assert!(matches!(err, ApiError::Status { status: 503, .. }));
	}

	#[test]
	fn fallback_replaces_errors_only() {
		let failed = block_on(with_fallback(
			async { Err::<Vec<Link>, _>(ApiError::NoWindow) },
			mock_data::links(),
		));
		assert_eq!(failed.unwrap(), mock_data::links());

		let live = vec![Link { source: 10, target: 11 }];
		let passed = block_on(with_fallback(
			async { Ok::<_, ApiError>(live.clone()) },
			mock_data::links(),
		));
		assert_eq!(passed.unwrap(), live);
	}
}
