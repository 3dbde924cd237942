//! Access to the threat-intel backend.

pub mod api;
pub mod mock_data;
pub mod threat_service;

pub use api::{ApiClient, ApiError};
pub use threat_service::{GraphSource, ThreatService, load_snapshot, with_fallback};
