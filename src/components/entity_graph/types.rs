use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of entity categories served by the entities API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
	/// Threat actor or group.
	Actor,
	/// IP address.
	Ip,
	/// Domain or artifact.
	Domain,
	/// Targeted sector.
	Target,
	/// Leaked credential.
	Credential,
}

impl EntityKind {
	/// Every kind, in legend order.
	pub const ALL: [EntityKind; 5] = [
		EntityKind::Actor,
		EntityKind::Target,
		EntityKind::Ip,
		EntityKind::Domain,
		EntityKind::Credential,
	];

	/// Order of the kind checkboxes on the investigation board.
	pub const FILTER_ORDER: [EntityKind; 5] = [
		EntityKind::Actor,
		EntityKind::Ip,
		EntityKind::Domain,
		EntityKind::Target,
		EntityKind::Credential,
	];

	/// Wire name, as used by the API.
	pub fn as_str(&self) -> &'static str {
		match self {
			EntityKind::Actor => "actor",
			EntityKind::Ip => "ip",
			EntityKind::Domain => "domain",
			EntityKind::Target => "target",
			EntityKind::Credential => "credential",
		}
	}

	/// Legend label.
	pub fn label(&self) -> &'static str {
		match self {
			EntityKind::Actor => "Threat Actor",
			EntityKind::Ip => "IP Address",
			EntityKind::Domain => "Domain",
			EntityKind::Target => "Target Sector",
			EntityKind::Credential => "Credential",
		}
	}

	/// Checkbox label on the filter sidebar.
	pub fn filter_label(&self) -> &'static str {
		match self {
			EntityKind::Actor => "Actor",
			EntityKind::Ip => "IP Address",
			EntityKind::Domain => "Domain",
			EntityKind::Target => "Target",
			EntityKind::Credential => "Credential",
		}
	}

	/// Node fill color in the standard theme.
	pub fn color(&self) -> &'static str {
		match self {
			EntityKind::Actor => "#ef4444",
			EntityKind::Target => "#3b82f6",
			EntityKind::Ip => "#f59e0b",
			EntityKind::Credential => "#f97316",
			EntityKind::Domain => "#8b5cf6",
		}
	}
}

impl fmt::Display for EntityKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

fn default_size() -> f64 {
	30.0
}

/// A node of the entity graph, positioned in graph space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
	/// Unique within one snapshot.
	pub id: i64,
	/// Display name, also what the search box matches.
	pub label: String,
	/// Category, `type` on the wire.
	#[serde(rename = "type")]
	pub kind: EntityKind,
	/// Graph-space position.
	#[serde(default)]
	pub x: f64,
	/// Graph-space position.
	#[serde(default)]
	pub y: f64,
	/// Diameter in graph units.
	#[serde(default = "default_size")]
	pub size: f64,
	/// Monitoring status shown in the detail panel.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status: Option<String>,
}

impl Entity {
	/// Half the diameter, in graph units.
	pub fn radius(&self) -> f64 {
		self.size / 2.0
	}
}

/// Undirected relation between two entity ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
	/// Entity id at one end.
	pub source: i64,
	/// Entity id at the other end.
	pub target: i64,
}

/// A full snapshot as returned by the data source.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	/// Nodes, in draw order.
	pub entities: Vec<Entity>,
	/// Edges, possibly dangling or duplicated.
	pub links: Vec<Link>,
}

impl GraphData {
	/// True when there are no entities.
	pub fn is_empty(&self) -> bool {
		self.entities.is_empty()
	}

	/// Looks up an entity by id.
	pub fn entity(&self, id: i64) -> Option<&Entity> {
		self.entities.iter().find(|e| e.id == id)
	}

	/// Whether an entity with `id` is present.
	pub fn contains(&self, id: i64) -> bool {
		self.entity(id).is_some()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn entity_decodes_with_wire_defaults() {
		let e: Entity = serde_json::from_str(r#"{"id": 9, "label": "C2", "type": "domain"}"#).unwrap();
		assert_eq!(e.kind, EntityKind::Domain);
		assert_eq!((e.x, e.y, e.size), (0.0, 0.0, 30.0));
		assert_eq!(e.status, None);
		assert_eq!(e.radius(), 15.0);
	}

	#[test]
	fn filter_order_lists_every_kind_once() {
		let labels: Vec<&str> = EntityKind::FILTER_ORDER.iter().map(|k| k.filter_label()).collect();
		assert_eq!(labels, vec!["Actor", "IP Address", "Domain", "Target", "Credential"]);
		for kind in EntityKind::ALL {
			assert_eq!(EntityKind::FILTER_ORDER.iter().filter(|k| **k == kind).count(), 1);
		}
	}

	#[test]
	fn unknown_kind_is_rejected() {
		let res = serde_json::from_str::<Entity>(r#"{"id": 1, "label": "x", "type": "botnet"}"#);
		assert!(res.is_err());
	}
}
