//! Static fixture served when the API is unreachable.

use crate::components::entity_graph::{Entity, EntityKind, GraphData, Link};

fn entity(id: i64, x: f64, y: f64, label: &str, kind: EntityKind, size: f64) -> Entity {
	Entity {
		id,
		label: label.into(),
		kind,
		x,
		y,
		size,
		status: None,
	}
}

pub fn entities() -> Vec<Entity> {
	vec![
		entity(1, 400.0, 300.0, "Lazarus Group", EntityKind::Actor, 60.0),
		entity(2, 250.0, 150.0, "192.168.1.105", EntityKind::Ip, 40.0),
		entity(3, 550.0, 150.0, "malware.bin", EntityKind::Domain, 40.0),
		entity(4, 250.0, 450.0, "Finance Dept", EntityKind::Target, 50.0),
		entity(5, 550.0, 450.0, "Power Grid", EntityKind::Target, 50.0),
		entity(6, 100.0, 300.0, "Proxy Node", EntityKind::Ip, 30.0),
		entity(7, 700.0, 300.0, "C2 Server", EntityKind::Domain, 40.0),
	]
}

pub fn links() -> Vec<Link> {
	[(1, 2), (1, 3), (1, 4), (1, 5), (2, 6), (3, 7)]
		.into_iter()
		.map(|(source, target)| Link { source, target })
		.collect()
}

pub fn graph() -> GraphData {
	GraphData {
		entities: entities(),
		links: links(),
	}
}
