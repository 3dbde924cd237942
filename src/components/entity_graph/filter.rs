use std::collections::HashSet;

use super::types::{Entity, EntityKind, Link};

/// Search term plus kind allow-list. Both empty means "show everything".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityFilter {
	pub search: String,
	pub kinds: Vec<EntityKind>,
}

impl EntityFilter {
	pub fn new(search: impl Into<String>, kinds: Vec<EntityKind>) -> Self {
		Self {
			search: search.into(),
			kinds,
		}
	}

	pub fn matches(&self, entity: &Entity) -> bool {
		let kind_ok = self.kinds.is_empty() || self.kinds.contains(&entity.kind);
		kind_ok
			&& entity
				.label
				.to_lowercase()
				.contains(&self.search.to_lowercase())
	}
}

pub fn filter_entities(entities: &[Entity], filter: &EntityFilter) -> Vec<Entity> {
	entities
		.iter()
		.filter(|e| filter.matches(e))
		.cloned()
		.collect()
}

/// Keeps links whose endpoints both survived filtering. Dangling links are
/// dropped here as well, duplicates are not.
pub fn filter_links(links: &[Link], visible: &[Entity]) -> Vec<Link> {
	let ids: HashSet<i64> = visible.iter().map(|e| e.id).collect();
	links
		.iter()
		.filter(|l| ids.contains(&l.source) && ids.contains(&l.target))
		.copied()
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::services::mock_data;

	#[test]
	fn empty_filter_keeps_everything_in_order() {
		let data = mock_data::graph();
		let out = filter_entities(&data.entities, &EntityFilter::default());
		assert_eq!(out, data.entities);
		assert_eq!(filter_links(&data.links, &out), data.links);
	}

	#[test]
	fn search_is_case_insensitive_substring() {
		let data = mock_data::graph();
		let out = filter_entities(&data.entities, &EntityFilter::new("GRID", vec![]));
		assert_eq!(out.len(), 1);
		assert_eq!(out[0].label, "Power Grid");
	}

	#[test]
	fn kind_allow_list_and_link_pruning() {
		let data = mock_data::graph();
		let filter = EntityFilter::new("", vec![EntityKind::Actor, EntityKind::Target]);
		let out = filter_entities(&data.entities, &filter);
		let ids: Vec<i64> = out.iter().map(|e| e.id).collect();
		assert_eq!(ids, vec![1, 4, 5]);

		let links = filter_links(&data.links, &out);
		assert_eq!(
			links,
			vec![Link { source: 1, target: 4 }, Link { source: 1, target: 5 }]
		);
	}

	#[test]
	fn filtering_twice_is_a_no_op() {
		let data = mock_data::graph();
		let filter = EntityFilter::new("o", vec![EntityKind::Ip, EntityKind::Target]);
		let once = filter_entities(&data.entities, &filter);
		let twice = filter_entities(&once, &filter);
		assert_eq!(once, twice);
		assert_eq!(
			filter_links(&data.links, &once),
			filter_links(&filter_links(&data.links, &once), &twice)
		);
	}

	#[test]
	fn duplicate_and_dangling_links() {
		let data = mock_data::graph();
		let links = vec![
			Link { source: 1, target: 2 },
			Link { source: 1, target: 2 },
			Link { source: 1, target: 99 },
		];
		let out = filter_links(&links, &data.entities);
		assert_eq!(out.len(), 2);
	}
}
