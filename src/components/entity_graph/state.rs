use std::fmt::Display;

use log::{debug, error, info, warn};

use super::drag::{DragController, PanState};
use super::filter::{EntityFilter, filter_entities, filter_links};
use super::layout::fit_transform;
use super::types::{Entity, GraphData, Link};
use super::viewport::ViewTransform;
use crate::config::GraphConfig;

/// Coarse lifecycle of the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	/// A refresh is outstanding.
	Loading,
	/// Idle and interactive.
	Ready,
	/// An entity is held by the pointer.
	Dragging,
}

/// Handed out by [`EntityGraphState::begin_refresh`], returned with the
/// result so responses can be ordered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

/// Everything the viewport knows: the loaded snapshot, the filter, the view
/// transform, pointer interaction, selection and refresh bookkeeping.
pub struct EntityGraphState {
	/// Padding, center delay and refresh fencing.
	pub config: GraphConfig,
	/// Canvas width in CSS pixels.
	pub width: f64,
	/// Canvas height in CSS pixels.
	pub height: f64,
	data: GraphData,
	filter: EntityFilter,
	transform: ViewTransform,
	drag: DragController,
	pan: PanState,
	selected: Option<i64>,
	hovered: Option<i64>,
	in_flight: u32,
	next_ticket: u64,
	last_applied: Option<RefreshTicket>,
}

impl EntityGraphState {
	/// Empty, `Ready` state with the identity transform.
	pub fn new(config: GraphConfig, width: f64, height: f64) -> Self {
		Self {
			config,
			width,
			height,
			data: GraphData::default(),
			filter: EntityFilter::default(),
			transform: ViewTransform::default(),
			drag: DragController::default(),
			pan: PanState::default(),
			selected: None,
			hovered: None,
			in_flight: 0,
			next_ticket: 0,
			last_applied: None,
		}
	}

	/// `Dragging` wins over `Loading`.
	pub fn phase(&self) -> Phase {
		if self.drag.is_active() {
			Phase::Dragging
		} else if self.in_flight > 0 {
			Phase::Loading
		} else {
			Phase::Ready
		}
	}

	/// Whether any refresh is still outstanding.
	pub fn is_loading(&self) -> bool {
		self.in_flight > 0
	}

	/// The full snapshot, filter not applied.
	pub fn data(&self) -> &GraphData {
		&self.data
	}

	/// Current view transform.
	pub fn transform(&self) -> ViewTransform {
		self.transform
	}

	/// Entities passing the current filter, in draw order.
	pub fn visible_entities(&self) -> Vec<Entity> {
		filter_entities(&self.data.entities, &self.filter)
	}

	/// Links with both endpoints visible.
	pub fn visible_links(&self) -> Vec<Link> {
		filter_links(&self.data.links, &self.visible_entities())
	}

	/// Entities and links in one pass, as the renderer needs both per frame.
	pub fn visible(&self) -> (Vec<Entity>, Vec<Link>) {
		let entities = self.visible_entities();
		let links = filter_links(&self.data.links, &entities);
		(entities, links)
	}

	/// Replaces the filter. Data and transform are untouched.
	pub fn set_filter(&mut self, filter: EntityFilter) {
		self.filter = filter;
	}

	/// Records the canvas size used by [`Self::recenter`].
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	// Viewport actions

	/// One zoom step in, translation kept.
	pub fn zoom_in(&mut self) {
		self.transform.zoom_in();
	}

	/// One zoom step out, translation kept.
	pub fn zoom_out(&mut self) {
		self.transform.zoom_out();
	}

	/// Wheel zoom around a screen point.
	pub fn zoom_at(&mut self, x: f64, y: f64, factor: f64) {
		self.transform.zoom_at(x, y, factor);
	}

	/// Sets the transform directly. Returns `false` and keeps the old one
	/// when the values are not finite or `k <= 0`.
	pub fn set_transform(&mut self, k: f64, x: f64, y: f64) -> bool {
		self.transform.set(k, x, y)
	}

	/// Fits every loaded entity into the viewport. A no-op for empty or
	/// degenerate graphs.
	pub fn recenter(&mut self) -> bool {
		let Some(t) = fit_transform(
			&self.data.entities,
			self.width,
			self.height,
			self.config.padding,
		) else {
			warn!("cannot center graph: no entities or zero-area bounds");
			return false;
		};
		debug!("centering graph: k={:.3} x={:.1} y={:.1}", t.k, t.x, t.y);
		self.transform.set(t.k, t.x, t.y)
	}

	// Refresh

	/// Marks a refresh in flight. The ticket goes back into
	/// [`Self::complete_refresh`].
	pub fn begin_refresh(&mut self) -> RefreshTicket {
		self.in_flight += 1;
		self.next_ticket += 1;
		RefreshTicket(self.next_ticket)
	}

	/// Applies a finished refresh. On success the snapshot replaces the
	/// current data wholesale; on failure the current data is kept. Returns
	/// whether new data was applied.
	pub fn complete_refresh<E: Display>(
		&mut self,
		ticket: RefreshTicket,
		result: Result<GraphData, E>,
	) -> bool {
		self.in_flight = self.in_flight.saturating_sub(1);

		let data = match result {
			Ok(data) => data,
			Err(e) => {
				error!("failed to fetch graph data: {e}");
				return false;
			}
		};

		if self.config.discard_stale_refreshes && self.last_applied.is_some_and(|t| ticket < t) {
			debug!("dropping stale graph refresh {ticket:?}");
			return false;
		}

		info!(
			"graph refreshed: {} entities, {} links",
			data.entities.len(),
			data.links.len()
		);
		self.data = data;
		self.last_applied = Some(ticket);
		self.prune_stale_references();
		true
	}

	fn prune_stale_references(&mut self) {
		if self.selected.is_some_and(|id| !self.data.contains(id)) {
			self.selected = None;
		}
		if self.hovered.is_some_and(|id| !self.data.contains(id)) {
			self.hovered = None;
		}
		if self.drag.node_id().is_some_and(|id| !self.data.contains(id)) {
			self.drag.end();
		}
	}

	// Pointer interaction

	/// Grabs entity `id` and selects it. Refused for unknown ids.
	pub fn begin_drag(&mut self, id: i64, pointer: (f64, f64)) -> bool {
		if !self.drag.begin(&self.data, id, pointer) {
			return false;
		}
		self.selected = Some(id);
		true
	}

	/// Moves the held entity under `pointer`. Returns `false` when nothing is
	/// held or the entity is gone.
	pub fn update_drag(&mut self, pointer: (f64, f64)) -> bool {
		self.drag.update(&mut self.data, &self.transform, pointer)
	}

	/// Drops the held entity where it is.
	pub fn end_drag(&mut self) {
		self.drag.end();
	}

	/// Id of the held entity.
	pub fn dragging(&self) -> Option<i64> {
		self.drag.node_id()
	}

	/// Starts panning from a background press.
	pub fn begin_pan(&mut self, x: f64, y: f64) {
		self.pan.begin(&self.transform, x, y);
	}

	/// Translates the view by the pointer's travel since [`Self::begin_pan`].
	pub fn update_pan(&mut self, x: f64, y: f64) -> bool {
		self.pan.update(&mut self.transform, x, y)
	}

	/// Whether a pan is in progress.
	pub fn is_panning(&self) -> bool {
		self.pan.active
	}

	/// Ends any drag or pan, as on pointer-up or pointer-leave.
	pub fn release_pointer(&mut self) {
		self.drag.end();
		self.pan.end();
	}

	/// Selects `id`, or clears the selection. Unknown ids clear it.
	pub fn select(&mut self, id: Option<i64>) {
		self.selected = id.filter(|id| self.data.contains(*id));
	}

	/// Selected entity id.
	pub fn selected(&self) -> Option<i64> {
		self.selected
	}

	/// Selected entity, for the detail panel.
	pub fn selected_entity(&self) -> Option<&Entity> {
		self.selected.and_then(|id| self.data.entity(id))
	}

	/// Sets the entity under the pointer.
	pub fn set_hover(&mut self, id: Option<i64>) {
		self.hovered = id;
	}

	/// Entity under the pointer, if any.
	pub fn hovered(&self) -> Option<i64> {
		self.hovered
	}

	/// Topmost visible entity under the screen point.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<i64> {
		let (gx, gy) = self.transform.screen_to_graph(sx, sy);
		self.visible_entities()
			.iter()
			.rev()
			.find(|e| {
				let (dx, dy) = (e.x - gx, e.y - gy);
				(dx * dx + dy * dy).sqrt() <= e.radius()
			})
			.map(|e| e.id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::services::mock_data;

	fn ready_state() -> EntityGraphState {
		let mut s = EntityGraphState::new(GraphConfig::default(), 800.0, 600.0);
		let t = s.begin_refresh();
		s.complete_refresh::<String>(t, Ok(mock_data::graph()));
		s
	}

	#[test]
	fn phases_follow_refresh_and_drag() {
		let mut s = EntityGraphState::new(GraphConfig::default(), 800.0, 600.0);
		assert_eq!(s.phase(), Phase::Ready);
		let t = s.begin_refresh();
		assert_eq!(s.phase(), Phase::Loading);
		assert!(s.complete_refresh::<String>(t, Ok(mock_data::graph())));
		assert_eq!(s.phase(), Phase::Ready);

		assert!(s.begin_drag(2, (0.0, 0.0)));
		assert_eq!(s.phase(), Phase::Dragging);
		assert_eq!(s.selected(), Some(2));
		s.end_drag();
		assert_eq!(s.phase(), Phase::Ready);
		assert_eq!(s.selected(), Some(2));
	}

	#[test]
	fn failed_refresh_keeps_previous_data() {
		let mut s = ready_state();
		let t = s.begin_refresh();
		assert!(!s.complete_refresh(t, Err("timeout")));
		assert_eq!(s.data(), &mock_data::graph());
		assert_eq!(s.phase(), Phase::Ready);
	}

	#[test]
	fn hit_test_prefers_topmost_and_honors_filter() {
		let mut s = ready_state();
		// Lazarus Group: (400, 300), size 60.
		assert_eq!(s.node_at_position(420.0, 300.0), Some(1));
		assert_eq!(s.node_at_position(0.0, 0.0), None);

		s.set_filter(EntityFilter::new("proxy", vec![]));
		assert_eq!(s.node_at_position(400.0, 300.0), None);
		assert_eq!(s.node_at_position(100.0, 300.0), Some(6));
	}

	#[test]
	fn release_pointer_ends_drag_and_pan() {
		let mut s = ready_state();
		assert!(s.begin_drag(3, (10.0, 10.0)));
		s.begin_pan(10.0, 10.0);
		assert!(s.is_panning());
		let before = s.data().clone();
		let view = s.transform();

		s.release_pointer();
		assert_eq!(s.phase(), Phase::Ready);
		assert_eq!(s.dragging(), None);
		assert!(!s.is_panning());

		assert!(!s.update_drag((500.0, 500.0)));
		assert!(!s.update_pan(500.0, 500.0));
		assert_eq!(s.data(), &before);
		assert_eq!(s.transform(), view);
		assert_eq!(s.selected(), Some(3));
	}

	#[test]
	fn select_unknown_id_clears() {
		let mut s = ready_state();
		s.select(Some(4));
		assert_eq!(s.selected_entity().map(|e| e.label.as_str()), Some("Finance Dept"));
		s.select(Some(404));
		assert_eq!(s.selected(), None);
	}

	#[test]
	fn stale_responses_dropped_only_when_fenced() {
		let mut newer = mock_data::graph();
		newer.entities.truncate(2);

		let mut s = EntityGraphState::new(GraphConfig::default(), 800.0, 600.0);
		let first = s.begin_refresh();
		let second = s.begin_refresh();
		s.complete_refresh::<String>(second, Ok(newer.clone()));
		assert!(s.complete_refresh::<String>(first, Ok(mock_data::graph())));
		assert_eq!(s.data().entities.len(), 7);

		let config = GraphConfig {
			discard_stale_refreshes: true,
			..GraphConfig::default()
		};
		let mut s = EntityGraphState::new(config, 800.0, 600.0);
		let first = s.begin_refresh();
		let second = s.begin_refresh();
		s.complete_refresh::<String>(second, Ok(newer));
		assert!(!s.complete_refresh::<String>(first, Ok(mock_data::graph())));
		assert_eq!(s.data().entities.len(), 2);
		assert!(!s.is_loading());
	}
}
