use threat_graph_canvas::components::entity_graph::{
	EntityFilter, EntityGraphState, EntityKind, Phase, filter_entities, fit_transform,
};
use threat_graph_canvas::config::GraphConfig;
use threat_graph_canvas::services::mock_data;

const EPS: f64 = 1e-9;

fn loaded(width: f64, height: f64) -> EntityGraphState {
	let mut state = EntityGraphState::new(GraphConfig::default(), width, height);
	let ticket = state.begin_refresh();
	assert!(state.complete_refresh::<String>(ticket, Ok(mock_data::graph())));
	state
}

#[test]
fn fixture_is_centered_inside_padded_viewport() {
	let mut state = loaded(800.0, 600.0);
	assert!(state.recenter());
	let t = state.transform();

	// Bounds of the fixture, radius included: x 85..720, y 130..475.
	let expected_k = (700.0_f64 / 635.0).min(500.0 / 345.0).clamp(0.5, 2.0);
	assert!((t.k - expected_k).abs() < EPS);

	for e in &state.data().entities {
		let (sx, sy) = t.graph_to_screen(e.x, e.y);
		let r = e.radius() * t.k;
		assert!(sx - r >= 50.0 - EPS && sx + r <= 750.0 + EPS, "{} out of x range", e.label);
		assert!(sy - r >= 50.0 - EPS && sy + r <= 550.0 + EPS, "{} out of y range", e.label);
	}
}

#[test]
fn recenter_on_empty_graph_keeps_transform() {
	let mut state = EntityGraphState::new(GraphConfig::default(), 800.0, 600.0);
	state.set_transform(1.5, 12.0, 34.0);
	assert!(!state.recenter());
	let t = state.transform();
	assert_eq!((t.k, t.x, t.y), (1.5, 12.0, 34.0));
}

#[test]
fn refresh_drops_stale_selection_and_drag() {
	let mut state = loaded(800.0, 600.0);
	assert!(state.begin_drag(7, (700.0, 300.0)));
	assert_eq!(state.phase(), Phase::Dragging);

	let mut next = mock_data::graph();
	next.entities.retain(|e| e.id != 7);
	next.links.retain(|l| l.source != 7 && l.target != 7);

	let ticket = state.begin_refresh();
	assert!(state.complete_refresh::<String>(ticket, Ok(next)));
	assert_eq!(state.selected(), None);
	assert_eq!(state.dragging(), None);
	assert_eq!(state.phase(), Phase::Ready);
	assert!(!state.update_drag((10.0, 10.0)));
}

#[test]
fn refresh_landing_mid_drag_keeps_drag_when_node_survives() {
	let mut state = loaded(800.0, 600.0);
	state.begin_drag(2, (250.0, 150.0));

	let ticket = state.begin_refresh();
	state.complete_refresh::<String>(ticket, Ok(mock_data::graph()));
	assert_eq!(state.dragging(), Some(2));

	assert!(state.update_drag((300.0, 310.0)));
	let e = state.data().entity(2).unwrap();
	assert_eq!((e.x, e.y), (300.0, 310.0));
}

#[test]
fn drag_under_identity_transform_moves_one_node() {
	let mut state = loaded(800.0, 600.0);
	let before = state.data().clone();

	state.begin_drag(5, (550.0, 450.0));
	state.update_drag((100.0, 50.0));
	state.end_drag();

	for (now, was) in state.data().entities.iter().zip(&before.entities) {
		if now.id == 5 {
			assert_eq!((now.x, now.y), (100.0, 50.0));
		} else {
			assert_eq!(now, was);
		}
	}
	assert_eq!(state.data().links, before.links);
	assert_eq!(state.selected(), Some(5));
}

#[test]
fn visible_projection_follows_filter() {
	let mut state = loaded(800.0, 600.0);
	assert_eq!(state.visible_entities(), state.data().entities);

	state.set_filter(EntityFilter::new("", vec![EntityKind::Domain]));
	let (entities, links) = state.visible();
	let labels: Vec<&str> = entities.iter().map(|e| e.label.as_str()).collect();
	assert_eq!(labels, vec!["malware.bin", "C2 Server"]);
	assert_eq!(links, state.visible_links());
	assert_eq!(links.len(), 1);
}

#[test]
fn fitting_a_lone_entity_centers_it_at_max_zoom() {
	let lone = filter_entities(&mock_data::entities(), &EntityFilter::new("lazarus", vec![]));
	assert_eq!(lone.len(), 1);
	let t = fit_transform(&lone, 800.0, 600.0, 50.0).unwrap();
	let (sx, sy) = t.graph_to_screen(400.0, 300.0);
	assert!((sx - 400.0).abs() < EPS && (sy - 300.0).abs() < EPS);
	assert_eq!(t.k, 2.0);
}
