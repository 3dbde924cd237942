use std::collections::HashMap;
use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::EntityGraphState;
use super::types::{Entity, EntityKind};
use crate::config::Theme;

const MATRIX_GREEN: &str = "#00ff41";

struct Palette {
	background: &'static str,
	link: &'static str,
	label: &'static str,
	ring: &'static str,
}

fn palette(theme: Theme) -> Palette {
	match theme {
		Theme::Standard => Palette {
			background: "#0f172a",
			link: "rgba(71, 85, 105, 0.6)",
			label: "#94a3b8",
			ring: "#ffffff",
		},
		Theme::Matrix => Palette {
			background: "#000000",
			link: "rgba(0, 51, 0, 0.6)",
			label: MATRIX_GREEN,
			ring: MATRIX_GREEN,
		},
	}
}

pub fn node_color(kind: EntityKind, theme: Theme) -> &'static str {
	match theme {
		Theme::Matrix => MATRIX_GREEN,
		Theme::Standard => kind.color(),
	}
}

pub fn render(state: &EntityGraphState, ctx: &CanvasRenderingContext2d, theme: Theme) {
	let colors = palette(theme);
	ctx.set_fill_style_str(colors.background);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	let (entities, links) = state.visible();
	let t = state.transform();
	ctx.save();
	let _ = ctx.translate(t.x, t.y);
	let _ = ctx.scale(t.k, t.k);

	// Endpoints come from live positions every frame so dragged nodes pull
	// their links along.
	let by_id: HashMap<i64, &Entity> = entities.iter().map(|e| (e.id, e)).collect();
	ctx.set_stroke_style_str(colors.link);
	ctx.set_line_width(2.0);
	for link in &links {
		let (Some(a), Some(b)) = (by_id.get(&link.source), by_id.get(&link.target)) else {
			continue;
		};
		ctx.begin_path();
		ctx.move_to(a.x, a.y);
		ctx.line_to(b.x, b.y);
		ctx.stroke();
	}

	for entity in &entities {
		draw_node(state, ctx, entity, theme, &colors);
	}
	ctx.restore();
}

fn draw_node(
	state: &EntityGraphState,
	ctx: &CanvasRenderingContext2d,
	entity: &Entity,
	theme: Theme,
	colors: &Palette,
) {
	let (x, y, r) = (entity.x, entity.y, entity.radius());
	let selected = state.selected() == Some(entity.id);
	let hovered = state.hovered() == Some(entity.id);

	ctx.set_global_alpha(if hovered && !selected { 0.8 } else { 1.0 });
	ctx.begin_path();
	let _ = ctx.arc(x, y, r, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(node_color(entity.kind, theme));
	ctx.fill();
	ctx.set_global_alpha(1.0);

	if selected {
		ctx.set_stroke_style_str(colors.ring);
		ctx.set_line_width(3.0);
		ctx.stroke();

		ctx.begin_path();
		let _ = ctx.arc(x, y, r + 5.0, 0.0, 2.0 * PI);
		ctx.set_line_width(1.0);
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(4.0),
			&JsValue::from_f64(4.0),
		));
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());
	}

	ctx.set_fill_style_str(colors.label);
	ctx.set_font("bold 12px sans-serif");
	ctx.set_text_align("center");
	let _ = ctx.fill_text(&entity.label, x, y + r + 15.0);
}
