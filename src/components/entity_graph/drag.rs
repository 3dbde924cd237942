use super::types::GraphData;
use super::viewport::ViewTransform;

/// Which entity, if any, the pointer is currently holding.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragController {
	#[default]
	Idle,
	Dragging {
		id: i64,
		/// Last pointer position, screen space.
		pointer: (f64, f64),
	},
}

impl DragController {
	pub fn is_active(&self) -> bool {
		matches!(self, DragController::Dragging { .. })
	}

	pub fn node_id(&self) -> Option<i64> {
		match self {
			DragController::Idle => None,
			DragController::Dragging { id, .. } => Some(*id),
		}
	}

	/// Grabs `id`. Refused when the entity is not in `data`.
	pub fn begin(&mut self, data: &GraphData, id: i64, pointer: (f64, f64)) -> bool {
		if !data.contains(id) {
			return false;
		}
		*self = DragController::Dragging { id, pointer };
		true
	}

	/// Moves the held entity under the pointer. Only that entity's
	/// coordinates change. Falls back to idle if it vanished from `data`.
	pub fn update(
		&mut self,
		data: &mut GraphData,
		transform: &ViewTransform,
		pointer: (f64, f64),
	) -> bool {
		let DragController::Dragging { id, .. } = *self else {
			return false;
		};
		let (gx, gy) = transform.screen_to_graph(pointer.0, pointer.1);
		if !(gx.is_finite() && gy.is_finite()) {
			return false;
		}
		let Some(entity) = data.entities.iter_mut().find(|e| e.id == id) else {
			*self = DragController::Idle;
			return false;
		};
		entity.x = gx;
		entity.y = gy;
		*self = DragController::Dragging { id, pointer };
		true
	}

	pub fn end(&mut self) {
		*self = DragController::Idle;
	}
}

/// Background drag that translates the view.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

impl PanState {
	pub fn begin(&mut self, transform: &ViewTransform, x: f64, y: f64) {
		self.active = true;
		self.start_x = x;
		self.start_y = y;
		self.transform_start_x = transform.x;
		self.transform_start_y = transform.y;
	}

	pub fn update(&self, transform: &mut ViewTransform, x: f64, y: f64) -> bool {
		if !self.active {
			return false;
		}
		transform.set(
			transform.k,
			self.transform_start_x + (x - self.start_x),
			self.transform_start_y + (y - self.start_y),
		)
	}

	pub fn end(&mut self) {
		self.active = false;
	}
}
