//! Pannable, zoomable entity graph with draggable nodes.

mod component;
pub mod drag;
pub mod filter;
pub mod layout;
mod render;
pub mod state;
mod types;
pub mod viewport;

pub use component::EntityGraph;
pub use filter::{EntityFilter, filter_entities, filter_links};
pub use layout::{Bounds, fit_transform};
pub use state::{EntityGraphState, Phase, RefreshTicket};
pub use types::{Entity, EntityKind, GraphData, Link};
pub use viewport::ViewTransform;
