//! The change-tracking contract consumed by the command pipeline.
mod entity_state;
mod entry;

pub use entity_state::EntityState;
pub use entry::{ChangeEntry, TrackedEntry};
