//! Model metadata consumed by the command pipeline.
//!
//! Entity types map onto physical tables; their properties carry the column
//! mapping, key and concurrency-token membership, and value-generation policy
//! from which column roles are derived.
mod entity_type;
mod property;
mod type_mapping;

pub use entity_type::{EntityType, TableId};
pub use property::{Property, ValueGenerated, ValueKind};
pub use type_mapping::{TypeMapping, default_type_mapping};
