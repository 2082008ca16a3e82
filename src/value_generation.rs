//! Client-side value generation.
//!
//! Generators supply values for store-generated properties before a row is
//! queued, either final values (UUIDs) or temporary placeholders the store
//! later replaces. Generator instances are cached per property and concrete
//! entity type and shared across concurrent save operations.
mod cache;
mod generators;
mod selector;

pub use cache::ValueGeneratorCache;
pub use generators::{
    GuidValueGenerator, SequentialGuidValueGenerator, TemporaryIntegerValueGenerator,
    ValueGenerator,
};
pub use selector::ValueGeneratorSelector;
