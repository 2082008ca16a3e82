#![doc = include_str!("../README.md")]
#![deny(clippy::mod_module_files)]

pub mod commands;
pub mod errors;
pub mod metadata;
pub mod options;
pub mod tracking;
pub mod value;
pub mod value_generation;

// Re-export main types
pub use commands::{
    ColumnModification, CommandBatch, CommandSet, GeneratedValue, ModificationCommand,
    ModificationCommandComparer, ParameterNameGenerator, batch_commands,
};
pub use metadata::{
    EntityType, Property, TableId, TypeMapping, ValueGenerated, ValueKind, default_type_mapping,
};
pub use options::BatchOptions;
pub use tracking::{ChangeEntry, EntityState, TrackedEntry};
pub use value::Value;
pub use value_generation::{
    GuidValueGenerator, SequentialGuidValueGenerator, TemporaryIntegerValueGenerator,
    ValueGenerator, ValueGeneratorCache, ValueGeneratorSelector,
};

// Re-export errors
pub use errors::Error;
