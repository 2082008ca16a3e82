//! Row-level modification commands and their ordering.
//!
//! A save operation feeds tracked entries into a [`CommandSet`], which groups
//! them into one [`ModificationCommand`] per target row. Commands are sorted
//! with the [`ModificationCommandComparer`] and cut into [`CommandBatch`]es;
//! each command exposes its [`ColumnModification`]s to the SQL generator.

mod batch;
mod column_modification;
mod command_set;
mod comparer;
mod modification_command;
mod parameter_names;

pub use batch::{CommandBatch, batch_commands};
pub use column_modification::ColumnModification;
pub use command_set::CommandSet;
pub use comparer::ModificationCommandComparer;
pub use modification_command::{GeneratedValue, ModificationCommand};
pub use parameter_names::ParameterNameGenerator;
