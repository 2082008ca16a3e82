//! Submodule defining the errors used across the crate.

use crate::tracking::EntityState;

/// Errors raised while building or reading modification commands.
///
/// Every variant is a contract violation by the caller: none of them are
/// transient and none should be retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A command was created for an empty table name.
    #[error("Table name of a modification command must not be empty")]
    EmptyTableName,
    /// An entry whose state has no DML statement was added to a command.
    #[error("invalid entity state for a modification command: {0}")]
    InvalidEntityState(EntityState),
    /// Entries mapped to the same row disagree on the statement to run.
    #[error("Cannot add a {added} entry to a modification command that is already {current}")]
    ConflictingEntityStates {
        /// The state already resolved for the command.
        current: EntityState,
        /// The state of the entry being added.
        added: EntityState,
    },
    /// An entry mapped to another table was added to a command.
    #[error("Cannot add an entry for table '{actual}' to a modification command for table '{expected}'")]
    TableMismatch {
        /// The command's table.
        expected: String,
        /// The table the entry's type maps to.
        actual: String,
    },
    /// A temporary placeholder value was about to be bound or reported.
    #[error(
        "The temporary value for property '{property}' of entity type '{entity_type}' has not been resolved"
    )]
    UnresolvedTemporaryValue {
        /// Name of the entity type owning the property.
        entity_type: String,
        /// Name of the property holding the temporary.
        property: String,
    },
    /// A property name does not belong to the entry's entity type.
    #[error("Entity type '{entity_type}' has no property named '{property}'")]
    UnknownProperty {
        /// Name of the entity type searched.
        entity_type: String,
        /// The property name that was not found.
        property: String,
    },
    /// A row read back from the store does not match the command's read columns.
    #[error("Expected {expected} store-generated values to propagate, got {actual}")]
    ResultArityMismatch {
        /// Number of read columns in the command.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },
}
