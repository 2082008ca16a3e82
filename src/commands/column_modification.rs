//! Submodule defining the per-column view of a modification command.

use crate::{ChangeEntry, EntityState, Error, Property, TypeMapping, Value, ValueGenerated};

/// The roles a column plays in one row-level statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct ColumnRoles {
    pub(crate) is_key: bool,
    pub(crate) is_condition: bool,
    pub(crate) is_read: bool,
    pub(crate) is_write: bool,
}

impl ColumnRoles {
    /// Derive the roles of `property` for a command resolved to `state`.
    ///
    /// The value-generation policy is the only source of truth for whether
    /// the store produces a value.
    pub(crate) fn derive(state: EntityState, entry: &dyn ChangeEntry, property: &Property) -> Self {
        let is_key = property.is_key();
        match state {
            EntityState::Added => {
                let supplied = !entry.is_temporary(property)
                    && !entry.current_value(property).is_default();
                let is_read = property.is_store_generated() && !supplied;
                Self {
                    is_key,
                    is_condition: false,
                    is_read,
                    is_write: !is_read,
                }
            }
            EntityState::Modified => {
                let is_read =
                    !is_key && property.value_generated() == ValueGenerated::OnAddOrUpdate;
                Self {
                    is_key,
                    is_condition: is_key || property.is_concurrency_token(),
                    is_read,
                    is_write: !is_key && !is_read && entry.is_modified(property),
                }
            }
            EntityState::Deleted => Self {
                is_key,
                is_condition: is_key || property.is_concurrency_token(),
                is_read: false,
                is_write: false,
            },
            EntityState::Unchanged | EntityState::Detached => Self::default(),
        }
    }

    /// Whether the column appears in the statement at all.
    pub(crate) fn participates(self) -> bool {
        self.is_key || self.is_condition || self.is_read || self.is_write
    }

    /// Written values and key conditions bind the current value.
    pub(crate) fn binds_current_value(self) -> bool {
        self.is_write || (self.is_condition && self.is_key)
    }

    /// Concurrency checks compare against the value last read from the store.
    pub(crate) fn binds_original_value(self) -> bool {
        self.is_condition && !self.is_key
    }
}

/// One column's participation in a single-row INSERT, UPDATE or DELETE.
///
/// A column modification holds a reference to the entry it came from and
/// reads values from it at access time, so changes made to the entry after
/// the command was built are observed without rebuilding the command.
#[derive(Debug, Clone)]
pub struct ColumnModification<'e> {
    entry: &'e dyn ChangeEntry,
    entry_index: usize,
    property: &'e Property,
    type_mapping: TypeMapping,
    roles: ColumnRoles,
    parameter_name: Option<String>,
    original_parameter_name: Option<String>,
}

impl<'e> ColumnModification<'e> {
    pub(crate) fn new(
        entry: &'e dyn ChangeEntry,
        entry_index: usize,
        property: &'e Property,
        type_mapping: TypeMapping,
        roles: ColumnRoles,
        parameter_name: Option<String>,
        original_parameter_name: Option<String>,
    ) -> Self {
        Self {
            entry,
            entry_index,
            property,
            type_mapping,
            roles,
            parameter_name,
            original_parameter_name,
        }
    }

    /// The column name.
    #[inline]
    #[must_use]
    pub fn column_name(&self) -> &'e str {
        self.property.column_name()
    }

    /// The mapped property.
    #[inline]
    #[must_use]
    pub fn property(&self) -> &'e Property {
        self.property
    }

    /// The entry the column was taken from.
    #[inline]
    #[must_use]
    pub fn entry(&self) -> &'e dyn ChangeEntry {
        self.entry
    }

    /// Position of [`entry`](Self::entry) within the command's entries.
    #[inline]
    #[must_use]
    pub fn entry_index(&self) -> usize {
        self.entry_index
    }

    /// How the value is bound.
    #[inline]
    #[must_use]
    pub fn type_mapping(&self) -> &TypeMapping {
        &self.type_mapping
    }

    /// Whether the column is part of the primary key.
    #[inline]
    #[must_use]
    pub fn is_key(&self) -> bool {
        self.roles.is_key
    }

    /// Whether the column appears in the WHERE clause.
    #[inline]
    #[must_use]
    pub fn is_condition(&self) -> bool {
        self.roles.is_condition
    }

    /// Whether the store generates the value and it must be read back.
    #[inline]
    #[must_use]
    pub fn is_read(&self) -> bool {
        self.roles.is_read
    }

    /// Whether the current value is sent to the store.
    #[inline]
    #[must_use]
    pub fn is_write(&self) -> bool {
        self.roles.is_write
    }

    /// Parameter bound to the current value, if any.
    #[inline]
    #[must_use]
    pub fn parameter_name(&self) -> Option<&str> {
        self.parameter_name.as_deref()
    }

    /// Parameter bound to the original value of a concurrency check, if any.
    #[inline]
    #[must_use]
    pub fn original_parameter_name(&self) -> Option<&str> {
        self.original_parameter_name.as_deref()
    }

    /// Whether the statement binds the current value.
    #[inline]
    #[must_use]
    pub fn use_current_value_parameter(&self) -> bool {
        self.parameter_name.is_some()
    }

    /// Whether the statement binds the original value.
    #[inline]
    #[must_use]
    pub fn use_original_value_parameter(&self) -> bool {
        self.original_parameter_name.is_some()
    }

    /// The entry's current value for the column.
    ///
    /// # Errors
    ///
    /// * `UnresolvedTemporaryValue` - If the entry still holds a temporary
    ///   placeholder for the property.
    pub fn value(&self) -> Result<Value, Error> {
        if self.entry.is_temporary(self.property) {
            return Err(unresolved_temporary(self.entry, self.property));
        }
        Ok(self.entry.current_value(self.property))
    }

    /// The entry's original value for the column.
    #[must_use]
    pub fn original_value(&self) -> Value {
        self.entry.original_value(self.property)
    }
}

pub(crate) fn unresolved_temporary(entry: &dyn ChangeEntry, property: &Property) -> Error {
    Error::UnresolvedTemporaryValue {
        entity_type: entry.entity_type().name().to_owned(),
        property: property.name().to_owned(),
    }
}
