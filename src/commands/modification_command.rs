//! Submodule defining the row-level modification command.

use core::fmt;

use hashbrown::HashSet;

use super::column_modification::{ColumnModification, ColumnRoles, unresolved_temporary};
use crate::{ChangeEntry, EntityState, Error, Property, TableId, TypeMapping, Value};

/// One INSERT, UPDATE or DELETE against one row of one table.
///
/// A command aggregates every entry mapped to the same row (several entity
/// types share a row under table splitting). Its column modifications are
/// computed on first read and recomputed on the next read after an entry is
/// added.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use modification_commands::{
///     EntityState, EntityType, ModificationCommand, ParameterNameGenerator, Property,
///     TrackedEntry, ValueGenerated, ValueKind, default_type_mapping,
/// };
///
/// let blog = Arc::new(
///     EntityType::new("Blog", "Blogs")
///         .property(Property::new("Id", ValueKind::Integer).key().generated(ValueGenerated::OnAdd))
///         .property(Property::new("Url", ValueKind::Text)),
/// );
/// let entry = TrackedEntry::new(blog, EntityState::Added)
///     .with_value("Url", "http://example.com").unwrap();
/// entry.set_temporary_value("Id", -1i64).unwrap();
///
/// let mut names = ParameterNameGenerator::new();
/// let mut command =
///     ModificationCommand::new("Blogs", None, move || names.generate_next(), default_type_mapping)
///         .unwrap();
/// command.add_entry(&entry).unwrap();
///
/// let columns = command.column_modifications().unwrap();
/// assert!(columns[0].is_read());
/// assert_eq!(columns[1].parameter_name(), Some("p0"));
/// assert!(command.requires_result_propagation().unwrap());
/// ```
pub struct ModificationCommand<'e> {
    table: TableId,
    entries: Vec<&'e dyn ChangeEntry>,
    state: EntityState,
    generate_parameter_name: Box<dyn FnMut() -> String + 'e>,
    type_mapper: Box<dyn Fn(&Property) -> TypeMapping + 'e>,
    /// `None` until computed, and again after every `add_entry`.
    column_modifications: Option<Vec<ColumnModification<'e>>>,
}

impl fmt::Debug for ModificationCommand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModificationCommand")
            .field("table", &self.table)
            .field("state", &self.state)
            .field("entries", &self.entries)
            .field("column_modifications", &self.column_modifications)
            .finish_non_exhaustive()
    }
}

impl<'e> ModificationCommand<'e> {
    /// Create an empty command for a table.
    ///
    /// # Arguments
    ///
    /// * `table` - The table name.
    /// * `schema` - The schema, if any.
    /// * `generate_parameter_name` - Returns the next unique parameter name.
    /// * `type_mapper` - Maps a property to its value-binding information.
    ///
    /// # Errors
    ///
    /// * `EmptyTableName` - If `table` is empty.
    pub fn new(
        table: &str,
        schema: Option<&str>,
        generate_parameter_name: impl FnMut() -> String + 'e,
        type_mapper: impl Fn(&Property) -> TypeMapping + 'e,
    ) -> Result<Self, Error> {
        if table.is_empty() {
            return Err(Error::EmptyTableName);
        }
        Ok(Self {
            table: TableId::new(schema, table),
            entries: Vec::new(),
            state: EntityState::Unchanged,
            generate_parameter_name: Box::new(generate_parameter_name),
            type_mapper: Box::new(type_mapper),
            column_modifications: None,
        })
    }

    /// Identity of the target table.
    #[inline]
    #[must_use]
    pub fn table_id(&self) -> &TableId {
        &self.table
    }

    /// The target table name.
    #[inline]
    #[must_use]
    pub fn table_name(&self) -> &str {
        self.table.table()
    }

    /// The target schema.
    #[inline]
    #[must_use]
    pub fn schema(&self) -> Option<&str> {
        self.table.schema()
    }

    /// The state resolved across all entries.
    ///
    /// `Unchanged` until the first entry is added.
    #[inline]
    #[must_use]
    pub fn entity_state(&self) -> EntityState {
        self.state
    }

    /// The entries in the order they were added.
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[&'e dyn ChangeEntry] {
        &self.entries
    }

    /// Add an entry mapped to this command's row.
    ///
    /// The first entry decides the command's state. A Modified entry joins an
    /// Added or Deleted command (and an Added or Deleted entry upgrades a
    /// Modified command); Added and Deleted never mix.
    ///
    /// # Errors
    ///
    /// * `InvalidEntityState` - If the entry is Unchanged or Detached.
    /// * `TableMismatch` - If the entry's type maps to another table.
    /// * `ConflictingEntityStates` - If the entry's state cannot be reconciled
    ///   with the command's state.
    pub fn add_entry(&mut self, entry: &'e dyn ChangeEntry) -> Result<&mut Self, Error> {
        let added = entry.entity_state();
        if !added.has_statement() {
            return Err(Error::InvalidEntityState(added));
        }
        let table = entry.entity_type().table_id();
        if *table != self.table {
            return Err(Error::TableMismatch {
                expected: self.table.to_string(),
                actual: table.to_string(),
            });
        }

        self.state = if self.entries.is_empty() {
            added
        } else {
            reconcile(self.state, added)?
        };
        self.entries.push(entry);
        self.column_modifications = None;
        Ok(self)
    }

    /// The column modifications, computed if needed.
    ///
    /// Entries are visited in the order they were added and their properties
    /// in declaration order; a column shared by several entries is emitted
    /// once, for the first entry mapping it.
    ///
    /// # Errors
    ///
    /// * `UnresolvedTemporaryValue` - If a column would send a temporary
    ///   placeholder to the store. Nothing is cached in that case.
    pub fn column_modifications(&mut self) -> Result<&[ColumnModification<'e>], Error> {
        let columns = match self.column_modifications.take() {
            Some(columns) => columns,
            None => self.generate_column_modifications()?,
        };
        Ok(self.column_modifications.insert(columns).as_slice())
    }

    /// Whether store-generated values must be read back after execution.
    ///
    /// Deletes never propagate results.
    ///
    /// # Errors
    ///
    /// * `UnresolvedTemporaryValue` - See [`column_modifications`](Self::column_modifications).
    pub fn requires_result_propagation(&mut self) -> Result<bool, Error> {
        if self.state == EntityState::Deleted {
            return Ok(false);
        }
        Ok(self
            .column_modifications()?
            .iter()
            .any(ColumnModification::is_read))
    }

    /// Pair a row read back from the store with the command's read columns.
    ///
    /// `row` holds one value per read column, in column order. The returned
    /// values are handed to the change tracker; the command does not write
    /// to entries.
    ///
    /// # Errors
    ///
    /// * `UnresolvedTemporaryValue` - See [`column_modifications`](Self::column_modifications).
    /// * `ResultArityMismatch` - If `row` does not have one value per read column.
    pub fn propagate_results(&mut self, row: &[Value]) -> Result<Vec<GeneratedValue<'e>>, Error> {
        let read: Vec<&ColumnModification<'e>> = if self.state == EntityState::Deleted {
            Vec::new()
        } else {
            self.column_modifications()?
                .iter()
                .filter(|c| c.is_read())
                .collect()
        };
        if read.len() != row.len() {
            return Err(Error::ResultArityMismatch {
                expected: read.len(),
                actual: row.len(),
            });
        }

        Ok(read
            .into_iter()
            .zip(row)
            .map(|(column, value)| GeneratedValue {
                entry: column.entry(),
                property: column.property(),
                value: value.clone(),
            })
            .collect())
    }

    fn generate_column_modifications(&mut self) -> Result<Vec<ColumnModification<'e>>, Error> {
        let mut seen: HashSet<&'e str> = HashSet::new();
        let mut participating = Vec::new();

        // Every column is checked before any parameter name is drawn, so a
        // failure leaves the shared name sequence untouched.
        for (entry_index, &entry) in self.entries.iter().enumerate() {
            for property in entry.entity_type().properties() {
                let roles = ColumnRoles::derive(self.state, entry, property);
                if !roles.participates() || !seen.insert(property.column_name()) {
                    continue;
                }
                if roles.is_write && entry.is_temporary(property) {
                    return Err(unresolved_temporary(entry, property));
                }
                participating.push((entry_index, entry, property, roles));
            }
        }

        let columns: Vec<ColumnModification<'e>> = participating
            .into_iter()
            .map(|(entry_index, entry, property, roles)| {
                let parameter_name = roles
                    .binds_current_value()
                    .then(|| (self.generate_parameter_name)());
                let original_parameter_name = roles
                    .binds_original_value()
                    .then(|| (self.generate_parameter_name)());
                ColumnModification::new(
                    entry,
                    entry_index,
                    property,
                    (self.type_mapper)(property),
                    roles,
                    parameter_name,
                    original_parameter_name,
                )
            })
            .collect();

        tracing::trace!(
            table = %self.table,
            state = %self.state,
            columns = columns.len(),
            "computed column modifications"
        );
        Ok(columns)
    }
}

fn reconcile(current: EntityState, added: EntityState) -> Result<EntityState, Error> {
    match (current, added) {
        (current, added) if current == added => Ok(current),
        (EntityState::Modified, other) | (other, EntityState::Modified) => Ok(other),
        (current, added) => Err(Error::ConflictingEntityStates { current, added }),
    }
}

/// A store-generated value to be written back into a tracked entry.
#[derive(Debug, Clone)]
pub struct GeneratedValue<'e> {
    entry: &'e dyn ChangeEntry,
    property: &'e Property,
    value: Value,
}

impl<'e> GeneratedValue<'e> {
    /// The entry receiving the value.
    #[inline]
    #[must_use]
    pub fn entry(&self) -> &'e dyn ChangeEntry {
        self.entry
    }

    /// The property receiving the value.
    #[inline]
    #[must_use]
    pub fn property(&self) -> &'e Property {
        self.property
    }

    /// The value produced by the store.
    #[inline]
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Consumes self and returns the value.
    #[inline]
    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }
}
