//! Grouping builder turning a unit of work into modification commands.
//!
//! Entries are grouped by the row they target: entries for the same table
//! and the same primary key values share one command. Commands keep the
//! order in which their row was first seen until they are sorted.

use core::cell::RefCell;
use core::fmt;
use std::rc::Rc;

use indexmap::IndexMap as IndexMapRaw;

use super::{CommandBatch, ModificationCommand, ModificationCommandComparer, ParameterNameGenerator};
use crate::{
    BatchOptions, ChangeEntry, EntityState, Error, Property, TableId, TypeMapping, Value,
    default_type_mapping,
};

/// `IndexMap` alias using hashbrown's default hasher.
type IndexMap<K, V> = IndexMapRaw<K, V, hashbrown::DefaultHashBuilder>;

/// The row a command targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum RowKey {
    /// A row identified by its table and key values.
    Keyed { table: TableId, key: Vec<Value> },
    /// A row whose key is still to be generated by the store; never shared.
    Unkeyed(usize),
}

/// Builder collecting the entries of one save operation into commands.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use modification_commands::{
///     BatchOptions, CommandSet, EntityState, EntityType, Property, TrackedEntry, ValueKind,
/// };
///
/// let post = Arc::new(
///     EntityType::new("Post", "Posts")
///         .property(Property::new("Id", ValueKind::Integer).key())
///         .property(Property::new("Title", ValueKind::Text)),
/// );
/// let a = TrackedEntry::new(post.clone(), EntityState::Deleted).with_value("Id", 1i64).unwrap();
/// let b = TrackedEntry::new(post, EntityState::Added).with_value("Id", 2i64).unwrap();
///
/// let mut set = CommandSet::new(&BatchOptions::default());
/// set.add(&a).unwrap().add(&b).unwrap();
///
/// let commands = set.into_sorted_commands();
/// assert_eq!(commands[0].entity_state(), EntityState::Added);
/// assert_eq!(commands[1].entity_state(), EntityState::Deleted);
/// ```
pub struct CommandSet<'e> {
    commands: IndexMap<RowKey, ModificationCommand<'e>>,
    parameter_names: Rc<RefCell<ParameterNameGenerator>>,
    type_mapper: Rc<dyn Fn(&Property) -> TypeMapping + 'e>,
    options: BatchOptions,
    unkeyed: usize,
}

impl fmt::Debug for CommandSet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSet")
            .field("commands", &self.commands)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<'e> CommandSet<'e> {
    /// Create an empty set using the default type mapping.
    #[must_use]
    pub fn new(options: &BatchOptions) -> Self {
        Self {
            commands: IndexMap::default(),
            parameter_names: Rc::new(RefCell::new(ParameterNameGenerator::with_prefix(
                options.parameter_prefix.clone(),
            ))),
            type_mapper: Rc::new(default_type_mapping),
            options: options.clone(),
            unkeyed: 0,
        }
    }

    /// Replace the type mapping used by commands created afterwards.
    #[must_use]
    pub fn with_type_mapper(mut self, type_mapper: impl Fn(&Property) -> TypeMapping + 'e) -> Self {
        self.type_mapper = Rc::new(type_mapper);
        self
    }

    /// Returns true if no entry was added.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Returns the number of commands.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Commands in first-seen order.
    pub fn commands(&self) -> impl Iterator<Item = &ModificationCommand<'e>> {
        self.commands.values()
    }

    fn row_key(&mut self, entry: &dyn ChangeEntry) -> RowKey {
        let key = entry.key_values();
        if key.is_empty() || awaits_store_key(entry) {
            self.unkeyed += 1;
            return RowKey::Unkeyed(self.unkeyed);
        }
        RowKey::Keyed {
            table: entry.entity_type().table_id().clone(),
            key,
        }
    }

    fn create_command(&self, table: &TableId) -> Result<ModificationCommand<'e>, Error> {
        let names = Rc::clone(&self.parameter_names);
        let mapper = Rc::clone(&self.type_mapper);
        tracing::debug!(table = %table, "creating modification command");
        ModificationCommand::new(
            table.table(),
            table.schema(),
            move || names.borrow_mut().generate_next(),
            // `Rc<dyn Fn>` does not implement `Fn` itself.
            move |property| mapper(property),
        )
    }

    /// Add an entry to the command for its row, creating the command on first sight.
    ///
    /// # Errors
    ///
    /// Any error of [`ModificationCommand::add_entry`]. A failed add leaves no
    /// empty command behind.
    pub fn add(&mut self, entry: &'e dyn ChangeEntry) -> Result<&mut Self, Error> {
        let state = entry.entity_state();
        if !state.has_statement() {
            return Err(Error::InvalidEntityState(state));
        }

        let row = self.row_key(entry);
        if let Some(command) = self.commands.get_mut(&row) {
            command.add_entry(entry)?;
        } else {
            let mut command = self.create_command(entry.entity_type().table_id())?;
            command.add_entry(entry)?;
            self.commands.insert(row, command);
        }
        Ok(self)
    }

    /// Add every entry in order, skipping Unchanged and Detached ones.
    ///
    /// # Errors
    ///
    /// The first error of [`add`](Self::add); entries before it stay added.
    pub fn extend<I>(&mut self, entries: I) -> Result<&mut Self, Error>
    where
        I: IntoIterator<Item = &'e dyn ChangeEntry>,
    {
        for entry in entries {
            if entry.entity_state().has_statement() {
                self.add(entry)?;
            }
        }
        Ok(self)
    }

    /// Consumes the set and returns its commands sorted for batching.
    #[must_use]
    pub fn into_sorted_commands(self) -> Vec<ModificationCommand<'e>> {
        let mut commands: Vec<_> = self.commands.into_values().collect();
        ModificationCommandComparer.sort(&mut commands);
        tracing::debug!(commands = commands.len(), "sorted modification commands");
        commands
    }

    /// Consumes the set and returns its commands cut into batches.
    #[must_use]
    pub fn into_batches(self) -> Vec<CommandBatch<'e>> {
        let options = self.options.clone();
        super::batch_commands(self.into_sorted_commands(), &options)
    }
}

/// Whether an Added entry still waits for the store to produce part of its key.
///
/// Such a row has no identity yet: a default key value is only a placeholder,
/// whereas on Modified and Deleted entries it is a real stored key.
fn awaits_store_key(entry: &dyn ChangeEntry) -> bool {
    entry.entity_state() == EntityState::Added
        && entry.entity_type().key_properties().any(|p| {
            p.is_store_generated() && !entry.is_temporary(p) && entry.current_value(p).is_default()
        })
}
