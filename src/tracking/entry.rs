//! Change entries: one tracked entity with its pending mutation.

use core::cell::{Cell, RefCell};
use core::fmt::Debug;
use std::sync::Arc;

use crate::{EntityState, EntityType, Error, Property, Value};

/// A tracked entity as seen by the command pipeline (object-safe).
///
/// The pipeline only reads entries. Values are read at access time, so a
/// command built over an entry always reflects the entry's latest state.
pub trait ChangeEntry: Debug {
    /// The pending mutation.
    fn entity_state(&self) -> EntityState;

    /// The entity's type.
    fn entity_type(&self) -> &EntityType;

    /// The value the entity currently holds for `property`.
    fn current_value(&self, property: &Property) -> Value;

    /// The value last read from the store for `property`.
    ///
    /// Entries that do not keep snapshots report the current value.
    fn original_value(&self, property: &Property) -> Value {
        self.current_value(property)
    }

    /// Whether `property` was explicitly modified.
    fn is_modified(&self, property: &Property) -> bool;

    /// Whether `property` holds a temporary placeholder.
    fn is_temporary(&self, property: &Property) -> bool;

    /// Current primary key values in key declaration order.
    fn key_values(&self) -> Vec<Value> {
        self.entity_type()
            .key_properties()
            .map(|p| self.current_value(p))
            .collect()
    }
}

impl<E: ChangeEntry + ?Sized> ChangeEntry for &E {
    #[inline]
    fn entity_state(&self) -> EntityState {
        E::entity_state(self)
    }

    #[inline]
    fn entity_type(&self) -> &EntityType {
        E::entity_type(self)
    }

    #[inline]
    fn current_value(&self, property: &Property) -> Value {
        E::current_value(self, property)
    }

    #[inline]
    fn original_value(&self, property: &Property) -> Value {
        E::original_value(self, property)
    }

    #[inline]
    fn is_modified(&self, property: &Property) -> bool {
        E::is_modified(self, property)
    }

    #[inline]
    fn is_temporary(&self, property: &Property) -> bool {
        E::is_temporary(self, property)
    }
}

#[derive(Debug, Clone, Default)]
struct Slot {
    current: Value,
    original: Value,
    modified: bool,
    temporary: bool,
}

/// A single-threaded [`ChangeEntry`] with interior mutability.
///
/// Commands hold shared references to entries, so every mutator takes
/// `&self`. Property names are resolved against the entity type and unknown
/// names are reported as [`Error::UnknownProperty`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use modification_commands::{
///     ChangeEntry, EntityState, EntityType, Property, TrackedEntry, ValueKind,
/// };
///
/// let blog = Arc::new(
///     EntityType::new("Blog", "Blogs")
///         .property(Property::new("Id", ValueKind::Integer).key())
///         .property(Property::new("Url", ValueKind::Text)),
/// );
/// let entry = TrackedEntry::new(blog, EntityState::Unchanged)
///     .with_value("Id", 1i64).unwrap()
///     .with_value("Url", "http://a").unwrap();
///
/// entry.set_current_value("Url", "http://b").unwrap();
/// entry.set_state(EntityState::Modified);
///
/// let url = entry.entity_type().find_property("Url").unwrap().clone();
/// assert!(entry.is_modified(&url));
/// ```
#[derive(Debug)]
pub struct TrackedEntry {
    entity_type: Arc<EntityType>,
    state: Cell<EntityState>,
    slots: RefCell<Vec<Slot>>,
}

impl TrackedEntry {
    /// Track a new entity of `entity_type` in `state`, all values NULL.
    #[must_use]
    pub fn new(entity_type: Arc<EntityType>, state: EntityState) -> Self {
        let slots = vec![Slot::default(); entity_type.properties().len()];
        Self {
            entity_type,
            state: Cell::new(state),
            slots: RefCell::new(slots),
        }
    }

    fn slot_index(&self, name: &str) -> Result<usize, Error> {
        self.entity_type
            .properties()
            .iter()
            .position(|p| p.name() == name)
            .ok_or_else(|| Error::UnknownProperty {
                entity_type: self.entity_type.name().to_owned(),
                property: name.to_owned(),
            })
    }

    fn with_slot<R>(&self, property: &Property, f: impl FnOnce(&Slot) -> R) -> Option<R> {
        let idx = self.slot_index(property.name()).ok()?;
        self.slots.borrow().get(idx).map(f)
    }

    /// Set both the current and original value, as when loading from the store.
    ///
    /// # Errors
    ///
    /// * `UnknownProperty` - If the entity type has no property named `name`.
    pub fn with_value(self, name: &str, value: impl Into<Value>) -> Result<Self, Error> {
        let idx = self.slot_index(name)?;
        {
            let mut slots = self.slots.borrow_mut();
            let value = value.into();
            slots[idx].original = value.clone();
            slots[idx].current = value;
        }
        Ok(self)
    }

    /// Change the current value, marking the property modified when it
    /// differs from the original value.
    ///
    /// # Errors
    ///
    /// * `UnknownProperty` - If the entity type has no property named `name`.
    pub fn set_current_value(&self, name: &str, value: impl Into<Value>) -> Result<(), Error> {
        let idx = self.slot_index(name)?;
        let mut slots = self.slots.borrow_mut();
        let slot = &mut slots[idx];
        slot.current = value.into();
        slot.temporary = false;
        if slot.current != slot.original {
            slot.modified = true;
        }
        Ok(())
    }

    /// Assign a temporary placeholder to be replaced by a store-generated value.
    ///
    /// # Errors
    ///
    /// * `UnknownProperty` - If the entity type has no property named `name`.
    pub fn set_temporary_value(&self, name: &str, value: impl Into<Value>) -> Result<(), Error> {
        let idx = self.slot_index(name)?;
        let mut slots = self.slots.borrow_mut();
        slots[idx].current = value.into();
        slots[idx].temporary = true;
        Ok(())
    }

    /// Set or clear the temporary marker without touching the value.
    ///
    /// # Errors
    ///
    /// * `UnknownProperty` - If the entity type has no property named `name`.
    pub fn set_temporary(&self, name: &str, temporary: bool) -> Result<(), Error> {
        let idx = self.slot_index(name)?;
        self.slots.borrow_mut()[idx].temporary = temporary;
        Ok(())
    }

    /// Set or clear the modified marker.
    ///
    /// # Errors
    ///
    /// * `UnknownProperty` - If the entity type has no property named `name`.
    pub fn set_modified(&self, name: &str, modified: bool) -> Result<(), Error> {
        let idx = self.slot_index(name)?;
        self.slots.borrow_mut()[idx].modified = modified;
        Ok(())
    }

    /// Replace a placeholder with the value the store generated.
    ///
    /// The value becomes both current and original, and the property is no
    /// longer temporary or modified.
    ///
    /// # Errors
    ///
    /// * `UnknownProperty` - If the entity type has no property named `name`.
    pub fn set_store_generated_value(&self, name: &str, value: Value) -> Result<(), Error> {
        let idx = self.slot_index(name)?;
        let mut slots = self.slots.borrow_mut();
        slots[idx] = Slot {
            original: value.clone(),
            current: value,
            modified: false,
            temporary: false,
        };
        Ok(())
    }

    /// Change the pending mutation.
    pub fn set_state(&self, state: EntityState) {
        self.state.set(state);
    }
}

impl ChangeEntry for TrackedEntry {
    fn entity_state(&self) -> EntityState {
        self.state.get()
    }

    fn entity_type(&self) -> &EntityType {
        &self.entity_type
    }

    fn current_value(&self, property: &Property) -> Value {
        self.with_slot(property, |s| s.current.clone())
            .unwrap_or_default()
    }

    fn original_value(&self, property: &Property) -> Value {
        self.with_slot(property, |s| s.original.clone())
            .unwrap_or_default()
    }

    fn is_modified(&self, property: &Property) -> bool {
        self.with_slot(property, |s| s.modified).unwrap_or(false)
    }

    fn is_temporary(&self, property: &Property) -> bool {
        self.with_slot(property, |s| s.temporary).unwrap_or(false)
    }
}
