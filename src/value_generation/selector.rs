//! Choosing and applying client-side generators.

use std::sync::Arc;

use super::{
    SequentialGuidValueGenerator, TemporaryIntegerValueGenerator, ValueGenerator,
    ValueGeneratorCache,
};
use crate::{
    ChangeEntry, EntityState, EntityType, Error, Property, TrackedEntry, ValueGenerated, ValueKind,
};

/// Picks the generator for a property, creating it through a shared cache.
///
/// Only properties generated on add get a client-side generator: UUIDs get
/// final time-ordered values and integers get temporary placeholders the
/// store replaces.
#[derive(Debug, Clone, Default)]
pub struct ValueGeneratorSelector {
    cache: Arc<ValueGeneratorCache>,
}

impl ValueGeneratorSelector {
    /// Create a selector over a shared cache.
    #[must_use]
    pub fn new(cache: Arc<ValueGeneratorCache>) -> Self {
        Self { cache }
    }

    /// The underlying cache.
    #[inline]
    #[must_use]
    pub fn cache(&self) -> &Arc<ValueGeneratorCache> {
        &self.cache
    }

    /// Returns the generator for `property` on `entity_type`, if one applies.
    #[must_use]
    pub fn select(
        &self,
        property: &Property,
        entity_type: &EntityType,
    ) -> Option<Arc<dyn ValueGenerator>> {
        if property.value_generated() != ValueGenerated::OnAdd {
            return None;
        }
        match property.kind() {
            ValueKind::Uuid => Some(self.cache.get_or_add(property, entity_type, |_, _| {
                Arc::new(SequentialGuidValueGenerator)
            })),
            ValueKind::Integer => Some(self.cache.get_or_add(property, entity_type, |_, _| {
                Arc::new(TemporaryIntegerValueGenerator::new())
            })),
            ValueKind::Boolean | ValueKind::Real | ValueKind::Text | ValueKind::Blob => None,
        }
    }

    /// Fill every generated property of an Added entry that holds no value yet.
    ///
    /// Returns the number of properties assigned. Entries in other states are
    /// left untouched.
    ///
    /// # Errors
    ///
    /// Propagates errors of the [`TrackedEntry`] setters.
    pub fn generate(&self, entry: &TrackedEntry) -> Result<usize, Error> {
        if entry.entity_state() != EntityState::Added {
            return Ok(0);
        }
        let entity_type = entry.entity_type();
        let mut assigned = 0;
        for property in entity_type.properties() {
            if entry.is_temporary(property) || !entry.current_value(property).is_default() {
                continue;
            }
            let Some(generator) = self.select(property, entity_type) else {
                continue;
            };
            let value = generator.next(entry);
            if generator.generates_temporary_values() {
                entry.set_temporary_value(property.name(), value)?;
            } else {
                entry.set_current_value(property.name(), value)?;
            }
            assigned += 1;
        }
        Ok(assigned)
    }
}
