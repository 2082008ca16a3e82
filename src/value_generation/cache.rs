//! Concurrent cache of value generators.

use std::sync::Arc;

use dashmap::{DashMap, mapref::entry::Entry};

use super::ValueGenerator;
use crate::{EntityType, Property, TableId};

/// Cache key: the property and the concrete entity type it is generated for.
///
/// The whole property takes part, so same-named properties of different kinds
/// or declaring types never share a generator, and an inherited property
/// looked up for two derived types yields two keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    property: Property,
    entity_type: String,
    table: TableId,
}

impl CacheKey {
    fn new(property: &Property, entity_type: &EntityType) -> Self {
        Self {
            property: property.clone(),
            entity_type: entity_type.name().to_owned(),
            table: entity_type.table_id().clone(),
        }
    }
}

/// One generator per (property, entity type), created on first request.
///
/// The cache only ever grows: an entry is inserted once and never replaced.
/// Racing requests for the same key converge on one generator, and the
/// factory runs at most once per key.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use modification_commands::{
///     EntityType, GuidValueGenerator, Property, ValueGenerator, ValueGeneratorCache, ValueKind,
/// };
///
/// let order = EntityType::new("Order", "Orders")
///     .property(Property::new("Id", ValueKind::Uuid).key());
/// let id = order.find_property("Id").unwrap();
///
/// let cache = ValueGeneratorCache::new();
/// let first = cache.get_or_add(id, &order, |_, _| Arc::new(GuidValueGenerator));
/// let second = cache.get_or_add(id, &order, |_, _| unreachable!());
/// assert!(Arc::ptr_eq(&first, &second));
/// ```
#[derive(Debug, Default)]
pub struct ValueGeneratorCache {
    generators: DashMap<CacheKey, Arc<dyn ValueGenerator>>,
}

impl ValueGeneratorCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached generator for the key, creating it with `factory` on a miss.
    ///
    /// `factory` runs while the key's shard is locked; it must not call back
    /// into this cache.
    pub fn get_or_add<F>(
        &self,
        property: &Property,
        entity_type: &EntityType,
        factory: F,
    ) -> Arc<dyn ValueGenerator>
    where
        F: FnOnce(&Property, &EntityType) -> Arc<dyn ValueGenerator>,
    {
        match self.generators.entry(CacheKey::new(property, entity_type)) {
            Entry::Occupied(entry) => Arc::clone(entry.get()),
            Entry::Vacant(entry) => {
                tracing::debug!(
                    entity_type = entity_type.name(),
                    property = property.name(),
                    "creating value generator"
                );
                let generator = factory(property, entity_type);
                Arc::clone(entry.insert(generator).value())
            }
        }
    }

    /// Returns the number of cached generators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    /// Returns true if no generator has been created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SequentialGuidValueGenerator, TemporaryIntegerValueGenerator, ValueKind};

    fn order() -> EntityType {
        EntityType::new("Order", "Orders").property(Property::new("Id", ValueKind::Integer).key())
    }

    #[test]
    fn test_second_factory_is_not_invoked() {
        let order = order();
        let id = order.find_property("Id").unwrap();
        let cache = ValueGeneratorCache::new();

        let first = cache.get_or_add(id, &order, |_, _| {
            Arc::new(TemporaryIntegerValueGenerator::new())
        });
        let second = cache.get_or_add(id, &order, |_, _| panic!("factory invoked on a hit"));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_derived_types_get_their_own_generator() {
        let order = order();
        let special = EntityType::derived("SpecialOrder", &order);
        let cache = ValueGeneratorCache::new();

        let id = order.find_property("Id").unwrap();
        let inherited = special.find_property("Id").unwrap();
        let base = cache.get_or_add(id, &order, |_, _| {
            Arc::new(TemporaryIntegerValueGenerator::new())
        });
        let derived = cache.get_or_add(inherited, &special, |_, et| {
            assert_eq!(et.name(), "SpecialOrder");
            Arc::new(TemporaryIntegerValueGenerator::new())
        });

        assert!(!Arc::ptr_eq(&base, &derived));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_same_named_properties_of_other_models_do_not_collide() {
        let order = order();
        let legacy = EntityType::new("Order", "LegacyOrders")
            .property(Property::new("Id", ValueKind::Uuid).key());
        let cache = ValueGeneratorCache::new();

        let integer = cache.get_or_add(order.find_property("Id").unwrap(), &order, |_, _| {
            Arc::new(TemporaryIntegerValueGenerator::new())
        });
        let uuid = cache.get_or_add(legacy.find_property("Id").unwrap(), &legacy, |p, _| {
            assert_eq!(p.kind(), ValueKind::Uuid);
            Arc::new(SequentialGuidValueGenerator)
        });

        assert!(!Arc::ptr_eq(&integer, &uuid));
        assert_eq!(cache.len(), 2);
    }
}
