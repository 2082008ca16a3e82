//! Tests for the value generator cache under sequential and concurrent use.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use modification_commands::{
    EntityType, GuidValueGenerator, Property, SequentialGuidValueGenerator,
    TemporaryIntegerValueGenerator, ValueGenerated, ValueGenerator, ValueGeneratorCache, ValueKind,
};

fn customer() -> EntityType {
    EntityType::new("Customer", "Customers")
        .property(
            Property::new("Id", ValueKind::Uuid)
                .key()
                .generated(ValueGenerated::OnAdd),
        )
        .property(
            Property::new("Number", ValueKind::Integer).generated(ValueGenerated::OnAdd),
        )
}

#[test]
fn test_same_key_returns_same_generator() {
    let customer = customer();
    let id = customer.find_property("Id").unwrap();
    let cache = ValueGeneratorCache::new();
    let second_factory_calls = AtomicUsize::new(0);

    let first = cache.get_or_add(id, &customer, |_, _| Arc::new(GuidValueGenerator));
    let second = cache.get_or_add(id, &customer, |_, _| {
        second_factory_calls.fetch_add(1, Ordering::SeqCst);
        Arc::new(SequentialGuidValueGenerator)
    });

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second_factory_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_factory_receives_property_and_entity_type() {
    let customer = customer();
    let number = customer.find_property("Number").unwrap();
    let cache = ValueGeneratorCache::new();

    cache.get_or_add(number, &customer, |property, entity_type| {
        assert_eq!(property.name(), "Number");
        assert_eq!(entity_type.name(), "Customer");
        Arc::new(TemporaryIntegerValueGenerator::new())
    });
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_distinct_properties_get_distinct_generators() {
    let customer = customer();
    let cache = ValueGeneratorCache::new();
    let id = cache.get_or_add(customer.find_property("Id").unwrap(), &customer, |_, _| {
        Arc::new(GuidValueGenerator)
    });
    let number = cache.get_or_add(
        customer.find_property("Number").unwrap(),
        &customer,
        |_, _| Arc::new(TemporaryIntegerValueGenerator::new()),
    );
    assert!(!Arc::ptr_eq(&id, &number));
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_racing_threads_converge_on_one_generator() {
    const THREADS: usize = 8;

    let customer = customer();
    let number = customer.find_property("Number").unwrap();
    let cache = ValueGeneratorCache::new();
    let factory_calls = AtomicUsize::new(0);
    let barrier = Barrier::new(THREADS);

    let generators: Vec<Arc<dyn ValueGenerator>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    cache.get_or_add(number, &customer, |_, _| {
                        factory_calls.fetch_add(1, Ordering::SeqCst);
                        Arc::new(TemporaryIntegerValueGenerator::new())
                    })
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(factory_calls.load(Ordering::SeqCst), 1);
    assert!(generators.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    assert_eq!(cache.len(), 1);
}
