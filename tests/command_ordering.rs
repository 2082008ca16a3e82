//! Tests for the ordering of modification commands.
//!
//! The comparer must be a consistent total order over (schema, table, state)
//! so that batching can rely on adjacent commands sharing a table and state.

use core::cmp::Ordering;
use std::sync::Arc;

use modification_commands::{
    ChangeEntry, EntityState, EntityType, ModificationCommand, ModificationCommandComparer, Property,
    TrackedEntry, ValueKind, default_type_mapping,
};

// =============================================================================
// Helper functions
// =============================================================================

const SCHEMAS: [Option<&str>; 3] = [None, Some("a"), Some("b")];
const TABLES: [&str; 2] = ["A", "B"];
const STATES: [EntityState; 3] = [EntityState::Added, EntityState::Modified, EntityState::Deleted];

/// One entry per (schema, table, state).
fn universe() -> Vec<TrackedEntry> {
    let mut entries = Vec::new();
    for schema in SCHEMAS {
        for table in TABLES {
            let mut entity_type = EntityType::new(format!("{table}Entity"), table)
                .property(Property::new("Id", ValueKind::Integer).key());
            if let Some(schema) = schema {
                entity_type = entity_type.in_schema(schema);
            }
            let entity_type = Arc::new(entity_type);
            for state in STATES {
                entries.push(
                    TrackedEntry::new(entity_type.clone(), state)
                        .with_value("Id", 1i64)
                        .unwrap(),
                );
            }
        }
    }
    entries
}

fn commands(entries: &[TrackedEntry]) -> Vec<ModificationCommand<'_>> {
    entries
        .iter()
        .map(|entry| {
            let table = entry.entity_type();
            let mut command = ModificationCommand::new(
                table.table_name(),
                table.schema(),
                String::new,
                default_type_mapping,
            )
            .unwrap();
            command.add_entry(entry).unwrap();
            command
        })
        .collect()
}

fn group_key<'c>(command: &'c ModificationCommand<'_>) -> (Option<&'c str>, &'c str, EntityState) {
    (command.schema(), command.table_name(), command.entity_state())
}

// =============================================================================
// Order properties
// =============================================================================

#[test]
fn test_comparer_is_antisymmetric_and_transitive() {
    let entries = universe();
    let commands = commands(&entries);
    let comparer = ModificationCommandComparer;

    for a in &commands {
        assert_eq!(comparer.compare_commands(a, a), Ordering::Equal);
        for b in &commands {
            let ab = comparer.compare_commands(a, b);
            assert_eq!(ab, comparer.compare_commands(b, a).reverse());
            for c in &commands {
                let bc = comparer.compare_commands(b, c);
                if ab == Ordering::Less && bc == Ordering::Less {
                    assert_eq!(comparer.compare_commands(a, c), Ordering::Less);
                }
                if ab == Ordering::Equal && bc == Ordering::Equal {
                    assert_eq!(comparer.compare_commands(a, c), Ordering::Equal);
                }
            }
        }
    }
}

#[test]
fn test_comparer_matches_group_key_order() {
    let entries = universe();
    let commands = commands(&entries);
    let comparer = ModificationCommandComparer;

    for a in &commands {
        for b in &commands {
            assert_eq!(
                comparer.compare_commands(a, b),
                group_key(a).cmp(&group_key(b)),
            );
        }
    }
}

#[test]
fn test_states_sort_added_modified_deleted() {
    let entries = universe();
    let mut commands = commands(&entries);
    commands.reverse();
    ModificationCommandComparer.sort(&mut commands);

    let first_table: Vec<EntityState> = commands[..3]
        .iter()
        .map(ModificationCommand::entity_state)
        .collect();
    assert_eq!(first_table, STATES);
    assert_eq!(commands[0].schema(), None);
    assert_eq!(commands[0].table_name(), "A");
}

#[test]
fn test_sorting_is_stable_across_runs() {
    let entries = universe();
    let comparer = ModificationCommandComparer;

    let mut reversed = commands(&entries);
    reversed.reverse();
    comparer.sort(&mut reversed);

    let mut rotated = commands(&entries);
    rotated.rotate_left(7);
    comparer.sort(&mut rotated);

    let mut resorted = commands(&entries);
    comparer.sort(&mut resorted);
    comparer.sort(&mut resorted);

    let keys = |commands: &[ModificationCommand<'_>]| -> Vec<(Option<String>, String, EntityState)> {
        commands
            .iter()
            .map(|c| {
                (
                    c.schema().map(str::to_owned),
                    c.table_name().to_owned(),
                    c.entity_state(),
                )
            })
            .collect()
    };

    assert_eq!(keys(&reversed), keys(&rotated));
    assert_eq!(keys(&reversed), keys(&resorted));
    assert!(keys(&resorted).windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_missing_commands_sort_first() {
    let entries = universe();
    let commands = commands(&entries);
    let comparer = ModificationCommandComparer;

    let mut optional: Vec<Option<&ModificationCommand<'_>>> =
        commands.iter().rev().map(Some).collect();
    optional.insert(5, None);
    optional.sort_by(|x, y| comparer.compare(*x, *y));

    assert!(optional[0].is_none());
    assert!(optional[1..].iter().all(Option::is_some));
}
