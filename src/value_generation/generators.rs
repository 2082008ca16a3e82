//! Value generator implementations.

use core::fmt::Debug;
use core::sync::atomic::{AtomicI64, Ordering};

use uuid::Uuid;

use crate::{ChangeEntry, Value};

/// Produces a value for a property of an entity being added.
///
/// A single instance serves every entity of a given type, possibly from
/// several threads at once.
pub trait ValueGenerator: Debug + Send + Sync {
    /// Returns the next value.
    fn next(&self, entry: &dyn ChangeEntry) -> Value;

    /// Whether produced values are placeholders the store will replace.
    fn generates_temporary_values(&self) -> bool {
        false
    }
}

/// Random (version 4) UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuidValueGenerator;

impl ValueGenerator for GuidValueGenerator {
    fn next(&self, _entry: &dyn ChangeEntry) -> Value {
        Value::Uuid(Uuid::new_v4())
    }
}

/// Time-ordered (version 7) UUIDs, friendlier to clustered indexes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialGuidValueGenerator;

impl ValueGenerator for SequentialGuidValueGenerator {
    fn next(&self, _entry: &dyn ChangeEntry) -> Value {
        Value::Uuid(Uuid::now_v7())
    }
}

/// Negative integer placeholders for keys the store assigns.
///
/// Values start just above `i64::MIN` and increase, so they never collide
/// with identity values handed out by a store.
#[derive(Debug)]
pub struct TemporaryIntegerValueGenerator {
    current: AtomicI64,
}

impl TemporaryIntegerValueGenerator {
    /// First value handed out.
    pub const START: i64 = i64::MIN + 1000;

    /// Create a generator starting at [`START`](Self::START).
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: AtomicI64::new(Self::START),
        }
    }
}

impl Default for TemporaryIntegerValueGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueGenerator for TemporaryIntegerValueGenerator {
    fn next(&self, _entry: &dyn ChangeEntry) -> Value {
        Value::Integer(self.current.fetch_add(1, Ordering::Relaxed))
    }

    fn generates_temporary_values(&self) -> bool {
        true
    }
}
