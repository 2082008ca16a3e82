//! Value-binding information for properties.

use super::{Property, ValueKind};

/// How a property's value is bound as a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeMapping {
    store_type: String,
    kind: ValueKind,
}

impl TypeMapping {
    /// Create a mapping onto the given store type.
    #[must_use]
    pub fn new(store_type: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            store_type: store_type.into(),
            kind,
        }
    }

    /// The store type name, e.g. `INTEGER`.
    #[inline]
    #[must_use]
    pub fn store_type(&self) -> &str {
        &self.store_type
    }

    /// The value kind bound through this mapping.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        self.kind
    }
}

/// Map a property onto SQLite storage classes.
///
/// Booleans are stored as integers and UUIDs as 16-byte blobs.
#[must_use]
pub fn default_type_mapping(property: &Property) -> TypeMapping {
    let store_type = match property.kind() {
        ValueKind::Boolean | ValueKind::Integer => "INTEGER",
        ValueKind::Real => "REAL",
        ValueKind::Text => "TEXT",
        ValueKind::Blob | ValueKind::Uuid => "BLOB",
    };
    TypeMapping::new(store_type, property.kind())
}
