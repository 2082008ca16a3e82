//! Property metadata.

/// When the store, rather than the client, produces a property's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueGenerated {
    /// The client always supplies the value.
    #[default]
    Never,
    /// The store generates the value when the row is inserted.
    OnAdd,
    /// The store generates the value on insert and on every update.
    OnAddOrUpdate,
}

/// The kind of value a property holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueKind {
    /// `true` / `false`
    Boolean,
    /// 64-bit signed integer
    Integer,
    /// Floating point
    Real,
    /// UTF-8 text
    Text,
    /// Raw bytes
    Blob,
    /// 128-bit identifier
    Uuid,
}

/// A mapped property of an entity type.
///
/// # Example
///
/// ```
/// use modification_commands::{Property, ValueGenerated, ValueKind};
///
/// let id = Property::new("Id", ValueKind::Integer)
///     .key()
///     .generated(ValueGenerated::OnAdd);
/// let version = Property::new("Version", ValueKind::Blob)
///     .column("row_version")
///     .concurrency_token()
///     .generated(ValueGenerated::OnAddOrUpdate);
///
/// assert!(id.is_key());
/// assert_eq!(version.column_name(), "row_version");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Property {
    name: String,
    column: String,
    declaring_type: String,
    kind: ValueKind,
    is_key: bool,
    is_concurrency_token: bool,
    value_generated: ValueGenerated,
}

impl Property {
    /// Create a property whose column shares its name.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        let name = name.into();
        Self {
            column: name.clone(),
            name,
            declaring_type: String::new(),
            kind,
            is_key: false,
            is_concurrency_token: false,
            value_generated: ValueGenerated::Never,
        }
    }

    /// Map the property onto a differently named column.
    #[must_use]
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    /// Mark the property as part of the primary key.
    #[must_use]
    pub fn key(mut self) -> Self {
        self.is_key = true;
        self
    }

    /// Mark the property as a concurrency token.
    #[must_use]
    pub fn concurrency_token(mut self) -> Self {
        self.is_concurrency_token = true;
        self
    }

    /// Set the value-generation policy.
    #[must_use]
    pub fn generated(mut self, value_generated: ValueGenerated) -> Self {
        self.value_generated = value_generated;
        self
    }

    pub(crate) fn declared_by(mut self, entity_type: &str) -> Self {
        if self.declaring_type.is_empty() {
            entity_type.clone_into(&mut self.declaring_type);
        }
        self
    }

    /// The property name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The column the property is stored in.
    #[inline]
    #[must_use]
    pub fn column_name(&self) -> &str {
        &self.column
    }

    /// Name of the entity type that declares the property.
    ///
    /// For inherited properties this is the base type, not the concrete type
    /// of the entity being saved.
    #[inline]
    #[must_use]
    pub fn declaring_type(&self) -> &str {
        &self.declaring_type
    }

    /// The kind of value held.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Whether the property is part of the primary key.
    #[inline]
    #[must_use]
    pub fn is_key(&self) -> bool {
        self.is_key
    }

    /// Whether the property is a concurrency token.
    #[inline]
    #[must_use]
    pub fn is_concurrency_token(&self) -> bool {
        self.is_concurrency_token
    }

    /// The value-generation policy.
    #[inline]
    #[must_use]
    pub fn value_generated(&self) -> ValueGenerated {
        self.value_generated
    }

    /// Whether the store ever produces this property's value.
    #[inline]
    #[must_use]
    pub fn is_store_generated(&self) -> bool {
        self.value_generated != ValueGenerated::Never
    }
}
