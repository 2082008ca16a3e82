//! Entity types and the physical tables they map onto.

use core::fmt;

use super::Property;

/// Identity of a physical table: optional schema plus table name.
///
/// Field order matters: the derived `Ord` compares the schema first (with no
/// schema ordering before any schema) and then the table name, both ordinally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId {
    schema: Option<String>,
    table: String,
}

impl TableId {
    /// Create a table identity.
    #[must_use]
    pub fn new(schema: Option<&str>, table: impl Into<String>) -> Self {
        Self {
            schema: schema.map(str::to_owned),
            table: table.into(),
        }
    }

    /// The table name.
    #[inline]
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The schema, if any.
    #[inline]
    #[must_use]
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{schema}.{}", self.table),
            None => write!(f, "{}", self.table),
        }
    }
}

/// An entity type: a named, ordered set of properties mapped to one table.
///
/// Properties keep their declaration order; column modifications are emitted
/// in that order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityType {
    name: String,
    base_type: Option<String>,
    table: TableId,
    properties: Vec<Property>,
}

impl EntityType {
    /// Create an entity type mapped to `table` in the default schema.
    #[must_use]
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_type: None,
            table: TableId::new(None, table),
            properties: Vec::new(),
        }
    }

    /// Create a type deriving from `base`.
    ///
    /// The derived type shares the base table and inherits its properties,
    /// which keep the base type as their declaring type.
    #[must_use]
    pub fn derived(name: impl Into<String>, base: &EntityType) -> Self {
        Self {
            name: name.into(),
            base_type: Some(base.name.clone()),
            table: base.table.clone(),
            properties: base.properties.clone(),
        }
    }

    /// Place the mapped table in a schema.
    #[must_use]
    pub fn in_schema(mut self, schema: impl Into<String>) -> Self {
        self.table.schema = Some(schema.into());
        self
    }

    /// Append a property, declared by this type.
    #[must_use]
    pub fn property(mut self, property: Property) -> Self {
        let property = property.declared_by(&self.name);
        self.properties.push(property);
        self
    }

    /// The entity type name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the base type, for derived types.
    #[inline]
    #[must_use]
    pub fn base_type(&self) -> Option<&str> {
        self.base_type.as_deref()
    }

    /// Identity of the mapped table.
    #[inline]
    #[must_use]
    pub fn table_id(&self) -> &TableId {
        &self.table
    }

    /// Name of the mapped table.
    #[inline]
    #[must_use]
    pub fn table_name(&self) -> &str {
        self.table.table()
    }

    /// Schema of the mapped table.
    #[inline]
    #[must_use]
    pub fn schema(&self) -> Option<&str> {
        self.table.schema()
    }

    /// Properties in declaration order.
    #[inline]
    #[must_use]
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Find a property by name.
    #[must_use]
    pub fn find_property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name() == name)
    }

    /// Primary key properties in declaration order.
    pub fn key_properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter().filter(|p| p.is_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::ValueKind;

    fn blog() -> EntityType {
        EntityType::new("Blog", "Blogs")
            .in_schema("dbo")
            .property(Property::new("Id", ValueKind::Integer).key())
            .property(Property::new("Url", ValueKind::Text))
    }

    #[test]
    fn test_table_identity() {
        let blog = blog();
        assert_eq!(blog.table_name(), "Blogs");
        assert_eq!(blog.schema(), Some("dbo"));
        assert_eq!(blog.table_id().to_string(), "dbo.Blogs");
        assert_eq!(TableId::new(None, "Posts").to_string(), "Posts");
    }

    #[test]
    fn test_table_id_ordering() {
        let unschema = TableId::new(None, "Z");
        let a = TableId::new(Some("a"), "B");
        let b = TableId::new(Some("b"), "A");
        assert!(unschema < a);
        assert!(a < b);
        assert!(TableId::new(None, "A") < TableId::new(None, "a"));
    }

    #[test]
    fn test_properties_keep_declaration_order() {
        let blog = blog();
        let names: Vec<&str> = blog.properties().iter().map(Property::name).collect();
        assert_eq!(names, ["Id", "Url"]);
        assert_eq!(blog.key_properties().count(), 1);
        assert!(blog.find_property("Url").is_some());
        assert!(blog.find_property("Title").is_none());
    }

    #[test]
    fn test_derived_type_inherits_properties() {
        let blog = blog();
        let rss = EntityType::derived("RssBlog", &blog)
            .property(Property::new("FeedUrl", ValueKind::Text));
        assert_eq!(rss.base_type(), Some("Blog"));
        assert_eq!(rss.table_id(), blog.table_id());
        assert_eq!(rss.properties().len(), 3);
        assert_eq!(rss.find_property("Id").unwrap().declaring_type(), "Blog");
        assert_eq!(rss.find_property("FeedUrl").unwrap().declaring_type(), "RssBlog");
    }
}
