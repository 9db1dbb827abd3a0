//! Table schema types
//!
//! A table schema is an ordered list of named columns. Column definitions are
//! opaque property maps compared only by structural equality, so any column
//! metadata a catalog exposes can ride along without the comparator knowing
//! about it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Column identifier within a schema
pub type ColumnName = String;

/// Scalar value a column property may take
///
/// The set of kinds is closed and every kind has total equality, so two
/// definitions always compare without inspecting what a property means.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Boolean property (e.g. nullable)
    Bool(bool),

    /// Integer property (e.g. length, precision)
    Int(i64),

    /// Text property (e.g. type name, default expression)
    Text(String),
}

impl std::fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{}", value),
            Self::Int(value) => write!(f, "{}", value),
            Self::Text(value) => write!(f, "{}", value),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A column's full metadata as a sorted property map
///
/// Property order never affects equality or serialization, so two
/// definitions built in different orders are the same definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnDefinition {
    /// Properties keyed by name
    pub properties: BTreeMap<String, PropertyValue>,
}

impl ColumnDefinition {
    /// Create an empty definition
    pub fn new() -> Self {
        Self {
            properties: BTreeMap::new(),
        }
    }

    /// Add a property
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Look up a property by name
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Property names in sorted order
    pub fn property_names(&self) -> Vec<&str> {
        self.properties.keys().map(|k| k.as_str()).collect()
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether the definition has no properties
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl std::fmt::Display for ColumnDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.properties.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, value)?;
        }
        write!(f, "}}")
    }
}

/// A column in a schema
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: ColumnName,

    /// Column definition
    pub definition: ColumnDefinition,
}

impl Column {
    /// Create a new column
    pub fn new(name: impl Into<ColumnName>, definition: ColumnDefinition) -> Self {
        Self {
            name: name.into(),
            definition,
        }
    }
}

/// An ordered collection of columns describing one table at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Ordered list of columns
    pub columns: Vec<Column>,
}

impl TableSchema {
    /// Create a new empty schema
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Create a schema from columns
    pub fn from_columns(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Find a column by name
    ///
    /// Duplicate names are tolerated; the first occurrence in schema order
    /// wins.
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get column names in schema order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the schema has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Load a schema from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, SchemaError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SchemaError::IoError(path.display().to_string(), e.to_string()))?;

        Self::from_json(&contents)
    }

    /// Parse a schema from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        serde_json::from_str(json)
            .map_err(|e| SchemaError::ParseError(e.to_string()))
    }

    /// Serialize the schema to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, SchemaError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SchemaError::SerializeError(e.to_string()))
    }
}

impl Default for TableSchema {
    fn default() -> Self {
        Self::new()
    }
}

/// Schema loading errors
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Failed to read schema file {0}: {1}")]
    IoError(String, String),

    #[error("Failed to parse schema JSON: {0}")]
    ParseError(String),

    #[error("Failed to serialize schema: {0}")]
    SerializeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_value_display() {
        assert_eq!(PropertyValue::Text("text".to_string()).to_string(), "text");
        assert_eq!(PropertyValue::Int(42).to_string(), "42");
        assert_eq!(PropertyValue::Bool(false).to_string(), "false");
    }

    #[test]
    fn property_value_conversions() {
        assert_eq!(PropertyValue::from("integer"), PropertyValue::Text("integer".to_string()));
        assert_eq!(PropertyValue::from(10i64), PropertyValue::Int(10));
        assert_eq!(PropertyValue::from(true), PropertyValue::Bool(true));
    }

    #[test]
    fn definition_equality_ignores_insertion_order() {
        let a = ColumnDefinition::new()
            .with_property("type", "integer")
            .with_property("nullable", false);
        let b = ColumnDefinition::new()
            .with_property("nullable", false)
            .with_property("type", "integer");

        assert_eq!(a, b);
    }

    #[test]
    fn definition_display() {
        let definition = ColumnDefinition::new()
            .with_property("type", "text")
            .with_property("length", 128i64);

        assert_eq!(definition.to_string(), "{length: 128, type: text}");
        assert_eq!(ColumnDefinition::new().to_string(), "{}");
    }

    #[test]
    fn schema_operations() {
        let schema = TableSchema::from_columns(vec![
            Column::new("id", ColumnDefinition::new().with_property("type", "integer")),
            Column::new("name", ColumnDefinition::new().with_property("type", "text")),
        ]);

        assert_eq!(schema.column_names(), vec!["id", "name"]);
        assert_eq!(schema.len(), 2);
        assert!(schema.find_column("id").is_some());
        assert!(schema.find_column("nonexistent").is_none());
    }

    #[test]
    fn find_column_prefers_first_occurrence() {
        let schema = TableSchema::from_columns(vec![
            Column::new("dup", ColumnDefinition::new().with_property("type", "text")),
            Column::new("dup", ColumnDefinition::new().with_property("type", "integer")),
        ]);

        let found = schema.find_column("dup").unwrap();
        assert_eq!(found.definition.get("type"), Some(&PropertyValue::Text("text".to_string())));
    }

    #[test]
    fn schema_json_roundtrip() {
        let schema = TableSchema::from_columns(vec![
            Column::new(
                "cartodb_id",
                ColumnDefinition::new()
                    .with_property("type", "integer")
                    .with_property("nullable", false),
            ),
        ]);

        let json = schema.to_json().unwrap();
        let parsed = TableSchema::from_json(&json).unwrap();

        assert_eq!(parsed, schema);
    }

    #[test]
    fn schema_json_wire_format() {
        let json = r#"{
            "columns": [
                {"name": "the_geom", "definition": {"type": "geometry", "srid": 4326, "nullable": true}}
            ]
        }"#;

        let schema = TableSchema::from_json(json).unwrap();
        let column = schema.find_column("the_geom").unwrap();

        assert_eq!(column.definition.get("type"), Some(&PropertyValue::Text("geometry".to_string())));
        assert_eq!(column.definition.get("srid"), Some(&PropertyValue::Int(4326)));
        assert_eq!(column.definition.get("nullable"), Some(&PropertyValue::Bool(true)));
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let result = TableSchema::from_json("{not json");
        assert!(matches!(result, Err(SchemaError::ParseError(_))));
    }
}
