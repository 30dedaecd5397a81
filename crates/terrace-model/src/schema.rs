//! Schemas and data types.
//!
//! Schemas describe the shape of rows exchanged with the store: ordered,
//! named, typed fields with a by-name lookup index.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A data type for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Boolean.
    Boolean,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    BigInt,
    /// 64-bit floating point.
    Double,
    /// UTF-8 string.
    Text,
    /// Binary data.
    Blob,
    /// Date (days since epoch).
    Date,
    /// Timestamp (microseconds since epoch).
    Timestamp,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Boolean => "BOOLEAN",
            DataType::Int => "INT",
            DataType::BigInt => "BIGINT",
            DataType::Double => "DOUBLE",
            DataType::Text => "TEXT",
            DataType::Blob => "BLOB",
            DataType::Date => "DATE",
            DataType::Timestamp => "TIMESTAMP",
        };
        write!(f, "{}", name)
    }
}

/// A field in a schema (name + type + nullability).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name.
    pub name: String,
    /// Data type.
    pub data_type: DataType,
    /// Whether NULL is allowed.
    pub nullable: bool,
}

impl Field {
    /// Creates a new field.
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
        }
    }

    /// Creates a new non-nullable field.
    pub fn not_null(name: impl Into<String>, data_type: DataType) -> Self {
        Self::new(name, data_type, false)
    }

    /// Creates a new nullable field.
    pub fn nullable(name: impl Into<String>, data_type: DataType) -> Self {
        Self::new(name, data_type, true)
    }

    /// Returns the field name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}{}",
            self.name,
            self.data_type,
            if self.nullable { "" } else { " NOT NULL" }
        )
    }
}

/// Schema describing the columns of a table or batch.
#[derive(Debug, Clone)]
pub struct Schema {
    /// Fields in the schema.
    fields: Vec<Field>,
    /// Index by field name for fast lookup.
    index: HashMap<String, usize>,
}

impl Schema {
    /// Creates an empty schema.
    pub fn empty() -> Self {
        Self {
            fields: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Creates a schema from a list of fields.
    pub fn new(fields: Vec<Field>) -> Self {
        let mut schema = Self::empty();
        for field in fields {
            schema.add_field(field);
        }
        schema
    }

    /// Adds a field to the schema.
    ///
    /// The first field with a given name wins the name index.
    pub fn add_field(&mut self, field: Field) {
        if !self.index.contains_key(&field.name) {
            self.index.insert(field.name.clone(), self.fields.len());
        }
        self.fields.push(field);
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the fields.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the field at the given index.
    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    /// Finds a field by name.
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.index.get(name).and_then(|&i| self.fields.get(i))
    }

    /// Finds the index of a field by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        // The index is derived from the fields.
        self.fields == other.fields
    }
}

impl Eq for Schema {}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", field)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_schema() -> Schema {
        Schema::new(vec![
            Field::not_null("id", DataType::Int),
            Field::nullable("name", DataType::Text),
        ])
    }

    #[test]
    fn test_schema_lookup() {
        let schema = test_schema();
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.index_of("id"), Some(0));
        assert_eq!(schema.index_of("name"), Some(1));
        assert_eq!(schema.index_of("missing"), None);
        assert_eq!(schema.field_by_name("name").map(|f| f.name()), Some("name"));
    }

    #[test]
    fn test_schema_field_by_index() {
        let schema = test_schema();
        assert_eq!(schema.field(0).map(|f| f.name()), Some("id"));
        assert!(schema.field(5).is_none());
    }

    #[test]
    fn test_schema_equality_ignores_index() {
        let a = test_schema();
        let b = Schema::new(vec![
            Field::not_null("id", DataType::Int),
            Field::nullable("name", DataType::Text),
        ]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_field_display() {
        let field = Field::not_null("id", DataType::Int);
        assert_eq!(field.to_string(), "id: INT NOT NULL");
    }

    #[test]
    fn test_empty_schema() {
        let schema = Schema::empty();
        assert!(schema.is_empty());
        assert_eq!(schema.len(), 0);
    }
}
