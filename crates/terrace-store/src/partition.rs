//! Partitioning: specs, bound specs, and key extraction.
//!
//! A `PartitionSpec` declares which fields a table partitions on and how.
//! Binding a spec against a schema validates it once and fixes the field
//! positions, so key extraction afterwards is pure positional access.

use std::fmt;

use serde::{Deserialize, Serialize};

use terrace_model::{Row, Schema, Value};

use crate::error::{StoreError, StoreResult};

/// How a source field is turned into a partition-key component.
///
/// Only [`Transform::Identity`] is accepted by the store; the other
/// variants exist so construction can reject derived partitioning with a
/// configuration error instead of guessing at its semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transform {
    /// The raw field value is the key component.
    Identity,
    /// Hash-bucket the value into `n` buckets.
    Bucket(u32),
    /// Truncate the value to the given width.
    Truncate(usize),
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Identity => write!(f, "identity"),
            Transform::Bucket(n) => write!(f, "bucket[{}]", n),
            Transform::Truncate(w) => write!(f, "truncate[{}]", w),
        }
    }
}

/// One field of a partitioning scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionField {
    /// Name of the source field in the table schema.
    pub source: String,
    /// Transform applied to the source value.
    pub transform: Transform,
}

/// A declared partitioning scheme, not yet validated against a schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionSpec {
    fields: Vec<PartitionField>,
}

impl PartitionSpec {
    /// Returns a builder for a partition spec.
    pub fn builder() -> PartitionSpecBuilder {
        PartitionSpecBuilder { fields: Vec::new() }
    }

    /// Returns the spec for an unpartitioned table.
    pub fn unpartitioned() -> Self {
        Self::default()
    }

    /// Returns the declared fields.
    pub fn fields(&self) -> &[PartitionField] {
        &self.fields
    }

    /// Returns true if no partition fields are declared.
    pub fn is_unpartitioned(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builder for [`PartitionSpec`].
#[derive(Debug, Clone)]
pub struct PartitionSpecBuilder {
    fields: Vec<PartitionField>,
}

impl PartitionSpecBuilder {
    /// Adds an identity-transform partition field.
    #[must_use]
    pub fn identity(mut self, source: impl Into<String>) -> Self {
        self.fields.push(PartitionField {
            source: source.into(),
            transform: Transform::Identity,
        });
        self
    }

    /// Adds a bucket-transform partition field.
    ///
    /// The store rejects this at binding time; it exists so callers can
    /// express what an upstream catalog declared.
    #[must_use]
    pub fn bucket(mut self, source: impl Into<String>, buckets: u32) -> Self {
        self.fields.push(PartitionField {
            source: source.into(),
            transform: Transform::Bucket(buckets),
        });
        self
    }

    /// Adds a truncate-transform partition field. Rejected at binding time.
    #[must_use]
    pub fn truncate(mut self, source: impl Into<String>, width: usize) -> Self {
        self.fields.push(PartitionField {
            source: source.into(),
            transform: Transform::Truncate(width),
        });
        self
    }

    /// Builds the spec.
    pub fn build(self) -> PartitionSpec {
        PartitionSpec {
            fields: self.fields,
        }
    }
}

/// A partitioning scheme validated against a concrete schema.
///
/// Binding fails on non-identity transforms, unknown fields, and
/// duplicate fields, so the positions held here are known-good for every
/// row that passes schema validation. The scheme is fixed for the life of
/// the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundPartitionSpec {
    positions: Vec<usize>,
    field_names: Vec<String>,
}

impl BoundPartitionSpec {
    /// Validates `spec` against `schema` and fixes field positions.
    pub fn bind(spec: &PartitionSpec, schema: &Schema) -> StoreResult<Self> {
        let mut positions = Vec::with_capacity(spec.fields().len());
        let mut field_names = Vec::with_capacity(spec.fields().len());

        for field in spec.fields() {
            if field.transform != Transform::Identity {
                return Err(StoreError::invalid_partition_spec(format!(
                    "partition field `{}` uses non-identity transform {}",
                    field.source, field.transform
                )));
            }
            let position = schema.index_of(&field.source).ok_or_else(|| {
                StoreError::invalid_partition_spec(format!(
                    "partition field `{}` is not in the table schema",
                    field.source
                ))
            })?;
            if field_names.contains(&field.source) {
                return Err(StoreError::invalid_partition_spec(format!(
                    "partition field `{}` is declared twice",
                    field.source
                )));
            }
            positions.push(position);
            field_names.push(field.source.clone());
        }

        Ok(Self {
            positions,
            field_names,
        })
    }

    /// Extracts the partition key of a row.
    ///
    /// Positions were validated at bind time against the same schema the
    /// row was validated against, so an out-of-range position here is a
    /// programming error and panics.
    pub fn key_of(&self, row: &Row) -> PartitionKey {
        let values = self
            .positions
            .iter()
            .map(|&p| row.values()[p].clone())
            .collect();
        PartitionKey(values)
    }

    /// Returns the schema positions of the partition fields, in key order.
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Returns the partition field names, in key order.
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    /// Returns the position of `name` within the key, if it is a
    /// partition field.
    pub fn key_index_of(&self, name: &str) -> Option<usize> {
        self.field_names.iter().position(|f| f == name)
    }

    /// Returns the number of partition fields.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if the table is unpartitioned.
    pub fn is_unpartitioned(&self) -> bool {
        self.positions.is_empty()
    }
}

/// An ordered tuple of values identifying a partition.
///
/// Two rows belong to the same partition iff their extracted keys are
/// equal by value. Unpartitioned tables use the empty key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartitionKey(Vec<Value>);

impl PartitionKey {
    /// Creates a key from its components.
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    /// Returns the key components.
    pub fn values(&self) -> &[Value] {
        &self.0
    }

    /// Returns the number of components.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if this is the empty (unpartitioned) key.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, ")")
    }
}
