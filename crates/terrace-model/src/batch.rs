//! Record batch: schema-typed groups of rows.
//!
//! `RecordBatch` is the tabular exchange representation at the store
//! boundary. It is row-major: the store only ever needs positional access
//! and per-row iteration, never columnar slicing.

use std::sync::Arc;

use crate::row::Row;
use crate::schema::Schema;

/// A batch of rows sharing one schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordBatch {
    /// The schema of this batch.
    schema: Arc<Schema>,
    /// The rows in this batch, in arrival order.
    rows: Vec<Row>,
}

impl RecordBatch {
    /// Creates a new record batch, validating each row against the schema.
    ///
    /// Returns an error if any row's column count differs from the schema's
    /// field count.
    pub fn try_new(schema: Arc<Schema>, rows: Vec<Row>) -> Result<Self, String> {
        let num_cols = schema.len();
        for (i, row) in rows.iter().enumerate() {
            if row.num_columns() != num_cols {
                return Err(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.num_columns(),
                    num_cols
                ));
            }
        }
        Ok(Self { schema, rows })
    }

    /// Creates an empty record batch with the given schema.
    pub fn empty(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// Returns the schema of this batch.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Returns the number of rows in this batch.
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Returns the number of columns in this batch.
    pub fn num_columns(&self) -> usize {
        self.schema.len()
    }

    /// Returns true if this batch has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the rows as a slice.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the row at the given index.
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Consumes the batch and returns its rows.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Returns an iterator over the rows.
    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }
}
