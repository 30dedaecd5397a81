//! The partitioned table.
//!
//! `PartitionedTable` owns the mapping from partition key to rows and the
//! three primitive mutations the write session drives: clear, remove by
//! key set, and merge-or-replace insertion. Writers hold the partition
//! lock for the whole mutation; readers hold it while snapshotting.

use std::collections::{HashMap, HashSet};
use std::collections::hash_map::Entry;
use std::sync::Arc;

use parking_lot::RwLock;

use terrace_model::{RecordBatch, Row, Schema};

use crate::capability::Capabilities;
use crate::config::TableConfig;
use crate::error::{StoreError, StoreResult};
use crate::partition::{BoundPartitionSpec, PartitionKey};
use crate::session::WriteMode;

/// An in-memory table partitioned by identity fields.
///
/// Invariants:
/// - every row stored under key `K` extracts to exactly `K`;
/// - the partitioning scheme is immutable after construction;
/// - row order within a partition is append order.
#[derive(Debug)]
pub struct PartitionedTable {
    name: String,
    schema: Arc<Schema>,
    spec: BoundPartitionSpec,
    properties: HashMap<String, String>,
    capabilities: Capabilities,
    partitions: RwLock<HashMap<PartitionKey, Vec<Row>>>,
}

impl PartitionedTable {
    /// Creates a table, binding the declared partition spec to the schema.
    ///
    /// Fails with [`StoreError::InvalidPartitionSpec`] if the scheme uses
    /// a non-identity transform or references an unknown or duplicate
    /// field; no table is created in that case.
    pub fn create(
        name: impl Into<String>,
        schema: Arc<Schema>,
        config: TableConfig,
    ) -> StoreResult<Self> {
        let spec = BoundPartitionSpec::bind(&config.partition_spec, &schema)?;
        Ok(Self {
            name: name.into(),
            schema,
            spec,
            properties: config.properties,
            capabilities: Capabilities::all(),
            partitions: RwLock::new(HashMap::new()),
        })
    }

    /// Returns the table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the table schema.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Returns the bound partition spec.
    pub fn partition_spec(&self) -> &BoundPartitionSpec {
        &self.spec
    }

    /// Returns the table properties.
    pub fn properties(&self) -> &HashMap<String, String> {
        &self.properties
    }

    /// Returns the advertised write capabilities.
    ///
    /// Consumed by an external write planner; the store itself never
    /// branches on it.
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Empties the partition map. Always succeeds.
    pub fn clear(&self) {
        self.partitions.write().clear();
    }

    /// Deletes exactly the given partitions. Removing an absent key is a
    /// no-op, so the operation is idempotent.
    pub fn remove_keys(&self, keys: &HashSet<PartitionKey>) {
        let mut partitions = self.partitions.write();
        for key in keys {
            partitions.remove(key);
        }
    }

    /// Inserts `rows` under `key` according to `mode`.
    ///
    /// Append concatenates after any existing rows. A non-append mode
    /// must find the partition absent: truncate/overwrite already evicted
    /// the key before insertion, so finding it present means the pre-step
    /// and the insertion disagreed. That returns
    /// [`StoreError::PartitionNotRemoved`] and is never silently papered
    /// over.
    pub fn merge_or_replace(
        &self,
        key: PartitionKey,
        rows: Vec<Row>,
        mode: WriteMode,
    ) -> StoreResult<()> {
        let mut partitions = self.partitions.write();
        match partitions.entry(key) {
            Entry::Occupied(mut entry) => {
                if mode != WriteMode::Append {
                    return Err(StoreError::partition_not_removed(entry.key()));
                }
                entry.get_mut().extend(rows);
            }
            Entry::Vacant(entry) => {
                entry.insert(rows);
            }
        }
        Ok(())
    }

    /// Returns all rows across all partitions.
    ///
    /// Order within a partition is preserved; order across partitions is
    /// unspecified.
    pub fn snapshot(&self) -> Vec<Row> {
        let partitions = self.partitions.read();
        let mut rows = Vec::with_capacity(partitions.values().map(Vec::len).sum());
        for partition in partitions.values() {
            rows.extend(partition.iter().cloned());
        }
        rows
    }

    /// Returns the snapshot as a schema-typed batch.
    pub fn scan(&self) -> StoreResult<RecordBatch> {
        RecordBatch::try_new(self.schema.clone(), self.snapshot())
            .map_err(StoreError::schema_mismatch)
    }

    /// Returns the current partition keys.
    pub fn partition_keys(&self) -> Vec<PartitionKey> {
        self.partitions.read().keys().cloned().collect()
    }

    /// Returns the number of partitions.
    pub fn partition_count(&self) -> usize {
        self.partitions.read().len()
    }

    /// Returns the total number of rows.
    pub fn row_count(&self) -> usize {
        self.partitions.read().values().map(Vec::len).sum()
    }

    /// Returns true if the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.partitions.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::PartitionSpec;
    use terrace_model::{DataType, Field, Value};

    fn test_table() -> PartitionedTable {
        let schema = Arc::new(Schema::new(vec![
            Field::not_null("a", DataType::Int),
            Field::nullable("b", DataType::Text),
        ]));
        let config = TableConfig::new()
            .with_partition_spec(PartitionSpec::builder().identity("a").build());
        PartitionedTable::create("t", schema, config).unwrap()
    }

    fn row(a: i32, b: &str) -> Row {
        Row::new(vec![Value::int(a), Value::string(b)])
    }

    fn key(a: i32) -> PartitionKey {
        PartitionKey::new(vec![Value::int(a)])
    }

    #[test]
    fn test_create_rejects_bad_spec() {
        let schema = Arc::new(Schema::new(vec![Field::not_null("a", DataType::Int)]));
        let config = TableConfig::new()
            .with_partition_spec(PartitionSpec::builder().bucket("a", 4).build());
        let err = PartitionedTable::create("t", schema, config).unwrap_err();
        assert!(matches!(err, StoreError::InvalidPartitionSpec { .. }));
    }

    #[test]
    fn test_append_merges_in_order() {
        let table = test_table();
        table
            .merge_or_replace(key(1), vec![row(1, "x")], WriteMode::Append)
            .unwrap();
        table
            .merge_or_replace(key(1), vec![row(1, "y")], WriteMode::Append)
            .unwrap();

        assert_eq!(table.partition_count(), 1);
        assert_eq!(table.snapshot(), vec![row(1, "x"), row(1, "y")]);
    }

    #[test]
    fn test_non_append_into_present_partition_fails() {
        let table = test_table();
        table
            .merge_or_replace(key(1), vec![row(1, "x")], WriteMode::Append)
            .unwrap();

        let err = table
            .merge_or_replace(key(1), vec![row(1, "z")], WriteMode::Overwrite)
            .unwrap_err();
        assert!(err.is_internal());

        // The partition is untouched by the failed insertion.
        assert_eq!(table.snapshot(), vec![row(1, "x")]);
    }

    #[test]
    fn test_non_append_into_absent_partition_inserts() {
        let table = test_table();
        table
            .merge_or_replace(key(2), vec![row(2, "n")], WriteMode::Truncate)
            .unwrap();
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_remove_keys_is_idempotent() {
        let table = test_table();
        table
            .merge_or_replace(key(1), vec![row(1, "x")], WriteMode::Append)
            .unwrap();

        let keys = HashSet::from([key(1), key(99)]);
        table.remove_keys(&keys);
        table.remove_keys(&keys);
        assert!(table.is_empty());
    }

    #[test]
    fn test_clear() {
        let table = test_table();
        table
            .merge_or_replace(key(1), vec![row(1, "x")], WriteMode::Append)
            .unwrap();
        table
            .merge_or_replace(key(2), vec![row(2, "y")], WriteMode::Append)
            .unwrap();
        table.clear();
        assert_eq!(table.partition_count(), 0);
        assert!(table.snapshot().is_empty());
    }

    #[test]
    fn test_stored_rows_extract_to_their_key() {
        let table = test_table();
        table
            .merge_or_replace(key(1), vec![row(1, "x")], WriteMode::Append)
            .unwrap();
        table
            .merge_or_replace(key(2), vec![row(2, "y")], WriteMode::Append)
            .unwrap();

        for r in table.snapshot() {
            let extracted = table.partition_spec().key_of(&r);
            assert!(table.partition_keys().contains(&extracted));
        }
    }

    #[test]
    fn test_scan_shape() {
        let table = test_table();
        table
            .merge_or_replace(key(1), vec![row(1, "x")], WriteMode::Append)
            .unwrap();
        let batch = table.scan().unwrap();
        assert_eq!(batch.num_rows(), 1);
        assert_eq!(batch.schema().as_ref(), table.schema().as_ref());
    }

    #[test]
    fn test_capabilities_advertised() {
        let table = test_table();
        assert_eq!(table.capabilities(), Capabilities::all());
    }
}
