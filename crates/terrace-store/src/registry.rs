//! Named table registry.
//!
//! The registry maps table names to live `PartitionedTable` instances.
//! It is an explicitly constructed, explicitly passed object: create it
//! at process start, clear it between test cases, drop it at process
//! end. There is no ambient singleton.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use terrace_model::Schema;

use crate::config::TableConfig;
use crate::error::{StoreError, StoreResult};
use crate::session::WriteSession;
use crate::table::PartitionedTable;

/// Registry of tables by name.
#[derive(Debug, Default)]
pub struct TableRegistry {
    tables: RwLock<HashMap<String, Arc<PartitionedTable>>>,
}

impl TableRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table, failing if the name is already registered.
    pub fn create(
        &self,
        name: impl Into<String>,
        schema: Arc<Schema>,
        config: TableConfig,
    ) -> StoreResult<Arc<PartitionedTable>> {
        let name = name.into();
        let mut tables = self.tables.write();
        if tables.contains_key(&name) {
            return Err(StoreError::TableExists(name));
        }
        let table = Arc::new(PartitionedTable::create(name.clone(), schema, config)?);
        debug!("created table {}", name);
        tables.insert(name, table.clone());
        Ok(table)
    }

    /// Returns the table registered under `name`, creating it if absent.
    ///
    /// Creation can still fail on an invalid partition spec, in which
    /// case nothing is registered.
    pub fn get_or_create(
        &self,
        name: impl Into<String>,
        schema: Arc<Schema>,
        config: TableConfig,
    ) -> StoreResult<Arc<PartitionedTable>> {
        let name = name.into();
        let mut tables = self.tables.write();
        if let Some(table) = tables.get(&name) {
            return Ok(table.clone());
        }
        let table = Arc::new(PartitionedTable::create(name.clone(), schema, config)?);
        debug!("created table {}", name);
        tables.insert(name, table.clone());
        Ok(table)
    }

    /// Looks up a table by name.
    pub fn get(&self, name: &str) -> StoreResult<Arc<PartitionedTable>> {
        self.tables
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::TableNotFound(name.to_string()))
    }

    /// Returns true if `name` is registered.
    pub fn table_exists(&self, name: &str) -> bool {
        self.tables.read().contains_key(name)
    }

    /// Removes a table from the registry.
    pub fn drop_table(&self, name: &str) -> StoreResult<()> {
        self.tables
            .write()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::TableNotFound(name.to_string()))
    }

    /// Removes every table.
    pub fn clear_all(&self) {
        let mut tables = self.tables.write();
        info!("clearing registry of {} tables", tables.len());
        tables.clear();
    }

    /// Lists all registered table names.
    pub fn list_tables(&self) -> Vec<String> {
        self.tables.read().keys().cloned().collect()
    }

    /// Returns the number of registered tables.
    pub fn table_count(&self) -> usize {
        self.tables.read().len()
    }

    /// Begins a write session on a registered table.
    pub fn begin_write(&self, name: &str) -> StoreResult<WriteSession> {
        Ok(WriteSession::new(self.get(name)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::PartitionSpec;
    use terrace_model::{DataType, Field};

    fn test_schema() -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::not_null("a", DataType::Int),
            Field::nullable("b", DataType::Text),
        ]))
    }

    fn partitioned_config() -> TableConfig {
        TableConfig::new().with_partition_spec(PartitionSpec::builder().identity("a").build())
    }

    #[test]
    fn test_create_and_get() {
        let registry = TableRegistry::new();
        registry
            .create("t", test_schema(), partitioned_config())
            .unwrap();

        assert!(registry.table_exists("t"));
        assert_eq!(registry.table_count(), 1);
        assert_eq!(registry.get("t").unwrap().name(), "t");
    }

    #[test]
    fn test_create_duplicate_fails() {
        let registry = TableRegistry::new();
        registry
            .create("t", test_schema(), partitioned_config())
            .unwrap();
        let err = registry
            .create("t", test_schema(), partitioned_config())
            .unwrap_err();
        assert!(matches!(err, StoreError::TableExists(_)));
    }

    #[test]
    fn test_get_or_create_returns_same_instance() {
        let registry = TableRegistry::new();
        let first = registry
            .get_or_create("t", test_schema(), partitioned_config())
            .unwrap();
        let second = registry
            .get_or_create("t", test_schema(), TableConfig::new())
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.table_count(), 1);
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let registry = TableRegistry::new();
        let err = registry.get("missing").unwrap_err();
        assert!(err.is_recoverable());
        assert!(matches!(err, StoreError::TableNotFound(_)));
    }

    #[test]
    fn test_invalid_spec_registers_nothing() {
        let registry = TableRegistry::new();
        let config = TableConfig::new()
            .with_partition_spec(PartitionSpec::builder().truncate("b", 4).build());
        let err = registry
            .get_or_create("t", test_schema(), config)
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidPartitionSpec { .. }));
        assert!(!registry.table_exists("t"));
    }

    #[test]
    fn test_drop_table() {
        let registry = TableRegistry::new();
        registry
            .create("t", test_schema(), partitioned_config())
            .unwrap();
        registry.drop_table("t").unwrap();
        assert!(!registry.table_exists("t"));
        assert!(registry.drop_table("t").is_err());
    }

    #[test]
    fn test_clear_all() {
        let registry = TableRegistry::new();
        registry
            .create("t1", test_schema(), partitioned_config())
            .unwrap();
        registry
            .create("t2", test_schema(), TableConfig::new())
            .unwrap();
        registry.clear_all();
        assert_eq!(registry.table_count(), 0);
    }

    #[test]
    fn test_begin_write() {
        let registry = TableRegistry::new();
        registry
            .create("t", test_schema(), partitioned_config())
            .unwrap();
        assert!(registry.begin_write("t").is_ok());
        assert!(registry.begin_write("missing").is_err());
    }

    #[test]
    fn test_list_tables() {
        let registry = TableRegistry::new();
        registry
            .create("t1", test_schema(), TableConfig::new())
            .unwrap();
        registry
            .create("t2", test_schema(), TableConfig::new())
            .unwrap();
        let mut names = registry.list_tables();
        names.sort();
        assert_eq!(names, vec!["t1".to_string(), "t2".to_string()]);
    }
}
