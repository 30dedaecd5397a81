//! Table construction configuration.
//!
//! This module provides the options a caller supplies when creating a
//! table: the partitioning scheme and free-form properties.

use std::collections::HashMap;

use crate::partition::PartitionSpec;

/// Configuration for creating a table.
#[derive(Debug, Clone, Default)]
pub struct TableConfig {
    /// Declared partitioning scheme.
    pub partition_spec: PartitionSpec,

    /// Free-form table properties, carried but not interpreted.
    pub properties: HashMap<String, String>,
}

impl TableConfig {
    /// Creates a configuration for an unpartitioned table with no
    /// properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the partition spec.
    #[must_use]
    pub fn with_partition_spec(mut self, spec: PartitionSpec) -> Self {
        self.partition_spec = spec;
        self
    }

    /// Adds a single property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Replaces the property map.
    #[must_use]
    pub fn with_properties(mut self, properties: HashMap<String, String>) -> Self {
        self.properties = properties;
        self
    }
}
