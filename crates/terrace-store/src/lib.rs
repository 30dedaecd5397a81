//! # terrace-store
//!
//! In-memory partitioned table store with three write semantics: append,
//! overwrite-by-filter, and full truncate.
//!
//! The store validates that a legacy single-shot insertion contract can
//! be layered under a partition-aware write builder without losing
//! correctness. A write flows as:
//!
//! 1. look up or create a table in the [`TableRegistry`];
//! 2. begin a [`WriteSession`], optionally calling `truncate()` or
//!    `overwrite(filters)` exactly once — the key removal happens at
//!    call time;
//! 3. submit rows through the session's legacy `insert` path, which
//!    partitions them and applies them under the recorded mode.
//!
//! Everything is synchronous in-memory computation; writes per table are
//! assumed to be serialized by the surrounding coordinator.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use terrace_model::{DataType, Field, RecordBatch, Row, Schema, Value};
//! use terrace_store::{PartitionSpec, StoreResult, TableConfig, TableRegistry};
//!
//! fn example() -> StoreResult<()> {
//!     let registry = TableRegistry::new();
//!     let schema = Arc::new(Schema::new(vec![
//!         Field::not_null("a", DataType::Int),
//!         Field::nullable("b", DataType::Text),
//!     ]));
//!     let config = TableConfig::new()
//!         .with_partition_spec(PartitionSpec::builder().identity("a").build());
//!     let table = registry.get_or_create("events", schema.clone(), config)?;
//!
//!     let rows = vec![Row::new(vec![Value::int(1), Value::string("x")])];
//!     let batch = RecordBatch::try_new(schema, rows)
//!         .map_err(terrace_store::StoreError::schema_mismatch)?;
//!     registry.begin_write("events")?.insert(batch, false)?;
//!
//!     assert_eq!(table.row_count(), 1);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Write-capability descriptors
pub mod capability;
/// Table construction configuration
pub mod config;
/// Error types
pub mod error;
/// Filter-to-key matching
pub mod matcher;
/// Partition specs and keys
pub mod partition;
/// Table registry
pub mod registry;
/// Write sessions
pub mod session;
/// The partitioned table
pub mod table;

pub use capability::{Capabilities, Capability};
pub use config::TableConfig;
pub use error::{StoreError, StoreResult};
pub use matcher::matching_keys;
pub use partition::{BoundPartitionSpec, PartitionField, PartitionKey, PartitionSpec, Transform};
pub use registry::TableRegistry;
pub use session::{WriteMode, WriteSession};
pub use table::PartitionedTable;
