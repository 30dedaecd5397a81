//! Write sessions and write modes.
//!
//! A `WriteSession` is bound to one write request. It accumulates the
//! write mode through at most one `truncate()` or `overwrite()` call —
//! each of which mutates the table's key set immediately — and then
//! executes the actual insertion through the legacy single-shot path.
//! Mode-setting methods consume and return the session, and `insert`
//! consumes it outright, so a session cannot be reused.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use terrace_model::{Expr, RecordBatch, Row};

use crate::error::{StoreError, StoreResult};
use crate::matcher::matching_keys;
use crate::partition::PartitionKey;
use crate::table::PartitionedTable;

/// How newly submitted rows interact with existing partition contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Concatenate after existing rows.
    #[default]
    Append,
    /// All partitions were cleared before insertion.
    Truncate,
    /// Filter-selected partitions were removed before insertion.
    Overwrite,
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WriteMode::Append => "append",
            WriteMode::Truncate => "truncate",
            WriteMode::Overwrite => "overwrite",
        };
        write!(f, "{}", name)
    }
}

/// A single-use write against one table.
///
/// The surrounding write coordinator serializes sessions per table; the
/// session itself takes no table-wide lock across its calls.
#[derive(Debug)]
pub struct WriteSession {
    table: Arc<PartitionedTable>,
    mode: WriteMode,
}

impl WriteSession {
    /// Begins a write session in append mode.
    pub fn new(table: Arc<PartitionedTable>) -> Self {
        Self {
            table,
            mode: WriteMode::Append,
        }
    }

    /// Returns the accumulated write mode.
    pub fn mode(&self) -> WriteMode {
        self.mode
    }

    /// Switches to truncate mode, clearing the table immediately.
    ///
    /// At most one of `truncate`/`overwrite` may be called per session;
    /// a second mode-setting call is a contract violation.
    pub fn truncate(mut self) -> StoreResult<Self> {
        self.check_mode_unset()?;
        self.table.clear();
        self.mode = WriteMode::Truncate;
        debug!("write on table {} switched to truncate", self.table.name());
        Ok(self)
    }

    /// Switches to overwrite mode, removing the partitions covered by
    /// `filters` immediately.
    ///
    /// The covered key set is computed in full before anything is
    /// removed; an unsupported filter therefore leaves the table
    /// untouched.
    pub fn overwrite(mut self, filters: &[Expr]) -> StoreResult<Self> {
        self.check_mode_unset()?;
        let existing = self.table.partition_keys();
        let keys = matching_keys(&existing, self.table.partition_spec(), filters)?;
        self.table.remove_keys(&keys);
        self.mode = WriteMode::Overwrite;
        debug!(
            "write on table {} switched to overwrite, removed {} of {} partitions",
            self.table.name(),
            keys.len(),
            existing.len()
        );
        Ok(self)
    }

    /// Inserts a batch through the legacy single-shot path, consuming the
    /// session. Returns the number of rows written.
    ///
    /// `overwrite` is the legacy contract's replace-intent flag. Overwrite
    /// decisions were already applied by `truncate()`/`overwrite()`, so a
    /// `true` here is a contract violation and fails loudly rather than
    /// being silently accepted.
    pub fn insert(self, batch: RecordBatch, overwrite: bool) -> StoreResult<u64> {
        if overwrite {
            return Err(StoreError::contract_violation(
                "legacy insert must not re-assert overwrite; \
                 use overwrite() or truncate() before submitting data",
            ));
        }
        if batch.schema().as_ref() != self.table.schema().as_ref() {
            return Err(StoreError::schema_mismatch(format!(
                "batch schema {} does not match table schema {}",
                batch.schema(),
                self.table.schema()
            )));
        }

        let spec = self.table.partition_spec().clone();
        let mut groups: HashMap<PartitionKey, Vec<Row>> = HashMap::new();
        let mut count = 0u64;
        for row in batch.into_rows() {
            let key = spec.key_of(&row);
            groups.entry(key).or_default().push(row);
            count += 1;
        }

        let partitions = groups.len();
        for (key, rows) in groups {
            self.table.merge_or_replace(key, rows, self.mode)?;
        }

        info!(
            "wrote {} rows across {} partitions to table {} in {} mode",
            count,
            partitions,
            self.table.name(),
            self.mode
        );
        Ok(count)
    }

    fn check_mode_unset(&self) -> StoreResult<()> {
        if self.mode != WriteMode::Append {
            return Err(StoreError::contract_violation(format!(
                "write mode already set to {}; at most one of truncate()/overwrite() \
                 may be called per session",
                self.mode
            )));
        }
        Ok(())
    }
}
