//! Store error types.
//!
//! This module defines all error types for the partitioned store.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Invalid partitioning scheme at table construction.
    #[error("invalid partition spec: {reason}")]
    InvalidPartitionSpec {
        /// Why the spec was rejected.
        reason: String,
    },

    /// Overwrite filters cannot be fully attributed to partition-field
    /// equality. Raised before any partition is removed.
    #[error("unsupported overwrite filter: {reason}")]
    UnsupportedFilter {
        /// Why the filter was rejected.
        reason: String,
    },

    /// A non-append insertion targeted a partition that is still present.
    /// The truncate/overwrite pre-step and the insertion step disagreed;
    /// this is an assertion-class failure and is never retried.
    #[error("partition {key} was not removed properly")]
    PartitionNotRemoved {
        /// Display form of the offending partition key.
        key: String,
    },

    /// A caller broke the write-session contract, e.g. the legacy insert
    /// path re-asserted overwrite, or a session received a second
    /// mode-setting call.
    #[error("write contract violation: {reason}")]
    ContractViolation {
        /// Which part of the contract was broken.
        reason: String,
    },

    /// Lookup of an unregistered table name.
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// Explicit creation of a name that is already registered.
    #[error("table already exists: {0}")]
    TableExists(String),

    /// A batch's shape disagrees with the table schema.
    #[error("schema mismatch: {reason}")]
    SchemaMismatch {
        /// How the shapes disagree.
        reason: String,
    },
}

impl StoreError {
    /// Creates an invalid partition spec error.
    pub fn invalid_partition_spec(reason: impl Into<String>) -> Self {
        Self::InvalidPartitionSpec {
            reason: reason.into(),
        }
    }

    /// Creates an unsupported filter error.
    pub fn unsupported_filter(reason: impl Into<String>) -> Self {
        Self::UnsupportedFilter {
            reason: reason.into(),
        }
    }

    /// Creates a partition-not-removed error.
    pub fn partition_not_removed(key: impl ToString) -> Self {
        Self::PartitionNotRemoved {
            key: key.to_string(),
        }
    }

    /// Creates a contract violation error.
    pub fn contract_violation(reason: impl Into<String>) -> Self {
        Self::ContractViolation {
            reason: reason.into(),
        }
    }

    /// Creates a schema mismatch error.
    pub fn schema_mismatch(reason: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            reason: reason.into(),
        }
    }

    /// Returns true if this error indicates a state-invariant breach
    /// inside the store rather than bad caller input.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::PartitionNotRemoved { .. })
    }

    /// Returns true if this error rejected an unsupported filter.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedFilter { .. })
    }

    /// Returns true if the caller can reasonably recover, e.g. by
    /// creating the table on demand.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::TableNotFound(_))
    }
}
