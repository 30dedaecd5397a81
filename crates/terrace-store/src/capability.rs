//! Static write-capability descriptor.
//!
//! Tables advertise which write paths they support as a fixed set of
//! named capabilities. The descriptor is metadata for an external write
//! planner; the store exposes it but never branches on it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single advertised write capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Native batch writes.
    BatchWrite,
    /// Legacy single-shot batch writes (the fallback insertion contract).
    LegacyBatchWrite,
    /// Overwrite of partitions selected by filter.
    OverwriteByFilter,
    /// Full table truncation.
    Truncate,
}

impl Capability {
    /// All capabilities, in declaration order.
    pub const ALL: [Capability; 4] = [
        Capability::BatchWrite,
        Capability::LegacyBatchWrite,
        Capability::OverwriteByFilter,
        Capability::Truncate,
    ];

    const fn mask(self) -> u8 {
        match self {
            Capability::BatchWrite => 1 << 0,
            Capability::LegacyBatchWrite => 1 << 1,
            Capability::OverwriteByFilter => 1 << 2,
            Capability::Truncate => 1 << 3,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::BatchWrite => "batch_write",
            Capability::LegacyBatchWrite => "legacy_batch_write",
            Capability::OverwriteByFilter => "overwrite_by_filter",
            Capability::Truncate => "truncate",
        };
        write!(f, "{}", name)
    }
}

/// A set of capabilities, stored as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities(u8);

impl Capabilities {
    /// Returns the empty set.
    pub const fn none() -> Self {
        Self(0)
    }

    /// Returns the set of every capability.
    pub const fn all() -> Self {
        Self(
            Capability::BatchWrite.mask()
                | Capability::LegacyBatchWrite.mask()
                | Capability::OverwriteByFilter.mask()
                | Capability::Truncate.mask(),
        )
    }

    /// Adds a capability.
    #[must_use]
    pub const fn with(self, capability: Capability) -> Self {
        Self(self.0 | capability.mask())
    }

    /// Returns true if the set contains `capability`.
    pub const fn contains(self, capability: Capability) -> bool {
        self.0 & capability.mask() != 0
    }

    /// Returns an iterator over the contained capabilities.
    pub fn iter(self) -> impl Iterator<Item = Capability> {
        Capability::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for capability in self.iter() {
            if !first {
                write!(f, " | ")?;
            }
            write!(f, "{}", capability)?;
            first = false;
        }
        if first {
            write!(f, "none")?;
        }
        Ok(())
    }
}
