//! Storage mode capability flag
//!
//! A collection is either transient (process memory only, unconditionally
//! valid) or managed (owned by a transacted store, lifetime tied to a parent
//! container). Both modes share one observable contract; the flag is
//! threaded through construction rather than split into divergent types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a collection is backed by process memory or by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageMode {
    /// Standalone collection in process memory; never invalidates
    Transient,
    /// Collection owned by a container inside a write transaction;
    /// invalidates permanently when the container is deleted
    Managed,
}

impl StorageMode {
    /// Both modes, transient first
    pub fn all() -> &'static [StorageMode] {
        &[StorageMode::Transient, StorageMode::Managed]
    }

    /// Whether this mode requires an enclosing write transaction
    pub fn is_managed(&self) -> bool {
        matches!(self, StorageMode::Managed)
    }

    /// Canonical name of this mode
    pub fn name(&self) -> &'static str {
        match self {
            StorageMode::Transient => "transient",
            StorageMode::Managed => "managed",
        }
    }

    /// Parse a mode from its canonical name
    pub fn from_name(name: &str) -> Option<StorageMode> {
        StorageMode::all().iter().copied().find(|m| m.name() == name)
    }
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
