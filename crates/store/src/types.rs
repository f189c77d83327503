//! Container types for the store
//!
//! A container is the parent object that owns named, kind-tagged lists.
//! Containers only exist inside the store; handles refer to them by
//! [`ContainerId`].

use serde::{Deserialize, Serialize};
use shelf_core::{Kind, Value};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a container
///
/// A ContainerId is a wrapper around a UUID v4, providing unique
/// identification for each parent object in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerId(Uuid);

impl ContainerId {
    /// Create a new random ContainerId using UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a ContainerId from raw bytes
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Get the raw bytes of this ContainerId
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for ContainerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One named, kind-tagged ordered collection inside a container
#[derive(Debug, Clone)]
pub(crate) struct ListSlot {
    /// Declared element kind
    pub kind: Kind,
    /// Elements in list order
    pub elements: Vec<Value>,
}

impl ListSlot {
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            elements: Vec::new(),
        }
    }
}

/// A parent object owning named lists
#[derive(Debug, Clone)]
pub(crate) struct Container {
    /// Identity of this container
    pub id: ContainerId,
    /// List properties by name
    pub lists: HashMap<String, ListSlot>,
}

impl Container {
    pub fn new(id: ContainerId) -> Self {
        Self {
            id,
            lists: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_id_unique() {
        assert_ne!(ContainerId::new(), ContainerId::new());
    }

    #[test]
    fn test_container_id_from_bytes_stable() {
        let bytes = [7u8; 16];
        assert_eq!(ContainerId::from_bytes(bytes), ContainerId::from_bytes(bytes));
        assert_eq!(ContainerId::from_bytes(bytes).as_bytes(), &bytes);
    }

    #[test]
    fn test_fresh_slot_is_empty() {
        let slot = ListSlot::new(Kind::Int64);
        assert_eq!(slot.kind, Kind::Int64);
        assert!(slot.elements.is_empty());
    }

    #[test]
    fn test_fresh_container_has_no_lists() {
        let container = Container::new(ContainerId::new());
        assert!(container.lists.is_empty());
    }
}
