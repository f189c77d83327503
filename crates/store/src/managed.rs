//! Managed list handle
//!
//! A `ManagedList` is a facade over the shared transaction state. It holds
//! no elements of its own; every access revalidates, in order:
//!
//! 1. transaction still open (else `Error::TransactionClosed`)
//! 2. parent container alive (else `Error::Invalidated`)
//! 3. list property present (else `Error::UnknownKey`)
//!
//! Element-kind and bounds enforcement live one layer up in the uniform
//! list contract, which is shared with the transient backing.

use crate::store::TxnState;
use crate::types::ContainerId;
use parking_lot::Mutex;
use shelf_core::{Error, Kind, Result, Value};
use std::sync::Arc;

/// Handle to one list property of a container inside a write transaction
#[derive(Clone, Debug)]
pub struct ManagedList {
    txn: Arc<Mutex<TxnState>>,
    container: ContainerId,
    property: String,
    kind: Kind,
}

impl ManagedList {
    pub(crate) fn new(
        txn: Arc<Mutex<TxnState>>,
        container: ContainerId,
        property: String,
        kind: Kind,
    ) -> Self {
        Self {
            txn,
            container,
            property,
            kind,
        }
    }

    /// Declared element kind of this list
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Identity of the owning container
    pub fn container(&self) -> ContainerId {
        self.container
    }

    /// Whether the parent container was deleted
    ///
    /// Once true, stays true for the life of the transaction; every other
    /// operation fails with `Error::Invalidated`.
    pub fn is_invalidated(&self) -> bool {
        self.txn.lock().deleted.contains(&self.container)
    }

    /// Run a closure over the current elements
    pub fn read<R>(&self, f: impl FnOnce(&[Value]) -> R) -> Result<R> {
        let state = self.txn.lock();
        if state.closed {
            return Err(Error::TransactionClosed);
        }
        if state.deleted.contains(&self.container) {
            return Err(Error::Invalidated);
        }
        let container = state
            .containers
            .get(&self.container)
            .ok_or_else(|| Error::Storage(format!("unknown container {}", self.container)))?;
        let slot = container
            .lists
            .get(&self.property)
            .ok_or_else(|| Error::UnknownKey {
                property: self.property.clone(),
            })?;
        Ok(f(&slot.elements))
    }

    /// Run a closure over the current elements, mutably
    pub fn write<R>(&self, f: impl FnOnce(&mut Vec<Value>) -> R) -> Result<R> {
        let mut state = self.txn.lock();
        if state.closed {
            return Err(Error::TransactionClosed);
        }
        if state.deleted.contains(&self.container) {
            return Err(Error::Invalidated);
        }
        let container = state
            .containers
            .get_mut(&self.container)
            .ok_or_else(|| Error::Storage(format!("unknown container {}", self.container)))?;
        let slot = container
            .lists
            .get_mut(&self.property)
            .ok_or_else(|| Error::UnknownKey {
                property: self.property.clone(),
            })?;
        Ok(f(&mut slot.elements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    fn fixture() -> (Store, crate::store::WriteTransaction, ManagedList) {
        let store = Store::new();
        let txn = store.begin_write().unwrap();
        let container = txn.create_container().unwrap();
        let list = txn.attach_list(container, "items", Kind::String).unwrap();
        (store, txn, list)
    }

    #[test]
    fn test_read_write_round_trip() {
        let (_store, _txn, list) = fixture();
        list.write(|elements| elements.push(Value::from("a"))).unwrap();
        let len = list.read(|elements| elements.len()).unwrap();
        assert_eq!(len, 1);
    }

    #[test]
    fn test_fresh_handle_not_invalidated() {
        let (_store, _txn, list) = fixture();
        assert!(!list.is_invalidated());
        assert_eq!(list.kind(), Kind::String);
    }

    #[test]
    fn test_invalidation_is_permanent() {
        let (_store, txn, list) = fixture();
        txn.delete_container(list.container()).unwrap();
        assert!(list.is_invalidated());
        assert_eq!(list.read(|e| e.len()).unwrap_err(), Error::Invalidated);
        assert_eq!(
            list.write(|e| e.push(Value::from("x"))).unwrap_err(),
            Error::Invalidated
        );
        assert!(list.is_invalidated(), "invalidation never reverses");
    }

    #[test]
    fn test_clone_shares_state() {
        let (_store, _txn, list) = fixture();
        let alias = list.clone();
        list.write(|elements| elements.push(Value::from("a"))).unwrap();
        assert_eq!(alias.read(|e| e.len()).unwrap(), 1);
    }
}
