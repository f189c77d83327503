//! Store and write transactions
//!
//! ## Design
//!
//! The store is single-writer: at most one [`WriteTransaction`] is open at a
//! time. A transaction works on a private copy of the committed state, so
//! nothing it does is visible outside the transaction until `commit`.
//!
//! ## Rollback Guarantee
//!
//! Dropping an unfinished transaction rolls it back. Scenario code can
//! therefore unwind on any path (early return, assertion failure, panic)
//! without leaking state into the committed store.
//!
//! ## Invalidation
//!
//! `delete_container` removes the container from the working state and
//! records its id in a tombstone set. Every managed handle rooted in that
//! container observes the tombstone and reports `Error::Invalidated` from
//! then on. The transition is permanent for the life of the transaction.

use crate::managed::ManagedList;
use crate::types::{Container, ContainerId, ListSlot};
use parking_lot::Mutex;
use shelf_core::{Error, Kind, Result};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Committed state: containers visible outside any transaction
#[derive(Debug, Default)]
struct StoreState {
    containers: HashMap<ContainerId, Container>,
}

/// Working state of one write transaction, shared with minted handles
#[derive(Debug, Default)]
pub(crate) struct TxnState {
    /// Private copy of the committed containers plus in-transaction changes
    pub containers: HashMap<ContainerId, Container>,
    /// Containers deleted inside this transaction
    pub deleted: HashSet<ContainerId>,
    /// Set once the transaction commits or rolls back
    pub closed: bool,
}

/// In-memory transacted container store
///
/// Cheap to clone; all clones share the same committed state.
#[derive(Clone)]
pub struct Store {
    inner: Arc<Mutex<StoreState>>,
    writer_active: Arc<AtomicBool>,
}

impl Store {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreState::default())),
            writer_active: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Open a write transaction
    ///
    /// # Errors
    /// `Error::Storage` if another write transaction is already active.
    pub fn begin_write(&self) -> Result<WriteTransaction> {
        if self
            .writer_active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::Storage(
                "write transaction already active".to_string(),
            ));
        }

        let containers = self.inner.lock().containers.clone();
        tracing::debug!(containers = containers.len(), "write transaction opened");
        Ok(WriteTransaction {
            store: self.clone(),
            state: Arc::new(Mutex::new(TxnState {
                containers,
                deleted: HashSet::new(),
                closed: false,
            })),
            finished: false,
        })
    }

    /// Number of containers in committed state
    pub fn container_count(&self) -> usize {
        self.inner.lock().containers.len()
    }

    /// Whether committed state holds no containers
    pub fn is_empty(&self) -> bool {
        self.container_count() == 0
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

/// One open write transaction
///
/// Consumed by `commit`/`rollback`; dropping an unfinished transaction
/// rolls it back.
pub struct WriteTransaction {
    store: Store,
    state: Arc<Mutex<TxnState>>,
    finished: bool,
}

impl WriteTransaction {
    /// Create a fresh container inside this transaction
    pub fn create_container(&self) -> Result<ContainerId> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(Error::TransactionClosed);
        }
        let id = ContainerId::new();
        state.containers.insert(id, Container::new(id));
        tracing::debug!(container = %id, "container created");
        Ok(id)
    }

    /// Register a list property on a container and return a handle to it
    ///
    /// Idempotent when the property already exists with the same kind.
    ///
    /// # Errors
    /// - `Error::Invalidated` if the container was deleted in this transaction
    /// - `Error::TypeMismatch` if the property exists with a different kind
    pub fn attach_list(
        &self,
        container: ContainerId,
        property: &str,
        kind: Kind,
    ) -> Result<ManagedList> {
        {
            let mut state = self.state.lock();
            if state.closed {
                return Err(Error::TransactionClosed);
            }
            if state.deleted.contains(&container) {
                return Err(Error::Invalidated);
            }
            let entry = state
                .containers
                .get_mut(&container)
                .ok_or_else(|| Error::Storage(format!("unknown container {container}")))?;
            match entry.lists.get(property) {
                Some(slot) if slot.kind != kind => {
                    return Err(Error::TypeMismatch {
                        expected: slot.kind,
                        actual: kind.name().to_string(),
                    });
                }
                Some(_) => {}
                None => {
                    entry
                        .lists
                        .insert(property.to_string(), ListSlot::new(kind));
                }
            }
        }
        Ok(ManagedList::new(
            Arc::clone(&self.state),
            container,
            property.to_string(),
            kind,
        ))
    }

    /// Open an existing list property on a container
    ///
    /// # Errors
    /// - `Error::Invalidated` if the container was deleted in this transaction
    /// - `Error::UnknownKey` if the property was never attached
    pub fn open_list(&self, container: ContainerId, property: &str) -> Result<ManagedList> {
        let kind = {
            let state = self.state.lock();
            if state.closed {
                return Err(Error::TransactionClosed);
            }
            if state.deleted.contains(&container) {
                return Err(Error::Invalidated);
            }
            let entry = state
                .containers
                .get(&container)
                .ok_or_else(|| Error::Storage(format!("unknown container {container}")))?;
            entry
                .lists
                .get(property)
                .ok_or_else(|| Error::UnknownKey {
                    property: property.to_string(),
                })?
                .kind
        };
        Ok(ManagedList::new(
            Arc::clone(&self.state),
            container,
            property.to_string(),
            kind,
        ))
    }

    /// Delete a container, permanently invalidating every handle rooted in it
    ///
    /// # Errors
    /// - `Error::Invalidated` if the container was already deleted
    pub fn delete_container(&self, container: ContainerId) -> Result<()> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(Error::TransactionClosed);
        }
        if state.deleted.contains(&container) {
            return Err(Error::Invalidated);
        }
        if state.containers.remove(&container).is_none() {
            return Err(Error::Storage(format!("unknown container {container}")));
        }
        state.deleted.insert(container);
        tracing::debug!(container = %container, "container deleted");
        Ok(())
    }

    /// Publish the transaction's changes to committed state
    pub fn commit(mut self) -> Result<()> {
        let containers = {
            let mut state = self.state.lock();
            if state.closed {
                return Err(Error::TransactionClosed);
            }
            state.closed = true;
            std::mem::take(&mut state.containers)
        };
        let count = containers.len();
        self.store.inner.lock().containers = containers;
        self.store.writer_active.store(false, Ordering::Release);
        self.finished = true;
        tracing::debug!(containers = count, "write transaction committed");
        Ok(())
    }

    /// Discard the transaction's changes
    pub fn rollback(mut self) {
        self.close_discarding();
        self.finished = true;
    }

    fn close_discarding(&self) {
        let mut state = self.state.lock();
        if !state.closed {
            state.closed = true;
            state.containers.clear();
            state.deleted.clear();
            self.store.writer_active.store(false, Ordering::Release);
            tracing::debug!("write transaction rolled back");
        }
    }
}

impl Drop for WriteTransaction {
    fn drop(&mut self) {
        if !self.finished {
            self.close_discarding();
        }
    }
}
