//! Per-scenario fixture
//!
//! A `Scaffold` owns everything one scenario needs and nothing more: for
//! managed mode, a write transaction and a fresh parent container; for
//! transient mode, nothing at all. Dropping the scaffold drops the
//! transaction, which rolls back, so a scenario leaves no persistent residue
//! on any exit path - success, check failure, or unwind.

use shelf_core::{Error, Kind, Result, StorageMode};
use shelf_list::List;
use shelf_store::{ContainerId, Store, WriteTransaction};

/// Everything one scenario needs: mode, kind, and (managed) txn + parent
pub struct Scaffold {
    mode: StorageMode,
    kind: Kind,
    txn: Option<WriteTransaction>,
    parent: Option<ContainerId>,
}

fn property_name(kind: Kind) -> String {
    format!("{}_values", kind.name().to_ascii_lowercase())
}

impl Scaffold {
    /// Set up a scenario against `store`
    ///
    /// Managed mode opens a write transaction and creates the parent
    /// container; transient mode touches the store not at all.
    ///
    /// # Errors
    /// `Error::Storage` if the store cannot open a transaction. This is an
    /// infrastructure failure, not a contract outcome.
    pub fn new(store: &Store, mode: StorageMode, kind: Kind) -> Result<Self> {
        let (txn, parent) = match mode {
            StorageMode::Transient => (None, None),
            StorageMode::Managed => {
                let txn = store.begin_write()?;
                let parent = txn.create_container()?;
                (Some(txn), Some(parent))
            }
        };
        Ok(Self {
            mode,
            kind,
            txn,
            parent,
        })
    }

    /// Storage mode of this scenario
    pub fn mode(&self) -> StorageMode {
        self.mode
    }

    /// Element kind of this scenario
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Mint the scenario's fresh collection
    ///
    /// Managed mode registers the list property on the parent container
    /// inside the active transaction.
    pub fn attach(&self) -> Result<List> {
        match (&self.txn, self.parent) {
            (None, _) => Ok(List::transient(self.kind)),
            (Some(txn), Some(parent)) => {
                let handle = txn.attach_list(parent, &property_name(self.kind), self.kind)?;
                Ok(List::managed(handle))
            }
            (Some(_), None) => Err(Error::Storage(
                "managed scaffold lost its parent container".to_string(),
            )),
        }
    }

    /// Open an arbitrary list property on the parent container
    ///
    /// Used by scenarios probing the unknown-property contract.
    ///
    /// # Errors
    /// `Error::UnknownKey` if the property was never attached;
    /// `Error::Storage` for transient scenarios, which have no container.
    pub fn open_property(&self, property: &str) -> Result<List> {
        match (&self.txn, self.parent) {
            (Some(txn), Some(parent)) => {
                let handle = txn.open_list(parent, property)?;
                Ok(List::managed(handle))
            }
            _ => Err(Error::Storage(
                "transient scenario has no parent container".to_string(),
            )),
        }
    }

    /// Delete the parent container, invalidating every list rooted in it
    ///
    /// # Errors
    /// `Error::Storage` for transient scenarios, which have no container.
    pub fn delete_parent(&self) -> Result<()> {
        match (&self.txn, self.parent) {
            (Some(txn), Some(parent)) => txn.delete_container(parent),
            _ => Err(Error::Storage(
                "transient scenario has no parent container".to_string(),
            )),
        }
    }
}
