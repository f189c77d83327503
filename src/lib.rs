//! ShelfDB - embedded object store with a conformance harness for ordered
//! collections
//!
//! Shelf stores parent containers that own named, kind-tagged lists. A list
//! behaves identically whether it is transient (process memory) or managed
//! (inside a write transaction on the store); the conformance suite in
//! [`shelf_conformance`] pins that contract across every storage mode and
//! element kind.
//!
//! # Quick Start
//!
//! ```
//! use shelfdb::{Kind, List, Store, Value};
//!
//! // A transient list needs no store at all
//! let mut list = List::transient(Kind::Int64);
//! list.append(Value::Int(2))?;
//! assert_eq!(list.sum()?, Value::Int(2));
//!
//! // A managed list lives inside a write transaction
//! let store = Store::new();
//! let txn = store.begin_write()?;
//! let container = txn.create_container()?;
//! let handle = txn.attach_list(container, "scores", Kind::Int64)?;
//! let mut scores = List::managed(handle);
//! scores.append(Value::Int(10))?;
//! txn.commit()?;
//! # Ok::<(), shelfdb::Error>(())
//! ```

// Re-export the public API from the member crates
pub use shelf_conformance::{
    CollectingSink, ConsoleSink, ContractSuite, JsonSink, Outcome, ReportSink, Scaffold,
    SuiteConfig, SuiteSummary,
};
pub use shelf_core::{Error, Kind, Result, StorageMode, Timestamp, Value};
pub use shelf_list::{List, SortedValues};
pub use shelf_store::{ContainerId, ManagedList, Store, WriteTransaction};
