//! Ordered collection primitive for Shelf
//!
//! One [`List`] type with a uniform contract across both storage modes:
//! transient (standalone, process memory) and managed (owned by a container
//! inside a write transaction, invalidated when the container is deleted).

#![warn(missing_docs)]
#![warn(clippy::all)]

mod list;
mod sorted;

pub use list::List;
pub use sorted::SortedValues;
