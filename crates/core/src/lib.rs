//! Core types for the Shelf object store
//!
//! This crate defines the foundational types used throughout the system:
//! - Value: unified element enum (Int, Float, String, Bytes, Timestamp)
//! - Timestamp: microsecond-precision point in time
//! - Kind: closed catalogue of element kinds with canonical samples
//! - StorageMode: transient vs managed capability flag
//! - Error: error type hierarchy with the contract taxonomy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod kind;
pub mod mode;
pub mod value;

// Re-export commonly used types
pub use error::{Error, Result};
pub use kind::Kind;
pub use mode::StorageMode;
pub use value::{Timestamp, Value};
