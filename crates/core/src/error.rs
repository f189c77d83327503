//! Error types for the Shelf object store
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! The first three variants (`OutOfBounds`, `Invalidated`, `UnknownKey`) are
//! the contract taxonomy: expected failure modes that collection operations
//! raise deterministically and that the conformance suite asserts on. The
//! remaining variants are infrastructure failures and are reported
//! separately, never as contract assertions.

use crate::kind::Kind;
use thiserror::Error;

/// Result type alias for Shelf operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the Shelf object store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Index outside the valid range for the requested operation
    ///
    /// Operations never clamp or wrap an out-of-range index. Negative
    /// indices are unrepresentable (indices are `usize`).
    #[error("index out of bounds: index {index}, length {len}")]
    OutOfBounds {
        /// Requested index
        index: usize,
        /// Collection length at the time of the request
        len: usize,
    },

    /// Operation on a managed collection whose parent container was deleted
    #[error("collection invalidated: parent container was deleted")]
    Invalidated,

    /// Lookup of a nonexistent list property on a container
    #[error("unknown property: {property:?}")]
    UnknownKey {
        /// The property name that was requested
        property: String,
    },

    /// Element kind does not match the collection's declared kind
    #[error("kind mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Kind the collection was declared with
        expected: Kind,
        /// Type name of the offending value
        actual: String,
    },

    /// Operation not supported for the collection's kind
    #[error("operation {operation:?} not supported for kind {kind}")]
    Unsupported {
        /// Kind the collection was declared with
        kind: Kind,
        /// Name of the rejected operation
        operation: &'static str,
    },

    /// Managed operation attempted after the transaction committed or rolled back
    #[error("transaction closed")]
    TransactionClosed,

    /// Store-level failure (e.g. a second concurrent writer)
    #[error("storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Whether this error belongs to the contract taxonomy
    ///
    /// Contract errors are deliberately triggered and asserted on by
    /// conformance scenarios. Everything else is an infrastructure failure.
    pub fn is_contract(&self) -> bool {
        matches!(
            self,
            Error::OutOfBounds { .. }
                | Error::Invalidated
                | Error::UnknownKey { .. }
                | Error::TypeMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_out_of_bounds() {
        let err = Error::OutOfBounds { index: 3, len: 3 };
        let msg = err.to_string();
        assert!(msg.contains("out of bounds"));
        assert!(msg.contains('3'));
    }

    #[test]
    fn test_error_display_invalidated() {
        let err = Error::Invalidated;
        assert!(err.to_string().contains("invalidated"));
    }

    #[test]
    fn test_error_display_unknown_key() {
        let err = Error::UnknownKey {
            property: "scores".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("unknown property"));
        assert!(msg.contains("scores"));
    }

    #[test]
    fn test_error_display_type_mismatch() {
        let err = Error::TypeMismatch {
            expected: Kind::Int64,
            actual: "String".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("kind mismatch"));
        assert!(msg.contains("Int64"));
        assert!(msg.contains("String"));
    }

    #[test]
    fn test_error_display_unsupported() {
        let err = Error::Unsupported {
            kind: Kind::Bytes,
            operation: "min",
        };
        let msg = err.to_string();
        assert!(msg.contains("not supported"));
        assert!(msg.contains("min"));
    }

    #[test]
    fn test_error_display_storage() {
        let err = Error::Storage("writer already active".to_string());
        let msg = err.to_string();
        assert!(msg.contains("storage error"));
        assert!(msg.contains("writer already active"));
    }

    #[test]
    fn test_contract_taxonomy_partition() {
        assert!(Error::OutOfBounds { index: 0, len: 0 }.is_contract());
        assert!(Error::Invalidated.is_contract());
        assert!(Error::UnknownKey {
            property: "x".to_string()
        }
        .is_contract());
        assert!(!Error::TransactionClosed.is_contract());
        assert!(!Error::Storage("boom".to_string()).is_contract());
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }

        fn returns_error() -> Result<i32> {
            Err(Error::TransactionClosed)
        }

        assert_eq!(returns_result().unwrap(), 42);
        assert!(returns_error().is_err());
    }
}
