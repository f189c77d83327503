//! Element kind catalogue
//!
//! A [`Kind`] identifies one primitive element type a list can be declared
//! with. The catalogue is closed and fixed at process start; per kind it
//! carries:
//!
//! - three canonical sample values, distinct and deliberately NOT in sorted
//!   order (so sortedness checks are non-trivial)
//! - the additive identity for summable kinds
//! - capability flags: comparable (min/max/sorted) and summable (sum/average)
//!
//! Narrow integer widths share the `Value::Int` representation; `accepts`
//! range-checks values on the way into a collection.

use crate::value::{Timestamp, Value};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One primitive element type
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Kind {
    /// 8-bit signed integer
    Int8,
    /// 16-bit signed integer
    Int16,
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,
    /// 32-bit floating point
    Float32,
    /// 64-bit floating point
    Float64,
    /// UTF-8 string
    String,
    /// Raw bytes
    Bytes,
    /// Microsecond-precision timestamp
    Timestamp,
}

/// Full catalogue, in declaration order
const ALL_KINDS: [Kind; 9] = [
    Kind::Int8,
    Kind::Int16,
    Kind::Int32,
    Kind::Int64,
    Kind::Float32,
    Kind::Float64,
    Kind::String,
    Kind::Bytes,
    Kind::Timestamp,
];

// Canonical sample table. Three distinct values per kind; comparable kinds
// are ordered so that the sequence is neither ascending nor descending.
static SAMPLE_TABLE: Lazy<BTreeMap<Kind, Vec<Value>>> = Lazy::new(|| {
    let mut table = BTreeMap::new();
    table.insert(Kind::Int8, vec![Value::Int(5), Value::Int(-3), Value::Int(7)]);
    table.insert(
        Kind::Int16,
        vec![Value::Int(1_200), Value::Int(-4), Value::Int(900)],
    );
    table.insert(
        Kind::Int32,
        vec![Value::Int(70_000), Value::Int(-50_000), Value::Int(3)],
    );
    table.insert(Kind::Int64, vec![Value::Int(2), Value::Int(1), Value::Int(3)]);
    table.insert(
        Kind::Float32,
        vec![Value::Float(2.5), Value::Float(1.25), Value::Float(3.75)],
    );
    table.insert(
        Kind::Float64,
        vec![Value::Float(6.25), Value::Float(-2.5), Value::Float(9.75)],
    );
    table.insert(
        Kind::String,
        vec![
            Value::String("beta".to_string()),
            Value::String("alpha".to_string()),
            Value::String("gamma".to_string()),
        ],
    );
    table.insert(
        Kind::Bytes,
        vec![
            Value::Bytes(vec![0x10, 0x20]),
            Value::Bytes(vec![0x00]),
            Value::Bytes(vec![0xFE, 0xFF]),
        ],
    );
    table.insert(
        Kind::Timestamp,
        vec![
            Value::Timestamp(Timestamp::from_secs(1_700_000_060)),
            Value::Timestamp(Timestamp::from_secs(1_699_999_000)),
            Value::Timestamp(Timestamp::from_secs(1_700_003_600)),
        ],
    );
    table
});

impl Kind {
    /// All kinds in the catalogue
    pub fn all() -> &'static [Kind] {
        &ALL_KINDS
    }

    /// Parse a kind from its canonical name
    ///
    /// Returns None if the name does not match any kind.
    pub fn from_name(name: &str) -> Option<Kind> {
        ALL_KINDS.iter().copied().find(|k| k.name() == name)
    }

    /// Canonical name of this kind
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Int8 => "Int8",
            Kind::Int16 => "Int16",
            Kind::Int32 => "Int32",
            Kind::Int64 => "Int64",
            Kind::Float32 => "Float32",
            Kind::Float64 => "Float64",
            Kind::String => "String",
            Kind::Bytes => "Bytes",
            Kind::Timestamp => "Timestamp",
        }
    }

    /// Three canonical sample values, distinct, not in sorted order
    pub fn samples(&self) -> &'static [Value] {
        &SAMPLE_TABLE[self]
    }

    /// Additive identity for summable kinds, None otherwise
    pub fn zero(&self) -> Option<Value> {
        match self {
            Kind::Int8 | Kind::Int16 | Kind::Int32 | Kind::Int64 => Some(Value::Int(0)),
            Kind::Float32 | Kind::Float64 => Some(Value::Float(0.0)),
            _ => None,
        }
    }

    /// Whether min/max/sorted are offered for this kind
    ///
    /// Binary lists support membership and indexing but not ordering.
    pub fn is_comparable(&self) -> bool {
        !matches!(self, Kind::Bytes)
    }

    /// Whether sum/average are offered for this kind
    pub fn is_summable(&self) -> bool {
        matches!(
            self,
            Kind::Int8 | Kind::Int16 | Kind::Int32 | Kind::Int64 | Kind::Float32 | Kind::Float64
        )
    }

    /// Whether a value is storable in a collection of this kind
    ///
    /// Checks the variant family and, for narrow widths, the range:
    /// `Int8` rejects `Int(300)`, `Float32` rejects floats that do not
    /// round-trip through f32.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (Kind::Int8, Value::Int(v)) => i8::try_from(*v).is_ok(),
            (Kind::Int16, Value::Int(v)) => i16::try_from(*v).is_ok(),
            (Kind::Int32, Value::Int(v)) => i32::try_from(*v).is_ok(),
            (Kind::Int64, Value::Int(_)) => true,
            (Kind::Float32, Value::Float(v)) => v.is_nan() || (*v as f32) as f64 == *v,
            (Kind::Float64, Value::Float(_)) => true,
            (Kind::String, Value::String(_)) => true,
            (Kind::Bytes, Value::Bytes(_)) => true,
            (Kind::Timestamp, Value::Timestamp(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    #[test]
    fn test_catalogue_is_complete() {
        assert_eq!(Kind::all().len(), 9);
        for kind in Kind::all() {
            assert_eq!(kind.samples().len(), 3, "{kind} must have 3 samples");
        }
    }

    #[test]
    fn test_samples_are_distinct() {
        for kind in Kind::all() {
            let s = kind.samples();
            assert_ne!(s[0], s[1], "{kind} samples 0/1 collide");
            assert_ne!(s[1], s[2], "{kind} samples 1/2 collide");
            assert_ne!(s[0], s[2], "{kind} samples 0/2 collide");
        }
    }

    #[test]
    fn test_samples_not_presorted() {
        for kind in Kind::all().iter().filter(|k| k.is_comparable()) {
            let s = kind.samples();
            let ascending = s[0].compare(&s[1]) == Ordering::Less
                && s[1].compare(&s[2]) == Ordering::Less;
            let descending = s[0].compare(&s[1]) == Ordering::Greater
                && s[1].compare(&s[2]) == Ordering::Greater;
            assert!(!ascending, "{kind} samples are already ascending");
            assert!(!descending, "{kind} samples are already descending");
        }
    }

    #[test]
    fn test_samples_fit_their_kind() {
        for kind in Kind::all() {
            for sample in kind.samples() {
                assert!(kind.accepts(sample), "{kind} rejects its own sample");
            }
        }
    }

    #[test]
    fn test_zero_matches_summable_flag() {
        for kind in Kind::all() {
            assert_eq!(
                kind.zero().is_some(),
                kind.is_summable(),
                "{kind} zero/summable disagree"
            );
        }
    }

    #[test]
    fn test_narrow_integer_range_checks() {
        assert!(Kind::Int8.accepts(&Value::Int(127)));
        assert!(!Kind::Int8.accepts(&Value::Int(128)));
        assert!(!Kind::Int16.accepts(&Value::Int(40_000)));
        assert!(Kind::Int32.accepts(&Value::Int(-2_000_000_000)));
        assert!(!Kind::Int32.accepts(&Value::Int(3_000_000_000)));
    }

    #[test]
    fn test_float32_round_trip_check() {
        assert!(Kind::Float32.accepts(&Value::Float(1.25)));
        assert!(Kind::Float32.accepts(&Value::Float(f64::NAN)));
        // 0.1 is not representable in f32
        assert!(!Kind::Float32.accepts(&Value::Float(0.1)));
    }

    #[test]
    fn test_variant_family_enforced() {
        assert!(!Kind::Int64.accepts(&Value::Float(1.0)));
        assert!(!Kind::String.accepts(&Value::Bytes(vec![])));
        assert!(!Kind::Timestamp.accepts(&Value::Int(0)));
    }

    #[test]
    fn test_bytes_capabilities() {
        assert!(!Kind::Bytes.is_comparable());
        assert!(!Kind::Bytes.is_summable());
        assert!(Kind::Bytes.zero().is_none());
    }

    #[test]
    fn test_from_name_round_trip() {
        for kind in Kind::all() {
            assert_eq!(Kind::from_name(kind.name()), Some(*kind));
        }
        assert_eq!(Kind::from_name("Complex"), None);
    }
}
