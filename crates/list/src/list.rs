//! The list primitive
//!
//! ## Design
//!
//! One public type covers both storage modes. The mode is a property of the
//! backing chosen at construction, not a type split: a transient list owns a
//! plain vector, a managed list delegates to a [`ManagedList`] handle inside
//! the active write transaction. Every contract operation behaves
//! identically across backings; the modes differ only in invalidation
//! semantics and in whether a transaction is required at all.
//!
//! ## Validation Order
//!
//! Managed access first revalidates the handle (transaction open, parent
//! alive, property present). Then, uniformly for both backings: element
//! kind, then bounds. A failed validation never leaves a partial mutation
//! behind.

use crate::sorted::SortedValues;
use shelf_core::{Error, Kind, Result, StorageMode, Value};
use shelf_store::ManagedList;

enum Backing {
    Transient(Vec<Value>),
    Managed(ManagedList),
}

/// Ordered collection of one element kind
///
/// # Example
///
/// ```
/// use shelf_core::{Kind, Value};
/// use shelf_list::List;
///
/// let mut list = List::transient(Kind::Int64);
/// list.append(Value::Int(2))?;
/// list.append(Value::Int(1))?;
/// assert_eq!(list.len()?, 2);
/// assert_eq!(list.index_of(&Value::Int(1))?, Some(1));
/// # Ok::<(), shelf_core::Error>(())
/// ```
pub struct List {
    kind: Kind,
    backing: Backing,
}

impl List {
    /// Create a standalone list in process memory
    pub fn transient(kind: Kind) -> Self {
        Self {
            kind,
            backing: Backing::Transient(Vec::new()),
        }
    }

    /// Wrap a managed handle minted by a write transaction
    pub fn managed(handle: ManagedList) -> Self {
        Self {
            kind: handle.kind(),
            backing: Backing::Managed(handle),
        }
    }

    /// Declared element kind
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Storage mode of this list
    pub fn mode(&self) -> StorageMode {
        match self.backing {
            Backing::Transient(_) => StorageMode::Transient,
            Backing::Managed(_) => StorageMode::Managed,
        }
    }

    /// Whether the parent container was deleted (managed mode)
    ///
    /// Transient lists never invalidate. For managed lists the transition
    /// Live -> Invalidated is permanent and triggered exclusively by
    /// deletion of the parent container.
    pub fn is_invalidated(&self) -> bool {
        match &self.backing {
            Backing::Transient(_) => false,
            Backing::Managed(handle) => handle.is_invalidated(),
        }
    }

    // ========== Element access ==========

    /// Number of elements
    pub fn len(&self) -> Result<usize> {
        self.read(|elements| elements.len())
    }

    /// Whether the list has no elements
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Element at `index`
    ///
    /// # Errors
    /// `Error::OutOfBounds` unless `index < len`.
    pub fn get(&self, index: usize) -> Result<Value> {
        self.read(|elements| {
            elements
                .get(index)
                .cloned()
                .ok_or(Error::OutOfBounds {
                    index,
                    len: elements.len(),
                })
        })?
    }

    /// First element, None when empty
    pub fn first(&self) -> Result<Option<Value>> {
        self.read(|elements| elements.first().cloned())
    }

    /// Last element, None when empty
    pub fn last(&self) -> Result<Option<Value>> {
        self.read(|elements| elements.last().cloned())
    }

    /// Index of the first element equal to `value`, None if absent
    ///
    /// Matches by value equality. Always None on an empty list.
    pub fn index_of(&self, value: &Value) -> Result<Option<usize>> {
        self.read(|elements| elements.iter().position(|e| e == value))
    }

    // ========== Mutation ==========

    /// Add a value at the end
    pub fn append(&mut self, value: Value) -> Result<()> {
        self.check_kind(&value)?;
        self.write(|elements| elements.push(value))
    }

    /// Add several values at the end, in order
    ///
    /// All values are kind-checked before any is inserted; a rejected value
    /// leaves the list unchanged.
    pub fn append_all(&mut self, values: impl IntoIterator<Item = Value>) -> Result<()> {
        let values: Vec<Value> = values.into_iter().collect();
        for value in &values {
            self.check_kind(value)?;
        }
        self.write(|elements| elements.extend(values))
    }

    /// Insert a value at `index`, shifting subsequent elements right
    ///
    /// # Errors
    /// `Error::OutOfBounds` unless `index <= len`; `index == len` appends.
    pub fn insert(&mut self, index: usize, value: Value) -> Result<()> {
        self.check_kind(&value)?;
        self.write(|elements| {
            if index > elements.len() {
                return Err(Error::OutOfBounds {
                    index,
                    len: elements.len(),
                });
            }
            elements.insert(index, value);
            Ok(())
        })?
    }

    /// Replace the element at `index`
    ///
    /// # Errors
    /// `Error::OutOfBounds` unless `index < len`.
    pub fn set(&mut self, index: usize, value: Value) -> Result<()> {
        self.check_kind(&value)?;
        self.write(|elements| match elements.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Error::OutOfBounds {
                index,
                len: elements.len(),
            }),
        })?
    }

    /// Remove and return the element at `index`, shifting the rest left
    ///
    /// # Errors
    /// `Error::OutOfBounds` unless `index < len`.
    pub fn remove(&mut self, index: usize) -> Result<Value> {
        self.write(|elements| {
            if index >= elements.len() {
                return Err(Error::OutOfBounds {
                    index,
                    len: elements.len(),
                });
            }
            Ok(elements.remove(index))
        })?
    }

    /// Move the element at `from` so it ends up at position `to`
    ///
    /// Both indices are validated against the current length before any
    /// mutation; `move_item(i, i)` validates and is then a no-op.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<()> {
        self.write(|elements| {
            let len = elements.len();
            if from >= len {
                return Err(Error::OutOfBounds { index: from, len });
            }
            if to >= len {
                return Err(Error::OutOfBounds { index: to, len });
            }
            let value = elements.remove(from);
            elements.insert(to, value);
            Ok(())
        })?
    }

    /// Exchange the elements at `a` and `b`
    ///
    /// Both indices are validated before any mutation.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<()> {
        self.write(|elements| {
            let len = elements.len();
            if a >= len {
                return Err(Error::OutOfBounds { index: a, len });
            }
            if b >= len {
                return Err(Error::OutOfBounds { index: b, len });
            }
            elements.swap(a, b);
            Ok(())
        })?
    }

    /// Remove every element; idempotent
    pub fn remove_all(&mut self) -> Result<()> {
        self.write(|elements| elements.clear())
    }

    // ========== Aggregates ==========

    /// Smallest element under the kind's order, None when empty
    ///
    /// # Errors
    /// `Error::Unsupported` for non-comparable kinds.
    pub fn min(&self) -> Result<Option<Value>> {
        self.require_comparable("min")?;
        self.read(|elements| {
            elements
                .iter()
                .min_by(|a, b| a.compare(b))
                .cloned()
        })
    }

    /// Largest element under the kind's order, None when empty
    ///
    /// # Errors
    /// `Error::Unsupported` for non-comparable kinds.
    pub fn max(&self) -> Result<Option<Value>> {
        self.require_comparable("max")?;
        self.read(|elements| {
            elements
                .iter()
                .max_by(|a, b| a.compare(b))
                .cloned()
        })
    }

    /// Arithmetic sum in the kind's accumulation domain
    ///
    /// The kind's zero on an empty list. Integer kinds accumulate in i64,
    /// Float32 in f32, Float64 in f64; there is no shared lossy
    /// intermediate.
    ///
    /// # Errors
    /// `Error::Unsupported` for non-summable kinds.
    pub fn sum(&self) -> Result<Value> {
        self.require_summable("sum")?;
        let kind = self.kind;
        self.read(move |elements| match kind {
            Kind::Float32 => {
                let total = elements
                    .iter()
                    .filter_map(Value::as_float)
                    .fold(0f32, |acc, v| acc + v as f32);
                Value::Float(f64::from(total))
            }
            Kind::Float64 => {
                let total = elements
                    .iter()
                    .filter_map(Value::as_float)
                    .fold(0f64, |acc, v| acc + v);
                Value::Float(total)
            }
            _ => {
                // wraps on overflow, the behavior of the i64 storage domain
                let total = elements
                    .iter()
                    .filter_map(Value::as_int)
                    .fold(0i64, i64::wrapping_add);
                Value::Int(total)
            }
        })
    }

    /// Sum divided by length as a floating-point quotient, None when empty
    ///
    /// The quotient is taken in the kind's accumulation domain: Float32
    /// divides in f32 before widening, everything else divides in f64.
    ///
    /// # Errors
    /// `Error::Unsupported` for non-summable kinds.
    pub fn average(&self) -> Result<Option<f64>> {
        self.require_summable("average")?;
        let kind = self.kind;
        self.read(move |elements| {
            if elements.is_empty() {
                return None;
            }
            let len = elements.len();
            Some(match kind {
                Kind::Float32 => {
                    let total = elements
                        .iter()
                        .filter_map(Value::as_float)
                        .fold(0f32, |acc, v| acc + v as f32);
                    f64::from(total / len as f32)
                }
                Kind::Float64 => {
                    let total = elements
                        .iter()
                        .filter_map(Value::as_float)
                        .fold(0f64, |acc, v| acc + v);
                    total / len as f64
                }
                _ => {
                    let total = elements
                        .iter()
                        .filter_map(Value::as_int)
                        .fold(0i64, i64::wrapping_add);
                    total as f64 / len as f64
                }
            })
        })
    }

    /// Stable sort of the current contents as a restartable snapshot
    ///
    /// The list itself is not mutated and the snapshot does not alias it.
    ///
    /// # Errors
    /// `Error::Unsupported` for non-comparable kinds.
    pub fn sorted(&self, ascending: bool) -> Result<SortedValues> {
        self.require_comparable("sorted")?;
        let mut items = self.read(|elements| elements.to_vec())?;
        if ascending {
            items.sort_by(|a, b| a.compare(b));
        } else {
            items.sort_by(|a, b| b.compare(a));
        }
        Ok(SortedValues::new(items))
    }

    // ========== Internal ==========

    fn read<R>(&self, f: impl FnOnce(&[Value]) -> R) -> Result<R> {
        match &self.backing {
            Backing::Transient(elements) => Ok(f(elements)),
            Backing::Managed(handle) => handle.read(f),
        }
    }

    fn write<R>(&mut self, f: impl FnOnce(&mut Vec<Value>) -> R) -> Result<R> {
        match &mut self.backing {
            Backing::Transient(elements) => Ok(f(elements)),
            Backing::Managed(handle) => handle.write(f),
        }
    }

    fn check_kind(&self, value: &Value) -> Result<()> {
        if self.kind.accepts(value) {
            Ok(())
        } else {
            Err(Error::TypeMismatch {
                expected: self.kind,
                actual: value.type_name().to_string(),
            })
        }
    }

    fn require_comparable(&self, operation: &'static str) -> Result<()> {
        if self.kind.is_comparable() {
            Ok(())
        } else {
            Err(Error::Unsupported {
                kind: self.kind,
                operation,
            })
        }
    }

    fn require_summable(&self, operation: &'static str) -> Result<()> {
        if self.kind.is_summable() {
            Ok(())
        } else {
            Err(Error::Unsupported {
                kind: self.kind,
                operation,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_list_with_samples() -> List {
        let mut list = List::transient(Kind::Int64);
        list.append_all(Kind::Int64.samples().to_vec()).unwrap();
        list
    }

    #[test]
    fn test_fresh_list_is_empty() {
        let list = List::transient(Kind::Int64);
        assert_eq!(list.len().unwrap(), 0);
        assert_eq!(list.first().unwrap(), None);
        assert_eq!(list.last().unwrap(), None);
        assert_eq!(list.min().unwrap(), None);
        assert_eq!(list.max().unwrap(), None);
        assert_eq!(list.average().unwrap(), None);
        assert_eq!(list.sum().unwrap(), Value::Int(0));
    }

    #[test]
    fn test_append_then_index_of_round_trip() {
        let list = int_list_with_samples();
        let samples = Kind::Int64.samples();
        assert_eq!(list.index_of(&samples[0]).unwrap(), Some(0));
        assert_eq!(list.index_of(&samples[1]).unwrap(), Some(1));
        assert_eq!(list.index_of(&samples[2]).unwrap(), Some(2));
    }

    #[test]
    fn test_index_of_first_match_under_duplicates() {
        let mut list = List::transient(Kind::Int64);
        list.append_all(vec![Value::Int(7), Value::Int(7), Value::Int(7)])
            .unwrap();
        assert_eq!(list.index_of(&Value::Int(7)).unwrap(), Some(0));
    }

    #[test]
    fn test_insert_shifts_right() {
        let mut list = int_list_with_samples();
        list.insert(1, Value::Int(99)).unwrap();
        assert_eq!(list.get(1).unwrap(), Value::Int(99));
        assert_eq!(list.get(2).unwrap(), Kind::Int64.samples()[1].clone());
        assert_eq!(list.len().unwrap(), 4);
    }

    #[test]
    fn test_insert_at_len_appends() {
        let mut list = int_list_with_samples();
        list.insert(3, Value::Int(42)).unwrap();
        assert_eq!(list.last().unwrap(), Some(Value::Int(42)));
    }

    #[test]
    fn test_bounds_never_clamp() {
        let mut list = int_list_with_samples();
        assert_eq!(
            list.get(3).unwrap_err(),
            Error::OutOfBounds { index: 3, len: 3 }
        );
        assert_eq!(
            list.set(3, Value::Int(0)).unwrap_err(),
            Error::OutOfBounds { index: 3, len: 3 }
        );
        assert_eq!(
            list.insert(4, Value::Int(0)).unwrap_err(),
            Error::OutOfBounds { index: 4, len: 3 }
        );
        assert_eq!(
            list.remove(3).unwrap_err(),
            Error::OutOfBounds { index: 3, len: 3 }
        );
        // nothing mutated along the way
        assert_eq!(list.len().unwrap(), 3);
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut list = int_list_with_samples();
        list.set(0, Value::Int(-9)).unwrap();
        assert_eq!(list.get(0).unwrap(), Value::Int(-9));
        assert_eq!(list.len().unwrap(), 3);
    }

    #[test]
    fn test_remove_shifts_left() {
        let mut list = int_list_with_samples();
        let samples = Kind::Int64.samples();
        let removed = list.remove(0).unwrap();
        assert_eq!(removed, samples[0].clone());
        assert_eq!(list.get(0).unwrap(), samples[1].clone());
        assert_eq!(list.len().unwrap(), 2);
    }

    #[test]
    fn test_move_item_validates_both_indices_first() {
        let mut list = int_list_with_samples();
        let before: Vec<_> = (0..3).map(|i| list.get(i).unwrap()).collect();
        assert_eq!(
            list.move_item(0, 3).unwrap_err(),
            Error::OutOfBounds { index: 3, len: 3 }
        );
        let after: Vec<_> = (0..3).map(|i| list.get(i).unwrap()).collect();
        assert_eq!(before, after, "failed move must not mutate");
    }

    #[test]
    fn test_move_item_to_final_position() {
        let mut list = List::transient(Kind::Int64);
        list.append_all(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
            .unwrap();
        list.move_item(0, 2).unwrap();
        let contents: Vec<_> = (0..3).map(|i| list.get(i).unwrap()).collect();
        assert_eq!(
            contents,
            vec![Value::Int(2), Value::Int(3), Value::Int(1)]
        );
    }

    #[test]
    fn test_swap() {
        let mut list = List::transient(Kind::Int64);
        list.append_all(vec![Value::Int(1), Value::Int(2)]).unwrap();
        list.swap(0, 1).unwrap();
        assert_eq!(list.get(0).unwrap(), Value::Int(2));
        assert_eq!(
            list.swap(0, 2).unwrap_err(),
            Error::OutOfBounds { index: 2, len: 2 }
        );
    }

    #[test]
    fn test_remove_all_idempotent() {
        let mut list = int_list_with_samples();
        list.remove_all().unwrap();
        assert_eq!(list.len().unwrap(), 0);
        list.remove_all().unwrap();
        assert_eq!(list.len().unwrap(), 0);
    }

    #[test]
    fn test_sum_and_average_integer() {
        let list = int_list_with_samples();
        assert_eq!(list.sum().unwrap(), Value::Int(6));
        assert_eq!(list.average().unwrap(), Some(2.0));
    }

    #[test]
    fn test_sum_float32_accumulates_in_f32() {
        let mut list = List::transient(Kind::Float32);
        list.append_all(Kind::Float32.samples().to_vec()).unwrap();
        let expected = Kind::Float32
            .samples()
            .iter()
            .filter_map(Value::as_float)
            .fold(0f32, |acc, v| acc + v as f32);
        assert_eq!(list.sum().unwrap(), Value::Float(f64::from(expected)));
    }

    #[test]
    fn test_min_max() {
        let list = int_list_with_samples();
        assert_eq!(list.min().unwrap(), Some(Value::Int(1)));
        assert_eq!(list.max().unwrap(), Some(Value::Int(3)));
    }

    #[test]
    fn test_unsupported_aggregates_on_bytes() {
        let list = List::transient(Kind::Bytes);
        assert!(matches!(
            list.min().unwrap_err(),
            Error::Unsupported { operation: "min", .. }
        ));
        assert!(matches!(
            list.sum().unwrap_err(),
            Error::Unsupported { operation: "sum", .. }
        ));
        assert!(matches!(
            list.sorted(true).unwrap_err(),
            Error::Unsupported { operation: "sorted", .. }
        ));
    }

    #[test]
    fn test_sorted_does_not_mutate_source() {
        let list = int_list_with_samples();
        let sorted = list.sorted(true).unwrap();
        assert_eq!(
            sorted.to_vec(),
            vec![Value::Int(1), Value::Int(2), Value::Int(3)]
        );
        // source order untouched
        assert_eq!(list.get(0).unwrap(), Value::Int(2));
        assert_eq!(list.get(1).unwrap(), Value::Int(1));
        assert_eq!(list.get(2).unwrap(), Value::Int(3));
    }

    #[test]
    fn test_sorted_descending_is_exact_reverse() {
        let list = int_list_with_samples();
        let mut ascending = list.sorted(true).unwrap().to_vec();
        let descending = list.sorted(false).unwrap().to_vec();
        ascending.reverse();
        assert_eq!(ascending, descending);
    }

    #[test]
    fn test_sorted_idempotent() {
        let mut list = List::transient(Kind::String);
        list.append_all(Kind::String.samples().to_vec()).unwrap();
        let once = list.sorted(true).unwrap().to_vec();

        let mut resorted = List::transient(Kind::String);
        resorted.append_all(once.clone()).unwrap();
        assert_eq!(resorted.sorted(true).unwrap().to_vec(), once);
    }

    #[test]
    fn test_type_mismatch_rejected_without_mutation() {
        let mut list = int_list_with_samples();
        let err = list.append(Value::from("nope")).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { expected: Kind::Int64, .. }));
        assert_eq!(list.len().unwrap(), 3);

        // append_all is all-or-nothing on kind checks
        let err = list
            .append_all(vec![Value::Int(1), Value::from("nope")])
            .unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
        assert_eq!(list.len().unwrap(), 3);
    }

    #[test]
    fn test_narrow_width_range_enforced() {
        let mut list = List::transient(Kind::Int8);
        let err = list.append(Value::Int(300)).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { expected: Kind::Int8, .. }));
        list.append(Value::Int(127)).unwrap();
    }

    #[test]
    fn test_transient_never_invalidates() {
        let list = List::transient(Kind::Int64);
        assert!(!list.is_invalidated());
        assert_eq!(list.mode(), StorageMode::Transient);
    }
}
