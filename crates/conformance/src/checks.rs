//! Contract checks
//!
//! Each check drives one behavioral slice of the list contract against the
//! scenario's (mode, kind) pair, using the kind's canonical samples. Checks
//! return `anyhow::Result`; the first violated expectation aborts the
//! scenario with a diagnostic, and the scaffold's Drop still tears the
//! transaction down.
//!
//! Expectations are taxonomy-exact: an out-of-range index must surface
//! `Error::OutOfBounds` itself, not any error, and never a clamped result.

use crate::scaffold::Scaffold;
use anyhow::{bail, ensure, Context, Result};
use shelf_core::{Error, Kind, Value};

// Tolerance for floating-point aggregate comparisons. The checks compare
// with tolerance; the operations themselves stay exact per kind.
const FLOAT_TOLERANCE: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= FLOAT_TOLERANCE
}

/// A value no list of `kind` accepts
fn foreign_value(kind: Kind) -> Value {
    match kind {
        Kind::String => Value::Int(1),
        _ => Value::String("wrong kind".to_string()),
    }
}

pub(crate) fn fresh_collection_is_empty(scaffold: &Scaffold) -> Result<()> {
    let list = scaffold.attach().context("attach")?;
    let kind = scaffold.kind();

    ensure!(list.len()? == 0, "fresh collection must have length 0");
    ensure!(list.first()?.is_none(), "first() on empty must be None");
    ensure!(list.last()?.is_none(), "last() on empty must be None");
    ensure!(
        list.index_of(&kind.samples()[0])?.is_none(),
        "index_of on empty must be None"
    );
    if kind.is_comparable() {
        ensure!(list.min()?.is_none(), "min() on empty must be None");
        ensure!(list.max()?.is_none(), "max() on empty must be None");
    }
    if kind.is_summable() {
        let zero = kind.zero().context("summable kind must expose zero")?;
        ensure!(
            list.sum()? == zero,
            "sum() on empty must be the kind's zero"
        );
        ensure!(list.average()?.is_none(), "average() on empty must be None");
    }
    Ok(())
}

pub(crate) fn append_index_of_round_trip(scaffold: &Scaffold) -> Result<()> {
    let mut list = scaffold.attach()?;
    let samples = scaffold.kind().samples();

    for sample in samples {
        list.append(sample.clone())?;
    }
    ensure!(list.len()? == samples.len(), "length must equal appends");
    for (position, sample) in samples.iter().enumerate() {
        ensure!(
            list.index_of(sample)? == Some(position),
            "index_of({sample:?}) must be {position}"
        );
    }
    ensure!(list.first()? == Some(samples[0].clone()), "first must be samples[0]");
    ensure!(list.last()? == Some(samples[2].clone()), "last must be samples[2]");
    Ok(())
}

pub(crate) fn append_all_positional_stability(scaffold: &Scaffold) -> Result<()> {
    let mut list = scaffold.attach()?;
    let samples = scaffold.kind().samples();

    list.append(samples[0].clone())?;
    list.append_all(vec![samples[1].clone(), samples[2].clone()])?;
    ensure!(
        list.len()? == 3,
        "append_all must grow length by exactly the number inserted"
    );
    for (position, sample) in samples.iter().enumerate() {
        ensure!(
            list.get(position)? == *sample,
            "existing elements must keep their positions"
        );
    }
    Ok(())
}

pub(crate) fn insert_shifts_and_appends(scaffold: &Scaffold) -> Result<()> {
    let mut list = scaffold.attach()?;
    let samples = scaffold.kind().samples();

    // build [s1, s2] then insert s0 at the front
    list.append_all(vec![samples[1].clone(), samples[2].clone()])?;
    list.insert(0, samples[0].clone())?;
    ensure!(list.get(0)? == samples[0], "insert at 0 must land at the front");
    ensure!(list.get(1)? == samples[1], "insert must shift the rest right");
    ensure!(list.get(2)? == samples[2], "insert must shift the rest right");

    // insert at len appends
    let len = list.len()?;
    list.insert(len, samples[0].clone())?;
    ensure!(
        list.last()? == Some(samples[0].clone()),
        "insert at len must append"
    );
    Ok(())
}

pub(crate) fn bounds_rejected(scaffold: &Scaffold) -> Result<()> {
    let mut list = scaffold.attach()?;
    let samples = scaffold.kind().samples();
    list.append_all(samples.to_vec())?;
    let len = list.len()?;

    match list.get(len) {
        Err(Error::OutOfBounds { index, len: l }) => {
            ensure!(index == len && l == len, "get(len) must report index and length");
        }
        other => bail!("get(len) must be OutOfBounds, got {other:?}"),
    }
    match list.set(len, samples[0].clone()) {
        Err(Error::OutOfBounds { .. }) => {}
        other => bail!("set(len) must be OutOfBounds, got {other:?}"),
    }
    match list.insert(len + 1, samples[0].clone()) {
        Err(Error::OutOfBounds { .. }) => {}
        other => bail!("insert(len + 1) must be OutOfBounds, got {other:?}"),
    }
    match list.remove(len) {
        Err(Error::OutOfBounds { .. }) => {}
        other => bail!("remove(len) must be OutOfBounds, got {other:?}"),
    }
    ensure!(
        list.len()? == len,
        "rejected operations must not mutate the collection"
    );
    for (position, sample) in samples.iter().enumerate() {
        ensure!(
            list.get(position)? == *sample,
            "rejected operations must not reorder elements"
        );
    }
    Ok(())
}

pub(crate) fn index_of_first_match(scaffold: &Scaffold) -> Result<()> {
    let mut list = scaffold.attach()?;
    let samples = scaffold.kind().samples();

    // duplicate the same sample; the first occurrence wins
    list.append_all(vec![
        samples[1].clone(),
        samples[0].clone(),
        samples[0].clone(),
    ])?;
    ensure!(
        list.index_of(&samples[0])? == Some(1),
        "index_of must return the first match under duplicates"
    );
    ensure!(
        list.index_of(&samples[2])?.is_none(),
        "index_of must be None for absent values"
    );
    Ok(())
}

pub(crate) fn set_replaces(scaffold: &Scaffold) -> Result<()> {
    let mut list = scaffold.attach()?;
    let samples = scaffold.kind().samples();

    list.append_all(samples.to_vec())?;
    list.set(1, samples[0].clone())?;
    ensure!(list.get(1)? == samples[0], "set must replace the element");
    ensure!(list.len()? == 3, "set must not change the length");
    ensure!(list.get(0)? == samples[0], "set must not disturb neighbors");
    ensure!(list.get(2)? == samples[2], "set must not disturb neighbors");
    Ok(())
}

pub(crate) fn remove_shifts_left(scaffold: &Scaffold) -> Result<()> {
    let mut list = scaffold.attach()?;
    let samples = scaffold.kind().samples();

    list.append_all(samples.to_vec())?;
    let removed = list.remove(1)?;
    ensure!(removed == samples[1], "remove must return the removed element");
    ensure!(list.len()? == 2, "remove must shrink the length by one");
    ensure!(list.get(0)? == samples[0], "remove must keep the prefix");
    ensure!(list.get(1)? == samples[2], "remove must shift the suffix left");
    Ok(())
}

pub(crate) fn move_and_swap(scaffold: &Scaffold) -> Result<()> {
    let mut list = scaffold.attach()?;
    let samples = scaffold.kind().samples();
    list.append_all(samples.to_vec())?;

    list.move_item(0, 2)?;
    ensure!(list.get(2)? == samples[0], "moved element must land at `to`");
    ensure!(list.get(0)? == samples[1], "move must close the gap");

    list.swap(0, 1)?;
    ensure!(list.get(0)? == samples[2], "swap must exchange the elements");
    ensure!(list.get(1)? == samples[1], "swap must exchange the elements");

    // both indices validated before any mutation
    let before = (0..3).map(|i| list.get(i)).collect::<shelf_core::Result<Vec<_>>>()?;
    match list.move_item(0, 3) {
        Err(Error::OutOfBounds { index: 3, len: 3 }) => {}
        other => bail!("move to out-of-range must be OutOfBounds, got {other:?}"),
    }
    match list.swap(3, 0) {
        Err(Error::OutOfBounds { index: 3, len: 3 }) => {}
        other => bail!("swap with out-of-range must be OutOfBounds, got {other:?}"),
    }
    let after = (0..3).map(|i| list.get(i)).collect::<shelf_core::Result<Vec<_>>>()?;
    ensure!(before == after, "failed move/swap must leave no partial mutation");
    Ok(())
}

pub(crate) fn remove_all_idempotent(scaffold: &Scaffold) -> Result<()> {
    let mut list = scaffold.attach()?;
    list.append_all(scaffold.kind().samples().to_vec())?;

    list.remove_all()?;
    ensure!(list.len()? == 0, "remove_all must reset length to 0");
    list.remove_all()?;
    ensure!(list.len()? == 0, "remove_all must be idempotent");
    ensure!(list.first()?.is_none(), "emptied collection must report empty");
    Ok(())
}

pub(crate) fn min_max_extremal(scaffold: &Scaffold) -> Result<()> {
    let mut list = scaffold.attach()?;
    let kind = scaffold.kind();
    let samples = kind.samples();
    list.append_all(samples.to_vec())?;

    let expected_min = samples
        .iter()
        .min_by(|a, b| a.compare(b))
        .cloned()
        .context("three samples cannot be empty")?;
    let expected_max = samples
        .iter()
        .max_by(|a, b| a.compare(b))
        .cloned()
        .context("three samples cannot be empty")?;
    ensure!(
        list.min()? == Some(expected_min),
        "min must be the extremal sample under the kind's order"
    );
    ensure!(
        list.max()? == Some(expected_max),
        "max must be the extremal sample under the kind's order"
    );
    Ok(())
}

pub(crate) fn sum_average_exact(scaffold: &Scaffold) -> Result<()> {
    let mut list = scaffold.attach()?;
    let kind = scaffold.kind();
    let samples = kind.samples();
    list.append_all(samples.to_vec())?;

    match kind {
        Kind::Float32 | Kind::Float64 => {
            let expected: f64 = samples.iter().filter_map(Value::as_float).sum();
            let got = match list.sum()? {
                Value::Float(f) => f,
                other => bail!("floating sum must be a Float, got {other:?}"),
            };
            ensure!(
                approx_eq(got, expected),
                "sum must accumulate in the kind's floating domain (got {got}, want {expected})"
            );
            let average = list.average()?.context("average of 3 elements")?;
            ensure!(
                approx_eq(average, expected / 3.0),
                "average must be sum over length"
            );
        }
        _ => {
            let expected: i64 = samples.iter().filter_map(Value::as_int).sum();
            ensure!(
                list.sum()? == Value::Int(expected),
                "integer kinds must sum as integers"
            );
            let average = list.average()?.context("average of 3 elements")?;
            ensure!(
                approx_eq(average, expected as f64 / 3.0),
                "average must be the floating quotient of an integer sum"
            );
        }
    }

    // the canonical integer example: [2, 1, 3] sums to 6, averages to 2.0
    if kind == Kind::Int64 {
        ensure!(list.sum()? == Value::Int(6), "Int64 samples must sum to 6");
        ensure!(
            list.average()? == Some(2.0),
            "Int64 samples must average to 2.0"
        );
    }
    Ok(())
}

pub(crate) fn sorted_contract(scaffold: &Scaffold) -> Result<()> {
    let mut list = scaffold.attach()?;
    let kind = scaffold.kind();
    let samples = kind.samples();
    list.append_all(samples.to_vec())?;

    let mut expected = samples.to_vec();
    expected.sort_by(|a, b| a.compare(b));

    let ascending = list.sorted(true)?;
    ensure!(
        ascending.to_vec() == expected,
        "sorted(true) must order by the kind's natural order"
    );

    let mut reversed = expected.clone();
    reversed.reverse();
    ensure!(
        list.sorted(false)?.to_vec() == reversed,
        "sorted(false) must be the exact reverse of ascending"
    );

    // the snapshot is restartable
    let first_pass: Vec<&Value> = ascending.iter().collect();
    let second_pass: Vec<&Value> = ascending.iter().collect();
    ensure!(
        first_pass == second_pass,
        "sorted snapshot must iterate repeatedly"
    );

    // sorting never mutates the source
    for (position, sample) in samples.iter().enumerate() {
        ensure!(
            list.get(position)? == *sample,
            "sorted must not mutate the source order"
        );
    }

    // the snapshot does not alias the source: shuffle the source, snapshot holds
    let len = list.len()?;
    list.swap(0, len - 1)?;
    ensure!(
        ascending.to_vec() == expected,
        "sorted snapshot must not alias the live collection"
    );

    // idempotence: sorting already-sorted contents is a fixed point
    list.remove_all()?;
    list.append_all(expected.clone())?;
    ensure!(
        list.sorted(true)?.to_vec() == expected,
        "sorting a sorted sequence must be a fixed point"
    );
    Ok(())
}

pub(crate) fn type_mismatch_rejected(scaffold: &Scaffold) -> Result<()> {
    let mut list = scaffold.attach()?;
    let kind = scaffold.kind();
    let samples = kind.samples();
    list.append(samples[0].clone())?;

    match list.append(foreign_value(kind)) {
        Err(Error::TypeMismatch { expected, .. }) => {
            ensure!(expected == kind, "mismatch must name the declared kind");
        }
        other => bail!("appending a foreign value must be TypeMismatch, got {other:?}"),
    }
    match list.set(0, foreign_value(kind)) {
        Err(Error::TypeMismatch { .. }) => {}
        other => bail!("set with a foreign value must be TypeMismatch, got {other:?}"),
    }
    ensure!(list.len()? == 1, "rejected values must not be stored");
    ensure!(list.get(0)? == samples[0], "rejected set must not replace");
    Ok(())
}

pub(crate) fn unknown_property(scaffold: &Scaffold) -> Result<()> {
    match scaffold.open_property("never_attached") {
        Err(Error::UnknownKey { property }) => {
            ensure!(
                property == "never_attached",
                "UnknownKey must carry the property name"
            );
        }
        Ok(_) => bail!("opening a nonexistent property must fail"),
        Err(other) => bail!("expected UnknownKey, got {other:?}"),
    }
    Ok(())
}

pub(crate) fn invalidation_irreversible(scaffold: &Scaffold) -> Result<()> {
    let mut list = scaffold.attach()?;
    let kind = scaffold.kind();
    let samples = kind.samples();
    list.append_all(samples.to_vec())?;
    ensure!(!list.is_invalidated(), "live collection must not be invalidated");

    scaffold.delete_parent().context("delete parent container")?;
    ensure!(
        list.is_invalidated(),
        "deleting the parent must invalidate the collection"
    );

    // every subsequent operation fails with Invalidated
    match list.len() {
        Err(Error::Invalidated) => {}
        other => bail!("len after invalidation must be Invalidated, got {other:?}"),
    }
    match list.get(0) {
        Err(Error::Invalidated) => {}
        other => bail!("get after invalidation must be Invalidated, got {other:?}"),
    }
    match list.append(samples[0].clone()) {
        Err(Error::Invalidated) => {}
        other => bail!("append after invalidation must be Invalidated, got {other:?}"),
    }
    match list.remove_all() {
        Err(Error::Invalidated) => {}
        other => bail!("remove_all after invalidation must be Invalidated, got {other:?}"),
    }
    match list.index_of(&samples[0]) {
        Err(Error::Invalidated) => {}
        other => bail!("index_of after invalidation must be Invalidated, got {other:?}"),
    }
    if kind.is_comparable() {
        match list.min() {
            Err(Error::Invalidated) => {}
            other => bail!("min after invalidation must be Invalidated, got {other:?}"),
        }
    }

    ensure!(
        list.is_invalidated(),
        "invalidation must be permanent for the remainder of the scenario"
    );
    Ok(())
}
