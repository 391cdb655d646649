use std::cmp::Ordering;

use crate::{
    diagnostics::{HythonError, Result},
    stdlib::{
        Arity, Builtins, CallContext,
        args::{expect_int, expect_iterable},
        native,
    },
    value::{Dict, EnumerateSeq, RangeSeq, ReversedSeq, Value, ValueKind},
};

pub(crate) fn install(builtins: &mut Builtins) {
    builtins.define(native("len", Arity::Exact(1), collections_len));
    builtins.define(native("sorted", Arity::Between(1, 2), collections_sorted));
    builtins.define(native("reversed", Arity::Exact(1), collections_reversed));
    builtins.define(native("enumerate", Arity::Between(1, 2), collections_enumerate));
    builtins.define(native("zip", Arity::AtLeast(0), collections_zip));
    builtins.define(native("any", Arity::Exact(1), collections_any));
    builtins.define(native("all", Arity::Exact(1), collections_all));
    builtins.define(native("list", Arity::Between(0, 1), collections_list));
    builtins.define(native("dict", Arity::Between(0, 1), collections_dict));
    builtins.define(native("range", Arity::Between(1, 3), collections_range));
}

fn collections_len(_: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
    let value = &args[0];
    let len = match value.kind() {
        ValueKind::String(s) => s.chars().count(),
        ValueKind::List(items) => items.borrow().len(),
        ValueKind::Tuple(items) => items.len(),
        ValueKind::Dict(entries) => entries.borrow().len(),
        _ => {
            return Err(HythonError::type_mismatch(format!(
                "object of type '{}' has no len()",
                value.type_name()
            )));
        }
    };
    Ok(Value::int(len as i64))
}

fn collections_sorted(_: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
    let source = expect_iterable(&args[0], "sorted")?;
    let reverse = args.get(1).is_some_and(Value::is_truthy);
    let items = sort_values(source.iter()?.collect(), reverse)?;
    Ok(Value::list(items))
}

/// Stable merge sort driven only by "strictly less than" tests. With
/// `reverse`, equal elements still keep their source order. The first
/// comparison failure aborts the sort, and an inconsistent ordering (NaN)
/// yields some permutation rather than a panic.
pub(crate) fn sort_values(items: Vec<Value>, reverse: bool) -> Result<Vec<Value>> {
    let mut precedes = |later: &Value, earlier: &Value| -> Result<bool> {
        let ordering = if reverse {
            earlier.compare(later)?
        } else {
            later.compare(earlier)?
        };
        Ok(ordering == Ordering::Less)
    };
    merge_sort(items, &mut precedes)
}

fn merge_sort<F>(mut items: Vec<Value>, precedes: &mut F) -> Result<Vec<Value>>
where
    F: FnMut(&Value, &Value) -> Result<bool>,
{
    if items.len() <= 1 {
        return Ok(items);
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, precedes)?;
    let right = merge_sort(right, precedes)?;

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    while let (Some(l), Some(r)) = (left.peek(), right.peek()) {
        // Ties take from the left run.
        if precedes(r, l)? {
            merged.extend(right.next());
        } else {
            merged.extend(left.next());
        }
    }
    merged.extend(left);
    merged.extend(right);
    Ok(merged)
}

fn collections_reversed(_: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
    let value = &args[0];
    let seq = match value.kind() {
        ValueKind::Range(range) => ReversedSeq::Range(*range),
        ValueKind::List(items) => {
            ReversedSeq::Snapshot(items.borrow().iter().rev().cloned().collect())
        }
        ValueKind::Tuple(items) => ReversedSeq::Snapshot(items.iter().rev().cloned().collect()),
        ValueKind::String(s) => ReversedSeq::Snapshot(s.chars().rev().map(Value::string).collect()),
        ValueKind::Reversed(ReversedSeq::Snapshot(items)) => {
            ReversedSeq::Snapshot(items.iter().rev().cloned().collect())
        }
        ValueKind::Reversed(ReversedSeq::Range(range)) => {
            // Walking a reversed range backwards is the range itself.
            return Ok(Value::range(*range));
        }
        _ => {
            return Err(HythonError::type_mismatch(format!(
                "'{}' object is not reversible",
                value.type_name()
            )));
        }
    };
    Ok(Value::new(ValueKind::Reversed(seq)))
}

fn collections_enumerate(_: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
    let source = expect_iterable(&args[0], "enumerate")?.clone();
    let start = match args.get(1) {
        Some(value) => expect_int(value, "enumerate")?,
        None => 0,
    };
    Ok(Value::new(ValueKind::Enumerate(EnumerateSeq { source, start })))
}

fn collections_zip(_: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
    let sources = args
        .iter()
        .map(|arg| expect_iterable(arg, "zip").cloned())
        .collect::<Result<Vec<_>>>()?;
    Ok(Value::new(ValueKind::Zip(sources)))
}

fn collections_any(_: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
    let mut iter = expect_iterable(&args[0], "any")?.iter()?;
    Ok(Value::bool(iter.any(|item| item.is_truthy())))
}

fn collections_all(_: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
    let mut iter = expect_iterable(&args[0], "all")?.iter()?;
    Ok(Value::bool(iter.all(|item| item.is_truthy())))
}

fn collections_list(_: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
    match args.first() {
        Some(source) => {
            let items = expect_iterable(source, "list")?.iter()?.collect();
            Ok(Value::list(items))
        }
        None => Ok(Value::list(Vec::new())),
    }
}

fn collections_dict(_: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
    let mut entries = Dict::new();
    if let Some(source) = args.first() {
        if let ValueKind::Dict(existing) = source.kind() {
            entries = existing.borrow().clone();
        } else {
            for (idx, item) in expect_iterable(source, "dict")?.iter()?.enumerate() {
                let pair = item.to_vec().filter(|items| items.len() == 2).ok_or_else(|| {
                    HythonError::value_error(format!(
                        "dictionary update sequence element #{idx} is not a pair"
                    ))
                })?;
                entries.insert(pair[0].clone(), pair[1].clone())?;
            }
        }
    }
    Ok(Value::dict(entries))
}

fn collections_range(_: &mut CallContext<'_>, args: &[Value]) -> Result<Value> {
    let bounds = args
        .iter()
        .map(|arg| expect_int(arg, "range"))
        .collect::<Result<Vec<_>>>()?;
    let range = match bounds.as_slice() {
        [stop] => RangeSeq::new(0, *stop, 1)?,
        [start, stop] => RangeSeq::new(*start, *stop, 1)?,
        [start, stop, step] => RangeSeq::new(*start, *stop, *step)?,
        _ => {
            return Err(HythonError::arity(format!(
                "range expected at most 3 arguments, got {}",
                bounds.len()
            )));
        }
    };
    Ok(Value::range(range))
}
