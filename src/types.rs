//! Type names, truthiness, equality and ordering for every value variant.

use std::{cmp::Ordering, rc::Rc};

use crate::{
    diagnostics::{HythonError, Result},
    value::{Value, ValueKind},
};

/// Numeric view used by equality, ordering and arithmetic. `Bool` is an
/// integer here.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub(crate) fn of(value: &Value) -> Option<Number> {
        match value.kind() {
            ValueKind::Int(n) => Some(Number::Int(*n)),
            ValueKind::Bool(b) => Some(Number::Int(i64::from(*b))),
            ValueKind::Float(f) => Some(Number::Float(*f)),
            _ => None,
        }
    }

    pub(crate) fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(f) => f,
        }
    }

    fn partial_cmp(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
            (Number::Int(a), Number::Float(b)) => int_float_cmp(a, b),
            (Number::Float(a), Number::Int(b)) => int_float_cmp(b, a).map(Ordering::reverse),
            (Number::Float(a), Number::Float(b)) => a.partial_cmp(&b),
        }
    }
}

fn int_float_cmp(int: i64, float: f64) -> Option<Ordering> {
    if float.is_nan() {
        return None;
    }
    // Past 2^63 every float is outside the i64 range.
    if float >= 9.223_372_036_854_776e18 {
        return Some(Ordering::Less);
    }
    if float < -9.223_372_036_854_776e18 {
        return Some(Ordering::Greater);
    }
    let truncated = float.trunc();
    match int.cmp(&(truncated as i64)) {
        Ordering::Equal => 0.0_f64.partial_cmp(&(float - truncated)),
        other => Some(other),
    }
}

impl Value {
    /// Canonical type name as reported by `type()`.
    pub fn type_name(&self) -> &'static str {
        match self.kind() {
            ValueKind::None => "NoneType",
            ValueKind::Bool(_) => "bool",
            ValueKind::Int(_) => "int",
            ValueKind::Float(_) => "float",
            ValueKind::String(_) => "str",
            ValueKind::List(_) => "list",
            ValueKind::Dict(_) => "dict",
            ValueKind::Tuple(_) => "tuple",
            ValueKind::Range(_) => "range",
            ValueKind::Reversed(_) => "reversed",
            ValueKind::Enumerate(_) => "enumerate",
            ValueKind::Zip(_) => "zip",
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self.kind() {
            ValueKind::None => false,
            ValueKind::Bool(b) => *b,
            ValueKind::Int(n) => *n != 0,
            ValueKind::Float(f) => *f != 0.0,
            ValueKind::String(s) => !s.is_empty(),
            ValueKind::List(items) => !items.borrow().is_empty(),
            ValueKind::Dict(entries) => !entries.borrow().is_empty(),
            ValueKind::Tuple(items) => !items.is_empty(),
            ValueKind::Range(_)
            | ValueKind::Reversed(_)
            | ValueKind::Enumerate(_)
            | ValueKind::Zip(_) => !self.is_empty_sequence(),
        }
    }

    /// Ordering used by `min`, `max` and `sorted`.
    ///
    /// Numbers compare numerically across `int`, `float` and `bool`; strings
    /// by code point; lists and tuples lexicographically. NaN is neither less
    /// nor greater than anything, so it reports `Equal`.
    pub fn compare(&self, other: &Value) -> Result<Ordering> {
        compare_at(self, other, 0)
    }
}

const MAX_COMPARE_DEPTH: usize = 200;

fn compare_at(left: &Value, right: &Value, depth: usize) -> Result<Ordering> {
    if let (Some(a), Some(b)) = (Number::of(left), Number::of(right)) {
        return Ok(a.partial_cmp(b).unwrap_or(Ordering::Equal));
    }
    match (left.kind(), right.kind()) {
        (ValueKind::String(a), ValueKind::String(b)) => Ok(a.cmp(b)),
        (ValueKind::List(a), ValueKind::List(b)) => {
            compare_slices(&a.borrow(), &b.borrow(), depth)
        }
        (ValueKind::Tuple(a), ValueKind::Tuple(b)) => compare_slices(a, b, depth),
        _ => Err(HythonError::type_mismatch(format!(
            "'<' not supported between instances of '{}' and '{}'",
            left.type_name(),
            right.type_name()
        ))),
    }
}

fn compare_slices(left: &[Value], right: &[Value], depth: usize) -> Result<Ordering> {
    // Only reachable through containers that hold themselves.
    if depth >= MAX_COMPARE_DEPTH {
        return Err(HythonError::value_error(
            "maximum recursion depth exceeded in comparison",
        ));
    }
    for (a, b) in left.iter().zip(right) {
        // Equal elements are skipped without requiring an ordering, so
        // `[1, "a"] < [1, "b"]` works.
        if a == b {
            continue;
        }
        match compare_at(a, b, depth + 1)? {
            Ordering::Equal => continue,
            other => return Ok(other),
        }
    }
    Ok(left.len().cmp(&right.len()))
}

type PairStack = Vec<(*const ValueKind, *const ValueKind)>;

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        values_equal(self, other, &mut PairStack::new())
    }
}

/// Structural equality. A pair of containers already being compared higher
/// up is assumed equal, which keeps self-referencing lists finite.
fn values_equal(left: &Value, right: &Value, active: &mut PairStack) -> bool {
    if let (Some(a), Some(b)) = (Number::of(left), Number::of(right)) {
        return a.partial_cmp(b) == Some(Ordering::Equal);
    }
    match (left.kind(), right.kind()) {
        (ValueKind::None, ValueKind::None) => true,
        (ValueKind::String(a), ValueKind::String(b)) => a == b,
        (ValueKind::List(a), ValueKind::List(b)) => {
            left.is_same(right)
                || nested(left, right, active, |active| {
                    slices_equal(&a.borrow(), &b.borrow(), active)
                })
        }
        (ValueKind::Tuple(a), ValueKind::Tuple(b)) => slices_equal(a, b, active),
        (ValueKind::Dict(a), ValueKind::Dict(b)) => {
            left.is_same(right)
                || nested(left, right, active, |active| {
                    let (a, b) = (a.borrow(), b.borrow());
                    a.len() == b.len()
                        && a.iter().all(|(key, value)| match b.get(key) {
                            Ok(Some(theirs)) => values_equal(value, &theirs, active),
                            _ => false,
                        })
                })
        }
        (ValueKind::Range(a), ValueKind::Range(b)) => {
            let len = a.len();
            len == b.len()
                && (len == 0 || (a.start == b.start && (len == 1 || a.step == b.step)))
        }
        (ValueKind::Reversed(_), ValueKind::Reversed(_))
        | (ValueKind::Enumerate(_), ValueKind::Enumerate(_))
        | (ValueKind::Zip(_), ValueKind::Zip(_)) => left.is_same(right),
        _ => false,
    }
}

fn nested(
    left: &Value,
    right: &Value,
    active: &mut PairStack,
    body: impl FnOnce(&mut PairStack) -> bool,
) -> bool {
    let pair = (Rc::as_ptr(&left.0), Rc::as_ptr(&right.0));
    if active.contains(&pair) {
        return true;
    }
    active.push(pair);
    let equal = body(active);
    active.pop();
    equal
}

fn slices_equal(left: &[Value], right: &[Value], active: &mut PairStack) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .zip(right)
            .all(|(a, b)| values_equal(a, b, active))
}
