use std::{cell::RefCell, fmt, rc::Rc};

use indexmap::IndexMap;

use crate::diagnostics::{HythonError, Result};

/// A dynamic value. Cloning a `Value` shares the payload, so lists and
/// dictionaries cloned this way alias the same storage.
#[derive(Clone)]
pub struct Value(pub Rc<ValueKind>);

impl Value {
    pub fn new(kind: ValueKind) -> Self {
        Self(Rc::new(kind))
    }

    pub fn none() -> Self {
        Self::new(ValueKind::None)
    }

    pub fn bool(value: bool) -> Self {
        Self::new(ValueKind::Bool(value))
    }

    pub fn int(value: i64) -> Self {
        Self::new(ValueKind::Int(value))
    }

    pub fn float(value: f64) -> Self {
        Self::new(ValueKind::Float(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(ValueKind::String(value.into()))
    }

    pub fn list(values: Vec<Value>) -> Self {
        Self::new(ValueKind::List(RefCell::new(values)))
    }

    pub fn dict(entries: Dict) -> Self {
        Self::new(ValueKind::Dict(RefCell::new(entries)))
    }

    pub fn tuple(values: Vec<Value>) -> Self {
        Self::new(ValueKind::Tuple(values))
    }

    pub fn pair(first: Value, second: Value) -> Self {
        Self::tuple(vec![first, second])
    }

    pub fn range(range: RangeSeq) -> Self {
        Self::new(ValueKind::Range(range))
    }

    pub fn kind(&self) -> &ValueKind {
        &self.0
    }

    /// Identity comparison: true when both handles point at the same object.
    pub fn is_same(&self, other: &Value) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn is_none(&self) -> bool {
        matches!(self.kind(), ValueKind::None)
    }

    /// Integer view of `Int` and `Bool`, the variants accepted wherever an
    /// index-like integer is expected.
    pub fn as_int(&self) -> Option<i64> {
        match self.kind() {
            ValueKind::Int(n) => Some(*n),
            ValueKind::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.kind() {
            ValueKind::String(s) => Some(s),
            _ => None,
        }
    }

    /// Copies out the elements of a list or tuple.
    pub fn to_vec(&self) -> Option<Vec<Value>> {
        match self.kind() {
            ValueKind::List(items) => Some(items.borrow().clone()),
            ValueKind::Tuple(items) => Some(items.clone()),
            _ => None,
        }
    }
}

pub enum ValueKind {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(RefCell<Vec<Value>>),
    Dict(RefCell<Dict>),
    Tuple(Vec<Value>),
    Range(RangeSeq),
    Reversed(ReversedSeq),
    Enumerate(EnumerateSeq),
    Zip(Vec<Value>),
}

/// Integer progression `start, start + step, ...` bounded by `stop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSeq {
    pub start: i64,
    pub stop: i64,
    pub step: i64,
}

impl RangeSeq {
    pub fn new(start: i64, stop: i64, step: i64) -> Result<Self> {
        if step == 0 {
            return Err(HythonError::value_error("range() arg 3 must not be zero"));
        }
        Ok(Self { start, stop, step })
    }

    pub fn len(&self) -> u64 {
        let (start, stop, step) = (
            i128::from(self.start),
            i128::from(self.stop),
            i128::from(self.step),
        );
        let count = if step > 0 && start < stop {
            (stop - start - 1) / step + 1
        } else if step < 0 && start > stop {
            (start - stop - 1) / -step + 1
        } else {
            0
        };
        count as u64
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index`, which must be below `len()`.
    pub fn nth(&self, index: u64) -> i64 {
        let value = i128::from(self.start) + i128::from(index) * i128::from(self.step);
        value as i64
    }
}

/// Elements of a `reversed(...)` call, fixed when the wrapper is built.
#[derive(Debug, Clone)]
pub enum ReversedSeq {
    /// Source elements already in reverse order.
    Snapshot(Vec<Value>),
    /// A range walked back to front without materialising it.
    Range(RangeSeq),
}

impl ReversedSeq {
    pub fn len(&self) -> u64 {
        match self {
            ReversedSeq::Snapshot(items) => items.len() as u64,
            ReversedSeq::Range(range) => range.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone)]
pub struct EnumerateSeq {
    pub source: Value,
    pub start: i64,
}

/// Insertion-ordered mapping keyed by value equality.
///
/// Keys are normalised so that `1`, `1.0` and `True` land on the same slot;
/// the first key object inserted for a slot is the one kept for display.
#[derive(Clone, Default)]
pub struct Dict {
    entries: IndexMap<HashKey, (Value, Value)>,
}

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts or replaces the value for `key`, returning the previous value.
    pub fn insert(&mut self, key: Value, value: Value) -> Result<Option<Value>> {
        let hash_key = HashKey::from_value(&key)?;
        match self.entries.get_mut(&hash_key) {
            Some(slot) => Ok(Some(std::mem::replace(&mut slot.1, value))),
            None => {
                self.entries.insert(hash_key, (key, value));
                Ok(None)
            }
        }
    }

    pub fn get(&self, key: &Value) -> Result<Option<Value>> {
        let hash_key = HashKey::from_value(key)?;
        Ok(self.entries.get(&hash_key).map(|(_, value)| value.clone()))
    }

    pub fn contains_key(&self, key: &Value) -> Result<bool> {
        let hash_key = HashKey::from_value(key)?;
        Ok(self.entries.contains_key(&hash_key))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.values().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.values().map(|(key, value)| (key, value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum HashKey {
    None,
    Int(i64),
    Float(u64),
    String(String),
    Tuple(Vec<HashKey>),
}

impl HashKey {
    fn from_value(value: &Value) -> Result<Self> {
        match value.kind() {
            ValueKind::None => Ok(HashKey::None),
            ValueKind::Bool(b) => Ok(HashKey::Int(i64::from(*b))),
            ValueKind::Int(n) => Ok(HashKey::Int(*n)),
            ValueKind::Float(f) => Ok(float_key(*f)),
            ValueKind::String(s) => Ok(HashKey::String(s.clone())),
            ValueKind::Tuple(items) => items
                .iter()
                .map(HashKey::from_value)
                .collect::<Result<Vec<_>>>()
                .map(HashKey::Tuple),
            _ => Err(HythonError::type_mismatch(format!(
                "unhashable type: '{}'",
                value.type_name()
            ))),
        }
    }
}

fn float_key(f: f64) -> HashKey {
    // Integral floats share a slot with the equal integer.
    if f.fract() == 0.0 && f >= -9.223_372_036_854_776e18 && f < 9.223_372_036_854_776e18 {
        HashKey::Int(f as i64)
    } else {
        HashKey::Float(f.to_bits())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr())
    }
}
