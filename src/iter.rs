//! Pull-based traversal over every iterable variant.
//!
//! Lazy values (`range`, `reversed`, `enumerate`, `zip`) are plain
//! descriptors. The cursor lives in a [`SeqIter`] owned by whoever drives the
//! traversal, so every call to [`Value::iter`] starts from the beginning and
//! independent traversals of one object never interfere.

use crate::{
    diagnostics::{HythonError, Result},
    value::{RangeSeq, ReversedSeq, Value, ValueKind},
};

pub struct SeqIter {
    state: IterState,
}

enum IterState {
    /// Reads the live list by index, so appends made mid-traversal are seen.
    List { list: Value, index: usize },
    Tuple { tuple: Value, index: usize },
    Chars(std::vec::IntoIter<char>),
    Keys(std::vec::IntoIter<Value>),
    Range { range: RangeSeq, index: u64, len: u64 },
    Snapshot { items: Value, index: usize },
    RangeBack { range: RangeSeq, remaining: u64 },
    Enumerate { inner: Box<SeqIter>, next_index: i64 },
    Zip(Vec<SeqIter>),
}

impl Iterator for SeqIter {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        match &mut self.state {
            IterState::List { list, index } => {
                let item = match list.kind() {
                    ValueKind::List(items) => items.borrow().get(*index).cloned(),
                    _ => None,
                }?;
                *index += 1;
                Some(item)
            }
            IterState::Tuple { tuple, index } => {
                let item = match tuple.kind() {
                    ValueKind::Tuple(items) => items.get(*index).cloned(),
                    _ => None,
                }?;
                *index += 1;
                Some(item)
            }
            IterState::Chars(chars) => chars.next().map(|ch| Value::string(ch)),
            IterState::Keys(keys) => keys.next(),
            IterState::Range { range, index, len } => {
                if *index >= *len {
                    return None;
                }
                let item = range.nth(*index);
                *index += 1;
                Some(Value::int(item))
            }
            IterState::Snapshot { items, index } => {
                let item = match items.kind() {
                    ValueKind::Reversed(ReversedSeq::Snapshot(items)) => {
                        items.get(*index).cloned()
                    }
                    _ => None,
                }?;
                *index += 1;
                Some(item)
            }
            IterState::RangeBack { range, remaining } => {
                if *remaining == 0 {
                    return None;
                }
                *remaining -= 1;
                Some(Value::int(range.nth(*remaining)))
            }
            IterState::Enumerate { inner, next_index } => {
                let item = inner.next()?;
                let index = *next_index;
                *next_index = next_index.saturating_add(1);
                Some(Value::pair(Value::int(index), item))
            }
            IterState::Zip(inners) => {
                if inners.is_empty() {
                    return None;
                }
                let mut row = Vec::with_capacity(inners.len());
                for inner in inners.iter_mut() {
                    row.push(inner.next()?);
                }
                Some(Value::tuple(row))
            }
        }
    }
}

impl Value {
    /// Starts a fresh traversal. Dictionaries yield their keys.
    pub fn iter(&self) -> Result<SeqIter> {
        let state = match self.kind() {
            ValueKind::List(_) => IterState::List {
                list: self.clone(),
                index: 0,
            },
            ValueKind::Tuple(_) => IterState::Tuple {
                tuple: self.clone(),
                index: 0,
            },
            ValueKind::String(s) => IterState::Chars(s.chars().collect::<Vec<_>>().into_iter()),
            ValueKind::Dict(entries) => {
                let keys: Vec<Value> = entries.borrow().keys().cloned().collect();
                IterState::Keys(keys.into_iter())
            }
            ValueKind::Range(range) => IterState::Range {
                range: *range,
                index: 0,
                len: range.len(),
            },
            ValueKind::Reversed(ReversedSeq::Snapshot(_)) => IterState::Snapshot {
                items: self.clone(),
                index: 0,
            },
            ValueKind::Reversed(ReversedSeq::Range(range)) => IterState::RangeBack {
                range: *range,
                remaining: range.len(),
            },
            ValueKind::Enumerate(seq) => IterState::Enumerate {
                inner: Box::new(seq.source.iter()?),
                next_index: seq.start,
            },
            ValueKind::Zip(sources) => IterState::Zip(
                sources
                    .iter()
                    .map(Value::iter)
                    .collect::<Result<Vec<_>>>()?,
            ),
            ValueKind::None | ValueKind::Bool(_) | ValueKind::Int(_) | ValueKind::Float(_) => {
                return Err(not_iterable(self));
            }
        };
        Ok(SeqIter { state })
    }

    pub fn is_iterable(&self) -> bool {
        !matches!(
            self.kind(),
            ValueKind::None | ValueKind::Bool(_) | ValueKind::Int(_) | ValueKind::Float(_)
        )
    }

    /// Number of elements a traversal would yield, computed without
    /// consuming anything. `None` for non-iterables.
    pub fn known_len(&self) -> Option<u64> {
        match self.kind() {
            ValueKind::List(items) => Some(items.borrow().len() as u64),
            ValueKind::Tuple(items) => Some(items.len() as u64),
            ValueKind::String(s) => Some(s.chars().count() as u64),
            ValueKind::Dict(entries) => Some(entries.borrow().len() as u64),
            ValueKind::Range(range) => Some(range.len()),
            ValueKind::Reversed(seq) => Some(seq.len()),
            ValueKind::Enumerate(seq) => seq.source.known_len(),
            ValueKind::Zip(sources) => {
                let mut shortest: Option<u64> = None;
                for source in sources {
                    let len = source.known_len()?;
                    shortest = Some(shortest.map_or(len, |current| current.min(len)));
                }
                Some(shortest.unwrap_or(0))
            }
            ValueKind::None | ValueKind::Bool(_) | ValueKind::Int(_) | ValueKind::Float(_) => None,
        }
    }

    /// Emptiness probe used by truthiness.
    pub(crate) fn is_empty_sequence(&self) -> bool {
        match self.kind() {
            ValueKind::String(s) => s.is_empty(),
            ValueKind::Zip(sources) => {
                sources.is_empty() || sources.iter().any(Value::is_empty_sequence)
            }
            ValueKind::Enumerate(seq) => seq.source.is_empty_sequence(),
            _ => self.known_len() == Some(0),
        }
    }
}

pub(crate) fn not_iterable(value: &Value) -> HythonError {
    HythonError::type_mismatch(format!("'{}' object is not iterable", value.type_name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Dict, EnumerateSeq};

    fn ints(values: impl IntoIterator<Item = Value>) -> Vec<i64> {
        values
            .into_iter()
            .map(|v| v.as_int().expect("integer element"))
            .collect()
    }

    #[test]
    fn range_walks_forward_and_back() {
        let range = RangeSeq::new(10, 0, -3).unwrap();
        let value = Value::range(range);
        assert_eq!(ints(value.iter().unwrap()), vec![10, 7, 4, 1]);

        let back = Value::new(ValueKind::Reversed(ReversedSeq::Range(range)));
        assert_eq!(ints(back.iter().unwrap()), vec![1, 4, 7, 10]);
    }

    #[test]
    fn range_at_the_integer_limits() {
        let range = RangeSeq::new(i64::MAX - 2, i64::MAX, 1).unwrap();
        assert_eq!(
            ints(Value::range(range).iter().unwrap()),
            vec![i64::MAX - 2, i64::MAX - 1]
        );
        let full = RangeSeq::new(i64::MIN, i64::MAX, i64::MAX).unwrap();
        assert_eq!(full.len(), 3);
    }

    #[test]
    fn traversals_restart() {
        let enumerate = Value::new(ValueKind::Enumerate(EnumerateSeq {
            source: Value::list(vec![Value::int(7), Value::int(8)]),
            start: 5,
        }));
        let first: Vec<Value> = enumerate.iter().unwrap().collect();
        let second: Vec<Value> = enumerate.iter().unwrap().collect();
        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
        assert_eq!(first[0], Value::pair(Value::int(5), Value::int(7)));
    }

    #[test]
    fn list_traversal_sees_appends() {
        let list = Value::list(vec![Value::int(1)]);
        let mut iter = list.iter().unwrap();
        assert_eq!(iter.next(), Some(Value::int(1)));
        if let ValueKind::List(items) = list.kind() {
            items.borrow_mut().push(Value::int(2));
        }
        assert_eq!(iter.next(), Some(Value::int(2)));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn dict_yields_keys_in_insertion_order() {
        let mut entries = Dict::new();
        entries.insert(Value::string("b"), Value::int(1)).unwrap();
        entries.insert(Value::string("a"), Value::int(2)).unwrap();
        let keys: Vec<Value> = Value::dict(entries).iter().unwrap().collect();
        assert_eq!(keys, vec![Value::string("b"), Value::string("a")]);
    }

    #[test]
    fn emptiness_probe_does_not_consume() {
        let zip = Value::new(ValueKind::Zip(vec![
            Value::list(vec![Value::int(1)]),
            Value::string(""),
        ]));
        assert!(zip.is_empty_sequence());
        assert_eq!(zip.known_len(), Some(0));

        let empty_zip = Value::new(ValueKind::Zip(Vec::new()));
        assert!(empty_zip.is_empty_sequence());
        assert_eq!(empty_zip.iter().unwrap().count(), 0);
    }

    #[test]
    fn scalars_are_not_iterable() {
        assert!(Value::int(3).iter().is_err());
        assert!(!Value::none().is_iterable());
    }
}
