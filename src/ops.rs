//! Primitive operations a host evaluator performs on values outside of
//! builtin calls: subscripting, `append`, `+` and `in`.

use crate::{
    diagnostics::{HythonError, Result},
    numeric::add_numbers,
    types::Number,
    value::{Value, ValueKind},
};

impl Value {
    /// `self[index]`. Sequence indices may be negative; dictionaries look up
    /// by key.
    pub fn get_item(&self, index: &Value) -> Result<Value> {
        match self.kind() {
            ValueKind::List(items) => {
                let items = items.borrow();
                let slot = sequence_index(index, items.len(), "list")?;
                Ok(items[slot].clone())
            }
            ValueKind::Tuple(items) => {
                let slot = sequence_index(index, items.len(), "tuple")?;
                Ok(items[slot].clone())
            }
            ValueKind::String(s) => {
                let len = s.chars().count();
                let slot = sequence_index(index, len, "string")?;
                Ok(s.chars().nth(slot).map(Value::string).unwrap_or_else(Value::none))
            }
            ValueKind::Dict(entries) => entries
                .borrow()
                .get(index)?
                .ok_or_else(|| HythonError::value_error(format!("key {} not found", index.repr()))),
            _ => Err(HythonError::type_mismatch(format!(
                "'{}' object is not subscriptable",
                self.type_name()
            ))),
        }
    }

    /// `self[index] = value` for lists and dictionaries.
    pub fn set_item(&self, index: &Value, value: Value) -> Result<()> {
        match self.kind() {
            ValueKind::List(items) => {
                let mut items = items.borrow_mut();
                let slot = sequence_index(index, items.len(), "list assignment")?;
                items[slot] = value;
                Ok(())
            }
            ValueKind::Dict(entries) => {
                entries.borrow_mut().insert(index.clone(), value)?;
                Ok(())
            }
            _ => Err(HythonError::type_mismatch(format!(
                "'{}' object does not support item assignment",
                self.type_name()
            ))),
        }
    }

    /// In-place `list.append`; visible through every alias of the list.
    pub fn append(&self, item: Value) -> Result<()> {
        match self.kind() {
            ValueKind::List(items) => {
                items.borrow_mut().push(item);
                Ok(())
            }
            _ => Err(HythonError::type_mismatch(format!(
                "'{}' object has no attribute 'append'",
                self.type_name()
            ))),
        }
    }

    /// Binary `+`: numeric addition, string concatenation, or a new
    /// concatenated list/tuple.
    pub fn add(&self, other: &Value) -> Result<Value> {
        if let (Some(a), Some(b)) = (Number::of(self), Number::of(other)) {
            return add_numbers(a, b);
        }
        match (self.kind(), other.kind()) {
            (ValueKind::String(a), ValueKind::String(b)) => Ok(Value::string(format!("{a}{b}"))),
            (ValueKind::List(a), ValueKind::List(b)) => {
                let mut joined = a.borrow().clone();
                joined.extend(b.borrow().iter().cloned());
                Ok(Value::list(joined))
            }
            (ValueKind::Tuple(a), ValueKind::Tuple(b)) => {
                Ok(Value::tuple(a.iter().chain(b).cloned().collect()))
            }
            _ => Err(HythonError::type_mismatch(format!(
                "unsupported operand type(s) for +: '{}' and '{}'",
                self.type_name(),
                other.type_name()
            ))),
        }
    }

    /// `item in self`.
    pub fn contains(&self, item: &Value) -> Result<bool> {
        match self.kind() {
            ValueKind::String(haystack) => match item.kind() {
                ValueKind::String(needle) => Ok(haystack.contains(needle.as_str())),
                _ => Err(HythonError::type_mismatch(format!(
                    "'in <string>' requires string as left operand, not {}",
                    item.type_name()
                ))),
            },
            ValueKind::Dict(entries) => entries.borrow().contains_key(item),
            _ => Ok(self.iter()?.any(|candidate| candidate == *item)),
        }
    }
}

fn sequence_index(index: &Value, len: usize, what: &str) -> Result<usize> {
    let raw = index.as_int().ok_or_else(|| {
        HythonError::type_mismatch(format!(
            "{what} indices must be integers, not '{}'",
            index.type_name()
        ))
    })?;
    let resolved = if raw < 0 { raw + len as i64 } else { raw };
    if resolved < 0 || resolved >= len as i64 {
        return Err(HythonError::value_error(format!("{what} index out of range")));
    }
    Ok(resolved as usize)
}
