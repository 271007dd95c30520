//! Arrays: ordered value sequences with copy-on-write storage.

use std::sync::Arc;

use super::Value;
use crate::errors::{index_out_of_bounds, SourceResult};

/// An ordered sequence of values.
///
/// Clones share storage until one side is mutated.
#[derive(Clone, Default, PartialEq, Hash)]
pub struct Array(Arc<Vec<Value>>);

impl Array {
    pub fn new() -> Self {
        Array::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    fn make_mut(&mut self) -> &mut Vec<Value> {
        Arc::make_mut(&mut self.0)
    }

    pub fn push(&mut self, value: Value) {
        self.make_mut().push(value);
    }

    pub fn pop(&mut self) -> Option<Value> {
        self.make_mut().pop()
    }

    pub fn extend(&mut self, values: impl IntoIterator<Item = Value>) {
        self.make_mut().extend(values);
    }

    /// Resolve a possibly negative index against the length.
    ///
    /// With `end_ok`, the index one past the last element is accepted.
    pub fn locate(&self, index: i64, end_ok: bool) -> SourceResult<usize> {
        let len = self.len();
        let resolved = if index >= 0 {
            usize::try_from(index).ok()
        } else {
            len.checked_sub(index.unsigned_abs() as usize)
        };
        match resolved {
            Some(i) if i < len || (end_ok && i == len) => Ok(i),
            _ => Err(index_out_of_bounds(index, len)),
        }
    }

    pub fn at(&self, index: i64) -> SourceResult<&Value> {
        let i = self.locate(index, false)?;
        Ok(&self.0[i])
    }

    pub fn at_mut(&mut self, index: i64) -> SourceResult<&mut Value> {
        let i = self.locate(index, false)?;
        Ok(&mut self.make_mut()[i])
    }

    pub fn insert(&mut self, index: i64, value: Value) -> SourceResult<()> {
        let i = self.locate(index, true)?;
        self.make_mut().insert(i, value);
        Ok(())
    }

    pub fn remove(&mut self, index: i64) -> SourceResult<Value> {
        let i = self.locate(index, false)?;
        Ok(self.make_mut().remove(i))
    }

    /// The elements between `start` (inclusive) and `end` (exclusive).
    pub fn slice(&self, start: i64, end: Option<i64>) -> SourceResult<Array> {
        let start = self.locate(start, true)?;
        let end = match end {
            Some(end) => self.locate(end, true)?.max(start),
            None => self.len(),
        };
        Ok(self.0[start..end].iter().cloned().collect())
    }

    /// Repeat the array `n` times; `None` if the result cannot be
    /// allocated.
    pub fn repeat(&self, n: usize) -> Option<Array> {
        if self.is_empty() {
            return Some(Array::new());
        }
        let mut out = Vec::new();
        out.try_reserve_exact(self.len().checked_mul(n)?).ok()?;
        for _ in 0..n {
            out.extend(self.iter().cloned());
        }
        Some(Array::from(out))
    }

    pub fn repr(&self) -> String {
        let items: Vec<String> = self.iter().map(Value::repr).collect();
        if items.len() == 1 {
            format!("({},)", items[0])
        } else {
            format!("({})", items.join(", "))
        }
    }
}

impl From<Vec<Value>> for Array {
    fn from(values: Vec<Value>) -> Self {
        Array(Arc::new(values))
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Array::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl IntoIterator for Array {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        Arc::try_unwrap(self.0)
            .unwrap_or_else(|shared| (*shared).clone())
            .into_iter()
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Debug for Array {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.repr())
    }
}
