//! Dictionaries: insertion-ordered string-keyed maps.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use super::{Str, Value};
use crate::errors::{key_not_found, SourceResult};

type Map = IndexMap<Str, Value, FxBuildHasher>;

/// A map from string keys to values.
///
/// Iteration order is insertion order. Clones share storage until one side
/// is mutated. Equality ignores order.
#[derive(Clone, Default, PartialEq)]
pub struct Dict(Arc<Map>);

impl Dict {
    pub fn new() -> Self {
        Dict::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn make_mut(&mut self) -> &mut Map {
        Arc::make_mut(&mut self.0)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn at(&self, key: &str) -> SourceResult<&Value> {
        self.get(key).ok_or_else(|| key_not_found(key))
    }

    pub fn at_mut(&mut self, key: &str) -> SourceResult<&mut Value> {
        self.make_mut()
            .get_mut(key)
            .ok_or_else(|| key_not_found(key))
    }

    /// Mutable access, inserting `none` for a missing key.
    pub fn entry_mut(&mut self, key: Str) -> &mut Value {
        self.make_mut().entry(key).or_default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Insert a pair; an existing key keeps its position.
    pub fn insert(&mut self, key: Str, value: Value) {
        self.make_mut().insert(key, value);
    }

    /// Remove a pair, preserving the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.make_mut().shift_remove(key)
    }

    /// Merge `other` into `self`; keys of `other` win.
    pub fn extend(&mut self, other: Dict) {
        let map = self.make_mut();
        for (key, value) in other {
            map.insert(key, value);
        }
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, Str, Value> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Str> {
        self.0.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.0.values()
    }

    pub fn repr(&self) -> String {
        if self.is_empty() {
            return "(:)".into();
        }
        let pairs: Vec<String> = self
            .iter()
            .map(|(key, value)| {
                if folio_ir::is_ident(key) {
                    format!("{key}: {}", value.repr())
                } else {
                    format!("{}: {}", key.repr(), value.repr())
                }
            })
            .collect();
        format!("({})", pairs.join(", "))
    }
}

impl Hash for Dict {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut pairs: Vec<_> = self.iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));
        state.write_usize(pairs.len());
        for (key, value) in pairs {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl FromIterator<(Str, Value)> for Dict {
    fn from_iter<I: IntoIterator<Item = (Str, Value)>>(iter: I) -> Self {
        Dict(Arc::new(iter.into_iter().collect()))
    }
}

impl IntoIterator for Dict {
    type Item = (Str, Value);
    type IntoIter = indexmap::map::IntoIter<Str, Value>;

    fn into_iter(self) -> Self::IntoIter {
        Arc::try_unwrap(self.0)
            .unwrap_or_else(|shared| (*shared).clone())
            .into_iter()
    }
}

impl<'a> IntoIterator for &'a Dict {
    type Item = (&'a Str, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Str, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Debug for Dict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.repr())
    }
}
