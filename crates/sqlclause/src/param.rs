//! Parameter storage for one statement.
//!
//! Every builder owns a [`ParamStore`]. Values are registered in call order
//! and receive the names `p0, p1, ...`. Embedding another builder moves its
//! values into the parent's store under fresh names; the returned
//! [`RemapTable`] rewrites the embedded fragments to match.

use crate::value::Value;
use std::collections::HashMap;
use std::fmt;

/// Name of a bound parameter, displayed as `p{index}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamName(pub(crate) usize);

impl ParamName {
    /// Zero-based binding index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// Translation from a child store's names to the parent's.
pub type RemapTable = HashMap<ParamName, ParamName>;

/// Insertion-ordered collection of bound values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamStore {
    values: Vec<Value>,
}

impl ParamStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Register a value and return its fresh name.
    pub fn bind(&mut self, value: impl Into<Value>) -> ParamName {
        self.values.push(value.into());
        ParamName(self.values.len() - 1)
    }

    /// Look up a bound value by name.
    pub fn get(&self, name: ParamName) -> Option<&Value> {
        self.values.get(name.0)
    }

    /// Number of bound values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(name, value)` pairs in binding order.
    pub fn iter(&self) -> impl Iterator<Item = (ParamName, &Value)> {
        self.values
            .iter()
            .enumerate()
            .map(|(i, v)| (ParamName(i), v))
    }

    /// Drop every bound value.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Merge every entry of `other` (in order) under fresh names.
    pub fn remap(&mut self, other: &ParamStore) -> RemapTable {
        let mut table = RemapTable::with_capacity(other.len());
        for (old, value) in other.iter() {
            let new = self.bind(value.clone());
            table.insert(old, new);
        }
        table
    }
}
