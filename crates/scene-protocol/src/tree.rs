//! Tree-shaped configuration values.
//!
//! Override trees, layer payloads and host layer snapshots are all trees of
//! string keys to scalars, sequences or nested maps. `Tree` is the explicit
//! tagged form; on the wire it is plain JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Leaf value of a tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

/// A configuration tree: scalar, ordered sequence, or string-keyed map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Tree {
    Scalar(Scalar),
    Sequence(Vec<Tree>),
    Map(BTreeMap<String, Tree>),
}

impl Default for Tree {
    fn default() -> Self {
        Tree::map()
    }
}

impl Tree {
    /// An empty map.
    pub fn map() -> Self {
        Tree::Map(BTreeMap::new())
    }

    /// The null scalar.
    pub fn null() -> Self {
        Tree::Scalar(Scalar::Null)
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Tree::Map(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Tree::Scalar(Scalar::Null))
    }

    /// True for an empty map or an empty sequence.
    pub fn is_empty(&self) -> bool {
        match self {
            Tree::Map(map) => map.is_empty(),
            Tree::Sequence(items) => items.is_empty(),
            Tree::Scalar(_) => false,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Tree>> {
        match self {
            Tree::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Tree]> {
        match self {
            Tree::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tree::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Tree::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Tree::Scalar(Scalar::Number(n)) => n.as_f64(),
            _ => None,
        }
    }

    /// Value at `key` if this is a map that defines it.
    pub fn get(&self, key: &str) -> Option<&Tree> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Value at a key path (`["3dtiles", "color"]`).
    pub fn get_path(&self, path: &[&str]) -> Option<&Tree> {
        path.iter().try_fold(self, |node, key| node.get(key))
    }

    /// Insert `value` at `key`, turning a non-map node into an empty map first.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Tree>) -> Option<Tree> {
        if !self.is_map() {
            *self = Tree::map();
        }
        match self {
            Tree::Map(map) => map.insert(key.into(), value.into()),
            _ => None,
        }
    }

    /// Insert `value` at a key path, creating intermediate maps.
    pub fn insert_path(&mut self, path: &[&str], value: impl Into<Tree>) {
        match path {
            [] => *self = value.into(),
            [last] => {
                self.insert(*last, value);
            }
            [first, rest @ ..] => {
                if !self.is_map() {
                    *self = Tree::map();
                }
                if let Tree::Map(map) = self {
                    map.entry((*first).to_string())
                        .or_insert_with(Tree::map)
                        .insert_path(rest, value);
                }
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Tree> {
        match self {
            Tree::Map(map) => map.remove(key),
            _ => None,
        }
    }

    /// Copy of this map without the given keys. Non-maps are returned as-is.
    pub fn without_keys(&self, keys: &[&str]) -> Tree {
        match self {
            Tree::Map(map) => Tree::Map(
                map.iter()
                    .filter(|(k, _)| !keys.contains(&k.as_str()))
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    /// Build a map from key/value pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Tree
    where
        K: Into<String>,
        V: Into<Tree>,
    {
        Tree::Map(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<Value> for Tree {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Tree::Scalar(Scalar::Null),
            Value::Bool(b) => Tree::Scalar(Scalar::Bool(b)),
            Value::Number(n) => Tree::Scalar(Scalar::Number(n)),
            Value::String(s) => Tree::Scalar(Scalar::String(s)),
            Value::Array(items) => Tree::Sequence(items.into_iter().map(Tree::from).collect()),
            Value::Object(map) => {
                Tree::Map(map.into_iter().map(|(k, v)| (k, Tree::from(v))).collect())
            }
        }
    }
}

impl From<Tree> for Value {
    fn from(tree: Tree) -> Self {
        match tree {
            Tree::Scalar(Scalar::Null) => Value::Null,
            Tree::Scalar(Scalar::Bool(b)) => Value::Bool(b),
            Tree::Scalar(Scalar::Number(n)) => Value::Number(n),
            Tree::Scalar(Scalar::String(s)) => Value::String(s),
            Tree::Sequence(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Tree::Map(map) => Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect()),
        }
    }
}

impl From<&str> for Tree {
    fn from(s: &str) -> Self {
        Tree::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for Tree {
    fn from(s: String) -> Self {
        Tree::Scalar(Scalar::String(s))
    }
}

impl From<bool> for Tree {
    fn from(b: bool) -> Self {
        Tree::Scalar(Scalar::Bool(b))
    }
}

/// Integral values become integer numbers so that `1000.0` and `1000`
/// compare and serialize alike, as they do in the host's JSON.
impl From<f64> for Tree {
    fn from(f: f64) -> Self {
        if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
            return Tree::Scalar(Scalar::Number((f as i64).into()));
        }
        Number::from_f64(f)
            .map(|n| Tree::Scalar(Scalar::Number(n)))
            .unwrap_or(Tree::Scalar(Scalar::Null))
    }
}

impl From<i64> for Tree {
    fn from(i: i64) -> Self {
        Tree::Scalar(Scalar::Number(i.into()))
    }
}

impl From<Vec<Tree>> for Tree {
    fn from(items: Vec<Tree>) -> Self {
        Tree::Sequence(items)
    }
}
