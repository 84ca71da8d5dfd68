//! Insertion-ordered map node.

use std::{fmt, sync::Arc};

use indexmap::IndexMap;

use super::Value;

/// An insertion-ordered map of string keys to values.
///
/// The entries live behind a shared pointer: cloning a `Map` is O(1) and the
/// clone is the *same* node until one side writes to it. Writing through
/// [`Map::insert`] or [`Map::remove`] copies the entries first when they are
/// shared (copy-on-write), so a snapshot held elsewhere can never observe the
/// change.
///
/// ```
/// # use showstate::value::{Map, Value};
/// let ui = Map::new().with("zoom", 100).with("snapEnabled", true);
/// let mut edited = ui.clone();
/// assert!(edited.ptr_eq(&ui));
///
/// edited.insert("zoom", 150);
/// assert!(!edited.ptr_eq(&ui));
/// assert_eq!(ui.get("zoom"), Some(&Value::Int(100)));
/// assert_eq!(edited.get("zoom"), Some(&Value::Int(150)));
/// ```
#[derive(Clone, Default)]
pub struct Map {
    entries: Arc<IndexMap<String, Value>>,
}

impl Map {
    /// Creates a new empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Gets the value stored under `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns true if the map contains `key`
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns an iterator over entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Returns an iterator over keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Returns an iterator over values in insertion order
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }

    /// Inserts a value, returning the previous one.
    ///
    /// Existing keys keep their position; new keys are appended.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries_mut().insert(key.into(), value.into())
    }

    /// Removes a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries_mut().shift_remove(key)
    }

    /// Builder method to insert a value and return self
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Returns true if both maps are the same node (not merely equal).
    pub fn ptr_eq(&self, other: &Map) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }

    /// Mutable access to the entries, copying them first if the node is shared.
    pub(crate) fn entries_mut(&mut self) -> &mut IndexMap<String, Value> {
        Arc::make_mut(&mut self.entries)
    }

    /// Mutable access to one member, copying the node first if it is shared.
    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries_mut().get_mut(key)
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.entries == *other.entries
    }
}

impl fmt::Debug for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        write!(f, "}}")
    }
}

impl<K, V> FromIterator<(K, V)> for Map
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let entries = iter
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect::<IndexMap<_, _>>();
        Self {
            entries: Arc::new(entries),
        }
    }
}
