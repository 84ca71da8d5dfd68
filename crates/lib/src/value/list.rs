//! Ordered sequence node.

use std::{fmt, sync::Arc};

use super::Value;

/// An ordered sequence of values.
///
/// Like [`Map`](super::Map), the items are shared between clones and copied
/// on the first write through a shared node.
///
/// ```
/// # use showstate::value::{List, Value};
/// let selection: List = vec!["clip-1", "clip-2"].into_iter().collect();
/// let mut next = selection.clone();
/// next.push("clip-3");
///
/// assert_eq!(selection.len(), 2);
/// assert_eq!(next.len(), 3);
/// assert_eq!(next.get(2), Some(&Value::from("clip-3")));
/// ```
#[derive(Clone, Default)]
pub struct List {
    items: Arc<Vec<Value>>,
}

impl List {
    /// Creates a new empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the list is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Gets the item at `index`
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Returns the first item
    pub fn first(&self) -> Option<&Value> {
        self.items.first()
    }

    /// Returns the last item
    pub fn last(&self) -> Option<&Value> {
        self.items.last()
    }

    /// Returns an iterator over the items
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    /// Returns the items as a slice
    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    /// Appends a value, returning its index
    pub fn push(&mut self, value: impl Into<Value>) -> usize {
        let items = self.items_mut();
        items.push(value.into());
        items.len() - 1
    }

    /// Builder method to append a value and return self
    pub fn with(mut self, value: impl Into<Value>) -> Self {
        self.push(value);
        self
    }

    /// Returns true if both lists are the same node (not merely equal).
    pub fn ptr_eq(&self, other: &List) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }

    /// Mutable access to the items, copying them first if the node is shared.
    pub(crate) fn items_mut(&mut self) -> &mut Vec<Value> {
        Arc::make_mut(&mut self.items)
    }
}

impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.items == *other.items
    }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{item}")?;
        }
        write!(f, "]")
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: Into<Value>> FromIterator<V> for List {
    fn from_iter<T: IntoIterator<Item = V>>(iter: T) -> Self {
        Self {
            items: Arc::new(iter.into_iter().map(Into::into).collect()),
        }
    }
}

impl From<Vec<Value>> for List {
    fn from(items: Vec<Value>) -> Self {
        Self {
            items: Arc::new(items),
        }
    }
}
