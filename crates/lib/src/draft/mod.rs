//! Copy-on-write drafts of the state tree.
//!
//! [`produce`] hands a mutator a [`Draft`]: a mutable view over the whole tree
//! that behaves like ordinary assignment, deletion and list editing at any
//! depth. The mutator does not declare up front which branches it will touch.
//!
//! # How the next tree is built
//!
//! The draft starts as a second reference to the current tree. Reads go
//! straight to the shared nodes and never copy anything. The first write
//! through a node copies that node one level deep (its children are still
//! shared), and the same happens for every ancestor on the way down from the
//! root. A node that was already copied by an earlier write in the same
//! draft is written in place. Every branch the mutator did not write to is
//! therefore the *same* node in the current and the next tree.
//!
//! If the mutator never wrote anything, the next tree is the current tree
//! itself, which is how the store recognises a no-op update. Assigning a value
//! that is already there (the same node, or an equal scalar) is not a write.
//!
//! Host [`Handle`](crate::value::Handle)s are leaves: they are moved around by
//! reference and never entered.
//!
//! # Atomicity
//!
//! Each draft operation either applies completely or fails with a
//! [`DraftError`] leaving the draft untouched. When the mutator itself fails
//! the whole draft is dropped, so no partial result is ever observable.

pub mod errors;

pub use errors::DraftError;

use crate::{
    Result,
    path::{Path, Segment},
    value::{List, Map, Value, ValueError},
};

/// Runs `mutator` against a draft of `base` and returns the next tree.
///
/// The returned tree is `base` itself (the same node) when the mutator made no
/// writes. Errors returned by the mutator are passed through unchanged and the
/// draft is discarded.
///
/// ```
/// # use showstate::{draft::produce, value::{Map, Value}};
/// let base: Value = Map::new()
///     .with("project", Map::new().with("name", "Untitled"))
///     .with("ui", Map::new().with("zoom", 100))
///     .into();
///
/// let (next, _) = produce(&base, |draft| {
///     draft.set("ui.zoom", 77)?;
///     Ok(())
/// })?;
///
/// assert_eq!(next.get("ui.zoom"), Some(&Value::Int(77)));
/// // Untouched branches are shared, written ones are new
/// assert!(Value::same(next.get("project").unwrap(), base.get("project").unwrap()));
/// assert!(!Value::same(next.get("ui").unwrap(), base.get("ui").unwrap()));
///
/// let (unchanged, _) = produce(&next, |_| Ok(()))?;
/// assert!(Value::same(&unchanged, &next));
/// # Ok::<(), showstate::Error>(())
/// ```
pub fn produce<R, F>(base: &Value, mutator: F) -> Result<(Value, R)>
where
    F: FnOnce(&mut Draft) -> Result<R>,
{
    let mut draft = Draft::new(base.clone());
    let output = mutator(&mut draft)?;
    let writes = draft.writes;
    let next = draft.finish();
    tracing::trace!(writes, "Draft finished");
    Ok((next, output))
}

/// The mutable view of the state tree handed to an update.
///
/// Every path argument accepts anything that converts to a
/// [`Path`]: string slices, `String`s and [`PathBuf`](crate::path::PathBuf)s.
/// Reads observe the draft's own earlier writes.
#[derive(Debug)]
pub struct Draft {
    /// The tree the draft was created from
    base: Value,
    /// The working tree, sharing every unwritten node with `base`
    root: Value,
    /// Number of writes applied so far
    writes: usize,
}

impl Draft {
    pub(crate) fn new(base: Value) -> Self {
        Self {
            root: base.clone(),
            base,
            writes: 0,
        }
    }

    /// Returns the tree as it was before the update started.
    pub fn base(&self) -> &Value {
        &self.base
    }

    /// Returns the working tree including all writes so far.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Returns true once any write has been applied.
    pub fn is_modified(&self) -> bool {
        self.writes > 0
    }

    /// Gets the value at `path`.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&Value> {
        self.root.get(path)
    }

    /// Gets the value at `path` converted with `TryFrom`.
    pub fn get_as<'a, T>(&'a self, path: impl AsRef<Path>) -> Option<T>
    where
        T: TryFrom<&'a Value, Error = ValueError>,
    {
        self.root.get_as(path)
    }

    /// Returns true if `path` resolves to a value.
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.root.get(path).is_some()
    }

    /// Returns the number of entries of the map or list at `path`.
    pub fn len_at(&self, path: impl AsRef<Path>) -> Option<usize> {
        match self.root.get(path)? {
            Value::Map(map) => Some(map.len()),
            Value::List(list) => Some(list.len()),
            _ => None,
        }
    }

    /// Returns the index of the first item of the list at `path` matching `predicate`.
    pub fn position<F>(&self, path: impl AsRef<Path>, predicate: F) -> Option<usize>
    where
        F: FnMut(&Value) -> bool,
    {
        self.root.get(path)?.as_list()?.iter().position(predicate)
    }

    /// Assigns `value` at `path`, returning the previous value.
    ///
    /// Missing map members on the way (and `null` ones) are created as empty
    /// maps. Under a list the index must address an existing item or be equal
    /// to the length, which appends. The empty path replaces the whole tree.
    ///
    /// # Errors
    ///
    /// - [`DraftError::TypeMismatch`] when the path runs through a scalar or handle,
    ///   or uses a key on a list.
    /// - [`DraftError::IndexOutOfBounds`] when a list index is past the end.
    pub fn set(&mut self, path: impl AsRef<Path>, value: impl Into<Value>) -> Result<Option<Value>> {
        let segments: Vec<Segment> = path.as_ref().segments().collect();
        self.set_segments(&segments, value)
    }

    /// [`set`](Self::set) addressed by already parsed segments.
    pub fn set_segments(
        &mut self,
        segments: &[Segment],
        value: impl Into<Value>,
    ) -> Result<Option<Value>> {
        let value = value.into();

        let Some((last, parents)) = segments.split_last() else {
            if Value::same(&self.root, &value) {
                return Ok(Some(value));
            }
            self.record_write("set", segments);
            return Ok(Some(std::mem::replace(&mut self.root, value)));
        };

        if let Some(existing) = check_settable(&self.root, segments)? {
            if Value::same(existing, &value) {
                return Ok(Some(existing.clone()));
            }
        }

        self.record_write("set", segments);
        let parent = parent_for_set(&mut self.root, parents)?;
        let previous = match parent {
            Value::Map(map) => map.insert(last.as_key().into_owned(), value),
            Value::List(list) => {
                let items = list.items_mut();
                let index = last.as_index().unwrap_or(items.len());
                match items.get_mut(index) {
                    Some(slot) => Some(std::mem::replace(slot, value)),
                    None => {
                        items.push(value);
                        None
                    }
                }
            }
            other => {
                return Err(DraftError::TypeMismatch {
                    operation: "set",
                    path: describe(parents),
                    expected: "map or list",
                    actual: other.type_name(),
                }
                .into());
            }
        };
        Ok(previous)
    }

    /// Removes the value at `path`, returning it.
    ///
    /// Map members are removed keeping the order of the remaining keys; list
    /// items are removed shifting later items down. A path that does not
    /// resolve is not an error and removes nothing.
    pub fn remove(&mut self, path: impl AsRef<Path>) -> Result<Option<Value>> {
        let segments: Vec<Segment> = path.as_ref().segments().collect();
        self.remove_segments(&segments)
    }

    /// [`remove`](Self::remove) addressed by already parsed segments.
    pub fn remove_segments(&mut self, segments: &[Segment]) -> Result<Option<Value>> {
        let Some((last, parents)) = segments.split_last() else {
            return Err(DraftError::InvalidPath {
                path: describe(segments),
                reason: "the root cannot be removed".to_string(),
            }
            .into());
        };

        let present = match self.root.get_segments(parents) {
            Some(Value::Map(map)) => map.contains_key(&last.as_key()),
            Some(Value::List(list)) => last.as_index().is_some_and(|index| index < list.len()),
            _ => false,
        };
        if !present {
            return Ok(None);
        }

        self.record_write("remove", segments);
        let removed = match node_mut(&mut self.root, parents, "remove")? {
            Value::Map(map) => map.remove(&last.as_key()),
            Value::List(list) => {
                let items = list.items_mut();
                match last.as_index() {
                    Some(index) if index < items.len() => Some(items.remove(index)),
                    _ => None,
                }
            }
            _ => None,
        };
        Ok(removed)
    }

    /// Appends to the list at `path`, returning the new length.
    pub fn push(&mut self, path: impl AsRef<Path>, value: impl Into<Value>) -> Result<usize> {
        let segments: Vec<Segment> = path.as_ref().segments().collect();
        self.list_at(&segments, "push")?;
        let items = self.list_mut(&segments, "push")?;
        items.push(value.into());
        Ok(items.len())
    }

    /// Removes and returns the last item of the list at `path`.
    pub fn pop(&mut self, path: impl AsRef<Path>) -> Result<Option<Value>> {
        let segments: Vec<Segment> = path.as_ref().segments().collect();
        if self.list_at(&segments, "pop")?.is_empty() {
            return Ok(None);
        }
        Ok(self.list_mut(&segments, "pop")?.pop())
    }

    /// Inserts into the list at `path` before `index`.
    ///
    /// `index` may equal the length, which appends.
    pub fn insert(
        &mut self,
        path: impl AsRef<Path>,
        index: usize,
        value: impl Into<Value>,
    ) -> Result<()> {
        let segments: Vec<Segment> = path.as_ref().segments().collect();
        let len = self.list_at(&segments, "insert")?.len();
        if index > len {
            return Err(DraftError::IndexOutOfBounds {
                operation: "insert",
                path: describe(&segments),
                index,
                len,
            }
            .into());
        }
        self.list_mut(&segments, "insert")?
            .insert(index, value.into());
        Ok(())
    }

    /// Removes `delete_count` items starting at `start` from the list at `path`
    /// and inserts `items` in their place, returning the removed items.
    ///
    /// `start` and `delete_count` are clamped to the list, so splicing past
    /// the end appends.
    pub fn splice<I, V>(
        &mut self,
        path: impl AsRef<Path>,
        start: usize,
        delete_count: usize,
        items: I,
    ) -> Result<Vec<Value>>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let segments: Vec<Segment> = path.as_ref().segments().collect();
        let len = self.list_at(&segments, "splice")?.len();
        let start = start.min(len);
        let end = start + delete_count.min(len - start);
        let inserted: Vec<Value> = items.into_iter().map(Into::into).collect();
        if start == end && inserted.is_empty() {
            return Ok(Vec::new());
        }
        let list = self.list_mut(&segments, "splice")?;
        Ok(list.splice(start..end, inserted).collect())
    }

    /// Shortens the list at `path` to `len` items.
    pub fn truncate(&mut self, path: impl AsRef<Path>, len: usize) -> Result<()> {
        let segments: Vec<Segment> = path.as_ref().segments().collect();
        if self.list_at(&segments, "truncate")?.len() <= len {
            return Ok(());
        }
        self.list_mut(&segments, "truncate")?.truncate(len);
        Ok(())
    }

    /// Keeps only the items of the list at `path` matching `predicate`,
    /// returning how many were removed.
    ///
    /// The predicate runs once per item, before anything is written.
    pub fn retain<F>(&mut self, path: impl AsRef<Path>, mut predicate: F) -> Result<usize>
    where
        F: FnMut(&Value) -> bool,
    {
        let segments: Vec<Segment> = path.as_ref().segments().collect();
        let keep: Vec<bool> = self
            .list_at(&segments, "retain")?
            .iter()
            .map(&mut predicate)
            .collect();
        let removed = keep.iter().filter(|kept| !**kept).count();
        if removed == 0 {
            return Ok(0);
        }
        let mut flags = keep.into_iter();
        self.list_mut(&segments, "retain")?
            .retain(|_| flags.next().unwrap_or(true));
        Ok(removed)
    }

    /// Edits the value at `path` in place.
    ///
    /// The node and its ancestors are copied before `f` runs, so this always
    /// counts as a write. Nested maps and lists reached through the `&mut
    /// Value` copy themselves on their first write.
    ///
    /// ```
    /// # use showstate::{draft::produce, value::{Map, Value}};
    /// let base: Value = Map::new().with("playback", Map::new().with("currentTime", 1.0)).into();
    /// let (next, _) = produce(&base, |draft| {
    ///     draft.modify("playback", |playback| {
    ///         if let Value::Map(map) = playback {
    ///             map.insert("currentTime", 2.5);
    ///             map.insert("isPlaying", true);
    ///         }
    ///     })
    /// })?;
    /// assert_eq!(next.get("playback.isPlaying"), Some(&Value::Bool(true)));
    /// # Ok::<(), showstate::Error>(())
    /// ```
    pub fn modify<R, F>(&mut self, path: impl AsRef<Path>, f: F) -> Result<R>
    where
        F: FnOnce(&mut Value) -> R,
    {
        let segments: Vec<Segment> = path.as_ref().segments().collect();
        if self.root.get_segments(&segments).is_none() {
            return Err(DraftError::NotFound {
                operation: "modify",
                path: describe(&segments),
            }
            .into());
        }
        self.record_write("modify", &segments);
        let node = node_mut(&mut self.root, &segments, "modify")?;
        Ok(f(node))
    }

    /// Consumes the draft, returning the base itself when nothing was written.
    pub(crate) fn finish(self) -> Value {
        if self.writes == 0 {
            self.base
        } else {
            self.root
        }
    }

    fn record_write(&mut self, operation: &'static str, segments: &[Segment]) {
        self.writes += 1;
        tracing::trace!(operation, path = %describe(segments), "Draft write");
    }

    fn list_at(&self, segments: &[Segment], operation: &'static str) -> Result<&List> {
        match self.root.get_segments(segments) {
            Some(Value::List(list)) => Ok(list),
            Some(other) => Err(DraftError::TypeMismatch {
                operation,
                path: describe(segments),
                expected: "list",
                actual: other.type_name(),
            }
            .into()),
            None => Err(DraftError::NotFound {
                operation,
                path: describe(segments),
            }
            .into()),
        }
    }

    /// Copies the path down to the list at `segments` and returns its items.
    ///
    /// Callers check the list with `list_at` first and only come here when
    /// they are about to change it.
    fn list_mut(&mut self, segments: &[Segment], operation: &'static str) -> Result<&mut Vec<Value>> {
        self.record_write(operation, segments);
        match node_mut(&mut self.root, segments, operation)? {
            Value::List(list) => Ok(list.items_mut()),
            other => Err(DraftError::TypeMismatch {
                operation,
                path: describe(segments),
                expected: "list",
                actual: other.type_name(),
            }
            .into()),
        }
    }
}

/// Renders segments as a normalized dotted path for messages.
fn describe(segments: &[Segment]) -> String {
    if segments.is_empty() {
        return "(root)".to_string();
    }
    segments
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

/// Checks that `set` can write at `segments` without touching the tree.
///
/// Returns the value currently stored there, if any.
fn check_settable<'a>(
    root: &'a Value,
    segments: &[Segment],
) -> std::result::Result<Option<&'a Value>, DraftError> {
    let mut current = Some(root);
    for (depth, segment) in segments.iter().enumerate() {
        let is_last = depth + 1 == segments.len();
        current = match current {
            // Will be created as an empty map
            None | Some(Value::Null) => None,
            Some(Value::Map(map)) => map.get(&segment.as_key()),
            Some(Value::List(list)) => {
                let Some(index) = segment.as_index() else {
                    return Err(DraftError::TypeMismatch {
                        operation: "set",
                        path: describe(&segments[..depth]),
                        expected: "map",
                        actual: "list",
                    });
                };
                match list.get(index) {
                    Some(item) => Some(item),
                    None if is_last && index == list.len() => None,
                    None => {
                        return Err(DraftError::IndexOutOfBounds {
                            operation: "set",
                            path: describe(&segments[..depth]),
                            index,
                            len: list.len(),
                        });
                    }
                }
            }
            Some(other) => {
                return Err(DraftError::TypeMismatch {
                    operation: "set",
                    path: describe(&segments[..depth]),
                    expected: "map or list",
                    actual: other.type_name(),
                });
            }
        };
    }
    Ok(current)
}

/// Walks to the parent of a `set` target, copying shared nodes and creating
/// missing maps on the way. The path must have passed `check_settable`.
fn parent_for_set<'a>(
    root: &'a mut Value,
    segments: &[Segment],
) -> std::result::Result<&'a mut Value, DraftError> {
    let mut current = root;
    for (depth, segment) in segments.iter().enumerate() {
        if current.is_null() {
            *current = Value::Map(Map::new());
        }
        current = match current {
            Value::Map(map) => Some(
                map.entries_mut()
                    .entry(segment.as_key().into_owned())
                    .or_insert(Value::Null),
            ),
            Value::List(list) => match segment.as_index() {
                Some(index) => list.items_mut().get_mut(index),
                None => None,
            },
            _ => None,
        }
        .ok_or_else(|| DraftError::NotFound {
            operation: "set",
            path: describe(&segments[..=depth]),
        })?;
    }
    if current.is_null() {
        *current = Value::Map(Map::new());
    }
    Ok(current)
}

/// Walks to an existing node, copying every shared node on the way.
fn node_mut<'a>(
    root: &'a mut Value,
    segments: &[Segment],
    operation: &'static str,
) -> std::result::Result<&'a mut Value, DraftError> {
    let mut current = root;
    for (depth, segment) in segments.iter().enumerate() {
        current = match current {
            Value::Map(map) => map.get_mut(&segment.as_key()),
            Value::List(list) => match segment.as_index() {
                Some(index) => list.items_mut().get_mut(index),
                None => None,
            },
            _ => None,
        }
        .ok_or_else(|| DraftError::NotFound {
            operation,
            path: describe(&segments[..=depth]),
        })?;
    }
    Ok(current)
}
