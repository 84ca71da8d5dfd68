//! The state tree.
//!
//! A [`Value`] is either a scalar, an opaque host [`Handle`], or a composite
//! node ([`Map`] or [`List`]) whose children are themselves values. Composite
//! nodes are reference-counted: cloning a tree is O(1) and two trees produced
//! from one another share every branch neither of them wrote to.
//!
//! # Equality
//!
//! Two notions of equality are used:
//!
//! - [`PartialEq`] is deep structural equality, useful in tests and for
//!   comparing trees restored by undo/redo.
//! - [`Value::same`] is change detection: composites and handles are compared
//!   by identity, scalars by value (with `NaN` equal to itself). This is what
//!   subscriptions and the draft use to decide whether anything changed.

use std::{fmt, sync::Arc};

use crate::path::{Path, Segment};

pub mod errors;
pub mod handle;
mod json;
pub mod list;
pub mod map;

pub use errors::ValueError;
pub use handle::Handle;
pub use list::List;
pub use map::Map;

/// Any node of the state tree.
///
/// ```
/// # use showstate::value::{List, Map, Value};
/// let tree: Value = Map::new()
///     .with("ui", Map::new().with("zoom", 100))
///     .with("selection", List::new().with("clip-1"))
///     .into();
///
/// assert_eq!(tree.get("ui.zoom"), Some(&Value::Int(100)));
/// assert_eq!(tree.get("selection.0").and_then(Value::as_text), Some("clip-1"));
/// assert!(tree.get("ui.missing.deeper").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    // Leaf values
    /// Null/empty value
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Text string value
    Text(Arc<str>),

    // Branch values
    /// Insertion-ordered map
    Map(Map),
    /// Ordered sequence
    List(List),

    /// Opaque host object, compared by identity
    Handle(Handle),
}

impl Value {
    /// Returns true if this is a leaf value (scalar or handle)
    pub fn is_leaf(&self) -> bool {
        !self.is_composite()
    }

    /// Returns true if this is a map or a list
    pub fn is_composite(&self) -> bool {
        matches!(self, Value::Map(_) | Value::List(_))
    }

    /// Returns true if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Map(_) => "map",
            Value::List(_) => "list",
            Value::Handle(_) => "handle",
        }
    }

    /// Attempts to convert to a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to convert to an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to convert to a float. Integers are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Attempts to convert to a string slice
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to convert to a map
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Attempts to convert to a list
    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Attempts to convert to a host handle
    pub fn as_handle(&self) -> Option<&Handle> {
        match self {
            Value::Handle(handle) => Some(handle),
            _ => None,
        }
    }

    /// Change detection between two values.
    ///
    /// Maps, lists and handles are the same only if they are the same node.
    /// Scalars are compared by value; `NaN` is the same as `NaN`.
    ///
    /// ```
    /// # use showstate::value::{Map, Value};
    /// let a: Value = Map::new().with("zoom", 1).into();
    /// let b: Value = Map::new().with("zoom", 1).into();
    /// assert!(Value::same(&a, &a.clone()));
    /// assert!(!Value::same(&a, &b));
    /// assert_eq!(a, b);
    ///
    /// assert!(Value::same(&Value::Float(f64::NAN), &Value::Float(f64::NAN)));
    /// ```
    pub fn same(a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Map(x), Value::Map(y)) => x.ptr_eq(y),
            (Value::List(x), Value::List(y)) => x.ptr_eq(y),
            _ => a == b,
        }
    }

    /// [`Value::same`] over optional values; two absent values are the same.
    pub fn same_opt(a: Option<&Value>, b: Option<&Value>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => Value::same(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Resolves a dotted path below this value.
    ///
    /// Returns `None` as soon as a segment is missing, indexes past the end of
    /// a list, or tries to descend into a scalar or handle.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&Value> {
        let mut current = self;
        for segment in path.as_ref().segments() {
            current = current.child(&segment)?;
        }
        Some(current)
    }

    /// Resolves pre-parsed segments below this value.
    pub fn get_segments(&self, segments: &[Segment]) -> Option<&Value> {
        segments
            .iter()
            .try_fold(self, |current, segment| current.child(segment))
    }

    /// Resolves a path and converts the result with `TryFrom`.
    ///
    /// ```
    /// # use showstate::value::{Map, Value};
    /// let tree: Value = Map::new().with("name", "Show").into();
    /// assert_eq!(tree.get_as::<String>("name"), Some("Show".to_string()));
    /// assert_eq!(tree.get_as::<i64>("name"), None);
    /// ```
    pub fn get_as<'a, T>(&'a self, path: impl AsRef<Path>) -> Option<T>
    where
        T: TryFrom<&'a Value, Error = ValueError>,
    {
        T::try_from(self.get(path)?).ok()
    }

    /// Returns the direct child addressed by one segment.
    pub fn child(&self, segment: &Segment) -> Option<&Value> {
        match self {
            Value::Map(map) => map.get(&segment.as_key()),
            Value::List(list) => list.get(segment.as_index()?),
            _ => None,
        }
    }
}

fn float_eq(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => float_eq(*a, *b),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Handle(a), Value::Handle(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Map(map) => write!(f, "{map}"),
            Value::List(list) => write!(f, "{list}"),
            Value::Handle(handle) => write!(f, "{handle}"),
        }
    }
}

// Convenient From implementations for common types
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        // Clamp rather than wrap for absurdly large sizes
        Value::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value as f64)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value.into())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.into())
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Value::Map(value)
    }
}

impl From<List> for Value {
    fn from(value: List) -> Self {
        Value::List(value)
    }
}

impl From<Handle> for Value {
    fn from(value: Handle) -> Self {
        Value::Handle(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::List(value.into_iter().collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<&Value> for Value {
    fn from(value: &Value) -> Self {
        value.clone()
    }
}

fn mismatch(expected: &'static str, value: &Value) -> ValueError {
    ValueError::TypeMismatch {
        expected,
        actual: value.type_name(),
    }
}

impl TryFrom<&Value> for String {
    type Error = ValueError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value
            .as_text()
            .map(str::to_string)
            .ok_or_else(|| mismatch("text", value))
    }
}

impl<'a> TryFrom<&'a Value> for &'a str {
    type Error = ValueError;

    fn try_from(value: &'a Value) -> Result<Self, Self::Error> {
        value.as_text().ok_or_else(|| mismatch("text", value))
    }
}

impl TryFrom<&Value> for i64 {
    type Error = ValueError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_int().ok_or_else(|| mismatch("int", value))
    }
}

impl TryFrom<&Value> for f64 {
    type Error = ValueError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_float().ok_or_else(|| mismatch("float", value))
    }
}

impl TryFrom<&Value> for bool {
    type Error = ValueError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_bool().ok_or_else(|| mismatch("bool", value))
    }
}

impl TryFrom<&Value> for Map {
    type Error = ValueError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_map().cloned().ok_or_else(|| mismatch("map", value))
    }
}

impl TryFrom<&Value> for List {
    type Error = ValueError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value
            .as_list()
            .cloned()
            .ok_or_else(|| mismatch("list", value))
    }
}

impl TryFrom<&Value> for Handle {
    type Error = ValueError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value
            .as_handle()
            .cloned()
            .ok_or_else(|| mismatch("handle", value))
    }
}

// PartialEq implementations for comparing Value with primitives
impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_text() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        self.as_int() == Some(*other)
    }
}

impl PartialEq<i32> for Value {
    fn eq(&self, other: &i32) -> bool {
        self.as_int() == Some(*other as i64)
    }
}

impl PartialEq<f64> for Value {
    fn eq(&self, other: &f64) -> bool {
        matches!(self, Value::Float(n) if float_eq(*n, *other))
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}
