//! Path types for addressing nodes inside the state tree.
//!
//! Paths are dotted strings (`"project.settings.profiles"`). The [`Path`]/[`PathBuf`] pair
//! follows the same borrowed/owned pattern as `std::path::Path`/`PathBuf`, and a path is
//! resolved through its typed [`Segment`]s: a canonical decimal component indexes a list,
//! anything else is a map key.
//!
//! # Usage
//!
//! ```rust
//! use showstate::path::{PathBuf, Segment};
//! use std::str::FromStr;
//!
//! // Parsing drops empty components
//! let path = PathBuf::from_str("project..tracks.")?;
//! assert_eq!(path.as_str(), "project.tracks");
//!
//! // Or append one component at a time
//! let path = PathBuf::new().push("project").push("tracks").push_index(2);
//! assert_eq!(path.as_str(), "project.tracks.2");
//!
//! let segments: Vec<Segment> = path.segments().collect();
//! assert_eq!(segments[2], Segment::Index(2));
//! # Ok::<(), std::convert::Infallible>(())
//! ```

use std::{borrow::Borrow, borrow::Cow, fmt, ops::Deref, str::FromStr};

/// Collapses stray dots so that equivalent paths compare equal.
///
/// - Empty string "" → empty string (refers to the root of the tree)
/// - Leading dots ".ui" → "ui"
/// - Trailing dots "ui." → "ui"
/// - Consecutive dots "ui..zoom" → "ui.zoom"
/// - Only dots "..." → empty string
///
/// # Examples
///
/// ```rust
/// # use showstate::path::normalize_path;
/// assert_eq!(normalize_path(""), "");
/// assert_eq!(normalize_path(".ui"), "ui");
/// assert_eq!(normalize_path("ui."), "ui");
/// assert_eq!(normalize_path("ui..zoom"), "ui.zoom");
/// assert_eq!(normalize_path("..."), "");
/// ```
pub fn normalize_path(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    input
        .split('.')
        .filter(|component| !component.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

/// Parses a path string into its typed segments.
///
/// Empty components are skipped, so the result is the same for a path and its
/// normalized form.
pub fn parse_segments(input: &str) -> Vec<Segment> {
    input
        .split('.')
        .filter(|component| !component.is_empty())
        .map(Segment::parse)
        .collect()
}

/// One typed step of a path traversal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A map member.
    Key(String),
    /// A list position. Against a map the decimal form is used as the key.
    Index(usize),
}

impl Segment {
    /// Parses a single path component.
    ///
    /// Only canonical decimal numbers (`"0"`, `"12"`, never `"012"` or `"+1"`) become
    /// [`Segment::Index`].
    pub fn parse(component: &str) -> Self {
        let canonical = match component.as_bytes() {
            [] => false,
            [b'0'] => true,
            [first, rest @ ..] => {
                (b'1'..=b'9').contains(first) && rest.iter().all(u8::is_ascii_digit)
            }
        };
        if canonical {
            if let Ok(index) = component.parse::<usize>() {
                return Segment::Index(index);
            }
        }
        Segment::Key(component.to_string())
    }

    /// Returns the segment as a map key.
    pub fn as_key(&self) -> Cow<'_, str> {
        match self {
            Segment::Key(key) => Cow::Borrowed(key),
            Segment::Index(index) => Cow::Owned(index.to_string()),
        }
    }

    /// Returns the list index, if this segment is numeric.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Segment::Index(index) => Some(*index),
            Segment::Key(_) => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => write!(f, "{key}"),
            Segment::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for Segment {
    fn from(component: &str) -> Self {
        Segment::parse(component)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index)
    }
}

/// An owned path into the state tree.
///
/// ```rust
/// # use showstate::path::PathBuf;
/// let path = PathBuf::new().push("ui").push("zoom");
/// let components: Vec<&str> = path.components().collect();
/// assert_eq!(components, vec!["ui", "zoom"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PathBuf {
    inner: String,
}

/// A borrowed path into the state tree.
///
/// Borrowed form of [`PathBuf`], the way `&str` is to `String`. Any string
/// is a valid path: empty components are ignored during traversal.
///
/// Unsized; only ever seen as `&Path`.
#[derive(Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Path {
    inner: str,
}

impl PathBuf {
    /// Creates a new empty path (the root of the tree).
    pub fn new() -> Self {
        Self {
            inner: String::new(),
        }
    }

    /// Adds a path to the end of this path, normalizing the input.
    ///
    /// ```rust
    /// # use showstate::path::PathBuf;
    /// let path = PathBuf::new().push("project").push("settings.profiles");
    /// assert_eq!(path.as_str(), "project.settings.profiles");
    /// ```
    pub fn push(mut self, path: impl AsRef<str>) -> Self {
        let normalized = normalize_path(path.as_ref());
        if normalized.is_empty() {
            return self;
        }

        if !self.inner.is_empty() {
            self.inner.push('.');
        }
        self.inner.push_str(&normalized);
        self
    }

    /// Adds a list index to the end of this path.
    pub fn push_index(mut self, index: usize) -> Self {
        if !self.inner.is_empty() {
            self.inner.push('.');
        }
        self.inner.push_str(&index.to_string());
        self
    }

    /// Appends every component of `other`.
    pub fn join(mut self, other: impl AsRef<Path>) -> Self {
        let other = other.as_ref();
        if other.is_empty() {
            return self;
        }
        if !self.inner.is_empty() {
            self.inner.push('.');
        }
        self.inner.push_str(&normalize_path(other.as_str()));
        self
    }

    /// Builds a normalized path from any string.
    pub fn normalize(path: &str) -> Self {
        Self {
            inner: normalize_path(path),
        }
    }
}

impl Path {
    /// Wraps a string slice as a path.
    pub fn new(s: &str) -> &Path {
        // SAFETY: Path is #[repr(transparent)] over str
        unsafe { &*(s as *const str as *const Path) }
    }

    /// Iterates over the non-empty components.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.inner.split('.').filter(|s| !s.is_empty())
    }

    /// Returns an iterator over the typed segments of this path.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.components().map(Segment::parse)
    }

    /// Number of non-empty components.
    pub fn len(&self) -> usize {
        self.components().count()
    }

    /// Returns `true` if the path has no components (it addresses the root).
    pub fn is_empty(&self) -> bool {
        self.components().next().is_none()
    }

    /// Returns the last component of the path, or `None` for the root.
    pub fn last(&self) -> Option<&str> {
        self.components().last()
    }

    /// Returns the parent path, or `None` for the root.
    pub fn parent(&self) -> Option<PathBuf> {
        if self.is_empty() {
            return None;
        }
        let count = self.len();
        let parent = self
            .components()
            .take(count - 1)
            .collect::<Vec<_>>()
            .join(".");
        Some(PathBuf { inner: parent })
    }

    /// Returns `true` if `self` equals `other` or lies underneath it.
    pub fn starts_with(&self, other: impl AsRef<Path>) -> bool {
        let mut mine = self.components();
        other
            .as_ref()
            .components()
            .all(|component| mine.next() == Some(component))
    }

    /// The underlying string, as given.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Converts this `Path` to an owned, normalized `PathBuf`.
    pub fn to_path_buf(&self) -> PathBuf {
        PathBuf::normalize(&self.inner)
    }
}

impl Deref for PathBuf {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        Path::new(&self.inner)
    }
}

impl AsRef<Path> for PathBuf {
    fn as_ref(&self) -> &Path {
        self
    }
}

impl AsRef<Path> for Path {
    fn as_ref(&self) -> &Path {
        self
    }
}

impl AsRef<Path> for str {
    fn as_ref(&self) -> &Path {
        Path::new(self)
    }
}

impl AsRef<Path> for String {
    fn as_ref(&self) -> &Path {
        Path::new(self)
    }
}

impl AsRef<str> for Path {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl AsRef<str> for PathBuf {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl Borrow<Path> for PathBuf {
    fn borrow(&self) -> &Path {
        self
    }
}

impl ToOwned for Path {
    type Owned = PathBuf;

    fn to_owned(&self) -> PathBuf {
        self.to_path_buf()
    }
}

impl FromStr for PathBuf {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::normalize(s))
    }
}

impl From<&str> for PathBuf {
    fn from(s: &str) -> Self {
        Self::normalize(s)
    }
}

impl fmt::Display for PathBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.deref(), f)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "(root)")
        } else {
            write!(f, "{}", &self.inner)
        }
    }
}

/// Constructs a path.
///
/// - `path!()` - Root path (PathBuf)
/// - `path!("ui.zoom")` - Single literal (&'static Path, no allocation)
/// - `path!("project", "tracks", index)` - Multiple components (PathBuf)
///
/// # Examples
///
/// ```rust
/// # use showstate::path;
/// let zoom = path!("ui.zoom");
/// assert_eq!(zoom.len(), 2);
///
/// let index = 3;
/// let clip = path!("project", "tracks", index, "name");
/// assert_eq!(clip.as_str(), "project.tracks.3.name");
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::path::PathBuf::new()
    };

    ($single:literal) => {
        $crate::path::Path::new($single)
    };

    ($first:expr $(, $rest:expr)* $(,)?) => {{
        let path = $crate::path::PathBuf::new().push($first.to_string());
        $(
            let path = path.push($rest.to_string());
        )*
        path
    }};
}
