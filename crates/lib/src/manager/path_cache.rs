//! Parsed-path cache.
//!
//! Callers address the tree with a small, fixed set of literal paths, so each
//! distinct string is parsed once and its segments reused afterwards.

use std::{collections::HashMap, sync::Arc};

use crate::path::{Path, Segment};

#[derive(Debug)]
pub(crate) struct PathCache {
    entries: HashMap<String, Arc<[Segment]>>,
    capacity: usize,
}

impl PathCache {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity,
        }
    }

    /// Returns the segments of `path`, parsing it on a miss.
    pub(crate) fn segments(&mut self, path: &Path) -> Arc<[Segment]> {
        if let Some(segments) = self.entries.get(path.as_str()) {
            tracing::trace!(path = %path, "Path cache hit");
            return Arc::clone(segments);
        }

        let segments: Arc<[Segment]> = path.segments().collect();
        if self.capacity == 0 {
            return segments;
        }
        if self.entries.len() >= self.capacity {
            tracing::debug!(capacity = self.capacity, "Path cache full, clearing");
            self.entries.clear();
        }
        tracing::trace!(path = %path, "Path cache miss");
        self.entries
            .insert(path.as_str().to_string(), Arc::clone(&segments));
        segments
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
