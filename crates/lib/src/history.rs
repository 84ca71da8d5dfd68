//! Bounded linear undo/redo over whole-tree snapshots.
//!
//! Every entry is a complete tree. Because trees share every branch an edit
//! did not touch, a snapshot costs one reference plus the handful of nodes
//! the edit copied, so storing whole trees stays cheap.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Counts and availability of undo/redo, for UI state such as button enablement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HistoryInfo {
    pub undo_count: usize,
    pub redo_count: usize,
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Two stacks of snapshots: older trees to undo to and undone trees to redo to.
///
/// Both stacks keep their newest entry at the back. The undo stack never
/// holds more than `max_depth` entries; when full the oldest one is dropped.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<Value>,
    redo_stack: VecDeque<Value>,
    max_depth: usize,
}

impl History {
    /// Creates an empty history holding at most `max_depth` undo entries.
    ///
    /// A depth of zero disables recording.
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_depth,
        }
    }

    /// Records the tree that is about to be replaced by a tracked edit.
    ///
    /// Any new edit forks the timeline, so the redo stack is cleared.
    pub fn push(&mut self, previous: Value) {
        self.redo_stack.clear();
        if self.max_depth == 0 {
            return;
        }
        Self::push_bounded(&mut self.undo_stack, previous, self.max_depth);
    }

    /// Steps back: returns the newest undo snapshot and remembers `current`
    /// for redo. Returns `None` when there is nothing to undo.
    pub fn undo(&mut self, current: Value) -> Option<Value> {
        let previous = self.undo_stack.pop_back()?;
        Self::push_bounded(&mut self.redo_stack, current, self.max_depth);
        Some(previous)
    }

    /// Steps forward again after an undo.
    pub fn redo(&mut self, current: Value) -> Option<Value> {
        let next = self.redo_stack.pop_back()?;
        Self::push_bounded(&mut self.undo_stack, current, self.max_depth);
        Some(next)
    }

    /// Drops every snapshot on both stacks.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn info(&self) -> HistoryInfo {
        HistoryInfo {
            undo_count: self.undo_stack.len(),
            redo_count: self.redo_stack.len(),
            can_undo: !self.undo_stack.is_empty(),
            can_redo: !self.redo_stack.is_empty(),
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Changes the depth limit, dropping the oldest entries that no longer fit.
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth;
        let evicted = Self::trim(&mut self.undo_stack, max_depth);
        // The front of the redo stack is the furthest step forward
        let evicted_redo = Self::trim(&mut self.redo_stack, max_depth);
        if evicted + evicted_redo > 0 {
            tracing::debug!(
                max_depth,
                evicted,
                evicted_redo,
                "History shrunk to new depth"
            );
        }
    }

    fn push_bounded(stack: &mut VecDeque<Value>, value: Value, max_depth: usize) {
        if max_depth == 0 {
            return;
        }
        if stack.len() >= max_depth {
            stack.pop_front();
            tracing::debug!(max_depth, "Evicted oldest history entry");
        }
        stack.push_back(value);
    }

    fn trim(stack: &mut VecDeque<Value>, max_depth: usize) -> usize {
        let excess = stack.len().saturating_sub(max_depth);
        for _ in 0..excess {
            stack.pop_front();
        }
        excess
    }
}
