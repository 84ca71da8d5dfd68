//! The application-wide store.
//!
//! [`StateManager`] owns the live tree and composes the other pieces: every
//! mutation runs through [`draft::produce`](crate::draft::produce), tracked
//! commits push the replaced tree onto the [`History`], and committed changes
//! are diffed for the subscription registry.
//!
//! A store is a plain value. Construct one when the application starts, share
//! it by reference (`&StateManager` or `Rc<StateManager>`) with whatever needs
//! it, and call [`teardown`](StateManager::teardown) when it is done.
//!
//! The store is single-threaded: it uses `RefCell`/`Cell` internally and is
//! neither `Send` nor `Sync`. The trees it hands out are immutable snapshots
//! and can be sent anywhere.
//!
//! # Commit sequence
//!
//! 1. Refuse the call if another mutation of this store is in progress.
//! 2. Run the mutator against a draft of the live tree. An error discards the
//!    draft; nothing else happens.
//! 3. If the next tree is the live tree, stop: no history, no notification.
//! 4. Push the live tree onto the undo stack (unless `skip_history`).
//! 5. Install the next tree.
//! 6. Leave the mutation, then notify (unless `skip_notify`). Subscribers may
//!    read the store and may start follow-up updates of their own.

pub mod config;
pub mod errors;
mod path_cache;

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

pub use config::{DEFAULT_MAX_HISTORY, DEFAULT_PATH_CACHE_CAPACITY, StoreConfig, UpdateOptions};
pub use errors::MutationError;
use path_cache::PathCache;

use crate::{
    Result,
    draft::{self, Draft},
    history::{History, HistoryInfo},
    path::Path,
    subscription::{Registry, Subscription, Watch},
    value::{Value, ValueError},
};

/// A single mutable store over a value tree, with undo/redo and change listeners.
///
/// ```
/// use showstate::{StateManager, UpdateOptions, value::Map};
///
/// let store = StateManager::new(
///     Map::new()
///         .with("ui", Map::new().with("zoom", 100))
///         .with("playback", Map::new().with("currentTime", 0.0)),
/// );
///
/// store.set("ui.zoom", 80)?;
/// // Transient state stays out of undo history
/// store.set_with("playback.currentTime", 1.25, UpdateOptions::skip_history())?;
///
/// assert_eq!(store.history_info().undo_count, 1);
/// store.undo()?;
/// assert_eq!(store.get_as::<i64>("ui.zoom"), Some(100));
/// # Ok::<(), showstate::Error>(())
/// ```
pub struct StateManager {
    state: RefCell<Value>,
    history: RefCell<History>,
    subscriptions: Rc<RefCell<Registry>>,
    paths: RefCell<PathCache>,
    config: RefCell<StoreConfig>,
    /// The mutation currently running, if any
    active: Cell<Option<&'static str>>,
}

/// Marks the store as mutating until dropped, including on unwind.
struct MutationGuard<'a> {
    active: &'a Cell<Option<&'static str>>,
}

impl Drop for MutationGuard<'_> {
    fn drop(&mut self) {
        self.active.set(None);
    }
}

impl StateManager {
    /// Creates a store over `initial` with the default configuration.
    pub fn new(initial: impl Into<Value>) -> Self {
        Self::with_config(initial, StoreConfig::default())
    }

    /// Creates a store over `initial` with the given configuration.
    pub fn with_config(initial: impl Into<Value>, config: StoreConfig) -> Self {
        tracing::debug!(
            max_history = config.max_history,
            path_cache_capacity = config.path_cache_capacity,
            "Creating state manager"
        );
        Self {
            state: RefCell::new(initial.into()),
            history: RefCell::new(History::new(config.max_history)),
            subscriptions: Rc::new(RefCell::new(Registry::default())),
            paths: RefCell::new(PathCache::new(config.path_cache_capacity)),
            config: RefCell::new(config),
            active: Cell::new(None),
        }
    }

    /// Returns the live tree.
    ///
    /// The snapshot is immutable: later commits install new trees and never
    /// change this one.
    pub fn state(&self) -> Value {
        self.state.borrow().clone()
    }

    /// Reads the value at `path`, or `None` if the path does not resolve.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<Value> {
        let segments = self.paths.borrow_mut().segments(path.as_ref());
        self.state.borrow().get_segments(&segments).cloned()
    }

    /// Reads the value at `path` converted with `TryFrom`.
    ///
    /// Returns `None` when the path does not resolve or the value has another type.
    pub fn get_as<T>(&self, path: impl AsRef<Path>) -> Option<T>
    where
        T: for<'a> TryFrom<&'a Value, Error = ValueError>,
    {
        let value = self.get(path)?;
        T::try_from(&value).ok()
    }

    /// Applies `selector` to the live tree.
    ///
    /// ```
    /// # use showstate::{StateManager, value::{List, Map}};
    /// let store = StateManager::new(Map::new().with("tracks", List::new().with("a").with("b")));
    /// let count = store.select(|tree| tree.get("tracks").and_then(|t| t.as_list()).map_or(0, |t| t.len()));
    /// assert_eq!(count, 2);
    /// ```
    pub fn select<T>(&self, selector: impl FnOnce(&Value) -> T) -> T {
        let tree = self.state();
        selector(&tree)
    }

    /// Assigns `value` at `path` as a tracked, notified update.
    ///
    /// Missing intermediate maps are created. Returns whether the tree changed.
    pub fn set(&self, path: impl AsRef<Path>, value: impl Into<Value>) -> Result<bool> {
        self.set_with(path, value, UpdateOptions::default())
    }

    /// [`set`](Self::set) with explicit update options.
    pub fn set_with(
        &self,
        path: impl AsRef<Path>,
        value: impl Into<Value>,
        options: UpdateOptions,
    ) -> Result<bool> {
        let segments = self.paths.borrow_mut().segments(path.as_ref());
        let value = value.into();
        self.update_with(options, |draft| {
            draft.set_segments(&segments, value)?;
            Ok(())
        })
    }

    /// Removes the value at `path` as a tracked, notified update.
    pub fn remove(&self, path: impl AsRef<Path>) -> Result<bool> {
        self.remove_with(path, UpdateOptions::default())
    }

    /// [`remove`](Self::remove) with explicit update options.
    pub fn remove_with(&self, path: impl AsRef<Path>, options: UpdateOptions) -> Result<bool> {
        let segments = self.paths.borrow_mut().segments(path.as_ref());
        self.update_with(options, |draft| {
            draft.remove_segments(&segments)?;
            Ok(())
        })
    }

    /// Runs `mutator` against a draft of the live tree and commits the result.
    ///
    /// Returns `Ok(false)` when the mutator changed nothing; the history and
    /// the subscribers are then left alone.
    ///
    /// # Errors
    ///
    /// - [`MutationError::Reentrant`] if called while another mutation of this
    ///   store is running, including from inside `mutator`.
    /// - [`MutationError::Failed`] wrapping whatever `mutator` returned. The
    ///   live tree is unchanged.
    pub fn update<F>(&self, mutator: F) -> Result<bool>
    where
        F: FnOnce(&mut Draft) -> Result<()>,
    {
        self.update_with(UpdateOptions::default(), mutator)
    }

    /// [`update`](Self::update) with explicit update options.
    pub fn update_with<F>(&self, options: UpdateOptions, mutator: F) -> Result<bool>
    where
        F: FnOnce(&mut Draft) -> Result<()>,
    {
        let guard = self.enter("update")?;
        let prev = self.state();

        let next = match draft::produce(&prev, mutator) {
            Ok((next, ())) => next,
            // Surface the nested call's error as it was raised
            Err(err) if err.is_reentrant() => return Err(err),
            Err(err) => {
                tracing::warn!(error = %err, "Update failed; state unchanged");
                return Err(MutationError::Failed {
                    source: Box::new(err),
                }
                .into());
            }
        };

        if Value::same(&next, &prev) {
            tracing::debug!("No-op update");
            return Ok(false);
        }

        if !options.skip_history {
            self.history.borrow_mut().push(prev.clone());
        }
        *self.state.borrow_mut() = next.clone();
        let info = self.history.borrow().info();
        tracing::debug!(
            skip_history = options.skip_history,
            skip_notify = options.skip_notify,
            undo_count = info.undo_count,
            redo_count = info.redo_count,
            "Committed update"
        );
        drop(guard);

        if !options.skip_notify {
            self.notify(&prev, &next);
        }
        Ok(true)
    }

    /// Steps back to the tree before the last recorded edit.
    ///
    /// Returns `Ok(false)` when there is nothing to undo. A successful undo
    /// always notifies subscribers.
    pub fn undo(&self) -> Result<bool> {
        let guard = self.enter("undo")?;
        let current = self.state();
        let Some(previous) = self.history.borrow_mut().undo(current.clone()) else {
            tracing::debug!("Nothing to undo");
            return Ok(false);
        };
        *self.state.borrow_mut() = previous.clone();
        tracing::debug!(history = ?self.history.borrow().info(), "Undo");
        drop(guard);

        self.notify(&current, &previous);
        Ok(true)
    }

    /// Re-applies the last undone edit.
    ///
    /// Returns `Ok(false)` when there is nothing to redo. A successful redo
    /// always notifies subscribers.
    pub fn redo(&self) -> Result<bool> {
        let guard = self.enter("redo")?;
        let current = self.state();
        let Some(next) = self.history.borrow_mut().redo(current.clone()) else {
            tracing::debug!("Nothing to redo");
            return Ok(false);
        };
        *self.state.borrow_mut() = next.clone();
        tracing::debug!(history = ?self.history.borrow().info(), "Redo");
        drop(guard);

        self.notify(&current, &next);
        Ok(true)
    }

    pub fn history_info(&self) -> HistoryInfo {
        self.history.borrow().info()
    }

    /// Drops all undo and redo entries. The live tree is kept.
    pub fn clear_history(&self) {
        self.history.borrow_mut().clear();
        tracing::debug!("Cleared history");
    }

    /// Replaces the whole tree and starts a fresh history, as for a new project.
    ///
    /// Subscribers are notified of the replacement.
    pub fn reset(&self, tree: impl Into<Value>) -> Result<()> {
        let guard = self.enter("reset")?;
        let next = tree.into();
        let prev = self.state.replace(next.clone());
        self.history.borrow_mut().clear();
        tracing::debug!("Reset state");
        drop(guard);

        self.notify(&prev, &next);
        Ok(())
    }

    /// Disposes every subscription and clears the history.
    ///
    /// Outstanding [`Subscription`] guards become inert. The live tree stays
    /// readable.
    pub fn teardown(&self) {
        let disposed = self.subscriptions.borrow_mut().clear();
        self.history.borrow_mut().clear();
        tracing::debug!(disposed, "Tore down state manager");
    }

    /// Listens to every notified commit with the whole next tree.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Value) + 'static,
    {
        let id = self.subscriptions.borrow_mut().add_global(Rc::new(callback));
        Subscription::new(&self.subscriptions, id)
    }

    /// Listens to changes of the node at `path`.
    ///
    /// `callback` receives the node in the next and the previous tree; either
    /// is `None` where the path does not resolve. A change anywhere below the
    /// node counts.
    ///
    /// ```
    /// # use std::{cell::Cell, rc::Rc};
    /// # use showstate::{StateManager, value::Map};
    /// let store = StateManager::new(Map::new().with("ui", Map::new().with("zoom", 100)));
    /// let zoom = Rc::new(Cell::new(0));
    /// let seen = Rc::clone(&zoom);
    /// let _sub = store.subscribe_to("ui.zoom", move |next, _prev| {
    ///     seen.set(next.and_then(|v| v.as_int()).unwrap_or_default());
    /// });
    ///
    /// store.set("ui.zoom", 77)?;
    /// assert_eq!(zoom.get(), 77);
    /// # Ok::<(), showstate::Error>(())
    /// ```
    pub fn subscribe_to<F>(&self, path: impl AsRef<Path>, callback: F) -> Subscription
    where
        F: Fn(Option<&Value>, Option<&Value>) + 'static,
    {
        let path = path.as_ref();
        let segments = self.paths.borrow_mut().segments(path);
        let id = self.subscriptions.borrow_mut().add_scoped(
            path.to_string(),
            Watch::Path(segments),
            Rc::new(callback),
        );
        Subscription::new(&self.subscriptions, id)
    }

    /// Listens to changes of whatever `selector` picks out of the tree.
    ///
    /// The selector runs against both trees of every notified commit and
    /// should only read the tree it is given. Return nodes of the tree (or scalars) rather than
    /// freshly built maps or lists: a new composite is never the same as the
    /// previous one and would fire on every commit.
    pub fn subscribe_select<S, F>(&self, selector: S, callback: F) -> Subscription
    where
        S: Fn(&Value) -> Option<Value> + 'static,
        F: Fn(Option<&Value>, Option<&Value>) + 'static,
    {
        let id = self.subscriptions.borrow_mut().add_scoped(
            "<selector>".to_string(),
            Watch::Select(Rc::new(selector)),
            Rc::new(callback),
        );
        Subscription::new(&self.subscriptions, id)
    }

    /// Number of registered listeners.
    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.borrow().len()
    }

    pub fn config(&self) -> StoreConfig {
        self.config.borrow().clone()
    }

    /// Changes the undo depth. Shrinking drops the oldest entries.
    pub fn set_max_history(&self, max_history: usize) {
        self.config.borrow_mut().max_history = max_history;
        self.history.borrow_mut().set_max_depth(max_history);
    }

    fn enter(&self, operation: &'static str) -> Result<MutationGuard<'_>> {
        if let Some(active) = self.active.get() {
            tracing::warn!(operation, active, "Rejected reentrant mutation");
            return Err(MutationError::Reentrant { operation }.into());
        }
        self.active.set(Some(operation));
        Ok(MutationGuard {
            active: &self.active,
        })
    }

    fn notify(&self, prev: &Value, next: &Value) {
        // Selectors run outside the borrow so they may subscribe or dispose
        let listeners = self.subscriptions.borrow().snapshot();
        let due = listeners.plan(prev, next);
        tracing::trace!(callbacks = due.len(), "Notifying subscribers");
        for notification in &due {
            notification.deliver(next);
        }
    }
}

impl fmt::Debug for StateManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateManager")
            .field("state", &self.state.borrow())
            .field("history", &self.history.borrow().info())
            .field("subscribers", &self.subscriber_count())
            .field("config", &self.config.borrow())
            .finish()
    }
}
