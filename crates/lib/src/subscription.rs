//! Change listeners and their disposal guards.
//!
//! Listeners come in two kinds:
//!
//! - **global** listeners receive the whole next tree on every notified commit;
//! - **scoped** listeners watch one node, picked either by a path or by a
//!   selector function, and receive `(next, prev)` only when that node changed.
//!
//! "Changed" uses [`Value::same`]: maps, lists and handles compare by identity,
//! scalars by value, and appearing or disappearing counts as a change. Because
//! edits copy exactly the nodes on the written path, a scoped listener fires
//! for a change anywhere below its node and stays quiet for edits elsewhere.
//!
//! For one commit, every scoped listener fires before any global listener,
//! each kind in registration order.

use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
    sync::Arc,
};

use crate::{path::Segment, value::Value};

/// Callback receiving the whole next tree.
pub type GlobalCallback = Rc<dyn Fn(&Value)>;

/// Callback receiving the watched node in the next and the previous tree.
pub type ScopedCallback = Rc<dyn Fn(Option<&Value>, Option<&Value>)>;

/// Picks the node a selector subscription watches.
pub type Selector = Rc<dyn Fn(&Value) -> Option<Value>>;

/// Identifies a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// What a scoped listener watches.
#[derive(Clone)]
pub(crate) enum Watch {
    /// A pre-parsed path
    Path(Arc<[Segment]>),
    /// A selector function
    Select(Selector),
}

impl Watch {
    fn resolve(&self, tree: &Value) -> Option<Value> {
        match self {
            Watch::Path(segments) => tree.get_segments(segments).cloned(),
            Watch::Select(selector) => selector(tree),
        }
    }
}

#[derive(Clone)]
struct Scoped {
    id: SubscriptionId,
    /// Path or selector description, for logs
    label: Rc<str>,
    watch: Watch,
    callback: ScopedCallback,
}

#[derive(Clone)]
struct Global {
    id: SubscriptionId,
    callback: GlobalCallback,
}

/// One callback due for a commit, with the values it will be called with.
pub(crate) enum Notification {
    Scoped {
        callback: ScopedCallback,
        next: Option<Value>,
        prev: Option<Value>,
    },
    Global(GlobalCallback),
}

impl Notification {
    pub(crate) fn deliver(&self, tree: &Value) {
        match self {
            Notification::Scoped {
                callback,
                next,
                prev,
            } => callback(next.as_ref(), prev.as_ref()),
            Notification::Global(callback) => callback(tree),
        }
    }
}

/// The listener table owned by a store.
#[derive(Default, Clone)]
pub(crate) struct Registry {
    next_id: u64,
    scoped: Vec<Scoped>,
    global: Vec<Global>,
}

impl Registry {
    pub(crate) fn add_global(&mut self, callback: GlobalCallback) -> SubscriptionId {
        let id = self.allocate_id();
        self.global.push(Global { id, callback });
        tracing::debug!(id = %id, "Added global subscription");
        id
    }

    pub(crate) fn add_scoped(
        &mut self,
        label: String,
        watch: Watch,
        callback: ScopedCallback,
    ) -> SubscriptionId {
        let id = self.allocate_id();
        tracing::debug!(id = %id, watch = %label, "Added scoped subscription");
        self.scoped.push(Scoped {
            id,
            label: label.into(),
            watch,
            callback,
        });
        id
    }

    /// Removes a listener. Returns false if it was already gone.
    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.len();
        self.scoped.retain(|entry| entry.id != id);
        self.global.retain(|entry| entry.id != id);
        let removed = self.len() < before;
        if removed {
            tracing::debug!(id = %id, "Removed subscription");
        }
        removed
    }

    /// Removes every listener, returning how many there were.
    pub(crate) fn clear(&mut self) -> usize {
        let count = self.len();
        self.scoped.clear();
        self.global.clear();
        count
    }

    pub(crate) fn len(&self) -> usize {
        self.scoped.len() + self.global.len()
    }

    pub(crate) fn contains(&self, id: SubscriptionId) -> bool {
        self.scoped.iter().any(|entry| entry.id == id)
            || self.global.iter().any(|entry| entry.id == id)
    }

    /// Copies the listener table so it can be planned without holding a
    /// borrow of the registry.
    pub(crate) fn snapshot(&self) -> Registry {
        self.clone()
    }

    /// Diffs `prev` against `next` and lists the callbacks to run, in order.
    pub(crate) fn plan(&self, prev: &Value, next: &Value) -> Vec<Notification> {
        let mut due = Vec::new();
        for entry in &self.scoped {
            let before = entry.watch.resolve(prev);
            let after = entry.watch.resolve(next);
            if Value::same_opt(after.as_ref(), before.as_ref()) {
                continue;
            }
            tracing::trace!(id = %entry.id, watch = %entry.label, "Watched value changed");
            due.push(Notification::Scoped {
                callback: Rc::clone(&entry.callback),
                next: after,
                prev: before,
            });
        }
        due.extend(
            self.global
                .iter()
                .map(|entry| Notification::Global(Rc::clone(&entry.callback))),
        );
        due
    }

    fn allocate_id(&mut self) -> SubscriptionId {
        self.next_id += 1;
        SubscriptionId(self.next_id)
    }
}

/// Keeps a listener registered for as long as it is alive.
///
/// Dropping the guard, or calling [`dispose`](Self::dispose), unregisters the
/// listener. [`detach`](Self::detach) gives the listener up to the store, which
/// then keeps it until [`StateManager::teardown`](crate::StateManager::teardown)
/// or until the store itself is dropped.
#[must_use = "dropping a Subscription unsubscribes it immediately"]
pub struct Subscription {
    registry: Weak<RefCell<Registry>>,
    id: Option<SubscriptionId>,
}

impl Subscription {
    pub(crate) fn new(registry: &Rc<RefCell<Registry>>, id: SubscriptionId) -> Self {
        Self {
            registry: Rc::downgrade(registry),
            id: Some(id),
        }
    }

    /// The id of the guarded listener, until it is detached.
    pub fn id(&self) -> Option<SubscriptionId> {
        self.id
    }

    /// Returns true while the listener is still registered with a live store.
    ///
    /// A detached guard no longer knows its listener and reports false.
    pub fn is_active(&self) -> bool {
        match (self.id, self.registry.upgrade()) {
            (Some(id), Some(registry)) => registry
                .try_borrow()
                .is_ok_and(|registry| registry.contains(id)),
            _ => false,
        }
    }

    /// Unregisters the listener now.
    pub fn dispose(self) {}

    /// Leaves the listener registered for the rest of the store's life.
    pub fn detach(mut self) {
        self.id = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        match registry.try_borrow_mut() {
            Ok(mut registry) => {
                registry.remove(id);
            }
            Err(_) => tracing::warn!(id = %id, "Subscription registry busy; listener left registered"),
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
