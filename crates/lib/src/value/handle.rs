//! Opaque host handles.
//!
//! A [`Handle`] wraps a host object that lives in the state tree but is not
//! tree data: a decoded audio buffer, a live audio context, a GPU texture.
//! Handles are shared by reference and compared by identity. The store never
//! clones, enumerates or traverses into them.

use std::{any::Any, fmt, sync::Arc};

/// An identity-only leaf holding a host object.
///
/// ```
/// # use showstate::value::Handle;
/// struct AudioContext { sample_rate: u32 }
///
/// let ctx = Handle::new(AudioContext { sample_rate: 48_000 });
/// let shared = ctx.clone();
/// assert!(ctx.ptr_eq(&shared));
/// assert_eq!(ctx.downcast_ref::<AudioContext>().map(|c| c.sample_rate), Some(48_000));
///
/// // Two handles to equal objects are still different handles
/// let other = Handle::new(AudioContext { sample_rate: 48_000 });
/// assert!(!ctx.ptr_eq(&other));
/// ```
#[derive(Clone)]
pub struct Handle {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Handle {
    /// Wraps a host object in a new handle.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Wraps an already shared host object without copying it.
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            inner: value,
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Returns a reference to the host object if it has type `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Returns a shared pointer to the host object if it has type `T`.
    pub fn downcast_arc<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.inner).downcast::<T>().ok()
    }

    /// Returns `true` if both handles point at the same host object.
    pub fn ptr_eq(&self, other: &Handle) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.inner), Arc::as_ptr(&other.inner))
    }

    /// Returns the Rust type name of the wrapped object.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Handle({} @ {:p})",
            self.type_name,
            Arc::as_ptr(&self.inner) as *const ()
        )
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.type_name)
    }
}
