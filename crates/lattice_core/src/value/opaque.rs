//! # Opaque References
//!
//! Values of kind `OpaqueRef` hold handles to arbitrary engine objects
//! the core knows nothing about. Comparison is by identity, with an
//! optional equality capability a type may expose for value comparison.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// An object that can be stored behind an opaque reference.
pub trait Opaque: Any {
    /// The concrete type's display name.
    fn type_name(&self) -> &'static str;

    /// Upcast for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Optional equality capability.
    ///
    /// Returns `None` when the type does not support value comparison.
    /// Implementors downcast `other` through [`Opaque::as_any`].
    fn dyn_eq(&self, other: &dyn Opaque) -> Option<bool> {
        let _ = other;
        None
    }
}

/// A shared, non-owning handle to an opaque engine object.
#[derive(Clone)]
pub struct OpaqueRef {
    inner: Rc<dyn Opaque>,
}

impl OpaqueRef {
    /// Wraps a concrete object in an opaque handle.
    #[must_use]
    pub fn new<T: Opaque>(value: T) -> Self {
        Self {
            inner: Rc::new(value),
        }
    }

    /// Wraps an already shared object.
    #[must_use]
    pub fn from_rc(inner: Rc<dyn Opaque>) -> Self {
        Self { inner }
    }

    /// The concrete type's display name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.inner.type_name()
    }

    /// Downcasts to the concrete type, if it matches.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.as_any().downcast_ref::<T>()
    }

    /// Checks whether two handles refer to the same object.
    #[must_use]
    pub fn same_identity(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Compares two handles.
    ///
    /// Identity first; the `dyn_eq` capability is consulted only when
    /// both sides expose it. Handles without the capability and without
    /// shared identity compare unequal.
    #[must_use]
    pub fn equals(&self, other: &Self) -> bool {
        if self.same_identity(other) {
            return true;
        }

        match (
            self.inner.dyn_eq(other.inner.as_ref()),
            other.inner.dyn_eq(self.inner.as_ref()),
        ) {
            (Some(forward), Some(backward)) => forward && backward,
            _ => false,
        }
    }
}

impl fmt::Debug for OpaqueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpaqueRef")
            .field("type_name", &self.type_name())
            .finish()
    }
}
