//! # Value Storage
//!
//! Owned-or-aliased buffer abstraction backing every concrete value kind.
//!
//! Owned storage is a plain `Vec` managed by the value. Aliased storage
//! views a caller-owned [`ExternalBuffer`]: a shared, fixed-length,
//! interior-mutable buffer. The value never frees an aliased buffer and
//! never changes its length; writes through the value are visible to
//! every holder of the buffer handle.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Caller-owned storage that a value may alias.
///
/// The buffer has a fixed length decided at creation. Cloning the handle
/// shares the same underlying cells, so a native field and the table
/// entry aliasing it observe each other's writes.
///
/// # Example
///
/// ```rust,ignore
/// let health = ExternalBuffer::single(100);
/// value.alias_external(&health)?;
/// value.set(75, 0)?;
/// assert_eq!(health.get(0), Some(75));
/// ```
pub struct ExternalBuffer<T> {
    /// The shared cells. Length never changes after creation.
    cells: Rc<RefCell<Vec<T>>>,
}

impl<T: Clone> ExternalBuffer<T> {
    /// Creates a buffer over the given elements. The length is fixed.
    #[must_use]
    pub fn new(values: Vec<T>) -> Self {
        Self {
            cells: Rc::new(RefCell::new(values)),
        }
    }

    /// Creates a single-element buffer, the common case for native fields.
    #[must_use]
    pub fn single(value: T) -> Self {
        Self::new(vec![value])
    }

    /// Returns the fixed length of the buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.borrow().len()
    }

    /// Checks whether the buffer has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads the element at `index`, or None past the end.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        self.cells.borrow().get(index).cloned()
    }

    /// Overwrites the element at `index`.
    ///
    /// # Returns
    ///
    /// `true` if the element was written, `false` if index was out of range.
    pub fn set(&self, index: usize, value: T) -> bool {
        if let Some(slot) = self.cells.borrow_mut().get_mut(index) {
            *slot = value;
            true
        } else {
            false
        }
    }

    /// Copies the current contents out.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.cells.borrow().clone()
    }

    /// Checks whether two handles view the same underlying cells.
    #[must_use]
    pub fn shares_cells(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cells, &other.cells)
    }
}

impl<T> Clone for ExternalBuffer<T> {
    fn clone(&self) -> Self {
        Self {
            cells: Rc::clone(&self.cells),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ExternalBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ExternalBuffer")
            .field(&self.cells.borrow())
            .finish()
    }
}

/// One homogeneous buffer, either owned by the value or aliased.
#[derive(Clone, Debug)]
pub enum Storage<T> {
    /// Value-owned storage; may grow, freed when the value clears.
    Owned(Vec<T>),
    /// Caller-owned storage; fixed length, never freed by the value.
    Aliased(ExternalBuffer<T>),
}

impl<T: Clone> Storage<T> {
    /// Empty owned storage.
    #[must_use]
    pub const fn empty() -> Self {
        Self::Owned(Vec::new())
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Owned(data) => data.len(),
            Self::Aliased(buf) => buf.len(),
        }
    }

    /// Checks whether the storage has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the capacity. For aliased storage this equals the length.
    #[must_use]
    pub fn capacity(&self) -> usize {
        match self {
            Self::Owned(data) => data.capacity(),
            Self::Aliased(buf) => buf.len(),
        }
    }

    /// Checks whether the storage aliases an external buffer.
    #[must_use]
    pub fn is_external(&self) -> bool {
        matches!(self, Self::Aliased(_))
    }

    /// Reads the element at `index`, or None past the end.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        match self {
            Self::Owned(data) => data.get(index).cloned(),
            Self::Aliased(buf) => buf.get(index),
        }
    }

    /// Overwrites an existing element in place.
    ///
    /// # Returns
    ///
    /// `true` if the element was written, `false` if index was out of range.
    pub fn set(&mut self, index: usize, value: T) -> bool {
        match self {
            Self::Owned(data) => {
                if let Some(slot) = data.get_mut(index) {
                    *slot = value;
                    true
                } else {
                    false
                }
            }
            Self::Aliased(buf) => buf.set(index, value),
        }
    }

    /// Appends an element to owned storage.
    ///
    /// # Returns
    ///
    /// `true` if the element was appended, `false` for aliased storage.
    pub fn push(&mut self, value: T) -> bool {
        match self {
            Self::Owned(data) => {
                data.push(value);
                true
            }
            Self::Aliased(_) => false,
        }
    }

    /// Grows owned capacity to at least `capacity`, monotonically.
    ///
    /// # Returns
    ///
    /// `true` if the storage is owned, `false` for aliased storage.
    pub fn reserve(&mut self, capacity: usize) -> bool {
        match self {
            Self::Owned(data) => {
                if capacity > data.capacity() {
                    data.reserve_exact(capacity - data.len());
                }
                true
            }
            Self::Aliased(_) => false,
        }
    }
}

impl<T: Clone> Default for Storage<T> {
    fn default() -> Self {
        Self::empty()
    }
}
