//! # Value
//!
//! A runtime-typed container that resembles an array of data.
//!
//! A value is a homogeneously-typed, resizable sequence: every element
//! has the same kind, different values may hold different kinds, and the
//! kind is decided at run time by the first write. Storage is either
//! owned by the value or aliases a caller-owned [`ExternalBuffer`], in
//! which case the length is fixed and the buffer is never freed here.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut value = Value::unset();
//! value.push(5)?;                  // kind inferred as Int32
//! value.set(7, 0)?;
//! assert_eq!(value.get::<i32>(0)?, 7);
//! assert!(value.push(1.5f32).is_err()); // kind is fixed now
//! ```

pub mod opaque;
pub mod storage;
pub mod text;

pub use opaque::{Opaque, OpaqueRef};
pub use storage::{ExternalBuffer, Storage};

use lattice_shared::{Mat4, Vec4};

use crate::error::{CoreError, CoreResult};
use crate::table::TableHandle;

/// The kinds of data a value supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// No kind yet; the first write decides.
    Unset,
    /// 32-bit signed integers.
    Int32,
    /// 32-bit floats.
    Float32,
    /// 4-component float vectors.
    Vector4,
    /// 4x4 float matrices.
    Matrix4,
    /// Non-owning references to child tables.
    Table,
    /// Text strings.
    Text,
    /// Opaque references to engine objects.
    OpaqueRef,
}

/// The tagged buffer behind a value, one storage per concrete kind.
///
/// Public only because the sealed [`Element`] supertrait names it in
/// its signatures; not part of the usable API surface.
#[doc(hidden)]
#[derive(Clone, Debug, Default)]
pub enum Repr {
    /// No kind assigned yet.
    #[default]
    Unset,
    /// Int32 elements.
    Int32(Storage<i32>),
    /// Float32 elements.
    Float32(Storage<f32>),
    /// Vector4 elements.
    Vector4(Storage<Vec4>),
    /// Matrix4 elements.
    Matrix4(Storage<Mat4>),
    /// Child-table references. Never aliased; ownership lives in the tree.
    Table(Storage<TableHandle>),
    /// Text elements.
    Text(Storage<String>),
    /// Opaque reference elements.
    OpaqueRef(Storage<OpaqueRef>),
}

impl Repr {
    /// Empty owned storage of the given kind.
    fn empty_of(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Unset => Self::Unset,
            ValueKind::Int32 => Self::Int32(Storage::empty()),
            ValueKind::Float32 => Self::Float32(Storage::empty()),
            ValueKind::Vector4 => Self::Vector4(Storage::empty()),
            ValueKind::Matrix4 => Self::Matrix4(Storage::empty()),
            ValueKind::Table => Self::Table(Storage::empty()),
            ValueKind::Text => Self::Text(Storage::empty()),
            ValueKind::OpaqueRef => Self::OpaqueRef(Storage::empty()),
        }
    }
}

/// Applies one expression to whichever storage variant is active.
macro_rules! with_storage {
    ($repr:expr, |$storage:ident| $body:expr, $unset:expr) => {
        match $repr {
            Repr::Unset => $unset,
            Repr::Int32($storage) => $body,
            Repr::Float32($storage) => $body,
            Repr::Vector4($storage) => $body,
            Repr::Matrix4($storage) => $body,
            Repr::Table($storage) => $body,
            Repr::Text($storage) => $body,
            Repr::OpaqueRef($storage) => $body,
        }
    };
}

mod private {
    use super::{Repr, Storage};

    /// Projection of the tagged repr onto one element type.
    ///
    /// Sealed: only the element types this module implements it for can
    /// ever be stored in a value.
    pub trait ReprAccess: Sized {
        /// Views the repr as this element type's storage.
        fn storage(repr: &Repr) -> Option<&Storage<Self>>;
        /// Views the repr mutably as this element type's storage.
        fn storage_mut(repr: &mut Repr) -> Option<&mut Storage<Self>>;
        /// Wraps storage of this element type back into a repr.
        fn into_repr(storage: Storage<Self>) -> Repr;
    }
}

/// An element type a value can store.
///
/// Implemented for exactly the seven concrete kinds; external crates
/// cannot add more.
pub trait Element: Clone + private::ReprAccess + 'static {
    /// The kind tag for this element type.
    const KIND: ValueKind;

    /// Whether values of this kind may alias external storage.
    const ALIASABLE: bool;

    /// Element comparison used by value equality.
    #[must_use]
    fn element_eq(a: &Self, b: &Self) -> bool;
}

macro_rules! repr_access {
    ($ty:ty, $variant:ident) => {
        impl private::ReprAccess for $ty {
            fn storage(repr: &Repr) -> Option<&Storage<Self>> {
                match repr {
                    Repr::$variant(storage) => Some(storage),
                    _ => None,
                }
            }

            fn storage_mut(repr: &mut Repr) -> Option<&mut Storage<Self>> {
                match repr {
                    Repr::$variant(storage) => Some(storage),
                    _ => None,
                }
            }

            fn into_repr(storage: Storage<Self>) -> Repr {
                Repr::$variant(storage)
            }
        }
    };
}

repr_access!(i32, Int32);
repr_access!(f32, Float32);
repr_access!(Vec4, Vector4);
repr_access!(Mat4, Matrix4);
repr_access!(TableHandle, Table);
repr_access!(String, Text);
repr_access!(OpaqueRef, OpaqueRef);

impl Element for i32 {
    const KIND: ValueKind = ValueKind::Int32;
    const ALIASABLE: bool = true;

    fn element_eq(a: &Self, b: &Self) -> bool {
        a == b
    }
}

impl Element for f32 {
    const KIND: ValueKind = ValueKind::Float32;
    const ALIASABLE: bool = true;

    fn element_eq(a: &Self, b: &Self) -> bool {
        a == b
    }
}

impl Element for Vec4 {
    const KIND: ValueKind = ValueKind::Vector4;
    const ALIASABLE: bool = true;

    fn element_eq(a: &Self, b: &Self) -> bool {
        a == b
    }
}

impl Element for Mat4 {
    const KIND: ValueKind = ValueKind::Matrix4;
    const ALIASABLE: bool = true;

    fn element_eq(a: &Self, b: &Self) -> bool {
        a == b
    }
}

impl Element for TableHandle {
    const KIND: ValueKind = ValueKind::Table;
    // Table ownership lives in the tree; handles are never aliased.
    const ALIASABLE: bool = false;

    fn element_eq(a: &Self, b: &Self) -> bool {
        // Handle equality is identity equality.
        a == b
    }
}

impl Element for String {
    const KIND: ValueKind = ValueKind::Text;
    const ALIASABLE: bool = true;

    fn element_eq(a: &Self, b: &Self) -> bool {
        a == b
    }
}

impl Element for OpaqueRef {
    const KIND: ValueKind = ValueKind::OpaqueRef;
    const ALIASABLE: bool = true;

    fn element_eq(a: &Self, b: &Self) -> bool {
        a.equals(b)
    }
}

/// A runtime-typed, homogeneous, resizable sequence.
///
/// Cloning a value clones owned storage but shares aliased storage: the
/// clone still views the original caller's buffer. Reflected objects
/// must rebind aliased entries on duplication (see `Reflection`).
#[derive(Clone, Debug, Default)]
pub struct Value {
    repr: Repr,
}

impl Value {
    /// Creates a value with no kind. The first write decides the kind.
    #[must_use]
    pub const fn unset() -> Self {
        Self { repr: Repr::Unset }
    }

    /// Returns the value's kind.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match &self.repr {
            Repr::Unset => ValueKind::Unset,
            Repr::Int32(_) => ValueKind::Int32,
            Repr::Float32(_) => ValueKind::Float32,
            Repr::Vector4(_) => ValueKind::Vector4,
            Repr::Matrix4(_) => ValueKind::Matrix4,
            Repr::Table(_) => ValueKind::Table,
            Repr::Text(_) => ValueKind::Text,
            Repr::OpaqueRef(_) => ValueKind::OpaqueRef,
        }
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        with_storage!(&self.repr, |storage| storage.len(), 0)
    }

    /// Checks whether the value has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the capacity. Aliased storage reports its fixed length.
    #[must_use]
    pub fn capacity(&self) -> usize {
        with_storage!(&self.repr, |storage| storage.capacity(), 0)
    }

    /// Checks whether the value aliases caller-owned storage.
    #[must_use]
    pub fn is_external(&self) -> bool {
        with_storage!(&self.repr, |storage| storage.is_external(), false)
    }

    /// Assigns the value's kind.
    ///
    /// Setting the kind the value already has is a no-op.
    ///
    /// # Errors
    ///
    /// `KindAlreadySet` if the value already has a different kind.
    pub fn set_kind(&mut self, kind: ValueKind) -> CoreResult<()> {
        let current = self.kind();
        if current == kind {
            return Ok(());
        }
        if current != ValueKind::Unset {
            return Err(CoreError::KindAlreadySet {
                current,
                requested: kind,
            });
        }

        self.repr = Repr::empty_of(kind);
        Ok(())
    }

    /// Grows owned capacity to at least `capacity`. Capacity never
    /// shrinks; a smaller request is a no-op.
    ///
    /// # Errors
    ///
    /// `InvalidKind` if the kind is still unset, `AliasedImmutable` for
    /// aliased storage.
    pub fn reserve(&mut self, capacity: usize) -> CoreResult<()> {
        let len = self.len();
        with_storage!(
            &mut self.repr,
            |storage| {
                if storage.reserve(capacity) {
                    Ok(())
                } else {
                    Err(CoreError::AliasedImmutable { len })
                }
            },
            Err(CoreError::InvalidKind(ValueKind::Unset))
        )
    }

    /// Appends one element, inferring the kind on the first write.
    ///
    /// # Errors
    ///
    /// `KindMismatch` if the value already holds a different kind,
    /// `AliasedImmutable` for aliased storage.
    pub fn push<T: Element>(&mut self, value: T) -> CoreResult<()> {
        if matches!(self.repr, Repr::Unset) {
            self.repr = T::into_repr(Storage::empty());
        }

        let current = self.kind();
        let Some(storage) = T::storage_mut(&mut self.repr) else {
            return Err(CoreError::KindMismatch {
                expected: current,
                actual: T::KIND,
            });
        };

        let len = storage.len();
        if storage.push(value) {
            Ok(())
        } else {
            Err(CoreError::AliasedImmutable { len })
        }
    }

    /// Writes one element, inferring the kind on the first write.
    ///
    /// An in-range index overwrites in place. An out-of-range index on
    /// owned storage appends at the end instead of leaving a gap; this
    /// coercion is deliberate and relied upon, not sparse-array
    /// semantics.
    ///
    /// # Errors
    ///
    /// `KindMismatch` if the value already holds a different kind,
    /// `IndexOutOfRange` for an out-of-range write to aliased storage.
    pub fn set<T: Element>(&mut self, value: T, index: usize) -> CoreResult<()> {
        if matches!(self.repr, Repr::Unset) {
            self.repr = T::into_repr(Storage::empty());
        }

        let current = self.kind();
        let Some(storage) = T::storage_mut(&mut self.repr) else {
            return Err(CoreError::KindMismatch {
                expected: current,
                actual: T::KIND,
            });
        };

        let len = storage.len();
        if index < len {
            storage.set(index, value);
            Ok(())
        } else if storage.is_external() {
            Err(CoreError::IndexOutOfRange { index, len })
        } else {
            // Out-of-range owned write coerces to append-at-end.
            storage.push(value);
            Ok(())
        }
    }

    /// Reads one element.
    ///
    /// # Errors
    ///
    /// `KindMismatch` if `T` does not match the value's kind,
    /// `IndexOutOfRange` past the end.
    pub fn get<T: Element>(&self, index: usize) -> CoreResult<T> {
        let current = self.kind();
        let Some(storage) = T::storage(&self.repr) else {
            return Err(CoreError::KindMismatch {
                expected: T::KIND,
                actual: current,
            });
        };

        let len = storage.len();
        storage
            .get(index)
            .ok_or(CoreError::IndexOutOfRange { index, len })
    }

    /// Switches the value to alias caller-owned storage. Never copies.
    ///
    /// Legal only while the kind is unset, or to rebind an already
    /// aliased value of the same kind.
    ///
    /// # Errors
    ///
    /// `InvalidKind` for kinds that cannot alias (Table),
    /// `KindAlreadySet` if the value holds owned elements or a
    /// different kind.
    pub fn alias_external<T: Element>(&mut self, buffer: &ExternalBuffer<T>) -> CoreResult<()> {
        if !T::ALIASABLE {
            return Err(CoreError::InvalidKind(T::KIND));
        }

        let current = self.kind();
        let rebind = current == T::KIND && self.is_external();
        if current != ValueKind::Unset && !rebind {
            return Err(CoreError::KindAlreadySet {
                current,
                requested: T::KIND,
            });
        }

        self.repr = T::into_repr(Storage::Aliased(buffer.clone()));
        Ok(())
    }

    /// Resets the value to unset, releasing owned storage. Aliased
    /// buffers are dropped from the value but never freed.
    pub fn clear(&mut self) {
        self.repr = Repr::Unset;
    }

    /// Reads the child-table handle at `index`.
    ///
    /// # Errors
    ///
    /// `KindMismatch` for non-table values, `IndexOutOfRange` past the
    /// end.
    pub fn table_at(&self, index: usize) -> CoreResult<TableHandle> {
        self.get(index)
    }

    /// Finds the position of a child-table handle, if referenced here.
    #[must_use]
    pub fn position_of_table(&self, handle: TableHandle) -> Option<usize> {
        match &self.repr {
            Repr::Table(storage) => (0..storage.len()).find(|&i| storage.get(i) == Some(handle)),
            _ => None,
        }
    }

    /// Removes one child-table reference, preserving sibling order.
    ///
    /// # Errors
    ///
    /// `KindMismatch` for non-table values, `IndexOutOfRange` past the
    /// end.
    pub fn remove_table(&mut self, index: usize) -> CoreResult<()> {
        let current = self.kind();
        match &mut self.repr {
            Repr::Table(Storage::Owned(handles)) => {
                if index < handles.len() {
                    handles.remove(index);
                    Ok(())
                } else {
                    Err(CoreError::IndexOutOfRange {
                        index,
                        len: handles.len(),
                    })
                }
            }
            _ => Err(CoreError::KindMismatch {
                expected: ValueKind::Table,
                actual: current,
            }),
        }
    }

    /// Formats the element at `index` per the value-text grammar.
    ///
    /// # Errors
    ///
    /// `InvalidKind` for Unset, Table, and OpaqueRef values,
    /// `IndexOutOfRange` past the end.
    pub fn to_text(&self, index: usize) -> CoreResult<String> {
        match &self.repr {
            Repr::Int32(_) => Ok(self.get::<i32>(index)?.to_string()),
            Repr::Float32(_) => Ok(text::format_float(self.get(index)?)),
            Repr::Vector4(_) => Ok(text::format_vec4(self.get(index)?)),
            Repr::Matrix4(_) => Ok(text::format_mat4(&self.get::<Mat4>(index)?)),
            Repr::Text(_) => self.get::<String>(index),
            Repr::Unset | Repr::Table(_) | Repr::OpaqueRef(_) => {
                Err(CoreError::InvalidKind(self.kind()))
            }
        }
    }

    /// Parses `source` per the value-text grammar and writes it at
    /// `index` (with the same coercion rules as [`Value::set`]).
    ///
    /// # Errors
    ///
    /// `KindMismatch` if the kind is still unset or the text does not
    /// parse as the value's kind, `InvalidKind` for Table and OpaqueRef
    /// values.
    pub fn from_text(&mut self, source: &str, index: usize) -> CoreResult<()> {
        let kind = self.kind();
        let mismatch = |expected| CoreError::KindMismatch {
            expected,
            actual: ValueKind::Text,
        };

        match kind {
            ValueKind::Unset => Err(CoreError::KindMismatch {
                expected: ValueKind::Text,
                actual: ValueKind::Unset,
            }),
            ValueKind::Int32 => {
                let parsed = text::parse_int(source).ok_or_else(|| mismatch(kind))?;
                self.set(parsed, index)
            }
            ValueKind::Float32 => {
                let parsed = text::parse_float(source).ok_or_else(|| mismatch(kind))?;
                self.set(parsed, index)
            }
            ValueKind::Vector4 => {
                let parsed = text::parse_vec4(source).ok_or_else(|| mismatch(kind))?;
                self.set(parsed, index)
            }
            ValueKind::Matrix4 => {
                let parsed = text::parse_mat4(source).ok_or_else(|| mismatch(kind))?;
                self.set(parsed, index)
            }
            ValueKind::Text => self.set(source.to_string(), index),
            ValueKind::Table | ValueKind::OpaqueRef => Err(CoreError::InvalidKind(kind)),
        }
    }
}

fn storage_eq<T: Element>(a: &Storage<T>, b: &Storage<T>) -> bool {
    if a.len() != b.len() {
        return false;
    }

    (0..a.len()).all(|i| match (a.get(i), b.get(i)) {
        (Some(x), Some(y)) => T::element_eq(&x, &y),
        _ => false,
    })
}

impl PartialEq for Value {
    /// Element-wise comparison. Table elements compare by handle
    /// identity; opaque references compare by identity with the
    /// optional `dyn_eq` capability as a fallback.
    fn eq(&self, other: &Self) -> bool {
        match (&self.repr, &other.repr) {
            (Repr::Unset, Repr::Unset) => true,
            (Repr::Int32(a), Repr::Int32(b)) => storage_eq(a, b),
            (Repr::Float32(a), Repr::Float32(b)) => storage_eq(a, b),
            (Repr::Vector4(a), Repr::Vector4(b)) => storage_eq(a, b),
            (Repr::Matrix4(a), Repr::Matrix4(b)) => storage_eq(a, b),
            (Repr::Table(a), Repr::Table(b)) => storage_eq(a, b),
            (Repr::Text(a), Repr::Text(b)) => storage_eq(a, b),
            (Repr::OpaqueRef(a), Repr::OpaqueRef(b)) => storage_eq(a, b),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_inferred_on_first_write() {
        let mut value = Value::unset();
        assert_eq!(value.kind(), ValueKind::Unset);

        value.push(5).unwrap();
        assert_eq!(value.kind(), ValueKind::Int32);
        assert_eq!(value.len(), 1);
    }

    #[test]
    fn test_kind_never_changes_once_set() {
        let mut value = Value::unset();
        value.push(5).unwrap();

        assert_eq!(
            value.push(1.5f32),
            Err(CoreError::KindMismatch {
                expected: ValueKind::Int32,
                actual: ValueKind::Float32,
            })
        );
        assert_eq!(
            value.set_kind(ValueKind::Text),
            Err(CoreError::KindAlreadySet {
                current: ValueKind::Int32,
                requested: ValueKind::Text,
            })
        );

        // Same-kind set is a no-op, not an error.
        value.set_kind(ValueKind::Int32).unwrap();

        // Clearing resets to unset and unlocks the kind again.
        value.clear();
        value.push("text".to_string()).unwrap();
        assert_eq!(value.kind(), ValueKind::Text);
    }

    #[test]
    fn test_reserve_monotonic_growth() {
        let mut value = Value::unset();
        value.set_kind(ValueKind::Int32).unwrap();

        value.reserve(16).unwrap();
        assert_eq!(value.capacity(), 16);

        value.reserve(4).unwrap();
        assert_eq!(value.capacity(), 16);
    }

    #[test]
    fn test_reserve_requires_kind() {
        let mut value = Value::unset();
        assert_eq!(
            value.reserve(8),
            Err(CoreError::InvalidKind(ValueKind::Unset))
        );
    }

    #[test]
    fn test_set_coerces_out_of_range_to_append() {
        let mut value = Value::unset();
        value.push(1).unwrap();
        value.push(2).unwrap();

        // Index 10 is far past the end; the write lands at index 2.
        value.set(3, 10).unwrap();
        assert_eq!(value.len(), 3);
        assert_eq!(value.get::<i32>(2).unwrap(), 3);
    }

    #[test]
    fn test_set_overwrites_in_place() {
        let mut value = Value::unset();
        value.push(1).unwrap();
        value.set(9, 0).unwrap();
        assert_eq!(value.get::<i32>(0).unwrap(), 9);
        assert_eq!(value.len(), 1);
    }

    #[test]
    fn test_aliased_value_is_size_immutable() {
        let buffer = ExternalBuffer::new(vec![1, 2, 3]);
        let mut value = Value::unset();
        value.alias_external(&buffer).unwrap();

        assert!(value.is_external());
        assert_eq!(value.len(), 3);
        assert_eq!(value.capacity(), 3);

        assert_eq!(
            value.set(9, 5),
            Err(CoreError::IndexOutOfRange { index: 5, len: 3 })
        );
        assert_eq!(
            value.reserve(10),
            Err(CoreError::AliasedImmutable { len: 3 })
        );
        assert_eq!(value.push(4), Err(CoreError::AliasedImmutable { len: 3 }));
    }

    #[test]
    fn test_aliased_writes_reach_the_buffer() {
        let buffer = ExternalBuffer::single(100);
        let mut value = Value::unset();
        value.alias_external(&buffer).unwrap();

        value.set(75, 0).unwrap();
        assert_eq!(buffer.get(0), Some(75));
        assert_eq!(value.get::<i32>(0).unwrap(), 75);
    }

    #[test]
    fn test_alias_rules() {
        let buffer = ExternalBuffer::single(1);
        let mut owned = Value::unset();
        owned.push(5).unwrap();

        // Owned values cannot switch to aliased storage.
        assert_eq!(
            owned.alias_external(&buffer),
            Err(CoreError::KindAlreadySet {
                current: ValueKind::Int32,
                requested: ValueKind::Int32,
            })
        );

        // Rebinding an aliased value of the same kind is allowed.
        let mut aliased = Value::unset();
        aliased.alias_external(&buffer).unwrap();
        let other = ExternalBuffer::new(vec![7, 8]);
        aliased.alias_external(&other).unwrap();
        assert_eq!(aliased.len(), 2);

        // But not to a different kind.
        let floats = ExternalBuffer::single(1.0f32);
        assert!(aliased.alias_external(&floats).is_err());
    }

    #[test]
    fn test_text_round_trip_per_kind() {
        let mut int = Value::unset();
        int.push(5).unwrap();
        assert_eq!(int.to_text(0).unwrap(), "5");
        int.from_text("12", 0).unwrap();
        assert_eq!(int.get::<i32>(0).unwrap(), 12);

        let mut float = Value::unset();
        float.push(5.0f32).unwrap();
        assert_eq!(float.to_text(0).unwrap(), "5.000000");
        float.from_text("2.5", 0).unwrap();
        assert_eq!(float.get::<f32>(0).unwrap(), 2.5);

        let mut vector = Value::unset();
        vector.push(Vec4::new(1.0, 2.0, 3.0, 4.0)).unwrap();
        let text = vector.to_text(0).unwrap();
        let mut parsed = Value::unset();
        parsed.set_kind(ValueKind::Vector4).unwrap();
        parsed.from_text(&text, 0).unwrap();
        assert_eq!(vector, parsed);

        let mut matrix = Value::unset();
        matrix.push(Mat4::IDENTITY).unwrap();
        let text = matrix.to_text(0).unwrap();
        let mut parsed = Value::unset();
        parsed.set_kind(ValueKind::Matrix4).unwrap();
        parsed.from_text(&text, 0).unwrap();
        assert_eq!(matrix, parsed);

        let mut words = Value::unset();
        words.push("plain text".to_string()).unwrap();
        assert_eq!(words.to_text(0).unwrap(), "plain text");
    }

    #[test]
    fn test_from_text_requires_kind() {
        let mut value = Value::unset();
        assert_eq!(
            value.from_text("5", 0),
            Err(CoreError::KindMismatch {
                expected: ValueKind::Text,
                actual: ValueKind::Unset,
            })
        );
    }

    #[test]
    fn test_from_text_rejects_garbage() {
        let mut value = Value::unset();
        value.set_kind(ValueKind::Int32).unwrap();
        assert!(value.from_text("not a number", 0).is_err());
        assert_eq!(value.len(), 0);
    }

    #[test]
    fn test_zero_matrix_literal() {
        let mut value = Value::unset();
        value.push(Mat4::ZERO).unwrap();

        let row = "(0.000000 0.000000 0.000000 0.000000)";
        assert_eq!(
            value.to_text(0).unwrap(),
            format!("[{row},{row},{row},{row}]")
        );
    }

    #[test]
    fn test_value_equality() {
        let mut a = Value::unset();
        let mut b = Value::unset();
        a.push(1).unwrap();
        a.push(2).unwrap();
        b.push(1).unwrap();
        b.push(2).unwrap();
        assert_eq!(a, b);

        b.push(3).unwrap();
        assert_ne!(a, b);

        let unset = Value::unset();
        assert_eq!(unset, Value::unset());
        assert_ne!(a, unset);
    }

    #[test]
    fn test_equality_ignores_storage_mode() {
        let buffer = ExternalBuffer::new(vec![1, 2]);
        let mut aliased = Value::unset();
        aliased.alias_external(&buffer).unwrap();

        let mut owned = Value::unset();
        owned.push(1).unwrap();
        owned.push(2).unwrap();

        assert_eq!(aliased, owned);
    }

    #[test]
    fn test_opaque_identity_equality() {
        struct Marker;
        impl Opaque for Marker {
            fn type_name(&self) -> &'static str {
                "Marker"
            }
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }

        let shared = OpaqueRef::new(Marker);
        let mut a = Value::unset();
        let mut b = Value::unset();
        a.push(shared.clone()).unwrap();
        b.push(shared).unwrap();
        assert_eq!(a, b);

        let mut c = Value::unset();
        c.push(OpaqueRef::new(Marker)).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_table_kind_cannot_alias() {
        let buffer = ExternalBuffer::single(TableHandle::new(0, 0));
        let mut value = Value::unset();
        assert_eq!(
            value.alias_external(&buffer),
            Err(CoreError::InvalidKind(ValueKind::Table))
        );
    }
}
