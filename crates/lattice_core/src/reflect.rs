//! # Reflection
//!
//! Associates a table with a native object: a concrete type declares,
//! during construction, which of its members are visible as table
//! entries (its *signatures*), then plays the list back exactly once to
//! populate the table. Owned signatures copy a default value into
//! table-owned storage; aliased signatures bind the entry to the
//! object's own [`ExternalBuffer`] field, so writes through the table
//! mutate the native field in place.
//!
//! Entries created from signatures are *declared* attributes; entries
//! added afterwards through [`Reflection::append_dynamic`] are
//! *dynamic*. The implicit `"self"` entry always precedes everything.
//!
//! Duplicating a reflected object must not copy its table naively: the
//! aliased entries of the copy would still point at the source object's
//! fields. Build fresh buffers, declare fresh signatures, populate, and
//! then carry over the dynamic entries.

use lattice_shared::{Mat4, Vec4};

use crate::error::{CoreError, CoreResult};
use crate::table::{TableHandle, TableTree};
use crate::value::{ExternalBuffer, OpaqueRef, Value, ValueKind};

/// Name of the implicit self-reference entry every populate creates.
pub const SELF_ENTRY: &str = "self";

/// Default value for an owned signature, written at every index.
#[derive(Clone, Debug)]
pub enum DefaultValue {
    /// Int32 default.
    Int32(i32),
    /// Float32 default.
    Float32(f32),
    /// Vector4 default.
    Vector4(Vec4),
    /// Matrix4 default.
    Matrix4(Mat4),
    /// Text default.
    Text(String),
    /// Opaque reference default.
    OpaqueRef(OpaqueRef),
}

impl DefaultValue {
    /// The value kind this default produces.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Int32(_) => ValueKind::Int32,
            Self::Float32(_) => ValueKind::Float32,
            Self::Vector4(_) => ValueKind::Vector4,
            Self::Matrix4(_) => ValueKind::Matrix4,
            Self::Text(_) => ValueKind::Text,
            Self::OpaqueRef(_) => ValueKind::OpaqueRef,
        }
    }

    /// Writes the default into `value` at `index`.
    fn write(&self, value: &mut Value, index: usize) -> CoreResult<()> {
        match self {
            Self::Int32(default) => value.set(*default, index),
            Self::Float32(default) => value.set(*default, index),
            Self::Vector4(default) => value.set(*default, index),
            Self::Matrix4(default) => value.set(*default, index),
            Self::Text(default) => value.set(default.clone(), index),
            Self::OpaqueRef(default) => value.set(default.clone(), index),
        }
    }
}

/// A native field an aliased signature binds to the table.
///
/// The binding is a buffer handle, not an address: it is valid exactly
/// as long as the declaring instance keeps the buffer alive, and each
/// instance must declare its own.
#[derive(Clone, Debug)]
pub enum FieldBinding {
    /// Int32 field.
    Int32(ExternalBuffer<i32>),
    /// Float32 field.
    Float32(ExternalBuffer<f32>),
    /// Vector4 field.
    Vector4(ExternalBuffer<Vec4>),
    /// Matrix4 field.
    Matrix4(ExternalBuffer<Mat4>),
    /// Text field.
    Text(ExternalBuffer<String>),
    /// Opaque reference field.
    OpaqueRef(ExternalBuffer<OpaqueRef>),
}

impl FieldBinding {
    /// The value kind this field holds.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Int32(_) => ValueKind::Int32,
            Self::Float32(_) => ValueKind::Float32,
            Self::Vector4(_) => ValueKind::Vector4,
            Self::Matrix4(_) => ValueKind::Matrix4,
            Self::Text(_) => ValueKind::Text,
            Self::OpaqueRef(_) => ValueKind::OpaqueRef,
        }
    }

    /// The field's element count.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Int32(buffer) => buffer.len(),
            Self::Float32(buffer) => buffer.len(),
            Self::Vector4(buffer) => buffer.len(),
            Self::Matrix4(buffer) => buffer.len(),
            Self::Text(buffer) => buffer.len(),
            Self::OpaqueRef(buffer) => buffer.len(),
        }
    }

    /// Checks whether the field has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Binds `value` to alias this field's buffer.
    fn bind(&self, value: &mut Value) -> CoreResult<()> {
        match self {
            Self::Int32(buffer) => value.alias_external(buffer),
            Self::Float32(buffer) => value.alias_external(buffer),
            Self::Vector4(buffer) => value.alias_external(buffer),
            Self::Matrix4(buffer) => value.alias_external(buffer),
            Self::Text(buffer) => value.alias_external(buffer),
            Self::OpaqueRef(buffer) => value.alias_external(buffer),
        }
    }
}

/// How one signature stores its entry.
#[derive(Clone, Debug)]
enum StorageMode {
    /// Table-owned storage seeded with a default at every index.
    Owned(DefaultValue),
    /// Entry aliases the declaring object's own field.
    Aliased(FieldBinding),
    /// Entry holds nested child tables, one per declared count.
    ChildTables,
}

/// One declared attribute: name, kind, element count, storage mode.
#[derive(Clone, Debug)]
pub struct Signature {
    name: String,
    kind: ValueKind,
    count: usize,
    mode: StorageMode,
}

impl Signature {
    /// The entry name this signature populates.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The entry's value kind.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        self.kind
    }

    /// The declared element count.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Whether the entry aliases the declaring object's storage.
    #[must_use]
    pub const fn is_aliased(&self) -> bool {
        matches!(self.mode, StorageMode::Aliased(_))
    }
}

/// Ordered signature list with one-shot playback.
#[derive(Debug, Default)]
pub struct Reflection {
    signatures: Vec<Signature>,
    populated: bool,
}

impl Reflection {
    /// Creates an empty reflection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an owned attribute; `default` is written at every one of
    /// the `count` indices during populate.
    ///
    /// # Errors
    ///
    /// `EmptyName`, `AlreadyDeclared` for duplicates (including
    /// `"self"`), `AlreadyPopulated` after playback.
    pub fn declare_owned(
        &mut self,
        name: &str,
        default: DefaultValue,
        count: usize,
    ) -> CoreResult<()> {
        self.check_declarable(name)?;
        self.signatures.push(Signature {
            name: name.to_string(),
            kind: default.kind(),
            count,
            mode: StorageMode::Owned(default),
        });
        Ok(())
    }

    /// Declares a nested-table attribute: populate creates `count`
    /// child tables under the name. Tables are referenced by identity,
    /// never aliased.
    ///
    /// # Errors
    ///
    /// `EmptyName`, `AlreadyDeclared`, `AlreadyPopulated`.
    pub fn declare_child_table(&mut self, name: &str, count: usize) -> CoreResult<()> {
        self.check_declarable(name)?;
        self.signatures.push(Signature {
            name: name.to_string(),
            kind: ValueKind::Table,
            count,
            mode: StorageMode::ChildTables,
        });
        Ok(())
    }

    /// Declares an aliased attribute bound to a native field of the
    /// declaring instance. The element count is the field's length.
    ///
    /// # Errors
    ///
    /// `EmptyName`, `AlreadyDeclared`, `AlreadyPopulated`.
    pub fn declare_aliased(&mut self, name: &str, field: FieldBinding) -> CoreResult<()> {
        self.check_declarable(name)?;
        self.signatures.push(Signature {
            name: name.to_string(),
            kind: field.kind(),
            count: field.len(),
            mode: StorageMode::Aliased(field),
        });
        Ok(())
    }

    /// Plays the signature list back into `table`, in declaration
    /// order, preceded by the implicit `"self"` entry holding
    /// `self_ref`. Runs exactly once; the list is sealed afterwards.
    ///
    /// # Errors
    ///
    /// `AlreadyPopulated` on a second call; table errors propagate.
    pub fn populate(
        &mut self,
        tree: &mut TableTree,
        table: TableHandle,
        self_ref: OpaqueRef,
    ) -> CoreResult<()> {
        if self.populated {
            return Err(CoreError::AlreadyPopulated);
        }
        tree.append(table, SELF_ENTRY)?.push(self_ref)?;

        for signature in &self.signatures {
            match &signature.mode {
                StorageMode::Owned(default) => {
                    let value = tree.append(table, &signature.name)?;
                    value.set_kind(signature.kind)?;
                    value.reserve(signature.count)?;
                    for index in 0..signature.count {
                        default.write(value, index)?;
                    }
                }
                StorageMode::Aliased(field) => {
                    let value = tree.append(table, &signature.name)?;
                    field.bind(value)?;
                }
                StorageMode::ChildTables => {
                    for _ in 0..signature.count {
                        tree.append_child_table(table, &signature.name)?;
                    }
                }
            }
        }

        self.populated = true;
        Ok(())
    }

    /// Whether the signatures were already played back.
    #[must_use]
    pub const fn is_populated(&self) -> bool {
        self.populated
    }

    /// The declared signatures, in declaration order.
    #[must_use]
    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    /// Checks whether `name` is a declared (prescribed) attribute:
    /// the self entry or any signature name.
    #[must_use]
    pub fn is_declared(&self, name: &str) -> bool {
        name == SELF_ENTRY || self.signatures.iter().any(|s| s.name == name)
    }

    /// Checks whether `name` is a dynamic attribute: present in the
    /// table but not declared.
    #[must_use]
    pub fn is_dynamic(&self, tree: &TableTree, table: TableHandle, name: &str) -> bool {
        !self.is_declared(name) && tree.find(table, name).is_some()
    }

    /// Checks whether `name` is an attribute at all, declared or
    /// dynamic.
    #[must_use]
    pub fn is_attribute(&self, tree: &TableTree, table: TableHandle, name: &str) -> bool {
        self.is_declared(name) || tree.find(table, name).is_some()
    }

    /// The number of leading declared entries: the self entry plus one
    /// per signature. Dynamic entries start at this position.
    #[must_use]
    pub fn declared_len(&self) -> usize {
        1 + self.signatures.len()
    }

    /// Appends a dynamic attribute, or returns it if it already exists.
    ///
    /// # Errors
    ///
    /// `AlreadyDeclared` if `name` belongs to a declared attribute;
    /// table errors propagate.
    pub fn append_dynamic<'tree>(
        &self,
        tree: &'tree mut TableTree,
        table: TableHandle,
        name: &str,
    ) -> CoreResult<&'tree mut Value> {
        if self.is_declared(name) {
            return Err(CoreError::AlreadyDeclared(name.to_string()));
        }
        tree.append(table, name)
    }

    fn check_declarable(&self, name: &str) -> CoreResult<()> {
        if self.populated {
            return Err(CoreError::AlreadyPopulated);
        }
        if name.is_empty() {
            return Err(CoreError::EmptyName);
        }
        if self.is_declared(name) {
            return Err(CoreError::AlreadyDeclared(name.to_string()));
        }
        Ok(())
    }
}
