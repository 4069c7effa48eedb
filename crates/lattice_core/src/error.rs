//! # Core Error Types
//!
//! All errors that can occur in the value/table/reflection core.
//!
//! Every error is raised synchronously at the detecting call, before any
//! mutation takes place. A failed operation leaves the structure exactly
//! as it was.

use thiserror::Error;

use crate::value::ValueKind;

/// Errors that can occur in the core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Attempted to change the kind of a value that already has one.
    #[error("value kind already set to {current:?}, cannot change to {requested:?}")]
    KindAlreadySet {
        /// The kind the value already holds.
        current: ValueKind,
        /// The kind the caller asked for.
        requested: ValueKind,
    },

    /// The value's kind does not match the requested operation.
    #[error("kind mismatch: value is {actual:?}, operation expects {expected:?}")]
    KindMismatch {
        /// The kind the operation expects.
        expected: ValueKind,
        /// The kind the value actually holds.
        actual: ValueKind,
    },

    /// The operation is not defined for the value's current kind.
    #[error("operation is invalid for kind {0:?}")]
    InvalidKind(ValueKind),

    /// Attempted to resize or grow aliased (externally owned) storage.
    #[error("aliased storage is immutable in size: length is fixed at {len}")]
    AliasedImmutable {
        /// The fixed length of the aliased buffer.
        len: usize,
    },

    /// Index past the end of the value.
    #[error("index {index} out of range: length is {len}")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// The value's current length.
        len: usize,
    },

    /// Table entry names must be non-empty.
    #[error("table entry name cannot be empty")]
    EmptyName,

    /// The entry exists but does not hold child tables.
    #[error("entry {0:?} is not a table")]
    NotATable(String),

    /// The name is already claimed by a declared (prescribed) entry.
    #[error("name {0:?} is already declared")]
    AlreadyDeclared(String),

    /// The given table is not a direct child of this table.
    #[error("table is not a child of the given parent")]
    NotAChild,

    /// No concrete type with the given name is registered.
    #[error("unknown type {0:?}")]
    UnknownType(String),

    /// Adoption would make a table its own ancestor.
    #[error("adoption would create a cycle: the child is an ancestor of the parent")]
    AdoptionCycle,

    /// The handle refers to a table that no longer exists.
    #[error("stale table handle: the table was destroyed")]
    StaleHandle,

    /// Signatures were already played back into the table.
    #[error("reflection already populated, signatures are sealed")]
    AlreadyPopulated,
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
