//! # LATTICE Core
//!
//! Runtime data model for game objects: dynamically-kinded values,
//! ordered name/value tables, and declaration-driven reflection.
//!
//! ## Architecture Rules
//!
//! 1. **Kinds are sticky** - a value's kind is set once, by declaration
//!    or first element, and never changes until `clear`
//! 2. **Tables live in an arena** - the tree owns every node; the rest
//!    of the program holds generational handles, never references
//! 3. **Aliasing is explicit** - a value either owns its elements or
//!    aliases a shared fixed-length buffer, and mutating operations
//!    report which mode they hit
//!
//! ## Example
//!
//! ```rust,ignore
//! use lattice_core::{TableTree, ValueKind};
//!
//! let mut tree = TableTree::new();
//! let root = tree.create();
//! tree.append(root, "Health")?.push(100_i32)?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod reflect;
pub mod registry;
pub mod table;
pub mod value;

pub use error::{CoreError, CoreResult};
pub use reflect::{DefaultValue, FieldBinding, Reflection, Signature, SELF_ENTRY};
pub use registry::Registry;
pub use table::{TableHandle, TableTree};
pub use value::{Element, ExternalBuffer, Opaque, OpaqueRef, Value, ValueKind};
