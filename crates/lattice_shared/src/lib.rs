//! # LATTICE Shared
//!
//! Math types common to every layer of the framework.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on:
//! - `lattice_core`
//! - Any value, table, or reflection type
//!
//! If you need framework types, put them in `lattice_core`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod math;

pub use math::{Mat4, Vec4};
