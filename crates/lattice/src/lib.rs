//! # LATTICE
//!
//! The main crate, integrating the data model into game objects.
//!
//! ## Modules
//!
//! - `actor`: a reflected game object whose fields alias its table
//! - `spawn`: name-keyed archetype construction

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod actor;
pub mod spawn;

pub use actor::{Actor, DEFAULT_HEALTH};
pub use spawn::{builtin_registry, register_archetypes};
