//! # Registry
//!
//! Name-keyed construction of reflected products. Call sites that only
//! know a type's name at runtime, such as a deserializer reading
//! `"class": "Monster"`, look the name up here and get a fresh,
//! fully-populated product back.
//!
//! The registry is generic over its product type `P`: a crate defines
//! one registry per product family (usually a boxed trait object) and
//! registers a maker closure per concrete type. Makers receive the
//! [`TableTree`] so construction can create and populate the product's
//! table in one step.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::table::TableTree;

/// Constructor closure for one registered type.
type Maker<P> = Box<dyn Fn(&mut TableTree) -> CoreResult<P>>;

/// Runtime lookup from type name to constructor.
pub struct Registry<P> {
    makers: HashMap<String, Maker<P>>,
}

impl<P> Registry<P> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            makers: HashMap::new(),
        }
    }

    /// Registers `maker` under `name`.
    ///
    /// # Errors
    ///
    /// `AlreadyDeclared` if the name is taken, `EmptyName` if blank.
    pub fn register<F>(&mut self, name: &str, maker: F) -> CoreResult<()>
    where
        F: Fn(&mut TableTree) -> CoreResult<P> + 'static,
    {
        if name.is_empty() {
            return Err(CoreError::EmptyName);
        }
        if self.makers.contains_key(name) {
            return Err(CoreError::AlreadyDeclared(name.to_string()));
        }
        debug!(type_name = name, "registered maker");
        self.makers.insert(name.to_string(), Box::new(maker));
        Ok(())
    }

    /// Removes the maker registered under `name`, if any.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.makers.remove(name).is_some()
    }

    /// Constructs a fresh product of the named type.
    ///
    /// # Errors
    ///
    /// `UnknownType` if no maker is registered under `name`; maker
    /// errors propagate.
    pub fn create(&self, tree: &mut TableTree, name: &str) -> CoreResult<P> {
        let maker = self
            .makers
            .get(name)
            .ok_or_else(|| CoreError::UnknownType(name.to_string()))?;
        maker(tree)
    }

    /// Checks whether a maker is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.makers.contains_key(name)
    }

    /// The number of registered makers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.makers.len()
    }

    /// Checks whether no makers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.makers.is_empty()
    }

    /// The registered type names, in arbitrary order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.makers.keys().map(String::as_str)
    }
}

impl<P> Default for Registry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for Registry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("len", &self.makers.len())
            .finish()
    }
}
