//! # Actor - Reflected Game Object
//!
//! The reference integration of the core data model: a native struct
//! whose gameplay fields (health, position, transform) are declared as
//! aliased table attributes. Scripts and editors read and write the
//! table; the native fields see every change, because both sides share
//! the same buffers.
//!
//! Duplication is the subtle part. Cloning the table would leave the
//! copy's aliased entries pointing at the source actor's fields, so
//! [`Actor::duplicate`] builds fresh buffers seeded with the source's
//! current values, re-declares, re-populates, and then carries the
//! dynamic entries over.

use lattice_core::{
    CoreResult, DefaultValue, ExternalBuffer, FieldBinding, Opaque, OpaqueRef, Reflection,
    TableHandle, TableTree, Value, ValueKind,
};
use lattice_shared::{Mat4, Vec4};
use std::any::Any;
use tracing::debug;

// ============================================================================
// ACTOR CONSTANTS
// ============================================================================

/// Default health for a freshly spawned actor.
pub const DEFAULT_HEALTH: i32 = 100;

/// Declared attribute name for the health field.
pub const ATTR_HEALTH: &str = "Health";

/// Declared attribute name for the position field.
pub const ATTR_POSITION: &str = "Position";

/// Declared attribute name for the transform field.
pub const ATTR_TRANSFORM: &str = "Transform";

/// Declared attribute name for the display name.
pub const ATTR_DISPLAY_NAME: &str = "DisplayName";

/// Declared attribute name for the inventory child table.
pub const ATTR_INVENTORY: &str = "Inventory";

// ============================================================================
// IDENTITY TAG
// ============================================================================

/// Opaque identity stored in the table's self entry.
///
/// Two tags compare equal only when they are the same allocation, so a
/// duplicated actor's table never compares equal to its source's even
/// when every field matches.
#[derive(Debug)]
struct ActorTag;

impl Opaque for ActorTag {
    fn type_name(&self) -> &'static str {
        "ActorTag"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// ACTOR
// ============================================================================

/// A game object whose fields are visible through its table.
#[derive(Debug)]
pub struct Actor {
    archetype: String,
    health: ExternalBuffer<i32>,
    position: ExternalBuffer<Vec4>,
    transform: ExternalBuffer<Mat4>,
    reflection: Reflection,
    table: TableHandle,
    tag: OpaqueRef,
}

impl Actor {
    /// Spawns an actor with default field values and a freshly
    /// populated table in `tree`.
    ///
    /// # Errors
    ///
    /// Propagates declaration and populate failures from the core.
    pub fn spawn(tree: &mut TableTree, archetype: &str, health: i32) -> CoreResult<Self> {
        Self::build(
            tree,
            archetype,
            ExternalBuffer::single(health),
            ExternalBuffer::single(Vec4::ZERO),
            ExternalBuffer::single(Mat4::IDENTITY),
        )
    }

    fn build(
        tree: &mut TableTree,
        archetype: &str,
        health: ExternalBuffer<i32>,
        position: ExternalBuffer<Vec4>,
        transform: ExternalBuffer<Mat4>,
    ) -> CoreResult<Self> {
        let mut reflection = Reflection::new();
        reflection.declare_aliased(ATTR_HEALTH, FieldBinding::Int32(health.clone()))?;
        reflection.declare_aliased(ATTR_POSITION, FieldBinding::Vector4(position.clone()))?;
        reflection.declare_aliased(ATTR_TRANSFORM, FieldBinding::Matrix4(transform.clone()))?;
        reflection.declare_owned(
            ATTR_DISPLAY_NAME,
            DefaultValue::Text(archetype.to_string()),
            1,
        )?;
        reflection.declare_child_table(ATTR_INVENTORY, 1)?;

        let table = tree.create();
        let tag = OpaqueRef::new(ActorTag);
        reflection.populate(tree, table, tag.clone())?;
        debug!(archetype, "spawned actor");

        Ok(Self {
            archetype: archetype.to_string(),
            health,
            position,
            transform,
            reflection,
            table,
            tag,
        })
    }

    /// The archetype name this actor was spawned as.
    #[must_use]
    pub fn archetype(&self) -> &str {
        &self.archetype
    }

    /// The actor's table.
    #[must_use]
    pub const fn table(&self) -> TableHandle {
        self.table
    }

    /// The actor's declared attribute list.
    #[must_use]
    pub const fn reflection(&self) -> &Reflection {
        &self.reflection
    }

    /// Current health, read from the native field.
    #[must_use]
    pub fn health(&self) -> i32 {
        self.health.get(0).unwrap_or(0)
    }

    /// Applies damage to the native field. The table's `Health` entry
    /// aliases the same buffer, so readers of the table see the change
    /// without any sync step.
    pub fn take_damage(&mut self, amount: i32) {
        let remaining = self.health().saturating_sub(amount);
        self.health.set(0, remaining);
    }

    /// Current position, read from the native field.
    #[must_use]
    pub fn position(&self) -> Vec4 {
        self.position.get(0).unwrap_or(Vec4::ZERO)
    }

    /// Moves the actor to `target`.
    pub fn move_to(&mut self, target: Vec4) {
        self.position.set(0, target);
    }

    /// Current transform, read from the native field.
    #[must_use]
    pub fn transform(&self) -> Mat4 {
        self.transform.get(0).unwrap_or(Mat4::IDENTITY)
    }

    /// The actor's inventory child table.
    ///
    /// # Errors
    ///
    /// Fails if the inventory entry was removed from the table.
    pub fn inventory(&self, tree: &TableTree) -> CoreResult<TableHandle> {
        let value = tree
            .find(self.table, ATTR_INVENTORY)
            .ok_or_else(|| lattice_core::CoreError::NotATable(ATTR_INVENTORY.to_string()))?;
        value.table_at(0)
    }

    /// Appends a dynamic attribute to the actor's table.
    ///
    /// # Errors
    ///
    /// Fails for declared names; table errors propagate.
    pub fn append_dynamic<'tree>(
        &self,
        tree: &'tree mut TableTree,
        name: &str,
    ) -> CoreResult<&'tree mut Value> {
        self.reflection.append_dynamic(tree, self.table, name)
    }

    /// Duplicates the actor: fresh buffers seeded from the current
    /// field values, a fresh table populated from fresh declarations,
    /// and copies of the source's dynamic entries.
    ///
    /// The copy's aliased entries point at the copy's own fields.
    /// Mutating one actor afterwards never touches the other.
    ///
    /// # Errors
    ///
    /// Propagates declaration, populate, and append failures.
    pub fn duplicate(&self, tree: &mut TableTree) -> CoreResult<Self> {
        let copy = Self::build(
            tree,
            &self.archetype,
            ExternalBuffer::new(self.health.to_vec()),
            ExternalBuffer::new(self.position.to_vec()),
            ExternalBuffer::new(self.transform.to_vec()),
        )?;

        // Dynamic entries sit after the self entry and the declared
        // attributes. Owned values clone their elements; an aliased
        // dynamic value stays aliased to the same buffer, which is what
        // aliasing means. Table-kind entries are skipped: a handle copy
        // would claim a child that still belongs to the source.
        let dynamic: Vec<(String, Value)> = (self.reflection.declared_len()..)
            .map_while(|position| tree.entry_at(self.table, position))
            .filter(|(_, value)| value.kind() != ValueKind::Table)
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();
        for (name, value) in dynamic {
            *tree.append(copy.table, &name)? = value;
        }

        debug!(archetype = copy.archetype.as_str(), "duplicated actor");
        Ok(copy)
    }

    /// Despawns the actor, destroying its table and owned descendants.
    ///
    /// # Errors
    ///
    /// `StaleHandle` if the table was already destroyed through the
    /// tree.
    pub fn despawn(self, tree: &mut TableTree) -> CoreResult<()> {
        tree.destroy(self.table)
    }

    /// Identity check against a table's self entry.
    #[must_use]
    pub fn is_self_entry(&self, value: &Value) -> bool {
        value
            .get::<OpaqueRef>(0)
            .is_ok_and(|stored| stored.same_identity(&self.tag))
    }
}
