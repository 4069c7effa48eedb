//! # Table Tree
//!
//! Tables are named dictionaries of values, arranged into a tree:
//! table-kind values hold references to child tables. Every table lives
//! in a [`TableTree`] arena and is addressed by a generational
//! [`TableHandle`], so a parent link is just another handle and
//! reparenting is an index rewrite.
//!
//! Invariants:
//! - a table has at most one parent, and exactly one parent-side
//!   table-kind value references it
//! - entry names are unique within one table and never reordered
//! - the tree is acyclic; adoption walks the ancestor chain first
//!
//! # Example
//!
//! ```rust,ignore
//! let mut tree = TableTree::new();
//! let world = tree.create();
//! let sector = tree.append_child_table(world, "Sectors")?;
//! tree.append(world, "Name")?.push("Overworld".to_string())?;
//! assert!(tree.search(sector, "Name").is_some());
//! ```

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::value::{Value, ValueKind};

/// Unique identifier for a table in the tree.
///
/// The ID is split into two parts:
/// - Lower 32 bits: index into the arena
/// - Upper 32 bits: generation counter for detecting stale references
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct TableHandle(u64);

impl TableHandle {
    /// Creates a new handle from index and generation.
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    /// Returns the index portion of the handle.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Returns the generation portion of the handle.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }
}

/// One table: insertion-ordered entries, a name index, a parent link.
#[derive(Debug, Default)]
struct Node {
    /// Entries in insertion order. Names are never removed or reordered.
    entries: Vec<(String, Value)>,
    /// Name to entry-slot index.
    index: HashMap<String, usize>,
    /// The single table owning this one, if any.
    parent: Option<TableHandle>,
    /// Generation counter; bumped on release to invalidate old handles.
    generation: u32,
    /// Whether this slot currently holds a live table.
    alive: bool,
}

/// The arena holding every table of one tree (or forest of trees).
///
/// The tree owns all nodes. Destroying a table recursively destroys the
/// children it strictly owns - those whose parent link points back at
/// it - and bumps the slot generation so outstanding handles go stale.
#[derive(Debug, Default)]
pub struct TableTree {
    /// All table slots.
    nodes: Vec<Node>,
    /// Free slot indices for reuse.
    free: Vec<u32>,
}

impl TableTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new root table with no parent and no entries.
    pub fn create(&mut self) -> TableHandle {
        if let Some(index) = self.free.pop() {
            let node = &mut self.nodes[index as usize];
            node.alive = true;
            node.parent = None;
            return TableHandle::new(index, node.generation);
        }

        assert!(
            self.nodes.len() < u32::MAX as usize,
            "Table arena exhausted"
        );
        let index = self.nodes.len() as u32;
        self.nodes.push(Node {
            alive: true,
            ..Node::default()
        });
        TableHandle::new(index, 0)
    }

    /// Checks whether the handle still refers to a live table.
    #[must_use]
    pub fn contains(&self, table: TableHandle) -> bool {
        self.node(table).is_ok()
    }

    /// Returns the number of live tables in the arena.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.alive).count()
    }

    /// Returns the table's parent, or None for roots.
    ///
    /// # Errors
    ///
    /// `StaleHandle` if the table was destroyed.
    pub fn parent(&self, table: TableHandle) -> CoreResult<Option<TableHandle>> {
        Ok(self.node(table)?.parent)
    }

    /// Returns the number of entries, or 0 for a stale handle.
    #[must_use]
    pub fn len(&self, table: TableHandle) -> usize {
        self.node(table).map_or(0, |node| node.entries.len())
    }

    /// Checks whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self, table: TableHandle) -> bool {
        self.len(table) == 0
    }

    /// Returns the value at `name`, creating an unset entry if absent.
    /// Existing entries are returned unchanged and never reordered.
    ///
    /// # Errors
    ///
    /// `EmptyName` for empty names, `StaleHandle` if the table was
    /// destroyed.
    pub fn append(&mut self, table: TableHandle, name: &str) -> CoreResult<&mut Value> {
        if name.is_empty() {
            return Err(CoreError::EmptyName);
        }

        let node = self.node_mut(table)?;
        let slot = match node.index.get(name).copied() {
            Some(slot) => slot,
            None => {
                let slot = node.entries.len();
                node.index.insert(name.to_string(), slot);
                node.entries.push((name.to_string(), Value::unset()));
                slot
            }
        };

        Ok(&mut node.entries[slot].1)
    }

    /// Creates an empty child table under `name` and appends its handle
    /// to the entry, which must be unset or already table-kind.
    ///
    /// # Errors
    ///
    /// `KindMismatch` if the entry holds a non-table kind, `EmptyName`,
    /// `StaleHandle`.
    pub fn append_child_table(
        &mut self,
        table: TableHandle,
        name: &str,
    ) -> CoreResult<TableHandle> {
        if name.is_empty() {
            return Err(CoreError::EmptyName);
        }
        self.check_table_slot(table, name)?;

        let child = self.create();
        let value = self.append(table, name)?;
        value.set_kind(ValueKind::Table)?;
        value.push(child)?;
        self.node_mut(child)?.parent = Some(table);

        Ok(child)
    }

    /// Moves `child` under `parent` at `name`: detaches it from its
    /// current parent, then appends it like a nested table.
    ///
    /// # Errors
    ///
    /// `AdoptionCycle` if `child` is `parent` or one of its ancestors,
    /// `KindMismatch` if the entry holds a non-table kind, `EmptyName`,
    /// `StaleHandle`.
    pub fn adopt(
        &mut self,
        parent: TableHandle,
        child: TableHandle,
        name: &str,
    ) -> CoreResult<()> {
        if name.is_empty() {
            return Err(CoreError::EmptyName);
        }
        self.node(child)?;
        if parent == child || self.is_ancestor(child, parent) {
            return Err(CoreError::AdoptionCycle);
        }
        self.check_table_slot(parent, name)?;

        self.orphan(child)?;
        let value = self.append(parent, name)?;
        value.set_kind(ValueKind::Table)?;
        value.push(child)?;
        self.node_mut(child)?.parent = Some(parent);

        tracing::debug!(
            "Table {} adopted under {} as {:?}",
            child.index(),
            parent.index(),
            name
        );
        Ok(())
    }

    /// Breaks the link between `child` and its parent, removing the
    /// single parent-side reference while preserving sibling order.
    /// No-op on roots.
    ///
    /// # Errors
    ///
    /// `StaleHandle` if the table was destroyed.
    pub fn orphan(&mut self, child: TableHandle) -> CoreResult<()> {
        let Some(parent) = self.node(child)?.parent else {
            return Ok(());
        };

        let position = self.node(parent).ok().and_then(|node| {
            node.entries.iter().enumerate().find_map(|(slot, (_, value))| {
                value.position_of_table(child).map(|element| (slot, element))
            })
        });

        if let Some((slot, element)) = position {
            self.node_mut(parent)?.entries[slot].1.remove_table(element)?;
        }
        self.node_mut(child)?.parent = None;

        tracing::debug!("Table {} orphaned from {}", child.index(), parent.index());
        Ok(())
    }

    /// Returns the value at `name` in this table only, or None.
    #[must_use]
    pub fn find(&self, table: TableHandle, name: &str) -> Option<&Value> {
        let node = self.node(table).ok()?;
        let slot = *node.index.get(name)?;
        Some(&node.entries[slot].1)
    }

    /// Returns the value at `name` in this table only, mutably.
    pub fn find_mut(&mut self, table: TableHandle, name: &str) -> Option<&mut Value> {
        let node = self.node_mut(table).ok()?;
        let slot = *node.index.get(name)?;
        Some(&mut node.entries[slot].1)
    }

    /// Lexical search: looks up `name` here, then walks outward through
    /// parent tables. Returns the owning table alongside the value.
    #[must_use]
    pub fn search(&self, table: TableHandle, name: &str) -> Option<(TableHandle, &Value)> {
        let mut current = table;
        loop {
            let node = self.node(current).ok()?;
            if let Some(&slot) = node.index.get(name) {
                return Some((current, &node.entries[slot].1));
            }
            current = node.parent?;
        }
    }

    /// Returns the entry name under which a direct child is stored.
    ///
    /// # Errors
    ///
    /// `NotAChild` if `child`'s parent is not `parent`, `StaleHandle`.
    pub fn name_of_child(&self, parent: TableHandle, child: TableHandle) -> CoreResult<&str> {
        if self.node(child)?.parent != Some(parent) {
            return Err(CoreError::NotAChild);
        }

        let node = self.node(parent)?;
        for (name, value) in &node.entries {
            if value.position_of_table(child).is_some() {
                return Ok(name);
            }
        }

        Err(CoreError::NotAChild)
    }

    /// Returns the entry at an insertion-order position.
    #[must_use]
    pub fn entry_at(&self, table: TableHandle, position: usize) -> Option<(&str, &Value)> {
        let node = self.node(table).ok()?;
        node.entries
            .get(position)
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Iterates the entries in insertion order.
    pub fn entries(&self, table: TableHandle) -> impl Iterator<Item = (&str, &Value)> {
        self.node(table)
            .map(|node| {
                node.entries
                    .iter()
                    .map(|(name, value)| (name.as_str(), value))
            })
            .into_iter()
            .flatten()
    }

    /// Structural, order-sensitive equality.
    ///
    /// Two tables are equal iff they have the same entry count and every
    /// entry, in insertion order, has the same name and an equal value;
    /// table-kind values recurse structurally. Identical contents
    /// inserted in different orders compare unequal.
    #[must_use]
    pub fn deep_eq(&self, a: TableHandle, b: TableHandle) -> bool {
        if a == b {
            return true;
        }
        let (Ok(node_a), Ok(node_b)) = (self.node(a), self.node(b)) else {
            return false;
        };
        if node_a.entries.len() != node_b.entries.len() {
            return false;
        }

        for ((name_a, value_a), (name_b, value_b)) in node_a.entries.iter().zip(&node_b.entries) {
            if name_a != name_b {
                return false;
            }
            if value_a.kind() == ValueKind::Table && value_b.kind() == ValueKind::Table {
                if value_a.len() != value_b.len() {
                    return false;
                }
                for i in 0..value_a.len() {
                    let (Ok(child_a), Ok(child_b)) = (value_a.table_at(i), value_b.table_at(i))
                    else {
                        return false;
                    };
                    if !self.deep_eq(child_a, child_b) {
                        return false;
                    }
                }
            } else if value_a != value_b {
                return false;
            }
        }

        true
    }

    /// Removes every entry, destroying strictly-owned children first.
    /// The table itself stays live and keeps its parent.
    ///
    /// # Errors
    ///
    /// `StaleHandle` if the table was destroyed.
    pub fn clear(&mut self, table: TableHandle) -> CoreResult<()> {
        for child in self.owned_children(table)? {
            self.teardown(child);
        }

        let node = self.node_mut(table)?;
        node.entries.clear();
        node.index.clear();
        Ok(())
    }

    /// Destroys the table and, recursively, every strictly-owned
    /// descendant. The parent-side reference is removed first;
    /// outstanding handles to destroyed tables go stale.
    ///
    /// # Errors
    ///
    /// `StaleHandle` if the table was already destroyed.
    pub fn destroy(&mut self, table: TableHandle) -> CoreResult<()> {
        self.node(table)?;
        self.orphan(table)?;
        self.teardown(table);

        tracing::debug!("Table {} destroyed", table.index());
        Ok(())
    }

    /// Resolves a handle to its node.
    fn node(&self, table: TableHandle) -> CoreResult<&Node> {
        match self.nodes.get(table.index() as usize) {
            Some(node) if node.alive && node.generation == table.generation() => Ok(node),
            _ => Err(CoreError::StaleHandle),
        }
    }

    /// Resolves a handle to its node, mutably.
    fn node_mut(&mut self, table: TableHandle) -> CoreResult<&mut Node> {
        match self.nodes.get_mut(table.index() as usize) {
            Some(node) if node.alive && node.generation == table.generation() => Ok(node),
            _ => Err(CoreError::StaleHandle),
        }
    }

    /// Checks that the entry at `name`, if present, can hold child
    /// tables (unset or table-kind).
    fn check_table_slot(&self, table: TableHandle, name: &str) -> CoreResult<()> {
        if let Some(value) = self.find(table, name) {
            if !matches!(value.kind(), ValueKind::Unset | ValueKind::Table) {
                return Err(CoreError::KindMismatch {
                    expected: ValueKind::Table,
                    actual: value.kind(),
                });
            }
        } else {
            // Entry absent: the table itself must still be live.
            self.node(table)?;
        }
        Ok(())
    }

    /// Checks whether `candidate` appears on `table`'s ancestor chain.
    fn is_ancestor(&self, candidate: TableHandle, table: TableHandle) -> bool {
        let mut current = self.node(table).ok().and_then(|node| node.parent);
        while let Some(ancestor) = current {
            if ancestor == candidate {
                return true;
            }
            current = self.node(ancestor).ok().and_then(|node| node.parent);
        }
        false
    }

    /// Handles of children strictly owned by `table` (their parent link
    /// points back at it).
    fn owned_children(&self, table: TableHandle) -> CoreResult<Vec<TableHandle>> {
        let node = self.node(table)?;
        let mut owned = Vec::new();
        for (_, value) in &node.entries {
            if value.kind() != ValueKind::Table {
                continue;
            }
            for i in 0..value.len() {
                if let Ok(child) = value.table_at(i) {
                    if self
                        .node(child)
                        .is_ok_and(|child_node| child_node.parent == Some(table))
                    {
                        owned.push(child);
                    }
                }
            }
        }
        Ok(owned)
    }

    /// Recursively frees a subtree without touching the parent side.
    fn teardown(&mut self, table: TableHandle) {
        let children = self.owned_children(table).unwrap_or_default();
        for child in children {
            self.teardown(child);
        }

        let Ok(node) = self.node_mut(table) else {
            return;
        };
        node.alive = false;
        node.generation = node.generation.wrapping_add(1);
        node.parent = None;
        node.entries.clear();
        node.index.clear();
        self.free.push(table.index());
    }
}
