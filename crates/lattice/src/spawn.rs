//! # Spawn - Name-Keyed Actor Construction
//!
//! Wires [`Actor`] archetypes into a [`Registry`] so content loaders
//! can instantiate by name: a level file says `"archetype": "Warden"`
//! and the loader gets back a fully populated actor.

use lattice_core::{CoreResult, Registry};
use tracing::debug;

use crate::actor::Actor;

// ============================================================================
// ARCHETYPE CONSTANTS
// ============================================================================

/// Starting health for the player-controlled archetype.
pub const HERO_HEALTH: i32 = 100;

/// Starting health for the heavy enemy archetype.
pub const WARDEN_HEALTH: i32 = 250;

/// Starting health for the throwaway swarm archetype.
pub const SPRITE_HEALTH: i32 = 10;

/// Registers the built-in actor archetypes.
///
/// # Errors
///
/// `AlreadyDeclared` if any archetype name is already taken.
pub fn register_archetypes(registry: &mut Registry<Actor>) -> CoreResult<()> {
    registry.register("Hero", |tree| Actor::spawn(tree, "Hero", HERO_HEALTH))?;
    registry.register("Warden", |tree| Actor::spawn(tree, "Warden", WARDEN_HEALTH))?;
    registry.register("Sprite", |tree| Actor::spawn(tree, "Sprite", SPRITE_HEALTH))?;
    debug!(count = registry.len(), "registered built-in archetypes");
    Ok(())
}

/// Builds a registry with the built-in archetypes pre-registered.
///
/// # Errors
///
/// Propagates registration failures.
pub fn builtin_registry() -> CoreResult<Registry<Actor>> {
    let mut registry = Registry::new();
    register_archetypes(&mut registry)?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_core::{CoreError, TableTree};

    #[test]
    fn test_builtin_archetypes_spawn() {
        let mut tree = TableTree::new();
        let registry = builtin_registry().unwrap();

        let hero = registry.create(&mut tree, "Hero").unwrap();
        assert_eq!(hero.archetype(), "Hero");
        assert_eq!(hero.health(), HERO_HEALTH);

        let warden = registry.create(&mut tree, "Warden").unwrap();
        assert_eq!(warden.health(), WARDEN_HEALTH);
        assert_ne!(hero.table(), warden.table());
    }

    #[test]
    fn test_unknown_archetype() {
        let mut tree = TableTree::new();
        let registry = builtin_registry().unwrap();
        assert_eq!(
            registry.create(&mut tree, "Lich").unwrap_err(),
            CoreError::UnknownType("Lich".to_string())
        );
    }

    #[test]
    fn test_double_registration_rejected() {
        let mut registry = builtin_registry().unwrap();
        assert_eq!(
            register_archetypes(&mut registry).unwrap_err(),
            CoreError::AlreadyDeclared("Hero".to_string())
        );
    }
}
