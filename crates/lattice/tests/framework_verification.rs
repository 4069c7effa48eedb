//! # Framework Verification Tests
//!
//! End-to-end checks of the data model through the public crates:
//!
//! 1. **Values**: sticky kinds, bounded aliased storage, text round trips
//! 2. **Tables**: ordered entries, exclusive parentage, outward search
//! 3. **Reflection**: declared vs dynamic attributes, populate-once
//! 4. **Actors**: aliased fields, duplication, name-keyed spawning
//!
//! Run with: cargo test --package lattice --test framework_verification

use lattice::actor::{Actor, ATTR_HEALTH, ATTR_POSITION, DEFAULT_HEALTH};
use lattice::spawn::{builtin_registry, HERO_HEALTH, WARDEN_HEALTH};
use lattice_core::{CoreError, Element, ExternalBuffer, TableTree, Value, ValueKind, SELF_ENTRY};
use lattice_shared::Vec4;

// ============================================================================
// MISSION 1: VALUE SEMANTICS
// ============================================================================

#[test]
fn verify_kind_is_sticky() {
    let mut value = Value::unset();
    value.push(3_i32).unwrap();
    assert_eq!(value.kind(), ValueKind::Int32);

    assert_eq!(
        value.push(1.0_f32).unwrap_err(),
        CoreError::KindMismatch {
            expected: ValueKind::Int32,
            actual: ValueKind::Float32,
        }
    );
    assert_eq!(
        value.set_kind(ValueKind::Text).unwrap_err(),
        CoreError::KindAlreadySet {
            current: ValueKind::Int32,
            requested: ValueKind::Text,
        }
    );

    // Re-declaring the same kind is a no-op, and clear resets fully.
    value.set_kind(ValueKind::Int32).unwrap();
    value.clear();
    assert_eq!(value.kind(), ValueKind::Unset);
    value.push("reborn".to_string()).unwrap();
    assert_eq!(value.kind(), ValueKind::Text);
}

#[test]
fn verify_element_generics_usable_downstream() {
    // Code outside the core can be generic over the element types a
    // value stores, even though the set of implementors is sealed.
    fn first<T: Element>(value: &Value) -> Option<T> {
        value.get(0).ok()
    }

    let mut ints = Value::unset();
    ints.push(7_i32).unwrap();
    assert_eq!(first::<i32>(&ints), Some(7));
    assert_eq!(first::<f32>(&ints), None);

    let mut words = Value::unset();
    words.push("hello".to_string()).unwrap();
    assert_eq!(first::<String>(&words), Some("hello".to_string()));
}

#[test]
fn verify_aliased_storage_is_bounded() {
    let buffer = ExternalBuffer::new(vec![10_i32, 20, 30]);
    let mut value = Value::unset();
    value.alias_external(&buffer).unwrap();

    assert!(value.is_external());
    assert_eq!(value.len(), 3);
    value.set(99, 1).unwrap();
    assert_eq!(buffer.get(1), Some(99));

    assert_eq!(
        value.set(7, 5).unwrap_err(),
        CoreError::IndexOutOfRange { index: 5, len: 3 }
    );
    assert_eq!(
        value.push(7).unwrap_err(),
        CoreError::AliasedImmutable { len: 3 }
    );
    assert_eq!(
        value.reserve(10).unwrap_err(),
        CoreError::AliasedImmutable { len: 3 }
    );
}

#[test]
fn verify_text_round_trip() {
    let mut value = Value::unset();
    value.push(Vec4::new(1.0, 2.5, -3.0, 0.0)).unwrap();

    let text = value.to_text(0).unwrap();
    assert_eq!(text, "(1.000000 2.500000 -3.000000 0.000000)");

    let mut parsed = Value::unset();
    parsed.set_kind(ValueKind::Vector4).unwrap();
    parsed.push(Vec4::ZERO).unwrap();
    parsed.from_text(&text, 0).unwrap();
    assert_eq!(parsed.get::<Vec4>(0).unwrap(), Vec4::new(1.0, 2.5, -3.0, 0.0));
}

// ============================================================================
// MISSION 2: TABLE STRUCTURE
// ============================================================================

#[test]
fn verify_adoption_moves_subtrees() {
    let mut tree = TableTree::new();
    let old_home = tree.create();
    let new_home = tree.create();

    let child = tree.append_child_table(old_home, "ward").unwrap();
    tree.append(child, "keepsake").unwrap().push(1_i32).unwrap();

    tree.adopt(new_home, child, "adopted").unwrap();
    assert_eq!(tree.parent(child).unwrap(), Some(new_home));
    assert_eq!(tree.name_of_child(new_home, child).unwrap(), "adopted");

    // The old entry survives with the child removed from it.
    let old_entry = tree.find(old_home, "ward").unwrap();
    assert_eq!(old_entry.kind(), ValueKind::Table);
    assert_eq!(old_entry.len(), 0);
}

#[test]
fn verify_search_walks_outward() {
    let mut tree = TableTree::new();
    let root = tree.create();
    tree.append(root, "difficulty").unwrap().push(3_i32).unwrap();

    let zone = tree.append_child_table(root, "zone").unwrap();
    let room = tree.append_child_table(zone, "room").unwrap();

    // Found two levels up.
    let (holder, value) = tree.search(room, "difficulty").unwrap();
    assert_eq!(holder, root);
    assert_eq!(value.get::<i32>(0).unwrap(), 3);

    // A nearer declaration shadows the outer one.
    tree.append(zone, "difficulty").unwrap().push(5_i32).unwrap();
    let (holder, value) = tree.search(room, "difficulty").unwrap();
    assert_eq!(holder, zone);
    assert_eq!(value.get::<i32>(0).unwrap(), 5);

    assert!(tree.search(room, "absent").is_none());
}

#[test]
fn verify_structural_equality_is_ordered() {
    let mut tree = TableTree::new();

    let left = tree.create();
    tree.append(left, "a").unwrap().push(1_i32).unwrap();
    tree.append(left, "b").unwrap().push(2_i32).unwrap();

    let right = tree.create();
    tree.append(right, "b").unwrap().push(2_i32).unwrap();
    tree.append(right, "a").unwrap().push(1_i32).unwrap();

    // Same entries, different order: not equal.
    assert!(!tree.deep_eq(left, right));

    let reordered = tree.create();
    tree.append(reordered, "a").unwrap().push(1_i32).unwrap();
    tree.append(reordered, "b").unwrap().push(2_i32).unwrap();
    assert!(tree.deep_eq(left, reordered));
}

// ============================================================================
// MISSION 3: REFLECTED ACTORS
// ============================================================================

#[test]
fn verify_actor_fields_alias_table() {
    let mut tree = TableTree::new();
    let mut actor = Actor::spawn(&mut tree, "Hero", DEFAULT_HEALTH).unwrap();

    // Native mutation is visible through the table.
    actor.take_damage(40);
    let seen = tree
        .find(actor.table(), ATTR_HEALTH)
        .unwrap()
        .get::<i32>(0)
        .unwrap();
    assert_eq!(seen, 60);

    // Table mutation is visible natively.
    tree.find_mut(actor.table(), ATTR_POSITION)
        .unwrap()
        .set(Vec4::new(8.0, 0.0, -2.0, 1.0), 0)
        .unwrap();
    assert_eq!(actor.position(), Vec4::new(8.0, 0.0, -2.0, 1.0));
}

#[test]
fn verify_dynamic_attributes_follow_declared() {
    let mut tree = TableTree::new();
    let actor = Actor::spawn(&mut tree, "Hero", DEFAULT_HEALTH).unwrap();

    actor
        .append_dynamic(&mut tree, "Faction")
        .unwrap()
        .push("Rebels".to_string())
        .unwrap();

    assert!(actor.reflection().is_dynamic(&tree, actor.table(), "Faction"));
    assert!(!actor.reflection().is_declared("Faction"));
    assert_eq!(
        actor.append_dynamic(&mut tree, ATTR_HEALTH).unwrap_err(),
        CoreError::AlreadyDeclared(ATTR_HEALTH.to_string())
    );

    // Declared entries keep their leading positions.
    let position = (0..tree.len(actor.table()))
        .find(|&i| tree.entry_at(actor.table(), i).is_some_and(|(n, _)| n == "Faction"));
    assert_eq!(position, Some(actor.reflection().declared_len()));
}

#[test]
fn verify_duplicated_actor_is_independent() {
    let mut tree = TableTree::new();
    let mut source = Actor::spawn(&mut tree, "Hero", DEFAULT_HEALTH).unwrap();
    source.move_to(Vec4::new(1.0, 2.0, 3.0, 1.0));

    let mut copy = source.duplicate(&mut tree).unwrap();
    assert_eq!(copy.position(), Vec4::new(1.0, 2.0, 3.0, 1.0));

    copy.take_damage(99);
    assert_eq!(source.health(), DEFAULT_HEALTH);
    assert_eq!(copy.health(), 1);

    // Each table holds its own identity in the self entry.
    let source_self = tree.find(source.table(), SELF_ENTRY).unwrap();
    let copy_self = tree.find(copy.table(), SELF_ENTRY).unwrap();
    assert!(source.is_self_entry(source_self));
    assert!(!copy.is_self_entry(source_self));
    assert!(copy.is_self_entry(copy_self));
}

#[test]
fn verify_spawn_by_name() {
    let mut tree = TableTree::new();
    let registry = builtin_registry().unwrap();

    let hero = registry.create(&mut tree, "Hero").unwrap();
    let warden = registry.create(&mut tree, "Warden").unwrap();
    assert_eq!(hero.health(), HERO_HEALTH);
    assert_eq!(warden.health(), WARDEN_HEALTH);

    assert_eq!(
        registry.create(&mut tree, "Basilisk").unwrap_err(),
        CoreError::UnknownType("Basilisk".to_string())
    );

    // Every spawned actor owns a distinct populated table.
    assert_ne!(hero.table(), warden.table());
    assert!(tree.find(hero.table(), ATTR_HEALTH).is_some());
    hero.despawn(&mut tree).unwrap();
    assert!(tree.contains(warden.table()));
}
