//! Integration tests for the scene graph and matrix pipeline
//!
//! Reparenting, subtree walks, and world matrix composition through the
//! public [`World`] API.

use std::collections::HashSet;

use strata_core::{DirtyFlagPolicy, Entity, IgnoreContacts, Quat, Vec3, World};
use strata_math::mat4;

const EPSILON: f32 = 1e-4;

fn approx_eq(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPSILON
}

/// Builds a three-level tree with uneven fan-out and varied transforms
fn build_tree(world: &mut World) -> Vec<Entity> {
    let root = world.spawn().unwrap();
    let mut all = vec![root];
    for i in 0..3 {
        let child = world.spawn_child(root).unwrap();
        all.push(child);
        for j in 0..i {
            let grandchild = world.spawn_child(child).unwrap();
            all.push(grandchild);
            let t = world.transforms_mut();
            t.set_position(grandchild, Vec3::new(j as f32, 0.5, -1.0)).unwrap();
            t.set_scale(grandchild, Vec3::new(1.0, 2.0, 1.0)).unwrap();
        }
        let t = world.transforms_mut();
        t.set_position(child, Vec3::new(i as f32, 1.0, 0.0)).unwrap();
        t.set_quaternion(child, Quat::from_axis_angle(Vec3::Y, 0.4 * i as f32))
            .unwrap();
    }
    world
        .transforms_mut()
        .set_position(root, Vec3::new(0.0, 0.0, 3.0))
        .unwrap();
    all
}

fn assert_world_matrices_consistent(world: &World, entities: &[Entity]) {
    let t = world.transforms();
    for &e in entities {
        let parent = t.parent(e).unwrap();
        let expected = if parent.is_noop() {
            *t.local_matrix(e).unwrap()
        } else {
            mat4::mul(*t.world_matrix(parent).unwrap(), *t.local_matrix(e).unwrap())
        };
        assert!(
            mat4::approx_eq(t.world_matrix(e).unwrap(), &expected, EPSILON),
            "world matrix of {} is stale",
            e
        );
    }
}

// ==================== Reparenting ====================

#[test]
fn test_reparent_moves_world_translation() {
    let mut world = World::new(16);
    let a = world.spawn().unwrap();
    let b = world.spawn_child(a).unwrap();
    world
        .transforms_mut()
        .set_position(b, Vec3::new(0.0, 1.0, 0.0))
        .unwrap();

    world.update_matrices().unwrap();
    assert!(approx_eq(
        world.transforms().world_translation(b).unwrap(),
        Vec3::new(0.0, 1.0, 0.0)
    ));

    let c = world.spawn().unwrap();
    world
        .transforms_mut()
        .set_position(c, Vec3::new(5.0, 0.0, 0.0))
        .unwrap();
    let t = world.transforms_mut();
    t.detach(a, b).unwrap();
    t.attach(c, b).unwrap();

    world.update_matrices().unwrap();
    assert!(approx_eq(
        world.transforms().world_translation(b).unwrap(),
        Vec3::new(5.0, 1.0, 0.0)
    ));
    assert_eq!(world.transforms().first_child(a).unwrap(), Entity::NOOP);
}

#[test]
fn test_reparent_keeps_single_membership() {
    let mut world = World::new(16);
    let entities = build_tree(&mut world);
    let root = entities[0];
    let new_root = world.spawn().unwrap();

    // move every direct child of the root under the new root
    let children: Vec<_> = world.transforms().children(root).unwrap().collect();
    for &child in &children {
        let t = world.transforms_mut();
        t.detach(root, child).unwrap();
        t.attach(new_root, child).unwrap();
    }

    let t = world.transforms();
    assert_eq!(t.children(root).unwrap().count(), 0);
    assert_eq!(t.children(new_root).unwrap().collect::<Vec<_>>(), children);

    let mut seen = HashSet::new();
    for r in t.roots() {
        t.traverse(r, |e| assert!(seen.insert(e), "{} reachable twice", e))
            .unwrap();
    }
    assert_eq!(seen.len(), world.entity_count());
}

// ==================== Traversal ====================

#[test]
fn test_traverse_visits_parents_first() {
    let mut world = World::new(16);
    let entities = build_tree(&mut world);

    let mut order = Vec::new();
    world
        .transforms()
        .traverse(entities[0], |e| order.push(e))
        .unwrap();

    assert_eq!(order.len(), entities.len());
    let unique: HashSet<_> = order.iter().copied().collect();
    assert_eq!(unique.len(), entities.len());

    let t = world.transforms();
    for (i, &e) in order.iter().enumerate() {
        let parent = t.parent(e).unwrap();
        if !parent.is_noop() {
            let parent_pos = order.iter().position(|&x| x == parent).unwrap();
            assert!(parent_pos < i);
        }
    }
}

// ==================== Matrix Pass ====================

#[test]
fn test_full_pass_composes_every_entity() {
    for policy in [DirtyFlagPolicy::Retain, DirtyFlagPolicy::ClearAfterUpdate] {
        let mut world = World::new(16).with_dirty_policy(policy);
        let entities = build_tree(&mut world);

        world.update(1.0 / 60.0, &mut IgnoreContacts).unwrap();
        assert_world_matrices_consistent(&world, &entities);

        // move the root and run another tick
        world
            .transforms_mut()
            .set_position(entities[0], Vec3::new(-2.0, 4.0, 0.0))
            .unwrap();
        world.update(1.0 / 60.0, &mut IgnoreContacts).unwrap();
        assert_world_matrices_consistent(&world, &entities);
    }
}

#[test]
fn test_static_entity_keeps_local_matrix() {
    let mut world = World::new(8);
    let root = world.spawn().unwrap();
    let prop = world.spawn_child(root).unwrap();
    world
        .transforms_mut()
        .set_position(prop, Vec3::new(1.0, 0.0, 0.0))
        .unwrap();
    world.update_matrices().unwrap();
    world.transforms_mut().set_static(prop, true).unwrap();
    let frozen = *world.transforms().local_matrix(prop).unwrap();

    for tick in 0..4 {
        world
            .transforms_mut()
            .set_position(prop, Vec3::new(tick as f32 * 10.0, 0.0, 0.0))
            .unwrap();
        world
            .transforms_mut()
            .set_position(root, Vec3::new(0.0, tick as f32, 0.0))
            .unwrap();
        world.update_matrices().unwrap();
        assert_eq!(*world.transforms().local_matrix(prop).unwrap(), frozen);
    }

    // still composed under the moving root
    assert!(approx_eq(
        world.transforms().world_translation(prop).unwrap(),
        Vec3::new(1.0, 3.0, 0.0)
    ));
}
