//! Entity-level rotation helpers
//!
//! Keeps the Euler and quaternion columns in step and orients entities
//! toward a target point.

use strata_math::{mat4, Quat, Vec3};

use crate::{Entity, SceneError, TransformStore};

impl TransformStore {
    /// Derive the quaternion from the stored Euler angles and order
    pub fn set_quaternion_from_euler(&mut self, entity: Entity) -> Result<(), SceneError> {
        let i = self.check(entity)?;
        self.quaternion[i] = self.rotation[i].to_quaternion();
        Ok(())
    }

    /// Derive the Euler angles from the stored quaternion, keeping the
    /// entity's current order
    pub fn set_euler_from_quaternion(&mut self, entity: Entity) -> Result<(), SceneError> {
        let i = self.check(entity)?;
        let q = self.quaternion[i];
        self.rotation[i].set_from_quaternion(q);
        Ok(())
    }

    /// Turn `entity` so its local -Z axis faces `target`, with +Y up
    pub fn look_at(&mut self, entity: Entity, target: Vec3) -> Result<(), SceneError> {
        self.look_at_with_up(entity, target, Vec3::Y)
    }

    /// Turn `entity` so its local -Z axis faces the world-space `target`
    ///
    /// The entity's ancestors are resolved first. The resulting rotation is
    /// expressed relative to the parent and written to both the quaternion
    /// and the Euler angles; matrices pick it up on the next pass.
    pub fn look_at_with_up(
        &mut self,
        entity: Entity,
        target: Vec3,
        up: Vec3,
    ) -> Result<(), SceneError> {
        self.update_world_recursive(entity, true, false)?;
        let i = entity.index();

        let eye = mat4::get_translation(&self.world_matrix[i]);
        let facing = mat4::look_at(eye, target, up);
        let mut rotation = Quat::from_rotation_matrix(&facing);

        let parent = self.parent[i];
        if !parent.is_noop() {
            let parent_rotation = Quat::from_rotation_matrix(&self.world_matrix[parent.index()]);
            rotation = parent_rotation.inverse() * rotation;
        }

        self.quaternion[i] = rotation;
        self.rotation[i].set_from_quaternion(rotation);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;
    use strata_math::{Euler, EulerOrder};

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPSILON
    }

    fn forward(store: &TransformStore, e: Entity) -> Vec3 {
        let world = store.world_matrix(e).unwrap();
        let origin = mat4::get_translation(world);
        (mat4::transform_point(world, -Vec3::Z) - origin).normalized()
    }

    #[test]
    fn test_quaternion_from_euler_uses_order() {
        let mut store = TransformStore::new(4);
        let a = Entity::from_raw(1);
        let b = Entity::from_raw(2);
        store.initialize(a).unwrap();
        store.initialize(b).unwrap();
        store.set_rotation(a, Euler::new(0.4, 0.9, -0.3, EulerOrder::Xyz)).unwrap();
        store.set_rotation(b, Euler::new(0.4, 0.9, -0.3, EulerOrder::Zyx)).unwrap();
        store.set_quaternion_from_euler(a).unwrap();
        store.set_quaternion_from_euler(b).unwrap();

        let qa = store.quaternion(a).unwrap();
        let qb = store.quaternion(b).unwrap();
        assert!(!qa.approx_same_rotation(qb, 1e-4));
    }

    #[test]
    fn test_euler_quaternion_round_trip_keeps_order() {
        let mut store = TransformStore::new(4);
        let e = Entity::from_raw(1);
        store.initialize(e).unwrap();
        let euler = Euler::new(0.2, -0.6, 1.1, EulerOrder::Yzx);
        store.set_rotation(e, euler).unwrap();
        store.set_quaternion_from_euler(e).unwrap();
        store.set_rotation(e, Euler::new(0.0, 0.0, 0.0, EulerOrder::Yzx)).unwrap();
        store.set_euler_from_quaternion(e).unwrap();

        let back = store.rotation(e).unwrap();
        assert_eq!(back.order, EulerOrder::Yzx);
        assert!(approx_eq(back.angles(), euler.angles()));
    }

    #[test]
    fn test_look_at_root() {
        let mut store = TransformStore::new(4);
        let e = Entity::from_raw(1);
        store.initialize(e).unwrap();
        store.set_position(e, Vec3::new(0.0, 0.0, 0.0)).unwrap();

        store.look_at(e, Vec3::new(10.0, 0.0, 0.0)).unwrap();
        store.update_world_lazy(e, true).unwrap();

        assert!(approx_eq(forward(&store, e), Vec3::X));
    }

    #[test]
    fn test_look_at_straight_ahead_is_identity() {
        let mut store = TransformStore::new(4);
        let e = Entity::from_raw(1);
        store.initialize(e).unwrap();
        store.set_position(e, Vec3::new(0.0, 0.0, 5.0)).unwrap();

        store.look_at(e, Vec3::ZERO).unwrap();

        assert!(store.quaternion(e).unwrap().approx_same_rotation(Quat::IDENTITY, 1e-6));
        assert!(approx_eq(store.rotation(e).unwrap().angles(), Vec3::ZERO));
    }

    #[test]
    fn test_look_at_under_rotated_parent() {
        let mut store = TransformStore::new(4);
        let parent = Entity::from_raw(1);
        let child = Entity::from_raw(2);
        store.initialize(parent).unwrap();
        store.initialize(child).unwrap();
        store.attach(parent, child).unwrap();

        store.set_position(parent, Vec3::new(0.0, 2.0, 0.0)).unwrap();
        store
            .set_quaternion(parent, Quat::from_axis_angle(Vec3::Y, FRAC_PI_2))
            .unwrap();
        store.set_position(child, Vec3::new(0.0, 0.0, -1.0)).unwrap();

        let target = Vec3::new(-1.0, 2.0, 6.0);
        store.look_at(child, target).unwrap();
        store.update_world_lazy(parent, true).unwrap();

        let eye = store.world_translation(child).unwrap();
        assert!(approx_eq(eye, Vec3::new(-1.0, 2.0, 0.0)));
        assert!(approx_eq(forward(&store, child), (target - eye).normalized()));
    }
}
