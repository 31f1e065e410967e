//! Columnar transform storage
//!
//! [`TransformStore`] keeps one slot per entity id in parallel arrays: the
//! authored position/rotation/scale, the derived local and world matrices,
//! the static and dirty flags, and the four intrusive tree links. Slot 0 is
//! the NOOP sentinel and never takes part in the hierarchy.
//!
//! Tree links are read-only from outside the crate; they change only through
//! the hierarchy operations in [`crate::hierarchy`].

use strata_math::{mat4, Euler, Mat4, Quat, Vec3};

use crate::matrix::DirtyFlagPolicy;
use crate::{Entity, SceneError};

/// Fixed-capacity structure-of-arrays transform storage
#[derive(Debug, Clone)]
pub struct TransformStore {
    pub(crate) position: Vec<Vec3>,
    pub(crate) rotation: Vec<Euler>,
    pub(crate) quaternion: Vec<Quat>,
    pub(crate) scale: Vec<Vec3>,
    pub(crate) local_matrix: Vec<Mat4>,
    pub(crate) world_matrix: Vec<Mat4>,
    pub(crate) is_static: Vec<bool>,
    pub(crate) needs_update: Vec<bool>,
    pub(crate) parent: Vec<Entity>,
    pub(crate) first_child: Vec<Entity>,
    pub(crate) prev_sibling: Vec<Entity>,
    pub(crate) next_sibling: Vec<Entity>,
    pub(crate) initialized: Vec<bool>,
    pub(crate) dirty_policy: DirtyFlagPolicy,
}

impl TransformStore {
    /// Create a store with room for `capacity` ids, including the reserved 0
    pub fn new(capacity: usize) -> Self {
        Self::with_policy(capacity, DirtyFlagPolicy::default())
    }

    pub fn with_policy(capacity: usize, dirty_policy: DirtyFlagPolicy) -> Self {
        Self {
            position: vec![Vec3::ZERO; capacity],
            rotation: vec![Euler::default(); capacity],
            quaternion: vec![Quat::IDENTITY; capacity],
            scale: vec![Vec3::ONE; capacity],
            local_matrix: vec![mat4::IDENTITY; capacity],
            world_matrix: vec![mat4::IDENTITY; capacity],
            is_static: vec![false; capacity],
            needs_update: vec![false; capacity],
            parent: vec![Entity::NOOP; capacity],
            first_child: vec![Entity::NOOP; capacity],
            prev_sibling: vec![Entity::NOOP; capacity],
            next_sibling: vec![Entity::NOOP; capacity],
            initialized: vec![false; capacity],
            dirty_policy,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.position.len()
    }

    pub fn dirty_policy(&self) -> DirtyFlagPolicy {
        self.dirty_policy
    }

    pub fn set_dirty_policy(&mut self, policy: DirtyFlagPolicy) {
        self.dirty_policy = policy;
    }

    /// Bounds check, returning the slot index
    #[inline]
    pub fn check(&self, entity: Entity) -> Result<usize, SceneError> {
        let index = entity.index();
        if index < self.capacity() {
            Ok(index)
        } else {
            Err(SceneError::OutOfRange {
                entity,
                capacity: self.capacity(),
            })
        }
    }

    /// Bounds check that also rejects the NOOP sentinel
    #[inline]
    pub(crate) fn check_real(&self, entity: Entity) -> Result<usize, SceneError> {
        if entity.is_noop() {
            return Err(SceneError::ReservedEntity);
        }
        self.check(entity)
    }

    /// Whether `entity` currently has a transform record
    pub fn contains(&self, entity: Entity) -> bool {
        !entity.is_noop() && self.initialized.get(entity.index()).copied().unwrap_or(false)
    }

    /// Give `entity` the default record: identity transform, both matrices
    /// identity, dirty, and no tree links
    pub fn initialize(&mut self, entity: Entity) -> Result<(), SceneError> {
        let i = self.check_real(entity)?;
        self.write_default(i);
        self.needs_update[i] = true;
        self.initialized[i] = true;
        Ok(())
    }

    /// Return the slot to the unused state
    ///
    /// The caller must have detached `entity` from its parent and children
    /// first; links are cleared here but neighbours are not touched.
    pub fn reset(&mut self, entity: Entity) -> Result<(), SceneError> {
        let i = self.check_real(entity)?;
        self.write_default(i);
        self.needs_update[i] = false;
        self.initialized[i] = false;
        Ok(())
    }

    fn write_default(&mut self, i: usize) {
        self.position[i] = Vec3::ZERO;
        self.rotation[i] = Euler::default();
        self.quaternion[i] = Quat::IDENTITY;
        self.scale[i] = Vec3::ONE;
        self.local_matrix[i] = mat4::IDENTITY;
        self.world_matrix[i] = mat4::IDENTITY;
        self.is_static[i] = false;
        self.parent[i] = Entity::NOOP;
        self.first_child[i] = Entity::NOOP;
        self.prev_sibling[i] = Entity::NOOP;
        self.next_sibling[i] = Entity::NOOP;
    }

    // --- authored state ---

    pub fn position(&self, entity: Entity) -> Result<Vec3, SceneError> {
        Ok(self.position[self.check(entity)?])
    }

    pub fn set_position(&mut self, entity: Entity, position: Vec3) -> Result<(), SceneError> {
        let i = self.check(entity)?;
        self.position[i] = position;
        Ok(())
    }

    /// Euler angles together with their order tag
    pub fn rotation(&self, entity: Entity) -> Result<Euler, SceneError> {
        Ok(self.rotation[self.check(entity)?])
    }

    /// Overwrite the Euler angles. The quaternion is not derived until
    /// [`TransformStore::set_quaternion_from_euler`] runs.
    pub fn set_rotation(&mut self, entity: Entity, rotation: Euler) -> Result<(), SceneError> {
        let i = self.check(entity)?;
        self.rotation[i] = rotation;
        Ok(())
    }

    pub fn quaternion(&self, entity: Entity) -> Result<Quat, SceneError> {
        Ok(self.quaternion[self.check(entity)?])
    }

    pub fn set_quaternion(&mut self, entity: Entity, quaternion: Quat) -> Result<(), SceneError> {
        let i = self.check(entity)?;
        self.quaternion[i] = quaternion;
        Ok(())
    }

    pub fn scale(&self, entity: Entity) -> Result<Vec3, SceneError> {
        Ok(self.scale[self.check(entity)?])
    }

    pub fn set_scale(&mut self, entity: Entity, scale: Vec3) -> Result<(), SceneError> {
        let i = self.check(entity)?;
        self.scale[i] = scale;
        Ok(())
    }

    pub fn is_static(&self, entity: Entity) -> Result<bool, SceneError> {
        Ok(self.is_static[self.check(entity)?])
    }

    /// Static entities keep their local matrix; only the world matrix is
    /// recomposed under a moving ancestor
    pub fn set_static(&mut self, entity: Entity, is_static: bool) -> Result<(), SceneError> {
        let i = self.check(entity)?;
        self.is_static[i] = is_static;
        Ok(())
    }

    // --- derived state ---

    pub fn local_matrix(&self, entity: Entity) -> Result<&Mat4, SceneError> {
        Ok(&self.local_matrix[self.check(entity)?])
    }

    pub fn world_matrix(&self, entity: Entity) -> Result<&Mat4, SceneError> {
        Ok(&self.world_matrix[self.check(entity)?])
    }

    /// World-space translation taken from the cached world matrix
    pub fn world_translation(&self, entity: Entity) -> Result<Vec3, SceneError> {
        Ok(mat4::get_translation(self.world_matrix(entity)?))
    }

    pub fn world_matrix_needs_update(&self, entity: Entity) -> Result<bool, SceneError> {
        Ok(self.needs_update[self.check(entity)?])
    }

    /// Flag the world matrix stale without recomposing anything
    pub fn mark_dirty(&mut self, entity: Entity) -> Result<(), SceneError> {
        let i = self.check(entity)?;
        self.needs_update[i] = true;
        Ok(())
    }

    // --- tree links ---

    pub fn parent(&self, entity: Entity) -> Result<Entity, SceneError> {
        Ok(self.parent[self.check(entity)?])
    }

    pub fn first_child(&self, entity: Entity) -> Result<Entity, SceneError> {
        Ok(self.first_child[self.check(entity)?])
    }

    pub fn prev_sibling(&self, entity: Entity) -> Result<Entity, SceneError> {
        Ok(self.prev_sibling[self.check(entity)?])
    }

    pub fn next_sibling(&self, entity: Entity) -> Result<Entity, SceneError> {
        Ok(self.next_sibling[self.check(entity)?])
    }
}
