//! Local and world matrix composition
//!
//! Two ways to resolve world matrices:
//! - [`TransformStore::update_world_recursive`] resolves one entity on demand,
//!   optionally pulling its ancestors and pushing to its descendants.
//! - [`TransformStore::update_world_lazy`] is the once-per-tick pass from a
//!   root. It walks the whole subtree but only recomposes world matrices
//!   where the entity is dirty or an ancestor was recomposed.

use serde::{Serialize, Deserialize};
use strata_math::mat4;

use crate::{Entity, SceneError, TransformStore};

/// What happens to `world_matrix_needs_update` once a world matrix is recomposed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirtyFlagPolicy {
    /// Leave the flag set. Every entity that was ever dirty keeps being
    /// recomposed, which favours never missing an update.
    #[default]
    Retain,
    /// Clear the flag after recomposition so clean static subtrees are
    /// skipped on later passes
    ClearAfterUpdate,
}

impl TransformStore {
    /// Rebuild the local matrix from quaternion, position, and scale and mark
    /// the entity dirty
    pub fn compose_local(&mut self, entity: Entity) -> Result<(), SceneError> {
        let i = self.check(entity)?;
        self.compose_local_at(i);
        Ok(())
    }

    /// Resolve the world matrix of `entity` right now
    ///
    /// With `update_ancestors` the parent chain is resolved first (without
    /// touching the parents' other children). With `update_descendants` every
    /// child subtree is recomposed afterwards.
    pub fn update_world_recursive(
        &mut self,
        entity: Entity,
        update_ancestors: bool,
        update_descendants: bool,
    ) -> Result<(), SceneError> {
        let i = self.check_real(entity)?;
        self.update_world_recursive_at(i, update_ancestors, update_descendants);
        Ok(())
    }

    /// Dirty-flag driven pass over the subtree rooted at `entity`
    pub fn update_world_lazy(&mut self, entity: Entity, force: bool) -> Result<(), SceneError> {
        let i = self.check_real(entity)?;
        self.update_world_lazy_at(i, force);
        Ok(())
    }

    fn compose_local_at(&mut self, i: usize) {
        self.local_matrix[i] = mat4::from_rotation_translation_scale(
            self.quaternion[i],
            self.position[i],
            self.scale[i],
        );
        self.needs_update[i] = true;
    }

    fn compose_world_at(&mut self, i: usize) {
        let parent = self.parent[i];
        self.world_matrix[i] = if parent.is_noop() {
            self.local_matrix[i]
        } else {
            mat4::mul(self.world_matrix[parent.index()], self.local_matrix[i])
        };

        if self.dirty_policy == DirtyFlagPolicy::ClearAfterUpdate {
            self.needs_update[i] = false;
        }
    }

    fn update_world_recursive_at(&mut self, i: usize, ancestors: bool, descendants: bool) {
        let parent = self.parent[i];
        if ancestors && !parent.is_noop() {
            self.update_world_recursive_at(parent.index(), true, false);
        }

        if !self.is_static[i] {
            self.compose_local_at(i);
        }
        self.compose_world_at(i);

        if descendants {
            let mut child = self.first_child[i];
            while !child.is_noop() {
                self.update_world_recursive_at(child.index(), false, true);
                child = self.next_sibling[child.index()];
            }
        }
    }

    fn update_world_lazy_at(&mut self, i: usize, force: bool) {
        if !self.is_static[i] {
            self.compose_local_at(i);
        }

        let mut force = force;
        if self.needs_update[i] || force {
            self.compose_world_at(i);
            force = true;
        }

        let mut child = self.first_child[i];
        while !child.is_noop() {
            self.update_world_lazy_at(child.index(), force);
            child = self.next_sibling[child.index()];
        }
    }
}
