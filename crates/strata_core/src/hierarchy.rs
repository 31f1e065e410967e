//! Scene graph operations on the intrusive tree
//!
//! The tree lives entirely in the `parent`, `first_child`, `prev_sibling`,
//! and `next_sibling` columns of [`TransformStore`]. Children form a doubly
//! linked list in insertion order; there are no node objects.

use crate::{Entity, SceneError, TransformStore};

impl TransformStore {
    /// Append `child` to the end of `parent`'s child list
    ///
    /// `child` must not already have a parent; detach it first. Attaching a
    /// parented entity leaves the old parent's list pointing at it.
    ///
    /// The child is marked dirty, since its world matrix now depends on a
    /// different ancestor chain.
    pub fn attach(&mut self, parent: Entity, child: Entity) -> Result<(), SceneError> {
        let p = self.check_real(parent)?;
        let c = self.check_real(child)?;

        if !self.parent[c].is_noop() {
            log::warn!("attach: {} already has parent {}", child, self.parent[c]);
        }

        self.parent[c] = parent;

        let last = self.last_child(parent)?;
        if last.is_noop() {
            self.first_child[p] = child;
            self.prev_sibling[c] = Entity::NOOP;
        } else {
            self.next_sibling[last.index()] = child;
            self.prev_sibling[c] = last;
        }
        self.next_sibling[c] = Entity::NOOP;
        self.needs_update[c] = true;

        Ok(())
    }

    /// Unlink `child` from `parent`'s child list and clear its links
    ///
    /// The child becomes a root and is marked dirty.
    pub fn detach(&mut self, parent: Entity, child: Entity) -> Result<(), SceneError> {
        let p = self.check_real(parent)?;
        let c = self.check_real(child)?;

        if self.parent[c] != parent {
            log::warn!("detach: {} is not a child of {}", child, parent);
        }

        let prev = self.prev_sibling[c];
        let next = self.next_sibling[c];

        if self.first_child[p] == child {
            self.first_child[p] = next;
        }
        if !prev.is_noop() {
            self.next_sibling[prev.index()] = next;
        }
        if !next.is_noop() {
            self.prev_sibling[next.index()] = prev;
        }

        self.parent[c] = Entity::NOOP;
        self.prev_sibling[c] = Entity::NOOP;
        self.next_sibling[c] = Entity::NOOP;
        self.needs_update[c] = true;

        Ok(())
    }

    /// Last entry of `parent`'s child list, or NOOP
    pub fn last_child(&self, parent: Entity) -> Result<Entity, SceneError> {
        let mut child = self.first_child[self.check(parent)?];
        if child.is_noop() {
            return Ok(child);
        }
        loop {
            let next = self.next_sibling[child.index()];
            if next.is_noop() {
                return Ok(child);
            }
            child = next;
        }
    }

    /// The `index`-th child (zero based), or NOOP past the end of the list
    pub fn child_at(&self, parent: Entity, index: usize) -> Result<Entity, SceneError> {
        Ok(self.children(parent)?.nth(index).unwrap_or(Entity::NOOP))
    }

    /// Direct children of `parent` in sibling order
    pub fn children(&self, parent: Entity) -> Result<Children<'_>, SceneError> {
        let next = self.first_child[self.check(parent)?];
        Ok(Children { store: self, next })
    }

    /// Pre-order depth-first walk of the subtree rooted at `root`
    ///
    /// Uses only the link columns: descend through `first_child`, and when a
    /// subtree is exhausted climb `parent` until a `next_sibling` exists. The
    /// climb stops at `root`, so siblings of `root` are never visited.
    pub fn traverse<F>(&self, root: Entity, mut visit: F) -> Result<(), SceneError>
    where
        F: FnMut(Entity),
    {
        self.check_real(root)?;

        let mut entity = root;
        loop {
            visit(entity);

            let first = self.first_child[entity.index()];
            if !first.is_noop() {
                entity = first;
                continue;
            }

            loop {
                if entity == root || entity.is_noop() {
                    return Ok(());
                }
                let next = self.next_sibling[entity.index()];
                if !next.is_noop() {
                    entity = next;
                    break;
                }
                entity = self.parent[entity.index()];
            }
        }
    }

    /// Whether `entity` has a transform and no parent
    pub fn is_root(&self, entity: Entity) -> bool {
        self.contains(entity) && self.parent[entity.index()].is_noop()
    }

    /// Every initialized entity without a parent, in id order
    pub fn roots(&self) -> impl Iterator<Item = Entity> + '_ {
        (1..self.capacity())
            .map(|i| Entity::from_raw(i as u32))
            .filter(move |&e| self.is_root(e))
    }
}

/// Iterator over the direct children of one entity
///
/// Single pass; call [`TransformStore::children`] again to restart.
pub struct Children<'a> {
    store: &'a TransformStore,
    next: Entity,
}

impl Iterator for Children<'_> {
    type Item = Entity;

    fn next(&mut self) -> Option<Entity> {
        if self.next.is_noop() {
            return None;
        }
        let current = self.next;
        self.next = self.store.next_sibling[current.index()];
        Some(current)
    }
}
