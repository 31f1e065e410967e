//! Collision detection
//!
//! Provides narrow-phase tests between spheres and AABBs, and collision
//! filtering via layer masks.

use bitflags::bitflags;

use crate::shapes::{Aabb, Collider, Sphere};
use strata_math::Vec3;

bitflags! {
    /// Collision layers for filtering which bodies can collide
    ///
    /// Each layer is a bit in a 32-bit mask. Bodies can belong to multiple layers
    /// and define which layers they collide with via a collision mask.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CollisionLayer: u32 {
        /// Default layer for most bodies
        const DEFAULT = 1 << 0;
        /// Static world geometry (floors, walls)
        const STATIC = 1 << 1;
        /// Bodies driven by a remote peer
        const REMOTE = 1 << 2;
        /// Props and debris
        const PROP = 1 << 3;
        /// All layers (collide with everything)
        const ALL = 0xFFFFFFFF;
    }
}

/// Collision filter determining what a body collides with
///
/// Two bodies A and B collide if:
/// - (A.layer & B.mask) != 0, AND
/// - (B.layer & A.mask) != 0
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionFilter {
    /// Which layer(s) this body belongs to
    pub layer: CollisionLayer,
    /// Which layer(s) this body can collide with
    pub mask: CollisionLayer,
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self {
            layer: CollisionLayer::DEFAULT,
            mask: CollisionLayer::ALL,
        }
    }
}

impl CollisionFilter {
    pub fn new(layer: CollisionLayer, mask: CollisionLayer) -> Self {
        Self { layer, mask }
    }

    /// Check if this filter allows collision with another filter
    pub fn collides_with(&self, other: &Self) -> bool {
        self.layer.intersects(other.mask) && other.layer.intersects(self.mask)
    }

    /// Filter for static world geometry
    pub fn static_world() -> Self {
        Self {
            layer: CollisionLayer::STATIC,
            mask: CollisionLayer::ALL & !CollisionLayer::STATIC,
        }
    }

    /// Filter for bodies whose transform comes from a remote peer
    ///
    /// Remote bodies ignore each other; their owners resolve those pairs.
    pub fn remote() -> Self {
        Self {
            layer: CollisionLayer::REMOTE,
            mask: CollisionLayer::ALL & !CollisionLayer::REMOTE,
        }
    }

    /// Filter for props that should ignore each other
    pub fn prop() -> Self {
        Self {
            layer: CollisionLayer::PROP,
            mask: CollisionLayer::ALL & !CollisionLayer::PROP,
        }
    }
}

/// Contact information from a collision
#[derive(Clone, Copy, Debug)]
pub struct Contact {
    /// Point of contact
    pub point: Vec3,
    /// Normal pointing from the second shape toward the first
    pub normal: Vec3,
    /// Penetration depth (positive means overlapping)
    pub penetration: f32,
}

impl Contact {
    pub fn new(point: Vec3, normal: Vec3, penetration: f32) -> Self {
        Self {
            point,
            normal,
            penetration,
        }
    }

    /// Check if this represents an actual collision (positive penetration)
    pub fn is_colliding(&self) -> bool {
        self.penetration > 0.0
    }

    fn flipped(mut self) -> Self {
        self.normal = -self.normal;
        self
    }
}

/// Test sphere vs sphere collision
///
/// The contact normal points from `b` toward `a`.
pub fn sphere_vs_sphere(a: &Sphere, b: &Sphere) -> Option<Contact> {
    let delta = a.center - b.center;
    let dist_sq = delta.length_squared();
    let min_dist = a.radius + b.radius;

    if dist_sq >= min_dist * min_dist {
        return None;
    }

    let dist = dist_sq.sqrt();
    // Concentric spheres have no meaningful direction; push up.
    let normal = if dist > 0.0001 { delta / dist } else { Vec3::Y };
    let point = b.center + normal * b.radius;
    Some(Contact::new(point, normal, min_dist - dist))
}

/// Test sphere vs AABB collision
///
/// The contact normal points from the AABB toward the sphere.
pub fn sphere_vs_aabb(sphere: &Sphere, aabb: &Aabb) -> Option<Contact> {
    let closest = aabb.closest_point(sphere.center);
    let delta = sphere.center - closest;
    let dist_squared = delta.length_squared();

    if dist_squared >= sphere.radius * sphere.radius {
        return None;
    }

    let dist = dist_squared.sqrt();
    let penetration = sphere.radius - dist;

    let normal = if dist > 0.0001 {
        delta.normalized()
    } else {
        // Sphere center is inside the AABB - use the shortest escape direction
        let to_min = sphere.center - aabb.min;
        let to_max = aabb.max - sphere.center;
        let candidates = [
            (to_min.x, -Vec3::X),
            (to_max.x, Vec3::X),
            (to_min.y, -Vec3::Y),
            (to_max.y, Vec3::Y),
            (to_min.z, -Vec3::Z),
            (to_max.z, Vec3::Z),
        ];
        candidates
            .iter()
            .fold(candidates[0], |best, &c| if c.0 < best.0 { c } else { best })
            .1
    };

    Some(Contact::new(closest, normal, penetration))
}

/// Test AABB vs AABB collision
///
/// The contact normal points from `b` toward `a` along the axis of least overlap.
pub fn aabb_vs_aabb(a: &Aabb, b: &Aabb) -> Option<Contact> {
    if a.max.x < b.min.x || a.min.x > b.max.x {
        return None;
    }
    if a.max.y < b.min.y || a.min.y > b.max.y {
        return None;
    }
    if a.max.z < b.min.z || a.min.z > b.max.z {
        return None;
    }

    let overlap_x = (a.max.x.min(b.max.x) - a.min.x.max(b.min.x)).max(0.0);
    let overlap_y = (a.max.y.min(b.max.y) - a.min.y.max(b.min.y)).max(0.0);
    let overlap_z = (a.max.z.min(b.max.z) - a.min.z.max(b.min.z)).max(0.0);

    let (ca, cb) = (a.center(), b.center());

    let mut min_overlap = overlap_x;
    let mut normal = if ca.x < cb.x { -Vec3::X } else { Vec3::X };

    if overlap_y < min_overlap {
        min_overlap = overlap_y;
        normal = if ca.y < cb.y { -Vec3::Y } else { Vec3::Y };
    }
    if overlap_z < min_overlap {
        min_overlap = overlap_z;
        normal = if ca.z < cb.z { -Vec3::Z } else { Vec3::Z };
    }

    let overlap_min = a.min.max_components(b.min);
    let overlap_max = a.max.min_components(b.max);
    let point = (overlap_min + overlap_max) * 0.5;

    Some(Contact::new(point, normal, min_overlap))
}

/// Dispatch on collider types. The normal points from `b` toward `a`.
pub fn collide(a: &Collider, b: &Collider) -> Option<Contact> {
    match (a, b) {
        (Collider::Sphere(sa), Collider::Sphere(sb)) => sphere_vs_sphere(sa, sb),
        (Collider::Sphere(s), Collider::Aabb(bx)) => sphere_vs_aabb(s, bx),
        (Collider::Aabb(bx), Collider::Sphere(s)) => sphere_vs_aabb(s, bx).map(Contact::flipped),
        (Collider::Aabb(ba), Collider::Aabb(bb)) => aabb_vs_aabb(ba, bb),
    }
}
