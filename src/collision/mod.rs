/*!
Collision root module.

The character body consumes collision queries through the
[`CollisionBackend`] trait; the submodules implement a reference backend
over static geometry using parry3d for the narrow phase:

- types:        shared data types (Transform, StaticShape, CapsuleSpec, ...)
- broad:        broad-phase helpers (swept AABBs, candidate queries)
- narrow_phase: thin wrappers over parry3d queries (shape casts, rays)
- sweep:        sweep-and-slide resolution with contact reporting
- world:        `StaticWorld`, the bundled `CollisionBackend`
*/

pub mod broad;
pub mod narrow_phase;
pub mod sweep;
pub mod types;
pub mod world;

pub use sweep::{SweepRequest, sweep_capsule};
pub use types::{
    CapsuleSpec, CastHit, ColliderId, ContactFlags, ContactRegion, HitInfo, Quat, RayHit,
    StaticShape, SweepOutcome, Transform, Vec3,
};
pub use world::StaticWorld;

/// Collision queries a character body needs from its world.
///
/// The body calls `sweep_move` exactly once per step with the
/// displacement it wants to make, and `cast_ray` for the downward slope
/// check. Implementations decide how geometry is stored and which
/// contacts count as walkable support.
pub trait CollisionBackend {
    /// Resolve a capsule translation against the world, sliding along
    /// obstacles. `start` is the capsule center; the outcome carries the
    /// final center, the touched contact regions and one `HitInfo` per
    /// resolved contact, in resolution order.
    fn sweep_move(&self, capsule: &CapsuleSpec, start: Vec3, displacement: Vec3) -> SweepOutcome;

    /// Nearest surface hit along a ray. `direction` must be unit length;
    /// `max_distance` bounds the search (meters).
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit>;
}

/// Convenience: build a `StaticShape::Plane` from a world-space pose:
/// - normal = rotation * +Y
/// - dist = dot(normal, translation) + optional offset
#[inline]
pub fn plane_from_pose(rotation: Quat, translation: Vec3, offset_along_normal: f32) -> StaticShape {
    let normal = rotation * Vec3::new(0.0, 1.0, 0.0);
    let dist = normal.dot(&translation) + offset_along_normal;
    StaticShape::Plane { normal, dist }
}

/// Convenience: build a `StaticShape::Cuboid` with given half extents and pose.
#[inline]
pub fn cuboid_from_pose(half_extents: Vec3, translation: Vec3, rotation: Quat) -> StaticShape {
    StaticShape::Cuboid {
        half_extents,
        transform: Transform {
            translation,
            rotation,
        },
    }
}
