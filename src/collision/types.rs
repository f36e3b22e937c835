/*!
Data types exchanged between the collision submodules and the body.

No algorithms here. The broad phase, narrow phase and sweep communicate
through these types, and bodies consume `SweepOutcome` and `RayHit`
through the `CollisionBackend` trait.
*/

use nalgebra as na;

use crate::flags::{BitmaskFlags, FlagBitmask};

pub use crate::math::{Iso, Quat, Vec3};

/// Stable identifier of one static collider within a world.
pub type ColliderId = u32;

/// A rigid transform (isometry) in world space.
#[derive(Clone, Copy, Debug)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Transform {
    #[inline]
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// Convert to a nalgebra `Isometry3` for parry3d queries.
    #[inline]
    pub fn iso(&self) -> Iso {
        Iso::from_parts(na::Translation3::from(self.translation), self.rotation)
    }
}

/// Static collision shapes supported by the world.
#[derive(Clone, Copy, Debug)]
pub enum StaticShape {
    Plane {
        /// World-space unit normal.
        normal: Vec3,
        /// Offset along the normal, so points x on the plane satisfy
        /// `normal . x = dist`.
        dist: f32,
    },
    Cuboid {
        /// Local-space half-extents.
        half_extents: Vec3,
        /// World-space pose.
        transform: Transform,
    },
    Sphere {
        radius: f32,
        /// World-space pose (rotation has no effect).
        transform: Transform,
    },
    Capsule {
        /// Radius of the caps and the cylinder.
        radius: f32,
        /// Half-length of the cylinder section along local +Y.
        half_height: f32,
        /// World-space pose.
        transform: Transform,
    },
}

/// Capsule dimensions for a kinematic body.
///
/// `half_height` is the half-length of the cylinder section (local +Y),
/// so the total capsule height is `2 * half_height + 2 * radius`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CapsuleSpec {
    pub radius: f32,
    pub half_height: f32,
}

impl CapsuleSpec {
    /// Derive the capsule dimensions from a total height and radius.
    ///
    /// Heights below `2 * radius` collapse the cylinder section to zero,
    /// leaving a sphere.
    #[inline]
    pub fn from_full_height(height: f32, radius: f32) -> Self {
        Self {
            radius,
            half_height: (height * 0.5 - radius).max(0.0),
        }
    }
}

/// A contact found by casting the capsule against one static shape.
#[derive(Clone, Copy, Debug)]
pub struct CastHit {
    /// World-space contact normal, forced to oppose the cast direction.
    pub normal: Vec3,
    /// World-space contact point on the obstacle surface.
    pub point: Vec3,
    /// Fraction (0 to 1) of the tested translation where contact occurs.
    pub fraction: f32,
}

/// Nearest hit of a ray query.
#[derive(Clone, Copy, Debug)]
pub struct RayHit {
    /// World-space impact point.
    pub point: Vec3,
    /// World-space surface normal at the impact.
    pub normal: Vec3,
}

/// One contact reported to `hit_collider` listeners during a sweep.
#[derive(Clone, Copy, Debug)]
pub struct HitInfo {
    /// Identifier of the collider that was struck.
    pub collider: ColliderId,
    /// World-space contact normal, opposing the movement.
    pub normal: Vec3,
    /// World-space contact point on the collider surface.
    pub point: Vec3,
    /// Distance traveled along the slide segment when contact occurred
    /// (meters).
    pub distance: f32,
    /// Unit direction of the slide segment that produced the contact.
    pub movement_direction: Vec3,
}

/// Capsule regions touched during a sweep, classified by contact normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ContactRegion {
    /// Mostly lateral contact: walls and steep slopes.
    Side = 0,
    /// Overhead contact, with the normal facing downward.
    Above = 1,
    /// Walkable support under the capsule.
    Below = 2,
}

impl FlagBitmask for ContactRegion {
    type Storage = u8;

    fn bit_index(&self) -> u8 {
        *self as u8
    }
}

/// Bitmask of the contact regions touched by one sweep.
pub type ContactFlags = BitmaskFlags<u8>;

/// Result of one collision-resolved move.
#[derive(Clone, Debug)]
pub struct SweepOutcome {
    /// Final capsule center.
    pub end_pos: Vec3,
    /// Regions touched along the way.
    pub flags: ContactFlags,
    /// Contacts in resolution order.
    pub hits: Vec<HitInfo>,
    /// Translation that could not be consumed (zero on an unobstructed
    /// move).
    pub remaining: Vec3,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capsule_spec_from_full_height() {
        let spec = CapsuleSpec::from_full_height(2.0, 0.5);
        assert!((spec.half_height - 0.5).abs() < 1.0e-6);
        assert!((spec.radius - 0.5).abs() < 1.0e-6);
    }

    #[test]
    fn capsule_spec_collapses_to_sphere() {
        // Height shorter than the two caps leaves no cylinder section.
        let spec = CapsuleSpec::from_full_height(0.8, 0.5);
        assert!(spec.half_height.abs() < 1.0e-6);
    }

    #[test]
    fn contact_regions_use_distinct_bits() {
        assert_eq!(ContactRegion::Side.mask(), 0b001);
        assert_eq!(ContactRegion::Above.mask(), 0b010);
        assert_eq!(ContactRegion::Below.mask(), 0b100);
    }

    #[test]
    fn transform_iso_applies_rotation_then_translation() {
        let quarter = Quat::from_axis_angle(&Vec3::y_axis(), std::f32::consts::FRAC_PI_2);
        let t = Transform::new(Vec3::new(1.0, 2.0, 3.0), quarter);

        let p = t.iso() * na::Point3::new(0.0, 0.0, 1.0);

        // +Z rotates onto +X before the translation applies.
        assert!((p.coords - Vec3::new(2.0, 2.0, 3.0)).norm() < 1.0e-5);
    }
}
