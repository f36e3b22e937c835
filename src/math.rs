//! Math aliases and the small rotation helpers shared across the crate.

use nalgebra as na;

use crate::settings::YAW_EPS;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Iso = na::Isometry3<f32>;

/// Project onto the XZ plane by zeroing the vertical component.
#[inline]
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Yaw-only orientation (about +Y) facing `direction` on the XZ plane.
///
/// The forward axis is +Z, so `yaw_facing(Vec3::z())` is the identity.
/// Returns `None` when the planar part of `direction` is too small to
/// define a heading.
#[inline]
pub fn yaw_facing(direction: Vec3) -> Option<Quat> {
    let x = direction.x;
    let z = direction.z;
    if x * x + z * z <= YAW_EPS {
        return None;
    }

    Some(Quat::from_axis_angle(&Vec3::y_axis(), x.atan2(z)))
}

/// Rotate `current` toward `target` by at most `max_angle` radians.
///
/// Returns `target` exactly once the remaining angle fits within the step
/// and never overshoots. A non-positive `max_angle` leaves `current`
/// unchanged.
pub fn rotate_towards(current: Quat, target: Quat, max_angle: f32) -> Quat {
    if max_angle <= 0.0 {
        return current;
    }

    let delta = current.rotation_to(&target);
    let angle = delta.angle();
    if angle <= max_angle {
        return target;
    }

    let step = Quat::from_scaled_axis(delta.scaled_axis() * (max_angle / angle));
    step * current
}
