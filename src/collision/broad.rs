/*!
Broad-phase pruning over immutable world statics.

Finite shapes (cuboid, sphere, capsule) are indexed by world-space AABB
in a BVH; planes are infinite and kept in a separate list that queries
always test. Query results are indices into the original shape slice.
*/

use nalgebra as na;
use parry3d::{
    bounding_volume::Aabb,
    partitioning::{Bvh, BvhBuildStrategy},
    shape as pshape,
};

use super::types::{StaticShape, Vec3};

/// Acceleration structure for one immutable set of statics.
#[derive(Debug)]
pub struct WorldAccel {
    /// BVH over the finite shapes' AABBs.
    pub bvh: Bvh,
    /// Maps BVH leaf order back to indices in the shape slice.
    pub non_plane_indices: Vec<usize>,
    /// Indices of the planes in the shape slice.
    pub plane_indices: Vec<usize>,
}

/// Build the accelerator for a slice of statics.
pub fn build_world_accel(statics: &[StaticShape]) -> WorldAccel {
    let mut aabbs: Vec<Aabb> = Vec::new();
    let mut non_plane_indices: Vec<usize> = Vec::new();
    let mut plane_indices: Vec<usize> = Vec::new();

    for (i, shape) in statics.iter().enumerate() {
        match shape_aabb(shape) {
            None => plane_indices.push(i),
            Some(aabb) => {
                aabbs.push(aabb);
                non_plane_indices.push(i);
            }
        }
    }

    WorldAccel {
        bvh: Bvh::from_leaves(BvhBuildStrategy::Binned, &aabbs),
        non_plane_indices,
        plane_indices,
    }
}

/// World-space AABB of a finite shape; `None` for infinite planes.
fn shape_aabb(shape: &StaticShape) -> Option<Aabb> {
    match *shape {
        StaticShape::Plane { .. } => None,
        StaticShape::Cuboid {
            half_extents,
            transform,
        } => Some(pshape::Cuboid::new(half_extents).aabb(&transform.iso())),
        StaticShape::Sphere { radius, transform } => {
            Some(pshape::Ball::new(radius).aabb(&transform.iso()))
        }
        StaticShape::Capsule {
            radius,
            half_height,
            transform,
        } => Some(pshape::Capsule::new_y(half_height, radius).aabb(&transform.iso())),
    }
}

/// Swept AABB for a Y-aligned capsule translating by `desired`, inflated
/// by `skin` to conservatively include near misses.
pub fn swept_capsule_aabb(
    capsule_half_height: f32,
    capsule_radius: f32,
    start_pos: Vec3,
    desired: Vec3,
    skin: f32,
) -> Aabb {
    let capsule = pshape::Capsule::new_y(capsule_half_height, capsule_radius);

    let start = capsule.aabb(&na::Isometry3::translation(
        start_pos.x,
        start_pos.y,
        start_pos.z,
    ));
    let end_pos = start_pos + desired;
    let end = capsule.aabb(&na::Isometry3::translation(end_pos.x, end_pos.y, end_pos.z));

    let mut swept = aabb_union(&start, &end);
    if skin > 0.0 {
        swept = aabb_inflate(&swept, skin);
    }

    swept
}

/// Conservative AABB around a ray segment of length `max_distance`.
pub fn ray_aabb(origin: Vec3, direction: Vec3, max_distance: f32) -> Aabb {
    let end = origin + direction * max_distance;
    Aabb {
        mins: na::Point3::new(
            origin.x.min(end.x),
            origin.y.min(end.y),
            origin.z.min(end.z),
        ),
        maxs: na::Point3::new(
            origin.x.max(end.x),
            origin.y.max(end.y),
            origin.z.max(end.z),
        ),
    }
}

/// Indices of the finite shapes whose AABB intersects `aabb`.
///
/// Returned indices reference the original `statics` slice, not the BVH
/// leaf order.
pub fn query_candidates(accel: &WorldAccel, aabb: &Aabb) -> Vec<usize> {
    accel
        .bvh
        .intersect_aabb(aabb)
        .map(|leaf_idx| accel.non_plane_indices[leaf_idx as usize])
        .collect()
}

fn aabb_union(a: &Aabb, b: &Aabb) -> Aabb {
    Aabb {
        mins: na::Point3::new(
            a.mins.x.min(b.mins.x),
            a.mins.y.min(b.mins.y),
            a.mins.z.min(b.mins.z),
        ),
        maxs: na::Point3::new(
            a.maxs.x.max(b.maxs.x),
            a.maxs.y.max(b.maxs.y),
            a.maxs.z.max(b.maxs.z),
        ),
    }
}

fn aabb_inflate(a: &Aabb, margin: f32) -> Aabb {
    let delta = na::Vector3::new(margin, margin, margin);
    Aabb {
        mins: a.mins - delta,
        maxs: a.maxs + delta,
    }
}
