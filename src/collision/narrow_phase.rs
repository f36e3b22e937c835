/*!
Narrow-phase queries against individual static shapes.

Capsule casts report the time of impact plus a world-space contact normal
and point; ray casts report the nearest intersection. Normals on capsule
casts are forced to oppose the cast direction so slide projection and
contact classification can rely on their sign.
*/

use nalgebra as na;
use parry3d::{
    query::{self, Ray, ShapeCastOptions},
    shape as pshape,
};

use super::types::{CastHit, Iso, RayHit, StaticShape, Vec3};

/// A static shape lowered to its parry representation and world pose.
struct NarrowShape {
    iso: Iso,
    kind: NarrowKind,
}

enum NarrowKind {
    Plane(pshape::HalfSpace),
    Cuboid(pshape::Cuboid),
    Ball(pshape::Ball),
    Capsule(pshape::Capsule),
}

impl NarrowShape {
    fn as_dyn(&self) -> &dyn pshape::Shape {
        match &self.kind {
            NarrowKind::Plane(shape) => shape,
            NarrowKind::Cuboid(shape) => shape,
            NarrowKind::Ball(shape) => shape,
            NarrowKind::Capsule(shape) => shape,
        }
    }
}

fn narrow_shape(shape: &StaticShape) -> NarrowShape {
    match *shape {
        StaticShape::Plane { normal, dist } => {
            // Plane equation in world space: normal . x = dist. The half
            // space sits at normal * dist with the world normal.
            let offset = normal * dist;
            NarrowShape {
                iso: Iso::translation(offset.x, offset.y, offset.z),
                kind: NarrowKind::Plane(pshape::HalfSpace {
                    normal: na::Unit::new_normalize(normal),
                }),
            }
        }
        StaticShape::Cuboid {
            half_extents,
            transform,
        } => NarrowShape {
            iso: transform.iso(),
            kind: NarrowKind::Cuboid(pshape::Cuboid::new(half_extents)),
        },
        StaticShape::Sphere { radius, transform } => NarrowShape {
            iso: transform.iso(),
            kind: NarrowKind::Ball(pshape::Ball::new(radius)),
        },
        StaticShape::Capsule {
            radius,
            half_height,
            transform,
        } => NarrowShape {
            iso: transform.iso(),
            kind: NarrowKind::Capsule(pshape::Capsule::new_y(half_height, radius)),
        },
    }
}

/// Cast a moving Y-aligned capsule against one static shape.
///
/// - `capsule_iso`: the capsule's starting isometry in world space.
/// - `vel`: the world-space translation tested by this cast (meters).
/// - `max_toi`: maximum fraction of `vel` to consider (typically 1.0).
///
/// The returned normal sits on the obstacle surface and opposes `vel`;
/// the returned point is the contact on the obstacle in world space.
pub fn cast_capsule_against_static(
    capsule_iso: Iso,
    capsule: &pshape::Capsule,
    vel: Vec3,
    max_toi: f32,
    shape: &StaticShape,
) -> Option<CastHit> {
    let target = narrow_shape(shape);

    let mut opts = ShapeCastOptions::with_max_time_of_impact(max_toi);
    opts.stop_at_penetration = true;

    let hit = match query::cast_shapes(
        &capsule_iso,
        &vel,
        capsule as &dyn pshape::Shape,
        &target.iso,
        &na::Vector3::zeros(),
        target.as_dyn(),
        opts,
    ) {
        Ok(Some(hit)) => hit,
        _ => return None,
    };

    // normal1 sits on the moving capsule; the capsule pose carries no
    // rotation, so the local normal already is the world normal.
    let mut normal = hit.normal1.into_inner();
    if normal.dot(&vel) > 0.0 {
        normal = -normal;
    }

    let point = (target.iso * hit.witness2).coords;

    Some(CastHit {
        normal,
        point,
        fraction: hit.time_of_impact,
    })
}

/// Cast a ray against one static shape and return the nearest surface hit
/// within `max_distance`, treating shapes as solid.
pub fn cast_ray_against_static(
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
    shape: &StaticShape,
) -> Option<RayHit> {
    let target = narrow_shape(shape);
    let ray = Ray::new(na::Point3::from(origin), direction);

    let hit = target
        .as_dyn()
        .cast_ray_and_get_normal(&target.iso, &ray, max_distance, true)?;

    Some(RayHit {
        point: ray.point_at(hit.time_of_impact).coords,
        normal: hit.normal,
    })
}
