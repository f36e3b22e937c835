/*!
Kinematic sweep-and-slide for a capsule against world statics.

The capsule is shape-cast along the desired translation. On contact it
advances to just before the hit (minus the skin), removes the normal
component from the leftover translation and repeats, up to
`max_iterations` segments for corners. Every contact is recorded as a
`HitInfo` carrying the struck collider's id and classified into the
below/above/side regions by its normal.
*/

use parry3d::shape as pshape;

use super::{
    broad, narrow_phase,
    types::{
        CapsuleSpec, CastHit, ColliderId, ContactFlags, ContactRegion, HitInfo, Iso, StaticShape,
        SweepOutcome, Vec3,
    },
};
use crate::settings::{DEFAULT_MAX_ITERATIONS, DEFAULT_SKIN, MAX_SLOPE_COS, MIN_MOVE_SQ};

/// Parameters for a single collision-resolved move.
#[derive(Clone, Copy, Debug)]
pub struct SweepRequest {
    /// Starting world position of the capsule's center.
    pub start_pos: Vec3,
    /// Desired world-space translation for this step (meters).
    pub desired_translation: Vec3,
    /// Capsule dimensions of the moving body.
    pub capsule: CapsuleSpec,
    /// Separation kept from surfaces to avoid jitter (meters).
    pub skin: f32,
    /// Maximum slide segments resolved per move (for corners).
    pub max_iterations: u32,
}

impl SweepRequest {
    #[inline]
    pub fn with_defaults(start_pos: Vec3, desired_translation: Vec3, capsule: CapsuleSpec) -> Self {
        Self {
            start_pos,
            desired_translation,
            capsule,
            skin: DEFAULT_SKIN,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Earliest capsule contact across the planes and the broad-phase
/// candidates, as `(shape_index, hit)`.
pub(crate) fn best_capsule_hit(
    statics: &[StaticShape],
    accel: &broad::WorldAccel,
    capsule: CapsuleSpec,
    pos: Vec3,
    vel: Vec3,
    skin: f32,
) -> Option<(usize, CastHit)> {
    let capsule_shape = pshape::Capsule::new_y(capsule.half_height, capsule.radius);
    // The capsule pose carries no rotation; the controller axis is +Y.
    let capsule_iso: Iso = Iso::translation(pos.x, pos.y, pos.z);

    let swept = broad::swept_capsule_aabb(capsule.half_height, capsule.radius, pos, vel, skin);

    let mut best: Option<(usize, CastHit)> = None;
    let mut consider = |idx: usize| {
        if let Some(hit) = narrow_phase::cast_capsule_against_static(
            capsule_iso,
            &capsule_shape,
            vel,
            1.0,
            &statics[idx],
        ) {
            if best.map_or(true, |(_, b)| hit.fraction < b.fraction) {
                best = Some((idx, hit));
            }
        }
    };

    // Planes are infinite and always tested; finite shapes come from the
    // broad phase.
    for &idx in &accel.plane_indices {
        consider(idx);
    }
    for idx in broad::query_candidates(accel, &swept) {
        consider(idx);
    }

    best
}

/// Sweep-and-slide a capsule through `statics`.
///
/// `ids` parallels `statics` and supplies the collider ids reported in
/// the outcome's hits.
pub fn sweep_capsule(
    statics: &[StaticShape],
    ids: &[ColliderId],
    accel: &broad::WorldAccel,
    req: SweepRequest,
) -> SweepOutcome {
    let mut pos = req.start_pos;
    let mut remaining = req.desired_translation;
    let mut flags = ContactFlags::default();
    let mut hits: Vec<HitInfo> = Vec::new();

    for _ in 0..req.max_iterations {
        if remaining.norm_squared() <= MIN_MOVE_SQ {
            break;
        }

        let len = remaining.norm();
        let dir = remaining / len;

        match best_capsule_hit(statics, accel, req.capsule, pos, remaining, req.skin) {
            None => {
                pos += remaining;
                remaining = Vec3::zeros();
                break;
            }
            Some((idx, hit)) => {
                // Travel up to the contact, then back off by the skin.
                let travel = (len * hit.fraction).max(0.0);
                let advance = dir * (travel - req.skin).max(0.0);
                pos += advance;

                flags.add(classify_contact(hit.normal));
                hits.push(HitInfo {
                    collider: ids[idx],
                    normal: hit.normal,
                    point: hit.point,
                    distance: travel,
                    movement_direction: dir,
                });
                log::trace!(
                    "sweep hit collider {} at fraction {:.3}",
                    ids[idx],
                    hit.fraction
                );

                // Slide: remove the normal component from the leftover.
                let n = hit.normal.try_normalize(1.0e-6).unwrap_or_else(Vec3::zeros);
                let leftover = dir * (len - travel);
                let slide = leftover - n * leftover.dot(&n);

                remaining = slide;
                if slide.norm_squared() <= MIN_MOVE_SQ {
                    break;
                }
            }
        }
    }

    SweepOutcome {
        end_pos: pos,
        flags,
        hits,
        remaining,
    }
}

/// Classify a contact by how its normal relates to the capsule axis.
fn classify_contact(normal: Vec3) -> ContactRegion {
    if normal.y >= MAX_SLOPE_COS {
        ContactRegion::Below
    } else if normal.y <= -MAX_SLOPE_COS {
        ContactRegion::Above
    } else {
        ContactRegion::Side
    }
}
