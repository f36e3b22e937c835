/*!
Reference collision backend over a fixed set of static shapes.

`StaticWorld` owns the shapes, their ids and the broad-phase accelerator,
and implements `CollisionBackend` on top of the sweep and narrow-phase
modules. After any non-upward move it probes straight down for walkable
support and keeps the capsule hovering a small fixed height above it, so
a grounded body neither floats off ramps nor oscillates against them.
*/

use super::{
    CollisionBackend, broad, narrow_phase, sweep,
    types::{CapsuleSpec, ColliderId, ContactRegion, RayHit, StaticShape, SweepOutcome, Vec3},
};
use crate::settings::{DEFAULT_SKIN, GROUND_PROBE_DISTANCE, MAX_SLOPE_COS, PROBE_HOVER_HEIGHT};

/// Immutable world geometry with stable collider ids.
#[derive(Debug)]
pub struct StaticWorld {
    shapes: Vec<StaticShape>,
    ids: Vec<ColliderId>,
    accel: broad::WorldAccel,
}

impl StaticWorld {
    /// Build a world from `(id, shape)` pairs, panicking on a repeated id.
    /// Use [`StaticWorld::try_new`] to handle the error instead.
    pub fn new(colliders: Vec<(ColliderId, StaticShape)>) -> Self {
        Self::try_new(colliders).expect("invalid collider set")
    }

    /// The build order is normalized by sorting on id so query results
    /// are deterministic regardless of insertion order.
    pub fn try_new(mut colliders: Vec<(ColliderId, StaticShape)>) -> Result<Self, String> {
        colliders.sort_by_key(|(id, _)| *id);
        if let Some(pair) = colliders.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(format!("duplicate collider id {}", pair[0].0));
        }

        let ids = colliders.iter().map(|(id, _)| *id).collect();
        let shapes: Vec<StaticShape> = colliders.into_iter().map(|(_, shape)| shape).collect();
        let accel = broad::build_world_accel(&shapes);

        Ok(Self { shapes, ids, accel })
    }

    /// Build a world assigning sequential ids in iteration order.
    pub fn from_shapes(shapes: impl IntoIterator<Item = StaticShape>) -> Self {
        Self::new(
            shapes
                .into_iter()
                .enumerate()
                .map(|(i, shape)| (i as ColliderId, shape))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Probe straight down for support under the capsule. On a hit,
    /// returns the hovered center and the support normal.
    ///
    /// The hover is applied vertically, not along the contact normal, so
    /// a capsule at rest on a ramp does not creep sideways.
    fn probe_support(&self, capsule: &CapsuleSpec, pos: Vec3) -> Option<(Vec3, Vec3)> {
        let probe = Vec3::new(0.0, -(GROUND_PROBE_DISTANCE + PROBE_HOVER_HEIGHT), 0.0);
        let (_, hit) =
            sweep::best_capsule_hit(&self.shapes, &self.accel, *capsule, pos, probe, 0.0)?;

        let impact_center = pos + probe * hit.fraction;
        let snapped = Vec3::new(pos.x, impact_center.y + PROBE_HOVER_HEIGHT, pos.z);

        Some((snapped, hit.normal))
    }
}

impl CollisionBackend for StaticWorld {
    fn sweep_move(&self, capsule: &CapsuleSpec, start: Vec3, displacement: Vec3) -> SweepOutcome {
        let req = sweep::SweepRequest::with_defaults(start, displacement, *capsule);
        let mut outcome = sweep::sweep_capsule(&self.shapes, &self.ids, &self.accel, req);

        // Keep walkable support under landings and horizontal movement.
        // Upward moves skip the probe so jumps separate cleanly.
        if displacement.y <= DEFAULT_SKIN {
            if let Some((snapped, normal)) = self.probe_support(capsule, outcome.end_pos) {
                if normal.y >= MAX_SLOPE_COS {
                    outcome.end_pos = snapped;
                    outcome.flags.add(ContactRegion::Below);
                }
            }
        }

        outcome
    }

    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let mut best: Option<(f32, RayHit)> = None;
        let mut consider = |idx: usize| {
            let shape = &self.shapes[idx];
            if let Some(hit) =
                narrow_phase::cast_ray_against_static(origin, direction, max_distance, shape)
            {
                let dist_sq = (hit.point - origin).norm_squared();
                if best.map_or(true, |(b, _)| dist_sq < b) {
                    best = Some((dist_sq, hit));
                }
            }
        };

        for &idx in &self.accel.plane_indices {
            consider(idx);
        }
        let segment = broad::ray_aabb(origin, direction, max_distance);
        for idx in broad::query_candidates(&self.accel, &segment) {
            consider(idx);
        }

        best.map(|(_, hit)| hit)
    }
}
