//! Kinematic character body.
//!
//! # Model
//! - `position` is the capsule center in world space; the capsule axis
//!   follows the body's rotation (up is rotation * +Y).
//! - Controllers write velocity and rotation during the step window;
//!   `step()` turns the velocity into displacement, resolves it against
//!   the collision backend and derives the grounded state from the
//!   resulting contact flags.
//! - `move_by`/`move_to` queue extra displacement into the same
//!   accumulator the velocity integration feeds; the accumulator is
//!   consumed exactly once per step.
//!
//! # Step order
//! Within one fixed step the host runs the movement controller, then the
//! gravity controller, then `KinematicBody::step`. The body never invokes
//! the controllers itself.

use nalgebra as na;

use crate::collision::{CapsuleSpec, CollisionBackend, ContactRegion};
use crate::config::BodyConfig;
use crate::events::{EventHub, GroundListener, HitListener, SubscriptionId};
use crate::math::{Quat, Vec3};
use crate::settings::DIST_EPS;

/// Read/write contract between a character body and its controllers.
///
/// Controllers run before the body's step and talk to it only through
/// this trait: read state, write velocity and rotation, queue movement
/// and subscribe to events. Repositioning goes through `move_to` for
/// collision-resolved movement or `teleport_to` to bypass resolution.
pub trait CharacterBody {
    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, velocity: Vec3);

    /// Capsule center in world space.
    fn position(&self) -> Vec3;

    fn rotation(&self) -> Quat;
    fn set_rotation(&mut self, rotation: Quat);

    /// Whether the last step ended with walkable support under the body.
    fn is_touching_ground(&self) -> bool;

    /// Total capsule height, caps included (meters).
    fn height(&self) -> f32;

    /// Capsule radius (meters).
    fn radius(&self) -> f32;

    /// Queue a world-space displacement for the next step.
    fn move_by(&mut self, displacement: Vec3);

    /// Queue movement toward `position`, measured from the position at
    /// call time. Queued displacements stack.
    fn move_to(&mut self, position: Vec3);

    /// Reposition immediately and discard queued movement. No collision
    /// resolution, no events; velocity and the grounded flag are kept.
    fn teleport_to(&mut self, position: Vec3);

    fn on_started_touching_ground(&mut self, listener: GroundListener) -> SubscriptionId;
    fn on_stopped_touching_ground(&mut self, listener: GroundListener) -> SubscriptionId;
    fn on_hit_collider(&mut self, listener: HitListener) -> SubscriptionId;

    /// Remove a listener. Returns whether one was removed.
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;

    /// Body-space up axis in world space.
    fn up(&self) -> Vec3 {
        self.rotation() * Vec3::y()
    }

    /// Body-space forward axis (+Z at identity) in world space.
    fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::z()
    }

    /// Body-space right axis in world space.
    fn right(&self) -> Vec3 {
        self.rotation() * Vec3::x()
    }

    fn world_center(&self) -> Vec3 {
        self.position()
    }

    /// Top of the capsule in world space.
    fn world_top(&self) -> Vec3 {
        self.position() + self.up() * (self.height() * 0.5)
    }

    /// Bottom of the capsule in world space.
    fn world_bottom(&self) -> Vec3 {
        self.position() - self.up() * (self.height() * 0.5)
    }
}

/// Kinematic capsule body driven by velocity and queued displacement.
pub struct KinematicBody {
    config: BodyConfig,
    position: Vec3,
    rotation: Quat,
    velocity: Vec3,
    touching_ground: bool,
    pending_move: Vec3,
    events: EventHub,
}

impl KinematicBody {
    /// Build a body at `position`, panicking on an invalid configuration.
    /// Use [`KinematicBody::try_new`] to handle the error instead.
    pub fn new(config: BodyConfig, position: Vec3) -> Self {
        Self::try_new(config, position).expect("invalid body configuration")
    }

    pub fn try_new(config: BodyConfig, position: Vec3) -> Result<Self, String> {
        config.validate()?;
        Ok(Self {
            config,
            position,
            rotation: Quat::identity(),
            velocity: Vec3::zeros(),
            touching_ground: false,
            pending_move: Vec3::zeros(),
            events: EventHub::new(),
        })
    }

    pub fn config(&self) -> &BodyConfig {
        &self.config
    }

    /// Capsule dimensions used for collision queries.
    pub fn capsule(&self) -> CapsuleSpec {
        CapsuleSpec::from_full_height(self.config.height, self.config.radius)
    }

    /// Advance one fixed step of `dt` seconds against `world`.
    ///
    /// In order: correct the step velocity along a walkable slope when
    /// grounded and descending, integrate velocity into the pending
    /// accumulator, resolve the accumulated displacement with one sweep,
    /// report contacts, update the grounded state (firing transition
    /// events) and stop upward velocity on overhead contact.
    ///
    /// The slope correction adjusts only the displacement of this step;
    /// the stored velocity is never rewritten by it.
    pub fn step<W: CollisionBackend + ?Sized>(&mut self, world: &W, dt: f32) {
        let mut v = self.velocity;
        let mut did_stick_to_slope = false;

        if self.touching_ground && v.y < 0.0 {
            let up = self.up();
            let origin = self.world_bottom() + up * self.config.ground_check_start_height;
            let max_distance =
                self.config.ground_check_start_height + self.config.ground_check_distance;

            if let Some(hit) = world.cast_ray(origin, -up, max_distance) {
                if hit.point.y < self.world_bottom().y {
                    // Redirect the descent along the surface so the body
                    // follows the slope instead of stair-stepping off it.
                    v.y = 0.0;
                    let slope_angle = up.angle(&hit.normal);
                    if let Some(dir) = v.try_normalize(DIST_EPS) {
                        if let Some(axis) = na::Unit::try_new(dir.cross(&up), DIST_EPS) {
                            v = Quat::from_axis_angle(&axis, slope_angle) * v;
                            if v.y > 0.0 {
                                v.y = -v.y;
                            }
                        }
                    }
                    did_stick_to_slope = true;
                    log::trace!(
                        "slope stick redirected step velocity to ({:.3}, {:.3}, {:.3})",
                        v.x,
                        v.y,
                        v.z
                    );
                }
            }
        }

        self.move_by(v * dt);
        let displacement = self.pending_move;
        self.pending_move = Vec3::zeros();

        let outcome = world.sweep_move(&self.capsule(), self.position, displacement);
        self.position = outcome.end_pos;

        for hit in &outcome.hits {
            self.events.emit_hit_collider(hit);
        }

        let was_touching_ground = self.touching_ground;
        self.touching_ground = outcome.flags.has(ContactRegion::Below) || did_stick_to_slope;

        if self.touching_ground && !was_touching_ground {
            log::debug!("started touching ground at y {:.3}", self.position.y);
            self.events.emit_started_touching_ground();
        } else if !self.touching_ground && was_touching_ground {
            log::debug!("stopped touching ground at y {:.3}", self.position.y);
            self.events.emit_stopped_touching_ground();
        }

        if outcome.flags.has(ContactRegion::Above) && self.velocity.y > 0.0 {
            self.velocity.y = 0.0;
        }
    }
}

impl CharacterBody for KinematicBody {
    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    fn is_touching_ground(&self) -> bool {
        self.touching_ground
    }

    fn height(&self) -> f32 {
        self.config.height
    }

    fn radius(&self) -> f32 {
        self.config.radius
    }

    fn move_by(&mut self, displacement: Vec3) {
        self.pending_move += displacement;
    }

    fn move_to(&mut self, position: Vec3) {
        let displacement = position - self.position;
        self.pending_move += displacement;
    }

    fn teleport_to(&mut self, position: Vec3) {
        self.pending_move = Vec3::zeros();
        self.position = position;
        log::debug!(
            "teleport to ({:.3}, {:.3}, {:.3})",
            position.x,
            position.y,
            position.z
        );
    }

    fn on_started_touching_ground(&mut self, listener: GroundListener) -> SubscriptionId {
        self.events.on_started_touching_ground(listener)
    }

    fn on_stopped_touching_ground(&mut self, listener: GroundListener) -> SubscriptionId {
        self.events.on_stopped_touching_ground(listener)
    }

    fn on_hit_collider(&mut self, listener: HitListener) -> SubscriptionId {
        self.events.on_hit_collider(listener)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }
}
