//! Horizontal locomotion: acceleration, deceleration and turning.
//!
//! The controller never integrates positions. It reads and writes the
//! body's velocity (and rotation) through [`CharacterBody`] and leaves the
//! collision-resolved integration to the body's own step.

use crate::body::CharacterBody;
use crate::config::{MovementConfig, RotationTarget};
use crate::math::{Vec3, horizontal, rotate_towards, yaw_facing};
use crate::settings::SPEED_EPS;

/// Turns directional input into horizontal velocity changes.
///
/// Call [`accelerate`](MovementController::accelerate) any number of times
/// during a step, then [`step`](MovementController::step) once before the
/// body resolves movement; `step` bleeds speed off on steps without input.
pub struct MovementController {
    pub config: MovementConfig,
    accelerated_this_step: bool,
}

impl MovementController {
    /// Build a controller, panicking on an invalid configuration.
    /// Use [`MovementController::try_new`] to handle the error instead.
    pub fn new(config: MovementConfig) -> Self {
        Self::try_new(config).expect("invalid movement configuration")
    }

    pub fn try_new(config: MovementConfig) -> Result<Self, String> {
        config.validate()?;
        Ok(Self {
            config,
            accelerated_this_step: false,
        })
    }

    /// Accelerate the body horizontally toward `direction`.
    ///
    /// `direction` is used as given (not normalized) with its vertical
    /// component ignored; `strength` scales the target speed, so a
    /// half-strength input cruises at half the top speed. The resulting
    /// planar speed is shaped in order:
    ///
    /// 1. crossing the target speed from below clamps to it exactly,
    /// 2. speed above the target bleeds off at the deceleration rate,
    ///    without dropping below the target,
    /// 3. speed at or above the top running speed caps to it instantly.
    ///
    /// Airborne bodies accelerate at the configured air-control fraction.
    /// A zero `strength`, or a result too small to carry a direction,
    /// leaves the body untouched. When turning is enabled the body also
    /// rotates toward its heading, rate limited by `rotation_speed`.
    pub fn accelerate<B: CharacterBody + ?Sized>(
        &mut self,
        body: &mut B,
        direction: Vec3,
        strength: f32,
        dt: f32,
    ) {
        if strength == 0.0 {
            return;
        }

        let velocity = body.velocity();
        let mut planar = horizontal(velocity);

        let mut rate = self.config.acceleration;
        if !body.is_touching_ground() {
            rate *= self.config.air_control;
        }

        let previous_speed = planar.norm();
        let target_speed = self.config.max_run_speed * strength;

        planar += horizontal(direction) * (rate * dt);
        let mut speed = planar.norm();

        if previous_speed <= target_speed && speed > target_speed {
            speed = target_speed;
        }
        if target_speed < speed {
            speed -= self.config.deceleration * dt;
            if speed < target_speed {
                speed = target_speed;
            }
        }
        if speed >= self.config.max_run_speed {
            speed = self.config.max_run_speed;
        }

        let planar_dir = match planar.try_normalize(SPEED_EPS) {
            Some(dir) => dir,
            None => return,
        };
        let planar = planar_dir * speed;
        if planar.norm() < SPEED_EPS {
            return;
        }

        body.set_velocity(Vec3::new(planar.x, velocity.y, planar.z));
        self.accelerated_this_step = true;

        if self.config.rotate_toward_acceleration {
            let facing = match self.config.rotation_target {
                RotationTarget::AccelerationInput => horizontal(direction),
                RotationTarget::Velocity => planar,
            };
            if let Some(target) = yaw_facing(facing) {
                let max_angle = (self.config.rotation_speed * dt).to_radians();
                body.set_rotation(rotate_towards(body.rotation(), target, max_angle));
            }
        }
    }

    /// Per-step bookkeeping: bleed horizontal speed off when nothing
    /// accelerated the body since the previous call, then rearm the flag.
    pub fn step<B: CharacterBody + ?Sized>(&mut self, body: &mut B, dt: f32) {
        let velocity = body.velocity();
        let planar_speed_sq = velocity.x * velocity.x + velocity.z * velocity.z;

        if !self.accelerated_this_step && planar_speed_sq > 0.0 {
            self.decelerate(body, dt);
        }
        self.accelerated_this_step = false;
    }

    /// Overwrite the body's velocity, e.g. for knockbacks.
    pub fn launch<B: CharacterBody + ?Sized>(&self, body: &mut B, velocity: Vec3) {
        body.set_velocity(velocity);
    }

    /// Launch with the current velocity and the vertical part replaced.
    pub fn jump<B: CharacterBody + ?Sized>(&self, body: &mut B, jump_speed: f32) {
        let mut velocity = body.velocity();
        velocity.y = jump_speed;
        self.launch(body, velocity);
    }

    fn decelerate<B: CharacterBody + ?Sized>(&self, body: &mut B, dt: f32) {
        let velocity = body.velocity();
        let planar = horizontal(velocity);

        let rate = if body.is_touching_ground() {
            self.config.deceleration
        } else {
            self.config.air_deceleration
        };

        let mut speed = planar.norm() - rate * dt;
        if speed < 0.0 {
            speed = 0.0;
        }

        let planar = planar
            .try_normalize(SPEED_EPS)
            .map(|dir| dir * speed)
            .unwrap_or_else(Vec3::zeros);

        body.set_velocity(Vec3::new(planar.x, velocity.y, planar.z));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::KinematicBody;
    use crate::collision::{
        CapsuleSpec, CollisionBackend, ContactFlags, ContactRegion, RayHit, SweepOutcome,
    };
    use crate::config::BodyConfig;

    /// Backend that always reports the same contact flags.
    struct FlagWorld(ContactFlags);

    impl CollisionBackend for FlagWorld {
        fn sweep_move(
            &self,
            _capsule: &CapsuleSpec,
            start: Vec3,
            displacement: Vec3,
        ) -> SweepOutcome {
            SweepOutcome {
                end_pos: start + displacement,
                flags: self.0,
                hits: Vec::new(),
                remaining: Vec3::zeros(),
            }
        }

        fn cast_ray(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32) -> Option<RayHit> {
            None
        }
    }

    fn grounded_world() -> FlagWorld {
        let mut flags = ContactFlags::default();
        flags.add(ContactRegion::Below);
        FlagWorld(flags)
    }

    fn grounded_body() -> KinematicBody {
        let mut body = KinematicBody::new(BodyConfig::default(), Vec3::zeros());
        body.step(&grounded_world(), 1.0 / 60.0);
        assert!(body.is_touching_ground());
        body
    }

    fn airborne_body() -> KinematicBody {
        KinematicBody::new(BodyConfig::default(), Vec3::zeros())
    }

    fn controller() -> MovementController {
        MovementController::new(MovementConfig::default())
    }

    #[test]
    fn accelerates_from_rest_along_the_input() {
        let mut body = grounded_body();
        let mut movement = controller();

        movement.accelerate(&mut body, Vec3::new(1.0, 0.0, 0.0), 1.0, 0.1);

        // 15 m/s^2 for 0.1 s.
        assert!((body.velocity().x - 1.5).abs() < 1.0e-5);
        assert!(body.velocity().y.abs() < 1.0e-6);
        assert!(body.velocity().z.abs() < 1.0e-6);
    }

    #[test]
    fn crossing_the_target_speed_clamps_exactly() {
        let mut body = grounded_body();
        let mut movement = controller();

        // 4.9 + 1.5 would overshoot the 5.0 target; the crossing clamps.
        body.set_velocity(Vec3::new(4.9, 0.0, 0.0));
        movement.accelerate(&mut body, Vec3::new(1.0, 0.0, 0.0), 1.0, 0.1);

        assert!((body.velocity().x - 5.0).abs() < 1.0e-6);
    }

    #[test]
    fn speed_above_a_reduced_target_bleeds_at_deceleration_rate() {
        let mut body = grounded_body();
        let mut movement = controller();

        // Running 4 m/s with a 0.4-strength input (target 2 m/s): the add
        // pushes to 5.5, then one deceleration tick pulls back to 3.5.
        body.set_velocity(Vec3::new(4.0, 0.0, 0.0));
        movement.accelerate(&mut body, Vec3::new(1.0, 0.0, 0.0), 0.4, 0.1);

        assert!((body.velocity().x - 3.5).abs() < 1.0e-5);
    }

    #[test]
    fn bleed_never_drops_below_the_target() {
        let mut body = grounded_body();
        let mut movement = controller();

        // Target 2 m/s from 2.1: a full bleed tick would cut down to 0.1,
        // so the result floors at the target.
        body.set_velocity(Vec3::new(2.1, 0.0, 0.0));
        movement.accelerate(&mut body, Vec3::new(0.0, 0.0, 0.0), 0.4, 0.1);

        assert!((body.velocity().x - 2.0).abs() < 1.0e-5);
    }

    #[test]
    fn speed_at_or_above_max_caps_instantly() {
        let mut body = grounded_body();
        let mut movement = controller();

        // Launched past the cap; a full-strength input snaps it to max.
        body.set_velocity(Vec3::new(7.0, 0.0, 0.0));
        movement.accelerate(&mut body, Vec3::new(1.0, 0.0, 0.0), 1.0, 0.1);

        assert!((body.velocity().x - 5.0).abs() < 1.0e-5);
    }

    #[test]
    fn airborne_acceleration_is_scaled_by_air_control() {
        let mut grounded = grounded_body();
        let mut airborne = airborne_body();
        let mut movement = controller();

        movement.accelerate(&mut grounded, Vec3::new(1.0, 0.0, 0.0), 1.0, 0.1);
        movement.accelerate(&mut airborne, Vec3::new(1.0, 0.0, 0.0), 1.0, 0.1);

        assert!((grounded.velocity().x - 1.5).abs() < 1.0e-5);
        assert!((airborne.velocity().x - 0.75).abs() < 1.0e-5);
    }

    #[test]
    fn zero_strength_is_ignored() {
        let mut body = grounded_body();
        let mut movement = controller();

        body.set_velocity(Vec3::new(3.0, -1.0, 0.0));
        movement.accelerate(&mut body, Vec3::new(1.0, 0.0, 0.0), 0.0, 0.1);

        assert!((body.velocity() - Vec3::new(3.0, -1.0, 0.0)).norm() < 1.0e-6);
        // No acceleration happened, so the next step still bleeds.
        movement.step(&mut body, 0.1);
        assert!((body.velocity().x - 1.0).abs() < 1.0e-5);
    }

    #[test]
    fn degenerate_result_aborts_without_touching_velocity() {
        let mut body = grounded_body();
        let mut movement = controller();

        // Exactly canceling the current speed leaves nothing to carry a
        // direction; the write is skipped entirely.
        body.set_velocity(Vec3::new(1.5, 0.0, 0.0));
        movement.accelerate(&mut body, Vec3::new(-1.0, 0.0, 0.0), 1.0, 0.1);

        assert!((body.velocity() - Vec3::new(1.5, 0.0, 0.0)).norm() < 1.0e-6);
        // The aborted call counts as no acceleration, so the next step
        // bleeds the leftover 1.5 m/s down to a stop.
        movement.step(&mut body, 0.1);
        assert!(body.velocity().x.abs() < 1.0e-6);
    }

    #[test]
    fn vertical_velocity_is_preserved() {
        let mut body = airborne_body();
        let mut movement = controller();

        body.set_velocity(Vec3::new(0.0, -4.0, 0.0));
        movement.accelerate(&mut body, Vec3::new(0.0, 0.0, 1.0), 1.0, 0.1);

        assert!((body.velocity().y - -4.0).abs() < 1.0e-6);
        assert!(body.velocity().z > 0.0);
    }

    #[test]
    fn idle_steps_bleed_speed_to_zero_on_the_ground() {
        let mut body = grounded_body();
        let mut movement = controller();

        body.set_velocity(Vec3::new(3.0, 0.0, 0.0));
        movement.step(&mut body, 0.1);
        assert!((body.velocity().x - 1.0).abs() < 1.0e-5);

        movement.step(&mut body, 0.1);
        assert!(body.velocity().x.abs() < 1.0e-6);
    }

    #[test]
    fn idle_bleed_preserves_vertical_velocity() {
        let mut body = grounded_body();
        let mut movement = controller();

        body.set_velocity(Vec3::new(3.0, -1.5, 0.0));
        movement.step(&mut body, 0.1);

        assert!((body.velocity().x - 1.0).abs() < 1.0e-5);
        assert!((body.velocity().y - -1.5).abs() < 1.0e-6);
    }

    #[test]
    fn airborne_idle_keeps_speed_with_zero_air_deceleration() {
        let mut body = airborne_body();
        let mut movement = controller();

        body.set_velocity(Vec3::new(3.0, 0.0, 1.0));
        movement.step(&mut body, 0.1);

        assert!((body.velocity() - Vec3::new(3.0, 0.0, 1.0)).norm() < 1.0e-6);
    }

    #[test]
    fn accelerating_suppresses_the_bleed_for_one_step() {
        let mut body = grounded_body();
        let mut movement = controller();

        movement.accelerate(&mut body, Vec3::new(1.0, 0.0, 0.0), 1.0, 0.1);
        let after_accel = body.velocity().x;

        movement.step(&mut body, 0.1);
        assert!((body.velocity().x - after_accel).abs() < 1.0e-6);

        // The flag rearms; an idle step now bleeds.
        movement.step(&mut body, 0.1);
        assert!(body.velocity().x < after_accel);
    }

    #[test]
    fn rotation_is_rate_limited_per_step() {
        let mut body = grounded_body();
        let mut movement = controller();

        // Facing +Z, turning toward -Z: 500 deg/s over 0.02 s allows 10.
        movement.accelerate(&mut body, Vec3::new(0.0, 0.0, -1.0), 1.0, 0.02);

        assert!((body.rotation().angle().to_degrees() - 10.0).abs() < 1.0e-3);
    }

    #[test]
    fn rotation_snaps_to_the_heading_within_one_large_step() {
        let mut body = grounded_body();
        let mut movement = controller();

        movement.accelerate(&mut body, Vec3::new(0.0, 0.0, -1.0), 1.0, 0.5);

        assert!((body.forward() - Vec3::new(0.0, 0.0, -1.0)).norm() < 1.0e-4);
    }

    #[test]
    fn rotation_target_velocity_faces_the_resulting_motion() {
        let config = MovementConfig {
            rotation_target: RotationTarget::Velocity,
            rotation_speed: 3600.0,
            ..MovementConfig::default()
        };
        let mut body = grounded_body();
        let mut movement = MovementController::new(config);

        body.set_velocity(Vec3::new(2.0, 0.0, 0.0));
        movement.accelerate(&mut body, Vec3::new(0.0, 0.0, 1.0), 1.0, 0.1);

        let expected = Vec3::new(2.0, 0.0, 1.5).normalize();
        assert!((body.forward() - expected).norm() < 1.0e-4);
    }

    #[test]
    fn rotation_can_be_disabled() {
        let config = MovementConfig {
            rotate_toward_acceleration: false,
            ..MovementConfig::default()
        };
        let mut body = grounded_body();
        let mut movement = MovementController::new(config);

        movement.accelerate(&mut body, Vec3::new(1.0, 0.0, 0.0), 1.0, 0.1);

        assert!(body.rotation().angle() < 1.0e-6);
    }

    #[test]
    fn launch_overwrites_velocity() {
        let mut body = grounded_body();
        let movement = controller();

        body.set_velocity(Vec3::new(1.0, 0.0, 0.0));
        movement.launch(&mut body, Vec3::new(-2.0, 6.0, 1.0));

        assert!((body.velocity() - Vec3::new(-2.0, 6.0, 1.0)).norm() < 1.0e-6);
    }

    #[test]
    fn jump_replaces_only_the_vertical_part() {
        let mut body = grounded_body();
        let movement = controller();

        body.set_velocity(Vec3::new(3.0, -2.0, 1.0));
        movement.jump(&mut body, 6.0);

        assert!((body.velocity() - Vec3::new(3.0, 6.0, 1.0)).norm() < 1.0e-6);
    }

    #[test]
    fn try_new_rejects_invalid_config() {
        let bad = MovementConfig {
            deceleration: -1.0,
            ..MovementConfig::default()
        };
        assert!(MovementController::try_new(bad).is_err());
    }
}
