//! Tuning configuration for the body and its controllers.
//!
//! Every struct ships the documented defaults and a `validate()` that the
//! paired constructors use to fail loudly on misconfiguration. Runtime
//! clamps elsewhere in the crate are fix-ups for transient numeric edge
//! cases, never a substitute for these checks.

use crate::math::Vec3;
use crate::settings::{
    DEFAULT_ACCELERATION, DEFAULT_AIR_CONTROL, DEFAULT_AIR_DECELERATION, DEFAULT_BODY_HEIGHT,
    DEFAULT_BODY_RADIUS, DEFAULT_DECELERATION, DEFAULT_GRAVITY_Y, DEFAULT_GROUND_CHECK_DISTANCE,
    DEFAULT_GROUND_CHECK_START_HEIGHT, DEFAULT_MAX_RUN_SPEED, DEFAULT_RESTING_GRAVITY,
    DEFAULT_ROTATION_SPEED,
};

/// Capsule geometry and slope-ray tuning for a kinematic body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyConfig {
    /// Total capsule height, caps included (meters).
    pub height: f32,
    /// Capsule radius (meters).
    pub radius: f32,
    /// Start height of the slope ray above the capsule bottom (meters).
    pub ground_check_start_height: f32,
    /// Extra reach of the slope ray below the capsule bottom (meters).
    pub ground_check_distance: f32,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            height: DEFAULT_BODY_HEIGHT,
            radius: DEFAULT_BODY_RADIUS,
            ground_check_start_height: DEFAULT_GROUND_CHECK_START_HEIGHT,
            ground_check_distance: DEFAULT_GROUND_CHECK_DISTANCE,
        }
    }
}

impl BodyConfig {
    /// Check for values the body cannot operate with.
    pub fn validate(&self) -> Result<(), String> {
        if !self.height.is_finite() || self.height <= 0.0 {
            return Err(format!(
                "body height must be positive and finite, got {}",
                self.height
            ));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(format!(
                "body radius must be positive and finite, got {}",
                self.radius
            ));
        }
        if !self.ground_check_start_height.is_finite() || self.ground_check_start_height < 0.0 {
            return Err(format!(
                "ground_check_start_height must be non-negative and finite, got {}",
                self.ground_check_start_height
            ));
        }
        if !self.ground_check_distance.is_finite() || self.ground_check_distance < 0.0 {
            return Err(format!(
                "ground_check_distance must be non-negative and finite, got {}",
                self.ground_check_distance
            ));
        }
        Ok(())
    }
}

/// Which heading `accelerate` turns the body toward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RotationTarget {
    /// Face the horizontal projection of the input direction.
    #[default]
    AccelerationInput,
    /// Face the horizontal velocity resulting from the acceleration.
    Velocity,
}

/// Horizontal locomotion tuning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementConfig {
    /// Top running speed; also the cap for a full-strength input (m/s).
    pub max_run_speed: f32,
    /// Horizontal acceleration while grounded (m/s^2).
    pub acceleration: f32,
    /// Horizontal deceleration toward the target speed and at idle (m/s^2).
    pub deceleration: f32,
    /// Fraction of `acceleration` available while airborne, 0 to 1.
    pub air_control: f32,
    /// Horizontal deceleration while airborne and idle (m/s^2).
    pub air_deceleration: f32,
    /// Turn rate toward the heading (degrees per second).
    pub rotation_speed: f32,
    /// Whether `accelerate` also turns the body toward its heading.
    pub rotate_toward_acceleration: bool,
    /// Heading source used when turning.
    pub rotation_target: RotationTarget,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            max_run_speed: DEFAULT_MAX_RUN_SPEED,
            acceleration: DEFAULT_ACCELERATION,
            deceleration: DEFAULT_DECELERATION,
            air_control: DEFAULT_AIR_CONTROL,
            air_deceleration: DEFAULT_AIR_DECELERATION,
            rotation_speed: DEFAULT_ROTATION_SPEED,
            rotate_toward_acceleration: true,
            rotation_target: RotationTarget::default(),
        }
    }
}

impl MovementConfig {
    /// Check for values the controller cannot operate with.
    pub fn validate(&self) -> Result<(), String> {
        if !self.max_run_speed.is_finite() || self.max_run_speed < 0.0 {
            return Err(format!(
                "max_run_speed must be non-negative and finite, got {}",
                self.max_run_speed
            ));
        }
        if !self.acceleration.is_finite() || self.acceleration < 0.0 {
            return Err(format!(
                "acceleration must be non-negative and finite, got {}",
                self.acceleration
            ));
        }
        if !self.deceleration.is_finite() || self.deceleration < 0.0 {
            return Err(format!(
                "deceleration must be non-negative and finite, got {}",
                self.deceleration
            ));
        }
        if !self.air_control.is_finite() || !(0.0..=1.0).contains(&self.air_control) {
            return Err(format!(
                "air_control must be within 0 to 1, got {}",
                self.air_control
            ));
        }
        if !self.air_deceleration.is_finite() || self.air_deceleration < 0.0 {
            return Err(format!(
                "air_deceleration must be non-negative and finite, got {}",
                self.air_deceleration
            ));
        }
        if !self.rotation_speed.is_finite() || self.rotation_speed < 0.0 {
            return Err(format!(
                "rotation_speed must be non-negative and finite, got {}",
                self.rotation_speed
            ));
        }
        Ok(())
    }
}

/// Gravity tuning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GravityConfig {
    /// Acceleration applied while airborne (m/s^2).
    pub gravity: Vec3,
    /// Vertical velocity pinned while grounded and descending (m/s).
    /// Small positive values rest lightly on the ground; small negative
    /// values keep the body pressed into slopes.
    pub resting_gravity: f32,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, DEFAULT_GRAVITY_Y, 0.0),
            resting_gravity: DEFAULT_RESTING_GRAVITY,
        }
    }
}

impl GravityConfig {
    /// Check for values the controller cannot operate with.
    pub fn validate(&self) -> Result<(), String> {
        if !self.gravity.iter().all(|c| c.is_finite()) {
            return Err(format!("gravity must be finite, got {:?}", self.gravity));
        }
        if !self.resting_gravity.is_finite() {
            return Err(format!(
                "resting_gravity must be finite, got {}",
                self.resting_gravity
            ));
        }
        Ok(())
    }
}
