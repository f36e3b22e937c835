//! Gravity: airborne accumulation and the grounded resting pin.

use crate::body::CharacterBody;
use crate::config::GravityConfig;

/// Applies gravity to a body's velocity once per fixed step.
///
/// Airborne, the configured acceleration accumulates into the velocity.
/// Grounded and descending, the vertical velocity is pinned to the
/// configured resting value instead, so impact speed never builds up
/// while standing. Runs before the body's step so the pin shapes the
/// displacement the body resolves.
pub struct GravityController {
    pub config: GravityConfig,
}

impl GravityController {
    /// Build a controller, panicking on an invalid configuration.
    /// Use [`GravityController::try_new`] to handle the error instead.
    pub fn new(config: GravityConfig) -> Self {
        Self::try_new(config).expect("invalid gravity configuration")
    }

    pub fn try_new(config: GravityConfig) -> Result<Self, String> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn step<B: CharacterBody + ?Sized>(&self, body: &mut B, dt: f32) {
        let mut velocity = body.velocity();

        if !body.is_touching_ground() {
            velocity += self.config.gravity * dt;
        } else if velocity.y < 0.0 {
            velocity.y = self.config.resting_gravity;
        } else {
            return;
        }

        body.set_velocity(velocity);
    }
}
