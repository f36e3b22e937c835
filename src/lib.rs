/*!
Character movement core for kinematic capsule bodies.

The crate splits a character into three cooperating parts:

- [`KinematicBody`]: owns position, rotation, velocity and the grounded
  flag, and resolves motion against a [`CollisionBackend`] once per fixed
  step.
- [`MovementController`]: turns directional input into horizontal
  acceleration, deceleration and turning.
- [`GravityController`]: accumulates gravity while airborne and pins the
  vertical velocity to a small resting value while grounded.

Controllers write velocity before the body consumes it, so the order
within one fixed step is: movement, then gravity, then the body.

[`StaticWorld`] is the bundled backend over static planes, cuboids,
spheres and capsules; any other world can plug in behind
[`CollisionBackend`].

```
use character_physics::{
    BodyConfig, CharacterBody, GravityConfig, GravityController, KinematicBody, MovementConfig,
    MovementController, Quat, StaticWorld, Vec3, plane_from_pose,
};

let world = StaticWorld::from_shapes([plane_from_pose(Quat::identity(), Vec3::zeros(), 0.0)]);

let mut body = KinematicBody::new(BodyConfig::default(), Vec3::new(0.0, 1.02, 0.0));
let mut movement = MovementController::new(MovementConfig::default());
let gravity = GravityController::new(GravityConfig::default());

let dt = 1.0 / 60.0;
for _ in 0..60 {
    movement.accelerate(&mut body, Vec3::z(), 1.0, dt);
    movement.step(&mut body, dt);
    gravity.step(&mut body, dt);
    body.step(&world, dt);
}

assert!(body.is_touching_ground());
assert!(body.position().z > 2.0);
```
*/

pub mod body;
pub mod collision;
pub mod config;
pub mod events;
pub mod flags;
pub mod gravity;
pub mod math;
pub mod movement;
pub mod settings;

pub use body::{CharacterBody, KinematicBody};
pub use collision::{
    CapsuleSpec, ColliderId, CollisionBackend, ContactFlags, ContactRegion, HitInfo, RayHit,
    StaticShape, StaticWorld, SweepOutcome, Transform, cuboid_from_pose, plane_from_pose,
};
pub use config::{BodyConfig, GravityConfig, MovementConfig, RotationTarget};
pub use events::{EventHub, GroundListener, HitListener, SubscriptionId};
pub use gravity::GravityController;
pub use math::{Quat, Vec3, horizontal, rotate_towards, yaw_facing};
pub use movement::MovementController;
