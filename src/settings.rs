/*!
Tolerances and documented tuning defaults.

Constants are grouped here so behavior stays easy to audit and tune.
Distances are in meters, speeds in meters per second, angles in degrees
where noted.
*/

/// Separation kept from surfaces when sliding along or landing on them (meters).
pub const DEFAULT_SKIN: f32 = 0.02;

/// Maximum slide iterations for one sweep (corners need more than one).
pub const DEFAULT_MAX_ITERATIONS: u32 = 4;

/// Minimum squared displacement considered meaningful for a sweep (m^2).
pub const MIN_MOVE_SQ: f32 = 1.0e-8;

/// Practical small distance for world-space comparisons (meters).
pub const DIST_EPS: f32 = 1.0e-6;

/// Horizontal speeds below this are treated as zero (meters per second).
pub const SPEED_EPS: f32 = 1.0e-6;

/// Minimum squared planar length required to derive a yaw heading.
pub const YAW_EPS: f32 = 1.0e-6;

/// Cosine threshold separating walkable support from walls and ceilings.
/// A contact normal with `y >= MAX_SLOPE_COS` counts as ground.
pub const MAX_SLOPE_COS: f32 = 0.7;

/// Distance searched below the capsule for ground support after a sweep (meters).
pub const GROUND_PROBE_DISTANCE: f32 = 0.08;

/// Hover height kept above detected ground support (meters).
pub const PROBE_HOVER_HEIGHT: f32 = 0.02;

/// Default capsule height for a standing character (meters).
pub const DEFAULT_BODY_HEIGHT: f32 = 2.0;

/// Default capsule radius (meters).
pub const DEFAULT_BODY_RADIUS: f32 = 0.5;

/// Default start height of the slope ray above the capsule bottom (meters).
pub const DEFAULT_GROUND_CHECK_START_HEIGHT: f32 = 0.15;

/// Default extra reach of the slope ray below the capsule bottom (meters).
pub const DEFAULT_GROUND_CHECK_DISTANCE: f32 = 0.25;

/// Default top running speed (meters per second).
pub const DEFAULT_MAX_RUN_SPEED: f32 = 5.0;

/// Default horizontal acceleration while grounded (m/s^2).
pub const DEFAULT_ACCELERATION: f32 = 15.0;

/// Default horizontal deceleration while grounded (m/s^2).
pub const DEFAULT_DECELERATION: f32 = 20.0;

/// Default fraction of ground acceleration available while airborne.
pub const DEFAULT_AIR_CONTROL: f32 = 0.5;

/// Default horizontal deceleration while airborne (m/s^2).
pub const DEFAULT_AIR_DECELERATION: f32 = 0.0;

/// Default turn rate toward the movement heading (degrees per second).
pub const DEFAULT_ROTATION_SPEED: f32 = 500.0;

/// Default vertical gravity acceleration (m/s^2, negative is down).
pub const DEFAULT_GRAVITY_Y: f32 = -9.1;

/// Default vertical velocity applied while resting on ground (m/s).
/// A small negative value instead keeps descent pressed into the surface
/// so the slope correction in the body step can engage.
pub const DEFAULT_RESTING_GRAVITY: f32 = 0.01;
