//! World units and tuning constants shared by the geometry, collision and
//! locomotion layers.
//!
//! Distances are in world units where one sector is 1024 units wide. The Y axis
//! points DOWN: a smaller Y is higher up, so "above" means a smaller value.

use crate::angle::{Angle, deg};

/// Width and depth of one square floor sector.
pub const SECTOR_SIZE: i32 = 1024;

/// A quarter of a sector; one "click" of floor height.
pub const QUARTER_SECTOR_SIZE: i32 = SECTOR_SIZE / 4;

/// Largest absolute height a sector can describe.
pub const HEIGHT_LIMIT: i32 = 32512;

/// Floor height sentinel for wall sectors.
///
/// Relative floor distances keep this value unchanged so a wall can always be
/// recognized after sampling.
pub const INVALID_HEIGHT: i32 = -HEIGHT_LIMIT;

/// Floor distance reported for an upward steep slope when slopes act as walls.
pub const STEEP_SLOPE_AS_WALL_DISTANCE: i32 = -32767;

/// Floor distance reported for a pit (downward steep slope or deadly floor).
pub const PIT_DISTANCE: i32 = 2 * QUARTER_SECTOR_SIZE;

/// Height difference that can be walked over without a step animation.
pub const STEPPABLE_HEIGHT: i32 = QUARTER_SECTOR_SIZE / 2;

/// Lower bound of the two click climb band (absolute value of the height).
pub const CLIMB_LIMIT_2_CLICK_MIN: i32 = QUARTER_SECTOR_SIZE + STEPPABLE_HEIGHT;

/// Upper bound of the two click climb band.
pub const CLIMB_LIMIT_2_CLICK_MAX: i32 = CLIMB_LIMIT_2_CLICK_MIN + QUARTER_SECTOR_SIZE;

/// Upper bound of the three click climb band.
pub const CLIMB_LIMIT_3_CLICK_MAX: i32 = CLIMB_LIMIT_2_CLICK_MAX + QUARTER_SECTOR_SIZE;

/// Highest ledge that can still be reached with a standing jump.
pub const JUMP_REACHABLE_HEIGHT: i32 = 7 * QUARTER_SECTOR_SIZE + 128;

/// Standing height of the character, feet to scalp.
pub const SCALP_HEIGHT: i32 = 762;

/// Probe height while hanging from a ledge.
pub const LARA_HANGING_HEIGHT: i32 = 870;

/// Probe height while swimming on the water surface.
pub const LARA_SWIM_HEIGHT: i32 = 700;

/// Probe height while diving.
pub const LARA_DIVE_HEIGHT: i32 = 400;

/// Vertical offset of the diving probe origin.
pub const LARA_DIVE_GROUND_ELEVATION: i32 = 200;

/// Distance between the scalp and the raised hands.
pub const SCALP_TO_HANDS_HEIGHT: i32 = 160;

/// Steepest ledge edge (in probe units) that can still be grabbed.
pub const MAX_GRABBABLE_GRADIENT: i32 = 60;

/// Offset from the feet used when re-sampling the floor below the character.
pub const FLOOR_PROBE_OFFSET: i32 = -381;

/// Fall speed at which a falling jump turns into a free fall.
pub const FREE_FALL_SPEED_THRESHOLD: i32 = 131;

/// Fall speed above which a landing deals damage.
pub const DAMAGE_FALL_SPEED_THRESHOLD: i32 = 140;

/// Fall speed at which a landing is always fatal.
pub const DEADLY_FALL_SPEED_THRESHOLD: i32 = 154;

/// Fall speed above which a swan dive turns into a fatal plunge.
pub const SWAN_DIVE_FALL_SPEED_THRESHOLD: i32 = 133;

/// Full health.
pub const LARA_HEALTH: i32 = 1000;

/// Health value written when the character dies instantly.
pub const DEAD_HEALTH: i32 = -16384;

/// Air supply of a full breath, in frames.
pub const LARA_AIR: i32 = 1800;

/// Horizontal collision radius on land and on the water surface.
pub const DEFAULT_COLLISION_RADIUS: i32 = 100;

/// Horizontal collision radius while diving.
pub const DEFAULT_COLLISION_RADIUS_UNDERWATER: i32 = 300;

/// Collision radius used while the body lies on the floor after death.
pub const DEATH_COLLISION_RADIUS: i32 = 400;

/// Vertical acceleration while the fall speed is below [`FALL_SPEED_GRAVITY_LIMIT`].
pub const GRAVITY: i32 = 6;

/// Fall speed above which gravity drops to one unit per frame.
pub const FALL_SPEED_GRAVITY_LIMIT: i32 = 128;

/// Largest vertical difference treated as the water surface when leaving a dive.
pub const WATER_SURFACE_SNAP_DISTANCE: i32 = QUARTER_SECTOR_SIZE;

pub const SLOW_TURN_SPEED: Angle = deg(2.25);
pub const FAST_TURN_SPEED: Angle = deg(4.0);
pub const FAST_TURN_SPEED_RUNNING: Angle = deg(8.0);
pub const RUN_TURN_SPEED: Angle = deg(6.0);
pub const JUMP_TURN_SPEED: Angle = deg(3.0);
pub const WALK_TURN_SPEED: Angle = deg(4.0);
pub const SLOW_WALK_TURN_SPEED: Angle = deg(2.25);
pub const TURN_ACCELERATION: Angle = deg(2.25);
pub const RUN_TILT: Angle = deg(1.5);
pub const MAX_RUN_TILT: Angle = deg(11.0);
pub const TILT_DECAY_LAND: Angle = deg(1.0);
pub const TILT_DECAY_DIVING: Angle = deg(2.0);
pub const TURN_SPEED_DECAY: Angle = deg(2.0);

pub const WATER_TURN_SPEED: Angle = deg(4.0);
pub const WATER_TURN_SPEED_SLOW: Angle = deg(2.0);
pub const DIVE_PITCH_SPEED: Angle = deg(2.0);
pub const DIVE_YAW_SPEED: Angle = deg(6.0);
pub const DIVE_ROLL_SPEED: Angle = deg(3.0);
pub const DIVE_MAX_PITCH: Angle = deg(100.0);
pub const DIVE_MAX_ROLL: Angle = deg(22.0);

/// Maximum swim speed while diving.
pub const DIVE_MAX_SPEED: i32 = 200;

/// Maximum fall speed (forward swim speed) on the water surface.
pub const SURFACE_SWIM_MAX_SPEED: i32 = 60;

/// Swim speed gained per frame while a water stroke is held.
pub const SURFACE_SWIM_ACCELERATION: i32 = 8;

/// Swim speed lost per frame while drifting.
pub const WATER_DRAG: i32 = 6;

/// Swim speed set when diving off the water surface.
pub const SURFACE_DIVE_SPEED: i32 = 80;

/// Health lost per frame while out of air.
pub const DROWN_DAMAGE: i32 = 5;

/// Air regained per frame on the water surface.
pub const AIR_REFILL_RATE: i32 = 10;
