/*!
Per-frame collision probe state.

A fresh [`CollisionInfo`] is created every frame. The active state fills in the
thresholds it tolerates (floor range, ceiling clearance, policy flags) before
running the probe; the probe then fills the sampled distances, the axis
classification and a corrective shift.

Distances are relative to the character: a positive floor distance means the
floor is below the feet, a negative one means a step up. A ceiling distance
of zero or more means the ceiling reaches into the character's height.
*/

use crate::angle::{Angle, Axis};
use crate::bitmask_flags::BitmaskFlags;
use crate::constants::{DEFAULT_COLLISION_RADIUS, HEIGHT_LIMIT, INVALID_HEIGHT};
use crate::define_bitmask_flags;
use crate::error::LocomotionError;
use crate::level::{FloorKind, HeightInfo, Interval, LevelGeometry, Position, Sector, Slant, SlantClass};

define_bitmask_flags!(
    /// Per-state rules for turning surfaces into obstacles.
    PolicyFlag, u8, {
    /// Steep slopes rising in front count as walls.
    SlopesAreWalls,
    /// Steep slopes falling away in front count as pits.
    SlopesArePits,
    /// Deadly floors in front count as pits.
    LavaIsPit,
    /// Enemies may push the character.
    EnableBaddiePush,
    /// Enemies may knock the character back when hitting.
    EnableSpaz,
});

pub type PolicyFlags = BitmaskFlags<u8>;

/// Outcome of the axis classification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AxisCollision {
    #[default]
    None,
    /// Blocked straight ahead, or standing inside a wall sector.
    Front,
    FrontLeft,
    FrontRight,
    /// The head is inside the ceiling.
    Top,
    /// Not enough head room in front.
    FrontTop,
    /// Floor and ceiling meet at the current position.
    Jammed,
}

/// A surface distance sampled at one probe point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceDistance {
    pub dy: i32,
    pub slant_class: SlantClass,
    pub floor_kind: FloorKind,
}

impl Default for SurfaceDistance {
    fn default() -> Self {
        Self {
            dy: 0,
            slant_class: SlantClass::None,
            floor_kind: FloorKind::Normal,
        }
    }
}

impl SurfaceDistance {
    fn relative_to(info: HeightInfo, dy: i32) -> Self {
        Self {
            dy,
            slant_class: info.slant_class,
            floor_kind: info.floor_kind,
        }
    }
}

/// Floor and ceiling distance at one probe point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VerticalDistances {
    pub floor: SurfaceDistance,
    pub ceiling: SurfaceDistance,
}

impl VerticalDistances {
    /// Samples the surfaces at `position` relative to a character whose feet
    /// are at `feet_y` and whose scalp is `height` above them.
    pub fn sample(
        level: &dyn LevelGeometry,
        sector: &Sector,
        position: &Position,
        feet_y: i32,
        height: i32,
        max_iterations: usize,
    ) -> Result<Self, LocomotionError> {
        let floor = HeightInfo::from_floor(level, sector, position, max_iterations)?;
        let ceiling = HeightInfo::from_ceiling(level, sector, position, max_iterations)?;
        let floor_dy = if floor.y == INVALID_HEIGHT {
            INVALID_HEIGHT
        } else {
            floor.y - feet_y
        };
        Ok(Self {
            floor: SurfaceDistance::relative_to(floor, floor_dy),
            ceiling: SurfaceDistance::relative_to(ceiling, ceiling.y - (feet_y - height)),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionInfo {
    pub collision_type: AxisCollision,
    /// Correction to add to the position; consumed by the feedback helper.
    pub shift: Position,
    pub facing_axis: Axis,
    pub facing_angle: Angle,
    pub collision_radius: i32,
    pub policy: PolicyFlags,
    /// Position before this frame's movement.
    pub initial_position: Position,
    /// Floor distances in front the current state accepts.
    pub valid_floor_height: Interval,
    /// Ceiling distances in front above this value are obstacles.
    pub valid_ceiling_height_min: i32,
    pub mid: VerticalDistances,
    pub front: VerticalDistances,
    pub front_left: VerticalDistances,
    pub front_right: VerticalDistances,
    pub floor_slant: Slant,
    pub has_static_mesh_collision: bool,
}

impl Default for CollisionInfo {
    fn default() -> Self {
        Self {
            collision_type: AxisCollision::None,
            shift: Position::zeros(),
            facing_axis: Axis::PosZ,
            facing_angle: Angle::ZERO,
            collision_radius: DEFAULT_COLLISION_RADIUS,
            policy: PolicyFlags::default(),
            initial_position: Position::zeros(),
            valid_floor_height: Interval::new(-HEIGHT_LIMIT, HEIGHT_LIMIT),
            valid_ceiling_height_min: 0,
            mid: VerticalDistances::default(),
            front: VerticalDistances::default(),
            front_left: VerticalDistances::default(),
            front_right: VerticalDistances::default(),
            floor_slant: Slant::FLAT,
            has_static_mesh_collision: false,
        }
    }
}

impl CollisionInfo {
    /// A probe setup starting at `initial_position` with the given radius.
    pub fn new(initial_position: Position, collision_radius: i32) -> Self {
        Self {
            initial_position,
            collision_radius,
            ..Self::default()
        }
    }

    #[inline]
    pub fn slopes_are_walls(&self) -> bool {
        self.policy.has(PolicyFlag::SlopesAreWalls)
    }

    #[inline]
    pub fn slopes_are_pits(&self) -> bool {
        self.policy.has(PolicyFlag::SlopesArePits)
    }

    #[inline]
    pub fn lava_is_pit(&self) -> bool {
        self.policy.has(PolicyFlag::LavaIsPit)
    }

    #[inline]
    pub fn enable_baddie_push(&self) -> bool {
        self.policy.has(PolicyFlag::EnableBaddiePush)
    }

    #[inline]
    pub fn enable_spaz(&self) -> bool {
        self.policy.has(PolicyFlag::EnableSpaz)
    }

    /// Sets the floor range and ceiling minimum the probe checks in front.
    pub fn set_limits(&mut self, floor_min: i32, floor_max: i32, ceiling_min: i32) {
        self.valid_floor_height = Interval::new(floor_min, floor_max);
        self.valid_ceiling_height_min = ceiling_min;
    }

    /// Turns off both enemy interaction flags.
    pub fn disable_baddie_interaction(&mut self) {
        self.policy
            .remove_many(&[PolicyFlag::EnableSpaz, PolicyFlag::EnableBaddiePush]);
    }

    /// Difference between the front-left and front-right floor, the edge
    /// steepness used by grab and climb checks.
    #[inline]
    pub fn front_gradient(&self) -> i32 {
        (self.front_left.floor.dy - self.front_right.floor.dy).abs()
    }

    /// True when the blocking result came from static scenery.
    #[inline]
    pub fn is_scenery_blocked(&self) -> bool {
        self.has_static_mesh_collision
    }
}
