//! Kinematic state of the player character and the identifiers shared with
//! the animation system.

use crate::angle::Angle;
use crate::constants::{LARA_AIR, LARA_HEALTH, SCALP_HEIGHT};
use crate::level::{BoundingBox, Location, pos};

/// Discrete locomotion states. The discriminant is the legacy state number
/// stored in animation data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum LaraStateId {
    WalkForward = 0,
    RunForward = 1,
    Stop = 2,
    JumpForward = 3,
    Pose = 4,
    RunBack = 5,
    TurnRightSlow = 6,
    TurnLeftSlow = 7,
    Death = 8,
    FreeFall = 9,
    Hang = 10,
    Reach = 11,
    /// Bounce off a wall after running into it.
    Unknown12 = 12,
    UnderwaterStop = 13,
    GrabToFall = 14,
    JumpPrepare = 15,
    WalkBackward = 16,
    UnderwaterForward = 17,
    UnderwaterInertia = 18,
    Climbing = 19,
    TurnFast = 20,
    StepRight = 21,
    StepLeft = 22,
    RollBackward = 23,
    SlideForward = 24,
    JumpBack = 25,
    JumpLeft = 26,
    JumpRight = 27,
    JumpUp = 28,
    FallBackward = 29,
    ShimmyLeft = 30,
    ShimmyRight = 31,
    SlideBackward = 32,
    OnWaterStop = 33,
    OnWaterForward = 34,
    UnderwaterDiving = 35,
    PushablePush = 36,
    PushablePull = 37,
    PushableGrab = 38,
    PickUp = 39,
    SwitchDown = 40,
    SwitchUp = 41,
    InsertKey = 42,
    InsertPuzzle = 43,
    WaterDeath = 44,
    RollForward = 45,
    BoulderDeath = 46,
    OnWaterBackward = 47,
    OnWaterLeft = 48,
    OnWaterRight = 49,
    UseMidas = 50,
    MidasDeath = 51,
    SwandiveBegin = 52,
    SwandiveEnd = 53,
    Handstand = 54,
    OnWaterExit = 55,
}

impl LaraStateId {
    /// Every state in legacy order.
    pub const ALL: [LaraStateId; 56] = [
        Self::WalkForward,
        Self::RunForward,
        Self::Stop,
        Self::JumpForward,
        Self::Pose,
        Self::RunBack,
        Self::TurnRightSlow,
        Self::TurnLeftSlow,
        Self::Death,
        Self::FreeFall,
        Self::Hang,
        Self::Reach,
        Self::Unknown12,
        Self::UnderwaterStop,
        Self::GrabToFall,
        Self::JumpPrepare,
        Self::WalkBackward,
        Self::UnderwaterForward,
        Self::UnderwaterInertia,
        Self::Climbing,
        Self::TurnFast,
        Self::StepRight,
        Self::StepLeft,
        Self::RollBackward,
        Self::SlideForward,
        Self::JumpBack,
        Self::JumpLeft,
        Self::JumpRight,
        Self::JumpUp,
        Self::FallBackward,
        Self::ShimmyLeft,
        Self::ShimmyRight,
        Self::SlideBackward,
        Self::OnWaterStop,
        Self::OnWaterForward,
        Self::UnderwaterDiving,
        Self::PushablePush,
        Self::PushablePull,
        Self::PushableGrab,
        Self::PickUp,
        Self::SwitchDown,
        Self::SwitchUp,
        Self::InsertKey,
        Self::InsertPuzzle,
        Self::WaterDeath,
        Self::RollForward,
        Self::BoulderDeath,
        Self::OnWaterBackward,
        Self::OnWaterLeft,
        Self::OnWaterRight,
        Self::UseMidas,
        Self::MidasDeath,
        Self::SwandiveBegin,
        Self::SwandiveEnd,
        Self::Handstand,
        Self::OnWaterExit,
    ];

    /// Converts a legacy state number. `None` means the animation data names a
    /// state this controller does not know, which callers treat as a bug.
    pub fn from_raw(raw: u16) -> Option<Self> {
        Self::ALL.get(raw as usize).copied()
    }

    #[inline]
    pub fn raw(self) -> u16 {
        self as u16
    }

    /// States that end the character's life; they have no outgoing edges.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Death | Self::WaterDeath | Self::MidasDeath | Self::BoulderDeath
        )
    }
}

/// Animation clips the locomotion states start directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationId {
    StaySolid,
    Climb2Click,
    Climb3Click,
    ClimbOutOfWater,
    EndWalkLeft,
    EndWalkRight,
    FreeFallBack,
    FreeFallForward,
    FreeFallToUnderwater,
    FreeFallToUnderwaterAlternate,
    HangIdle,
    LandingHard,
    OscillateHangOn,
    RollBegin,
    RunUpStepLeft,
    RunUpStepRight,
    SlideForward,
    SmashJump,
    StartSlideBackward,
    TryHangVertical,
    UnderwaterToOnWater,
    WalkDownBackLeft,
    WalkDownBackRight,
    WalkDownLeft,
    WalkDownRight,
    WalkUpStepLeft,
    WalkUpStepRight,
    WallSmashLeft,
    WallSmashRight,
}

impl AnimationId {
    /// Absolute index of the clip's first frame in the legacy frame table.
    pub fn start_frame(self) -> u32 {
        match self {
            Self::StaySolid => 185,
            Self::Climb2Click => 759,
            Self::Climb3Click => 614,
            Self::ClimbOutOfWater => 1849,
            Self::EndWalkLeft => 74,
            Self::EndWalkRight => 58,
            Self::FreeFallBack => 1473,
            Self::FreeFallForward => 492,
            Self::FreeFallToUnderwater => 1895,
            Self::FreeFallToUnderwaterAlternate => 2041,
            Self::HangIdle => 1493,
            Self::LandingHard => 358,
            Self::OscillateHangOn => 3974,
            Self::RollBegin => 3857,
            Self::RunUpStepLeft => 837,
            Self::RunUpStepRight => 830,
            Self::SlideForward => 1133,
            Self::SmashJump => 481,
            Self::StartSlideBackward => 1677,
            Self::TryHangVertical => 448,
            Self::UnderwaterToOnWater => 1937,
            Self::WalkDownBackLeft => 899,
            Self::WalkDownBackRight => 930,
            Self::WalkDownLeft => 874,
            Self::WalkDownRight => 887,
            Self::WalkUpStepLeft => 858,
            Self::WalkUpStepRight => 844,
            Self::WallSmashLeft => 800,
            Self::WallSmashRight => 815,
        }
    }

    /// The state a clip plays in.
    pub fn state(self) -> LaraStateId {
        use LaraStateId as S;
        match self {
            Self::StaySolid | Self::EndWalkLeft | Self::EndWalkRight | Self::LandingHard => S::Stop,
            Self::Climb2Click | Self::Climb3Click => S::Climbing,
            Self::ClimbOutOfWater => S::OnWaterExit,
            Self::FreeFallBack => S::FallBackward,
            Self::FreeFallForward => S::JumpForward,
            Self::FreeFallToUnderwater | Self::FreeFallToUnderwaterAlternate => S::UnderwaterDiving,
            Self::HangIdle | Self::OscillateHangOn => S::Hang,
            Self::RollBegin => S::RollForward,
            Self::RunUpStepLeft | Self::RunUpStepRight => S::RunForward,
            Self::SlideForward => S::SlideForward,
            Self::SmashJump => S::FreeFall,
            Self::StartSlideBackward => S::SlideBackward,
            Self::TryHangVertical => S::JumpUp,
            Self::UnderwaterToOnWater => S::OnWaterStop,
            Self::WalkDownBackLeft | Self::WalkDownBackRight => S::WalkBackward,
            Self::WalkDownLeft
            | Self::WalkDownRight
            | Self::WalkUpStepLeft
            | Self::WalkUpStepRight => S::WalkForward,
            Self::WallSmashLeft | Self::WallSmashRight => S::Unknown12,
        }
    }
}

/// A clip change requested by a state, consumed by the animation driver on
/// its next advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationRequest {
    pub animation: AnimationId,
    /// Absolute frame to start at.
    pub frame: u32,
}

impl AnimationRequest {
    pub fn new(animation: AnimationId) -> Self {
        Self {
            animation,
            frame: animation.start_frame(),
        }
    }

    /// Starts `offset` frames into the clip.
    pub fn at_offset(animation: AnimationId, offset: u32) -> Self {
        Self {
            animation,
            frame: animation.start_frame() + offset,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HandStatus {
    #[default]
    None,
    /// Hands are busy holding a ledge or climbing.
    Grabbing,
    Unholster,
    Holster,
    Combat,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnderwaterState {
    #[default]
    OnLand,
    Diving,
    Swimming,
}

/// Pitch (`x`), yaw (`y`) and roll (`z`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rotation {
    pub x: Angle,
    pub y: Angle,
    pub z: Angle,
}

impl Rotation {
    pub fn new(x: Angle, y: Angle, z: Angle) -> Self {
        Self { x, y, z }
    }

    pub fn yaw(y: Angle) -> Self {
        Self {
            y,
            ..Self::default()
        }
    }
}

/// Everything the locomotion states read and write about the character.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KinematicState {
    pub location: Location,
    pub rotation: Rotation,
    /// Horizontal speed along `movement_angle`.
    pub speed: i32,
    /// Vertical speed while falling; swim speed in water.
    pub fall_speed: i32,
    pub falling: bool,
    pub current_state: LaraStateId,
    pub goal_state: LaraStateId,
    /// Successor forced once the goal state is reached.
    pub required_state: Option<LaraStateId>,
    /// Direction of travel, independent of the facing.
    pub movement_angle: Angle,
    /// Persistent turn rate, damped by the controller every land frame.
    pub y_rotation_speed: Angle,
    pub hand_status: HandStatus,
    pub underwater_state: UnderwaterState,
    pub health: i32,
    pub air: i32,
    /// Cached floor height below the character.
    pub floor: i32,
    /// Frame of the playing clip, counted from the first frame of the state's
    /// base cycle. Foot-phase checks compare against these clip-local ranges.
    pub frame: u32,
    /// Bounds of the current animation frame, relative to the position.
    pub bounding_box: BoundingBox,
    /// Downhill angle of the slide in progress.
    pub current_slide_angle: Angle,
    /// Fall speed consumed by the next "start falling" animation command,
    /// zero when unset.
    pub fall_speed_override: i32,
    /// Frames jump has been held on the water surface.
    pub swim_to_dive_frames: i32,
    /// Clip change for the animation driver.
    pub animation: Option<AnimationRequest>,
}

impl KinematicState {
    /// A character standing still at `location`.
    pub fn standing(location: Location) -> Self {
        Self {
            location,
            rotation: Rotation::default(),
            speed: 0,
            fall_speed: 0,
            falling: false,
            current_state: LaraStateId::Stop,
            goal_state: LaraStateId::Stop,
            required_state: None,
            movement_angle: Angle::ZERO,
            y_rotation_speed: Angle::ZERO,
            hand_status: HandStatus::None,
            underwater_state: UnderwaterState::OnLand,
            health: LARA_HEALTH,
            air: LARA_AIR,
            floor: location.position.y,
            frame: AnimationId::StaySolid.start_frame(),
            bounding_box: standing_bounding_box(),
            current_slide_angle: Angle::ZERO,
            fall_speed_override: 0,
            swim_to_dive_frames: 0,
            animation: None,
        }
    }

    pub fn with_rotation(mut self, yaw: Angle) -> Self {
        self.rotation.y = yaw;
        self.movement_angle = yaw;
        self
    }

    pub fn in_state(mut self, state: LaraStateId) -> Self {
        self.current_state = state;
        self.goal_state = state;
        self
    }

    #[inline]
    pub fn set_goal(&mut self, state: LaraStateId) {
        self.goal_state = state;
    }

    /// Requests `animation` from its first frame.
    #[inline]
    pub fn play(&mut self, animation: AnimationId) {
        self.animation = Some(AnimationRequest::new(animation));
    }

    /// Requests `animation` starting `offset` frames in.
    #[inline]
    pub fn play_at(&mut self, animation: AnimationId, offset: u32) {
        self.animation = Some(AnimationRequest::at_offset(animation, offset));
    }

    /// Turns faster to the right, capped at `limit`.
    pub fn add_y_rotation_speed(&mut self, step: Angle, limit: Angle) {
        let next = self.y_rotation_speed.raw() as i32 + step.raw() as i32;
        self.y_rotation_speed = Angle::from_raw(next.min(limit.raw() as i32) as i16);
    }

    /// Turns faster to the left, capped at `limit` (a negative angle).
    pub fn sub_y_rotation_speed(&mut self, step: Angle, limit: Angle) {
        let next = self.y_rotation_speed.raw() as i32 - step.raw() as i32;
        self.y_rotation_speed = Angle::from_raw(next.max(limit.raw() as i32) as i16);
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

/// Frame bounds of the idle pose.
pub fn standing_bounding_box() -> BoundingBox {
    BoundingBox::new(pos(-100, -SCALP_HEIGHT, -100), pos(100, 0, 100))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::deg;
    use crate::level::RoomId;

    #[test]
    fn raw_ids_round_trip_and_reject_unknown() {
        for (index, id) in LaraStateId::ALL.iter().enumerate() {
            assert_eq!(id.raw() as usize, index);
        }
        assert_eq!(LaraStateId::from_raw(19), Some(LaraStateId::Climbing));
        assert_eq!(LaraStateId::from_raw(56), None);
    }

    #[test]
    fn rotation_speed_is_capped() {
        let mut state = KinematicState::standing(Location::new(RoomId(0), pos(0, 0, 0)));
        for _ in 0..4 {
            state.add_y_rotation_speed(deg(2.25), deg(4.0));
        }
        assert_eq!(state.y_rotation_speed, deg(4.0));
        for _ in 0..8 {
            state.sub_y_rotation_speed(deg(2.25), deg(-8.0));
        }
        assert_eq!(state.y_rotation_speed, deg(-8.0));
    }

    #[test]
    fn requests_start_at_the_clip_or_an_offset() {
        assert_eq!(AnimationRequest::new(AnimationId::HangIdle).frame, 1493);
        assert_eq!(AnimationRequest::at_offset(AnimationId::HangIdle, 21).frame, 1514);
        assert_eq!(AnimationId::Climb2Click.state(), LaraStateId::Climbing);
    }
}
