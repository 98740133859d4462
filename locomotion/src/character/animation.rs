//! The boundary to the animation system.
//!
//! States only write goal states and clip requests; an [`AnimationDriver`]
//! decides which state actually plays next and reports what the played frame
//! contributes to the movement (floor speed, scripted commands). Hosts plug in
//! their skeletal animation player here. [`GoalFollower`] is the stand-in used
//! by hosts without one and by the tests.

use crate::level::{BoundingBox, Position};

use super::state::{KinematicState, LaraStateId, standing_bounding_box};

/// Scripted effects attached to animation frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimCommand {
    /// Local offset rotated by the character's yaw (`z` forward, `x` right).
    SetPosition(Position),
    /// Launches the character into the air.
    StartFalling { fall_speed: i32, speed: i32 },
    EmptyHands,
}

/// Result of advancing the animation by one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameAdvance {
    pub current_state: LaraStateId,
    pub frame: u32,
    /// Horizontal speed of the played frame; `None` leaves the speed alone.
    pub floor_speed: Option<i32>,
    pub bounding_box: BoundingBox,
    pub commands: Vec<AnimCommand>,
}

pub trait AnimationDriver {
    /// Plays one frame given the state after input handling. A pending
    /// `state.animation` request must be honored first.
    fn advance(&mut self, state: &KinematicState) -> FrameAdvance;
}

pub const JUMP_START_FALL_SPEED: i32 = -20;
pub const JUMP_START_SPEED: i32 = 50;

/// Switches straight to the goal state and moves at constant per-state speeds.
#[derive(Clone, Copy, Debug, Default)]
pub struct GoalFollower;

impl GoalFollower {
    pub fn new() -> Self {
        Self
    }

    /// Horizontal speed while the state plays on the ground.
    pub fn floor_speed(state: LaraStateId) -> Option<i32> {
        use LaraStateId as S;
        let speed = match state {
            S::WalkForward => 20,
            S::RunForward => 50,
            S::RunBack => 20,
            S::WalkBackward | S::StepLeft | S::StepRight => 12,
            S::SlideForward | S::SlideBackward => 50,
            S::RollForward | S::RollBackward => 30,
            S::JumpForward
            | S::JumpBack
            | S::JumpLeft
            | S::JumpRight
            | S::JumpUp
            | S::FallBackward
            | S::FreeFall
            | S::Reach
            | S::SwandiveBegin
            | S::SwandiveEnd => return None,
            _ => 0,
        };
        Some(speed)
    }

    fn launch_speed(state: LaraStateId) -> Option<i32> {
        use LaraStateId as S;
        match state {
            S::JumpForward | S::JumpBack | S::JumpLeft | S::JumpRight | S::SwandiveBegin => {
                Some(JUMP_START_SPEED)
            }
            S::JumpUp => Some(0),
            _ => None,
        }
    }
}

impl AnimationDriver for GoalFollower {
    fn advance(&mut self, state: &KinematicState) -> FrameAdvance {
        let mut commands = Vec::new();

        let (current_state, frame) = if let Some(request) = state.animation {
            (request.animation.state(), request.frame)
        } else {
            let target = match state.required_state {
                Some(required) if state.goal_state == state.current_state => required,
                _ => state.goal_state,
            };
            if target != state.current_state {
                match Self::launch_speed(target) {
                    Some(speed) if !state.falling => commands.push(AnimCommand::StartFalling {
                        fall_speed: JUMP_START_FALL_SPEED,
                        speed,
                    }),
                    _ => {}
                }
                (target, 0)
            } else {
                (state.current_state, state.frame.wrapping_add(1))
            }
        };

        FrameAdvance {
            current_state,
            frame,
            floor_speed: Self::floor_speed(current_state),
            bounding_box: standing_bounding_box(),
            commands,
        }
    }
}
