/*!
Per-state locomotion handlers.

Every state id maps to a pair of plain functions:
- input:       reads the input intents and sets the goal state, turn rates
               and swim speeds for this frame
- postprocess: configures and runs the terrain probe for the state, then
               reacts through the shared helpers

Handlers are stateless. Everything they touch comes in through [`Context`].
A handler that forces an immediate state change (a hard landing, a climb, a
fall off a ledge) records it with [`Context::substitute`]; the controller
picks the recorded id up after the call and keeps the frame's queued
rotation and movement in its [`Carry`].

Delegation between states is a direct function call, e.g. the stop handler
running the walk or run input when forward is held.
*/

mod air;
mod edge;
mod ground;
pub mod helpers;
mod interaction;
mod slide;
mod water;

use crate::collision::CollisionInfo;
use crate::error::LocomotionError;
use crate::input::InputState;
use crate::level::LevelGeometry;
use crate::settings::ControllerSettings;

use super::carry::Carry;
use super::state::{AnimationId, KinematicState, LaraStateId};

/// Everything a handler may read or mutate during one call.
pub struct Context<'a> {
    pub state: &'a mut KinematicState,
    pub input: &'a InputState,
    pub level: &'a dyn LevelGeometry,
    pub carry: &'a mut Carry,
    pub settings: &'a ControllerSettings,
    substitution: Option<LaraStateId>,
}

impl<'a> Context<'a> {
    pub fn new(
        state: &'a mut KinematicState,
        input: &'a InputState,
        level: &'a dyn LevelGeometry,
        carry: &'a mut Carry,
        settings: &'a ControllerSettings,
    ) -> Self {
        Self {
            state,
            input,
            level,
            carry,
            settings,
            substitution: None,
        }
    }

    /// Switches the current state right away, without waiting for the
    /// animation system to reach the goal.
    pub fn substitute(&mut self, id: LaraStateId) {
        self.state.current_state = id;
        self.substitution = Some(id);
    }

    pub fn take_substitution(&mut self) -> Option<LaraStateId> {
        self.substitution.take()
    }

    /// Requests a clip; the state it plays in becomes current immediately.
    pub fn set_animation(&mut self, animation: AnimationId) {
        self.state.play(animation);
        self.follow_animation(animation);
    }

    /// Requests a clip starting `offset` frames in.
    pub fn set_animation_at(&mut self, animation: AnimationId, offset: u32) {
        self.state.play_at(animation, offset);
        self.follow_animation(animation);
    }

    fn follow_animation(&mut self, animation: AnimationId) {
        let state = animation.state();
        if state != self.state.current_state {
            self.substitute(state);
        }
    }
}

pub type HandlerFn = fn(&mut Context<'_>, &mut CollisionInfo) -> Result<(), LocomotionError>;

/// The input and postprocess functions of one state.
#[derive(Clone, Copy)]
pub struct StateHandler {
    pub id: LaraStateId,
    input: HandlerFn,
    postprocess: HandlerFn,
}

impl std::fmt::Debug for StateHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateHandler").field("id", &self.id).finish()
    }
}

impl StateHandler {
    const fn new(id: LaraStateId, input: HandlerFn, postprocess: HandlerFn) -> Self {
        Self {
            id,
            input,
            postprocess,
        }
    }

    /// Runs the input phase; returns the state it substituted, if any.
    pub fn handle_input(
        &self,
        ctx: &mut Context<'_>,
        info: &mut CollisionInfo,
    ) -> Result<Option<LaraStateId>, LocomotionError> {
        (self.input)(ctx, info)?;
        Ok(ctx.take_substitution())
    }

    /// Runs the probe and collision reaction; returns the state it
    /// substituted, if any.
    pub fn postprocess_frame(
        &self,
        ctx: &mut Context<'_>,
        info: &mut CollisionInfo,
    ) -> Result<Option<LaraStateId>, LocomotionError> {
        (self.postprocess)(ctx, info)?;
        Ok(ctx.take_substitution())
    }
}

fn no_input(_: &mut Context<'_>, _: &mut CollisionInfo) -> Result<(), LocomotionError> {
    Ok(())
}

/// The handler pair for a state.
pub fn handler_for(id: LaraStateId) -> StateHandler {
    use LaraStateId as S;
    let (input, postprocess): (HandlerFn, HandlerFn) = match id {
        S::WalkForward => (ground::walk_forward_input, ground::walk_forward_postprocess),
        S::RunForward => (ground::run_forward_input, ground::run_forward_postprocess),
        S::Stop => (ground::stop_input, ground::standing_postprocess),
        S::JumpForward => (air::jump_forward_input, air::jump_forward_postprocess),
        S::Pose => (no_input, ground::standing_postprocess),
        S::RunBack => (ground::run_back_input, ground::run_back_postprocess),
        S::TurnRightSlow => (ground::turn_right_slow_input, ground::standing_postprocess),
        S::TurnLeftSlow => (ground::turn_left_slow_input, ground::standing_postprocess),
        S::Death => (interaction::death_input, interaction::death_postprocess),
        S::FreeFall => (air::free_fall_input, air::free_fall_postprocess),
        S::Hang => (edge::hang_input, edge::hang_postprocess),
        S::Reach => (air::reach_input, air::reach_postprocess),
        S::Unknown12 => (no_input, ground::wall_smash_postprocess),
        S::UnderwaterStop => (water::underwater_stop_input, water::underwater_postprocess),
        S::GrabToFall => (no_input, ground::standing_postprocess),
        S::JumpPrepare => (air::jump_prepare_input, air::jump_prepare_postprocess),
        S::WalkBackward => (ground::walk_backward_input, ground::walk_backward_postprocess),
        S::UnderwaterForward => (water::underwater_forward_input, water::underwater_postprocess),
        S::UnderwaterInertia => (water::underwater_inertia_input, water::underwater_postprocess),
        S::Climbing => (interaction::busy_input, edge::climbing_postprocess),
        S::TurnFast => (ground::turn_fast_input, ground::standing_postprocess),
        S::StepRight => (ground::step_right_input, ground::step_right_postprocess),
        S::StepLeft => (ground::step_left_input, ground::step_left_postprocess),
        S::RollBackward => (no_input, ground::roll_backward_postprocess),
        S::SlideForward => (slide::slide_forward_input, slide::slide_forward_postprocess),
        S::JumpBack => (air::airborne_input, air::jump_back_postprocess),
        S::JumpLeft => (air::airborne_input, air::jump_left_postprocess),
        S::JumpRight => (air::airborne_input, air::jump_right_postprocess),
        S::JumpUp => (air::airborne_input, air::jump_up_postprocess),
        S::FallBackward => (air::fall_backward_input, air::fall_backward_postprocess),
        S::ShimmyLeft => (edge::shimmy_left_input, edge::shimmy_left_postprocess),
        S::ShimmyRight => (edge::shimmy_right_input, edge::shimmy_right_postprocess),
        S::SlideBackward => (slide::slide_backward_input, slide::slide_backward_postprocess),
        S::OnWaterStop => (water::on_water_stop_input, water::on_water_forward_postprocess),
        S::OnWaterForward => (water::on_water_forward_input, water::on_water_forward_postprocess),
        S::UnderwaterDiving => (water::underwater_diving_input, water::underwater_postprocess),
        S::PushablePush | S::PushablePull => (interaction::busy_input, interaction::interact_postprocess),
        S::PushableGrab => (interaction::pushable_grab_input, interaction::interact_postprocess),
        S::PickUp | S::InsertKey | S::InsertPuzzle | S::UseMidas => {
            (interaction::busy_input, interaction::interact_postprocess)
        }
        S::SwitchDown | S::SwitchUp => (interaction::busy_input, interaction::interact_postprocess),
        S::WaterDeath => (water::water_death_input, water::water_death_postprocess),
        S::RollForward => (no_input, ground::roll_forward_postprocess),
        S::BoulderDeath => (no_input, no_input),
        S::OnWaterBackward => (water::on_water_backward_input, water::on_water_backward_postprocess),
        S::OnWaterLeft => (water::on_water_left_input, water::on_water_left_postprocess),
        S::OnWaterRight => (water::on_water_right_input, water::on_water_right_postprocess),
        S::MidasDeath => (interaction::death_input, interaction::midas_death_postprocess),
        S::SwandiveBegin => (air::swandive_begin_input, air::swandive_begin_postprocess),
        S::SwandiveEnd => (air::swandive_end_input, air::swandive_end_postprocess),
        S::Handstand => (interaction::busy_input, edge::climbing_postprocess),
        S::OnWaterExit => (interaction::busy_input, edge::climbing_postprocess),
    };
    StateHandler::new(id, input, postprocess)
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::angle::Angle;
    use crate::level::pos;

    #[test]
    fn every_state_has_a_handler() {
        for id in LaraStateId::ALL {
            assert_eq!(handler_for(id).id, id);
        }
    }

    #[test]
    fn substitution_is_reported_once() {
        let level = single_room(flat_room());
        let mut state = character(LaraStateId::Stop, pos(2560, 0, 2560), Angle::ZERO);
        let input = InputState::default();
        let settings = ControllerSettings::default();
        let mut carry = Carry::default();
        let mut ctx = Context::new(&mut state, &input, &level, &mut carry, &settings);

        ctx.substitute(LaraStateId::FreeFall);
        assert_eq!(ctx.take_substitution(), Some(LaraStateId::FreeFall));
        assert_eq!(ctx.take_substitution(), None);
        assert_eq!(state.current_state, LaraStateId::FreeFall);
    }

    #[test]
    fn animation_requests_switch_to_their_state() {
        let level = single_room(flat_room());
        let mut state = character(LaraStateId::WalkForward, pos(2560, 0, 2560), Angle::ZERO);
        let input = InputState::default();
        let settings = ControllerSettings::default();
        let mut carry = Carry::default();
        let mut ctx = Context::new(&mut state, &input, &level, &mut carry, &settings);

        ctx.set_animation(AnimationId::WalkDownLeft);
        assert_eq!(ctx.take_substitution(), None);
        ctx.set_animation(AnimationId::FreeFallForward);
        assert_eq!(ctx.take_substitution(), Some(LaraStateId::JumpForward));
    }
}
