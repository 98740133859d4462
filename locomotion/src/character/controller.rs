/*!
Per-frame driver of the player character.

One call to [`LaraController::update`] runs a full locomotion frame:
1. water transitions (land -> diving, diving -> surface or land, swimming -> land)
2. air supply and drowning
3. the active state's input handler
4. tilt and turn-rate damping
5. one animation frame, including its scripted commands
6. movement integration (gravity on land, fall speed along pitch/yaw in water)
7. the postprocess handler of whatever state is now current
8. the queued carry and the floor/room refresh

Geometry errors abort the frame. `update` logs them, trips a debug assertion
and restores the state the frame started from. `update_or_rollback` restores
and returns the error, and `try_update` returns it with the partial frame
left in place.
*/

use crate::angle::deg;
use crate::collision::{CollisionInfo, PolicyFlag};
use crate::constants::{
    AIR_REFILL_RATE, DEFAULT_COLLISION_RADIUS, DIVE_MAX_PITCH, DIVE_MAX_ROLL, FALL_SPEED_GRAVITY_LIMIT,
    FLOOR_PROBE_OFFSET, GRAVITY, HEIGHT_LIMIT, LARA_DIVE_HEIGHT, TILT_DECAY_DIVING, TILT_DECAY_LAND,
    TURN_SPEED_DECAY, WATER_SURFACE_SNAP_DISTANCE,
};
use crate::error::LocomotionError;
use crate::input::InputState;
use crate::level::{LevelGeometry, pos, water_surface_height};
use crate::settings::ControllerSettings;

use super::animation::{AnimCommand, AnimationDriver, FrameAdvance, GoalFollower};
use super::carry::Carry;
use super::handlers::helpers::update_floor_height;
use super::handlers::{Context, handler_for};
use super::state::{AnimationId, HandStatus, KinematicState, LaraStateId, UnderwaterState};

/// Owns the character state between frames.
#[derive(Debug)]
pub struct LaraController<A: AnimationDriver = GoalFollower> {
    state: KinematicState,
    settings: ControllerSettings,
    carry: Carry,
    driver: A,
}

impl LaraController<GoalFollower> {
    /// A controller with default settings and the built-in goal follower.
    pub fn new(state: KinematicState) -> Self {
        Self::with_driver(state, ControllerSettings::default(), GoalFollower::new())
    }
}

impl<A: AnimationDriver> LaraController<A> {
    pub fn with_driver(state: KinematicState, settings: ControllerSettings, driver: A) -> Self {
        Self {
            state,
            settings,
            carry: Carry::default(),
            driver,
        }
    }

    pub fn state(&self) -> &KinematicState {
        &self.state
    }

    /// Direct access for hosts that teleport, heal or script the character.
    pub fn state_mut(&mut self) -> &mut KinematicState {
        &mut self.state
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn driver(&self) -> &A {
        &self.driver
    }

    /// Runs one frame. A frame that hits inconsistent geometry is rolled back
    /// as a whole.
    pub fn update(&mut self, level: &dyn LevelGeometry, input: &InputState) {
        if let Err(err) = self.update_or_rollback(level, input) {
            log::error!(
                "locomotion frame in room {} aborted: {err}",
                self.state.location.room.0
            );
            debug_assert!(false, "inconsistent level geometry: {err}");
        }
    }

    /// Runs one frame. On a geometry error every field of the state and the
    /// pending carry go back to how the frame found them.
    pub fn update_or_rollback(
        &mut self,
        level: &dyn LevelGeometry,
        input: &InputState,
    ) -> Result<(), LocomotionError> {
        let snapshot = self.state.clone();
        let result = self.try_update(level, input);
        if result.is_err() {
            self.state = snapshot;
            self.carry = Carry::default();
        }
        result
    }

    /// Runs one frame and reports geometry errors to the caller. The state is
    /// left as it was when the error surfaced.
    pub fn try_update(&mut self, level: &dyn LevelGeometry, input: &InputState) -> Result<(), LocomotionError> {
        self.update_water_state(level)?;
        self.update_air();
        self.run_frame(level, input)
    }

    fn update_water_state(&mut self, level: &dyn LevelGeometry) -> Result<(), LocomotionError> {
        let in_water = level.is_water_room(self.state.location.room)?;
        match self.state.underwater_state {
            UnderwaterState::OnLand if in_water => self.enter_water(level),
            UnderwaterState::Diving if !in_water => self.leave_dive(level),
            UnderwaterState::Swimming if !in_water => {
                log::debug!("left the water surface");
                let state = &mut self.state;
                state.underwater_state = UnderwaterState::OnLand;
                Self::fall_from_water(state);
                state.speed = std::mem::take(&mut state.fall_speed) / 4;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn enter_water(&mut self, level: &dyn LevelGeometry) -> Result<(), LocomotionError> {
        log::debug!(
            "entered water in {:?} at fall speed {}",
            self.state.current_state,
            self.state.fall_speed
        );
        let state = &mut self.state;
        state.air = self.settings.max_air;
        state.underwater_state = UnderwaterState::Diving;
        state.falling = false;
        state.location.position.y += 100;
        update_floor_height(state, level, 0, self.settings.max_resolve_iterations)?;

        match state.current_state {
            LaraStateId::SwandiveBegin | LaraStateId::SwandiveEnd => {
                state.rotation.x = if state.current_state == LaraStateId::SwandiveBegin {
                    deg(-45.0)
                } else {
                    deg(-85.0)
                };
                state.set_goal(LaraStateId::UnderwaterDiving);
                self.advance_animation();
                self.state.fall_speed *= 2;
            }
            _ => {
                state.rotation.x = deg(-45.0);
                Self::play_now(state, AnimationId::FreeFallToUnderwater);
                state.set_goal(LaraStateId::UnderwaterForward);
                state.fall_speed += state.fall_speed / 2;
            }
        }
        Ok(())
    }

    fn leave_dive(&mut self, level: &dyn LevelGeometry) -> Result<(), LocomotionError> {
        let surface = water_surface_height(level, &self.state.location, self.settings.max_resolve_iterations)?;
        let state = &mut self.state;
        state.fall_speed = 0;
        state.rotation.x = deg(0.0);
        state.rotation.z = deg(0.0);
        state.hand_status = HandStatus::None;

        match surface {
            Some(surface) if (surface - state.location.position.y).abs() < WATER_SURFACE_SNAP_DISTANCE => {
                log::debug!("surfaced at {surface}");
                state.underwater_state = UnderwaterState::Swimming;
                Self::play_now(state, AnimationId::UnderwaterToOnWater);
                state.set_goal(LaraStateId::OnWaterStop);
                state.location.position.y = surface + 1;
                state.swim_to_dive_frames = self.settings.swim_to_dive_frames + 1;
                update_floor_height(state, level, FLOOR_PROBE_OFFSET, self.settings.max_resolve_iterations)?;
            }
            _ => {
                log::debug!("left the water without a surface to hold on to");
                state.underwater_state = UnderwaterState::OnLand;
                Self::fall_from_water(state);
                state.speed = 0;
            }
        }
        Ok(())
    }

    fn fall_from_water(state: &mut KinematicState) {
        Self::play_now(state, AnimationId::FreeFallForward);
        state.set_goal(LaraStateId::JumpForward);
        state.falling = true;
        state.hand_status = HandStatus::None;
        state.rotation.x = deg(0.0);
        state.rotation.z = deg(0.0);
    }

    /// Requests `animation` and switches to its state without waiting for
    /// the driver.
    fn play_now(state: &mut KinematicState, animation: AnimationId) {
        state.play(animation);
        state.current_state = animation.state();
    }

    fn update_air(&mut self) {
        let state = &mut self.state;
        match state.underwater_state {
            UnderwaterState::OnLand => state.air = self.settings.max_air,
            UnderwaterState::Diving => {
                if state.health >= 0 {
                    state.air -= 1;
                    if state.air < 0 {
                        state.air = -1;
                        state.health -= self.settings.drown_damage;
                    }
                }
            }
            UnderwaterState::Swimming => {
                if state.health >= 0 {
                    state.air = (state.air + AIR_REFILL_RATE).min(self.settings.max_air);
                }
            }
        }
    }

    fn new_collision_info(&self) -> CollisionInfo {
        let position = self.state.location.position;
        match self.state.underwater_state {
            UnderwaterState::OnLand => {
                let mut info = CollisionInfo::new(position, self.settings.collision_radius);
                info.policy
                    .add_many(&[PolicyFlag::EnableSpaz, PolicyFlag::EnableBaddiePush]);
                info
            }
            UnderwaterState::Diving => {
                let mut info = CollisionInfo::new(position, self.settings.collision_radius_underwater);
                info.set_limits(-LARA_DIVE_HEIGHT, HEIGHT_LIMIT, LARA_DIVE_HEIGHT);
                info
            }
            UnderwaterState::Swimming => {
                let mut info = CollisionInfo::new(position, self.settings.collision_radius);
                info.set_limits(-DEFAULT_COLLISION_RADIUS, HEIGHT_LIMIT, DEFAULT_COLLISION_RADIUS);
                info
            }
        }
    }

    fn run_frame(&mut self, level: &dyn LevelGeometry, input: &InputState) -> Result<(), LocomotionError> {
        let medium = self.state.underwater_state;
        let mut info = self.new_collision_info();

        let handler = handler_for(self.state.current_state);
        let substituted = {
            let mut ctx = Context::new(&mut self.state, input, level, &mut self.carry, &self.settings);
            handler.handle_input(&mut ctx, &mut info)?
        };
        log_substitution(handler.id, substituted);

        self.damp_rotation(medium);
        let advance = self.advance_animation();
        self.integrate_movement(medium, &advance);

        let handler = handler_for(self.state.current_state);
        let substituted = {
            let mut ctx = Context::new(&mut self.state, input, level, &mut self.carry, &self.settings);
            handler.postprocess_frame(&mut ctx, &mut info)?
        };
        log_substitution(handler.id, substituted);

        self.carry.apply(&mut self.state);

        let dy = match medium {
            UnderwaterState::OnLand => FLOOR_PROBE_OFFSET,
            UnderwaterState::Diving => 0,
            UnderwaterState::Swimming => DEFAULT_COLLISION_RADIUS,
        };
        update_floor_height(&mut self.state, level, dy, self.settings.max_resolve_iterations)
    }

    fn damp_rotation(&mut self, medium: UnderwaterState) {
        let state = &mut self.state;
        match medium {
            UnderwaterState::OnLand => {
                state.rotation.z = state.rotation.z.decayed(TILT_DECAY_LAND);
                state.y_rotation_speed = state.y_rotation_speed.decayed(TURN_SPEED_DECAY);
                state.rotation.y += state.y_rotation_speed;
            }
            UnderwaterState::Diving => {
                let rotation = &mut state.rotation;
                rotation.z = rotation.z.decayed(TILT_DECAY_DIVING).clamp_abs(DIVE_MAX_ROLL);
                rotation.x = rotation.x.clamp_abs(DIVE_MAX_PITCH);
            }
            UnderwaterState::Swimming => {
                state.rotation.z = state.rotation.z.decayed(TILT_DECAY_DIVING);
            }
        }
    }

    /// Plays one animation frame and runs the commands attached to it.
    fn advance_animation(&mut self) -> FrameAdvance {
        let advance = self.driver.advance(&self.state);
        let state = &mut self.state;

        for command in &advance.commands {
            match *command {
                AnimCommand::SetPosition(local) => {
                    let yaw = state.rotation.y;
                    let dx = yaw.cos_of(local.x) + yaw.sin_of(local.z);
                    let dz = yaw.cos_of(local.z) - yaw.sin_of(local.x);
                    state.location.position += pos(dx, local.y, dz);
                }
                AnimCommand::StartFalling { fall_speed, speed } => {
                    state.fall_speed = if state.fall_speed_override != 0 {
                        std::mem::take(&mut state.fall_speed_override)
                    } else {
                        fall_speed
                    };
                    state.speed = speed;
                    state.falling = true;
                }
                AnimCommand::EmptyHands => state.hand_status = HandStatus::None,
            }
        }

        if advance.current_state != state.current_state {
            log::debug!("animation {:?} -> {:?}", state.current_state, advance.current_state);
        }
        state.current_state = advance.current_state;
        state.frame = advance.frame;
        state.bounding_box = advance.bounding_box;
        state.animation = None;
        if state.required_state == Some(state.current_state) {
            state.required_state = None;
        }
        advance
    }

    fn integrate_movement(&mut self, medium: UnderwaterState, advance: &FrameAdvance) {
        let state = &mut self.state;
        match medium {
            UnderwaterState::OnLand => {
                if state.falling {
                    state.fall_speed += if state.fall_speed < FALL_SPEED_GRAVITY_LIMIT {
                        GRAVITY
                    } else {
                        1
                    };
                    state.location.position.y += state.fall_speed;
                } else if let Some(speed) = advance.floor_speed {
                    state.speed = speed;
                }
                let angle = state.movement_angle;
                state.location.position += pos(angle.sin_of(state.speed), 0, angle.cos_of(state.speed));
            }
            UnderwaterState::Diving => {
                let (pitch, yaw) = (state.rotation.x, state.rotation.y);
                let distance = state.fall_speed as f32 / 4.0;
                state.location.position += pos(
                    (yaw.sin() * pitch.cos() * distance) as i32,
                    -(pitch.sin() * distance) as i32,
                    (yaw.cos() * pitch.cos() * distance) as i32,
                );
            }
            UnderwaterState::Swimming => {
                let angle = state.movement_angle;
                let distance = state.fall_speed / 4;
                state.location.position += pos(angle.sin_of(distance), 0, angle.cos_of(distance));
            }
        }
    }
}

fn log_substitution(from: LaraStateId, to: Option<LaraStateId>) {
    if let Some(to) = to {
        log::debug!("state {from:?} -> {to:?}");
    }
}
