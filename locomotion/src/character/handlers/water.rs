//! Diving and surface swimming.
//!
//! Underwater states steer pitch, yaw and roll directly and share one probe
//! around the body's centre. Surface states share the probe, the dive
//! trigger and the climb out of the water.

use crate::angle::{Angle, Axis, align_rotation, deg};
use crate::collision::{AxisCollision, CollisionInfo};
use crate::constants::{
    CLIMB_LIMIT_2_CLICK_MIN, DIVE_MAX_SPEED, DIVE_PITCH_SPEED, DIVE_ROLL_SPEED, DIVE_YAW_SPEED,
    FLOOR_PROBE_OFFSET, HEIGHT_LIMIT, LARA_DIVE_GROUND_ELEVATION, LARA_DIVE_HEIGHT, LARA_SWIM_HEIGHT,
    MAX_GRABBABLE_GRADIENT, QUARTER_SECTOR_SIZE, SECTOR_SIZE, SURFACE_DIVE_SPEED,
    SURFACE_SWIM_ACCELERATION, SURFACE_SWIM_MAX_SPEED, WATER_DRAG, WATER_TURN_SPEED,
    WATER_TURN_SPEED_SLOW,
};
use crate::error::LocomotionError;
use crate::input::AxisMovement;
use crate::level::{pos, water_surface_height};

use super::Context;
use super::helpers::{apply_collision_feedback, probe_at, update_floor_height};
use crate::character::state::{AnimationId, HandStatus, LaraStateId, Rotation, UnderwaterState};

type HandlerResult = Result<(), LocomotionError>;

/// Nudge applied when a front corner grazes a wall while swimming.
const SWIM_GLANCE_TURN: Angle = deg(5.0);

/// Floor rise and ceiling clearance tolerated ahead on the surface.
const SURFACE_CLEARANCE: i32 = 100;

/// Swim speed below which a drifting dive comes to rest.
const INERTIA_STOP_SPEED: i32 = 133;

/// Distance the body sinks per frame after drowning, until it floats up.
const WATER_DEATH_FLOAT_SPEED: i32 = 5;

/// Swim speed lost per frame after drowning.
const WATER_DEATH_DRAG: i32 = 8;

fn steer_dive(ctx: &mut Context<'_>) {
    let rotation = &mut ctx.state.rotation;
    match ctx.input.z_movement {
        AxisMovement::Forward => rotation.x -= DIVE_PITCH_SPEED,
        AxisMovement::Backward => rotation.x += DIVE_PITCH_SPEED,
        _ => {}
    }
    match ctx.input.x_movement {
        AxisMovement::Left => {
            rotation.y -= DIVE_YAW_SPEED;
            rotation.z -= DIVE_ROLL_SPEED;
        }
        AxisMovement::Right => {
            rotation.y += DIVE_YAW_SPEED;
            rotation.z += DIVE_ROLL_SPEED;
        }
        _ => {}
    }
}

/// Returns `true` after switching to the drowning state.
fn drowned(ctx: &mut Context<'_>) -> bool {
    if ctx.state.health < 0 {
        ctx.state.set_goal(LaraStateId::WaterDeath);
        return true;
    }
    false
}

pub(super) fn underwater_stop_input(ctx: &mut Context<'_>, _: &mut CollisionInfo) -> HandlerResult {
    if drowned(ctx) {
        return Ok(());
    }
    steer_dive(ctx);
    if ctx.input.jump {
        ctx.state.set_goal(LaraStateId::UnderwaterForward);
    }
    ctx.state.fall_speed = (ctx.state.fall_speed - WATER_DRAG).max(0);
    Ok(())
}

pub(super) fn underwater_forward_input(ctx: &mut Context<'_>, _: &mut CollisionInfo) -> HandlerResult {
    if drowned(ctx) {
        return Ok(());
    }
    steer_dive(ctx);
    if !ctx.input.jump {
        ctx.state.set_goal(LaraStateId::UnderwaterInertia);
    }
    ctx.state.fall_speed = (ctx.state.fall_speed + SURFACE_SWIM_ACCELERATION).min(DIVE_MAX_SPEED);
    Ok(())
}

pub(super) fn underwater_inertia_input(ctx: &mut Context<'_>, _: &mut CollisionInfo) -> HandlerResult {
    if drowned(ctx) {
        return Ok(());
    }
    steer_dive(ctx);
    if ctx.input.jump {
        ctx.state.set_goal(LaraStateId::UnderwaterForward);
    }
    ctx.state.fall_speed = (ctx.state.fall_speed - WATER_DRAG).max(0);
    if ctx.state.fall_speed <= INERTIA_STOP_SPEED {
        ctx.state.set_goal(LaraStateId::UnderwaterStop);
    }
    Ok(())
}

/// The plunge into the water only lets the character tip further down.
pub(super) fn underwater_diving_input(ctx: &mut Context<'_>, _: &mut CollisionInfo) -> HandlerResult {
    if ctx.input.moving_forward() {
        ctx.state.rotation.x -= deg(1.0);
    }
    Ok(())
}

pub(super) fn underwater_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    let mut facing = ctx.state.rotation.y;
    if ctx.state.rotation.x.abs_units() > deg(90.0).abs_units() {
        facing += deg(180.0);
    }
    ctx.state.movement_angle = facing;
    info.facing_angle = facing;
    info.set_limits(-LARA_DIVE_HEIGHT, HEIGHT_LIMIT, LARA_DIVE_HEIGHT);
    let probe_position = ctx.state.location.position + pos(0, LARA_DIVE_GROUND_ELEVATION, 0);
    probe_at(ctx, info, &probe_position, LARA_DIVE_HEIGHT)?;
    apply_collision_feedback(ctx.state, info);

    let pitch = ctx.state.rotation.x;
    match info.collision_type {
        AxisCollision::FrontLeft => ctx.carry.rotate_y(SWIM_GLANCE_TURN),
        AxisCollision::FrontRight => ctx.carry.rotate_y(-SWIM_GLANCE_TURN),
        AxisCollision::Jammed => {
            ctx.state.fall_speed = 0;
            return Ok(());
        }
        AxisCollision::FrontTop => ctx.state.fall_speed = 0,
        AxisCollision::Top => {
            if pitch > deg(-45.0) {
                ctx.carry.rotate_x(-DIVE_PITCH_SPEED);
            }
        }
        AxisCollision::Front => {
            if pitch > deg(35.0) {
                ctx.carry.rotate_x(DIVE_PITCH_SPEED);
            } else if pitch < deg(-35.0) {
                ctx.carry.rotate_x(-DIVE_PITCH_SPEED);
            } else {
                ctx.state.fall_speed = 0;
            }
        }
        AxisCollision::None => {}
    }

    if info.mid.floor.dy < 0 {
        ctx.state.location.position.y += info.mid.floor.dy;
        ctx.carry.rotate_x(DIVE_PITCH_SPEED);
    }
    Ok(())
}

/// The body levels out and drifts to a stop.
pub(super) fn water_death_input(ctx: &mut Context<'_>, _: &mut CollisionInfo) -> HandlerResult {
    let pitch = ctx.state.rotation.x;
    ctx.state.rotation.x = if pitch.abs_units() <= DIVE_PITCH_SPEED.abs_units() {
        Angle::ZERO
    } else if pitch.raw() < 0 {
        pitch + DIVE_PITCH_SPEED
    } else {
        pitch - DIVE_PITCH_SPEED
    };
    ctx.state.fall_speed = (ctx.state.fall_speed - WATER_DEATH_DRAG).max(0);
    Ok(())
}

pub(super) fn water_death_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    ctx.state.health = -1;
    ctx.state.air = -1;
    ctx.state.hand_status = HandStatus::Grabbing;
    if let Some(surface) = water_surface_height(ctx.level, &ctx.state.location, ctx.settings.max_resolve_iterations)? {
        if surface < ctx.state.location.position.y - 100 {
            ctx.state.location.position.y -= WATER_DEATH_FLOAT_SPEED;
        }
    }
    underwater_postprocess(ctx, info)
}

/// Leaves the surface head first.
fn dive(ctx: &mut Context<'_>) {
    log::debug!("diving from the water surface");
    ctx.state.set_goal(LaraStateId::UnderwaterForward);
    ctx.set_animation(AnimationId::FreeFallToUnderwaterAlternate);
    ctx.state.rotation.x = deg(-45.0);
    ctx.state.fall_speed = SURFACE_DIVE_SPEED;
    ctx.state.underwater_state = UnderwaterState::Diving;
}

fn surface_swim_stroke(ctx: &mut Context<'_>) {
    ctx.state.fall_speed = (ctx.state.fall_speed + SURFACE_SWIM_ACCELERATION).min(SURFACE_SWIM_MAX_SPEED);
}

fn surface_turn(ctx: &mut Context<'_>, speed: Angle) {
    match ctx.input.x_movement {
        AxisMovement::Left => ctx.state.rotation.y -= speed,
        AxisMovement::Right => ctx.state.rotation.y += speed,
        _ => {}
    }
}

pub(super) fn on_water_stop_input(ctx: &mut Context<'_>, _: &mut CollisionInfo) -> HandlerResult {
    ctx.state.fall_speed = (ctx.state.fall_speed - 4).max(0);

    if !ctx.state.is_alive() {
        ctx.state.set_goal(LaraStateId::WaterDeath);
        return Ok(());
    }

    if ctx.input.free_look {
        return Ok(());
    }

    surface_turn(ctx, WATER_TURN_SPEED);

    if ctx.input.moving_forward() {
        ctx.state.set_goal(LaraStateId::OnWaterForward);
    } else if ctx.input.moving_backward() {
        ctx.state.set_goal(LaraStateId::OnWaterBackward);
    }

    if ctx.input.stepping_left() {
        ctx.state.set_goal(LaraStateId::OnWaterLeft);
    } else if ctx.input.stepping_right() {
        ctx.state.set_goal(LaraStateId::OnWaterRight);
    }

    if !ctx.input.jump {
        ctx.state.swim_to_dive_frames = 0;
        return Ok(());
    }

    ctx.state.swim_to_dive_frames += 1;
    if ctx.state.swim_to_dive_frames == ctx.settings.swim_to_dive_frames {
        dive(ctx);
    }
    Ok(())
}

/// Shared prologue of the moving surface states. Returns `false` when the
/// character drowned.
fn surface_stroke_input(ctx: &mut Context<'_>) -> bool {
    if !ctx.state.is_alive() {
        ctx.state.set_goal(LaraStateId::WaterDeath);
        return false;
    }
    ctx.state.swim_to_dive_frames = 0;
    true
}

pub(super) fn on_water_forward_input(ctx: &mut Context<'_>, _: &mut CollisionInfo) -> HandlerResult {
    if !surface_stroke_input(ctx) {
        return Ok(());
    }
    if !ctx.input.moving_forward() || ctx.input.jump {
        ctx.state.set_goal(LaraStateId::OnWaterStop);
    }
    surface_swim_stroke(ctx);
    surface_turn(ctx, WATER_TURN_SPEED);
    Ok(())
}

pub(super) fn on_water_backward_input(ctx: &mut Context<'_>, _: &mut CollisionInfo) -> HandlerResult {
    if !surface_stroke_input(ctx) {
        return Ok(());
    }
    if !ctx.input.moving_backward() {
        ctx.state.set_goal(LaraStateId::OnWaterStop);
    }
    surface_swim_stroke(ctx);
    surface_turn(ctx, WATER_TURN_SPEED_SLOW);
    Ok(())
}

pub(super) fn on_water_left_input(ctx: &mut Context<'_>, _: &mut CollisionInfo) -> HandlerResult {
    if !surface_stroke_input(ctx) {
        return Ok(());
    }
    if !ctx.input.stepping_left() {
        ctx.state.set_goal(LaraStateId::OnWaterStop);
    }
    surface_swim_stroke(ctx);
    surface_turn(ctx, WATER_TURN_SPEED_SLOW);
    Ok(())
}

pub(super) fn on_water_right_input(ctx: &mut Context<'_>, _: &mut CollisionInfo) -> HandlerResult {
    if !surface_stroke_input(ctx) {
        return Ok(());
    }
    if !ctx.input.stepping_right() {
        ctx.state.set_goal(LaraStateId::OnWaterStop);
    }
    surface_swim_stroke(ctx);
    surface_turn(ctx, WATER_TURN_SPEED_SLOW);
    Ok(())
}

/// Probe, wall reaction and the choice between climbing out and diving.
fn common_on_water_handling(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    info.facing_angle = ctx.state.movement_angle;
    info.set_limits(-SURFACE_CLEARANCE, HEIGHT_LIMIT, SURFACE_CLEARANCE);
    let probe_position = ctx.state.location.position + pos(0, LARA_SWIM_HEIGHT, 0);
    probe_at(ctx, info, &probe_position, LARA_SWIM_HEIGHT)?;
    apply_collision_feedback(ctx.state, info);

    let blocked = matches!(
        info.collision_type,
        AxisCollision::Front | AxisCollision::FrontTop | AxisCollision::Top | AxisCollision::Jammed
    );
    if info.mid.floor.dy < 0 || blocked {
        ctx.state.fall_speed = 0;
        ctx.state.location.position = info.initial_position;
    } else if info.collision_type == AxisCollision::FrontLeft {
        ctx.carry.rotate_y(SWIM_GLANCE_TURN);
    } else if info.collision_type == AxisCollision::FrontRight {
        ctx.carry.rotate_y(-SWIM_GLANCE_TURN);
    }

    let surface = water_surface_height(ctx.level, &ctx.state.location, ctx.settings.max_resolve_iterations)?;
    match surface {
        Some(surface) if surface > ctx.state.location.position.y - 100 => {
            try_climb_out_of_water(ctx, info)?;
        }
        _ => dive(ctx),
    }
    Ok(())
}

/// Pulls out onto a ledge at water level when swimming straight at it with
/// action held.
fn try_climb_out_of_water(ctx: &mut Context<'_>, info: &CollisionInfo) -> Result<bool, LocomotionError> {
    if ctx.state.movement_angle != ctx.state.rotation.y
        || info.collision_type != AxisCollision::Front
        || !ctx.input.action
        || info.front_gradient() >= MAX_GRABBABLE_GRADIENT
        || info.front.ceiling.dy > 0
        || info.mid.ceiling.dy > -CLIMB_LIMIT_2_CLICK_MIN
    {
        return Ok(false);
    }

    let ledge = info.front.floor.dy + LARA_SWIM_HEIGHT;
    if ledge <= -2 * QUARTER_SECTOR_SIZE || ledge > 100 {
        return Ok(false);
    }

    let Some(aligned) = align_rotation(ctx.state.rotation.y, deg(35.0)) else {
        return Ok(false);
    };

    ctx.state.location.position.y += 695 + info.front.floor.dy;
    update_floor_height(
        ctx.state,
        ctx.level,
        FLOOR_PROBE_OFFSET,
        ctx.settings.max_resolve_iterations,
    )?;

    let position = &mut ctx.state.location.position;
    let sector_x = position.x.div_euclid(SECTOR_SIZE);
    let sector_z = position.z.div_euclid(SECTOR_SIZE);
    match aligned.axis() {
        Axis::PosZ => position.z = (sector_z + 1) * SECTOR_SIZE + 100,
        Axis::NegZ => position.z = sector_z * SECTOR_SIZE - 100,
        Axis::NegX => position.x = sector_x * SECTOR_SIZE - 100,
        Axis::PosX => position.x = (sector_x + 1) * SECTOR_SIZE + 100,
    }

    log::debug!("climbing out of the water at {:?}", ctx.state.location.position);
    ctx.state.set_goal(LaraStateId::Stop);
    ctx.set_animation(AnimationId::ClimbOutOfWater);
    ctx.state.speed = 0;
    ctx.state.fall_speed = 0;
    ctx.state.falling = false;
    ctx.state.rotation = Rotation::yaw(aligned);
    ctx.state.hand_status = HandStatus::Grabbing;
    ctx.state.underwater_state = UnderwaterState::OnLand;
    Ok(true)
}

fn on_water_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo, offset: Angle) -> HandlerResult {
    ctx.state.movement_angle = ctx.state.rotation.y + offset;
    common_on_water_handling(ctx, info)
}

pub(super) fn on_water_forward_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    on_water_postprocess(ctx, info, Angle::ZERO)
}

pub(super) fn on_water_backward_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    on_water_postprocess(ctx, info, deg(180.0))
}

pub(super) fn on_water_left_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    on_water_postprocess(ctx, info, deg(-90.0))
}

pub(super) fn on_water_right_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    on_water_postprocess(ctx, info, deg(90.0))
}

#[cfg(test)]
mod tests {
    use crate::angle::{Angle, deg};
    use crate::character::handlers::test_support::*;
    use crate::character::state::{AnimationId, HandStatus, KinematicState, LaraStateId, UnderwaterState};
    use crate::input::InputState;
    use crate::level::{Level, RoomBuilder, RoomId, Sector, pos};

    /// A dry room stacked on a water room; the surface is at y = 0 and a
    /// ledge at y = -100 starts at z = 3072.
    fn pool() -> Level {
        let mut level = Level::new();
        level.add_room(
            RoomBuilder::new(0, 0, 8, 8)
                .fill(Sector::open(0, -4096).with_room_below(RoomId(1)))
                .border_walls()
                .edit_area(1..=6, 3..=6, |_| Sector::open(-100, -4096))
                .build(),
        );
        level.add_room(
            RoomBuilder::new(0, 0, 8, 8)
                .fill(Sector::open(2048, 0).with_room_above(RoomId(0)))
                .border_walls()
                .edit_area(1..=6, 3..=6, |_| Sector::WALL)
                .water()
                .build(),
        );
        level
    }

    fn swimming(state: LaraStateId, z: i32) -> KinematicState {
        let mut lara = character(state, pos(2560, 1, z), Angle::ZERO);
        lara.location.room = RoomId(1);
        lara.underwater_state = UnderwaterState::Swimming;
        lara
    }

    #[test]
    fn holding_jump_dives_after_the_delay() {
        let level = pool();
        let mut lara = swimming(LaraStateId::OnWaterStop, 2000);
        let jump = InputState::default().with_jump();

        for _ in 0..9 {
            assert_eq!(run_input(&level, &mut lara, &jump), None);
        }
        assert_eq!(lara.swim_to_dive_frames, 9);

        assert_eq!(run_input(&level, &mut lara, &jump), Some(LaraStateId::UnderwaterDiving));
        assert_eq!(lara.goal_state, LaraStateId::UnderwaterForward);
        assert_eq!(lara.rotation.x, deg(-45.0));
        assert_eq!(lara.fall_speed, 80);
        assert_eq!(lara.underwater_state, UnderwaterState::Diving);
    }

    #[test]
    fn jump_held_while_surfacing_does_not_dive_again() {
        let level = pool();
        let mut lara = swimming(LaraStateId::OnWaterStop, 2000);
        lara.swim_to_dive_frames = 11;
        let jump = InputState::default().with_jump();
        for _ in 0..20 {
            assert_eq!(run_input(&level, &mut lara, &jump), None);
        }

        run_input(&level, &mut lara, &InputState::default());
        assert_eq!(lara.swim_to_dive_frames, 0);
    }

    #[test]
    fn swimming_at_a_ledge_with_action_climbs_out() {
        let level = pool();
        let mut lara = swimming(LaraStateId::OnWaterStop, 3000);
        let input = InputState::default().with_action();

        let (next, info, _) = run_postprocess(&level, &mut lara, &input);
        assert_eq!(info.front.floor.dy, -801);
        assert_eq!(next, Some(LaraStateId::OnWaterExit));
        assert_eq!(lara.animation.map(|a| a.animation), Some(AnimationId::ClimbOutOfWater));
        assert_eq!(lara.goal_state, LaraStateId::Stop);
        assert_eq!(lara.location.position, pos(2560, -105, 3172));
        assert_eq!(lara.location.room, RoomId(0));
        assert_eq!(lara.underwater_state, UnderwaterState::OnLand);
        assert_eq!(lara.hand_status, HandStatus::Grabbing);
    }

    #[test]
    fn swimming_at_a_ledge_without_action_stops() {
        let level = pool();
        let mut lara = swimming(LaraStateId::OnWaterForward, 3000);
        lara.fall_speed = 40;
        let (next, _, _) = run_postprocess(&level, &mut lara, &InputState::forward());
        assert_eq!(next, None);
        assert_eq!(lara.fall_speed, 0);
        assert_eq!(lara.location.position, pos(2560, 1, 3000));
    }

    #[test]
    fn surface_strokes_accelerate_up_to_the_limit() {
        let level = pool();
        let mut lara = swimming(LaraStateId::OnWaterForward, 2000);
        for _ in 0..10 {
            run_input(&level, &mut lara, &InputState::forward());
        }
        assert_eq!(lara.fall_speed, 60);
        assert_eq!(lara.goal_state, LaraStateId::OnWaterForward);

        run_input(&level, &mut lara, &InputState::default());
        assert_eq!(lara.goal_state, LaraStateId::OnWaterStop);
    }

    #[test]
    fn drowning_levels_out_and_stops() {
        let level = pool();
        let mut lara = swimming(LaraStateId::WaterDeath, 2000);
        lara.rotation.x = deg(3.0);
        lara.fall_speed = 12;
        run_input(&level, &mut lara, &InputState::default());
        assert_eq!(lara.rotation.x, deg(3.0) - deg(2.0));
        assert_eq!(lara.fall_speed, 4);
        run_input(&level, &mut lara, &InputState::default());
        assert_eq!(lara.rotation.x, Angle::ZERO);
        assert_eq!(lara.fall_speed, 0);
    }

    #[test]
    fn out_of_health_underwater_drowns() {
        let level = pool();
        let mut lara = swimming(LaraStateId::UnderwaterForward, 2000);
        lara.location.position.y = 1000;
        lara.health = -5;
        run_input(&level, &mut lara, &InputState::default().with_jump());
        assert_eq!(lara.goal_state, LaraStateId::WaterDeath);
    }

    #[test]
    fn diving_into_the_floor_pitches_up() {
        let level = pool();
        let mut lara = swimming(LaraStateId::UnderwaterForward, 2000);
        lara.location.position.y = 1900;
        let (_, info, carry) = run_postprocess(&level, &mut lara, &InputState::default());
        assert_eq!(info.mid.floor.dy, -52);
        assert_eq!(lara.location.position.y, 1848);
        assert_eq!(carry.rotation.x, deg(2.0));
    }
}
