//! Reactions shared by the state handlers.
//!
//! Every helper re-checks its own preconditions and declines by returning
//! `false` (or doing nothing) instead of trusting the caller. Helpers that
//! force a state change go through [`Context::set_animation`] or
//! [`Context::substitute`], so the controller sees the substitution.

use crate::angle::{Angle, Axis, align_rotation, deg};
use crate::collision::{AxisCollision, CollisionInfo};
use crate::constants::{
    CLIMB_LIMIT_2_CLICK_MAX, CLIMB_LIMIT_2_CLICK_MIN, CLIMB_LIMIT_3_CLICK_MAX,
    DAMAGE_FALL_SPEED_THRESHOLD, DEAD_HEALTH, DEADLY_FALL_SPEED_THRESHOLD,
    DEFAULT_COLLISION_RADIUS, GRAVITY, HEIGHT_LIMIT, JUMP_REACHABLE_HEIGHT, LARA_HEALTH,
    MAX_GRABBABLE_GRADIENT, QUARTER_SECTOR_SIZE, SCALP_HEIGHT,
};
use crate::error::LocomotionError;
use crate::level::{HeightInfo, LevelGeometry, Location, Position, pos};

use super::Context;
use crate::character::state::{AnimationId, HandStatus, KinematicState, LaraStateId};

/// Facing tolerance for climbing onto a block.
const CLIMB_ALIGN_MARGIN: Angle = deg(30.0);
/// Facing tolerance for grabbing an edge.
const GRAB_ALIGN_MARGIN: Angle = deg(35.0);
/// Yaw nudge when one front corner grazes an obstacle.
const GLANCE_TURN: Angle = deg(5.0);
/// Ceiling clearance needed above a ledge to pull up onto it.
const CLIMB_ONTO_HEADROOM: i32 = 400;

/// Probes at the character's own position.
pub fn probe(ctx: &Context<'_>, info: &mut CollisionInfo, height: i32) -> Result<(), LocomotionError> {
    let position = ctx.state.location.position;
    probe_at(ctx, info, &position, height)
}

/// Probes with the feet at `probe_position` while keeping the character's
/// room as the starting point.
pub fn probe_at(
    ctx: &Context<'_>,
    info: &mut CollisionInfo,
    probe_position: &Position,
    height: i32,
) -> Result<(), LocomotionError> {
    info.init_height_info(
        ctx.level,
        &ctx.state.location,
        probe_position,
        height,
        ctx.settings.max_resolve_iterations,
    )
}

/// Moves by the probe's corrective shift and clears it.
pub fn apply_collision_feedback(state: &mut KinematicState, info: &mut CollisionInfo) {
    state.location.position += info.shift;
    info.shift = Position::zeros();
}

/// Snaps the feet onto the sampled floor below.
pub fn place_on_floor(state: &mut KinematicState, info: &mut CollisionInfo) {
    state.location.position.y += info.mid.floor.dy;
    info.mid.floor.dy = 0;
}

/// Puts the character back where the frame started and stops it when its
/// head hit the ceiling or the probe found no room to stand.
pub fn stop_if_ceiling_blocked(ctx: &mut Context<'_>, info: &CollisionInfo) -> bool {
    if !matches!(info.collision_type, AxisCollision::Top | AxisCollision::Jammed) {
        return false;
    }

    ctx.state.location.position = info.initial_position;
    ctx.set_animation(AnimationId::StaySolid);
    ctx.state.set_goal(LaraStateId::Stop);
    ctx.state.speed = 0;
    ctx.state.fall_speed = 0;
    ctx.state.falling = false;
    true
}

/// Climbs onto the blocking step ahead when action is held.
///
/// The front floor distance selects the move: a two click climb, a three
/// click climb, or a jump up to a ledge within reach.
pub fn try_climb(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> bool {
    if info.collision_type != AxisCollision::Front
        || !ctx.input.action
        || ctx.state.hand_status != HandStatus::None
    {
        return false;
    }

    if info.front_gradient() >= MAX_GRABBABLE_GRADIENT {
        return false;
    }

    let Some(aligned) = align_rotation(ctx.state.rotation.y, CLIMB_ALIGN_MARGIN) else {
        return false;
    };

    let climb_height = info.front.floor.dy;
    let corners_open = info.front.floor.dy >= info.front.ceiling.dy
        && info.front_left.floor.dy >= info.front_left.ceiling.dy
        && info.front_right.floor.dy >= info.front_right.ceiling.dy;

    if (-CLIMB_LIMIT_2_CLICK_MAX..=-CLIMB_LIMIT_2_CLICK_MIN).contains(&climb_height) {
        if !corners_open {
            return false;
        }
        log::debug!("climbing two clicks onto {climb_height}");
        ctx.state.set_goal(LaraStateId::Stop);
        ctx.set_animation(AnimationId::Climb2Click);
        ctx.carry.move_by(pos(0, 2 * QUARTER_SECTOR_SIZE + climb_height, 0));
        ctx.state.hand_status = HandStatus::Grabbing;
    } else if (-CLIMB_LIMIT_3_CLICK_MAX..=-CLIMB_LIMIT_2_CLICK_MAX).contains(&climb_height) {
        if !corners_open {
            return false;
        }
        log::debug!("climbing three clicks onto {climb_height}");
        ctx.state.set_goal(LaraStateId::Stop);
        ctx.set_animation(AnimationId::Climb3Click);
        ctx.carry.move_by(pos(0, 3 * QUARTER_SECTOR_SIZE + climb_height, 0));
        ctx.state.hand_status = HandStatus::Grabbing;
    } else if (-JUMP_REACHABLE_HEIGHT..=-CLIMB_LIMIT_3_CLICK_MAX).contains(&climb_height) {
        log::debug!("jumping up to a ledge at {climb_height}");
        ctx.state.set_goal(LaraStateId::JumpUp);
        ctx.set_animation(AnimationId::StaySolid);
        ctx.state.fall_speed_override = jump_up_fall_speed(climb_height);
    } else {
        return false;
    }

    ctx.state.rotation.y = aligned;
    apply_collision_feedback(ctx.state, info);
    true
}

/// Initial upward speed that lifts the hands to a ledge `climb_height` above.
pub fn jump_up_fall_speed(climb_height: i32) -> i32 {
    let lift = (-2 * GRAVITY * (climb_height + 800)).max(0) as f32;
    -(lift.sqrt() as i32 + 3)
}

/// Reacts to a wall ahead: corners nudge the yaw, a head-on hit stops the
/// character. Returns `true` for the head-on case.
pub fn check_wall_collision(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> bool {
    match info.collision_type {
        AxisCollision::FrontLeft => {
            apply_collision_feedback(ctx.state, info);
            ctx.carry.rotate_y(GLANCE_TURN);
            false
        }
        AxisCollision::FrontRight => {
            apply_collision_feedback(ctx.state, info);
            ctx.carry.rotate_y(-GLANCE_TURN);
            false
        }
        AxisCollision::Front | AxisCollision::FrontTop => {
            apply_collision_feedback(ctx.state, info);
            ctx.state.set_goal(LaraStateId::Stop);
            ctx.state.falling = false;
            ctx.state.speed = 0;
            true
        }
        _ => false,
    }
}

/// Downhill angle of a steep slant, or `None` for a walkable floor.
///
/// The Z slant only wins when it is strictly steeper than the X slant.
pub fn slide_angle(slant_x: i32, slant_z: i32) -> Option<Angle> {
    if slant_x.abs() <= 2 && slant_z.abs() <= 2 {
        return None;
    }

    let mut angle = Angle::ZERO;
    if slant_x < -2 {
        angle = deg(90.0);
    } else if slant_x > 2 {
        angle = deg(-90.0);
    }

    if slant_z > slant_x.abs().max(2) {
        angle = deg(180.0);
    } else if slant_z < (-slant_x.abs()).min(-2) {
        angle = Angle::ZERO;
    }
    Some(angle)
}

/// Starts sliding down a steep floor, facing the slope or with the back to it.
pub fn try_start_slide(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> bool {
    let Some(target) = slide_angle(info.floor_slant.x as i32, info.floor_slant.z as i32) else {
        return false;
    };

    apply_collision_feedback(ctx.state, info);
    let facing_away = (target - ctx.state.rotation.y).abs_units() > deg(90.0).abs_units();
    let (slide_state, animation, yaw) = if facing_away {
        (
            LaraStateId::SlideBackward,
            AnimationId::StartSlideBackward,
            target - deg(180.0),
        )
    } else {
        (LaraStateId::SlideForward, AnimationId::SlideForward, target)
    };

    if ctx.state.current_state != slide_state || ctx.state.current_slide_angle != target {
        ctx.state.set_goal(slide_state);
        ctx.set_animation(animation);
        ctx.state.movement_angle = target;
        ctx.state.current_slide_angle = target;
        ctx.state.rotation.y = yaw;
    }
    true
}

/// Health after touching down at `fall_speed`.
///
/// No loss up to the damage threshold, a quadratic loss reaching full health
/// just below the deadly threshold, and instant death from there on.
pub fn health_after_landing(health: i32, fall_speed: i32) -> i32 {
    let excess = fall_speed - DAMAGE_FALL_SPEED_THRESHOLD;
    if excess <= 0 {
        return health;
    }
    if fall_speed >= DEADLY_FALL_SPEED_THRESHOLD {
        return DEAD_HEALTH;
    }
    let range = DEADLY_FALL_SPEED_THRESHOLD - DAMAGE_FALL_SPEED_THRESHOLD;
    health - LARA_HEALTH * excess * excess / (range * range)
}

/// Re-resolves the owning room from a point `dy` below the feet and caches
/// the floor height under it.
pub fn update_floor_height(
    state: &mut KinematicState,
    level: &dyn LevelGeometry,
    dy: i32,
    max_iterations: usize,
) -> Result<(), LocomotionError> {
    let mut probe = state.location.moved(0, dy, 0);
    let sector = probe.update_room(level, max_iterations)?;
    state.location.room = probe.room;
    state.floor = HeightInfo::from_floor(level, sector, &probe.position, max_iterations)?.y;
    Ok(())
}

/// Refreshes the cached floor and applies fall damage. Returns `true` when the
/// landing killed the character.
pub fn apply_landing_damage(ctx: &mut Context<'_>) -> Result<bool, LocomotionError> {
    let mut probe = ctx.state.location.moved(0, -SCALP_HEIGHT, 0);
    let max_iterations = ctx.settings.max_resolve_iterations;
    let sector = probe.update_room(ctx.level, max_iterations)?;
    ctx.state.floor = HeightInfo::from_floor(ctx.level, sector, &probe.position, max_iterations)?.y;

    ctx.state.health = health_after_landing(ctx.state.health, ctx.state.fall_speed);
    Ok(!ctx.state.is_alive())
}

/// Backs off 100 units from whatever jammed the character.
fn back_off(ctx: &mut Context<'_>, facing: Angle) {
    ctx.carry.move_by(pos(
        -facing.sin_of(DEFAULT_COLLISION_RADIUS),
        0,
        -facing.cos_of(DEFAULT_COLLISION_RADIUS),
    ));
}

/// Collision reaction while rising or falling without a wall smash.
pub fn jump_against_wall(ctx: &mut Context<'_>, info: &mut CollisionInfo) {
    apply_collision_feedback(ctx.state, info);
    match info.collision_type {
        AxisCollision::FrontLeft => ctx.carry.rotate_y(GLANCE_TURN),
        AxisCollision::FrontRight => ctx.carry.rotate_y(-GLANCE_TURN),
        AxisCollision::Top => {
            if ctx.state.fall_speed <= 0 {
                ctx.state.fall_speed = 1;
            }
        }
        AxisCollision::Jammed => {
            let yaw = ctx.state.rotation.y;
            back_off(ctx, yaw);
            ctx.state.speed = 0;
            info.mid.floor.dy = 0;
            if ctx.state.fall_speed < 0 {
                ctx.state.fall_speed = 16;
            }
        }
        AxisCollision::None | AxisCollision::Front | AxisCollision::FrontTop => {}
    }
}

/// Collision reaction for running jumps: a head-on hit bounces the
/// character back into a free fall.
pub fn check_jump_wall_smash(ctx: &mut Context<'_>, info: &mut CollisionInfo) {
    apply_collision_feedback(ctx.state, info);
    match info.collision_type {
        AxisCollision::None => {}
        AxisCollision::Front | AxisCollision::FrontTop => {
            ctx.state.speed /= 4;
            ctx.state.movement_angle -= deg(180.0);
            ctx.state.set_goal(LaraStateId::FreeFall);
            ctx.set_animation_at(AnimationId::SmashJump, 1);
            if ctx.state.fall_speed <= 0 {
                ctx.state.fall_speed = 1;
            }
        }
        AxisCollision::FrontLeft => ctx.carry.rotate_y(GLANCE_TURN),
        AxisCollision::FrontRight => ctx.carry.rotate_y(-GLANCE_TURN),
        AxisCollision::Jammed => {
            back_off(ctx, info.facing_angle);
            ctx.state.speed = 0;
            info.mid.floor.dy = 0;
            if ctx.state.fall_speed <= 0 {
                ctx.state.fall_speed = 16;
            }
        }
        AxisCollision::Top => {
            if ctx.state.fall_speed <= 0 {
                ctx.state.fall_speed = 1;
            }
        }
    }
}

/// Touchdown handling shared by the directional jumps.
pub fn common_jump_handling(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> Result<(), LocomotionError> {
    info.set_limits(-CLIMB_LIMIT_2_CLICK_MIN, HEIGHT_LIMIT, 192);
    info.facing_angle = ctx.state.movement_angle;
    probe(ctx, info, SCALP_HEIGHT)?;
    check_jump_wall_smash(ctx, info);
    if ctx.state.fall_speed <= 0 || info.mid.floor.dy > 0 {
        return Ok(());
    }

    land(ctx, info)
}

/// Ends a fall on the floor: death on a deadly landing, otherwise stop.
pub fn land(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> Result<(), LocomotionError> {
    if apply_landing_damage(ctx)? {
        ctx.state.set_goal(LaraStateId::Death);
    } else {
        ctx.state.set_goal(LaraStateId::Stop);
    }
    ctx.state.fall_speed = 0;
    ctx.state.falling = false;
    place_on_floor(ctx.state, info);
    Ok(())
}

/// Slope handling shared by both slide directions.
pub fn common_slide_handling(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> Result<(), LocomotionError> {
    info.set_limits(-2 * QUARTER_SECTOR_SIZE, HEIGHT_LIMIT, 0);
    info.facing_angle = ctx.state.movement_angle;
    probe(ctx, info, SCALP_HEIGHT)?;

    if stop_if_ceiling_blocked(ctx, info) {
        return Ok(());
    }

    check_wall_collision(ctx, info);
    if info.mid.floor.dy <= 200 {
        try_start_slide(ctx, info);
        place_on_floor(ctx.state, info);
        if info.floor_slant.x.unsigned_abs() <= 2 && info.floor_slant.z.unsigned_abs() <= 2 {
            ctx.state.set_goal(LaraStateId::Stop);
        }
        return Ok(());
    }

    if ctx.state.current_state == LaraStateId::SlideForward {
        fall_forward(ctx);
    } else {
        fall_backward(ctx);
    }
    Ok(())
}

/// Drops into a forward fall off an edge.
pub fn fall_forward(ctx: &mut Context<'_>) {
    ctx.state.set_goal(LaraStateId::JumpForward);
    ctx.set_animation(AnimationId::FreeFallForward);
    ctx.state.fall_speed = 0;
    ctx.state.falling = true;
}

/// Drops into a backward fall off an edge.
pub fn fall_backward(ctx: &mut Context<'_>) {
    ctx.state.set_goal(LaraStateId::FallBackward);
    ctx.set_animation(AnimationId::FreeFallBack);
    ctx.state.fall_speed = 0;
    ctx.state.falling = true;
}

/// Keeps a hanging character attached to its ledge.
///
/// Letting go of action (or dying) drops the character; losing the ledge
/// puts it back where it was and, while shimmying, back into the hang.
pub fn common_edge_hang_handling(
    ctx: &mut Context<'_>,
    info: &mut CollisionInfo,
) -> Result<(), LocomotionError> {
    info.set_limits(-HEIGHT_LIMIT, HEIGHT_LIMIT, 0);
    info.facing_angle = ctx.state.movement_angle;
    probe(ctx, info, SCALP_HEIGHT)?;
    let too_close_to_floor = info.front.floor.dy < 200;

    ctx.state.fall_speed = 0;
    ctx.state.falling = false;
    ctx.state.movement_angle = ctx.state.rotation.y;
    let axis = ctx.state.movement_angle.axis();
    let position = &mut ctx.state.location.position;
    match axis {
        Axis::PosZ => position.z += 2,
        Axis::PosX => position.x += 2,
        Axis::NegZ => position.z -= 2,
        Axis::NegX => position.x -= 2,
    }

    info.set_limits(-CLIMB_LIMIT_2_CLICK_MIN, HEIGHT_LIMIT, 0);
    info.facing_angle = ctx.state.movement_angle;
    probe(ctx, info, SCALP_HEIGHT)?;

    if !ctx.input.action || !ctx.state.is_alive() {
        ctx.state.set_goal(LaraStateId::JumpUp);
        ctx.set_animation_at(AnimationId::TryHangVertical, 9);
        ctx.state.hand_status = HandStatus::None;
        let hang_distance = info.front.floor.dy - ctx.state.bounding_box.min.y + 2;
        ctx.state.location.position += pos(info.shift.x, hang_distance, info.shift.z);
        ctx.state.speed = 2;
        ctx.state.fall_speed = 1;
        ctx.state.falling = true;
        return Ok(());
    }

    if info.front_gradient() >= MAX_GRABBABLE_GRADIENT
        || info.mid.ceiling.dy >= 0
        || info.collision_type != AxisCollision::Front
        || too_close_to_floor
    {
        ctx.state.location.position = info.initial_position;
        if !matches!(
            ctx.state.current_state,
            LaraStateId::ShimmyLeft | LaraStateId::ShimmyRight
        ) {
            return Ok(());
        }
        ctx.state.set_goal(LaraStateId::Hang);
        ctx.set_animation_at(AnimationId::HangIdle, 21);
        return Ok(());
    }

    if axis.is_z() {
        ctx.state.location.position.z += info.shift.z;
    } else {
        ctx.state.location.position.x += info.shift.x;
    }

    let space_to_reach = info.front.floor.dy - ctx.state.bounding_box.min.y;
    if (-QUARTER_SECTOR_SIZE..=QUARTER_SECTOR_SIZE).contains(&space_to_reach) {
        ctx.state.location.position.y += space_to_reach;
    }
    Ok(())
}

/// Preconditions shared by the two edge grabs. Returns the aligned yaw and
/// the vertical distance from the hands to the edge.
fn grab_window(ctx: &Context<'_>, info: &CollisionInfo) -> Option<(Angle, i32)> {
    if info.collision_type != AxisCollision::Front
        || !ctx.input.action
        || ctx.state.hand_status != HandStatus::None
    {
        return None;
    }
    if info.front_gradient() >= MAX_GRABBABLE_GRADIENT {
        return None;
    }
    if info.front.ceiling.dy > 0 || info.mid.ceiling.dy > -CLIMB_LIMIT_2_CLICK_MIN {
        return None;
    }

    let space_to_reach = info.front.floor.dy - ctx.state.bounding_box.min.y;
    let fall_speed = ctx.state.fall_speed;
    if space_to_reach < 0 && fall_speed + space_to_reach < 0 {
        return None;
    }
    if space_to_reach > 0 && fall_speed + space_to_reach > 0 {
        return None;
    }

    let aligned = align_rotation(ctx.state.rotation.y, GRAB_ALIGN_MARGIN)?;
    Some((aligned, space_to_reach))
}

/// Catches an edge while jumping forward with action held.
pub fn try_reach(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> Result<bool, LocomotionError> {
    if info.mid.floor.dy < 200 {
        return Ok(false);
    }
    let Some((aligned, space_to_reach)) = grab_window(ctx, info) else {
        return Ok(false);
    };

    if can_climb_onto(ctx, ctx.state.rotation.y.axis())? {
        ctx.set_animation(AnimationId::OscillateHangOn);
    } else {
        ctx.set_animation(AnimationId::HangIdle);
    }

    ctx.state.set_goal(LaraStateId::Hang);
    ctx.state.location.position += pos(info.shift.x, space_to_reach, info.shift.z);
    info.shift = Position::zeros();
    ctx.state.speed = 0;
    ctx.state.rotation.y = aligned;
    ctx.state.falling = false;
    ctx.state.fall_speed = 0;
    ctx.state.hand_status = HandStatus::Grabbing;
    Ok(true)
}

/// Catches an edge at the top of a vertical jump.
pub fn try_grab_edge(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> bool {
    let Some((aligned, space_to_reach)) = grab_window(ctx, info) else {
        return false;
    };

    ctx.state.set_goal(LaraStateId::Hang);
    ctx.set_animation_at(AnimationId::HangIdle, 12);
    ctx.state.location.position.y += space_to_reach;
    apply_collision_feedback(ctx.state, info);
    ctx.state.speed = 0;
    ctx.state.fall_speed = 0;
    ctx.state.falling = false;
    ctx.state.hand_status = HandStatus::Grabbing;
    ctx.state.rotation.y = aligned;
    true
}

/// Whether the floor a quarter sector past the edge leaves room to stand.
pub fn can_climb_onto(ctx: &Context<'_>, axis: Axis) -> Result<bool, LocomotionError> {
    let mut position = ctx.state.location.position;
    match axis {
        Axis::PosZ => position.z += QUARTER_SECTOR_SIZE,
        Axis::PosX => position.x += QUARTER_SECTOR_SIZE,
        Axis::NegZ => position.z -= QUARTER_SECTOR_SIZE,
        Axis::NegX => position.x -= QUARTER_SECTOR_SIZE,
    }

    let room = ctx.state.location.room;
    let sector = ctx
        .level
        .room(room)?
        .sector_clamped_at(&position)
        .ok_or(LocomotionError::SectorOutOfBounds {
            room,
            x: position.x,
            z: position.z,
        })?;
    let max_iterations = ctx.settings.max_resolve_iterations;
    let floor = HeightInfo::from_floor(ctx.level, sector, &position, max_iterations)?;
    let ceiling = HeightInfo::from_ceiling(ctx.level, sector, &position, max_iterations)?;
    Ok(!floor.is_wall()
        && floor.y - position.y > 0
        && ceiling.y - position.y < -CLIMB_ONTO_HEADROOM)
}

/// Floor height `distance` units away in direction `angle`, relative to the
/// feet; walls report `INVALID_HEIGHT`.
pub fn relative_height_at_direction(
    ctx: &Context<'_>,
    angle: Angle,
    distance: i32,
) -> Result<i32, LocomotionError> {
    let mut location: Location = ctx.state.location.moved(
        angle.sin_of(distance),
        -SCALP_HEIGHT,
        angle.cos_of(distance),
    );
    let max_iterations = ctx.settings.max_resolve_iterations;
    let sector = location.update_room(ctx.level, max_iterations)?;
    let floor = HeightInfo::from_floor(ctx.level, sector, &location.position, max_iterations)?;
    if floor.is_wall() {
        return Ok(floor.y);
    }
    Ok(floor.y - ctx.state.location.position.y)
}
