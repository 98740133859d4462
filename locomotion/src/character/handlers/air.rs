//! Jumps, falls and swan dives.

use crate::angle::{Angle, deg};
use crate::collision::{CollisionInfo, PolicyFlag};
use crate::constants::{
    CLIMB_LIMIT_2_CLICK_MIN, FREE_FALL_SPEED_THRESHOLD, HEIGHT_LIMIT, JUMP_TURN_SPEED,
    LARA_HANGING_HEIGHT, SCALP_HEIGHT, SWAN_DIVE_FALL_SPEED_THRESHOLD,
};
use crate::error::LocomotionError;

use super::Context;
use super::ground::steer;
use super::helpers::{
    apply_landing_damage, check_jump_wall_smash, common_jump_handling, jump_against_wall, land,
    place_on_floor, probe, relative_height_at_direction, try_grab_edge, try_reach,
};
use crate::character::state::{AnimationId, HandStatus, LaraStateId};

type HandlerResult = Result<(), LocomotionError>;

/// Ceiling clearance airborne states need in front.
const JUMP_CEILING_CLEARANCE: i32 = 192;

/// How far ahead the jump direction is checked for a wall.
const JUMP_CHECK_DISTANCE: i32 = 256;

fn airborne_limits(info: &mut CollisionInfo) {
    info.set_limits(-CLIMB_LIMIT_2_CLICK_MIN, HEIGHT_LIMIT, JUMP_CEILING_CLEARANCE);
}

fn touching_down(ctx: &Context<'_>, info: &CollisionInfo) -> bool {
    ctx.state.fall_speed > 0 && info.mid.floor.dy <= 0
}

pub(super) fn jump_forward_input(ctx: &mut Context<'_>, _: &mut CollisionInfo) -> HandlerResult {
    if matches!(
        ctx.state.goal_state,
        LaraStateId::SwandiveBegin | LaraStateId::Reach
    ) {
        ctx.state.set_goal(LaraStateId::JumpForward);
    }

    if !matches!(ctx.state.goal_state, LaraStateId::Death | LaraStateId::Stop) {
        let hands_free = ctx.state.hand_status == HandStatus::None;
        if ctx.input.action && hands_free {
            ctx.state.set_goal(LaraStateId::Reach);
        }
        if ctx.input.move_slow && hands_free {
            ctx.state.set_goal(LaraStateId::SwandiveBegin);
        }
        if ctx.state.fall_speed > FREE_FALL_SPEED_THRESHOLD {
            ctx.state.set_goal(LaraStateId::FreeFall);
        }
    }

    steer(ctx, JUMP_TURN_SPEED);
    Ok(())
}

pub(super) fn jump_forward_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    ctx.state.movement_angle = ctx.state.rotation.y;
    info.facing_angle = ctx.state.movement_angle;
    airborne_limits(info);
    probe(ctx, info, SCALP_HEIGHT)?;
    check_jump_wall_smash(ctx, info);

    if !touching_down(ctx, info) {
        return Ok(());
    }

    if apply_landing_damage(ctx)? {
        ctx.state.set_goal(LaraStateId::Death);
    } else if ctx.input.moving_forward() && !ctx.input.move_slow {
        ctx.state.set_goal(LaraStateId::RunForward);
    } else {
        ctx.state.set_goal(LaraStateId::Stop);
    }
    ctx.state.fall_speed = 0;
    ctx.state.falling = false;
    ctx.state.speed = 0;
    place_on_floor(ctx.state, info);
    Ok(())
}

pub(super) fn free_fall_input(ctx: &mut Context<'_>, _: &mut CollisionInfo) -> HandlerResult {
    ctx.state.speed = ctx.state.speed * 95 / 100;
    Ok(())
}

pub(super) fn free_fall_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    ctx.state.falling = true;
    info.facing_angle = ctx.state.movement_angle;
    airborne_limits(info);
    probe(ctx, info, SCALP_HEIGHT)?;
    jump_against_wall(ctx, info);

    if info.mid.floor.dy > 0 {
        return Ok(());
    }

    if apply_landing_damage(ctx)? {
        ctx.state.set_goal(LaraStateId::Death);
    } else {
        ctx.state.set_goal(LaraStateId::Stop);
        ctx.set_animation(AnimationId::LandingHard);
    }
    ctx.state.fall_speed = 0;
    ctx.state.falling = false;
    place_on_floor(ctx.state, info);
    Ok(())
}

/// Shared by every jump that can turn into a free fall.
pub(super) fn airborne_input(ctx: &mut Context<'_>, _: &mut CollisionInfo) -> HandlerResult {
    if ctx.state.fall_speed > FREE_FALL_SPEED_THRESHOLD {
        ctx.state.set_goal(LaraStateId::FreeFall);
    }
    Ok(())
}

pub(super) fn reach_input(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    airborne_input(ctx, info)
}

pub(super) fn reach_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    ctx.state.falling = true;
    ctx.state.movement_angle = ctx.state.rotation.y;
    info.facing_angle = ctx.state.rotation.y;
    info.set_limits(0, HEIGHT_LIMIT, JUMP_CEILING_CLEARANCE);
    probe(ctx, info, SCALP_HEIGHT)?;

    if try_reach(ctx, info)? {
        return Ok(());
    }

    jump_against_wall(ctx, info);
    if !touching_down(ctx, info) {
        return Ok(());
    }
    land(ctx, info)
}

fn can_jump_towards(ctx: &Context<'_>, angle: Angle) -> Result<bool, LocomotionError> {
    Ok(relative_height_at_direction(ctx, angle, JUMP_CHECK_DISTANCE)? >= -CLIMB_LIMIT_2_CLICK_MIN)
}

pub(super) fn jump_prepare_input(ctx: &mut Context<'_>, _: &mut CollisionInfo) -> HandlerResult {
    let yaw = ctx.state.rotation.y;
    let jump = if ctx.input.moving_forward() && can_jump_towards(ctx, yaw)? {
        Some((LaraStateId::JumpForward, Angle::ZERO))
    } else if ctx.input.turning_left() && can_jump_towards(ctx, yaw - deg(90.0))? {
        Some((LaraStateId::JumpRight, deg(-90.0)))
    } else if ctx.input.turning_right() && can_jump_towards(ctx, yaw + deg(90.0))? {
        Some((LaraStateId::JumpLeft, deg(90.0)))
    } else if ctx.input.moving_backward() && can_jump_towards(ctx, yaw + deg(180.0))? {
        Some((LaraStateId::JumpBack, deg(180.0)))
    } else {
        None
    };

    if let Some((goal, direction)) = jump {
        ctx.state.set_goal(goal);
        ctx.state.movement_angle = yaw + direction;
    }

    if ctx.state.fall_speed > FREE_FALL_SPEED_THRESHOLD {
        ctx.state.set_goal(LaraStateId::FreeFall);
    }
    Ok(())
}

pub(super) fn jump_prepare_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    ctx.state.fall_speed = 0;
    ctx.state.falling = false;
    info.set_limits(-HEIGHT_LIMIT, HEIGHT_LIMIT, 0);
    info.facing_angle = ctx.state.movement_angle;
    probe(ctx, info, SCALP_HEIGHT)?;

    if info.mid.ceiling.dy <= -100 {
        return Ok(());
    }

    ctx.set_animation(AnimationId::StaySolid);
    ctx.state.set_goal(LaraStateId::Stop);
    ctx.state.speed = 0;
    ctx.state.location.position = info.initial_position;
    Ok(())
}

pub(super) fn jump_back_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    ctx.state.movement_angle = ctx.state.rotation.y + deg(180.0);
    common_jump_handling(ctx, info)
}

pub(super) fn jump_left_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    ctx.state.movement_angle = ctx.state.rotation.y + deg(90.0);
    common_jump_handling(ctx, info)
}

pub(super) fn jump_right_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    ctx.state.movement_angle = ctx.state.rotation.y - deg(90.0);
    common_jump_handling(ctx, info)
}

pub(super) fn jump_up_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    airborne_limits(info);
    info.facing_angle = ctx.state.rotation.y;
    probe(ctx, info, LARA_HANGING_HEIGHT)?;

    if try_grab_edge(ctx, info) {
        return Ok(());
    }

    jump_against_wall(ctx, info);
    if !touching_down(ctx, info) {
        return Ok(());
    }
    land(ctx, info)
}

pub(super) fn fall_backward_input(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    airborne_input(ctx, info)?;
    if ctx.input.action && ctx.state.hand_status == HandStatus::None {
        ctx.state.set_goal(LaraStateId::Reach);
    }
    Ok(())
}

pub(super) fn fall_backward_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    ctx.state.movement_angle = ctx.state.rotation.y + deg(180.0);
    airborne_limits(info);
    info.facing_angle = ctx.state.movement_angle;
    probe(ctx, info, LARA_HANGING_HEIGHT)?;
    check_jump_wall_smash(ctx, info);

    if !touching_down(ctx, info) {
        return Ok(());
    }
    land(ctx, info)
}

fn swandive_policy(info: &mut CollisionInfo) {
    info.policy.remove(PolicyFlag::EnableSpaz);
    info.policy.add(PolicyFlag::EnableBaddiePush);
}

pub(super) fn swandive_begin_input(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    swandive_policy(info);
    if ctx.state.fall_speed > FREE_FALL_SPEED_THRESHOLD {
        ctx.state.set_goal(LaraStateId::SwandiveEnd);
    }
    Ok(())
}

pub(super) fn swandive_end_input(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    swandive_policy(info);
    ctx.state.speed = ctx.state.speed * 95 / 100;
    Ok(())
}

fn swandive_probe(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    ctx.state.movement_angle = ctx.state.rotation.y;
    airborne_limits(info);
    info.facing_angle = ctx.state.rotation.y;
    probe(ctx, info, SCALP_HEIGHT)?;
    check_jump_wall_smash(ctx, info);
    Ok(())
}

pub(super) fn swandive_begin_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    swandive_probe(ctx, info)?;
    if !touching_down(ctx, info) {
        return Ok(());
    }

    ctx.state.set_goal(LaraStateId::Stop);
    ctx.state.fall_speed = 0;
    ctx.state.falling = false;
    place_on_floor(ctx.state, info);
    Ok(())
}

/// A head-first plunge: touching ground too fast is fatal.
pub(super) fn swandive_end_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    swandive_probe(ctx, info)?;
    if !touching_down(ctx, info) {
        return Ok(());
    }

    if ctx.state.fall_speed <= SWAN_DIVE_FALL_SPEED_THRESHOLD {
        ctx.state.set_goal(LaraStateId::Stop);
    } else {
        log::debug!("swan dive hit the floor at fall speed {}", ctx.state.fall_speed);
        ctx.state.set_goal(LaraStateId::Death);
    }
    ctx.state.fall_speed = 0;
    ctx.state.falling = false;
    place_on_floor(ctx.state, info);
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::angle::{Angle, deg};
    use crate::character::handlers::test_support::*;
    use crate::character::state::{AnimationId, LaraStateId};
    use crate::constants::DEAD_HEALTH;
    use crate::input::{AxisMovement, InputState};
    use crate::level::{Sector, pos};

    fn falling(state: LaraStateId, fall_speed: i32) -> crate::character::state::KinematicState {
        let mut lara = character(state, pos(2560, 0, 2560), Angle::ZERO);
        lara.falling = true;
        lara.fall_speed = fall_speed;
        lara.speed = 50;
        lara
    }

    #[test]
    fn landing_from_a_deadly_height_kills() {
        let level = single_room(flat_room());
        let mut lara = falling(LaraStateId::JumpForward, 160);

        run_postprocess(&level, &mut lara, &InputState::forward());
        assert_eq!(lara.goal_state, LaraStateId::Death);
        assert_eq!(lara.health, DEAD_HEALTH);
        assert!(!lara.falling);
        assert_eq!(lara.fall_speed, 0);
    }

    #[test]
    fn landing_a_jump_keeps_running_when_forward_is_held() {
        let level = single_room(flat_room());
        let mut lara = falling(LaraStateId::JumpForward, 40);
        run_postprocess(&level, &mut lara, &InputState::forward());
        assert_eq!(lara.goal_state, LaraStateId::RunForward);
        assert_eq!(lara.health, 1000);

        let mut lara = falling(LaraStateId::JumpForward, 40);
        run_postprocess(&level, &mut lara, &InputState::default());
        assert_eq!(lara.goal_state, LaraStateId::Stop);
    }

    #[test]
    fn rising_jump_does_not_land() {
        let level = single_room(flat_room());
        let mut lara = falling(LaraStateId::JumpForward, -20);
        run_postprocess(&level, &mut lara, &InputState::forward());
        assert_eq!(lara.goal_state, LaraStateId::JumpForward);
        assert!(lara.falling);
    }

    #[test]
    fn free_fall_lands_hard() {
        let level = single_room(flat_room());
        let mut lara = falling(LaraStateId::FreeFall, 145);
        let (next, _, _) = run_postprocess(&level, &mut lara, &InputState::default());
        assert_eq!(next, Some(LaraStateId::Stop));
        assert_eq!(lara.animation.map(|a| a.animation), Some(AnimationId::LandingHard));
        assert!(lara.health > 0 && lara.health < 1000);
    }

    #[test]
    fn fast_jumps_turn_into_free_falls() {
        let level = single_room(flat_room());
        let mut lara = falling(LaraStateId::JumpBack, 132);
        run_input(&level, &mut lara, &InputState::default());
        assert_eq!(lara.goal_state, LaraStateId::FreeFall);
    }

    #[test]
    fn jump_prepare_picks_the_held_direction() {
        let level = single_room(flat_room());

        let mut lara = character(LaraStateId::JumpPrepare, pos(2560, 0, 2560), Angle::ZERO);
        run_input(&level, &mut lara, &InputState::forward());
        assert_eq!(lara.goal_state, LaraStateId::JumpForward);
        assert_eq!(lara.movement_angle, Angle::ZERO);

        let mut lara = character(LaraStateId::JumpPrepare, pos(2560, 0, 2560), Angle::ZERO);
        run_input(&level, &mut lara, &InputState::default().with_turn(AxisMovement::Left));
        assert_eq!(lara.goal_state, LaraStateId::JumpRight);
        assert_eq!(lara.movement_angle, deg(-90.0));

        let mut lara = character(LaraStateId::JumpPrepare, pos(2560, 0, 2560), Angle::ZERO);
        run_input(&level, &mut lara, &InputState::backward());
        assert_eq!(lara.goal_state, LaraStateId::JumpBack);
        assert_eq!(lara.movement_angle, deg(180.0));
    }

    #[test]
    fn jump_prepare_refuses_to_jump_into_a_wall() {
        let level = single_room(flat_room().edit_area(1..=6, 3..=6, |_| Sector::WALL));
        let mut lara = character(LaraStateId::JumpPrepare, pos(2560, 0, 2900), Angle::ZERO);
        run_input(&level, &mut lara, &InputState::forward());
        assert_eq!(lara.goal_state, LaraStateId::JumpPrepare);
    }

    #[test]
    fn jump_prepare_under_a_low_ceiling_gives_up() {
        let level = single_room(flat_room().edit_area(2..=2, 2..=2, |s| Sector { ceiling: -800, ..s }));
        let mut lara = character(LaraStateId::JumpPrepare, pos(2560, 0, 2560), Angle::ZERO);
        lara.speed = 10;
        let (next, _, _) = run_postprocess(&level, &mut lara, &InputState::forward());
        assert_eq!(next, Some(LaraStateId::Stop));
        assert_eq!(lara.speed, 0);
        assert_eq!(lara.location.position, pos(2560, 0, 2560));

        let level = single_room(flat_room());
        let mut lara = character(LaraStateId::JumpPrepare, pos(2560, 0, 2560), Angle::ZERO);
        let (next, _, _) = run_postprocess(&level, &mut lara, &InputState::forward());
        assert_eq!(next, None);
    }

    #[test]
    fn swan_dive_into_the_floor_is_fatal() {
        let level = single_room(flat_room());
        let mut lara = falling(LaraStateId::SwandiveEnd, 140);
        run_postprocess(&level, &mut lara, &InputState::default());
        assert_eq!(lara.goal_state, LaraStateId::Death);

        let mut lara = falling(LaraStateId::SwandiveEnd, 100);
        run_postprocess(&level, &mut lara, &InputState::default());
        assert_eq!(lara.goal_state, LaraStateId::Stop);
    }
}
