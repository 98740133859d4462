//! Standing, walking, running, stepping, turning and rolling.

use crate::angle::{Angle, deg};
use crate::collision::{CollisionInfo, PolicyFlag};
use crate::constants::{
    CLIMB_LIMIT_2_CLICK_MAX, CLIMB_LIMIT_2_CLICK_MIN, FAST_TURN_SPEED, FAST_TURN_SPEED_RUNNING,
    HEIGHT_LIMIT, MAX_RUN_TILT, RUN_TILT, RUN_TURN_SPEED, SCALP_HEIGHT, STEPPABLE_HEIGHT,
    TURN_ACCELERATION, WALK_TURN_SPEED,
};
use crate::error::LocomotionError;
use crate::input::AxisMovement;
use crate::level::SlantClass;

use super::Context;
use super::helpers::{
    apply_collision_feedback, check_wall_collision, fall_backward, fall_forward, place_on_floor, probe,
    stop_if_ceiling_blocked, try_climb, try_start_slide,
};
use crate::character::state::{AnimationId, HandStatus, LaraStateId};

type HandlerResult = Result<(), LocomotionError>;

/// Turns with the left/right keys, accelerating up to `limit`.
pub(super) fn steer(ctx: &mut Context<'_>, limit: Angle) {
    match ctx.input.x_movement {
        AxisMovement::Left => ctx.state.sub_y_rotation_speed(TURN_ACCELERATION, -limit),
        AxisMovement::Right => ctx.state.add_y_rotation_speed(TURN_ACCELERATION, limit),
        _ => {}
    }
}

fn set_walls_and_pits(info: &mut CollisionInfo) {
    info.policy
        .add_many(&[PolicyFlag::SlopesAreWalls, PolicyFlag::SlopesArePits]);
}

pub(super) fn walk_forward_input(ctx: &mut Context<'_>, _: &mut CollisionInfo) -> HandlerResult {
    if !ctx.state.is_alive() {
        ctx.state.set_goal(LaraStateId::Stop);
        return Ok(());
    }

    steer(ctx, WALK_TURN_SPEED);
    if ctx.input.moving_forward() {
        if ctx.input.move_slow {
            ctx.state.set_goal(LaraStateId::WalkForward);
        } else {
            ctx.state.set_goal(LaraStateId::RunForward);
        }
    } else {
        ctx.state.set_goal(LaraStateId::Stop);
    }
    Ok(())
}

pub(super) fn walk_forward_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    ctx.state.fall_speed = 0;
    ctx.state.falling = false;
    info.facing_angle = ctx.state.rotation.y;
    ctx.state.movement_angle = info.facing_angle;
    info.set_limits(-CLIMB_LIMIT_2_CLICK_MIN, CLIMB_LIMIT_2_CLICK_MIN, 0);
    info.policy.add_many(&[
        PolicyFlag::SlopesAreWalls,
        PolicyFlag::SlopesArePits,
        PolicyFlag::LavaIsPit,
    ]);
    probe(ctx, info, SCALP_HEIGHT)?;

    if stop_if_ceiling_blocked(ctx, info) || try_climb(ctx, info) {
        return Ok(());
    }

    if check_wall_collision(ctx, info) {
        let frame = ctx.state.frame;
        if (29..=47).contains(&frame) {
            ctx.set_animation(AnimationId::EndWalkLeft);
        } else if (22..=28).contains(&frame) || (48..=57).contains(&frame) {
            ctx.set_animation(AnimationId::EndWalkRight);
        } else {
            ctx.set_animation(AnimationId::StaySolid);
        }
    }

    let floor = info.mid.floor.dy;
    if floor > CLIMB_LIMIT_2_CLICK_MIN {
        fall_forward(ctx);
        return Ok(());
    }

    let frame = ctx.state.frame;
    if floor > STEPPABLE_HEIGHT {
        if !(28..=45).contains(&frame) {
            ctx.set_animation(AnimationId::WalkDownRight);
        } else {
            ctx.set_animation(AnimationId::WalkDownLeft);
        }
    }
    if (-CLIMB_LIMIT_2_CLICK_MIN..-STEPPABLE_HEIGHT).contains(&floor) {
        if !(27..=44).contains(&frame) {
            ctx.set_animation(AnimationId::WalkUpStepRight);
        } else {
            ctx.set_animation(AnimationId::WalkUpStepLeft);
        }
    }

    if !try_start_slide(ctx, info) {
        place_on_floor(ctx.state, info);
    }
    Ok(())
}

pub(super) fn run_forward_input(ctx: &mut Context<'_>, _: &mut CollisionInfo) -> HandlerResult {
    if !ctx.state.is_alive() {
        ctx.state.set_goal(LaraStateId::Death);
        return Ok(());
    }

    if ctx.input.roll {
        ctx.state.set_goal(LaraStateId::Stop);
        ctx.set_animation(AnimationId::RollBegin);
        return Ok(());
    }

    match ctx.input.x_movement {
        AxisMovement::Left => {
            ctx.state
                .sub_y_rotation_speed(TURN_ACCELERATION, -FAST_TURN_SPEED_RUNNING);
            let tilt = (ctx.state.rotation.z - RUN_TILT).raw().max((-MAX_RUN_TILT).raw());
            ctx.state.rotation.z = Angle::from_raw(tilt);
        }
        AxisMovement::Right => {
            ctx.state
                .add_y_rotation_speed(TURN_ACCELERATION, FAST_TURN_SPEED_RUNNING);
            let tilt = (ctx.state.rotation.z + RUN_TILT).raw().min(MAX_RUN_TILT.raw());
            ctx.state.rotation.z = Angle::from_raw(tilt);
        }
        _ => {}
    }

    if ctx.input.jump && !ctx.state.falling {
        ctx.state.set_goal(LaraStateId::JumpForward);
        return Ok(());
    }

    if !ctx.input.moving_forward() {
        ctx.state.set_goal(LaraStateId::Stop);
    } else if ctx.input.move_slow {
        ctx.state.set_goal(LaraStateId::WalkForward);
    } else {
        ctx.state.set_goal(LaraStateId::RunForward);
    }
    Ok(())
}

pub(super) fn run_forward_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    info.facing_angle = ctx.state.rotation.y;
    ctx.state.movement_angle = info.facing_angle;
    info.set_limits(-CLIMB_LIMIT_2_CLICK_MIN, HEIGHT_LIMIT, 0);
    info.policy.add(PolicyFlag::SlopesAreWalls);
    probe(ctx, info, SCALP_HEIGHT)?;

    if stop_if_ceiling_blocked(ctx, info) || try_climb(ctx, info) {
        return Ok(());
    }

    if check_wall_collision(ctx, info) {
        ctx.state.rotation.z = Angle::ZERO;
        if info.front.floor.slant_class == SlantClass::None
            && info.front.floor.dy < -CLIMB_LIMIT_2_CLICK_MAX
        {
            match ctx.state.frame {
                0..=9 => {
                    ctx.set_animation(AnimationId::WallSmashLeft);
                    return Ok(());
                }
                10..=21 => {
                    ctx.set_animation(AnimationId::WallSmashRight);
                    return Ok(());
                }
                _ => {}
            }
        }
        ctx.set_animation(AnimationId::StaySolid);
    }

    let floor = info.mid.floor.dy;
    if floor > CLIMB_LIMIT_2_CLICK_MIN {
        fall_forward(ctx);
        return Ok(());
    }

    if (-CLIMB_LIMIT_2_CLICK_MIN..-STEPPABLE_HEIGHT).contains(&floor) {
        if (3..=14).contains(&ctx.state.frame) {
            ctx.set_animation(AnimationId::RunUpStepLeft);
        } else {
            ctx.set_animation(AnimationId::RunUpStepRight);
        }
    }

    if !try_start_slide(ctx, info) {
        ctx.state.location.position.y += floor.min(50);
    }
    Ok(())
}

pub(super) fn stop_input(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    if !ctx.state.is_alive() {
        ctx.state.set_goal(LaraStateId::Death);
        return Ok(());
    }

    if ctx.input.roll {
        ctx.state.set_goal(LaraStateId::Stop);
        ctx.set_animation(AnimationId::RollBegin);
        return Ok(());
    }

    ctx.state.set_goal(LaraStateId::Stop);

    if ctx.input.stepping_left() {
        ctx.state.set_goal(LaraStateId::StepLeft);
    } else if ctx.input.stepping_right() {
        ctx.state.set_goal(LaraStateId::StepRight);
    }

    if ctx.input.turning_left() {
        ctx.state.set_goal(LaraStateId::TurnLeftSlow);
    } else if ctx.input.turning_right() {
        ctx.state.set_goal(LaraStateId::TurnRightSlow);
    }

    if ctx.input.jump {
        ctx.state.set_goal(LaraStateId::JumpPrepare);
    } else if ctx.input.moving_forward() {
        if ctx.input.move_slow {
            walk_forward_input(ctx, info)?;
        } else {
            run_forward_input(ctx, info)?;
        }
    } else if ctx.input.moving_backward() {
        if ctx.input.move_slow {
            walk_backward_input(ctx, info)?;
        } else {
            ctx.state.set_goal(LaraStateId::RunBack);
        }
    }
    Ok(())
}

/// Shared by every state that stands in place.
pub(super) fn standing_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    ctx.state.fall_speed = 0;
    ctx.state.falling = false;
    info.facing_angle = ctx.state.rotation.y;
    ctx.state.movement_angle = info.facing_angle;
    info.set_limits(-CLIMB_LIMIT_2_CLICK_MIN, CLIMB_LIMIT_2_CLICK_MIN, 0);
    set_walls_and_pits(info);
    probe(ctx, info, SCALP_HEIGHT)?;

    if stop_if_ceiling_blocked(ctx, info) {
        return Ok(());
    }

    if info.mid.floor.dy > 100 {
        fall_forward(ctx);
        return Ok(());
    }

    if !try_start_slide(ctx, info) {
        apply_collision_feedback(ctx.state, info);
        place_on_floor(ctx.state, info);
    }
    Ok(())
}

pub(super) fn run_back_input(ctx: &mut Context<'_>, _: &mut CollisionInfo) -> HandlerResult {
    ctx.state.set_goal(LaraStateId::Stop);
    steer(ctx, RUN_TURN_SPEED);
    Ok(())
}

pub(super) fn run_back_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    ctx.state.fall_speed = 0;
    ctx.state.falling = false;
    info.set_limits(-CLIMB_LIMIT_2_CLICK_MIN, HEIGHT_LIMIT, 0);
    set_walls_and_pits(info);
    info.facing_angle = ctx.state.rotation.y + deg(180.0);
    ctx.state.movement_angle = info.facing_angle;
    probe(ctx, info, SCALP_HEIGHT)?;

    if stop_if_ceiling_blocked(ctx, info) {
        return Ok(());
    }

    if info.mid.floor.dy > 200 {
        fall_backward(ctx);
        return Ok(());
    }

    if check_wall_collision(ctx, info) {
        ctx.set_animation(AnimationId::StaySolid);
    }
    place_on_floor(ctx.state, info);
    Ok(())
}

fn turn_slow_input(ctx: &mut Context<'_>, direction: AxisMovement) -> HandlerResult {
    if !ctx.state.is_alive() {
        ctx.state.set_goal(LaraStateId::Stop);
        return Ok(());
    }

    let turning_right = direction == AxisMovement::Right;
    if turning_right {
        ctx.state.y_rotation_speed += TURN_ACCELERATION;
    } else {
        ctx.state.y_rotation_speed -= TURN_ACCELERATION;
    }

    if ctx.state.hand_status == HandStatus::Combat {
        ctx.state.set_goal(LaraStateId::TurnFast);
    } else if ctx.state.y_rotation_speed.abs_units() > FAST_TURN_SPEED.abs_units() {
        if ctx.input.move_slow {
            ctx.state.y_rotation_speed = if turning_right {
                FAST_TURN_SPEED
            } else {
                -FAST_TURN_SPEED
            };
        } else {
            ctx.state.set_goal(LaraStateId::TurnFast);
        }
    }

    if ctx.input.moving_forward() {
        if ctx.input.move_slow {
            ctx.state.set_goal(LaraStateId::WalkForward);
        } else {
            ctx.state.set_goal(LaraStateId::RunForward);
        }
    } else if ctx.input.x_movement != direction {
        ctx.state.set_goal(LaraStateId::Stop);
    }
    Ok(())
}

pub(super) fn turn_right_slow_input(ctx: &mut Context<'_>, _: &mut CollisionInfo) -> HandlerResult {
    turn_slow_input(ctx, AxisMovement::Right)
}

pub(super) fn turn_left_slow_input(ctx: &mut Context<'_>, _: &mut CollisionInfo) -> HandlerResult {
    turn_slow_input(ctx, AxisMovement::Left)
}

pub(super) fn turn_fast_input(ctx: &mut Context<'_>, _: &mut CollisionInfo) -> HandlerResult {
    if !ctx.state.is_alive() {
        ctx.state.set_goal(LaraStateId::Stop);
        return Ok(());
    }

    if ctx.state.y_rotation_speed.raw() >= 0 {
        ctx.state.y_rotation_speed = FAST_TURN_SPEED_RUNNING;
        if ctx.input.turning_right() {
            return Ok(());
        }
    } else {
        ctx.state.y_rotation_speed = -FAST_TURN_SPEED_RUNNING;
        if ctx.input.turning_left() {
            return Ok(());
        }
    }
    ctx.state.set_goal(LaraStateId::Stop);
    Ok(())
}

pub(super) fn walk_backward_input(ctx: &mut Context<'_>, _: &mut CollisionInfo) -> HandlerResult {
    if !ctx.state.is_alive() {
        ctx.state.set_goal(LaraStateId::Stop);
        return Ok(());
    }

    if ctx.input.moving_backward() && ctx.input.move_slow {
        ctx.state.set_goal(LaraStateId::WalkBackward);
    } else {
        ctx.state.set_goal(LaraStateId::Stop);
    }
    steer(ctx, WALK_TURN_SPEED);
    Ok(())
}

pub(super) fn walk_backward_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    ctx.state.fall_speed = 0;
    ctx.state.falling = false;
    info.set_limits(-CLIMB_LIMIT_2_CLICK_MIN, CLIMB_LIMIT_2_CLICK_MIN, 0);
    info.facing_angle = ctx.state.rotation.y + deg(180.0);
    ctx.state.movement_angle = info.facing_angle;
    set_walls_and_pits(info);
    probe(ctx, info, SCALP_HEIGHT)?;

    if stop_if_ceiling_blocked(ctx, info) {
        return Ok(());
    }

    if check_wall_collision(ctx, info) {
        ctx.set_animation(AnimationId::StaySolid);
    }

    let floor = info.mid.floor.dy;
    if floor > STEPPABLE_HEIGHT && floor < CLIMB_LIMIT_2_CLICK_MIN {
        // Right foot leads for the first half of the walk-back cycle.
        if (0..=29).contains(&ctx.state.frame) {
            ctx.set_animation(AnimationId::WalkDownBackRight);
        } else {
            ctx.set_animation(AnimationId::WalkDownBackLeft);
        }
    }

    if !try_start_slide(ctx, info) {
        place_on_floor(ctx.state, info);
    }
    Ok(())
}

fn step_input(ctx: &mut Context<'_>, direction: AxisMovement) -> HandlerResult {
    if !ctx.state.is_alive() || ctx.input.step_movement != direction {
        ctx.state.set_goal(LaraStateId::Stop);
        return Ok(());
    }
    steer(ctx, WALK_TURN_SPEED);
    Ok(())
}

pub(super) fn step_right_input(ctx: &mut Context<'_>, _: &mut CollisionInfo) -> HandlerResult {
    step_input(ctx, AxisMovement::Right)
}

pub(super) fn step_left_input(ctx: &mut Context<'_>, _: &mut CollisionInfo) -> HandlerResult {
    step_input(ctx, AxisMovement::Left)
}

fn step_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo, offset: Angle) -> HandlerResult {
    ctx.state.fall_speed = 0;
    ctx.state.falling = false;
    info.set_limits(-STEPPABLE_HEIGHT, STEPPABLE_HEIGHT, 0);
    info.facing_angle = ctx.state.rotation.y + offset;
    ctx.state.movement_angle = info.facing_angle;
    set_walls_and_pits(info);
    probe(ctx, info, SCALP_HEIGHT)?;

    if stop_if_ceiling_blocked(ctx, info) {
        return Ok(());
    }

    if check_wall_collision(ctx, info) {
        ctx.state.set_goal(LaraStateId::Stop);
        ctx.set_animation(AnimationId::StaySolid);
        return Ok(());
    }

    if !try_start_slide(ctx, info) {
        place_on_floor(ctx.state, info);
    }
    Ok(())
}

pub(super) fn step_right_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    step_postprocess(ctx, info, deg(90.0))
}

pub(super) fn step_left_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    step_postprocess(ctx, info, deg(-90.0))
}

fn roll_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo, backward: bool) -> HandlerResult {
    ctx.state.falling = false;
    ctx.state.fall_speed = 0;
    info.facing_angle = if backward {
        ctx.state.rotation.y + deg(180.0)
    } else {
        ctx.state.rotation.y
    };
    ctx.state.movement_angle = info.facing_angle;
    info.policy.add(PolicyFlag::SlopesAreWalls);
    info.set_limits(-CLIMB_LIMIT_2_CLICK_MIN, HEIGHT_LIMIT, 0);
    probe(ctx, info, SCALP_HEIGHT)?;

    if stop_if_ceiling_blocked(ctx, info) || try_start_slide(ctx, info) {
        return Ok(());
    }

    if info.mid.floor.dy > 200 {
        if backward {
            fall_backward(ctx);
        } else {
            fall_forward(ctx);
        }
        return Ok(());
    }

    apply_collision_feedback(ctx.state, info);
    place_on_floor(ctx.state, info);
    Ok(())
}

pub(super) fn roll_backward_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    roll_postprocess(ctx, info, true)
}

pub(super) fn roll_forward_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    roll_postprocess(ctx, info, false)
}

/// Bounce off a wall after running into it.
pub(super) fn wall_smash_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    info.set_limits(-CLIMB_LIMIT_2_CLICK_MIN, CLIMB_LIMIT_2_CLICK_MIN, 0);
    info.facing_angle = ctx.state.movement_angle;
    set_walls_and_pits(info);
    probe(ctx, info, SCALP_HEIGHT)?;
    apply_collision_feedback(ctx.state, info);
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::angle::{Angle, deg};
    use crate::character::handlers::test_support::*;
    use crate::character::state::{AnimationId, LaraStateId};
    use crate::collision::AxisCollision;
    use crate::input::{AxisMovement, InputState};
    use crate::level::{RoomBuilder, Sector, pos};

    #[test]
    fn stop_with_forward_runs_or_walks() {
        let level = single_room(flat_room());

        let mut state = character(LaraStateId::Stop, pos(2560, 0, 2560), Angle::ZERO);
        run_input(&level, &mut state, &InputState::forward());
        assert_eq!(state.goal_state, LaraStateId::RunForward);

        let mut state = character(LaraStateId::Stop, pos(2560, 0, 2560), Angle::ZERO);
        run_input(&level, &mut state, &InputState::forward().with_move_slow());
        assert_eq!(state.goal_state, LaraStateId::WalkForward);
    }

    #[test]
    fn stop_without_input_stays_put() {
        let level = single_room(flat_room());
        let mut state = character(LaraStateId::Stop, pos(2560, 0, 2560), Angle::ZERO);
        let next = run_input(&level, &mut state, &InputState::default());
        assert_eq!(next, None);
        assert_eq!(state.goal_state, LaraStateId::Stop);

        let (next, info, _) = run_postprocess(&level, &mut state, &InputState::default());
        assert_eq!(next, None);
        assert_eq!(info.collision_type, AxisCollision::None);
        assert_eq!(state.location.position, pos(2560, 0, 2560));
    }

    #[test]
    fn roll_substitutes_right_away() {
        let level = single_room(flat_room());
        let mut state = character(LaraStateId::RunForward, pos(2560, 0, 2560), Angle::ZERO);
        let input = InputState {
            roll: true,
            ..InputState::forward()
        };
        assert_eq!(run_input(&level, &mut state, &input), Some(LaraStateId::RollForward));
        assert_eq!(state.goal_state, LaraStateId::Stop);
    }

    #[test]
    fn running_into_a_wall_stops_and_backs_out_of_it() {
        // Walls from z = 3072 on.
        let level = single_room(flat_room().edit_area(1..=6, 3..=6, |_| Sector::WALL));
        let mut state = character(LaraStateId::WalkForward, pos(2560, 0, 3000), Angle::ZERO);
        state.speed = 20;
        state.frame = 5;

        let (next, info, carry) = run_postprocess(&level, &mut state, &InputState::forward());
        assert_eq!(info.collision_type, AxisCollision::Front);
        assert_eq!(next, Some(LaraStateId::Stop));
        assert_eq!(state.goal_state, LaraStateId::Stop);
        assert_eq!(state.speed, 0);
        assert!(carry.is_empty());
        assert_eq!(state.location.position.z, 3071 - 100);

        state.current_state = LaraStateId::WalkForward;
        let (_, info, _) = run_postprocess(&level, &mut state, &InputState::forward());
        assert_eq!(info.collision_type, AxisCollision::None);
    }

    #[test]
    fn stepping_back_down_picks_the_leading_foot() {
        let level = single_room(
            RoomBuilder::new(0, 0, 8, 8)
                .fill(Sector::open(200, -4096))
                .border_walls(),
        );
        let mut state = character(LaraStateId::WalkBackward, pos(2560, 0, 2560), Angle::ZERO);
        state.frame = 12;
        let (_, info, _) = run_postprocess(&level, &mut state, &InputState::backward());
        assert_eq!(info.mid.floor.dy, 200);
        assert_eq!(state.animation.map(|a| a.animation), Some(AnimationId::WalkDownBackRight));

        let mut state = character(LaraStateId::WalkBackward, pos(2560, 0, 2560), Angle::ZERO);
        state.frame = 40;
        run_postprocess(&level, &mut state, &InputState::backward());
        assert_eq!(state.animation.map(|a| a.animation), Some(AnimationId::WalkDownBackLeft));
    }

    #[test]
    fn running_up_a_medium_block_climbs_three_clicks() {
        let level = single_room(flat_room().edit_area(1..=6, 3..=6, |_| Sector::open(-700, -4096)));
        let mut state = character(LaraStateId::RunForward, pos(2560, 0, 3000), Angle::ZERO);
        let input = InputState::forward().with_action();

        let (next, info, carry) = run_postprocess(&level, &mut state, &input);
        assert_eq!(info.front.floor.dy, -700);
        assert_eq!(next, Some(LaraStateId::Climbing));
        assert_eq!(state.animation.map(|a| a.animation), Some(AnimationId::Climb3Click));
        assert_eq!(state.goal_state, LaraStateId::Stop);
        assert_eq!(carry.movement, pos(0, 68, 0));
    }

    #[test]
    fn walking_off_a_ledge_falls() {
        let level = single_room(flat_room().edit_area(1..=6, 3..=6, |_| Sector::open(1024, -4096)));
        let mut state = character(LaraStateId::WalkForward, pos(2560, 0, 3100), Angle::ZERO);
        let (next, _, _) = run_postprocess(&level, &mut state, &InputState::forward());
        assert_eq!(next, Some(LaraStateId::JumpForward));
        assert!(state.falling);
        assert_eq!(state.goal_state, LaraStateId::JumpForward);
    }

    #[test]
    fn slow_turn_speeds_up_into_a_fast_turn() {
        let level = single_room(flat_room());
        let mut state = character(LaraStateId::TurnRightSlow, pos(2560, 0, 2560), Angle::ZERO);
        let input = InputState::default().with_turn(AxisMovement::Right);

        run_input(&level, &mut state, &input);
        assert_eq!(state.goal_state, LaraStateId::TurnRightSlow);
        run_input(&level, &mut state, &input);
        assert_eq!(state.goal_state, LaraStateId::TurnFast);

        let mut slow = character(LaraStateId::TurnRightSlow, pos(2560, 0, 2560), Angle::ZERO);
        let input = input.with_move_slow();
        run_input(&level, &mut slow, &input);
        run_input(&level, &mut slow, &input);
        assert_eq!(slow.y_rotation_speed, deg(4.0));
        assert_eq!(slow.goal_state, LaraStateId::TurnRightSlow);
    }

    #[test]
    fn stepping_into_a_wall_stops() {
        let level = single_room(flat_room());
        // Next to the x = 1024 wall boundary, stepping left (-X when facing +Z).
        let mut state = character(LaraStateId::StepLeft, pos(1100, 0, 2560), Angle::ZERO);
        let input = InputState::default().with_step(AxisMovement::Left);
        let (next, info, _) = run_postprocess(&level, &mut state, &input);
        assert_eq!(info.collision_type, AxisCollision::Front);
        assert_eq!(next, Some(LaraStateId::Stop));
        assert_eq!(state.goal_state, LaraStateId::Stop);
    }
}
