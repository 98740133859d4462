//! Hanging from ledges, shimmying along them and pulling up.

use crate::angle::{Angle, deg};
use crate::collision::{CollisionInfo, PolicyFlag};
use crate::constants::{CLIMB_LIMIT_2_CLICK_MIN, SCALP_HEIGHT};
use crate::error::LocomotionError;
use crate::input::AxisMovement;

use super::Context;
use super::helpers::{common_edge_hang_handling, probe};
use crate::character::state::LaraStateId;

type HandlerResult = Result<(), LocomotionError>;

/// Front floor distances from which a hanging character can pull up.
const PULL_UP_RANGE: std::ops::Range<i32> = -849..-650;

pub(super) fn hang_input(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    info.disable_baddie_interaction();
    if ctx.input.x_movement == AxisMovement::Left || ctx.input.stepping_left() {
        ctx.state.set_goal(LaraStateId::ShimmyLeft);
    } else if ctx.input.x_movement == AxisMovement::Right || ctx.input.stepping_right() {
        ctx.state.set_goal(LaraStateId::ShimmyRight);
    }
    Ok(())
}

pub(super) fn hang_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    ctx.state.movement_angle = ctx.state.rotation.y;
    common_edge_hang_handling(ctx, info)?;

    if ctx.state.goal_state != LaraStateId::Hang || !ctx.input.moving_forward() {
        return Ok(());
    }

    let corners_open = [info.front, info.front_left, info.front_right]
        .iter()
        .all(|d| d.floor.dy - d.ceiling.dy >= 0);
    if !PULL_UP_RANGE.contains(&info.front.floor.dy) || !corners_open || info.is_scenery_blocked() {
        return Ok(());
    }

    if ctx.input.move_slow {
        ctx.state.set_goal(LaraStateId::Handstand);
    } else {
        ctx.state.set_goal(LaraStateId::Climbing);
    }
    Ok(())
}

/// Shared by the pull-up animations, which only need to stay clear of walls.
pub(super) fn climbing_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    info.set_limits(-CLIMB_LIMIT_2_CLICK_MIN, CLIMB_LIMIT_2_CLICK_MIN, 0);
    info.policy
        .add_many(&[PolicyFlag::SlopesAreWalls, PolicyFlag::SlopesArePits]);
    info.facing_angle = ctx.state.rotation.y;
    probe(ctx, info, SCALP_HEIGHT)
}

fn shimmy_input(ctx: &mut Context<'_>, info: &mut CollisionInfo, direction: AxisMovement) -> HandlerResult {
    info.disable_baddie_interaction();
    if ctx.input.x_movement != direction && ctx.input.step_movement != direction {
        ctx.state.set_goal(LaraStateId::Hang);
    }
    Ok(())
}

fn shimmy_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo, offset: Angle) -> HandlerResult {
    ctx.state.movement_angle = ctx.state.rotation.y + offset;
    common_edge_hang_handling(ctx, info)?;
    ctx.state.movement_angle = ctx.state.rotation.y + offset;
    Ok(())
}

pub(super) fn shimmy_left_input(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    shimmy_input(ctx, info, AxisMovement::Left)
}

pub(super) fn shimmy_left_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    shimmy_postprocess(ctx, info, deg(-90.0))
}

pub(super) fn shimmy_right_input(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    shimmy_input(ctx, info, AxisMovement::Right)
}

pub(super) fn shimmy_right_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    shimmy_postprocess(ctx, info, deg(90.0))
}

#[cfg(test)]
mod tests {
    use crate::angle::{Angle, deg};
    use crate::character::handlers::test_support::*;
    use crate::character::state::{AnimationId, HandStatus, KinematicState, LaraStateId};
    use crate::input::{AxisMovement, InputState};
    use crate::level::{Level, RoomBuilder, Sector, pos};

    /// A deep room with a ledge 750 units above the hanging character's feet
    /// from z = 3072 on.
    fn ledge() -> Level {
        single_room(
            RoomBuilder::new(0, 0, 8, 8)
                .fill(Sector::open(2048, -4096))
                .border_walls()
                .edit_area(1..=6, 3..=6, |_| Sector::open(-750, -4096)),
        )
    }

    fn hanging(state: LaraStateId) -> KinematicState {
        let mut lara = character(state, pos(2560, 0, 3022), Angle::ZERO);
        lara.hand_status = HandStatus::Grabbing;
        lara
    }

    #[test]
    fn forward_while_hanging_pulls_up() {
        let level = ledge();
        let mut lara = hanging(LaraStateId::Hang);
        let input = InputState::forward().with_action();
        let (next, info, _) = run_postprocess(&level, &mut lara, &input);
        assert_eq!(next, None);
        assert_eq!(info.front.floor.dy, -750);
        assert_eq!(lara.goal_state, LaraStateId::Climbing);
        assert_eq!(lara.location.position, pos(2560, 0, 3022));

        let mut lara = hanging(LaraStateId::Hang);
        run_postprocess(&level, &mut lara, &input.with_move_slow());
        assert_eq!(lara.goal_state, LaraStateId::Handstand);
    }

    #[test]
    fn releasing_action_drops_from_the_ledge() {
        let level = ledge();
        let mut lara = hanging(LaraStateId::Hang);
        let (next, _, _) = run_postprocess(&level, &mut lara, &InputState::default());
        assert_eq!(next, Some(LaraStateId::JumpUp));
        assert_eq!(lara.goal_state, LaraStateId::JumpUp);
        assert_eq!(lara.animation.map(|a| a.animation), Some(AnimationId::TryHangVertical));
        assert_eq!(lara.hand_status, HandStatus::None);
        assert!(lara.falling);
        assert_eq!(lara.location.position.y, -750 + 762 + 2);
    }

    #[test]
    fn hang_input_starts_a_shimmy() {
        let level = ledge();
        let mut lara = hanging(LaraStateId::Hang);
        run_input(&level, &mut lara, &InputState::default().with_step(AxisMovement::Right));
        assert_eq!(lara.goal_state, LaraStateId::ShimmyRight);

        let mut lara = hanging(LaraStateId::ShimmyRight);
        run_input(&level, &mut lara, &InputState::default().with_action());
        assert_eq!(lara.goal_state, LaraStateId::Hang);
    }

    #[test]
    fn shimmy_moves_sideways() {
        let level = ledge();
        let mut lara = hanging(LaraStateId::ShimmyLeft);
        lara.movement_angle = deg(-90.0);
        let input = InputState::default()
            .with_action()
            .with_turn(AxisMovement::Left);
        run_postprocess(&level, &mut lara, &input);
        assert_eq!(lara.movement_angle, deg(-90.0));
        assert_eq!(lara.goal_state, LaraStateId::ShimmyLeft);
    }
}
