//! Sliding down steep slopes.

use crate::angle::deg;
use crate::collision::CollisionInfo;
use crate::error::LocomotionError;

use super::Context;
use super::helpers::common_slide_handling;
use crate::character::state::LaraStateId;

pub(super) fn slide_forward_input(ctx: &mut Context<'_>, _: &mut CollisionInfo) -> Result<(), LocomotionError> {
    if ctx.input.jump && !ctx.input.moving_backward() {
        ctx.state.set_goal(LaraStateId::JumpForward);
    }
    Ok(())
}

pub(super) fn slide_forward_postprocess(
    ctx: &mut Context<'_>,
    info: &mut CollisionInfo,
) -> Result<(), LocomotionError> {
    ctx.state.movement_angle = ctx.state.rotation.y;
    common_slide_handling(ctx, info)
}

pub(super) fn slide_backward_input(ctx: &mut Context<'_>, _: &mut CollisionInfo) -> Result<(), LocomotionError> {
    if ctx.input.jump {
        ctx.state.set_goal(LaraStateId::JumpBack);
    }
    Ok(())
}

pub(super) fn slide_backward_postprocess(
    ctx: &mut Context<'_>,
    info: &mut CollisionInfo,
) -> Result<(), LocomotionError> {
    ctx.state.movement_angle = ctx.state.rotation.y + deg(180.0);
    common_slide_handling(ctx, info)
}

#[cfg(test)]
mod tests {
    use crate::angle::{Angle, deg};
    use crate::character::handlers::test_support::*;
    use crate::character::state::{AnimationId, LaraStateId};
    use crate::input::InputState;
    use crate::level::{Sector, Slant, pos};

    #[test]
    fn steep_floor_starts_a_slide_facing_downhill() {
        // Slant x > 2 lowers the floor towards -X; the sector centre sits at 384.
        let level = single_room(flat_room().edit_area(2..=2, 2..=2, |s| s.with_floor_slant(Slant::new(3, 0))));
        let mut lara = character(LaraStateId::Stop, pos(2560, 384, 2560), deg(-80.0));
        let (next, _, _) = run_postprocess(&level, &mut lara, &InputState::default());
        assert_eq!(next, Some(LaraStateId::SlideForward));
        assert_eq!(lara.rotation.y, deg(-90.0));
        assert_eq!(lara.current_slide_angle, deg(-90.0));
        assert_eq!(lara.animation.map(|a| a.animation), Some(AnimationId::SlideForward));
    }

    #[test]
    fn facing_uphill_slides_backward() {
        let level = single_room(flat_room().edit_area(2..=2, 2..=2, |s| s.with_floor_slant(Slant::new(3, 0))));
        let mut lara = character(LaraStateId::Stop, pos(2560, 384, 2560), deg(90.0));
        let (next, _, _) = run_postprocess(&level, &mut lara, &InputState::default());
        assert_eq!(next, Some(LaraStateId::SlideBackward));
        assert_eq!(lara.rotation.y, deg(90.0));
    }

    #[test]
    fn slide_ends_on_flat_ground() {
        let level = single_room(flat_room());
        let mut lara = character(LaraStateId::SlideForward, pos(2560, 0, 2560), Angle::ZERO);
        run_postprocess(&level, &mut lara, &InputState::default());
        assert_eq!(lara.goal_state, LaraStateId::Stop);
    }

    #[test]
    fn sliding_off_an_edge_falls() {
        let level = single_room(flat_room().edit_area(1..=6, 1..=6, |_| Sector::open(1024, -4096)));
        let mut lara = character(LaraStateId::SlideBackward, pos(2560, 0, 2560), Angle::ZERO);
        let (next, _, _) = run_postprocess(&level, &mut lara, &InputState::default());
        assert_eq!(next, Some(LaraStateId::FallBackward));
        assert!(lara.falling);
    }

    #[test]
    fn jump_leaves_the_slide() {
        let level = single_room(flat_room());
        let mut lara = character(LaraStateId::SlideBackward, pos(2560, 0, 2560), Angle::ZERO);
        run_input(&level, &mut lara, &InputState::default().with_jump());
        assert_eq!(lara.goal_state, LaraStateId::JumpBack);
    }
}
