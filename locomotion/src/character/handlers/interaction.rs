//! Object interaction and death states.

use crate::collision::{CollisionInfo, PolicyFlag};
use crate::constants::{CLIMB_LIMIT_2_CLICK_MIN, DEATH_COLLISION_RADIUS, SCALP_HEIGHT};
use crate::error::LocomotionError;

use super::Context;
use super::helpers::{apply_collision_feedback, place_on_floor, probe};
use crate::character::state::LaraStateId;

type HandlerResult = Result<(), LocomotionError>;

/// Scripted states ignore enemies while they play.
pub(super) fn busy_input(_: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    info.disable_baddie_interaction();
    Ok(())
}

pub(super) fn pushable_grab_input(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    busy_input(ctx, info)?;
    if ctx.input.action {
        ctx.state.set_goal(LaraStateId::PushableGrab);
    } else {
        ctx.state.set_goal(LaraStateId::Stop);
    }
    Ok(())
}

/// Keeps the character out of walls while an object animation plays.
pub(super) fn interact_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    ctx.state.movement_angle = ctx.state.rotation.y;
    info.facing_angle = ctx.state.rotation.y;
    info.set_limits(-CLIMB_LIMIT_2_CLICK_MIN, CLIMB_LIMIT_2_CLICK_MIN, 0);
    info.policy
        .add_many(&[PolicyFlag::SlopesAreWalls, PolicyFlag::SlopesArePits]);
    probe(ctx, info, SCALP_HEIGHT)
}

pub(super) fn death_input(_: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    info.disable_baddie_interaction();
    Ok(())
}

/// Lays the body on the floor with a wide radius.
fn settle_body(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    ctx.state.movement_angle = ctx.state.rotation.y;
    info.facing_angle = ctx.state.rotation.y;
    info.collision_radius = DEATH_COLLISION_RADIUS;
    info.set_limits(-CLIMB_LIMIT_2_CLICK_MIN, CLIMB_LIMIT_2_CLICK_MIN, 0);
    probe(ctx, info, SCALP_HEIGHT)?;
    apply_collision_feedback(ctx.state, info);
    place_on_floor(ctx.state, info);
    Ok(())
}

pub(super) fn death_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    settle_body(ctx, info)?;
    ctx.state.health = ctx.state.health.min(-1);
    ctx.state.air = -1;
    Ok(())
}

/// Like a regular death, but the health is left to the effect that caused it.
pub(super) fn midas_death_postprocess(ctx: &mut Context<'_>, info: &mut CollisionInfo) -> HandlerResult {
    settle_body(ctx, info)
}
