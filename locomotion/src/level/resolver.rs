//! Room crossing.
//!
//! A position is owned by exactly one room. After movement the owner is found
//! again by following horizontal portals out of the previous room, then
//! stacked-room links up or down until the position lies between the floor
//! and ceiling of the sector under it.

use log::error;

use crate::error::LocomotionError;

use super::height::sector_in;
use super::sector::{Sector, sector_coord};
use super::types::Position;
use super::{LevelGeometry, RoomId};

/// The room owning `position` and the sector under it, starting from `room`.
///
/// Fails on dangling links and when more than `max_iterations` links are
/// followed, which only happens with cyclic portal data.
pub fn resolve_room<'a>(
    level: &'a dyn LevelGeometry,
    position: &Position,
    room: RoomId,
    max_iterations: usize,
) -> Result<(RoomId, &'a Sector), LocomotionError> {
    let start = room;
    let mut room = room;
    let mut iterations = 0usize;
    let mut step = |room: RoomId| {
        iterations += 1;
        if iterations > max_iterations {
            error!("room resolution from room {} exceeded {max_iterations} links", start.0);
            return Err(LocomotionError::ResolveLimitExceeded {
                room: start,
                iterations: max_iterations,
            });
        }
        Ok(room)
    };

    let mut sector = loop {
        let current = level.room(room)?;
        let sector = current
            .sector_clamped(
                sector_coord(position.x, current.position.x),
                sector_coord(position.z, current.position.z),
            )
            .ok_or(LocomotionError::SectorOutOfBounds {
                room,
                x: position.x,
                z: position.z,
            })?;
        match sector.portal {
            Some(next) => room = step(next)?,
            None => break sector,
        }
    };

    if sector.floor > position.y {
        while sector.ceiling > position.y {
            let Some(above) = sector.room_above else { break };
            room = step(above)?;
            sector = sector_in(level, room, position)?;
        }
    } else {
        while sector.floor <= position.y {
            let Some(below) = sector.room_below else { break };
            room = step(below)?;
            sector = sector_in(level, room, position)?;
        }
    }

    Ok((room, sector))
}
