//! Errors raised when level geometry is inconsistent.

use std::fmt;

use crate::level::RoomId;

/// A geometry query could not be answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocomotionError {
    /// A portal or stack link points at a room that does not exist.
    UnknownRoom(RoomId),
    /// An absolute position lies outside the sector grid of a linked room.
    SectorOutOfBounds { room: RoomId, x: i32, z: i32 },
    /// Room crossing kept following links; the level likely has a portal cycle.
    ResolveLimitExceeded { room: RoomId, iterations: usize },
}

impl fmt::Display for LocomotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocomotionError::UnknownRoom(room) => write!(f, "room {} does not exist", room.0),
            LocomotionError::SectorOutOfBounds { room, x, z } => {
                write!(f, "position ({x}, {z}) is outside the sectors of room {}", room.0)
            }
            LocomotionError::ResolveLimitExceeded { room, iterations } => write!(
                f,
                "room resolution starting in room {} did not settle after {iterations} links",
                room.0
            ),
        }
    }
}

impl std::error::Error for LocomotionError {}
