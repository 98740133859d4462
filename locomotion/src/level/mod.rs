/*!
Level geometry consumed by the collision probe and the locomotion states.

The world is a set of rooms, each a grid of square sectors with a floor and a
ceiling height. Rooms connect horizontally through portal sectors and
vertically through room-above / room-below links. Everything here is read
only during a frame.

- types:    integer positions, intervals and boxes
- sector:   sector cells, slants and grid math
- room:     rooms, static meshes, the in-memory `Level` and `RoomBuilder`
- height:   floor/ceiling sampling, floor slant and water surface queries
- resolver: room crossing
*/

pub mod height;
pub mod resolver;
pub mod room;
pub mod sector;
pub mod types;

use crate::error::LocomotionError;

pub use height::{HeightInfo, floor_slant_at, water_surface_height};
pub use resolver::resolve_room;
pub use room::{Level, Room, RoomBuilder, StaticMesh};
pub use sector::{FloorKind, Sector, Slant, SlantClass};
pub use types::{BoundingBox, Interval, Position, pos};

/// Index of a room in its level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(pub usize);

/// Read-only access to level rooms.
///
/// Implemented by [`Level`]; hosts with their own level store can implement it
/// directly.
pub trait LevelGeometry {
    fn room(&self, id: RoomId) -> Result<&Room, LocomotionError>;

    fn room_count(&self) -> usize;

    /// Sector of `room` under an absolute position, without following links.
    fn sector_at(&self, room: RoomId, position: &Position) -> Result<&Sector, LocomotionError> {
        self.room(room)?
            .sector_at_absolute(position)
            .ok_or(LocomotionError::SectorOutOfBounds {
                room,
                x: position.x,
                z: position.z,
            })
    }

    fn static_meshes(&self, room: RoomId) -> Result<&[StaticMesh], LocomotionError> {
        Ok(&self.room(room)?.static_meshes)
    }

    fn is_water_room(&self, room: RoomId) -> Result<bool, LocomotionError> {
        Ok(self.room(room)?.is_water)
    }
}

/// A position together with the room that owns it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Location {
    pub room: RoomId,
    pub position: Position,
}

impl Location {
    pub fn new(room: RoomId, position: Position) -> Self {
        Self { room, position }
    }

    /// This location shifted by a displacement, still claiming the same room.
    pub fn moved(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            room: self.room,
            position: self.position + pos(dx, dy, dz),
        }
    }

    /// Re-resolves the owning room in place and returns the sector under the
    /// position.
    pub fn update_room<'a>(
        &mut self,
        level: &'a dyn LevelGeometry,
        max_iterations: usize,
    ) -> Result<&'a Sector, LocomotionError> {
        let (room, sector) = resolve_room(level, &self.position, self.room, max_iterations)?;
        self.room = room;
        Ok(sector)
    }
}
