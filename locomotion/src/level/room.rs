//! Rooms, static scenery and the in-memory [`Level`] store.

use crate::angle::{Angle, Axis};
use crate::error::LocomotionError;

use super::sector::{Sector, sector_coord, sector_index};
use super::types::{BoundingBox, Position, pos};
use super::{LevelGeometry, RoomId};

/// A piece of static scenery with a collision box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StaticMesh {
    pub position: Position,
    /// Yaw of the mesh; only the cardinal axis matters for collision.
    pub rotation: Angle,
    /// Collision box in mesh space.
    pub collision_box: BoundingBox,
    /// Walk-through scenery such as plants.
    pub do_not_collide: bool,
}

impl StaticMesh {
    pub fn new(position: Position, rotation: Angle, collision_box: BoundingBox) -> Self {
        Self {
            position,
            rotation,
            collision_box,
            do_not_collide: false,
        }
    }

    /// Collision box rotated onto the mesh axis and moved into world space.
    pub fn world_box(&self) -> BoundingBox {
        let b = &self.collision_box;
        let (x, z) = match self.rotation.axis() {
            Axis::PosZ => ((b.min.x, b.max.x), (b.min.z, b.max.z)),
            Axis::PosX => ((b.min.z, b.max.z), (-b.max.x, -b.min.x)),
            Axis::NegZ => ((-b.max.x, -b.min.x), (-b.max.z, -b.min.z)),
            Axis::NegX => ((-b.max.z, -b.min.z), (b.min.x, b.max.x)),
        };
        BoundingBox::new(pos(x.0, b.min.y, z.0), pos(x.1, b.max.y, z.1)).translated(&self.position)
    }
}

/// A rectangular grid of sectors.
#[derive(Clone, Debug, PartialEq)]
pub struct Room {
    /// World position of the grid origin; only X and Z are used.
    pub position: Position,
    pub sectors_x: usize,
    pub sectors_z: usize,
    pub sectors: Vec<Sector>,
    pub is_water: bool,
    pub static_meshes: Vec<StaticMesh>,
}

impl Room {
    pub fn sector(&self, x: usize, z: usize) -> Option<&Sector> {
        if x >= self.sectors_x || z >= self.sectors_z {
            return None;
        }
        self.sectors.get(sector_index(x, z, self.sectors_z))
    }

    /// Sector for grid coordinates clamped into the room.
    ///
    /// Coordinates past the Z edges snap onto the edge row but keep away from
    /// the corners, so a probe leaving the room lands on a border sector that
    /// can carry a portal.
    pub fn sector_clamped(&self, x: i32, z: i32) -> Option<&Sector> {
        let last_x = self.sectors_x as i32 - 1;
        let last_z = self.sectors_z as i32 - 1;
        let inner_x = |x: i32| x.clamp(1.min(last_x), (last_x - 1).max(1.min(last_x)));

        let (x, z) = if z <= 0 {
            (inner_x(x), 0)
        } else if z >= last_z {
            (inner_x(x), last_z)
        } else {
            (x.clamp(0, last_x.max(0)), z)
        };
        self.sector(x as usize, z as usize)
    }

    /// Sector containing an absolute world position, if it lies on the grid.
    pub fn sector_at_absolute(&self, world: &Position) -> Option<&Sector> {
        let x = sector_coord(world.x, self.position.x);
        let z = sector_coord(world.z, self.position.z);
        if x < 0 || z < 0 {
            return None;
        }
        self.sector(x as usize, z as usize)
    }

    /// Clamped lookup for an absolute world position.
    pub fn sector_clamped_at(&self, world: &Position) -> Option<&Sector> {
        self.sector_clamped(
            sector_coord(world.x, self.position.x),
            sector_coord(world.z, self.position.z),
        )
    }
}

/// Incremental construction of a [`Room`].
///
/// ```rust
/// use locomotion::level::{RoomBuilder, Sector};
///
/// let room = RoomBuilder::new(0, 0, 4, 4)
///     .fill(Sector::open(0, -2048))
///     .border_walls()
///     .build();
/// assert!(room.sector(0, 0).is_some_and(|s| s.is_wall()));
/// ```
#[derive(Clone, Debug)]
pub struct RoomBuilder {
    room: Room,
}

impl RoomBuilder {
    /// A room of wall sectors with its grid origin at `(x, z)`.
    pub fn new(x: i32, z: i32, sectors_x: usize, sectors_z: usize) -> Self {
        Self {
            room: Room {
                position: pos(x, 0, z),
                sectors_x,
                sectors_z,
                sectors: vec![Sector::WALL; sectors_x * sectors_z],
                is_water: false,
                static_meshes: Vec::new(),
            },
        }
    }

    pub fn fill(mut self, sector: Sector) -> Self {
        self.room.sectors.fill(sector);
        self
    }

    /// Turns the outermost ring of sectors into walls.
    pub fn border_walls(mut self) -> Self {
        let (sx, sz) = (self.room.sectors_x, self.room.sectors_z);
        for x in 0..sx {
            for z in 0..sz {
                if x == 0 || z == 0 || x + 1 == sx || z + 1 == sz {
                    self.room.sectors[sector_index(x, z, sz)] = Sector::WALL;
                }
            }
        }
        self
    }

    /// Replaces one sector; coordinates outside the grid are ignored.
    pub fn sector(mut self, x: usize, z: usize, sector: Sector) -> Self {
        if x < self.room.sectors_x && z < self.room.sectors_z {
            let sz = self.room.sectors_z;
            self.room.sectors[sector_index(x, z, sz)] = sector;
        }
        self
    }

    /// Applies `edit` to every sector in the inclusive rectangle.
    pub fn edit_area(
        mut self,
        xs: std::ops::RangeInclusive<usize>,
        zs: std::ops::RangeInclusive<usize>,
        edit: impl Fn(Sector) -> Sector,
    ) -> Self {
        let sz = self.room.sectors_z;
        for x in xs {
            for z in zs.clone() {
                if x < self.room.sectors_x && z < sz {
                    let idx = sector_index(x, z, sz);
                    self.room.sectors[idx] = edit(self.room.sectors[idx]);
                }
            }
        }
        self
    }

    pub fn water(mut self) -> Self {
        self.room.is_water = true;
        self
    }

    pub fn static_mesh(mut self, mesh: StaticMesh) -> Self {
        self.room.static_meshes.push(mesh);
        self
    }

    pub fn build(self) -> Room {
        self.room
    }
}

/// Level geometry held in memory.
#[derive(Clone, Debug, Default)]
pub struct Level {
    rooms: Vec<Room>,
}

impl Level {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next added room will receive.
    pub fn next_room_id(&self) -> RoomId {
        RoomId(self.rooms.len())
    }

    pub fn add_room(&mut self, room: Room) -> RoomId {
        let id = self.next_room_id();
        self.rooms.push(room);
        id
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room_mut(&mut self, id: RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(id.0)
    }
}

impl LevelGeometry for Level {
    fn room(&self, id: RoomId) -> Result<&Room, LocomotionError> {
        self.rooms.get(id.0).ok_or(LocomotionError::UnknownRoom(id))
    }

    fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::deg;

    fn grid_room() -> Room {
        let mut builder = RoomBuilder::new(1024, 2048, 5, 4);
        for x in 0..5 {
            for z in 0..4 {
                builder = builder.sector(x, z, Sector::open((x * 10 + z) as i32, -1024));
            }
        }
        builder.build()
    }

    #[test]
    fn absolute_lookup_is_relative_to_the_origin() {
        let room = grid_room();
        let sector = room.sector_at_absolute(&pos(1024 + 2 * 1024 + 5, 0, 2048 + 1024 + 5));
        assert_eq!(sector.map(|s| s.floor), Some(21));
        assert!(room.sector_at_absolute(&pos(1024 + 5 * 1024, 0, 2048)).is_none());
    }

    #[test]
    fn clamped_lookup_avoids_corners_on_z_edges() {
        let room = grid_room();
        // Far past the -Z edge and the -X edge: snaps to (1, 0), not the corner.
        assert_eq!(room.sector_clamped(-10, -10).map(|s| s.floor), Some(10));
        // Past the +Z edge and +X edge: (3, 3).
        assert_eq!(room.sector_clamped(99, 99).map(|s| s.floor), Some(33));
        // Inside the Z range only X is clamped to the full width.
        assert_eq!(room.sector_clamped(99, 2).map(|s| s.floor), Some(42));
    }

    #[test]
    fn static_mesh_box_follows_mesh_axis() {
        let local = BoundingBox::new(pos(-100, -200, 10), pos(300, 0, 50));
        let mut mesh = StaticMesh::new(pos(1000, 0, 2000), Angle::ZERO, local);
        assert_eq!(mesh.world_box(), BoundingBox::new(pos(900, -200, 2010), pos(1300, 0, 2050)));

        mesh.rotation = deg(90.0);
        assert_eq!(mesh.world_box(), BoundingBox::new(pos(1010, -200, 1700), pos(1050, 0, 2100)));

        mesh.rotation = deg(180.0);
        assert_eq!(mesh.world_box(), BoundingBox::new(pos(700, -200, 1950), pos(1100, 0, 1990)));

        mesh.rotation = deg(-90.0);
        assert_eq!(mesh.world_box(), BoundingBox::new(pos(950, -200, 1900), pos(990, 0, 2300)));
    }

    #[test]
    fn unknown_rooms_are_errors() {
        let mut level = Level::new();
        let id = level.add_room(grid_room());
        assert_eq!(id, RoomId(0));
        assert!(level.room(RoomId(0)).is_ok());
        assert_eq!(level.room(RoomId(1)), Err(LocomotionError::UnknownRoom(RoomId(1))));
    }
}
