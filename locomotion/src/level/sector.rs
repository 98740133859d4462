//! Sector cells and the grid math that maps world positions onto them.
//!
//! A room is a rectangular grid of square sectors laid out X-major:
//! `index = x * sectors_z + z`. Sector coordinates are derived relative to the
//! room origin with truncating division, the same way the level data was
//! authored.

use crate::constants::{INVALID_HEIGHT, SECTOR_SIZE};

use super::RoomId;

/// Gradient of a floor or ceiling in quarter-sector units across one sector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Slant {
    pub x: i8,
    pub z: i8,
}

impl Slant {
    pub const FLAT: Slant = Slant { x: 0, z: 0 };

    #[inline]
    pub const fn new(x: i8, z: i8) -> Self {
        Self { x, z }
    }

    #[inline]
    pub fn is_flat(&self) -> bool {
        self.x == 0 && self.z == 0
    }

    /// Walkable slopes rise at most two quarter-sectors across a sector.
    pub fn class(&self) -> SlantClass {
        if self.is_flat() {
            SlantClass::None
        } else if self.x.unsigned_abs() <= 2 && self.z.unsigned_abs() <= 2 {
            SlantClass::Max512
        } else {
            SlantClass::Steep
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SlantClass {
    #[default]
    None,
    Max512,
    Steep,
}

/// Special floor behaviour attached to a sector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FloorKind {
    #[default]
    Normal,
    /// Lava and other instantly fatal floors.
    Death,
    /// The sector carries a trigger command sequence.
    Trigger,
}

/// One grid cell of a room.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sector {
    /// Absolute floor height at the flat reference; `INVALID_HEIGHT` for walls.
    pub floor: i32,
    /// Absolute ceiling height at the flat reference.
    pub ceiling: i32,
    pub floor_slant: Slant,
    pub ceiling_slant: Slant,
    /// Horizontal link into a neighbouring room.
    pub portal: Option<RoomId>,
    /// Room stacked below this sector's floor.
    pub room_below: Option<RoomId>,
    /// Room stacked above this sector's ceiling.
    pub room_above: Option<RoomId>,
    pub floor_kind: FloorKind,
}

impl Sector {
    /// A solid wall cell.
    pub const WALL: Sector = Sector {
        floor: INVALID_HEIGHT,
        ceiling: INVALID_HEIGHT,
        floor_slant: Slant::FLAT,
        ceiling_slant: Slant::FLAT,
        portal: None,
        room_below: None,
        room_above: None,
        floor_kind: FloorKind::Normal,
    };

    /// An open cell with flat floor and ceiling.
    pub const fn open(floor: i32, ceiling: i32) -> Self {
        Sector {
            floor,
            ceiling,
            ..Sector::WALL
        }
    }

    #[inline]
    pub fn is_wall(&self) -> bool {
        self.floor == INVALID_HEIGHT
    }

    pub fn with_floor_slant(mut self, slant: Slant) -> Self {
        self.floor_slant = slant;
        self
    }

    pub fn with_ceiling_slant(mut self, slant: Slant) -> Self {
        self.ceiling_slant = slant;
        self
    }

    pub fn with_floor_kind(mut self, kind: FloorKind) -> Self {
        self.floor_kind = kind;
        self
    }

    pub fn with_portal(mut self, room: RoomId) -> Self {
        self.portal = Some(room);
        self
    }

    pub fn with_room_below(mut self, room: RoomId) -> Self {
        self.room_below = Some(room);
        self
    }

    pub fn with_room_above(mut self, room: RoomId) -> Self {
        self.room_above = Some(room);
        self
    }
}

/// Sector coordinate of `world` relative to a room origin.
#[inline]
pub fn sector_coord(world: i32, origin: i32) -> i32 {
    (world - origin) / SECTOR_SIZE
}

/// Offset of `world` inside its sector, in `[0, SECTOR_SIZE)`.
#[inline]
pub fn local_offset(world: i32) -> i32 {
    world.rem_euclid(SECTOR_SIZE)
}

/// Absolute sector index along one axis.
#[inline]
pub fn sector_of(world: i32) -> i32 {
    world.div_euclid(SECTOR_SIZE)
}

/// Linear index of sector `(x, z)` in an X-major grid.
#[inline]
pub fn sector_index(x: usize, z: usize, sectors_z: usize) -> usize {
    x * sectors_z + z
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slant_classes() {
        assert_eq!(Slant::FLAT.class(), SlantClass::None);
        assert_eq!(Slant::new(2, -2).class(), SlantClass::Max512);
        assert_eq!(Slant::new(0, 3).class(), SlantClass::Steep);
        assert_eq!(Slant::new(-3, 0).class(), SlantClass::Steep);
    }

    #[test]
    fn local_offsets_stay_in_sector() {
        assert_eq!(local_offset(1500), 476);
        assert_eq!(local_offset(-1), 1023);
        assert_eq!(sector_of(-1), -1);
        assert_eq!(sector_of(2048), 2);
    }

    #[test]
    fn grid_is_x_major() {
        assert_eq!(sector_index(0, 3, 4), 3);
        assert_eq!(sector_index(2, 1, 4), 9);
        assert_eq!(sector_coord(3000, 1024), 1);
    }

    #[test]
    fn wall_cells_are_recognized() {
        assert!(Sector::WALL.is_wall());
        assert!(!Sector::open(0, -2048).is_wall());
    }
}
