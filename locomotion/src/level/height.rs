//! Floor and ceiling height sampling with slant interpolation.
//!
//! Heights follow stacked-room links first: a floor with a room below is an
//! opening, so the real floor is found in the lowest linked room; ceilings
//! mirror this upward. Every link walk is capped like room resolution, so a
//! cyclic stack reports `ResolveLimitExceeded` instead of spinning.

use log::error;

use crate::constants::{INVALID_HEIGHT, QUARTER_SECTOR_SIZE, SECTOR_SIZE};
use crate::error::LocomotionError;

use super::sector::{FloorKind, Sector, Slant, SlantClass, local_offset};
use super::types::Position;
use super::{LevelGeometry, Location, RoomId};

/// An absolute surface height at a point plus its surface class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeightInfo {
    pub y: i32,
    pub slant_class: SlantClass,
    pub floor_kind: FloorKind,
}

impl HeightInfo {
    /// Floor height under `position`, starting at `sector`.
    pub fn from_floor(
        level: &dyn LevelGeometry,
        sector: &Sector,
        position: &Position,
        max_iterations: usize,
    ) -> Result<Self, LocomotionError> {
        let sector = lowest_sector(level, sector, position, max_iterations)?;
        let mut info = HeightInfo {
            y: sector.floor,
            slant_class: SlantClass::None,
            floor_kind: sector.floor_kind,
        };
        if sector.is_wall() || sector.floor_slant.is_flat() {
            return Ok(info);
        }

        let slant = sector.floor_slant;
        info.slant_class = slant.class();
        let local_x = local_offset(position.x);
        let local_z = local_offset(position.z);
        let (x, z) = (slant.x as i32, slant.z as i32);

        // A positive slant has its lower edge at the negative side.
        if z > 0 {
            info.y += (SECTOR_SIZE - local_z) * z * QUARTER_SECTOR_SIZE / SECTOR_SIZE;
        } else if z < 0 {
            info.y -= local_z * z * QUARTER_SECTOR_SIZE / SECTOR_SIZE;
        }
        if x > 0 {
            info.y += (SECTOR_SIZE - local_x) * x * QUARTER_SECTOR_SIZE / SECTOR_SIZE;
        } else if x < 0 {
            info.y -= local_x * x * QUARTER_SECTOR_SIZE / SECTOR_SIZE;
        }
        Ok(info)
    }

    /// Ceiling height above `position`, starting at `sector`.
    pub fn from_ceiling(
        level: &dyn LevelGeometry,
        sector: &Sector,
        position: &Position,
        max_iterations: usize,
    ) -> Result<Self, LocomotionError> {
        let mut links = LinkBudget::new(max_iterations);
        let mut sector = sector;
        while let Some(above) = sector.room_above {
            sector = sector_in(level, links.follow(above)?, position)?;
        }

        let mut info = HeightInfo {
            y: sector.ceiling,
            slant_class: SlantClass::None,
            floor_kind: FloorKind::Normal,
        };
        let slant = sector.ceiling_slant;
        if slant.is_flat() {
            return Ok(info);
        }

        let local_x = local_offset(position.x);
        let local_z = local_offset(position.z);
        let (x, z) = (slant.x as i32, slant.z as i32);
        if z > 0 {
            info.y -= (SECTOR_SIZE - local_z) * z * QUARTER_SECTOR_SIZE / SECTOR_SIZE;
        } else if z < 0 {
            info.y += local_z * z * QUARTER_SECTOR_SIZE / SECTOR_SIZE;
        }
        if x > 0 {
            info.y -= local_x * x * QUARTER_SECTOR_SIZE / SECTOR_SIZE;
        } else if x < 0 {
            info.y += (SECTOR_SIZE - local_x) * x * QUARTER_SECTOR_SIZE / SECTOR_SIZE;
        }
        Ok(info)
    }

    #[inline]
    pub fn is_wall(&self) -> bool {
        self.y == INVALID_HEIGHT
    }
}

/// Sector of `room` containing `position`, as an error if it is off the grid.
pub fn sector_in<'a>(
    level: &'a dyn LevelGeometry,
    room: RoomId,
    position: &Position,
) -> Result<&'a Sector, LocomotionError> {
    level.sector_at(room, position)
}

/// Counts stacked-room links followed by one query.
struct LinkBudget {
    first: Option<RoomId>,
    followed: usize,
    max_iterations: usize,
}

impl LinkBudget {
    fn new(max_iterations: usize) -> Self {
        Self {
            first: None,
            followed: 0,
            max_iterations,
        }
    }

    fn follow(&mut self, room: RoomId) -> Result<RoomId, LocomotionError> {
        let first = *self.first.get_or_insert(room);
        self.followed += 1;
        if self.followed > self.max_iterations {
            error!(
                "stacked-room walk through room {} exceeded {} links",
                first.0, self.max_iterations
            );
            return Err(LocomotionError::ResolveLimitExceeded {
                room: first,
                iterations: self.max_iterations,
            });
        }
        Ok(room)
    }
}

/// Follows room-below links from `sector` to the sector holding the real floor.
pub fn lowest_sector<'a>(
    level: &'a dyn LevelGeometry,
    sector: &'a Sector,
    position: &Position,
    max_iterations: usize,
) -> Result<&'a Sector, LocomotionError> {
    let mut links = LinkBudget::new(max_iterations);
    let mut sector = sector;
    while let Some(below) = sector.room_below {
        sector = sector_in(level, links.follow(below)?, position)?;
    }
    Ok(sector)
}

/// Floor slant under `position` for slide decisions.
///
/// Returns a flat slant while `position` is more than two quarter-sectors
/// above the floor.
pub fn floor_slant_at(
    level: &dyn LevelGeometry,
    sector: &Sector,
    position: &Position,
    max_iterations: usize,
) -> Result<Slant, LocomotionError> {
    let sector = lowest_sector(level, sector, position, max_iterations)?;
    if position.y + 2 * QUARTER_SECTOR_SIZE < sector.floor {
        return Ok(Slant::FLAT);
    }
    Ok(sector.floor_slant)
}

/// Height of the water surface relevant to `location`.
///
/// Inside water this is the ceiling of the top-most connected water room.
/// Outside water it is the floor of the dry sector directly above the first
/// water room below, or `None` when there is no water underneath.
pub fn water_surface_height(
    level: &dyn LevelGeometry,
    location: &Location,
    max_iterations: usize,
) -> Result<Option<i32>, LocomotionError> {
    let position = &location.position;
    let mut links = LinkBudget::new(max_iterations);
    let mut sector = sector_in(level, location.room, position)?;

    if level.room(location.room)?.is_water {
        while let Some(above) = sector.room_above {
            if !level.room(above)?.is_water {
                return Ok(Some(sector.ceiling));
            }
            sector = sector_in(level, links.follow(above)?, position)?;
        }
        return Ok(Some(sector.ceiling));
    }

    while let Some(below) = sector.room_below {
        if level.room(below)?.is_water {
            return Ok(Some(sector.floor));
        }
        sector = sector_in(level, links.follow(below)?, position)?;
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::types::pos;
    use crate::level::{Level, RoomBuilder};

    fn sloped(slant: Slant) -> (Level, RoomId) {
        let mut level = Level::new();
        let room = RoomBuilder::new(0, 0, 3, 3)
            .fill(Sector::open(0, -2048).with_floor_slant(slant).with_ceiling_slant(slant))
            .build();
        let id = level.add_room(room);
        (level, id)
    }

    fn floor_at(level: &Level, room: RoomId, x: i32, z: i32) -> HeightInfo {
        let p = pos(x, -100, z);
        let sector = sector_in(level, room, &p).unwrap();
        HeightInfo::from_floor(level, sector, &p, 64).unwrap()
    }

    #[test]
    fn positive_z_slant_drops_toward_negative_z() {
        let (level, room) = sloped(Slant::new(0, 2));
        // Two quarter-sectors lower at the -Z edge of the sector, flat reference at +Z.
        assert_eq!(floor_at(&level, room, 1536, 1024).y, 512);
        assert_eq!(floor_at(&level, room, 1536, 1536).y, 256);
        assert_eq!(floor_at(&level, room, 1536, 1536).slant_class, SlantClass::Max512);
    }

    #[test]
    fn negative_x_slant_drops_toward_positive_x() {
        let (level, room) = sloped(Slant::new(-4, 0));
        let info = floor_at(&level, room, 1024 + 512, 1536);
        assert_eq!(info.y, 512);
        assert_eq!(info.slant_class, SlantClass::Steep);
    }

    #[test]
    fn ceiling_slant_mirrors_floor_signs() {
        let (level, room) = sloped(Slant::new(0, 2));
        let p = pos(1536, -100, 1536);
        let sector = sector_in(&level, room, &p).unwrap();
        let ceiling = HeightInfo::from_ceiling(&level, sector, &p, 64).unwrap();
        assert_eq!(ceiling.y, -2048 - 256);
    }

    #[test]
    fn floor_follows_rooms_below() {
        let mut level = Level::new();
        let lower_id = level.next_room_id();
        let upper_id = RoomId(lower_id.0 + 1);
        level.add_room(RoomBuilder::new(0, 0, 3, 3).fill(Sector::open(2048, 0).with_room_above(upper_id)).build());
        level.add_room(RoomBuilder::new(0, 0, 3, 3).fill(Sector::open(0, -2048).with_room_below(lower_id)).build());

        let p = pos(1536, -500, 1536);
        let sector = sector_in(&level, upper_id, &p).unwrap();
        assert_eq!(HeightInfo::from_floor(&level, sector, &p, 64).unwrap().y, 2048);

        let sector = sector_in(&level, lower_id, &p).unwrap();
        assert_eq!(HeightInfo::from_ceiling(&level, sector, &p, 64).unwrap().y, -2048);
    }

    #[test]
    fn slant_is_ignored_high_above_the_floor() {
        let (level, room) = sloped(Slant::new(3, 0));
        let sector = sector_in(&level, room, &pos(1536, 0, 1536)).unwrap();
        assert_eq!(floor_slant_at(&level, sector, &pos(1536, -600, 1536), 64).unwrap(), Slant::FLAT);
        assert_eq!(
            floor_slant_at(&level, sector, &pos(1536, -100, 1536), 64).unwrap(),
            Slant::new(3, 0)
        );
    }

    #[test]
    fn water_surface_from_inside_and_above() {
        let mut level = Level::new();
        let water = level.next_room_id();
        let dry = RoomId(water.0 + 1);
        level.add_room(
            RoomBuilder::new(0, 0, 3, 3)
                .fill(Sector::open(2048, 0).with_room_above(dry))
                .water()
                .build(),
        );
        level.add_room(RoomBuilder::new(0, 0, 3, 3).fill(Sector::open(0, -2048).with_room_below(water)).build());

        let inside = Location::new(water, pos(1536, 1000, 1536));
        assert_eq!(water_surface_height(&level, &inside, 64).unwrap(), Some(0));

        let above = Location::new(dry, pos(1536, -500, 1536));
        assert_eq!(water_surface_height(&level, &above, 64).unwrap(), Some(0));

        let (dry_level, dry_room) = sloped(Slant::FLAT);
        let nowhere = Location::new(dry_room, pos(1536, -500, 1536));
        assert_eq!(water_surface_height(&dry_level, &nowhere, 64).unwrap(), None);
    }

    /// Two rooms whose floors open into each other.
    fn below_cycle() -> Level {
        let mut level = Level::new();
        level.add_room(
            RoomBuilder::new(0, 0, 4, 4)
                .fill(Sector::open(0, -2048).with_room_below(RoomId(1)))
                .build(),
        );
        level.add_room(
            RoomBuilder::new(0, 0, 4, 4)
                .fill(Sector::open(0, -2048).with_room_below(RoomId(0)))
                .build(),
        );
        level
    }

    fn limit_exceeded(room: RoomId, iterations: usize) -> LocomotionError {
        LocomotionError::ResolveLimitExceeded { room, iterations }
    }

    #[test]
    fn floor_link_cycles_hit_the_iteration_cap() {
        let level = below_cycle();
        let p = pos(1500, -10, 1500);
        let sector = sector_in(&level, RoomId(0), &p).unwrap();
        assert_eq!(HeightInfo::from_floor(&level, sector, &p, 8), Err(limit_exceeded(RoomId(1), 8)));
        assert_eq!(floor_slant_at(&level, sector, &p, 8), Err(limit_exceeded(RoomId(1), 8)));
    }

    #[test]
    fn ceiling_link_cycles_hit_the_iteration_cap() {
        let mut level = Level::new();
        for above in [RoomId(1), RoomId(0)] {
            level.add_room(
                RoomBuilder::new(0, 0, 4, 4)
                    .fill(Sector::open(0, -2048).with_room_above(above))
                    .build(),
            );
        }

        let p = pos(1500, -10, 1500);
        let sector = sector_in(&level, RoomId(0), &p).unwrap();
        assert_eq!(HeightInfo::from_ceiling(&level, sector, &p, 8), Err(limit_exceeded(RoomId(1), 8)));

        let mut water = level;
        for id in [RoomId(0), RoomId(1)] {
            water.room_mut(id).unwrap().is_water = true;
        }
        let inside = Location::new(RoomId(0), p);
        assert_eq!(water_surface_height(&water, &inside, 8), Err(limit_exceeded(RoomId(1), 8)));
    }

    #[test]
    fn dry_link_cycles_hit_the_iteration_cap() {
        let inside = Location::new(RoomId(0), pos(1500, -10, 1500));
        assert_eq!(water_surface_height(&below_cycle(), &inside, 8), Err(limit_exceeded(RoomId(1), 8)));
    }

    #[test]
    fn deep_stacks_within_the_cap_still_resolve() {
        let mut level = Level::new();
        for id in 0..4 {
            let sector = if id < 3 {
                Sector::open(0, -2048).with_room_below(RoomId(id + 1))
            } else {
                Sector::open(4096, -2048)
            };
            level.add_room(RoomBuilder::new(0, 0, 4, 4).fill(sector).build());
        }
        let p = pos(1500, -10, 1500);
        let sector = sector_in(&level, RoomId(0), &p).unwrap();
        assert_eq!(HeightInfo::from_floor(&level, sector, &p, 3).unwrap().y, 4096);
        assert_eq!(HeightInfo::from_floor(&level, sector, &p, 2), Err(limit_exceeded(RoomId(1), 2)));
    }
}
