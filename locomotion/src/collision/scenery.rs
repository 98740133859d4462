//! Static scenery collision.
//!
//! Scenery boxes are tested against an axis-aligned box around the character
//! in every room the character's inflated bounds reach into. The first
//! overlapping mesh decides the result; walk-through meshes are ignored.

use std::collections::BTreeSet;

use crate::angle::Axis;
use crate::error::LocomotionError;
use crate::level::{BoundingBox, LevelGeometry, Location, Position, RoomId, pos};

use super::info::{AxisCollision, CollisionInfo};

/// Margin added to radius and height when gathering nearby rooms.
const ROOM_GATHER_MARGIN: i32 = 50;

/// Smaller of the two penetration depths, signed toward the free side.
#[inline]
fn min_shift(into_min: i32, into_max: i32) -> i32 {
    if into_min < into_max { -into_min } else { into_max }
}

/// Rooms touched by the eight corners of a box around `position`.
pub fn collect_touching_rooms(
    level: &dyn LevelGeometry,
    room: RoomId,
    position: &Position,
    radius: i32,
    height: i32,
    max_iterations: usize,
) -> Result<BTreeSet<RoomId>, LocomotionError> {
    let mut rooms = BTreeSet::from([room]);
    for dy in [0, -height] {
        for (dx, dz) in [(radius, radius), (-radius, radius), (radius, -radius), (-radius, -radius)] {
            let mut corner = Location::new(room, position + pos(dx, dy, dz));
            corner.update_room(level, max_iterations)?;
            rooms.insert(corner.room);
        }
    }
    Ok(rooms)
}

impl CollisionInfo {
    /// Tests scenery around a character whose feet are at `position`.
    ///
    /// On a hit the collision type and shift are set, the scenery flag is
    /// raised and `true` is returned.
    pub fn check_static_mesh_collisions(
        &mut self,
        level: &dyn LevelGeometry,
        room: RoomId,
        position: &Position,
        height: i32,
        max_iterations: usize,
    ) -> Result<bool, LocomotionError> {
        self.has_static_mesh_collision = false;

        let rooms = collect_touching_rooms(
            level,
            room,
            position,
            self.collision_radius + ROOM_GATHER_MARGIN,
            height + ROOM_GATHER_MARGIN,
            max_iterations,
        )?;

        let r = self.collision_radius;
        let object_box = BoundingBox::new(
            pos(position.x - r, position.y - height, position.z - r),
            pos(position.x + r, position.y, position.z + r),
        );

        for id in rooms {
            for mesh in level.static_meshes(id)? {
                if mesh.do_not_collide {
                    continue;
                }
                let mesh_box = mesh.world_box();
                if !mesh_box.intersects_exclusive(&object_box) {
                    continue;
                }

                self.shift.x = min_shift(
                    object_box.max.x - mesh_box.min.x,
                    mesh_box.max.x - object_box.min.x,
                );
                self.shift.z = min_shift(
                    object_box.max.z - mesh_box.min.z,
                    mesh_box.max.z - object_box.min.z,
                );
                self.classify_scenery_hit(position);
                self.has_static_mesh_collision = true;
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// A deep overlap across the facing axis is a head-on hit; a shallow one
    /// grazes the side it came from.
    fn classify_scenery_hit(&mut self, position: &Position) {
        let r = self.collision_radius;
        match self.facing_axis {
            Axis::PosZ | Axis::NegZ => {
                if self.shift.x.abs() > r {
                    self.shift.x = self.initial_position.x - position.x;
                    self.collision_type = AxisCollision::Front;
                } else {
                    self.shift.z = 0;
                    let pushes_positive = self.shift.x > 0;
                    self.collision_type = match (self.facing_axis, pushes_positive) {
                        (Axis::PosZ, true) | (Axis::NegZ, false) => AxisCollision::FrontLeft,
                        _ => AxisCollision::FrontRight,
                    };
                }
            }
            Axis::PosX | Axis::NegX => {
                if self.shift.z.abs() > r {
                    self.shift.z = self.initial_position.z - position.z;
                    self.collision_type = AxisCollision::Front;
                } else {
                    self.shift.x = 0;
                    let pushes_positive = self.shift.z > 0;
                    self.collision_type = match (self.facing_axis, pushes_positive) {
                        (Axis::PosX, true) | (Axis::NegX, false) => AxisCollision::FrontRight,
                        _ => AxisCollision::FrontLeft,
                    };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::{Angle, deg};
    use crate::collision::probe::{ProbeRequest, probe};
    use crate::collision::PolicyFlags;
    use crate::constants::SCALP_HEIGHT;
    use crate::level::{Interval, Level, RoomBuilder, Sector, StaticMesh};

    fn level_with_mesh(mesh: StaticMesh) -> (Level, RoomId) {
        let mut level = Level::new();
        let id = level.add_room(
            RoomBuilder::new(0, 0, 6, 6)
                .fill(Sector::open(0, -2048))
                .border_walls()
                .static_mesh(mesh)
                .build(),
        );
        (level, id)
    }

    fn request(room: RoomId, position: Position, facing: Angle) -> ProbeRequest {
        ProbeRequest {
            location: Location::new(room, position),
            facing_angle: facing,
            height: SCALP_HEIGHT,
            radius: 100,
            valid_floor_height: Interval::new(-384, 384),
            valid_ceiling_height_min: 0,
            policy: PolicyFlags::default(),
        }
    }

    /// A 200x200 pillar centred on (2560, 2560).
    fn pillar() -> StaticMesh {
        StaticMesh::new(
            pos(2560, 0, 2560),
            Angle::ZERO,
            BoundingBox::new(pos(-100, -1000, -100), pos(100, 0, 100)),
        )
    }

    #[test]
    fn head_on_scenery_is_front() {
        let (level, room) = level_with_mesh(pillar());
        let info = probe(&level, &request(room, pos(2560, 0, 2560 - 150), Angle::ZERO)).unwrap();
        assert!(info.is_scenery_blocked());
        assert_eq!(info.collision_type, AxisCollision::Front);
        // x overlap is the full width, so x falls back to the old position.
        assert_eq!(info.shift.x, 0);
        // z is pushed out of the pillar's near face.
        assert_eq!(info.shift.z, -50);
    }

    #[test]
    fn grazing_scenery_picks_a_side() {
        let (level, room) = level_with_mesh(pillar());
        // Pillar is to the right (+X) of a character facing +Z.
        let info = probe(&level, &request(room, pos(2560 - 180, 0, 2560), Angle::ZERO)).unwrap();
        assert!(info.is_scenery_blocked());
        assert_eq!(info.shift.x, -20);
        assert_eq!(info.shift.z, 0);
        assert_eq!(info.collision_type, AxisCollision::FrontRight);

        // Same geometry while facing -Z: the pillar is now on the left.
        let info = probe(&level, &request(room, pos(2560 - 180, 0, 2560), deg(180.0))).unwrap();
        assert_eq!(info.collision_type, AxisCollision::FrontLeft);
    }

    #[test]
    fn walk_through_meshes_are_ignored() {
        let mut mesh = pillar();
        mesh.do_not_collide = true;
        let (level, room) = level_with_mesh(mesh);
        let info = probe(&level, &request(room, pos(2560, 0, 2560 - 150), Angle::ZERO)).unwrap();
        assert!(!info.is_scenery_blocked());
        assert_eq!(info.collision_type, AxisCollision::None);
    }

    #[test]
    fn touching_rooms_include_neighbours_across_portals() {
        let mut level = Level::new();
        level.add_room(
            RoomBuilder::new(0, 0, 4, 4)
                .fill(Sector::open(0, -2048))
                .border_walls()
                .edit_area(3..=3, 1..=2, |_| Sector::WALL.with_portal(RoomId(1)))
                .build(),
        );
        level.add_room(
            RoomBuilder::new(2048, 0, 4, 4)
                .fill(Sector::open(0, -2048))
                .border_walls()
                .edit_area(0..=0, 1..=2, |_| Sector::WALL.with_portal(RoomId(0)))
                .build(),
        );
        let near_portal = pos(3072 - 60, 0, 1500);
        let rooms = collect_touching_rooms(&level, RoomId(0), &near_portal, 150, 800, 64).unwrap();
        assert_eq!(rooms.into_iter().collect::<Vec<_>>(), vec![RoomId(0), RoomId(1)]);
    }
}
