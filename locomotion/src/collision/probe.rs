/*!
The terrain probe.

Samples floor and ceiling at the character and at three points in front of
it, turns surfaces into obstacles according to the state's policy and
classifies the result.

Sampling points are the corners of an axis-aligned square around the
character, never a rotated circle: the facing angle is snapped to its
cardinal axis and only the "front" point keeps the sideways component of the
true facing. Climb and grab thresholds depend on this layout.
*/

use crate::angle::{Angle, Axis};
use crate::constants::{
    INVALID_HEIGHT, PIT_DISTANCE, SCALP_TO_HANDS_HEIGHT, SECTOR_SIZE, STEEP_SLOPE_AS_WALL_DISTANCE,
};
use crate::error::LocomotionError;
use crate::level::sector::{local_offset, sector_of};
use crate::level::{FloorKind, Interval, LevelGeometry, Location, Position, SlantClass, floor_slant_at, pos};
use crate::settings::DEFAULT_RESOLVE_ITERATIONS;

use super::info::{AxisCollision, CollisionInfo, PolicyFlags, VerticalDistances};

/// Shift along one axis that moves `target` back across the sector boundary
/// it crossed when coming from `current`; zero when both share a sector.
pub fn reflect_at_sector_boundary(target: i32, current: i32) -> i32 {
    let target_sector = sector_of(target);
    let current_sector = sector_of(current);
    if target_sector == current_sector {
        return 0;
    }

    let in_sector = local_offset(target);
    if current_sector < target_sector {
        -(in_sector + 1)
    } else {
        SECTOR_SIZE - (in_sector - 1)
    }
}

/// Horizontal offsets of the front, front-left and front-right points.
pub fn probe_offsets(axis: Axis, facing: Angle, radius: i32) -> [(i32, i32); 3] {
    match axis {
        Axis::PosZ => [(facing.sin_of(radius), radius), (-radius, radius), (radius, radius)],
        Axis::PosX => [(radius, facing.cos_of(radius)), (radius, radius), (radius, -radius)],
        Axis::NegZ => [(facing.sin_of(radius), -radius), (radius, -radius), (-radius, -radius)],
        Axis::NegX => [(-radius, facing.cos_of(radius)), (-radius, -radius), (-radius, radius)],
    }
}

impl CollisionInfo {
    /// Runs the probe for a character standing in `character` with its feet
    /// at `probe_position` (which may be offset from the real position, e.g.
    /// when swimming) and the given height.
    pub fn init_height_info(
        &mut self,
        level: &dyn LevelGeometry,
        character: &Location,
        probe_position: &Position,
        height: i32,
        max_iterations: usize,
    ) -> Result<(), LocomotionError> {
        self.collision_type = AxisCollision::None;
        self.shift = Position::zeros();
        self.has_static_mesh_collision = false;
        self.facing_axis = self.facing_angle.axis();

        let mut reference = Location::new(
            character.room,
            probe_position - pos(0, height + SCALP_TO_HANDS_HEIGHT, 0),
        );
        let current_sector = reference.update_room(level, max_iterations)?;

        self.floor_slant = floor_slant_at(
            level,
            current_sector,
            &pos(probe_position.x, character.position.y, probe_position.z),
            max_iterations,
        )?;

        let [front, front_left, front_right] =
            probe_offsets(self.facing_axis, self.facing_angle, self.collision_radius);

        let feet_y = probe_position.y;
        self.mid = VerticalDistances::sample(
            level,
            current_sector,
            &reference.position,
            feet_y,
            height,
            max_iterations,
        )?;
        self.front = self.sample_ahead(level, &reference, front, feet_y, height, max_iterations)?;
        self.front_left = self.sample_ahead(level, &reference, front_left, feet_y, height, max_iterations)?;
        self.front_right = self.sample_ahead(level, &reference, front_right, feet_y, height, max_iterations)?;

        if self.check_static_mesh_collisions(level, character.room, probe_position, height, max_iterations)? {
            return Ok(());
        }

        if self.mid.floor.dy == INVALID_HEIGHT {
            self.collision_type = AxisCollision::Front;
            self.shift = self.initial_position - probe_position;
            return Ok(());
        }

        if self.mid.floor.dy - self.mid.ceiling.dy <= 0 {
            self.collision_type = AxisCollision::Jammed;
            self.shift = self.initial_position - probe_position;
            return Ok(());
        }

        if self.mid.ceiling.dy >= 0 {
            self.collision_type = AxisCollision::Top;
            self.shift.y = self.mid.ceiling.dy;
        }

        let p = probe_position;
        if !self.valid_floor_height.contains(self.front.floor.dy)
            || self.front.ceiling.dy > self.valid_ceiling_height_min
        {
            self.collision_type = AxisCollision::Front;
            if self.facing_axis.is_z() {
                self.shift.x = self.initial_position.x - p.x;
                self.shift.z = reflect_at_sector_boundary(front.1 + p.z, p.z);
            } else {
                self.shift.x = reflect_at_sector_boundary(front.0 + p.x, p.x);
                self.shift.z = self.initial_position.z - p.z;
            }
            return Ok(());
        }

        if self.front.ceiling.dy >= self.valid_ceiling_height_min {
            self.collision_type = AxisCollision::FrontTop;
            self.shift = self.initial_position - p;
            return Ok(());
        }

        for (distances, offset, side) in [
            (self.front_left, front_left, AxisCollision::FrontLeft),
            (self.front_right, front_right, AxisCollision::FrontRight),
        ] {
            if self.valid_floor_height.contains(distances.floor.dy) {
                continue;
            }
            self.collision_type = side;
            if self.facing_axis.is_z() {
                self.shift.x = reflect_at_sector_boundary(offset.0 + p.x, front.0 + p.x);
            } else {
                self.shift.z = reflect_at_sector_boundary(offset.1 + p.z, front.1 + p.z);
            }
            break;
        }

        Ok(())
    }

    /// Samples one point ahead and applies the surface policy to its floor.
    fn sample_ahead(
        &self,
        level: &dyn LevelGeometry,
        reference: &Location,
        (dx, dz): (i32, i32),
        feet_y: i32,
        height: i32,
        max_iterations: usize,
    ) -> Result<VerticalDistances, LocomotionError> {
        let mut location = reference.moved(dx, 0, dz);
        let sector = location.update_room(level, max_iterations)?;
        let mut distances =
            VerticalDistances::sample(level, sector, &location.position, feet_y, height, max_iterations)?;

        let floor = &mut distances.floor;
        let steep = floor.slant_class == SlantClass::Steep;
        if self.slopes_are_walls() && steep && floor.dy < 0 {
            // Kept apart from INVALID_HEIGHT so a slope is never mistaken for a wall sector.
            floor.dy = STEEP_SLOPE_AS_WALL_DISTANCE;
        } else if floor.dy > 0
            && ((self.slopes_are_pits() && steep)
                || (self.lava_is_pit() && floor.floor_kind == FloorKind::Death))
        {
            floor.dy = PIT_DISTANCE;
        }
        Ok(distances)
    }
}

/// Everything the probe needs besides the level.
#[derive(Clone, Copy, Debug)]
pub struct ProbeRequest {
    pub location: Location,
    pub facing_angle: Angle,
    pub height: i32,
    pub radius: i32,
    pub valid_floor_height: Interval,
    pub valid_ceiling_height_min: i32,
    pub policy: PolicyFlags,
}

/// One-shot probe at the character's own position.
pub fn probe(level: &dyn LevelGeometry, request: &ProbeRequest) -> Result<CollisionInfo, LocomotionError> {
    let mut info = CollisionInfo::new(request.location.position, request.radius);
    info.facing_angle = request.facing_angle;
    info.valid_floor_height = request.valid_floor_height;
    info.valid_ceiling_height_min = request.valid_ceiling_height_min;
    info.policy = request.policy;
    info.init_height_info(
        level,
        &request.location,
        &request.location.position,
        request.height,
        DEFAULT_RESOLVE_ITERATIONS,
    )?;
    Ok(info)
}
