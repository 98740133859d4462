/*!
Integer math types shared by the geometry, probe and controller code.

World coordinates are integers with Y pointing down. Boxes are axis aligned
and inclusive on both ends; intersection tests are exclusive so touching
boxes do not collide.
*/

use nalgebra as na;

/// A world-space position or displacement.
pub type Position = na::Vector3<i32>;

/// Shorthand for building a [`Position`].
#[inline]
pub fn pos(x: i32, y: i32, z: i32) -> Position {
    Position::new(x, y, z)
}

/// A closed integer range `[min, max]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Interval {
    pub min: i32,
    pub max: i32,
}

impl Interval {
    #[inline]
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, value: i32) -> bool {
        self.min <= value && value <= self.max
    }
}

/// An axis-aligned box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub min: Position,
    pub max: Position,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            min: Position::zeros(),
            max: Position::zeros(),
        }
    }
}

impl BoundingBox {
    #[inline]
    pub fn new(min: Position, max: Position) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn translated(&self, by: &Position) -> Self {
        Self {
            min: self.min + by,
            max: self.max + by,
        }
    }

    /// Overlap test that ignores boxes which merely share a face.
    pub fn intersects_exclusive(&self, other: &BoundingBox) -> bool {
        (0..3).all(|axis| self.min[axis] < other.max[axis] && other.min[axis] < self.max[axis])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_boxes_do_not_intersect() {
        let a = BoundingBox::new(pos(0, 0, 0), pos(10, 10, 10));
        let b = BoundingBox::new(pos(10, 0, 0), pos(20, 10, 10));
        assert!(!a.intersects_exclusive(&b));

        let c = b.translated(&pos(-1, 0, 0));
        assert!(a.intersects_exclusive(&c));
        assert!(c.intersects_exclusive(&a));
    }

    #[test]
    fn interval_is_inclusive() {
        let range = Interval::new(-384, 384);
        assert!(range.contains(-384));
        assert!(range.contains(384));
        assert!(!range.contains(385));
    }
}
