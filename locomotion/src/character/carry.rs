//! Rotation and movement a state queues during a frame.
//!
//! The queue is owned by the controller rather than by the active handler, so
//! when a handler substitutes another state mid-frame the partial deltas are
//! still applied exactly once at the end of the frame.

use crate::angle::Angle;
use crate::level::Position;

use super::state::{KinematicState, Rotation};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Carry {
    pub rotation: Rotation,
    pub movement: Position,
}

impl Carry {
    pub fn rotate_x(&mut self, delta: Angle) {
        self.rotation.x += delta;
    }

    pub fn rotate_y(&mut self, delta: Angle) {
        self.rotation.y += delta;
    }

    pub fn rotate_z(&mut self, delta: Angle) {
        self.rotation.z += delta;
    }

    pub fn move_by(&mut self, delta: Position) {
        self.movement += delta;
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Takes the queued deltas, leaving the carry empty.
    pub fn take(&mut self) -> Carry {
        std::mem::take(self)
    }

    /// Commits the queued deltas to `state` and clears them.
    pub fn apply(&mut self, state: &mut KinematicState) {
        let Carry { rotation, movement } = self.take();
        state.rotation.x += rotation.x;
        state.rotation.y += rotation.y;
        state.rotation.z += rotation.z;
        state.location.position += movement;
    }
}
