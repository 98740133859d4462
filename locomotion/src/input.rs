//! Logical movement intents for one frame.
//!
//! Device handling lives with the host; the locomotion states only see the
//! resolved axes and buttons.

/// Direction held on one movement axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AxisMovement {
    #[default]
    Null,
    Forward,
    Backward,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    /// Turning: `Left`, `Right` or `Null`.
    pub x_movement: AxisMovement,
    /// Walking/running: `Forward`, `Backward` or `Null`.
    pub z_movement: AxisMovement,
    /// Side steps: `Left`, `Right` or `Null`.
    pub step_movement: AxisMovement,
    pub jump: bool,
    /// Grab, climb, use.
    pub action: bool,
    /// Walk modifier.
    pub move_slow: bool,
    pub roll: bool,
    pub free_look: bool,
}

impl InputState {
    pub fn forward() -> Self {
        Self {
            z_movement: AxisMovement::Forward,
            ..Self::default()
        }
    }

    pub fn backward() -> Self {
        Self {
            z_movement: AxisMovement::Backward,
            ..Self::default()
        }
    }

    #[inline]
    pub fn moving_forward(&self) -> bool {
        self.z_movement == AxisMovement::Forward
    }

    #[inline]
    pub fn moving_backward(&self) -> bool {
        self.z_movement == AxisMovement::Backward
    }

    #[inline]
    pub fn turning_left(&self) -> bool {
        self.x_movement == AxisMovement::Left
    }

    #[inline]
    pub fn turning_right(&self) -> bool {
        self.x_movement == AxisMovement::Right
    }

    #[inline]
    pub fn stepping_left(&self) -> bool {
        self.step_movement == AxisMovement::Left
    }

    #[inline]
    pub fn stepping_right(&self) -> bool {
        self.step_movement == AxisMovement::Right
    }

    pub fn with_action(mut self) -> Self {
        self.action = true;
        self
    }

    pub fn with_jump(mut self) -> Self {
        self.jump = true;
        self
    }

    pub fn with_move_slow(mut self) -> Self {
        self.move_slow = true;
        self
    }

    pub fn with_turn(mut self, direction: AxisMovement) -> Self {
        self.x_movement = direction;
        self
    }

    pub fn with_step(mut self, direction: AxisMovement) -> Self {
        self.step_movement = direction;
        self
    }
}
