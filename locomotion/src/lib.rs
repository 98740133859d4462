pub mod angle;
pub mod bitmask_flags;
pub mod character;
pub mod collision;
pub mod constants;
pub mod error;
pub mod input;
pub mod level;
pub mod settings;

pub use angle::{Angle, Axis, align_rotation, deg};
pub use character::{AnimationDriver, GoalFollower, KinematicState, LaraController, LaraStateId};
pub use collision::{AxisCollision, CollisionInfo, PolicyFlag};
pub use error::LocomotionError;
pub use input::{AxisMovement, InputState};
pub use level::{Level, LevelGeometry, Location, Position, RoomBuilder, RoomId, Sector, pos};
pub use settings::ControllerSettings;
