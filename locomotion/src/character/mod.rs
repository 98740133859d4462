/*!
The player character: kinematic state, the per-state handlers and the frame
controller that drives them.

- state:      state ids, animation ids and the `KinematicState` record
- carry:      rotation and movement queued during a frame
- animation:  the `AnimationDriver` seam and the built-in `GoalFollower`
- handlers:   input and postprocess functions for every state
- controller: `LaraController`, one call per simulation frame
*/

pub mod animation;
pub mod carry;
pub mod controller;
pub mod handlers;
pub mod state;

pub use animation::{AnimCommand, AnimationDriver, FrameAdvance, GoalFollower};
pub use carry::Carry;
pub use controller::LaraController;
pub use handlers::{Context, HandlerFn, StateHandler, handler_for};
pub use state::{
    AnimationId, AnimationRequest, HandStatus, KinematicState, LaraStateId, Rotation, UnderwaterState,
};
