/*!
Controller tunables.

The legacy thresholds that define the feel of each state live in
`constants`. The values here are the few a host may want to override per
level or per character, such as collision radii, the room-resolution safety
cap and the air supply.

Notes
- Distances are in world units (1024 per sector), time in frames.
- `Default` reproduces the classic game tuning.
*/

use crate::constants::{
    DEFAULT_COLLISION_RADIUS, DEFAULT_COLLISION_RADIUS_UNDERWATER, DROWN_DAMAGE, LARA_AIR,
};

/// Maximum number of portal/stack links followed while resolving a room.
/// A well-formed level settles in a handful of steps.
pub const DEFAULT_RESOLVE_ITERATIONS: usize = 64;

/// Frames jump must be held on the water surface before the character dives.
pub const DEFAULT_SWIM_TO_DIVE_FRAMES: i32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControllerSettings {
    /// Probe radius on land and on the water surface.
    pub collision_radius: i32,
    /// Probe radius while diving.
    pub collision_radius_underwater: i32,
    /// Cap on links followed by the room resolver before it reports an error.
    pub max_resolve_iterations: usize,
    /// Frames jump must be held on the surface to dive. Surfacing sets the
    /// counter one past this so a held key does not dive again at once.
    pub swim_to_dive_frames: i32,
    /// Air supply of a full breath, in frames.
    pub max_air: i32,
    /// Health lost per frame once the air has run out.
    pub drown_damage: i32,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            collision_radius: DEFAULT_COLLISION_RADIUS,
            collision_radius_underwater: DEFAULT_COLLISION_RADIUS_UNDERWATER,
            max_resolve_iterations: DEFAULT_RESOLVE_ITERATIONS,
            swim_to_dive_frames: DEFAULT_SWIM_TO_DIVE_FRAMES,
            max_air: LARA_AIR,
            drown_damage: DROWN_DAMAGE,
        }
    }
}
