/*!
Terrain collision for the locomotion states.

- info:    `CollisionInfo`, policy flags and the axis classification
- probe:   floor/ceiling sampling around the character and classification
- scenery: static mesh boxes
*/

pub mod info;
pub mod probe;
pub mod scenery;

pub use info::{AxisCollision, CollisionInfo, PolicyFlag, PolicyFlags, SurfaceDistance, VerticalDistances};
pub use probe::{ProbeRequest, probe, probe_offsets, reflect_at_sector_boundary};
