//! Physics module
//!
//! Fixed-step integration plus the grid-based collision pass. There is no
//! general-purpose solver here; boxes never rotate and the only continuous
//! test is the swept predicate for fast movers.

pub mod collision;
mod grid;
mod integrator;

pub use collision::{
    swept_toi, HIT_SOUND, KNOCKBACK_DURATION, KNOCKBACK_SPEED_PER_MASS, MASS_DAMAGE_FACTOR,
};
pub use grid::{SpatialGrid, DEFAULT_CELL_SIZE};
pub use integrator::integrate;
