//! Spatial partitioning data structures
//!
//! Provides the broad phase of collision detection: a uniform grid that
//! narrows hundreds of scene objects down to the few near the agent.

mod grid;

pub use grid::{CellKey, CellKeyMode, SpatialGrid};
