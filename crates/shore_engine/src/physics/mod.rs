//! Physics module for collision detection and response
//!
//! Bounding volumes for the narrow phase, filters deciding what may collide,
//! and the resolver that pushes the agent out of whatever it walks into.

pub mod collision;
pub mod collision_filter;
pub mod collision_system;

pub use collision::{Aabb, BoundingCylinder, BoundingVolumeSource, StaticExtent};
pub use collision_filter::{IgnoreSet, IgnoreSetBuilder};
pub use collision_system::{CollisionOutcome, CollisionReport, CollisionResolver};
