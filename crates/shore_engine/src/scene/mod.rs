//! Scene model consumed by the collision core
//!
//! The core only needs two things from a scene object: where it is in world
//! space and how big its collision cylinder is. [`Scene`] stores objects with
//! a translation-only hierarchy; [`Collidable`] is the seam the resolver
//! reads through, implemented both by placed scene objects and by the
//! free-floating camera agent.

mod object;
mod scene_graph;

pub use object::{CameraProxy, Collidable, ObjectId, PlacedObject, SceneObject};
pub use scene_graph::{Scene, SceneError};
