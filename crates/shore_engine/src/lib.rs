//! # Shore Engine
//!
//! Collision core for a first-person beach obstacle course.
//!
//! ## Features
//!
//! - **Spatial Grid**: uniform hash culling hundreds of props to a few candidates
//! - **Cylinder Collision**: coarse upright-cylinder test with degenerate-input guards
//! - **Push-Out Resolution**: direction heuristic favoring landings and step-ups
//! - **Movement Rig**: walking, sprinting, jumping and gravity driven by the resolver
//! - **Configuration**: TOML/RON config files for every gameplay constant
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shore_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut scene = Scene::new();
//!     scene.add(SceneObject::new(
//!         "lifeguard_tower",
//!         Vec3::new(0.0, 0.0, -6.0),
//!         BoundingVolumeSource::fixed(6.0, 1.5),
//!     ));
//!
//!     let mut engine = CourseEngine::new(ApplicationConfig::default(), scene, IgnoreSet::default())?;
//!     let report = engine.step(&InputState::new(InputActions::FORWARD), 1.0 / 60.0)?;
//!     println!("{:?}", report.outcome);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::cast_possible_truncation)]

// Core engine modules
pub mod core;

pub mod foundation;
pub mod config;
pub mod scene;
pub mod spatial;
pub mod physics;
pub mod rig;

mod engine;

pub use engine::{CourseEngine, EngineError, FrameReport};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        CourseEngine, EngineError, FrameReport,
        foundation::math::Vec3,
        scene::{CameraProxy, Collidable, ObjectId, Scene, SceneObject},
        spatial::{CellKeyMode, SpatialGrid},
        physics::{
            BoundingCylinder, BoundingVolumeSource, CollisionOutcome, CollisionReport,
            CollisionResolver, IgnoreSet,
        },
        rig::{InputActions, InputState, MovementRig, Rig, VerticalState},
        core::config::{ApplicationConfig, Config, ConfigError, GridConfig, ResolverConfig, RigConfig},
    };
}
