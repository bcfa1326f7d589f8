//! Per-frame simulation step
//!
//! The engine owns the level scene, the collision resolver and the two rigs
//! (first-person and a third-person rig kept in lockstep). Each frame runs
//! collision resolution first and rig movement second; the resolver must see
//! the positions the previous frame's movement produced.

use thiserror::Error;

use crate::{
    core::config::{ApplicationConfig, ConfigError},
    foundation::math::{utils, Vec3},
    physics::{CollisionOutcome, CollisionResolver, IgnoreSet},
    rig::{InputState, MovementRig, Rig, VerticalState},
    scene::{CameraProxy, ObjectId, Scene, SceneError},
};

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Frame delta was negative or not a number
    #[error("Invalid frame delta: {0}")]
    InvalidDelta(f32),

    /// An object handle did not resolve
    #[error("Unknown object: {0}")]
    UnknownObject(#[from] SceneError),

    /// Configuration failed to load or validate
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// What happened during one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Frame counter, starting at 1
    pub frame: u64,
    /// Collision outcome from this frame's check
    pub outcome: CollisionOutcome,
    /// Object the agent hit, if any
    pub hit: Option<ObjectId>,
    /// Primary rig position after movement
    pub rig_position: Vec3,
    /// Primary rig vertical status after movement
    pub vertical_state: VerticalState,
}

/// Collision and movement driver for one level
pub struct CourseEngine {
    config: ApplicationConfig,
    scene: Scene,
    resolver: CollisionResolver,
    primary: MovementRig,
    secondary: MovementRig,
    frame: u64,
}

impl CourseEngine {
    /// Create an engine for `scene`; `ignore` lists objects the grid never sees
    pub fn new(config: ApplicationConfig, scene: Scene, ignore: IgnoreSet) -> Result<Self, EngineError> {
        config.validate().map_err(ConfigError::Invalid)?;

        log::info!(
            "Initializing course engine: {} objects, {} ignored, cell size {}",
            scene.len(),
            ignore.len(),
            config.grid.cell_size
        );

        let mut resolver = CollisionResolver::new(&config.grid, config.resolver.clone(), ignore);
        resolver.rebuild(&scene);

        Ok(Self {
            primary: MovementRig::new(config.rig.clone()),
            secondary: MovementRig::new(config.rig.clone()),
            config,
            scene,
            resolver,
            frame: 0,
        })
    }

    /// Never report contact with `id`
    pub fn exclude(&mut self, id: ObjectId) -> Result<(), EngineError> {
        if !self.scene.contains(id) {
            return Err(SceneError::UnknownObject(id).into());
        }
        self.resolver.exclude(id);
        Ok(())
    }

    /// Move both rigs to `position`
    pub fn place_rigs(&mut self, position: Vec3) {
        self.primary.set_position(position);
        self.secondary.set_position(position);
    }

    /// Run one frame: collision check, then rig movement
    pub fn step(&mut self, input: &InputState, delta_time: f32) -> Result<FrameReport, EngineError> {
        if !delta_time.is_finite() || delta_time < 0.0 {
            return Err(EngineError::InvalidDelta(delta_time));
        }

        let agent = self.camera();
        let report = self.resolver.check_collisions(
            &self.scene,
            &agent,
            &mut [&mut self.primary, &mut self.secondary],
            delta_time,
        );

        for rig in [&mut self.primary, &mut self.secondary] {
            if let CollisionOutcome::Blocked(_) = report.outcome {
                rig.restrict_movement(input.actions);
            } else {
                rig.allow_movement();
            }
        }

        let supported = report.outcome.is_grounded();
        self.primary.update(input, delta_time, supported);
        self.secondary.update(input, delta_time, supported);

        self.frame += 1;
        Ok(FrameReport {
            frame: self.frame,
            outcome: report.outcome,
            hit: report.hit,
            rig_position: self.primary.global_position(),
            vertical_state: self.primary.vertical_state(),
        })
    }

    /// Collision proxy for the camera riding on the primary rig
    pub fn camera(&self) -> CameraProxy {
        let offset = utils::yaw_rotation(self.primary.yaw()) * self.config.engine.camera_offset;
        CameraProxy::new(
            self.primary.global_position() + offset,
            self.config.engine.camera_radius,
        )
    }

    /// Frames stepped so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Active configuration
    pub fn config(&self) -> &ApplicationConfig {
        &self.config
    }

    /// Level scene
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable level scene; changes are picked up at the next grid rebuild
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Collision resolver
    pub fn resolver(&self) -> &CollisionResolver {
        &self.resolver
    }

    /// First-person rig
    pub fn primary(&self) -> &MovementRig {
        &self.primary
    }

    /// Third-person rig
    pub fn secondary(&self) -> &MovementRig {
        &self.secondary
    }
}
