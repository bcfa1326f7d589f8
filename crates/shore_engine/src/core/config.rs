//! # Unified Configuration System
//!
//! All tunables of the collision core, the movement rig and the frame loop
//! live here. Every struct has defaults matching the shipped gameplay feel,
//! builder-style `with_*` setters and a `validate` check.
//!
//! ## Configuration Categories
//!
//! - **Grid Config**: spatial hash cell size and key rounding
//! - **Resolver Config**: push-out heuristic constants
//! - **Rig Config**: movement, jump and gravity rates
//! - **Engine Config**: logging, frame timestep, camera eye offset

use serde::{Serialize, Deserialize};

use crate::foundation::math::Vec3;
use crate::spatial::CellKeyMode;

pub use crate::config::{Config, ConfigError};

/// # Grid Configuration
///
/// Uniform cell size of the spatial hash and how world coordinates are
/// rounded to integer cell keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Edge length of every cell in world units
    pub cell_size: f32,
    /// Rounding applied when dividing a coordinate by the cell size
    pub key_mode: CellKeyMode,
}

impl GridConfig {
    /// Create a grid configuration with the given cell size
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            key_mode: CellKeyMode::Floor,
        }
    }

    /// Set the key rounding mode
    pub fn with_key_mode(mut self, key_mode: CellKeyMode) -> Self {
        self.key_mode = key_mode;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(format!("Cell size must be positive and finite, got {}", self.cell_size));
        }
        Ok(())
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new(5.0)
    }
}

/// # Resolver Configuration
///
/// Constants of the direction/push-out heuristic. The defaults are the
/// shipped gameplay feel; changing them changes how ledges, landings and
/// side contacts behave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Subtracted from the collision vector's Y before normalizing
    pub vertical_bias: f32,
    /// Added above a candidate's half height to get its standable top
    pub platform_clearance: f32,
    /// Maximum agent-over-candidate height that still gets the climb assist
    pub climb_gap: f32,
    /// Upward climb-assist speed, in units per second
    pub climb_speed: f32,
    /// Length of every push-out step
    pub push_step: f32,
    /// Normalized Y above which a vertical contact counts as "from below"
    pub below_threshold: f32,
    /// Rebuild the spatial grid at the start of every check
    pub rebuild_each_check: bool,
}

impl ResolverConfig {
    /// Create the default resolver tuning
    pub fn new() -> Self {
        Self {
            vertical_bias: 0.15,
            platform_clearance: 2.45,
            climb_gap: 3.9,
            climb_speed: 2.7,
            push_step: 0.1,
            below_threshold: -0.1,
            rebuild_each_check: true,
        }
    }

    /// Set the push-out step length
    pub fn with_push_step(mut self, push_step: f32) -> Self {
        self.push_step = push_step;
        self
    }

    /// Set the climb-assist gap and speed
    pub fn with_climb_assist(mut self, gap: f32, speed: f32) -> Self {
        self.climb_gap = gap;
        self.climb_speed = speed;
        self
    }

    /// Control whether checks rebuild the grid themselves
    pub fn with_rebuild_each_check(mut self, enabled: bool) -> Self {
        self.rebuild_each_check = enabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("vertical_bias", self.vertical_bias),
            ("platform_clearance", self.platform_clearance),
            ("climb_gap", self.climb_gap),
            ("climb_speed", self.climb_speed),
            ("push_step", self.push_step),
            ("below_threshold", self.below_threshold),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(format!("Resolver {} must be finite, got {}", name, value));
        }

        if self.push_step < 0.0 {
            return Err("Push step cannot be negative".to_string());
        }

        if self.climb_speed < 0.0 {
            return Err("Climb speed cannot be negative".to_string());
        }

        Ok(())
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Rig Configuration
///
/// Movement, turning and vertical motion rates of the player rig.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    /// Walking speed in units per second
    pub units_per_second: f32,
    /// Turn speed in degrees per second
    pub degrees_per_second: f32,
    /// Multiplier applied to turn and look rates
    pub mouse_sensitivity: f32,
    /// Movement multiplier while sprinting
    pub sprint_multiplier: f32,
    /// Initial upward speed of a jump
    pub jump_speed: f32,
    /// Rate at which jump speed decays, in units per second squared
    pub jump_decay: f32,
    /// Fall acceleration when unsupported
    pub gravity: f32,
    /// Upward lift rate applied when a jump lands on an obstacle
    pub landing_lift: f32,
}

impl RigConfig {
    /// Create the default rig tuning
    pub fn new() -> Self {
        Self {
            units_per_second: 3.0,
            degrees_per_second: 60.0,
            mouse_sensitivity: 1.5,
            sprint_multiplier: 2.0,
            jump_speed: 10.0,
            jump_decay: 15.0,
            gravity: 15.0,
            landing_lift: 16.0,
        }
    }

    /// Set walking and turning speeds
    pub fn with_speeds(mut self, units_per_second: f32, degrees_per_second: f32) -> Self {
        self.units_per_second = units_per_second;
        self.degrees_per_second = degrees_per_second;
        self
    }

    /// Set jump speed and gravity
    pub fn with_jump(mut self, jump_speed: f32, gravity: f32) -> Self {
        self.jump_speed = jump_speed;
        self.gravity = gravity;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.units_per_second < 0.0 || self.degrees_per_second < 0.0 {
            return Err("Rig speeds cannot be negative".to_string());
        }

        if self.gravity < 0.0 || self.jump_decay < 0.0 {
            return Err("Gravity and jump decay are magnitudes and cannot be negative".to_string());
        }

        Ok(())
    }
}

impl Default for RigConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Engine Configuration
///
/// Frame loop behavior shared by every host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log level used when `RUST_LOG` is not set
    pub log_level: String,
    /// Fixed simulation timestep in seconds
    pub timestep: f32,
    /// Camera eye position relative to the primary rig
    #[serde(with = "crate::foundation::math::serde_vec3")]
    pub camera_offset: Vec3,
    /// Horizontal radius of the camera's collision cylinder
    pub camera_radius: f32,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            timestep: 1.0 / 60.0,
            camera_offset: Vec3::new(0.0, 1.0, 0.0),
            camera_radius: 1.0,
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set the fixed timestep
    pub fn with_timestep(mut self, timestep: f32) -> Self {
        self.timestep = timestep;
        self
    }

    /// Set the camera eye offset
    pub fn with_camera_offset(mut self, offset: Vec3) -> Self {
        self.camera_offset = offset;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.timestep.is_finite() || self.timestep <= 0.0 {
            return Err(format!("Timestep must be positive, got {}", self.timestep));
        }

        if !self.camera_radius.is_finite() || self.camera_radius <= 0.0 {
            return Err("Camera radius must be positive".to_string());
        }

        // The camera's collision height is its eye height above the ground.
        if !self.camera_offset.iter().all(|c| c.is_finite()) || self.camera_offset.y <= 0.0 {
            return Err(format!(
                "Camera offset must be finite with a positive eye height, got {:?}",
                self.camera_offset
            ));
        }

        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration that encompasses all engine subsystems.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Spatial grid configuration
    pub grid: GridConfig,
    /// Collision resolver tuning
    pub resolver: ResolverConfig,
    /// Movement rig tuning
    pub rig: RigConfig,
}

impl ApplicationConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), String> {
        self.engine.validate()?;
        self.grid.validate()?;
        self.resolver.validate()?;
        self.rig.validate()?;
        Ok(())
    }
}

impl Config for ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        ApplicationConfig::validate(self)
    }
}
