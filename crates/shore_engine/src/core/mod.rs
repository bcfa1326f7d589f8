//! # Core Engine Module
//!
//! Shared abstractions used throughout the engine.
//!
//! ## Organization
//!
//! - **Config**: Unified configuration for grid, resolver, rig and frame loop
//! - **Foundation**: Low-level utilities (math, logging)

pub mod config;

// Re-export foundation modules for convenience
pub use crate::foundation;

// Re-export commonly used config types
pub use config::{
    ApplicationConfig,
    EngineConfig,
    GridConfig,
    ResolverConfig,
    RigConfig,
    Config,
    ConfigError,
};
