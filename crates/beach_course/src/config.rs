//! Game configuration

use serde::{Deserialize, Serialize};
use shore_engine::prelude::*;

/// Default location of the shipped level
pub const DEFAULT_LEVEL: &str = "resources/levels/boardwalk.ron";

/// Game configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Which level to run and for how long
    pub course: CourseConfig,

    /// Engine tuning
    pub core: ApplicationConfig,
}

/// Level selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseConfig {
    /// Level file to load
    pub level: String,

    /// Stop after this many frames even if the script continues
    pub frame_limit: Option<u64>,
}

impl Default for CourseConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL.to_string(),
            frame_limit: None,
        }
    }
}

impl Config for GameConfig {
    fn validate(&self) -> Result<(), String> {
        if self.course.level.is_empty() {
            return Err("Level path cannot be empty".to_string());
        }
        self.core.validate()
    }
}

impl GameConfig {
    /// Load configuration from `path`, or return the defaults when no path is given
    pub fn load_or_default(path: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_sections() {
        let text = r#"
            [course]
            level = "levels/pier.ron"
            frame_limit = 120

            [core.engine]
            log_level = "debug"

            [core.resolver]
            climb_gap = 2.0
        "#;
        let config = GameConfig::parse("game.toml", text).unwrap();
        assert_eq!(config.course.level, "levels/pier.ron");
        assert_eq!(config.course.frame_limit, Some(120));
        assert_eq!(config.core.engine.log_level, "debug");
        assert_eq!(config.core.resolver.climb_gap, 2.0);
        assert_eq!(config.core.grid, GridConfig::default());
    }

    #[test]
    fn test_defaults_without_file() {
        let config = GameConfig::load_or_default(None).unwrap();
        assert_eq!(config.course.level, DEFAULT_LEVEL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../resources/config/course.toml");
        let config = GameConfig::load_from_file(path).unwrap();
        assert_eq!(config.course.frame_limit, Some(600));
        assert_eq!(config.core.resolver, ResolverConfig::default());
        assert_eq!(config.core.rig, RigConfig::default());
        assert_eq!(config.core.grid, GridConfig::default());
    }

    #[test]
    fn test_empty_level_rejected() {
        let err = GameConfig::parse("game.toml", "[course]\nlevel = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
