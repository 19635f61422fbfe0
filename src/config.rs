//! Persistent configuration for the whole ornament.
//!
//! Every tunable lives here, stored as RON in `ornament.ron`. Missing fields
//! take their defaults, so a partial file only overrides what it names.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::input::gestures::SpawnConfig;
use crate::input::projector::ProjectorConfig;
use crate::motion::detector::MotionConfig;
use crate::simulation::physics_config::PhysicsConfig;
use crate::simulation::snow::SnowConfig;

pub const CONFIG_FILE: &str = "ornament.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrnamentConfig {
    /// Fixed number of particle slots
    pub pool_capacity: usize,
    pub physics: PhysicsConfig,
    pub projector: ProjectorConfig,
    pub spawn: SpawnConfig,
    pub motion: MotionConfig,
    pub snow: SnowConfig,
}

impl Default for OrnamentConfig {
    fn default() -> Self {
        Self {
            pool_capacity: 800,
            physics: PhysicsConfig::default(),
            projector: ProjectorConfig::default(),
            spawn: SpawnConfig::default(),
            motion: MotionConfig::default(),
            snow: SnowConfig::default(),
        }
    }
}

impl OrnamentConfig {
    /// Load `ornament.ron` from the working directory, or defaults.
    pub fn load() -> Self {
        let path = Path::new(CONFIG_FILE);

        if path.exists() {
            match Self::load_from_file(path) {
                Ok(config) => {
                    log::info!("Loaded configuration from {:?}", path);
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to load configuration: {}. Using defaults.", e);
                }
            }
        } else {
            log::info!("No {} found, using default configuration", CONFIG_FILE);
        }

        Self::default()
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(ron::from_str(&contents)?)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigSaveError> {
        let contents = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Error type for configuration saving.
#[derive(Debug, thiserror::Error)]
pub enum ConfigSaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON serialize error: {0}")]
    Ron(#[from] ron::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("tree_ornament_{}_{}.ron", name, std::process::id()))
    }

    #[test]
    fn test_defaults() {
        let config = OrnamentConfig::default();
        assert_eq!(config.pool_capacity, 800);
        assert_eq!(config.physics.gravity, 0.005);
        assert_eq!(config.physics.drag, 0.98);
        assert_eq!(config.projector.plane_constant, -10.0);
        assert_eq!(config.spawn.firework_burst, 20);
        assert_eq!(config.motion.mass_threshold, 15);
    }

    #[test]
    fn test_save_and_load_file() {
        let path = temp_path("save_load");
        let mut config = OrnamentConfig::default();
        config.pool_capacity = 256;
        config.physics.tree_height = 9.0;

        config.save_to_file(&path).expect("writes");
        let loaded = OrnamentConfig::load_from_file(&path).expect("reads");
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: OrnamentConfig =
            ron::from_str("(pool_capacity: 100, spawn: (trail_probability: 0.25))").expect("parses");

        assert_eq!(config.pool_capacity, 100);
        assert_eq!(config.spawn.trail_probability, 0.25);
        assert_eq!(config.spawn.firework_burst, 20);
        assert_eq!(config.physics, PhysicsConfig::default());
    }

    #[test]
    fn test_load_errors() {
        let missing = temp_path("missing");
        assert!(matches!(
            OrnamentConfig::load_from_file(&missing),
            Err(ConfigLoadError::Io(_))
        ));

        let broken = temp_path("broken");
        std::fs::write(&broken, "(pool_capacity: \"many\")").expect("writes");
        let result = OrnamentConfig::load_from_file(&broken);
        let _ = std::fs::remove_file(&broken);
        assert!(matches!(result, Err(ConfigLoadError::Ron(_))));
    }
}
