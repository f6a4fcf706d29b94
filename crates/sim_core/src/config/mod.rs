//! Configuration system
//!
//! File-backed configuration with TOML and RON support. Simulation
//! parameters live in [`SimConfig`], which validates before use so a bad
//! file fails loudly at startup instead of corrupting a running world.

pub use serde::{Deserialize, Serialize};

use crate::foundation::math::{Rect, Vec2};
use crate::spatial::QuadTreeConfig;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Semantically invalid configuration
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Camera and culling settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Viewport size in screen units
    pub viewport: Vec2,

    /// Zoom factor; larger values show less of the world
    pub zoom: f32,

    /// Extra world-space margin added around the visible rect when culling
    pub margin: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            viewport: Vec2::new(1280.0, 720.0),
            zoom: 1.0,
            margin: 0.0,
        }
    }
}

/// Top-level simulation configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimConfig {
    /// World bounds covered by the spatial index
    pub world_bounds: Rect,

    /// Quadtree tuning parameters
    pub tree: QuadTreeConfig,

    /// Camera and culling settings
    pub camera: CameraConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world_bounds: Rect::new(Vec2::new(-1000.0, -1000.0), Vec2::new(1000.0, 1000.0)),
            tree: QuadTreeConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl SimConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let size = self.world_bounds.size();
        if size.x <= 0.0 || size.y <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "World bounds must have positive extents, got {:?}",
                size
            )));
        }
        if self.tree.max_entries_per_node == 0 {
            return Err(ConfigError::Invalid(
                "Node capacity must be at least 1".to_string(),
            ));
        }
        if self.tree.max_depth == 0 {
            return Err(ConfigError::Invalid(
                "Tree depth must be at least 1".to_string(),
            ));
        }
        if self.camera.viewport.x <= 0.0 || self.camera.viewport.y <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "Viewport must have positive extents, got {:?}",
                self.camera.viewport
            )));
        }
        if self.camera.zoom <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "Zoom must be positive, got {}",
                self.camera.zoom
            )));
        }
        if self.camera.margin < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "Culling margin cannot be negative, got {}",
                self.camera.margin
            )));
        }
        Ok(())
    }
}

impl Config for SimConfig {}
