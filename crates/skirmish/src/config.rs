//! Scenario configuration

use serde::{Deserialize, Serialize};
use sim_core::config::{Config, ConfigError, SimConfig};

/// Complete scenario configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Simulation core settings
    pub sim: SimConfig,

    /// Entity spawn settings
    pub spawn: SpawnConfig,

    /// Targeting behavior shared by all ships
    pub targeting: TargetingSettings,

    /// Run length and reporting settings
    pub run: RunConfig,
}

/// Entity spawn settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnConfig {
    /// Ships spawned for each of the two factions
    pub ships_per_faction: u32,

    /// Static structures scattered across the world
    pub structure_count: u32,

    /// Pickup triggers scattered across the world
    pub pickup_count: u32,

    /// Initial ship speed in world units per second
    pub ship_speed: f32,

    /// Seed for deterministic spawning
    pub seed: u64,
}

/// Targeting behavior shared by all ships
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetingSettings {
    /// Maximum acquisition range
    pub max_range: f32,

    /// Skip targets hidden behind structures
    pub require_line_of_sight: bool,

    /// Projectile speed assumed for lead prediction
    pub projectile_speed: f32,
}

/// Run length and reporting settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of simulation ticks to run
    pub ticks: u32,

    /// Fixed ticks per second driving the timestep
    pub tick_rate: f32,

    /// Report interval in ticks
    pub log_every: u32,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            sim: SimConfig::default(),
            spawn: SpawnConfig::default(),
            targeting: TargetingSettings::default(),
            run: RunConfig::default(),
        }
    }
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            ships_per_faction: 12,
            structure_count: 6,
            pickup_count: 8,
            ship_speed: 120.0,
            seed: 42,
        }
    }
}

impl Default for TargetingSettings {
    fn default() -> Self {
        Self {
            max_range: 600.0,
            require_line_of_sight: true,
            projectile_speed: 360.0,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            ticks: 600,
            tick_rate: 60.0,
            log_every: 60,
        }
    }
}

impl Config for ScenarioConfig {}

impl ScenarioConfig {
    /// Load the scenario from the first config file found, falling back to
    /// the built-in defaults
    ///
    /// Tries the working directory first, then the crate directory, so the
    /// demo finds its file whether launched from the workspace root or from
    /// `crates/skirmish`.
    pub fn load_or_default() -> Self {
        const CANDIDATES: [&str; 2] = ["skirmish.ron", "crates/skirmish/skirmish.ron"];

        for path in CANDIDATES {
            if !std::path::Path::new(path).exists() {
                continue;
            }
            match Self::load_from_file(path) {
                Ok(config) => {
                    log::info!("Loaded scenario from {}", path);
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to load scenario from {}: {}", path, e);
                }
            }
        }

        log::info!("Using built-in default scenario");
        Self::default()
    }

    /// Validate the scenario
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sim.validate()?;
        if self.spawn.ship_speed < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "Ship speed cannot be negative, got {}",
                self.spawn.ship_speed
            )));
        }
        if self.run.ticks == 0 {
            return Err(ConfigError::Invalid(
                "Run length must be at least one tick".to_string(),
            ));
        }
        if self.run.tick_rate <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "Tick rate must be positive, got {}",
                self.run.tick_rate
            )));
        }
        if self.run.log_every == 0 {
            return Err(ConfigError::Invalid(
                "Report interval must be at least one tick".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scenario_is_valid() {
        assert!(ScenarioConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_run_settings() {
        let mut config = ScenarioConfig::default();
        config.run.tick_rate = 0.0;
        assert!(config.validate().is_err());

        let mut config = ScenarioConfig::default();
        config.run.ticks = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_scenario_round_trips_through_file() {
        let mut path = std::env::temp_dir();
        path.push(format!("skirmish_{}_scenario.ron", std::process::id()));
        let path = path.to_string_lossy().into_owned();

        let mut config = ScenarioConfig::default();
        config.spawn.seed = 7;
        config.targeting.max_range = 450.0;

        config.save_to_file(&path).unwrap();
        let loaded = ScenarioConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.spawn.seed, 7);
        assert_eq!(loaded.targeting.max_range, 450.0);
        assert_eq!(loaded.run.ticks, 600);
    }
}
