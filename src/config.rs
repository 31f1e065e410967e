//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`STRATA_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;

use strata_core::DirtyFlagPolicy;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// World configuration
    #[serde(default)]
    pub world: WorldConfig,
    /// Physics configuration
    #[serde(default)]
    pub physics: PhysicsConfig,
    /// Fixed-timestep simulation configuration
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`STRATA_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // STRATA_WORLD__CAPACITY=64 -> world.capacity = 64
        figment = figment.merge(Env::prefixed("STRATA_").split("__"));

        let config: Self = figment.extract().map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that deserialize fine but cannot drive a world
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulation.validate()
    }
}

/// World configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Number of entity slots, including the reserved id 0
    pub capacity: usize,
    /// Whether the matrix pass clears dirty flags it consumed
    pub dirty_policy: DirtyFlagPolicy,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            capacity: 1024,
            dirty_policy: DirtyFlagPolicy::Retain,
        }
    }
}

/// Physics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Create a physics world at all
    pub enabled: bool,
    /// Gravity (negative = downward)
    pub gravity: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            gravity: -9.81,
        }
    }
}

impl PhysicsConfig {
    /// Convert to the physics engine's config, or None when disabled
    pub fn to_physics_config(&self) -> Option<strata_core::PhysicsConfig> {
        self.enabled.then(|| strata_core::PhysicsConfig::new(self.gravity))
    }
}

/// Fixed-timestep simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seconds per tick
    pub timestep: f32,
    /// Frame time is capped to this many seconds before being accumulated
    pub max_frame_time: f32,
    /// Number of ticks the headless demo runs
    pub ticks: u32,
}

impl SimulationConfig {
    /// The timestep must be a positive finite number of seconds and the
    /// frame cap must not be negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.timestep.is_finite() && self.timestep > 0.0) {
            return Err(ConfigError::invalid(format!(
                "simulation.timestep must be positive, got {}",
                self.timestep
            )));
        }
        if self.max_frame_time.is_nan() || self.max_frame_time < 0.0 {
            return Err(ConfigError::invalid(format!(
                "simulation.max_frame_time must not be negative, got {}",
                self.max_frame_time
            )));
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            timestep: 1.0 / 60.0,
            max_frame_time: 0.25,
            ticks: 180,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    /// Error for a value that parsed but is out of range
    pub fn invalid(message: impl Into<String>) -> Self {
        ConfigError {
            message: message.into(),
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
