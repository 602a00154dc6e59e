//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Simulated-time settings.
    pub time: TimeConfig,
    /// Illumination and transmittance settings.
    pub lighting: LightingConfig,
    /// Initial observer placement.
    pub observer: ObserverConfig,
    /// Ephemeris table source.
    pub ephemeris: EphemerisConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Simulated-time settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimeConfig {
    /// Starting simulated time, seconds since J2000.
    pub start_seconds_j2000: f64,
    /// Simulated seconds per wall-clock second.
    pub time_scale: f64,
}

/// Illumination and transmittance settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightingConfig {
    /// Fixed quadrature sample count for transmittance rays.
    pub transmittance_samples: u32,
    /// Fraction of extinguished sunlight redistributed as sky light.
    pub sky_fraction: f64,
    /// Constant starlight illuminance floor, W/m^2 per channel.
    pub starlight: [f64; 3],
    /// Ground albedo for the single-bounce term, per channel.
    pub bounce_albedo: [f64; 3],
}

/// Initial observer placement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ObserverConfig {
    /// Geodetic latitude in degrees.
    pub latitude_deg: f64,
    /// Longitude in degrees, east positive.
    pub longitude_deg: f64,
    /// Height above the body's mean radius, meters.
    pub elevation_m: f64,
}

/// Ephemeris table source.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EphemerisConfig {
    /// Path to a DE-style binary ephemeris. `None` runs on Keplerian
    /// elements only.
    pub path: Option<PathBuf>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            start_seconds_j2000: 0.0,
            time_scale: 1.0,
        }
    }
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            transmittance_samples: 32,
            sky_fraction: 0.15,
            starlight: [1.0e-4; 3],
            bounce_albedo: [0.3; 3],
        }
    }
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            latitude_deg: 0.0,
            longitude_deg: 0.0,
            elevation_m: 0.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
