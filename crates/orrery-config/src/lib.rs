//! Configuration loading for the simulation: RON files with defaults
//! plus command-line overrides.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, EphemerisConfig, LightingConfig, ObserverConfig, TimeConfig};
pub use error::ConfigError;
