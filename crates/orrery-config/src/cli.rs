//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Simulation command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "orrery", about = "Celestial simulation core")]
pub struct CliArgs {
    /// Simulated seconds per wall-clock second.
    #[arg(long)]
    pub time_scale: Option<f64>,

    /// Starting simulated time, seconds since J2000.
    #[arg(long)]
    pub start_time: Option<f64>,

    /// Transmittance quadrature sample count.
    #[arg(long)]
    pub samples: Option<u32>,

    /// Observer latitude in degrees.
    #[arg(long)]
    pub latitude: Option<f64>,

    /// Observer longitude in degrees, east positive.
    #[arg(long)]
    pub longitude: Option<f64>,

    /// Observer elevation in meters.
    #[arg(long)]
    pub elevation: Option<f64>,

    /// Path to a DE-style binary ephemeris.
    #[arg(long)]
    pub ephemeris: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(scale) = args.time_scale {
            self.time.time_scale = scale;
        }
        if let Some(start) = args.start_time {
            self.time.start_seconds_j2000 = start;
        }
        if let Some(samples) = args.samples {
            self.lighting.transmittance_samples = samples;
        }
        if let Some(latitude) = args.latitude {
            self.observer.latitude_deg = latitude;
        }
        if let Some(longitude) = args.longitude {
            self.observer.longitude_deg = longitude;
        }
        if let Some(elevation) = args.elevation {
            self.observer.elevation_m = elevation;
        }
        if let Some(ref path) = args.ephemeris {
            self.ephemeris.path = Some(path.clone());
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_args() -> CliArgs {
        CliArgs {
            time_scale: None,
            start_time: None,
            samples: None,
            latitude: None,
            longitude: None,
            elevation: None,
            ephemeris: None,
            log_level: None,
            config: None,
        }
    }

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            time_scale: Some(86_400.0),
            latitude: Some(-33.9),
            ..empty_args()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.time.time_scale, 86_400.0);
        assert_eq!(config.observer.latitude_deg, -33.9);
        // Non-overridden fields retain defaults
        assert_eq!(config.lighting.transmittance_samples, 32);
        assert_eq!(config.observer.elevation_m, 0.0);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&empty_args());
        assert_eq!(config, original);
    }
}
