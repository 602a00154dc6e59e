//! Demo binary: a Sun/Earth/Moon scene ticked through one simulated day.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI
//! flags. Run with `cargo run -p orrery-demo -- --latitude 51.48 --time-scale 3600`
//! to watch a day pass from Greenwich at an hour per tick.

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use glam::DVec3;
use tracing::{info, warn};

use orrery_atmosphere::{Atmosphere, AtmosphereParams};
use orrery_config::{CliArgs, Config};
use orrery_ephemeris::{load_de_file, KeplerOrbit};
use orrery_frames::{BodyId, CelestialBody, Observer};
use orrery_sky::{Blackbody, CelestialSim, DiffuseReflector, Orbit, Scene, SimSettings, SkyPass};

const SUN: BodyId = BodyId(10);
const EARTH: BodyId = BodyId(3);
const MOON: BodyId = BodyId(9);

const MU_SUN: f64 = 1.327_124_4e20;
const MU_EARTH: f64 = 3.986_004_4e14;
const AU: f64 = 1.495_978_707e11;

fn main() {
    let args = CliArgs::parse();
    let config_dir = args.config.clone().unwrap_or_else(|| ".".into());
    let mut config = match Config::load_or_create(&config_dir) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {err}, using defaults");
            Config::default()
        }
    };
    config.apply_cli_overrides(&args);

    orrery_log::init_logging(Some(Path::new("logs")), cfg!(debug_assertions), Some(&config));

    let mut scene = build_scene(&config);
    let mut sim = CelestialSim::new(SimSettings {
        time_scale: config.time.time_scale,
        transmittance_samples: config.lighting.transmittance_samples,
        sky_fraction: config.lighting.sky_fraction,
        starlight: DVec3::from_array(config.lighting.starlight),
        bounce_albedo: DVec3::from_array(config.lighting.bounce_albedo),
    });
    sim.set_time(config.time.start_seconds_j2000);

    let mut sky = SkyPass::default();
    // 24 ticks of one wall-clock hour each.
    for hour in 0..24 {
        match sim.update(&mut scene, &mut sky, 3_600.0) {
            Ok(status) => {
                let altitude = sky.sun_direction.y.asin().to_degrees();
                info!(
                    hour,
                    ?status,
                    t = sim.time(),
                    sun_altitude_deg = altitude,
                    sun_illuminance = ?sky.sun_illuminance,
                    sky_illuminance = ?sky.sky_illuminance,
                    moon_angular_radius = sky.moon_angular_radius,
                    "tick"
                );
            }
            Err(err) => {
                warn!(hour, "tick failed: {err}");
            }
        }
    }
}

fn build_scene(config: &Config) -> Scene {
    let mut scene = Scene::new();

    scene.bodies.insert(
        SUN,
        CelestialBody {
            radius: 6.957e8,
            albedo: DVec3::ZERO,
            pole_ra: vec![0.0],
            pole_dec: vec![std::f64::consts::FRAC_PI_2],
            prime_meridian: vec![0.0],
        },
    );
    // IAU-style Earth orientation: pole at RA 0, dec 90, prime meridian
    // advancing 360.9856 degrees per day.
    scene.bodies.insert(
        EARTH,
        CelestialBody {
            radius: 6_378_100.0,
            albedo: DVec3::splat(0.3),
            pole_ra: vec![0.0],
            pole_dec: vec![std::f64::consts::FRAC_PI_2],
            prime_meridian: vec![3.308_9, 6.300_388_098],
        },
    );
    scene.bodies.insert(
        MOON,
        CelestialBody {
            radius: 1.737_4e6,
            albedo: DVec3::splat(0.12),
            pole_ra: vec![4.683_6],
            pole_dec: vec![1.161_9],
            prime_meridian: vec![0.668_7, 0.229_971],
        },
    );

    scene.orbits.insert(
        EARTH,
        Orbit::Kepler(KeplerOrbit {
            semi_major_axis: AU,
            eccentricity: 0.0167,
            inclination: 0.0,
            raan: 0.0,
            arg_periapsis: 1.796_6,
            true_anomaly_epoch: 6.24,
            epoch: 0.0,
            gravitational_parameter: MU_SUN,
            parent: Some(SUN),
        }),
    );
    scene.orbits.insert(
        MOON,
        Orbit::Kepler(KeplerOrbit {
            semi_major_axis: 3.844e8,
            eccentricity: 0.0549,
            inclination: 0.089_8,
            raan: 2.183,
            arg_periapsis: 5.553,
            true_anomaly_epoch: 2.36,
            epoch: 0.0,
            gravitational_parameter: MU_EARTH,
            parent: Some(EARTH),
        }),
    );

    scene.blackbodies.insert(SUN, Blackbody::from_temperature(5_772.0));
    scene
        .reflectors
        .insert(MOON, DiffuseReflector::new(DVec3::splat(0.12)));
    scene
        .atmospheres
        .insert(EARTH, Atmosphere::new(AtmosphereParams::earth_like()));

    scene.observer = Some(Observer {
        body: EARTH,
        elevation: config.observer.elevation_m,
        latitude: config.observer.latitude_deg.to_radians(),
        longitude: config.observer.longitude_deg.to_radians(),
    });

    // A DE-style table, when configured, replaces Earth's Keplerian orbit.
    if let Some(path) = &config.ephemeris.path {
        match load_de_file(path) {
            Ok(table) => {
                scene.ephemeris = Some(Arc::new(table));
                scene.orbits.insert(EARTH, Orbit::Ephemeris);
                info!("loaded ephemeris from {}", path.display());
            }
            Err(err) => {
                warn!("ephemeris load failed, staying on Kepler elements: {err}");
            }
        }
    }

    scene
}
