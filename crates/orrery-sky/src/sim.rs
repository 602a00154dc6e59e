//! The per-tick simulation core.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use glam::{DQuat, DVec3, Quat, Vec3};
use tracing::trace;

use orrery_atmosphere::{transmittance, Atmosphere};
use orrery_ephemeris::EphemerisError;
use orrery_frames::{BodyId, CelestialBody, FrameChain, FrameVec, Eus, Icrf};
use orrery_math::{angular_radius, solid_angle};

use crate::scene::{Orbit, Scene};
use crate::sky_pass::SkyPass;

/// Tunables that are configuration, not scene content.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimSettings {
    /// Simulated seconds per wall-clock second.
    pub time_scale: f64,
    /// Fixed quadrature sample count for transmittance rays.
    pub transmittance_samples: u32,
    /// Fraction of extinguished sunlight redistributed as ambient sky
    /// light at full sun altitude.
    pub sky_fraction: f64,
    /// Constant starlight illuminance floor, W/m^2 per channel.
    pub starlight: DVec3,
    /// Ground albedo for the single-bounce term.
    pub bounce_albedo: DVec3,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            transmittance_samples: 32,
            sky_fraction: 0.15,
            starlight: DVec3::splat(1.0e-4),
            bounce_albedo: DVec3::splat(0.3),
        }
    }
}

/// What a call to [`CelestialSim::update`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickStatus {
    /// Outputs were recomputed and written.
    Updated,
    /// Observer or reference body unresolved; outputs untouched.
    Skipped,
}

#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),

    /// An orbit's parent chain loops back on itself.
    #[error("orbit parent cycle through {0}")]
    OrbitCycle(BodyId),

    /// A body uses [`Orbit::Ephemeris`] but the scene carries no table.
    #[error("{0} uses an ephemeris orbit but the scene has no ephemeris")]
    MissingEphemeris(BodyId),
}

/// The simulation core: owns simulated time, the cached frame chain,
/// and the dirty flags fed by entity-change notifications.
///
/// One long-lived instance per application; `update` is the only entry
/// point and does all work synchronously.
#[derive(Debug)]
pub struct CelestialSim {
    settings: SimSettings,
    time: f64,
    chain: FrameChain,
    atmosphere_dirty: bool,
}

impl Default for CelestialSim {
    fn default() -> Self {
        Self::new(SimSettings::default())
    }
}

/// The primary light resolved for one tick.
struct PrimaryLight {
    luminance: DVec3,
    position: DVec3,
    radius: f64,
}

impl CelestialSim {
    pub fn new(settings: SimSettings) -> Self {
        Self {
            settings,
            time: 0.0,
            chain: FrameChain::new(),
            atmosphere_dirty: true,
        }
    }

    /// Simulated time, seconds since J2000.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn set_time(&mut self, t: f64) {
        self.time = t;
    }

    pub fn set_time_scale(&mut self, scale: f64) {
        self.settings.time_scale = scale;
    }

    pub fn settings(&self) -> &SimSettings {
        &self.settings
    }

    /// The composed transform chain from the last update.
    pub fn chain(&self) -> &FrameChain {
        &self.chain
    }

    /// The observer was constructed, mutated, or destroyed.
    pub fn notify_observer_changed(&mut self) {
        self.chain.mark_observer_dirty();
    }

    /// The observer was destroyed. Same cache effect as a change; the
    /// next update skips until a new observer resolves.
    pub fn notify_observer_destroyed(&mut self) {
        self.chain.mark_observer_dirty();
    }

    /// The reference body was constructed, mutated, or destroyed. Its
    /// radius feeds the observer leg, so that leg goes stale too.
    pub fn notify_reference_body_changed(&mut self) {
        self.chain.mark_observer_dirty();
    }

    /// An orbit was constructed, mutated, or destroyed. Positions are
    /// reevaluated every tick, so no cache needs invalidation; provided
    /// so collaborators can wire all entity kinds uniformly.
    pub fn notify_orbit_changed(&mut self) {}

    /// The reference atmosphere's raw parameters changed; derived
    /// coefficients are rebuilt at the start of the next update.
    pub fn notify_atmosphere_changed(&mut self) {
        self.atmosphere_dirty = true;
    }

    /// Advance time and recompute all lighting outputs.
    ///
    /// Time advances by `dt * time_scale` unconditionally. Everything
    /// else is skipped, leaving `sky` untouched, unless the observer
    /// and its reference body (with an orbit) all resolve. Out-of-range
    /// ephemeris queries are reported, not clamped.
    pub fn update(
        &mut self,
        scene: &mut Scene,
        sky: &mut SkyPass,
        dt: f64,
    ) -> Result<TickStatus, SimError> {
        self.time += dt * self.settings.time_scale;
        let t = self.time;

        let Some(observer) = scene.observer else {
            trace!("no observer, tick skipped");
            return Ok(TickStatus::Skipped);
        };
        if !scene.bodies.contains_key(&observer.body)
            || !scene.orbits.contains_key(&observer.body)
        {
            trace!(body = %observer.body, "reference body unresolved, tick skipped");
            return Ok(TickStatus::Skipped);
        }

        if self.atmosphere_dirty {
            if let Some(atmosphere) = scene.atmospheres.get_mut(&observer.body) {
                atmosphere.recompute_coefficients();
            }
            self.atmosphere_dirty = false;
        }
        let scene = &*scene;
        let Some(reference) = scene.bodies.get(&observer.body) else {
            return Ok(TickStatus::Skipped);
        };

        // Orbital state for every body with an orbit, parents included.
        let mut positions = BTreeMap::new();
        let mut visiting = Vec::new();
        for &body in scene.orbits.keys() {
            resolve_position(scene, t, body, &mut positions, &mut visiting)?;
        }
        let reference_position = positions.get(&observer.body).copied().unwrap_or(DVec3::ZERO);

        self.chain.rebuild(
            reference,
            FrameVec::new(reference_position),
            &observer,
            t,
        );
        let eus = self.chain.icrf_to_eus();
        let atmosphere = scene.atmospheres.get(&observer.body);
        let samples = self.settings.transmittance_samples;

        sky.observer_elevation = observer.elevation as f32;
        sky.planet_radius = reference.radius as f32;
        sky.icrf_to_eus_rotation = DQuat::from_mat3(&eus.rotation).as_quat();
        sky.icrf_to_eus_translation = eus.translation.as_vec3();
        write_atmosphere_params(sky, reference, atmosphere);

        // Brightest blackbody is the primary light.
        let primary = scene
            .blackbodies
            .iter()
            .max_by(|a, b| {
                a.1.luminance
                    .element_sum()
                    .total_cmp(&b.1.luminance.element_sum())
            })
            .map(|(&id, blackbody)| PrimaryLight {
                luminance: blackbody.luminance,
                position: positions.get(&id).copied().unwrap_or(DVec3::ZERO),
                radius: scene.bodies.get(&id).map_or(0.0, |b| b.radius),
            });

        let mut sun_direction = DVec3::ZERO;
        let mut sun_outer = DVec3::ZERO;
        let mut sun_inner = DVec3::ZERO;
        let mut sun_angular_radius = 0.0;
        if let Some(light) = &primary {
            let sun_eus = eus.apply(FrameVec::<Icrf>::new(light.position)).inner();
            let distance = sun_eus.length();
            // A light at the observer's exact position contributes nothing.
            if distance > 0.0 {
                sun_direction = sun_eus / distance;
                sun_angular_radius = angular_radius(light.radius, distance);
                sun_outer = light.luminance * solid_angle(light.radius, distance);
                let factor = match atmosphere {
                    Some(atm) => transmittance(
                        atm,
                        reference.radius,
                        observer.elevation,
                        sun_direction,
                        samples,
                    ),
                    None => DVec3::ONE,
                };
                sun_inner = sun_outer * factor;
            }
        }

        // Ambient sky: altitude-driven share of the extinguished direct
        // light, floored by starlight. Ground bounce folds in both.
        let sun_altitude_factor = sun_direction.y.max(0.0);
        let sky_illuminance =
            self.settings.sky_fraction * sun_altitude_factor * sun_inner + self.settings.starlight;
        let bounce_illuminance =
            (sun_altitude_factor * sun_inner + sky_illuminance) * self.settings.bounce_albedo;

        sky.sun_direction = sun_direction.as_vec3();
        sky.sun_color = normalized_color(sun_inner);
        sky.sun_angular_radius = sun_angular_radius as f32;
        sky.sun_illuminance_outer = sun_outer.as_vec3();
        sky.sun_illuminance = sun_inner.as_vec3();
        sky.sky_illuminance = sky_illuminance.as_vec3();
        sky.bounce_illuminance = bounce_illuminance.as_vec3();

        self.compose_reflector(
            scene,
            sky,
            &positions,
            primary.as_ref(),
            reference,
            reference_position,
            atmosphere,
            observer.elevation,
            t,
        );

        Ok(TickStatus::Updated)
    }

    /// Reflected-light outputs for the most prominent reflector.
    #[allow(clippy::too_many_arguments)]
    fn compose_reflector(
        &self,
        scene: &Scene,
        sky: &mut SkyPass,
        positions: &BTreeMap<BodyId, DVec3>,
        primary: Option<&PrimaryLight>,
        reference: &CelestialBody,
        reference_position: DVec3,
        atmosphere: Option<&Atmosphere>,
        observer_elevation: f64,
        t: f64,
    ) {
        sky.moon_position = Vec3::ZERO;
        sky.moon_rotation = Quat::IDENTITY;
        sky.moon_angular_radius = 0.0;
        sky.moon_illuminance_sun = Vec3::ZERO;
        sky.moon_illuminance_planet = Vec3::ZERO;

        let eus = self.chain.icrf_to_eus();
        let observer_icrf = eus.inverse().apply(FrameVec::<Eus>::new(DVec3::ZERO)).inner();

        // Pick the reflector that looms largest in the sky.
        let mut best: Option<(BodyId, DVec3, DVec3, f64, f64)> = None;
        for (&id, reflector) in &scene.reflectors {
            let position = positions.get(&id).copied().unwrap_or(DVec3::ZERO);
            let in_eus = eus.apply(FrameVec::<Icrf>::new(position)).inner();
            let distance = in_eus.length();
            if distance <= 0.0 {
                continue;
            }
            let radius = scene.bodies.get(&id).map_or(0.0, |b| b.radius);
            let apparent = angular_radius(radius, distance);
            if best.as_ref().is_none_or(|&(_, _, _, _, prev)| apparent > prev) {
                best = Some((id, reflector.albedo, position, radius, apparent));
            }
        }
        let Some((id, albedo, position, radius, apparent)) = best else {
            return;
        };

        let in_eus = eus.apply(FrameVec::<Icrf>::new(position)).inner();
        let distance = in_eus.length();
        let direction = in_eus / distance;
        let own_solid_angle = solid_angle(radius, distance);

        let factor = match atmosphere {
            Some(atm) => transmittance(
                atm,
                reference.radius,
                observer_elevation,
                direction,
                self.settings.transmittance_samples,
            ),
            None => DVec3::ONE,
        };

        sky.moon_position = in_eus.as_vec3();
        sky.moon_angular_radius = apparent as f32;
        if let Some(body) = scene.bodies.get(&id) {
            let orientation = eus.rotation * body.icrf_to_bcbf_rotation(t).transpose();
            sky.moon_rotation = DQuat::from_mat3(&orientation).as_quat();
        }

        let Some(light) = primary else {
            return;
        };

        // Sunlit component: illuminance at the reflector, Lambertian
        // phase from the sun/reflector/observer geometry, then the
        // reflector's own solid angle back at the observer.
        let to_sun = light.position - position;
        let sun_distance = to_sun.length();
        let to_observer = observer_icrf - position;
        if sun_distance > 0.0 && to_observer.length() > 0.0 {
            let at_reflector = light.luminance * solid_angle(light.radius, sun_distance);
            let phase_cos = (to_sun / sun_distance).dot(to_observer / to_observer.length());
            let phase = (1.0 + phase_cos) / 2.0;
            let reflected = at_reflector * phase * albedo / PI * own_solid_angle;
            sky.moon_illuminance_sun = (reflected * factor).as_vec3();
        }

        // Planet-shine: sunlight bounced off the reference body onto
        // the reflector, then back down to the observer.
        let to_planet = reference_position - position;
        let planet_distance = to_planet.length();
        let sun_to_planet = (light.position - reference_position).length();
        if planet_distance > 0.0 && sun_to_planet > 0.0 {
            let at_planet = light.luminance * solid_angle(light.radius, sun_to_planet);
            let planet_luminance = at_planet * reference.albedo / PI;
            let at_reflector =
                planet_luminance * solid_angle(reference.radius, planet_distance);
            let reflected = at_reflector * albedo / PI * own_solid_angle;
            sky.moon_illuminance_planet = (reflected * factor).as_vec3();
        }
    }
}

/// Peak-normalized color triple; zero input stays zero.
fn normalized_color(illuminance: DVec3) -> Vec3 {
    let peak = illuminance.max_element();
    if peak > 0.0 {
        (illuminance / peak).as_vec3()
    } else {
        Vec3::ZERO
    }
}

fn write_atmosphere_params(
    sky: &mut SkyPass,
    reference: &CelestialBody,
    atmosphere: Option<&Atmosphere>,
) {
    match atmosphere {
        Some(atm) => {
            let params = atm.params();
            let coeffs = atm.coefficients();
            sky.rayleigh_scale_height = params.rayleigh_scale_height as f32;
            sky.mie_scale_height = params.mie_scale_height as f32;
            sky.rayleigh_coefficients = coeffs.rayleigh.as_vec3();
            sky.mie_coefficients = coeffs.mie.as_vec3();
            sky.ozone_coefficients = coeffs.ozone.as_vec3();
            sky.mie_anisotropy = params.mie_anisotropy as f32;
            sky.atmosphere_radius_inner = reference.radius as f32;
            sky.atmosphere_radius_outer = (reference.radius + params.exosphere_altitude) as f32;
        }
        None => {
            sky.rayleigh_scale_height = 0.0;
            sky.mie_scale_height = 0.0;
            sky.rayleigh_coefficients = Vec3::ZERO;
            sky.mie_coefficients = Vec3::ZERO;
            sky.ozone_coefficients = Vec3::ZERO;
            sky.mie_anisotropy = 0.0;
            sky.atmosphere_radius_inner = reference.radius as f32;
            sky.atmosphere_radius_outer = reference.radius as f32;
        }
    }
}

/// ICRF position of `body`, following Kepler parent chains and the
/// shared ephemeris table. Bodies without an orbit are hierarchy roots
/// at the origin.
fn resolve_position(
    scene: &Scene,
    t: f64,
    body: BodyId,
    cache: &mut BTreeMap<BodyId, DVec3>,
    visiting: &mut Vec<BodyId>,
) -> Result<DVec3, SimError> {
    if let Some(&position) = cache.get(&body) {
        return Ok(position);
    }
    if visiting.contains(&body) {
        return Err(SimError::OrbitCycle(body));
    }
    visiting.push(body);
    let position = match scene.orbits.get(&body) {
        None => DVec3::ZERO,
        Some(Orbit::Kepler(orbit)) => {
            let local = orbit.position_at(t).inner();
            match orbit.parent {
                Some(parent) => local + resolve_position(scene, t, parent, cache, visiting)?,
                None => local,
            }
        }
        Some(Orbit::Ephemeris) => {
            let table = scene
                .ephemeris
                .as_ref()
                .ok_or(SimError::MissingEphemeris(body))?;
            table.position_at(body, t)?.inner()
        }
    };
    visiting.pop();
    cache.insert(body, position);
    Ok(position)
}
