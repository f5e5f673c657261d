//! Simulation parameters.
//!
//! One [`SimulationParameters`] value is active at a time. It carries the fields
//! every mode shares (capacity, emission shape, visuals, lifecycle) plus a
//! [`ForceModel`] holding the coefficients of exactly one force model. The mode
//! of a parameter set is the variant of its force model, so a fluid
//! configuration can never carry stale glitch coefficients.
//!
//! [`ActiveParameters`] keeps one configuration per mode and swaps between
//! them wholesale. Edits made while a mode is active stay with that mode.
//!
//! # Presets
//!
//! ```ignore
//! let mut params = ActiveParameters::default();   // zen active
//! params.switch(Mode::Glitch);
//! assert_eq!(params.current().mode(), Mode::Glitch);
//! ```

use crate::error::PresetError;
use crate::visuals::{BlendMode, ParticleShape};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Largest live-particle capacity the simulation will allocate.
pub const MAX_PARTICLES: usize = 1_000_000;

/// Shortest lifespan a particle can be given, in seconds.
pub const MIN_LIFESPAN: f32 = 0.01;

/// Physics mode, one per force model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Zen,
    Fluid,
    Glitch,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Zen, Mode::Fluid, Mode::Glitch];

    /// Resolve a mode name, falling back to zen for anything unrecognised.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "fluid" => Mode::Fluid,
            "glitch" => Mode::Glitch,
            _ => Mode::Zen,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Zen => "zen",
            Mode::Fluid => "fluid",
            Mode::Glitch => "glitch",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Zen coefficients: gravity, air drag, constant wind and a slow sinusoidal sway.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZenForces {
    pub gravity: f32,
    pub air_resistance: f32,
    pub wind_x: f32,
    pub wind_y: f32,
    pub wind_z: f32,
    pub turbulence: f32,
}

impl ZenForces {
    #[inline]
    pub fn wind(&self) -> Vec3 {
        Vec3::new(self.wind_x, self.wind_y, self.wind_z)
    }
}

impl Default for ZenForces {
    fn default() -> Self {
        Self {
            gravity: -0.3,
            air_resistance: 0.02,
            wind_x: -0.3,
            wind_y: 0.2,
            wind_z: 0.1,
            turbulence: 0.5,
        }
    }
}

/// Fluid coefficients.
///
/// `viscosity` of 1.0 means no velocity loss at all; lower values damp harder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FluidForces {
    pub viscosity: f32,
    pub buoyancy: f32,
    pub diffusion_rate: f32,
    pub swirl_intensity: f32,
}

impl Default for FluidForces {
    fn default() -> Self {
        Self {
            viscosity: 0.5,
            buoyancy: 0.1,
            diffusion_rate: 0.2,
            swirl_intensity: 1.0,
        }
    }
}

/// Glitch coefficients.
///
/// `damping` multiplies velocity once per step and is expected in `0..1`.
/// `influence_radius` and `snap_speed` only matter for pointer attraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlitchForces {
    #[serde(alias = "attractionForce")]
    pub anchor_strength: f32,
    pub damping: f32,
    #[serde(alias = "glitchJitter")]
    pub jitter: f32,
    pub influence_radius: f32,
    pub snap_speed: f32,
}

impl Default for GlitchForces {
    fn default() -> Self {
        Self {
            anchor_strength: 1.5,
            damping: 0.92,
            jitter: 0.5,
            influence_radius: 15.0,
            snap_speed: 3.0,
        }
    }
}

/// The force model of a parameter set, tagged by mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ForceModel {
    Zen(ZenForces),
    Fluid(FluidForces),
    Glitch(GlitchForces),
}

impl ForceModel {
    pub fn mode(&self) -> Mode {
        match self {
            ForceModel::Zen(_) => Mode::Zen,
            ForceModel::Fluid(_) => Mode::Fluid,
            ForceModel::Glitch(_) => Mode::Glitch,
        }
    }
}

/// One complete, swappable simulation configuration.
///
/// Every field is read directly by the update and repack steps each frame;
/// nothing is derived and cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationParameters {
    // Capacity
    /// Maximum number of concurrently live particles, also the render buffer length.
    pub count: usize,
    /// Upper bound on the size of a drag-trail burst.
    pub emission_rate: f32,
    /// Particles emitted by a tap.
    pub burst_size: usize,
    /// Particles emitted per drag-trail burst (capped by `emission_rate`).
    pub trail_density: usize,

    // Emission shape
    pub initial_speed: f32,
    /// Full emission spread in degrees.
    pub spread_angle: f32,
    pub shape: ParticleShape,

    // Visual
    pub start_color: Vec3,
    pub end_color: Vec3,
    pub size: f32,
    pub size_variation: f32,
    pub opacity: f32,
    pub blend_mode: BlendMode,

    // Lifecycle
    /// Nominal particle life in seconds.
    pub lifespan: f32,
    /// Seconds a zen particle keeps rendering after nominal death.
    pub ghost_duration: f32,
    /// Transient fade-all flag, see `Simulation::begin_gentle_clear`.
    #[serde(default)]
    pub clearing_mode: bool,

    #[serde(flatten)]
    pub forces: ForceModel,
}

impl SimulationParameters {
    /// Zen preset: slow drifting particles with a long ghost tail.
    pub fn zen() -> Self {
        Self {
            count: 30_000,
            emission_rate: 69.0,
            burst_size: 99,
            trail_density: 33,
            initial_speed: 2.0,
            spread_angle: 133.0,
            shape: ParticleShape::Cube,
            start_color: Vec3::new(1.0, 1.0, 1.0),
            end_color: Vec3::new(0.0, 1.0, 1.0),
            size: 0.5,
            size_variation: 3.0,
            opacity: 0.7,
            blend_mode: BlendMode::Subtractive,
            lifespan: 120.0,
            ghost_duration: 30.0,
            clearing_mode: false,
            forces: ForceModel::Zen(ZenForces::default()),
        }
    }

    /// Fluid preset: buoyant, diffusing, swirling particles.
    pub fn fluid() -> Self {
        Self {
            count: 30_000,
            emission_rate: 69.0,
            burst_size: 99,
            trail_density: 33,
            initial_speed: 2.0,
            spread_angle: 133.0,
            shape: ParticleShape::Cube,
            start_color: Vec3::new(1.0, 1.0, 1.0),
            end_color: Vec3::new(0.0, 1.0, 1.0),
            size: 0.5,
            size_variation: 3.0,
            opacity: 0.7,
            blend_mode: BlendMode::Subtractive,
            lifespan: 120.0,
            ghost_duration: 30.0,
            clearing_mode: false,
            forces: ForceModel::Fluid(FluidForces::default()),
        }
    }

    /// Glitch preset: jittering particles anchored to the origin.
    pub fn glitch() -> Self {
        Self {
            count: 30_000,
            emission_rate: 69.0,
            burst_size: 99,
            trail_density: 33,
            initial_speed: 2.0,
            spread_angle: 133.0,
            shape: ParticleShape::Cube,
            start_color: Vec3::new(1.0, 1.0, 1.0),
            end_color: Vec3::new(0.0, 1.0, 1.0),
            size: 0.5,
            size_variation: 3.0,
            opacity: 0.7,
            blend_mode: BlendMode::Subtractive,
            lifespan: 120.0,
            ghost_duration: 30.0,
            clearing_mode: false,
            forces: ForceModel::Glitch(GlitchForces::default()),
        }
    }

    /// Preset for the given mode.
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Zen => Self::zen(),
            Mode::Fluid => Self::fluid(),
            Mode::Glitch => Self::glitch(),
        }
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.forces.mode()
    }

    /// `count` bounded by [`MAX_PARTICLES`]. This is what buffers are sized to.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.count.min(MAX_PARTICLES)
    }

    /// Pull values a hand-edited preset may carry back into range.
    ///
    /// `count` is capped at [`MAX_PARTICLES`], `lifespan` is raised to at
    /// least [`MIN_LIFESPAN`] and a stray `clearingMode` is dropped, since only
    /// a gentle clear may raise it.
    pub fn sanitize(&mut self) {
        self.count = self.capacity();
        if !self.lifespan.is_finite() || self.lifespan < MIN_LIFESPAN {
            self.lifespan = MIN_LIFESPAN;
        }
        self.clearing_mode = false;
    }

    /// Size of a drag-trail burst: `min(trail_density, emission_rate)`.
    pub fn trail_burst(&self) -> usize {
        let rate = if self.emission_rate.is_finite() {
            self.emission_rate.max(0.0) as usize
        } else {
            0
        };
        self.trail_density.min(rate)
    }

    /// Save the parameters to a pretty-printed JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PresetError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load parameters from a JSON file. Out-of-range values are sanitized.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PresetError> {
        let json = fs::read_to_string(path)?;
        let mut params: Self = serde_json::from_str(&json)?;
        params.sanitize();
        Ok(params)
    }
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self::zen()
    }
}

/// One parameter set per mode, exactly one of them active.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveParameters {
    zen: SimulationParameters,
    fluid: SimulationParameters,
    glitch: SimulationParameters,
    active: Mode,
}

impl ActiveParameters {
    /// Presets for every mode, with `active` selected.
    pub fn new(active: Mode) -> Self {
        Self {
            zen: SimulationParameters::zen(),
            fluid: SimulationParameters::fluid(),
            glitch: SimulationParameters::glitch(),
            active,
        }
    }

    #[inline]
    pub fn active(&self) -> Mode {
        self.active
    }

    /// The parameter set currently driving the simulation.
    pub fn current(&self) -> &SimulationParameters {
        self.get(self.active)
    }

    pub(crate) fn current_mut(&mut self) -> &mut SimulationParameters {
        self.get_mut(self.active)
    }

    /// The stored parameter set of any mode, active or not.
    pub fn get(&self, mode: Mode) -> &SimulationParameters {
        match mode {
            Mode::Zen => &self.zen,
            Mode::Fluid => &self.fluid,
            Mode::Glitch => &self.glitch,
        }
    }

    pub(crate) fn get_mut(&mut self, mode: Mode) -> &mut SimulationParameters {
        match mode {
            Mode::Zen => &mut self.zen,
            Mode::Fluid => &mut self.fluid,
            Mode::Glitch => &mut self.glitch,
        }
    }

    /// Replace the stored parameter set of the mode the given set belongs to.
    ///
    /// The set lands in the slot named by its own force model, so a glitch
    /// configuration can never end up in the zen slot. The set is sanitized
    /// on the way in.
    pub fn replace(&mut self, mut params: SimulationParameters) {
        params.sanitize();
        let mode = params.mode();
        *self.get_mut(mode) = params;
    }

    /// Make `mode` the active slot. Returns `true` if the active mode changed.
    pub fn switch(&mut self, mode: Mode) -> bool {
        let changed = self.active != mode;
        self.active = mode;
        changed
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut SimulationParameters> {
        [&mut self.zen, &mut self.fluid, &mut self.glitch].into_iter()
    }
}

impl Default for ActiveParameters {
    fn default() -> Self {
        Self::new(Mode::Zen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_fallback() {
        assert_eq!(Mode::from_name("fluid"), Mode::Fluid);
        assert_eq!(Mode::from_name("GLITCH"), Mode::Glitch);
        assert_eq!(Mode::from_name("vaporwave"), Mode::Zen);
        assert_eq!(Mode::from_name(""), Mode::Zen);
    }

    #[test]
    fn test_presets_match_their_mode() {
        for mode in Mode::ALL {
            assert_eq!(SimulationParameters::for_mode(mode).mode(), mode);
        }
    }

    #[test]
    fn test_trail_burst_is_capped_by_rate() {
        let mut params = SimulationParameters::zen();
        assert_eq!(params.trail_burst(), 33);

        params.emission_rate = 10.0;
        assert_eq!(params.trail_burst(), 10);

        params.emission_rate = -5.0;
        assert_eq!(params.trail_burst(), 0);
    }

    #[test]
    fn test_switch_keeps_edits_per_slot() {
        let mut params = ActiveParameters::default();
        params.current_mut().opacity = 0.25;

        assert!(params.switch(Mode::Fluid));
        assert_eq!(params.current().opacity, 0.7);

        assert!(params.switch(Mode::Zen));
        assert_eq!(params.current().opacity, 0.25);
        assert!(!params.switch(Mode::Zen));
    }

    #[test]
    fn test_replace_targets_own_slot() {
        let mut params = ActiveParameters::default();
        let mut glitch = SimulationParameters::glitch();
        glitch.count = 10;
        params.replace(glitch);

        assert_eq!(params.active(), Mode::Zen);
        assert_eq!(params.get(Mode::Glitch).count, 10);
        assert_eq!(params.get(Mode::Zen).count, 30_000);
    }

    #[test]
    fn test_sanitize_pulls_values_into_range() {
        let mut params = SimulationParameters::fluid();
        params.count = usize::MAX;
        params.lifespan = -3.0;
        params.clearing_mode = true;
        params.sanitize();

        assert_eq!(params.count, MAX_PARTICLES);
        assert_eq!(params.lifespan, MIN_LIFESPAN);
        assert!(!params.clearing_mode);

        params.lifespan = f32::NAN;
        params.sanitize();
        assert_eq!(params.lifespan, MIN_LIFESPAN);
    }

    #[test]
    fn test_load_sanitizes_hand_edited_preset() {
        let mut value = serde_json::to_value(SimulationParameters::zen()).unwrap();
        let map = value.as_object_mut().unwrap();
        map.insert("count".into(), serde_json::json!(u64::MAX));
        map.insert("lifespan".into(), serde_json::json!(0.0));
        map.insert("clearingMode".into(), serde_json::json!(true));

        let path = std::env::temp_dir()
            .join(format!("driftfield-sanitize-{}.json", std::process::id()));
        std::fs::write(&path, value.to_string()).unwrap();
        let params = SimulationParameters::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(params.count, MAX_PARTICLES);
        assert_eq!(params.lifespan, MIN_LIFESPAN);
        assert!(!params.clearing_mode);
    }

    #[test]
    fn test_json_round_trip_keeps_mode() {
        let mut params = SimulationParameters::glitch();
        params.burst_size = 7;
        let json = serde_json::to_string(&params).unwrap();

        assert!(json.contains("\"mode\":\"glitch\""));
        assert!(json.contains("\"burstSize\":7"));

        let back: SimulationParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }

    #[test]
    fn test_json_accepts_attraction_force_alias() {
        let mut value = serde_json::to_value(SimulationParameters::glitch()).unwrap();
        let map = value.as_object_mut().unwrap();
        map.remove("anchorStrength");
        map.insert("attractionForce".into(), serde_json::json!(2.5));

        let params: SimulationParameters = serde_json::from_value(value).unwrap();
        match params.forces {
            ForceModel::Glitch(g) => assert_eq!(g.anchor_strength, 2.5),
            other => panic!("expected glitch forces, got {:?}", other),
        }
    }
}
