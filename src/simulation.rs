//! The simulation driver.
//!
//! [`Simulation`] ties the pieces together: the per-mode parameter slots, the
//! particle system, the frame clock and pointer interaction. The host calls
//! [`Simulation::frame`] once per rendered frame (or [`Simulation::step`] with
//! a fixed delta when it owns the clock) and forwards pointer events to
//! [`Simulation::handle_pointer`].
//!
//! # Example
//!
//! ```ignore
//! use driftfield::prelude::*;
//!
//! let mut sim = Simulation::new().with_mode(Mode::Fluid).with_seed(7);
//! sim.set_parameter("viscosity", 0.8)?;
//! sim.emit(500, Vec3::ZERO);
//!
//! loop {
//!     sim.frame();
//!     renderer.upload(sim.system().buffers());
//! }
//! ```
//!
//! # Gentle clear
//!
//! [`Simulation::begin_gentle_clear`] raises `clearingMode` on every mode's
//! parameters and records a deadline [`GENTLE_CLEAR_WINDOW`] seconds ahead on
//! the simulation clock. The flag drops again on the first frame at or past
//! the deadline, so simulated clocks reproduce it exactly.

use crate::controls::{self, ParamValue};
use crate::emitter::Burst;
use crate::error::{ParameterError, PresetError};
use crate::input::{Interaction, PointerEvent, Request};
use crate::params::{ActiveParameters, Mode, SimulationParameters};
use crate::system::ParticleSystem;
use crate::time::Time;
use crate::visuals::BlendMode;
use glam::Vec3;
use std::path::Path;

/// Seconds a gentle clear keeps `clearingMode` raised.
pub const GENTLE_CLEAR_WINDOW: f32 = 6.0;

/// Figures published once per second of simulated time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameStats {
    pub fps: f32,
    pub active_particles: usize,
}

/// The frame-driven simulation.
#[derive(Debug)]
pub struct Simulation {
    params: ActiveParameters,
    system: ParticleSystem,
    time: Time,
    interaction: Interaction,
    clear_deadline: Option<f32>,
    stats: FrameStats,
}

impl Simulation {
    /// Zen mode with every preset at its defaults.
    pub fn new() -> Self {
        let params = ActiveParameters::default();
        let system = ParticleSystem::new(params.current());
        Self {
            params,
            system,
            time: Time::new(),
            interaction: Interaction::new(),
            clear_deadline: None,
            stats: FrameStats::default(),
        }
    }

    /// Start in `mode`.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.params.switch(mode);
        self.system.set_blend_mode(self.params.current().blend_mode);
        self
    }

    /// Install a parameter set in its mode's slot and make that mode active.
    pub fn with_parameters(mut self, params: SimulationParameters) -> Self {
        let mode = params.mode();
        self.params.replace(params);
        self.with_mode(mode)
    }

    /// Use a reproducible random stream.
    pub fn with_seed(mut self, seed: u64) -> Self {
        let blend_mode = self.system.blend_mode();
        self.system = ParticleSystem::with_seed(self.params.current(), seed);
        self.system.set_blend_mode(blend_mode);
        self
    }

    // ========== Parameters ==========

    /// Set a control-panel parameter on the active mode.
    ///
    /// Writing `clearingMode = true` starts a gentle clear. The flag drops on
    /// its own, so writing `false` is rejected as read-only.
    pub fn set_parameter(
        &mut self,
        name: &str,
        value: impl Into<ParamValue>,
    ) -> Result<(), ParameterError> {
        let value = value.into();
        if name == "clearingMode" {
            if !controls::boolean(name, &value)? {
                return Err(ParameterError::ReadOnly(name.to_string()));
            }
            self.begin_gentle_clear();
            return Ok(());
        }

        controls::set_parameter(self.params.current_mut(), name, value)?;
        if name == "blendMode" {
            self.system.set_blend_mode(self.params.current().blend_mode);
        }
        Ok(())
    }

    pub fn get_parameter(&self, name: &str) -> Option<ParamValue> {
        controls::get_parameter(self.params.current(), name)
    }

    /// Control-panel names valid in the active mode.
    pub fn parameter_names(&self) -> Vec<&'static str> {
        controls::parameter_names(self.params.current())
    }

    pub fn parameters(&self) -> &ActiveParameters {
        &self.params
    }

    /// Load a JSON preset into its mode's slot.
    ///
    /// Loading into the active mode takes effect on the next frame.
    pub fn load_preset(&mut self, path: impl AsRef<Path>) -> Result<Mode, PresetError> {
        let params = SimulationParameters::load(path)?;
        let mode = params.mode();
        self.params.replace(params);
        if mode == self.params.active() {
            self.system.set_blend_mode(self.params.current().blend_mode);
        }
        log::info!("loaded {} preset", mode);
        Ok(mode)
    }

    /// Save the active mode's parameters as a JSON preset.
    pub fn save_preset(&self, path: impl AsRef<Path>) -> Result<(), PresetError> {
        self.params.current().save(path)
    }

    // ========== Modes ==========

    #[inline]
    pub fn mode(&self) -> Mode {
        self.params.active()
    }

    /// Activate `mode`'s parameter set. All particles are cleared and the
    /// mode's blend mode is applied.
    pub fn switch_mode(&mut self, mode: Mode) {
        let previous = self.params.active();
        self.params.switch(mode);
        self.system.clear();
        self.system.set_blend_mode(self.params.current().blend_mode);
        self.interaction.cancel();
        log::debug!("mode {} -> {}", previous, mode);
    }

    /// Switch by name. Unknown names select zen.
    pub fn switch_mode_named(&mut self, name: &str) {
        self.switch_mode(Mode::from_name(name));
    }

    #[inline]
    pub fn blend_mode(&self) -> BlendMode {
        self.system.blend_mode()
    }

    // ========== Particles ==========

    /// Emit up to `count` particles at `origin`. Returns how many were emitted.
    pub fn emit(&mut self, count: usize, origin: Vec3) -> usize {
        self.system.emit(count, origin, self.params.current())
    }

    /// Glitch-mode impulse toward `target`. Returns how many particles moved.
    pub fn apply_attraction(&mut self, target: Vec3) -> usize {
        self.system.apply_attraction(target, self.params.current())
    }

    /// Remove every particle immediately.
    pub fn clear(&mut self) {
        self.system.clear();
        log::debug!("particles cleared");
    }

    /// Fade every particle out over the next few seconds.
    pub fn begin_gentle_clear(&mut self) {
        for params in self.params.iter_mut() {
            params.clearing_mode = true;
        }
        self.clear_deadline = Some(self.time.elapsed() + GENTLE_CLEAR_WINDOW);
        log::debug!("gentle clear started, {} particles fading", self.system.len());
    }

    pub fn is_clearing(&self) -> bool {
        self.params.current().clearing_mode
    }

    pub fn system(&self) -> &ParticleSystem {
        &self.system
    }

    // ========== Input ==========

    /// Feed a pointer event and act on whatever it maps to.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Option<Request> {
        let request = self.interaction.handle(event, self.params.current())?;
        self.apply(request);
        Some(request)
    }

    /// Carry out an interaction request.
    pub fn apply(&mut self, request: Request) -> usize {
        match request {
            Request::Emit(Burst { count, origin }) => self.emit(count, origin),
            Request::Attract(target) => self.apply_attraction(target),
        }
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    // ========== Frame loop ==========

    /// Advance one frame on the wall clock.
    pub fn frame(&mut self) {
        let (elapsed, delta) = self.time.update();
        self.tick(elapsed, delta);
    }

    /// Advance one frame by exactly `delta` seconds.
    pub fn step(&mut self, delta: f32) {
        let (elapsed, delta) = self.time.advance(delta);
        self.tick(elapsed, delta);
    }

    fn tick(&mut self, elapsed: f32, delta: f32) {
        self.system.update(delta, elapsed, self.params.current());

        if let Some(deadline) = self.clear_deadline {
            if elapsed >= deadline {
                for params in self.params.iter_mut() {
                    params.clearing_mode = false;
                }
                self.clear_deadline = None;
                log::debug!("gentle clear finished");
            }
        }

        if self.time.window_closed() {
            self.stats = FrameStats {
                fps: self.time.fps(),
                active_particles: self.system.len(),
            };
            log::debug!(
                "{:.0} fps, {} active particles",
                self.stats.fps,
                self.stats.active_particles
            );
        }
    }

    /// The most recently published frame statistics.
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn time(&self) -> &Time {
        &self.time
    }

    /// Clock controls (pause, time scale, fixed delta).
    pub fn time_mut(&mut self) -> &mut Time {
        &mut self.time
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}
