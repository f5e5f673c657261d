//! The particle system: live set, emission, per-frame update and repack.
//!
//! `ParticleSystem` owns every live particle plus the render buffers that
//! mirror them. It does not own parameters; each call receives the active
//! [`SimulationParameters`] so edits made between frames apply immediately.
//!
//! # Frame cycle
//!
//! 1. [`ParticleSystem::update`] advances every particle under the active force
//!    model and drops the ones that expired.
//! 2. The survivors are repacked into slots `0..len` of the render buffers;
//!    every slot from `len` to `count` is hidden.
//!
//! The live set never holds more than `count` particles, and the buffers are
//! always exactly `count` slots long.

use crate::buffers::RenderBuffers;
use crate::emitter::{self, Burst};
use crate::forces::{self, ForceContext};
use crate::lifecycle;
use crate::params::{ForceModel, SimulationParameters};
use crate::particle::Particle;
use crate::visuals::BlendMode;
use glam::Vec3;
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    buffers: RenderBuffers,
    blend_mode: BlendMode,
    rng: SmallRng,
}

impl ParticleSystem {
    /// Empty system sized for `params.count`, seeded from OS entropy.
    pub fn new(params: &SimulationParameters) -> Self {
        Self::with_rng(params, SmallRng::from_entropy())
    }

    /// Empty system with a reproducible random stream.
    pub fn with_seed(params: &SimulationParameters, seed: u64) -> Self {
        Self::with_rng(params, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(params: &SimulationParameters, rng: SmallRng) -> Self {
        Self {
            particles: Vec::with_capacity(params.capacity()),
            buffers: RenderBuffers::new(params.capacity()),
            blend_mode: params.blend_mode,
            rng,
        }
    }

    /// Number of live particles.
    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Live particles in render-slot order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn buffers(&self) -> &RenderBuffers {
        &self.buffers
    }

    #[inline]
    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    /// Set how the render step composites the particles.
    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend_mode = mode;
    }

    /// Set the blend mode by name. Unknown names leave the current mode in place.
    ///
    /// Returns whether the name was recognised.
    pub fn set_blend_mode_named(&mut self, name: &str) -> bool {
        match name.parse::<BlendMode>() {
            Ok(mode) => {
                self.blend_mode = mode;
                true
            }
            Err(_) => false,
        }
    }

    /// Emit up to `count` particles at `origin`, never exceeding `params.count`
    /// live particles. Returns how many were actually emitted.
    pub fn emit(&mut self, count: usize, origin: Vec3, params: &SimulationParameters) -> usize {
        self.sync_capacity(params);

        let room = params.capacity().saturating_sub(self.particles.len());
        let n = count.min(room);
        for _ in 0..n {
            let velocity = emitter::sample_velocity(&mut self.rng, params);
            self.particles
                .push(Particle::spawn(origin, velocity, params, &mut self.rng));
        }
        n
    }

    /// Emit a prepared burst.
    pub fn emit_burst(&mut self, burst: Burst, params: &SimulationParameters) -> usize {
        self.emit(burst.count, burst.origin, params)
    }

    /// Advance every live particle by `dt` seconds, retire the expired ones and
    /// republish the render buffers. `time` is the monotonic clock reading that
    /// drives the sinusoidal force terms.
    pub fn update(&mut self, dt: f32, time: f32, params: &SimulationParameters) {
        self.sync_capacity(params);

        let ctx = ForceContext { dt, time };
        let rng = &mut self.rng;
        self.particles.retain_mut(|p| p.update(params, ctx, rng));

        self.repack(params);
    }

    /// Push an impulse toward `target` onto every particle within the glitch
    /// influence radius. Does nothing outside glitch mode.
    ///
    /// Returns how many particles were affected.
    pub fn apply_attraction(&mut self, target: Vec3, params: &SimulationParameters) -> usize {
        let ForceModel::Glitch(glitch) = &params.forces else {
            return 0;
        };

        let mut affected = 0;
        for p in &mut self.particles {
            if let Some(impulse) =
                forces::attraction_impulse(p.position, target, glitch.influence_radius, glitch.snap_speed)
            {
                p.velocity += impulse;
                affected += 1;
            }
        }
        affected
    }

    /// Drop every particle and zero the buffers immediately.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.buffers.zero();
    }

    /// Match the buffers to `params.count` (never past `MAX_PARTICLES`),
    /// truncating the live set if the capacity shrank.
    fn sync_capacity(&mut self, params: &SimulationParameters) {
        let capacity = params.capacity();
        if self.buffers.capacity() == capacity {
            return;
        }
        log::debug!(
            "resizing particle buffers {} -> {}",
            self.buffers.capacity(),
            capacity
        );
        self.particles.truncate(capacity);
        self.buffers.resize(capacity);
    }

    /// Write live particles to slots `0..len` and hide the rest.
    fn repack(&mut self, params: &SimulationParameters) {
        for (slot, p) in self.particles.iter().enumerate() {
            let ratio = p.life_ratio();
            let color = params
                .start_color
                .lerp(params.end_color, lifecycle::color_lerp_factor(ratio));
            let size = p.size * lifecycle::size_multiplier(ratio, params.ghost_duration);

            self.buffers
                .write(slot, p.position, color, size, p.alpha(params));
        }
        self.buffers.hide_from(self.particles.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{FluidForces, GlitchForces, Mode, MAX_PARTICLES};

    fn small(mode: Mode, count: usize) -> SimulationParameters {
        let mut params = SimulationParameters::for_mode(mode);
        params.count = count;
        params
    }

    #[test]
    fn test_emit_caps_at_count() {
        let params = small(Mode::Zen, 10);
        let mut system = ParticleSystem::with_seed(&params, 1);

        assert_eq!(system.emit(7, Vec3::ZERO, &params), 7);
        assert_eq!(system.emit(7, Vec3::ZERO, &params), 3);
        assert_eq!(system.emit(7, Vec3::ZERO, &params), 0);
        assert_eq!(system.len(), 10);
    }

    #[test]
    fn test_emit_zero_is_noop() {
        let params = small(Mode::Zen, 10);
        let mut system = ParticleSystem::with_seed(&params, 1);
        assert_eq!(system.emit(0, Vec3::ONE, &params), 0);
        assert!(system.is_empty());
    }

    #[test]
    fn test_emitted_particles_start_at_origin() {
        let params = small(Mode::Fluid, 5);
        let mut system = ParticleSystem::with_seed(&params, 2);
        let origin = Vec3::new(1.0, 2.0, 3.0);
        system.emit(5, origin, &params);

        assert!(system.particles().iter().all(|p| p.position == origin));
    }

    #[test]
    fn test_update_retires_and_hides_tail() {
        let mut params = small(Mode::Fluid, 8);
        params.lifespan = 1.0;
        let mut system = ParticleSystem::with_seed(&params, 3);
        system.emit(8, Vec3::ZERO, &params);

        system.update(0.5, 0.0, &params);
        assert_eq!(system.len(), 8);
        assert!(system.buffers().alphas().iter().all(|&a| a > 0.0));

        system.update(0.5, 0.5, &params);
        assert!(system.is_empty());
        assert!(system.buffers().alphas().iter().all(|&a| a == 0.0));
        assert!(system.buffers().positions().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_repack_colors_shift_late() {
        let mut params = small(Mode::Fluid, 2);
        params.lifespan = 10.0;
        params.start_color = Vec3::ONE;
        params.end_color = Vec3::ZERO;
        let mut system = ParticleSystem::with_seed(&params, 4);
        system.emit(1, Vec3::ZERO, &params);

        // ratio 0.5
        system.update(5.0, 0.0, &params);
        assert_eq!(system.buffers().color(0), Some(Vec3::ONE));

        // ratio 0.15, halfway through the shift
        system.update(3.5, 0.0, &params);
        let c = system.buffers().color(0).unwrap();
        assert!((c.x - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_sizes_are_base_size() {
        let params = small(Mode::Zen, 4);
        let mut system = ParticleSystem::with_seed(&params, 5);
        system.emit(4, Vec3::ZERO, &params);
        system.update(0.016, 0.0, &params);

        for (slot, p) in system.particles().iter().enumerate() {
            assert_eq!(system.buffers().sizes()[slot], p.size);
        }
    }

    #[test]
    fn test_clear_zeroes_everything() {
        let params = small(Mode::Zen, 6);
        let mut system = ParticleSystem::with_seed(&params, 6);
        system.emit(6, Vec3::ONE, &params);
        system.update(0.1, 0.0, &params);

        system.clear();
        assert!(system.is_empty());
        assert!(system.buffers().alphas().iter().all(|&a| a == 0.0));
        assert!(system.buffers().positions().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_capacity_follows_count() {
        let mut params = small(Mode::Zen, 10);
        let mut system = ParticleSystem::with_seed(&params, 7);
        system.emit(10, Vec3::ZERO, &params);

        params.count = 4;
        system.update(0.01, 0.0, &params);
        assert_eq!(system.len(), 4);
        assert_eq!(system.buffers().capacity(), 4);

        params.count = 12;
        system.update(0.01, 0.0, &params);
        assert_eq!(system.buffers().capacity(), 12);
        assert_eq!(system.buffers().alphas()[4..].iter().filter(|&&a| a != 0.0).count(), 0);
    }

    #[test]
    fn test_oversized_count_is_capped() {
        let mut params = small(Mode::Fluid, 8);
        let mut system = ParticleSystem::with_seed(&params, 11);

        params.count = usize::MAX;
        system.update(0.016, 0.0, &params);
        assert_eq!(system.buffers().capacity(), MAX_PARTICLES);

        params.count = 8;
        system.emit(100, Vec3::ZERO, &params);
        assert_eq!(system.len(), 8);
        assert_eq!(system.buffers().capacity(), 8);
    }

    #[test]
    fn test_zero_lifespan_never_publishes_nan() {
        let mut params = small(Mode::Zen, 4);
        params.lifespan = 0.0;
        let mut system = ParticleSystem::with_seed(&params, 12);
        system.emit(4, Vec3::ZERO, &params);
        system.update(0.016, 0.016, &params);

        let buffers = system.buffers();
        assert!(buffers.colors().iter().all(|c| c.is_finite()));
        assert!(buffers.sizes().iter().all(|s| s.is_finite()));
        assert!(buffers.alphas().iter().all(|a| a.is_finite()));
    }

    #[test]
    fn test_attraction_only_in_glitch() {
        let mut params = small(Mode::Fluid, 4);
        params.forces = ForceModel::Fluid(FluidForces::default());
        let mut system = ParticleSystem::with_seed(&params, 8);
        system.emit(4, Vec3::ZERO, &params);
        assert_eq!(system.apply_attraction(Vec3::X, &params), 0);
    }

    #[test]
    fn test_attraction_respects_radius() {
        let mut params = small(Mode::Glitch, 4);
        params.initial_speed = 0.0;
        params.forces = ForceModel::Glitch(GlitchForces {
            anchor_strength: 0.0,
            damping: 1.0,
            jitter: 0.0,
            influence_radius: 2.0,
            snap_speed: 3.0,
        });
        let mut system = ParticleSystem::with_seed(&params, 9);
        system.emit(2, Vec3::ZERO, &params);
        system.emit(2, Vec3::new(10.0, 0.0, 0.0), &params);

        let affected = system.apply_attraction(Vec3::new(1.0, 0.0, 0.0), &params);
        assert_eq!(affected, 2);
        assert_eq!(system.particles()[0].velocity, Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(system.particles()[3].velocity, Vec3::ZERO);
    }

    #[test]
    fn test_blend_mode_by_name() {
        let params = small(Mode::Zen, 1);
        let mut system = ParticleSystem::with_seed(&params, 10);
        assert_eq!(system.blend_mode(), BlendMode::Subtractive);

        assert!(system.set_blend_mode_named("multiply"));
        assert!(!system.set_blend_mode_named("overlay"));
        assert_eq!(system.blend_mode(), BlendMode::Multiply);
    }
}
