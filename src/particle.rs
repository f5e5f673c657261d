//! A single simulated particle.
//!
//! Particles own their kinematic state outright. Parameters are passed into
//! every call rather than stored, so a control-panel edit is seen by each
//! particle on the next frame.

use crate::forces::ForceContext;
use crate::lifecycle;
use crate::params::{Mode, SimulationParameters};
use glam::Vec3;
use rand::Rng;

/// Life a particle is clamped to when a gentle clear reaches it.
pub const CLEARING_LIFE_CAP: f32 = 5.0;

/// Range of the per-particle turbulence phase seed.
const PHASE_RANGE: f32 = 1000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Seconds of life remaining; negative during the zen ghost phase.
    pub life: f32,
    /// Lifespan snapshot taken at birth.
    pub max_life: f32,
    /// Base render size, fixed at birth.
    pub size: f32,
    /// Random phase seed for the sinusoidal force terms, fixed at birth.
    pub turbulence_offset: f32,
    /// Set once when a gentle clear first reaches this particle.
    pub clearing: bool,
    /// Life remaining at the moment clearing began.
    pub clear_start_life: Option<f32>,
}

impl Particle {
    /// Spawn a particle with the current lifespan and a randomised size and phase.
    pub fn spawn<R: Rng + ?Sized>(
        position: Vec3,
        velocity: Vec3,
        params: &SimulationParameters,
        rng: &mut R,
    ) -> Self {
        Self {
            position,
            velocity,
            life: params.lifespan,
            max_life: params.lifespan,
            size: params.size + (rng.gen::<f32>() - 0.5) * params.size_variation,
            turbulence_offset: rng.gen::<f32>() * PHASE_RANGE,
            clearing: false,
            clear_start_life: None,
        }
    }

    /// Advance one step. Returns `false` once the particle has expired.
    ///
    /// Zen particles live on for `ghost_duration` seconds after nominal death;
    /// all other modes expire as soon as life reaches zero.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        params: &SimulationParameters,
        ctx: ForceContext,
        rng: &mut R,
    ) -> bool {
        if params.clearing_mode && !self.clearing {
            self.clearing = true;
            self.clear_start_life = Some(self.life);
            self.life = self.life.min(CLEARING_LIFE_CAP);
        }

        self.velocity = params
            .forces
            .step(self.position, self.velocity, self.turbulence_offset, ctx, rng);

        self.position += self.velocity * ctx.dt;
        self.life -= ctx.dt;

        self.is_alive(params)
    }

    /// Whether the particle is still inside its mode's lifetime.
    pub fn is_alive(&self, params: &SimulationParameters) -> bool {
        match params.mode() {
            Mode::Zen => self.life > -params.ghost_duration,
            Mode::Fluid | Mode::Glitch => self.life > 0.0,
        }
    }

    /// Remaining life over life at birth. Negative during the ghost phase.
    ///
    /// A particle born with no lifespan reports 0, as if at nominal death.
    #[inline]
    pub fn life_ratio(&self) -> f32 {
        if self.max_life > 0.0 {
            self.life / self.max_life
        } else {
            0.0
        }
    }

    pub fn alpha(&self, params: &SimulationParameters) -> f32 {
        match params.mode() {
            Mode::Zen => lifecycle::zen_alpha(
                params.opacity,
                self.life_ratio(),
                self.life,
                params.ghost_duration,
            ),
            Mode::Fluid | Mode::Glitch => lifecycle::linear_alpha(params.opacity, self.life_ratio()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{FluidForces, ForceModel};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn still_fluid(lifespan: f32) -> SimulationParameters {
        let mut params = SimulationParameters::fluid();
        params.lifespan = lifespan;
        params.forces = ForceModel::Fluid(FluidForces {
            viscosity: 1.0,
            buoyancy: 0.0,
            diffusion_rate: 0.0,
            swirl_intensity: 0.0,
        });
        params
    }

    fn ctx(dt: f32) -> ForceContext {
        ForceContext { dt, time: 0.0 }
    }

    #[test]
    fn test_spawn_snapshots_lifespan() {
        let mut rng = SmallRng::seed_from_u64(11);
        let params = SimulationParameters::zen();
        let p = Particle::spawn(Vec3::ONE, Vec3::Z, &params, &mut rng);

        assert_eq!(p.life, 120.0);
        assert_eq!(p.max_life, 120.0);
        assert!((p.size - params.size).abs() <= params.size_variation * 0.5);
        assert!((0.0..PHASE_RANGE).contains(&p.turbulence_offset));
        assert!(!p.clearing);
    }

    #[test]
    fn test_integrates_position() {
        let mut rng = SmallRng::seed_from_u64(2);
        let params = still_fluid(10.0);
        let mut p = Particle::spawn(Vec3::ZERO, Vec3::new(2.0, 0.0, -4.0), &params, &mut rng);

        assert!(p.update(&params, ctx(0.5), &mut rng));
        assert_eq!(p.position, Vec3::new(1.0, 0.0, -2.0));
        assert_eq!(p.life, 9.5);
    }

    #[test]
    fn test_non_zen_expires_at_zero() {
        let mut rng = SmallRng::seed_from_u64(2);
        let params = still_fluid(1.0);
        let mut p = Particle::spawn(Vec3::ZERO, Vec3::ZERO, &params, &mut rng);

        assert!(p.update(&params, ctx(0.5), &mut rng));
        assert!(!p.update(&params, ctx(0.5), &mut rng));
        assert_eq!(p.life, 0.0);
    }

    #[test]
    fn test_zen_survives_ghost_phase() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut params = SimulationParameters::zen();
        params.lifespan = 1.0;
        params.ghost_duration = 1.0;
        let mut p = Particle::spawn(Vec3::ZERO, Vec3::ZERO, &params, &mut rng);

        assert!(p.update(&params, ctx(0.5), &mut rng));
        assert!(p.update(&params, ctx(0.5), &mut rng)); // life 0
        assert!(p.update(&params, ctx(0.5), &mut rng)); // life -0.5
        assert!(p.life_ratio() < 0.0);
        assert!(p.alpha(&params) > 0.0);
        assert!(!p.update(&params, ctx(0.5), &mut rng)); // life -1
    }

    #[test]
    fn test_clearing_caps_life_once() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut params = still_fluid(100.0);
        let mut p = Particle::spawn(Vec3::ZERO, Vec3::ZERO, &params, &mut rng);

        params.clearing_mode = true;
        assert!(p.update(&params, ctx(1.0), &mut rng));
        assert!(p.clearing);
        assert_eq!(p.clear_start_life, Some(100.0));
        assert_eq!(p.life, 4.0);

        // Already clearing: no second clamp or snapshot.
        assert!(p.update(&params, ctx(1.0), &mut rng));
        assert_eq!(p.clear_start_life, Some(100.0));
        assert_eq!(p.life, 3.0);
    }

    #[test]
    fn test_clearing_leaves_short_life_alone() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut params = still_fluid(2.0);
        let mut p = Particle::spawn(Vec3::ZERO, Vec3::ZERO, &params, &mut rng);

        params.clearing_mode = true;
        p.update(&params, ctx(0.5), &mut rng);
        assert_eq!(p.life, 1.5);
        // max_life is untouched so the ratio keeps its scale
        assert_eq!(p.max_life, 2.0);
    }

    #[test]
    fn test_zero_lifespan_ratio_is_finite() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut params = still_fluid(0.0);
        params.start_color = Vec3::ONE;
        let mut p = Particle::spawn(Vec3::ZERO, Vec3::ZERO, &params, &mut rng);

        assert!(!p.update(&params, ctx(0.016), &mut rng));
        assert_eq!(p.life_ratio(), 0.0);
        assert_eq!(lifecycle::color_lerp_factor(p.life_ratio()), 1.0);
        assert_eq!(p.alpha(&params), 0.0);
    }

    #[test]
    fn test_linear_alpha_for_fluid() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut params = still_fluid(4.0);
        params.opacity = 1.0;
        let mut p = Particle::spawn(Vec3::ZERO, Vec3::ZERO, &params, &mut rng);
        p.life = 1.0;
        assert_eq!(p.alpha(&params), 0.25);
        p.life = -1.0;
        assert_eq!(p.alpha(&params), 0.0);
    }
}
