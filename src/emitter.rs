//! Emission requests and initial-velocity sampling.
//!
//! Particles are born in bursts: a tap emits `burstSize` particles, a drag
//! emits a short trail burst every time the throttle allows it. All particles
//! of a burst share an origin and fly out along the forward (+Z) axis inside
//! the configured spread.
//!
//! # Velocity
//!
//! Yaw and pitch are drawn independently from `[-spread/2, spread/2]`, so
//! `spreadAngle` is the full opening of the emission fan:
//!
//! ```text
//! dir = (sin(yaw) * cos(pitch), sin(pitch), cos(yaw) * cos(pitch))
//! speed = initialSpeed * uniform(0.5, 1.0)
//! ```

use crate::params::SimulationParameters;
use glam::Vec3;
use rand::Rng;

/// A request to emit particles at a world-space point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Burst {
    /// Number of particles requested. Zero is a no-op.
    pub count: usize,
    /// World-space origin shared by every particle in the burst.
    pub origin: Vec3,
}

impl Burst {
    pub fn new(count: usize, origin: Vec3) -> Self {
        Self { count, origin }
    }

    /// A tap burst sized by `burstSize`.
    pub fn tap(params: &SimulationParameters, origin: Vec3) -> Self {
        Self::new(params.burst_size, origin)
    }

    /// A drag-trail burst sized by `min(trailDensity, emissionRate)`.
    pub fn trail(params: &SimulationParameters, origin: Vec3) -> Self {
        Self::new(params.trail_burst(), origin)
    }
}

/// Unit direction inside the emission fan around +Z.
pub fn sample_direction<R: Rng + ?Sized>(rng: &mut R, spread_degrees: f32) -> Vec3 {
    let spread = spread_degrees.to_radians();
    let yaw = (rng.gen::<f32>() - 0.5) * spread;
    let pitch = (rng.gen::<f32>() - 0.5) * spread;

    Vec3::new(yaw.sin() * pitch.cos(), pitch.sin(), yaw.cos() * pitch.cos())
}

/// Initial velocity for a newly emitted particle.
pub fn sample_velocity<R: Rng + ?Sized>(rng: &mut R, params: &SimulationParameters) -> Vec3 {
    let direction = sample_direction(rng, params.spread_angle);
    let speed = params.initial_speed * (0.5 + rng.gen::<f32>() * 0.5);
    direction * speed
}
