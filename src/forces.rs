//! The three force models.
//!
//! Each model maps a particle's current velocity (plus position or phase seed
//! where needed) to its new velocity for one step. The operations are applied
//! in a fixed order to the same vector, so reordering them changes results.
//!
//! | Model | Effect |
//! |-------|--------|
//! | [`zen`] | gravity, air drag, wind, sinusoidal turbulence |
//! | [`fluid`] | buoyancy, viscous drag, random diffusion, swirl |
//! | [`glitch`] | spring toward the origin, random jitter, multiplicative damping |
//!
//! Pointer attraction in glitch mode is a separate impulse, see [`attraction_impulse`].

use crate::params::{FluidForces, ForceModel, GlitchForces, ZenForces};
use glam::Vec3;
use rand::Rng;

/// Timing for one force step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceContext {
    /// Step length in seconds.
    pub dt: f32,
    /// Monotonic clock reading in seconds, drives the sinusoidal terms.
    pub time: f32,
}

/// Sinusoidal sway shared by zen turbulence and fluid swirl.
///
/// X follows `sin(time + phase)`, Z follows `cos(time + 1.1 * phase)`.
#[inline]
fn sway(phase: f32, strength: f32, ctx: ForceContext) -> Vec3 {
    Vec3::new(
        (ctx.time + phase).sin() * strength * ctx.dt,
        0.0,
        (ctx.time + phase * 1.1).cos() * strength * ctx.dt,
    )
}

/// Uniform per-axis noise in `[-0.5, 0.5) * scale`.
#[inline]
fn jitter<R: Rng + ?Sized>(rng: &mut R, scale: f32) -> Vec3 {
    Vec3::new(
        rng.gen::<f32>() - 0.5,
        rng.gen::<f32>() - 0.5,
        rng.gen::<f32>() - 0.5,
    ) * scale
}

/// Zen: gravity, then air drag, then wind, then turbulence.
pub fn zen(velocity: Vec3, phase: f32, forces: &ZenForces, ctx: ForceContext) -> Vec3 {
    let mut v = velocity;
    v.y += forces.gravity * ctx.dt;
    v *= 1.0 - forces.air_resistance * ctx.dt;
    v += forces.wind() * ctx.dt;
    v += sway(phase, forces.turbulence, ctx);
    v
}

/// Fluid: buoyancy, then viscous drag, then diffusion, then swirl.
///
/// A viscosity of 1.0 leaves velocity untouched by the drag term.
pub fn fluid<R: Rng + ?Sized>(
    velocity: Vec3,
    phase: f32,
    forces: &FluidForces,
    ctx: ForceContext,
    rng: &mut R,
) -> Vec3 {
    let mut v = velocity;
    v.y += forces.buoyancy * ctx.dt;
    v *= 1.0 - (1.0 - forces.viscosity) * ctx.dt;
    v += jitter(rng, forces.diffusion_rate * ctx.dt);
    v += sway(phase, forces.swirl_intensity, ctx);
    v
}

/// Glitch: pull toward the origin, then jitter, then damping.
pub fn glitch<R: Rng + ?Sized>(
    velocity: Vec3,
    position: Vec3,
    forces: &GlitchForces,
    ctx: ForceContext,
    rng: &mut R,
) -> Vec3 {
    let mut v = velocity;
    v += -position * (forces.anchor_strength * ctx.dt);
    v += jitter(rng, forces.jitter * ctx.dt);
    v * forces.damping
}

impl ForceModel {
    /// Run this model's step for one particle.
    pub fn step<R: Rng + ?Sized>(
        &self,
        position: Vec3,
        velocity: Vec3,
        phase: f32,
        ctx: ForceContext,
        rng: &mut R,
    ) -> Vec3 {
        match self {
            ForceModel::Zen(f) => zen(velocity, phase, f, ctx),
            ForceModel::Fluid(f) => fluid(velocity, phase, f, ctx, rng),
            ForceModel::Glitch(f) => glitch(velocity, position, f, ctx, rng),
        }
    }
}

/// Impulse pulling a particle at `position` toward `target`.
///
/// Returns `None` outside `radius` (the boundary itself is outside). A particle
/// sitting exactly on the target gets a zero impulse.
pub fn attraction_impulse(position: Vec3, target: Vec3, radius: f32, snap_speed: f32) -> Option<Vec3> {
    if position.distance_squared(target) < radius * radius {
        Some((target - position).normalize_or_zero() * snap_speed)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn ctx(dt: f32) -> ForceContext {
        ForceContext { dt, time: 3.7 }
    }

    #[test]
    fn test_zen_without_coefficients_is_identity() {
        let forces = ZenForces {
            gravity: 0.0,
            air_resistance: 0.0,
            wind_x: 0.0,
            wind_y: 0.0,
            wind_z: 0.0,
            turbulence: 0.0,
        };
        let v = Vec3::new(1.0, -2.0, 0.5);
        assert_eq!(zen(v, 12.0, &forces, ctx(0.016)), v);
    }

    #[test]
    fn test_zen_applies_gravity_before_drag() {
        let forces = ZenForces {
            gravity: -10.0,
            air_resistance: 0.5,
            wind_x: 0.0,
            wind_y: 0.0,
            wind_z: 0.0,
            turbulence: 0.0,
        };
        let v = zen(Vec3::ZERO, 0.0, &forces, ctx(1.0));
        // (0 - 10) * (1 - 0.5)
        assert_eq!(v, Vec3::new(0.0, -5.0, 0.0));
    }

    #[test]
    fn test_zen_turbulence_terms() {
        let forces = ZenForces {
            gravity: 0.0,
            air_resistance: 0.0,
            wind_x: 0.0,
            wind_y: 0.0,
            wind_z: 0.0,
            turbulence: 2.0,
        };
        let c = ForceContext { dt: 0.5, time: 1.0 };
        let v = zen(Vec3::ZERO, 0.25, &forces, c);
        assert!((v.x - (1.25f32).sin()).abs() < 1e-6);
        assert_eq!(v.y, 0.0);
        assert!((v.z - (1.0f32 + 0.25 * 1.1).cos()).abs() < 1e-6);
    }

    #[test]
    fn test_fluid_neutral_coefficients_are_identity() {
        let mut rng = SmallRng::seed_from_u64(7);
        let forces = FluidForces {
            viscosity: 1.0,
            buoyancy: 0.0,
            diffusion_rate: 0.0,
            swirl_intensity: 0.0,
        };
        let v = Vec3::new(3.0, 1.0, -4.0);
        for _ in 0..10 {
            assert_eq!(fluid(v, 99.0, &forces, ctx(0.05), &mut rng), v);
        }
    }

    #[test]
    fn test_fluid_diffusion_is_bounded() {
        let mut rng = SmallRng::seed_from_u64(1);
        let forces = FluidForces {
            viscosity: 1.0,
            buoyancy: 0.0,
            diffusion_rate: 4.0,
            swirl_intensity: 0.0,
        };
        for _ in 0..200 {
            let v = fluid(Vec3::ZERO, 0.0, &forces, ctx(0.5), &mut rng);
            // 0.5 * 4.0 * 0.5
            assert!(v.abs().max_element() <= 1.0);
        }
    }

    #[test]
    fn test_glitch_zero_damping_stops_dead() {
        let mut rng = SmallRng::seed_from_u64(3);
        let forces = GlitchForces {
            anchor_strength: 0.0,
            damping: 0.0,
            jitter: 0.0,
            influence_radius: 15.0,
            snap_speed: 3.0,
        };
        let v = glitch(
            Vec3::new(100.0, -50.0, 7.0),
            Vec3::new(4.0, 4.0, 4.0),
            &forces,
            ctx(0.016),
            &mut rng,
        );
        assert_eq!(v, Vec3::ZERO);
    }

    #[test]
    fn test_glitch_anchor_pulls_toward_origin() {
        let mut rng = SmallRng::seed_from_u64(3);
        let forces = GlitchForces {
            anchor_strength: 2.0,
            damping: 1.0,
            jitter: 0.0,
            influence_radius: 15.0,
            snap_speed: 3.0,
        };
        let v = glitch(Vec3::ZERO, Vec3::new(5.0, 0.0, -1.0), &forces, ctx(0.5), &mut rng);
        assert_eq!(v, Vec3::new(-5.0, 0.0, 1.0));
    }

    #[test]
    fn test_attraction_inside_and_outside_radius() {
        let target = Vec3::new(1.0, 0.0, 0.0);

        let inside = attraction_impulse(Vec3::new(-1.0, 0.0, 0.0), target, 3.0, 2.0);
        assert_eq!(inside, Some(Vec3::new(2.0, 0.0, 0.0)));

        assert_eq!(attraction_impulse(Vec3::new(4.0, 0.0, 0.0), target, 3.0, 2.0), None);
        assert_eq!(attraction_impulse(target, target, 3.0, 2.0), Some(Vec3::ZERO));
    }
}
