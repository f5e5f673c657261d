//! # Driftfield
//!
//! An interactive particle field with three swappable physics modes.
//!
//! Driftfield owns the simulation side: a bounded set of live particles, the
//! force model that moves them, and four flat render buffers that mirror the
//! live set every frame. Rendering, windowing and the control panel live in
//! the host; they feed parameter edits and pointer events in and read the
//! buffers back out.
//!
//! ## Quick Start
//!
//! ```ignore
//! use driftfield::prelude::*;
//!
//! let mut sim = Simulation::new().with_mode(Mode::Zen);
//! sim.emit(200, Vec3::ZERO);
//!
//! for _ in 0..600 {
//!     sim.step(1.0 / 60.0);
//! }
//!
//! let buffers = sim.system().buffers();
//! let positions: &[f32] = buffers.positions();
//! ```
//!
//! ## Modes
//!
//! | Mode | Motion | Expiry |
//! |------|--------|--------|
//! | `zen` | gravity, wind and a soft sinusoidal sway | after a ghost fade of `ghostDuration` seconds |
//! | `fluid` | viscous drag, buoyancy, swirl and diffusion | when life reaches zero |
//! | `glitch` | pulled back to the origin, jittered and damped; taps snap nearby particles | when life reaches zero |
//!
//! Each mode keeps its own [`SimulationParameters`]. Switching modes swaps the
//! whole set and clears the field, so returning to a mode finds it as it was
//! left.
//!
//! ## Parameters
//!
//! The control panel addresses parameters by name through
//! [`Simulation::set_parameter`]:
//!
//! ```ignore
//! sim.set_parameter("lifespan", 30.0)?;
//! sim.set_parameter("endColor", "#ff00ff")?;
//! sim.set_parameter("blendMode", "additive")?;
//! ```
//!
//! Presets are plain JSON files; see [`SimulationParameters::load`].
//!
//! ## Render buffers
//!
//! | Buffer | Layout |
//! |--------|--------|
//! | positions | `[x, y, z]` per slot |
//! | colors | `[r, g, b]` per slot |
//! | sizes | one `f32` per slot |
//! | alphas | one `f32` per slot |
//!
//! Slots `0..len` hold live particles. Every slot after that is zeroed each
//! frame.

pub mod buffers;
pub mod controls;
pub mod emitter;
pub mod error;
pub mod forces;
pub mod input;
pub mod lifecycle;
pub mod params;
pub mod particle;
mod simulation;
pub mod system;
pub mod time;
pub mod visuals;

pub use buffers::RenderBuffers;
pub use controls::ParamValue;
pub use emitter::Burst;
pub use error::{ParameterError, PresetError, UnknownVisual};
pub use glam::{Vec2, Vec3};
pub use input::{Interaction, PointerEvent, PointerKind, PointerPhase, Request};
pub use params::{
    ActiveParameters, FluidForces, ForceModel, GlitchForces, Mode, SimulationParameters, ZenForces,
};
pub use particle::Particle;
pub use simulation::{FrameStats, Simulation, GENTLE_CLEAR_WINDOW};
pub use system::ParticleSystem;
pub use time::Time;
pub use visuals::{BlendMode, ParticleShape};

/// Convenient imports for driving a simulation.
///
/// ```ignore
/// use driftfield::prelude::*;
/// ```
pub mod prelude {
    pub use crate::controls::ParamValue;
    pub use crate::input::{PointerEvent, PointerKind, Request};
    pub use crate::params::{Mode, SimulationParameters};
    pub use crate::simulation::{FrameStats, Simulation};
    pub use crate::visuals::{BlendMode, ParticleShape};
    pub use glam::{Vec2, Vec3};
}
