//! Flat name-to-value binding for the control panel.
//!
//! The control panel addresses parameters by the same camelCase names its
//! inputs use (`opacity`, `windX`, `startColor`, ...). Every name maps straight
//! onto a field of the active [`SimulationParameters`]; there is no derived
//! state, so a change is picked up by the next frame.
//!
//! ```ignore
//! sim.set_parameter("opacity", 0.4)?;
//! sim.set_parameter("count", 5000)?;
//! sim.set_parameter("endColor", "#ff00aa")?;
//! sim.set_parameter("blendMode", "additive")?;
//! ```

use crate::error::ParameterError;
use crate::params::{ForceModel, SimulationParameters, MAX_PARTICLES, MIN_LIFESPAN};
use crate::visuals::{BlendMode, ParticleShape};
use glam::Vec3;

/// A value travelling between the control panel and the parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Number(f32),
    Color(Vec3),
    Bool(bool),
    Text(String),
}

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        ParamValue::Number(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Number(v as f32)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Number(v as f32)
    }
}

impl From<usize> for ParamValue {
    fn from(v: usize) -> Self {
        ParamValue::Number(v as f32)
    }
}

impl From<Vec3> for ParamValue {
    fn from(v: Vec3) -> Self {
        ParamValue::Color(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

/// Names shared by every mode.
const SHARED_NAMES: &[&str] = &[
    "mode",
    "count",
    "emissionRate",
    "burstSize",
    "trailDensity",
    "initialSpeed",
    "spreadAngle",
    "shape",
    "startColor",
    "endColor",
    "size",
    "sizeVariation",
    "opacity",
    "blendMode",
    "lifespan",
    "ghostDuration",
    "clearingMode",
];

const ZEN_NAMES: &[&str] = &["gravity", "airResistance", "windX", "windY", "windZ", "turbulence"];
const FLUID_NAMES: &[&str] = &["viscosity", "buoyancy", "diffusionRate", "swirlIntensity"];
const GLITCH_NAMES: &[&str] = &[
    "attractionForce",
    "anchorStrength",
    "damping",
    "jitter",
    "glitchJitter",
    "influenceRadius",
    "snapSpeed",
];

/// Every name the binding accepts for these parameters, aliases included.
pub fn parameter_names(params: &SimulationParameters) -> Vec<&'static str> {
    let specific = match params.forces {
        ForceModel::Zen(_) => ZEN_NAMES,
        ForceModel::Fluid(_) => FLUID_NAMES,
        ForceModel::Glitch(_) => GLITCH_NAMES,
    };
    SHARED_NAMES.iter().chain(specific).copied().collect()
}

/// Read a parameter by its control-panel name.
pub fn get_parameter(params: &SimulationParameters, name: &str) -> Option<ParamValue> {
    use ParamValue::*;

    let value = match name {
        "mode" => Text(params.mode().as_str().to_string()),
        "count" => Number(params.count as f32),
        "emissionRate" => Number(params.emission_rate),
        "burstSize" => Number(params.burst_size as f32),
        "trailDensity" => Number(params.trail_density as f32),
        "initialSpeed" => Number(params.initial_speed),
        "spreadAngle" => Number(params.spread_angle),
        "shape" => Text(params.shape.as_str().to_string()),
        "startColor" => Color(params.start_color),
        "endColor" => Color(params.end_color),
        "size" => Number(params.size),
        "sizeVariation" => Number(params.size_variation),
        "opacity" => Number(params.opacity),
        "blendMode" => Text(params.blend_mode.as_str().to_string()),
        "lifespan" => Number(params.lifespan),
        "ghostDuration" => Number(params.ghost_duration),
        "clearingMode" => Bool(params.clearing_mode),
        _ => return get_force_parameter(&params.forces, name),
    };
    Some(value)
}

fn get_force_parameter(forces: &ForceModel, name: &str) -> Option<ParamValue> {
    let v = match (forces, name) {
        (ForceModel::Zen(z), "gravity") => z.gravity,
        (ForceModel::Zen(z), "airResistance") => z.air_resistance,
        (ForceModel::Zen(z), "windX") => z.wind_x,
        (ForceModel::Zen(z), "windY") => z.wind_y,
        (ForceModel::Zen(z), "windZ") => z.wind_z,
        (ForceModel::Zen(z), "turbulence") => z.turbulence,
        (ForceModel::Fluid(f), "viscosity") => f.viscosity,
        (ForceModel::Fluid(f), "buoyancy") => f.buoyancy,
        (ForceModel::Fluid(f), "diffusionRate") => f.diffusion_rate,
        (ForceModel::Fluid(f), "swirlIntensity") => f.swirl_intensity,
        (ForceModel::Glitch(g), "attractionForce" | "anchorStrength") => g.anchor_strength,
        (ForceModel::Glitch(g), "damping") => g.damping,
        (ForceModel::Glitch(g), "jitter" | "glitchJitter") => g.jitter,
        (ForceModel::Glitch(g), "influenceRadius") => g.influence_radius,
        (ForceModel::Glitch(g), "snapSpeed") => g.snap_speed,
        _ => return None,
    };
    Some(ParamValue::Number(v))
}

/// Write a parameter by its control-panel name.
///
/// On error nothing is modified.
pub fn set_parameter(
    params: &mut SimulationParameters,
    name: &str,
    value: ParamValue,
) -> Result<(), ParameterError> {
    match name {
        "mode" | "clearingMode" => return Err(ParameterError::ReadOnly(name.to_string())),
        "count" => params.count = count(name, &value)?,
        "emissionRate" => params.emission_rate = number(name, &value)?,
        "burstSize" => params.burst_size = count(name, &value)?,
        "trailDensity" => params.trail_density = count(name, &value)?,
        "initialSpeed" => params.initial_speed = number(name, &value)?,
        "spreadAngle" => params.spread_angle = number(name, &value)?,
        "shape" => params.shape = parse_text::<ParticleShape>(name, &value)?,
        "startColor" => params.start_color = color(name, &value)?,
        "endColor" => params.end_color = color(name, &value)?,
        "size" => params.size = number(name, &value)?,
        "sizeVariation" => params.size_variation = number(name, &value)?,
        "opacity" => params.opacity = number(name, &value)?,
        "blendMode" => params.blend_mode = parse_text::<BlendMode>(name, &value)?,
        "lifespan" => params.lifespan = number(name, &value)?.max(MIN_LIFESPAN),
        "ghostDuration" => params.ghost_duration = number(name, &value)?,
        _ => {
            let mode = params.mode();
            let slot = force_slot(&mut params.forces, name).ok_or_else(|| {
                ParameterError::Unknown {
                    name: name.to_string(),
                    mode,
                }
            })?;
            *slot = number(name, &value)?;
        }
    }
    Ok(())
}

fn force_slot<'a>(forces: &'a mut ForceModel, name: &str) -> Option<&'a mut f32> {
    let slot = match (forces, name) {
        (ForceModel::Zen(z), "gravity") => &mut z.gravity,
        (ForceModel::Zen(z), "airResistance") => &mut z.air_resistance,
        (ForceModel::Zen(z), "windX") => &mut z.wind_x,
        (ForceModel::Zen(z), "windY") => &mut z.wind_y,
        (ForceModel::Zen(z), "windZ") => &mut z.wind_z,
        (ForceModel::Zen(z), "turbulence") => &mut z.turbulence,
        (ForceModel::Fluid(f), "viscosity") => &mut f.viscosity,
        (ForceModel::Fluid(f), "buoyancy") => &mut f.buoyancy,
        (ForceModel::Fluid(f), "diffusionRate") => &mut f.diffusion_rate,
        (ForceModel::Fluid(f), "swirlIntensity") => &mut f.swirl_intensity,
        (ForceModel::Glitch(g), "attractionForce" | "anchorStrength") => &mut g.anchor_strength,
        (ForceModel::Glitch(g), "damping") => &mut g.damping,
        (ForceModel::Glitch(g), "jitter" | "glitchJitter") => &mut g.jitter,
        (ForceModel::Glitch(g), "influenceRadius") => &mut g.influence_radius,
        (ForceModel::Glitch(g), "snapSpeed") => &mut g.snap_speed,
        _ => return None,
    };
    Some(slot)
}

fn invalid(name: &str, value: impl ToString) -> ParameterError {
    ParameterError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
    }
}

/// Numbers may arrive as text, the way range inputs report them.
fn number(name: &str, value: &ParamValue) -> Result<f32, ParameterError> {
    let v = match value {
        ParamValue::Number(v) => *v,
        ParamValue::Text(s) => s.trim().parse::<f32>().map_err(|_| invalid(name, s))?,
        _ => {
            return Err(ParameterError::TypeMismatch {
                name: name.to_string(),
                expected: "number",
            })
        }
    };
    if v.is_finite() {
        Ok(v)
    } else {
        Err(invalid(name, v))
    }
}

/// Counts clamp to `0..=MAX_PARTICLES` and round to the nearest whole particle.
fn count(name: &str, value: &ParamValue) -> Result<usize, ParameterError> {
    Ok(number(name, value)?.clamp(0.0, MAX_PARTICLES as f32).round() as usize)
}

pub(crate) fn boolean(name: &str, value: &ParamValue) -> Result<bool, ParameterError> {
    match value {
        ParamValue::Bool(b) => Ok(*b),
        ParamValue::Text(s) => match s.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(invalid(name, s)),
        },
        _ => Err(ParameterError::TypeMismatch {
            name: name.to_string(),
            expected: "boolean",
        }),
    }
}

fn color(name: &str, value: &ParamValue) -> Result<Vec3, ParameterError> {
    match value {
        ParamValue::Color(c) => Ok(*c),
        ParamValue::Text(s) => parse_hex_color(s).ok_or_else(|| invalid(name, s)),
        _ => Err(ParameterError::TypeMismatch {
            name: name.to_string(),
            expected: "color",
        }),
    }
}

fn parse_text<T: std::str::FromStr>(name: &str, value: &ParamValue) -> Result<T, ParameterError> {
    match value {
        ParamValue::Text(s) => s.parse::<T>().map_err(|_| invalid(name, s)),
        _ => Err(ParameterError::TypeMismatch {
            name: name.to_string(),
            expected: "text",
        }),
    }
}

/// Parse `#rrggbb` (or `rrggbb`) into a linear 0..1 RGB triple.
pub fn parse_hex_color(s: &str) -> Option<Vec3> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let (r, g, b) = (channel(0)?, channel(2)?, channel(4)?);
    Some(Vec3::new(r as f32, g as f32, b as f32) / 255.0)
}
