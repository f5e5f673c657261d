//! Visual configuration consumed by the render backend.
//!
//! The simulation core never draws anything itself. It only records how the
//! render step should composite the particle buffers and which sprite shape the
//! control panel selected.
//!
//! ```ignore
//! let mode: BlendMode = "additive".parse().unwrap_or_default();
//! system.set_blend_mode(mode);
//! ```

use crate::error::UnknownVisual;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Compositing mode used when drawing particles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    /// Standard alpha blending.
    Normal,

    /// Additive blending.
    ///
    /// Overlapping particles become brighter. The default for a freshly
    /// constructed system before any parameters are applied.
    #[default]
    Additive,

    /// Multiplicative blending, darkens what is behind the particle.
    Multiply,

    /// Subtractive blending, the zen/fluid/glitch presets use this.
    Subtractive,
}

impl BlendMode {
    /// All admissible blend modes, in control-panel order.
    pub const ALL: [BlendMode; 4] = [
        BlendMode::Normal,
        BlendMode::Additive,
        BlendMode::Multiply,
        BlendMode::Subtractive,
    ];

    /// Control-panel name of this blend mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Additive => "additive",
            BlendMode::Multiply => "multiply",
            BlendMode::Subtractive => "subtractive",
        }
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlendMode {
    type Err = UnknownVisual;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlendMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVisual(s.to_string()))
    }
}

/// Sprite shape selected in the control panel.
///
/// Carried through to the renderer untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleShape {
    #[default]
    Cube,
    Sphere,
    Point,
}

impl ParticleShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticleShape::Cube => "cube",
            ParticleShape::Sphere => "sphere",
            ParticleShape::Point => "point",
        }
    }
}

impl FromStr for ParticleShape {
    type Err = UnknownVisual;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cube" => Ok(ParticleShape::Cube),
            "sphere" => Ok(ParticleShape::Sphere),
            "point" => Ok(ParticleShape::Point),
            _ => Err(UnknownVisual(s.to_string())),
        }
    }
}
