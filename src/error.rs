//! Error types for driftfield.
//!
//! The per-frame path never fails. Errors only surface from the control-panel
//! binding (a rejected parameter update or visual option) and from preset
//! file IO.

use crate::params::Mode;
use thiserror::Error;

/// Errors returned when the control panel tries to rebind a parameter.
///
/// A rejected update never changes the active parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    /// No parameter with this name exists in the active mode.
    #[error("unknown parameter `{name}` for {mode} mode")]
    Unknown { name: String, mode: Mode },
    /// The value has the wrong shape for this parameter.
    #[error("parameter `{name}` expects {expected}")]
    TypeMismatch { name: String, expected: &'static str },
    /// The value has the right shape but could not be interpreted.
    #[error("invalid value `{value}` for parameter `{name}`")]
    InvalidValue { name: String, value: String },
    /// The parameter can be read but not written through the binding.
    #[error("parameter `{0}` is read-only")]
    ReadOnly(String),
}

/// Returned when a string names no known blend mode or particle shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown visual option `{0}`")]
pub struct UnknownVisual(pub String);

/// Errors that can occur while loading or saving parameter presets.
#[derive(Debug, Error)]
pub enum PresetError {
    /// Failed to read or write the preset file.
    #[error("failed to access preset file: {0}")]
    Io(#[from] std::io::Error),
    /// The preset file is not valid JSON for the parameter layout.
    #[error("failed to parse preset: {0}")]
    Json(#[from] serde_json::Error),
}
