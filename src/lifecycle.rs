//! Life-ratio curves used when publishing particles to the render buffers.
//!
//! A particle's life ratio is remaining life over life at birth. It starts at
//! 1.0, reaches 0.0 at nominal death and keeps falling during the zen ghost
//! phase, so every curve here has to accept negative input.
//!
//! | Curve | Shape |
//! |-------|-------|
//! | [`linear_alpha`] | `opacity * max(0, ratio)` |
//! | [`zen_alpha`] | full, then linear fade below 0.2, then dim eased ghost |
//! | [`color_lerp_factor`] | 0 above 0.3, ramps to 1 at 0 |
//! | [`size_multiplier`] | always 1 in practice, see its docs |

/// Life ratio below which zen particles start fading out.
pub const ZEN_FADE_START: f32 = 0.2;

/// Life ratio below which color shifts from start to end color.
pub const COLOR_SHIFT_START: f32 = 0.3;

/// Brightness of a ghost relative to full opacity at the moment of death.
pub const GHOST_BRIGHTNESS: f32 = 0.6;

/// Easing exponent for the ghost fade.
pub const GHOST_EASING: f32 = 0.33;

/// Linear fade used by every non-zen mode.
#[inline]
pub fn linear_alpha(opacity: f32, life_ratio: f32) -> f32 {
    opacity * life_ratio.max(0.0)
}

/// Zen alpha.
///
/// - `ratio > 0.2`: full `opacity`
/// - `0 < ratio <= 0.2`: linear fade from `opacity` to 0
/// - `life <= 0` (ghost): `opacity * 0.6 * ghost^0.33` with
///   `ghost = max(0, 1 + life / ghost_duration)`
///
/// The curve is continuous at 0.2. At death it steps from 0 back up to the
/// ghost's 60% brightness.
pub fn zen_alpha(opacity: f32, life_ratio: f32, life: f32, ghost_duration: f32) -> f32 {
    if life_ratio > ZEN_FADE_START {
        opacity
    } else if life_ratio > 0.0 {
        opacity * (life_ratio / ZEN_FADE_START)
    } else {
        let ghost = (1.0 + life / ghost_duration).max(0.0);
        opacity * GHOST_BRIGHTNESS * ghost.powf(GHOST_EASING)
    }
}

/// Start-to-end color interpolation factor.
///
/// Not clamped above 1: during the zen ghost phase the ratio is negative and
/// the color keeps extrapolating past the end color.
#[inline]
pub fn color_lerp_factor(life_ratio: f32) -> f32 {
    if life_ratio < COLOR_SHIFT_START {
        1.0 - life_ratio / COLOR_SHIFT_START
    } else {
        0.0
    }
}

/// Size multiplier applied on publish.
///
/// The shrinking branch only runs for a ratio of exactly zero, where it also
/// yields 1, so the multiplier is 1 for every particle. Ghosts do not shrink.
#[inline]
pub fn size_multiplier(life_ratio: f32, ghost_duration: f32) -> f32 {
    let raw = if life_ratio.abs() > 0.0 {
        1.0
    } else {
        1.0 + life_ratio / ghost_duration
    };
    raw.max(0.3)
}
