//! Pointer and touch interaction mapping.
//!
//! The host window turns raw mouse/touch events into [`PointerEvent`]s. It
//! also projects each screen position onto the emission plane to give a world
//! position. [`Interaction`] tracks press/drag state across events and turns
//! them into [`Request`]s the simulation acts on.
//!
//! | Gesture | Mode | Result |
//! |---------|------|--------|
//! | tap (< 300 ms, < 5 px) | any | burst of `burstSize` at the press point |
//! | mouse drag | fluid | trail bursts, at most one per 50 ms |
//! | single-touch drag | any | trail bursts, at most one per 50 ms |
//! | mouse press | glitch | attraction toward the press point |
//! | mouse move | glitch | updates the attraction target |
//!
//! Multi-touch gestures belong to the camera and are ignored here.
//!
//! # Example
//!
//! ```ignore
//! let mut interaction = Interaction::new();
//! let event = PointerEvent::press(PointerKind::Mouse, screen, world, now);
//! if let Some(request) = interaction.handle(&event, simulation.parameters().current()) {
//!     simulation.apply(request);
//! }
//! ```

use crate::emitter::Burst;
use crate::params::{Mode, SimulationParameters};
use glam::{Vec2, Vec3};

/// Longest press that still counts as a tap, in seconds.
pub const TAP_MAX_DURATION: f32 = 0.3;

/// Farthest a press may travel and still count as a tap, in pixels.
pub const TAP_MAX_DISTANCE: f32 = 5.0;

/// Minimum spacing between trail bursts, in seconds.
pub const TRAIL_INTERVAL: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Mouse,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    Press,
    Move,
    Release,
}

/// One pointer event, already projected into world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub phase: PointerPhase,
    /// Position in screen pixels.
    pub screen: Vec2,
    /// Position projected onto the emission plane.
    pub world: Vec3,
    /// Event timestamp in seconds.
    pub time: f32,
    /// Touches still on the surface. Always 1 for mouse events.
    pub touches: usize,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, phase: PointerPhase, screen: Vec2, world: Vec3, time: f32) -> Self {
        let touches = match (kind, phase) {
            (PointerKind::Touch, PointerPhase::Release) => 0,
            _ => 1,
        };
        Self {
            kind,
            phase,
            screen,
            world,
            time,
            touches,
        }
    }

    pub fn press(kind: PointerKind, screen: Vec2, world: Vec3, time: f32) -> Self {
        Self::new(kind, PointerPhase::Press, screen, world, time)
    }

    pub fn moved(kind: PointerKind, screen: Vec2, world: Vec3, time: f32) -> Self {
        Self::new(kind, PointerPhase::Move, screen, world, time)
    }

    pub fn release(kind: PointerKind, screen: Vec2, world: Vec3, time: f32) -> Self {
        Self::new(kind, PointerPhase::Release, screen, world, time)
    }

    /// Override the active touch count (multi-touch gestures).
    pub fn with_touches(mut self, touches: usize) -> Self {
        self.touches = touches;
        self
    }
}

/// What the simulation should do in response to an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Request {
    Emit(Burst),
    Attract(Vec3),
}

/// Press/drag state carried between pointer events.
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    dragging: bool,
    press_time: f32,
    anchor_screen: Vec2,
    anchor_world: Vec3,
    last_trail: Option<f32>,
    glitch_target: Option<Vec3>,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Last point the pointer hovered or pressed in glitch mode.
    pub fn glitch_target(&self) -> Option<Vec3> {
        self.glitch_target
    }

    /// Drop any drag in progress (used when the mode changes under the pointer).
    pub fn cancel(&mut self) {
        self.dragging = false;
    }

    /// Feed one event. `params` is the active parameter set.
    pub fn handle(&mut self, event: &PointerEvent, params: &SimulationParameters) -> Option<Request> {
        match (event.kind, event.phase) {
            (PointerKind::Mouse, PointerPhase::Press) => {
                self.begin(event);
                if params.mode() == Mode::Glitch {
                    self.glitch_target = Some(event.world);
                    return Some(Request::Attract(event.world));
                }
                None
            }
            (PointerKind::Mouse, PointerPhase::Move) => match params.mode() {
                Mode::Fluid if self.dragging => self.trail(event, params),
                Mode::Glitch => {
                    self.glitch_target = Some(event.world);
                    None
                }
                _ => None,
            },
            (PointerKind::Mouse, PointerPhase::Release) => self.finish(event, params),
            (PointerKind::Touch, PointerPhase::Press) => {
                if event.touches == 1 {
                    self.begin(event);
                }
                None
            }
            (PointerKind::Touch, PointerPhase::Move) => {
                if !self.dragging || event.touches != 1 {
                    return None;
                }
                let request = self.trail(event, params);
                self.anchor_screen = event.screen;
                self.anchor_world = event.world;
                request
            }
            (PointerKind::Touch, PointerPhase::Release) => {
                if event.touches != 0 {
                    return None;
                }
                self.finish(event, params)
            }
        }
    }

    fn begin(&mut self, event: &PointerEvent) {
        self.dragging = true;
        self.press_time = event.time;
        self.anchor_screen = event.screen;
        self.anchor_world = event.world;
    }

    fn trail(&mut self, event: &PointerEvent, params: &SimulationParameters) -> Option<Request> {
        if let Some(last) = self.last_trail {
            if event.time - last <= TRAIL_INTERVAL {
                return None;
            }
        }
        self.last_trail = Some(event.time);
        Some(Request::Emit(Burst::trail(params, event.world)))
    }

    fn finish(&mut self, event: &PointerEvent, params: &SimulationParameters) -> Option<Request> {
        if !self.dragging {
            return None;
        }
        self.dragging = false;

        let duration = event.time - self.press_time;
        let distance = event.screen.distance(self.anchor_screen);
        if duration < TAP_MAX_DURATION && distance < TAP_MAX_DISTANCE {
            log::trace!("tap at {:?}", self.anchor_world);
            return Some(Request::Emit(Burst::tap(params, self.anchor_world)));
        }
        None
    }
}
