//! Frame clock for the simulation driver.
//!
//! [`Time`] turns either wall-clock readings ([`Time::update`]) or explicit
//! simulated steps ([`Time::advance`]) into the per-frame `delta` and the
//! monotonic `elapsed` reading the force models use.
//!
//! The very first wall-clock frame reports a delta of zero so a slow startup
//! does not become one huge simulation step.
//!
//! # Example
//!
//! ```ignore
//! use driftfield::time::Time;
//!
//! let mut time = Time::new();
//!
//! // Real frames:
//! let (elapsed, delta) = time.update();
//!
//! // Deterministic tests:
//! let (elapsed, delta) = time.advance(1.0 / 60.0);
//! ```

use std::time::Instant;

/// Interval over which the FPS figure is averaged, in seconds.
const FPS_WINDOW: f32 = 1.0;

/// Time tracking for the frame loop.
#[derive(Debug)]
pub struct Time {
    /// Wall-clock instant of the previous `update`, `None` before the first.
    last_frame: Option<Instant>,
    /// Total simulated seconds.
    elapsed_secs: f32,
    /// Seconds in the most recent frame.
    delta_secs: f32,
    /// Total frames since start.
    frame_count: u64,
    /// Frames per second over the last completed window.
    fps: f32,
    /// Frames counted in the current window.
    window_frames: u32,
    /// Seconds accumulated in the current window.
    window_secs: f32,
    /// Whether time is paused.
    paused: bool,
    /// Fixed delta time for deterministic updates (optional).
    fixed_delta: Option<f32>,
    /// Time scale multiplier (1.0 = normal speed).
    time_scale: f32,
}

impl Time {
    pub fn new() -> Self {
        Self {
            last_frame: None,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            window_frames: 0,
            window_secs: 0.0,
            paused: false,
            fixed_delta: None,
            time_scale: 1.0,
        }
    }

    /// Advance from the wall clock. Call once per rendered frame.
    ///
    /// Returns `(elapsed_time, delta_time)`.
    pub fn update(&mut self) -> (f32, f32) {
        let now = Instant::now();
        let raw = self
            .last_frame
            .map(|last| now.duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last_frame = Some(now);
        self.step(raw)
    }

    /// Advance by an explicit number of seconds (simulated clock).
    ///
    /// Returns `(elapsed_time, delta_time)`.
    pub fn advance(&mut self, seconds: f32) -> (f32, f32) {
        self.step(seconds.max(0.0))
    }

    fn step(&mut self, raw: f32) -> (f32, f32) {
        if self.paused {
            self.delta_secs = 0.0;
            return (self.elapsed_secs, self.delta_secs);
        }

        self.delta_secs = self.fixed_delta.unwrap_or(raw) * self.time_scale;
        self.elapsed_secs += self.delta_secs;
        self.frame_count += 1;

        self.window_frames += 1;
        self.window_secs += self.delta_secs;
        if self.window_secs >= FPS_WINDOW {
            self.fps = self.window_frames as f32 / self.window_secs;
            self.window_frames = 0;
            self.window_secs = 0.0;
        }

        (self.elapsed_secs, self.delta_secs)
    }

    /// Total elapsed simulated time in seconds.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Time since last frame in seconds (delta time).
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second over the last full one-second window.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Whether the current frame closed an FPS window.
    #[inline]
    pub(crate) fn window_closed(&self) -> bool {
        self.window_frames == 0 && self.frame_count > 0 && !self.paused
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Pause time progression.
    ///
    /// While paused, `delta()` returns 0 and `elapsed()` stops increasing.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume after pausing. The wall-clock gap is not counted.
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.last_frame = None;
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Use a fixed delta per frame instead of the measured one. `None` restores
    /// measured timing.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }

    /// Set time scale multiplier.
    ///
    /// - `1.0` = normal speed
    /// - `0.5` = half speed (slow motion)
    /// - `2.0` = double speed
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Reset the clock to its initial state, keeping scale and fixed delta.
    pub fn reset(&mut self) {
        *self = Self {
            fixed_delta: self.fixed_delta,
            time_scale: self.time_scale,
            ..Self::new()
        };
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_time_new() {
        let time = Time::new();
        assert_eq!(time.frame(), 0);
        assert!(!time.is_paused());
        assert_eq!(time.time_scale(), 1.0);
    }

    #[test]
    fn test_first_frame_has_zero_delta() {
        let mut time = Time::new();
        thread::sleep(Duration::from_millis(10));
        let (_, first) = time.update();
        assert_eq!(first, 0.0);

        thread::sleep(Duration::from_millis(10));
        let (elapsed, delta) = time.update();
        assert!(delta > 0.0);
        assert_eq!(elapsed, delta);
        assert_eq!(time.frame(), 2);
    }

    #[test]
    fn test_advance_accumulates() {
        let mut time = Time::new();
        time.advance(0.25);
        time.advance(0.5);
        assert_eq!(time.elapsed(), 0.75);
        assert_eq!(time.delta(), 0.5);
    }

    #[test]
    fn test_time_pause() {
        let mut time = Time::new();
        time.advance(0.1);

        time.pause();
        assert!(time.is_paused());

        let elapsed_before = time.elapsed();
        time.advance(1.0);

        // Elapsed should not increase while paused
        assert_eq!(time.elapsed(), elapsed_before);
        assert_eq!(time.delta(), 0.0);
    }

    #[test]
    fn test_time_scale() {
        let mut time = Time::new();
        time.set_time_scale(2.0);
        time.advance(0.25);
        assert_eq!(time.delta(), 0.5);

        // Negative scale should clamp to 0
        time.set_time_scale(-1.0);
        assert_eq!(time.time_scale(), 0.0);
    }

    #[test]
    fn test_fixed_delta() {
        let mut time = Time::new();
        time.set_fixed_delta(Some(1.0 / 60.0));
        time.advance(3.0);

        let expected = 1.0 / 60.0;
        assert!((time.delta() - expected).abs() < 0.0001);
    }

    #[test]
    fn test_fps_window() {
        let mut time = Time::new();
        for _ in 0..3 {
            time.advance(0.25);
            assert!(!time.window_closed());
        }
        time.advance(0.25);
        assert!(time.window_closed());
        assert_eq!(time.fps(), 4.0);
    }
}
