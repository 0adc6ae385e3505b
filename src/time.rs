//! Frame clock.
//!
//! [`Time`] is the host's monotonic clock: it produces the per-frame delta
//! fed into [`ParticleField::advance`](crate::ParticleField::advance) and the
//! total elapsed time fed into projection. Deltas are clamped so a stalled
//! process (debugger, suspend, dragged window) cannot make stars jump.
//!
//! # Example
//!
//! ```ignore
//! use starfield::time::Time;
//!
//! let mut time = Time::new();
//!
//! // In your frame loop:
//! let (elapsed, delta) = time.update();
//! field.advance(delta, &config);
//! ```

use std::time::{Duration, Instant};

/// Time tracking for the frame loop.
#[derive(Debug)]
pub struct Time {
    /// When the last frame occurred.
    last_frame: Instant,
    /// Accumulated (clamped) elapsed time in seconds. Kept in `f64` so
    /// per-frame deltas still register after days of running.
    elapsed_secs: f64,
    /// Time since last frame in seconds.
    delta_secs: f32,
    /// Total frames since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Time of last FPS calculation.
    fps_update_time: Instant,
    /// How often to update FPS calculation.
    fps_update_interval: Duration,
    /// Upper bound on a single delta.
    max_delta: f32,
    /// Fixed delta time for deterministic updates (optional).
    fixed_delta: Option<f32>,
}

impl Time {
    pub const DEFAULT_MAX_DELTA: f32 = 0.25;

    /// Create a new time tracker starting from now.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    fn starting_at(now: Instant) -> Self {
        Self {
            last_frame: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            max_delta: Self::DEFAULT_MAX_DELTA,
            fixed_delta: None,
        }
    }

    /// Update timing values. Call once per frame.
    ///
    /// Returns `(elapsed_time, delta_time)` for convenience.
    pub fn update(&mut self) -> (f64, f32) {
        self.update_at(Instant::now())
    }

    pub(crate) fn update_at(&mut self, now: Instant) -> (f64, f32) {
        // `saturating_duration_since` keeps a non-monotonic clock from going negative.
        let raw_delta = now.saturating_duration_since(self.last_frame).as_secs_f32();
        self.delta_secs = self.fixed_delta.unwrap_or(raw_delta).clamp(0.0, self.max_delta);
        self.last_frame = now;

        self.elapsed_secs += f64::from(self.delta_secs);
        self.frame_count += 1;

        // Update FPS periodically
        let fps_elapsed = now.saturating_duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        (self.elapsed_secs, self.delta_secs)
    }

    /// Total elapsed time in seconds, the sum of all clamped deltas.
    #[inline]
    pub fn elapsed(&self) -> f64 {
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

    /// Calculated frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Set a fixed delta time for deterministic updates.
    ///
    /// Pass `None` to use real frame timing.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }

    /// Reset the timer to its initial state.
    pub fn reset(&mut self) {
        let max_delta = self.max_delta;
        let fixed_delta = self.fixed_delta;
        *self = Self::new();
        self.max_delta = max_delta;
        self.fixed_delta = fixed_delta;
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimum spacing between frames.
///
/// The host waits until [`next_deadline`](FrameLimiter::next_deadline) before
/// running the next frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameLimiter {
    interval: Duration,
    last: Option<Instant>,
}

impl FrameLimiter {
    pub fn new(interval: Duration) -> Self {
        Self { interval, last: None }
    }

    /// Whether a frame may run at `now`. Records the frame if so.
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// When the next frame is due.
    pub fn next_deadline(&self, now: Instant) -> Instant {
        match self.last {
            Some(last) => (last + self.interval).max(now),
            None => now,
        }
    }
}
