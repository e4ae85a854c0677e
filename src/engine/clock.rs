//! Frame timing helpers.
//!
//! - [`clamp_dt`]: the clamp-before-integrate guard every model goes through
//! - [`substeps`]: fixed sub-stepping of one outer frame
//! - [`FrameClock`]: fixed-rate driver for headless runs (CLI, benches, tests)

use serde::{Deserialize, Serialize};

/// Clamp a wall-clock frame delta to a stable integration step.
///
/// Non-finite and negative deltas become zero; anything larger than
/// `max_dt` (a dropped frame, a backgrounded tab) is capped to `max_dt`.
#[must_use]
pub fn clamp_dt(dt: f64, max_dt: f64) -> f64 {
    if !dt.is_finite() || dt <= 0.0 {
        return 0.0;
    }
    dt.min(max_dt.max(0.0))
}

/// Split `dt` into `count` equal sub-steps.
///
/// Yields nothing when `count` is zero.
pub fn substeps(dt: f64, count: usize) -> impl Iterator<Item = f64> {
    let h = if count == 0 { 0.0 } else { dt / count as f64 };
    std::iter::repeat(h).take(count)
}

/// Fixed-rate frame clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameClock {
    /// Frame duration in seconds.
    frame_dt: f64,
    /// Frames produced so far.
    frames: u64,
}

impl FrameClock {
    /// Create a clock producing frames of `frame_dt` seconds.
    ///
    /// Non-positive or non-finite durations fall back to 60 Hz.
    #[must_use]
    pub fn new(frame_dt: f64) -> Self {
        let frame_dt = if frame_dt.is_finite() && frame_dt > 0.0 {
            frame_dt
        } else {
            1.0 / 60.0
        };
        Self {
            frame_dt,
            frames: 0,
        }
    }

    /// Frame duration in seconds.
    #[must_use]
    pub const fn frame_dt(&self) -> f64 {
        self.frame_dt
    }

    /// Advance one frame and return its duration.
    pub fn tick(&mut self) -> f64 {
        self.frames += 1;
        self.frame_dt
    }

    /// Number of frames produced.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Total time covered by the produced frames.
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.frames as f64 * self.frame_dt
    }

    /// Number of frames needed to cover `duration` seconds.
    #[must_use]
    pub fn frames_for(&self, duration: f64) -> u64 {
        if !duration.is_finite() || duration <= 0.0 {
            return 0;
        }
        (duration / self.frame_dt).ceil() as u64
    }

    /// Restart from frame zero.
    pub fn reset(&mut self) {
        self.frames = 0;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(1.0 / 60.0)
    }
}
