//! Frame timing

use std::time::{Duration, Instant};

/// Measures real frame time and hands out a clamped step
#[derive(Debug, Clone)]
pub struct Time {
    last_frame: Instant,
    /// Unclamped duration of the last frame
    raw_delta: Duration,
    /// Upper bound on [`Self::delta`], in seconds
    max_delta: f32,
    frame_count: u64,
}

impl Time {
    /// Start the clock
    #[must_use]
    pub fn new(max_delta: f32) -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            raw_delta: Duration::ZERO,
            max_delta,
            frame_count: 0,
        }
    }

    /// Mark the start of a new frame
    pub fn update(&mut self) {
        let now = Instant::now();
        self.raw_delta = now - self.last_frame;
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Seconds since the last frame, clamped to the configured bound
    #[must_use]
    pub fn delta(&self) -> f32 {
        clamp_delta(self.raw_delta.as_secs_f32(), self.max_delta)
    }

    /// Measured duration of the last frame
    #[must_use]
    pub fn raw_delta(&self) -> Duration {
        self.raw_delta
    }

    /// Frames counted so far
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Clamp a frame step to `[0, max_delta]`. NaN becomes 0, and a bound
/// that is negative or NaN stops time instead of panicking.
#[must_use]
#[inline]
pub fn clamp_delta(delta: f32, max_delta: f32) -> f32 {
    if delta.is_nan() || max_delta.is_nan() || max_delta <= 0.0 {
        return 0.0;
    }
    delta.max(0.0).min(max_delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_delta() {
        assert_eq!(clamp_delta(1.0, 0.05), 0.05);
        assert_eq!(clamp_delta(0.016, 0.05), 0.016);
        assert_eq!(clamp_delta(-1.0, 0.05), 0.0);
        assert_eq!(clamp_delta(f32::NAN, 0.05), 0.0);
        assert_eq!(clamp_delta(0.016, -0.01), 0.0);
        assert_eq!(clamp_delta(0.016, f32::NAN), 0.0);
    }

    #[test]
    fn test_update_counts_frames() {
        let mut time = Time::new(0.05);
        time.update();
        time.update();

        assert_eq!(time.frame_count(), 2);
        assert!(time.delta() <= 0.05);
    }
}
