//! Frame statistics

use std::collections::VecDeque;
use std::time::Duration;

/// What the simulation did during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameCounters {
    /// Live entities after the frame
    pub entities: usize,
    /// View rebuilds since the engine started
    pub view_rebuilds: u64,
    /// Collision push-backs applied
    pub resolved: usize,
    pub placed: usize,
    pub broken: usize,
    pub picked_up: usize,
    /// Quads submitted to the renderer
    pub drawn: usize,
}

/// Frame time history plus the counters of the last frame
#[derive(Debug)]
pub struct FrameStats {
    /// Frame time history for averaging
    frame_times: VecDeque<Duration>,
    /// Maximum samples to keep
    max_samples: usize,
    /// Average frame time in milliseconds
    avg_frame_time_ms: f32,
    /// Maximum frame time in milliseconds
    max_frame_time_ms: f32,
    /// Total frames simulated
    total_frames: u64,
    last: FrameCounters,
}

impl FrameStats {
    /// Create a tracker keeping the last 120 frame times
    #[must_use]
    pub fn new() -> Self {
        Self {
            frame_times: VecDeque::with_capacity(120),
            max_samples: 120,
            avg_frame_time_ms: 0.0,
            max_frame_time_ms: 0.0,
            total_frames: 0,
            last: FrameCounters::default(),
        }
    }

    /// Record a frame
    pub fn record_frame(&mut self, delta: Duration, counters: FrameCounters) {
        self.total_frames += 1;
        self.last = counters;

        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(delta);

        let total: Duration = self.frame_times.iter().sum();
        let max = self.frame_times.iter().max().copied().unwrap_or_default();
        self.avg_frame_time_ms = total.as_secs_f32() * 1000.0 / self.frame_times.len() as f32;
        self.max_frame_time_ms = max.as_secs_f32() * 1000.0;
    }

    /// Frames per second over the history window
    #[must_use]
    pub fn fps(&self) -> f32 {
        if self.avg_frame_time_ms > 0.0 {
            1000.0 / self.avg_frame_time_ms
        } else {
            0.0
        }
    }

    /// Get average frame time in milliseconds
    #[must_use]
    pub fn avg_frame_time_ms(&self) -> f32 {
        self.avg_frame_time_ms
    }

    /// Get maximum frame time in milliseconds
    #[must_use]
    pub fn max_frame_time_ms(&self) -> f32 {
        self.max_frame_time_ms
    }

    /// Get total frames simulated
    #[must_use]
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Counters of the most recent frame
    #[must_use]
    pub fn last(&self) -> FrameCounters {
        self.last
    }

    /// One-line summary for logs and overlays
    #[must_use]
    pub fn format_stats(&self) -> String {
        format!(
            "FPS: {:.1} | Frame: {:.2}ms (max: {:.2}) | Entities: {} | View rebuilds: {}",
            self.fps(),
            self.avg_frame_time_ms,
            self.max_frame_time_ms,
            self.last.entities,
            self.last.view_rebuilds
        )
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_averages_over_history() {
        let mut stats = FrameStats::new();
        stats.record_frame(Duration::from_millis(10), FrameCounters::default());
        stats.record_frame(Duration::from_millis(30), FrameCounters::default());

        assert!((stats.avg_frame_time_ms() - 20.0).abs() < 1e-3);
        assert!((stats.max_frame_time_ms() - 30.0).abs() < 1e-3);
        assert!((stats.fps() - 50.0).abs() < 1e-2);
        assert_eq!(stats.total_frames(), 2);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut stats = FrameStats::new();
        stats.record_frame(Duration::from_millis(500), FrameCounters::default());
        for _ in 0..120 {
            stats.record_frame(Duration::from_millis(10), FrameCounters::default());
        }

        // The slow frame has dropped out of the window
        assert!((stats.max_frame_time_ms() - 10.0).abs() < 1e-3);
        assert_eq!(stats.total_frames(), 121);
    }

    #[test]
    fn test_keeps_last_counters() {
        let mut stats = FrameStats::new();
        let counters = FrameCounters {
            entities: 12,
            ..FrameCounters::default()
        };
        stats.record_frame(Duration::from_millis(16), counters);

        assert_eq!(stats.last().entities, 12);
        assert!(stats.format_stats().contains("Entities: 12"));
    }
}
