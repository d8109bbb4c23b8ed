//! Frame statistics

use std::collections::VecDeque;

/// Rolling frame-time statistics plus per-frame counters
#[derive(Debug)]
pub struct FrameStats {
    frame_times: VecDeque<f32>,
    max_samples: usize,
    /// Frames observed since startup
    pub total_frames: u64,
    /// Simulation ticks spent during the last frame
    pub ticks_last_frame: u32,
    /// Draw calls issued during the last frame
    pub draw_calls: usize,
}

impl FrameStats {
    #[must_use]
    pub fn new() -> Self {
        Self {
            frame_times: VecDeque::with_capacity(120),
            max_samples: 120,
            total_frames: 0,
            ticks_last_frame: 0,
            draw_calls: 0,
        }
    }

    /// Record one frame's real delta
    pub fn record_frame(&mut self, delta: f32) {
        self.total_frames += 1;
        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(delta);
    }

    /// Average frames per second over the sample window
    #[must_use]
    pub fn fps(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        let avg = self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
        if avg > 0.0 { 1.0 / avg } else { 0.0 }
    }

    /// Average frame time in milliseconds over the window
    #[must_use]
    pub fn avg_frame_ms(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32 * 1000.0
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
    fn test_fps_over_window() {
        let mut stats = FrameStats::new();
        for _ in 0..60 {
            stats.record_frame(1.0 / 60.0);
        }
        assert!((stats.fps() - 60.0).abs() < 1.0);
        assert_eq!(stats.total_frames, 60);
    }
}
