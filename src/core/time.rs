//! Frame clock and fixed-step accumulator
//!
//! The real clock feeds an accumulator that the scheduler spends in fixed
//! 1/60 s ticks. Rendering happens once per real frame after the pending
//! ticks, decoupled from the simulation rate.

use std::time::Instant;

/// Duration of one logical tick in seconds
pub const FIXED_DT: f32 = 1.0 / 60.0;

/// Clamp on a single frame's real delta, so a stall cannot snowball into an
/// unbounded tick burst
const MAX_FRAME_DELTA: f32 = 0.25;

/// Time tracking
#[derive(Debug)]
pub struct Time {
    last: Instant,
    delta: f32,
    accumulator: f32,
    elapsed: f64,
    ticks: u64,
}

impl Time {
    #[must_use]
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            delta: 0.0,
            accumulator: 0.0,
            elapsed: 0.0,
            ticks: 0,
        }
    }

    /// Sample the real clock once per frame and grow the accumulator
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta = (now - self.last).as_secs_f32().min(MAX_FRAME_DELTA);
        self.last = now;
        self.accumulator += self.delta;
        self.elapsed += f64::from(self.delta);
    }

    /// Grow the accumulator directly (tests and headless stepping)
    pub fn accumulate(&mut self, seconds: f32) {
        self.accumulator += seconds.min(MAX_FRAME_DELTA);
    }

    /// Spend one fixed tick from the accumulator if it is full enough
    pub fn consume_tick(&mut self) -> bool {
        if self.accumulator >= FIXED_DT {
            self.accumulator -= FIXED_DT;
            self.ticks += 1;
            true
        } else {
            false
        }
    }

    /// Real delta of the last frame in seconds
    #[must_use]
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Total wall-clock seconds observed
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Logical ticks consumed since startup
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
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

    #[test]
    fn test_accumulator_spends_whole_ticks() {
        let mut time = Time::new();
        time.accumulate(FIXED_DT * 2.5);

        assert!(time.consume_tick());
        assert!(time.consume_tick());
        assert!(!time.consume_tick());
        assert_eq!(time.ticks(), 2);

        // The half tick left over completes with the next frame's input
        time.accumulate(FIXED_DT * 0.5);
        assert!(time.consume_tick());
    }

    #[test]
    fn test_stall_is_clamped() {
        let mut time = Time::new();
        time.accumulate(10.0);
        let mut ticks = 0;
        while time.consume_tick() {
            ticks += 1;
        }
        assert!(ticks <= (MAX_FRAME_DELTA / FIXED_DT).ceil() as u32);
    }
}
