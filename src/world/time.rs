//! Frame timing and fixed-step accumulation.
//!
//! `FrameClock` turns wall-clock time into per-frame `(elapsed, delta)` pairs.
//! `FixedTimestep` turns a measured delta into a whole number of fixed
//! simulation steps, capped per frame.

use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Seconds since the clock started.
    pub elapsed: f64,
    /// Seconds since the previous tick.
    pub delta: f64,
}

pub struct FrameClock {
    start: Instant,
    previous_elapsed: f64,
    frame_count: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            previous_elapsed: 0.0,
            frame_count: 0,
        }
    }

    /// Advance to the current wall-clock time.
    pub fn tick(&mut self) -> FrameTime {
        let elapsed = self.start.elapsed().as_secs_f64();
        self.advance_to(elapsed)
    }

    /// Advance to an explicit elapsed time. Time never runs backwards.
    pub fn advance_to(&mut self, elapsed: f64) -> FrameTime {
        let elapsed = elapsed.max(self.previous_elapsed);
        let delta = elapsed - self.previous_elapsed;
        self.previous_elapsed = elapsed;
        self.frame_count += 1;
        FrameTime { elapsed, delta }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-step accumulator.
///
/// A zero delta runs exactly one step. Otherwise the delta is accumulated and
/// as many whole steps as fit are run, up to `max_sub_steps`; time left over
/// beyond the cap is dropped rather than carried into later frames.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    max_sub_steps: u32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(step: f32, max_sub_steps: u32) -> Self {
        Self {
            step,
            max_sub_steps: max_sub_steps.max(1),
            accumulator: 0.0,
        }
    }

    /// Number of fixed steps to run for `delta` seconds of wall time.
    pub fn advance(&mut self, delta: f32) -> u32 {
        if delta <= 0.0 {
            return 1;
        }

        self.accumulator += delta;
        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_sub_steps {
            self.accumulator -= self.step;
            steps += 1;
        }
        self.accumulator %= self.step;
        steps
    }

    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }
}
