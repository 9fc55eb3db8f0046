//! Wall-clock tick source for hosts driving a field.
//!
//! The simulation itself only consumes a delta; this clock is the
//! convenience that produces one per display refresh. A fixed-delta
//! override makes stepping deterministic for tests and offline rendering.

use std::time::Instant;

/// Produces `(elapsed, delta)` pairs, one per call to [`TickClock::update`].
#[derive(Debug)]
pub struct TickClock {
    start: Instant,
    last_tick: Instant,
    elapsed_secs: f32,
    delta_secs: f32,
    tick_count: u64,
    fixed_delta: Option<f32>,
}

impl TickClock {
    /// Start a clock at the current instant.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            tick_count: 0,
            fixed_delta: None,
        }
    }

    /// Advance the clock. Call once per frame; returns `(elapsed, delta)`
    /// in seconds.
    pub fn update(&mut self) -> (f32, f32) {
        let now = Instant::now();
        let raw_delta = now.duration_since(self.last_tick).as_secs_f32();
        self.delta_secs = self.fixed_delta.unwrap_or(raw_delta);
        self.last_tick = now;
        self.elapsed_secs = match self.fixed_delta {
            Some(_) => self.elapsed_secs + self.delta_secs,
            None => now.duration_since(self.start).as_secs_f32(),
        };
        self.tick_count += 1;
        (self.elapsed_secs, self.delta_secs)
    }

    /// Seconds since the clock started.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Seconds between the last two updates.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Updates so far.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.tick_count
    }

    /// Force every update to report this delta instead of wall time.
    /// Pass `None` to return to real timing.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }

    /// Restart the clock from now.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.start = now;
        self.last_tick = now;
        self.elapsed_secs = 0.0;
        self.delta_secs = 0.0;
        self.tick_count = 0;
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}
