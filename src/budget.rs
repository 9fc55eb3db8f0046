//! Frame budget control.
//!
//! Decides, per animation tick, how much simulated time to apply. Two
//! concerns live here:
//!
//! - clamping the incoming delta so a long pause (backgrounded tab) never
//!   becomes one giant step, and
//! - the reduced-motion gate: accumulate clamped deltas across ticks and
//!   release an update only once the accumulated budget crosses the
//!   variant's threshold. The host keeps calling every frame; the
//!   simulation just advances less often.

use crate::config::MAX_TICK_DELTA;

/// Per-field accumulator implementing the reduced-motion update gate.
#[derive(Clone, Debug, Default)]
pub struct FrameBudget {
    accumulated: f32,
}

impl FrameBudget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a tick.
    ///
    /// Returns the simulated time to apply this tick, or `None` when the
    /// reduced-motion gate is holding. The raw delta is clamped to
    /// [`MAX_TICK_DELTA`] first; the released budget is the exact sum of
    /// clamped deltas since the last release, and releasing resets the
    /// accumulator to zero.
    pub fn admit(&mut self, dt: f32, reduced_motion: bool, update_interval: f32) -> Option<f32> {
        let dt = dt.clamp(0.0, MAX_TICK_DELTA);
        if !reduced_motion {
            // Leaving reduced motion drops any partial budget.
            self.accumulated = 0.0;
            return Some(dt);
        }

        self.accumulated += dt;
        if self.accumulated < update_interval {
            return None;
        }
        let step = self.accumulated;
        self.accumulated = 0.0;
        Some(step)
    }

    /// Budget accumulated since the last released update.
    #[inline]
    pub fn pending(&self) -> f32 {
        self.accumulated
    }

    /// Drop any accumulated budget.
    pub fn reset(&mut self) {
        self.accumulated = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreduced_passes_clamped_delta() {
        let mut budget = FrameBudget::new();
        assert_eq!(budget.admit(0.016, false, 1.0 / 12.0), Some(0.016));
        // A five-second hitch is clamped to the max step.
        assert_eq!(budget.admit(5.0, false, 1.0 / 12.0), Some(MAX_TICK_DELTA));
    }

    #[test]
    fn test_reduced_gate_holds_then_releases_exact_sum() {
        let mut budget = FrameBudget::new();
        let interval = 1.0 / 12.0;

        // Four 16ms ticks accumulate 0.064 < 1/12 ≈ 0.0833: all held.
        for _ in 0..4 {
            assert_eq!(budget.admit(0.016, true, interval), None);
        }
        // Fifth tick crosses the threshold and releases everything.
        let released = budget.admit(0.016, true, interval).unwrap();
        assert!((released - 0.08).abs() < 1e-6);
        assert_eq!(budget.pending(), 0.0);
    }

    #[test]
    fn test_release_amount_independent_of_tick_split() {
        let interval = 1.0 / 14.0;

        let mut even = FrameBudget::new();
        let mut released_even = 0.0;
        for _ in 0..8 {
            if let Some(step) = even.admit(0.0125, true, interval) {
                released_even += step;
            }
        }

        let mut ragged = FrameBudget::new();
        let mut released_ragged = 0.0;
        for dt in [0.02, 0.005, 0.0125, 0.03, 0.0025, 0.01, 0.015, 0.005] {
            if let Some(step) = ragged.admit(dt, true, interval) {
                released_ragged += step;
            }
        }

        // Same total input time: released totals differ only by what is
        // still pending in each accumulator.
        let total = 0.1;
        assert!((released_even + even.pending() - total).abs() < 1e-6);
        assert!((released_ragged + ragged.pending() - total).abs() < 1e-6);
    }

    #[test]
    fn test_leaving_reduced_motion_clears_budget() {
        let mut budget = FrameBudget::new();
        budget.admit(0.016, true, 1.0 / 12.0);
        assert!(budget.pending() > 0.0);
        budget.admit(0.016, false, 1.0 / 12.0);
        assert_eq!(budget.pending(), 0.0);
    }

    #[test]
    fn test_negative_delta_is_ignored() {
        let mut budget = FrameBudget::new();
        assert_eq!(budget.admit(-0.5, false, 1.0 / 12.0), Some(0.0));
    }
}
