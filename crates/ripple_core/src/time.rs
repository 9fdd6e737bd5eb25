//! Fixed-timestep clock
//!
//! Accumulates wall-clock time and hands out whole ticks. The fractional
//! remainder is carried to the next call so simulated time never drifts from
//! wall-clock time.

use std::time::Duration;

/// Result of feeding elapsed time into the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepBudget {
    /// Ticks to run now.
    pub due: u32,
    /// Whole intervals discarded because the host fell too far behind.
    pub dropped: u32,
}

/// Simulation time tracker
#[derive(Debug, Clone)]
pub struct FixedStep {
    interval: Duration,
    max_catch_up: u32,
    accumulated: Duration,
    simulated: Duration,
}

impl FixedStep {
    pub fn new(interval: Duration, max_catch_up: u32) -> Self {
        assert!(!interval.is_zero(), "tick interval must be non-zero");
        Self {
            interval,
            max_catch_up: max_catch_up.max(1),
            accumulated: Duration::ZERO,
            simulated: Duration::ZERO,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time not yet consumed by a tick; always below one interval after `advance`.
    pub fn leftover(&self) -> Duration {
        self.accumulated
    }

    /// Simulated time consumed by ticks so far.
    pub fn total_time(&self) -> Duration {
        self.simulated
    }

    /// Add `elapsed` to the accumulator and take out every whole interval due.
    pub fn advance(&mut self, elapsed: Duration) -> StepBudget {
        self.accumulated += elapsed;

        let interval = self.interval.as_nanos();
        let whole = self.accumulated.as_nanos() / interval;
        let whole = u32::try_from(whole).unwrap_or(u32::MAX);

        let due = whole.min(self.max_catch_up);
        let dropped = whole - due;

        self.accumulated -= self.interval * whole;
        self.simulated += self.interval * due;

        StepBudget { due, dropped }
    }
}
