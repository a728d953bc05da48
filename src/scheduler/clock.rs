/*
 * Simulated Clock
 *
 * Monotonic millisecond clock that only moves when the driver moves it.
 * Keeps every scheduling run deterministic and replayable.
 */

use super::types::Millis;

/// Tick-based simulated clock
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimClock {
    now: Millis,
}

impl SimClock {
    /// Create a new clock at time 0
    pub const fn new() -> Self {
        Self { now: 0 }
    }

    /// Current simulated time
    #[inline(always)]
    pub fn now(&self) -> Millis {
        self.now
    }

    /// Advance by a delta, saturating on overflow
    #[inline(always)]
    pub fn advance_by(&mut self, dt: Millis) {
        self.now = self.now.saturating_add(dt);
    }

    /// Advance to an absolute time; going backwards is ignored
    #[inline(always)]
    pub fn advance_to(&mut self, t: Millis) {
        debug_assert!(t >= self.now, "clock moved backwards: {} -> {}", self.now, t);
        self.now = self.now.max(t);
    }
}
