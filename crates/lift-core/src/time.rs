//! Simulation time model.
//!
//! # Design
//!
//! Elevator motion is continuous, so time is tracked as floating-point
//! seconds.  Alongside it `SimClock` counts discrete `Tick`s (one per
//! engine advance), which is logged when a challenge ends.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// Number of engine advances since the challenge started.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Elapsed simulated seconds plus the tick counter.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// The current tick: advanced by [`SimClock::advance`].
    pub current_tick: Tick,
    /// Simulated seconds since the challenge started.
    pub elapsed_secs: f64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `dt` simulated seconds and one tick.
    ///
    /// Rejects negative or non-finite steps; the clock is left untouched.
    pub fn advance(&mut self, dt: f64) -> CoreResult<()> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(CoreError::InvalidTimeStep(dt));
        }
        self.elapsed_secs += dt;
        self.current_tick = Tick(self.current_tick.0 + 1);
        Ok(())
    }
}
