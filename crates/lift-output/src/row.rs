//! Plain data row types written by output backends.

use lift_sim::{Outcome, Statistics};

/// One statistics notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsRow {
    pub elapsed:             f64,
    pub transported:         u64,
    pub transported_per_sec: f64,
    pub avg_wait:            f64,
    pub max_wait:            f64,
    pub move_count:          u64,
}

impl From<&Statistics> for StatsRow {
    fn from(s: &Statistics) -> Self {
        Self {
            elapsed:             s.elapsed,
            transported:         s.transported,
            transported_per_sec: s.transported_per_sec,
            avg_wait:            s.avg_wait,
            max_wait:            s.max_wait,
            move_count:          s.move_count,
        }
    }
}

/// The final result of a challenge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutcomeRow {
    pub outcome: Outcome,
    /// Statistics at the moment the challenge ended.
    pub stats:   StatsRow,
}
