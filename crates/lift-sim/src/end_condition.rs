//! Challenge end conditions.
//!
//! An [`EndCondition`] is evaluated by the engine after every tick.  The
//! built-in goals are all of the form "transport N passengers while staying
//! inside some limit": the challenge ends as soon as the target is met or a
//! limit is hit, and succeeds only if the target was met with every limit
//! still respected.

use std::fmt;

use crate::Statistics;

/// Result of evaluating an end condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    Continue,
    Succeeded,
    Failed,
}

impl Outcome {
    /// The challenge is over, one way or the other.
    pub fn is_decided(self) -> bool {
        !matches!(self, Outcome::Continue)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Continue  => "continue",
            Outcome::Succeeded => "succeeded",
            Outcome::Failed    => "failed",
        }
    }

    /// `Continue` until `ended`; then `Succeeded` if `met`, else `Failed`.
    fn decide(ended: bool, met: bool) -> Outcome {
        match (ended, met) {
            (false, _)    => Outcome::Continue,
            (true, true)  => Outcome::Succeeded,
            (true, false) => Outcome::Failed,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides, from the current statistics, whether the challenge is over.
///
/// Implemented for [`Goal`] and for any `Fn(&Statistics) -> Outcome`, so ad
/// hoc conditions can be passed as closures:
///
/// ```rust,ignore
/// let after_ten = |s: &Statistics| if s.transported >= 10 { Outcome::Succeeded } else { Outcome::Continue };
/// let engine = EngineBuilder::new(config).end_condition(after_ten).build()?;
/// ```
pub trait EndCondition {
    fn evaluate(&self, stats: &Statistics) -> Outcome;

    /// Human-readable summary for logs and reports.
    fn describe(&self) -> String {
        "custom end condition".to_string()
    }
}

impl<F> EndCondition for F
where
    F: Fn(&Statistics) -> Outcome,
{
    fn evaluate(&self, stats: &Statistics) -> Outcome {
        self(stats)
    }
}

/// The built-in challenge goals.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Goal {
    /// Transport `users` passengers within `seconds` of simulated time.
    WithinTime { users: u64, seconds: f64 },

    /// Transport `users` passengers with no passenger waiting longer than
    /// `max_wait` seconds.
    WithMaxWait { users: u64, max_wait: f64 },

    /// Both of the above at once.
    WithinTimeWithMaxWait { users: u64, seconds: f64, max_wait: f64 },

    /// Transport `users` passengers using at most `moves` elevator stops.
    WithinMoves { users: u64, moves: u64 },

    /// Never ends.
    Perpetual,
}

impl EndCondition for Goal {
    fn evaluate(&self, s: &Statistics) -> Outcome {
        match *self {
            Goal::WithinTime { users, seconds } => {
                let met = s.transported >= users;
                Outcome::decide(s.elapsed >= seconds || met, met && s.elapsed <= seconds)
            }
            Goal::WithMaxWait { users, max_wait } => {
                let met = s.transported >= users;
                Outcome::decide(s.max_wait >= max_wait || met, met && s.max_wait <= max_wait)
            }
            Goal::WithinTimeWithMaxWait { users, seconds, max_wait } => {
                let met = s.transported >= users;
                Outcome::decide(
                    s.elapsed >= seconds || s.max_wait >= max_wait || met,
                    met && s.elapsed <= seconds && s.max_wait <= max_wait,
                )
            }
            Goal::WithinMoves { users, moves } => {
                let met = s.transported >= users;
                Outcome::decide(s.move_count >= moves || met, met && s.move_count <= moves)
            }
            Goal::Perpetual => Outcome::Continue,
        }
    }

    fn describe(&self) -> String {
        match *self {
            Goal::WithinTime { users, seconds } => {
                format!("transport {users} people in {seconds:.0} seconds or less")
            }
            Goal::WithMaxWait { users, max_wait } => {
                format!("transport {users} people and let no one wait more than {max_wait:.1} seconds")
            }
            Goal::WithinTimeWithMaxWait { users, seconds, max_wait } => format!(
                "transport {users} people in {seconds:.0} seconds or less \
                 and let no one wait more than {max_wait:.1} seconds"
            ),
            Goal::WithinMoves { users, moves } => {
                format!("transport {users} people using {moves} elevator moves or less")
            }
            Goal::Perpetual => "perpetual demo".to_string(),
        }
    }
}
