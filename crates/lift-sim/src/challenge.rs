//! Built-in challenge presets.

use crate::{ChallengeConfig, Goal};

/// A named configuration paired with its goal.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Challenge {
    pub config: ChallengeConfig,
    pub goal:   Goal,
}

fn preset(
    floor_count:    u32,
    elevator_count: u32,
    capacities:     &[u32],
    spawn_rate:     f64,
    goal:           Goal,
) -> Challenge {
    Challenge {
        config: ChallengeConfig {
            floor_count,
            elevator_count,
            capacities: capacities.to_vec(),
            spawn_rate,
            ..ChallengeConfig::default()
        },
        goal,
    }
}

/// The standard challenge ladder, easiest first.  The last entry is a
/// perpetual demo.
pub fn presets() -> Vec<Challenge> {
    use Goal::*;
    vec![
        preset(3, 1, &[4], 0.3, WithinTime { users: 15, seconds: 60.0 }),
        preset(5, 1, &[6], 0.4, WithinTime { users: 20, seconds: 60.0 }),
        preset(5, 1, &[8], 0.5, WithinTime { users: 23, seconds: 60.0 }),
        preset(8, 2, &[4], 0.6, WithinTime { users: 28, seconds: 60.0 }),
        preset(6, 4, &[4], 1.7, WithinTime { users: 100, seconds: 68.0 }),
        preset(4, 2, &[4], 0.8, WithinMoves { users: 40, moves: 60 }),
        preset(3, 3, &[4], 3.0, WithinMoves { users: 100, moves: 63 }),
        preset(6, 2, &[5], 0.4, WithMaxWait { users: 50, max_wait: 21.0 }),
        preset(7, 3, &[4], 0.6, WithMaxWait { users: 50, max_wait: 20.0 }),
        preset(13, 2, &[4, 10], 1.1, WithinTime { users: 50, seconds: 70.0 }),
        preset(9, 5, &[4], 1.1, WithMaxWait { users: 60, max_wait: 19.0 }),
        preset(9, 5, &[4], 1.1, WithMaxWait { users: 80, max_wait: 17.0 }),
        preset(9, 5, &[5], 1.1, WithinTimeWithMaxWait { users: 100, seconds: 70.0, max_wait: 15.0 }),
        preset(9, 5, &[6], 1.0, WithinTimeWithMaxWait { users: 110, seconds: 80.0, max_wait: 15.0 }),
        preset(21, 5, &[10], 1.9, Perpetual),
    ]
}
