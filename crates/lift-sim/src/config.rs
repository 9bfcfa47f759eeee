//! Challenge configuration.

use lift_building::DEFAULT_TOP_SPEED;

use crate::{SimError, SimResult};

/// Everything needed to lay out a building and its passenger stream.
///
/// Typically built from a [`Challenge`][crate::Challenge] preset or loaded
/// from JSON by the application, then validated by
/// [`EngineBuilder::build`][crate::EngineBuilder::build].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct ChallengeConfig {
    /// Number of floors, ground floor included.  At least 2.
    pub floor_count: u32,

    /// Number of elevators.  At least 1.
    pub elevator_count: u32,

    /// Per-elevator capacities.  Cycled when shorter than `elevator_count`:
    /// `[4, 6]` with three elevators gives capacities 4, 6, 4.
    pub capacities: Vec<u32>,

    /// Passengers per simulated second.  `0.0` disables spawning.
    pub spawn_rate: f64,

    /// Elevator top speed in floors per second.
    pub top_speed: f64,

    /// Seed for the passenger stream.  The same seed always produces the
    /// same origins, destinations, and weights.
    pub seed: u64,
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            floor_count:    4,
            elevator_count: 2,
            capacities:     vec![4],
            spawn_rate:     0.5,
            top_speed:      DEFAULT_TOP_SPEED,
            seed:           0,
        }
    }
}

impl ChallengeConfig {
    /// Reject configurations that cannot produce a working building.
    pub fn validate(&self) -> SimResult<()> {
        if self.floor_count < 2 {
            return Err(SimError::Config(format!(
                "floor_count must be at least 2, got {}",
                self.floor_count
            )));
        }
        if self.elevator_count < 1 {
            return Err(SimError::Config("elevator_count must be at least 1".into()));
        }
        if self.capacities.is_empty() {
            return Err(SimError::Config("capacities must not be empty".into()));
        }
        if let Some(bad) = self.capacities.iter().find(|&&c| c == 0) {
            return Err(SimError::Config(format!("capacities must be positive, got {bad}")));
        }
        if !self.spawn_rate.is_finite() || self.spawn_rate < 0.0 {
            return Err(SimError::Config(format!(
                "spawn_rate must be finite and non-negative, got {}",
                self.spawn_rate
            )));
        }
        if !self.top_speed.is_finite() || self.top_speed <= 0.0 {
            return Err(SimError::Config(format!(
                "top_speed must be finite and positive, got {}",
                self.top_speed
            )));
        }
        Ok(())
    }

    /// Capacity of elevator number `index`, cycling through `capacities`.
    pub fn capacity_for(&self, index: usize) -> u32 {
        self.capacities[index % self.capacities.len()]
    }
}
