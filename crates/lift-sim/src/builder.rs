//! Fluent builder for constructing an [`Engine`].

use lift_building::{Elevator, Floor};
use lift_control::ControlEvent;
use lift_core::{ElevatorId, SimClock};
use tracing::info;

use crate::spawn::{LobbyBias, Spawner};
use crate::{ChallengeConfig, EndCondition, Engine, Goal, SimError, SimResult, Statistics, StatsThrottle};

/// Fluent builder for [`Engine`].
///
/// # Optional inputs (have defaults)
///
/// | Method               | Default            |
/// |----------------------|--------------------|
/// | `.end_condition(c)`  | [`Goal::Perpetual`] |
/// | `.lobby_bias(b)`     | [`LOBBY_BIAS`][crate::spawn::LOBBY_BIAS] |
///
/// # Example
///
/// ```rust,ignore
/// let mut engine = EngineBuilder::new(ChallengeConfig::default())
///     .end_condition(Goal::WithinTime { users: 15, seconds: 60.0 })
///     .build()?;
/// engine.tick(1.0 / 60.0, &mut NoopObserver);
/// ```
pub struct EngineBuilder {
    config:        ChallengeConfig,
    end_condition: Box<dyn EndCondition>,
    bias:          LobbyBias,
}

impl EngineBuilder {
    pub fn new(config: ChallengeConfig) -> Self {
        Self {
            config,
            end_condition: Box::new(Goal::Perpetual),
            bias:          LobbyBias::default(),
        }
    }

    pub fn end_condition(mut self, condition: impl EndCondition + 'static) -> Self {
        self.end_condition = Box::new(condition);
        self
    }

    /// Override the passenger-stream shape.
    pub fn lobby_bias(mut self, bias: LobbyBias) -> Self {
        self.bias = bias;
        self
    }

    /// Validate the config, lay out floors and elevators, and return a
    /// ready-to-tick [`Engine`].
    ///
    /// Every elevator starts idle at floor 0, so the first call into control
    /// logic sees one [`ControlEvent::Idle`] per elevator.
    pub fn build(self) -> SimResult<Engine> {
        let config = self.config;
        config.validate()?;

        let (lo, hi) = self.bias.weight_range;
        if lo > hi || !(0.0..=1.0).contains(&self.bias.lobby_share) {
            return Err(SimError::Config(format!("invalid lobby bias {:?}", self.bias)));
        }
        let (num, den) = self.bias.detour_odds;
        if den == 0 || num > den {
            return Err(SimError::Config(format!("invalid detour odds {num}/{den}")));
        }

        let floors: Vec<Floor> = (0..config.floor_count).map(Floor::new).collect();
        let elevators: Vec<Elevator> = (0..config.elevator_count)
            .map(|i| {
                Elevator::new(
                    ElevatorId(i),
                    config.floor_count,
                    config.capacity_for(i as usize) as usize,
                    config.top_speed,
                )
            })
            .collect();
        let pending = elevators
            .iter()
            .map(|e| ControlEvent::Idle { elevator: e.id() })
            .collect();

        info!(
            floors = config.floor_count,
            elevators = config.elevator_count,
            spawn_rate = config.spawn_rate,
            seed = config.seed,
            goal = %self.end_condition.describe(),
            "challenge initialized"
        );

        Ok(Engine {
            spawner:       Spawner::new(config.floor_count, config.spawn_rate, config.seed, self.bias),
            config,
            clock:         SimClock::new(),
            floors,
            elevators,
            passengers:    Vec::new(),
            stats:         Statistics::default(),
            end_condition: self.end_condition,
            outcome:       None,
            throttle:      StatsThrottle::default(),
            pending,
        })
    }
}
