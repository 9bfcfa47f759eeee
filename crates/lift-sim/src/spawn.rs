//! Passenger generation.

use lift_building::{BuildingResult, Passenger};
use lift_core::{PassengerId, SimRng};

/// Shape of the passenger stream.
///
/// Half of all passengers appear in the lobby (floor 0) heading upstairs;
/// everyone else appears on a uniformly chosen floor and mostly heads down
/// to the lobby, with an occasional trip to another floor instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LobbyBias {
    /// Probability that a passenger starts in the lobby.
    pub lobby_share:  f64,
    /// Chance, as `numerator / denominator`, that a passenger starting above
    /// the lobby goes somewhere other than the lobby.
    pub detour_odds:  (u32, u32),
    /// Inclusive passenger weight range in kilograms.
    pub weight_range: (u32, u32),
}

pub const LOBBY_BIAS: LobbyBias = LobbyBias {
    lobby_share:  0.5,
    detour_odds:  (1, 11),
    weight_range: (55, 100),
};

impl Default for LobbyBias {
    fn default() -> Self {
        LOBBY_BIAS
    }
}

/// Turns elapsed time into a deterministic stream of passengers.
#[derive(Debug)]
pub struct Spawner {
    floor_count: u32,
    /// Seconds between spawns; `None` when spawning is disabled.
    interval:    Option<f64>,
    accumulator: f64,
    bias:        LobbyBias,
    rng:         SimRng,
    next_id:     u64,
}

impl Spawner {
    /// `spawn_rate` is in passengers per second; `0.0` never spawns.
    pub fn new(floor_count: u32, spawn_rate: f64, seed: u64, bias: LobbyBias) -> Self {
        Self {
            floor_count,
            interval: (spawn_rate > 0.0).then(|| 1.0 / spawn_rate),
            accumulator: 0.0,
            bias,
            rng: SimRng::new(seed),
            next_id: 0,
        }
    }

    /// Accumulate `dt` seconds and return how many spawns became due.
    pub fn advance(&mut self, dt: f64) -> usize {
        let Some(interval) = self.interval else {
            return 0;
        };
        self.accumulator += dt;
        let mut due = 0;
        while self.accumulator > interval {
            self.accumulator -= interval;
            due += 1;
        }
        due
    }

    /// Draw `(origin, destination)`.  The two always differ.
    pub fn trip(&mut self) -> (u32, u32) {
        let n = self.floor_count;
        let origin = if self.rng.gen_bool(self.bias.lobby_share) {
            0
        } else {
            self.rng.gen_range(0..n)
        };
        let destination = if origin == 0 {
            self.rng.gen_range(1..n)
        } else {
            let (num, den) = self.bias.detour_odds;
            if self.rng.gen_ratio(num, den) {
                (origin + self.rng.gen_range(1..n)) % n
            } else {
                0
            }
        };
        (origin, destination)
    }

    /// Create the next passenger, spawned at `now`.
    pub fn spawn(&mut self, now: f64) -> BuildingResult<Passenger> {
        let (origin, destination) = self.trip();
        let (lo, hi) = self.bias.weight_range;
        let weight = self.rng.gen_range(lo..=hi);
        Passenger::new(self.allocate_id(), weight, origin, destination, now)
    }

    /// Hand out the next passenger id.  Ids are never reused.
    pub fn allocate_id(&mut self) -> PassengerId {
        let id = PassengerId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn spawned(&self) -> u64 {
        self.next_id
    }
}
