//! Passenger lifecycle: waiting → riding → exited.

use lift_core::{Direction, ElevatorId, PassengerId};

use crate::{BuildingError, BuildingResult};

/// Where a passenger is in its lifecycle.
///
/// `Riding` carries the elevator id as a non-owning back-reference; the
/// elevator itself owns the onboard set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PassengerState {
    Waiting,
    Riding(ElevatorId),
    Exited,
}

impl PassengerState {
    fn as_str(self) -> &'static str {
        match self {
            PassengerState::Waiting    => "waiting",
            PassengerState::Riding(_)  => "riding",
            PassengerState::Exited     => "exited",
        }
    }
}

/// A single rider.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Passenger {
    pub id:             PassengerId,
    /// Weight in kilograms; contributes to the elevator load factor.
    pub weight:         u32,
    pub origin:         u32,
    pub destination:    u32,
    /// Simulated seconds at which the passenger appeared.
    pub spawned_at:     f64,
    /// Simulated seconds at which the passenger left the elevator.
    pub transported_at: Option<f64>,
    pub state:          PassengerState,
}

impl Passenger {
    /// Create a waiting passenger.
    ///
    /// # Errors
    /// [`BuildingError::SameFloor`] if `origin == destination`.
    pub fn new(
        id:          PassengerId,
        weight:      u32,
        origin:      u32,
        destination: u32,
        spawned_at:  f64,
    ) -> BuildingResult<Self> {
        if origin == destination {
            return Err(BuildingError::SameFloor(origin));
        }
        Ok(Self {
            id,
            weight,
            origin,
            destination,
            spawned_at,
            transported_at: None,
            state: PassengerState::Waiting,
        })
    }

    /// Direction of the trip.  Never ambiguous since origin ≠ destination.
    #[inline]
    pub fn direction(&self) -> Direction {
        if self.destination > self.origin { Direction::Up } else { Direction::Down }
    }

    /// `true` while the passenger waits at `floor` for any elevator.
    #[inline]
    pub fn is_waiting_at(&self, floor: u32) -> bool {
        self.state == PassengerState::Waiting && self.origin == floor
    }

    /// `true` while the passenger rides `elevator`.
    #[inline]
    pub fn is_riding(&self, elevator: ElevatorId) -> bool {
        self.state == PassengerState::Riding(elevator)
    }

    #[inline]
    pub fn has_exited(&self) -> bool {
        self.state == PassengerState::Exited
    }

    /// Waiting → riding `elevator`.
    pub fn board(&mut self, elevator: ElevatorId) -> BuildingResult<()> {
        if self.state != PassengerState::Waiting {
            return Err(self.invalid("board"));
        }
        self.state = PassengerState::Riding(elevator);
        Ok(())
    }

    /// Riding → exited at simulated time `now`.  Returns the total wait
    /// (`now - spawned_at`), which is what the statistics score.
    pub fn exit(&mut self, now: f64) -> BuildingResult<f64> {
        if !matches!(self.state, PassengerState::Riding(_)) {
            return Err(self.invalid("exit"));
        }
        self.state = PassengerState::Exited;
        self.transported_at = Some(now);
        Ok(now - self.spawned_at)
    }

    /// Time between spawn and exit, once transported.
    pub fn wait_time(&self) -> Option<f64> {
        self.transported_at.map(|t| t - self.spawned_at)
    }

    fn invalid(&self, action: &'static str) -> BuildingError {
        BuildingError::InvalidTransition {
            passenger: self.id,
            action,
            state: self.state.as_str(),
        }
    }
}
