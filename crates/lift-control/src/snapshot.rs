//! By-value views of the simulation handed to control logic.

use lift_building::{Elevator, Floor};
use lift_core::{Direction, ElevatorId};

use crate::Command;

/// Read-only copy of one elevator's state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElevatorSnapshot {
    pub id:             ElevatorId,
    /// Position rounded to the nearest floor.
    pub current_floor:  u32,
    /// Exact position in floors.
    pub position:       f64,
    pub destination:    Option<u32>,
    /// Queued requests, ascending.  Excludes `destination`.
    pub queue:          Vec<u32>,
    /// Destinations pressed by riders, ascending.
    pub pressed_floors: Vec<u32>,
    /// Onboard weight relative to rated weight, in `[0, 1]`.
    pub load_factor:    f64,
    pub capacity:       usize,
    pub riders:         usize,
    pub going_up:       bool,
    pub going_down:     bool,
    pub moving:         bool,
}

impl ElevatorSnapshot {
    /// Build the command that queues a stop at `floor` for this elevator.
    pub fn go_to_floor(&self, floor: i64) -> Command {
        Command::GoToFloor { elevator: self.id, floor }
    }

    /// Nothing committed and nothing queued.
    pub fn is_idle(&self) -> bool {
        self.destination.is_none() && self.queue.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.riders >= self.capacity
    }
}

impl From<&Elevator> for ElevatorSnapshot {
    fn from(e: &Elevator) -> Self {
        Self {
            id:             e.id(),
            current_floor:  e.current_floor(),
            position:       e.position(),
            destination:    e.destination(),
            queue:          e.queue().iter().copied().collect(),
            pressed_floors: e.pressed_floors().iter().copied().collect(),
            load_factor:    e.load_factor(),
            capacity:       e.capacity(),
            riders:         e.riders().len(),
            going_up:       e.going_up_indicator(),
            going_down:     e.going_down_indicator(),
            moving:         e.is_moving(),
        }
    }
}

/// Read-only copy of one floor's call buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloorSnapshot {
    pub level: u32,
    pub up:    bool,
    pub down:  bool,
}

impl FloorSnapshot {
    /// Either call button is lit.
    pub fn has_call(&self) -> bool {
        self.up || self.down
    }
}

impl From<&Floor> for FloorSnapshot {
    fn from(f: &Floor) -> Self {
        Self { level: f.level(), up: f.up_pressed(), down: f.down_pressed() }
    }
}

/// Something control logic may want to react to, accumulated by the engine
/// since the previous call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ControlEvent {
    /// The elevator has nothing committed and nothing queued.
    Idle { elevator: ElevatorId },

    /// The elevator is about to pass `floor`, where a matching call button
    /// or a rider's destination is pending.  It can still stop there.
    PassingFloor {
        elevator:  ElevatorId,
        floor:     u32,
        direction: Direction,
    },

    /// A rider inside `elevator` pressed the button for `floor`.
    FloorButtonPressed { elevator: ElevatorId, floor: u32 },

    /// A floor's call buttons changed.
    ButtonsChanged(FloorSnapshot),
}

/// Everything one invocation of control logic gets to see.
///
/// Built fresh for every call; owns all of its data.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlContext {
    /// Simulated seconds covered by this frame.
    pub dt:        f64,
    /// Simulated seconds since the challenge started.
    pub elapsed:   f64,
    pub elevators: Vec<ElevatorSnapshot>,
    pub floors:    Vec<FloorSnapshot>,
    /// Events since the previous call, in the order they happened.
    pub events:    Vec<ControlEvent>,
}

impl ControlContext {
    /// Snapshot `elevators` and `floors` together with pending `events`.
    pub fn capture(
        dt:        f64,
        elapsed:   f64,
        elevators: &[Elevator],
        floors:    &[Floor],
        events:    Vec<ControlEvent>,
    ) -> Self {
        Self {
            dt,
            elapsed,
            elevators: elevators.iter().map(ElevatorSnapshot::from).collect(),
            floors: floors.iter().map(FloorSnapshot::from).collect(),
            events,
        }
    }

    /// Floors with at least one call button lit, ascending.
    pub fn calls(&self) -> impl Iterator<Item = &FloorSnapshot> {
        self.floors.iter().filter(|f| f.has_call())
    }
}
