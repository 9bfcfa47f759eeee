//! Notifications emitted by the engine and controller.

use lift_building::{Elevator, Floor, Passenger};
use lift_control::{ControlError, FloorSnapshot};
use lift_core::{ElevatorId, PassengerId, SimClock};

use crate::{Outcome, Statistics};

/// Borrowed view of the whole world, handed to
/// [`SimObserver::on_state`] once per tick.
#[derive(Debug, Clone, Copy)]
pub struct StateView<'a> {
    pub clock:      &'a SimClock,
    pub floors:     &'a [Floor],
    pub elevators:  &'a [Elevator],
    /// Passengers still waiting or riding, in spawn order.
    pub passengers: &'a [Passenger],
    pub stats:      &'a Statistics,
    /// `true` only on the tick that decided the challenge.
    pub ended:      bool,
}

/// Callbacks invoked by the [`Engine`][crate::Engine] and
/// [`Controller`][crate::Controller] as the simulation progresses.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: count deliveries
///
/// ```rust,ignore
/// struct Deliveries(usize);
///
/// impl SimObserver for Deliveries {
///     fn on_passengers_exited(&mut self, _e: ElevatorId, _floor: u32, ids: &[PassengerId]) {
///         self.0 += ids.len();
///     }
/// }
/// ```
pub trait SimObserver {
    /// Full world state, after every tick.
    fn on_state(&mut self, _state: &StateView<'_>) {}

    /// Updated statistics.  Rate limited to
    /// [`MAX_STATS_PER_SEC`][crate::MAX_STATS_PER_SEC] per simulated second,
    /// except for the final update when the challenge ends.
    fn on_stats(&mut self, _stats: &Statistics) {}

    fn on_passenger_spawned(&mut self, _passenger: &Passenger) {}

    /// One or more passengers boarded `elevator` at `floor`, in boarding order.
    fn on_passengers_boarded(
        &mut self,
        _elevator:   ElevatorId,
        _floor:      u32,
        _passengers: &[PassengerId],
    ) {}

    /// One or more riders left `elevator` at `floor`.
    fn on_passengers_exited(
        &mut self,
        _elevator:   ElevatorId,
        _floor:      u32,
        _passengers: &[PassengerId],
    ) {}

    /// A floor's call buttons changed.  Only fires on actual transitions.
    fn on_floor_buttons_changed(&mut self, _floor: &FloorSnapshot) {}

    /// The end condition decided the challenge.  Fires exactly once.
    fn on_challenge_ended(&mut self, _outcome: Outcome, _stats: &Statistics) {}

    /// Control logic returned an error or panicked.  The simulation carries on.
    fn on_user_code_error(&mut self, _error: &ControlError) {}

    /// Time scale or pause state changed.
    fn on_time_scale_changed(&mut self, _scale: f64, _paused: bool) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Fans every notification out to any number of subscribers, in
/// subscription order.
#[derive(Default)]
pub struct ObserverSet {
    observers: Vec<Box<dyn SimObserver>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Box<dyn SimObserver>) {
        self.observers.push(observer);
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl SimObserver for ObserverSet {
    fn on_state(&mut self, state: &StateView<'_>) {
        self.observers.iter_mut().for_each(|o| o.on_state(state));
    }

    fn on_stats(&mut self, stats: &Statistics) {
        self.observers.iter_mut().for_each(|o| o.on_stats(stats));
    }

    fn on_passenger_spawned(&mut self, passenger: &Passenger) {
        self.observers.iter_mut().for_each(|o| o.on_passenger_spawned(passenger));
    }

    fn on_passengers_boarded(&mut self, elevator: ElevatorId, floor: u32, passengers: &[PassengerId]) {
        for o in &mut self.observers {
            o.on_passengers_boarded(elevator, floor, passengers);
        }
    }

    fn on_passengers_exited(&mut self, elevator: ElevatorId, floor: u32, passengers: &[PassengerId]) {
        for o in &mut self.observers {
            o.on_passengers_exited(elevator, floor, passengers);
        }
    }

    fn on_floor_buttons_changed(&mut self, floor: &FloorSnapshot) {
        self.observers.iter_mut().for_each(|o| o.on_floor_buttons_changed(floor));
    }

    fn on_challenge_ended(&mut self, outcome: Outcome, stats: &Statistics) {
        self.observers.iter_mut().for_each(|o| o.on_challenge_ended(outcome, stats));
    }

    fn on_user_code_error(&mut self, error: &ControlError) {
        self.observers.iter_mut().for_each(|o| o.on_user_code_error(error));
    }

    fn on_time_scale_changed(&mut self, scale: f64, paused: bool) {
        self.observers.iter_mut().for_each(|o| o.on_time_scale_changed(scale, paused));
    }
}
