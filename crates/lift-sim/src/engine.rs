//! The `Engine` struct and its tick loop.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use lift_building::{Elevator, Floor, Passenger};
use lift_control::{Command, ControlContext, ControlError, ControlEvent, ControlLogic, ControlResult, FloorSnapshot};
use lift_core::{Direction, PassengerId, SimClock};
use tracing::{debug, info, trace, warn};

use crate::spawn::Spawner;
use crate::{
    ChallengeConfig, EndCondition, Outcome, SimError, SimObserver, SimResult, StateView, Statistics,
    StatsThrottle,
};

/// One running challenge: the building, its passengers, and the statistics.
///
/// Each [`tick`][Engine::tick] runs, in order:
///
/// 1. **Clock**: advance simulated time by `dt`.
/// 2. **Spawn**: create any passengers that became due; light call buttons.
/// 3. **Elevators**: advance motion; report floors about to be passed;
///    exit and board passengers at every elevator that arrived.
/// 4. **Cleanup**: drop exited passengers.
/// 5. **Notify**: evaluate the end condition, then send the full state
///    (flagged `ended` on the deciding tick), then statistics (rate limited
///    until the challenge ends).
///
/// Control logic is invoked separately through
/// [`call_user_code`][Engine::call_user_code], once per frame rather than
/// once per tick.  Create via [`EngineBuilder`][crate::EngineBuilder].
pub struct Engine {
    pub(crate) config:        ChallengeConfig,
    pub(crate) clock:         SimClock,
    pub(crate) floors:        Vec<Floor>,
    pub(crate) elevators:     Vec<Elevator>,
    /// Waiting and riding passengers, in spawn order.
    pub(crate) passengers:    Vec<Passenger>,
    pub(crate) stats:         Statistics,
    pub(crate) spawner:       Spawner,
    pub(crate) end_condition: Box<dyn EndCondition>,
    /// Set once the end condition decides; the engine is frozen afterwards.
    pub(crate) outcome:       Option<Outcome>,
    pub(crate) throttle:      StatsThrottle,
    /// Events accumulated for the next control-logic call.
    pub(crate) pending:       Vec<ControlEvent>,
}

impl Engine {
    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &ChallengeConfig {
        &self.config
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    pub fn elevators(&self) -> &[Elevator] {
        &self.elevators
    }

    pub fn passengers(&self) -> &[Passenger] {
        &self.passengers
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    /// Events waiting for the next control-logic call.
    pub fn pending_events(&self) -> &[ControlEvent] {
        &self.pending
    }

    pub fn is_challenge_ended(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn spawned_count(&self) -> u64 {
        self.spawner.spawned()
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Advance the world by `dt` simulated seconds.
    ///
    /// Does nothing once the challenge has ended, or if `dt` is negative or
    /// non-finite.
    pub fn tick<O: SimObserver + ?Sized>(&mut self, dt: f64, observer: &mut O) {
        if self.outcome.is_some() {
            return;
        }
        if let Err(err) = self.clock.advance(dt) {
            warn!(%err, "tick skipped");
            return;
        }
        let now = self.clock.elapsed_secs;

        // ── Spawn ─────────────────────────────────────────────────────────
        for _ in 0..self.spawner.advance(dt) {
            self.spawn_passenger(now, observer);
        }

        // ── Elevators ─────────────────────────────────────────────────────
        for i in 0..self.elevators.len() {
            let arrived = self.elevators[i].tick(dt);
            self.report_passing_floors(i);
            if arrived {
                self.handle_arrival(i, now, observer);
            }
        }

        self.passengers.retain(|p| !p.has_exited());
        let moves = self.elevators.iter().map(Elevator::moves).sum();
        self.stats.refresh(now, moves);

        // ── Notify ────────────────────────────────────────────────────────
        let outcome = self.end_condition.evaluate(&self.stats);
        if outcome.is_decided() {
            self.outcome = Some(outcome);
        }
        observer.on_state(&StateView {
            clock:      &self.clock,
            floors:     &self.floors,
            elevators:  &self.elevators,
            passengers: &self.passengers,
            stats:      &self.stats,
            ended:      outcome.is_decided(),
        });

        if outcome.is_decided() {
            info!(
                %outcome,
                tick = %self.clock.current_tick,
                elapsed = now,
                transported = self.stats.transported,
                avg_wait = self.stats.avg_wait,
                max_wait = self.stats.max_wait,
                moves = self.stats.move_count,
                "challenge ended"
            );
            observer.on_stats(&self.stats);
            observer.on_challenge_ended(outcome, &self.stats);
        } else if self.throttle.allow(now) {
            observer.on_stats(&self.stats);
        }
    }

    /// Place a scripted passenger at `origin`, bound for `destination`,
    /// outside the random passenger stream.
    pub fn add_passenger<O: SimObserver + ?Sized>(
        &mut self,
        origin:      u32,
        destination: u32,
        weight:      u32,
        observer:    &mut O,
    ) -> SimResult<PassengerId> {
        let floor_count = self.config.floor_count;
        if let Some(&floor) = [origin, destination].iter().find(|&&f| f >= floor_count) {
            return Err(SimError::UnknownFloor { floor, floor_count });
        }
        let passenger = Passenger::new(
            self.spawner.allocate_id(),
            weight,
            origin,
            destination,
            self.clock.elapsed_secs,
        )?;
        let id = passenger.id;
        self.admit(passenger, observer);
        Ok(id)
    }

    fn spawn_passenger<O: SimObserver + ?Sized>(&mut self, now: f64, observer: &mut O) {
        match self.spawner.spawn(now) {
            Ok(passenger) => self.admit(passenger, observer),
            Err(err) => warn!(%err, "passenger spawn rejected"),
        }
    }

    /// Add a waiting passenger and light its call button.
    fn admit<O: SimObserver + ?Sized>(&mut self, passenger: Passenger, observer: &mut O) {
        trace!(
            passenger = %passenger.id,
            origin = passenger.origin,
            destination = passenger.destination,
            weight = passenger.weight,
            "passenger spawned"
        );

        let floor = &mut self.floors[passenger.origin as usize];
        if floor.press(passenger.direction()) {
            let snapshot = FloorSnapshot::from(&*floor);
            self.pending.push(ControlEvent::ButtonsChanged(snapshot));
            observer.on_floor_buttons_changed(&snapshot);
        }
        observer.on_passenger_spawned(&passenger);
        self.passengers.push(passenger);
    }

    /// Queue a passing-floor event for every floor the elevator is about to
    /// pass where someone wants to stop in its direction of travel.
    fn report_passing_floors(&mut self, i: usize) {
        let elevator = &self.elevators[i];
        let Some(direction) = elevator.heading() else {
            return;
        };
        for &floor in elevator.passing_floors() {
            let called = self.floors[floor as usize].button(direction);
            if called || elevator.pressed_floors().contains(&floor) {
                self.pending.push(ControlEvent::PassingFloor {
                    elevator: elevator.id(),
                    floor,
                    direction,
                });
            }
        }
    }

    fn handle_arrival<O: SimObserver + ?Sized>(&mut self, i: usize, now: f64, observer: &mut O) {
        let id = self.elevators[i].id();
        let floor = self.elevators[i].current_floor();

        // ── Exit ──────────────────────────────────────────────────────────
        let mut exited = Vec::new();
        for p in self.passengers.iter_mut().filter(|p| p.is_riding(id) && p.destination == floor) {
            match p.exit(now) {
                Ok(wait) => {
                    self.elevators[i].alight(p.id, p.weight);
                    self.stats.record_transport(wait);
                    exited.push(p.id);
                }
                Err(err) => warn!(%err, "exit rejected"),
            }
        }

        // ── Board ─────────────────────────────────────────────────────────
        //
        // Spawn order; a passenger only boards if their call button is still
        // lit and the elevator shows their direction.
        let mut boarded = Vec::new();
        for p in self.passengers.iter_mut().filter(|p| p.is_waiting_at(floor)) {
            let elevator = &mut self.elevators[i];
            if elevator.is_full() {
                break;
            }
            let direction = p.direction();
            if !self.floors[floor as usize].button(direction) || !elevator.indicator(direction) {
                continue;
            }
            if let Err(err) = p.board(id) {
                warn!(%err, "boarding rejected");
                continue;
            }
            elevator.board(p.id, p.weight);
            boarded.push(p.id);
            if elevator.press_floor_button(p.destination) {
                self.pending.push(ControlEvent::FloorButtonPressed { elevator: id, floor: p.destination });
            }
        }

        // ── Call buttons ──────────────────────────────────────────────────
        for direction in [Direction::Up, Direction::Down] {
            let still_needed = self
                .passengers
                .iter()
                .any(|p| p.is_waiting_at(floor) && p.direction() == direction);
            let level = &mut self.floors[floor as usize];
            if !still_needed && level.clear(direction) {
                let snapshot = FloorSnapshot::from(&*level);
                self.pending.push(ControlEvent::ButtonsChanged(snapshot));
                observer.on_floor_buttons_changed(&snapshot);
            }
        }

        debug!(
            elevator = %id,
            floor,
            exited = exited.len(),
            boarded = boarded.len(),
            riders = self.elevators[i].riders().len(),
            "arrival"
        );
        if !exited.is_empty() {
            observer.on_passengers_exited(id, floor, &exited);
        }
        if !boarded.is_empty() {
            observer.on_passengers_boarded(id, floor, &boarded);
        }
        if self.elevators[i].is_idle() {
            self.pending.push(ControlEvent::Idle { elevator: id });
        }
    }

    // ── Control logic ─────────────────────────────────────────────────────

    /// Run the logic's one-time start hook against the current state.
    ///
    /// Pending events are left in place for the first
    /// [`call_user_code`][Engine::call_user_code].
    pub fn start_user_code(&mut self, logic: &mut dyn ControlLogic) -> ControlResult<()> {
        let ctx = ControlContext::capture(
            0.0,
            self.clock.elapsed_secs,
            &self.elevators,
            &self.floors,
            Vec::new(),
        );
        guarded(|| logic.start(&ctx))
    }

    /// Invoke control logic once and apply the commands it returns.
    ///
    /// The logic sees a by-value snapshot plus every event since the previous
    /// call.  Errors and panics are contained: they are logged, reported via
    /// [`SimObserver::on_user_code_error`], and returned; no command from a
    /// failed call is applied.  Returns the number of commands applied.
    pub fn call_user_code<O: SimObserver + ?Sized>(
        &mut self,
        logic:    &mut dyn ControlLogic,
        dt:       f64,
        observer: &mut O,
    ) -> ControlResult<usize> {
        if self.outcome.is_some() {
            return Ok(0);
        }
        let ctx = ControlContext::capture(
            dt,
            self.clock.elapsed_secs,
            &self.elevators,
            &self.floors,
            std::mem::take(&mut self.pending),
        );

        match guarded(|| logic.tick(&ctx)) {
            Ok(commands) => {
                let mut applied = 0;
                for command in commands {
                    if self.apply(command) {
                        applied += 1;
                    }
                }
                Ok(applied)
            }
            Err(err) => {
                warn!(%err, elapsed = self.clock.elapsed_secs, "control logic error");
                observer.on_user_code_error(&err);
                Err(err)
            }
        }
    }

    /// Apply one command.  Returns `false` if it was ignored.
    fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::GoToFloor { elevator, floor } => match self.elevators.get_mut(elevator.index()) {
                Some(e) => {
                    e.go_to_floor(floor);
                    true
                }
                None => {
                    warn!(%elevator, floor, "command for unknown elevator ignored");
                    false
                }
            },
        }
    }
}

/// Run `f`, turning a panic into [`ControlError::Panicked`].
fn guarded<T>(f: impl FnOnce() -> ControlResult<T>) -> ControlResult<T> {
    panic::catch_unwind(AssertUnwindSafe(f))
        .unwrap_or_else(|payload| Err(ControlError::Panicked(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
