//! Unit and scenario tests for lift-sim.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use lift_building::Passenger;
use lift_control::{
    from_fn, Command, ControlContext, ControlError, ControlEvent, ControlLogic, ControlResult,
    FloorSnapshot, NoopController,
};
use lift_core::{Direction, ElevatorId, PassengerId};

use crate::{
    ChallengeConfig, Controller, ControllerState, Engine, EngineBuilder, Goal, NoopObserver,
    Outcome, SimError, SimObserver, StateView, Statistics,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const DT: f64 = 1.0 / 60.0;

/// A building with no random passengers.
fn quiet_config(floor_count: u32, elevator_count: u32) -> ChallengeConfig {
    ChallengeConfig {
        floor_count,
        elevator_count,
        capacities: vec![4],
        spawn_rate: 0.0,
        ..ChallengeConfig::default()
    }
}

fn engine(config: ChallengeConfig) -> Engine {
    EngineBuilder::new(config).build().unwrap()
}

/// Tick until elevator 0 opens its doors; returns the number of ticks taken.
fn run_until_doors<O: SimObserver>(engine: &mut Engine, observer: &mut O, max_ticks: usize) -> usize {
    for n in 1..=max_ticks {
        engine.tick(DT, observer);
        if engine.elevators()[0].doors_open() {
            return n;
        }
    }
    panic!("doors did not open within {max_ticks} ticks");
}

#[derive(Default)]
struct Log {
    states:          usize,
    ended_states:    usize,
    stats:           usize,
    spawned:         usize,
    button_changes:  Vec<FloorSnapshot>,
    boarded:         Vec<(ElevatorId, u32, Vec<PassengerId>)>,
    exited:          Vec<(ElevatorId, u32, Vec<PassengerId>)>,
    ended:           Vec<Outcome>,
    errors:          Vec<ControlError>,
    scales:          Vec<(f64, bool)>,
}

/// Records every notification into a shared [`Log`].
#[derive(Clone, Default)]
struct Recorder(Rc<RefCell<Log>>);

impl SimObserver for Recorder {
    fn on_state(&mut self, state: &StateView<'_>) {
        let mut log = self.0.borrow_mut();
        log.states += 1;
        if state.ended {
            assert!(log.ended.is_empty(), "ended state must precede the outcome");
            log.ended_states += 1;
        }
    }

    fn on_stats(&mut self, _stats: &Statistics) {
        self.0.borrow_mut().stats += 1;
    }

    fn on_passenger_spawned(&mut self, _passenger: &Passenger) {
        self.0.borrow_mut().spawned += 1;
    }

    fn on_passengers_boarded(&mut self, elevator: ElevatorId, floor: u32, ids: &[PassengerId]) {
        self.0.borrow_mut().boarded.push((elevator, floor, ids.to_vec()));
    }

    fn on_passengers_exited(&mut self, elevator: ElevatorId, floor: u32, ids: &[PassengerId]) {
        self.0.borrow_mut().exited.push((elevator, floor, ids.to_vec()));
    }

    fn on_floor_buttons_changed(&mut self, floor: &FloorSnapshot) {
        self.0.borrow_mut().button_changes.push(*floor);
    }

    fn on_challenge_ended(&mut self, outcome: Outcome, _stats: &Statistics) {
        self.0.borrow_mut().ended.push(outcome);
    }

    fn on_user_code_error(&mut self, error: &ControlError) {
        self.0.borrow_mut().errors.push(error.clone());
    }

    fn on_time_scale_changed(&mut self, scale: f64, paused: bool) {
        self.0.borrow_mut().scales.push((scale, paused));
    }
}

/// Asserts world invariants on every state notification.
struct InvariantChecker;

impl SimObserver for InvariantChecker {
    fn on_state(&mut self, state: &StateView<'_>) {
        for e in state.elevators {
            assert!(e.riders().len() <= e.capacity(), "{} over capacity", e.id());
            assert!((0.0..=1.0).contains(&e.load_factor()));
            assert!(e.position() >= 0.0 && e.position() <= (state.floors.len() - 1) as f64);
        }
        for p in state.passengers {
            assert_ne!(p.origin, p.destination);
            assert!(!p.has_exited(), "exited passengers are dropped each tick");
            let riding = state.elevators.iter().filter(|e| e.riders().contains(&p.id)).count();
            assert!(riding <= 1, "{} aboard more than one elevator", p.id);
        }
    }
}

/// Sends each idle elevator to a pressed floor, else to the first call.
fn nearest_call_logic() -> impl ControlLogic {
    from_fn(|ctx: &ControlContext| {
        let mut commands = Vec::new();
        for e in ctx.elevators.iter().filter(|e| e.is_idle()) {
            if let Some(&floor) = e.pressed_floors.first() {
                commands.push(e.go_to_floor(floor as i64));
            } else if let Some(call) = ctx.calls().next() {
                commands.push(e.go_to_floor(call.level as i64));
            }
        }
        Ok(commands)
    })
}

/// Measures each delivered passenger's wait from spawn and exit
/// notifications, timing exits with the clock of the same tick.
#[derive(Default)]
struct WaitTracker {
    spawned_at: HashMap<PassengerId, f64>,
    exiting:    Vec<PassengerId>,
    waits:      Vec<f64>,
}

impl SimObserver for WaitTracker {
    fn on_passenger_spawned(&mut self, passenger: &Passenger) {
        self.spawned_at.insert(passenger.id, passenger.spawned_at);
    }

    fn on_passengers_exited(&mut self, _elevator: ElevatorId, _floor: u32, ids: &[PassengerId]) {
        self.exiting.extend_from_slice(ids);
    }

    fn on_state(&mut self, state: &StateView<'_>) {
        let now = state.clock.elapsed_secs;
        for id in self.exiting.drain(..) {
            let spawned = self.spawned_at.remove(&id).expect("exit without spawn");
            self.waits.push(now - spawned);
        }
    }
}

// ── ChallengeConfig / EngineBuilder ───────────────────────────────────────────

#[cfg(test)]
mod config_tests {
    use super::*;
    use crate::LobbyBias;

    #[test]
    fn default_config_is_valid() {
        assert!(ChallengeConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_unusable_configs() {
        let bad = [
            ChallengeConfig { floor_count: 1, ..ChallengeConfig::default() },
            ChallengeConfig { elevator_count: 0, ..ChallengeConfig::default() },
            ChallengeConfig { capacities: vec![], ..ChallengeConfig::default() },
            ChallengeConfig { capacities: vec![4, 0], ..ChallengeConfig::default() },
            ChallengeConfig { spawn_rate: -1.0, ..ChallengeConfig::default() },
            ChallengeConfig { spawn_rate: f64::NAN, ..ChallengeConfig::default() },
            ChallengeConfig { top_speed: 0.0, ..ChallengeConfig::default() },
        ];
        for config in bad {
            let err = EngineBuilder::new(config.clone()).build().err();
            assert!(matches!(err, Some(SimError::Config(_))), "accepted {config:?}");
        }
    }

    #[test]
    fn capacities_cycle_across_elevators() {
        let config = ChallengeConfig {
            elevator_count: 3,
            capacities: vec![4, 6],
            ..quiet_config(5, 3)
        };
        let e = engine(config);
        let caps: Vec<usize> = e.elevators().iter().map(|e| e.capacity()).collect();
        assert_eq!(caps, vec![4, 6, 4]);
    }

    #[test]
    fn rejects_bad_lobby_bias() {
        let bias = LobbyBias { detour_odds: (3, 2), ..LobbyBias::default() };
        let result = EngineBuilder::new(quiet_config(3, 1)).lobby_bias(bias).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn new_engine_reports_every_elevator_idle() {
        let e = engine(quiet_config(4, 3));
        let expected: Vec<ControlEvent> =
            (0..3).map(|i| ControlEvent::Idle { elevator: ElevatorId(i) }).collect();
        assert_eq!(e.pending_events(), expected.as_slice());
        assert!(e.elevators().iter().all(|e| e.current_floor() == 0));
        assert_eq!(e.floors().len(), 4);
    }
}

// ── Statistics / throttle / goals ─────────────────────────────────────────────

#[cfg(test)]
mod stats_tests {
    use super::*;
    use crate::{EndCondition, StatsThrottle};

    #[test]
    fn running_average_equals_mean() {
        let mut s = Statistics::default();
        for wait in [3.0, 5.0, 10.0, 2.0] {
            s.record_transport(wait);
        }
        assert_eq!(s.transported, 4);
        assert!((s.avg_wait - 5.0).abs() < 1e-12);
        assert_eq!(s.max_wait, 10.0);
    }

    #[test]
    fn refresh_derives_rate() {
        let mut s = Statistics::default();
        s.refresh(0.0, 0);
        assert_eq!(s.transported_per_sec, 0.0);
        s.record_transport(1.0);
        s.record_transport(1.0);
        s.refresh(4.0, 7);
        assert!((s.transported_per_sec - 0.5).abs() < 1e-12);
        assert_eq!(s.move_count, 7);
    }

    #[test]
    fn throttle_limits_rate() {
        let mut t = StatsThrottle::new(30.0);
        assert!(t.allow(0.0));
        assert!(!t.allow(0.01));
        assert!(!t.allow(0.03));
        assert!(t.allow(0.034));
        assert!(!t.allow(0.05));
    }

    fn stats(elapsed: f64, transported: u64, max_wait: f64, move_count: u64) -> Statistics {
        Statistics { elapsed, transported, max_wait, move_count, ..Statistics::default() }
    }

    #[test]
    fn within_time_goal() {
        let goal = Goal::WithinTime { users: 10, seconds: 60.0 };
        assert_eq!(goal.evaluate(&stats(30.0, 5, 0.0, 0)), Outcome::Continue);
        assert_eq!(goal.evaluate(&stats(45.0, 10, 0.0, 0)), Outcome::Succeeded);
        assert_eq!(goal.evaluate(&stats(60.5, 9, 0.0, 0)), Outcome::Failed);
    }

    #[test]
    fn max_wait_goal() {
        let goal = Goal::WithMaxWait { users: 5, max_wait: 20.0 };
        assert_eq!(goal.evaluate(&stats(100.0, 3, 19.0, 0)), Outcome::Continue);
        assert_eq!(goal.evaluate(&stats(100.0, 5, 19.0, 0)), Outcome::Succeeded);
        assert_eq!(goal.evaluate(&stats(100.0, 3, 21.0, 0)), Outcome::Failed);
    }

    #[test]
    fn combined_goal_needs_every_limit() {
        let goal = Goal::WithinTimeWithMaxWait { users: 5, seconds: 60.0, max_wait: 15.0 };
        assert_eq!(goal.evaluate(&stats(10.0, 1, 3.0, 0)), Outcome::Continue);
        assert_eq!(goal.evaluate(&stats(61.0, 2, 3.0, 0)), Outcome::Failed);
        assert_eq!(goal.evaluate(&stats(20.0, 2, 16.0, 0)), Outcome::Failed);
        assert_eq!(goal.evaluate(&stats(50.0, 5, 14.0, 0)), Outcome::Succeeded);
    }

    #[test]
    fn moves_goal() {
        let goal = Goal::WithinMoves { users: 4, moves: 10 };
        assert_eq!(goal.evaluate(&stats(0.0, 3, 0.0, 9)), Outcome::Continue);
        assert_eq!(goal.evaluate(&stats(0.0, 4, 0.0, 10)), Outcome::Succeeded);
        assert_eq!(goal.evaluate(&stats(0.0, 3, 0.0, 10)), Outcome::Failed);
    }

    #[test]
    fn perpetual_and_closures() {
        assert_eq!(Goal::Perpetual.evaluate(&stats(1e9, 1_000, 1e3, 1_000)), Outcome::Continue);
        let custom = |s: &Statistics| {
            if s.transported > 0 { Outcome::Succeeded } else { Outcome::Continue }
        };
        assert_eq!(custom.evaluate(&stats(0.0, 1, 0.0, 0)), Outcome::Succeeded);
        assert!(Outcome::Failed.is_decided());
        assert!(!Outcome::Continue.is_decided());
    }

    #[test]
    fn presets_are_valid_and_end_with_demo() {
        let all = crate::presets();
        assert!(all.len() > 5);
        for challenge in &all {
            assert!(challenge.config.validate().is_ok(), "{challenge:?}");
        }
        assert_eq!(all.last().map(|c| c.goal), Some(Goal::Perpetual));
        assert!(all[0].goal.describe().contains("15 people"));
    }
}

// ── Engine: passengers and arrivals ───────────────────────────────────────────

#[cfg(test)]
mod engine_tests {
    use super::*;

    #[test]
    fn zero_spawn_rate_never_spawns() {
        let mut e = engine(quiet_config(4, 1));
        for _ in 0..600 {
            e.tick(DT, &mut NoopObserver);
        }
        assert!(e.passengers().is_empty());
        assert_eq!(e.spawned_count(), 0);
    }

    #[test]
    fn spawned_passengers_are_deterministic_and_valid() {
        let config = ChallengeConfig { floor_count: 6, spawn_rate: 2.0, seed: 7, ..ChallengeConfig::default() };
        let mut a = engine(config.clone());
        let mut b = engine(config);
        let mut rec = Recorder::default();
        for _ in 0..300 {
            a.tick(DT, &mut rec);
            b.tick(DT, &mut NoopObserver);
        }
        let trips = |e: &Engine| -> Vec<(u32, u32, u32)> {
            e.passengers().iter().map(|p| (p.origin, p.destination, p.weight)).collect()
        };
        assert_eq!(trips(&a), trips(&b));
        assert!(a.passengers().len() >= 8);
        assert_eq!(rec.0.borrow().spawned, a.passengers().len());
        for p in a.passengers() {
            assert_ne!(p.origin, p.destination);
            assert!(p.origin < 6 && p.destination < 6);
            assert!((55..=100).contains(&p.weight));
        }
    }

    #[test]
    fn pressing_a_lit_button_notifies_once() {
        let mut e = engine(quiet_config(4, 1));
        let mut rec = Recorder::default();
        e.add_passenger(0, 2, 70, &mut rec).unwrap();
        e.add_passenger(0, 3, 80, &mut rec).unwrap();

        let log = rec.0.borrow();
        assert_eq!(log.button_changes, vec![FloorSnapshot { level: 0, up: true, down: false }]);
        let changes = e
            .pending_events()
            .iter()
            .filter(|ev| matches!(ev, ControlEvent::ButtonsChanged(_)))
            .count();
        assert_eq!(changes, 1);
    }

    #[test]
    fn add_passenger_validates_floors() {
        let mut e = engine(quiet_config(3, 1));
        assert!(matches!(
            e.add_passenger(0, 3, 70, &mut NoopObserver),
            Err(SimError::UnknownFloor { floor: 3, floor_count: 3 })
        ));
        assert!(matches!(e.add_passenger(1, 1, 70, &mut NoopObserver), Err(SimError::Building(_))));
        assert!(e.passengers().is_empty());
    }

    #[test]
    fn boards_only_when_stopped_at_origin() {
        let mut e = engine(quiet_config(3, 1));
        let mut rec = Recorder::default();
        let pid = e.add_passenger(0, 2, 70, &mut rec).unwrap();

        // Idle with doors closed: nobody boards.
        e.tick(DT, &mut rec);
        assert!(e.passengers()[0].is_waiting_at(0));
        assert!(e.elevators()[0].riders().is_empty());

        let mut logic = from_fn(|ctx: &ControlContext| Ok(vec![ctx.elevators[0].go_to_floor(0)]));
        assert_eq!(e.call_user_code(&mut logic, DT, &mut rec), Ok(1));
        e.tick(DT, &mut rec);

        assert!(e.passengers()[0].is_riding(ElevatorId(0)));
        assert!(!e.passengers().iter().any(|p| p.is_waiting_at(0)));
        assert_eq!(e.elevators()[0].riders(), &[pid]);
        assert!(e.elevators()[0].pressed_floors().contains(&2));
        assert!(!e.floors()[0].up_pressed());

        let log = rec.0.borrow();
        assert_eq!(log.boarded, vec![(ElevatorId(0), 0, vec![pid])]);
        assert_eq!(log.button_changes.len(), 2, "lit on spawn, cleared on boarding");
        assert!(e
            .pending_events()
            .contains(&ControlEvent::FloorButtonPressed { elevator: ElevatorId(0), floor: 2 }));
        assert!(e.pending_events().contains(&ControlEvent::Idle { elevator: ElevatorId(0) }));
    }

    #[test]
    fn indicator_gates_boarding() {
        let mut e = engine(quiet_config(5, 1));
        let mut obs = NoopObserver;
        e.elevators[0].go_to_floor(4);
        run_until_doors(&mut e, &mut obs, 2_000);

        let up = e.add_passenger(2, 4, 70, &mut obs).unwrap();
        let down = e.add_passenger(2, 0, 70, &mut obs).unwrap();
        e.elevators[0].go_to_floor(2);
        e.elevators[0].go_to_floor(0);
        run_until_doors(&mut e, &mut obs, 2_000);

        assert_eq!(e.elevators()[0].current_floor(), 2);
        assert!(e.elevators()[0].going_down_indicator());
        assert!(!e.elevators()[0].going_up_indicator());
        assert_eq!(e.elevators()[0].riders(), &[down]);
        let waiting: Vec<PassengerId> = e.passengers().iter().filter(|p| p.is_waiting_at(2)).map(|p| p.id).collect();
        assert_eq!(waiting, vec![up]);
        assert!(e.floors()[2].up_pressed(), "still needed by the upward passenger");
        assert!(!e.floors()[2].down_pressed());
    }

    #[test]
    fn capacity_is_respected_in_spawn_order() {
        let config = ChallengeConfig { capacities: vec![2], ..quiet_config(3, 1) };
        let mut e = engine(config);
        let mut rec = Recorder::default();
        let ids: Vec<PassengerId> =
            (0..4).map(|_| e.add_passenger(0, 2, 90, &mut rec).unwrap()).collect();

        e.elevators[0].go_to_floor(0);
        e.tick(DT, &mut rec);
        assert_eq!(e.elevators()[0].riders(), &ids[..2]);
        assert!(e.elevators()[0].is_full());
        assert_eq!(e.passengers().iter().filter(|p| p.is_waiting_at(0)).count(), 2);
        assert!(e.floors()[0].up_pressed());

        // Deliver the two riders; both waited the whole trip.
        e.elevators[0].go_to_floor(2);
        run_until_doors(&mut e, &mut rec, 2_000);
        let s = *e.stats();
        assert_eq!(s.transported, 2);
        assert!((s.avg_wait - s.elapsed).abs() < 1e-9);
        assert_eq!(s.max_wait, s.avg_wait);
        assert_eq!(s.move_count, 2);
        assert_eq!(e.passengers().len(), 2, "exited passengers are dropped");
        assert!(e.elevators()[0].riders().is_empty());
        assert_eq!(e.elevators()[0].load_factor(), 0.0);

        let log = rec.0.borrow();
        assert_eq!(log.exited, vec![(ElevatorId(0), 2, ids[..2].to_vec())]);
    }

    #[test]
    fn passing_floor_reported_only_where_called() {
        let mut e = engine(quiet_config(6, 1));
        let mut obs = NoopObserver;
        e.add_passenger(3, 5, 70, &mut obs).unwrap();
        e.add_passenger(2, 0, 70, &mut obs).unwrap();
        e.elevators[0].go_to_floor(5);
        run_until_doors(&mut e, &mut obs, 5_000);

        let passing: Vec<(u32, Direction)> = e
            .pending_events()
            .iter()
            .filter_map(|ev| match *ev {
                ControlEvent::PassingFloor { floor, direction, .. } => Some((floor, direction)),
                _ => None,
            })
            .collect();
        assert_eq!(passing, vec![(3, Direction::Up)]);
    }

    #[test]
    fn ended_engine_is_frozen() {
        let config = quiet_config(6, 1);
        let mut e = EngineBuilder::new(config)
            .end_condition(|s: &Statistics| {
                if s.elapsed >= 1.0 { Outcome::Failed } else { Outcome::Continue }
            })
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        e.elevators[0].go_to_floor(5);

        let mut ticks = 0;
        while !e.is_challenge_ended() {
            e.tick(DT, &mut rec);
            ticks += 1;
            assert!(ticks < 200);
        }
        assert_eq!(e.outcome(), Some(Outcome::Failed));

        let stats = *e.stats();
        let position = e.elevators()[0].position();
        let elapsed = e.clock().elapsed_secs;
        assert!(e.elevators()[0].is_moving());
        e.tick(DT, &mut rec);
        assert_eq!(*e.stats(), stats);
        assert_eq!(e.elevators()[0].position(), position);
        assert_eq!(e.clock().elapsed_secs, elapsed);

        let mut logic = from_fn(|_ctx: &ControlContext| -> ControlResult<Vec<Command>> {
            panic!("must not be called after the end")
        });
        assert_eq!(e.call_user_code(&mut logic, DT, &mut rec), Ok(0));

        let log = rec.0.borrow();
        assert_eq!(log.ended, vec![Outcome::Failed]);
        assert_eq!(log.states, ticks);
        assert_eq!(log.ended_states, 1, "only the deciding tick is flagged");
    }

    #[test]
    fn stats_notifications_are_rate_limited() {
        let mut e = engine(quiet_config(3, 1));
        let mut rec = Recorder::default();
        for _ in 0..600 {
            e.tick(1.0 / 600.0, &mut rec);
        }
        let log = rec.0.borrow();
        assert_eq!(log.states, 600);
        assert!((25..=31).contains(&log.stats), "{} stats notifications", log.stats);
    }

    #[test]
    fn average_wait_matches_delivered_passengers() {
        let config = ChallengeConfig { seed: 7, ..crate::presets()[3].config.clone() };
        let mut e = engine(config);
        let mut tracker = WaitTracker::default();
        let mut logic = nearest_call_logic();
        e.start_user_code(&mut logic).unwrap();
        for _ in 0..6_000 {
            e.tick(DT, &mut tracker);
            e.call_user_code(&mut logic, DT, &mut tracker).unwrap();
        }

        let n = tracker.waits.len();
        assert!(n >= 10, "only {n} deliveries");
        assert_eq!(e.stats().transported, n as u64);
        let mean = tracker.waits.iter().sum::<f64>() / n as f64;
        let max = tracker.waits.iter().copied().fold(0.0, f64::max);
        assert!((e.stats().avg_wait - mean).abs() < 1e-9, "{} vs {mean}", e.stats().avg_wait);
        assert!((e.stats().max_wait - max).abs() < 1e-9);
    }

    #[test]
    fn extreme_weight_boards_without_overflow() {
        let mut e = engine(quiet_config(3, 1));
        let mut rec = Recorder::default();
        let heavy = e.add_passenger(0, 2, u32::MAX, &mut rec).unwrap();
        let light = e.add_passenger(0, 2, 10, &mut rec).unwrap();
        e.elevators[0].go_to_floor(0);
        e.tick(DT, &mut rec);

        assert_eq!(e.elevators()[0].riders(), &[heavy, light]);
        assert_eq!(e.elevators()[0].load_factor(), 1.0);
        e.elevators[0].go_to_floor(2);
        run_until_doors(&mut e, &mut rec, 2_000);
        assert_eq!(e.stats().transported, 2);
        assert_eq!(e.elevators()[0].load_factor(), 0.0);
    }

    #[test]
    fn negative_dt_is_ignored() {
        let mut e = engine(quiet_config(3, 1));
        e.tick(-1.0, &mut NoopObserver);
        e.tick(f64::NAN, &mut NoopObserver);
        assert_eq!(e.clock().elapsed_secs, 0.0);
    }
}

// ── Engine: control logic boundary ────────────────────────────────────────────

#[cfg(test)]
mod user_code_tests {
    use super::*;

    #[test]
    fn events_are_drained_per_call() {
        let mut e = engine(quiet_config(3, 2));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut logic = from_fn(move |ctx: &ControlContext| {
            sink.borrow_mut().push(ctx.events.len());
            Ok(vec![])
        });
        e.call_user_code(&mut logic, DT, &mut NoopObserver).unwrap();
        e.call_user_code(&mut logic, DT, &mut NoopObserver).unwrap();
        assert_eq!(*seen.borrow(), vec![2, 0]);
        assert!(e.pending_events().is_empty());
    }

    #[test]
    fn unknown_elevator_is_ignored() {
        let mut e = engine(quiet_config(3, 1));
        let mut logic = from_fn(|_ctx: &ControlContext| {
            Ok(vec![
                Command::GoToFloor { elevator: ElevatorId(9), floor: 1 },
                Command::GoToFloor { elevator: ElevatorId(0), floor: 2 },
            ])
        });
        assert_eq!(e.call_user_code(&mut logic, DT, &mut NoopObserver), Ok(1));
        assert_eq!(e.elevators()[0].destination(), Some(2));
    }

    #[test]
    fn errors_are_contained_and_reported() {
        let mut e = engine(quiet_config(3, 1));
        let mut rec = Recorder::default();
        let mut logic = from_fn(|_ctx: &ControlContext| Err(ControlError::failed("no plan")));
        let result = e.call_user_code(&mut logic, DT, &mut rec);
        assert_eq!(result, Err(ControlError::Failed("no plan".into())));
        assert_eq!(rec.0.borrow().errors.len(), 1);

        // The engine keeps running.
        e.tick(DT, &mut rec);
        assert!(e.clock().elapsed_secs > 0.0);
    }

    #[test]
    fn panics_are_caught() {
        let mut e = engine(quiet_config(3, 1));
        let mut rec = Recorder::default();
        let mut logic = from_fn(|_ctx: &ControlContext| -> ControlResult<Vec<Command>> {
            panic!("boom")
        });
        let result = e.call_user_code(&mut logic, DT, &mut rec);
        assert_eq!(result, Err(ControlError::Panicked("boom".into())));
        assert_eq!(rec.0.borrow().errors, vec![ControlError::Panicked("boom".into())]);
        assert!(e.elevators()[0].is_idle());
    }
}

// ── Controller ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod controller_tests {
    use super::*;
    use crate::{MAX_TIME_SCALE, MIN_TIME_SCALE};

    struct FailingStart;

    impl ControlLogic for FailingStart {
        fn start(&mut self, _ctx: &ControlContext) -> ControlResult<()> {
            Err(ControlError::failed("not today"))
        }

        fn tick(&mut self, _ctx: &ControlContext) -> ControlResult<Vec<Command>> {
            Ok(vec![])
        }
    }

    fn ready_controller(rec: &Recorder) -> Controller {
        let mut c = Controller::new();
        c.subscribe(Box::new(rec.clone()));
        c.initialize_challenge(quiet_config(4, 1), Goal::Perpetual).unwrap();
        c
    }

    #[test]
    fn lifecycle_transitions() {
        let mut c = Controller::new();
        assert_eq!(c.state(), ControllerState::Uninitialized);
        assert_eq!(c.frame(DT), 0.0);
        assert!(matches!(c.start(NoopController), Err(SimError::InvalidState { .. })));

        c.initialize_challenge(quiet_config(4, 1), Goal::Perpetual).unwrap();
        assert_eq!(c.state(), ControllerState::Ready);
        assert!(c.resume().is_err(), "nothing started yet");

        c.start(NoopController).unwrap();
        assert_eq!(c.state(), ControllerState::Running);
        assert!(!c.is_paused());
        assert!(matches!(c.start(NoopController), Err(SimError::InvalidState { .. })));

        c.stop();
        c.stop();
        assert_eq!(c.state(), ControllerState::Ready);
        c.resume().unwrap();
        assert_eq!(c.state(), ControllerState::Running);
        c.toggle_pause().unwrap();
        assert!(c.is_paused());
        c.toggle_pause().unwrap();
        assert!(!c.is_paused());
    }

    #[test]
    fn failed_start_stays_ready() {
        let rec = Recorder::default();
        let mut c = ready_controller(&rec);
        let err = c.start(FailingStart).unwrap_err();
        assert!(matches!(err, SimError::Control(ControlError::Failed(_))));
        assert_eq!(c.state(), ControllerState::Ready);
        assert_eq!(rec.0.borrow().errors.len(), 1);
        c.start(NoopController).unwrap();
        assert_eq!(c.state(), ControllerState::Running);
    }

    #[test]
    fn invalid_config_keeps_previous_challenge() {
        let rec = Recorder::default();
        let mut c = ready_controller(&rec);
        c.start(NoopController).unwrap();
        let bad = ChallengeConfig { floor_count: 0, ..ChallengeConfig::default() };
        assert!(c.initialize_challenge(bad, Goal::Perpetual).is_err());
        assert_eq!(c.state(), ControllerState::Running);
        assert_eq!(c.engine().map(|e| e.floors().len()), Some(4));
    }

    #[test]
    fn reinitialize_drops_logic() {
        let rec = Recorder::default();
        let mut c = ready_controller(&rec);
        c.start(NoopController).unwrap();
        c.frame(DT);
        c.initialize_challenge(quiet_config(6, 2), Goal::Perpetual).unwrap();
        assert_eq!(c.state(), ControllerState::Ready);
        assert!(c.resume().is_err());
        assert_eq!(c.engine().map(|e| e.clock().elapsed_secs), Some(0.0));
    }

    #[test]
    fn time_scale_is_clamped() {
        let rec = Recorder::default();
        let mut c = ready_controller(&rec);
        assert_eq!(c.set_time_scale(100.0), MAX_TIME_SCALE);
        assert_eq!(c.time_scale(), MAX_TIME_SCALE);
        assert_eq!(rec.0.borrow().scales.last(), Some(&(MAX_TIME_SCALE, true)));

        assert_eq!(c.set_time_scale(0.01), MIN_TIME_SCALE);
        assert_eq!(c.set_time_scale(f64::NAN), MIN_TIME_SCALE);
        assert_eq!(c.set_time_scale(3.0), 3.0);
    }

    #[test]
    fn pause_changes_are_notified() {
        let rec = Recorder::default();
        let mut c = ready_controller(&rec);
        c.start(NoopController).unwrap();
        c.stop();
        assert_eq!(rec.0.borrow().scales, vec![(1.0, false), (1.0, true)]);
    }

    #[test]
    fn reinitializing_a_running_challenge_notifies_pause() {
        let rec = Recorder::default();
        let mut c = ready_controller(&rec);
        c.start(NoopController).unwrap();
        c.initialize_challenge(quiet_config(5, 1), Goal::Perpetual).unwrap();
        assert!(c.is_paused());
        assert_eq!(rec.0.borrow().scales, vec![(1.0, false), (1.0, true)]);

        // Already paused: a second reset changes nothing observable.
        c.initialize_challenge(quiet_config(5, 1), Goal::Perpetual).unwrap();
        assert_eq!(rec.0.borrow().scales.len(), 2);
    }

    #[test]
    fn frame_substeps_and_calls_logic_once() {
        let rec = Recorder::default();
        let mut c = ready_controller(&rec);
        let dts = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&dts);
        c.start(from_fn(move |ctx: &ControlContext| {
            sink.borrow_mut().push(ctx.dt);
            Ok(vec![])
        }))
        .unwrap();
        c.set_time_scale(3.0);

        let simulated = c.frame(DT);
        assert!((simulated - 0.05).abs() < 1e-12);
        assert_eq!(rec.0.borrow().states, 3);
        assert_eq!(dts.borrow().len(), 1);
        assert!((dts.borrow()[0] - 0.05).abs() < 1e-12);

        // A stalled host frame is capped.
        let simulated = c.frame(5.0);
        assert!((simulated - 0.15).abs() < 1e-12);
        let elapsed = c.engine().map(|e| e.clock().elapsed_secs).unwrap();
        assert!((elapsed - 0.2).abs() < 1e-9);
    }

    #[test]
    fn paused_frames_do_nothing() {
        let rec = Recorder::default();
        let mut c = ready_controller(&rec);
        c.start(NoopController).unwrap();
        c.stop();
        assert_eq!(c.frame(DT), 0.0);
        assert_eq!(rec.0.borrow().states, 0);
    }

    #[test]
    fn logic_errors_do_not_stop_the_run() {
        let rec = Recorder::default();
        let mut c = ready_controller(&rec);
        c.start(from_fn(|_ctx: &ControlContext| Err(ControlError::failed("nope")))).unwrap();
        c.frame(DT);
        c.frame(DT);
        assert_eq!(c.state(), ControllerState::Running);
        assert_eq!(rec.0.borrow().errors.len(), 2);
    }

    #[test]
    fn challenge_end_moves_to_ended() {
        let rec = Recorder::default();
        let mut c = Controller::new();
        c.subscribe(Box::new(rec.clone()));
        c.initialize_challenge(quiet_config(3, 1), Goal::WithinTime { users: 1, seconds: 0.5 })
            .unwrap();
        c.start(NoopController).unwrap();
        for _ in 0..100 {
            c.frame(DT);
        }
        assert_eq!(c.state(), ControllerState::Ended);
        assert!(c.is_challenge_ended());
        assert_eq!(rec.0.borrow().ended, vec![Outcome::Failed]);
        assert_eq!(rec.0.borrow().ended_states, 1);
        assert!(c.is_paused());
        assert_eq!(rec.0.borrow().scales, vec![(1.0, false), (1.0, true)]);
        assert_eq!(c.frame(DT), 0.0);
        assert!(c.resume().is_err());
    }

    #[test]
    fn full_preset_run_keeps_invariants() {
        let preset = &crate::presets()[0];
        let rec = Recorder::default();
        let mut c = Controller::new();
        c.subscribe(Box::new(InvariantChecker));
        c.subscribe(Box::new(rec.clone()));
        c.initialize_challenge(preset.config.clone(), preset.goal).unwrap();
        c.start(nearest_call_logic()).unwrap();

        let mut frames = 0;
        while !c.is_challenge_ended() {
            c.frame(DT);
            frames += 1;
            assert!(frames < 5_000, "challenge never ended");
        }
        let stats = c.engine().map(|e| *e.stats()).unwrap();
        assert!(stats.transported > 0);
        assert!(rec.0.borrow().errors.is_empty());
        assert_eq!(rec.0.borrow().ended.len(), 1);
    }
}
