//! Unit tests for lift-core primitives.

#[cfg(test)]
mod ids {
    use crate::{ElevatorId, PassengerId};

    #[test]
    fn index_roundtrip() {
        let id = ElevatorId(3);
        assert_eq!(id.index(), 3);
        assert_eq!(ElevatorId::try_from(3usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(PassengerId(0) < PassengerId(1));
        assert!(ElevatorId(10) > ElevatorId(9));
    }

    #[test]
    fn display() {
        assert_eq!(ElevatorId(7).to_string(), "ElevatorId(7)");
        assert_eq!(PassengerId(12).to_string(), "PassengerId(12)");
    }
}

#[cfg(test)]
mod direction {
    use crate::Direction;

    #[test]
    fn between_floors() {
        assert_eq!(Direction::between(0, 3), Some(Direction::Up));
        assert_eq!(Direction::between(3, 1), Some(Direction::Down));
        assert_eq!(Direction::between(2, 2), None);
    }

    #[test]
    fn of_displacement() {
        assert_eq!(Direction::of(0.25), Some(Direction::Up));
        assert_eq!(Direction::of(-1e-3), Some(Direction::Down));
        assert_eq!(Direction::of(0.0), None);
        assert_eq!(Direction::of(f64::NAN), None);
    }

    #[test]
    fn sign_and_opposite() {
        assert_eq!(Direction::Up.sign(), 1.0);
        assert_eq!(Direction::Down.sign(), -1.0);
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.to_string(), "down");
    }
}

#[cfg(test)]
mod kinematics {
    use crate::kinematics::*;

    #[test]
    fn stopping_distance_matches_formula() {
        // v = 2, a = 4 → v² / 2a = 0.5
        assert!((stopping_distance(2.0, 4.0) - 0.5).abs() < 1e-12);
        // sign of the speed does not matter
        assert!((stopping_distance(-2.0, 4.0) - 0.5).abs() < 1e-12);
        assert_eq!(stopping_distance(0.0, 2.6), 0.0);
    }

    #[test]
    fn distance_to_reach_speed_accelerating() {
        // 0 → 3 at 1.5 → 9 / 3 = 3
        assert!((distance_to_reach_speed(0.0, 3.0, 1.5) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn acceleration_and_distance_are_inverse() {
        let d = distance_to_reach_speed(1.0, 2.5, 2.1);
        let a = acceleration_to_cover(1.0, 2.5, d);
        assert!((a - 2.1).abs() < 1e-12);
    }

    #[test]
    fn deceleration_to_stop_within_distance() {
        // v = 2 over d = 1 → 4 / 2 = 2
        assert!((deceleration_to_stop_within(2.0, 1.0) - 2.0).abs() < 1e-12);
        assert_eq!(deceleration_to_stop_within(0.0, 0.0), 0.0);
        assert!(deceleration_to_stop_within(1.0, 0.0).is_infinite());
    }

    #[test]
    fn negligible_threshold() {
        assert!(is_negligible(5e-9));
        assert!(is_negligible(-ARRIVAL_EPSILON));
        assert!(!is_negligible(1e-6));
    }
}

#[cfg(test)]
mod time {
    use crate::{CoreError, SimClock, Tick};

    #[test]
    fn tick_display_and_order() {
        assert_eq!(Tick(4).to_string(), "T4");
        assert!(Tick(3) < Tick(4));
        assert_eq!(Tick::default(), Tick(0));
    }

    #[test]
    fn clock_advances_time_and_ticks() {
        let mut clock = SimClock::new();
        clock.advance(0.5).unwrap();
        clock.advance(0.25).unwrap();
        assert_eq!(clock.current_tick, Tick(2));
        assert!((clock.elapsed_secs - 0.75).abs() < 1e-12);
    }

    #[test]
    fn clock_rejects_bad_steps() {
        let mut clock = SimClock::new();
        assert_eq!(clock.advance(-1.0), Err(CoreError::InvalidTimeStep(-1.0)));
        assert!(clock.advance(f64::NAN).is_err());
        assert!(clock.advance(f64::INFINITY).is_err());
        assert_eq!(clock.current_tick, Tick(0));
        assert_eq!(clock.elapsed_secs, 0.0);
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SimRng::new(12345);
        let mut r2 = SimRng::new(12345);
        for _ in 0..100 {
            let a: u32 = r1.gen_range(0..1000);
            let b: u32 = r2.gen_range(0..1000);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn gen_range_in_bounds() {
        let mut rng = SimRng::new(0);
        for _ in 0..1000 {
            let v = rng.gen_range(55..=100);
            assert!((55..=100).contains(&v));
        }
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = SimRng::new(0);
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
        assert!(rng.gen_ratio(1, 1));
        assert!(!rng.gen_ratio(0, 11));
    }
}
