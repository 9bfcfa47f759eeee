//! Elevator motion state machine and request queue.
//!
//! # Motion model
//!
//! Position is continuous, measured in floors (`0.0` = ground floor).  Each
//! [`Elevator::tick`] integrates one step of constant-acceleration motion
//! toward the committed destination:
//!
//! ```text
//! moving away from target  → brake at DECELERATION, never reversing mid-step
//! stop distance ≥ remaining → brake at v² / 2d so v reaches 0 exactly at d
//! otherwise                 → accelerate at ACCELERATION up to top speed
//! step reaches target       → snap to the floor, open doors for one tick
//! ```
//!
//! # Destination selection
//!
//! Requests are kept as an ordered set.  The elevator sweeps: it keeps
//! serving queued floors in its current direction of travel, nearest first,
//! and only reverses once nothing is left ahead.

use std::collections::BTreeSet;

use lift_core::kinematics::{
    deceleration_to_stop_within, is_negligible, stopping_distance, ARRIVAL_EPSILON,
};
use lift_core::{Direction, ElevatorId, PassengerId};
use tracing::{trace, warn};

/// Acceleration while speeding up, in floors/s².
pub const ACCELERATION: f64 = 2.1;

/// Nominal braking rate, in floors/s².
pub const DECELERATION: f64 = 2.6;

/// Top speed used when a challenge does not specify one, in floors/s.
pub const DEFAULT_TOP_SPEED: f64 = 2.6;

/// Weight (kg) one unit of capacity is rated for; the load factor divides
/// the onboard weight by `capacity * NOMINAL_RIDER_WEIGHT`.
pub const NOMINAL_RIDER_WEIGHT: f64 = 100.0;

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Elevator {
    id:          ElevatorId,
    top_floor:   u32,
    capacity:    usize,
    top_speed:   f64,

    position:    f64,
    velocity:    f64,

    /// Floor currently being travelled to.  Never also present in `queue`.
    destination: Option<u32>,
    queue:       BTreeSet<u32>,
    /// Destination buttons pressed by riders; cleared on arrival.
    pressed:     BTreeSet<u32>,

    riders:      Vec<PassengerId>,
    load_kg:     u32,

    going_up:    bool,
    going_down:  bool,
    /// Last direction of travel; drives the sweep policy.
    heading:     Option<Direction>,

    doors_open:  bool,
    moves:       u64,

    /// Nearest floor the elevator could still stop at, tracked while moving.
    next_stop_floor: Option<u32>,
    /// Floors reported as "about to pass" during the latest tick.
    passing:     Vec<u32>,
}

impl Elevator {
    /// A stationary, empty elevator at the ground floor with both indicators on.
    pub fn new(id: ElevatorId, floor_count: u32, capacity: usize, top_speed: f64) -> Self {
        Self {
            id,
            top_floor: floor_count.saturating_sub(1),
            capacity,
            top_speed,
            position: 0.0,
            velocity: 0.0,
            destination: None,
            queue: BTreeSet::new(),
            pressed: BTreeSet::new(),
            riders: Vec::new(),
            load_kg: 0,
            going_up: true,
            going_down: true,
            heading: None,
            doors_open: false,
            moves: 0,
            next_stop_floor: None,
            passing: Vec::new(),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> ElevatorId {
        self.id
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn top_speed(&self) -> f64 {
        self.top_speed
    }

    /// Exact position in floors.
    #[inline]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Signed velocity in floors/s (positive = up).
    #[inline]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Position rounded to the nearest floor.
    #[inline]
    pub fn current_floor(&self) -> u32 {
        (self.position.round().max(0.0) as u32).min(self.top_floor)
    }

    #[inline]
    pub fn destination(&self) -> Option<u32> {
        self.destination
    }

    /// Queued requests in ascending floor order (committed destination excluded).
    #[inline]
    pub fn queue(&self) -> &BTreeSet<u32> {
        &self.queue
    }

    #[inline]
    pub fn pressed_floors(&self) -> &BTreeSet<u32> {
        &self.pressed
    }

    #[inline]
    pub fn riders(&self) -> &[PassengerId] {
        &self.riders
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.riders.len() >= self.capacity
    }

    /// Onboard weight relative to rated weight, clamped to `[0, 1]`.
    pub fn load_factor(&self) -> f64 {
        if self.capacity == 0 {
            return 1.0;
        }
        (self.load_kg as f64 / (self.capacity as f64 * NOMINAL_RIDER_WEIGHT)).clamp(0.0, 1.0)
    }

    #[inline]
    pub fn going_up_indicator(&self) -> bool {
        self.going_up
    }

    #[inline]
    pub fn going_down_indicator(&self) -> bool {
        self.going_down
    }

    /// Whether the indicator for `direction` is lit.
    #[inline]
    pub fn indicator(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up   => self.going_up,
            Direction::Down => self.going_down,
        }
    }

    /// `true` only during the tick in which the elevator arrived.
    #[inline]
    pub fn doors_open(&self) -> bool {
        self.doors_open
    }

    /// Completed stops since the elevator was created.
    #[inline]
    pub fn moves(&self) -> u64 {
        self.moves
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        !is_negligible(self.velocity)
    }

    /// No committed destination and nothing queued.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.destination.is_none() && self.queue.is_empty()
    }

    /// Direction the elevator is moving in (or last moved in).
    #[inline]
    pub fn heading(&self) -> Option<Direction> {
        self.heading
    }

    /// Floors the elevator is about to pass, reported by the latest tick.
    #[inline]
    pub fn passing_floors(&self) -> &[u32] {
        &self.passing
    }

    // ── Commands ──────────────────────────────────────────────────────────

    /// Request a stop at `floor`.
    ///
    /// Out-of-range floors are clamped into the building.  Returns `false`
    /// (no-op) when the floor is already queued or is the committed
    /// destination.  An idle elevator commits to the request immediately.
    pub fn go_to_floor(&mut self, floor: i64) -> bool {
        let clamped = floor.clamp(0, self.top_floor as i64) as u32;
        if clamped as i64 != floor {
            warn!(elevator = %self.id, requested = floor, clamped, "floor request out of range");
        }
        if self.destination == Some(clamped) || !self.queue.insert(clamped) {
            return false;
        }
        if self.destination.is_none() {
            self.commit_next();
        }
        true
    }

    /// Light the rider button for `floor`.  Returns `true` if newly lit.
    pub fn press_floor_button(&mut self, floor: u32) -> bool {
        if floor > self.top_floor {
            return false;
        }
        self.pressed.insert(floor)
    }

    /// Admit `passenger`.  Returns `false` (and admits nobody) when full.
    pub fn board(&mut self, passenger: PassengerId, weight: u32) -> bool {
        if self.is_full() {
            return false;
        }
        self.riders.push(passenger);
        self.load_kg = self.load_kg.saturating_add(weight);
        true
    }

    /// Remove `passenger` from the onboard set.  Returns `false` if absent.
    pub fn alight(&mut self, passenger: PassengerId, weight: u32) -> bool {
        let Some(pos) = self.riders.iter().position(|&p| p == passenger) else {
            return false;
        };
        self.riders.remove(pos);
        self.load_kg = self.load_kg.saturating_sub(weight);
        true
    }

    // ── Motion ────────────────────────────────────────────────────────────

    /// Advance motion by `dt` seconds.
    ///
    /// Returns `true` iff the elevator arrived at its destination this tick,
    /// in which case the doors are open until the next call.
    pub fn tick(&mut self, dt: f64) -> bool {
        self.doors_open = false;
        self.passing.clear();

        let Some(mut target) = self.destination else {
            return false;
        };

        if self.is_moving() {
            self.retarget();
            target = self.destination.unwrap_or(target);
        }

        let diff = target as f64 - self.position;
        let Some(towards) = Direction::of(diff).filter(|_| !is_negligible(diff)) else {
            if is_negligible(self.velocity) {
                self.arrive(target);
                return true;
            }
            // Sitting on the floor but still carrying speed: brake in place.
            self.brake_freely(dt);
            return false;
        };
        let remaining = diff.abs();

        // Velocity component toward the target; negative means moving away.
        let speed = self.velocity * towards.sign();
        if speed < 0.0 {
            self.brake_freely(dt);
            return false;
        }

        let must_brake = stopping_distance(speed, DECELERATION) >= remaining - speed * dt;
        let next_speed = if must_brake {
            let rate = deceleration_to_stop_within(speed, remaining);
            (speed - rate * dt).max(0.0)
        } else {
            (speed + ACCELERATION * dt).min(self.top_speed)
        };

        let step = 0.5 * (speed + next_speed) * dt;
        if step >= remaining - ARRIVAL_EPSILON || (must_brake && next_speed <= 0.0) {
            self.arrive(target);
            return true;
        }

        self.position = (self.position + towards.sign() * step).clamp(0.0, self.top_floor as f64);
        self.velocity = towards.sign() * next_speed;
        self.heading = Some(towards);
        self.track_passing(towards, target);
        false
    }

    /// Slow down at the nominal rate without crossing zero within this step.
    fn brake_freely(&mut self, dt: f64) {
        let speed = self.velocity.abs();
        let next_speed = (speed - DECELERATION * dt).max(0.0);
        let step = 0.5 * (speed + next_speed) * dt;
        let sign = self.velocity.signum();
        self.position = (self.position + sign * step).clamp(0.0, self.top_floor as f64);
        self.velocity = sign * next_speed;
    }

    /// Record floors that just became the nearest possible stop ahead.
    fn track_passing(&mut self, towards: Direction, target: u32) {
        let rest = self.position + towards.sign() * stopping_distance(self.velocity, DECELERATION);
        let floor = match towards {
            Direction::Up   => (rest - ARRIVAL_EPSILON).ceil(),
            Direction::Down => (rest + ARRIVAL_EPSILON).floor(),
        };
        let floor = floor.clamp(0.0, self.top_floor as f64) as u32;
        if self.next_stop_floor == Some(floor) {
            return;
        }
        self.next_stop_floor = Some(floor);
        let ahead = match towards {
            Direction::Up   => floor < target,
            Direction::Down => floor > target,
        };
        if ahead {
            self.passing.push(floor);
        }
    }

    /// Swap in a queued floor that lies ahead of the committed destination
    /// and can still be stopped at.
    fn retarget(&mut self) {
        let (Some(dest), Some(towards)) = (self.destination, Direction::of(self.velocity)) else {
            return;
        };
        let braking = stopping_distance(self.velocity, DECELERATION);
        let here = self.position;
        let candidate = self
            .queue
            .iter()
            .copied()
            .filter(|&f| {
                let offset = (f as f64 - here) * towards.sign();
                let before_dest = match towards {
                    Direction::Up   => f < dest,
                    Direction::Down => f > dest,
                };
                before_dest && offset > ARRIVAL_EPSILON && braking <= offset + ARRIVAL_EPSILON
            })
            .min_by(|a, b| {
                let da = (*a as f64 - here).abs();
                let db = (*b as f64 - here).abs();
                da.total_cmp(&db)
            });
        if let Some(floor) = candidate {
            trace!(elevator = %self.id, from = dest, to = floor, "retargeting to nearer stop");
            self.queue.remove(&floor);
            self.queue.insert(dest);
            self.destination = Some(floor);
            self.update_indicators();
        }
    }

    fn arrive(&mut self, floor: u32) {
        self.position = floor as f64;
        self.velocity = 0.0;
        self.destination = None;
        self.next_stop_floor = None;
        self.pressed.remove(&floor);
        self.doors_open = true;
        self.moves += 1;
        if self.queue.is_empty() {
            self.heading = None;
        }
        self.commit_next();
        trace!(elevator = %self.id, floor, moves = self.moves, next = ?self.destination, "arrived");
    }

    /// Commit to the next queued floor (if any) and refresh indicators.
    fn commit_next(&mut self) {
        if self.destination.is_none() {
            if let Some(next) = self.pick_next() {
                self.queue.remove(&next);
                self.destination = Some(next);
            }
        }
        self.update_indicators();
    }

    /// Sweep policy: nearest queued floor ahead in the heading, else the
    /// nearest behind; without a heading, the nearest overall.
    fn pick_next(&self) -> Option<u32> {
        let here = self.position;
        let nearest_ahead = |towards: Direction| {
            self.queue
                .iter()
                .copied()
                .filter(|&f| (f as f64 - here) * towards.sign() >= -ARRIVAL_EPSILON)
                .min_by(|a, b| (*a as f64 - here).abs().total_cmp(&(*b as f64 - here).abs()))
        };
        match self.heading {
            Some(towards) => nearest_ahead(towards).or_else(|| nearest_ahead(towards.opposite())),
            None => self
                .queue
                .iter()
                .copied()
                .min_by(|a, b| (*a as f64 - here).abs().total_cmp(&(*b as f64 - here).abs())),
        }
    }

    fn update_indicators(&mut self) {
        let towards = self.destination.and_then(|d| {
            let diff = d as f64 - self.position;
            if is_negligible(diff) { None } else { Direction::of(diff) }
        });
        (self.going_up, self.going_down) = match towards {
            Some(Direction::Up)   => (true, false),
            Some(Direction::Down) => (false, true),
            None                  => (true, true),
        };
    }
}
