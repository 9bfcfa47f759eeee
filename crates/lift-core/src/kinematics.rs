//! One-dimensional constant-acceleration kinematics.
//!
//! Every helper is a rearrangement of `v² = u² + 2·a·d`.  Units are whatever
//! the caller uses consistently; the engine works in floors, floors/s, and
//! floors/s².

/// Tolerance below which a remaining distance or a speed counts as zero.
///
/// Absorbs floating-point overshoot when an elevator snaps to its floor.
pub const ARRIVAL_EPSILON: f64 = 1e-8;

/// Signed distance covered while changing speed from `current` to `target`
/// under constant `acceleration`.
///
/// Negative when slowing down with a positive `acceleration`; callers that
/// want a braking distance should use [`stopping_distance`].
#[inline]
pub fn distance_to_reach_speed(current: f64, target: f64, acceleration: f64) -> f64 {
    (target * target - current * current) / (2.0 * acceleration)
}

/// Constant acceleration needed to change speed from `current` to `target`
/// over `distance`.
#[inline]
pub fn acceleration_to_cover(current: f64, target: f64, distance: f64) -> f64 {
    0.5 * (target * target - current * current) / distance
}

/// Distance needed to come to rest from `speed` braking at `deceleration`.
#[inline]
pub fn stopping_distance(speed: f64, deceleration: f64) -> f64 {
    distance_to_reach_speed(speed.abs(), 0.0, -deceleration.abs())
}

/// Braking rate that brings `speed` to zero exactly after `distance`.
///
/// Returns `f64::INFINITY` for a zero distance with non-zero speed.
#[inline]
pub fn deceleration_to_stop_within(speed: f64, distance: f64) -> f64 {
    if distance <= 0.0 {
        return if speed.abs() > 0.0 { f64::INFINITY } else { 0.0 };
    }
    -acceleration_to_cover(speed.abs(), 0.0, distance)
}

/// `true` when `value` is within [`ARRIVAL_EPSILON`] of zero.
#[inline]
pub fn is_negligible(value: f64) -> bool {
    value.abs() <= ARRIVAL_EPSILON
}
