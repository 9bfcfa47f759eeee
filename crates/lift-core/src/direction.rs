//! Travel direction shared by floors, elevators, and passengers.

/// Vertical travel direction.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Direction of travel from floor `from` to floor `to`; `None` when equal.
    #[inline]
    pub fn between(from: u32, to: u32) -> Option<Direction> {
        match to.cmp(&from) {
            std::cmp::Ordering::Greater => Some(Direction::Up),
            std::cmp::Ordering::Less    => Some(Direction::Down),
            std::cmp::Ordering::Equal   => None,
        }
    }

    /// Direction of a signed displacement; `None` for zero (or NaN).
    #[inline]
    pub fn of(delta: f64) -> Option<Direction> {
        if delta > 0.0 {
            Some(Direction::Up)
        } else if delta < 0.0 {
            Some(Direction::Down)
        } else {
            None
        }
    }

    /// `+1.0` for up, `-1.0` for down.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Direction::Up   => 1.0,
            Direction::Down => -1.0,
        }
    }

    #[inline]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up   => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// Human-readable label, useful for CSV column values and log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up   => "up",
            Direction::Down => "down",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
