//! Per-floor call-button state.

use lift_core::Direction;

/// One level of the building and its up/down call buttons.
///
/// `press` and `clear` report whether the state actually changed so the
/// engine can emit exactly one notification per transition.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Floor {
    level: u32,
    up:    bool,
    down:  bool,
}

impl Floor {
    pub fn new(level: u32) -> Self {
        Self { level, up: false, down: false }
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[inline]
    pub fn button(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up   => self.up,
            Direction::Down => self.down,
        }
    }

    #[inline]
    pub fn up_pressed(&self) -> bool {
        self.up
    }

    #[inline]
    pub fn down_pressed(&self) -> bool {
        self.down
    }

    /// Press the call button for `direction`.
    ///
    /// Returns `true` only on a false → true transition.
    pub fn press(&mut self, direction: Direction) -> bool {
        let button = self.button_mut(direction);
        let changed = !*button;
        *button = true;
        changed
    }

    /// Clear the call button for `direction`.  Returns `true` if it was lit.
    pub fn clear(&mut self, direction: Direction) -> bool {
        let button = self.button_mut(direction);
        let changed = *button;
        *button = false;
        changed
    }

    fn button_mut(&mut self, direction: Direction) -> &mut bool {
        match direction {
            Direction::Up   => &mut self.up,
            Direction::Down => &mut self.down,
        }
    }
}
