// SPDX-License-Identifier: MIT OR Apache-2.0
//! Compass directions a noodle may leave or enter a waypoint along.
//!
//! Graph space is y-down like the screen: `UP` points towards smaller y.

use bitflags::bitflags;

bitflags! {
    /// Set of compass directions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NoodleDirection: u8 {
        /// Towards smaller y
        const UP = 0b0001;
        /// Towards larger y
        const DOWN = 0b0010;
        /// Towards smaller x
        const LEFT = 0b0100;
        /// Towards larger x
        const RIGHT = 0b1000;
    }
}

impl NoodleDirection {
    /// No direction
    pub const NONE: Self = Self::empty();
    /// All four directions
    pub const ALL: Self = Self::all();

    /// Flip every present direction to its physical opposite.
    ///
    /// ```
    /// use noodle_editor_graph::noodle::NoodleDirection;
    ///
    /// let d = NoodleDirection::LEFT | NoodleDirection::UP;
    /// assert_eq!(d.opposite(), NoodleDirection::RIGHT | NoodleDirection::DOWN);
    /// ```
    pub fn opposite(self) -> Self {
        let mut flipped = Self::NONE;
        if self.contains(Self::LEFT) {
            flipped |= Self::RIGHT;
        }
        if self.contains(Self::RIGHT) {
            flipped |= Self::LEFT;
        }
        if self.contains(Self::UP) {
            flipped |= Self::DOWN;
        }
        if self.contains(Self::DOWN) {
            flipped |= Self::UP;
        }
        flipped
    }

    /// Directions still free once `out` and `inn` have been committed.
    pub fn remaining(out: Self, inn: Self) -> Self {
        Self::ALL.difference(out | inn)
    }
}

impl Default for NoodleDirection {
    fn default() -> Self {
        Self::NONE
    }
}
