use std::fmt::{Debug, Formatter};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::VariantArray;

use crate::location::Location;

/// A cardinal direction on a square grid.
///
/// Variants are declared in clockwise order, and each owns one bit of a [`Mask`].
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SquareStep {
    /// Toward row 0.
    Up,
    /// Toward the last column.
    Right,
    /// Toward the last row.
    Down,
    /// Toward column 0.
    Left,
}

impl SquareStep {
    /// Directions which, when stepped, land on a cell with a higher row-major index.
    pub(crate) const FORWARD_VARIANTS: &'static [Self] = &[Self::Right, Self::Down];

    /// Attempt the step from `location` in this direction and return the resultant [`Location`].
    ///
    /// Stepping off the top or left edge produces a location no board contains.
    pub fn attempt_from(&self, location: Location) -> Location {
        location.offset_by(self.offset())
    }

    /// Unit `(dx, dy)` delta of this direction.
    pub fn offset(&self) -> (isize, isize) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }

    /// The reverse direction.
    pub fn invert(&self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
        }
    }

    /// The next direction clockwise.
    pub fn clockwise(&self) -> Self {
        match self {
            Self::Up => Self::Right,
            Self::Right => Self::Down,
            Self::Down => Self::Left,
            Self::Left => Self::Up,
        }
    }

    #[inline]
    pub(crate) fn bit(&self) -> u8 {
        match self {
            Self::Up => 0b0001,
            Self::Right => 0b0010,
            Self::Down => 0b0100,
            Self::Left => 0b1000,
        }
    }
}

/// A 4-bit set of open [`SquareStep`] directions.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Mask(u8);

impl Mask {
    /// No openings at all.
    pub const CLOSED: Self = Self(0);
    /// Open in every direction.
    pub const ALL: Self = Self(0b1111);

    /// Build a mask from raw bits; bits above the low nibble are dropped.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0b1111)
    }

    /// The raw 4-bit value.
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Build a mask with exactly `directions` open.
    pub fn of(directions: &[SquareStep]) -> Self {
        Self(directions.iter().fold(0, |acc, dir| acc | dir.bit()))
    }

    /// Whether `direction` is open.
    pub fn opens(&self, direction: SquareStep) -> bool {
        self.0 & direction.bit() != 0
    }

    /// Every open direction, in clockwise order starting from [`Up`](SquareStep::Up).
    pub fn directions(&self) -> impl Iterator<Item = SquareStep> + '_ {
        SquareStep::VARIANTS.iter().copied().filter(|dir| self.opens(*dir))
    }

    /// Number of open directions.
    pub fn count(&self) -> u32 {
        self.0.count_ones()
    }

    /// Rotate a quarter-turn clockwise `quarter_turns` times. Every set bit advances Up, Right, Down, Left, Up.
    pub fn rotate(self, quarter_turns: u8) -> Self {
        (0..quarter_turns % 4).fold(self, |mask, _| mask.rotate_once())
    }

    fn rotate_once(self) -> Self {
        Self(((self.0 << 1) | (self.0 >> 3)) & 0b1111)
    }
}

impl Debug for Mask {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Mask[{}]", self.directions().map(|dir| format!("{dir:?}")).join("|"))
    }
}
