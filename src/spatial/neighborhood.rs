//! The fixed 18-direction neighbourhood shared by extraction and propagation
//!
//! Six face directions plus the twelve edge diagonals. The centre and the
//! eight corner diagonals are never sampled.

use std::fmt;
use std::ops::{Neg, Sub};

use crate::math::rotation::Rotation;

/// Relative integer position between two grid cells, `y` pointing up
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Offset {
    /// Step along x
    pub dx: i32,
    /// Step along y (vertical)
    pub dy: i32,
    /// Step along z
    pub dz: i32,
}

/// Number of sampled directions
pub const NEIGHBORHOOD_SIZE: usize = 18;

/// Every sampled direction, faces first
pub const NEIGHBORHOOD: [Offset; NEIGHBORHOOD_SIZE] = [
    Offset::UP,
    Offset::DOWN,
    Offset::FORWARD,
    Offset::BACK,
    Offset::LEFT,
    Offset::RIGHT,
    Offset::new(0, 1, 1),
    Offset::new(0, 1, -1),
    Offset::new(-1, 1, 0),
    Offset::new(1, 1, 0),
    Offset::new(0, -1, 1),
    Offset::new(0, -1, -1),
    Offset::new(-1, -1, 0),
    Offset::new(1, -1, 0),
    Offset::new(-1, 0, 1),
    Offset::new(1, 0, 1),
    Offset::new(-1, 0, -1),
    Offset::new(1, 0, -1),
];

impl Offset {
    /// One step up
    pub const UP: Self = Self::new(0, 1, 0);
    /// One step down
    pub const DOWN: Self = Self::new(0, -1, 0);
    /// One step along +z
    pub const FORWARD: Self = Self::new(0, 0, 1);
    /// One step along -z
    pub const BACK: Self = Self::new(0, 0, -1);
    /// One step along -x
    pub const LEFT: Self = Self::new(-1, 0, 0);
    /// One step along +x
    pub const RIGHT: Self = Self::new(1, 0, 0);

    /// Create an offset from its components
    pub const fn new(dx: i32, dy: i32, dz: i32) -> Self {
        Self { dx, dy, dz }
    }

    /// Components as an array
    pub const fn to_array(self) -> [i32; 3] {
        [self.dx, self.dy, self.dz]
    }

    /// Position of this offset in [`NEIGHBORHOOD`], if it is sampled
    pub fn direction_index(self) -> Option<usize> {
        NEIGHBORHOOD.iter().position(|&offset| offset == self)
    }

    /// Whether this offset is one of the sampled directions
    pub fn is_sampled(self) -> bool {
        self.direction_index().is_some()
    }

    /// Rotate about the vertical axis, matching how templates are rotated
    ///
    /// A quarter turn maps `(dx, dy, dz)` to `(dz, dy, -dx)`.
    #[must_use]
    pub const fn rotated(self, rotation: Rotation) -> Self {
        let mut offset = self;
        let mut turns = rotation.quarter_turns();
        while turns > 0 {
            offset = Self::new(offset.dz, offset.dy, -offset.dx);
            turns -= 1;
        }
        offset
    }

    /// Offset between two unsigned grid coordinates, `to - from`
    pub const fn between(from: [usize; 3], to: [usize; 3]) -> Self {
        Self::new(
            to[0] as i32 - from[0] as i32,
            to[1] as i32 - from[1] as i32,
            to[2] as i32 - from[2] as i32,
        )
    }
}

impl Neg for Offset {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.dx, -self.dy, -self.dz)
    }
}

impl Sub for Offset {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.dx - rhs.dx, self.dy - rhs.dy, self.dz - rhs.dz)
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.dx, self.dy, self.dz)
    }
}
