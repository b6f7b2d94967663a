//! Quarter-turn rotations about the vertical axis and quaternion classification
//!
//! Rotations form the cyclic group of order 4. Orientations sampled from a
//! template arrive as unit quaternions and must land exactly on one of the four
//! quarter turns; anything else is rejected rather than rounded.

use std::fmt;
use std::str::FromStr;

use crate::io::configuration::ROTATION_TOLERANCE;

/// A rotation by a whole number of quarter turns about the vertical axis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Rotation {
    /// No rotation
    #[default]
    R0,
    /// 90° turn
    R90,
    /// 180° turn
    R180,
    /// 270° turn
    R270,
}

impl Rotation {
    /// All four rotations in ascending order
    pub const ALL: [Self; 4] = [Self::R0, Self::R90, Self::R180, Self::R270];

    /// Build a rotation from a quarter-turn count, reduced modulo 4
    pub const fn from_quarter_turns(turns: i64) -> Self {
        match turns.rem_euclid(4) {
            1 => Self::R90,
            2 => Self::R180,
            3 => Self::R270,
            _ => Self::R0,
        }
    }

    /// Number of quarter turns in `0..4`
    pub const fn quarter_turns(self) -> usize {
        match self {
            Self::R0 => 0,
            Self::R90 => 1,
            Self::R180 => 2,
            Self::R270 => 3,
        }
    }

    /// Group addition modulo 4
    #[must_use]
    pub const fn compose(self, by: Self) -> Self {
        Self::from_quarter_turns((self.quarter_turns() + by.quarter_turns()) as i64)
    }

    /// Group inverse, so that `r.compose(r.inverse()) == R0`
    #[must_use]
    pub const fn inverse(self) -> Self {
        Self::from_quarter_turns(-(self.quarter_turns() as i64))
    }

    /// Angle in degrees
    pub const fn degrees(self) -> u32 {
        self.quarter_turns() as u32 * 90
    }

    /// Artifact spelling of the rotation (`ROTATE_90` etc.)
    pub const fn artifact_name(self) -> &'static str {
        match self {
            Self::R0 => "ROTATE_0",
            Self::R90 => "ROTATE_90",
            Self::R180 => "ROTATE_180",
            Self::R270 => "ROTATE_270",
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.artifact_name())
    }
}

impl FromStr for Rotation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|rotation| rotation.artifact_name() == s.trim())
            .ok_or_else(|| format!("unknown rotation '{}'", s.trim()))
    }
}

/// Unit quaternion in (w, x, y, z) order
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quaternion {
    /// Scalar part
    pub w: f64,
    /// x component
    pub x: f64,
    /// y component
    pub y: f64,
    /// z component
    pub z: f64,
}

impl Quaternion {
    /// Create a quaternion from its components
    pub const fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// Swap the y and z components, turning a z-up orientation into a y-up one
    #[must_use]
    pub const fn z_up_to_y_up(self) -> Self {
        Self::new(self.w, self.x, self.z, self.y)
    }

    /// Components in (w, x, y, z) order
    pub const fn components(self) -> [f64; 4] {
        [self.w, self.x, self.y, self.z]
    }

    /// Classify a y-up quaternion as a quarter turn about the vertical axis
    ///
    /// Both `q` and `-q` describe the same orientation, so the angle is taken
    /// modulo 360°. Returns `None` when the quaternion is not unit length, has
    /// any tilt off the vertical axis, or sits between quarter turns.
    pub fn vertical_quarter_turn(self) -> Option<Rotation> {
        let norm = self.w.mul_add(
            self.w,
            self.x.mul_add(self.x, self.y.mul_add(self.y, self.z * self.z)),
        );
        if (norm.sqrt() - 1.0).abs() > ROTATION_TOLERANCE
            || self.x.abs() > ROTATION_TOLERANCE
            || self.z.abs() > ROTATION_TOLERANCE
        {
            return None;
        }

        let degrees = 2.0 * self.y.atan2(self.w).to_degrees();
        let turns = (degrees / 90.0).round();
        // Compare on the unit circle so tolerance is an angle, not a component error
        let residual = (degrees - turns * 90.0).to_radians().abs();
        if residual > ROTATION_TOLERANCE {
            return None;
        }

        Some(Rotation::from_quarter_turns(turns as i64))
    }
}
