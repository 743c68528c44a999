//! Quarter-turn rotation applied before a payload is canonicalized.

use serde::{Deserialize, Serialize};

/// Clockwise rotation in quarter turns.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
pub enum Rotation {
    /// Upright
    #[default]
    #[display("0°")]
    Upright,
    /// Quarter turn clockwise
    #[display("90°")]
    Quarter,
    /// Half turn
    #[display("180°")]
    Half,
    /// Quarter turn counter-clockwise
    #[display("270°")]
    ThreeQuarter,
}

impl Rotation {
    /// Rotation angle in degrees, clockwise.
    pub fn degrees(&self) -> u16 {
        match self {
            Rotation::Upright => 0,
            Rotation::Quarter => 90,
            Rotation::Half => 180,
            Rotation::ThreeQuarter => 270,
        }
    }

    /// Parse a clockwise angle. Negative angles count counter-clockwise.
    ///
    /// Returns `None` for angles that are not a multiple of 90.
    ///
    /// # Examples
    ///
    /// ```
    /// use picsync_core::Rotation;
    ///
    /// assert_eq!(Rotation::from_degrees(-90), Some(Rotation::ThreeQuarter));
    /// assert_eq!(Rotation::from_degrees(450), Some(Rotation::Quarter));
    /// assert_eq!(Rotation::from_degrees(45), None);
    /// ```
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        if degrees % 90 != 0 {
            return None;
        }
        match degrees.rem_euclid(360) {
            0 => Some(Rotation::Upright),
            90 => Some(Rotation::Quarter),
            180 => Some(Rotation::Half),
            _ => Some(Rotation::ThreeQuarter),
        }
    }

    /// One more quarter turn clockwise.
    pub fn clockwise(self) -> Self {
        match self {
            Rotation::Upright => Rotation::Quarter,
            Rotation::Quarter => Rotation::Half,
            Rotation::Half => Rotation::ThreeQuarter,
            Rotation::ThreeQuarter => Rotation::Upright,
        }
    }

    /// One more quarter turn counter-clockwise.
    pub fn counter_clockwise(self) -> Self {
        match self {
            Rotation::Upright => Rotation::ThreeQuarter,
            Rotation::Quarter => Rotation::Upright,
            Rotation::Half => Rotation::Quarter,
            Rotation::ThreeQuarter => Rotation::Half,
        }
    }

    /// Whether the rotation changes the pixel layout.
    pub fn is_identity(&self) -> bool {
        matches!(self, Rotation::Upright)
    }
}
