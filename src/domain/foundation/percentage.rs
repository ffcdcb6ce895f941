//! Percentage value object with hundredth-of-a-percent precision.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A rate between 0% and 100% inclusive, stored in basis points.
///
/// `1250` basis points is 12.50%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(u32);

impl Percentage {
    /// Basis points in one hundred percent.
    pub const SCALE: u32 = 10_000;

    /// Zero percent.
    pub const ZERO: Self = Self(0);

    /// One hundred percent.
    pub const HUNDRED: Self = Self(Self::SCALE);

    /// Creates a whole-number percentage, clamping to 100.
    pub fn from_whole(percent: u8) -> Self {
        Self((u32::from(percent) * 100).min(Self::SCALE))
    }

    /// Creates a Percentage from basis points, returning error if above 100%.
    pub fn try_from_basis_points(bp: u32) -> Result<Self, ValidationError> {
        if bp > Self::SCALE {
            return Err(ValidationError::out_of_range(
                "percentage",
                0,
                i64::from(Self::SCALE),
                i64::from(bp),
            ));
        }
        Ok(Self(bp))
    }

    /// Returns the value in basis points.
    pub fn basis_points(&self) -> u32 {
        self.0
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 100 == 0 {
            write!(f, "{}%", self.0 / 100)
        } else {
            write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
        }
    }
}
