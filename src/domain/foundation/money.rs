//! Money value object in integer minor units.
//!
//! All amounts are held as `i64` cents. Floats never touch money.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Percentage, ValidationError};

/// An amount of money in minor units (cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from cents.
    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Creates a non-negative amount, rejecting negatives.
    pub fn try_from_cents(cents: i64) -> Result<Self, ValidationError> {
        if cents < 0 {
            return Err(ValidationError::out_of_range("amount", 0, i64::MAX, cents));
        }
        Ok(Self(cents))
    }

    /// Creates an amount from whole currency units.
    pub fn from_major(units: i64) -> Self {
        Self(units.saturating_mul(100))
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Subtracts, clamping at zero.
    pub fn saturating_sub(self, other: Money) -> Money {
        Money((self.0 - other.0).max(0))
    }

    /// Applies a percentage, rounding half away from zero to whole cents.
    ///
    /// `1000.00 × 10%` is exactly `100.00`; `0.05 × 50%` rounds up to `0.03`.
    pub fn percent(self, rate: Percentage) -> Money {
        let scaled = i128::from(self.0) * i128::from(rate.basis_points());
        let half = i128::from(Percentage::SCALE) / 2;
        let rounded = if scaled >= 0 {
            (scaled + half) / i128::from(Percentage::SCALE)
        } else {
            (scaled - half) / i128::from(Percentage::SCALE)
        };
        Money(rounded as i64)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}
