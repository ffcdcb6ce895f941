//! Subscription coupons and discount arithmetic.
//!
//! Discount calculation is pure: it never touches `times_used`. Redemption
//! is a separate, conditional increment performed by the coupon repository
//! at the point the subscription is submitted.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::foundation::{CouponId, Money, Percentage, Timestamp, ValidationError};

const MIN_CODE_LEN: usize = 3;
const MAX_CODE_LEN: usize = 32;

/// A validated coupon code, normalized to uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CouponCode(String);

impl CouponCode {
    /// Parses and normalizes a coupon code.
    ///
    /// Accepts 3 to 32 ASCII letters, digits, `-` or `_` after trimming.
    pub fn try_new(code: &str) -> Result<Self, ValidationError> {
        let normalized = code.trim().to_ascii_uppercase();
        if normalized.is_empty() {
            return Err(ValidationError::empty_field("coupon_code"));
        }
        let len = normalized.chars().count();
        if !(MIN_CODE_LEN..=MAX_CODE_LEN).contains(&len) {
            return Err(ValidationError::out_of_range(
                "coupon_code_length",
                MIN_CODE_LEN as i64,
                MAX_CODE_LEN as i64,
                len as i64,
            ));
        }
        if !normalized
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValidationError::invalid_format(
                "coupon_code",
                "letters, digits, '-' and '_' only",
            ));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CouponCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CouponCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(&value)
    }
}

impl From<CouponCode> for String {
    fn from(code: CouponCode) -> Self {
        code.0
    }
}

/// Persisted discount kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "percentage",
            DiscountType::Fixed => "fixed",
        }
    }
}

impl FromStr for DiscountType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(DiscountType::Percentage),
            "fixed" => Ok(DiscountType::Fixed),
            other => Err(ValidationError::invalid_format(
                "discount_type",
                format!("unknown discount type '{}'", other),
            )),
        }
    }
}

/// The discount a coupon grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Discount {
    Percentage(Percentage),
    Fixed(Money),
}

impl Discount {
    /// Builds a discount from its persisted form.
    ///
    /// `hundredths` is the `NUMERIC(10,2)` value scaled by 100: basis points
    /// for percentages, cents for fixed amounts.
    pub fn from_parts(discount_type: DiscountType, hundredths: i64) -> Result<Self, ValidationError> {
        if hundredths < 0 {
            return Err(ValidationError::out_of_range(
                "discount_value",
                0,
                i64::MAX,
                hundredths,
            ));
        }
        match discount_type {
            DiscountType::Percentage => {
                let bp = u32::try_from(hundredths).map_err(|_| {
                    ValidationError::out_of_range(
                        "discount_value",
                        0,
                        i64::from(Percentage::SCALE),
                        hundredths,
                    )
                })?;
                Ok(Discount::Percentage(Percentage::try_from_basis_points(bp)?))
            }
            DiscountType::Fixed => Ok(Discount::Fixed(Money::from_cents(hundredths))),
        }
    }

    /// Splits into the persisted `(discount_type, hundredths)` pair.
    pub fn to_parts(&self) -> (DiscountType, i64) {
        match self {
            Discount::Percentage(p) => (DiscountType::Percentage, i64::from(p.basis_points())),
            Discount::Fixed(m) => (DiscountType::Fixed, m.cents()),
        }
    }

    pub fn discount_type(&self) -> DiscountType {
        self.to_parts().0
    }
}

/// Result of applying a coupon to a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountQuote {
    pub original: Money,
    pub discount: Money,
    pub payable: Money,
}

impl DiscountQuote {
    /// A quote with no discount applied.
    pub fn undiscounted(amount: Money) -> Self {
        Self {
            original: amount,
            discount: Money::ZERO,
            payable: amount,
        }
    }
}

/// A discount coupon for the paid club subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClubSubscriptionCoupon {
    pub id: CouponId,
    pub code: CouponCode,
    pub discount: Discount,
    /// `None` means unlimited.
    pub max_uses: Option<u32>,
    pub times_used: u32,
    pub min_amount: Option<Money>,
    pub starts_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub is_active: bool,
}

impl ClubSubscriptionCoupon {
    /// Creates an active, unused coupon with no window or usage cap.
    pub fn new(code: CouponCode, discount: Discount) -> Self {
        Self {
            id: CouponId::new(),
            code,
            discount,
            max_uses: None,
            times_used: 0,
            min_amount: None,
            starts_at: None,
            expires_at: None,
            is_active: true,
        }
    }

    /// True when the coupon can be redeemed at `now`.
    pub fn is_valid(&self, now: Timestamp) -> bool {
        self.is_active
            && self.starts_at.map_or(true, |starts| !starts.is_after(&now))
            && self.expires_at.map_or(true, |expires| expires.is_after(&now))
            && !self.is_exhausted()
    }

    pub fn is_exhausted(&self) -> bool {
        self.max_uses.map_or(false, |max| self.times_used >= max)
    }

    /// Redemptions left, or `None` when unlimited.
    pub fn remaining_uses(&self) -> Option<u32> {
        self.max_uses.map(|max| max.saturating_sub(self.times_used))
    }

    /// Discount for `amount`. Zero below the minimum amount, never more
    /// than `amount` itself.
    pub fn calculate_discount(&self, amount: Money) -> Money {
        if amount.cents() <= 0 {
            return Money::ZERO;
        }
        if let Some(min) = self.min_amount {
            if amount < min {
                return Money::ZERO;
            }
        }
        match self.discount {
            Discount::Percentage(rate) => amount.percent(rate).min(amount),
            Discount::Fixed(value) => value.min(amount),
        }
    }

    /// Applies the coupon to `amount`.
    pub fn quote(&self, amount: Money) -> DiscountQuote {
        let discount = self.calculate_discount(amount);
        DiscountQuote {
            original: amount,
            discount,
            payable: amount.saturating_sub(discount),
        }
    }
}
