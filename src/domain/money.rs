use crate::error::CheckoutError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An amount in paise, the smallest unit of the rupee.
///
/// Gateway amounts are always expressed in this unit, so prices resolved in
/// rupees go through [`Paise::from_rupees`] before leaving the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Paise(u64);

impl Paise {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Converts a rupee price to paise, rounding to the nearest paisa with
    /// midpoints rounded away from zero.
    ///
    /// Negative prices and prices too large for a `u64` are rejected.
    pub fn from_rupees(price: Decimal) -> Result<Self, CheckoutError> {
        if price.is_sign_negative() && !price.is_zero() {
            return Err(CheckoutError::InvalidPrice(price));
        }

        price
            .checked_mul(Decimal::ONE_HUNDRED)
            .map(|scaled| scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|scaled| scaled.to_u64())
            .map(Self)
            .ok_or(CheckoutError::InvalidPrice(price))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Paise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
