//! Type-safe price representation using decimal arithmetic.
//!
//! Amounts coming from the marketplace API are decimal strings such as
//! `"120.00"`. They are parsed into [`Decimal`] so that cart totals, tax and
//! delivery charges never accumulate binary floating-point error.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Taka symbol used when showing amounts.
pub const TAKA_SYMBOL: &str = "৳";

/// An amount in Bangladeshi taka, the marketplace currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a price in taka (not poisha).
    #[must_use]
    pub const fn bdt(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Amount rounded to two decimal places, midpoint away from zero.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        round_money(self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{TAKA_SYMBOL}{:.2}", self.rounded())
    }
}

/// Round a monetary amount to two decimal places.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
