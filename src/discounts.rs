//! Discounts

use std::{fmt, str::FromStr};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{money::round_rupiah, values::UnknownValueError};

/// How a discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountKind {
    /// `value` is in percent points (10 means 10%).
    Percentage,

    /// `value` is a rupiah amount.
    FixedAmount,
}

impl DiscountKind {
    /// Stored label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "PERCENTAGE",
            Self::FixedAmount => "FIXED_AMOUNT",
        }
    }

    /// Discount produced by `value` against `base`.
    ///
    /// Percentages are rounded to whole rupiah; fixed amounts are capped at `base` so a
    /// discount never exceeds what it is taken from.
    pub fn amount_off(self, value: Decimal, base: Decimal) -> Decimal {
        if base <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        match self {
            Self::Percentage => {
                let fraction = Percentage::from(value / Decimal::ONE_HUNDRED);

                round_rupiah(fraction * base).min(base)
            }
            Self::FixedAmount => value.min(base),
        }
    }
}

impl fmt::Display for DiscountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiscountKind {
    type Err = UnknownValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PERCENTAGE" => Ok(Self::Percentage),
            "FIXED_AMOUNT" => Ok(Self::FixedAmount),
            other => Err(UnknownValueError::new("discount kind", other)),
        }
    }
}
