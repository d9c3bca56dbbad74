//! Category Discounts

use jiff::{Timestamp, civil::Date};
use rust_decimal::Decimal;

use crate::discounts::DiscountKind;

/// A time-boxed discount applied to every product of one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDiscount<K> {
    /// Discounted category.
    pub category: K,

    /// Percentage or fixed amount per unit.
    pub kind: DiscountKind,

    /// Percent points or rupiah per unit.
    pub value: Decimal,

    /// First day the discount applies.
    pub starts_on: Date,

    /// Last day the discount applies.
    pub ends_on: Date,

    /// Administrative on/off switch.
    pub active: bool,

    /// When the discount was defined; newer definitions win ties.
    pub created_at: Timestamp,
}

impl<K> CategoryDiscount<K> {
    /// Whether the discount is live on `day`.
    pub fn applies_on(&self, day: Date) -> bool {
        self.active && self.starts_on <= day && day <= self.ends_on
    }

    /// Per-unit discount for a unit price.
    pub fn unit_discount(&self, unit_price: Decimal) -> Decimal {
        self.kind.amount_off(self.value, unit_price)
    }
}

/// Pick the discount that applies to `category` on `day`.
///
/// When several overlap, the most recently created one wins.
pub fn resolve<'a, K: PartialEq>(
    discounts: &'a [CategoryDiscount<K>],
    category: &K,
    day: Date,
) -> Option<&'a CategoryDiscount<K>> {
    discounts
        .iter()
        .filter(|discount| discount.category == *category && discount.applies_on(day))
        .max_by_key(|discount| discount.created_at)
}
