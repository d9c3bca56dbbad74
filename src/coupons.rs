//! Coupons
//!
//! Eligibility rules and discount arithmetic for buyer-entered coupon codes. Storage, locking and
//! the usage ledger live in the application crate; everything here is a pure function of the
//! coupon definition, the live usage count and the candidate order.

use std::hash::Hash;

use jiff::{Zoned, civil::Date};
use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::discounts::DiscountKind;

/// Reasons a coupon cannot be applied to an order.
///
/// Variants are listed in the order the checks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CouponRejection {
    /// The coupon has been switched off.
    #[error("coupon is not active")]
    Inactive,

    /// The expiry date has passed in the business time zone.
    #[error("coupon has expired")]
    Expired,

    /// Committed redemptions already reached the usage limit.
    #[error("coupon usage limit reached")]
    LimitReached,

    /// The order total is below the coupon's minimum purchase.
    #[error("order total is below the coupon minimum purchase")]
    BelowMinimum,

    /// None of the ordered categories are covered by the coupon.
    #[error("coupon does not apply to the ordered categories")]
    CategoryNotAllowed,
}

/// Problems with a coupon definition submitted by an administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CouponDefinitionError {
    /// Codes must contain at least one non-whitespace character.
    #[error("coupon code is empty")]
    EmptyCode,

    /// Discount value must be positive.
    #[error("discount value must be greater than zero")]
    NonPositiveValue,

    /// Percentages above 100 are not meaningful.
    #[error("percentage discount cannot exceed 100")]
    PercentageOutOfRange,

    /// Minimum purchase cannot be negative.
    #[error("minimum purchase cannot be negative")]
    NegativeMinimum,

    /// A usage limit, when present, must allow at least one redemption.
    #[error("usage limit must be at least 1")]
    ZeroLimit,

    /// Category-restricted coupons need at least one category.
    #[error("category-restricted coupon has no categories")]
    NoCategories,
}

/// Which categories a coupon covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryScope<K: Eq + Hash> {
    /// Every category.
    All,

    /// Only the listed categories.
    Only(FxHashSet<K>),
}

impl<K: Eq + Hash> CategoryScope<K> {
    /// Whether at least one of `categories` is covered.
    pub fn intersects<'a>(&self, categories: impl IntoIterator<Item = &'a K>) -> bool
    where
        K: 'a,
    {
        match self {
            Self::All => true,
            Self::Only(allowed) => categories.into_iter().any(|c| allowed.contains(c)),
        }
    }
}

/// The rule portion of a coupon.
#[derive(Debug, Clone)]
pub struct CouponRule<K: Eq + Hash> {
    /// Percentage or fixed amount.
    pub kind: DiscountKind,

    /// Percent points or rupiah, depending on `kind`.
    pub value: Decimal,

    /// Smallest order total the coupon applies to.
    pub minimum_purchase: Decimal,

    /// Maximum number of committed redemptions, if any.
    pub usage_limit: Option<u64>,

    /// Last calendar day (business time zone) the coupon is valid on.
    pub expires_on: Date,

    /// Administrative on/off switch.
    pub active: bool,

    /// Covered categories.
    pub categories: CategoryScope<K>,
}

impl<K: Eq + Hash> CouponRule<K> {
    /// Check the definition itself, independent of any order.
    ///
    /// # Errors
    ///
    /// Returns the first [`CouponDefinitionError`] found.
    pub fn validate_definition(&self) -> Result<(), CouponDefinitionError> {
        if self.value <= Decimal::ZERO {
            return Err(CouponDefinitionError::NonPositiveValue);
        }

        if self.kind == DiscountKind::Percentage && self.value > Decimal::ONE_HUNDRED {
            return Err(CouponDefinitionError::PercentageOutOfRange);
        }

        if self.minimum_purchase < Decimal::ZERO {
            return Err(CouponDefinitionError::NegativeMinimum);
        }

        if self.usage_limit == Some(0) {
            return Err(CouponDefinitionError::ZeroLimit);
        }

        if let CategoryScope::Only(categories) = &self.categories
            && categories.is_empty()
        {
            return Err(CouponDefinitionError::NoCategories);
        }

        Ok(())
    }

    /// The coupon stays valid through the whole of its expiry date in `now`'s time zone.
    pub fn is_expired_at(&self, now: &Zoned) -> bool {
        now.date() > self.expires_on
    }

    /// Discount this coupon gives on `total`.
    pub fn discount_for(&self, total: Decimal) -> Decimal {
        self.kind.amount_off(self.value, total)
    }

    /// Run every eligibility check and return the discount.
    ///
    /// `usage_count` must be the committed redemption count, read while the coupon row is
    /// locked when the result will be redeemed.
    ///
    /// # Errors
    ///
    /// Returns the first [`CouponRejection`] that applies.
    pub fn evaluate<'a>(
        &self,
        usage_count: u64,
        total: Decimal,
        categories: impl IntoIterator<Item = &'a K>,
        now: &Zoned,
    ) -> Result<Decimal, CouponRejection>
    where
        K: 'a,
    {
        if !self.active {
            return Err(CouponRejection::Inactive);
        }

        if self.is_expired_at(now) {
            return Err(CouponRejection::Expired);
        }

        if self.usage_limit.is_some_and(|limit| usage_count >= limit) {
            return Err(CouponRejection::LimitReached);
        }

        if total < self.minimum_purchase {
            return Err(CouponRejection::BelowMinimum);
        }

        if !self.categories.intersects(categories) {
            return Err(CouponRejection::CategoryNotAllowed);
        }

        Ok(self.discount_for(total))
    }
}

/// Normalise a submitted coupon code for storage and lookup.
///
/// # Errors
///
/// Returns [`CouponDefinitionError::EmptyCode`] when nothing but whitespace was given.
pub fn normalise_code(code: &str) -> Result<String, CouponDefinitionError> {
    let trimmed = code.trim();

    if trimmed.is_empty() {
        return Err(CouponDefinitionError::EmptyCode);
    }

    Ok(trimmed.to_uppercase())
}

#[cfg(test)]
mod tests {
    use jiff::{
        civil::date,
        tz::{TimeZone, offset},
    };
    use testresult::TestResult;

    use super::*;

    fn jakarta() -> TimeZone {
        TimeZone::fixed(offset(7))
    }

    fn save10() -> CouponRule<u32> {
        CouponRule {
            kind: DiscountKind::Percentage,
            value: Decimal::from(10),
            minimum_purchase: Decimal::from(100_000),
            usage_limit: Some(1),
            expires_on: date(2026, 3, 31),
            active: true,
            categories: CategoryScope::All,
        }
    }

    fn at(y: i16, m: i8, d: i8, h: i8, min: i8, s: i8) -> Result<Zoned, jiff::Error> {
        date(y, m, d).at(h, min, s, 0).to_zoned(jakarta())
    }

    #[test]
    fn save10_discounts_ten_percent() -> TestResult {
        let discount =
            save10().evaluate(0, Decimal::from(200_000), &[1], &at(2026, 3, 1, 9, 0, 0)?);

        assert_eq!(discount, Ok(Decimal::from(20_000)));

        Ok(())
    }

    #[test]
    fn valid_until_last_second_of_expiry_day() -> TestResult {
        let rule = save10();
        let total = Decimal::from(200_000);

        let late = rule.evaluate(0, total, &[1], &at(2026, 3, 31, 23, 59, 58)?);
        let next_day = rule.evaluate(0, total, &[1], &at(2026, 4, 1, 0, 0, 1)?);

        assert!(late.is_ok(), "expected valid at 23:59:58, got {late:?}");
        assert_eq!(next_day, Err(CouponRejection::Expired));

        Ok(())
    }

    #[test]
    fn expiry_follows_business_time_zone() -> TestResult {
        // 2026-03-31T20:00Z is already 1 April in Jakarta
        let now = date(2026, 3, 31)
            .at(20, 0, 0, 0)
            .to_zoned(TimeZone::UTC)?
            .with_time_zone(jakarta());

        assert!(save10().is_expired_at(&now), "expected expiry in Jakarta time");

        Ok(())
    }

    #[test]
    fn limit_reached_once_usage_meets_limit() -> TestResult {
        let result = save10().evaluate(1, Decimal::from(200_000), &[1], &at(2026, 3, 1, 9, 0, 0)?);

        assert_eq!(result, Err(CouponRejection::LimitReached));

        Ok(())
    }

    #[test]
    fn unlimited_coupon_ignores_usage_count() -> TestResult {
        let rule = CouponRule {
            usage_limit: None,
            ..save10()
        };

        let result = rule.evaluate(10_000, Decimal::from(200_000), &[1], &at(2026, 3, 1, 9, 0, 0)?);

        assert!(result.is_ok(), "expected unlimited coupon to apply, got {result:?}");

        Ok(())
    }

    #[test]
    fn below_minimum_is_rejected() -> TestResult {
        let result = save10().evaluate(0, Decimal::from(99_999), &[1], &at(2026, 3, 1, 9, 0, 0)?);

        assert_eq!(result, Err(CouponRejection::BelowMinimum));

        Ok(())
    }

    #[test]
    fn inactive_wins_over_other_failures() -> TestResult {
        let rule = CouponRule {
            active: false,
            ..save10()
        };

        let result = rule.evaluate(5, Decimal::ZERO, &[1], &at(2027, 1, 1, 0, 0, 0)?);

        assert_eq!(result, Err(CouponRejection::Inactive));

        Ok(())
    }

    #[test]
    fn category_restriction_requires_intersection() -> TestResult {
        let rule = CouponRule {
            categories: CategoryScope::Only([7, 8].into_iter().collect()),
            ..save10()
        };
        let now = at(2026, 3, 1, 9, 0, 0)?;

        assert_eq!(
            rule.evaluate(0, Decimal::from(200_000), &[1, 2], &now),
            Err(CouponRejection::CategoryNotAllowed)
        );
        assert!(
            rule.evaluate(0, Decimal::from(200_000), &[2, 8], &now).is_ok(),
            "one shared category is enough"
        );

        Ok(())
    }

    #[test]
    fn fixed_amount_never_exceeds_total() -> TestResult {
        let rule = CouponRule {
            kind: DiscountKind::FixedAmount,
            value: Decimal::from(150_000),
            minimum_purchase: Decimal::ZERO,
            ..save10()
        };

        let result = rule.evaluate(0, Decimal::from(120_000), &[1], &at(2026, 3, 1, 9, 0, 0)?);

        assert_eq!(result, Ok(Decimal::from(120_000)));

        Ok(())
    }

    #[test]
    fn definition_checks() {
        let over = CouponRule {
            value: Decimal::from(101),
            ..save10()
        };
        let zero_limit = CouponRule {
            usage_limit: Some(0),
            ..save10()
        };
        let no_categories = CouponRule {
            categories: CategoryScope::Only(FxHashSet::default()),
            ..save10()
        };

        assert_eq!(save10().validate_definition(), Ok(()));
        assert_eq!(
            over.validate_definition(),
            Err(CouponDefinitionError::PercentageOutOfRange)
        );
        assert_eq!(
            zero_limit.validate_definition(),
            Err(CouponDefinitionError::ZeroLimit)
        );
        assert_eq!(
            no_categories.validate_definition(),
            Err(CouponDefinitionError::NoCategories)
        );
    }

    #[test]
    fn codes_are_trimmed_and_upper_cased() {
        assert_eq!(normalise_code("  save10 "), Ok("SAVE10".to_string()));
        assert_eq!(normalise_code("   "), Err(CouponDefinitionError::EmptyCode));
    }
}
