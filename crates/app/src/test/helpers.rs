//! Test Helpers

use jiff::{
    Timestamp,
    civil::date,
    tz::{TimeZone, offset},
};
use rust_decimal::Decimal;

use grosir::discounts::DiscountKind;

use crate::domain::coupons::{
    data::{CouponTerms, NewCoupon},
    records::CouponUuid,
};

/// Business time zone used throughout the tests.
pub(crate) fn jakarta() -> TimeZone {
    TimeZone::fixed(offset(7))
}

/// Instant of a wall-clock time in Jakarta.
pub(crate) fn at(year: i16, month: i8, day: i8, hour: i8, minute: i8, second: i8) -> Timestamp {
    date(year, month, day)
        .at(hour, minute, second, 0)
        .to_zoned(jakarta())
        .expect("valid test time")
        .timestamp()
}

pub(crate) fn rupiah(amount: i64) -> Decimal {
    Decimal::from(amount)
}

/// Active percentage coupon valid for every category until the end of 2026.
pub(crate) fn percentage_terms(value: i64, minimum: i64, limit: Option<u64>) -> CouponTerms {
    CouponTerms {
        kind: DiscountKind::Percentage,
        value: rupiah(value),
        minimum_purchase: rupiah(minimum),
        usage_limit: limit,
        expires_on: date(2026, 12, 31),
        active: true,
        all_categories: true,
        categories: Vec::new(),
    }
}

pub(crate) fn new_coupon(code: &str, terms: CouponTerms) -> NewCoupon {
    NewCoupon {
        uuid: CouponUuid::new(),
        code: code.to_string(),
        terms,
    }
}
