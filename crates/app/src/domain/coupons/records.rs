//! Coupons Records

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::{
    domain::{coupons::data::CouponTerms, orders::records::OrderUuid},
    identities::BuyerUuid,
    uuids::TypedUuid,
};

/// Coupon UUID
pub type CouponUuid = TypedUuid<CouponRecord>;

/// Coupon Record
#[derive(Debug, Clone, PartialEq)]
pub struct CouponRecord {
    pub uuid: CouponUuid,
    pub code: String,
    pub terms: CouponTerms,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Coupon Usage UUID
pub type CouponUsageUuid = TypedUuid<CouponUsageRecord>;

/// One committed redemption.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponUsageRecord {
    pub uuid: CouponUsageUuid,
    pub coupon: CouponUuid,
    pub order: OrderUuid,
    pub buyer: BuyerUuid,
    pub code: String,
    pub discount: Decimal,
    pub created_at: Timestamp,
}

/// Outcome of a successful validation.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponQuote {
    pub coupon: CouponUuid,
    pub code: String,
    pub discount: Decimal,
}

/// Redemptions of one coupon.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponUsageReport {
    pub coupon: CouponRecord,
    pub usage_count: u64,
    pub total_discount: Decimal,
    pub usages: Vec<CouponUsageRecord>,
}
