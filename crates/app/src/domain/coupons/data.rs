//! Coupons Data

use jiff::civil::Date;
use rust_decimal::Decimal;
use rustc_hash::FxHashSet;

use grosir::{
    coupons::{CategoryScope, CouponRule},
    discounts::DiscountKind,
};

use crate::{
    domain::{catalog::records::CategoryUuid, coupons::records::CouponUuid},
    identities::BuyerUuid,
};

/// Everything about a coupon except its identity and code.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponTerms {
    pub kind: DiscountKind,
    pub value: Decimal,
    pub minimum_purchase: Decimal,
    pub usage_limit: Option<u64>,
    pub expires_on: Date,
    pub active: bool,
    pub all_categories: bool,
    pub categories: Vec<CategoryUuid>,
}

impl CouponTerms {
    /// The eligibility rule these terms describe.
    #[must_use]
    pub fn rule(&self) -> CouponRule<CategoryUuid> {
        let categories = if self.all_categories {
            CategoryScope::All
        } else {
            CategoryScope::Only(self.categories.iter().copied().collect::<FxHashSet<_>>())
        };

        CouponRule {
            kind: self.kind,
            value: self.value,
            minimum_purchase: self.minimum_purchase,
            usage_limit: self.usage_limit,
            expires_on: self.expires_on,
            active: self.active,
            categories,
        }
    }
}

/// New Coupon Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCoupon {
    pub uuid: CouponUuid,
    pub code: String,
    pub terms: CouponTerms,
}

/// Coupon Update Data
#[derive(Debug, Clone, PartialEq)]
pub struct CouponUpdate {
    pub code: String,
    pub terms: CouponTerms,
}

/// A buyer asking what a code would take off a prospective order.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponPreview {
    pub code: String,
    pub buyer: BuyerUuid,
    pub total: Decimal,
    pub categories: Vec<CategoryUuid>,
}
