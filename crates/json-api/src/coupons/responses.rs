//! Coupon Responses

use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use grosir_app::domain::coupons::records::{
    CouponQuote, CouponRecord, CouponUsageRecord, CouponUsageReport,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CouponResponse {
    pub uuid: Uuid,
    pub code: String,

    /// `PERCENTAGE` or `FIXED_AMOUNT`
    pub kind: String,

    #[salvo(schema(value_type = String))]
    pub value: Decimal,

    #[salvo(schema(value_type = String))]
    pub minimum_purchase: Decimal,

    pub usage_limit: Option<u64>,

    /// Last valid day
    pub expires_on: String,

    pub active: bool,
    pub all_categories: bool,
    pub categories: Vec<Uuid>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<CouponRecord> for CouponResponse {
    fn from(coupon: CouponRecord) -> Self {
        let terms = coupon.terms;

        CouponResponse {
            uuid: coupon.uuid.into(),
            code: coupon.code,
            kind: terms.kind.to_string(),
            value: terms.value,
            minimum_purchase: terms.minimum_purchase,
            usage_limit: terms.usage_limit,
            expires_on: terms.expires_on.to_string(),
            active: terms.active,
            all_categories: terms.all_categories,
            categories: terms.categories.into_iter().map(Into::into).collect(),
            created_at: coupon.created_at.to_string(),
            updated_at: coupon.updated_at.to_string(),
        }
    }
}

/// What a code would take off.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CouponQuoteResponse {
    pub coupon: Uuid,
    pub code: String,

    #[salvo(schema(value_type = String))]
    pub discount: Decimal,
}

impl From<CouponQuote> for CouponQuoteResponse {
    fn from(quote: CouponQuote) -> Self {
        CouponQuoteResponse {
            coupon: quote.coupon.into(),
            code: quote.code,
            discount: quote.discount,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CouponUsageResponse {
    pub uuid: Uuid,
    pub order: Uuid,
    pub buyer: Uuid,

    /// Code as redeemed
    pub code: String,

    #[salvo(schema(value_type = String))]
    pub discount: Decimal,

    pub created_at: String,
}

impl From<CouponUsageRecord> for CouponUsageResponse {
    fn from(usage: CouponUsageRecord) -> Self {
        CouponUsageResponse {
            uuid: usage.uuid.into(),
            order: usage.order.into(),
            buyer: usage.buyer.into(),
            code: usage.code,
            discount: usage.discount,
            created_at: usage.created_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CouponUsageReportResponse {
    pub coupon: CouponResponse,
    pub usage_count: u64,

    #[salvo(schema(value_type = String))]
    pub total_discount: Decimal,

    pub usages: Vec<CouponUsageResponse>,
}

impl From<CouponUsageReport> for CouponUsageReportResponse {
    fn from(report: CouponUsageReport) -> Self {
        CouponUsageReportResponse {
            coupon: report.coupon.into(),
            usage_count: report.usage_count,
            total_discount: report.total_discount,
            usages: report.usages.into_iter().map(Into::into).collect(),
        }
    }
}
