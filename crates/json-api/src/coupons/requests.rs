//! Coupon Requests

use jiff::civil::Date;
use rust_decimal::Decimal;
use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use grosir::discounts::DiscountKind;
use grosir_app::{
    domain::{
        catalog::records::CategoryUuid,
        coupons::{
            data::{CouponPreview, CouponTerms, CouponUpdate, NewCoupon},
            records::CouponUuid,
        },
    },
    identities::BuyerUuid,
};

use crate::extensions::*;

const fn default_active() -> bool {
    true
}

/// Discount terms of a coupon.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub(crate) struct CouponTermsRequest {
    /// `PERCENTAGE` or `FIXED_AMOUNT`
    pub kind: String,

    /// Percent points or rupiah, depending on `kind`
    #[salvo(schema(value_type = String))]
    pub value: Decimal,

    #[serde(default)]
    #[salvo(schema(value_type = String))]
    pub minimum_purchase: Decimal,

    /// Omit for unlimited redemptions
    #[serde(default)]
    pub usage_limit: Option<u64>,

    /// Last valid day, `YYYY-MM-DD`
    pub expires_on: String,

    #[serde(default = "default_active")]
    pub active: bool,

    /// Applies to every category; otherwise only to `categories`
    #[serde(default)]
    pub all_categories: bool,

    #[serde(default)]
    pub categories: Vec<Uuid>,
}

impl TryFrom<CouponTermsRequest> for CouponTerms {
    type Error = StatusError;

    fn try_from(request: CouponTermsRequest) -> Result<Self, Self::Error> {
        Ok(CouponTerms {
            kind: request
                .kind
                .parse::<DiscountKind>()
                .or_400("unknown discount kind")?,
            value: request.value,
            minimum_purchase: request.minimum_purchase,
            usage_limit: request.usage_limit,
            expires_on: request
                .expires_on
                .parse::<Date>()
                .or_400("could not parse expires_on date")?,
            active: request.active,
            all_categories: request.all_categories,
            categories: request
                .categories
                .into_iter()
                .map(CategoryUuid::from_uuid)
                .collect(),
        })
    }
}

/// Create Coupon Request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub(crate) struct CreateCouponRequest {
    pub uuid: Uuid,

    /// Case-insensitive; stored upper-case
    pub code: String,

    #[serde(flatten)]
    pub terms: CouponTermsRequest,
}

impl TryFrom<CreateCouponRequest> for NewCoupon {
    type Error = StatusError;

    fn try_from(request: CreateCouponRequest) -> Result<Self, Self::Error> {
        Ok(NewCoupon {
            uuid: CouponUuid::from_uuid(request.uuid),
            code: request.code,
            terms: request.terms.try_into()?,
        })
    }
}

/// Update Coupon Request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub(crate) struct UpdateCouponRequest {
    pub code: String,

    #[serde(flatten)]
    pub terms: CouponTermsRequest,
}

impl TryFrom<UpdateCouponRequest> for CouponUpdate {
    type Error = StatusError;

    fn try_from(request: UpdateCouponRequest) -> Result<Self, Self::Error> {
        Ok(CouponUpdate {
            code: request.code,
            terms: request.terms.try_into()?,
        })
    }
}

/// A prospective order to check a code against.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub(crate) struct ValidateCouponRequest {
    pub code: String,

    /// Product total after category discounts
    #[salvo(schema(value_type = String))]
    pub total: Decimal,

    /// Categories in the basket
    #[serde(default)]
    pub categories: Vec<Uuid>,
}

impl ValidateCouponRequest {
    pub(crate) fn into_preview(self, buyer: BuyerUuid) -> CouponPreview {
        CouponPreview {
            code: self.code,
            buyer,
            total: self.total,
            categories: self
                .categories
                .into_iter()
                .map(CategoryUuid::from_uuid)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use salvo::http::StatusCode;
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn create_request_flattens_terms() -> TestResult {
        let category = Uuid::now_v7();

        let request: CreateCouponRequest = serde_json::from_value(json!({
            "uuid": Uuid::now_v7(),
            "code": "beras5",
            "kind": "FIXED_AMOUNT",
            "value": "5000",
            "expires_on": "2026-12-31",
            "categories": [category],
        }))?;

        let coupon = NewCoupon::try_from(request)?;

        assert_eq!(coupon.code, "beras5");
        assert_eq!(coupon.terms.kind, DiscountKind::FixedAmount);
        assert_eq!(coupon.terms.value, Decimal::from(5_000));
        assert_eq!(coupon.terms.minimum_purchase, Decimal::ZERO);
        assert_eq!(coupon.terms.usage_limit, None);
        assert_eq!(coupon.terms.expires_on, date(2026, 12, 31));
        assert!(coupon.terms.active);
        assert!(!coupon.terms.all_categories);
        assert_eq!(coupon.terms.categories, vec![CategoryUuid::from_uuid(category)]);

        Ok(())
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let terms = CouponTermsRequest {
            kind: "BOGO".to_string(),
            value: Decimal::ONE,
            minimum_purchase: Decimal::ZERO,
            usage_limit: None,
            expires_on: "2026-12-31".to_string(),
            active: true,
            all_categories: true,
            categories: Vec::new(),
        };

        let result = CouponTerms::try_from(terms);

        assert!(
            matches!(&result, Err(error) if error.code == StatusCode::BAD_REQUEST),
            "expected 400, got {result:?}"
        );
    }

    #[test]
    fn malformed_expiry_is_rejected() {
        let terms = CouponTermsRequest {
            kind: "PERCENTAGE".to_string(),
            value: Decimal::TEN,
            minimum_purchase: Decimal::ZERO,
            usage_limit: Some(5),
            expires_on: "31/12/2026".to_string(),
            active: true,
            all_categories: true,
            categories: Vec::new(),
        };

        let result = CouponTerms::try_from(terms);

        assert!(
            matches!(&result, Err(error) if error.brief == "could not parse expires_on date"),
            "expected expiry error, got {result:?}"
        );
    }
}
