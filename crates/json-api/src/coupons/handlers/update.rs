//! Update Coupon Handler

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use grosir_app::domain::coupons::data::CouponUpdate;

use crate::{
    coupons::{errors::into_status_error, requests::UpdateCouponRequest, responses::CouponResponse},
    extensions::*,
};

/// Update Coupon Handler
///
/// Replaces the code and terms. Redemptions already made keep the discount they were given.
#[endpoint(
    tags("coupons"),
    summary = "Update Coupon",
    security(("actor" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Coupon updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid coupon"),
        (status_code = StatusCode::FORBIDDEN, description = "Administrator role required"),
        (status_code = StatusCode::NOT_FOUND, description = "Coupon not found"),
        (status_code = StatusCode::CONFLICT, description = "Code already in use"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    coupon: PathParam<Uuid>,
    json: JsonBody<UpdateCouponRequest>,
    depot: &mut Depot,
) -> Result<Json<CouponResponse>, StatusError> {
    let state = depot.state_or_500()?;

    depot.admin_or_403()?;

    let update = CouponUpdate::try_from(json.into_inner())?;

    let updated = state
        .app
        .coupons
        .update_coupon(coupon.into_inner().into(), update)
        .await
        .map_err(into_status_error)?;

    Ok(Json(updated.into()))
}

#[cfg(test)]
mod tests {
    use grosir_app::domain::coupons::{
        CouponsServiceError, MockCouponsService, records::CouponUuid,
    };
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::{TEST_ADMIN, coupons_service, make_coupon};

    use super::*;

    fn make_service(coupons: MockCouponsService) -> Service {
        coupons_service(
            coupons,
            TEST_ADMIN,
            Router::with_path("coupons/{coupon}").put(handler),
        )
    }

    fn body() -> serde_json::Value {
        json!({
            "code": "SAVE15",
            "kind": "PERCENTAGE",
            "value": "15",
            "minimum_purchase": "100000",
            "expires_on": "2026-12-31",
            "active": false,
            "all_categories": true,
        })
    }

    #[tokio::test]
    async fn test_update_coupon() -> TestResult {
        let uuid = CouponUuid::new();
        let mut updated = make_coupon(uuid);
        updated.code = "SAVE15".to_string();
        updated.terms.active = false;

        let mut coupons = MockCouponsService::new();

        coupons
            .expect_update_coupon()
            .once()
            .withf(move |u, update| *u == uuid && update.code == "SAVE15" && !update.terms.active)
            .return_once(move |_, _| Ok(updated));

        let mut res = TestClient::put(format!("http://example.com/coupons/{uuid}"))
            .json(&body())
            .send(&make_service(coupons))
            .await;

        let response: CouponResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(response.code, "SAVE15");
        assert!(!response.active);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_coupon_returns_404() {
        let mut coupons = MockCouponsService::new();

        coupons
            .expect_update_coupon()
            .once()
            .return_once(|_, _| Err(CouponsServiceError::NotFound));

        let res = TestClient::put(format!("http://example.com/coupons/{}", CouponUuid::new()))
            .json(&body())
            .send(&make_service(coupons))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }
}
