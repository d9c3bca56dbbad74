//! Get Coupon Handler

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    coupons::{errors::into_status_error, responses::CouponResponse},
    extensions::*,
};

/// Get Coupon Handler
#[endpoint(
    tags("coupons"),
    summary = "Get Coupon",
    security(("actor" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Coupon"),
        (status_code = StatusCode::FORBIDDEN, description = "Administrator role required"),
        (status_code = StatusCode::NOT_FOUND, description = "Coupon not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    coupon: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CouponResponse>, StatusError> {
    let state = depot.state_or_500()?;

    depot.admin_or_403()?;

    let coupon = state
        .app
        .coupons
        .get_coupon(coupon.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(coupon.into()))
}

#[cfg(test)]
mod tests {
    use grosir_app::domain::coupons::{
        CouponsServiceError, MockCouponsService, records::CouponUuid,
    };
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{TEST_ADMIN, coupons_service, make_coupon};

    use super::*;

    fn make_service(coupons: MockCouponsService) -> Service {
        coupons_service(
            coupons,
            TEST_ADMIN,
            Router::with_path("coupons/{coupon}").get(handler),
        )
    }

    #[tokio::test]
    async fn test_get_coupon() -> TestResult {
        let uuid = CouponUuid::new();
        let coupon = make_coupon(uuid);

        let mut coupons = MockCouponsService::new();

        coupons
            .expect_get_coupon()
            .once()
            .withf(move |u| *u == uuid)
            .return_once(move |_| Ok(coupon));

        let mut res = TestClient::get(format!("http://example.com/coupons/{uuid}"))
            .send(&make_service(coupons))
            .await;

        let body: CouponResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.uuid, uuid.into_uuid());
        assert_eq!(body.minimum_purchase.to_string(), "100000");
        assert_eq!(body.expires_on, "2026-12-31");

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_coupon_returns_404() {
        let mut coupons = MockCouponsService::new();

        coupons
            .expect_get_coupon()
            .once()
            .return_once(|_| Err(CouponsServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/coupons/{}", CouponUuid::new()))
            .send(&make_service(coupons))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }
}
