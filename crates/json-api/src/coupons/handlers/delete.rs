//! Delete Coupon Handler

use jiff::Timestamp;
use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{coupons::errors::into_status_error, extensions::*};

/// Delete Coupon Handler
///
/// Soft-deletes a coupon. Its code becomes free for a new coupon; usage history is kept.
#[endpoint(
    tags("coupons"),
    summary = "Delete Coupon",
    security(("actor" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Coupon deleted"),
        (status_code = StatusCode::FORBIDDEN, description = "Administrator role required"),
        (status_code = StatusCode::NOT_FOUND, description = "Coupon not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    coupon: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.state_or_500()?;

    depot.admin_or_403()?;

    state
        .app
        .coupons
        .delete_coupon(coupon.into_inner().into(), Timestamp::now())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use grosir_app::domain::coupons::{
        CouponsServiceError, MockCouponsService, records::CouponUuid,
    };
    use salvo::test::TestClient;

    use crate::{
        identity::Identity,
        test_helpers::{TEST_ADMIN, TEST_BUYER, coupons_service},
    };

    use super::*;

    fn make_service(coupons: MockCouponsService, identity: Identity) -> Service {
        coupons_service(
            coupons,
            identity,
            Router::with_path("coupons/{coupon}").delete(handler),
        )
    }

    #[tokio::test]
    async fn test_delete_coupon() {
        let uuid = CouponUuid::new();

        let mut coupons = MockCouponsService::new();

        coupons
            .expect_delete_coupon()
            .once()
            .withf(move |u, _| *u == uuid)
            .return_once(|_, _| Ok(()));

        let res = TestClient::delete(format!("http://example.com/coupons/{uuid}"))
            .send(&make_service(coupons, TEST_ADMIN))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));
    }

    #[tokio::test]
    async fn test_delete_missing_coupon_returns_404() {
        let mut coupons = MockCouponsService::new();

        coupons
            .expect_delete_coupon()
            .once()
            .return_once(|_, _| Err(CouponsServiceError::NotFound));

        let res = TestClient::delete(format!("http://example.com/coupons/{}", CouponUuid::new()))
            .send(&make_service(coupons, TEST_ADMIN))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_buyer_cannot_delete_coupon() {
        let mut coupons = MockCouponsService::new();

        coupons.expect_delete_coupon().never();

        let res = TestClient::delete(format!("http://example.com/coupons/{}", CouponUuid::new()))
            .send(&make_service(coupons, TEST_BUYER))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));
    }
}
