//! Coupon Usage Report Handler

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    coupons::{errors::into_status_error, responses::CouponUsageReportResponse},
    extensions::*,
};

/// Coupon Usage Report Handler
///
/// Every redemption of a coupon, with the count and the total discount given.
#[endpoint(
    tags("coupons"),
    summary = "Coupon Usage Report",
    security(("actor" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Usage report"),
        (status_code = StatusCode::FORBIDDEN, description = "Administrator role required"),
        (status_code = StatusCode::NOT_FOUND, description = "Coupon not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    coupon: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CouponUsageReportResponse>, StatusError> {
    let state = depot.state_or_500()?;

    depot.admin_or_403()?;

    let report = state
        .app
        .coupons
        .usage_report(coupon.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(report.into()))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use rust_decimal::Decimal;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use grosir_app::{
        domain::{
            coupons::{
                MockCouponsService,
                records::{CouponUsageRecord, CouponUsageReport, CouponUsageUuid, CouponUuid},
            },
            orders::records::OrderUuid,
        },
        identities::BuyerUuid,
    };

    use crate::test_helpers::{TEST_ADMIN, coupons_service, make_coupon};

    use super::*;

    #[tokio::test]
    async fn test_usage_report() -> TestResult {
        let uuid = CouponUuid::new();
        let order = OrderUuid::new();

        let report = CouponUsageReport {
            coupon: make_coupon(uuid),
            usage_count: 1,
            total_discount: Decimal::from(18_000),
            usages: vec![CouponUsageRecord {
                uuid: CouponUsageUuid::new(),
                coupon: uuid,
                order,
                buyer: BuyerUuid::new(),
                code: "SAVE10".to_string(),
                discount: Decimal::from(18_000),
                created_at: Timestamp::UNIX_EPOCH,
            }],
        };

        let mut coupons = MockCouponsService::new();

        coupons
            .expect_usage_report()
            .once()
            .withf(move |u| *u == uuid)
            .return_once(move |_| Ok(report));

        let mut res = TestClient::get(format!("http://example.com/coupons/{uuid}/usages"))
            .send(&coupons_service(
                coupons,
                TEST_ADMIN,
                Router::with_path("coupons/{coupon}/usages").get(handler),
            ))
            .await;

        let body: CouponUsageReportResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.usage_count, 1);
        assert_eq!(body.total_discount, Decimal::from(18_000));
        assert_eq!(body.usages.len(), 1);
        assert_eq!(body.usages[0].order, order.into_uuid());

        Ok(())
    }
}
