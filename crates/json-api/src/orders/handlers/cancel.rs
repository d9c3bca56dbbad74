//! Cancel Order Handler

use jiff::Timestamp;
use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use tracing::warn;
use uuid::Uuid;

use grosir::orders::OrderStatus;
use grosir_app::domain::orders::records::OrderUuid;

use crate::{
    extensions::*,
    orders::{
        errors::into_status_error, requests::CancelOrderRequest,
        responses::CancelledOrderResponse,
    },
};

/// Cancel Order Handler
///
/// Cancels an order with a reason. Buyers may cancel their own orders while they are still
/// pending; the response says whether money already received has to be refunded.
#[endpoint(
    tags("orders"),
    summary = "Cancel Order",
    security(("actor" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order cancelled"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing reason"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Order can no longer be cancelled"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<CancelOrderRequest>,
    depot: &mut Depot,
) -> Result<Json<CancelledOrderResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let identity = depot.identity_or_401()?;
    let order = OrderUuid::from_uuid(order.into_inner());

    if !identity.is_admin() {
        let details = state
            .app
            .orders
            .get_order(order)
            .await
            .map_err(into_status_error)?;

        if !identity.can_access(details.order.buyer) {
            return Err(StatusError::not_found().brief("Order not found"));
        }

        if details.order.status != OrderStatus::Pending {
            return Err(StatusError::conflict().brief("Only pending orders can be cancelled"));
        }
    }

    let cancelled = state
        .app
        .orders
        .cancel_order(
            order,
            json.into_inner().into_cancellation(identity.actor()),
            Timestamp::now(),
        )
        .await
        .map_err(into_status_error)?;

    if cancelled.refund_required {
        warn!(order_uuid = %order, "cancelled order has payments to refund");
    }

    Ok(Json(cancelled.into()))
}

#[cfg(test)]
mod tests {
    use grosir::payments::PaymentStatus;
    use grosir_app::{
        domain::orders::{MockOrdersService, OrdersServiceError, records::CancelledOrder},
        identities::BuyerUuid,
    };
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::{
        identity::Identity,
        test_helpers::{TEST_ADMIN, TEST_BUYER, make_details, make_order, orders_service},
    };

    use super::*;

    fn make_service(orders: MockOrdersService, identity: Identity) -> Service {
        orders_service(
            orders,
            identity,
            Router::with_path("orders/{order}/cancel").post(handler),
        )
    }

    fn cancelled(uuid: OrderUuid, buyer: BuyerUuid, refund_required: bool) -> CancelledOrder {
        let mut order = make_order(uuid, buyer);
        order.status = OrderStatus::Cancelled;
        order.payment_status = if refund_required {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Failed
        };
        order.cancellation_reason = Some("out of stock".to_string());

        CancelledOrder {
            order,
            refund_required,
        }
    }

    #[tokio::test]
    async fn test_admin_cancels_paid_order() -> TestResult {
        let uuid = OrderUuid::new();
        let result = cancelled(uuid, BuyerUuid::new(), true);

        let mut orders = MockOrdersService::new();

        orders.expect_get_order().never();
        orders
            .expect_cancel_order()
            .once()
            .withf(move |u, cancellation, _| *u == uuid && cancellation.reason == "out of stock")
            .return_once(move |_, _, _| Ok(result));

        let mut res = TestClient::post(format!("http://example.com/orders/{uuid}/cancel"))
            .json(&json!({ "reason": "out of stock" }))
            .send(&make_service(orders, TEST_ADMIN))
            .await;

        let body: CancelledOrderResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.refund_required);
        assert_eq!(body.order.status, "CANCELLED");
        assert_eq!(body.order.cancellation_reason.as_deref(), Some("out of stock"));

        Ok(())
    }

    #[tokio::test]
    async fn test_buyer_cancels_own_order() -> TestResult {
        let uuid = OrderUuid::new();
        let buyer = BuyerUuid::from_uuid(TEST_BUYER.uuid);
        let details = make_details(uuid, buyer);
        let result = cancelled(uuid, buyer, false);

        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .return_once(move |_| Ok(details));
        orders
            .expect_cancel_order()
            .once()
            .return_once(move |_, _, _| Ok(result));

        let mut res = TestClient::post(format!("http://example.com/orders/{uuid}/cancel"))
            .json(&json!({ "reason": "changed my mind" }))
            .send(&make_service(orders, TEST_BUYER))
            .await;

        let body: CancelledOrderResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(!body.refund_required);
        assert_eq!(body.order.payment_status, "FAILED");

        Ok(())
    }

    #[tokio::test]
    async fn test_buyer_cannot_cancel_foreign_order() {
        let uuid = OrderUuid::new();
        let details = make_details(uuid, BuyerUuid::new());

        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .return_once(move |_| Ok(details));
        orders.expect_cancel_order().never();

        let res = TestClient::post(format!("http://example.com/orders/{uuid}/cancel"))
            .json(&json!({ "reason": "prank" }))
            .send(&make_service(orders, TEST_BUYER))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_buyer_cannot_cancel_shipped_order() {
        let uuid = OrderUuid::new();
        let mut details = make_details(uuid, BuyerUuid::from_uuid(TEST_BUYER.uuid));
        details.order.status = OrderStatus::Shipped;
        details.order.payment_status = PaymentStatus::Paid;

        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .return_once(move |_| Ok(details));
        orders.expect_cancel_order().never();

        let res = TestClient::post(format!("http://example.com/orders/{uuid}/cancel"))
            .json(&json!({ "reason": "too slow" }))
            .send(&make_service(orders, TEST_BUYER))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));
    }

    #[tokio::test]
    async fn test_blank_reason_returns_400() {
        let mut orders = MockOrdersService::new();

        orders
            .expect_cancel_order()
            .once()
            .return_once(|_, _, _| Err(OrdersServiceError::MissingReason));

        let res = TestClient::post(format!(
            "http://example.com/orders/{}/cancel",
            OrderUuid::new()
        ))
        .json(&json!({ "reason": "   " }))
        .send(&make_service(orders, TEST_ADMIN))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }
}
