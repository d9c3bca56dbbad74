//! List Order Payments Handler

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use grosir_app::domain::orders::records::OrderUuid;

use crate::{
    extensions::*,
    orders::errors::into_status_error as order_status_error,
    payments::{errors::into_status_error, responses::PaymentResponse},
};

/// List Order Payments Handler
///
/// Payment records of an order. Buyers only see payments of their own orders.
#[endpoint(
    tags("payments"),
    summary = "List Order Payments",
    security(("actor" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Payments of the order"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Vec<PaymentResponse>>, StatusError> {
    let state = depot.state_or_500()?;
    let identity = depot.identity_or_401()?;
    let order = OrderUuid::from_uuid(order.into_inner());

    let payments = if identity.is_admin() {
        state
            .app
            .payments
            .list_payments(order)
            .await
            .map_err(into_status_error)?
    } else {
        let details = state
            .app
            .orders
            .get_order(order)
            .await
            .map_err(order_status_error)?;

        if !identity.can_access(details.order.buyer) {
            return Err(StatusError::not_found().brief("Order not found"));
        }

        details.payments
    };

    Ok(Json(payments.into_iter().map(Into::into).collect()))
}
