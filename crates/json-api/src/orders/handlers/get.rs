//! Get Order Handler

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, responses::OrderDetailsResponse},
};

/// Get Order Handler
///
/// Returns an order with its items and payments. Buyers only see their own orders.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    security(("actor" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order found"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderDetailsResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let identity = depot.identity_or_401()?;

    let details = state
        .app
        .orders
        .get_order(order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    if !identity.can_access(details.order.buyer) {
        return Err(StatusError::not_found().brief("Order not found"));
    }

    Ok(Json(details.into()))
}
