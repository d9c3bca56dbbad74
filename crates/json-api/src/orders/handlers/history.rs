//! Order History Handler

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use grosir_app::domain::orders::records::OrderUuid;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, responses::HistoryEntryResponse},
};

/// Order History Handler
///
/// Order and payment status changes, newest first.
#[endpoint(
    tags("orders"),
    summary = "Order Status History",
    security(("actor" = [])),
    responses(
        (status_code = StatusCode::OK, description = "History entries"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Vec<HistoryEntryResponse>>, StatusError> {
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
    }

    let history = state
        .app
        .orders
        .list_history(order)
        .await
        .map_err(into_status_error)?;

    Ok(Json(history.into_iter().map(Into::into).collect()))
}
