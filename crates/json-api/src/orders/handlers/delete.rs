//! Delete Order Handler

use jiff::Timestamp;
use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, orders::errors::into_status_error};

/// Delete Order Handler
///
/// Soft-deletes a completed or cancelled order.
#[endpoint(
    tags("orders"),
    summary = "Delete Order",
    security(("actor" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Order deleted"),
        (status_code = StatusCode::FORBIDDEN, description = "Administrator role required"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Order still in progress"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.state_or_500()?;

    depot.admin_or_403()?;

    state
        .app
        .orders
        .delete_order(order.into_inner().into(), Timestamp::now())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}
