//! Transition Order Handler

use jiff::Timestamp;
use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{
        errors::into_status_error, requests::TransitionOrderRequest, responses::OrderResponse,
    },
};

/// Transition Order Handler
///
/// Moves an order one step along its lifecycle. Cancelling requires a note, used as the reason.
#[endpoint(
    tags("orders"),
    summary = "Transition Order",
    security(("actor" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order moved"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown status or missing reason"),
        (status_code = StatusCode::FORBIDDEN, description = "Administrator role required"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Transition not allowed"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<TransitionOrderRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let identity = depot.admin_or_403()?;

    let transition = json.into_inner().into_transition(identity.actor())?;

    let order = state
        .app
        .orders
        .transition_order(order.into_inner().into(), transition, Timestamp::now())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}
