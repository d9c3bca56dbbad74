//! Create Order Handler

use jiff::Timestamp;
use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};

use crate::{
    extensions::*,
    orders::{
        errors::into_status_error, requests::CreateOrderRequest, responses::OrderDetailsResponse,
    },
};

/// Create Order Handler
///
/// Places an order for the calling buyer, redeeming its coupon and opening its payments.
#[endpoint(
    tags("orders"),
    summary = "Create Order",
    security(("actor" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid order"),
        (status_code = StatusCode::NOT_FOUND, description = "Coupon not found"),
        (status_code = StatusCode::CONFLICT, description = "Order exists or coupon used up"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Coupon not applicable"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderDetailsResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let identity = depot.identity_or_401()?;

    let order = json.into_inner().into_new_order(identity.buyer())?;

    let details = state
        .app
        .orders
        .create_order(order, Timestamp::now())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/orders/{}", details.order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(details.into()))
}
