//! Gateway Callback Handler

use jiff::Timestamp;
use salvo::{oapi::extract::JsonBody, prelude::*};

use grosir_app::domain::payments::data::GatewayCallback;

use crate::{
    extensions::*,
    payments::{
        errors::into_status_error, requests::GatewayCallbackRequest, responses::CallbackResponse,
    },
};

/// Gateway Callback Handler
///
/// Receives payment status reports from the payment gateway, which authenticates with the
/// `x-callback-token` header. Repeated reports of the current status are acknowledged with
/// `replayed` set and change nothing.
#[endpoint(
    tags("payments"),
    summary = "Payment Gateway Callback",
    security(("gateway" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Callback recorded"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid callback"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing or invalid callback token"),
        (status_code = StatusCode::NOT_FOUND, description = "Unknown payment reference"),
        (status_code = StatusCode::CONFLICT, description = "Status change not allowed"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<GatewayCallbackRequest>,
    depot: &mut Depot,
) -> Result<Json<CallbackResponse>, StatusError> {
    let state = depot.state_or_500()?;

    let callback = GatewayCallback::try_from(json.into_inner())?;

    let outcome = state
        .app
        .payments
        .record_gateway_callback(callback, Timestamp::now())
        .await
        .map_err(into_status_error)?;

    Ok(Json(outcome.into()))
}
