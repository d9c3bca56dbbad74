//! Refund Payment Handler

use jiff::Timestamp;
use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    extensions::*,
    payments::{
        errors::into_status_error, requests::RefundPaymentRequest, responses::PaymentResponse,
    },
};

/// Refund Payment Handler
///
/// Records that money received for a cancelled order was returned.
#[endpoint(
    tags("payments"),
    summary = "Refund Payment",
    security(("actor" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Payment refunded"),
        (status_code = StatusCode::FORBIDDEN, description = "Administrator role required"),
        (status_code = StatusCode::NOT_FOUND, description = "Payment not found"),
        (status_code = StatusCode::CONFLICT, description = "Payment cannot be refunded"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    payment: PathParam<Uuid>,
    json: JsonBody<RefundPaymentRequest>,
    depot: &mut Depot,
) -> Result<Json<PaymentResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let identity = depot.admin_or_403()?;

    let refunded = state
        .app
        .payments
        .refund_payment(
            payment.into_inner().into(),
            json.into_inner().into_refund(identity.actor()),
            Timestamp::now(),
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(refunded.into()))
}
