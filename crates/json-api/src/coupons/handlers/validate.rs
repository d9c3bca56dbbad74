//! Validate Coupon Handler

use salvo::{
    oapi::extract::{JsonBody, QueryParam},
    prelude::*,
};

use crate::{
    coupons::{
        errors::into_status_error, requests::ValidateCouponRequest,
        responses::CouponQuoteResponse,
    },
    extensions::*,
};

/// Validate Coupon Handler
///
/// Checks a code against a prospective order for the calling buyer and returns the discount
/// it would give. Nothing is redeemed.
#[endpoint(
    tags("coupons"),
    summary = "Validate Coupon",
    security(("actor" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Coupon applies"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid request"),
        (status_code = StatusCode::NOT_FOUND, description = "Coupon not found"),
        (status_code = StatusCode::CONFLICT, description = "Usage limit reached"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Coupon not applicable"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ValidateCouponRequest>,
    at: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<CouponQuoteResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let identity = depot.identity_or_401()?;
    let at = at.into_point_in_time()?;

    let quote = state
        .app
        .coupons
        .validate_coupon(json.into_inner().into_preview(identity.buyer()), at)
        .await
        .map_err(into_status_error)?;

    Ok(Json(quote.into()))
}
