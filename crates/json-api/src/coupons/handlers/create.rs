//! Create Coupon Handler

use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};

use grosir_app::domain::coupons::data::NewCoupon;

use crate::{
    coupons::{errors::into_status_error, requests::CreateCouponRequest, responses::CouponResponse},
    extensions::*,
};

/// Create Coupon Handler
#[endpoint(
    tags("coupons"),
    summary = "Create Coupon",
    security(("actor" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Coupon created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid coupon"),
        (status_code = StatusCode::FORBIDDEN, description = "Administrator role required"),
        (status_code = StatusCode::CONFLICT, description = "Code already in use"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateCouponRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CouponResponse>, StatusError> {
    let state = depot.state_or_500()?;

    depot.admin_or_403()?;

    let coupon = NewCoupon::try_from(json.into_inner())?;

    let created = state
        .app
        .coupons
        .create_coupon(coupon)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/coupons/{}", created.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(created.into()))
}
