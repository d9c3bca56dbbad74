//! List Coupons Handler

use salvo::prelude::*;

use crate::{
    coupons::{errors::into_status_error, responses::CouponResponse},
    extensions::*,
};

/// List Coupons Handler
///
/// Live coupons, newest first.
#[endpoint(
    tags("coupons"),
    summary = "List Coupons",
    security(("actor" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Coupons"),
        (status_code = StatusCode::FORBIDDEN, description = "Administrator role required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Vec<CouponResponse>>, StatusError> {
    let state = depot.state_or_500()?;

    depot.admin_or_403()?;

    let coupons = state
        .app
        .coupons
        .list_coupons()
        .await
        .map_err(into_status_error)?;

    Ok(Json(coupons.into_iter().map(Into::into).collect()))
}
