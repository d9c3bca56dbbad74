//! Coupon Errors

use salvo::http::StatusError;
use tracing::error;

use grosir::coupons::CouponRejection;
use grosir_app::domain::coupons::CouponsServiceError;

use crate::observability::observe_coupon_rejection;

/// A used-up coupon conflicts with existing redemptions; every other rejection is about the
/// order it was tried on.
pub(crate) fn rejection_status(rejection: CouponRejection) -> StatusError {
    observe_coupon_rejection(rejection_reason(rejection));

    match rejection {
        CouponRejection::LimitReached => StatusError::conflict().brief(rejection.to_string()),
        CouponRejection::Inactive
        | CouponRejection::Expired
        | CouponRejection::BelowMinimum
        | CouponRejection::CategoryNotAllowed => {
            StatusError::unprocessable_entity().brief(rejection.to_string())
        }
    }
}

fn rejection_reason(rejection: CouponRejection) -> &'static str {
    match rejection {
        CouponRejection::Inactive => "inactive",
        CouponRejection::Expired => "expired",
        CouponRejection::LimitReached => "limit_reached",
        CouponRejection::BelowMinimum => "below_minimum",
        CouponRejection::CategoryNotAllowed => "category_not_allowed",
    }
}

pub(crate) fn into_status_error(error: CouponsServiceError) -> StatusError {
    match error {
        CouponsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Coupon code already exists")
        }
        CouponsServiceError::NotFound => StatusError::not_found().brief("Coupon not found"),
        CouponsServiceError::InvalidReference => {
            StatusError::bad_request().brief("Unknown category")
        }
        CouponsServiceError::MissingRequiredData | CouponsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid coupon payload")
        }
        CouponsServiceError::Definition(_) => StatusError::bad_request().brief(error.to_string()),
        CouponsServiceError::Rejected(rejection) => rejection_status(rejection),
        CouponsServiceError::Sql(source) => {
            error!("failed to process coupon: {source}");

            StatusError::internal_server_error()
        }
    }
}
