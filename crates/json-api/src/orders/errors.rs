//! Order Errors

use salvo::http::StatusError;
use tracing::error;

use grosir_app::domain::orders::OrdersServiceError;

use crate::coupons::errors::rejection_status;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::AlreadyExists => StatusError::conflict().brief("Order already exists"),
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::CouponNotFound => StatusError::not_found().brief("Coupon not found"),
        OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        OrdersServiceError::EmptyOrder
        | OrdersServiceError::DuplicateProduct
        | OrdersServiceError::UnknownProduct
        | OrdersServiceError::MissingAddress
        | OrdersServiceError::MissingReason
        | OrdersServiceError::Pricing(_)
        | OrdersServiceError::Split(_) => StatusError::bad_request().brief(error.to_string()),
        OrdersServiceError::InvalidTransition(_)
        | OrdersServiceError::PaymentOutstanding
        | OrdersServiceError::NotDeletable => StatusError::conflict().brief(error.to_string()),
        OrdersServiceError::CouponRejected(rejection) => rejection_status(rejection),
        OrdersServiceError::Clock(source) => {
            error!("order timestamp out of range: {source}");

            StatusError::internal_server_error()
        }
        OrdersServiceError::Sql(source) => {
            error!("failed to process order: {source}");

            StatusError::internal_server_error()
        }
    }
}
