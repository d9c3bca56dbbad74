//! Payment Errors

use salvo::http::StatusError;
use tracing::error;

use grosir_app::domain::payments::PaymentsServiceError;

pub(crate) fn into_status_error(error: PaymentsServiceError) -> StatusError {
    match error {
        PaymentsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Payment already exists")
        }
        PaymentsServiceError::NotFound => StatusError::not_found().brief("Payment not found"),
        PaymentsServiceError::InvalidReference
        | PaymentsServiceError::MissingRequiredData
        | PaymentsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid payment payload")
        }
        PaymentsServiceError::InvalidTransition(_) => {
            StatusError::conflict().brief(error.to_string())
        }
        PaymentsServiceError::Sql(source) => {
            error!("failed to process payment: {source}");

            StatusError::internal_server_error()
        }
    }
}
