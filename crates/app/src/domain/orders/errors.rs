//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use grosir::{
    coupons::CouponRejection,
    orders::{TransitionError, pricing::PricingError},
    payments::split::SplitError,
};

use crate::domain::coupons::CouponsServiceError;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order already exists")]
    AlreadyExists,

    #[error("order not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("order has no items")]
    EmptyOrder,

    #[error("product appears on more than one line")]
    DuplicateProduct,

    #[error("unknown product")]
    UnknownProduct,

    #[error("delivery type requires an address")]
    MissingAddress,

    #[error("cancellation requires a reason")]
    MissingReason,

    #[error("order has not been paid")]
    PaymentOutstanding,

    #[error("only completed or cancelled orders can be deleted")]
    NotDeletable,

    #[error("coupon not found")]
    CouponNotFound,

    #[error(transparent)]
    CouponRejected(#[from] CouponRejection),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Split(#[from] SplitError),

    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    #[error("timestamp out of range")]
    Clock(#[source] jiff::Error),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}

impl From<CouponsServiceError> for OrdersServiceError {
    fn from(error: CouponsServiceError) -> Self {
        match error {
            CouponsServiceError::NotFound => Self::CouponNotFound,
            CouponsServiceError::Rejected(rejection) => Self::CouponRejected(rejection),
            CouponsServiceError::Sql(error) => Self::Sql(error),
            CouponsServiceError::AlreadyExists
            | CouponsServiceError::InvalidReference
            | CouponsServiceError::MissingRequiredData
            | CouponsServiceError::InvalidData
            | CouponsServiceError::Definition(_) => Self::InvalidData,
        }
    }
}
