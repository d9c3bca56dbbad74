//! Coupons

pub mod data;
pub mod errors;
pub mod records;
mod repositories;
pub mod service;
mod validator;

pub use errors::CouponsServiceError;
pub(crate) use repositories::{NewCouponUsage, PgCouponLedger};
pub use service::*;
pub(crate) use validator::{CouponCheck, PgCouponValidator, RowLock};
