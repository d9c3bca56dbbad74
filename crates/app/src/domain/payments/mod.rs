//! Payments

pub mod data;
pub mod errors;
mod hook;
pub mod records;
mod repository;
pub mod service;
mod settlement;

pub use errors::PaymentsServiceError;
pub use hook::PaymentStatusHook;
pub(crate) use repository::{NewPayment, PgPaymentsRepository};
pub use service::*;
pub(crate) use settlement::PgSettlement;
