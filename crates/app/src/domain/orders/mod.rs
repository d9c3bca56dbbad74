//! Orders

mod builder;
mod codes;
pub mod data;
pub mod errors;
mod lifecycle;
pub mod records;
mod repositories;
pub mod service;

pub use errors::OrdersServiceError;
pub(crate) use lifecycle::PgOrderLifecycle;
pub(crate) use repositories::PgOrdersRepository;
pub use service::*;
