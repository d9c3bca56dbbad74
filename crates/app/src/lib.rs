//! Persistence and services for orders, payments and coupons.

pub mod context;
pub mod database;
pub mod domain;
pub mod identities;
pub mod settings;

#[cfg(test)]
mod test;

mod uuids;

pub use uuids::TypedUuid;
