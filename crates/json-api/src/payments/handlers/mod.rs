//! Payment Handlers

pub(crate) mod callback;
pub(crate) mod index;
pub(crate) mod refund;
