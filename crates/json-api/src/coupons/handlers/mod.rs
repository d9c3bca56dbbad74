//! Coupon Handlers

pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod update;
pub(crate) mod usages;
pub(crate) mod validate;
