//! Grosir
//!
//! Order lifecycle, payment settlement and coupon rules for a wholesale marketplace. This crate
//! holds the pure domain logic; persistence and transport live in `grosir-app` and `grosir-json`.

pub mod categories;
pub mod codes;
pub mod coupons;
pub mod discounts;
pub mod money;
pub mod orders;
pub mod payments;
pub mod values;
