//! Coupon Repositories

mod coupons;
mod ledger;

pub(crate) use coupons::PgCouponsRepository;
pub(crate) use ledger::{NewCouponUsage, PgCouponLedger};
