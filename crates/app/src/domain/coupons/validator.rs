//! Coupon Validator

use jiff::Zoned;
use rust_decimal::Decimal;
use sqlx::{Postgres, Transaction};
use tracing::debug;

use grosir::coupons::normalise_code;

use crate::{
    domain::{
        catalog::records::CategoryUuid,
        coupons::{
            errors::CouponsServiceError,
            records::CouponRecord,
            repositories::{PgCouponLedger, PgCouponsRepository},
        },
    },
    identities::BuyerUuid,
};

/// Whether the coupon row stays locked for the rest of the transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RowLock {
    /// Redemption follows; concurrent validations of the same code wait.
    ForUpdate,

    /// Read-only preview.
    None,
}

/// A candidate order as the validator sees it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CouponCheck<'a> {
    pub(crate) code: &'a str,
    pub(crate) buyer: BuyerUuid,
    pub(crate) total: Decimal,
    pub(crate) categories: &'a [CategoryUuid],
    pub(crate) now: &'a Zoned,
}

#[derive(Debug, Clone)]
pub(crate) struct ValidatedCoupon {
    pub(crate) coupon: CouponRecord,
    pub(crate) discount: Decimal,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCouponValidator {
    coupons: PgCouponsRepository,
    ledger: PgCouponLedger,
}

impl PgCouponValidator {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            coupons: PgCouponsRepository::new(),
            ledger: PgCouponLedger::new(),
        }
    }

    pub(crate) async fn validate(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        check: CouponCheck<'_>,
        lock: RowLock,
    ) -> Result<ValidatedCoupon, CouponsServiceError> {
        let code = normalise_code(check.code).map_err(|_| CouponsServiceError::NotFound)?;

        let coupon = match lock {
            RowLock::ForUpdate => self.coupons.lock_by_code(tx, &code).await?,
            RowLock::None => self.coupons.find_by_code(tx, &code).await?,
        }
        .ok_or(CouponsServiceError::NotFound)?;

        let usage_count = self.ledger.usage_count(tx, coupon.uuid).await?;

        let discount = coupon.terms.rule().evaluate(
            usage_count,
            check.total,
            check.categories,
            check.now,
        )?;

        debug!(
            coupon_uuid = %coupon.uuid,
            buyer_uuid = %check.buyer,
            usage_count,
            %discount,
            "coupon accepted"
        );

        Ok(ValidatedCoupon { coupon, discount })
    }
}
