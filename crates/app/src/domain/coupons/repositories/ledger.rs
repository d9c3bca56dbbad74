//! Coupon Ledger
//!
//! Redemptions are appended here in the same transaction as the order that used them; the
//! usage count is always read from this table rather than kept as a counter on the coupon.

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    domain::{
        coupons::records::{CouponUsageRecord, CouponUsageUuid, CouponUuid},
        orders::records::OrderUuid,
        try_u64_from_i64,
    },
    identities::BuyerUuid,
};

const COUNT_USAGES_SQL: &str = include_str!("../sql/count_usages.sql");
const CREATE_USAGE_SQL: &str = include_str!("../sql/create_usage.sql");
const LIST_USAGES_SQL: &str = include_str!("../sql/list_usages.sql");

#[derive(Debug, Clone)]
pub(crate) struct NewCouponUsage<'a> {
    pub(crate) coupon: CouponUuid,
    pub(crate) order: OrderUuid,
    pub(crate) buyer: BuyerUuid,
    pub(crate) code: &'a str,
    pub(crate) discount: Decimal,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCouponLedger;

impl PgCouponLedger {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn usage_count(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
    ) -> Result<u64, sqlx::Error> {
        let row = query(COUNT_USAGES_SQL)
            .bind(coupon.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        try_u64_from_i64(row.try_get("usage_count")?, "usage_count")
    }

    pub(crate) async fn redeem(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        usage: NewCouponUsage<'_>,
    ) -> Result<CouponUsageRecord, sqlx::Error> {
        query_as::<Postgres, CouponUsageRecord>(CREATE_USAGE_SQL)
            .bind(CouponUsageUuid::new().into_uuid())
            .bind(usage.coupon.into_uuid())
            .bind(usage.order.into_uuid())
            .bind(usage.buyer.into_uuid())
            .bind(usage.code)
            .bind(usage.discount)
            .fetch_one(&mut **tx)
            .await
    }

    /// Redemptions of `coupon`, newest first.
    pub(crate) async fn list_usages(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
    ) -> Result<Vec<CouponUsageRecord>, sqlx::Error> {
        query_as::<Postgres, CouponUsageRecord>(LIST_USAGES_SQL)
            .bind(coupon.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for CouponUsageRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CouponUsageUuid::from_uuid(row.try_get("uuid")?),
            coupon: CouponUuid::from_uuid(row.try_get("kupon_uuid")?),
            order: OrderUuid::from_uuid(row.try_get("pesanan_uuid")?),
            buyer: BuyerUuid::from_uuid(row.try_get("pembeli_uuid")?),
            code: row.try_get("kode")?,
            discount: row.try_get("jumlah_diskon")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
