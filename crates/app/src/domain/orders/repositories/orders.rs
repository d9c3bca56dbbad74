//! Orders Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use grosir::{
    orders::{DeliveryType, OrderStatus, StatusTimestamps, pricing::OrderCharges},
    payments::{PaymentStatus, PaymentType},
};

use crate::{
    domain::{
        coupons::records::CouponUuid,
        orders::records::{OrderRecord, OrderUuid},
        parse_column,
    },
    identities::{AddressUuid, BuyerUuid},
};

const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const LOCK_ORDER_SQL: &str = include_str!("../sql/lock_order.sql");
const ORDER_CODE_EXISTS_SQL: &str = include_str!("../sql/order_code_exists.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("../sql/update_order_status.sql");
const UPDATE_PAYMENT_STATUS_SQL: &str = include_str!("../sql/update_payment_status.sql");
const DELETE_ORDER_SQL: &str = include_str!("../sql/delete_order.sql");
const LIST_OVERDUE_ORDERS_SQL: &str = include_str!("../sql/list_overdue_orders.sql");

/// Column values of a freshly priced order.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NewOrderRow<'a> {
    pub(crate) uuid: OrderUuid,
    pub(crate) code: &'a str,
    pub(crate) buyer: BuyerUuid,
    pub(crate) delivery: DeliveryType,
    pub(crate) address: Option<AddressUuid>,
    pub(crate) payment_type: PaymentType,
    pub(crate) coupon: Option<CouponUuid>,
    pub(crate) charges: OrderCharges,
    pub(crate) notes: Option<&'a str>,
    pub(crate) expires_at: Timestamp,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: NewOrderRow<'_>,
        at: Timestamp,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.code)
            .bind(order.buyer.into_uuid())
            .bind(order.delivery.as_str())
            .bind(order.address.map(AddressUuid::into_uuid))
            .bind(order.payment_type.as_str())
            .bind(order.coupon.map(CouponUuid::into_uuid))
            .bind(order.charges.product)
            .bind(order.charges.shipping)
            .bind(order.charges.tax)
            .bind(order.charges.other)
            .bind(order.charges.coupon_discount)
            .bind(order.charges.total())
            .bind(order.notes)
            .bind(SqlxTimestamp::from(order.expires_at))
            .bind(SqlxTimestamp::from(at))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Live order `order`, row-locked until the transaction ends.
    ///
    /// Every status change takes this lock before touching the order's payments.
    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LOCK_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn code_exists(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<bool, sqlx::Error> {
        let row = query(ORDER_CODE_EXISTS_SQL)
            .bind(code)
            .fetch_one(&mut **tx)
            .await?;

        row.try_get("code_exists")
    }

    /// Store a new order status. Timestamps already set are kept.
    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
        timestamps: &StatusTimestamps,
        cancellation_reason: Option<&str>,
        at: Timestamp,
    ) -> Result<OrderRecord, sqlx::Error> {
        let stamp = |value: Option<Timestamp>| value.map(SqlxTimestamp::from);

        query_as::<Postgres, OrderRecord>(UPDATE_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .bind(cancellation_reason)
            .bind(stamp(timestamps.processed_at))
            .bind(stamp(timestamps.ready_at))
            .bind(stamp(timestamps.shipped_at))
            .bind(stamp(timestamps.completed_at))
            .bind(stamp(timestamps.cancelled_at))
            .bind(SqlxTimestamp::from(at))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_payment_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: PaymentStatus,
        paid_at: Option<Timestamp>,
        at: Timestamp,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(UPDATE_PAYMENT_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .bind(paid_at.map(SqlxTimestamp::from))
            .bind(SqlxTimestamp::from(at))
            .fetch_one(&mut **tx)
            .await
    }

    /// Soft-delete, renaming the code so it can be issued again.
    pub(crate) async fn delete_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        tombstone: &str,
        deleted_at: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(tombstone)
            .bind(SqlxTimestamp::from(deleted_at))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Pending, unpaid orders whose payment deadline passed before `at`.
    pub(crate) async fn list_overdue(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        at: Timestamp,
    ) -> Result<Vec<OrderUuid>, sqlx::Error> {
        let rows = query(LIST_OVERDUE_ORDERS_SQL)
            .bind(SqlxTimestamp::from(at))
            .fetch_all(&mut **tx)
            .await?;

        rows.iter()
            .map(|row| row.try_get::<Uuid, _>("uuid").map(OrderUuid::from_uuid))
            .collect()
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let stamp = |column: &str| -> sqlx::Result<Option<Timestamp>> {
            Ok(row
                .try_get::<Option<SqlxTimestamp>, _>(column)?
                .map(SqlxTimestamp::to_jiff))
        };

        let charges = OrderCharges {
            product: row.try_get("biaya_produk")?,
            shipping: row.try_get("biaya_pengiriman")?,
            tax: row.try_get("biaya_ppn")?,
            other: row.try_get("biaya_lainnya")?,
            coupon_discount: row.try_get("diskon_kupon")?,
        };

        let timestamps = StatusTimestamps {
            paid_at: stamp("paid_at")?,
            processed_at: stamp("processed_at")?,
            ready_at: stamp("ready_at")?,
            shipped_at: stamp("shipped_at")?,
            completed_at: stamp("completed_at")?,
            cancelled_at: stamp("cancelled_at")?,
        };

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            code: row.try_get("kode")?,
            buyer: BuyerUuid::from_uuid(row.try_get("pembeli_uuid")?),
            delivery: parse_column(row, "jenis_pengiriman")?,
            address: row
                .try_get::<Option<Uuid>, _>("alamat_uuid")?
                .map(AddressUuid::from_uuid),
            payment_type: parse_column(row, "jenis_pembayaran")?,
            status: parse_column(row, "status_pesanan")?,
            payment_status: parse_column(row, "status_pembayaran")?,
            coupon: row
                .try_get::<Option<Uuid>, _>("kupon_uuid")?
                .map(CouponUuid::from_uuid),
            charges,
            total: row.try_get("total")?,
            notes: row.try_get("catatan")?,
            cancellation_reason: row.try_get("alasan_batal")?,
            expires_at: row.try_get::<SqlxTimestamp, _>("expired_at")?.to_jiff(),
            timestamps,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: stamp("deleted_at")?,
        })
    }
}
