//! Payments Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use grosir::payments::PaymentStatus;

use crate::{
    domain::{
        orders::records::OrderUuid,
        parse_column,
        payments::records::{PaymentRecord, PaymentUuid},
    },
    identities::BuyerUuid,
};

const CREATE_PAYMENT_SQL: &str = include_str!("sql/create_payment.sql");
const GET_PAYMENT_SQL: &str = include_str!("sql/get_payment.sql");
const FIND_PAYMENT_BY_EXTERNAL_ID_SQL: &str = include_str!("sql/find_payment_by_external_id.sql");
const LOCK_PAYMENT_SQL: &str = include_str!("sql/lock_payment.sql");
const LIST_PAYMENTS_SQL: &str = include_str!("sql/list_payments.sql");
const UPDATE_PAYMENT_SQL: &str = include_str!("sql/update_payment.sql");
const CLOSE_PENDING_PAYMENTS_SQL: &str = include_str!("sql/close_pending_payments.sql");

/// A payment to open alongside a new order.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NewPayment<'a> {
    pub(crate) order: OrderUuid,
    pub(crate) payer: BuyerUuid,
    pub(crate) amount: Decimal,
    pub(crate) external_id: &'a str,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPaymentsRepository;

impl PgPaymentsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment: NewPayment<'_>,
        at: Timestamp,
    ) -> Result<PaymentRecord, sqlx::Error> {
        query_as::<Postgres, PaymentRecord>(CREATE_PAYMENT_SQL)
            .bind(PaymentUuid::new().into_uuid())
            .bind(payment.order.into_uuid())
            .bind(payment.payer.into_uuid())
            .bind(payment.amount)
            .bind(payment.external_id)
            .bind(SqlxTimestamp::from(at))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment: PaymentUuid,
    ) -> Result<PaymentRecord, sqlx::Error> {
        query_as::<Postgres, PaymentRecord>(GET_PAYMENT_SQL)
            .bind(payment.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_by_external_id(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        external_id: &str,
    ) -> Result<Option<PaymentRecord>, sqlx::Error> {
        query_as::<Postgres, PaymentRecord>(FIND_PAYMENT_BY_EXTERNAL_ID_SQL)
            .bind(external_id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Callers lock the owning order first.
    pub(crate) async fn lock_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment: PaymentUuid,
    ) -> Result<PaymentRecord, sqlx::Error> {
        query_as::<Postgres, PaymentRecord>(LOCK_PAYMENT_SQL)
            .bind(payment.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_payments(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<PaymentRecord>, sqlx::Error> {
        query_as::<Postgres, PaymentRecord>(LIST_PAYMENTS_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Set a payment's status. `paid_at` and the gateway reference are only ever filled in.
    pub(crate) async fn update_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment: PaymentUuid,
        status: PaymentStatus,
        gateway_reference: Option<&str>,
        at: Timestamp,
    ) -> Result<PaymentRecord, sqlx::Error> {
        let paid_at = status.has_funds().then_some(SqlxTimestamp::from(at));

        query_as::<Postgres, PaymentRecord>(UPDATE_PAYMENT_SQL)
            .bind(payment.into_uuid())
            .bind(status.as_str())
            .bind(gateway_reference)
            .bind(paid_at)
            .bind(SqlxTimestamp::from(at))
            .fetch_one(&mut **tx)
            .await
    }

    /// Move every still-pending payment of `order` to `status`.
    pub(crate) async fn close_pending(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: PaymentStatus,
        at: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CLOSE_PENDING_PAYMENTS_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .bind(SqlxTimestamp::from(at))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for PaymentRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: PaymentUuid::from_uuid(row.try_get("uuid")?),
            order: OrderUuid::from_uuid(row.try_get("pesanan_uuid")?),
            payer: BuyerUuid::from_uuid(row.try_get("pembayar_uuid")?),
            amount: row.try_get("jumlah")?,
            status: parse_column(row, "status")?,
            external_id: row.try_get("external_id")?,
            gateway_reference: row.try_get("gateway_reference")?,
            paid_at: row
                .try_get::<Option<SqlxTimestamp>, _>("paid_at")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
