//! Payment Settlement
//!
//! Keeps `pesanan.status_pembayaran` equal to the aggregate of the order's payment records.
//! Callers hold the order row lock; every change of the aggregate is written to the status
//! history and handed to the [`PaymentStatusHook`] in the same transaction.

use jiff::Timestamp;
use sqlx::{Postgres, Transaction};
use tracing::info;

use grosir::payments::{PaymentStatus, aggregate};

use crate::{
    domain::{
        history::{NewHistoryEntry, PgHistoryRepository, records::HistoryKind},
        orders::{PgOrdersRepository, records::OrderRecord},
        payments::{PaymentStatusHook, PgPaymentsRepository},
    },
    identities::ActorUuid,
};

#[derive(Debug, Clone)]
pub(crate) struct PgSettlement<H> {
    orders: PgOrdersRepository,
    payments: PgPaymentsRepository,
    history: PgHistoryRepository,
    hook: H,
}

impl<H: PaymentStatusHook> PgSettlement<H> {
    #[must_use]
    pub(crate) fn new(hook: H) -> Self {
        Self {
            orders: PgOrdersRepository::new(),
            payments: PgPaymentsRepository::new(),
            history: PgHistoryRepository::new(),
            hook,
        }
    }

    /// Re-derive the order's payment status from its payment records.
    pub(crate) async fn recompute(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &OrderRecord,
        actor: Option<ActorUuid>,
        note: Option<&str>,
        at: Timestamp,
    ) -> Result<PaymentStatus, sqlx::Error> {
        let payments = self.payments.list_payments(tx, order.uuid).await?;

        let aggregated = aggregate(payments.iter().map(|payment| payment.status));

        self.apply(tx, order, aggregated, actor, note, at).await
    }

    /// Store `status` as the order's payment status. A no-op when nothing changes.
    pub(crate) async fn apply(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &OrderRecord,
        status: PaymentStatus,
        actor: Option<ActorUuid>,
        note: Option<&str>,
        at: Timestamp,
    ) -> Result<PaymentStatus, sqlx::Error> {
        let previous = order.payment_status;

        if status == previous {
            return Ok(status);
        }

        let paid_at = (status == PaymentStatus::Paid).then_some(at);

        self.orders
            .update_payment_status(tx, order.uuid, status, paid_at, at)
            .await?;

        self.history
            .record(
                tx,
                NewHistoryEntry {
                    order: order.uuid,
                    kind: HistoryKind::Payment,
                    from_status: Some(previous.as_str()),
                    to_status: status.as_str(),
                    actor,
                    note,
                },
            )
            .await?;

        info!(
            order_uuid = %order.uuid,
            from = %previous,
            to = %status,
            "order payment status changed"
        );

        self.hook
            .on_payment_status_changed(tx, order.uuid, previous, status, at)
            .await?;

        Ok(status)
    }
}
