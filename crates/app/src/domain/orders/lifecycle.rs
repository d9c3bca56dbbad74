//! Order State Machine

use async_trait::async_trait;
use jiff::Timestamp;
use sqlx::{Postgres, Transaction};
use tracing::info;

use grosir::{orders::OrderStatus, payments::PaymentStatus};

use crate::{
    domain::{
        history::{NewHistoryEntry, PgHistoryRepository, records::HistoryKind},
        orders::{
            OrdersServiceError, PgOrdersRepository,
            records::{OrderRecord, OrderUuid},
        },
        payments::PaymentStatusHook,
    },
    identities::ActorUuid,
};

/// A requested move of `order_status`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StatusChange<'a> {
    pub(crate) target: OrderStatus,
    pub(crate) actor: Option<ActorUuid>,
    pub(crate) note: Option<&'a str>,
    pub(crate) cancellation_reason: Option<&'a str>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderLifecycle {
    orders: PgOrdersRepository,
    history: PgHistoryRepository,
}

impl PgOrderLifecycle {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            orders: PgOrdersRepository::new(),
            history: PgHistoryRepository::new(),
        }
    }

    /// Move a locked order to `change.target`, stamping the entry time and recording history.
    pub(crate) async fn transition(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &OrderRecord,
        change: StatusChange<'_>,
        at: Timestamp,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let target = order.status.transition_to(change.target)?;

        if target == OrderStatus::Cancelled
            && change
                .cancellation_reason
                .is_none_or(|reason| reason.trim().is_empty())
        {
            return Err(OrdersServiceError::MissingReason);
        }

        Ok(self.apply(tx, order, change, at).await?)
    }

    async fn apply(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &OrderRecord,
        change: StatusChange<'_>,
        at: Timestamp,
    ) -> Result<OrderRecord, sqlx::Error> {
        let mut timestamps = order.timestamps;

        timestamps.stamp(change.target, at);

        let updated = self
            .orders
            .update_status(
                tx,
                order.uuid,
                change.target,
                &timestamps,
                change.cancellation_reason,
                at,
            )
            .await?;

        self.history
            .record(
                tx,
                NewHistoryEntry {
                    order: order.uuid,
                    kind: HistoryKind::Order,
                    from_status: Some(order.status.as_str()),
                    to_status: change.target.as_str(),
                    actor: change.actor,
                    note: change.note,
                },
            )
            .await?;

        info!(
            order_uuid = %order.uuid,
            from = %order.status,
            to = %change.target,
            "order status changed"
        );

        Ok(updated)
    }
}

#[async_trait]
impl PaymentStatusHook for PgOrderLifecycle {
    async fn on_payment_status_changed(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        _from: PaymentStatus,
        to: PaymentStatus,
        at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        if to != PaymentStatus::Paid {
            return Ok(());
        }

        let record = self.orders.lock_order(tx, order).await?;

        if record.status != OrderStatus::Pending {
            return Ok(());
        }

        self.apply(
            tx,
            &record,
            StatusChange {
                target: OrderStatus::Processing,
                actor: None,
                note: Some("payment settled"),
                cancellation_reason: None,
            },
            at,
        )
        .await?;

        Ok(())
    }
}
