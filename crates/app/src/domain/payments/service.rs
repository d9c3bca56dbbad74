//! Payments Service

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{Span, info, warn};

use grosir::{orders::OrderStatus, payments::PaymentStatus};

use crate::{
    database::Db,
    domain::{
        orders::{PgOrderLifecycle, PgOrdersRepository, records::OrderUuid},
        payments::{
            PaymentsServiceError, PgPaymentsRepository, PgSettlement,
            data::{GatewayCallback, PaymentRefund},
            records::{CallbackOutcome, PaymentRecord, PaymentUuid},
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgPaymentsService {
    db: Db,
    orders: PgOrdersRepository,
    payments: PgPaymentsRepository,
    settlement: PgSettlement<PgOrderLifecycle>,
}

impl PgPaymentsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders: PgOrdersRepository::new(),
            payments: PgPaymentsRepository::new(),
            settlement: PgSettlement::new(PgOrderLifecycle::new()),
        }
    }
}

#[async_trait]
impl PaymentsService for PgPaymentsService {
    #[tracing::instrument(
        name = "payments.service.record_gateway_callback",
        skip(self, callback),
        fields(
            external_id = %callback.external_id,
            status = %callback.status,
            order_uuid = tracing::field::Empty,
            replayed = tracing::field::Empty
        ),
        err
    )]
    async fn record_gateway_callback(
        &self,
        callback: GatewayCallback,
        at: Timestamp,
    ) -> Result<CallbackOutcome, PaymentsServiceError> {
        let mut tx = self.db.begin().await?;

        let Some(found) = self
            .payments
            .find_by_external_id(&mut tx, &callback.external_id)
            .await?
        else {
            warn!(
                external_id = %callback.external_id,
                status = %callback.status,
                "callback for unknown payment; needs manual reconciliation"
            );

            return Err(PaymentsServiceError::NotFound);
        };

        let span = Span::current();

        span.record("order_uuid", tracing::field::display(found.order));

        let order = self.orders.lock_order(&mut tx, found.order).await?;
        let payment = self.payments.lock_payment(&mut tx, found.uuid).await?;

        if payment.status == callback.status {
            tx.commit().await?;

            span.record("replayed", true);

            info!(payment_uuid = %payment.uuid, "ignored repeated callback");

            return Ok(CallbackOutcome {
                payment,
                order_payment_status: order.payment_status,
                replayed: true,
            });
        }

        let status = payment
            .status
            .transition_to(callback.status, order.status == OrderStatus::Cancelled)
            .inspect_err(|error| {
                warn!(payment_uuid = %payment.uuid, %error, "refused gateway callback");
            })?;

        let payment = self
            .payments
            .update_payment(
                &mut tx,
                payment.uuid,
                status,
                callback.gateway_reference.as_deref(),
                at,
            )
            .await?;

        let order_payment_status = self
            .settlement
            .recompute(&mut tx, &order, None, Some("gateway callback"), at)
            .await?;

        tx.commit().await?;

        span.record("replayed", false);

        info!(
            payment_uuid = %payment.uuid,
            status = %payment.status,
            %order_payment_status,
            "recorded gateway callback"
        );

        Ok(CallbackOutcome {
            payment,
            order_payment_status,
            replayed: false,
        })
    }

    #[tracing::instrument(
        name = "payments.service.refund_payment",
        skip(self, refund),
        fields(payment_uuid = %payment),
        err
    )]
    async fn refund_payment(
        &self,
        payment: PaymentUuid,
        refund: PaymentRefund,
        at: Timestamp,
    ) -> Result<PaymentRecord, PaymentsServiceError> {
        let mut tx = self.db.begin().await?;

        let found = self.payments.get_payment(&mut tx, payment).await?;

        let order = self.orders.lock_order(&mut tx, found.order).await?;
        let current = self.payments.lock_payment(&mut tx, payment).await?;

        let status = current.status.transition_to(
            PaymentStatus::Refunded,
            order.status == OrderStatus::Cancelled,
        )?;

        let refunded = self
            .payments
            .update_payment(&mut tx, payment, status, None, at)
            .await?;

        self.settlement
            .recompute(
                &mut tx,
                &order,
                refund.actor,
                Some(refund.note.as_deref().unwrap_or("refund")),
                at,
            )
            .await?;

        tx.commit().await?;

        info!(
            payment_uuid = %payment,
            order_uuid = %order.uuid,
            amount = %refunded.amount,
            "refunded payment"
        );

        Ok(refunded)
    }

    async fn list_payments(
        &self,
        order: OrderUuid,
    ) -> Result<Vec<PaymentRecord>, PaymentsServiceError> {
        let mut tx = self.db.begin().await?;

        self.orders.get_order(&mut tx, order).await?;

        let payments = self.payments.list_payments(&mut tx, order).await?;

        tx.commit().await?;

        Ok(payments)
    }
}

#[automock]
#[async_trait]
pub trait PaymentsService: Send + Sync {
    /// Apply a status reported by the payment gateway. Repeats of the current status are
    /// acknowledged without changing anything.
    async fn record_gateway_callback(
        &self,
        callback: GatewayCallback,
        at: Timestamp,
    ) -> Result<CallbackOutcome, PaymentsServiceError>;

    /// Mark a received payment of a cancelled order as refunded.
    async fn refund_payment(
        &self,
        payment: PaymentUuid,
        refund: PaymentRefund,
        at: Timestamp,
    ) -> Result<PaymentRecord, PaymentsServiceError>;

    /// Payments of an order.
    async fn list_payments(&self, order: OrderUuid)
    -> Result<Vec<PaymentRecord>, PaymentsServiceError>;
}
