//! Orders Service

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{Span, info, warn};

use grosir::{codes::tombstone, orders::OrderStatus, payments::PaymentStatus};

use crate::{
    database::Db,
    domain::{
        history::{PgHistoryRepository, records::StatusHistoryRecord},
        orders::{
            OrdersServiceError, PgOrderLifecycle, PgOrdersRepository,
            builder::PgOrderBuilder,
            data::{NewOrder, OrderCancellation, OrderTransition},
            lifecycle::StatusChange,
            records::{CancelledOrder, OrderDetails, OrderRecord, OrderUuid},
            repositories::PgOrderItemsRepository,
        },
        payments::{PgPaymentsRepository, PgSettlement},
    },
    settings::Settings,
};

const EXPIRY_REASON: &str = "payment deadline passed";

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    settings: Settings,
    builder: PgOrderBuilder,
    orders: PgOrdersRepository,
    items: PgOrderItemsRepository,
    payments: PgPaymentsRepository,
    history: PgHistoryRepository,
    lifecycle: PgOrderLifecycle,
    settlement: PgSettlement<PgOrderLifecycle>,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, settings: Settings) -> Self {
        Self {
            db,
            settings,
            builder: PgOrderBuilder::new(),
            orders: PgOrdersRepository::new(),
            items: PgOrderItemsRepository::new(),
            payments: PgPaymentsRepository::new(),
            history: PgHistoryRepository::new(),
            lifecycle: PgOrderLifecycle::new(),
            settlement: PgSettlement::new(PgOrderLifecycle::new()),
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.create_order",
        skip(self, order),
        fields(
            order_uuid = %order.uuid,
            buyer_uuid = %order.buyer,
            line_count = order.lines.len(),
            order_code = tracing::field::Empty,
            total = tracing::field::Empty
        ),
        err
    )]
    async fn create_order(
        &self,
        order: NewOrder,
        at: Timestamp,
    ) -> Result<OrderDetails, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let built = self
            .builder
            .build(&mut tx, &order, &self.settings, at)
            .await?;

        let span = Span::current();

        span.record("order_code", tracing::field::display(&built.order.code));
        span.record("total", tracing::field::display(built.order.total));

        let (record, payments) = if built.payments.is_empty() {
            self.settlement
                .apply(
                    &mut tx,
                    &built.order,
                    PaymentStatus::Paid,
                    None,
                    Some("nothing to pay"),
                    at,
                )
                .await?;

            (self.orders.get_order(&mut tx, order.uuid).await?, Vec::new())
        } else {
            (built.order, built.payments)
        };

        tx.commit().await?;

        info!(order_uuid = %record.uuid, code = %record.code, "created order");

        Ok(OrderDetails {
            order: record,
            items: built.items,
            payments,
        })
    }

    async fn get_order(&self, order: OrderUuid) -> Result<OrderDetails, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.orders.get_order(&mut tx, order).await?;
        let items = self.items.list_items(&mut tx, order).await?;
        let payments = self.payments.list_payments(&mut tx, order).await?;

        tx.commit().await?;

        Ok(OrderDetails {
            order: record,
            items,
            payments,
        })
    }

    async fn list_history(
        &self,
        order: OrderUuid,
    ) -> Result<Vec<StatusHistoryRecord>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        self.orders.get_order(&mut tx, order).await?;

        let entries = self.history.list(&mut tx, order).await?;

        tx.commit().await?;

        Ok(entries)
    }

    #[tracing::instrument(
        name = "orders.service.transition_order",
        skip(self, transition),
        fields(order_uuid = %order, target = %transition.target),
        err
    )]
    async fn transition_order(
        &self,
        order: OrderUuid,
        transition: OrderTransition,
        at: Timestamp,
    ) -> Result<OrderRecord, OrdersServiceError> {
        if transition.target == OrderStatus::Cancelled {
            let reason = transition.note.ok_or(OrdersServiceError::MissingReason)?;

            let cancelled = self
                .cancel_order(
                    order,
                    OrderCancellation {
                        actor: transition.actor,
                        reason,
                    },
                    at,
                )
                .await?;

            return Ok(cancelled.order);
        }

        let mut tx = self.db.begin().await?;

        let current = self.orders.lock_order(&mut tx, order).await?;

        if current.status == OrderStatus::Pending
            && transition.target == OrderStatus::Processing
            && current.payment_status != PaymentStatus::Paid
        {
            return Err(OrdersServiceError::PaymentOutstanding);
        }

        let updated = self
            .lifecycle
            .transition(
                &mut tx,
                &current,
                StatusChange {
                    target: transition.target,
                    actor: transition.actor,
                    note: transition.note.as_deref(),
                    cancellation_reason: None,
                },
                at,
            )
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(
        name = "orders.service.cancel_order",
        skip(self, cancellation),
        fields(order_uuid = %order, refund_required = tracing::field::Empty),
        err
    )]
    async fn cancel_order(
        &self,
        order: OrderUuid,
        cancellation: OrderCancellation,
        at: Timestamp,
    ) -> Result<CancelledOrder, OrdersServiceError> {
        let reason = cancellation.reason.trim();

        if reason.is_empty() {
            return Err(OrdersServiceError::MissingReason);
        }

        let mut tx = self.db.begin().await?;

        let current = self.orders.lock_order(&mut tx, order).await?;
        let payments = self.payments.list_payments(&mut tx, order).await?;

        let refund_required = payments.iter().any(|payment| payment.status.has_funds());

        Span::current().record("refund_required", refund_required);

        let note = if refund_required {
            format!("{reason} (refund required)")
        } else {
            reason.to_string()
        };

        let cancelled = self
            .lifecycle
            .transition(
                &mut tx,
                &current,
                StatusChange {
                    target: OrderStatus::Cancelled,
                    actor: cancellation.actor,
                    note: Some(&note),
                    cancellation_reason: Some(reason),
                },
                at,
            )
            .await?;

        self.payments
            .close_pending(&mut tx, order, PaymentStatus::Failed, at)
            .await?;

        self.settlement
            .recompute(
                &mut tx,
                &cancelled,
                cancellation.actor,
                Some("order cancelled"),
                at,
            )
            .await?;

        let record = self.orders.get_order(&mut tx, order).await?;

        tx.commit().await?;

        if refund_required {
            warn!(
                order_uuid = %order,
                code = %record.code,
                "cancelled order holds payments; refund required"
            );
        } else {
            info!(order_uuid = %order, "cancelled order");
        }

        Ok(CancelledOrder {
            order: record,
            refund_required,
        })
    }

    #[tracing::instrument(
        name = "orders.service.delete_order",
        skip(self),
        fields(order_uuid = %order),
        err
    )]
    async fn delete_order(
        &self,
        order: OrderUuid,
        at: Timestamp,
    ) -> Result<(), OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.orders.lock_order(&mut tx, order).await?;

        if !current.status.is_terminal() {
            return Err(OrdersServiceError::NotDeletable);
        }

        let rows_affected = self
            .orders
            .delete_order(&mut tx, order, &tombstone(&current.code, at), at)
            .await?;

        if rows_affected == 0 {
            return Err(OrdersServiceError::NotFound);
        }

        tx.commit().await?;

        info!(order_uuid = %order, code = %current.code, "deleted order");

        Ok(())
    }

    #[tracing::instrument(
        name = "orders.service.expire_overdue_orders",
        skip(self),
        fields(candidate_count = tracing::field::Empty, expired_count = tracing::field::Empty),
        err
    )]
    async fn expire_overdue_orders(
        &self,
        at: Timestamp,
    ) -> Result<Vec<OrderUuid>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let candidates = self.orders.list_overdue(&mut tx, at).await?;

        tx.commit().await?;

        let span = Span::current();

        span.record("candidate_count", candidates.len());

        let mut expired = Vec::with_capacity(candidates.len());

        for order in candidates {
            let mut tx = self.db.begin().await?;

            let current = match self.orders.lock_order(&mut tx, order).await {
                Ok(current) => current,
                Err(sqlx::Error::RowNotFound) => continue,
                Err(error) => return Err(error.into()),
            };

            // paid, cancelled or extended since the candidates were listed; orders holding
            // any money are left to an administrator
            if current.status != OrderStatus::Pending
                || !(current.payment_status == PaymentStatus::Pending
                    || current.payment_status.is_failure())
                || current.expires_at >= at
            {
                continue;
            }

            self.payments
                .close_pending(&mut tx, order, PaymentStatus::Expired, at)
                .await?;

            self.settlement
                .recompute(&mut tx, &current, None, Some(EXPIRY_REASON), at)
                .await?;

            let current = self.orders.get_order(&mut tx, order).await?;

            self.lifecycle
                .transition(
                    &mut tx,
                    &current,
                    StatusChange {
                        target: OrderStatus::Cancelled,
                        actor: None,
                        note: Some(EXPIRY_REASON),
                        cancellation_reason: Some(EXPIRY_REASON),
                    },
                    at,
                )
                .await?;

            tx.commit().await?;

            info!(order_uuid = %order, code = %current.code, "expired unpaid order");

            expired.push(order);
        }

        span.record("expired_count", expired.len());

        Ok(expired)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Price and place an order, redeeming its coupon and opening its payments.
    async fn create_order(
        &self,
        order: NewOrder,
        at: Timestamp,
    ) -> Result<OrderDetails, OrdersServiceError>;

    /// A live order with its items and payments.
    async fn get_order(&self, order: OrderUuid) -> Result<OrderDetails, OrdersServiceError>;

    /// Status history of an order, newest first.
    async fn list_history(
        &self,
        order: OrderUuid,
    ) -> Result<Vec<StatusHistoryRecord>, OrdersServiceError>;

    /// Move an order one step along its lifecycle.
    async fn transition_order(
        &self,
        order: OrderUuid,
        transition: OrderTransition,
        at: Timestamp,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Cancel an order and close its unpaid payments.
    async fn cancel_order(
        &self,
        order: OrderUuid,
        cancellation: OrderCancellation,
        at: Timestamp,
    ) -> Result<CancelledOrder, OrdersServiceError>;

    /// Soft-delete a completed or cancelled order, freeing its code.
    async fn delete_order(&self, order: OrderUuid, at: Timestamp) -> Result<(), OrdersServiceError>;

    /// Cancel every pending order whose payment deadline passed before `at`.
    async fn expire_overdue_orders(
        &self,
        at: Timestamp,
    ) -> Result<Vec<OrderUuid>, OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use grosir::{
        coupons::CouponRejection,
        discounts::DiscountKind,
        orders::{DeliveryType, TransitionError, status::is_valid_path},
    };
    use testresult::TestResult;
    use tokio::task::JoinSet;

    use crate::{
        domain::{
            history::records::HistoryKind,
            orders::data::{NewOrderLine, PaymentPlan},
            payments::{PaymentsService, data::GatewayCallback},
        },
        identities::{ActorUuid, AddressUuid, BuyerUuid},
        test::{
            TestContext,
            helpers::{at, new_coupon, percentage_terms, rupiah},
        },
    };

    use super::*;

    fn order_for(buyer: BuyerUuid, lines: Vec<NewOrderLine>) -> NewOrder {
        NewOrder {
            uuid: OrderUuid::new(),
            buyer,
            delivery: DeliveryType::Pickup,
            address: None,
            payment: PaymentPlan::Regular,
            lines,
            shipping: rupiah(0),
            other_fees: rupiah(0),
            coupon_code: None,
            notes: None,
        }
    }

    fn admin() -> Option<ActorUuid> {
        Some(ActorUuid::new())
    }

    async fn pay(ctx: &TestContext, external_id: &str, at: Timestamp) -> TestResult {
        ctx.payments
            .record_gateway_callback(
                GatewayCallback {
                    external_id: external_id.to_string(),
                    status: PaymentStatus::Paid,
                    gateway_reference: None,
                },
                at,
            )
            .await?;

        Ok(())
    }

    async fn move_to(
        ctx: &TestContext,
        order: OrderUuid,
        target: OrderStatus,
    ) -> Result<OrderRecord, OrdersServiceError> {
        ctx.orders
            .transition_order(
                order,
                OrderTransition {
                    target,
                    actor: admin(),
                    note: None,
                },
                at(2026, 10, 16, 12, 0, 0),
            )
            .await
    }

    #[tokio::test]
    async fn create_order_prices_lines_tax_and_fees() -> TestResult {
        let ctx = TestContext::new().await;
        let category = ctx.create_category("Beras").await?;
        let rice = ctx
            .create_product(category, "Beras 5kg", "BRS-5", rupiah(50_000))
            .await?;

        let mut order = order_for(
            BuyerUuid::new(),
            vec![NewOrderLine {
                product: rice,
                quantity: 4,
            }],
        );
        order.delivery = DeliveryType::Expedition;
        order.address = Some(AddressUuid::new());
        order.shipping = rupiah(15_000);
        order.other_fees = rupiah(2_500);

        let created = ctx
            .orders
            .create_order(order, at(2026, 10, 16, 9, 0, 0))
            .await?;

        let record = &created.order;

        assert!(record.code.starts_with("GRS-20261016-"), "unexpected code {}", record.code);
        assert_eq!(record.status, OrderStatus::Pending);
        assert_eq!(record.payment_status, PaymentStatus::Pending);
        assert_eq!(record.charges.product, rupiah(200_000));
        assert_eq!(record.charges.tax, rupiah(22_000));
        assert_eq!(record.total, rupiah(239_500));
        assert_eq!(record.total, record.charges.total());
        assert_eq!(record.expires_at, at(2026, 10, 17, 9, 0, 0));

        assert_eq!(created.items.len(), 1);
        assert_eq!(created.items[0].product_name, "Beras 5kg");
        assert_eq!(created.items[0].subtotal, rupiah(200_000));

        assert_eq!(created.payments.len(), 1);
        assert_eq!(created.payments[0].amount, record.total);
        assert_eq!(created.payments[0].external_id, format!("{}-P1", record.code));

        let history = ctx.orders.list_history(record.uuid).await?;

        assert_eq!(history.len(), 1);
        assert_eq!(history[0].kind, HistoryKind::Order);
        assert_eq!(history[0].from_status, None);
        assert_eq!(history[0].to_status, "PENDING");

        Ok(())
    }

    #[tokio::test]
    async fn create_order_snapshots_latest_category_discount() -> TestResult {
        let ctx = TestContext::new().await;
        let category = ctx.create_category("Minyak").await?;
        let oil = ctx
            .create_product(category, "Minyak 2L", "MNY-2", rupiah(40_000))
            .await?;

        ctx.create_category_discount(category, DiscountKind::Percentage, rupiah(10))
            .await?;
        ctx.create_category_discount(category, DiscountKind::FixedAmount, rupiah(5_000))
            .await?;

        let created = ctx
            .orders
            .create_order(
                order_for(
                    BuyerUuid::new(),
                    vec![NewOrderLine {
                        product: oil,
                        quantity: 2,
                    }],
                ),
                at(2026, 10, 16, 9, 0, 0),
            )
            .await?;

        assert_eq!(created.items[0].unit_price, rupiah(40_000));
        assert_eq!(created.items[0].unit_discount, rupiah(5_000));
        assert_eq!(created.items[0].subtotal, rupiah(70_000));
        assert_eq!(created.order.charges.product, rupiah(70_000));

        Ok(())
    }

    #[tokio::test]
    async fn create_order_rejects_unknown_product() {
        let ctx = TestContext::new().await;

        let result = ctx
            .orders
            .create_order(
                order_for(
                    BuyerUuid::new(),
                    vec![NewOrderLine {
                        product: crate::domain::catalog::records::ProductUuid::new(),
                        quantity: 1,
                    }],
                ),
                at(2026, 10, 16, 9, 0, 0),
            )
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::UnknownProduct)),
            "expected UnknownProduct, got {result:?}"
        );
    }

    #[tokio::test]
    async fn save10_applies_once() -> TestResult {
        let ctx = TestContext::new().await;
        let category = ctx.create_category("Gula").await?;
        let sugar = ctx
            .create_product(category, "Gula 50kg", "GLA-50", rupiah(200_000))
            .await?;

        ctx.coupons
            .create_coupon(new_coupon("SAVE10", percentage_terms(10, 100_000, Some(1))))
            .await?;

        let mut first = order_for(
            BuyerUuid::new(),
            vec![NewOrderLine {
                product: sugar,
                quantity: 1,
            }],
        );
        first.coupon_code = Some("save10".to_string());

        let created = ctx
            .orders
            .create_order(first, at(2026, 10, 16, 9, 0, 0))
            .await?;

        assert_eq!(created.order.charges.coupon_discount, rupiah(20_000));
        assert_eq!(created.order.charges.product, rupiah(180_000));
        assert!(created.order.coupon.is_some());

        let mut second = order_for(
            BuyerUuid::new(),
            vec![NewOrderLine {
                product: sugar,
                quantity: 1,
            }],
        );
        second.coupon_code = Some("SAVE10".to_string());

        let result = ctx
            .orders
            .create_order(second, at(2026, 10, 16, 10, 0, 0))
            .await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::CouponRejected(CouponRejection::LimitReached))
            ),
            "expected LimitReached, got {result:?}"
        );

        let coupon = ctx.coupons.find_coupon_by_code("SAVE10").await?;
        let report = ctx.coupons.usage_report(coupon.uuid).await?;

        assert_eq!(report.usage_count, 1);
        assert_eq!(report.total_discount, rupiah(20_000));
        assert_eq!(report.usages[0].order, created.order.uuid);

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_redemptions_respect_limit() -> TestResult {
        const LIMIT: u64 = 3;
        const EXTRA: usize = 5;

        let ctx = Arc::new(TestContext::new().await);
        let category = ctx.create_category("Tepung").await?;
        let flour = ctx
            .create_product(category, "Tepung 25kg", "TPG-25", rupiah(150_000))
            .await?;

        ctx.coupons
            .create_coupon(new_coupon("RUSH", percentage_terms(5, 0, Some(LIMIT))))
            .await?;

        let mut tasks = JoinSet::new();

        for _ in 0..(LIMIT as usize + EXTRA) {
            let ctx = Arc::clone(&ctx);

            tasks.spawn(async move {
                let mut order = order_for(
                    BuyerUuid::new(),
                    vec![NewOrderLine {
                        product: flour,
                        quantity: 1,
                    }],
                );
                order.coupon_code = Some("RUSH".to_string());

                ctx.orders
                    .create_order(order, at(2026, 10, 16, 9, 0, 0))
                    .await
            });
        }

        let mut accepted = 0;
        let mut limited = 0;

        while let Some(joined) = tasks.join_next().await {
            match joined? {
                Ok(_) => accepted += 1,
                Err(OrdersServiceError::CouponRejected(CouponRejection::LimitReached)) => {
                    limited += 1;
                }
                Err(other) => return Err(other.into()),
            }
        }

        assert_eq!(accepted, LIMIT as usize);
        assert_eq!(limited, EXTRA);

        let coupon = ctx.coupons.find_coupon_by_code("RUSH").await?;

        assert_eq!(ctx.coupons.usage_report(coupon.uuid).await?.usage_count, LIMIT);

        Ok(())
    }

    #[tokio::test]
    async fn split_order_settles_when_every_share_is_paid() -> TestResult {
        let ctx = TestContext::new().await;
        let category = ctx.create_category("Beras").await?;
        let rice = ctx
            .create_product(category, "Beras 25kg", "BRS-25", rupiah(300_000))
            .await?;

        let buyer = BuyerUuid::new();
        let partner = BuyerUuid::new();

        let mut order = order_for(
            buyer,
            vec![NewOrderLine {
                product: rice,
                quantity: 1,
            }],
        );
        order.payment = PaymentPlan::Split(vec![
            grosir::payments::split::Share {
                payer: buyer,
                amount: rupiah(200_000),
            },
            grosir::payments::split::Share {
                payer: partner,
                amount: rupiah(133_000),
            },
        ]);

        let created = ctx
            .orders
            .create_order(order, at(2026, 10, 16, 9, 0, 0))
            .await?;

        assert_eq!(created.order.total, rupiah(333_000));
        assert_eq!(created.payments.len(), 2);

        pay(&ctx, &created.payments[0].external_id, at(2026, 10, 16, 9, 5, 0)).await?;

        let details = ctx.orders.get_order(created.order.uuid).await?;

        assert_eq!(details.order.payment_status, PaymentStatus::Partial);
        assert_eq!(details.order.status, OrderStatus::Pending);
        assert!(details.order.timestamps.paid_at.is_none());

        pay(&ctx, &created.payments[1].external_id, at(2026, 10, 16, 9, 10, 0)).await?;

        let details = ctx.orders.get_order(created.order.uuid).await?;

        assert_eq!(details.order.payment_status, PaymentStatus::Paid);
        assert_eq!(details.order.status, OrderStatus::Processing);
        assert_eq!(details.order.timestamps.paid_at, Some(at(2026, 10, 16, 9, 10, 0)));
        assert_eq!(
            details.order.timestamps.processed_at,
            Some(at(2026, 10, 16, 9, 10, 0))
        );

        Ok(())
    }

    #[tokio::test]
    async fn skipping_states_is_rejected_without_history() -> TestResult {
        let ctx = TestContext::new().await;
        let order = ctx.paid_order().await?;

        let result = move_to(&ctx, order, OrderStatus::Completed).await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::InvalidTransition(TransitionError {
                    from: OrderStatus::Processing,
                    to: OrderStatus::Completed,
                }))
            ),
            "expected InvalidTransition, got {result:?}"
        );

        let details = ctx.orders.get_order(order).await?;

        assert_eq!(details.order.status, OrderStatus::Processing);

        let order_entries = ctx
            .orders
            .list_history(order)
            .await?
            .into_iter()
            .filter(|entry| entry.kind == HistoryKind::Order)
            .count();

        // created, then processing
        assert_eq!(order_entries, 2);

        Ok(())
    }

    #[tokio::test]
    async fn pending_to_shipped_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let order = ctx.pending_order().await?;

        let result = move_to(&ctx, order, OrderStatus::Shipped).await;

        assert!(
            matches!(result, Err(OrdersServiceError::InvalidTransition(_))),
            "expected InvalidTransition, got {result:?}"
        );

        assert_eq!(ctx.orders.get_order(order).await?.order.status, OrderStatus::Pending);
        assert_eq!(ctx.orders.list_history(order).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn processing_requires_payment() -> TestResult {
        let ctx = TestContext::new().await;
        let order = ctx.pending_order().await?;

        let result = move_to(&ctx, order, OrderStatus::Processing).await;

        assert!(
            matches!(result, Err(OrdersServiceError::PaymentOutstanding)),
            "expected PaymentOutstanding, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn full_lifecycle_records_a_valid_path() -> TestResult {
        let ctx = TestContext::new().await;
        let order = ctx.paid_order().await?;

        for target in [OrderStatus::Ready, OrderStatus::Shipped, OrderStatus::Completed] {
            move_to(&ctx, order, target).await?;
        }

        let record = ctx.orders.get_order(order).await?.order;

        assert_eq!(record.status, OrderStatus::Completed);
        assert!(record.timestamps.ready_at.is_some());
        assert!(record.timestamps.shipped_at.is_some());
        assert!(record.timestamps.completed_at.is_some());

        let mut path: Vec<OrderStatus> = ctx
            .orders
            .list_history(order)
            .await?
            .into_iter()
            .filter(|entry| entry.kind == HistoryKind::Order)
            .map(|entry| entry.to_status.parse())
            .collect::<Result<_, _>>()?;

        path.reverse();

        assert!(is_valid_path(&path), "unexpected path {path:?}");

        let result = move_to(&ctx, order, OrderStatus::Cancelled).await;

        assert!(
            matches!(result, Err(OrdersServiceError::MissingReason)),
            "expected MissingReason, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn cancelling_unpaid_order_fails_its_payments() -> TestResult {
        let ctx = TestContext::new().await;
        let order = ctx.pending_order().await?;

        let cancelled = ctx
            .orders
            .cancel_order(
                order,
                OrderCancellation {
                    actor: admin(),
                    reason: "out of stock".to_string(),
                },
                at(2026, 10, 16, 11, 0, 0),
            )
            .await?;

        assert!(!cancelled.refund_required);
        assert_eq!(cancelled.order.status, OrderStatus::Cancelled);
        assert_eq!(cancelled.order.payment_status, PaymentStatus::Failed);
        assert_eq!(cancelled.order.cancellation_reason.as_deref(), Some("out of stock"));
        assert_eq!(
            cancelled.order.timestamps.cancelled_at,
            Some(at(2026, 10, 16, 11, 0, 0))
        );

        let details = ctx.orders.get_order(order).await?;

        assert!(
            details
                .payments
                .iter()
                .all(|payment| payment.status == PaymentStatus::Failed)
        );

        Ok(())
    }

    #[tokio::test]
    async fn cancelling_paid_order_requires_refund() -> TestResult {
        let ctx = TestContext::new().await;
        let order = ctx.paid_order().await?;

        let cancelled = ctx
            .orders
            .cancel_order(
                order,
                OrderCancellation {
                    actor: admin(),
                    reason: "buyer request".to_string(),
                },
                at(2026, 10, 16, 11, 0, 0),
            )
            .await?;

        assert!(cancelled.refund_required);
        assert_eq!(cancelled.order.payment_status, PaymentStatus::Paid);

        let history = ctx.orders.list_history(order).await?;

        assert_eq!(history[0].to_status, "CANCELLED");
        assert_eq!(
            history[0].note.as_deref(),
            Some("buyer request (refund required)")
        );

        Ok(())
    }

    #[tokio::test]
    async fn cancel_requires_reason() -> TestResult {
        let ctx = TestContext::new().await;
        let order = ctx.pending_order().await?;

        let result = ctx
            .orders
            .cancel_order(
                order,
                OrderCancellation {
                    actor: admin(),
                    reason: "   ".to_string(),
                },
                at(2026, 10, 16, 11, 0, 0),
            )
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::MissingReason)),
            "expected MissingReason, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn expiry_sweep_cancels_overdue_orders() -> TestResult {
        let ctx = TestContext::new().await;
        let overdue = ctx.pending_order().await?;
        let paid = ctx.paid_order().await?;

        let before = ctx
            .orders
            .expire_overdue_orders(at(2026, 10, 17, 8, 59, 0))
            .await?;

        assert!(before.is_empty());

        let expired = ctx
            .orders
            .expire_overdue_orders(at(2026, 10, 17, 9, 1, 0))
            .await?;

        assert_eq!(expired, vec![overdue]);

        let details = ctx.orders.get_order(overdue).await?;

        assert_eq!(details.order.status, OrderStatus::Cancelled);
        assert_eq!(details.order.payment_status, PaymentStatus::Expired);
        assert_eq!(
            details.order.cancellation_reason.as_deref(),
            Some("payment deadline passed")
        );
        assert_eq!(details.payments[0].status, PaymentStatus::Expired);

        assert_eq!(
            ctx.orders.get_order(paid).await?.order.status,
            OrderStatus::Processing
        );

        let again = ctx
            .orders
            .expire_overdue_orders(at(2026, 10, 17, 9, 2, 0))
            .await?;

        assert!(again.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn expiry_sweep_closes_orders_whose_payment_failed() -> TestResult {
        let ctx = TestContext::new().await;
        let failed = ctx.pending_order().await?;
        let payment = ctx.payments.list_payments(failed).await?.remove(0);

        let outcome = ctx
            .payments
            .record_gateway_callback(
                GatewayCallback {
                    external_id: payment.external_id,
                    status: PaymentStatus::Failed,
                    gateway_reference: None,
                },
                at(2026, 10, 16, 9, 30, 0),
            )
            .await?;

        assert_eq!(outcome.order_payment_status, PaymentStatus::Failed);

        let expired = ctx
            .orders
            .expire_overdue_orders(at(2026, 10, 17, 9, 1, 0))
            .await?;

        assert_eq!(expired, vec![failed]);

        let details = ctx.orders.get_order(failed).await?;

        assert_eq!(details.order.status, OrderStatus::Cancelled);
        assert_eq!(details.order.payment_status, PaymentStatus::Failed);
        assert_eq!(details.payments[0].status, PaymentStatus::Failed);

        Ok(())
    }

    #[tokio::test]
    async fn free_order_settles_immediately() -> TestResult {
        let ctx = TestContext::new().await;
        let category = ctx.create_category("Sampel").await?;
        let sample = ctx
            .create_product(category, "Sampel", "SMP-1", rupiah(0))
            .await?;

        let created = ctx
            .orders
            .create_order(
                order_for(
                    BuyerUuid::new(),
                    vec![NewOrderLine {
                        product: sample,
                        quantity: 1,
                    }],
                ),
                at(2026, 10, 16, 9, 0, 0),
            )
            .await?;

        assert!(created.payments.is_empty());
        assert_eq!(created.order.total, rupiah(0));
        assert_eq!(created.order.payment_status, PaymentStatus::Paid);
        assert_eq!(created.order.status, OrderStatus::Processing);

        Ok(())
    }

    #[tokio::test]
    async fn delete_order_requires_terminal_status_and_frees_code() -> TestResult {
        let ctx = TestContext::new().await;
        let order = ctx.pending_order().await?;

        let result = ctx.orders.delete_order(order, at(2026, 10, 16, 12, 0, 0)).await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotDeletable)),
            "expected NotDeletable, got {result:?}"
        );

        ctx.orders
            .cancel_order(
                order,
                OrderCancellation {
                    actor: admin(),
                    reason: "duplicate".to_string(),
                },
                at(2026, 10, 16, 12, 0, 0),
            )
            .await?;

        ctx.orders
            .delete_order(order, at(2026, 10, 16, 12, 5, 0))
            .await?;

        let result = ctx.orders.get_order(order).await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }
}
