//! Order Builder
//!
//! Turns a buyer's request into a priced order with snapshotted lines, an optional redeemed
//! coupon and its opening payment records, all inside the caller's transaction.

use jiff::Timestamp;
use rust_decimal::Decimal;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use sqlx::{Postgres, Transaction};
use tracing::debug;

use grosir::{
    categories::resolve,
    codes::payment_reference,
    orders::pricing::{ChargeInputs, LinePrice, PricingError, lines_total, price_order},
    payments::{
        PaymentType,
        split::{Share, validate_shares},
    },
};

use crate::{
    domain::{
        catalog::{
            PgCatalogRepository,
            records::{CategoryUuid, ProductRecord, ProductUuid},
        },
        coupons::{CouponCheck, NewCouponUsage, PgCouponLedger, PgCouponValidator, RowLock},
        history::{NewHistoryEntry, PgHistoryRepository, records::HistoryKind},
        orders::{
            OrdersServiceError,
            codes::unused_order_code,
            data::{NewOrder, PaymentPlan},
            records::{OrderItemRecord, OrderRecord},
            repositories::{NewOrderItem, NewOrderRow, PgOrderItemsRepository, PgOrdersRepository},
        },
        payments::{NewPayment, PgPaymentsRepository, records::PaymentRecord},
    },
    identities::{ActorUuid, BuyerUuid},
    settings::Settings,
};

/// Rows written for a new order.
#[derive(Debug, Clone)]
pub(crate) struct BuiltOrder {
    pub(crate) order: OrderRecord,
    pub(crate) items: Vec<OrderItemRecord>,
    pub(crate) payments: Vec<PaymentRecord>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderBuilder {
    catalog: PgCatalogRepository,
    validator: PgCouponValidator,
    ledger: PgCouponLedger,
    orders: PgOrdersRepository,
    items: PgOrderItemsRepository,
    payments: PgPaymentsRepository,
    history: PgHistoryRepository,
}

impl PgOrderBuilder {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            catalog: PgCatalogRepository::new(),
            validator: PgCouponValidator::new(),
            ledger: PgCouponLedger::new(),
            orders: PgOrdersRepository::new(),
            items: PgOrderItemsRepository::new(),
            payments: PgPaymentsRepository::new(),
            history: PgHistoryRepository::new(),
        }
    }

    pub(crate) async fn build(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        request: &NewOrder,
        settings: &Settings,
        at: Timestamp,
    ) -> Result<BuiltOrder, OrdersServiceError> {
        check_request(request)?;

        let now = settings.local(at);
        let today = now.date();

        let product_uuids: Vec<ProductUuid> =
            request.lines.iter().map(|line| line.product).collect();

        let products: FxHashMap<ProductUuid, ProductRecord> = self
            .catalog
            .get_products(tx, &product_uuids)
            .await?
            .into_iter()
            .map(|product| (product.uuid, product))
            .collect();

        let mut categories: SmallVec<[CategoryUuid; 4]> = SmallVec::new();

        for line in &request.lines {
            let product = products
                .get(&line.product)
                .ok_or(OrdersServiceError::UnknownProduct)?;

            if !categories.contains(&product.category) {
                categories.push(product.category);
            }
        }

        let discounts = self
            .catalog
            .list_category_discounts(tx, &categories, today)
            .await?;

        let mut lines = Vec::with_capacity(request.lines.len());

        for line in &request.lines {
            let product = products
                .get(&line.product)
                .ok_or(OrdersServiceError::UnknownProduct)?;

            let unit_discount = resolve(&discounts, &product.category, today)
                .map_or(Decimal::ZERO, |discount| discount.unit_discount(product.price));

            lines.push((
                product,
                LinePrice::new(product.price, unit_discount, line.quantity)?,
            ));
        }

        let product_total = lines_total(lines.iter().map(|(_, price)| price));

        let coupon = match request.coupon_code.as_deref() {
            Some(code) => Some(
                self.validator
                    .validate(
                        tx,
                        CouponCheck {
                            code,
                            buyer: request.buyer,
                            total: product_total,
                            categories: &categories,
                            now: &now,
                        },
                        RowLock::ForUpdate,
                    )
                    .await?,
            ),
            None => None,
        };

        let charges = price_order(
            product_total,
            coupon
                .as_ref()
                .map_or(Decimal::ZERO, |validated| validated.discount),
            ChargeInputs {
                shipping: request.shipping,
                other: request.other_fees,
                tax_rate: settings.tax_rate,
            },
        )?;

        let total = charges.total();

        let (payment_type, shares) = payment_shares(request, total)?;

        let expires_at = at
            .checked_add(settings.payment_window)
            .map_err(OrdersServiceError::Clock)?;

        let code = unused_order_code(tx, &self.orders, today).await?;

        let order = self
            .orders
            .create_order(
                tx,
                NewOrderRow {
                    uuid: request.uuid,
                    code: &code,
                    buyer: request.buyer,
                    delivery: request.delivery,
                    address: request.address,
                    payment_type,
                    coupon: coupon.as_ref().map(|validated| validated.coupon.uuid),
                    charges,
                    notes: request.notes.as_deref(),
                    expires_at,
                },
                at,
            )
            .await?;

        let mut items = Vec::with_capacity(lines.len());

        for (product, price) in lines {
            items.push(
                self.items
                    .create_item(tx, order.uuid, NewOrderItem { product, price })
                    .await?,
            );
        }

        let mut payments = Vec::with_capacity(shares.len());

        for (index, share) in shares.iter().enumerate() {
            let external_id = payment_reference(&code, index + 1);

            payments.push(
                self.payments
                    .create_payment(
                        tx,
                        NewPayment {
                            order: order.uuid,
                            payer: share.payer,
                            amount: share.amount,
                            external_id: &external_id,
                        },
                        at,
                    )
                    .await?,
            );
        }

        self.history
            .record(
                tx,
                NewHistoryEntry {
                    order: order.uuid,
                    kind: HistoryKind::Order,
                    from_status: None,
                    to_status: order.status.as_str(),
                    actor: Some(ActorUuid::from_uuid(request.buyer.into_uuid())),
                    note: None,
                },
            )
            .await?;

        if let Some(validated) = coupon {
            let usage = self
                .ledger
                .redeem(
                    tx,
                    NewCouponUsage {
                        coupon: validated.coupon.uuid,
                        order: order.uuid,
                        buyer: request.buyer,
                        code: &validated.coupon.code,
                        discount: charges.coupon_discount,
                    },
                )
                .await?;

            debug!(usage_uuid = %usage.uuid, code = %usage.code, "coupon redeemed");
        }

        Ok(BuiltOrder {
            order,
            items,
            payments,
        })
    }
}

/// Checks that need no storage.
fn check_request(request: &NewOrder) -> Result<(), OrdersServiceError> {
    if request.lines.is_empty() {
        return Err(OrdersServiceError::EmptyOrder);
    }

    if request.delivery.requires_address() && request.address.is_none() {
        return Err(OrdersServiceError::MissingAddress);
    }

    let mut seen = FxHashSet::default();

    for line in &request.lines {
        if line.quantity == 0 {
            return Err(PricingError::InvalidQuantity.into());
        }

        if !seen.insert(line.product) {
            return Err(OrdersServiceError::DuplicateProduct);
        }
    }

    Ok(())
}

/// Payment records to open for `total`.
///
/// A regular order with nothing to pay gets none.
fn payment_shares(
    request: &NewOrder,
    total: Decimal,
) -> Result<(PaymentType, Vec<Share<BuyerUuid>>), OrdersServiceError> {
    match &request.payment {
        PaymentPlan::Regular if total > Decimal::ZERO => Ok((
            PaymentType::Regular,
            vec![Share {
                payer: request.buyer,
                amount: total,
            }],
        )),
        PaymentPlan::Regular => Ok((PaymentType::Regular, Vec::new())),
        PaymentPlan::Split(shares) => {
            validate_shares(shares, total)?;

            Ok((PaymentType::Split, shares.clone()))
        }
    }
}
