//! Test helpers.

use std::sync::Arc;

use jiff::{Timestamp, civil::date};
use rust_decimal::Decimal;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use grosir::{
    discounts::DiscountKind,
    orders::{DeliveryType, OrderStatus, StatusTimestamps, pricing::OrderCharges},
    payments::{PaymentStatus, PaymentType},
};
use grosir_app::{
    context::AppContext,
    domain::{
        coupons::{
            MockCouponsService,
            data::CouponTerms,
            records::{CouponRecord, CouponUuid},
        },
        orders::{
            MockOrdersService,
            records::{OrderDetails, OrderRecord, OrderUuid},
        },
        payments::{
            MockPaymentsService,
            records::{PaymentRecord, PaymentUuid},
        },
    },
    identities::BuyerUuid,
};

use crate::{
    extensions::*,
    identity::{Identity, Role},
    state::State,
};

pub(crate) const TEST_ADMIN: Identity = Identity {
    uuid: Uuid::from_u128(0xad),
    role: Role::Admin,
};

pub(crate) const TEST_BUYER: Identity = Identity {
    uuid: Uuid::from_u128(0xb0),
    role: Role::Buyer,
};

struct InjectIdentity(Identity);

#[salvo::handler]
impl InjectIdentity {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        depot.insert_identity(self.0);
        ctrl.call_next(req, depot, res).await;
    }
}

pub(crate) fn strict_coupons_mock() -> MockCouponsService {
    let mut coupons = MockCouponsService::new();

    coupons.expect_create_coupon().never();
    coupons.expect_get_coupon().never();
    coupons.expect_find_coupon_by_code().never();
    coupons.expect_list_coupons().never();
    coupons.expect_update_coupon().never();
    coupons.expect_delete_coupon().never();
    coupons.expect_validate_coupon().never();
    coupons.expect_usage_report().never();

    coupons
}

pub(crate) fn strict_orders_mock() -> MockOrdersService {
    let mut orders = MockOrdersService::new();

    orders.expect_create_order().never();
    orders.expect_get_order().never();
    orders.expect_list_history().never();
    orders.expect_transition_order().never();
    orders.expect_cancel_order().never();
    orders.expect_delete_order().never();
    orders.expect_expire_overdue_orders().never();

    orders
}

pub(crate) fn strict_payments_mock() -> MockPaymentsService {
    let mut payments = MockPaymentsService::new();

    payments.expect_record_gateway_callback().never();
    payments.expect_refund_payment().never();
    payments.expect_list_payments().never();

    payments
}

pub(crate) fn state_with(
    coupons: MockCouponsService,
    orders: MockOrdersService,
    payments: MockPaymentsService,
) -> Arc<State> {
    State::from_app_context(AppContext {
        coupons: Arc::new(coupons),
        orders: Arc::new(orders),
        payments: Arc::new(payments),
    })
}

pub(crate) fn service(state: Arc<State>, identity: Option<Identity>, route: Router) -> Service {
    let router = Router::new().hoop(inject(state));

    let router = match identity {
        Some(identity) => router.hoop(InjectIdentity(identity)),
        None => router,
    };

    Service::new(router.push(route))
}

pub(crate) fn orders_service(
    orders: MockOrdersService,
    identity: Identity,
    route: Router,
) -> Service {
    service(
        state_with(strict_coupons_mock(), orders, strict_payments_mock()),
        Some(identity),
        route,
    )
}

pub(crate) fn payments_service(
    payments: MockPaymentsService,
    identity: Option<Identity>,
    route: Router,
) -> Service {
    service(
        state_with(strict_coupons_mock(), strict_orders_mock(), payments),
        identity,
        route,
    )
}

pub(crate) fn coupons_service(
    coupons: MockCouponsService,
    identity: Identity,
    route: Router,
) -> Service {
    service(
        state_with(coupons, strict_orders_mock(), strict_payments_mock()),
        Some(identity),
        route,
    )
}

pub(crate) fn make_order(uuid: OrderUuid, buyer: BuyerUuid) -> OrderRecord {
    let charges = OrderCharges {
        product: Decimal::from(180_000),
        shipping: Decimal::from(15_000),
        tax: Decimal::from(19_800),
        other: Decimal::ZERO,
        coupon_discount: Decimal::from(20_000),
    };

    OrderRecord {
        uuid,
        code: "GRS-20261016-AB12CD34".to_string(),
        buyer,
        delivery: DeliveryType::Pickup,
        address: None,
        payment_type: PaymentType::Regular,
        status: OrderStatus::Pending,
        payment_status: PaymentStatus::Pending,
        coupon: None,
        charges,
        total: charges.total(),
        notes: None,
        cancellation_reason: None,
        expires_at: Timestamp::UNIX_EPOCH,
        timestamps: StatusTimestamps::default(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}

pub(crate) fn make_payment(order: &OrderRecord) -> PaymentRecord {
    PaymentRecord {
        uuid: PaymentUuid::new(),
        order: order.uuid,
        payer: order.buyer,
        amount: order.total,
        status: PaymentStatus::Pending,
        external_id: format!("{}-P1", order.code),
        gateway_reference: None,
        paid_at: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_details(uuid: OrderUuid, buyer: BuyerUuid) -> OrderDetails {
    let order = make_order(uuid, buyer);
    let payments = vec![make_payment(&order)];

    OrderDetails {
        order,
        items: Vec::new(),
        payments,
    }
}

pub(crate) fn make_coupon(uuid: CouponUuid) -> CouponRecord {
    CouponRecord {
        uuid,
        code: "SAVE10".to_string(),
        terms: CouponTerms {
            kind: DiscountKind::Percentage,
            value: Decimal::from(10),
            minimum_purchase: Decimal::from(100_000),
            usage_limit: Some(1),
            expires_on: date(2026, 12, 31),
            active: true,
            all_categories: true,
            categories: Vec::new(),
        },
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}
