//! Orders Records

use jiff::Timestamp;
use rust_decimal::Decimal;

use grosir::{
    orders::{DeliveryType, OrderStatus, StatusTimestamps, pricing::OrderCharges},
    payments::{PaymentStatus, PaymentType},
};

use crate::{
    domain::{
        catalog::records::{CategoryUuid, ProductUuid},
        coupons::records::CouponUuid,
        payments::records::PaymentRecord,
    },
    identities::{AddressUuid, BuyerUuid},
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Record
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub code: String,
    pub buyer: BuyerUuid,
    pub delivery: DeliveryType,
    pub address: Option<AddressUuid>,
    pub payment_type: PaymentType,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub coupon: Option<CouponUuid>,
    pub charges: OrderCharges,
    pub total: Decimal,
    pub notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub expires_at: Timestamp,
    pub timestamps: StatusTimestamps,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItemRecord>;

/// Snapshot of one ordered product.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItemRecord {
    pub uuid: OrderItemUuid,
    pub order: OrderUuid,
    pub product: ProductUuid,
    pub category: CategoryUuid,
    pub product_name: String,
    pub sku: String,
    pub unit_price: Decimal,
    pub unit_discount: Decimal,
    pub quantity: u32,
    pub subtotal: Decimal,
}

/// An order with its lines and payments.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDetails {
    pub order: OrderRecord,
    pub items: Vec<OrderItemRecord>,
    pub payments: Vec<PaymentRecord>,
}

/// Result of a cancellation.
#[derive(Debug, Clone, PartialEq)]
pub struct CancelledOrder {
    pub order: OrderRecord,

    /// Money was received before cancelling and has to be refunded.
    pub refund_required: bool,
}
