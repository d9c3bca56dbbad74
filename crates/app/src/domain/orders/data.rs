//! Orders Data

use rust_decimal::Decimal;

use grosir::{
    orders::{DeliveryType, OrderStatus},
    payments::split::Share,
};

use crate::{
    domain::{catalog::records::ProductUuid, orders::records::OrderUuid},
    identities::{ActorUuid, AddressUuid, BuyerUuid},
};

/// One requested product line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewOrderLine {
    pub product: ProductUuid,
    pub quantity: u32,
}

/// How the total is going to be collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentPlan {
    /// The buyer pays everything.
    Regular,

    /// Each payer pays their share.
    Split(Vec<Share<BuyerUuid>>),
}

/// New Order Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub buyer: BuyerUuid,
    pub delivery: DeliveryType,
    pub address: Option<AddressUuid>,
    pub payment: PaymentPlan,
    pub lines: Vec<NewOrderLine>,
    pub shipping: Decimal,
    pub other_fees: Decimal,
    pub coupon_code: Option<String>,
    pub notes: Option<String>,
}

/// Admin request to move an order along.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTransition {
    pub target: OrderStatus,
    pub actor: Option<ActorUuid>,
    pub note: Option<String>,
}

/// Request to cancel an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderCancellation {
    pub actor: Option<ActorUuid>,
    pub reason: String,
}
