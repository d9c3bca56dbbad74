//! Order Requests

use rust_decimal::Decimal;
use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use grosir::{
    orders::{DeliveryType, OrderStatus},
    payments::split::Share,
};
use grosir_app::{
    domain::orders::{
        data::{NewOrder, NewOrderLine, OrderCancellation, OrderTransition, PaymentPlan},
        records::OrderUuid,
    },
    identities::{ActorUuid, BuyerUuid},
};

use crate::extensions::*;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub(crate) struct OrderLineRequest {
    pub product: Uuid,
    pub quantity: u32,
}

/// One payer's part of a split payment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub(crate) struct PaymentShareRequest {
    pub payer: Uuid,

    #[salvo(schema(value_type = String))]
    pub amount: Decimal,
}

/// Create Order Request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub(crate) struct CreateOrderRequest {
    pub uuid: Uuid,

    /// `PICKUP`, `STORE_COURIER` or `EXPEDITION`
    pub delivery: String,

    /// Required unless picking up
    #[serde(default)]
    pub address: Option<Uuid>,

    pub lines: Vec<OrderLineRequest>,

    /// Empty for a regular payment by the caller
    #[serde(default)]
    pub split: Vec<PaymentShareRequest>,

    #[serde(default)]
    #[salvo(schema(value_type = String))]
    pub shipping: Decimal,

    #[serde(default)]
    #[salvo(schema(value_type = String))]
    pub other_fees: Decimal,

    #[serde(default)]
    pub coupon_code: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,
}

impl CreateOrderRequest {
    pub(crate) fn into_new_order(self, buyer: BuyerUuid) -> Result<NewOrder, StatusError> {
        let delivery = self
            .delivery
            .parse::<DeliveryType>()
            .or_400("unknown delivery type")?;

        let payment = if self.split.is_empty() {
            PaymentPlan::Regular
        } else {
            PaymentPlan::Split(
                self.split
                    .into_iter()
                    .map(|share| Share {
                        payer: BuyerUuid::from_uuid(share.payer),
                        amount: share.amount,
                    })
                    .collect(),
            )
        };

        Ok(NewOrder {
            uuid: OrderUuid::from_uuid(self.uuid),
            buyer,
            delivery,
            address: self.address.map(Into::into),
            payment,
            lines: self
                .lines
                .into_iter()
                .map(|line| NewOrderLine {
                    product: line.product.into(),
                    quantity: line.quantity,
                })
                .collect(),
            shipping: self.shipping,
            other_fees: self.other_fees,
            coupon_code: self.coupon_code.filter(|code| !code.trim().is_empty()),
            notes: self.notes,
        })
    }
}

/// Move an order to its next status.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub(crate) struct TransitionOrderRequest {
    /// Target status, e.g. `READY`
    pub status: String,

    #[serde(default)]
    pub note: Option<String>,
}

impl TransitionOrderRequest {
    pub(crate) fn into_transition(self, actor: ActorUuid) -> Result<OrderTransition, StatusError> {
        Ok(OrderTransition {
            target: self.status.parse::<OrderStatus>().or_400("unknown order status")?,
            actor: Some(actor),
            note: self.note,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub(crate) struct CancelOrderRequest {
    pub reason: String,
}

impl CancelOrderRequest {
    pub(crate) fn into_cancellation(self, actor: ActorUuid) -> OrderCancellation {
        OrderCancellation {
            actor: Some(actor),
            reason: self.reason,
        }
    }
}
