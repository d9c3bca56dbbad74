//! Order Responses

use std::string::ToString;

use jiff::Timestamp;
use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use grosir::orders::pricing::OrderCharges;
use grosir_app::domain::{
    history::records::StatusHistoryRecord,
    orders::records::{CancelledOrder, OrderDetails, OrderItemRecord, OrderRecord},
};

use crate::payments::responses::PaymentResponse;

pub(crate) fn timestamp(value: Option<Timestamp>) -> Option<String> {
    value.as_ref().map(ToString::to_string)
}

/// Money breakdown of an order, in rupiah.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ChargesResponse {
    /// Line subtotals minus the coupon discount
    #[salvo(schema(value_type = String))]
    pub product: Decimal,

    #[salvo(schema(value_type = String))]
    pub shipping: Decimal,

    /// VAT on the product cost
    #[salvo(schema(value_type = String))]
    pub tax: Decimal,

    #[salvo(schema(value_type = String))]
    pub other: Decimal,

    #[salvo(schema(value_type = String))]
    pub coupon_discount: Decimal,
}

impl From<OrderCharges> for ChargesResponse {
    fn from(charges: OrderCharges) -> Self {
        ChargesResponse {
            product: charges.product,
            shipping: charges.shipping,
            tax: charges.tax,
            other: charges.other,
            coupon_discount: charges.coupon_discount,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,

    /// Human-readable order code, `GRS-YYYYMMDD-XXXXXXXX`
    pub code: String,

    pub buyer: Uuid,

    /// `PICKUP`, `STORE_COURIER` or `EXPEDITION`
    pub delivery: String,

    pub address: Option<Uuid>,

    /// `REGULAR` or `SPLIT`
    pub payment_type: String,

    /// Fulfilment status
    pub status: String,

    /// Aggregate status of the order's payments
    pub payment_status: String,

    pub coupon: Option<Uuid>,

    pub charges: ChargesResponse,

    #[salvo(schema(value_type = String))]
    pub total: Decimal,

    pub notes: Option<String>,

    pub cancellation_reason: Option<String>,

    /// Payment deadline
    pub expires_at: String,

    pub paid_at: Option<String>,
    pub processed_at: Option<String>,
    pub ready_at: Option<String>,
    pub shipped_at: Option<String>,
    pub completed_at: Option<String>,
    pub cancelled_at: Option<String>,

    pub created_at: String,
    pub updated_at: String,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        OrderResponse {
            uuid: order.uuid.into(),
            code: order.code,
            buyer: order.buyer.into(),
            delivery: order.delivery.to_string(),
            address: order.address.map(Into::into),
            payment_type: order.payment_type.to_string(),
            status: order.status.to_string(),
            payment_status: order.payment_status.to_string(),
            coupon: order.coupon.map(Into::into),
            charges: order.charges.into(),
            total: order.total,
            notes: order.notes,
            cancellation_reason: order.cancellation_reason,
            expires_at: order.expires_at.to_string(),
            paid_at: timestamp(order.timestamps.paid_at),
            processed_at: timestamp(order.timestamps.processed_at),
            ready_at: timestamp(order.timestamps.ready_at),
            shipped_at: timestamp(order.timestamps.shipped_at),
            completed_at: timestamp(order.timestamps.completed_at),
            cancelled_at: timestamp(order.timestamps.cancelled_at),
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

/// Snapshot of an ordered product.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub uuid: Uuid,
    pub product: Uuid,
    pub category: Uuid,
    pub product_name: String,
    pub sku: String,

    #[salvo(schema(value_type = String))]
    pub unit_price: Decimal,

    /// Category discount per unit at order time
    #[salvo(schema(value_type = String))]
    pub unit_discount: Decimal,

    pub quantity: u32,

    #[salvo(schema(value_type = String))]
    pub subtotal: Decimal,
}

impl From<OrderItemRecord> for OrderItemResponse {
    fn from(item: OrderItemRecord) -> Self {
        OrderItemResponse {
            uuid: item.uuid.into(),
            product: item.product.into(),
            category: item.category.into(),
            product_name: item.product_name,
            sku: item.sku,
            unit_price: item.unit_price,
            unit_discount: item.unit_discount,
            quantity: item.quantity,
            subtotal: item.subtotal,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderDetailsResponse {
    pub order: OrderResponse,
    pub items: Vec<OrderItemResponse>,
    pub payments: Vec<PaymentResponse>,
}

impl From<OrderDetails> for OrderDetailsResponse {
    fn from(details: OrderDetails) -> Self {
        OrderDetailsResponse {
            order: details.order.into(),
            items: details.items.into_iter().map(Into::into).collect(),
            payments: details.payments.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CancelledOrderResponse {
    pub order: OrderResponse,

    /// Money was received and has to be refunded
    pub refund_required: bool,
}

impl From<CancelledOrder> for CancelledOrderResponse {
    fn from(cancelled: CancelledOrder) -> Self {
        CancelledOrderResponse {
            order: cancelled.order.into(),
            refund_required: cancelled.refund_required,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct HistoryEntryResponse {
    pub uuid: Uuid,

    /// `ORDER` or `PAYMENT`
    pub kind: String,

    pub from_status: Option<String>,
    pub to_status: String,
    pub actor: Option<Uuid>,
    pub note: Option<String>,
    pub created_at: String,
}

impl From<StatusHistoryRecord> for HistoryEntryResponse {
    fn from(entry: StatusHistoryRecord) -> Self {
        HistoryEntryResponse {
            uuid: entry.uuid.into(),
            kind: entry.kind.to_string(),
            from_status: entry.from_status,
            to_status: entry.to_status,
            actor: entry.actor.map(Into::into),
            note: entry.note,
            created_at: entry.created_at.to_string(),
        }
    }
}
