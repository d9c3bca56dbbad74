//! Payments Records

use jiff::Timestamp;
use rust_decimal::Decimal;

use grosir::payments::PaymentStatus;

use crate::{domain::orders::records::OrderUuid, identities::BuyerUuid, uuids::TypedUuid};

/// Payment UUID
pub type PaymentUuid = TypedUuid<PaymentRecord>;

/// Payment Record
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRecord {
    pub uuid: PaymentUuid,
    pub order: OrderUuid,
    pub payer: BuyerUuid,
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub external_id: String,
    pub gateway_reference: Option<String>,
    pub paid_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// What a gateway callback did.
#[derive(Debug, Clone, PartialEq)]
pub struct CallbackOutcome {
    pub payment: PaymentRecord,

    /// The order aggregate after the callback.
    pub order_payment_status: PaymentStatus,

    /// The payment already had the reported status; nothing changed.
    pub replayed: bool,
}
