//! Payment Responses

use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use grosir_app::domain::payments::records::{CallbackOutcome, PaymentRecord};

use crate::orders::responses::timestamp;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaymentResponse {
    pub uuid: Uuid,
    pub order: Uuid,
    pub payer: Uuid,

    #[salvo(schema(value_type = String))]
    pub amount: Decimal,

    /// `PENDING`, `PARTIAL`, `PAID`, `EXPIRED`, `FAILED` or `REFUNDED`
    pub status: String,

    /// Reference shared with the payment gateway
    pub external_id: String,

    pub gateway_reference: Option<String>,
    pub paid_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PaymentRecord> for PaymentResponse {
    fn from(payment: PaymentRecord) -> Self {
        PaymentResponse {
            uuid: payment.uuid.into(),
            order: payment.order.into(),
            payer: payment.payer.into(),
            amount: payment.amount,
            status: payment.status.to_string(),
            external_id: payment.external_id,
            gateway_reference: payment.gateway_reference,
            paid_at: timestamp(payment.paid_at),
            created_at: payment.created_at.to_string(),
            updated_at: payment.updated_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CallbackResponse {
    pub payment: PaymentResponse,

    /// Order payment status after the callback
    pub order_payment_status: String,

    /// The callback repeated the current status and changed nothing
    pub replayed: bool,
}

impl From<CallbackOutcome> for CallbackResponse {
    fn from(outcome: CallbackOutcome) -> Self {
        CallbackResponse {
            payment: outcome.payment.into(),
            order_payment_status: outcome.order_payment_status.to_string(),
            replayed: outcome.replayed,
        }
    }
}
