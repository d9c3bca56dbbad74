//! Payment Requests

use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};

use grosir::payments::PaymentStatus;
use grosir_app::{
    domain::payments::data::{GatewayCallback, PaymentRefund},
    identities::ActorUuid,
};

use crate::extensions::*;

/// Status report pushed by the payment gateway.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub(crate) struct GatewayCallbackRequest {
    /// Our payment reference, `<order code>-P<n>`
    pub external_id: String,

    /// `PAID`, `PARTIAL`, `FAILED` or `EXPIRED`
    pub status: String,

    /// Gateway's own transaction identifier
    #[serde(default)]
    pub gateway_reference: Option<String>,
}

impl TryFrom<GatewayCallbackRequest> for GatewayCallback {
    type Error = StatusError;

    fn try_from(request: GatewayCallbackRequest) -> Result<Self, Self::Error> {
        let external_id = request.external_id.trim();

        if external_id.is_empty() {
            return Err(StatusError::bad_request().brief("external_id is required"));
        }

        Ok(GatewayCallback {
            external_id: external_id.to_string(),
            status: request
                .status
                .parse::<PaymentStatus>()
                .or_400("unknown payment status")?,
            gateway_reference: request
                .gateway_reference
                .filter(|reference| !reference.trim().is_empty()),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
pub(crate) struct RefundPaymentRequest {
    /// Recorded in the order's status history
    #[serde(default)]
    pub note: Option<String>,
}

impl RefundPaymentRequest {
    pub(crate) fn into_refund(self, actor: ActorUuid) -> PaymentRefund {
        PaymentRefund {
            actor: Some(actor),
            note: self.note.filter(|note| !note.trim().is_empty()),
        }
    }
}
