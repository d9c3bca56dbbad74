//! Payments Data

use grosir::payments::PaymentStatus;

use crate::identities::ActorUuid;

/// Status report from the payment gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayCallback {
    pub external_id: String,
    pub status: PaymentStatus,
    pub gateway_reference: Option<String>,
}

/// Admin request to return a payment's money.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRefund {
    pub actor: Option<ActorUuid>,
    pub note: Option<String>,
}
